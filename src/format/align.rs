//! @ai:module:intent Column alignment of cell rows, matching gofmt's elastic tabstops
//! @ai:module:layer domain
//! @ai:module:public_api align
//! @ai:module:stateless true
//!
//! Every cell of a row except the last belongs to a column. A column block is
//! a run of consecutive rows that all have a cell in that column; its width is
//! the widest cell plus one space of padding. A block whose cells are all
//! empty takes no space at all.

const PADDING: usize = 1;

/// @ai:intent Lay out rows of cells so that column blocks line up
/// @ai:post one output line per input row, without trailing whitespace
/// @ai:example ([["A", "int"], ["Name", "string"]]) -> ["A    int", "Name string"]
/// @ai:effects pure
pub(crate) fn align(rows: &[Vec<String>]) -> Vec<String> {
    let mut row_widths = vec![Vec::new(); rows.len()];
    let mut widths = Vec::new();
    format(rows, &mut widths, 0, rows.len(), &mut row_widths);

    rows.iter()
        .zip(row_widths)
        .map(|(cells, widths)| write_row(cells, &widths))
        .collect()
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}

/// Assigns each row the column widths in effect when it is written.
fn format(
    rows: &[Vec<String>],
    widths: &mut Vec<usize>,
    mut line0: usize,
    line1: usize,
    row_widths: &mut [Vec<usize>],
) {
    let column = widths.len();
    let mut this = line0;

    while this < line1 {
        if column + 1 >= rows[this].len() {
            this += 1;
            continue;
        }

        for widths_of_row in &mut row_widths[line0..this] {
            widths_of_row.clone_from(widths);
        }
        line0 = this;

        let mut width = 0;
        let mut discardable = true;
        while this < line1 && column + 1 < rows[this].len() {
            let w = cell_width(&rows[this][column]);
            width = width.max(w + PADDING);
            if w > 0 {
                discardable = false;
            }
            this += 1;
        }
        if discardable {
            width = 0;
        }

        widths.push(width);
        format(rows, widths, line0, this, row_widths);
        widths.pop();
        line0 = this;
    }

    for widths_of_row in &mut row_widths[line0..line1] {
        widths_of_row.clone_from(widths);
    }
}

fn write_row(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    for (j, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        if let Some(&width) = widths.get(j) {
            let pad = width.saturating_sub(cell_width(cell));
            out.extend(std::iter::repeat(' ').take(pad));
        }
    }
    out.trim_end().to_string()
}
