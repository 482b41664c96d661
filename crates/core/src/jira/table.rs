//! Pipe table rewriting.
//!
//! A table starts at a pipe-bounded line directly followed by a separator
//! row. The header becomes a `||`-delimited row, the separator is dropped, and
//! every following pipe-bounded line becomes a `|`-delimited row. The first
//! line that is not pipe-bounded ends the table.

/// Rewrite every table in `text`; all other lines pass through unchanged.
pub fn rewrite(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        let starts_table = is_pipe_bounded(line)
            && lines.get(i + 1).is_some_and(|next| is_separator_row(next));
        if !starts_table {
            output.push(line.to_string());
            i += 1;
            continue;
        }

        output.push(header_row(&split_cells(line)));
        i += 2;

        while i < lines.len() && is_pipe_bounded(lines[i]) {
            output.push(data_row(&split_cells(lines[i])));
            i += 1;
        }
    }

    output.join("\n")
}

/// A line that starts and ends with `|` once surrounding whitespace is trimmed.
pub fn is_pipe_bounded(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

/// A pipe-bounded line made only of `-`, `:`, `|` and whitespace, with at
/// least one `-`, such as `|---|:--:|`.
pub fn is_separator_row(line: &str) -> bool {
    is_pipe_bounded(line)
        && line.contains('-')
        && line
            .trim()
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Split a pipe-bounded line into trimmed cells, discarding the empty pieces
/// produced by the leading and trailing `|`.
pub fn split_cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    let inner = line
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
        .unwrap_or(line);
    inner.split('|').map(str::trim).collect()
}

fn cell(text: &str) -> &str {
    if text.is_empty() {
        " "
    } else {
        text
    }
}

fn header_row(cells: &[&str]) -> String {
    let mut row = String::from("||");
    for text in cells {
        row.push_str(cell(text));
        row.push_str("||");
    }
    row
}

fn data_row(cells: &[&str]) -> String {
    let mut row = String::from("|");
    for text in cells {
        row.push_str(cell(text));
        row.push('|');
    }
    row
}
