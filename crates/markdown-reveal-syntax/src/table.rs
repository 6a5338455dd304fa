//! Pipe table helpers shared by the grammar and the AST builder.

/// Column alignment declared by a table's delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// `---`
    None,
    /// `:--`
    Left,
    /// `:-:`
    Center,
    /// `--:`
    Right,
}

/// Split a table row into trimmed cell texts.
///
/// One leading and one trailing pipe are optional. A backslash-escaped pipe
/// (`\|`) stays inside its cell.
pub fn split_row(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut cell_start = 0;
    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '|' if !escaped => {
                cells.push(inner[cell_start..i].trim());
                cell_start = i + 1;
            }
            _ => escaped = false,
        }
        if c != '\\' {
            escaped = false;
        }
    }
    cells.push(inner[cell_start..].trim());
    cells
}

/// Parse a delimiter row such as `| :--- | :-: | --: |`.
///
/// Returns `None` unless the line contains a pipe and every cell is a dash
/// run with optional colons at either end.
pub fn parse_delimiter_row(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('|') {
        return None;
    }

    split_row(line)
        .into_iter()
        .map(|cell| {
            let left = cell.starts_with(':');
            let right = cell.len() > 1 && cell.ends_with(':');
            let dashes = &cell[usize::from(left)..cell.len() - usize::from(right)];
            if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
                return None;
            }
            Some(match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("| a | b |", vec!["a", "b"])]
    #[case("a | b", vec!["a", "b"])]
    #[case("|a|", vec!["a"])]
    #[case("| a \\| b | c |", vec!["a \\| b", "c"])]
    #[case("| a |  |", vec!["a", ""])]
    fn split_row_cases(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_row(line), expected);
    }

    #[test]
    fn delimiter_row_alignments() {
        assert_eq!(
            parse_delimiter_row("| --- | :-- | :-: | --: |"),
            Some(vec![
                Alignment::None,
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
            ])
        );
    }

    #[rstest]
    #[case("---")]
    #[case("| a | --- |")]
    #[case("| : | --- |")]
    #[case("| -:- |")]
    fn rejects_non_delimiter_rows(#[case] line: &str) {
        assert_eq!(parse_delimiter_row(line), None);
    }
}
