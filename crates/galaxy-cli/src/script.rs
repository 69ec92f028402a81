//! Id list and replay script parsing. Pure text helpers, no I/O.
//!
//! Ids are separated by whitespace or commas. In a replay script every
//! remaining line is one live set; a line holding only `-` is the empty set.
//! Blank lines and `#` comments are skipped. A `#` only opens a comment at
//! the start of a line or after whitespace, so ids may contain `#`.

/// Split one line into ids.
pub fn split_ids(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_comment(line: &str) -> &str {
    let mut after_space = true;
    for (i, c) in line.char_indices() {
        if c == '#' && after_space {
            return &line[..i];
        }
        after_space = c.is_whitespace();
    }
    line
}

/// Parse a flat id list (e.g. from `place --file`). Line breaks are separators.
pub fn parse_id_list(content: &str) -> Vec<String> {
    content
        .lines()
        .flat_map(|line| split_ids(strip_comment(line)))
        .collect()
}

/// Parse a replay script into its sequence of live sets.
pub fn parse_script(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .map(|line| strip_comment(line).trim())
        .filter(|line| !line.is_empty())
        .map(|line| if line == "-" { Vec::new() } else { split_ids(line) })
        .collect()
}
