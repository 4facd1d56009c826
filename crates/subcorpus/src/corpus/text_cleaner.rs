//! # Text Cleaner

/// Marks which may end a cleaned line.
pub const TERMINAL_MARKS: [char; 3] = ['.', '?', '!'];

/// The mark appended to a cleaned line with no terminal mark.
pub const DEFAULT_TERMINAL: char = '.';

/// Is `c` kept by [`clean_line`]?
///
/// The kept alphabet is ``[A-Za-z0-9.' ]``.
pub fn is_kept_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '\'' || c == ' '
}

/// Normalize one raw record into a canonical line.
///
/// * drops every char outside ``[A-Za-z0-9.' ]``;
/// * collapses whitespace runs to a single space, and trims the ends;
/// * appends `'.'` to a non-empty line that does not end in a [`TERMINAL_MARKS`] char.
///
/// Total and pure; the result may be empty. Cleaning is idempotent.
pub fn clean_line(raw: &str) -> String {
    let mut line = String::with_capacity(raw.len() + 1);

    for word in raw
        .chars()
        .filter(|&c| is_kept_char(c))
        .collect::<String>()
        .split(' ')
        .filter(|w| !w.is_empty())
    {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() && !line.ends_with(TERMINAL_MARKS) {
        line.push(DEFAULT_TERMINAL);
    }

    line
}

/// Is `line` already a fixed point of [`clean_line`]?
pub fn is_clean_line(line: &str) -> bool {
    clean_line(line) == line
}
