/// Rewrites every line break as `\r\n`.
///
/// Bare `\n` and bare `\r` both become `\r\n`; existing `\r\n` pairs are
/// kept, so the function is idempotent.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            other => out.push(other),
        }
    }

    out
}
