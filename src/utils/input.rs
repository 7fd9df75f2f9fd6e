//! Text sanitization for the input buffer.

/// Normalize pasted or transcribed text before it enters the buffer:
/// CRLF and lone CR become LF, tabs become four spaces, and other control
/// characters are dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push('\n');
            }
            '\t' => sanitized.push_str("    "),
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}
