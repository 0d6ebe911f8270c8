use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Hard-wraps by display width. Always yields at least one row.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for ch in line.chars() {
        let ch_width = char_width(ch);
        if current_width + ch_width > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    rows.push(current);
    rows
}

/// The composer is a single line: pasted line breaks collapse into one space
/// and tabs expand.
pub fn sanitize_paste(value: &str) -> String {
    let mut out = String::new();
    let mut pending_break = false;
    for ch in value.chars() {
        match ch {
            '\r' | '\n' => pending_break = true,
            _ => {
                if pending_break && !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                pending_break = false;
                match ch {
                    '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
                    c if c.is_control() => out.push(' '),
                    c => out.push(c),
                }
            }
        }
    }
    out
}

fn skip_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match chars.next() {
        // CSI runs until its final byte.
        Some('[') => {
            for ch in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&ch) {
                    break;
                }
            }
        }
        // OSC ends with BEL or ESC \.
        Some(']') => loop {
            match chars.next() {
                None | Some('\x07') => break,
                Some('\x1b') if chars.peek() == Some(&'\\') => {
                    chars.next();
                    break;
                }
                _ => {}
            }
        },
        _ => {}
    }
}

/// Strips escape sequences and expands tabs so backend text cannot move the
/// terminal cursor.
pub fn sanitize_for_tui(value: &str) -> String {
    let mut out = String::new();
    let mut col = 0_usize;
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => skip_escape(&mut chars),
            '\t' => {
                let spaces = TAB_WIDTH - (col % TAB_WIDTH);
                out.push_str(&" ".repeat(spaces));
                col += spaces;
            }
            '\r' => {}
            c if c.is_control() => {
                out.push(' ');
                col += 1;
            }
            c => {
                out.push(c);
                col += char_width(c);
            }
        }
    }
    out
}
