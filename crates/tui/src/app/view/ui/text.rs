use crate::app::util::text::{char_width, display_width};

pub(super) fn pad_to_width(mut text: String, width: usize) -> String {
    let current = display_width(&text);
    if current >= width {
        return text;
    }
    text.push_str(&" ".repeat(width - current));
    text
}

pub(super) fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let target = width - 3;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > target {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::{pad_to_width, truncate_to_width};

    #[test]
    fn truncate_adds_ellipsis_only_when_needed() {
        assert_eq!(truncate_to_width("connected", 20), "connected");
        assert_eq!(truncate_to_width("connected abc123", 10), "connect...");
        assert_eq!(truncate_to_width("abc", 2), "..");
    }

    #[test]
    fn pad_fills_to_display_width() {
        assert_eq!(pad_to_width("ab".to_string(), 4), "ab  ");
        assert_eq!(pad_to_width("abcdef".to_string(), 4), "abcdef");
    }
}
