//! Agent colors: `#rrggbb` hex strings rendered as truecolor text

use colored::{ColoredString, Colorize};

/// Parse `#rrggbb` (or `rrggbb`) into RGB components
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Paint `text` in the agent's color; unparseable colors fall back to bold
pub fn paint(text: &str, hex: &str) -> ColoredString {
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).bold(),
        None => text.bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#2563eb"), Some((0x25, 0x63, 0xeb)));
        assert_eq!(parse_hex("6B7280"), Some((0x6b, 0x72, 0x80)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gggggg"), None);
        assert_eq!(parse_hex(""), None);
    }

    #[test]
    fn test_paint_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(paint("The Economist", "#2563eb").to_string(), "The Economist");
        assert_eq!(paint("Moderator", "not-a-color").to_string(), "Moderator");
    }
}
