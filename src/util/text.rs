use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Shortens `s` so it occupies at most `max_width` columns.
///
/// Text that already fits is returned borrowed. Longer text is cut on a
/// character boundary and suffixed with `...`. Widths too narrow to hold a
/// character plus the ellipsis get as many characters as fit, unadorned.
///
/// ```
/// use trailhead::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Gishwati Forest Loop", 12), "Gishwati ...");
/// assert_eq!(truncate_to_width("Huye", 10), "Huye");
/// assert_eq!(truncate_to_width("Huye", 2), "Hu");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Removes terminal control characters and ANSI escape sequences.
///
/// Trail records come from an external JSON document, so every string is
/// passed through here before it reaches the terminal. Tab, newline and
/// carriage return survive; CSI (`ESC [`) and OSC (`ESC ]`, ended by BEL or
/// `ESC \`) sequences are dropped whole, as is any lone ESC.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| b == 0x1b || is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let len = bytes.len();

    while i < len {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            }
            0x1b if bytes.get(i + 1) == Some(&b']') => {
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b if b == 0x1b || is_stripped_control(b) => i += 1,
            _ => {
                let start = i;
                while i < len && bytes[i] != 0x1b && !is_stripped_control(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes end the run, so the slice stays on a char boundary.
                out.push_str(&s[start..i]);
            }
        }
    }

    Cow::Owned(out)
}

/// Sanitises `s` for display and collapses it onto one line.
///
/// Used for card fields where an embedded newline would break the layout.
pub fn single_line(s: &str) -> String {
    strip_control_chars(s)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fits_is_borrowed() {
        let result = truncate_to_width("Nyungwe", 7);
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Congo Nile Trail", 10), "Congo N...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Trail", 0), "");
        assert_eq!(truncate_to_width("Trail", 3), "Tra");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is two columns.
        assert_eq!(truncate_to_width("山道山道山道", 7), "山道...");
    }

    #[test]
    fn test_strip_clean_text_is_borrowed() {
        let result = strip_control_chars("Bird watching");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_ansi_colour() {
        assert_eq!(strip_control_chars("\x1b[31mred\x1b[0m"), "red");
    }

    #[test]
    fn test_strip_osc_title_change() {
        assert_eq!(strip_control_chars("a\x1b]0;pwned\x07b"), "ab");
        assert_eq!(strip_control_chars("a\x1b]0;pwned\x1b\\b"), "ab");
    }

    #[test]
    fn test_strip_keeps_whitespace_controls() {
        assert_eq!(strip_control_chars("a\tb\nc\r"), "a\tb\nc\r");
        assert_eq!(strip_control_chars("a\x00b\x7fc\x1bd"), "abcd");
    }

    #[test]
    fn test_strip_preserves_unicode() {
        assert_eq!(strip_control_chars("Kinigi\x1b[1m → Bisoke"), "Kinigi → Bisoke");
    }

    #[test]
    fn test_single_line_collapses() {
        assert_eq!(single_line("  Views\n of\tthe lake "), "Views of the lake");
    }
}
