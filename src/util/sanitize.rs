use regex::Regex;
use std::sync::LazyLock;

const MAX_CHARS: usize = 200;

// CSI sequences (ESC [ ... final byte) and OSC sequences (ESC ] ... BEL or ESC \)
static ESCAPES: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]|\x1B\][^\x07\x1B]*(?:\x07|\x1B\\)").ok()
});

/// Makes API-supplied text safe to print on one terminal line: escape
/// sequences and control characters go, whitespace runs collapse, and the
/// result is cut at 200 characters.
pub fn sanitize_for_terminal(s: &str) -> String {
    let stripped = match ESCAPES.as_ref() {
        Some(re) => re.replace_all(s, ""),
        None => s.into(),
    };

    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if ch.is_control() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out.chars().take(MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_escapes_and_controls() {
        assert_eq!(sanitize_for_terminal("\x1b[31mRed\x1b[0m alert\x07"), "Red alert");
        assert_eq!(
            sanitize_for_terminal("\x1b]8;;http://x\x1b\\link\x1b]8;;\x1b\\"),
            "link"
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_for_terminal("  one\n\ttwo  \r\n three "), "one two three");
    }

    #[test]
    fn truncates_long_titles() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_for_terminal(&long).chars().count(), 200);
    }
}
