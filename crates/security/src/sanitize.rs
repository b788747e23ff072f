use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strips script blocks (including their contents), then any remaining
/// markup tags, then surrounding whitespace.
///
/// Idempotent: sanitizing already-sanitized text is a no-op.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    let stripped = SCRIPT_BLOCK.replace_all(text, "");
    let stripped = MARKUP_TAG.replace_all(&stripped, "");

    stripped.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(sanitize_text("<b>hi</b>"), "hi");
        assert_eq!(sanitize_text("no markup at all"), "no markup at all");
        assert_eq!(sanitize_text("  padded\t"), "padded");
        assert_eq!(sanitize_text("a <em>b</em> c"), "a b c");
    }

    #[test]
    fn test_strips_script_blocks() {
        assert_eq!(sanitize_text("<script>alert(1)</script>ok"), "ok");
        assert_eq!(sanitize_text("<SCRIPT SRC=x>payload</SCRIPT>ok"), "ok");
        assert_eq!(sanitize_text("a<script>\nmulti\nline\n</script>b"), "ab");

        // unterminated script loses its tag but keeps the trailing text
        assert_eq!(sanitize_text("<script>orphan"), "orphan");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "<b>hi</b>",
            "<script>alert('x')</script><i>rest</i>",
            "plain",
            "1 < 2",
            "a < b > c",
            "  <p>spaced</p>  ",
        ];

        for sample in samples {
            let once = sanitize_text(sample);
            assert_eq!(sanitize_text(&once), once, "not idempotent for {sample:?}");
        }
    }
}
