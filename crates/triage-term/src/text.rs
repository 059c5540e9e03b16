//! Column-budget truncation

use std::borrow::Cow;

/// Marker appended to truncated fields
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `budget` characters.
///
/// Longer text keeps its first `budget - 3` characters followed by
/// [`ELLIPSIS`]. Budgets too small to hold the marker clip instead.
pub fn truncate(text: &str, budget: usize) -> Cow<'_, str> {
    if text.chars().count() <= budget {
        return Cow::Borrowed(text);
    }
    if budget <= ELLIPSIS.len() {
        return Cow::Owned(text.chars().take(budget).collect());
    }
    let mut out: String = text.chars().take(budget - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// [`truncate`] unless truncation is disabled
pub fn fit(text: &str, budget: usize, no_trunc: bool) -> Cow<'_, str> {
    if no_trunc {
        Cow::Borrowed(text)
    } else {
        truncate(text, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_budget_with_marker() {
        let title = "x".repeat(200);
        for budget in [10, 40, 120] {
            let out = truncate(&title, budget);
            assert_eq!(out.chars().count(), budget);
            assert!(out.ends_with(ELLIPSIS));
            assert_eq!(&out[..budget - 3], &title[..budget - 3]);
        }
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert!(matches!(truncate("fits", 10), Cow::Borrowed("fits")));
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_tiny_budget_clips() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("abcdef", 0), "");
    }

    #[test]
    fn test_multibyte() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_no_trunc() {
        let title = "y".repeat(50);
        assert_eq!(fit(&title, 10, true), title);
        assert_eq!(fit(&title, 10, false).chars().count(), 10);
    }
}
