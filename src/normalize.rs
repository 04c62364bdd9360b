//! Splitting a raw multi-line locator block into work items

use crate::types::Locator;

/// Split `raw` into locators, one per non-blank line, in input order
///
/// Lines are trimmed; blank lines are skipped. Handles both `\n` and `\r\n`
/// line endings. Never fails: an empty or all-blank blob yields an empty vector.
///
/// # Examples
///
/// ```
/// use zhihu_dl::normalize::normalize_locators;
///
/// let locators = normalize_locators("https://site/q/1\n\n  https://site/q/2  \r\n");
/// let texts: Vec<&str> = locators.iter().map(|l| l.as_str()).collect();
/// assert_eq!(texts, ["https://site/q/1", "https://site/q/2"]);
/// ```
#[must_use]
pub fn normalize_locators(raw: &str) -> Vec<Locator> {
    raw.lines().filter_map(Locator::new).collect()
}
