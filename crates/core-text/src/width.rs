//! Grapheme cluster display width.
//!
//! A single authoritative function `egc_width` returns the terminal column
//! width for one extended grapheme cluster (EGC). Every width decision in the
//! panel (caret column, field padding, button alignment) flows through it.
//!
//! Invariants:
//! - Empty input is width 0; any non-empty cluster is at least width 1.
//! - Pictographic or regional-indicator clusters are widened to 2 when the
//!   baseline table reports 1. Over-estimation leaves a blank cell, while
//!   under-estimation shifts everything after the cluster.

use unicode_width::UnicodeWidthStr;

// Rough Extended Pictographic heuristic (emoji blocks + misc symbols / dingbats).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// Return the display column width for a single grapheme cluster.
///
/// Precondition: `egc` is a single grapheme cluster slice; callers segment
/// first and we do not re-validate.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let base = UnicodeWidthStr::width(egc).clamp(1, 2) as u16;
    if base == 1
        && egc
            .chars()
            .any(|c| is_extended_pictographic(c) || is_regional_indicator(c))
    {
        return 2;
    }
    base
}

/// Sum of cluster widths for a whole string.
pub fn str_width(s: &str) -> usize {
    use unicode_segmentation::UnicodeSegmentation;
    s.graphemes(true).map(|g| egc_width(g) as usize).sum()
}
