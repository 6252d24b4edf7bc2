//! Abstract reference numbers (`SMCD2026-007`) and the file names derived
//! from them.

use std::sync::LazyLock;

use regex::Regex;

/// Prefix shared by every reference number of this edition.
pub const REFERENCE_PREFIX: &str = "SMCD2026-";

/// Longest title fragment kept in a generated file name.
const FILE_TITLE_MAX_CHARS: usize = 30;

static NON_ALNUM_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Render sequence value `n` as a reference number, zero-padded to three
/// digits (`SMCD2026-001`, ..., `SMCD2026-1234`).
pub fn format_reference(n: i64) -> String {
    format!("{REFERENCE_PREFIX}{n:03}")
}

/// Numeric part of a reference (`"SMCD2026-042"` gives `"042"`).
pub fn reference_number(reference: &str) -> &str {
    reference.strip_prefix(REFERENCE_PREFIX).unwrap_or(reference)
}

/// Public id (file stem) of an abstract's Word export:
/// `SMCD2026_{number}_{title}` where the title keeps only ASCII letters,
/// digits and underscores and is cut to 30 characters.
pub fn abstract_file_stem(reference: &str, titre: &str) -> String {
    let stripped = NON_ALNUM_SPACE.replace_all(titre.trim(), "");
    let underscored = WHITESPACE_RUN.replace_all(&stripped, "_");
    let clean: String = underscored.chars().take(FILE_TITLE_MAX_CHARS).collect();
    format!("SMCD2026_{}_{}", reference_number(reference), clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_zero_padded() {
        assert_eq!(format_reference(1), "SMCD2026-001");
        assert_eq!(format_reference(42), "SMCD2026-042");
        assert_eq!(format_reference(1234), "SMCD2026-1234");
    }

    #[test]
    fn reference_number_strips_prefix() {
        assert_eq!(reference_number("SMCD2026-042"), "042");
        assert_eq!(reference_number("OTHER"), "OTHER");
    }

    #[test]
    fn file_stem_cleans_title() {
        assert_eq!(
            abstract_file_stem("SMCD2026-007", "Résection hépatique: 10 ans!"),
            "SMCD2026_007_Rsection_hpatique_10_ans"
        );
    }

    #[test]
    fn file_stem_truncates_long_titles() {
        let stem = abstract_file_stem(
            "SMCD2026-100",
            "A very long title about laparoscopic colorectal surgery outcomes",
        );
        assert_eq!(stem, "SMCD2026_100_A_very_long_title_about_laparo");
    }
}
