//! Search and pagination helpers shared by list endpoints.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default page size for paginated admin listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Hard ceiling for any page size a client may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default size of "top N" listings (popular, recent).
pub const DEFAULT_TOP_LIMIT: i64 = 10;

/// Upper bound for "top N" listings.
pub const MAX_TOP_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Build a case-insensitive `LIKE` pattern from free-text user input.
///
/// The input is trimmed and lowercased, `LIKE` metacharacters are escaped
/// with a backslash, and the result is wrapped in `%...%`. Returns `None`
/// for empty or whitespace-only input so callers can skip the filter.
///
/// # Examples
///
/// ```
/// use smcd_core::search::like_pattern;
/// assert_eq!(like_pattern("Foie"), Some("%foie%".to_string()));
/// assert_eq!(like_pattern("100%"), Some("%100\\%%".to_string()));
/// assert_eq!(like_pattern("  "), None);
/// ```
pub fn like_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(trimmed.len() + 2);
    pattern.push('%');
    for c in trimmed.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- like_pattern --------------------------------------------------------

    #[test]
    fn like_pattern_wraps_and_lowercases() {
        assert_eq!(like_pattern("Hépatique"), Some("%hépatique%".to_string()));
    }

    #[test]
    fn like_pattern_trims_input() {
        assert_eq!(like_pattern("  colon  "), Some("%colon%".to_string()));
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("a_b"), Some("%a\\_b%".to_string()));
        assert_eq!(like_pattern("c:\\x"), Some("%c:\\\\x%".to_string()));
    }

    #[test]
    fn like_pattern_empty_returns_none() {
        assert_eq!(like_pattern(""), None);
        assert_eq!(like_pattern("   "), None);
    }

    // -- clamp_limit ---------------------------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    // -- clamp_offset --------------------------------------------------------

    #[test]
    fn clamp_offset_defaults_to_zero() {
        assert_eq!(clamp_offset(None), 0);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
