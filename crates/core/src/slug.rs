//! URL slug generation for rooms, chapters, videos, sponsors and documents.

/// Slug used when the source text contains no usable character.
pub const EMPTY_SLUG_FALLBACK: &str = "sans-titre";

/// Turn a display title into a URL slug.
///
/// Accented Latin letters are folded to ASCII, every run of characters
/// outside `[a-z0-9]` becomes a single `-`, and leading/trailing dashes are
/// removed.
///
/// ```
/// use smcd_core::slug::slugify;
/// assert_eq!(slugify("Salle Hépato-Biliaire"), "salle-hepato-biliaire");
/// assert_eq!(slugify("  Œsophage & Estomac  "), "oesophage-estomac");
/// assert_eq!(slugify("!!!"), "sans-titre");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        let folded = fold_char(c);
        for f in folded.chars() {
            let f = f.to_ascii_lowercase();
            if f.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(f);
            } else {
                pending_dash = true;
            }
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG_FALLBACK.to_string()
    } else {
        slug
    }
}

/// The `n`-th candidate for a slug that must be unique: `base`, `base-1`,
/// `base-2`, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Fold one character to its ASCII approximation.
fn fold_char(c: char) -> std::borrow::Cow<'static, str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'œ' | 'Œ' => "oe",
        'æ' | 'Æ' => "ae",
        'ß' => "ss",
        _ => return std::borrow::Cow::Owned(c.to_string()),
    };
    std::borrow::Cow::Borrowed(folded)
}
