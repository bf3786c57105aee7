//! Mapping of raw model labels onto catalog codes.

use crate::catalog;

/// Map a backend's native label onto a catalog code.
///
/// Three short-circuiting tiers over the lowercased label:
/// 1. the whole label is a catalog member;
/// 2. any `-`/`_`-separated token is a catalog member;
/// 3. the first two characters are a catalog member.
///
/// Returns `None` when no tier matches. The two-character prefix tier can
/// in principle collide across unrelated labels; callers accept that
/// trade-off in exchange for covering the common `xxx_Script` label shapes.
pub fn map_label(raw: &str) -> Option<&'static str> {
    let lowered = raw.to_lowercase();

    if let Some(code) = catalog::canonical(&lowered) {
        return Some(code);
    }

    for token in lowered.split(['-', '_']) {
        if let Some(code) = catalog::canonical(token) {
            return Some(code);
        }
    }

    // `get` rather than slicing: labels are not guaranteed to be ASCII.
    if let Some(code) = lowered.get(..2).and_then(catalog::canonical) {
        return Some(code);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_member_passes_through() {
        assert_eq!(map_label("hi"), Some("hi"));
        assert_eq!(map_label("HI"), Some("hi"));
        assert_eq!(map_label("sat"), Some("sat"));
    }

    #[test]
    fn token_tier_matches_separated_labels() {
        assert_eq!(map_label("bn-Beng"), Some("bn"));
        assert_eq!(map_label("ta_IN"), Some("ta"));
    }

    #[test]
    fn prefix_tier_matches_iso3_shapes() {
        assert_eq!(map_label("eng_Latn"), Some("en"));
        assert_eq!(map_label("hin_Deva"), Some("hi"));
    }

    #[test]
    fn unmapped_labels_yield_none() {
        assert_eq!(map_label("xz_unknown"), None);
        assert_eq!(map_label(""), None);
        assert_eq!(map_label("q"), None);
    }

    #[test]
    fn mixed_case_catalog_codes_are_not_exact_matched() {
        // Lowercasing means script-qualified codes only ever arrive through
        // the token or prefix tiers.
        assert_eq!(map_label("kas_Arab"), None);
        assert_eq!(map_label("snd_Deva"), None);
    }
}
