//! Language catalog: the closed set of languages the engine can report.
//!
//! Every backend projects its native output onto this table; codes and
//! probability-map keys outside it are discarded before results reach the
//! caller.

mod backend;

pub use backend::{parse_backend_kind, BackendKind, ParseBackendError};

/// `(code, display name)` pairs. Indic block first, then global languages.
/// Codes are matched exactly and case-sensitively.
const TABLE: &[(&str, &str)] = &[
    ("as", "Assamese"),
    ("bn", "Bengali"),
    ("brx", "Bodo"),
    ("doi", "Dogri"),
    ("gu", "Gujarati"),
    ("hi", "Hindi"),
    ("kn", "Kannada"),
    ("kas_Arab", "Kashmiri (Arabic script)"),
    ("kas_Deva", "Kashmiri (Devanagari script)"),
    ("gom", "Konkani"),
    ("mai", "Maithili"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("mni_Beng", "Manipuri (Bengali script)"),
    ("mni_Mtei", "Manipuri (Meitei script)"),
    ("npi", "Nepali"),
    ("or", "Odia"),
    ("pa", "Punjabi"),
    ("sa", "Sanskrit"),
    ("sat", "Santali"),
    ("snd_Arab", "Sindhi (Arabic script)"),
    ("snd_Deva", "Sindhi (Devanagari script)"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ur", "Urdu"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("fa", "Persian"),
    ("tr", "Turkish"),
    ("id", "Indonesian"),
];

/// Iterate catalog codes in table order.
pub fn codes() -> impl Iterator<Item = &'static str> {
    TABLE.iter().map(|(code, _)| *code)
}

/// Exact, case-sensitive membership test.
pub fn is_supported(code: &str) -> bool {
    TABLE.iter().any(|(c, _)| *c == code)
}

/// Human-readable name for a catalog code.
pub fn display_name(code: &str) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Resolve a borrowed code to the catalog's static string, if it is a member.
pub fn canonical(code: &str) -> Option<&'static str> {
    TABLE.iter().find(|(c, _)| *c == code).map(|(c, _)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_thirty_nine_entries() {
        assert_eq!(codes().count(), 39);
    }

    #[test]
    fn membership_is_case_sensitive() {
        assert!(is_supported("kas_Arab"));
        assert!(!is_supported("kas_arab"));
        assert!(!is_supported("KAS_ARAB"));
    }

    #[test]
    fn display_names_resolve() {
        assert_eq!(display_name("hi"), Some("Hindi"));
        assert_eq!(display_name("mni_Mtei"), Some("Manipuri (Meitei script)"));
        assert_eq!(display_name("xx"), None);
    }

    #[test]
    fn canonical_returns_static_member() {
        let probe = String::from("bn");
        assert_eq!(canonical(&probe), Some("bn"));
        assert_eq!(canonical("zz"), None);
    }
}
