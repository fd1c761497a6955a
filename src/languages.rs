use std::borrow::Cow;

/// Source code meaning "let the backend detect the language".
pub const AUTO: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages accepted by the backend. `auto` is only valid as a source.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "it", name: "Italian" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "zh", name: "Chinese" },
    Language { code: "ru", name: "Russian" },
    Language { code: "ar", name: "Arabic" },
];

pub fn find(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|lang| lang.code == code)
}

pub fn is_supported_source(code: &str) -> bool {
    code == AUTO || find(code).is_some()
}

pub fn is_supported_target(code: &str) -> bool {
    find(code).is_some()
}

/// All codes a client may send as source, `auto` first.
pub fn codes() -> Vec<&'static str> {
    std::iter::once(AUTO)
        .chain(SUPPORTED_LANGUAGES.iter().map(|lang| lang.code))
        .collect()
}

/// Human name for a code, falling back to the upper-cased code.
pub fn display_name(code: &str) -> Cow<'static, str> {
    match find(code) {
        Some(lang) => Cow::Borrowed(lang.name),
        None if code == AUTO => Cow::Borrowed("Detect language"),
        None => Cow::Owned(code.to_uppercase()),
    }
}

/// Label such as `English → Portuguese`.
pub fn translation_path(source: &str, target: &str) -> String {
    format!("{} → {}", display_name(source), display_name(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_is_source_only() {
        assert!(is_supported_source("auto"));
        assert!(!is_supported_target("auto"));
        assert!(is_supported_target("pt"));
        assert!(!is_supported_source("xx"));
    }

    #[test]
    fn display_names_fall_back_to_code() {
        assert_eq!(display_name("fr"), "French");
        assert_eq!(display_name("nl"), "NL");
        assert_eq!(translation_path("en", "pt"), "English → Portuguese");
    }

    #[test]
    fn codes_start_with_auto() {
        let codes = codes();
        assert_eq!(codes[0], "auto");
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len() + 1);
    }
}
