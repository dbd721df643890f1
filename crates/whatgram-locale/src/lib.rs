//! Interface strings keyed by language, with `{param}` substitution.

mod tables;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::OnceLock;

use tracing::trace;

/// Language used when a key is missing from the requested table.
pub const DEFAULT_LANGUAGE: &str = "tr";

type Table = HashMap<&'static str, &'static str>;

fn tables() -> &'static HashMap<&'static str, Table> {
    static TABLES: OnceLock<HashMap<&'static str, Table>> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut all = HashMap::new();
        all.insert("tr", tables::TR.iter().copied().collect());
        all.insert("en", tables::EN.iter().copied().collect());
        all
    })
}

/// Look up `key` for `language`, falling back to the default language and
/// then to the key itself. Each `{name}` placeholder is replaced once.
pub fn translate_key(key: &str, language: &str, params: &[(&str, &dyn Display)]) -> String {
    let all = tables();
    let found = all
        .get(language)
        .and_then(|table| table.get(key))
        .or_else(|| all.get(DEFAULT_LANGUAGE).and_then(|table| table.get(key)));

    let mut text = match found {
        Some(text) => (*text).to_string(),
        None => {
            trace!("No UI string for key '{}'", key);
            key.to_string()
        }
    };

    for (name, value) in params {
        let placeholder = format!("{{{}}}", name);
        text = text.replacen(&placeholder, &value.to_string(), 1);
    }

    text
}

/// Shorthand for [`translate_key`] without parameters.
pub fn t(key: &str, language: &str) -> String {
    translate_key(key, language, &[])
}

/// Languages offered in settings menus, code -> display name.
///
/// Listing a language here does not mean its UI strings exist; only `tr`
/// and `en` have tables.
pub fn supported_languages() -> &'static [(&'static str, &'static str)] {
    tables::SUPPORTED
}

pub fn is_supported(code: &str) -> bool {
    tables::SUPPORTED.iter().any(|(c, _)| *c == code)
}

pub fn language_name(code: &str) -> Option<&'static str> {
    tables::SUPPORTED
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Every key of the default-language table.
pub fn default_keys() -> impl Iterator<Item = &'static str> {
    tables::TR.iter().map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_default_key_resolves_in_every_language() {
        for (lang, _) in supported_languages() {
            for key in default_keys() {
                let text = t(key, lang);
                assert!(!text.is_empty(), "{} / {} resolved empty", lang, key);
            }
        }
    }

    #[test]
    fn english_table_covers_default_table() {
        for key in default_keys() {
            assert!(tables::EN.iter().any(|(k, _)| *k == key), "en missing {}", key);
        }
    }

    #[test]
    fn code_expires_substitutes_both_placeholders_once() {
        for (lang, _) in supported_languages() {
            let text = translate_key("codeExpires", lang, &[("minutes", &4), ("seconds", &"59")]);
            assert_eq!(text.matches("4:59").count(), 1, "{}: {}", lang, text);
            assert!(!text.contains('{'), "{}: {}", lang, text);
        }
        assert_eq!(
            translate_key("codeExpires", "en", &[("minutes", &4), ("seconds", &"59")]),
            "Code expires in 4:59 minutes"
        );
    }

    #[test]
    fn untranslated_language_falls_back_to_turkish() {
        assert_eq!(t("logout", "de"), "Çıkış");
        assert_eq!(t("logout", "en"), "Logout");
        assert_eq!(t("logout", "xx"), "Çıkış");
    }

    #[test]
    fn unknown_key_returns_key() {
        assert_eq!(t("noSuchKey", "en"), "noSuchKey");
        assert_eq!(
            translate_key("noSuchKey", "en", &[("name", &"ignored")]),
            "noSuchKey"
        );
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let text = translate_key("messageInputPlaceholder", "en", &[("type", &"group")]);
        assert_eq!(text, "Type a message to group...");
    }

    #[test]
    fn supported_language_list_is_fixed() {
        let codes: Vec<&str> = supported_languages().iter().map(|(c, _)| *c).collect();
        assert_eq!(codes, ["tr", "en", "de", "fr", "es", "it", "ru", "ar", "ja", "ko", "zh", "pt"]);
        assert!(is_supported("ja"));
        assert!(!is_supported("xx"));
        assert_eq!(language_name("de"), Some("Deutsch"));
    }
}
