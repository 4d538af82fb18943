use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Language used when a caller asks for one we do not ship
pub const DEFAULT_LANGUAGE: &str = "ru";

// Message catalogues compiled into the binary
const RESOURCES: &[(&str, &str)] = &[
    ("ru", include_str!("../locales/ru/main.ftl")),
    ("en", include_str!("../locales/en/main.ftl")),
];

/// Localization manager for the clinic bots
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every shipped language
    pub fn new() -> Self {
        let bundles = RESOURCES
            .iter()
            .map(|(code, source)| {
                let locale: LanguageIdentifier = code.parse().unwrap_or_default();
                (code.to_string(), Self::create_bundle(&locale, source))
            })
            .collect();

        Self { bundles }
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> FluentBundle<FluentResource> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Echoed values (dates, time ranges) must come back byte-for-byte
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!(locale = %locale, errors = ?errors, "Fluent resource has syntax errors");
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(locale = %locale, errors = ?errors, "Duplicate fluent messages");
        }

        bundle
    }

    /// Get a localized message in the requested language
    ///
    /// Unknown languages fall back to [`DEFAULT_LANGUAGE`].
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {key}"),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key, language, errors = ?errors, "Fluent formatting errors");
        }

        value.into_owned()
    }
}

impl Default for LocalizationManager {
    fn default() -> Self {
        Self::new()
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(LocalizationManager::new);

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Whether a catalogue exists for `language`
pub fn is_supported_language(language: &str) -> bool {
    RESOURCES.iter().any(|(code, _)| *code == language)
}

/// Convenience function to get a localized message
pub fn t_lang(key: &str, language: &str) -> String {
    get_localization_manager().get_message_in_language(key, language, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language: &str) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(key, language, Some(&args_map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_the_same_keys() {
        let manager = LocalizationManager::new();
        let keys = [
            "welcome",
            "menu-book",
            "menu-clinic-info",
            "menu-profile",
            "choose-category",
            "booking-confirmed",
            "callback-not-recognized",
            "branches-unavailable",
            "profile-details",
            "error-users",
        ];
        for (code, _) in RESOURCES {
            for key in keys {
                let message = manager.get_message_in_language(key, code, None);
                assert!(
                    !message.starts_with("Missing"),
                    "{key} missing for {code}"
                );
            }
        }
    }

    #[test]
    fn test_confirmation_is_not_bidi_isolated() {
        let text = t_args_lang(
            "booking-confirmed",
            &[("category", "Cardiology"), ("date", "2024-05-01"), ("time", "09:00 - 09:30")],
            "ru",
        );
        assert_eq!(
            text,
            "Вы выбрали категорию: Cardiology, дату: 2024-05-01, время: 09:00 - 09:30"
        );
    }

    #[test]
    fn test_multiline_message() {
        let text = t_args_lang(
            "profile-details",
            &[("name", "Иванов Иван"), ("phone", "+79990000000"), ("id", "42")],
            "ru",
        );
        assert_eq!(text, "Ваши данные:\nФИО: Иванов Иван\nНомер: +79990000000\nID: 42");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        assert_eq!(t_lang("menu-book", "de"), t_lang("menu-book", DEFAULT_LANGUAGE));
        assert!(is_supported_language("en"));
        assert!(!is_supported_language("de"));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(t_lang("no-such-key", "en"), "Missing translation: no-such-key");
    }
}
