//! Account settings models

use serde::{Deserialize, Serialize};

/// Which events the user wants to be notified about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub system_alerts: bool,
    pub new_logins: bool,
    pub password_changes: bool,
    pub role_updates: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            system_alerts: true,
            new_logins: false,
            password_changes: true,
            role_updates: true,
        }
    }
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
        }
    }

    /// Only English is offered today; the others are listed as coming soon
    pub fn is_available(&self) -> bool {
        matches!(self, Language::En)
    }
}

/// Body of a language update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePreference {
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_defaults() {
        let prefs = NotificationPreferences::default();
        assert!(prefs.system_alerts);
        assert!(!prefs.new_logins);
        let json = serde_json::to_value(prefs).unwrap();
        assert_eq!(json["passwordChanges"], true);
    }

    #[test]
    fn language_codes() {
        let lang: Language = serde_json::from_str(r#""fr""#).unwrap();
        assert_eq!(lang, Language::Fr);
        assert!(!lang.is_available());
        assert!(Language::En.is_available());
    }
}
