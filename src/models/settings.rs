use serde::{Deserialize, Serialize};

/// Per-user UI settings. These live in the session-scoped store only; the
/// server holds no settings rows beyond these defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub security: SecuritySettings,
    pub language: String,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub qr_expiry: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub profile_visibility: ProfileVisibility,
    pub share_history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub two_factor: bool,
    pub session_timeout_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications: NotificationSettings {
                email: true,
                push: true,
                qr_expiry: true,
            },
            privacy: PrivacySettings {
                profile_visibility: ProfileVisibility::Private,
                share_history: false,
            },
            security: SecuritySettings {
                two_factor: false,
                session_timeout_minutes: 30,
            },
            language: "en".to_string(),
            theme: Theme::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_initial_panel_state() {
        let settings = UserSettings::default();
        assert!(settings.notifications.email);
        assert!(settings.notifications.push);
        assert!(settings.notifications.qr_expiry);
        assert_eq!(
            settings.privacy.profile_visibility,
            ProfileVisibility::Private
        );
        assert!(!settings.privacy.share_history);
        assert!(!settings.security.two_factor);
        assert_eq!(settings.security.session_timeout_minutes, 30);
        assert_eq!(settings.language, "en");
        assert_eq!(settings.theme, Theme::System);
    }
}
