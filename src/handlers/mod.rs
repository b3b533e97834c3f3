use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::{config::Config, database::Database, models::UserSettings, storage::StorageGateway};

pub mod auth;
pub mod health;
pub mod profile;
pub mod qr;
pub mod settings;

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub gateway: StorageGateway,
    pub settings: SettingsStore,
    pub config: Config,
}

/// Session-scoped settings, owned by the presentation layer. Nothing here is
/// persisted; a user who has never written settings reads the defaults, and
/// signing out discards their entry.
#[derive(Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<HashMap<Uuid, UserSettings>>>,
}

impl SettingsStore {
    pub fn get(&self, user_id: Uuid) -> UserSettings {
        self.inner
            .read()
            .expect("settings store lock poisoned")
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set(&self, user_id: Uuid, settings: UserSettings) {
        self.inner
            .write()
            .expect("settings store lock poisoned")
            .insert(user_id, settings);
    }

    pub fn clear(&self, user_id: Uuid) {
        self.inner
            .write()
            .expect("settings store lock poisoned")
            .remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;

    #[test]
    fn test_settings_store_defaults_and_session_lifecycle() {
        let store = SettingsStore::default();
        let user = Uuid::new_v4();

        assert_eq!(store.get(user), UserSettings::default());

        let mut updated = UserSettings::default();
        updated.theme = Theme::Dark;
        updated.language = "de".to_string();
        store.set(user, updated.clone());
        assert_eq!(store.get(user), updated);

        // Another user still sees defaults
        assert_eq!(store.get(Uuid::new_v4()), UserSettings::default());

        store.clear(user);
        assert_eq!(store.get(user), UserSettings::default());
    }
}
