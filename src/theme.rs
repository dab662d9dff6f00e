//! Dark Mode
//!
//! Persisted under the `theme` storage key as `"dark"` or `"light"`. With
//! nothing stored the system colour scheme decides.

use crate::session::SessionStorage;

pub const THEME_KEY: &str = "theme";

pub fn stored_preference(storage: &dyn SessionStorage) -> Option<bool> {
    match storage.get(THEME_KEY).as_deref() {
        Some("dark") => Some(true),
        Some("light") => Some(false),
        _ => None,
    }
}

pub fn save_preference(storage: &dyn SessionStorage, dark: bool) {
    storage.set(THEME_KEY, if dark { "dark" } else { "light" });
}

fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|mq| mq.matches())
}

pub fn initial_dark_mode(storage: &dyn SessionStorage) -> bool {
    stored_preference(storage).unwrap_or_else(system_prefers_dark)
}

/// Toggle the `dark` class on `<html>`
pub fn apply_theme(dark: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if root.class_list().toggle_with_force("dark", dark).is_err() {
        log::warn!("could not apply theme");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    #[test]
    fn test_preference_round_trip() {
        let storage = MemoryStorage::default();
        assert_eq!(stored_preference(&storage), None);

        save_preference(&storage, true);
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(stored_preference(&storage), Some(true));

        save_preference(&storage, false);
        assert_eq!(stored_preference(&storage), Some(false));
    }

    #[test]
    fn test_unknown_value_ignored() {
        let storage = MemoryStorage::default();
        storage.set(THEME_KEY, "sepia");
        assert_eq!(stored_preference(&storage), None);
    }
}
