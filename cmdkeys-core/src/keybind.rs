//! Keybind descriptions and conflict lookup for the binding row.

use crate::model::{Keybind, Profile};

/// Display text for one bound key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeybindInfo {
    /// The key name alone
    pub label: String,
    /// The label as shown on the button, marked when the key is contested
    pub conflict_label: String,
    /// Lists what else uses the key. Empty when nothing does.
    pub tooltip: String,
    pub conflicts: usize,
}

impl KeybindInfo {
    pub fn has_conflicts(&self) -> bool {
        self.conflicts > 0
    }
}

/// Source of key labels and conflict information
pub trait KeybindCatalog {
    fn describe(&self, profile: &Profile, macro_index: usize, key: &Keybind) -> KeybindInfo;
}

/// Catalog that reports clashes between macros of one profile, plus any keys
/// the host reserves for its own actions
#[derive(Debug, Clone, Default)]
pub struct ProfileKeybinds {
    /// `(key, action)` pairs owned by the host
    pub reserved: Vec<(String, String)>,
}

impl ProfileKeybinds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(mut self, key: impl Into<String>, action: impl Into<String>) -> Self {
        self.reserved.push((key.into(), action.into()));
        self
    }
}

impl KeybindCatalog for ProfileKeybinds {
    fn describe(&self, profile: &Profile, macro_index: usize, key: &Keybind) -> KeybindInfo {
        let Keybind::Key(name) = key else {
            return KeybindInfo {
                label: key.to_string(),
                conflict_label: key.to_string(),
                ..KeybindInfo::default()
            };
        };

        let mut users: Vec<String> = profile
            .macros
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != macro_index)
            .filter(|(_, m)| &m.keybind == key || &m.alt_keybind == key)
            .map(|(i, _)| format!("Macro {}", i + 1))
            .collect();
        users.extend(
            self.reserved
                .iter()
                .filter(|(k, _)| k == name)
                .map(|(_, action)| action.clone()),
        );

        let conflicts = users.len();
        KeybindInfo {
            label: name.clone(),
            conflict_label: if conflicts > 0 {
                format!("{} (!)", name)
            } else {
                name.clone()
            },
            tooltip: if conflicts > 0 {
                format!("Also used by: {}", users.join(", "))
            } else {
                String::new()
            },
            conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Macro;

    fn profile() -> Profile {
        let mut a = Macro::default();
        a.keybind = Keybind::key("F4");
        let mut b = Macro::default();
        b.alt_keybind = Keybind::key("F4");
        let mut c = Macro::default();
        c.keybind = Keybind::key("F5");
        Profile {
            macros: vec![a, b, c],
            ..Profile::default()
        }
    }

    #[test]
    fn test_conflict_with_other_macro() {
        let info = ProfileKeybinds::new().describe(&profile(), 0, &Keybind::key("F4"));
        assert_eq!(info.label, "F4");
        assert_eq!(info.conflict_label, "F4 (!)");
        assert_eq!(info.tooltip, "Also used by: Macro 2");
        assert!(info.has_conflicts());
    }

    #[test]
    fn test_reserved_keys_conflict() {
        let catalog = ProfileKeybinds::new().reserve("F5", "Quit");
        let info = catalog.describe(&profile(), 2, &Keybind::key("F5"));
        assert_eq!(info.conflicts, 1);
        assert!(info.tooltip.contains("Quit"));
    }

    #[test]
    fn test_unbound_has_no_conflicts() {
        let info = ProfileKeybinds::new().describe(&profile(), 0, &Keybind::Unbound);
        assert_eq!(info.label, "Not Bound");
        assert!(!info.has_conflicts());
        assert!(info.tooltip.is_empty());
    }
}
