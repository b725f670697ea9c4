//! Profile persistence in a single TOML file.

use std::path::{Path, PathBuf};

use cmdkeys_core::{CoreError, Profile, ProfileStore};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TomlProfileStore {
    path: PathBuf,
}

impl TomlProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for TomlProfileStore {
    fn load(&self) -> cmdkeys_core::Result<Profile> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no profile yet, starting from default");
            return Ok(Profile::default());
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| CoreError::store(format!("read {}: {}", self.path.display(), e)))?;
        let profile = Profile::from_toml(&text)?;
        info!(
            path = %self.path.display(),
            macros = profile.macros.len(),
            "profile loaded"
        );
        Ok(profile)
    }

    /// Writes to a sibling temp file first so a failed write never truncates
    /// the existing profile
    fn save(&self, profile: &Profile) -> cmdkeys_core::Result<()> {
        let text = profile.to_toml()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::store(format!("create {}: {}", parent.display(), e)))?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, text)
            .map_err(|e| CoreError::store(format!("write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| CoreError::store(format!("rename {}: {}", tmp.display(), e)))?;
        info!(
            path = %self.path.display(),
            macros = profile.macros.len(),
            "profile saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdkeys_core::{Keybind, Macro, SendMode};

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlProfileStore::new(dir.path().join("profile.toml"));
        let profile = store.load().unwrap();
        assert_eq!(profile.macros.len(), 1);
        assert!(profile.macros[0].messages.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlProfileStore::new(dir.path().join("nested/profile.toml"));

        let mut m = Macro::with_messages(["/home", "/spawn"]);
        m.keybind = Keybind::key("F4");
        m.mode = SendMode::Cycle;
        let profile = Profile {
            macros: vec![m],
            ..Profile::default()
        };
        store.save(&profile).unwrap();

        assert_eq!(store.load().unwrap(), profile);
        assert!(!dir.path().join("nested/profile.toml.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "macros = \"nope\"").unwrap();
        let store = TomlProfileStore::new(path);
        assert!(matches!(store.load(), Err(CoreError::ProfileParse(_))));
    }
}
