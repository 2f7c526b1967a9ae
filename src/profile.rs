//! Profile set and mutation rules.
//!
//! A [`ProfileSet`] is the in-memory form of the whole config file: an
//! insertion-ordered collection of named per-game configs, the shared global
//! fields, and the name of the current profile. It is rebuilt from disk at
//! the start of every service operation and discarded after persisting.

use crate::error::{LsfgError, Result};
use crate::schema::{validate, Config, GlobalConfig};

/// Reserved profile name that must always survive delete/rename.
///
/// External consumers match the plugin-managed entry through
/// `LSFG_PROCESS=decky-lsfg-vk`, so the name is part of the wire contract.
pub const DEFAULT_PROFILE: &str = "decky-lsfg-vk";

/// Words that collide with TOML table names or the global keys.
const RESERVED_NAMES: &[&str] = &["global", "game", "current_profile"];

/// Characters rejected in profile names (shell- and TOML-unsafe).
const REJECTED_CHARS: &str = " \t\n\r'\"\\/$|&;()<>{}[]`*?";

/// A named per-game configuration.
#[derive(Debug, Clone)]
pub struct ProfileEntry {
    pub name: String,
    pub config: Config,
}

/// The full profile state held by the config file.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    current: String,
    entries: Vec<ProfileEntry>,
    pub global: GlobalConfig,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProfileSet {
    /// A fresh set holding only the default profile at schema defaults,
    /// with an empty global section.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            current: DEFAULT_PROFILE.to_string(),
            entries: vec![ProfileEntry {
                name: DEFAULT_PROFILE.to_string(),
                config: validate::defaults(),
            }],
            global: GlobalConfig::new(),
        }
    }

    /// An empty set used by the TOML parser while accumulating blocks.
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self {
            current: DEFAULT_PROFILE.to_string(),
            entries: Vec::new(),
            global: GlobalConfig::new(),
        }
    }

    /// Name of the current profile.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Force the current profile name without an existence check.
    ///
    /// Used by the parser, which may read a `current_profile` key before the
    /// corresponding `[[game]]` block. Mutations go through [`set_current`].
    ///
    /// [`set_current`]: Self::set_current
    pub(crate) fn set_current_unchecked(&mut self, name: &str) {
        self.current = name.to_string();
    }

    /// Profile names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Config> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.config)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a profile, preserving position on replace.
    pub fn insert(&mut self, name: &str, config: Config) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.config = config;
        } else {
            self.entries.push(ProfileEntry {
                name: name.to_string(),
                config,
            });
        }
    }

    /// The authoritative effective configuration for a profile: its stored
    /// config (or schema defaults if absent) with global fields overlaid.
    #[must_use]
    pub fn merge_for_profile(&self, name: &str) -> Config {
        let mut merged = self.get(name).cloned().unwrap_or_else(validate::defaults);
        for (key, value) in &self.global {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Create a new profile, copying `source` if given and present,
    /// otherwise starting from schema defaults.
    pub fn create(&mut self, name: &str, source: Option<&str>) -> Result<()> {
        check_name(name)?;
        if self.contains(name) {
            return Err(LsfgError::ProfileExists {
                name: name.to_string(),
            });
        }
        let config = source
            .and_then(|s| self.get(s).cloned())
            .unwrap_or_else(validate::defaults);
        self.entries.push(ProfileEntry {
            name: name.to_string(),
            config,
        });
        Ok(())
    }

    /// Delete a profile. The default profile is protected; deleting the
    /// current profile resets current to the default, creating it with
    /// schema defaults if it no longer exists.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if name == DEFAULT_PROFILE {
            return Err(LsfgError::DefaultProfileProtected {
                name: name.to_string(),
            });
        }
        let pos = self
            .entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| LsfgError::ProfileNotFound {
                name: name.to_string(),
            })?;
        self.entries.remove(pos);

        if self.current == name {
            if !self.contains(DEFAULT_PROFILE) {
                self.entries.push(ProfileEntry {
                    name: DEFAULT_PROFILE.to_string(),
                    config: validate::defaults(),
                });
            }
            self.current = DEFAULT_PROFILE.to_string();
        }
        Ok(())
    }

    /// Rename a profile in place, keeping the relative order of entries.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if old == DEFAULT_PROFILE {
            return Err(LsfgError::DefaultProfileProtected {
                name: old.to_string(),
            });
        }
        check_name(new)?;
        if self.contains(new) {
            return Err(LsfgError::ProfileExists {
                name: new.to_string(),
            });
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == old)
            .ok_or_else(|| LsfgError::ProfileNotFound {
                name: old.to_string(),
            })?;
        entry.name = new.to_string();

        if self.current == old {
            self.current = new.to_string();
        }
        Ok(())
    }

    /// Switch the current profile. Fails if the target does not exist.
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(LsfgError::ProfileNotFound {
                name: name.to_string(),
            });
        }
        self.current = name.to_string();
        Ok(())
    }
}

/// Whether a profile name is acceptable.
#[must_use]
pub fn validate_profile_name(name: &str) -> bool {
    check_name(name).is_ok()
}

fn check_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| LsfgError::InvalidProfileName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().any(|c| REJECTED_CHARS.contains(c)) {
        return Err(invalid("contains shell- or TOML-unsafe characters"));
    }
    if RESERVED_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(name))
    {
        return Err(invalid("reserved word"));
    }
    Ok(())
}
