//! Stateless configuration service.
//!
//! Every operation follows the same shape: take the per-path lock, read the
//! config file fresh from disk, mutate the in-memory [`ProfileSet`], then
//! write config and launch script back atomically. Nothing is cached between
//! calls, so concurrent callers within the process serialize on the lock and
//! always see each other's writes.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::codec::{script, toml};
use crate::detect::{Detection, DllDetector, FsDllDetector};
use crate::error::{LsfgError, Result};
use crate::profile::ProfileSet;
use crate::schema::{schema, validate, Config, FieldLocation, FieldValue};

/// Config file permissions.
const CONFIG_MODE: u32 = 0o644;
/// Launch script permissions (must be executable).
const SCRIPT_MODE: u32 = 0o755;

/// Process-wide locks keyed by config path.
///
/// Read-modify-write cycles on the same file must not interleave, or the
/// later writer silently drops the earlier writer's changes.
static PATH_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = PATH_LOCKS.lock().expect("path lock registry poisoned");
    locks.entry(path.to_path_buf()).or_default().clone()
}

/// Snapshot returned by [`ConfigurationService::get_config`].
#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    /// Effective configuration for the current profile, script overlay
    /// applied.
    pub config: Config,
    pub profiles: Vec<String>,
    pub current_profile: String,
}

/// Manages the config file and launch script for one install.
pub struct ConfigurationService {
    config_path: PathBuf,
    script_path: PathBuf,
    detector: Box<dyn DllDetector + Send + Sync>,
}

impl ConfigurationService {
    pub fn new(config_path: PathBuf, script_path: PathBuf) -> Self {
        Self {
            config_path,
            script_path,
            detector: Box::new(FsDllDetector),
        }
    }

    /// Service rooted at the user's standard locations.
    pub fn from_default_paths() -> Result<Self> {
        let (config_path, script_path) = default_paths()?;
        Ok(Self::new(config_path, script_path))
    }

    #[cfg(test)]
    pub fn with_detector(
        config_path: PathBuf,
        script_path: PathBuf,
        detector: Box<dyn DllDetector + Send + Sync>,
    ) -> Self {
        Self {
            config_path,
            script_path,
            detector,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Read the profile set from disk.
    ///
    /// A missing file yields the default set, seeded with a detected DLL
    /// path when one can be found. A present-but-mangled file is handled by
    /// the permissive parser and never fails. The returned set always
    /// contains its current profile: a hand-edited file whose blocks omit
    /// the current name gets a defaults entry under that name.
    pub fn load(&self) -> ProfileSet {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => {
                let mut ps = toml::parse(&text);
                self.reconcile_current(&mut ps);
                if !ps.contains(ps.current()) {
                    let name = ps.current().to_string();
                    ps.insert(&name, validate::defaults());
                }
                ps
            }
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    debug!(path = %self.config_path.display(), "no config file, using defaults");
                } else {
                    warn!(
                        path = %self.config_path.display(),
                        %err,
                        "config not readable, using defaults"
                    );
                }
                let mut ps = ProfileSet::with_defaults();
                let detection = self.detector.detect();
                if let Some(path) = detection.path {
                    ps.global.insert(
                        "dll".to_string(),
                        FieldValue::Str(path.to_string_lossy().into_owned()),
                    );
                }
                ps
            }
        }
    }

    /// Repair a dangling `current_profile` using the launch script's
    /// `LSFG_PROCESS` marker when it names a known profile.
    fn reconcile_current(&self, ps: &mut ProfileSet) {
        if ps.contains(ps.current()) {
            return;
        }
        if let Ok(text) = fs::read_to_string(&self.script_path) {
            if let Some(name) = script::parse_process_name(&text) {
                if ps.contains(&name) {
                    ps.set_current_unchecked(&name);
                }
            }
        }
    }

    /// Current state: effective config for the active profile with any
    /// launch-script values overlaid, plus the profile roster.
    pub fn get_config(&self) -> ConfigStatus {
        let ps = self.load();
        let mut config = ps.merge_for_profile(ps.current());

        // The script is the most specific layer for its fields
        if let Ok(text) = fs::read_to_string(&self.script_path) {
            for (field, value) in script::parse(&text) {
                config.insert(field, value);
            }
        }

        ConfigStatus {
            config,
            profiles: ps.names(),
            current_profile: ps.current().to_string(),
        }
    }

    /// Set one field by name from its string form.
    ///
    /// Global-location fields apply to every profile; the rest land in
    /// `profile` (default: the current profile).
    pub fn update_field(&self, field: &str, value: &str, profile: Option<&str>) -> Result<()> {
        let def = schema().get(field).ok_or_else(|| LsfgError::UnknownField {
            field: field.to_string(),
        })?;
        let parsed = validate::coerce_str(def, value).ok_or_else(|| LsfgError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: def.field_type.name().to_string(),
        })?;

        self.mutate(|ps| {
            if def.location == FieldLocation::Global {
                ps.global.insert(field.to_string(), parsed);
            } else {
                let name = profile.unwrap_or_else(|| ps.current()).to_string();
                let mut config = ps
                    .get(&name)
                    .cloned()
                    .ok_or(LsfgError::ProfileNotFound { name: name.clone() })?;
                config.insert(field.to_string(), parsed);
                ps.insert(&name, config);
            }
            Ok(())
        })
    }

    /// Replace one profile's configuration wholesale.
    ///
    /// Global-location fields in `cfg` move into the shared global section;
    /// the rest pass through permissive validation, so fields absent from
    /// `cfg` reset to their defaults.
    pub fn update_profile_config(&self, name: &str, cfg: &Config) -> Result<()> {
        self.mutate(|ps| {
            if !ps.contains(name) {
                return Err(LsfgError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            for field in schema().global_fields() {
                if let Some(value) = cfg.get(field.name) {
                    let coerced =
                        validate::coerce(field, value).unwrap_or_else(|| field.default.clone());
                    ps.global.insert(field.name.to_string(), coerced);
                }
            }
            ps.insert(name, validate::validate(cfg));
            Ok(())
        })
    }

    pub fn create_profile(&self, name: &str, source: Option<&str>) -> Result<()> {
        self.mutate(|ps| ps.create(name, source))
    }

    pub fn delete_profile(&self, name: &str) -> Result<()> {
        self.mutate(|ps| ps.delete(name))
    }

    pub fn rename_profile(&self, old: &str, new: &str) -> Result<()> {
        self.mutate(|ps| ps.rename(old, new))
    }

    pub fn set_current_profile(&self, name: &str) -> Result<()> {
        self.mutate(|ps| ps.set_current(name))
    }

    /// Record the global Lossless.dll path.
    pub fn set_dll_path(&self, path: &str) -> Result<()> {
        self.mutate(|ps| {
            ps.global
                .insert("dll".to_string(), FieldValue::Str(path.to_string()));
            Ok(())
        })
    }

    /// Run the DLL detector without touching any file.
    pub fn detect_dll(&self) -> Detection {
        self.detector.detect()
    }

    /// Locked load-mutate-persist cycle shared by every mutation.
    ///
    /// The launch script is rewritten only when the current profile's name
    /// or effective config actually changed (or the script is missing), so
    /// mutations of other profiles leave a hand-edited script alone.
    fn mutate(&self, op: impl FnOnce(&mut ProfileSet) -> Result<()>) -> Result<()> {
        let lock = lock_for(&self.config_path);
        let _guard = lock.lock().expect("config lock poisoned");

        let mut ps = self.load();
        let before = (ps.current().to_string(), ps.merge_for_profile(ps.current()));
        op(&mut ps)?;
        self.write_config(&ps)?;

        let after = (ps.current().to_string(), ps.merge_for_profile(ps.current()));
        if before != after || !self.script_path.exists() {
            self.write_script(&ps)?;
        }
        Ok(())
    }

    fn write_config(&self, ps: &ProfileSet) -> Result<()> {
        let text = toml::generate(ps);
        write_atomic(&self.config_path, &text, CONFIG_MODE).map_err(|err| {
            LsfgError::ConfigWrite {
                path: self.config_path.display().to_string(),
                reason: err.to_string(),
            }
        })?;
        debug!(path = %self.config_path.display(), "config written");
        Ok(())
    }

    fn write_script(&self, ps: &ProfileSet) -> Result<()> {
        let config = ps.merge_for_profile(ps.current());
        let text = script::generate(&config, ps.current());
        write_atomic(&self.script_path, &text, SCRIPT_MODE).map_err(|err| {
            LsfgError::ScriptWrite {
                path: self.script_path.display().to_string(),
                reason: err.to_string(),
            }
        })?;
        debug!(path = %self.script_path.display(), "launch script written");
        Ok(())
    }
}

/// Standard on-disk locations: `$XDG_CONFIG_HOME/lsfg-vk/conf.toml` and
/// `~/lsfg`.
pub fn default_paths() -> Result<(PathBuf, PathBuf)> {
    let config = dirs::config_dir()
        .ok_or(LsfgError::NoHomeDir)?
        .join("lsfg-vk")
        .join("conf.toml");
    let script = dirs::home_dir().ok_or(LsfgError::NoHomeDir)?.join("lsfg");
    Ok((config, script))
}

/// Write via a temp file in the target directory followed by a rename, so a
/// crash mid-write never leaves a truncated file behind.
fn write_atomic(path: &Path, contents: &str, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(mode))?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
