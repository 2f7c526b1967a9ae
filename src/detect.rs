//! Lossless.dll discovery.
//!
//! The frame-generation layer needs the path to `Lossless.dll` from a local
//! Lossless Scaling install. Detection is best-effort: the `LSFG_DLL_PATH`
//! environment variable wins, then the default Steam library under
//! `$XDG_DATA_HOME` or `~/.local/share`. Nothing here ever fails hard; an
//! unlocatable DLL just reports `found: false`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

/// Relative path of the DLL inside a Steam library root.
const STEAM_DLL_SUFFIX: &str = "steamapps/common/Lossless Scaling/Lossless.dll";

/// Outcome of a detection attempt.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub found: bool,
    pub path: Option<PathBuf>,
    /// Where the path came from: "env", "steam", or "none".
    pub source: &'static str,
}

impl Detection {
    fn not_found() -> Self {
        Self {
            found: false,
            path: None,
            source: "none",
        }
    }
}

/// Locates the Lossless Scaling DLL.
///
/// A trait seam so the service can be exercised in tests without a Steam
/// install on disk.
pub trait DllDetector {
    fn detect(&self) -> Detection;
}

/// Filesystem-backed detector used in production.
#[derive(Debug, Default)]
pub struct FsDllDetector;

impl DllDetector for FsDllDetector {
    fn detect(&self) -> Detection {
        if let Ok(override_path) = std::env::var("LSFG_DLL_PATH") {
            let path = PathBuf::from(override_path);
            if path.is_file() {
                debug!(path = %path.display(), "DLL located via LSFG_DLL_PATH");
                return Detection {
                    found: true,
                    path: Some(path),
                    source: "env",
                };
            }
            debug!(path = %path.display(), "LSFG_DLL_PATH set but file missing");
        }

        for root in steam_data_roots() {
            let candidate = steam_dll_path(&root);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "DLL located in Steam library");
                return Detection {
                    found: true,
                    path: Some(candidate),
                    source: "steam",
                };
            }
        }

        debug!("Lossless.dll not found");
        Detection::not_found()
    }
}

/// DLL location inside a Steam data root.
pub fn steam_dll_path(data_root: &Path) -> PathBuf {
    data_root.join("Steam").join(STEAM_DLL_SUFFIX)
}

/// Candidate data roots in priority order.
fn steam_data_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(data) = dirs::data_dir() {
        roots.push(data);
    }
    if let Some(home) = dirs::home_dir() {
        let fallback = home.join(".local").join("share");
        if !roots.contains(&fallback) {
            roots.push(fallback);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steam_dll_path_layout() {
        let path = steam_dll_path(Path::new("/home/deck/.local/share"));
        assert_eq!(
            path,
            PathBuf::from(
                "/home/deck/.local/share/Steam/steamapps/common/Lossless Scaling/Lossless.dll"
            )
        );
    }

    #[test]
    fn test_detection_not_found_shape() {
        let d = Detection::not_found();
        assert!(!d.found);
        assert!(d.path.is_none());
        assert_eq!(d.source, "none");
    }

    #[test]
    fn test_detection_serializes() {
        let d = Detection {
            found: true,
            path: Some(PathBuf::from("/tmp/Lossless.dll")),
            source: "env",
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["source"], "env");
        assert_eq!(json["path"], "/tmp/Lossless.dll");
    }
}
