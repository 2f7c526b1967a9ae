//! Launch-script codec.
//!
//! The generated script is a thin POSIX wrapper: a shebang, one `export`
//! line per script-location field that differs from its default, the
//! `LSFG_PROCESS` marker naming the active profile, and a final
//! `exec "$@"` so the script transparently wraps whatever command the game
//! launcher prefixes it onto.
//!
//! Script-derived values are the most specific configuration layer: when a
//! script exists, the fields parsed out of it win over the TOML-sourced
//! values for the same fields.

use std::collections::BTreeMap;

use crate::schema::{schema, Config, FieldType, FieldValue};

/// Shebang emitted at the top of every generated script.
const SHEBANG: &str = "#!/bin/bash";

/// Fixed field-to-environment-variable table.
///
/// Two entries have inverted polarity and must stay that way:
/// `disable_steamdeck_mode=true` exports `SteamDeck=0`, and
/// `enable_wsi=false` exports `ENABLE_GAMESCOPE_WSI=0`. Every other boolean
/// exports `VAR=1` when true.
const ENV_TABLE: &[(&str, &str)] = &[
    ("dxvk_frame_rate", "DXVK_FRAME_RATE"),
    ("enable_wow64", "PROTON_USE_WOW64"),
    ("disable_steamdeck_mode", "SteamDeck"),
    ("mangohud_workaround", "MANGOHUD"),
    ("disable_vkbasalt", "DISABLE_VKBASALT"),
    ("force_enable_vkbasalt", "ENABLE_VKBASALT"),
    ("enable_wsi", "ENABLE_GAMESCOPE_WSI"),
];

/// Environment variable for a schema field, if it has one.
pub fn env_var(field: &str) -> Option<&'static str> {
    ENV_TABLE.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
}

/// Schema field for an environment variable, if one maps to it.
pub fn field_for(var: &str) -> Option<&'static str> {
    ENV_TABLE.iter().find(|(_, v)| *v == var).map(|(f, _)| *f)
}

/// Generate launch-script text for a profile's effective config.
pub fn generate(config: &Config, profile_name: &str) -> String {
    let mut lines = vec![
        SHEBANG.to_string(),
        "# Generated by lsfgctl - prefix this script onto a game launch command".to_string(),
    ];

    for field in schema().script_fields() {
        let value = config.get(field.name).unwrap_or(&field.default);
        if let Some(line) = export_line(field.name, value, &field.default) {
            lines.push(line);
        }
    }

    lines.push(format!("export LSFG_PROCESS={profile_name}"));
    lines.push("exec \"$@\"".to_string());
    lines.join("\n") + "\n"
}

/// Render one export line, or `None` when the value matches its default.
fn export_line(field: &str, value: &FieldValue, default: &FieldValue) -> Option<String> {
    match field {
        // Inverted: SteamDeck=0 disables Steam Deck mode
        "disable_steamdeck_mode" => match value.as_bool() {
            Some(true) => Some("export SteamDeck=0".to_string()),
            _ => None,
        },
        // Inverted: ENABLE_GAMESCOPE_WSI=0 turns the WSI layer off
        "enable_wsi" => match value.as_bool() {
            Some(false) => Some("export ENABLE_GAMESCOPE_WSI=0".to_string()),
            _ => None,
        },
        _ => {
            let var = env_var(field)?;
            match value {
                FieldValue::Bool(true) => Some(format!("export {var}=1")),
                FieldValue::Bool(false) => None,
                FieldValue::Int(_) | FieldValue::Float(_) if value == default => None,
                FieldValue::Int(i) => Some(format!("export {var}={i}")),
                FieldValue::Float(f) => Some(format!("export {var}={f}")),
                FieldValue::Str(s) if s.is_empty() => None,
                FieldValue::Str(s) => Some(format!("export {var}={s}")),
            }
        }
    }
}

/// Parse a launch script into a sparse map of explicitly present fields.
///
/// Only lines starting with `export ` are considered; comments (including
/// commented-out exports) and the `LSFG_PROCESS`/`exec` plumbing are
/// skipped. Values that fail their field's type conversion are dropped.
pub fn parse(text: &str) -> BTreeMap<String, FieldValue> {
    let mut values = BTreeMap::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        let Some(export) = line.strip_prefix("export ") else {
            continue;
        };
        let Some((var, value)) = export.split_once('=') else {
            continue;
        };
        let var = var.trim();
        let value = value.trim();

        let Some(field_name) = field_for(var) else {
            continue;
        };
        if let Some(parsed) = parse_env_value(field_name, value) {
            values.insert(field_name.to_string(), parsed);
        }
    }

    values
}

/// Extract the profile name from an `LSFG_PROCESS` export, if present.
pub fn parse_process_name(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        line.trim()
            .strip_prefix("export LSFG_PROCESS=")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

fn parse_env_value(field_name: &str, value: &str) -> Option<FieldValue> {
    match field_name {
        "disable_steamdeck_mode" => Some(FieldValue::Bool(value == "0")),
        "enable_wsi" => Some(FieldValue::Bool(value != "0")),
        _ => {
            let field = schema().get(field_name)?;
            match field.field_type {
                FieldType::Bool => Some(FieldValue::Bool(value == "1")),
                FieldType::Int => value.parse().ok().map(FieldValue::Int),
                FieldType::Float => value.parse().ok().map(FieldValue::Float),
                FieldType::String => Some(FieldValue::Str(value.to_string())),
            }
        }
    }
}
