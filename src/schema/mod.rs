//! Typed configuration schema for lsfg-vk.
//!
//! The schema is a frozen, ordered list of field definitions built once and
//! shared by reference. Field order determines the layout of generated files,
//! and the location tag decides where a field's value lives:
//!
//! - `Toml`: per-profile key in a `[[game]]` block of the config file
//! - `Script`: environment export in the generated launch script
//! - `Global`: key in the `[global]` block, shared by all profiles
//!
//! Script-location fields are still serialized per-profile in the TOML file;
//! the launch script carries the effective values for the current profile.

pub mod validate;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Supported configuration field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
}

impl FieldType {
    /// Human-readable type name for error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

/// Where a field's value is stored and consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// Per-profile key in the TOML config file.
    Toml,
    /// Environment export in the generated launch script.
    Script,
    /// Shared `[global]` key, identical for all profiles.
    Global,
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// The type this value carries.
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Bool(_) => FieldType::Bool,
            Self::Int(_) => FieldType::Int,
            Self::Float(_) => FieldType::Float,
            Self::Str(_) => FieldType::String,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// A single field definition in the schema.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub default: FieldValue,
    pub description: &'static str,
    pub location: FieldLocation,
}

impl FieldDef {
    const fn new(
        name: &'static str,
        field_type: FieldType,
        default: FieldValue,
        description: &'static str,
        location: FieldLocation,
    ) -> Self {
        Self {
            name,
            field_type,
            default,
            description,
            location,
        }
    }
}

/// Mapping from field name to typed value, covering every non-global field.
pub type Config = BTreeMap<String, FieldValue>;

/// Mapping restricted to `Global`-location fields.
pub type GlobalConfig = BTreeMap<String, FieldValue>;

/// The ordered, immutable field schema.
#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// All fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// Look up a field definition by name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields serialized per-profile (everything except `Global`).
    pub fn profile_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.location != FieldLocation::Global)
    }

    /// Fields carried by launch-script environment exports.
    pub fn script_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.location == FieldLocation::Script)
    }

    /// Fields shared across all profiles.
    pub fn global_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.location == FieldLocation::Global)
    }
}

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| Schema {
    fields: vec![
        FieldDef::new(
            "multiplier",
            FieldType::Int,
            FieldValue::Int(1),
            "change the fps multiplier",
            FieldLocation::Toml,
        ),
        FieldDef::new(
            "flow_scale",
            FieldType::Float,
            FieldValue::Float(0.8),
            "change the flow scale",
            FieldLocation::Toml,
        ),
        FieldDef::new(
            "performance_mode",
            FieldType::Bool,
            FieldValue::Bool(true),
            "use a lighter model for FG (recommended for most games)",
            FieldLocation::Toml,
        ),
        FieldDef::new(
            "hdr_mode",
            FieldType::Bool,
            FieldValue::Bool(false),
            "enable HDR mode (only for games that support HDR)",
            FieldLocation::Toml,
        ),
        FieldDef::new(
            "experimental_present_mode",
            FieldType::String,
            FieldValue::Str(String::new()),
            "override Vulkan present mode (may cause crashes)",
            FieldLocation::Toml,
        ),
        FieldDef::new(
            "dxvk_frame_rate",
            FieldType::Int,
            FieldValue::Int(0),
            "base framerate cap for DirectX games before frame multiplier",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "enable_wow64",
            FieldType::Bool,
            FieldValue::Bool(false),
            "enable PROTON_USE_WOW64=1 for 32-bit games",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "disable_steamdeck_mode",
            FieldType::Bool,
            FieldValue::Bool(false),
            "disable Steam Deck mode (unlocks hidden settings in some games)",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "mangohud_workaround",
            FieldType::Bool,
            FieldValue::Bool(false),
            "force MangoHud on to work around present-mode conflicts",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "disable_vkbasalt",
            FieldType::Bool,
            FieldValue::Bool(false),
            "disable the vkBasalt post-processing layer",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "force_enable_vkbasalt",
            FieldType::Bool,
            FieldValue::Bool(false),
            "force-enable the vkBasalt post-processing layer",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "enable_wsi",
            FieldType::Bool,
            FieldValue::Bool(true),
            "enable the Gamescope WSI layer",
            FieldLocation::Script,
        ),
        FieldDef::new(
            "dll",
            FieldType::String,
            FieldValue::Str(String::new()),
            "specify where Lossless.dll is stored",
            FieldLocation::Global,
        ),
        FieldDef::new(
            "no_fp16",
            FieldType::Bool,
            FieldValue::Bool(false),
            "force-disable fp16 (use on older nvidia cards)",
            FieldLocation::Global,
        ),
    ],
});

/// Access the shared schema instance.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup() {
        let s = schema();
        let field = s.get("multiplier").unwrap();
        assert_eq!(field.field_type, FieldType::Int);
        assert_eq!(field.default, FieldValue::Int(1));
        assert_eq!(field.location, FieldLocation::Toml);

        assert!(s.get("nonexistent").is_none());
    }

    #[test]
    fn test_schema_order_is_stable() {
        let names: Vec<_> = schema().fields().map(|f| f.name).collect();
        assert_eq!(names[0], "multiplier");
        assert_eq!(names[1], "flow_scale");
        // Global fields come last
        assert_eq!(names[names.len() - 2], "dll");
        assert_eq!(names[names.len() - 1], "no_fp16");
    }

    #[test]
    fn test_location_partitions() {
        let s = schema();
        let globals: Vec<_> = s.global_fields().map(|f| f.name).collect();
        assert_eq!(globals, vec!["dll", "no_fp16"]);

        let script: Vec<_> = s.script_fields().map(|f| f.name).collect();
        assert!(script.contains(&"dxvk_frame_rate"));
        assert!(script.contains(&"enable_wsi"));
        assert!(!script.contains(&"multiplier"));

        // Every field has exactly one location
        let total = s.fields().count();
        let partitioned = s.profile_fields().count() + globals.len();
        assert_eq!(total, partitioned);
    }

    #[test]
    fn test_defaults_match_declared_types() {
        for field in schema().fields() {
            assert_eq!(
                field.default.field_type(),
                field.field_type,
                "default for '{}' has wrong type",
                field.name
            );
        }
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Int(3).as_int(), Some(3));
        assert_eq!(FieldValue::Float(0.8).as_float(), Some(0.8));
        assert_eq!(FieldValue::Str("fifo".into()).as_str(), Some("fifo"));
        assert_eq!(FieldValue::Bool(true).as_int(), None);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&FieldValue::Int(45)).unwrap();
        assert_eq!(json, "45");
        let json = serde_json::to_string(&FieldValue::Bool(false)).unwrap();
        assert_eq!(json, "false");
        let json = serde_json::to_string(&FieldValue::Str("fifo".into())).unwrap();
        assert_eq!(json, "\"fifo\"");
    }
}
