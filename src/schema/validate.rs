//! Permissive validation of raw configuration mappings.
//!
//! `validate` coerces an arbitrary input mapping into a fully-populated,
//! schema-conformant config. It never fails: unknown keys are dropped, and
//! any value that is absent or cannot be coerced to the declared type falls
//! back to the field's default.

use super::{schema, Config, FieldDef, FieldType, FieldValue, GlobalConfig};

/// Every non-global field at its default value.
pub fn defaults() -> Config {
    schema()
        .profile_fields()
        .map(|f| (f.name.to_string(), f.default.clone()))
        .collect()
}

/// Every global field at its default value.
pub fn global_defaults() -> GlobalConfig {
    schema()
        .global_fields()
        .map(|f| (f.name.to_string(), f.default.clone()))
        .collect()
}

/// Coerce a raw mapping into a fully-populated per-profile config.
pub fn validate(raw: &Config) -> Config {
    schema()
        .profile_fields()
        .map(|field| {
            let value = raw
                .get(field.name)
                .and_then(|v| coerce(field, v))
                .unwrap_or_else(|| field.default.clone());
            (field.name.to_string(), value)
        })
        .collect()
}

/// Coerce a single value to a field's declared type.
///
/// Returns `None` when no sensible conversion exists; callers substitute the
/// field default.
pub fn coerce(field: &FieldDef, value: &FieldValue) -> Option<FieldValue> {
    match field.field_type {
        FieldType::Bool => coerce_bool(value).map(FieldValue::Bool),
        FieldType::Int => coerce_int(value).map(FieldValue::Int),
        FieldType::Float => coerce_float(value).map(FieldValue::Float),
        FieldType::String => Some(FieldValue::Str(render(value))),
    }
}

/// Parse a string (CLI argument or file token) into a field's declared type.
pub fn coerce_str(field: &FieldDef, raw: &str) -> Option<FieldValue> {
    let raw = raw.trim();
    match field.field_type {
        FieldType::Bool => parse_bool(raw).map(FieldValue::Bool),
        FieldType::Int => raw.parse::<i64>().ok().map(FieldValue::Int),
        FieldType::Float => raw.parse::<f64>().ok().map(FieldValue::Float),
        FieldType::String => Some(FieldValue::Str(raw.to_string())),
    }
}

fn coerce_bool(value: &FieldValue) -> Option<bool> {
    match value {
        FieldValue::Bool(b) => Some(*b),
        FieldValue::Int(i) => Some(*i != 0),
        FieldValue::Float(f) => Some(*f != 0.0),
        FieldValue::Str(s) => parse_bool(s),
    }
}

#[allow(clippy::cast_possible_truncation)] // Truncation matches the permissive policy
fn coerce_int(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(f) => Some(*f as i64),
        FieldValue::Bool(b) => Some(i64::from(*b)),
        FieldValue::Str(s) => s.trim().parse().ok(),
    }
}

#[allow(clippy::cast_precision_loss)] // Config integers are far below 2^52
fn coerce_float(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Float(f) => Some(*f),
        FieldValue::Int(i) => Some(*i as f64),
        FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        FieldValue::Str(s) => s.trim().parse().ok(),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn render(value: &FieldValue) -> String {
    match value {
        FieldValue::Str(s) => s.clone(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_profile_fields() {
        let d = defaults();
        assert_eq!(d.len(), schema().profile_fields().count());
        assert_eq!(d.get("multiplier"), Some(&FieldValue::Int(1)));
        assert_eq!(d.get("flow_scale"), Some(&FieldValue::Float(0.8)));
        assert!(!d.contains_key("dll"));
    }

    #[test]
    fn test_global_defaults() {
        let g = global_defaults();
        assert_eq!(g.get("dll"), Some(&FieldValue::Str(String::new())));
        assert_eq!(g.get("no_fp16"), Some(&FieldValue::Bool(false)));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_validate_drops_unknown_keys() {
        let mut raw = Config::new();
        raw.insert("bogus".into(), FieldValue::Int(99));
        let cfg = validate(&raw);
        assert!(!cfg.contains_key("bogus"));
        assert_eq!(cfg.len(), schema().profile_fields().count());
    }

    #[test]
    fn test_validate_coerces_types() {
        let mut raw = Config::new();
        raw.insert("multiplier".into(), FieldValue::Str("3".into()));
        raw.insert("performance_mode".into(), FieldValue::Int(0));
        raw.insert("flow_scale".into(), FieldValue::Int(1));
        let cfg = validate(&raw);
        assert_eq!(cfg.get("multiplier"), Some(&FieldValue::Int(3)));
        assert_eq!(cfg.get("performance_mode"), Some(&FieldValue::Bool(false)));
        assert_eq!(cfg.get("flow_scale"), Some(&FieldValue::Float(1.0)));
    }

    #[test]
    fn test_validate_substitutes_default_on_bad_value() {
        let mut raw = Config::new();
        raw.insert("multiplier".into(), FieldValue::Str("lots".into()));
        let cfg = validate(&raw);
        assert_eq!(cfg.get("multiplier"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn test_coerce_str_booleans() {
        let field = schema().get("hdr_mode").unwrap();
        assert_eq!(coerce_str(field, "true"), Some(FieldValue::Bool(true)));
        assert_eq!(coerce_str(field, "ON"), Some(FieldValue::Bool(true)));
        assert_eq!(coerce_str(field, "0"), Some(FieldValue::Bool(false)));
        assert_eq!(coerce_str(field, "maybe"), None);
    }

    #[test]
    fn test_coerce_str_numbers() {
        let mult = schema().get("multiplier").unwrap();
        assert_eq!(coerce_str(mult, " 4 "), Some(FieldValue::Int(4)));
        assert_eq!(coerce_str(mult, "4.5"), None);

        let flow = schema().get("flow_scale").unwrap();
        assert_eq!(coerce_str(flow, "1.25"), Some(FieldValue::Float(1.25)));
    }
}
