//! Restricted TOML-subset codec for the lsfg-vk config file.
//!
//! This is deliberately not a general TOML parser. The file shape is fixed
//! and narrow - a `version` line, one `[global]` block, and one `[[game]]`
//! block per profile - and is produced by [`generate`] in this same module,
//! so a hand-rolled line scanner is sufficient and keeps the grammar
//! documented in one place.
//!
//! Parsing is permissive end to end: unknown keys, malformed lines, and
//! type-conversion failures are skipped silently and the affected field
//! keeps its default. Only writes can fail.

use crate::profile::{ProfileSet, DEFAULT_PROFILE};
use crate::schema::{schema, validate, Config, FieldLocation, FieldValue};

/// Serialize a profile set to config-file text.
///
/// Layout: `version = 1`, the `[global]` block, then one `[[game]]` block
/// per profile in insertion order. Booleans and numbers are always emitted,
/// including at their defaults; strings are emitted only when non-empty
/// (which keeps an unset `dll` line out of `[global]`).
pub fn generate(ps: &ProfileSet) -> String {
    let mut lines: Vec<String> = vec!["version = 1".to_string(), String::new()];

    lines.push("[global]".to_string());
    lines.push(format!("current_profile = \"{}\"", ps.current()));
    for field in schema().global_fields() {
        let value = ps
            .global
            .get(field.name)
            .and_then(|v| validate::coerce(field, v))
            .unwrap_or_else(|| field.default.clone());
        if let Some(rendered) = render_value(&value) {
            lines.push(format!("# {}", field.description));
            lines.push(format!("{} = {rendered}", field.name));
        }
    }
    lines.push(String::new());

    for entry in ps.entries() {
        lines.push("[[game]]".to_string());
        lines.push(format!("exe = \"{}\"", entry.name));
        for field in schema().profile_fields() {
            let value = entry
                .config
                .get(field.name)
                .and_then(|v| validate::coerce(field, v))
                .unwrap_or_else(|| field.default.clone());
            if let Some(rendered) = render_value(&value) {
                lines.push(format!("# {}", field.description));
                lines.push(format!("{} = {rendered}", field.name));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render a value as a TOML-subset token, or `None` if the line is omitted.
fn render_value(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Bool(b) => Some(b.to_string()),
        FieldValue::Int(i) => Some(i.to_string()),
        FieldValue::Float(f) => Some(render_float(*f)),
        FieldValue::Str(s) if s.is_empty() => None,
        FieldValue::Str(s) => Some(format!("\"{s}\"")),
    }
}

/// Format a float so it re-parses as a float (TOML requires the dot).
fn render_float(f: f64) -> String {
    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

/// Scanner state: which block the current line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Global,
    Game,
}

/// Parse config-file text into a profile set.
///
/// A `[global]` header switches to the GLOBAL state; a `[[game]]` header
/// flushes any pending game block and switches to GAME; any other bracket
/// header or EOF flushes and resets. Inside GLOBAL only `current_profile`,
/// `dll` and `no_fp16` are recognized; inside GAME, `exe` names the pending
/// profile and any other recognized non-global schema key is buffered.
///
/// A file with no parseable `[[game]]` block yields the default profile at
/// schema defaults. The parsed current-profile name is kept even when its
/// block is missing; callers that mutate the set re-establish the invariant
/// through the [`ProfileSet`] operations.
pub fn parse(text: &str) -> ProfileSet {
    let mut ps = ProfileSet::empty();
    let mut state = State::None;
    let mut pending_exe: Option<String> = None;
    let mut pending_raw = Config::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            flush(&mut ps, &mut pending_exe, &mut pending_raw);
            state = match line {
                "[global]" => State::Global,
                "[[game]]" => State::Game,
                _ => State::None,
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = strip_quotes(value.trim());

        match state {
            State::Global => parse_global_key(&mut ps, key, value),
            State::Game => {
                if key == "exe" {
                    pending_exe = Some(value.to_string());
                } else if let Some(field) = schema().get(key) {
                    if field.location != FieldLocation::Global {
                        if let Some(v) = validate::coerce_str(field, value) {
                            pending_raw.insert(field.name.to_string(), v);
                        }
                    }
                }
            }
            State::None => {}
        }
    }
    flush(&mut ps, &mut pending_exe, &mut pending_raw);

    if ps.is_empty() {
        ps.insert(DEFAULT_PROFILE, validate::defaults());
        ps.set_current_unchecked(DEFAULT_PROFILE);
    } else if !ps.contains(ps.current()) && ps.contains(DEFAULT_PROFILE) {
        ps.set_current_unchecked(DEFAULT_PROFILE);
    }
    ps
}

fn parse_global_key(ps: &mut ProfileSet, key: &str, value: &str) {
    if key == "current_profile" {
        if !value.is_empty() {
            ps.set_current_unchecked(value);
        }
        return;
    }
    // Only the two global schema keys are recognized here
    if let Some(field) = schema().get(key) {
        if field.location == FieldLocation::Global {
            if let Some(v) = validate::coerce_str(field, value) {
                ps.global.insert(field.name.to_string(), v);
            }
        }
    }
}

/// Validate and store a completed game block.
fn flush(ps: &mut ProfileSet, pending_exe: &mut Option<String>, pending_raw: &mut Config) {
    if let Some(exe) = pending_exe.take() {
        ps.insert(&exe, validate::validate(pending_raw));
    }
    pending_raw.clear();
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
