//! Integration tests for on-disk config and script file contents.

use std::fs;

use tempfile::TempDir;

use lsfgctl::profile::DEFAULT_PROFILE;
use lsfgctl::schema::FieldValue;
use lsfgctl::service::ConfigurationService;

fn service_in(dir: &TempDir) -> ConfigurationService {
    ConfigurationService::new(dir.path().join("conf.toml"), dir.path().join("lsfg"))
}

#[test]
fn config_file_has_expected_layout() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.update_field("multiplier", "2", None).unwrap();

    let text = fs::read_to_string(dir.path().join("conf.toml")).unwrap();
    assert!(text.starts_with("version = 1\n"));
    assert!(text.contains("[global]"));
    assert!(text.contains(&format!("current_profile = \"{DEFAULT_PROFILE}\"")));
    assert!(text.contains("[[game]]"));
    assert!(text.contains(&format!("exe = \"{DEFAULT_PROFILE}\"")));
    assert!(text.contains("multiplier = 2"));
    // Field comments are carried into the file
    assert!(text.contains("# change the fps multiplier"));
}

#[test]
fn script_file_has_expected_layout() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.update_field("dxvk_frame_rate", "60", None).unwrap();
    service
        .update_field("disable_steamdeck_mode", "true", None)
        .unwrap();

    let text = fs::read_to_string(dir.path().join("lsfg")).unwrap();
    assert!(text.starts_with("#!/bin/bash\n"));
    assert!(text.contains("export DXVK_FRAME_RATE=60\n"));
    assert!(text.contains("export SteamDeck=0\n"));
    assert!(text.contains(&format!("export LSFG_PROCESS={DEFAULT_PROFILE}\n")));
    assert!(text.ends_with("exec \"$@\"\n"));
}

#[test]
fn hand_written_config_is_read() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("conf.toml"),
        "\
[global]
no_fp16 = true

[[game]]
exe = \"feral\"
multiplier = 3
flow_scale = 1.2
",
    )
    .unwrap();

    let service = service_in(&dir);
    let ps = service.load();
    assert!(ps.contains("feral"));
    // The absent current profile is materialized at defaults on load
    assert!(ps.contains(ps.current()));
    assert_eq!(ps.global.get("no_fp16"), Some(&FieldValue::Bool(true)));

    let cfg = ps.merge_for_profile("feral");
    assert_eq!(cfg.get("multiplier"), Some(&FieldValue::Int(3)));
    assert_eq!(cfg.get("flow_scale"), Some(&FieldValue::Float(1.2)));
    // Unset fields come back at their defaults
    assert_eq!(cfg.get("performance_mode"), Some(&FieldValue::Bool(true)));
    // Global values show through the merge
    assert_eq!(cfg.get("no_fp16"), Some(&FieldValue::Bool(true)));
}

#[test]
fn messy_config_is_canonicalized_on_write() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("conf.toml"),
        "\
[[game]]
exe = \"feral\"
multiplier = 3
mystery_key = 9
broken line without equals
",
    )
    .unwrap();

    let service = service_in(&dir);
    service
        .update_field("multiplier", "4", Some("feral"))
        .unwrap();

    let text = fs::read_to_string(dir.path().join("conf.toml")).unwrap();
    assert!(text.starts_with("version = 1\n"));
    assert!(text.contains("multiplier = 4"));
    assert!(!text.contains("mystery_key"));
    assert!(!text.contains("broken line"));
}

#[test]
fn script_overlay_reflects_hand_edits() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.update_field("dxvk_frame_rate", "30", None).unwrap();

    // A user edit to the generated script wins over the stored value
    fs::write(
        dir.path().join("lsfg"),
        "#!/bin/bash\nexport DXVK_FRAME_RATE=120\nexport PROTON_USE_WOW64=1\nexec \"$@\"\n",
    )
    .unwrap();

    let status = service.get_config();
    assert_eq!(
        status.config.get("dxvk_frame_rate"),
        Some(&FieldValue::Int(120))
    );
    assert_eq!(status.config.get("enable_wow64"), Some(&FieldValue::Bool(true)));
}

#[test]
fn rewrite_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.create_profile("feral", None).unwrap();
    service.update_field("hdr_mode", "true", Some("feral")).unwrap();

    let first = fs::read_to_string(dir.path().join("conf.toml")).unwrap();

    // A no-op style mutation rewrites the same text
    service.update_field("hdr_mode", "true", Some("feral")).unwrap();
    let second = fs::read_to_string(dir.path().join("conf.toml")).unwrap();
    assert_eq!(first, second);
}
