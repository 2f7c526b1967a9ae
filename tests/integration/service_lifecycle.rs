//! Integration tests for full load/mutate/persist service cycles.

use std::fs;

use tempfile::TempDir;

use lsfgctl::error::LsfgError;
use lsfgctl::profile::DEFAULT_PROFILE;
use lsfgctl::schema::FieldValue;
use lsfgctl::service::ConfigurationService;

fn service_in(dir: &TempDir) -> ConfigurationService {
    ConfigurationService::new(dir.path().join("conf.toml"), dir.path().join("lsfg"))
}

#[test]
fn fresh_service_reports_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    let status = service.get_config();
    assert_eq!(status.current_profile, DEFAULT_PROFILE);
    assert_eq!(status.profiles, vec![DEFAULT_PROFILE.to_string()]);
    assert_eq!(status.config.get("multiplier"), Some(&FieldValue::Int(1)));
    assert_eq!(status.config.get("flow_scale"), Some(&FieldValue::Float(0.8)));

    // Reading never creates files
    assert!(!dir.path().join("conf.toml").exists());
    assert!(!dir.path().join("lsfg").exists());
}

#[test]
fn profile_lifecycle_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let service = service_in(&dir);
        service.create_profile("feral", None).unwrap();
        service.update_field("multiplier", "3", Some("feral")).unwrap();
        service.set_current_profile("feral").unwrap();
    }

    // A fresh service instance sees everything from disk
    let service = service_in(&dir);
    let status = service.get_config();
    assert_eq!(status.current_profile, "feral");
    assert_eq!(status.config.get("multiplier"), Some(&FieldValue::Int(3)));
    assert_eq!(
        status.profiles,
        vec![DEFAULT_PROFILE.to_string(), "feral".to_string()]
    );
}

#[test]
fn create_from_copies_settings() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.update_field("multiplier", "4", None).unwrap();
    service
        .create_profile("copy", Some(DEFAULT_PROFILE))
        .unwrap();

    let ps = service.load();
    assert_eq!(
        ps.get("copy").unwrap().get("multiplier"),
        Some(&FieldValue::Int(4))
    );
}

#[test]
fn duplicate_create_fails() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.create_profile("feral", None).unwrap();
    let err = service.create_profile("feral", None).unwrap_err();
    assert!(matches!(err, LsfgError::ProfileExists { .. }));
}

#[test]
fn default_profile_cannot_be_deleted_or_renamed() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    let err = service.delete_profile(DEFAULT_PROFILE).unwrap_err();
    assert!(matches!(err, LsfgError::DefaultProfileProtected { .. }));

    let err = service.rename_profile(DEFAULT_PROFILE, "other").unwrap_err();
    assert!(matches!(err, LsfgError::DefaultProfileProtected { .. }));
}

#[test]
fn rename_preserves_settings_and_current() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.create_profile("old-name", None).unwrap();
    service.update_field("hdr_mode", "true", Some("old-name")).unwrap();
    service.set_current_profile("old-name").unwrap();

    service.rename_profile("old-name", "new-name").unwrap();

    let status = service.get_config();
    assert_eq!(status.current_profile, "new-name");
    assert_eq!(status.config.get("hdr_mode"), Some(&FieldValue::Bool(true)));
    assert!(!status.profiles.contains(&"old-name".to_string()));
}

#[test]
fn invalid_profile_names_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    for bad in ["", "has space", "semi;colon", "slash/name", "global", "CURRENT_PROFILE"] {
        let err = service.create_profile(bad, None).unwrap_err();
        assert!(
            matches!(err, LsfgError::InvalidProfileName { .. }),
            "expected rejection for {bad:?}"
        );
    }
}

#[test]
fn corrupt_config_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("conf.toml"), "\0\0not toml\0").unwrap();

    let service = service_in(&dir);
    let status = service.get_config();
    assert_eq!(status.current_profile, DEFAULT_PROFILE);
    assert_eq!(status.config.get("multiplier"), Some(&FieldValue::Int(1)));

    // The next write replaces the corrupt file with a canonical one
    service.update_field("multiplier", "2", None).unwrap();
    let text = fs::read_to_string(dir.path().join("conf.toml")).unwrap();
    assert!(text.starts_with("version = 1\n"));
}

#[test]
fn deleting_current_switches_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.create_profile("feral", None).unwrap();
    service.set_current_profile("feral").unwrap();
    service.delete_profile("feral").unwrap();

    let status = service.get_config();
    assert_eq!(status.current_profile, DEFAULT_PROFILE);

    let text = fs::read_to_string(dir.path().join("lsfg")).unwrap();
    assert!(text.contains(&format!("export LSFG_PROCESS={DEFAULT_PROFILE}")));
}

#[test]
fn global_field_applies_to_all_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);
    service.create_profile("feral", None).unwrap();
    service.update_field("no_fp16", "true", None).unwrap();

    let ps = service.load();
    for name in [DEFAULT_PROFILE, "feral"] {
        assert_eq!(
            ps.merge_for_profile(name).get("no_fp16"),
            Some(&FieldValue::Bool(true)),
            "no_fp16 missing for {name}"
        );
    }
}

#[test]
fn concurrent_updates_are_not_lost() {
    use std::sync::Arc;
    use std::thread;

    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(service_in(&dir));
    service.create_profile("feral", None).unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = Arc::clone(&service);
        let name = format!("worker-{i}");
        handles.push(thread::spawn(move || {
            service.create_profile(&name, None).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // Every writer's profile survives the interleaved cycles
    let ps = service.load();
    for i in 0..8 {
        assert!(ps.contains(&format!("worker-{i}")), "worker-{i} was lost");
    }
    assert!(ps.contains("feral"));
}
