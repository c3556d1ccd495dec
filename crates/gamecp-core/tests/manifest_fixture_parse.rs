use std::path::PathBuf;

use gamecp_core::manifest::Permission;
use gamecp_core::manifest_file::read_manifest_value;
use gamecp_core::{parse_manifest, validate_manifest};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn parse_full_fixture_manifest() {
    let path = fixture("gamecp.json");
    let value = read_manifest_value(&path)
        .unwrap_or_else(|e| panic!("read {} failed: {e}", path.display()));

    let result = validate_manifest(&value);
    assert!(result.valid, "errors: {:?}", result.errors);
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);

    let (manifest, _) = parse_manifest(&value).expect("fixture should parse into the typed model");
    assert_eq!(manifest.id, "server-monitor");
    assert_eq!(manifest.gamecp_version.as_deref(), Some(">=1.0.0"));
    assert!(manifest.permissions.contains(&Permission::ServerControl));
    assert_eq!(manifest.cron.len(), 2);
    assert_eq!(manifest.cron[1].timezone.as_deref(), Some("UTC"));
    assert_eq!(manifest.ui[0].order, Some(10));
    let mode = manifest
        .settings
        .iter()
        .find(|s| s.key == "mode")
        .expect("mode setting must exist in fixture");
    assert_eq!(mode.kind, "select");
    assert_eq!(mode.options.len(), 2);
    assert_eq!(manifest.dependencies.get("core-metrics").map(String::as_str), Some("^2.0.0"));
}

#[test]
fn typed_manifest_round_trips_through_json() {
    let value = read_manifest_value(&fixture("gamecp.json")).expect("read fixture");
    let (manifest, _) = parse_manifest(&value).expect("parse fixture");
    let reparsed = serde_json::to_value(&manifest).expect("serialize");
    assert!(validate_manifest(&reparsed).valid);
    assert_eq!(reparsed["gamecpVersion"], value["gamecpVersion"]);
}
