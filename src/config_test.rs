use std::collections::HashMap;

use super::*;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

// =============================================================
// Defaults and parsing
// =============================================================

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.external_editor, "gedit *ASYPATH");
    assert!(settings.enable_immediate_preview);
}

#[test]
fn from_json_reads_camel_case_keys() {
    let settings = Settings::from_json(r#"{"externalEditor":"vim *ASYPATH","enableImmediatePreview":false}"#).unwrap();
    assert_eq!(settings.external_editor, "vim *ASYPATH");
    assert!(!settings.enable_immediate_preview);
}

#[test]
fn from_json_fills_missing_keys() {
    let settings = Settings::from_json(r#"{"enableImmediatePreview":false}"#).unwrap();
    assert_eq!(settings.external_editor, DEFAULT_EXTERNAL_EDITOR);
    assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
}

#[test]
fn from_json_rejects_bad_input() {
    assert!(matches!(Settings::from_json("not json"), Err(SettingsError::Parse(_))));
    assert!(Settings::from_json(r#"{"enableImmediatePreview":"sometimes"}"#).is_err());
}

#[test]
fn to_json_roundtrips() {
    let settings = Settings { external_editor: "code *ASYPATH".into(), enable_immediate_preview: false };
    let raw = settings.to_json().unwrap();
    assert!(raw.contains("\"externalEditor\""));
    assert_eq!(Settings::from_json(&raw).unwrap(), settings);
}

// =============================================================
// Overrides
// =============================================================

#[test]
fn overrides_replace_values() {
    let settings = Settings::default().with_overrides(lookup(&[(EDITOR_ENV, "emacs *ASYPATH"), (IMMEDIATE_PREVIEW_ENV, "off")]));
    assert_eq!(settings.external_editor, "emacs *ASYPATH");
    assert!(!settings.enable_immediate_preview);
}

#[test]
fn unparsable_bool_override_is_ignored() {
    let settings = Settings::default().with_overrides(lookup(&[(IMMEDIATE_PREVIEW_ENV, "maybe")]));
    assert!(settings.enable_immediate_preview);
}

#[test]
fn no_overrides_changes_nothing() {
    assert_eq!(Settings::default().with_overrides(lookup(&[])), Settings::default());
}

#[test]
fn parse_bool_variants() {
    for raw in ["true", "1", "YES", " on "] {
        assert_eq!(parse_bool(raw), Some(true), "{raw}");
    }
    for raw in ["false", "0", "No", "OFF"] {
        assert_eq!(parse_bool(raw), Some(false), "{raw}");
    }
    assert_eq!(parse_bool(""), None);
}

// =============================================================
// Editor command
// =============================================================

#[test]
fn editor_command_substitutes_path() {
    let settings = Settings::default();
    assert_eq!(settings.editor_command("/tmp/a b.asy"), ["gedit", "\"/tmp/a b.asy\""]);
}

#[test]
fn editor_command_drops_unknown_placeholders() {
    let settings = Settings { external_editor: "ed -s *LINE *ASYPATH".into(), ..Settings::default() };
    assert_eq!(settings.editor_command("x.asy"), ["ed", "-s", "\"x.asy\""]);
}

#[test]
fn editor_command_without_placeholder() {
    let settings = Settings { external_editor: "nano".into(), ..Settings::default() };
    assert_eq!(settings.editor_command("x.asy"), ["nano"]);
}
