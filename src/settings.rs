//! Settings document merge
//!
//! Non-destructively merges the bundled settings template into the user's
//! existing `settings.json`. Three independent rules, one per recognized
//! section: permission allow-lists are unioned, hook descriptors are appended
//! unless a structurally equal descriptor is already registered for the same
//! event, and MCP servers are only added when the name is not already taken.
//! Everything else in the user's document passes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// The settings document. Only the three sections below participate in the
/// merge; any other top-level key in the user's file is carried through the
/// flattened passthrough map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,

    /// Event name -> ordered hook descriptors registered for that event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<BTreeMap<String, Vec<HookEntry>>>,

    /// Server name -> opaque configuration object.
    #[serde(
        default,
        rename = "mcpServers",
        skip_serializing_if = "Option::is_none"
    )]
    pub mcp_servers: Option<Map<String, Value>>,

    /// Unrecognized top-level keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `permissions` section. Only `allow` is merged; sibling keys such as
/// `deny` or `ask` ride along in the passthrough map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One hook descriptor as it appears in a settings `hooks` event list.
///
/// Derived `PartialEq` gives structural equality over the typed record:
/// unknown fields live in order-insensitive maps, so two descriptors whose
/// JSON keys merely appear in a different order still compare equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<HookCommand>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single command inside a hook descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a merge changed, for logging.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Hook descriptors appended across all events.
    pub added_hooks: usize,
    /// MCP server names added from the template.
    pub added_servers: Vec<String>,
}

/// Set union of two permission lists: destination entries keep their relative
/// order, new source entries append, exact-equality duplicates collapse.
pub fn union_allow(dest: &[String], source: &[String]) -> Vec<String> {
    let mut merged = Vec::with_capacity(dest.len() + source.len());
    let mut seen = HashSet::new();
    for value in dest.iter().chain(source.iter()) {
        if seen.insert(value.as_str()) {
            merged.push(value.clone());
        }
    }
    merged
}

/// Extend each destination event list with source descriptors that are not
/// already present (structural equality). Events only in the destination are
/// untouched; events only in the source are created with the source's list.
pub fn merge_hooks(
    dest: &mut BTreeMap<String, Vec<HookEntry>>,
    source: &BTreeMap<String, Vec<HookEntry>>,
) -> usize {
    let mut added = 0;
    for (event, entries) in source {
        let existing = dest.entry(event.clone()).or_default();
        for entry in entries {
            if !existing.contains(entry) {
                existing.push(entry.clone());
                added += 1;
            }
        }
    }
    added
}

/// Add source servers whose names are free. Existing destination entries are
/// never overridden, regardless of what the template says.
pub fn merge_servers(dest: &mut Map<String, Value>, source: &Map<String, Value>) -> Vec<String> {
    let mut added = Vec::new();
    for (name, config) in source {
        if !dest.contains_key(name) {
            dest.insert(name.clone(), config.clone());
            added.push(name.clone());
        }
    }
    added
}

/// Apply all three merge rules to a destination document in place.
pub fn merge_settings(dest: &mut Settings, source: &Settings) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    if let Some(src) = &source.permissions {
        if !src.allow.is_empty() {
            let perms = dest.permissions.get_or_insert_with(Permissions::default);
            perms.allow = union_allow(&perms.allow, &src.allow);
        }
    }

    if let Some(src) = &source.hooks {
        let hooks = dest.hooks.get_or_insert_with(BTreeMap::new);
        outcome.added_hooks = merge_hooks(hooks, src);
    }

    if let Some(src) = &source.mcp_servers {
        let servers = dest.mcp_servers.get_or_insert_with(Map::new);
        outcome.added_servers = merge_servers(servers, src);
    }

    outcome
}

/// Merge the template at `source_path` into the document at `dest_path`.
///
/// A missing destination starts from an empty document; a destination or
/// source that exists but fails to parse is a hard failure and nothing is
/// written. On success the merged document fully replaces the destination,
/// pretty-printed with 2-space indentation.
pub fn merge_settings_file(dest_path: &Path, source_path: &Path) -> Result<MergeOutcome, String> {
    let mut dest: Settings = if dest_path.exists() {
        let raw = fs::read_to_string(dest_path)
            .map_err(|e| format!("Could not read {}: {}", dest_path.display(), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| format!("Could not parse {}: {}", dest_path.display(), e))?
    } else {
        Settings::default()
    };

    let raw = fs::read_to_string(source_path)
        .map_err(|e| format!("Could not read {}: {}", source_path.display(), e))?;
    let source: Settings = serde_json::from_str(&raw)
        .map_err(|e| format!("Could not parse {}: {}", source_path.display(), e))?;

    let outcome = merge_settings(&mut dest, &source);

    let rendered = serde_json::to_string_pretty(&dest)
        .map_err(|e| format!("Could not serialize settings: {}", e))?;
    fs::write(dest_path, rendered)
        .map_err(|e| format!("Could not write {}: {}", dest_path.display(), e))?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn parse(value: Value) -> Settings {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_permission_union() {
        let mut dest = parse(json!({"permissions": {"allow": ["Read(*)"]}}));
        let source = parse(json!({"permissions": {"allow": ["Read(*)", "Write(*)"]}}));
        merge_settings(&mut dest, &source);

        let allow = dest.permissions.unwrap().allow;
        assert_eq!(allow, vec!["Read(*)", "Write(*)"]);
    }

    #[test]
    fn test_permission_union_preserves_destination_only_entries() {
        let mut dest = parse(json!({"permissions": {"allow": ["Bash(git:*)"]}}));
        let source = parse(json!({"permissions": {"allow": ["Read(*)"]}}));
        merge_settings(&mut dest, &source);

        let allow = dest.permissions.unwrap().allow;
        assert_eq!(allow, vec!["Bash(git:*)", "Read(*)"]);
    }

    #[test]
    fn test_permission_sibling_keys_survive() {
        let mut dest = parse(json!({"permissions": {"allow": ["Read(*)"], "deny": ["Bash(rm:*)"]}}));
        let source = parse(json!({"permissions": {"allow": ["Write(*)"]}}));
        merge_settings(&mut dest, &source);

        let perms = dest.permissions.unwrap();
        assert_eq!(perms.extra.get("deny"), Some(&json!(["Bash(rm:*)"])));
    }

    #[test]
    fn test_hook_non_duplication() {
        let descriptor = json!({
            "matcher": "Bash",
            "hooks": [{"type": "command", "command": "echo hi"}]
        });
        let mut dest = parse(json!({"hooks": {"PreToolUse": [descriptor.clone()]}}));
        let source = parse(json!({"hooks": {"PreToolUse": [descriptor]}}));
        let outcome = merge_settings(&mut dest, &source);

        assert_eq!(outcome.added_hooks, 0);
        assert_eq!(dest.hooks.unwrap()["PreToolUse"].len(), 1);
    }

    #[test]
    fn test_hook_equality_ignores_field_order() {
        let a: HookEntry = serde_json::from_str(
            r#"{"matcher": "Bash", "timeout": 5, "hooks": [{"type": "command", "command": "x"}]}"#,
        )
        .unwrap();
        let b: HookEntry = serde_json::from_str(
            r#"{"hooks": [{"command": "x", "type": "command"}], "matcher": "Bash", "timeout": 5}"#,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hook_new_event_created() {
        let mut dest = Settings::default();
        let source = parse(json!({
            "hooks": {"SessionStart": [{"hooks": [{"type": "command", "command": "reset"}]}]}
        }));
        let outcome = merge_settings(&mut dest, &source);

        assert_eq!(outcome.added_hooks, 1);
        assert_eq!(dest.hooks.unwrap()["SessionStart"].len(), 1);
    }

    #[test]
    fn test_hook_destination_only_event_untouched() {
        let mut dest = parse(json!({
            "hooks": {"Stop": [{"hooks": [{"type": "command", "command": "mine"}]}]}
        }));
        let source = parse(json!({
            "hooks": {"PreToolUse": [{"hooks": [{"type": "command", "command": "theirs"}]}]}
        }));
        merge_settings(&mut dest, &source);

        let hooks = dest.hooks.unwrap();
        assert_eq!(hooks["Stop"].len(), 1);
        assert_eq!(hooks["PreToolUse"].len(), 1);
    }

    #[test]
    fn test_server_non_override() {
        let mut dest = parse(json!({"mcpServers": {"foo": {"a": 1}}}));
        let source = parse(json!({"mcpServers": {"foo": {"a": 2}}}));
        let outcome = merge_settings(&mut dest, &source);

        assert!(outcome.added_servers.is_empty());
        assert_eq!(dest.mcp_servers.unwrap()["foo"], json!({"a": 1}));
    }

    #[test]
    fn test_server_added_when_absent() {
        let mut dest = Settings::default();
        let source = parse(json!({"mcpServers": {"x": {"cmd": "y"}}}));
        let outcome = merge_settings(&mut dest, &source);

        assert_eq!(outcome.added_servers, vec!["x"]);
        assert_eq!(dest.mcp_servers.unwrap()["x"], json!({"cmd": "y"}));
    }

    #[test]
    fn test_unknown_top_level_keys_preserved_not_imported() {
        let mut dest = parse(json!({"model": "opus", "permissions": {"allow": ["Read(*)"]}}));
        let source = parse(json!({"statusLine": {"type": "command"}}));
        merge_settings(&mut dest, &source);

        let rendered = serde_json::to_value(&dest).unwrap();
        assert_eq!(rendered["model"], json!("opus"));
        assert!(rendered.get("statusLine").is_none());
    }

    #[test]
    fn test_merge_file_creates_missing_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("settings.json");
        let template = dir.path().join("settings.template.json");
        fs::write(&template, r#"{"mcpServers": {"x": {"cmd": "y"}}}"#).unwrap();

        let outcome = merge_settings_file(&dest, &template).unwrap();
        assert_eq!(outcome.added_servers, vec!["x"]);

        let written: Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(written["mcpServers"]["x"], json!({"cmd": "y"}));
    }

    #[test]
    fn test_merge_file_is_byte_idempotent() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("settings.json");
        let template = dir.path().join("settings.template.json");
        fs::write(
            &dest,
            r#"{"permissions": {"allow": ["Read(*)"]}, "model": "opus"}"#,
        )
        .unwrap();
        fs::write(
            &template,
            r#"{
                "permissions": {"allow": ["Read(*)", "Write(*)"]},
                "hooks": {"PreToolUse": [{"matcher": "Bash", "hooks": [{"type": "command", "command": "lint"}]}]},
                "mcpServers": {"x": {"cmd": "y"}}
            }"#,
        )
        .unwrap();

        merge_settings_file(&dest, &template).unwrap();
        let first = fs::read_to_string(&dest).unwrap();
        merge_settings_file(&dest, &template).unwrap();
        let second = fs::read_to_string(&dest).unwrap();

        assert_eq!(first, second);

        let merged: Value = serde_json::from_str(&second).unwrap();
        assert_eq!(merged["permissions"]["allow"], json!(["Read(*)", "Write(*)"]));
        assert_eq!(merged["hooks"]["PreToolUse"].as_array().unwrap().len(), 1);
        assert_eq!(merged["model"], json!("opus"));
    }

    #[test]
    fn test_merge_file_rejects_malformed_destination_without_writing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("settings.json");
        let template = dir.path().join("settings.template.json");
        fs::write(&dest, "{not json").unwrap();
        fs::write(&template, "{}").unwrap();

        let err = merge_settings_file(&dest, &template).unwrap_err();
        assert!(err.contains("Could not parse"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{not json");
    }

    #[test]
    fn test_merge_file_rejects_missing_template() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("settings.json");
        let template = dir.path().join("settings.template.json");

        let err = merge_settings_file(&dest, &template).unwrap_err();
        assert!(err.contains("Could not read"));
        assert!(!dest.exists());
    }

    proptest! {
        #[test]
        fn prop_union_correctness(
            dest in proptest::collection::vec("[a-z]{1,4}", 0..8),
            source in proptest::collection::vec("[a-z]{1,4}", 0..8),
        ) {
            let merged = union_allow(&dest, &source);

            // No duplicates.
            let unique: HashSet<&String> = merged.iter().collect();
            prop_assert_eq!(unique.len(), merged.len());

            // Every destination and source entry retained, nothing else.
            for value in dest.iter().chain(source.iter()) {
                prop_assert!(merged.contains(value));
            }
            for value in &merged {
                prop_assert!(dest.contains(value) || source.contains(value));
            }
        }
    }
}
