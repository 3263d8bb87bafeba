//! Property-based tests for configuration patching and command construction.
//!
//! - Append-only: a patched `branches` keeps every prior entry in order
//! - Passthrough: keys other than `branches` survive untouched
//! - Blank branch names never mutate the document

use proptest::prelude::*;
use semrel_core::{GitProvider, ReleaseConfig, construct_cmd};
use serde_json::{Map, Value, json};

/// Branch names like the ones found in real repositories
fn branch_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9/_.-]{0,20}".prop_map(String::from)
}

/// A `.releaserc.json` document with a `branches` list and an extra key
fn document_strategy() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(branch_strategy(), 0..5),
        "[a-z${}.]{0,12}".prop_map(String::from),
    )
        .prop_map(|(branches, tag_format)| {
            let branches: Vec<Value> = branches
                .into_iter()
                .map(|name| json!({ "name": name }))
                .collect();
            json!({ "branches": branches, "tagFormat": tag_format })
        })
}

fn parse(value: &Value) -> ReleaseConfig {
    ReleaseConfig::parse(&value.to_string()).unwrap()
}

fn as_value(config: &ReleaseConfig) -> Value {
    Value::Object(config.as_json().clone())
}

proptest! {
    #[test]
    fn prop_append_only(
        doc in document_strategy(),
        branch in branch_strategy(),
        pad in "[ \t]{0,3}",
    ) {
        let mut config = parse(&doc);
        let padded = format!("{pad}{branch}{pad}");
        config.add_branch(Some(&padded)).unwrap();
        let after = as_value(&config);

        let before_branches = doc["branches"].as_array().unwrap();
        let after_branches = after["branches"].as_array().unwrap();
        prop_assert_eq!(after_branches.len(), before_branches.len() + 1);
        prop_assert_eq!(&after_branches[..before_branches.len()], &before_branches[..]);
        prop_assert_eq!(after_branches.last().unwrap(), &json!({ "name": branch }));
        prop_assert_eq!(&after["tagFormat"], &doc["tagFormat"]);
    }

    #[test]
    fn prop_blank_branch_is_no_op(doc in document_strategy(), blank in "[ \t\n]{0,4}") {
        let mut config = parse(&doc);
        config.add_branch(Some(&blank)).unwrap();
        prop_assert_eq!(as_value(&config), doc);
    }

    #[test]
    fn prop_missing_branches_is_no_op(
        extra in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{0,8}", 0..4),
        branch in prop::option::of(branch_strategy()),
    ) {
        let doc = Value::Object(
            extra
                .into_iter()
                .filter(|(k, _)| k != "branches")
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<Map<String, Value>>(),
        );
        let mut config = parse(&doc);
        config.add_branch(branch.as_deref()).unwrap();
        prop_assert_eq!(as_value(&config), doc);
    }

    #[test]
    fn prop_round_trip(doc in document_strategy()) {
        let config = parse(&doc);
        let reparsed: Value = serde_json::from_str(&config.to_json_string().unwrap()).unwrap();
        prop_assert_eq!(reparsed, doc);
    }

    #[test]
    fn prop_command_shape(check_if_ci: bool, dry_run: bool) {
        let cmd = construct_cmd(check_if_ci, dry_run);
        prop_assert_eq!(cmd[0].as_str(), "semantic-release");
        prop_assert_eq!(cmd.contains(&"--no-ci".to_string()), !check_if_ci);
        prop_assert_eq!(cmd.contains(&"--dry-run".to_string()), dry_run);
        prop_assert_eq!(cmd.len(), 1 + usize::from(!check_if_ci) + usize::from(dry_run));
        if !check_if_ci && dry_run {
            prop_assert_eq!(cmd[1].as_str(), "--no-ci");
        }
    }

    #[test]
    fn prop_non_github_providers_use_gl_token(name in "[A-Za-z]{0,10}") {
        prop_assume!(name != "github");
        prop_assert_eq!(GitProvider::from_name(&name).token_env_var(), "GL_TOKEN");
    }
}
