// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for fusion-mcp
//!
//! These tests use proptest to verify invariants hold for arbitrary inputs,
//! ensuring robustness against edge cases and malformed data.

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use fusion_client::{PowerAction, VmSummary};
use fusion_mcp::format::{render_power_result, render_vm_info, render_vm_list, title_case};
use fusion_mcp::handlers::{GetVmInfoInput, HandlerError, PowerVmInput, parse_input};

// ============================================================================
// Strategies
// ============================================================================

/// Generate arbitrary strings including edge cases
fn arbitrary_string() -> impl Strategy<Value = String> {
    prop_oneof![
        // Empty and whitespace
        Just("".to_string()),
        Just(" ".to_string()),
        Just("\t\n\r".to_string()),
        // Unicode
        Just("日本語テスト".to_string()),
        Just("emoji 🔥🚀".to_string()),
        Just("Ñoño".to_string()),
        // Path-like strings
        Just("/Users/dev/Virtual Machines.localized/a.vmx".to_string()),
        Just("../parent/path".to_string()),
        Just("C:\\Windows\\Path".to_string()),
        // Almost-valid actions
        Just("ON".to_string()),
        Just("on ".to_string()),
        Just("poweroff".to_string()),
        // Random alphanumeric
        "[a-zA-Z0-9_]{1,50}".prop_map(|s| s),
        // Random with special chars
        ".*{0,100}".prop_map(|s| s),
    ]
}

fn power_action() -> impl Strategy<Value = PowerAction> {
    prop::sample::select(PowerAction::ALL.to_vec())
}

/// Arbitrary scalar or shallow JSON value
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        arbitrary_string().prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop::collection::btree_map("[a-z_]{1,10}", inner, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    })
}

// ============================================================================
// Power actions
// ============================================================================

proptest! {
    #[test]
    fn prop_action_round_trips_through_its_name(action in power_action()) {
        let parsed: PowerAction = action.as_str().parse().expect("own name parses");
        prop_assert_eq!(parsed, action);
    }

    #[test]
    fn prop_only_listed_actions_parse(s in arbitrary_string()) {
        let valid = PowerAction::ALL.iter().any(|a| a.as_str() == s);
        prop_assert_eq!(s.parse::<PowerAction>().is_ok(), valid);
    }

    #[test]
    fn prop_power_text_names_vm_and_action(vm_id in "[a-zA-Z0-9]{1,20}", action in power_action()) {
        let text = render_power_result(&vm_id, action, &Map::new());
        let expected = format!("Successfully performed '{action}' action on VM {vm_id}");
        prop_assert_eq!(text, expected);
    }
}

// ============================================================================
// Rendering
// ============================================================================

proptest! {
    #[test]
    fn prop_title_case_preserves_non_letters(s in "[a-zA-Z0-9_ ./:-]{0,60}") {
        let titled = title_case(&s);
        let strip = |t: &str| t.chars().filter(|c| !c.is_alphabetic()).collect::<String>();
        prop_assert_eq!(strip(&titled), strip(&s));
    }

    #[test]
    fn prop_title_case_is_idempotent(s in "[a-zA-Z0-9_ -]{0,40}") {
        let once = title_case(&s);
        prop_assert_eq!(title_case(&once), once);
    }

    #[test]
    fn prop_vm_list_has_block_per_vm(ids in prop::collection::vec("[a-z0-9]{1,12}", 1..10)) {
        let vms: Vec<VmSummary> = ids
            .iter()
            .map(|id| VmSummary::new(id.clone(), "/x.vmx"))
            .collect();
        let text = render_vm_list(&vms);
        prop_assert_eq!(text.lines().count(), 2 + 3 * vms.len());
        for id in &ids {
            let line = format!("ID: {id}");
            prop_assert!(text.lines().any(|l| l == line));
        }
    }

    #[test]
    fn prop_vm_info_never_panics(
        vm_id in arbitrary_string(),
        info in prop::collection::btree_map("[a-zA-Z_]{1,12}", json_value(), 0..8),
    ) {
        let info: Map<String, Value> = info.into_iter().collect();
        let text = render_vm_info(&vm_id, &info);
        let header = format!("VM Information for ID: {vm_id}");
        prop_assert!(text.starts_with(&header));
    }
}

// ============================================================================
// Input parsing
// ============================================================================

proptest! {
    #[test]
    fn prop_get_vm_info_input_accepts_any_string(vm_id in arbitrary_string()) {
        let args = json!({ "vm_id": vm_id.clone() });
        let Value::Object(map) = args else { unreachable!() };
        let input: GetVmInfoInput = parse_input(Some(map)).expect("string vm_id parses");
        prop_assert_eq!(input.vm_id, vm_id);
    }

    #[test]
    fn prop_non_string_vm_id_is_invalid_input(n in any::<i64>()) {
        let Value::Object(map) = json!({ "vm_id": n, "action": "on" }) else { unreachable!() };
        let result: Result<PowerVmInput, _> = parse_input(Some(map));
        prop_assert!(matches!(result, Err(HandlerError::InvalidInput(_))));
    }
}
