//! Plain-text rendering of tool results
//!
//! Every tool returns a human readable text block alongside its structured
//! JSON content. The layouts here are what MCP hosts show to the user.

use fusion_client::{PowerAction, PowerOutcome, VmDetails, VmSummary};
use serde_json::Value;

/// Message returned when Fusion has no registered VMs
pub const NO_VMS_MESSAGE: &str = "No VMs found in VMware Fusion.";

const HEADER_RULE_WIDTH: usize = 50;
const ENTRY_RULE_WIDTH: usize = 30;

/// Render the VM listing
#[must_use]
pub fn render_vm_list(vms: &[VmSummary]) -> String {
    if vms.is_empty() {
        return NO_VMS_MESSAGE.to_string();
    }

    let mut lines = vec!["VMware Fusion VMs:".to_string(), "=".repeat(HEADER_RULE_WIDTH)];
    for vm in vms {
        lines.push(format!("ID: {}", vm.id_or_unknown()));
        lines.push(format!("Path: {}", vm.path_or_unknown()));
        lines.push("-".repeat(ENTRY_RULE_WIDTH));
    }
    lines.join("\n")
}

/// Render detailed information for one VM
///
/// Top-level keys are title cased. Nested objects are expanded one level,
/// indented by two spaces.
#[must_use]
pub fn render_vm_info(vm_id: &str, info: &VmDetails) -> String {
    let mut lines = vec![
        format!("VM Information for ID: {vm_id}"),
        "=".repeat(HEADER_RULE_WIDTH),
    ];

    for (key, value) in info {
        match value {
            Value::Object(inner) => {
                lines.push(format!("{}:", title_case(key)));
                for (sub_key, sub_value) in inner {
                    lines.push(format!("  {sub_key}: {}", display_value(sub_value)));
                }
            }
            other => lines.push(format!("{}: {}", title_case(key), display_value(other))),
        }
    }

    lines.join("\n")
}

/// Render the confirmation for a power action
#[must_use]
pub fn render_power_result(vm_id: &str, action: PowerAction, outcome: &PowerOutcome) -> String {
    let mut content = format!("Successfully performed '{action}' action on VM {vm_id}");
    if let Some(status) = outcome.get("status").filter(|s| is_truthy(s)) {
        content.push_str(" - Status: ");
        content.push_str(&display_value(status));
    }
    content
}

/// Upper-case the first letter of each alphabetic run, lower-case the rest
///
/// `cpu` becomes `Cpu`, `guest_os` becomes `Guest_Os`, `displayName`
/// becomes `Displayname`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Strings print bare; everything else as compact JSON
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
