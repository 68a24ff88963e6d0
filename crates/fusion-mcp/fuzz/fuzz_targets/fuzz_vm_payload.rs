#![no_main]

//! Fuzz target for rendering Fusion API payloads
//!
//! Any JSON the API might return must render without panicking.

use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

use fusion_client::{PowerAction, VmSummary};
use fusion_mcp::format;

fuzz_target!(|data: &[u8]| {
    if let Ok(vms) = serde_json::from_slice::<Vec<VmSummary>>(data) {
        let _ = format::render_vm_list(&vms);
    }

    if let Ok(info) = serde_json::from_slice::<Map<String, Value>>(data) {
        let _ = format::render_vm_info("fuzz", &info);
        let _ = format::render_power_result("fuzz", PowerAction::Reset, &info);
    }
});
