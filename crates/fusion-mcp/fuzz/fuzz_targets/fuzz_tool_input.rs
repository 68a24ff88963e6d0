#![no_main]

//! Fuzz target for tool argument parsing
//!
//! This target tests that arbitrary bytes never cause panics when parsed
//! as tool arguments or as a power action.

use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

use fusion_client::PowerAction;
use fusion_mcp::handlers::{GetVmInfoInput, ListVmsInput, PowerVmInput, parse_input};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<PowerAction>();

        if let Ok(map) = serde_json::from_str::<Map<String, Value>>(s) {
            let _: Result<ListVmsInput, _> = parse_input(Some(map.clone()));
            let _: Result<GetVmInfoInput, _> = parse_input(Some(map.clone()));
            if let Ok(input) = parse_input::<PowerVmInput>(Some(map)) {
                let _ = input.action.parse::<PowerAction>();
            }
        }
    }
});
