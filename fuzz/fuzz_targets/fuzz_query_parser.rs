//! Fuzz target: request URI parsing (`split_uri` / `query_param` / `parse_pwm`)
//!
//! Feeds arbitrary UTF-8 request targets through the same path the HTTP
//! handler uses and checks:
//! - No panics under any input
//! - A parsed `pwm` level always clamps into `0..=255`
//! - `parse_pwm` only yields a level when a `pwm` parameter is present
//!
//! cargo fuzz run fuzz_query_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use waterpump::app::commands::{PWM_PARAM, Verb, parse_pwm, query_param, split_uri};
use waterpump::app::state::clamp_level;

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = std::str::from_utf8(data) else {
        return;
    };

    let (path, query) = split_uri(uri);
    let _ = Verb::from_path(path);

    if let Some(level) = parse_pwm(query) {
        assert!(query_param(query, PWM_PARAM).is_some());
        let _duty: u8 = clamp_level(level);
    }
});
