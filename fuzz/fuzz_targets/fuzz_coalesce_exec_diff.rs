//! Fuzz comparing execution with and without run coalescing

#![no_main]

use bf2c::settings::Settings;
use bf2c::test_utils::{compare_runs, record, test_execute};
use bf2c_fuzz::FuzzInputSrc;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzInputSrc| {
    let plain_settings = Settings {
        init_size: 4,
        extend_size: 4,
        ..Default::default()
    };
    let merged_settings = Settings {
        coalesce: true,
        ..plain_settings.clone()
    };
    let plain = if let Ok(v) = record(&data.code, &plain_settings) {
        v
    } else {
        return;
    };
    let merged = record(&data.code, &merged_settings).unwrap();

    let exec1 = test_execute(&plain, &plain_settings, &mut data.input.clone());
    let exec2 = test_execute(&merged, &merged_settings, &mut data.input.clone());
    compare_runs(&exec1, &exec2);
});
