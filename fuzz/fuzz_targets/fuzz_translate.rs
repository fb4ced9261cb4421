//! Fuzz the translator with arbitrary sources and settings

#![no_main]

use bf2c::generate_c;
use bf2c_fuzz::FuzzTranslate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzTranslate| {
    let first = generate_c(&data.code, &data.settings);
    let second = generate_c(&data.code, &data.settings);
    match (first, second) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a, b);
            assert!(a.ends_with(b"\treturn 0;\n}\n"));
        }
        (Err(a), Err(b)) => assert_eq!(a, b),
        _ => panic!("Translation is not deterministic"),
    }
});
