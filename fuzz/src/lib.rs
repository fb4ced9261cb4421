//! Fuzzing helper function

use std::collections::VecDeque;
use std::fmt::Debug;

use bf2c::settings::Settings;

#[derive(arbitrary::Arbitrary)]
pub struct FuzzInputSrc {
    pub code: Vec<u8>,
    pub input: VecDeque<u8>,
}

impl Debug for FuzzInputSrc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzInputSrc")
            .field("code", &bf2c::byte_utils::as_bstr(&self.code))
            .field("input", &self.input)
            .finish()
    }
}

#[derive(arbitrary::Arbitrary)]
pub struct FuzzTranslate {
    pub code: Vec<u8>,
    pub settings: Settings,
}

impl Debug for FuzzTranslate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzTranslate")
            .field("code", &bf2c::byte_utils::as_bstr(&self.code))
            .field("settings", &self.settings)
            .finish()
    }
}
