use std::fs;

use super::die;

pub fn settings_export() {
    print!("{}", kc_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        kc_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: fields.override_attribute={}, fields.replay={:?}, cache.retry_failed={}",
        s.fields.override_attribute, s.fields.replay, s.cache.retry_failed
    );
}

/// Install `file` as the process-wide settings.
pub fn load_config(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(kc_core::settings::init_custom(content), "Error in {file}: {}");
}
