const SETTINGS: &str = "src/default_settings.toml";
const SECTIONS: [&str; 4] = ["resources", "fields", "cache", "decoration"];

fn main() {
    println!("cargo:rerun-if-changed={SETTINGS}");

    // The embedded defaults back `Settings::default()`; reject a broken file
    // here rather than at first use.
    let table: toml::Table = match include_str!("src/default_settings.toml").parse() {
        Ok(t) => t,
        Err(e) => panic!("{SETTINGS} contains invalid TOML: {e}"),
    };
    for section in SECTIONS {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("{SETTINGS} is missing the [{section}] table");
        }
    }
}
