//! `kctool check`: validate a resource directory.

use std::path::Path;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use kc_content::ResourceFetcher;
use kc_core::settings::Settings;
use kc_core::{parse_catalog, MappingTable};

use super::{die, dir_fetcher, CliError};

/// Check result for one catalog entry.
#[derive(Debug, Serialize)]
pub struct CheckRow {
    pub code: String,
    pub name: String,
    pub keys: Option<usize>,
    pub error: Option<String>,
}

/// Parse the catalog under `dir` and every mapping it lists. A broken
/// catalog is an error; broken mappings are reported per row.
pub fn check_dir(dir: &Path, settings: &Settings) -> Result<Vec<CheckRow>, CliError> {
    let fetcher = dir_fetcher(dir, settings);
    let catalog = parse_catalog(&fetcher.fetch_catalog()?)?;

    Ok(catalog
        .iter()
        .map(|entry| {
            let table = fetcher
                .fetch_mapping(&entry.code)
                .map_err(CliError::from)
                .and_then(|json| MappingTable::from_json(&json).map_err(CliError::from));
            let (keys, error) = match table {
                Ok(t) => (Some(t.len()), None),
                Err(e) => (None, Some(e.to_string())),
            };
            CheckRow {
                code: entry.code.clone(),
                name: entry.name.clone(),
                keys,
                error,
            }
        })
        .collect())
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

pub fn format_table(rows: &[CheckRow]) -> String {
    let code_w = rows.iter().map(|r| r.code.width()).max().unwrap_or(0).max(4);
    let name_w = rows.iter().map(|r| r.name.width()).max().unwrap_or(0).max(4);

    let mut out = format!("{}  {}  status\n", pad("code", code_w), pad("name", name_w));
    for r in rows {
        let status = match (&r.keys, &r.error) {
            (Some(n), _) => format!("ok ({n} keys)"),
            (None, Some(e)) => format!("error: {e}"),
            (None, None) => "error".to_string(),
        };
        out.push_str(&format!(
            "{}  {}  {status}\n",
            pad(&r.code, code_w),
            pad(&r.name, name_w)
        ));
    }
    out
}

pub fn check(dir: &str, json: bool, settings: &Settings) {
    let rows = die!(check_dir(Path::new(dir), settings), "Error: {}");
    if json {
        let out = die!(serde_json::to_string_pretty(&rows), "Error: {}");
        println!("{out}");
    } else {
        print!("{}", format_table(&rows));
    }
    if rows.iter().any(|r| r.error.is_some()) {
        std::process::exit(1);
    }
}
