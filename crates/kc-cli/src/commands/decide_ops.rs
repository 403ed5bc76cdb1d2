//! `kctool decide`: show the engine decision for a buffer.

use std::path::Path;

use kc_content::ResourceFetcher;
use kc_core::settings::Settings;
use kc_core::unicode::char_len;
use kc_core::{decide, MappingTable, Replacement};

use super::{die, dir_fetcher, CliError};

#[derive(Debug, PartialEq, Eq)]
pub struct Decision {
    pub replacement: Replacement,
    pub text: String,
    pub cursor: usize,
}

/// Decide on `text` with the cursor at `cursor` (default: end of text).
pub fn decide_text(
    dir: &Path,
    lang: &str,
    text: &str,
    cursor: Option<usize>,
    settings: &Settings,
) -> Result<Option<Decision>, CliError> {
    let fetcher = dir_fetcher(dir, settings);
    let table = MappingTable::from_json(&fetcher.fetch_mapping(lang)?)?;
    let cursor = cursor.unwrap_or_else(|| char_len(text));

    Ok(decide(text, cursor, &table).map(|replacement| {
        let (text, cursor) = replacement.apply(text, cursor);
        Decision {
            replacement,
            text,
            cursor,
        }
    }))
}

pub fn decide_cmd(dir: &str, lang: &str, text: &str, cursor: Option<usize>, settings: &Settings) {
    let decision = die!(
        decide_text(Path::new(dir), lang, text, cursor, settings),
        "Error: {}"
    );
    match decision {
        Some(d) => println!(
            "remove {} insert {:?} -> {:?} (cursor {})",
            d.replacement.remove_len, d.replacement.insert_text, d.text, d.cursor
        ),
        None => println!("no match"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::resources;

    #[test]
    fn test_decide_at_end() {
        let dir = resources();
        let d = decide_text(dir.path(), "ru", "ыa", None, &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(d.replacement.remove_len, 2);
        assert_eq!(d.text, "я");
        assert_eq!(d.cursor, 1);
    }

    #[test]
    fn test_decide_mid_text() {
        let dir = resources();
        let d = decide_text(dir.path(), "ru", "xsy", Some(2), &Settings::default())
            .unwrap()
            .unwrap();
        assert_eq!(d.text, "xсy");
        assert_eq!(d.cursor, 2);
    }

    #[test]
    fn test_decide_no_match() {
        let dir = resources();
        let d = decide_text(dir.path(), "ru", "123", None, &Settings::default()).unwrap();
        assert_eq!(d, None);
    }

    #[test]
    fn test_decide_invalid_mapping() {
        let dir = resources();
        let err = decide_text(dir.path(), "xx", "a", None, &Settings::default()).unwrap_err();
        assert!(matches!(err, CliError::Mapping(_)));
    }
}
