//! Flat-file configuration storage: one JSON document per pattern in a directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{SpiroError, SpiroResult},
    model::SpiroConfig,
};

/// Listing entry for one loadable config file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConfigEntry {
    pub filename: String,
    pub name: String,
    pub path: PathBuf,
}

/// Parses a config document, applies defaults and validates it.
pub fn parse_config(json: &str) -> SpiroResult<SpiroConfig> {
    let config: SpiroConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

#[tracing::instrument]
pub fn load_config(path: &Path) -> SpiroResult<SpiroConfig> {
    let text = fs::read_to_string(path)
        .map_err(|e| SpiroError::io(format!("read config '{}': {e}", path.display())))?;
    parse_config(&text)
}

/// Every `*.json` in `dir` that loads, sorted by filename. Invalid files are skipped and a
/// missing directory lists as empty.
#[tracing::instrument]
pub fn list_configs(dir: &Path) -> SpiroResult<Vec<ConfigEntry>> {
    if !dir.exists() {
        tracing::debug!("config directory does not exist");
        return Ok(Vec::new());
    }
    let read_dir = fs::read_dir(dir)
        .map_err(|e| SpiroError::io(format!("list configs in '{}': {e}", dir.display())))?;

    let mut entries = Vec::new();
    for item in read_dir {
        let item = item.map_err(|e| SpiroError::io(format!("list '{}': {e}", dir.display())))?;
        let path = item.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };

        match load_config(&path) {
            Ok(config) => entries.push(ConfigEntry {
                filename,
                name: config.name,
                path,
            }),
            Err(err) => tracing::warn!(file = %path.display(), %err, "skipping invalid config"),
        }
    }

    entries.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(entries)
}

/// Loads `filename` from `dir`; the name must be a bare file name.
pub fn fetch_config(dir: &Path, filename: &str) -> SpiroResult<SpiroConfig> {
    let bare = Path::new(filename)
        .file_name()
        .is_some_and(|n| n == filename);
    if !bare {
        return Err(SpiroError::validation(format!(
            "config name '{filename}' must be a plain file name"
        )));
    }

    let path = dir.join(filename);
    if !path.is_file() {
        return Err(SpiroError::not_found(format!(
            "configuration '{filename}' not found"
        )));
    }
    load_config(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("store_tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const FLOWER: &str = r##"{
        "name": "Flower",
        "wheels": [
            {"type": "fixed", "teeth": 100},
            {"type": "moving", "teeth": 50, "pen_offset": 0.5}
        ],
        "color": "#ff0000"
    }"##;

    #[test]
    fn parse_config_reports_bad_json_as_serialization() {
        let err = parse_config("{not json").unwrap_err();
        assert_eq!(err.code(), "serialization");
    }

    #[test]
    fn parse_config_validates() {
        let err = parse_config(r#"{"wheels": [{"type": "fixed", "teeth": 100}]}"#).unwrap_err();
        assert!(matches!(err, SpiroError::ConfigShapeMismatch(_)));
    }

    #[test]
    fn list_skips_invalid_and_foreign_files() {
        let dir = scratch_dir("list");
        fs::write(dir.join("b_flower.json"), FLOWER).unwrap();
        fs::write(dir.join("a_broken.json"), "{").unwrap();
        fs::write(dir.join("notes.txt"), FLOWER).unwrap();
        fs::write(
            dir.join("a_star.json"),
            FLOWER.replace("Flower", "Star"),
        )
        .unwrap();

        let entries = list_configs(&dir).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["a_star.json", "b_flower.json"]);
        assert_eq!(entries[0].name, "Star");
    }

    #[test]
    fn fetch_rejects_traversal() {
        let dir = scratch_dir("fetch");
        fs::write(dir.join("flower.json"), FLOWER).unwrap();

        let cfg = fetch_config(&dir, "flower.json").unwrap();
        assert_eq!(cfg.name, "Flower");

        for bad in ["../flower.json", "..", "sub/flower.json"] {
            let err = fetch_config(&dir, bad).unwrap_err();
            assert!(matches!(err, SpiroError::Validation(_)), "{bad}");
        }
        let err = fetch_config(&dir, "missing.json").unwrap_err();
        assert!(matches!(err, SpiroError::NotFound(_)));
        assert_eq!(err.code(), "not_found");
        assert!(err.is_client_error());
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let entries = list_configs(Path::new("target/store_tests/does_not_exist")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn list_on_a_file_is_io_error() {
        let dir = scratch_dir("not_a_dir");
        let file = dir.join("flower.json");
        fs::write(&file, FLOWER).unwrap();
        let err = list_configs(&file).unwrap_err();
        assert_eq!(err.code(), "io");
    }
}
