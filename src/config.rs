use std::{
    fs,
    path::{Path, PathBuf},
};

use jsonc_parser::ParseOptions;
use serde_json::Value;

use crate::error::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "appSettings.json";
pub const EXE_PATH_KEY: &str = "OneNoteExePath";

/// The directory holding the running executable. The settings file lives there.
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let mut exe = std::env::current_exe().map_err(ConfigError::BaseDirectory)?;
    exe.pop();
    Ok(exe)
}

/// Read `OneNoteExePath` from `<base_dir>/appSettings.json`.
///
/// The file may start with a byte order mark and may contain `//` or `/* */`
/// comments and trailing commas, as settings files saved by Visual Studio
/// often do. Keys are matched case-insensitively, so `"onenoteexepath": "..."`
/// is accepted as well. A missing, `null`, empty or structured value counts
/// as not set.
pub fn load_exe_path(base_dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = base_dir.join(SETTINGS_FILE_NAME);
    log::debug!("Reading settings from {}", path.display());

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let text = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
    let root = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default()).map_err(|source| {
        ConfigError::Parse {
            path: path.clone(),
            source,
        }
    })?;
    let Some(Value::Object(settings)) = root else {
        return Err(ConfigError::NotAnObject { path });
    };

    let value = settings
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(EXE_PATH_KEY))
        .and_then(|(_, value)| scalar_text(value));

    match value {
        Some(exe) if !exe.is_empty() => Ok(PathBuf::from(exe)),
        _ => Err(ConfigError::MissingExePath { path }),
    }
}

// Booleans read as `True`/`False`. Numbers come back in serde_json's own
// formatting, which is not always the text written in the file.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
