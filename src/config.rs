use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConvertResult;

/// Where to find statement files and where the CSV output goes.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change:
///
/// ```toml
/// input_dir = "statements"
/// output_dir = "out"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Recognized input extension, matched case-insensitively as a suffix
    pub input_extension: String,
    pub output_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            input_extension: ".qfx".to_string(),
            output_extension: ".csv".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_path(path: &Path) -> ConvertResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Does this file name end with the recognized input extension?
    pub fn matches_input(&self, file_name: &str) -> bool {
        ends_with_ignore_case(file_name, &self.input_extension)
    }

    /// Output path for an input file: same base name with the input
    /// extension replaced by the output extension, in the output directory.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let stem = match file_name.len().checked_sub(self.input_extension.len()) {
            Some(cut) if self.matches_input(&file_name) => &file_name[..cut],
            _ => file_name.as_str(),
        };

        self.output_dir
            .join(format!("{stem}{}", self.output_extension))
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}
