use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use weight_codec::CodecConfig;

/// Settings driving the `inspect` command.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InspectSettings {
    /// Perfect hash parameters backing the dictionary, if any.
    #[serde(default)]
    pub perfect_hash: Option<PathBuf>,
    /// Stop dictionary growth once the weights are loaded.
    #[serde(default)]
    pub freeze_after_load: bool,
    /// Progress and reporting knobs for the codec.
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Settings driving the `convert` command.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConvertSettings {
    /// Perfect hash parameters backing the dictionary; switches output to binary.
    #[serde(default)]
    pub perfect_hash: Option<PathBuf>,
    /// Drop zero weights from text output.
    #[serde(default)]
    pub hide_zero_features: bool,
    /// Comment written at the top of text output.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub freeze_after_load: bool,
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Reads `<command>.toml`, or the file passed with `--config`, into `T`.
///
/// Without `--config` a missing file means defaults; a `--config` path that
/// does not exist is an error.
pub fn load_settings<T>(command: &str, explicit: Option<PathBuf>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let path = match explicit {
        Some(path) if !path.exists() => {
            bail!("--config file {} does not exist", path.display())
        }
        Some(path) => path,
        None => {
            let implicit = PathBuf::from(format!("{command}.toml"));
            if !implicit.exists() {
                debug!(command, "no settings file, using defaults");
                return Ok(T::default());
            }
            implicit
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("cannot read {command} settings from {}", path.display()))?;
    let settings = toml::from_str(&raw)
        .with_context(|| format!("invalid {command} settings in {}", path.display()))?;
    debug!(command, path = %path.display(), "settings loaded");
    Ok(settings)
}
