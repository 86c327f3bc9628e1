//! Layered runtime settings: TOML file, then `DORIS_*` environment
//! variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_ANALYSIS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Everything the binary needs to wire up the store and the collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// JSON seed to load instead of the built-in demo contracts.
  #[serde(default)]
  pub seed_path:      Option<PathBuf>,
  /// Base URL of the document backend. Documents are unavailable without it.
  #[serde(default)]
  pub storage_url:    Option<String>,
  #[serde(default)]
  pub storage_key:    String,
  #[serde(default = "default_bucket")]
  pub storage_bucket: String,
  #[serde(default = "default_analysis_url")]
  pub analysis_url:   String,
  #[serde(default)]
  pub analysis_key:   String,
  #[serde(default = "default_model")]
  pub analysis_model: String,
  #[serde(default = "default_download_dir")]
  pub download_dir:   PathBuf,
  #[serde(default = "default_log_file")]
  pub log_file:       PathBuf,
}

fn default_bucket() -> String { "documents".into() }
fn default_analysis_url() -> String { DEFAULT_ANALYSIS_URL.into() }
fn default_model() -> String { "gpt-4".into() }
fn default_download_dir() -> PathBuf { PathBuf::from(".") }
fn default_log_file() -> PathBuf { PathBuf::from("doris.log") }

impl Default for Settings {
  fn default() -> Self {
    Self {
      seed_path:      None,
      storage_url:    None,
      storage_key:    String::new(),
      storage_bucket: default_bucket(),
      analysis_url:   default_analysis_url(),
      analysis_key:   String::new(),
      analysis_model: default_model(),
      download_dir:   default_download_dir(),
      log_file:       default_log_file(),
    }
  }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub seed_path:    Option<PathBuf>,
  pub storage_url:  Option<String>,
  pub analysis_url: Option<String>,
  pub log_file:     Option<PathBuf>,
}

impl Settings {
  /// Build settings from `config_file` (optional on disk), the environment
  /// and `overrides`, in increasing precedence.
  pub fn load(config_file: &Path, overrides: Overrides) -> anyhow::Result<Self> {
    let layered = config::Config::builder()
      .add_source(config::File::from(config_file).required(false))
      .add_source(config::Environment::with_prefix("DORIS"))
      .set_override_option("seed_path", overrides.seed_path.map(path_string))?
      .set_override_option("storage_url", overrides.storage_url)?
      .set_override_option("analysis_url", overrides.analysis_url)?
      .set_override_option("log_file", overrides.log_file.map(path_string))?
      .build()
      .with_context(|| format!("failed to read config file {}", config_file.display()))?;

    let mut settings: Settings = layered
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.seed_path = settings.seed_path.as_deref().map(expand_tilde);
    settings.download_dir = expand_tilde(&settings.download_dir);
    settings.log_file = expand_tilde(&settings.log_file);
    Ok(settings)
  }

  /// Document storage is configured only when a base URL is present.
  pub fn storage_configured(&self) -> bool {
    self.storage_url.as_deref().is_some_and(|url| !url.trim().is_empty())
  }
}

fn path_string(path: PathBuf) -> String { path.to_string_lossy().into_owned() }

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
