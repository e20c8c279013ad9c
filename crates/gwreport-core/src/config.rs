// Configuration loading and parsing (gwreport.toml, bios.json, prompt templates).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::BioStore;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid bios JSON in {path}: {source}")]
    BiosParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// How harsh the generated report should be, 1 (mild) to 5 (savage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone(u8);

impl Tone {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConfigError::ValidationError {
                field: "prompt.tone".into(),
                message: format!("must be between {} and {}, got {level}", Self::MIN, Self::MAX),
            })
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Everything one run needs, loaded up front and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub league: LeagueConfig,
    pub api: ApiConfig,
    pub tone: Tone,
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub bios_path: PathBuf,
    pub bios: BioStore,
    pub templates: PromptTemplates,
}

impl Config {
    /// Directory reports are written to, resolved against the base directory.
    pub fn reports_dir(&self) -> PathBuf {
        resolve(&self.base_dir, &self.output.reports_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub league_id: u64,
    pub gameweek: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout. No timeout when omitted.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub reports_dir: String,
}

/// The two free-text prompt documents, read verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplates {
    pub task: String,
    pub detail: String,
}

fn default_user_agent() -> String {
    concat!("gwreport/", env!("CARGO_PKG_VERSION")).to_string()
}

// ---------------------------------------------------------------------------
// gwreport.toml file layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueConfig,
    api: ApiConfig,
    prompt: PromptSection,
    bios: BiosSection,
    llm: LlmConfig,
    output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct PromptSection {
    task_path: String,
    detail_path: String,
    tone: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
struct BiosSection {
    path: String,
}

/// Command-line overrides applied on top of the file values before validation.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub league_id: Option<u64>,
    pub gameweek: Option<u32>,
    pub tone: Option<u8>,
    pub bios_path: Option<PathBuf>,
    /// Turn the LLM sink on regardless of `llm.enabled`.
    pub enable_llm: bool,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "gwreport.toml";

/// Load and validate `config/gwreport.toml` relative to `base_dir`, then the
/// bios and prompt templates it points at.
///
/// Does not copy defaults. Prefer `load_config()` which does.
pub fn load_config_from(base_dir: &Path, overrides: &Overrides) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&config_path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    let mut league = file.league;
    if let Some(id) = overrides.league_id {
        league.league_id = id;
    }
    if let Some(gw) = overrides.gameweek {
        league.gameweek = gw;
    }

    let tone = match overrides.tone.or(file.prompt.tone) {
        Some(level) => Tone::new(level)?,
        None => Tone::default(),
    };

    let bios_path = match &overrides.bios_path {
        Some(path) => path.clone(),
        None => resolve(base_dir, &file.bios.path),
    };
    let bios = load_bios(&bios_path)?;

    let templates = PromptTemplates {
        task: read_file(&resolve(base_dir, &file.prompt.task_path))?,
        detail: read_file(&resolve(base_dir, &file.prompt.detail_path))?,
    };

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        league,
        api: file.api,
        tone,
        llm: LlmConfig {
            enabled: file.llm.enabled || overrides.enable_llm,
            ..file.llm
        },
        output: file.output,
        bios_path,
        bios,
        templates,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy defaults into `config/` if needed, then load.
pub fn load_config(base_dir: &Path, overrides: &Overrides) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir, overrides)
}

/// Read and parse a bio store file.
pub fn load_bios(path: &Path) -> Result<BioStore, ConfigError> {
    let text = read_file(path)?;
    parse_bios(&text, path)
}

/// Parse bios JSON. `origin` only labels the error.
pub fn parse_bios(text: &str, origin: &Path) -> Result<BioStore, ConfigError> {
    serde_json::from_str(text).map_err(|e| ConfigError::BiosParseError {
        path: origin.to_path_buf(),
        source: e,
    })
}

/// Ensure every file in `defaults/` exists in `config/`, copying the missing
/// ones. Existing files are never overwritten and `.example` files are
/// skipped. Returns the paths that were created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read defaults entry: {e}"),
            })?
            .path();
        let Some(file_name) = path.file_name().filter(|_| path.is_file()) else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);
        if copy_if_missing(&path, &target)? {
            copied.push(target);
        }
    }

    copied.sort();
    Ok(copied)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };

    let content = std::fs::read(source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;
    Ok(true)
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    base_dir.join(path)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Last gameweek of a Premier League season.
pub const MAX_GAMEWEEK: u32 = 38;

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.league_id".into(),
            message: "must be greater than 0".into(),
        });
    }

    let gw = config.league.gameweek;
    if !(1..=MAX_GAMEWEEK).contains(&gw) {
        return Err(ConfigError::ValidationError {
            field: "league.gameweek".into(),
            message: format!("must be between 1 and {MAX_GAMEWEEK}, got {gw}"),
        });
    }

    let url = &config.api.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must be an http(s) URL, got `{url}`"),
        });
    }

    if config.api.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be > 0 when set".into(),
        });
    }

    if config.llm.enabled && config.llm.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "llm.endpoint".into(),
            message: "must be set when llm.enabled = true".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
