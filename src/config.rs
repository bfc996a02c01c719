// Configuration loading and parsing (analyzer.toml, credentials.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::roster::Position;
use crate::scoring::{ScoringPreset, ScoringRules};

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

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    /// Rule tables assembled from the defaults plus any `[scoring]` and
    /// `[league.starters]` overrides.
    pub rules: ScoringRules,
    /// Resolved scoring preset. Unknown keys in the file fall back to PPR.
    pub preset: ScoringPreset,
    pub live: LiveConfig,
    pub llm: LlmConfig,
    pub credentials: CredentialsConfig,
    pub db_path: String,
}

// ---------------------------------------------------------------------------
// analyzer.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire analyzer.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AnalyzerFile {
    league: LeagueSection,
    #[serde(default)]
    scoring: ScoringSection,
    live: LiveConfig,
    llm: LlmConfig,
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    scoring_preset: String,
    /// Starter slot counts keyed by position string ("QB", "D/ST", ...).
    #[serde(default)]
    starters: HashMap<String, usize>,
}

/// Optional per-position overrides of the built-in weight and reception
/// tables.
#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringSection {
    #[serde(default)]
    weights: HashMap<String, f64>,
    #[serde(default)]
    receptions: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    pub season: i64,
    pub week: i64,
    /// Prefer fresh catalog projections over stored roster projections.
    pub use_live: bool,
    /// Catalog rows older than this are ignored.
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    /// Omit to use the per-user application data directory.
    path: Option<String>,
}

/// The public league settings assembled from the `[league]` section.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub name: String,
    pub scoring_preset: String,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/analyzer.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- analyzer.toml (required) ---
    let analyzer_path = config_dir.join("analyzer.toml");
    let analyzer_text = read_file(&analyzer_path)?;
    let file: AnalyzerFile =
        toml::from_str(&analyzer_text).map_err(|e| ConfigError::ParseError {
            path: analyzer_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let rules = assemble_rules(&file.league.starters, &file.scoring)?;
    let preset = ScoringPreset::from_key(&file.league.scoring_preset);

    let db_path = match file.database.path {
        Some(path) if !path.is_empty() => path,
        _ => default_db_path(),
    };

    let config = Config {
        league: LeagueConfig {
            name: file.league.name,
            scoring_preset: file.league.scoring_preset,
        },
        rules,
        preset,
        live: file.live,
        llm: file.llm,
        credentials,
        db_path,
    };

    validate(&config)?;

    Ok(config)
}

/// Build the rule tables: start from the built-in defaults, then apply the
/// file's starter slots and scoring overrides. Unknown position keys are
/// validation errors rather than silent drops.
fn assemble_rules(
    starters: &HashMap<String, usize>,
    scoring: &ScoringSection,
) -> Result<ScoringRules, ConfigError> {
    let mut rules = ScoringRules::default();

    for (key, &limit) in starters {
        let pos = parse_position_key("league.starters", key)?;
        rules.set_starter_limit(pos, limit);
    }
    for (key, &weight) in &scoring.weights {
        let pos = parse_position_key("scoring.weights", key)?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("scoring.weights.{key}"),
                message: format!("must be a non-negative number, got {weight}"),
            });
        }
        rules.set_weight(pos, weight);
    }
    for (key, &receptions) in &scoring.receptions {
        let pos = parse_position_key("scoring.receptions", key)?;
        if !receptions.is_finite() || receptions < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("scoring.receptions.{key}"),
                message: format!("must be a non-negative number, got {receptions}"),
            });
        }
        rules.set_avg_receptions(pos, receptions);
    }

    Ok(rules)
}

fn parse_position_key(section: &str, key: &str) -> Result<Position, ConfigError> {
    let pos = Position::parse(key);
    if pos == Position::Unknown {
        return Err(ConfigError::ValidationError {
            field: format!("{section}.{key}"),
            message: "unknown position".into(),
        });
    }
    Ok(pos)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying default config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Database location when `[database] path` is omitted: the per-user
/// application data directory, falling back to the working directory.
fn default_db_path() -> String {
    directories::ProjectDirs::from("", "", "fantasy-analyzer")
        .map(|dirs| {
            let dir = dirs.data_dir();
            let _ = std::fs::create_dir_all(dir);
            dir.join("fantasy-analyzer.db").to_string_lossy().into_owned()
        })
        .unwrap_or_else(|| "fantasy-analyzer.db".to_string())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.live.season <= 0 {
        return Err(ConfigError::ValidationError {
            field: "live.season".into(),
            message: format!("must be greater than 0, got {}", config.live.season),
        });
    }

    if config.live.week <= 0 {
        return Err(ConfigError::ValidationError {
            field: "live.week".into(),
            message: format!("must be greater than 0, got {}", config.live.week),
        });
    }

    if config.live.ttl_minutes <= 0 {
        return Err(ConfigError::ValidationError {
            field: "live.ttl_minutes".into(),
            message: format!("must be greater than 0, got {}", config.live.ttl_minutes),
        });
    }

    if config.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".into(),
            message: "must be > 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
