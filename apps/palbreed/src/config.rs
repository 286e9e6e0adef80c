//! # Configuration
//!
//! Settings are merged from four layers, highest priority first:
//!
//! 1. Command-line flags
//! 2. Environment (`PALBREED_DATA`)
//! 3. A TOML file (`palbreed.toml` in the working directory, or `--config`)
//! 4. Built-in defaults
//!
//! ```toml
//! data = "data/palworld_breeding_combinations.csv"
//! max_paths = 20
//! max_seconds = 5.0
//! host = "127.0.0.1"
//! port = 8080
//! ```

use palbreed_core::PalBreedError;
use palbreed_core::SearchLimits;
use palbreed_core::primitives::{DEFAULT_DATA_FILE, DEFAULT_MAX_PATHS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "palbreed.toml";

/// Environment variable naming the combination table.
pub const DATA_ENV_VAR: &str = "PALBREED_DATA";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Time budget for HTTP path searches when none is configured.
///
/// The CLI searches without a budget unless asked; the server never does.
pub const DEFAULT_SERVE_BUDGET: Duration = Duration::from_secs(10);

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// FILE LAYER
// =============================================================================

/// Contents of a `palbreed.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data: Option<PathBuf>,
    pub max_paths: Option<usize>,
    pub max_seconds: Option<f64>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl FileConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, PalBreedError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            PalBreedError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(PalBreedError::Config(format!(
                "{} exceeds maximum allowed {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PalBreedError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
            .map_err(|e| PalBreedError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse config text.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load `explicit` if given (it must exist), otherwise the default file
    /// if present, otherwise an empty layer.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, PalBreedError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!("Using config file {}", default.display());
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub max_paths: Option<usize>,
    pub max_seconds: Option<f64>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully merged settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Combination table CSV.
    pub data: PathBuf,
    pub limits: SearchLimits,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_FILE),
            limits: SearchLimits::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Merge the layers. `env_data` is the value of `PALBREED_DATA`.
    pub fn resolve(
        file: FileConfig,
        env_data: Option<PathBuf>,
        cli: Overrides,
    ) -> Result<Self, PalBreedError> {
        let max_seconds = cli.max_seconds.or(file.max_seconds);

        Ok(Self {
            data: cli
                .data
                .or(env_data)
                .or(file.data)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            limits: SearchLimits::new(
                cli.max_paths.or(file.max_paths).unwrap_or(DEFAULT_MAX_PATHS),
                max_seconds.map(parse_seconds).transpose()?,
            ),
            host: cli
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
        })
    }

    /// Discover the file layer, read the environment and merge.
    pub fn load(explicit: Option<&Path>, cli: Overrides) -> Result<Self, PalBreedError> {
        let file = FileConfig::discover(explicit)?;
        let env_data = std::env::var_os(DATA_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve(file, env_data, cli)
    }

    /// Default limits for HTTP requests: the configured limits, with
    /// `DEFAULT_SERVE_BUDGET` filling in a missing time budget.
    #[must_use]
    pub fn serve_limits(&self) -> SearchLimits {
        SearchLimits::new(
            self.limits.max_paths,
            self.limits.max_duration.or(Some(DEFAULT_SERVE_BUDGET)),
        )
    }

    /// Address the HTTP server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Convert a seconds budget to a `Duration`.
///
/// Negative, NaN and infinite values are rejected.
pub fn parse_seconds(seconds: f64) -> Result<Duration, PalBreedError> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        PalBreedError::Config(format!(
            "max_seconds must be a finite, non-negative number (got {})",
            seconds
        ))
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_layers_give_defaults() {
        let config = Config::resolve(FileConfig::default(), None, Overrides::default())
            .expect("resolve");
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = FileConfig {
            data: Some("file.csv".into()),
            max_paths: Some(5),
            port: Some(9000),
            ..FileConfig::default()
        };

        let config = Config::resolve(file.clone(), Some("env.csv".into()), Overrides::default())
            .expect("resolve");
        assert_eq!(config.data, PathBuf::from("env.csv"));
        assert_eq!(config.limits.max_paths, 5);
        assert_eq!(config.port, 9000);

        let cli = Overrides {
            data: Some("cli.csv".into()),
            max_paths: Some(2),
            ..Overrides::default()
        };
        let config = Config::resolve(file, Some("env.csv".into()), cli).expect("resolve");
        assert_eq!(config.data, PathBuf::from("cli.csv"));
        assert_eq!(config.limits.max_paths, 2);
    }

    #[test]
    fn max_seconds_becomes_duration() {
        let cli = Overrides {
            max_seconds: Some(1.5),
            ..Overrides::default()
        };
        let config = Config::resolve(FileConfig::default(), None, cli).expect("resolve");
        assert_eq!(config.limits.max_duration, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn serve_limits_always_carry_a_budget() {
        let config = Config::default();
        assert_eq!(config.limits.max_duration, None);
        assert_eq!(
            config.serve_limits(),
            SearchLimits::new(DEFAULT_MAX_PATHS, Some(DEFAULT_SERVE_BUDGET))
        );

        let cli = Overrides {
            max_seconds: Some(0.5),
            ..Overrides::default()
        };
        let config = Config::resolve(FileConfig::default(), None, cli).expect("resolve");
        assert_eq!(
            config.serve_limits().max_duration,
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn invalid_max_seconds_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(parse_seconds(bad), Err(PalBreedError::Config(_))));
        }
    }

    #[test]
    fn parses_toml() {
        let parsed = FileConfig::parse("data = \"pals.csv\"\nmax_seconds = 2.0\nport = 3000\n")
            .expect("parse");
        assert_eq!(parsed.data, Some(PathBuf::from("pals.csv")));
        assert_eq!(parsed.max_seconds, Some(2.0));
        assert_eq!(parsed.port, Some(3000));
        assert_eq!(parsed.host, None);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(FileConfig::parse("colour = \"blue\"\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"max_paths = 7\nhost = \"0.0.0.0\"\n")
            .expect("write");

        let parsed = FileConfig::discover(Some(file.path())).expect("load");
        assert_eq!(parsed.max_paths, Some(7));
        assert_eq!(parsed.host.as_deref(), Some("0.0.0.0"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = FileConfig::discover(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(PalBreedError::Config(_))));
    }
}
