//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. the TOML config file (`--config FILE`, or `config.toml` in the
//!    platform config directory)
//! 3. the `[profile.<name>]` table of that file, when `--profile` is given
//! 4. `TABDUPE_*` environment variables (`TABDUPE_ATOL=0.01`)
//! 5. command-line flags
//!
//! A config file that cannot be parsed is reported and ignored. Unknown keys
//! are reported with the closest known key.
//!
//! ```toml
//! atol = 0.02
//! mode = "affine"
//! rtol = [0.01, 0.05]
//! parallel_threshold = 100000
//!
//! [profile.strict]
//! atol = 1e-12
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{FindArgs, OutputFormat};
use crate::duplicates::{
    Bound, FinderConfig, Tolerance, ToleranceMode, DEFAULT_ATOL, DEFAULT_PARALLEL_THRESHOLD,
    DEFAULT_RTOL,
};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "TABDUPE_";

/// Keys accepted at the top level and inside profiles.
const KNOWN_KEYS: &[&str] = &[
    "atol",
    "rtol",
    "mode",
    "parallel",
    "parallel_threshold",
    "output",
    "pretty",
];

/// Minimum Jaro-Winkler similarity for a key suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute tolerance, one value or one per tolerance column.
    pub atol: Bound,
    /// Relative tolerance (affine mode), one value or one per tolerance column.
    pub rtol: Bound,
    /// Comparison mode for tolerance columns.
    pub mode: ToleranceMode,
    /// Allow the adjacent comparison to run in parallel.
    pub parallel: bool,
    /// Minimum number of candidate rows for a parallel comparison.
    pub parallel_threshold: usize,
    /// Default output format of `find`.
    pub output: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Named profiles.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub profile: BTreeMap<String, ProfileConfig>,
}

/// Overrides applied by a named profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Absolute tolerance override.
    pub atol: Option<Bound>,
    /// Relative tolerance override.
    pub rtol: Option<Bound>,
    /// Comparison mode override.
    pub mode: Option<ToleranceMode>,
    /// Parallel comparison override.
    pub parallel: Option<bool>,
    /// Parallel threshold override.
    pub parallel_threshold: Option<usize>,
    /// Output format override.
    pub output: Option<OutputFormat>,
    /// Pretty-print override.
    pub pretty: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            atol: Bound::Scalar(DEFAULT_ATOL),
            rtol: Bound::Scalar(DEFAULT_RTOL),
            mode: ToleranceMode::default(),
            parallel: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            output: OutputFormat::default(),
            pretty: false,
            profile: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load the configuration from `path` (or the default location) and the
    /// environment.
    #[must_use]
    pub fn load(path: Option<&Path>, profile: Option<&str>) -> Self {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(path, profile),
            None => {
                log::debug!("No config directory available, using defaults and environment");
                let figment = Self::base_figment().merge(Env::prefixed(ENV_PREFIX).split("__"));
                Self::extract_or_default(figment, "environment")
            }
        }
    }

    /// Load the configuration from a specific file and the environment.
    ///
    /// A missing file is not an error. An invalid file is logged and the
    /// defaults are used instead.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>, profile: Option<&str>) -> Self {
        let path = path.as_ref();
        let mut figment = Self::base_figment();

        if path.exists() {
            log::debug!("Reading configuration from {}", path.display());
            match fs::read_to_string(path) {
                Ok(content) => {
                    for warning in unknown_key_warnings(&content) {
                        log::warn!("{}: {warning}", path.display());
                    }
                }
                Err(e) => log::warn!("Cannot read {}: {e}", path.display()),
            }
            figment = figment.merge(Toml::file(path));
            if let Some(name) = profile {
                let key = format!("profile.{name}");
                figment = figment.merge(Figment::from(Toml::file(path)).focus(&key));
            }
        } else {
            log::debug!("No configuration file at {}", path.display());
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        let config = Self::extract_or_default(figment, &path.display().to_string());

        if let Some(name) = profile {
            if !config.profile.contains_key(name) {
                log::warn!("Profile '{name}' not found in {}", path.display());
            }
        }
        config
    }

    /// Platform config file location, e.g. `~/.config/tabdupe/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "tabdupe", "tabdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply the flags of a `find` invocation on top of this configuration.
    pub fn merge_find_args(&mut self, args: &FindArgs) {
        if !args.atol.is_empty() {
            self.atol = cli_bound(&args.atol);
        }
        if !args.rtol.is_empty() {
            self.rtol = cli_bound(&args.rtol);
        }
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if args.parallel {
            self.parallel = true;
        }
        if args.no_parallel {
            self.parallel = false;
        }
        if args.pretty {
            self.pretty = true;
        }
    }

    /// The tolerance described by this configuration.
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::default()
            .with_atol(self.atol.clone())
            .with_rtol(self.rtol.clone())
            .with_mode(self.mode)
    }

    /// Finder settings described by this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_tolerance(self.tolerance())
            .with_parallel(self.parallel)
            .with_parallel_threshold(self.parallel_threshold)
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    fn extract_or_default(figment: Figment, source: &str) -> Self {
        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid configuration ({source}): {e}; using defaults");
                Self::default()
            }
        }
    }
}

/// `--atol 0.1` is a scalar; `--atol 0.1,0.2` is one value per column.
fn cli_bound(values: &[f64]) -> Bound {
    match values {
        [single] => Bound::Scalar(*single),
        _ => Bound::from(values.to_vec()),
    }
}

/// Warnings for keys in a TOML config document that tabdupe does not know.
///
/// Unparseable documents produce no warnings here; figment reports those.
#[must_use]
pub fn unknown_key_warnings(content: &str) -> Vec<String> {
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for (key, value) in &table {
        if key == "profile" {
            let Some(profiles) = value.as_table() else {
                continue;
            };
            for (name, body) in profiles {
                let Some(body) = body.as_table() else {
                    continue;
                };
                for key in body.keys() {
                    if let Some(warning) = check_key(key) {
                        warnings.push(format!("profile '{name}': {warning}"));
                    }
                }
            }
        } else if let Some(warning) = check_key(key) {
            warnings.push(warning);
        }
    }
    warnings
}

fn check_key(key: &str) -> Option<String> {
    if KNOWN_KEYS.contains(&key) {
        return None;
    }
    let suggestion = KNOWN_KEYS
        .iter()
        .map(|known| (known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1));
    Some(match suggestion {
        Some((known, _)) => format!("unknown key '{key}' (did you mean '{known}'?)"),
        None => format!("unknown key '{key}'"),
    })
}
