//! # Terminal Configuration
//!
//! Settings loaded once at startup: the backend connection (see
//! [`till_api::ApiConfig`]) plus how receipts are printed.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--base-url`, `--token`)
//! 2. Environment variables (`TILL_*`)
//! 3. Config file (`terminal.toml`)
//! 4. Defaults (this file)
//!
//! ## File Locations
//! - Linux: `~/.config/pos/terminal.toml`
//! - macOS: `~/Library/Application Support/com.till.pos/terminal.toml`
//! - Windows: `%APPDATA%\till\pos\config\terminal.toml`
//!
//! ## Thread Safety
//! Read-only after startup, so it is passed around by reference.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use till_api::{ApiConfig, ApiError, ApiResult};

/// Receipt printing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Paper width in characters (typically 32, 42, or 48).
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,

    /// Currency symbol (for display).
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_paper_width() -> usize {
    42
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            paper_width: default_paper_width(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Paper widths the receipt layout supports.
pub const PAPER_WIDTH_RANGE: std::ops::RangeInclusive<usize> = 24..=120;

/// Flags from the command line, applied after file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

/// Full terminal configuration.
///
/// ## File Format
/// ```toml
/// [server]
/// base_url = "https://pos.example.com"
/// timeout_secs = 30
///
/// [auth]
/// token = "eyJhbGciOi..."
///
/// [receipt]
/// paper_width = 42
/// currency_symbol = "₹"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(flatten)]
    pub api: ApiConfig,

    #[serde(default)]
    pub receipt: ReceiptSettings,
}

impl TerminalConfig {
    /// Loads configuration: defaults, then file, then environment, then flags.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<PathBuf>, overrides: ConfigOverrides) -> ApiResult<Self> {
        Self::load_with(path, overrides, |key| std::env::var(key).ok())
    }

    /// [`TerminalConfig::load`] with an explicit variable lookup.
    pub fn load_with(
        path: Option<PathBuf>,
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(&lookup);

        if let Some(url) = overrides.base_url {
            config.api.server.base_url = url;
        }
        if let Some(token) = overrides.token {
            config.api.auth.token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> ApiResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ApiError::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        self.api.apply_overrides(lookup);

        if let Some(width) = lookup("TILL_PAPER_WIDTH") {
            match width.parse::<usize>() {
                Ok(w) => self.receipt.paper_width = w,
                Err(_) => warn!(value = %width, "Ignoring non-numeric TILL_PAPER_WIDTH"),
            }
        }

        if let Some(symbol) = lookup("TILL_CURRENCY_SYMBOL") {
            self.receipt.currency_symbol = symbol;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        self.api.validate()?;

        if !PAPER_WIDTH_RANGE.contains(&self.receipt.paper_width) {
            return Err(ApiError::InvalidConfig(format!(
                "paper_width must be between {} and {}, got {}",
                PAPER_WIDTH_RANGE.start(),
                PAPER_WIDTH_RANGE.end(),
                self.receipt.paper_width
            )));
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
