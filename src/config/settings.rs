//! Application settings loading from config.toml
//!
//! Every section has defaults matching the production dashboard's values,
//! so an empty file (or a file with only `[[users]]`) is a valid configuration.

use crate::{
    config::users::UserConfig,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "COLLECTION_BUDDY_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the three sheets live
    pub sheets: SheetConfig,
    /// Field labels of the primary sheet
    pub columns: ColumnConfig,
    /// Display labels of the three periods
    pub periods: PeriodConfig,
    /// Due amount calculation
    pub billing: BillingConfig,
    /// Reminder message and phone rules
    pub reminder: ReminderConfig,
    /// Table presentation
    pub view: ViewConfig,
    /// Optional text-generation endpoint
    pub compose: ComposeConfig,
    /// Accounts allowed to log in
    pub users: Vec<UserConfig>,
}

/// Spreadsheet location and sheet names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Base URL of the spreadsheet service
    pub base_url: String,
    /// Spreadsheet identifier
    pub spreadsheet_id: String,
    /// Sheet holding the authoritative customer list and current balance
    pub primary: String,
    /// Sheet listing customers who did not pay in the previous period
    pub previous: String,
    /// Sheet listing customers who did not pay in the period before that
    pub earlier: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docs.google.com/spreadsheets".to_string(),
            spreadsheet_id: String::new(),
            primary: "sheet1".to_string(),
            previous: "sheet2".to_string(),
            earlier: "sheet3".to_string(),
        }
    }
}

/// Column labels used to read customer records.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Customer identifier column (also used to join the auxiliary sheets)
    pub customer_id: String,
    /// Display name column
    pub name: String,
    /// Phone number column
    pub phone: String,
    /// Area label column
    pub area: String,
    /// Signed ledger balance column
    pub balance: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            customer_id: "customer_id".to_string(),
            name: "PPPoE_Name".to_string(),
            phone: "client_phone".to_string(),
            area: "area".to_string(),
            balance: "balance".to_string(),
        }
    }
}

/// Period labels, newest first.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    /// Label of the current period (primary sheet)
    pub current: String,
    /// Label of the previous period (first auxiliary sheet)
    pub previous: String,
    /// Label of the earliest period (second auxiliary sheet)
    pub earlier: String,
}

impl PeriodConfig {
    /// Returns the three labels in display order.
    #[must_use]
    pub fn labels(&self) -> [String; 3] {
        [
            self.current.clone(),
            self.previous.clone(),
            self.earlier.clone(),
        ]
    }
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            current: "July".to_string(),
            previous: "June".to_string(),
            earlier: "May".to_string(),
        }
    }
}

/// Due amount settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Fixed monthly fee added on top of the ledger balance
    pub monthly_fee: f64,
    /// Suffix appended to formatted amounts
    pub currency: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            monthly_fee: 500.0,
            currency: "TK".to_string(),
        }
    }
}

/// Reminder message template and phone normalization rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Template with `{name}`, `{customer_id}`, `{area}`, `{due}`, `{months}`, `{count}` placeholders
    pub template: String,
    /// Country calling code without `+`
    pub country_code: String,
    /// Number of subscriber digits after the country code
    pub local_digits: usize,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            template: "Dear {name} (ID: {customer_id}), your internet bill of {due} \
                       is still unpaid for {months}. Please pay at your earliest \
                       convenience to avoid disconnection. Thank you."
                .to_string(),
            country_code: "880".to_string(),
            local_digits: 10,
        }
    }
}

/// Table presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { page_size: 100 }
    }
}

/// Text-generation endpoint used to word reminder messages.
///
/// Generation is enabled only when `endpoint` is set and the API key
/// environment variable is present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Full URL of the generate-content endpoint
    pub endpoint: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: "COMPOSE_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!(path = ?path_ref, "Loading configuration");
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.view.page_size == 0 {
        return Err(Error::Config {
            message: "view.page_size must be greater than zero".to_string(),
        });
    }
    if config.sheets.spreadsheet_id.trim().is_empty() {
        tracing::warn!("sheets.spreadsheet_id is empty; loading data will fail");
    }
    if config.users.is_empty() {
        tracing::warn!("No [[users]] configured; nobody will be able to log in");
    }

    Ok(config)
}

/// Loads configuration from `$COLLECTION_BUDDY_CONFIG`, or `./config.toml` by default
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
