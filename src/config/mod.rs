/// Application settings loading from config.toml
pub mod settings;

/// Credential list configuration
pub mod users;

pub use settings::{
    AppConfig, BillingConfig, ColumnConfig, ComposeConfig, PeriodConfig, ReminderConfig,
    SheetConfig, ViewConfig, load_config, load_default_config,
};
pub use users::UserConfig;
