//! Shared test utilities for `CollectionBuddy`.
//!
//! This module provides a small fixed set of sheets, the rows they join into,
//! and an in-memory sheet source so load tests never touch the network.

use crate::{
    config::{AppConfig, ColumnConfig, UserConfig},
    core::{
        auth::CredentialStore,
        ledger::{self, CustomerRow, DuePolicy, PERIOD_COUNT},
        sheet::{SheetRecord, SheetSource},
    },
    errors::{Error, Result},
};
use std::collections::{HashMap, HashSet};

/// Builds a record from `(field, value)` pairs.
pub fn record(fields: &[(&str, &str)]) -> SheetRecord {
    fields.iter().copied().collect()
}

fn customer(id: &str, name: &str, phone: &str, area: &str, balance: &str) -> SheetRecord {
    record(&[
        ("customer_id", id),
        ("PPPoE_Name", name),
        ("client_phone", phone),
        ("area", area),
        ("balance", balance),
    ])
}

/// Primary, previous-period and earlier-period sheets.
///
/// | id    | name  | phone       | area   | balance | prev | earlier |
/// |-------|-------|-------------|--------|---------|------|---------|
/// | C-001 | rahim | 01815128906 | Mirpur | -800    | yes  | yes     |
/// | C-002 | karim | 1711000000  | Uttara | 200     | yes  | no      |
/// | C-003 |       |             | Mirpur | 900     | no   | no      |
/// | C-004 | salma | 12345       | Banani | abc     | no   | no      |
pub fn sample_sheets() -> (Vec<SheetRecord>, Vec<SheetRecord>, Vec<SheetRecord>) {
    let primary = vec![
        customer("C-001", "rahim", "01815128906", "Mirpur", "-800"),
        customer("C-002", "karim", "1711000000", "Uttara", "200"),
        customer("C-003", "", "", "Mirpur", "900"),
        customer("C-004", "salma", "12345", "Banani", "abc"),
    ];
    let previous = vec![
        record(&[("customer_id", "C-001")]),
        record(&[("customer_id", "C-002")]),
    ];
    let earlier = vec![
        record(&[("customer_id", "C-001")]),
        record(&[("customer_id", "C-999")]),
    ];
    (primary, previous, earlier)
}

/// Period labels matching the default configuration.
pub fn sample_periods() -> [String; PERIOD_COUNT] {
    ["July".to_string(), "June".to_string(), "May".to_string()]
}

/// The joined rows for [`sample_sheets`] with a 500 TK fee.
pub fn sample_rows() -> Vec<CustomerRow> {
    let (primary, previous, earlier) = sample_sheets();
    ledger::build_rows(
        &primary,
        &previous,
        &earlier,
        &ColumnConfig::default(),
        DuePolicy::new(500.0),
        "TK",
    )
}

/// Credential store with the single default account.
pub fn test_credentials() -> CredentialStore {
    CredentialStore::new(vec![UserConfig::new("01815128906", "Abc1234#")])
}

/// Default configuration with one account and a spreadsheet id.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.sheets.spreadsheet_id = "test-sheet".to_string();
    config.users = vec![UserConfig::new("01815128906", "Abc1234#")];
    config
}

/// In-memory sheet source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: HashMap<String, Vec<SheetRecord>>,
    failing: HashSet<String>,
}

impl MemorySource {
    /// Replaces the rows of one sheet.
    pub fn set_sheet(&mut self, name: &str, rows: Vec<SheetRecord>) {
        self.sheets.insert(name.to_string(), rows);
    }

    /// Makes fetching one sheet fail.
    pub fn fail_sheet(&mut self, name: &str) {
        self.failing.insert(name.to_string());
    }
}

impl SheetSource for MemorySource {
    async fn fetch(&self, sheet_name: &str) -> Result<Vec<SheetRecord>> {
        if self.failing.contains(sheet_name) {
            return Err(Error::DataLoad {
                message: format!("simulated failure for '{sheet_name}'"),
            });
        }
        self.sheets
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| Error::DataLoad {
                message: format!("unknown sheet '{sheet_name}'"),
            })
    }
}

/// Source serving [`sample_sheets`] under the default sheet names.
pub fn sample_source() -> MemorySource {
    let (primary, previous, earlier) = sample_sheets();
    let mut source = MemorySource::default();
    source.set_sheet("sheet1", primary);
    source.set_sheet("sheet2", previous);
    source.set_sheet("sheet3", earlier);
    source
}
