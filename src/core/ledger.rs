//! Join-and-derive business logic.
//!
//! Joins the primary customer sheet against the two auxiliary "no payment" sheets,
//! producing one [`CustomerRow`] per primary record with period statuses, an unpaid
//! count, and the due amount.

use crate::{config::ColumnConfig, core::sheet::SheetRecord};
use std::{collections::HashSet, fmt};
use tracing::warn;

/// Number of periods shown per customer.
pub const PERIOD_COUNT: usize = 3;

/// Largest balance magnitude accepted from the ledger sheet.
pub const MAX_BALANCE: f64 = 1e12;

/// Payment status of one customer for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Customer paid for the period
    Payment,
    /// Customer did not pay for the period
    NoPayment,
}

impl PaymentStatus {
    /// Maps an "unpaid" flag to a status.
    #[must_use]
    pub const fn from_unpaid(unpaid: bool) -> Self {
        if unpaid { Self::NoPayment } else { Self::Payment }
    }

    /// Returns true for [`PaymentStatus::NoPayment`].
    #[must_use]
    pub const fn is_unpaid(self) -> bool {
        matches!(self, Self::NoPayment)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "Payment"),
            Self::NoPayment => write!(f, "No Payment"),
        }
    }
}

/// How the due amount is derived from the ledger balance.
///
/// `due = max(0, trunc(monthly_fee - balance))`. A negative balance is an
/// outstanding debt and adds to the fee; a positive balance is credit and
/// reduces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuePolicy {
    /// Fixed fee charged for the current period
    pub monthly_fee: f64,
}

impl DuePolicy {
    /// Creates a policy with the given monthly fee.
    #[must_use]
    pub const fn new(monthly_fee: f64) -> Self {
        Self { monthly_fee }
    }

    /// Computes the non-negative, whole-unit due amount for a ledger balance.
    #[must_use]
    pub fn due_amount(&self, balance: f64) -> i64 {
        let due = (self.monthly_fee - balance).trunc();
        if due <= 0.0 || due.is_nan() {
            return 0;
        }
        // Cast safety: due is finite and positive; balances are bounded by MAX_BALANCE.
        #[allow(clippy::cast_possible_truncation)]
        let whole = due as i64;
        whole
    }
}

/// Formats a due amount for display, e.g. `1300 TK`.
#[must_use]
pub fn format_due(amount: i64, currency: &str) -> String {
    if currency.is_empty() {
        amount.to_string()
    } else {
        format!("{amount} {currency}")
    }
}

/// One joined and derived customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    /// 1-based position in the primary sheet
    pub serial: usize,
    /// Opaque customer identifier
    pub customer_id: String,
    /// Display name (`-` when blank)
    pub name: String,
    /// Area label
    pub area: String,
    /// Phone number as entered in the sheet
    pub phone: String,
    /// Statuses for the current, previous and earliest period
    pub statuses: [PaymentStatus; PERIOD_COUNT],
    /// Number of periods with no payment
    pub unpaid_count: usize,
    /// Due amount in whole currency units
    pub due: i64,
    /// Formatted due amount
    pub due_display: String,
}

impl CustomerRow {
    /// Labels of the periods this customer has not paid for, newest first.
    #[must_use]
    pub fn unpaid_periods<'a>(&self, labels: &'a [String; PERIOD_COUNT]) -> Vec<&'a str> {
        self.statuses
            .iter()
            .zip(labels.iter())
            .filter(|(status, _)| status.is_unpaid())
            .map(|(_, label)| label.as_str())
            .collect()
    }
}

/// Collects the set of customer identifiers present in a sheet.
#[must_use]
pub fn id_set<'a>(records: &'a [SheetRecord], id_column: &str) -> HashSet<&'a str> {
    records
        .iter()
        .map(|record| record.get(id_column).trim())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Parses a ledger balance, treating blank, unparsable or out-of-range values as zero.
fn parse_balance(raw: &str, customer_id: &str) -> f64 {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= MAX_BALANCE => value,
        _ => {
            warn!(customer_id, balance = raw, "Unparsable balance, treating as 0");
            0.0
        }
    }
}

/// Joins the primary sheet against the two auxiliary sheets.
///
/// Output order is primary sheet order. The current period is unpaid when a
/// positive amount is due; the previous and earliest periods are unpaid when the
/// customer appears in the corresponding auxiliary sheet.
#[must_use]
pub fn build_rows(
    primary: &[SheetRecord],
    previous: &[SheetRecord],
    earlier: &[SheetRecord],
    columns: &ColumnConfig,
    policy: DuePolicy,
    currency: &str,
) -> Vec<CustomerRow> {
    let previous_ids = id_set(previous, &columns.customer_id);
    let earlier_ids = id_set(earlier, &columns.customer_id);

    primary
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let customer_id = record.get(&columns.customer_id).trim().to_string();
            let name = match record.get(&columns.name).trim() {
                "" => "-".to_string(),
                name => name.to_string(),
            };
            let balance = parse_balance(record.get(&columns.balance), &customer_id);
            let due = policy.due_amount(balance);

            let statuses = [
                PaymentStatus::from_unpaid(due > 0),
                PaymentStatus::from_unpaid(previous_ids.contains(customer_id.as_str())),
                PaymentStatus::from_unpaid(earlier_ids.contains(customer_id.as_str())),
            ];
            let unpaid_count = statuses.iter().filter(|s| s.is_unpaid()).count();

            CustomerRow {
                serial: index + 1,
                name,
                area: record.get(&columns.area).trim().to_string(),
                phone: record.get(&columns.phone).trim().to_string(),
                statuses,
                unpaid_count,
                due,
                due_display: format_due(due, currency),
                customer_id,
            }
        })
        .collect()
}
