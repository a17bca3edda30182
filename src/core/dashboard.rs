//! Data load orchestration and the in-memory dataset.
//!
//! A load fetches the three sheets concurrently, joins them, and swaps the result
//! in as a whole. A failed load leaves the previous dataset in place.

use crate::{
    config::AppConfig,
    core::{
        ledger::{self, CustomerRow, DuePolicy, PERIOD_COUNT},
        sheet::SheetSource,
        view::{self, Summary},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

/// The joined result of one successful load.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Joined rows in primary sheet order
    pub rows: Vec<CustomerRow>,
    /// Period labels, newest first
    pub periods: [String; PERIOD_COUNT],
    /// When the load completed
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Summary over every row.
    #[must_use]
    pub fn summary(&self) -> Summary {
        view::summarize(&self.rows)
    }
}

/// Holds the most recently loaded dataset.
#[derive(Debug, Default)]
pub struct Dashboard {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl Dashboard {
    /// Creates an empty dashboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current dataset, if any load has succeeded.
    pub async fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.current.read().await.clone()
    }

    /// Returns the current dataset or `Error::NoData`.
    pub async fn require(&self) -> Result<Arc<Dataset>> {
        self.snapshot().await.ok_or(Error::NoData)
    }

    /// Fetches the three sheets, joins them, and replaces the current dataset.
    ///
    /// # Errors
    /// Returns `Error::DataLoad` if any fetch fails; the current dataset is kept.
    #[instrument(skip_all)]
    pub async fn load<S: SheetSource + Sync>(
        &self,
        source: &S,
        config: &AppConfig,
    ) -> Result<Arc<Dataset>> {
        let sheets = &config.sheets;
        let fetched = tokio::try_join!(
            source.fetch(&sheets.primary),
            source.fetch(&sheets.previous),
            source.fetch(&sheets.earlier),
        );

        let (primary, previous, earlier) = match fetched {
            Ok(sheets) => sheets,
            Err(e) => {
                error!(error = %e, "Failed to load sheets");
                return Err(match e {
                    Error::DataLoad { .. } => e,
                    other => Error::DataLoad {
                        message: other.to_string(),
                    },
                });
            }
        };

        let rows = ledger::build_rows(
            &primary,
            &previous,
            &earlier,
            &config.columns,
            DuePolicy::new(config.billing.monthly_fee),
            &config.billing.currency,
        );

        let dataset = Arc::new(Dataset {
            rows,
            periods: config.periods.labels(),
            loaded_at: Utc::now(),
        });

        *self.current.write().await = Some(Arc::clone(&dataset));
        info!(
            rows = dataset.rows.len(),
            previous_unpaid = previous.len(),
            earlier_unpaid = earlier.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }
}
