pub mod provider;

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{BankOffer, BankRateSheet, CostSettings, InverterModel, PanelModel};
use crate::error::{QuoteError, Result};

pub use provider::{CatalogProvider, HttpCatalogProvider};

/// Immutable snapshot of everything the engine computes from. Loaded as a
/// whole; individual entries are never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub panels: Vec<PanelModel>,
    pub inverters: Vec<InverterModel>,
    pub banks: Vec<BankRateSheet>,
    pub cost_settings: CostSettings,
}

impl Catalog {
    /// Flattens all bank rate sheets into per-period offers.
    pub fn bank_offers(&self) -> Vec<BankOffer> {
        self.banks.iter().flat_map(|b| b.flatten()).collect()
    }
}

/// Owns the provider and the current snapshot. A load fans out the four
/// sub-fetches concurrently and succeeds only if all of them do; any failure
/// drops a previously held snapshot so callers never see partial data.
pub struct CatalogStore {
    provider: Arc<dyn CatalogProvider>,
    snapshot: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogStore {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            snapshot: RwLock::new(None),
        }
    }

    /// Fetches the full catalog. All-or-nothing: on any sub-fetch failure
    /// the store becomes not-ready and `DataUnavailable` is returned. There
    /// is no internal retry; callers may simply invoke `load` again.
    pub async fn load(&self) -> Result<Arc<Catalog>> {
        let fetched = tokio::try_join!(
            self.provider.fetch_panels(),
            self.provider.fetch_inverters(),
            self.provider.fetch_bank_sheets(),
            self.provider.fetch_cost_settings(),
        );

        match fetched {
            Ok((panels, inverters, banks, cost_settings)) => {
                info!(
                    panels = panels.len(),
                    inverters = inverters.len(),
                    banks = banks.len(),
                    "catalog loaded"
                );
                let catalog = Arc::new(Catalog {
                    panels,
                    inverters,
                    banks,
                    cost_settings,
                });
                *self.snapshot.write().await = Some(catalog.clone());
                Ok(catalog)
            }
            Err(e) => {
                warn!(error = %e, "catalog load failed; store marked not ready");
                *self.snapshot.write().await = None;
                Err(QuoteError::DataUnavailable(e.to_string()))
            }
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    /// Current snapshot, or `DataUnavailable` when no successful load has
    /// happened yet.
    pub async fn snapshot(&self) -> Result<Arc<Catalog>> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or_else(|| QuoteError::DataUnavailable("catalog not loaded".into()))
    }
}
