//! Service wiring shared by all handlers.

use std::sync::Arc;

use economia_core::{Clock, SystemClock};
use economia_finance::{FinanceBook, InMemoryEntryStore};
use economia_subscription::{AccessVerifier, GuardConfig, InMemoryRecordStore, SubscriptionLifecycle};

#[derive(Debug)]
pub struct AppServices {
    pub clock: Arc<dyn Clock>,
    pub records: Arc<InMemoryRecordStore>,
    pub verifier: Arc<AccessVerifier>,
    pub lifecycle: SubscriptionLifecycle,
    pub book: FinanceBook<Arc<InMemoryEntryStore>>,
}

impl AppServices {
    pub fn new(config: &GuardConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &GuardConfig, clock: Arc<dyn Clock>) -> Self {
        let records = Arc::new(InMemoryRecordStore::new());
        let verifier = Arc::new(AccessVerifier::with_config(
            records.clone(),
            config,
            clock.clone(),
        ));
        let lifecycle = SubscriptionLifecycle::new(records.clone(), verifier.clone());
        let book = FinanceBook::with_clock(Arc::new(InMemoryEntryStore::new()), clock.clone());

        Self {
            clock,
            records,
            verifier,
            lifecycle,
            book,
        }
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new(&GuardConfig::default())
    }
}
