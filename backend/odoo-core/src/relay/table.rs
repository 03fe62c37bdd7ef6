use crate::relay::RelayStrategy;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use log::{info, warn};

struct RelayEntry {
    strategy: Arc<dyn RelayStrategy>,
    enabled: AtomicBool,
    consecutive_failures: AtomicU32,
}

/// Ordered relay strategies with per-entry enable flags.
///
/// Order is configuration: the client walks it front to back, except that
/// relay-preferred calls move every direct strategy to the end.
#[derive(Default)]
pub struct RelayTable {
    entries: Vec<RelayEntry>,
    failure_threshold: Option<u32>,
}

impl RelayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(self, strategy: impl RelayStrategy + 'static) -> Self {
        self.with_shared(Arc::new(strategy))
    }

    pub fn with_shared(mut self, strategy: Arc<dyn RelayStrategy>) -> Self {
        self.entries.push(RelayEntry {
            strategy,
            enabled: AtomicBool::new(true),
            consecutive_failures: AtomicU32::new(0),
        });
        self
    }

    /// Disable a strategy after this many failures in a row.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = (threshold > 0).then_some(threshold);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.strategy.name()).collect()
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.find(name).map(|e| e.enabled.load(Ordering::SeqCst))
    }

    /// Returns `false` when no strategy has that name.
    pub fn set_enabled(&self, name: &str, enabled: bool) -> bool {
        match self.find(name) {
            Some(entry) => {
                entry.enabled.store(enabled, Ordering::SeqCst);
                entry.consecutive_failures.store(0, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Enabled strategies in the order a call should try them.
    pub fn ordered(&self, prefer_relay: bool) -> Vec<Arc<dyn RelayStrategy>> {
        let enabled = self
            .entries
            .iter()
            .filter(|e| e.enabled.load(Ordering::SeqCst))
            .map(|e| Arc::clone(&e.strategy));

        if !prefer_relay {
            return enabled.collect();
        }

        let (direct, relays): (Vec<_>, Vec<_>) = enabled.partition(|s| s.kind().is_direct());
        relays.into_iter().chain(direct).collect()
    }

    pub fn record_success(&self, name: &str) {
        if let Some(entry) = self.find(name) {
            entry.consecutive_failures.store(0, Ordering::SeqCst);
        }
    }

    /// Count a failure; returns `true` if it got the strategy disabled.
    ///
    /// The last enabled strategy is never disabled.
    pub fn record_failure(&self, name: &str) -> bool {
        let Some(entry) = self.find(name) else {
            return false;
        };

        let failures = entry.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(threshold) = self.failure_threshold else {
            return false;
        };

        if failures < threshold || self.enabled_count() <= 1 {
            return false;
        }

        let was_enabled = entry.enabled.swap(false, Ordering::SeqCst);
        if was_enabled {
            warn!("Relay strategy {name} disabled after {failures} consecutive failures");
        }
        was_enabled
    }

    /// Re-enable every strategy and clear failure counts.
    pub fn reset(&self) {
        for entry in &self.entries {
            entry.enabled.store(true, Ordering::SeqCst);
            entry.consecutive_failures.store(0, Ordering::SeqCst);
        }
        info!("Relay table reset, {} strategies enabled", self.entries.len());
    }

    fn enabled_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.enabled.load(Ordering::SeqCst))
            .count()
    }

    fn find(&self, name: &str) -> Option<&RelayEntry> {
        self.entries.iter().find(|e| e.strategy.name() == name)
    }
}
