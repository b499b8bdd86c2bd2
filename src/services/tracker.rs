//! Usage tracking and cost estimation
//!
//! Keeps a bounded in-memory history of per-request token accounting and
//! computes the locally estimated cost from configured per-1000-token rates

use crate::config::PricingConfig;
use crate::models::{TaskKind, TokenUsage, UsageRecord};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Maximum number of usage records kept in history
pub const MAX_HISTORY: usize = 50;

/// Default number of records returned by `recent`
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Estimate the cost of a request in USD
///
/// Deterministic; rounded to 6 decimal places
pub fn estimate_cost(prompt_tokens: u32, completion_tokens: u32, rates: &PricingConfig) -> f64 {
    let cost = (prompt_tokens as f64 / 1000.0) * rates.prompt_cost_per_1k
        + (completion_tokens as f64 / 1000.0) * rates.completion_cost_per_1k;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

/// Bounded in-memory usage history
///
/// Shared across request handlers; the interior mutex serializes concurrent
/// record calls so FIFO eviction and the size bound hold
#[derive(Debug)]
pub struct UsageTracker {
    history: Mutex<VecDeque<UsageRecord>>,
    capacity: usize,
    rates: PricingConfig,
}

impl UsageTracker {
    /// Create a tracker with the default capacity
    pub fn new(rates: PricingConfig) -> Self {
        Self::with_capacity(rates, MAX_HISTORY)
    }

    /// Create a tracker with an explicit capacity
    pub fn with_capacity(rates: PricingConfig, capacity: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            rates,
        }
    }

    /// Record a completed request and return its estimated cost
    ///
    /// Appends a usage record and evicts the oldest one once the history
    /// exceeds capacity
    pub fn record(&self, id: &str, task: TaskKind, model: &str, usage: &TokenUsage) -> f64 {
        let cost = estimate_cost(usage.prompt_tokens, usage.completion_tokens, &self.rates);

        let record = UsageRecord {
            id: id.to_string(),
            task,
            model: model.to_string(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            estimated_cost: cost,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let mut history = self.history.lock().expect("usage history lock poisoned");
        history.push_back(record);
        if history.len() > self.capacity {
            history.pop_front();
        }

        debug!("Recorded usage for request {}: {} tokens, ${}", id, usage.total_tokens, cost);
        cost
    }

    /// Return the most recent records, oldest to newest, most recent last
    ///
    /// Never returns more than `min(limit, recorded)` items
    pub fn recent(&self, limit: usize) -> Vec<UsageRecord> {
        let history = self.history.lock().expect("usage history lock poisoned");
        let count = history.len().min(limit);
        history.iter().skip(history.len() - count).cloned().collect()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.history.lock().expect("usage history lock poisoned").len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
