//! Published hop table and cursor
//!
//! The hop table is the only state the time-critical hop driver touches. It
//! holds the current [`HopPlan`] behind an `Arc` and a cursor into its
//! sequence. Hop advances update the cursor with a single atomic
//! read-modify-write, so concurrent advances are never lost.
//!
//! ## Publication
//!
//! A new plan is always built completely before it is published. Publishing
//! swaps the `Arc` and resets the cursor under the write lock, so a hop
//! advance sees either the old plan with its cursor or the new plan starting
//! at slot 0, never a partially written buffer. A driver that took a
//! [`HopTable::plan`] snapshot keeps reading the old plan until it asks again.
//!
//! ```text
//!  controller (config / override)         hop timer (driver)
//!  ──────────────────────────────         ──────────────────
//!  HopPlan::generate(..)                  table.next_channel()
//!        │                                  │ read lock
//!        ▼                                  ▼
//!  table.publish(plan) ── write lock ──▶ Arc<HopPlan> + cursor
//! ```

use crate::domain::FrequencyDomain;
use crate::sequence::HopPlan;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared hop plan plus the current hop position
#[derive(Debug)]
pub struct HopTable {
    plan: RwLock<Arc<HopPlan>>,
    cursor: AtomicUsize,
}

impl HopTable {
    /// Create a table publishing `plan`, cursor at slot 0.
    pub fn new(plan: HopPlan) -> Self {
        Self {
            plan: RwLock::new(Arc::new(plan)),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Replace the published plan and reset the cursor.
    pub fn publish(&self, plan: HopPlan) {
        let plan = Arc::new(plan);
        let mut guard = self.plan.write();
        *guard = plan;
        self.cursor.store(0, Ordering::Release);
    }

    /// Snapshot of the published plan
    pub fn plan(&self) -> Arc<HopPlan> {
        Arc::clone(&*self.plan.read())
    }

    /// Current position in the sequence
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Move the cursor, wrapping at the sequence length.
    pub fn set_cursor(&self, index: usize) {
        let plan = self.plan.read();
        self.cursor
            .store(index % plan.sequence().len(), Ordering::Release);
    }

    /// Channel at the cursor
    pub fn current_channel(&self) -> u8 {
        let plan = self.plan.read();
        plan.sequence()[self.cursor.load(Ordering::Acquire)]
    }

    /// Register value of the channel at the cursor
    pub fn current_frequency(&self) -> u32 {
        let plan = self.plan.read();
        let channel = plan.sequence()[self.cursor.load(Ordering::Acquire)];
        plan.channel_frequency(channel)
    }

    /// Advance one hop and return the new channel.
    pub fn next_channel(&self) -> u8 {
        let plan = self.plan.read();
        let next = self.advance(plan.sequence().len());
        plan.sequence()[next]
    }

    /// Advance one hop and return the new channel's register value.
    pub fn next_frequency(&self) -> u32 {
        let plan = self.plan.read();
        let next = self.advance(plan.sequence().len());
        plan.channel_frequency(plan.sequence()[next])
    }

    // Caller holds the read lock, so `len` matches the published plan.
    fn advance(&self, len: usize) -> usize {
        let step = |cursor: usize| Some((cursor + 1) % len);
        match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, step)
        {
            Ok(prev) | Err(prev) => (prev + 1) % len,
        }
    }

    /// True when the cursor sits on the sync channel.
    pub fn on_sync_channel(&self) -> bool {
        let plan = self.plan.read();
        plan.sequence()[self.cursor.load(Ordering::Acquire)] == plan.sync_channel()
    }

    /// Register value of the sync channel
    pub fn initial_frequency(&self) -> u32 {
        self.plan.read().initial_frequency()
    }

    /// Sync channel of the published plan
    pub fn sync_channel(&self) -> u8 {
        self.plan.read().sync_channel()
    }

    /// Channel spacing of the published plan
    pub fn freq_spread(&self) -> u64 {
        self.plan.read().freq_spread()
    }

    /// Domain of the published plan
    pub fn domain(&self) -> FrequencyDomain {
        self.plan.read().domain().clone()
    }

    /// Whether the published plan hops in the EU 868 MHz domain.
    pub fn is_domain_868(&self) -> bool {
        self.plan.read().domain().is_eu868()
    }
}
