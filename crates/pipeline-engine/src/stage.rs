//! The stage abstraction: one unit of pipeline work.

use crate::state::{StateUpdate, TicketState};
use async_trait::async_trait;

/// One pipeline unit transforming state, optionally via an external
/// service call.
///
/// A stage reads the current [`TicketState`] and produces a partial update
/// for the executor to merge. Stages absorb their own service failures: a
/// failed classification still yields a category update (the documented
/// default), a failed generation still yields a response update (the fixed
/// fallback text). The signature has no error channel: stage failure must
/// never abort an invocation.
///
/// The executor runs each stage at most once per invocation and never
/// overlaps stage execution within one invocation.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable identifier for logging and events.
    fn id(&self) -> &str;

    /// Run this stage against the current state.
    async fn run(&self, state: &TicketState) -> StateUpdate;
}
