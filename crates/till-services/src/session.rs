//! Per-interaction context
//!
//! One interaction covers one customer from identification to confirmation.
//! It holds at most one in-progress customer id.

use till_core::models::CustomerId;

/// Context for a single customer interaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interaction {
    customer_id: Option<CustomerId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id assigned during this interaction, if any
    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    pub fn has_customer(&self) -> bool {
        self.customer_id.is_some()
    }

    pub(crate) fn assign(&mut self, id: CustomerId) {
        self.customer_id = Some(id);
    }

    /// Forget the in-progress customer so the next one starts fresh
    pub fn reset(&mut self) {
        self.customer_id = None;
    }
}
