//! # Order State
//!
//! Holds the order currently being rung up.
//!
//! ## Thread Safety
//! The order is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several commands read and modify it
//! 2. Only one command should modify it at a time
//! 3. Checkout must hold it across the store call so nothing is added to
//!    the order between computing the totals and resetting it
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order State Operations                               │
//! │                                                                         │
//! │  Caller Action            Command                 Order Change          │
//! │  ─────────────            ───────                 ────────────          │
//! │                                                                         │
//! │  Tap Product ────────────► add_to_order() ──────► merge or push line   │
//! │                                                                         │
//! │  +/- Buttons ────────────► update_quantity() ───► qty += delta         │
//! │                                                                         │
//! │  Customize ──────────────► customize_item() ────► reprice from base    │
//! │                                                                         │
//! │  Remove ─────────────────► remove_from_order() ─► lines.remove(i)      │
//! │                                                                         │
//! │  Pay ────────────────────► checkout() ──────────► reset on success     │
//! │                                                                         │
//! │  View ───────────────────► get_order() ─────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crema_core::Order;

/// Managed order state.
///
/// Uses `tokio::sync::Mutex` because checkout keeps the order locked while
/// it awaits the store.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    order: Arc<Mutex<Order>>,
}

impl OrderState {
    /// Creates state holding a fresh empty order.
    pub fn new() -> Self {
        OrderState::default()
    }

    /// Executes a function with read access to the order.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = order_state.with_order(|o| o.totals(tax_rate)).await;
    /// ```
    pub async fn with_order<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Order) -> R,
    {
        let order = self.order.lock().await;
        f(&order)
    }

    /// Executes a function with write access to the order.
    pub async fn with_order_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Order) -> R,
    {
        let mut order = self.order.lock().await;
        f(&mut order)
    }

    /// Locks the order for an operation that must await while holding it.
    pub async fn lock(&self) -> MutexGuard<'_, Order> {
        self.order.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crema_core::PaymentMethod;

    #[tokio::test]
    async fn test_clones_share_the_order() {
        let state = OrderState::new();
        let other = state.clone();

        state
            .with_order_mut(|o| o.set_payment_method(PaymentMethod::Cash))
            .await;
        let method = other.with_order(|o| o.payment_method()).await;
        assert_eq!(method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_lock_gives_mutable_access() {
        let state = OrderState::new();
        {
            let mut order = state.lock().await;
            order.set_customer(Some("c-1001".to_string()));
        }
        let customer = state
            .with_order(|o| o.customer_id().map(str::to_string))
            .await;
        assert_eq!(customer.as_deref(), Some("c-1001"));
    }
}
