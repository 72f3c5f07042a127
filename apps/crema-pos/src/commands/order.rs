//! # Order Commands
//!
//! Commands for ringing up an order.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Order │────►│ Customer │────►│ Completed│       │
//! │  │  Order   │     │          │     │ + Payment│     │  Order   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  │             │
//! │                   add_to_order                        checkout          │
//! │                   update_quantity                   (purchase recorded  │
//! │                   customize_item                     for the customer)  │
//! │                   remove_from_order                                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_order ─────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crema_core::{
    CompletedOrder, CoreError, ItemOptions, LineItem, Order, OrderTotals, PaymentMethod,
};
use crema_store::Receipt;

use crate::error::ApiError;
use crate::state::{ConfigState, OrderState, StoreState};

/// Order response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub lines: Vec<LineItem>,
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    /// Total formatted for display, e.g. "$12.96".
    pub display_total: String,
}

impl OrderResponse {
    fn build(order: &Order, config: &ConfigState) -> Self {
        let totals = order.totals(config.tax_rate());
        OrderResponse {
            lines: order.lines().to_vec(),
            customer_id: order.customer_id().map(str::to_string),
            payment_method: order.payment_method(),
            display_total: config.format_currency(totals.total_cents),
            totals,
        }
    }
}

/// Checkout response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub store_name: String,
    #[serde(flatten)]
    pub receipt: Receipt,
    pub display_subtotal: String,
    pub display_tax: String,
    pub display_total: String,
}

/// Gets the current order.
///
/// ## Order Display
/// ```text
/// ┌────────────────────────────────────────────────────────────────┐
/// │  ORDER                                             2 lines     │
/// ├────────────────────────────────────────────────────────────────┤
/// │  Latte (large, oat)            x2                $12.00       │
/// │  Butter Croissant              x1                 $3.75       │
/// ├────────────────────────────────────────────────────────────────┤
/// │  Subtotal                                        $15.75       │
/// │  Tax (8%)                                         $1.26       │
/// │  TOTAL                                           $17.01       │
/// └────────────────────────────────────────────────────────────────┘
/// ```
pub async fn get_order(order: &OrderState, config: &ConfigState) -> OrderResponse {
    debug!("get_order command");
    order.with_order(|o| OrderResponse::build(o, config)).await
}

/// Adds one unit of a product.
///
/// Merges into an existing line only when the product and the options are
/// identical; otherwise a new line is created. Options default to a medium
/// with whole milk and no extras.
pub async fn add_to_order(
    store: &StoreState,
    order: &OrderState,
    config: &ConfigState,
    product_id: String,
    options: Option<ItemOptions>,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_order command");

    let product = store.inner().products().require(&product_id).await?;

    order
        .with_order_mut(|o| {
            o.add_item(&product, options.unwrap_or_default())?;
            Ok::<OrderResponse, CoreError>(OrderResponse::build(o, config))
        })
        .await
        .map_err(ApiError::from)
}

/// Changes a line's quantity by `delta`. Reaching zero removes the line.
pub async fn update_quantity(
    order: &OrderState,
    config: &ConfigState,
    line_id: String,
    delta: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(line_id = %line_id, delta, "update_quantity command");

    order
        .with_order_mut(|o| {
            o.update_quantity(&line_id, delta)?;
            Ok::<OrderResponse, CoreError>(OrderResponse::build(o, config))
        })
        .await
        .map_err(ApiError::from)
}

/// Replaces a line's size, milk and extras.
pub async fn customize_item(
    order: &OrderState,
    config: &ConfigState,
    line_id: String,
    options: ItemOptions,
) -> Result<OrderResponse, ApiError> {
    debug!(line_id = %line_id, ?options, "customize_item command");

    order
        .with_order_mut(|o| {
            o.apply_customization(&line_id, options)?;
            Ok::<OrderResponse, CoreError>(OrderResponse::build(o, config))
        })
        .await
        .map_err(ApiError::from)
}

pub async fn remove_from_order(
    order: &OrderState,
    config: &ConfigState,
    line_id: String,
) -> Result<OrderResponse, ApiError> {
    debug!(line_id = %line_id, "remove_from_order command");

    order
        .with_order_mut(|o| {
            o.remove_item(&line_id)?;
            Ok::<OrderResponse, CoreError>(OrderResponse::build(o, config))
        })
        .await
        .map_err(ApiError::from)
}

/// Attaches or detaches the loyalty customer.
///
/// Only active customers can be attached.
pub async fn set_order_customer(
    store: &StoreState,
    order: &OrderState,
    config: &ConfigState,
    customer_id: Option<String>,
) -> Result<OrderResponse, ApiError> {
    debug!(customer_id = ?customer_id, "set_order_customer command");

    let customer_id = customer_id.filter(|id| !id.trim().is_empty());
    if let Some(id) = &customer_id {
        let customer = store.inner().customers().require(id).await?;
        if !customer.is_active {
            return Err(ApiError::field("customerId", "customer is inactive"));
        }
    }

    Ok(order
        .with_order_mut(|o| {
            o.set_customer(customer_id);
            OrderResponse::build(o, config)
        })
        .await)
}

pub async fn set_payment_method(
    order: &OrderState,
    config: &ConfigState,
    method: PaymentMethod,
) -> OrderResponse {
    debug!(?method, "set_payment_method command");

    order
        .with_order_mut(|o| {
            o.set_payment_method(method);
            OrderResponse::build(o, config)
        })
        .await
}

/// Empties the order, customer and payment method.
pub async fn clear_order(order: &OrderState, config: &ConfigState) -> OrderResponse {
    debug!("clear_order command");

    order
        .with_order_mut(|o| {
            o.clear();
            OrderResponse::build(o, config)
        })
        .await
}

/// Completes the order.
///
/// The order stays locked for the whole checkout. On failure it is left
/// exactly as it was.
pub async fn checkout(
    store: &StoreState,
    order: &OrderState,
    config: &ConfigState,
) -> Result<ReceiptResponse, ApiError> {
    debug!("checkout command");

    let mut current = order.lock().await;
    let receipt = store.inner().checkout(&mut current, config.tax_rate()).await?;
    drop(current);

    let totals = receipt.order.totals;
    Ok(ReceiptResponse {
        store_name: config.store_name.clone(),
        display_subtotal: config.format_currency(totals.subtotal_cents),
        display_tax: config.format_currency(totals.tax_cents),
        display_total: config.format_currency(totals.total_cents),
        receipt,
    })
}

pub async fn list_completed_orders(store: &StoreState) -> Vec<CompletedOrder> {
    store.inner().completed_orders().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crema_core::{Milk, Size};
    use crema_store::{Store, StoreConfig};

    async fn setup() -> (StoreState, OrderState, ConfigState) {
        let store = Store::new(StoreConfig::new()).await.unwrap();
        (StoreState::new(store), OrderState::new(), ConfigState::default())
    }

    #[tokio::test]
    async fn test_latte_scenario() {
        let (store, order, config) = setup().await;

        let resp = add_to_order(&store, &order, &config, "p-latte".to_string(), None)
            .await
            .unwrap();
        let line_id = resp.lines[0].line_id.clone();

        let options = ItemOptions::new(Size::Large, Milk::Oat, Vec::<String>::new());
        customize_item(&order, &config, line_id.clone(), options)
            .await
            .unwrap();
        let resp = update_quantity(&order, &config, line_id, 1).await.unwrap();

        assert_eq!(resp.lines[0].unit_price_cents, 600);
        assert_eq!(resp.totals.subtotal_cents, 1200);
        assert_eq!(resp.totals.tax_cents, 96);
        assert_eq!(resp.totals.total_cents, 1296);
        assert_eq!(resp.display_total, "$12.96");
    }

    #[tokio::test]
    async fn test_same_product_same_options_merges() {
        let (store, order, config) = setup().await;
        add_to_order(&store, &order, &config, "p-espresso".to_string(), None)
            .await
            .unwrap();
        let resp = add_to_order(&store, &order, &config, "p-espresso".to_string(), None)
            .await
            .unwrap();
        assert_eq!(resp.lines.len(), 1);
        assert_eq!(resp.lines[0].quantity, 2);

        let oat = ItemOptions::new(Size::Medium, Milk::Oat, Vec::<String>::new());
        let resp = add_to_order(&store, &order, &config, "p-espresso".to_string(), Some(oat))
            .await
            .unwrap();
        assert_eq!(resp.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_and_unknown_products() {
        let (store, order, config) = setup().await;

        let err = add_to_order(&store, &order, &config, "p-pumpkin".to_string(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field_errors[0].field, "productId");

        let err = add_to_order(&store, &order, &config, "p-nope".to_string(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_line_reported() {
        let (_, order, config) = setup().await;
        let err = remove_from_order(&order, &config, "missing".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_inactive_customer_cannot_be_attached() {
        let (store, order, config) = setup().await;
        let err = set_order_customer(&store, &order, &config, Some("c-1004".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.field_errors[0].field, "customerId");

        let resp = set_order_customer(&store, &order, &config, Some("c-1001".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.customer_id.as_deref(), Some("c-1001"));
    }

    #[tokio::test]
    async fn test_checkout_resets_order_and_credits_points() {
        let (store, order, config) = setup().await;
        add_to_order(&store, &order, &config, "p-latte".to_string(), None)
            .await
            .unwrap();
        set_order_customer(&store, &order, &config, Some("c-1002".to_string()))
            .await
            .unwrap();

        let err = checkout(&store, &order, &config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(get_order(&order, &config).await.lines.len(), 1);

        set_payment_method(&order, &config, PaymentMethod::Cash).await;
        let receipt = checkout(&store, &order, &config).await.unwrap();

        // 450 + 8% = 486 → 5 points
        assert_eq!(receipt.receipt.order.totals.total_cents, 486);
        assert_eq!(receipt.receipt.points_balance, Some(5));
        assert_eq!(receipt.display_total, "$4.86");
        assert!(get_order(&order, &config).await.lines.is_empty());
        assert_eq!(list_completed_orders(&store).await.len(), 1);
    }
}
