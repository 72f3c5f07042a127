//! # Command Protocol
//!
//! Request and response envelopes for the JSON-lines command channel.
//!
//! ## Wire Format
//! One JSON object per line in each direction. Commands are an adjacently
//! tagged enum:
//! ```json
//! {"id": 7, "cmd": "add_to_order", "args": {"productId": "p-latte"}}
//! ```
//! and every request gets exactly one response line echoing its `id`:
//! ```json
//! {"id": 7, "ok": true, "data": { ... }}
//! {"id": 7, "ok": false, "error": {"code": "NOT_FOUND", ...}}
//! ```
//!
//! Commands without arguments may omit `args`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crema_core::{
    CustomerPatch, InventoryDraft, ItemOptions, PaymentMethod, StaffPatch, TransactionDraft,
    TransactionType,
};
use crema_store::{NewCustomer, NewFeedback, NewInventoryItem, NewShift, NewStaff};

use crate::error::ApiError;

// =============================================================================
// Request
// =============================================================================

/// One request line.
#[derive(Debug, Clone)]
pub struct Request {
    /// Correlation id chosen by the caller, echoed back untouched.
    pub id: Value,
    pub command: Command,
}

/// A line that could not be turned into a [`Request`].
///
/// Keeps whatever `id` could be recovered so the error can still be
/// correlated.
#[derive(Debug)]
pub struct BadRequest {
    pub id: Value,
    pub error: serde_json::Error,
}

impl Request {
    pub fn from_json(line: &str) -> Result<Self, BadRequest> {
        let mut value: Value = serde_json::from_str(line).map_err(|error| BadRequest {
            id: Value::Null,
            error,
        })?;
        let id = value
            .as_object_mut()
            .and_then(|obj| obj.remove("id"))
            .unwrap_or(Value::Null);

        match serde_json::from_value(value) {
            Ok(command) => Ok(Request { id, command }),
            Err(error) => Err(BadRequest { id, error }),
        }
    }
}

/// Every command the POS understands.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "cmd",
    content = "args",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    // =========================================================================
    // Order
    // =========================================================================
    GetOrder,
    AddToOrder {
        product_id: String,
        #[serde(default)]
        options: Option<ItemOptions>,
    },
    UpdateQuantity {
        line_id: String,
        delta: i64,
    },
    CustomizeItem {
        line_id: String,
        options: ItemOptions,
    },
    RemoveFromOrder {
        line_id: String,
    },
    SetOrderCustomer {
        #[serde(default)]
        customer_id: Option<String>,
    },
    SetPaymentMethod {
        method: PaymentMethod,
    },
    ClearOrder,
    Checkout,
    ListCompletedOrders,

    // =========================================================================
    // Products
    // =========================================================================
    ListProducts {
        #[serde(default)]
        available_only: bool,
    },
    SearchProducts {
        #[serde(default)]
        query: String,
        #[serde(default)]
        limit: Option<usize>,
    },
    GetProduct {
        id: String,
    },
    SetProductAvailable {
        id: String,
        available: bool,
    },

    // =========================================================================
    // Customers
    // =========================================================================
    ListCustomers {
        #[serde(default)]
        include_inactive: bool,
    },
    SearchCustomers {
        query: String,
    },
    GetCustomer {
        id: String,
    },
    CreateCustomer(NewCustomer),
    UpdateCustomer {
        id: String,
        patch: CustomerPatch,
    },
    RecomputePoints {
        id: String,
    },
    CheckPoints,

    // =========================================================================
    // Loyalty Transactions
    // =========================================================================
    ListTransactions {
        customer_id: String,
    },
    PreviewTransaction {
        draft: TransactionDraft,
    },
    SwitchTransactionType {
        draft: TransactionDraft,
        #[serde(rename = "type")]
        tx_type: TransactionType,
    },
    RecordTransaction {
        draft: TransactionDraft,
    },
    EditTransaction {
        id: String,
        draft: TransactionDraft,
    },
    DeleteTransaction {
        id: String,
    },

    // =========================================================================
    // Feedback
    // =========================================================================
    ListFeedback {
        #[serde(default)]
        customer_id: Option<String>,
    },
    CreateFeedback(NewFeedback),
    DeleteFeedback {
        id: String,
    },
    FeedbackSummary,

    // =========================================================================
    // Staff & Shifts
    // =========================================================================
    ListStaff {
        #[serde(default)]
        include_inactive: bool,
    },
    GetStaff {
        id: String,
    },
    CreateStaff(NewStaff),
    UpdateStaff {
        id: String,
        patch: StaffPatch,
    },
    ListShifts {
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default)]
        staff_id: Option<String>,
    },
    ScheduleShift(NewShift),
    UpdateShift {
        id: String,
        shift: NewShift,
    },
    DeleteShift {
        id: String,
    },

    // =========================================================================
    // Inventory
    // =========================================================================
    ListInventory {
        #[serde(default)]
        query: Option<String>,
    },
    LowStock,
    InventoryHistory {
        item_id: String,
    },
    AddInventoryItem(NewInventoryItem),
    RecordInventory {
        draft: InventoryDraft,
    },
    DeleteInventoryTransaction {
        id: String,
    },

    // =========================================================================
    // Config
    // =========================================================================
    GetConfig,
    SeedReport,
}

impl Command {
    /// Command name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetOrder => "get_order",
            Command::AddToOrder { .. } => "add_to_order",
            Command::UpdateQuantity { .. } => "update_quantity",
            Command::CustomizeItem { .. } => "customize_item",
            Command::RemoveFromOrder { .. } => "remove_from_order",
            Command::SetOrderCustomer { .. } => "set_order_customer",
            Command::SetPaymentMethod { .. } => "set_payment_method",
            Command::ClearOrder => "clear_order",
            Command::Checkout => "checkout",
            Command::ListCompletedOrders => "list_completed_orders",
            Command::ListProducts { .. } => "list_products",
            Command::SearchProducts { .. } => "search_products",
            Command::GetProduct { .. } => "get_product",
            Command::SetProductAvailable { .. } => "set_product_available",
            Command::ListCustomers { .. } => "list_customers",
            Command::SearchCustomers { .. } => "search_customers",
            Command::GetCustomer { .. } => "get_customer",
            Command::CreateCustomer(_) => "create_customer",
            Command::UpdateCustomer { .. } => "update_customer",
            Command::RecomputePoints { .. } => "recompute_points",
            Command::CheckPoints => "check_points",
            Command::ListTransactions { .. } => "list_transactions",
            Command::PreviewTransaction { .. } => "preview_transaction",
            Command::SwitchTransactionType { .. } => "switch_transaction_type",
            Command::RecordTransaction { .. } => "record_transaction",
            Command::EditTransaction { .. } => "edit_transaction",
            Command::DeleteTransaction { .. } => "delete_transaction",
            Command::ListFeedback { .. } => "list_feedback",
            Command::CreateFeedback(_) => "create_feedback",
            Command::DeleteFeedback { .. } => "delete_feedback",
            Command::FeedbackSummary => "feedback_summary",
            Command::ListStaff { .. } => "list_staff",
            Command::GetStaff { .. } => "get_staff",
            Command::CreateStaff(_) => "create_staff",
            Command::UpdateStaff { .. } => "update_staff",
            Command::ListShifts { .. } => "list_shifts",
            Command::ScheduleShift(_) => "schedule_shift",
            Command::UpdateShift { .. } => "update_shift",
            Command::DeleteShift { .. } => "delete_shift",
            Command::ListInventory { .. } => "list_inventory",
            Command::LowStock => "low_stock",
            Command::InventoryHistory { .. } => "inventory_history",
            Command::AddInventoryItem(_) => "add_inventory_item",
            Command::RecordInventory { .. } => "record_inventory",
            Command::DeleteInventoryTransaction { .. } => "delete_inventory_transaction",
            Command::GetConfig => "get_config",
            Command::SeedReport => "seed_report",
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// One response line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    pub fn success(id: Value, data: Value) -> Self {
        Response {
            id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(id: Value, error: ApiError) -> Self {
        Response {
            id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_command_without_args() {
        let req = Request::from_json(r#"{"id": 1, "cmd": "get_order"}"#).unwrap();
        assert!(matches!(req.command, Command::GetOrder));
        assert_eq!(req.id, 1);
    }

    #[test]
    fn test_struct_command_camel_case_args() {
        let req = Request::from_json(
            r#"{"id":"a","cmd":"update_quantity","args":{"lineId":"l-1","delta":-1}}"#,
        )
        .unwrap();
        match req.command {
            Command::UpdateQuantity { line_id, delta } => {
                assert_eq!(line_id, "l-1");
                assert_eq!(delta, -1);
            }
            other => panic!("unexpected command: {}", other.name()),
        }
    }

    #[test]
    fn test_patch_command() {
        let req = Request::from_json(
            r#"{"cmd":"update_staff","args":{"id":"s-03","patch":{"field":"emergencyContactName","value":"Ravi Shah"}}}"#,
        )
        .unwrap();
        assert_eq!(req.id, Value::Null);
        match req.command {
            Command::UpdateStaff { id, patch } => {
                assert_eq!(id, "s-03");
                assert_eq!(patch, StaffPatch::EmergencyContactName("Ravi Shah".to_string()));
            }
            other => panic!("unexpected command: {}", other.name()),
        }
    }

    #[test]
    fn test_newtype_command() {
        let req = Request::from_json(
            r#"{"cmd":"create_customer","args":{"firstName":"Mary","lastName":"Jackson","email":"mary@example.com"}}"#,
        )
        .unwrap();
        assert_eq!(req.command.name(), "create_customer");
    }

    #[test]
    fn test_unknown_command_keeps_id() {
        let bad = Request::from_json(r#"{"id":9,"cmd":"launch_rockets"}"#).unwrap_err();
        assert_eq!(bad.id, 9);

        let bad = Request::from_json("not json").unwrap_err();
        assert_eq!(bad.id, Value::Null);
    }

    #[test]
    fn test_response_shape() {
        let ok = Response::success(Value::from(3), serde_json::json!({"x": 1}));
        assert_eq!(ok.to_json().unwrap(), r#"{"id":3,"ok":true,"data":{"x":1}}"#);

        let err = Response::failure(Value::Null, ApiError::bad_request("nope"));
        let json: Value = serde_json::from_str(&err.to_json().unwrap()).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json.get("data").is_none());
    }
}
