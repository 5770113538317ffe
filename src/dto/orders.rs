use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, ShippingAddress};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGatewayOrderRequest {
    /// Total to collect, in major currency units.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub notes: Option<serde_json::Value>,
}

/// What the browser needs to open the gateway's checkout widget.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderHandle {
    pub order_id: String,
    /// Minor currency units, as the gateway reports it.
    pub amount: i64,
    pub currency: String,
    pub key: String,
}

/// Payment callback payload forwarded by the browser after the gateway's
/// widget completes.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub total_amount: f64,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// An order as shown to its owner, with the display label derived from the
/// raw status.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOrder {
    #[serde(flatten)]
    pub order: Order,
    pub status_text: String,
}

impl From<Order> for UserOrder {
    fn from(order: Order) -> Self {
        let status_text = order.status.label().to_string();
        Self { order, status_text }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserOrderList {
    pub items: Vec<UserOrder>,
}
