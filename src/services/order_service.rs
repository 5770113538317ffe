use crate::{
    dto::orders::{
        CompletePaymentRequest, CreateGatewayOrderRequest, GatewayOrderHandle, UserOrder,
        UserOrderList,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    state::AppState,
    store::NewOrder,
};

/// Mints a remote order at the payment gateway and hands the browser what it
/// needs to open the checkout widget. Payment itself happens out of band,
/// directly between the browser and the gateway.
pub async fn create_gateway_order(
    state: &AppState,
    payload: CreateGatewayOrderRequest,
) -> AppResult<ApiResponse<GatewayOrderHandle>> {
    let amount = payload
        .amount
        .filter(|a| *a > 0.0)
        .ok_or_else(|| AppError::BadRequest("Amount is required".into()))?;
    let currency = payload.currency.unwrap_or_else(|| "USD".to_string());
    let receipt = payload.receipt.unwrap_or_else(|| {
        format!("receipt_{}", state.clock.now().timestamp_millis())
    });
    let notes = payload.notes.unwrap_or_else(|| serde_json::json!({}));

    let remote = state
        .gateway
        .create_order(amount, &currency, receipt, notes)
        .await?;

    tracing::info!(order_id = %remote.id, amount = remote.amount, "gateway order minted");

    let handle = GatewayOrderHandle {
        order_id: remote.id,
        amount: remote.amount,
        currency: remote.currency,
        key: state.gateway.checkout_key().to_string(),
    };
    Ok(ApiResponse::success(
        "Gateway order created",
        handle,
        Some(Meta::empty()),
    ))
}

/// Payment callback: verify the signature, then persist the order exactly
/// once. A replayed callback for an already-stored payment id returns the
/// existing record untouched.
pub async fn complete_payment(
    state: &AppState,
    payload: CompletePaymentRequest,
) -> AppResult<ApiResponse<Order>> {
    if !state.gateway.signature_matches(
        &payload.gateway_order_id,
        &payload.gateway_payment_id,
        &payload.signature,
    ) {
        tracing::warn!(order_id = %payload.gateway_order_id, "payment signature mismatch");
        return Err(AppError::InvalidSignature);
    }

    if let Some(existing) = state
        .orders
        .find_by_payment_id(&payload.gateway_payment_id)
        .await?
    {
        return Ok(ApiResponse::success(
            "Order already exists",
            existing,
            Some(Meta::empty()),
        ));
    }

    let order = state
        .orders
        .create(NewOrder {
            order_id: payload.gateway_order_id,
            payment_id: payload.gateway_payment_id,
            user_id: payload.user_id,
            user_email: payload.user_email,
            user_name: payload.user_name,
            items: payload.items,
            shipping_address: payload.shipping_address,
            total_amount: payload.total_amount,
            currency: payload.currency.unwrap_or_else(|| "USD".to_string()),
            status: None,
        })
        .await?;

    tracing::info!(order_id = %order.order_id, payment_id = %order.payment_id, "order persisted");

    Ok(ApiResponse::success(
        "Order saved successfully",
        order,
        Some(Meta::empty()),
    ))
}

/// The caller's orders, newest first.
pub async fn list_user_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserOrderList>> {
    let mut orders = state.orders.list_by_user(&user.user_id).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let items: Vec<UserOrder> = orders.into_iter().map(UserOrder::from).collect();
    let meta = Meta::count(items.len() as i64);
    Ok(ApiResponse::success("Ok", UserOrderList { items }, Some(meta)))
}

/// Plain-text invoice for one of the caller's orders, keyed by gateway
/// order id.
pub async fn invoice(state: &AppState, user: &AuthUser, order_id: &str) -> AppResult<String> {
    let order = state
        .orders
        .find_by_order_id(order_id)
        .await?
        .filter(|o| o.user_id == user.user_id)
        .ok_or(AppError::NotFound)?;

    Ok(render_invoice(&order))
}

fn render_invoice(order: &Order) -> String {
    let mut lines = vec![
        "KIKO ROBOT INVOICE".to_string(),
        "==================".to_string(),
        format!("Invoice: {}", build_invoice_number(order)),
        format!("Order ID: {}", order.order_id),
        format!("Date: {}", order.created_at.format("%Y-%m-%d")),
        String::new(),
        "Items:".to_string(),
    ];
    for item in &order.items {
        lines.push(format!(
            "- {} x{} @ {:.2} {}",
            item.name, item.quantity, item.price, order.currency
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Total: {:.2} {}",
        order.total_amount, order.currency
    ));
    lines.push(String::new());
    lines.push("Thank you for your purchase!".to_string());
    lines.join("\n")
}

fn build_invoice_number(order: &Order) -> String {
    let date = order.created_at.format("%Y%m%d");
    let suffix = order.id.to_string();
    let short = &suffix[..8];
    format!("INV-{}-{}", date, short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus, ShippingAddress};
    use chrono::TimeZone;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn invoice_carries_number_items_and_total() {
        let created = Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap();
        let order = Order {
            id: Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap(),
            order_id: "order_9".into(),
            payment_id: "pay_9".into(),
            user_id: "u1".into(),
            user_email: "buyer@example.com".into(),
            user_name: "Buyer".into(),
            items: vec![OrderItem {
                id: "founder-edition".into(),
                name: "KIKO Robot Founder Edition".into(),
                price: 4999.0,
                quantity: 1,
            }],
            shipping_address: ShippingAddress {
                full_name: "Buyer".into(),
                email: "buyer@example.com".into(),
                phone: "+1 555 0100".into(),
                address: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                country: "US".into(),
                postal_code: "62701".into(),
            },
            total_amount: 4999.0,
            currency: "USD".into(),
            status: OrderStatus::Pending,
            created_at: created,
            updated_at: created,
        };

        let text = render_invoice(&order);
        assert!(text.contains("Invoice: INV-20240615-a1b2c3d4"));
        assert!(text.contains("Order ID: order_9"));
        assert!(text.contains("KIKO Robot Founder Edition"));
        assert!(text.contains("Total: 4999.00 USD"));
    }
}
