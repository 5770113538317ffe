use std::str::FromStr;

use crate::{
    dto::orders::OrderList,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::admin::UpdateOrderStatusRequest,
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let mut orders = state.orders.list().await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let meta = Meta::count(orders.len() as i64);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = state
        .orders
        .find_by_order_id(order_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Order found", order, Some(Meta::empty())))
}

/// Sets the fulfilment status. Any known status may follow any other; an
/// unknown order id is answered with success and no data, matching the
/// store's silent no-op.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = OrderStatus::from_str(&payload.status)
        .map_err(|_| AppError::BadRequest("Invalid order status".into()))?;

    let updated = state.orders.update_status(order_id, status).await?;
    if updated.is_none() {
        tracing::debug!(order_id, "status update for unknown order ignored");
    }

    Ok(ApiResponse {
        message: "Order status updated".to_string(),
        data: updated,
        meta: Some(Meta::empty()),
    })
}

/// Hard delete. Silent success when the order does not exist.
pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    order_id: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let removed = state.orders.delete(order_id).await?;
    if !removed {
        tracing::debug!(order_id, "delete of unknown order ignored");
    }

    Ok(ApiResponse::success(
        "Order deleted",
        serde_json::json!({ "orderId": order_id }),
        Some(Meta::empty()),
    ))
}
