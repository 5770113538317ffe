use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    dto::orders::{
        CompletePaymentRequest, CreateGatewayOrderRequest, GatewayOrderHandle, UserOrderList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gateway", post(create_gateway_order))
        .route("/", post(complete_payment))
        .route("/mine", get(list_my_orders))
        .route("/{id}/invoice", get(download_invoice))
}

#[utoipa::path(
    post,
    path = "/api/orders/gateway",
    request_body = CreateGatewayOrderRequest,
    responses(
        (status = 200, description = "Gateway order minted", body = ApiResponse<GatewayOrderHandle>),
        (status = 400, description = "Amount missing or not positive"),
        (status = 500, description = "Gateway failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_gateway_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateGatewayOrderRequest>,
) -> AppResult<Json<ApiResponse<GatewayOrderHandle>>> {
    let resp = order_service::create_gateway_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CompletePaymentRequest,
    responses(
        (status = 200, description = "Order persisted (idempotent on payment id)", body = ApiResponse<Order>),
        (status = 400, description = "Invalid payment signature"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn complete_payment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CompletePaymentRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::complete_payment(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/mine",
    responses(
        (status = 200, description = "Caller's orders, newest first", body = ApiResponse<UserOrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserOrderList>>> {
    let resp = order_service::list_user_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/invoice",
    params(("id" = String, Path, description = "Gateway order id")),
    responses(
        (status = 200, description = "Plain-text invoice", body = String),
        (status = 404, description = "Not the caller's order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn download_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let invoice = order_service::invoice(&state, &user, &id).await?;
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"invoice-{id}.txt\""),
        ),
    ];
    Ok((headers, invoice).into_response())
}
