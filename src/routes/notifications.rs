use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::notifications::{ContactRequest, FeedbackRequest, NotificationReceipt},
    error::AppResult,
    response::ApiResponse,
    services::notification_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_contact))
        .route("/feedback", post(submit_feedback))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Email sent", body = ApiResponse<NotificationReceipt>),
        (status = 400, description = "Name, email, or message missing"),
        (status = 500, description = "Provider failure (payload archived locally)"),
    ),
    tag = "Notifications"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<Json<ApiResponse<NotificationReceipt>>> {
    let resp = notification_service::send_contact(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback sent", body = ApiResponse<NotificationReceipt>),
        (status = 400, description = "Feature or description missing"),
        (status = 500, description = "Provider failure (payload archived locally)"),
    ),
    tag = "Notifications"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackRequest>,
) -> AppResult<Json<ApiResponse<NotificationReceipt>>> {
    let resp = notification_service::send_feedback(&state, payload).await?;
    Ok(Json(resp))
}
