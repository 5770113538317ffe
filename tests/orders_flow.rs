mod common;

use common::{admin, payment_callback, test_state, user};
use kiko_storefront_api::{
    error::AppError,
    models::OrderStatus,
    routes::admin::UpdateOrderStatusRequest,
    services::{admin_service, order_service},
    store::OrderRepository,
};

// Integration flow: payment callback persists an order once; the owner sees
// it; an admin walks it through the status lifecycle and deletes it.
#[tokio::test]
async fn payment_callback_to_admin_lifecycle_flow() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = test_state(dir.path());

    // Valid callback persists a pending order.
    let resp = order_service::complete_payment(&state, payment_callback("order_1", "pay_1", "u1"))
        .await
        .expect("valid signature should persist the order");
    let order = resp.data.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 4999.0);
    assert_eq!(order.currency, "USD");
    assert_eq!(order.created_at, order.updated_at);

    // Replaying the same payment id returns the stored record, no duplicate.
    let replay =
        order_service::complete_payment(&state, payment_callback("order_1", "pay_1", "u1")).await?;
    assert_eq!(replay.message, "Order already exists");
    assert_eq!(replay.data.unwrap().id, order.id);
    assert_eq!(state.orders.list().await?.len(), 1);

    // A second user's order, then per-user filtering newest-first.
    order_service::complete_payment(&state, payment_callback("order_2", "pay_2", "u2")).await?;
    let mine = order_service::list_user_orders(&state, &user("u1")).await?;
    let mine = mine.data.unwrap().items;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].order.order_id, "order_1");
    assert_eq!(mine[0].status_text, "Pending");

    // Admin lists everything, newest first.
    let all = admin_service::list_all_orders(&state, &admin()).await?;
    let all = all.data.unwrap().items;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].order_id, "order_2");
    assert_eq!(all[1].order_id, "order_1");

    // Status round-trip: shipped, updated_at strictly newer, created_at kept.
    let updated = admin_service::update_order_status(
        &state,
        &admin(),
        "order_1",
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await?;
    let updated = updated.data.unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert!(updated.updated_at > order.updated_at);
    assert_eq!(updated.created_at, order.created_at);

    let fetched = admin_service::get_order(&state, &admin(), "order_1").await?;
    assert_eq!(fetched.data.unwrap().status, OrderStatus::Shipped);

    // Unconstrained transitions: cancelled orders may come back.
    for status in ["cancelled", "pending"] {
        let resp = admin_service::update_order_status(
            &state,
            &admin(),
            "order_1",
            UpdateOrderStatusRequest {
                status: status.into(),
            },
        )
        .await?;
        assert_eq!(resp.data.unwrap().status.as_str(), status);
    }

    // Delete, then the read surface reports the miss.
    admin_service::delete_order(&state, &admin(), "order_1").await?;
    let missing = admin_service::get_order(&state, &admin(), "order_1").await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    assert_eq!(state.orders.list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn invalid_signature_persists_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = test_state(dir.path());

    let mut callback = payment_callback("order_1", "pay_1", "u1");
    callback.signature = "0badc0de".into();

    let err = order_service::complete_payment(&state, callback)
        .await
        .expect_err("forged signature must be rejected");
    assert!(matches!(err, AppError::InvalidSignature));
    assert!(state.orders.list().await?.is_empty());

    // A signature minted for different identifiers fails too.
    let mut crossed = payment_callback("order_1", "pay_1", "u1");
    crossed.signature = common::sign("order_1", "pay_2");
    let err = order_service::complete_payment(&state, crossed)
        .await
        .expect_err("signature over other identifiers must be rejected");
    assert!(matches!(err, AppError::InvalidSignature));
    assert!(state.orders.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn admin_routes_reject_non_admins() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = test_state(dir.path());

    let err = admin_service::list_all_orders(&state, &user("u1"))
        .await
        .expect_err("plain users must not see the admin dashboard");
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn admin_mutations_of_missing_orders_are_silent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = test_state(dir.path());

    let resp = admin_service::update_order_status(
        &state,
        &admin(),
        "order_404",
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await?;
    assert_eq!(resp.message, "Order status updated");
    assert!(resp.data.is_none());

    let resp = admin_service::delete_order(&state, &admin(), "order_404").await?;
    assert_eq!(resp.message, "Order deleted");

    // An unknown status string is still a client error.
    let err = admin_service::update_order_status(
        &state,
        &admin(),
        "order_404",
        UpdateOrderStatusRequest {
            status: "teleported".into(),
        },
    )
    .await
    .expect_err("unknown status must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn invoice_is_scoped_to_the_owner() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = test_state(dir.path());

    order_service::complete_payment(&state, payment_callback("order_1", "pay_1", "u1")).await?;

    let invoice = order_service::invoice(&state, &user("u1"), "order_1").await?;
    assert!(invoice.contains("Order ID: order_1"));
    assert!(invoice.contains("Total: 4999.00 USD"));

    let err = order_service::invoice(&state, &user("u2"), "order_1")
        .await
        .expect_err("someone else's invoice must not be served");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}
