use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        notifications::{ContactRequest, FeedbackRequest, NotificationReceipt},
        orders::{
            CompletePaymentRequest, CreateGatewayOrderRequest, GatewayOrderHandle, OrderList,
            UserOrder, UserOrderList,
        },
    },
    gateway::GatewayOrder,
    models::{Order, OrderItem, OrderStatus, ShippingAddress},
    response::{ApiResponse, Meta},
    routes::{admin, health, notifications, orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_gateway_order,
        orders::complete_payment,
        orders::list_my_orders,
        orders::download_invoice,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::delete_order,
        notifications::submit_contact,
        notifications::submit_feedback
    ),
    components(
        schemas(
            Order,
            OrderItem,
            OrderStatus,
            ShippingAddress,
            GatewayOrder,
            CreateGatewayOrderRequest,
            GatewayOrderHandle,
            CompletePaymentRequest,
            OrderList,
            UserOrder,
            UserOrderList,
            admin::UpdateOrderStatusRequest,
            ContactRequest,
            FeedbackRequest,
            NotificationReceipt,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<UserOrderList>,
            ApiResponse<GatewayOrderHandle>,
            ApiResponse<NotificationReceipt>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Checkout and order endpoints"),
        (name = "Admin", description = "Admin order dashboard endpoints"),
        (name = "Notifications", description = "Contact and feedback endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
