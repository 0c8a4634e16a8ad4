//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET  /api/products            - All products
//! GET  /api/products/{slug}     - Product detail
//! GET  /api/categories          - Categories in display order
//! GET  /api/hero-images         - Landing page hero carousel
//! GET  /api/services            - Service offerings
//! GET  /api/mockups             - Mockup gallery
//! GET  /api/core-values         - Core value cards
//! GET  /api/site-settings       - Site settings singleton
//! GET  /api/promotions          - Promotions inside their date window
//! GET  /api/promotions/banner   - The one promotion active today
//! GET  /api/discounts           - Corporate volume discount tiers
//! GET  /api/corporate-pricing   - Corporate price list
//!
//! # Cart (session-backed)
//! GET  /api/cart                - Current cart contents
//! POST /api/cart/add            - Add an item
//! POST /api/cart/update         - Set a line's quantity
//! POST /api/cart/remove         - Remove a line
//! POST /api/cart/clear          - Empty the cart
//!
//! # Checkout
//! POST /api/checkout            - Place an order from the session cart
//!
//! # Mailing list
//! POST     /api/subscribe       - Join the mailing list
//! GET|POST /api/campaign/send   - Send the campaign template to subscribers
//! POST     /api/newsletter/send - Dispatch a newsletter (CORS-open for the studio)
//! ```
//!
//! Write endpoints answer a wrong method with a JSON 405 body so callers
//! always get `{"error": ...}` back, never a bare status.

pub mod campaign;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod newsletter;
pub mod subscribe;

use axum::{
    Router,
    http::{Method, StatusCode, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;
use crate::state::AppState;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Non-preflight OPTIONS probes get a plain 200; real preflights are
/// answered by the CORS layer before they reach the handler.
async fn newsletter_preflight() -> StatusCode {
    StatusCode::OK
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::products))
        .route("/products/{slug}", get(catalog::product_by_slug))
        .route("/categories", get(catalog::categories))
        .route("/hero-images", get(catalog::hero_images))
        .route("/services", get(catalog::services))
        .route("/mockups", get(catalog::mockups))
        .route("/core-values", get(catalog::core_values))
        .route("/site-settings", get(catalog::site_settings))
        .route("/promotions", get(catalog::promotions))
        .route("/promotions/banner", get(catalog::promotion_banner))
        .route("/discounts", get(catalog::corporate_discounts))
        .route("/corporate-pricing", get(catalog::corporate_pricing))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    // The newsletter dispatch is called cross-origin from the content
    // studio, so it alone carries permissive CORS.
    let newsletter_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", catalog_routes())
        .nest("/api/cart", cart_routes())
        .route(
            "/api/checkout",
            post(checkout::place_order).fallback(method_not_allowed),
        )
        .route(
            "/api/subscribe",
            post(subscribe::subscribe).fallback(method_not_allowed),
        )
        .route(
            "/api/campaign/send",
            get(campaign::send_campaign)
                .post(campaign::send_campaign)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/newsletter/send",
            post(newsletter::send_newsletter)
                .options(newsletter_preflight)
                .fallback(method_not_allowed)
                .layer(newsletter_cors),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::Request,
        response::Response,
    };
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ContentStoreConfig, EmailJsConfig, StorefrontConfig};
    use crate::middleware::create_session_layer;
    use crate::middleware::session::SESSION_COOKIE_NAME;
    use crate::testing::{RecordedRequest, RecordingServer};

    fn base_config(content_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            content: ContentStoreConfig {
                project_id: "x7fgqy6f".to_string(),
                dataset: "production".to_string(),
                api_version: "2024-01-01".to_string(),
                token: None,
                api_url: content_url.to_string(),
            },
            emailjs: None,
            resend: None,
            redis_url: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    fn config_with_order_email(content_url: &str, emailjs_url: &str) -> StorefrontConfig {
        let mut config = base_config(content_url);
        config.content.token = Some(SecretString::from("skBq7LmXw93ZtRfVpYcD41NhJe"));
        config.emailjs = Some(EmailJsConfig {
            service_id: "service_amara".to_string(),
            public_key: "pk_7f2kQx".to_string(),
            order_template_id: Some("template_order".to_string()),
            campaign_template_id: None,
            order_recipient: "orders@amarathreads.com".to_string(),
            api_url: emailjs_url.to_string(),
        });
        config
    }

    async fn app(config: StorefrontConfig) -> Router {
        let state = AppState::new(config).await.unwrap();
        let session_layer = create_session_layer(state.config());
        routes().layer(session_layer).with_state(state)
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn bare_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn read_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn session_cookie(response: &Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie must be set")
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    fn shirt_add_body(quantity: u32) -> Value {
        json!({
            "productId": "prod-shirt",
            "variantKey": "v1",
            "name": "Ankara Shirt",
            "price": 2500,
            "image": "https://cdn.example.com/shirt.jpg",
            "size": "M",
            "color": "Indigo",
            "maxStock": 5,
            "quantity": quantity
        })
    }

    #[tokio::test]
    async fn test_wrong_method_gets_the_json_405_body() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        for uri in [
            "/api/subscribe",
            "/api/checkout",
            "/api/newsletter/send",
        ] {
            let response = app
                .clone()
                .oneshot(bare_request(Method::DELETE, uri))
                .await
                .unwrap();
            let (status, body) = read_json(response).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
            assert_eq!(body["error"], "Method not allowed", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_storage_check_precedes_email_validation() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        // No email in the body, yet the unconfigured store answers first.
        let response = app
            .oneshot(json_request(Method::POST, "/api/subscribe", &json!({})))
            .await
            .unwrap();

        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Storage is not configured on the server.");
    }

    #[tokio::test]
    async fn test_campaign_without_store_is_unconfigured_on_both_methods() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        for method in [Method::GET, Method::POST] {
            let response = app
                .clone()
                .oneshot(bare_request(method.clone(), "/api/campaign/send"))
                .await
                .unwrap();
            let (status, body) = read_json(response).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method}");
            assert_eq!(body["error"], "Storage is not configured on the server.");
        }
    }

    #[tokio::test]
    async fn test_newsletter_route_is_cors_open() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        // Bare OPTIONS probe (not a preflight) answers 200.
        let response = app
            .clone()
            .oneshot(bare_request(Method::OPTIONS, "/api/newsletter/send"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Cross-origin POST carries the allow-origin header even on errors.
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/newsletter/send")
            .header(header::ORIGIN, "https://studio.amarathreads.com")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"newsletterId": "nl-1"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "CONTENT_API_TOKEN not configured");
    }

    #[tokio::test]
    async fn test_product_detail_404_and_list_passthrough() {
        let content = RecordingServer::spawn(|_: &RecordedRequest| {
            (StatusCode::OK, json!({"result": null}))
        })
        .await;
        let app = app(base_config(&content.base_url)).await;

        let response = app
            .clone()
            .oneshot(bare_request(Method::GET, "/api/products/ghost-shirt"))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");

        let response = app
            .oneshot(bare_request(Method::GET, "/api/products"))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_cart_survives_across_requests_via_the_session_cookie() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cart/add", &shirt_add_body(2)))
            .await
            .unwrap();
        let cookie = session_cookie(&response);
        assert!(cookie.starts_with(SESSION_COOKIE_NAME));
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["cartOpen"], true);
        assert_eq!(body["totalItems"], 2);

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/cart")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["id"], "prod-shirt-M-Indigo");
        assert_eq!(body["items"][0]["quantity"], 2);

        // A request without the cookie sees a fresh cart.
        let response = app
            .oneshot(bare_request(Method::GET, "/api/cart"))
            .await
            .unwrap();
        let (_, body) = read_json(response).await;
        assert_eq!(body["totalItems"], 0);
    }

    #[tokio::test]
    async fn test_cart_ceiling_rejection_over_the_wire() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cart/add", &shirt_add_body(4)))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/cart/add")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(serde_json::to_vec(&shirt_add_body(2)).unwrap()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Cannot add more - only 5 available!");
        assert_eq!(body["totalItems"], 4);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_never_reaches_a_collaborator() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/checkout",
                &json!({"name": "Wanjiru Maina", "phone": "+254 712 345678", "address": "Nairobi"}),
            ))
            .await
            .unwrap();

        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cart is empty");
    }

    #[tokio::test]
    async fn test_checkout_requires_the_contact_fields() {
        let app = app(base_config("http://127.0.0.1:1")).await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cart/add", &shirt_add_body(1)))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/checkout")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                r#"{"name": "Wanjiru Maina", "phone": "   ", "address": "Nairobi"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Please fill in all required fields (Name, Phone, and Address)."
        );
    }

    #[tokio::test]
    async fn test_full_checkout_path_commits_and_clears_the_cart() {
        let content = RecordingServer::spawn(|request: &RecordedRequest| {
            if request.path.contains("/data/mutate/") {
                return (StatusCode::OK, json!({"transactionId": "t1"}));
            }
            let query = request.query.as_deref().unwrap_or("");
            if query.contains("promotion") {
                (StatusCode::OK, json!({"result": []}))
            } else {
                (
                    StatusCode::OK,
                    json!({"result": {"variants": [
                        {"_key": "v1", "size": "M", "color": "Indigo", "colorHex": null, "stock": 5}
                    ]}}),
                )
            }
        })
        .await;
        let mail = RecordingServer::spawn(|_: &RecordedRequest| {
            (StatusCode::OK, json!({"status": "OK"}))
        })
        .await;

        let app = app(config_with_order_email(&content.base_url, &mail.base_url)).await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cart/add", &shirt_add_body(2)))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/checkout")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(
                serde_json::to_vec(&json!({
                    "name": "Wanjiru Maina",
                    "phone": "+254 712 345678",
                    "address": "123 Biashara Street, Nairobi"
                }))
                .unwrap(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "Order placed successfully! We'll contact you shortly."
        );

        // Exactly one order email, addressed to the configured inbox.
        let sends = mail.requests();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].body["service_id"], "service_amara");
        assert_eq!(sends[0].body["template_id"], "template_order");
        let params = &sends[0].body["template_params"];
        assert_eq!(params["to_email"], "orders@amarathreads.com");
        assert_eq!(params["company"], "Individual Order");
        let message = params["message"].as_str().unwrap();
        assert!(message.contains("NEW INDIVIDUAL ORDER"));
        assert!(message.contains("\u{2022} Ankara Shirt (M, Indigo) x2 - KSh 5,000"));

        // Promotions read, variants read, then the stock write.
        let content_requests = content.requests();
        assert_eq!(content_requests.len(), 3);
        let patch = &content_requests[2].body["mutations"][0]["patch"];
        assert_eq!(patch["id"], "prod-shirt");
        assert_eq!(patch["set"]["variants"][0]["stock"], 3);

        // The committed cart is gone from the session.
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/cart")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let (_, body) = read_json(response).await;
        assert_eq!(body["totalItems"], 0);
        assert_eq!(body["items"], json!([]));
    }
}
