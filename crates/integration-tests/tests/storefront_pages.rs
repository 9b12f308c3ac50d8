//! Home page, menu filtering, health and response headers.

use jyoti_integration_tests::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = TestApp::offline().await;
    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_home_page_renders_shop_menu_and_greeting() {
    let app = TestApp::offline().await;

    let resp = app.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("jyoti_session="))
    );

    let body = resp.text().await.expect("body");
    assert!(body.contains(jyoti_core::SHOP.name));
    assert!(body.contains("Our Best Sellers"));
    assert!(body.contains("Premium Kaju Katli"));
    assert!(body.contains(jyoti_core::chat::GREETING));
    assert!(body.contains("Ask for recommendations..."));
}

#[tokio::test]
async fn test_menu_category_filter() {
    let app = TestApp::offline().await;

    let body = app
        .get("/menu?category=bengali")
        .await
        .text()
        .await
        .expect("body");
    assert!(body.contains("Saffron Rasmalai"));
    assert!(!body.contains("Special Paneer Samosa"));
    assert!(body.contains(r#"class="tab active""#));
}

#[tokio::test]
async fn test_menu_search_is_case_insensitive() {
    let app = TestApp::offline().await;

    let body = app.get("/menu?q=KAJU").await.text().await.expect("body");
    assert!(body.contains("Premium Kaju Katli"));
    assert!(!body.contains("Masala Chai"));
}

#[tokio::test]
async fn test_menu_without_matches_shows_empty_state() {
    let app = TestApp::offline().await;

    let body = app
        .get("/menu?category=all&q=biryani")
        .await
        .text()
        .await
        .expect("body");
    assert!(body.contains("No delights found matching your taste."));
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let app = TestApp::offline().await;

    assert_eq!(
        app.get("/menu?category=desserts").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        app.get("/api/menu?category=desserts").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_api_menu_json() {
    let app = TestApp::offline().await;

    let all = app.get_json("/api/menu").await;
    assert_eq!(all["category"], "all");
    let total = all["products"].as_array().map_or(0, Vec::len);
    assert_eq!(total, jyoti_core::catalog::catalog().len());

    let breakfast = app.get_json("/api/menu?category=breakfast&q=%20chai%20").await;
    assert_eq!(breakfast["category"], "breakfast");
    assert_eq!(breakfast["search"], "chai");
    let products = &breakfast["products"];
    assert_eq!(products.as_array().map(Vec::len), Some(1));
    assert_eq!(products[0]["id"], "b3");
    assert_eq!(products[0]["price"], "20");
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let app = TestApp::offline().await;

    let resp = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "test-request-1")
        .send()
        .await
        .expect("request");

    let headers = resp.headers();
    assert_eq!(
        headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("test-request-1")
    );
    assert_eq!(
        headers.get("x-frame-options").and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    assert!(
        headers
            .get("content-security-policy")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("default-src 'none'"))
    );

    let generated = app.get("/health").await;
    assert!(generated.headers().get("x-request-id").is_some());
}
