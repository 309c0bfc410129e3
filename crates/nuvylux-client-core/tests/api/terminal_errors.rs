use nuvylux_client_core::{GatewayError, NO_ARGUMENT};
use nuvylux_shared::{
    const_config::{path::PathSpec, route::ROUTE_LOGIN},
    session::SessionState,
};
use nuvylux_test_helper::{no_cb, spawn_app};
use reqwest::{Method, StatusCode};
use std::time::Duration;

#[tokio::test]
async fn forbidden_ends_session_without_refresh() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    app.mount_fixed(
        "/admin/users",
        403,
        serde_json::json!({"message": "Forbidden resource", "statusCode": 403}),
    )
    .await;
    app.mount_refresh_success(Duration::ZERO, 0).await;

    // Act
    let outcome = app
        .core_client
        .send_request_expect_json::<_, _, serde_json::Value>(
            PathSpec::new(Method::GET, "/admin/users"),
            NO_ARGUMENT,
            no_cb,
        )
        .await
        .unwrap();

    // Assert
    let err = outcome.unwrap_err();
    let gateway_error = err.downcast_ref::<GatewayError>().unwrap();
    assert!(gateway_error.is_terminal());
    assert_eq!(gateway_error.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(app.core_client.session().state(), SessionState::LoadedEmpty);
    assert_eq!(app.navigator.routes(), vec![ROUTE_LOGIN.to_string()]);
    app.backend.verify().await;
}

#[tokio::test]
async fn forbidden_payload_ends_session() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    app.mount_fixed("/products/p-1", 400, serde_json::json!({"error": "Forbidden"}))
        .await;

    // Act
    let outcome = app
        .core_client
        .send_request_expect_empty(
            PathSpec::new(Method::GET, "/products/p-1"),
            NO_ARGUMENT,
            no_cb,
        )
        .await
        .unwrap();

    // Assert
    assert!(outcome.is_err());
    assert!(!app.core_client.is_logged_in());
    assert_eq!(app.navigator.routes(), vec![ROUTE_LOGIN.to_string()]);
}

#[tokio::test]
async fn ordinary_errors_leave_session_alone() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    app.mount_fixed(
        "/products/missing",
        404,
        serde_json::json!({"message": "Product not found", "statusCode": 404}),
    )
    .await;

    // Act
    let outcome = app
        .core_client
        .send_request_expect_empty(
            PathSpec::new(Method::GET, "/products/missing"),
            NO_ARGUMENT,
            no_cb,
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Product not found");
    assert!(app.core_client.is_logged_in());
    assert!(app.navigator.routes().is_empty());
    assert_eq!(app.refresh_call_count().await, 0);
}
