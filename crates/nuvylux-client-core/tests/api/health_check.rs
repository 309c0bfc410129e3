use nuvylux_test_helper::{no_cb, spawn_app};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn health_check_works() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.backend)
        .await;

    // Act
    let outcome = app.core_client.health_check(no_cb).await.unwrap();

    // Assert
    assert!(outcome.is_ok(), "{outcome:?}");
}

#[tokio::test]
async fn health_check_reports_server_error() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.backend)
        .await;

    // Act
    let outcome = app.core_client.health_check(no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "request failed with status code: 503 Service Unavailable and no body"
    );
    assert!(app.navigator.routes().is_empty());
}
