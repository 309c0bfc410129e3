use nuvylux_client_core::GatewayError;
use nuvylux_shared::{
    req_args::{ForgotPasswordReqArgs, RegisterReqArgs, ResetPasswordReqArgs},
    session::SessionState,
    uac::Role,
};
use nuvylux_test_helper::{no_cb, spawn_app, spawn_app_with};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn login_stores_user() {
    // Arrange
    let app = spawn_app().await;
    assert!(
        !app.core_client.is_logged_in(),
        "should not be logged in before logging in"
    );

    // Act
    let user = app.login().await.unwrap();

    // Assert
    assert_eq!(*user, app.test_user.summary());
    assert_eq!(
        app.core_client.session().state(),
        SessionState::Loaded(Arc::clone(&user))
    );
    assert_eq!(user.post_login_route(), "/dashboard/client");
}

#[tokio::test]
async fn login_sends_credentials() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": app.test_user.email,
            "password": app.test_user.password,
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"user": app.test_user.summary_json()})),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    // Act
    let outcome = app
        .core_client
        .login(app.test_user.login_args(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(outcome.is_ok(), "{outcome:?}");
    app.backend.verify().await;
}

#[tokio::test]
async fn login_failure_is_not_treated_as_expired_session() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Invalid credentials",
            "error": "Unauthorized",
            "statusCode": 401
        })))
        .mount(&app.backend)
        .await;
    app.mount_refresh_success(Duration::ZERO, 0).await;
    let login_args = app
        .test_user
        .login_args()
        .password("random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Invalid credentials");
    assert!(app.navigator.routes().is_empty());
    assert!(!app.core_client.is_logged_in());
    app.backend.verify().await;
}

#[tokio::test]
async fn ensure_call_back_is_run() {
    // Arrange
    let app = spawn_app().await;
    app.mount_login_success().await;
    let (flag_tx, flag_rx) = futures::channel::oneshot::channel();

    // Act
    app.core_client
        .login(app.test_user.login_args(), move || {
            let _ = flag_tx.send(true);
        })
        .await
        .expect("failed to receive from rx")
        .expect("failed to get result of login");

    // Assert
    let flag = tokio::time::timeout(Duration::from_secs(1), flag_rx)
        .await
        .expect("call back was not run in time")
        .expect("call back dropped without running");
    assert!(flag, "flag was not flipped");
}

#[tokio::test]
async fn register_sends_profile() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_partial_json(serde_json::json!({
            "email": "new.brand@example.com",
            "firstName": "Nova",
            "lastName": "Studio",
            "role": "BRAND",
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"message": "Check your inbox"})),
        )
        .expect(1)
        .mount(&app.backend)
        .await;
    let args = RegisterReqArgs {
        email: "new.brand@example.com".to_string(),
        password: "s3cret-pass".to_string().into(),
        first_name: "Nova".to_string(),
        last_name: "Studio".to_string(),
        role: Role::Brand,
    };

    // Act
    let outcome = app.core_client.register(args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap().message, "Check your inbox");
    assert!(!app.core_client.is_logged_in());
    app.backend.verify().await;
}

#[tokio::test]
async fn register_validation_errors_are_joined() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": ["email must be an email", "password is too short"],
            "error": "Bad Request",
            "statusCode": 400
        })))
        .mount(&app.backend)
        .await;
    let args = RegisterReqArgs {
        email: "nope".to_string(),
        password: "x".to_string().into(),
        first_name: "A".to_string(),
        last_name: "B".to_string(),
        role: Role::Client,
    };

    // Act
    let outcome = app.core_client.register(args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "email must be an email; password is too short"
    );
}

#[tokio::test]
async fn password_reset_flow() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(body_json(serde_json::json!({"email": app.test_user.email})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Email sent"})),
        )
        .expect(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_json(
            serde_json::json!({"token": "reset-token", "password": "brand-new"}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"message": "Password updated"})),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    // Act
    let forgot = app
        .core_client
        .forgot_password(
            ForgotPasswordReqArgs {
                email: app.test_user.email.clone(),
            },
            no_cb,
        )
        .await
        .unwrap();
    let reset = app
        .core_client
        .reset_password(
            ResetPasswordReqArgs {
                token: "reset-token".to_string().into(),
                password: "brand-new".to_string().into(),
            },
            no_cb,
        )
        .await
        .unwrap();

    // Assert
    assert_eq!(forgot.unwrap().message, "Email sent");
    assert_eq!(reset.unwrap().message, "Password updated");
    app.backend.verify().await;
}

#[tokio::test]
async fn fetch_current_user_after_refresh() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    app.mount_protected("/auth/me", app.test_user.summary_json())
        .await;
    app.mount_refresh_success(Duration::ZERO, 1).await;
    app.core_client.session().clear();

    // Act
    let user = app
        .core_client
        .fetch_current_user(no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(*user, app.test_user.summary());
    assert!(app.core_client.is_logged_in());
    app.backend.verify().await;
}

#[tokio::test]
async fn logout_clears_session_even_if_server_fails() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.backend)
        .await;

    // Act
    let outcome = app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert!(outcome.is_err());
    assert!(!app.core_client.is_logged_in());
    assert_eq!(app.core_client.session().state(), SessionState::LoadedEmpty);
    assert!(app.navigator.routes().is_empty());
}

#[tokio::test]
async fn logout_no_wait_clears_immediately() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.backend)
        .await;

    // Act
    app.core_client.logout_no_wait();

    // Assert
    assert!(!app.core_client.is_logged_in());
}

#[tokio::test]
async fn session_file_survives_new_client() {
    // Arrange
    let session_file = std::env::temp_dir()
        .join(format!("nuvylux-test-{}", uuid::Uuid::new_v4()))
        .join("session.ron");
    let session_file_clone = session_file.clone();
    let first = spawn_app_with(|settings| settings.with_session_file(Some(session_file_clone))).await;
    first.login().await.unwrap();

    // Act
    let second =
        spawn_app_with(|settings| settings.with_session_file(Some(session_file.clone()))).await;
    assert!(!second.core_client.session().is_ready());
    let state = second.core_client.session().hydrate();

    // Assert
    assert_eq!(state.user().as_deref(), Some(&first.test_user.summary()));

    // Act - Logout removes the persisted user
    first.core_client.session().clear();

    // Assert
    assert!(!session_file.exists());
}

#[tokio::test]
async fn serialization_error_is_reported() {
    // Arrange
    let app = spawn_app().await;
    let mut unserializable = std::collections::HashMap::new();
    unserializable.insert(vec![1u8], "keys must be strings");

    // Act
    let outcome = app
        .core_client
        .send_request_expect_empty(
            nuvylux_shared::const_config::path::PathSpec::new(reqwest::Method::POST, "/cart"),
            &unserializable,
            no_cb,
        )
        .await
        .unwrap();

    // Assert
    let err = outcome.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GatewayError>(),
        Some(GatewayError::Serialization(_))
    ));
    assert!(app.backend.received_requests().await.unwrap().is_empty());
}
