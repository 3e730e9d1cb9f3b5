use payloads::requests;
use reqwest::StatusCode;
use test_helpers::{TEST_PASSWORD, assert_status_code, spawn_app};

#[tokio::test]
async fn login_rejects_bad_credentials() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;

    let result = app
        .client
        .login(&requests::LoginCredentials {
            username: "admin".to_string(),
            password: "not-the-password".to_string(),
        })
        .await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    let result = app
        .client
        .login(&requests::LoginCredentials {
            username: "nobody".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn login_check_tracks_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;

    assert!(!app.client.login_check().await?);

    app.login_admin().await?;
    assert!(app.client.login_check().await?);

    app.client.logout().await?;
    assert!(!app.client.login_check().await?);

    Ok(())
}

#[tokio::test]
async fn user_profile_returns_the_session_user() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;

    let profile = app.client.user_profile().await?;
    assert_eq!(profile.username, "admin");
    assert_eq!(profile.role, payloads::Role::Admin);

    Ok(())
}
