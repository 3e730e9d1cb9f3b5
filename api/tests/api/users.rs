use payloads::requests;
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::{
    TEST_PASSWORD, assert_status_code, campaign_details_a, spawn_app,
};

#[tokio::test]
async fn admin_creates_and_lists_users() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;

    let frank_id = app.create_sales_user("Frank", "frank", dec!(10)).await?;

    let users = app.client.list_users().await?;
    assert_eq!(users.len(), 2);
    let frank = users.iter().find(|u| u.user_id == frank_id).unwrap();
    assert_eq!(frank.name, "Frank");
    assert_eq!(frank.role, payloads::Role::Sales);
    assert_eq!(frank.commission_rate, dec!(10));
    assert_eq!(frank.status, payloads::UserStatus::Active);

    Ok(())
}

#[tokio::test]
async fn sales_person_cannot_create_users() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;
    app.create_sales_user("Frank", "frank", dec!(10)).await?;

    app.login("frank").await?;
    let result = app
        .client
        .create_user(&requests::CreateUser {
            name: "Eve".to_string(),
            username: "eve".to_string(),
            password: TEST_PASSWORD.to_string(),
            role: payloads::Role::Sales,
            commission_rate: Some(dec!(5)),
        })
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn commission_rate_must_be_a_percentage() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;

    for rate in [dec!(-1), dec!(100.01), dec!(150)] {
        let result = app
            .client
            .create_user(&requests::CreateUser {
                name: "Frank".to_string(),
                username: "frank".to_string(),
                password: TEST_PASSWORD.to_string(),
                role: payloads::Role::Sales,
                commission_rate: Some(rate),
            })
            .await;
        assert_status_code(result, StatusCode::BAD_REQUEST);
    }

    // boundaries are inclusive
    app.create_sales_user("Zero", "zero", dec!(0)).await?;
    app.create_sales_user("Full", "full", dec!(100)).await?;

    Ok(())
}

#[tokio::test]
async fn duplicate_username_conflicts() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;
    app.create_sales_user("Frank", "frank", dec!(10)).await?;

    let result = app
        .client
        .create_user(&requests::CreateUser {
            name: "Frank Again".to_string(),
            username: "frank".to_string(),
            password: TEST_PASSWORD.to_string(),
            role: payloads::Role::Sales,
            commission_rate: Some(dec!(10)),
        })
        .await;
    assert_status_code(result, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn update_user_changes_rate_and_status() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;
    let frank_id = app.create_sales_user("Frank", "frank", dec!(10)).await?;

    let updated = app
        .client
        .update_user(&requests::UpdateUser {
            user_id: frank_id,
            name: None,
            commission_rate: Some(dec!(12.5)),
            status: Some(payloads::UserStatus::Inactive),
        })
        .await?;
    assert_eq!(updated.commission_rate, dec!(12.5));
    assert_eq!(updated.status, payloads::UserStatus::Inactive);
    assert_eq!(updated.name, "Frank");

    Ok(())
}

#[tokio::test]
async fn admin_cannot_delete_themselves() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let admin_id = app.seed_admin().await?;
    app.login_admin().await?;

    let result = app.client.delete_user(&admin_id).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn deleting_a_user_with_campaigns_is_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;
    let frank_id = app.create_sales_user("Frank", "frank", dec!(10)).await?;
    app.client
        .create_campaign(&campaign_details_a(frank_id, &app.time_source))
        .await?;

    let result = app.client.delete_user(&frank_id).await;
    assert_status_code(result, StatusCode::CONFLICT);

    // a user with no campaigns deletes cleanly
    let eve_id = app.create_sales_user("Eve", "eve", dec!(5)).await?;
    app.client.delete_user(&eve_id).await?;

    Ok(())
}
