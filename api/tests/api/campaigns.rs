use jiff::Span;
use payloads::{CampaignStatus, Patch, requests};
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::{
    assert_status_code, campaign_details_a, order_details, spawn_app,
};

fn update_details(
    campaign_id: payloads::CampaignId,
) -> requests::UpdateCampaign {
    requests::UpdateCampaign {
        campaign_id,
        title: None,
        campaign_type: None,
        status: None,
        start_date: None,
        end_date: Patch::Unset,
        sales_person_id: None,
    }
}

#[tokio::test]
async fn create_campaign_requires_admin() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (sales_id, _) = app.setup_campaign().await?;

    app.login("frank").await?;
    let result = app
        .client
        .create_campaign(&campaign_details_a(sales_id, &app.time_source))
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn assignee_must_be_a_sales_person() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let admin_id = app.seed_admin().await?;
    app.login_admin().await?;

    let result = app
        .client
        .create_campaign(&campaign_details_a(admin_id, &app.time_source))
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn sales_person_sees_only_own_campaigns() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;
    let eve_id = app.create_sales_user("Eve", "eve", dec!(5)).await?;
    let eve_campaign = app
        .client
        .create_campaign(&campaign_details_a(eve_id, &app.time_source))
        .await?;

    // the admin sees everything
    assert_eq!(app.client.list_campaigns().await?.len(), 2);

    app.login("eve").await?;
    let campaigns = app.client.list_campaigns().await?;
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].campaign_id, eve_campaign.campaign_id);

    // and cannot read frank's campaign directly
    let result = app.client.get_campaign(&campaign.campaign_id).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

/// Completing a campaign stamps the end date; reactivating clears it.
#[tokio::test]
async fn status_transitions_drive_the_end_date() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;
    assert_eq!(campaign.end_date, None);

    app.time_source.advance(Span::new().days(3));
    let completed_at = app.time_source.now();
    let mut details = update_details(campaign.campaign_id);
    details.status = Some(CampaignStatus::Completed);
    let updated = app.client.update_campaign(&details).await?;
    assert_eq!(updated.status, CampaignStatus::Completed);
    assert_eq!(updated.end_date, Some(completed_at));

    let mut details = update_details(campaign.campaign_id);
    details.status = Some(CampaignStatus::Active);
    let updated = app.client.update_campaign(&details).await?;
    assert_eq!(updated.status, CampaignStatus::Active);
    assert_eq!(updated.end_date, None);

    Ok(())
}

#[tokio::test]
async fn completing_keeps_an_already_set_end_date() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;

    let planned_end = app.time_source.now() + Span::new().days(14);
    let mut details = update_details(campaign.campaign_id);
    details.end_date = Patch::Value(planned_end);
    app.client.update_campaign(&details).await?;

    app.time_source.advance(Span::new().days(3));
    let mut details = update_details(campaign.campaign_id);
    details.status = Some(CampaignStatus::Completed);
    let updated = app.client.update_campaign(&details).await?;
    assert_eq!(updated.end_date, Some(planned_end));

    Ok(())
}

#[tokio::test]
async fn end_date_can_be_cleared_explicitly() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;

    let mut details = update_details(campaign.campaign_id);
    details.end_date = Patch::Value(app.time_source.now());
    let updated = app.client.update_campaign(&details).await?;
    assert!(updated.end_date.is_some());

    // an absent field leaves the value alone
    let updated = app
        .client
        .update_campaign(&update_details(campaign.campaign_id))
        .await?;
    assert!(updated.end_date.is_some());

    // an explicit null clears it
    let mut details = update_details(campaign.campaign_id);
    details.end_date = Patch::Null;
    let updated = app.client.update_campaign(&details).await?;
    assert_eq!(updated.end_date, None);

    Ok(())
}

/// The assigned sales person can never change after creation.
#[tokio::test]
async fn sales_person_is_immutable() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (sales_id, campaign) = app.setup_campaign().await?;
    let eve_id = app.create_sales_user("Eve", "eve", dec!(5)).await?;

    let mut details = update_details(campaign.campaign_id);
    details.sales_person_id = Some(eve_id);
    let result = app.client.update_campaign(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // the record is unchanged
    let unchanged = app.client.get_campaign(&campaign.campaign_id).await?;
    assert_eq!(unchanged.sales_person_id, sales_id);

    // echoing the stored assignee back is a no-op, not an error
    let mut details = update_details(campaign.campaign_id);
    details.sales_person_id = Some(sales_id);
    app.client.update_campaign(&details).await?;

    Ok(())
}

#[tokio::test]
async fn deleting_a_campaign_with_orders_is_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;
    app.client
        .create_order(&order_details(campaign.campaign_id, 1, dec!(10)))
        .await?;

    let result = app.client.delete_campaign(&campaign.campaign_id).await;
    assert_status_code(result, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn delete_campaign_without_orders() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;

    app.client.delete_campaign(&campaign.campaign_id).await?;

    let result = app.client.get_campaign(&campaign.campaign_id).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}
