use std::collections::HashSet;

use api::store::sequence;
use test_helpers::{campaign_details_a, order_details, spawn_app};

use rust_decimal::dec;

#[tokio::test]
async fn fresh_key_starts_at_one_and_increments() -> anyhow::Result<()> {
    let app = spawn_app().await;

    assert_eq!(sequence::next_sequence("some_key", &app.db_pool).await?, 1);
    assert_eq!(sequence::next_sequence("some_key", &app.db_pool).await?, 2);
    assert_eq!(sequence::next_sequence("some_key", &app.db_pool).await?, 3);

    // an unrelated key has its own counter
    assert_eq!(sequence::next_sequence("other_key", &app.db_pool).await?, 1);

    Ok(())
}

/// N concurrent increments on a fresh key must yield exactly {1, ..., N}:
/// no duplicates, no gaps, regardless of interleaving.
#[tokio::test]
async fn concurrent_increments_yield_distinct_contiguous_values()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    const N: i64 = 25;

    let mut handles = Vec::new();
    for _ in 0..N {
        let pool = app.db_pool.clone();
        handles.push(tokio::spawn(async move {
            sequence::next_sequence("contended_key", &pool).await
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let value = handle.await??;
        assert!(seen.insert(value), "duplicate sequence value {value}");
    }
    assert_eq!(seen, (1..=N).collect::<HashSet<i64>>());

    Ok(())
}

#[tokio::test]
async fn campaign_reference_ids_per_platform() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_admin().await?;
    app.login_admin().await?;
    let sales_id = app.create_sales_user("Frank", "frank", dec!(10)).await?;

    let first = app
        .client
        .create_campaign(&campaign_details_a(sales_id, &app.time_source))
        .await?;
    assert_eq!(first.reference_id, "FB-001");

    let second = app
        .client
        .create_campaign(&campaign_details_a(sales_id, &app.time_source))
        .await?;
    assert_eq!(second.reference_id, "FB-002");

    // the instagram counter is independent of the facebook one
    let mut details = campaign_details_a(sales_id, &app.time_source);
    details.platform = payloads::Platform::Instagram;
    let instagram = app.client.create_campaign(&details).await?;
    assert_eq!(instagram.reference_id, "IG-001");

    Ok(())
}

#[tokio::test]
async fn order_reference_ids_widen_past_two_digits() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (_, campaign) = app.setup_campaign().await?;

    let mut last_reference = String::new();
    for _ in 0..10 {
        let order = app
            .client
            .create_order(&order_details(campaign.campaign_id, 1, dec!(10)))
            .await?;
        last_reference = order.reference_id;
    }

    // zero-padded to two digits, widening at 10
    assert_eq!(last_reference, "FB-001-10");
    let orders = app
        .client
        .list_orders(&payloads::requests::ListOrders {
            campaign_id: campaign.campaign_id,
        })
        .await?;
    assert_eq!(orders[0].reference_id, "FB-001-01");
    assert_eq!(orders[8].reference_id, "FB-001-09");

    Ok(())
}

#[tokio::test]
async fn order_counters_are_per_campaign() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let (sales_id, first_campaign) = app.setup_campaign().await?;
    let second_campaign = app
        .client
        .create_campaign(&campaign_details_a(sales_id, &app.time_source))
        .await?;

    app.client
        .create_order(&order_details(first_campaign.campaign_id, 1, dec!(10)))
        .await?;
    app.client
        .create_order(&order_details(first_campaign.campaign_id, 1, dec!(10)))
        .await?;
    let order = app
        .client
        .create_order(&order_details(
            second_campaign.campaign_id,
            1,
            dec!(10),
        ))
        .await?;

    // the second campaign's counter starts fresh
    assert_eq!(order.reference_id, "FB-002-01");

    Ok(())
}
