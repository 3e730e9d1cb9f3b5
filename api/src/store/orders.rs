//! Order snapshot management
//!
//! Orders capture the assigned sales person's commission rate exactly once,
//! at creation, into `snapshot_rate`. Every later recalculation (editing
//! the product lines) derives the commission from that stored column. The
//! live user record is deliberately not an input to `update_order`, which
//! makes re-reading the current rate structurally impossible rather than a
//! matter of discipline.

use jiff::Timestamp;
use jiff_sqlx::{Timestamp as SqlxTs, ToSqlx};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use payloads::{
    CampaignId, OrderId, OrderStatus, Product, requests, responses,
};

use super::{StoreError, commission, sequence};
use crate::time::TimeSource;

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub reference_id: String,
    pub campaign_id: CampaignId,
    pub products: Json<Vec<Product>>,
    pub order_total: Decimal,
    pub snapshot_rate: Decimal,
    pub commission_amount: Decimal,
    pub status: OrderStatus,
    #[sqlx(try_from = "SqlxTs")]
    pub created_at: Timestamp,
    #[sqlx(try_from = "SqlxTs")]
    pub updated_at: Timestamp,
}

impl From<Order> for responses::Order {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            reference_id: order.reference_id,
            campaign_id: order.campaign_id,
            products: order.products.0,
            order_total: order.order_total,
            snapshot_rate: order.snapshot_rate,
            commission_amount: order.commission_amount,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Create an order against a campaign.
///
/// The assigned sales person's current commission rate is read once, here,
/// and frozen into the order. Reference ID generation and the insert run in
/// one transaction: either the order exists with its reference ID and
/// totals, or nothing was written at all.
pub async fn create_order(
    details: &requests::CreateOrder,
    actor: &super::User,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Order, StoreError> {
    let products = commission::validate_products(&details.products)?;
    let campaign = super::get_campaign_row(&details.campaign_id, pool).await?;
    super::authorize_campaign_access(actor, &campaign)?;
    let order_total = commission::order_total(&products);

    let mut tx = pool.begin().await?;

    // the one and only read of the live commission rate for this order
    let snapshot_rate = sqlx::query_scalar::<_, Decimal>(
        "SELECT commission_rate FROM users WHERE id = $1",
    )
    .bind(campaign.sales_person_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => StoreError::UserNotFound,
        e => StoreError::Database(e),
    })?;
    let commission_amount = commission::commission(order_total, snapshot_rate);

    let reference_id =
        sequence::order_reference_id(&campaign.reference_id, &mut tx).await?;

    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (
                reference_id,
                campaign_id,
                products,
                order_total,
                snapshot_rate,
                commission_amount,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'active', $7, $7)
            RETURNING *;",
    )
    .bind(&reference_id)
    .bind(campaign.id)
    .bind(Json(&products))
    .bind(order_total)
    .bind(snapshot_rate)
    .bind(commission_amount)
    .bind(time_source.now().to_sqlx())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(order.into())
}

pub(crate) async fn get_order_row(
    order_id: &OrderId,
    pool: &PgPool,
) -> Result<Order, StoreError> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => StoreError::OrderNotFound,
            e => StoreError::Database(e),
        })
}

pub async fn get_order(
    order_id: &OrderId,
    actor: &super::User,
    pool: &PgPool,
) -> Result<responses::Order, StoreError> {
    let order = get_order_row(order_id, pool).await?;
    let campaign = super::get_campaign_row(&order.campaign_id, pool).await?;
    super::authorize_campaign_access(actor, &campaign)?;
    Ok(order.into())
}

pub async fn list_orders(
    details: &requests::ListOrders,
    actor: &super::User,
    pool: &PgPool,
) -> Result<Vec<responses::Order>, StoreError> {
    let campaign = super::get_campaign_row(&details.campaign_id, pool).await?;
    super::authorize_campaign_access(actor, &campaign)?;

    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders
        WHERE campaign_id = $1
        ORDER BY created_at, reference_id",
    )
    .bind(campaign.id)
    .fetch_all(pool)
    .await?;
    Ok(orders.into_iter().map(Into::into).collect())
}

/// Update an order's products and/or status.
///
/// New products are re-totaled and the commission recomputed from the
/// order's stored `snapshot_rate` — never from the sales person's current
/// rate, which is not even loaded here. Changing the owning campaign is
/// rejected.
pub async fn update_order(
    details: &requests::UpdateOrder,
    actor: &super::User,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Order, StoreError> {
    let order = get_order_row(&details.order_id, pool).await?;
    let campaign = super::get_campaign_row(&order.campaign_id, pool).await?;
    super::authorize_campaign_access(actor, &campaign)?;

    if let Some(campaign_id) = details.campaign_id
        && campaign_id != order.campaign_id
    {
        return Err(StoreError::OrderCampaignImmutable);
    }

    let (products, order_total, commission_amount) = match &details.products {
        Some(products) => {
            let products = commission::validate_products(products)?;
            let order_total = commission::order_total(&products);
            let commission_amount =
                commission::commission(order_total, order.snapshot_rate);
            (Json(products), order_total, commission_amount)
        }
        None => (order.products, order.order_total, order.commission_amount),
    };
    let status = details.status.unwrap_or(order.status);

    let updated = sqlx::query_as::<_, Order>(
        "UPDATE orders SET
            products = $2,
            order_total = $3,
            commission_amount = $4,
            status = $5,
            updated_at = $6
        WHERE id = $1
        RETURNING *",
    )
    .bind(order.id)
    .bind(products)
    .bind(order_total)
    .bind(commission_amount)
    .bind(status)
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await?;
    Ok(updated.into())
}

/// Delete an order. No cascading effects beyond removing the record.
pub async fn delete_order(
    order_id: &OrderId,
    actor: &super::User,
    pool: &PgPool,
) -> Result<(), StoreError> {
    let order = get_order_row(order_id, pool).await?;
    let campaign = super::get_campaign_row(&order.campaign_id, pool).await?;
    super::authorize_campaign_access(actor, &campaign)?;

    sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(order.id)
        .execute(pool)
        .await?;
    Ok(())
}
