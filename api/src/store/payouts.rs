//! Payout aggregation
//!
//! Pure read-side reports over persisted orders. Sums the stored
//! `order_total` and `commission_amount` columns; commission is never
//! recomputed or re-snapshotted here. Cancelled orders are excluded
//! entirely, regardless of date.

use jiff::{Span, Timestamp, civil, tz::TimeZone};
use jiff_sqlx::ToSqlx;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use payloads::{CampaignId, Role, UserId, requests, responses};

use super::{AdminUser, StoreError, User};

#[derive(Debug, Clone, FromRow)]
struct PayoutOrderRow {
    campaign_id: CampaignId,
    title: String,
    order_total: Decimal,
    commission_amount: Decimal,
}

/// Half-open UTC window covering the requested calendar month.
fn month_window(
    query: &requests::PayoutQuery,
) -> Result<(Timestamp, Timestamp), StoreError> {
    let first = civil::Date::new(query.year, query.month, 1)
        .map_err(|_| StoreError::InvalidMonth)?;
    let next = first
        .checked_add(Span::new().months(1))
        .map_err(anyhow::Error::from)?;
    let start = first
        .to_zoned(TimeZone::UTC)
        .map_err(anyhow::Error::from)?
        .timestamp();
    let end = next
        .to_zoned(TimeZone::UTC)
        .map_err(anyhow::Error::from)?
        .timestamp();
    Ok((start, end))
}

/// Per-campaign totals for one sales person's active orders in the window.
async fn payout_breakdown(
    sales_person_id: &UserId,
    start: Timestamp,
    end: Timestamp,
    pool: &PgPool,
) -> Result<Vec<responses::CampaignPayout>, StoreError> {
    let rows = sqlx::query_as::<_, PayoutOrderRow>(
        "SELECT o.campaign_id, c.title, o.order_total, o.commission_amount
        FROM orders o
        JOIN campaigns c ON o.campaign_id = c.id
        WHERE c.sales_person_id = $1
            AND o.status = 'active'
            AND o.created_at >= $2
            AND o.created_at < $3
        ORDER BY c.reference_id, o.created_at",
    )
    .bind(sales_person_id)
    .bind(start.to_sqlx())
    .bind(end.to_sqlx())
    .fetch_all(pool)
    .await?;

    let mut campaigns: Vec<responses::CampaignPayout> = Vec::new();
    for row in rows {
        match campaigns
            .iter_mut()
            .find(|c| c.campaign_id == row.campaign_id)
        {
            Some(entry) => {
                entry.order_count += 1;
                entry.total_sales += row.order_total;
                entry.total_commission += row.commission_amount;
            }
            None => campaigns.push(responses::CampaignPayout {
                campaign_id: row.campaign_id,
                title: row.title,
                order_count: 1,
                total_sales: row.order_total,
                total_commission: row.commission_amount,
            }),
        }
    }
    Ok(campaigns)
}

/// One sales person's payout for a month. A month with no matching orders
/// yields zero commission and an empty campaign list, not an error.
pub async fn my_payout(
    sales_person_id: &UserId,
    query: &requests::PayoutQuery,
    pool: &PgPool,
) -> Result<responses::MyPayout, StoreError> {
    let (start, end) = month_window(query)?;
    let campaigns = payout_breakdown(sales_person_id, start, end, pool).await?;
    let total_commission =
        campaigns.iter().map(|c| c.total_commission).sum();
    Ok(responses::MyPayout {
        year: query.year,
        month: query.month,
        total_commission,
        campaigns,
    })
}

/// The whole team's payout for a month: one breakdown per sales-role user,
/// computed independently, plus the grand total. Sales persons with no
/// orders appear with zero totals.
pub async fn team_payout(
    query: &requests::PayoutQuery,
    _actor: &AdminUser,
    pool: &PgPool,
) -> Result<responses::TeamPayout, StoreError> {
    let (start, end) = month_window(query)?;

    let sales_users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE role = $1 ORDER BY name",
    )
    .bind(Role::Sales)
    .fetch_all(pool)
    .await?;

    let mut sales_persons = Vec::with_capacity(sales_users.len());
    let mut grand_total_commission = Decimal::ZERO;
    for person in sales_users {
        let campaigns = payout_breakdown(&person.id, start, end, pool).await?;
        let total_commission = campaigns
            .iter()
            .map(|c| c.total_commission)
            .sum::<Decimal>();
        grand_total_commission += total_commission;
        sales_persons.push(responses::SalesPersonPayout {
            user_id: person.id,
            name: person.name,
            total_commission,
            campaigns,
        });
    }

    Ok(responses::TeamPayout {
        year: query.year,
        month: query.month,
        grand_total_commission,
        sales_persons,
    })
}
