//! Database store module for the Campaignly API
//!
//! ## Design Decisions
//!
//! ### Commission snapshots
//! - **Frozen at creation**: an order records the assigned sales person's
//!   commission rate once, when the order is created. Every later
//!   recalculation reads the stored `snapshot_rate` column; the live user
//!   record is structurally absent from the update path (see
//!   `orders::update_order`), so rate edits can never act retroactively.
//! - **Reports sum, never recompute**: payout aggregation only adds up the
//!   persisted `order_total`/`commission_amount` values.
//!
//! ### Reference IDs
//! - **Counter table as the source of truth**: human-readable IDs
//!   (`FB-001`, `FB-001-01`) are issued from `sequence_counters` rows via a
//!   single atomic upsert (see `sequence`). No read-then-write pair, no
//!   uniqueness scan over existing rows.
//! - **Transactional issue**: the counter increment and the row insert
//!   commit together, so a failed insert never leaves an order without a
//!   reference ID or a half-used sequence number.
//!
//! ### Time Source Dependency
//! - **Mocked time for testing**: functions that stamp `created_at` and
//!   `updated_at` accept a `TimeSource` parameter instead of creating their
//!   own, so payout month windows can be exercised deterministically.
//!
//! ### Type Safety
//! - **ID newtypes with sqlx::Type**: `UserId`/`CampaignId`/`OrderId`
//!   implement sqlx::Type, so they bind directly in queries without
//!   accessing the inner UUID value (`.0`).
//! - **AdminUser**: a type that can only exist if the interior user row has
//!   been validated to carry the admin role; admin-gated store functions
//!   take it instead of re-checking.

use jiff::Timestamp;
use jiff_sqlx::{Timestamp as SqlxTs, ToSqlx};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use payloads::{
    CampaignId, CampaignStatus, CampaignType, OptionalTimestamp, Platform,
    Role, UserId, UserStatus, requests, responses,
};

use crate::time::TimeSource;

pub mod commission;
pub mod orders;
pub mod payouts;
pub mod sequence;

/// A complete user row that stays in the backend.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub commission_rate: Decimal,
    pub status: UserStatus,
    #[sqlx(try_from = "SqlxTs")]
    pub created_at: Timestamp,
    #[sqlx(try_from = "SqlxTs")]
    pub updated_at: Timestamp,
}

impl From<User> for responses::User {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            username: user.username,
            role: user.role,
            commission_rate: user.commission_rate,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Campaign {
    pub id: CampaignId,
    pub reference_id: String,
    pub title: String,
    pub platform: Platform,
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub sales_person_id: UserId,
    #[sqlx(try_from = "SqlxTs")]
    pub start_date: Timestamp,
    #[sqlx(try_from = "OptionalTimestamp")]
    pub end_date: Option<Timestamp>,
    #[sqlx(try_from = "SqlxTs")]
    pub created_at: Timestamp,
    #[sqlx(try_from = "SqlxTs")]
    pub updated_at: Timestamp,
}

impl From<Campaign> for responses::Campaign {
    fn from(campaign: Campaign) -> Self {
        Self {
            campaign_id: campaign.id,
            reference_id: campaign.reference_id,
            title: campaign.title,
            platform: campaign.platform,
            campaign_type: campaign.campaign_type,
            status: campaign.status,
            sales_person_id: campaign.sales_person_id,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

/// A type that can only exist if the interior User has been validated to
/// carry the admin role.
pub struct AdminUser(User);

/// Load a user row by id.
pub async fn read_user(pool: &PgPool, id: &UserId) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1;")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => StoreError::UserNotFound,
            e => StoreError::Database(e),
        })
}

/// Load the requesting user and require the admin role.
pub async fn require_admin(
    user_id: &UserId,
    pool: &PgPool,
) -> Result<AdminUser, StoreError> {
    let user = read_user(pool, user_id).await?;
    if user.role != Role::Admin {
        return Err(StoreError::RequiresAdminPermissions);
    }
    Ok(AdminUser(user))
}

/// Admin or the campaign's assigned sales person; everyone else is denied.
pub(crate) fn authorize_campaign_access(
    actor: &User,
    campaign: &Campaign,
) -> Result<(), StoreError> {
    if actor.role != Role::Admin && campaign.sales_person_id != actor.id {
        return Err(StoreError::CampaignAccessDenied);
    }
    Ok(())
}

fn validate_commission_rate(rate: Decimal) -> Result<(), StoreError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(StoreError::CommissionRateOutOfRange);
    }
    Ok(())
}

/// Create a user. The password is hashed by the caller; the store only
/// ever sees the finished hash.
pub async fn create_user(
    details: &requests::CreateUser,
    password_hash: &str,
    _actor: &AdminUser,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<User, StoreError> {
    if details.username.len() > requests::USERNAME_MAX_LEN
        || details.name.len() > requests::NAME_MAX_LEN
    {
        return Err(StoreError::FieldTooLong);
    }
    // Admins carry no meaningful rate; it is stored as zero.
    let commission_rate = match details.role {
        Role::Admin => Decimal::ZERO,
        Role::Sales => {
            let rate = details.commission_rate.unwrap_or(Decimal::ZERO);
            validate_commission_rate(rate)?;
            rate
        }
    };
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (
                name,
                username,
                password_hash,
                role,
                commission_rate,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $6)
            RETURNING *;",
    )
    .bind(&details.name)
    .bind(&details.username)
    .bind(password_hash)
    .bind(details.role)
    .bind(commission_rate)
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Get a user; admins can read anyone, sales persons only themselves.
pub async fn get_user(
    user_id: &UserId,
    actor: &User,
    pool: &PgPool,
) -> Result<responses::User, StoreError> {
    if actor.role != Role::Admin && actor.id != *user_id {
        return Err(StoreError::RequiresAdminPermissions);
    }
    Ok(read_user(pool, user_id).await?.into())
}

pub async fn list_users(
    _actor: &AdminUser,
    pool: &PgPool,
) -> Result<Vec<responses::User>, StoreError> {
    let users =
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(pool)
            .await?;
    Ok(users.into_iter().map(Into::into).collect())
}

/// Update a user's name, commission rate, or status.
///
/// A commission rate change applies to future orders only; existing orders
/// keep the rate snapshotted when they were created.
pub async fn update_user(
    details: &requests::UpdateUser,
    _actor: &AdminUser,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::User, StoreError> {
    let existing = read_user(pool, &details.user_id).await?;

    let name = details.name.clone().unwrap_or(existing.name);
    if name.len() > requests::NAME_MAX_LEN {
        return Err(StoreError::FieldTooLong);
    }
    let commission_rate = match details.commission_rate {
        Some(rate) => {
            validate_commission_rate(rate)?;
            rate
        }
        None => existing.commission_rate,
    };
    let status = details.status.unwrap_or(existing.status);

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET
            name = $2,
            commission_rate = $3,
            status = $4,
            updated_at = $5
        WHERE id = $1
        RETURNING *",
    )
    .bind(existing.id)
    .bind(&name)
    .bind(commission_rate)
    .bind(status)
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await?;
    Ok(user.into())
}

/// Delete a user. Refused while the user is still assigned to campaigns;
/// orders snapshotted under a deleted user keep their frozen rate.
pub async fn delete_user(
    user_id: &UserId,
    actor: &AdminUser,
    pool: &PgPool,
) -> Result<(), StoreError> {
    if actor.0.id == *user_id {
        return Err(StoreError::CannotDeleteSelf);
    }
    let owns_campaigns = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM campaigns WHERE sales_person_id = $1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    if owns_campaigns {
        return Err(StoreError::UserOwnsCampaigns);
    }

    let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    if rows_affected == 0 {
        return Err(StoreError::UserNotFound);
    }
    Ok(())
}

/// Create a campaign, issuing its reference ID from the platform counter.
pub async fn create_campaign(
    details: &requests::CreateCampaign,
    _actor: &AdminUser,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Campaign, StoreError> {
    if details.title.len() > requests::CAMPAIGN_TITLE_MAX_LEN {
        return Err(StoreError::FieldTooLong);
    }
    let assignee = read_user(pool, &details.sales_person_id).await?;
    if assignee.role != Role::Sales {
        return Err(StoreError::AssignedUserNotSales);
    }

    let mut tx = pool.begin().await?;
    let reference_id =
        sequence::campaign_reference_id(details.platform, &mut tx).await?;
    let campaign = sqlx::query_as::<_, Campaign>(
        "INSERT INTO campaigns (
                reference_id,
                title,
                platform,
                campaign_type,
                status,
                sales_person_id,
                start_date,
                end_date,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, 'active', $5, $6, $7, $8, $8)
            RETURNING *;",
    )
    .bind(&reference_id)
    .bind(&details.title)
    .bind(details.platform)
    .bind(details.campaign_type)
    .bind(details.sales_person_id)
    .bind(details.start_date.to_sqlx())
    .bind(details.end_date.map(|t| t.to_sqlx()))
    .bind(time_source.now().to_sqlx())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(campaign.into())
}

pub(crate) async fn get_campaign_row(
    campaign_id: &CampaignId,
    pool: &PgPool,
) -> Result<Campaign, StoreError> {
    sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
        .bind(campaign_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => StoreError::CampaignNotFound,
            e => StoreError::Database(e),
        })
}

pub async fn get_campaign(
    campaign_id: &CampaignId,
    actor: &User,
    pool: &PgPool,
) -> Result<responses::Campaign, StoreError> {
    let campaign = get_campaign_row(campaign_id, pool).await?;
    authorize_campaign_access(actor, &campaign)?;
    Ok(campaign.into())
}

/// List campaigns: all of them for admins, own for sales persons.
pub async fn list_campaigns(
    actor: &User,
    pool: &PgPool,
) -> Result<Vec<responses::Campaign>, StoreError> {
    let campaigns = match actor.role {
        Role::Admin => {
            sqlx::query_as::<_, Campaign>(
                "SELECT * FROM campaigns ORDER BY created_at",
            )
            .fetch_all(pool)
            .await?
        }
        Role::Sales => {
            sqlx::query_as::<_, Campaign>(
                "SELECT * FROM campaigns
                WHERE sales_person_id = $1
                ORDER BY created_at",
            )
            .bind(actor.id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(campaigns.into_iter().map(Into::into).collect())
}

/// Update a campaign.
///
/// The assigned sales person is immutable; a different id in the request is
/// rejected outright. Status transitions drive the end date: completing a
/// campaign stamps it with the current time (unless a date is already set),
/// reactivating clears it.
pub async fn update_campaign(
    details: &requests::UpdateCampaign,
    _actor: &AdminUser,
    pool: &PgPool,
    time_source: &TimeSource,
) -> Result<responses::Campaign, StoreError> {
    let existing = get_campaign_row(&details.campaign_id, pool).await?;

    if let Some(sales_person_id) = details.sales_person_id
        && sales_person_id != existing.sales_person_id
    {
        return Err(StoreError::CampaignSalesPersonImmutable);
    }

    let title = details.title.clone().unwrap_or(existing.title);
    if title.len() > requests::CAMPAIGN_TITLE_MAX_LEN {
        return Err(StoreError::FieldTooLong);
    }
    let campaign_type =
        details.campaign_type.unwrap_or(existing.campaign_type);
    let status = details.status.unwrap_or(existing.status);
    let start_date = details.start_date.unwrap_or(existing.start_date);
    let mut end_date = details.end_date.resolve(existing.end_date);

    if let Some(new_status) = details.status
        && new_status != existing.status
    {
        match new_status {
            CampaignStatus::Completed => {
                if end_date.is_none() {
                    end_date = Some(time_source.now());
                }
            }
            CampaignStatus::Active => end_date = None,
            CampaignStatus::Paused => {}
        }
    }

    let campaign = sqlx::query_as::<_, Campaign>(
        "UPDATE campaigns SET
            title = $2,
            campaign_type = $3,
            status = $4,
            start_date = $5,
            end_date = $6,
            updated_at = $7
        WHERE id = $1
        RETURNING *",
    )
    .bind(existing.id)
    .bind(&title)
    .bind(campaign_type)
    .bind(status)
    .bind(start_date.to_sqlx())
    .bind(end_date.map(|t| t.to_sqlx()))
    .bind(time_source.now().to_sqlx())
    .fetch_one(pool)
    .await?;
    Ok(campaign.into())
}

/// Delete a campaign. Refused while orders reference it.
pub async fn delete_campaign(
    campaign_id: &CampaignId,
    _actor: &AdminUser,
    pool: &PgPool,
) -> Result<(), StoreError> {
    let has_orders = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM orders WHERE campaign_id = $1)",
    )
    .bind(campaign_id)
    .fetch_one(pool)
    .await?;
    if has_orders {
        return Err(StoreError::CampaignHasOrders);
    }

    let rows_affected = sqlx::query("DELETE FROM campaigns WHERE id = $1")
        .bind(campaign_id)
        .execute(pool)
        .await?
        .rows_affected();
    if rows_affected == 0 {
        return Err(StoreError::CampaignNotFound);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Admin permissions required")]
    RequiresAdminPermissions,
    #[error("Campaign belongs to another sales person")]
    CampaignAccessDenied,
    #[error("Field too long")]
    FieldTooLong,
    #[error("Commission rate must be between 0 and 100")]
    CommissionRateOutOfRange,
    #[error("Order must contain at least one product")]
    EmptyProductList,
    #[error("Product name must not be empty")]
    ProductNameRequired,
    #[error("Product quantity must be a positive whole number")]
    ProductQtyNotPositive,
    #[error("Product base price must not be negative")]
    ProductPriceNegative,
    #[error("Product base price must have at most 2 decimal places")]
    ProductPriceTooPrecise,
    #[error("The campaign of an order cannot be changed")]
    OrderCampaignImmutable,
    #[error("The sales person of a campaign cannot be changed")]
    CampaignSalesPersonImmutable,
    #[error("Assigned user must have the sales role")]
    AssignedUserNotSales,
    #[error("Month must be between 1 and 12")]
    InvalidMonth,
    #[error("User not found")]
    UserNotFound,
    #[error("Campaign not found")]
    CampaignNotFound,
    #[error("Order not found")]
    OrderNotFound,
    #[error("Cannot delete campaign with existing orders")]
    CampaignHasOrders,
    #[error("Cannot delete user who is assigned to campaigns")]
    UserOwnsCampaigns,
    #[error("Cannot delete your own account")]
    CannotDeleteSelf,
    #[error("Unique constraint violation")]
    NotUnique(#[source] sqlx::Error),
    #[error("Database error")]
    Database(#[source] sqlx::Error),
    #[error("Unexpected error")]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return StoreError::NotUnique(e);
        }
        StoreError::Database(e)
    }
}
