use actix_identity::Identity;
use actix_web::{HttpResponse, get, web};
use sqlx::PgPool;

use crate::store;

use super::{APIError, get_user_id, load_actor};

/// The caller's own payout for the requested month.
#[tracing::instrument(skip(user, pool), ret)]
#[get("/payouts/me")]
pub async fn my_payout(
    user: Identity,
    query: web::Query<payloads::requests::PayoutQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let payout =
        store::payouts::my_payout(&actor.id, &query, &pool).await?;
    Ok(HttpResponse::Ok().json(payout))
}

/// Payouts for every sales person in the requested month. Admin only.
#[tracing::instrument(skip(user, pool), ret)]
#[get("/payouts/team")]
pub async fn team_payout(
    user: Identity,
    query: web::Query<payloads::requests::PayoutQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    let payout = store::payouts::team_payout(&query, &admin, &pool).await?;
    Ok(HttpResponse::Ok().json(payout))
}
