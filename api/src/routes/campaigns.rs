use actix_identity::Identity;
use actix_web::{HttpResponse, get, post, web};
use sqlx::PgPool;

use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id, load_actor};

#[tracing::instrument(skip(user, pool, time_source), ret)]
#[post("/create_campaign")]
pub async fn create_campaign(
    user: Identity,
    details: web::Json<payloads::requests::CreateCampaign>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    let campaign =
        store::create_campaign(&details, &admin, &pool, &time_source).await?;
    Ok(HttpResponse::Ok().json(campaign))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/get_campaign")]
pub async fn get_campaign(
    user: Identity,
    campaign_id: web::Json<payloads::CampaignId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let campaign = store::get_campaign(&campaign_id, &actor, &pool).await?;
    Ok(HttpResponse::Ok().json(campaign))
}

#[tracing::instrument(skip(user, pool))]
#[get("/campaigns")]
pub async fn list_campaigns(
    user: Identity,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let campaigns = store::list_campaigns(&actor, &pool).await?;
    Ok(HttpResponse::Ok().json(campaigns))
}

#[tracing::instrument(skip(user, pool, time_source), ret)]
#[post("/campaign")]
pub async fn update_campaign(
    user: Identity,
    details: web::Json<payloads::requests::UpdateCampaign>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    let campaign =
        store::update_campaign(&details, &admin, &pool, &time_source).await?;
    Ok(HttpResponse::Ok().json(campaign))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/delete_campaign")]
pub async fn delete_campaign(
    user: Identity,
    campaign_id: web::Json<payloads::CampaignId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    store::delete_campaign(&campaign_id, &admin, &pool).await?;
    Ok(HttpResponse::Ok().finish())
}
