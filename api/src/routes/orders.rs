use actix_identity::Identity;
use actix_web::{HttpResponse, post, web};
use sqlx::PgPool;

use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id, load_actor};

#[tracing::instrument(skip(user, pool, time_source), ret)]
#[post("/create_order")]
pub async fn create_order(
    user: Identity,
    details: web::Json<payloads::requests::CreateOrder>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let order =
        store::orders::create_order(&details, &actor, &pool, &time_source)
            .await?;
    Ok(HttpResponse::Ok().json(order))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/get_order")]
pub async fn get_order(
    user: Identity,
    order_id: web::Json<payloads::OrderId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let order = store::orders::get_order(&order_id, &actor, &pool).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/orders")]
pub async fn list_orders(
    user: Identity,
    details: web::Json<payloads::requests::ListOrders>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let orders = store::orders::list_orders(&details, &actor, &pool).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument(skip(user, pool, time_source), ret)]
#[post("/order")]
pub async fn update_order(
    user: Identity,
    details: web::Json<payloads::requests::UpdateOrder>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let order =
        store::orders::update_order(&details, &actor, &pool, &time_source)
            .await?;
    Ok(HttpResponse::Ok().json(order))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/delete_order")]
pub async fn delete_order(
    user: Identity,
    order_id: web::Json<payloads::OrderId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    store::orders::delete_order(&order_id, &actor, &pool).await?;
    Ok(HttpResponse::Ok().finish())
}
