use actix_identity::Identity;
use actix_web::{HttpResponse, get, post, web};
use secrecy::{ExposeSecret, SecretBox};
use sqlx::PgPool;

use crate::password;
use crate::store;
use crate::time::TimeSource;

use super::{APIError, get_user_id, load_actor};

#[tracing::instrument(skip(user, details, pool, time_source))]
#[post("/create_user")]
pub async fn create_user(
    user: Identity,
    details: web::Json<payloads::requests::CreateUser>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    let details = details.into_inner();
    let password_hash = password::hash_password(SecretBox::new(Box::new(
        details.password.clone(),
    )))
    .await
    .map_err(APIError::UnexpectedError)?;
    let created = store::create_user(
        &details,
        password_hash.expose_secret(),
        &admin,
        &pool,
        &time_source,
    )
    .await?;
    Ok(HttpResponse::Ok().json(created.id))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/get_user")]
pub async fn get_user(
    user: Identity,
    target: web::Json<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let actor = load_actor(&user_id, &pool).await?;
    let result = store::get_user(&target, &actor, &pool).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[tracing::instrument(skip(user, pool))]
#[get("/users")]
pub async fn list_users(
    user: Identity,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    let users = store::list_users(&admin, &pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(skip(user, pool, time_source), ret)]
#[post("/user")]
pub async fn update_user(
    user: Identity,
    details: web::Json<payloads::requests::UpdateUser>,
    pool: web::Data<PgPool>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    let updated =
        store::update_user(&details, &admin, &pool, &time_source).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[tracing::instrument(skip(user, pool), ret)]
#[post("/delete_user")]
pub async fn delete_user(
    user: Identity,
    target: web::Json<payloads::UserId>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, APIError> {
    let user_id = get_user_id(&user)?;
    let admin = store::require_admin(&user_id, &pool).await?;
    store::delete_user(&target, &admin, &pool).await?;
    Ok(HttpResponse::Ok().finish())
}
