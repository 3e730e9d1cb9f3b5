pub mod campaigns;
pub mod login;
pub mod orders;
pub mod payouts;
pub mod users;

use actix_identity::Identity;
use actix_web::{
    HttpResponse, Responder, ResponseError, body::BoxBody,
    dev::HttpServiceFactory, get, web,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{self, StoreError};

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(login::login)
        .service(login::login_check)
        .service(login::user_profile)
        .service(login::logout)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::list_users)
        .service(users::update_user)
        .service(users::delete_user)
        .service(campaigns::create_campaign)
        .service(campaigns::get_campaign)
        .service(campaigns::list_campaigns)
        .service(campaigns::update_campaign)
        .service(campaigns::delete_campaign)
        .service(orders::create_order)
        .service(orders::get_order)
        .service(orders::list_orders)
        .service(orders::update_order)
        .service(orders::delete_order)
        .service(payouts::my_payout)
        .service(payouts::team_payout)
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("Forbidden")]
    Forbidden(#[source] anyhow::Error),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    #[error("Conflict")]
    Conflict(#[source] anyhow::Error),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::AuthError(e) => {
                HttpResponse::Unauthorized().body(format!("{self}: {e}"))
            }
            Self::BadRequest(e) => {
                HttpResponse::BadRequest().body(format!("{self}: {e}"))
            }
            Self::Forbidden(e) => {
                HttpResponse::Forbidden().body(format!("{self}: {e}"))
            }
            Self::NotFound(e) => {
                HttpResponse::NotFound().body(format!("{self}: {e}"))
            }
            Self::Conflict(e) => {
                HttpResponse::Conflict().body(format!("{self}: {e}"))
            }
            Self::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(self.to_string())
            }
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(_) => APIError::UnexpectedError(e.into()),
            StoreError::UnexpectedError(_) => {
                APIError::UnexpectedError(e.into())
            }
            StoreError::RequiresAdminPermissions => APIError::Forbidden(e.into()),
            StoreError::CampaignAccessDenied => APIError::Forbidden(e.into()),
            StoreError::UserNotFound => APIError::NotFound(e.into()),
            StoreError::CampaignNotFound => APIError::NotFound(e.into()),
            StoreError::OrderNotFound => APIError::NotFound(e.into()),
            StoreError::CampaignHasOrders => APIError::Conflict(e.into()),
            StoreError::UserOwnsCampaigns => APIError::Conflict(e.into()),
            StoreError::NotUnique(_) => APIError::Conflict(e.into()),
            _ => APIError::BadRequest(e.into()),
        }
    }
}

fn get_user_id(user: &Identity) -> Result<payloads::UserId, APIError> {
    let id_str = user.id().map_err(|e| {
        APIError::AuthError(
            anyhow::Error::from(e).context("Invalid login session"),
        )
    })?;
    // special case: since this is used in so many routes, the user_id is
    // recorded here, but attaches to the span for the api route itself
    tracing::Span::current()
        .record("user_id", tracing::field::display(&id_str));
    Ok(payloads::UserId(
        Uuid::parse_str(&id_str).map_err(anyhow::Error::from)?,
    ))
}

/// Resolve the session's user row. A session pointing at a missing user
/// cannot be treated as authenticated.
async fn load_actor(
    user_id: &payloads::UserId,
    pool: &PgPool,
) -> Result<store::User, APIError> {
    store::read_user(pool, user_id).await.map_err(|e| match e {
        StoreError::UserNotFound => APIError::AuthError(
            anyhow::Error::from(e).context("Couldn't resolve session user"),
        ),
        _ => APIError::UnexpectedError(e.into()),
    })
}
