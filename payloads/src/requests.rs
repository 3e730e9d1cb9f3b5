use crate::{
    CampaignId, CampaignStatus, CampaignType, OrderId, OrderStatus, Patch,
    Platform, Product, Role, UserId, UserStatus,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const USERNAME_MAX_LEN: usize = 30;
pub const NAME_MAX_LEN: usize = 255;
pub const CAMPAIGN_TITLE_MAX_LEN: usize = 255;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Percent, 0-100. Ignored for admins, who are stored with rate 0.
    pub commission_rate: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub name: Option<String>,
    /// Percent, 0-100. Changing this never touches existing orders; they
    /// keep the rate snapshotted at creation.
    pub commission_rate: Option<Decimal>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub platform: Platform,
    pub campaign_type: CampaignType,
    pub sales_person_id: UserId,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCampaign {
    pub campaign_id: CampaignId,
    pub title: Option<String>,
    pub campaign_type: Option<CampaignType>,
    pub status: Option<CampaignStatus>,
    pub start_date: Option<Timestamp>,
    /// Tri-state: absent leaves the stored value, null clears it. The
    /// status lifecycle may still override the result (completion sets it,
    /// reactivation clears it).
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub end_date: Patch<Timestamp>,
    /// The assigned sales person is immutable; supplying a different id
    /// here is rejected.
    pub sales_person_id: Option<UserId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrder {
    pub campaign_id: CampaignId,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOrder {
    pub order_id: OrderId,
    pub products: Option<Vec<Product>>,
    pub status: Option<OrderStatus>,
    /// The owning campaign is immutable; supplying a different id here is
    /// rejected.
    pub campaign_id: Option<CampaignId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListOrders {
    pub campaign_id: CampaignId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayoutQuery {
    pub year: i16,
    /// 1-12, 1 = January.
    pub month: i8,
}
