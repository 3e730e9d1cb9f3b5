use crate::{
    CampaignId, CampaignStatus, CampaignType, OrderId, OrderStatus, Platform,
    Product, Role, UserId, UserStatus,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub commission_rate: Decimal,
    pub status: UserStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: CampaignId,
    pub reference_id: String,
    pub title: String,
    pub platform: Platform,
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub sales_person_id: UserId,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub reference_id: String,
    pub campaign_id: CampaignId,
    pub products: Vec<Product>,
    pub order_total: Decimal,
    /// The assigned sales person's commission rate at order creation.
    /// Frozen forever; later rate changes never alter it.
    pub snapshot_rate: Decimal,
    pub commission_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One campaign's contribution to a payout report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPayout {
    pub campaign_id: CampaignId,
    pub title: String,
    pub order_count: i64,
    pub total_sales: Decimal,
    pub total_commission: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyPayout {
    pub year: i16,
    pub month: i8,
    pub total_commission: Decimal,
    pub campaigns: Vec<CampaignPayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPersonPayout {
    pub user_id: UserId,
    pub name: String,
    pub total_commission: Decimal,
    pub campaigns: Vec<CampaignPayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPayout {
    pub year: i16,
    pub month: i8,
    pub grand_total_commission: Decimal,
    pub sales_persons: Vec<SalesPersonPayout>,
}
