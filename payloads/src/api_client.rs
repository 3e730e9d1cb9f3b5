use crate::{CampaignId, OrderId, UserId, requests, responses};
use reqwest::StatusCode;
use serde::Serialize;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.inner_client
            .post(self.format_url(path))
            .json(body)
            .send()
            .await
    }

    async fn empty_post(&self, path: &str) -> ReqwestResult {
        self.inner_client.post(self.format_url(path)).send().await
    }

    async fn empty_get(&self, path: &str) -> ReqwestResult {
        self.inner_client.get(self.format_url(path)).send().await
    }

    async fn get_query(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> ReqwestResult {
        self.inner_client
            .get(self.format_url(path))
            .query(query)
            .send()
            .await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.empty_get("health_check").await?;
        ok_empty(response).await
    }

    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<(), ClientError> {
        let response = self.post("login", &details).await?;
        ok_empty(response).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.empty_post("logout").await?;
        ok_empty(response).await
    }

    /// Check if the user is logged in.
    pub async fn login_check(&self) -> Result<bool, ClientError> {
        let response = self.empty_post("login_check").await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            _ => Err(ClientError::APIError(
                response.status(),
                response.text().await?,
            )),
        }
    }

    /// Get the current user's profile information.
    pub async fn user_profile(
        &self,
    ) -> Result<responses::User, ClientError> {
        let response = self.empty_get("user_profile").await?;
        ok_body(response).await
    }

    pub async fn create_user(
        &self,
        details: &requests::CreateUser,
    ) -> Result<UserId, ClientError> {
        let response = self.post("create_user", details).await?;
        ok_body(response).await
    }

    pub async fn get_user(
        &self,
        user_id: &UserId,
    ) -> Result<responses::User, ClientError> {
        let response = self.post("get_user", user_id).await?;
        ok_body(response).await
    }

    pub async fn list_users(
        &self,
    ) -> Result<Vec<responses::User>, ClientError> {
        let response = self.empty_get("users").await?;
        ok_body(response).await
    }

    pub async fn update_user(
        &self,
        details: &requests::UpdateUser,
    ) -> Result<responses::User, ClientError> {
        let response = self.post("user", details).await?;
        ok_body(response).await
    }

    pub async fn delete_user(
        &self,
        user_id: &UserId,
    ) -> Result<(), ClientError> {
        let response = self.post("delete_user", user_id).await?;
        ok_empty(response).await
    }

    pub async fn create_campaign(
        &self,
        details: &requests::CreateCampaign,
    ) -> Result<responses::Campaign, ClientError> {
        let response = self.post("create_campaign", details).await?;
        ok_body(response).await
    }

    pub async fn get_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<responses::Campaign, ClientError> {
        let response = self.post("get_campaign", campaign_id).await?;
        ok_body(response).await
    }

    pub async fn list_campaigns(
        &self,
    ) -> Result<Vec<responses::Campaign>, ClientError> {
        let response = self.empty_get("campaigns").await?;
        ok_body(response).await
    }

    pub async fn update_campaign(
        &self,
        details: &requests::UpdateCampaign,
    ) -> Result<responses::Campaign, ClientError> {
        let response = self.post("campaign", details).await?;
        ok_body(response).await
    }

    pub async fn delete_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<(), ClientError> {
        let response = self.post("delete_campaign", campaign_id).await?;
        ok_empty(response).await
    }

    pub async fn create_order(
        &self,
        details: &requests::CreateOrder,
    ) -> Result<responses::Order, ClientError> {
        let response = self.post("create_order", details).await?;
        ok_body(response).await
    }

    pub async fn get_order(
        &self,
        order_id: &OrderId,
    ) -> Result<responses::Order, ClientError> {
        let response = self.post("get_order", order_id).await?;
        ok_body(response).await
    }

    pub async fn list_orders(
        &self,
        details: &requests::ListOrders,
    ) -> Result<Vec<responses::Order>, ClientError> {
        let response = self.post("orders", details).await?;
        ok_body(response).await
    }

    pub async fn update_order(
        &self,
        details: &requests::UpdateOrder,
    ) -> Result<responses::Order, ClientError> {
        let response = self.post("order", details).await?;
        ok_body(response).await
    }

    pub async fn delete_order(
        &self,
        order_id: &OrderId,
    ) -> Result<(), ClientError> {
        let response = self.post("delete_order", order_id).await?;
        ok_empty(response).await
    }

    pub async fn my_payout(
        &self,
        query: &requests::PayoutQuery,
    ) -> Result<responses::MyPayout, ClientError> {
        let response = self.get_query("payouts/me", query).await?;
        ok_body(response).await
    }

    pub async fn team_payout(
        &self,
        query: &requests::PayoutQuery,
    ) -> Result<responses::TeamPayout, ClientError> {
        let response = self.get_query("payouts/team", query).await?;
        ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
