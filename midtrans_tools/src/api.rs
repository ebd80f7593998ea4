use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::MidtransConfig,
    data_objects::{SnapErrorResponse, SnapRequest, SnapResponse},
    MidtransApiError,
};

#[derive(Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MidtransConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, MidtransApiError> {
        let url = self.url(path);
        trace!("💳️ POST {url}");
        let response = self
            .client
            .post(url)
            .basic_auth(self.config.server_key.reveal(), None::<&str>)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MidtransApiError::Timeout(e.to_string())
                } else {
                    MidtransApiError::RequestError(e.to_string())
                }
            })?;
        let status = response.status();
        if status.is_success() {
            trace!("💳️ Midtrans responded with {status}");
            response.json::<T>().await.map_err(|e| MidtransApiError::JsonError(e.to_string()))
        } else {
            let text = response.text().await.map_err(|e| MidtransApiError::RequestError(e.to_string()))?;
            let message = serde_json::from_str::<SnapErrorResponse>(&text)
                .ok()
                .filter(|e| !e.error_messages.is_empty())
                .map(|e| e.error_messages.join("; "))
                .unwrap_or(text);
            Err(MidtransApiError::QueryError { status: status.as_u16(), message })
        }
    }

    /// Opens a Snap checkout. The returned token is for the embedded Snap popup; the redirect URL is for everyone else.
    pub async fn create_snap_transaction(&self, request: &SnapRequest) -> Result<SnapResponse, MidtransApiError> {
        let order_id = &request.transaction_details.order_id;
        debug!("💳️ Requesting Snap checkout for {order_id}");
        let response = self.post::<SnapResponse, _>("/snap/v1/transactions", request).await?;
        info!("💳️ Snap checkout created for {order_id}");
        Ok(response)
    }
}
