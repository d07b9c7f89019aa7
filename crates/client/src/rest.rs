//! `reqwest` implementation of [`BillingBackend`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use fracc_core::dues::{BillingConfig, NewPaymentRecord, PaymentRecord, Resident};
use fracc_shared::SessionContext;
use fracc_shared::config::ApiConfig;
use fracc_shared::types::ResidentId;

use crate::backend::{BillingBackend, MultiPaymentReceipt, MultiPaymentRequest};
use crate::error::ClientError;

/// Backend reached over HTTP with a bearer token from the session.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl RestBackend {
    /// Creates a backend client with the configured per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends an authenticated request and decodes the JSON answer.
    ///
    /// A 401 ends the session before returning `Unauthorized`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let token = self
            .session
            .bearer()
            .await
            .map_err(|_| ClientError::Unauthorized)?;

        let response = request.bearer_auth(token).send().await.map_err(|e| {
            error!(error = %e, "Backend request failed");
            ClientError::Http(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Backend rejected token, ending session");
            self.session.end().await;
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), url = %url, body = %body, "Backend returned an error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), url = %response.url(), "Backend request succeeded");
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BillingBackend for RestBackend {
    async fn get_resident(&self, id: ResidentId) -> Result<Resident, ClientError> {
        let request = self.client.get(self.url(&format!("/api/residentes/{id}")));
        self.send(request).await
    }

    async fn list_payment_records(
        &self,
        resident_id: ResidentId,
    ) -> Result<Vec<PaymentRecord>, ClientError> {
        let request = self
            .client
            .get(self.url("/api/pagos"))
            .query(&[("residenteId", resident_id.to_string())]);
        self.send(request).await
    }

    async fn get_billing_config(&self) -> Result<BillingConfig, ClientError> {
        self.send(self.client.get(self.url("/api/configuracion"))).await
    }

    async fn create_payment_record(
        &self,
        record: &NewPaymentRecord,
    ) -> Result<PaymentRecord, ClientError> {
        self.send(self.client.post(self.url("/api/pagos")).json(record)).await
    }

    async fn apply_multi_payment(
        &self,
        request: &MultiPaymentRequest,
    ) -> Result<MultiPaymentReceipt, ClientError> {
        let request = self.client.post(self.url("/api/pagos/multiple")).json(request);
        self.send(request).await
    }
}
