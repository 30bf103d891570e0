use super::{ApiError, ContactApi, ContactForm};
use crate::{Contact, Envelope};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Talks to a running contacts server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContactApi {
    client: Client,
    base_url: String,
}

impl HttpContactApi {
    /// `base_url` is everything before `/contacts`, e.g. `http://localhost:7777/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `req` and unwraps the envelope. Failures keep the server's message when there is
    /// one and fall back to `failed` otherwise.
    async fn send<T: DeserializeOwned>(
        req: RequestBuilder,
        failed: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let res = req.send().await.map_err(|e| {
            log::debug!("request failed: {}", e);
            ApiError::new(None, failed)
        })?;
        let status = res.status();
        log::debug!("API response: {}", status);

        if status.is_success() {
            return res.json::<Envelope<T>>().await.map_err(|e| {
                log::warn!("unreadable response body: {}", e);
                ApiError::new(Some(status.as_u16()), failed)
            });
        }

        let message = match res.json::<Envelope<()>>().await {
            Ok(Envelope {
                message: Some(message),
                ..
            }) => message,
            _ => failed.to_string(),
        };
        Err(ApiError::new(Some(status.as_u16()), message))
    }

    fn data<T>(env: Envelope<T>, failed: &str) -> Result<T, ApiError> {
        env.data.ok_or_else(|| ApiError::new(None, failed))
    }
}

impl ContactApi for HttpContactApi {
    async fn health(&self) -> Result<(), ApiError> {
        const FAILED: &str = "Server is not responding";

        let res = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|_| ApiError::new(None, FAILED))?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::new(Some(res.status().as_u16()), FAILED))
        }
    }

    async fn list(&self) -> Result<Vec<Contact>, ApiError> {
        const FAILED: &str = "Failed to fetch contacts";

        let req = self.client.get(self.url("/contacts"));
        Self::data(Self::send(req, FAILED).await?, FAILED)
    }

    async fn search(&self, query: &str) -> Result<Vec<Contact>, ApiError> {
        const FAILED: &str = "Failed to search contacts";

        let mut url = reqwest::Url::parse(&self.url("/contacts/search"))
            .map_err(|_| ApiError::new(None, FAILED))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::new(None, FAILED))?
            .push(query);

        Self::data(Self::send(self.client.get(url), FAILED).await?, FAILED)
    }

    async fn create(&self, form: &ContactForm) -> Result<Contact, ApiError> {
        const FAILED: &str = "Failed to create contact";

        let req = self.client.post(self.url("/contacts/create")).json(form);
        Self::data(Self::send(req, FAILED).await?, FAILED)
    }

    async fn update(&self, id: i64, form: &ContactForm) -> Result<Contact, ApiError> {
        const FAILED: &str = "Failed to update contact";

        let req = self
            .client
            .put(self.url(&format!("/contacts/edit/{}", id)))
            .json(form);
        Self::data(Self::send(req, FAILED).await?, FAILED)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        const FAILED: &str = "Failed to delete contact";

        let req = self.client.delete(self.url(&format!("/contacts/{}", id)));
        Self::send::<()>(req, FAILED).await.map(drop)
    }
}
