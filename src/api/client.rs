use std::sync::Arc;

use reqwest::{multipart::Form, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::api::{error, success::Envelope};
use crate::middlewares::{authentication, intercept};
use crate::modules::auth::session::SessionStore;

/// Thin wrapper over `reqwest` rooted at the API base path.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    origin: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        session: Arc<SessionStore>,
    ) -> Result<Self, error::SystemError> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|e| error::SystemError::InvalidUrl(format!("{base_url}: {e}").into()))?;
        if base_url.cannot_be_a_base() {
            return Err(error::SystemError::InvalidUrl(base_url.to_string().into()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let origin = base_url.origin().ascii_serialization();
        log::info!("API client rooted at {base_url}");
        Ok(Self { http, base_url, origin, session })
    }

    /// Scheme, host and port of the API, without a trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn url(&self, path: &str) -> Result<Url, error::SystemError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| error::SystemError::InvalidUrl(format!("{path}: {e}").into()))
    }

    /// Query values are percent-encoded by `Url`.
    pub fn url_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Url, error::SystemError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{method} {url}");
        self.http.request(method, url)
    }

    /// Sends with the current bearer token and runs the response interceptor.
    pub async fn send(&self, req: RequestBuilder) -> Result<Response, error::SystemError> {
        let res = authentication(req, &self.session).send().await?;
        intercept(res, &self.session).await
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, error::SystemError> {
        let bytes = res.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Decodes a mutation response and logs the server's message, if any.
    async fn decode_reporting<T: DeserializeOwned>(
        path: &str,
        res: Response,
    ) -> Result<Envelope<T>, error::SystemError> {
        let envelope: Envelope<T> = Self::decode(res).await?;
        if let Some(message) = envelope.message() {
            log::info!("{path}: {message}");
        }
        Ok(envelope)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, error::SystemError> {
        self.get_query(path, &[]).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, error::SystemError> {
        let url = self.url_with_query(path, query)?;
        let res = self.send(self.request(Method::GET, url)).await?;
        Self::decode(res).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>, error::SystemError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let res = self.send(self.request(Method::POST, url).json(body)).await?;
        Self::decode_reporting(path, res).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>, error::SystemError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let res = self.send(self.request(Method::PUT, url).json(body)).await?;
        Self::decode_reporting(path, res).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<Envelope<T>, error::SystemError> {
        let url = self.url(path)?;
        let res = self.send(self.request(Method::POST, url).multipart(form)).await?;
        Self::decode_reporting(path, res).await
    }

    /// Sends a body-less request whose response body is irrelevant.
    pub async fn execute(&self, method: Method, path: &str) -> Result<(), error::SystemError> {
        let url = self.url(path)?;
        self.send(self.request(method, url)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), error::SystemError> {
        self.execute(Method::DELETE, path).await
    }
}
