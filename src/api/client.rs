// src/api/client.rs
//! HTTP client for the private `api/v3` endpoints.
//!
//! Every call is a JSON POST. The client owns the pacing (`RateLimiter`),
//! the 429 retry loop and the optional interceptor; the transport below it
//! only moves bytes.

use super::interceptor::RequestInterceptor;
use super::responses::{
    Cursor, GetRecordValuesRequest, GetRecordValuesResponse, LoadPageChunkRequest,
    LoadPageChunkResponse, QueryCollectionRequest, QueryCollectionResponse,
};
use super::throttle::RateLimiter;
use super::transport::{HttpRequest, ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::constants::{
    ACCEPT_LANGUAGE, GET_RECORD_VALUES_PATH, LOAD_PAGE_CHUNK_PATH, QUERY_COLLECTION_PATH,
    USER_AGENT,
};
use crate::error::{AppError, NotionErrorCode, Result};
use crate::error_recovery::retry_rate_limited;
use crate::model::Table;
use crate::types::NotionId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

const METHOD: &str = "POST";

/// Client for one download session. Not meant to be shared between
/// independent downloads: the rate limiter state lives here.
pub struct NotionClient {
    transport: Arc<dyn Transport>,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    limiter: RateLimiter,
    config: ClientConfig,
}

impl NotionClient {
    /// Creates a client talking to the network through reqwest.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of any transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            interceptor: None,
            limiter: RateLimiter::new(config.min_request_interval),
            config,
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /api/v3/loadCachedPageChunk`
    pub async fn load_page_chunk(
        &self,
        page_id: &NotionId,
        chunk_number: u32,
        limit: u32,
        cursor: Cursor,
    ) -> Result<LoadPageChunkResponse> {
        let request = LoadPageChunkRequest::new(page_id, chunk_number, limit, cursor);
        self.post_api(LOAD_PAGE_CHUNK_PATH, &request).await
    }

    /// `POST /api/v3/getRecordValues` for `ids` of one table.
    pub async fn get_record_values(
        &self,
        table: Table,
        ids: &[NotionId],
    ) -> Result<GetRecordValuesResponse> {
        let request = GetRecordValuesRequest::new(table, ids);
        self.post_api(GET_RECORD_VALUES_PATH, &request).await
    }

    /// `POST /api/v3/queryCollection`
    pub async fn query_collection(
        &self,
        request: &QueryCollectionRequest,
    ) -> Result<QueryCollectionResponse> {
        self.post_api(QUERY_COLLECTION_PATH, request).await
    }

    /// Serializes `request`, posts it to `path` and decodes the response.
    pub async fn post_api<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_string(request)?;
        let response = self.post_raw(path, body).await?;

        serde_json::from_str(&response).map_err(|e| {
            let preview: String = response
                .chars()
                .take(crate::constants::ERROR_BODY_PREVIEW_LENGTH)
                .collect();
            log::error!("Failed to parse response from {}: {}", path, e);
            AppError::MalformedResponse(format!("{}: {} (body: {})", path, e, preview))
        })
    }

    /// Posts a JSON body and returns the raw body of a 200 response.
    pub async fn post_raw(&self, path: &str, body: String) -> Result<String> {
        let url = self.endpoint(path)?;

        if let Some(interceptor) = &self.interceptor {
            if let Some(cached) = interceptor.try_read(METHOD, &url, &body) {
                return Ok(cached);
            }
        }

        let request = HttpRequest {
            method: METHOD.to_string(),
            url: url.clone(),
            headers: self.headers(),
            body,
        };

        let client = self;
        let outgoing = &request;
        let response = retry_rate_limited(
            move || async move {
                client.limiter.acquire().await;
                log::debug!("{} {}", METHOD, outgoing.url);
                client.transport.send(outgoing).await
            },
            &self.config.rate_limit_backoff,
            &url,
        )
        .await?;

        if !response.is_success() {
            let (code, message) = NotionErrorCode::classify(response.status, &response.body);
            log::error!("{} {} returned status {}: {}", METHOD, url, response.status, message);
            return Err(AppError::HttpStatus {
                url,
                status: response.status,
                code,
                message,
            });
        }

        if let Some(interceptor) = &self.interceptor {
            interceptor.write(METHOD, &url, &request.body, &response.body);
        }

        Ok(response.body)
    }

    /// Joins `path` below the base URL, keeping any path prefix of the base.
    fn endpoint(&self, path: &str) -> Result<String> {
        let mut base = Url::parse(&self.config.base_url)?;
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        Ok(base.join(path.trim_start_matches('/'))?.to_string())
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
        ];
        if let Some(token) = &self.config.auth_token {
            headers.push(("Cookie".to_string(), token.cookie_header()));
        }
        headers
    }
}
