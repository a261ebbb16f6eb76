// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication user listing and deletion.
//!
//! Talks to the Identity Toolkit REST API:
//! - `accounts:batchGet` for paginated listing (ordered by local ID)
//! - `accounts:delete` for removing a single account
//!
//! With `FIREBASE_AUTH_EMULATOR_HOST` set, requests go to the emulator with
//! the `owner` token it accepts in place of real credentials.

use crate::db::OwnerDeletion;
use crate::error::{AppError, Result};
use crate::models::{UserPage, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

const PRODUCTION_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
const EMULATOR_TOKEN: &str = "Bearer owner";

/// Source of paginated user records.
#[async_trait]
pub trait UserListSource: Send + Sync {
    /// Fetch up to `page_size` users following `page_token`.
    ///
    /// `None` fetches the first page. The returned token is present only when
    /// more users follow.
    async fn fetch_page(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage>;
}

/// Identity Toolkit client.
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: Option<gcloud_sdk::GoogleAuthTokenGenerator>,
}

impl IdentityClient {
    /// Create a client for `project_id`.
    ///
    /// Uses the service account key when given, application default
    /// credentials otherwise.
    pub async fn new(project_id: &str, service_account: Option<&Path>) -> Result<Self> {
        if let Ok(host) = std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            tracing::info!(host = %host, "Using Firebase Auth emulator");
            return Ok(Self::with_base_url(
                format!("http://{}/identitytoolkit.googleapis.com", host),
                project_id,
            ));
        }

        let source = match service_account {
            Some(path) => gcloud_sdk::TokenSourceType::File(path.to_path_buf()),
            None => gcloud_sdk::TokenSourceType::Default,
        };
        let auth =
            gcloud_sdk::GoogleAuthTokenGenerator::new(source, gcloud_sdk::GCP_DEFAULT_SCOPES.clone())
                .await
                .map_err(|e| AppError::Identity(format!("Failed to load credentials: {}", e)))?;

        tracing::info!(project = project_id, "Identity Toolkit client ready");

        Ok(Self {
            auth: Some(auth),
            ..Self::with_base_url(PRODUCTION_BASE_URL.to_string(), project_id)
        })
    }

    /// Unauthenticated client against an arbitrary base URL.
    pub fn with_base_url(base_url: String, project_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            project_id: project_id.to_string(),
            auth: None,
        }
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/accounts:{}",
            self.base_url, self.project_id, method
        )
    }

    async fn authorization(&self) -> Result<String> {
        match &self.auth {
            Some(auth) => {
                let token = auth
                    .create_token()
                    .await
                    .map_err(|e| AppError::Identity(format!("Failed to obtain token: {}", e)))?;
                Ok(token.header_value())
            }
            None => Ok(EMULATOR_TOKEN.to_string()),
        }
    }

    /// Delete one account. A missing account is reported, not an error.
    pub async fn delete_account(&self, uid: &str) -> Result<OwnerDeletion> {
        let response = self
            .http
            .post(self.accounts_url("delete"))
            .header(reqwest::header::AUTHORIZATION, self.authorization().await?)
            .json(&serde_json::json!({ "localId": uid }))
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Delete request failed: {}", e)))?;

        if response.status().is_success() {
            tracing::info!(uid = %uid, "Deleted identity record");
            return Ok(OwnerDeletion::Deleted);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if api_error_message(&body).as_deref() == Some("USER_NOT_FOUND") {
            tracing::info!(uid = %uid, "Identity record already gone");
            return Ok(OwnerDeletion::NotFound);
        }

        Err(AppError::Identity(format!("HTTP {}: {}", status, body)))
    }
}

#[async_trait]
impl UserListSource for IdentityClient {
    async fn fetch_page(&self, page_size: u32, page_token: Option<&str>) -> Result<UserPage> {
        let mut query = vec![("maxResults", page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("nextPageToken", token.to_string()));
        }

        let response = self
            .http
            .get(self.accounts_url("batchGet"))
            .header(reqwest::header::AUTHORIZATION, self.authorization().await?)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Identity(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Identity(format!("HTTP {}: {}", status, body)));
        }

        let raw: BatchGetResponse = response
            .json()
            .await
            .map_err(|e| AppError::Identity(format!("Invalid batchGet response: {}", e)))?;

        let page = raw.into_page();
        tracing::debug!(
            count = page.users.len(),
            has_next = page.next_page_token.is_some(),
            "Fetched user page"
        );
        Ok(page)
    }
}

/// `accounts:batchGet` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    users: Vec<RawUser>,
    next_page_token: Option<String>,
}

impl BatchGetResponse {
    fn into_page(self) -> UserPage {
        let users: Vec<UserRecord> = self.users.into_iter().map(RawUser::into_record).collect();
        // The API can hand out a token that leads to an empty page.
        let next_page_token = self
            .next_page_token
            .filter(|token| !token.is_empty() && !users.is_empty());
        UserPage {
            users,
            next_page_token,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    /// Milliseconds since the epoch, as a string
    created_at: Option<String>,
    /// Milliseconds since the epoch, as a string
    last_login_at: Option<String>,
    /// RFC 3339
    last_refresh_at: Option<String>,
}

impl RawUser {
    fn into_record(self) -> UserRecord {
        UserRecord {
            created_at: self.created_at.as_deref().and_then(parse_millis),
            last_login_at: self.last_login_at.as_deref().and_then(parse_millis),
            last_refresh_at: self.last_refresh_at.as_deref().and_then(parse_rfc3339),
            email: self.email,
            display_name: self.display_name,
            id: self.local_id,
        }
    }
}

fn parse_millis(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Pull `error.message` out of an Identity Toolkit error body.
fn api_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
