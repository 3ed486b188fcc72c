use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{user_message, Result, YaquedoError};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

/// A single column predicate, rendered as a query-string pair the gateway's
/// REST dialect understands.
#[derive(Debug, Clone)]
pub enum Filter {
    Eq(&'static str, String),
    Gte(&'static str, String),
    Lte(&'static str, String),
    /// Case-insensitive substring match.
    #[allow(dead_code)]
    Ilike(&'static str, String),
}

impl Filter {
    pub fn query_pair(&self) -> (String, String) {
        match self {
            Filter::Eq(col, v) => (col.to_string(), format!("eq.{v}")),
            Filter::Gte(col, v) => (col.to_string(), format!("gte.{v}")),
            Filter::Lte(col, v) => (col.to_string(), format!("lte.{v}")),
            Filter::Ilike(col, v) => (col.to_string(), format!("ilike.*{v}*")),
        }
    }
}

// ---------------------------------------------------------------------------
// Auth payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin client for the remote data gateway (auth + row storage). All calls
/// are plain request/response; there is no client-side retry, cancellation,
/// or timeout beyond what the transport enforces.
pub struct Gateway {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

impl Gateway {
    pub fn new(settings: &Settings) -> Self {
        let token = settings.session.as_ref().map(|s| s.access_token.clone());
        Self {
            http: Client::new(),
            base_url: settings.gateway_url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            access_token: RwLock::new(token),
        }
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().expect("token lock") = token;
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .expect("token lock")
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    // -- auth ---------------------------------------------------------------

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let resp = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::warn!("sign_in rejected: {body}");
            return Err(YaquedoError::Auth(user_message(&body)));
        }
        let session: Session = resp.json().await?;
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        let resp = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::warn!("sign_up rejected: {body}");
            return Err(YaquedoError::Auth(user_message(&body)));
        }
        let session: Session = resp.json().await?;
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<()> {
        let resp = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        // A failed remote logout still clears the local token.
        if !resp.status().is_success() {
            log::warn!("remote sign_out returned {}", resp.status());
        }
        self.set_access_token(None);
        Ok(())
    }

    // -- rows ---------------------------------------------------------------

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[Filter],
        order: Option<&str>,
    ) -> Result<Vec<T>> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), columns.to_string())];
        params.extend(filters.iter().map(Filter::query_pair));
        if let Some(o) = order {
            params.push(("order".to_string(), o.to_string()));
        }
        let resp = self
            .http
            .get(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&params)
            .send()
            .await?;
        Self::expect_success(resp).await?.json().await.map_err(Into::into)
    }

    /// Count-only query. No row payload crosses the wire.
    pub async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), "id".to_string())];
        params.extend(filters.iter().map(Filter::query_pair));
        let resp = self
            .http
            .head(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .query(&params)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(YaquedoError::Gateway {
                status,
                message: format!("count on {table} failed"),
            });
        }
        let header = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        parse_content_range(header).ok_or_else(|| YaquedoError::Gateway {
            status: 200,
            message: format!("unparseable content-range {header:?}"),
        })
    }

    pub async fn insert<T: Serialize, R: DeserializeOwned>(&self, table: &str, row: &T) -> Result<R> {
        let resp = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let mut rows: Vec<R> = Self::expect_success(resp).await?.json().await?;
        rows.pop().ok_or_else(|| YaquedoError::Gateway {
            status: 200,
            message: format!("insert into {table} returned no row"),
        })
    }

    pub async fn update(&self, table: &str, patch: &Value, filters: &[Filter]) -> Result<()> {
        let params: Vec<(String, String)> = filters.iter().map(Filter::query_pair).collect();
        let resp = self
            .http
            .patch(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&params)
            .json(patch)
            .send()
            .await?;
        Self::expect_success(resp).await.map(|_| ())
    }

    pub async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        let params: Vec<(String, String)> = filters.iter().map(Filter::query_pair).collect();
        let resp = self
            .http
            .delete(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .query(&params)
            .send()
            .await?;
        Self::expect_success(resp).await.map(|_| ())
    }

    async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        log::warn!("gateway rejected request ({status}): {message}");
        Err(YaquedoError::Gateway { status, message })
    }
}

/// Parse the total out of a `content-range` header like `0-0/42` or `*/0`.
fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse().ok()
}
