//! 服务账号令牌 - 基础设施层
//!
//! 用服务账号私钥签发 RS256 断言，换取访问令牌；令牌缓存到过期前一分钟

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use crate::infrastructure::store::StoreError;

/// 读写表格所需的授权范围
pub const SCOPE_SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";
/// 只读授权范围
pub const SCOPE_SPREADSHEETS_READONLY: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// 服务账号令牌提供者
pub struct ServiceAccountAuth {
    http: reqwest::Client,
    client_email: String,
    key: EncodingKey,
    token_url: String,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// 私钥格式错误属于配置问题，在启动时暴露
    pub fn new(
        http: reqwest::Client,
        client_email: impl Into<String>,
        private_key_pem: &str,
        token_url: impl Into<String>,
        scope: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
            StoreError::Auth {
                reason: format!("私钥无法解析: {}", e),
            }
        })?;
        Ok(Self {
            http,
            client_email: client_email.into(),
            key,
            token_url: token_url.into(),
            scope: scope.into(),
            cached: Mutex::new(None),
        })
    }

    /// 获取访问令牌，优先使用缓存
    pub async fn access_token(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        debug!("正在获取新的访问令牌: {}", self.client_email);
        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// 丢弃缓存（收到 401 后调用）
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    fn sign_assertion(&self) -> Result<String, StoreError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_url,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key).map_err(|e| {
            StoreError::Auth {
                reason: format!("签发断言失败: {}", e),
            }
        })
    }

    async fn fetch_token(&self) -> Result<CachedToken, StoreError> {
        let assertion = self.sign_assertion()?;
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth {
                reason: format!("令牌接口返回 {}: {}", status.as_u16(), body),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);

        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.client_email)
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
