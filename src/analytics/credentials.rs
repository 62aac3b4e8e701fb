//! サービスアカウント認証情報
//!
//! JSONキーファイルを読み込み、OAuth2 JWT Bearer フロー用のアサーションを生成する。

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::PopularPagesError;

/// 読み取り専用スコープ
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// アサーションの有効期間（Googleの上限は1時間）
const ASSERTION_TTL_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// サービスアカウントキー (JSONキーファイルの必要な項目のみ)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// 秘密鍵をログに出さない
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

/// JWTクレーム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PopularPagesError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PopularPagesError::Credentials(format!("{} を読み込めません: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, PopularPagesError> {
        serde_json::from_str(content)
            .map_err(|e| PopularPagesError::Credentials(format!("キーファイルの形式が不正です: {}", e)))
    }

    pub fn claims(&self, scope: &str, now: DateTime<Utc>) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_TTL_SECS)).timestamp(),
        }
    }

    /// RS256で署名したアサーションを生成
    pub fn assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String, PopularPagesError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        let token = jsonwebtoken::encode(&header, &self.claims(scope, now), &key)?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation};

    const FIXTURE_KEY: &str = include_str!("../../tests/fixtures/service_account.json");
    const FIXTURE_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/service_account_public.pem");

    #[test]
    fn test_from_json_reads_fixture() {
        let key = ServiceAccountKey::from_json(FIXTURE_KEY).unwrap();
        assert_eq!(
            key.client_email,
            "reporter@popular-pages-test.iam.gserviceaccount.com"
        );
        assert_eq!(key.private_key_id.as_deref(), Some("test-key-id"));
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_from_json_defaults_token_uri() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "a@b.c", "private_key": "not-a-key"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        assert!(key.private_key_id.is_none());
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        let err = ServiceAccountKey::from_json(r#"{"client_email": "a@b.c"}"#).unwrap_err();
        assert!(matches!(err, PopularPagesError::Credentials(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServiceAccountKey::from_file("/nonexistent/key.json").unwrap_err();
        assert!(matches!(err, PopularPagesError::Credentials(msg) if msg.contains("/nonexistent/key.json")));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let key = ServiceAccountKey::from_json(FIXTURE_KEY).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("PRIVATE KEY"));
        assert!(printed.contains("reporter@popular-pages-test"));
    }

    #[test]
    fn test_claims_window() {
        let key = ServiceAccountKey::from_json(FIXTURE_KEY).unwrap();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = key.claims(ANALYTICS_READONLY_SCOPE, now);

        assert_eq!(claims.iss, key.client_email);
        assert_eq!(claims.aud, DEFAULT_TOKEN_URI);
        assert_eq!(claims.scope, ANALYTICS_READONLY_SCOPE);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
    }

    #[test]
    fn test_assertion_verifies_with_public_key() {
        let key = ServiceAccountKey::from_json(FIXTURE_KEY).unwrap();
        let token = key.assertion(ANALYTICS_READONLY_SCOPE, Utc::now()).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-id"));

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[DEFAULT_TOKEN_URI]);
        let decoded = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_rsa_pem(FIXTURE_PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();
        assert_eq!(decoded.claims.scope, ANALYTICS_READONLY_SCOPE);
    }

    #[test]
    fn test_assertion_rejects_bad_private_key() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "a@b.c", "private_key": "not-a-key"}"#,
        )
        .unwrap();
        let err = key.assertion(ANALYTICS_READONLY_SCOPE, Utc::now()).unwrap_err();
        assert!(matches!(err, PopularPagesError::Jwt(_)));
    }
}
