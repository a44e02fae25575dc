use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use reqwest::Client;
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DriveError, Result};

/// Scope requested with every token. The service only ever reads.
const READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// A Google service account key, deserialized from the standard JSON
/// document Google hands out for service identities.
///
/// The document is only ever parsed with serde; no part of it is treated as
/// anything other than data.
#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct ServiceAccountKey {
    project_id: String,
    private_key_id: String,
    private_key: String,
    client_email: String,
    auth_uri: String,
    token_uri: String,
    auth_provider_x509_cert_url: String,
    client_x509_cert_url: String,
    universe_domain: String,
}

#[derive(Serialize)]
struct JwtHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: u64,
    iat: u64,
}

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: u64,
}

impl ServiceAccountKey {
    pub fn try_from_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| {
            DriveError::AuthConfig(format!("failed to deserialize service account key: {e}"))
        })
    }

    /// Fetch an access token using this service account.
    ///
    /// Builds an RS256 JWT assertion signed with the account's private key
    /// and exchanges it at the key's token endpoint. Tokens are returned as
    /// is; callers hold them for a single session and never cache them.
    pub async fn fetch_access_token(&self, client: &Client) -> Result<AccessToken> {
        let now = Utc::now();
        let iat = now.timestamp() as u64;
        let exp = (now + Duration::hours(1)).timestamp() as u64;

        let claims = JwtClaims {
            iss: &self.client_email,
            scope: READ_ONLY_SCOPE,
            aud: &self.token_uri,
            iat,
            exp,
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };

        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_string(&header)?);
        let claims_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_string(&claims)?);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let signature = self.sign(signing_input.as_bytes())?;
        let jwt = format!(
            "{}.{}",
            signing_input,
            BASE64_URL_SAFE_NO_PAD.encode(signature)
        );

        // Exchange the JWT for an access token.
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];
        let res = client.post(&self.token_uri).form(&params).send().await?;
        if !res.status().is_success() {
            return Err(DriveError::AuthConfig(format!(
                "token exchange failed with status code: {}",
                res.status()
            )));
        }

        let body = res.text().await?;
        let token: AccessToken = serde_json::from_str(&body)?;
        debug!(expires_in = token.expires_in, "fetched access token");

        Ok(token)
    }

    /// Sign with PKCS#1 v1.5 SHA-256 (RS256).
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut reader = std::io::Cursor::new(self.private_key.as_bytes());
        let key = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| DriveError::AuthConfig(format!("invalid PEM private key: {e}")))?;
        let key_pair = match key {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => {
                RsaKeyPair::from_pkcs8(der.secret_pkcs8_der()).map_err(|_| {
                    DriveError::AuthConfig(
                        "failed to create rsa key pair from pkcs8 key".to_string(),
                    )
                })?
            }
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => {
                RsaKeyPair::from_der(der.secret_pkcs1_der()).map_err(|_| {
                    DriveError::AuthConfig(
                        "failed to create rsa key pair from pkcs1 key".to_string(),
                    )
                })?
            }
            _ => {
                return Err(DriveError::AuthConfig(
                    "missing private key in service account".to_string(),
                ))
            }
        };

        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                input,
                &mut signature,
            )
            .map_err(|_| DriveError::AuthConfig("failed to sign token request".to_string()))?;

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY_PEM: &str = include_str!("../testdata/test_key.pem");

    fn test_key_json(private_key: &str) -> String {
        serde_json::json!({
            "type": "service_account",
            "project_id": "test-project",
            "private_key_id": "test-key-id",
            "private_key": private_key,
            "client_email": "reader@test-project.iam.gserviceaccount.com",
            "client_id": "123456789",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
            "client_x509_cert_url": "https://www.googleapis.com/robot/v1/metadata/x509/reader",
            "universe_domain": "googleapis.com",
        })
        .to_string()
    }

    #[test]
    fn parse_valid_key() {
        let key = ServiceAccountKey::try_from_str(&test_key_json(TEST_KEY_PEM)).unwrap();
        assert_eq!("test-project", key.project_id);
        assert_eq!("reader@test-project.iam.gserviceaccount.com", key.client_email);
    }

    #[test]
    fn parse_malformed_json_is_auth_config_error() {
        let err = ServiceAccountKey::try_from_str("{not json").unwrap_err();
        assert!(matches!(err, DriveError::AuthConfig(_)), "{err}");
    }

    #[test]
    fn parse_missing_fields_is_auth_config_error() {
        let err = ServiceAccountKey::try_from_str(r#"{"client_email": "a@b.c"}"#).unwrap_err();
        assert!(matches!(err, DriveError::AuthConfig(_)), "{err}");
    }

    #[test]
    fn sign_produces_rsa_signature() {
        let key = ServiceAccountKey::try_from_str(&test_key_json(TEST_KEY_PEM)).unwrap();
        let signature = key.sign(b"header.claims").unwrap();
        // 2048 bit modulus.
        assert_eq!(256, signature.len());
    }

    #[test]
    fn sign_rejects_non_pem_key() {
        let key = ServiceAccountKey::try_from_str(&test_key_json("not a pem")).unwrap();
        let err = key.sign(b"header.claims").unwrap_err();
        assert!(matches!(err, DriveError::AuthConfig(_)), "{err}");
    }
}
