//! # tg-auth-simple
//!
//! HMAC-signed bearer tokens implementing `SessionProvider`.
//! Token format: `base64url(user_id).hex(hmac_sha256(salt, base64url(user_id)))`.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tg_core::models::UserId;
use tg_core::traits::SessionProvider;

type HmacSha256 = Hmac<Sha256>;

pub struct SimpleSessionProvider {
    /// Signing secret; tokens issued under another salt never resolve
    session_salt: Vec<u8>,
}

impl SimpleSessionProvider {
    /// Accepts a salt string (e.g., from an environment variable)
    pub fn new(salt: &str) -> Self {
        Self {
            session_salt: salt.as_bytes().to_vec(),
        }
    }

    /// Uses a fresh random salt, so tokens only live as long as the process.
    pub fn random() -> anyhow::Result<Self> {
        let mut salt = [0u8; 32];
        getrandom::getrandom(&mut salt)
            .map_err(|e| anyhow::anyhow!("failed to generate session salt: {e}"))?;
        Ok(Self {
            session_salt: salt.to_vec(),
        })
    }

    pub fn issue_token(&self, user: &UserId) -> anyhow::Result<String> {
        let payload = URL_SAFE_NO_PAD.encode(user.as_str());
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    fn mac(&self, payload: &str) -> anyhow::Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.session_salt)
            .map_err(|e| anyhow::anyhow!("invalid session salt: {e}"))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn verify(&self, token: &str) -> Option<UserId> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;
        self.mac(payload).ok()?.verify_slice(&signature).ok()?;

        let raw = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let user = String::from_utf8(raw).ok()?;
        (!user.is_empty()).then(|| UserId::from(user))
    }
}

#[async_trait]
impl SessionProvider for SimpleSessionProvider {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<UserId>> {
        Ok(self.verify(token.trim()))
    }
}
