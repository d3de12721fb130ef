use base64::Engine;
use hmac::{Hmac, Mac};
use http::{HeaderMap, HeaderValue};
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{LinePayError, LinePayResult};

type HmacSha256 = Hmac<Sha256>;

pub const CHANNEL_ID_HEADER: &str = "X-LINE-ChannelId";
pub const NONCE_HEADER: &str = "X-LINE-Authorization-Nonce";
pub const SIGNATURE_HEADER: &str = "X-LINE-Authorization";

/// Source of the per-request nonce.
///
/// Any `Fn() -> String` closure implements this, so tests can pin the nonce:
///
/// ```
/// use std::sync::Arc;
/// use linepay::auth::{NonceGenerator, RequestSigner};
///
/// let fixed: Arc<dyn NonceGenerator> = Arc::new(|| "fixed-nonce".to_string());
/// let signer = RequestSigner::new("secret", fixed);
/// assert_eq!(signer.next_nonce(), "fixed-nonce");
/// ```
pub trait NonceGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> NonceGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random v4 UUID nonces, hyphenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonceGenerator;

impl NonceGenerator for UuidNonceGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Signs requests with the channel secret.
#[derive(Clone)]
pub struct RequestSigner {
    channel_secret: String,
    nonce_generator: Arc<dyn NonceGenerator>,
}

impl RequestSigner {
    pub fn new(channel_secret: impl Into<String>, nonce_generator: Arc<dyn NonceGenerator>) -> Self {
        RequestSigner {
            channel_secret: channel_secret.into(),
            nonce_generator,
        }
    }

    pub fn next_nonce(&self) -> String {
        self.nonce_generator.generate()
    }

    /// Base64 HMAC-SHA256 of `secret + path + payload + nonce`, keyed with the secret.
    ///
    /// `payload` is the JSON body for bodied requests and the query string for GET.
    pub fn signature(&self, path: &str, payload: &str, nonce: &str) -> LinePayResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.channel_secret.as_bytes())
            .map_err(|e| LinePayError::invalid_argument(format!("Invalid channel secret: {e}")))?;
        mac.update(self.channel_secret.as_bytes());
        mac.update(path.as_bytes());
        mac.update(payload.as_bytes());
        mac.update(nonce.as_bytes());

        Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Returns a copy of `headers` with a fresh nonce and its signature added.
    pub fn sign(&self, headers: &HeaderMap, path: &str, payload: &str) -> LinePayResult<HeaderMap> {
        if !path.starts_with('/') {
            return Err(LinePayError::invalid_argument(format!(
                "Request path must start with '/': {path}"
            )));
        }

        let nonce = self.next_nonce();
        let signature = self.signature(path, payload, &nonce)?;

        let mut signed = headers.clone();
        signed.insert(NONCE_HEADER, header_value(&nonce)?);
        signed.insert(SIGNATURE_HEADER, header_value(&signature)?);
        Ok(signed)
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("channel_secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

pub(crate) fn header_value(value: &str) -> LinePayResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| LinePayError::invalid_argument(format!("Invalid header value {value:?}: {e}")))
}
