use bon::bon;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{CHANNEL_ID_HEADER, NonceGenerator, RequestSigner, UuidNonceGenerator, header_value};
use crate::errors::{LinePayError, LinePayResult};
use crate::types::{
    Amount, EmptyBody, PaymentAmount, PaymentDetailsQuery, PaymentRequest, PreapprovedPayment,
    RefundRequest, RegKeyCheckQuery, SUCCESS_RETURN_CODE,
};

pub const SANDBOX_API_ENDPOINT: &str = "https://sandbox-api-pay.line.me";
pub const DEFAULT_API_ENDPOINT: &str = "https://api-pay.line.me";

/// Path used by [`LinePayApi::request_payment`].
pub const REQUEST_PATH: &str = "/v3/payments/request";

/// Client for the LINE Pay v3 payments API.
#[derive(Clone)]
pub struct LinePayApi {
    channel_id: String,
    channel_secret: String,
    is_sandbox: bool,
    api_endpoint: String,
    headers: HeaderMap,
    signer: RequestSigner,
    client: reqwest::Client,
}

#[bon]
impl LinePayApi {
    #[builder]
    pub fn new(
        /// The channel ID issued by LINE Pay
        channel_id: Option<String>,
        /// The channel secret issued by LINE Pay
        channel_secret: Option<String>,
        /// Use the sandbox endpoint instead of production
        is_sandbox: Option<bool>,
        /// Base URL override, takes precedence over `is_sandbox`
        api_endpoint: Option<String>,
        /// Underlying reqwest client, e.g. one with timeouts configured
        client: Option<reqwest::Client>,
        /// Nonce source used when signing
        nonce_generator: Option<Arc<dyn NonceGenerator>>,
    ) -> LinePayResult<Self> {
        let channel_id = channel_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LinePayError::invalid_argument("channel_id is required"))?;
        let channel_secret = channel_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| LinePayError::invalid_argument("channel_secret is required"))?;

        let is_sandbox = is_sandbox.unwrap_or(false);
        let api_endpoint = api_endpoint.unwrap_or_else(|| {
            if is_sandbox {
                SANDBOX_API_ENDPOINT.to_string()
            } else {
                DEFAULT_API_ENDPOINT.to_string()
            }
        });

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CHANNEL_ID_HEADER, header_value(&channel_id)?);

        let nonce_generator = nonce_generator.unwrap_or_else(|| Arc::new(UuidNonceGenerator));
        let signer = RequestSigner::new(channel_secret.clone(), nonce_generator);

        Ok(LinePayApi {
            channel_id,
            channel_secret,
            is_sandbox,
            api_endpoint,
            headers,
            signer,
            client: client.unwrap_or_default(),
        })
    }
}

impl LinePayApi {
    /// Builds a client from `LINE_PAY_CHANNEL_ID`, `LINE_PAY_CHANNEL_SECRET`
    /// and `LINE_PAY_SANDBOX` (`1`, `true` or `yes` selects the sandbox).
    pub fn from_env() -> LinePayResult<Self> {
        use std::env;

        let is_sandbox = parse_sandbox_flag(env::var("LINE_PAY_SANDBOX").ok().as_deref());

        LinePayApi::builder()
            .maybe_channel_id(env::var("LINE_PAY_CHANNEL_ID").ok())
            .maybe_channel_secret(env::var("LINE_PAY_CHANNEL_SECRET").ok())
            .is_sandbox(is_sandbox)
            .build()
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn channel_secret(&self) -> &str {
        &self.channel_secret
    }

    pub fn is_sandbox(&self) -> bool {
        self.is_sandbox
    }

    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Headers sent with every request before signing.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Adds a fresh nonce and the matching signature to a copy of `headers`.
    pub fn sign(&self, headers: &HeaderMap, path: &str, body: &str) -> LinePayResult<HeaderMap> {
        self.signer.sign(headers, path, body)
    }

    /// Signs and sends `options` to `path`, returning the parsed response on
    /// `returnCode == "0000"`.
    ///
    /// Bodied methods send `options` as compact JSON in its serialized field
    /// order. GET sends it as the query string, so it must serialize to an
    /// object (or unit for no parameters).
    pub async fn request<T>(&self, options: &T, path: &str, method: Method) -> LinePayResult<Value>
    where
        T: Serialize + ?Sized,
    {
        let (payload, query) = if method == Method::GET {
            let query = query_string(options)?;
            (query.clone(), query)
        } else {
            (serde_json::to_string(options)?, String::new())
        };

        let signed_headers = self.sign(&self.headers, path, &payload)?;

        let mut url = format!("{}{}", self.api_endpoint.trim_end_matches('/'), path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        let url = reqwest::Url::parse(&url)
            .map_err(|e| LinePayError::invalid_argument(format!("Invalid request URL {url}: {e}")))?;
        // The signature covers `path`, so it must reach the wire unchanged.
        if !url.path().ends_with(path) || url.fragment().is_some() {
            return Err(LinePayError::invalid_argument(format!(
                "Request path must be percent-encoded without query or fragment: {path}"
            )));
        }

        debug!(method = %method, path, "sending LINE Pay request");

        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(signed_headers);
        if method != Method::GET {
            builder = builder.body(payload);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let result: Value = serde_json::from_str(&text)?;

        let return_code = match result.get("returnCode") {
            Some(Value::String(code)) => code.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        if return_code != SUCCESS_RETURN_CODE {
            let return_message = result
                .get("returnMessage")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            warn!(
                path,
                status = status.as_u16(),
                return_code = %return_code,
                return_message = %return_message,
                "LINE Pay request failed"
            );
            return Err(LinePayError::Api {
                return_code,
                return_message,
                status: status.as_u16(),
                response: result,
            });
        }

        debug!(path, status = status.as_u16(), "LINE Pay request succeeded");
        Ok(result)
    }

    /// Reserves a payment and returns the payment URLs and transaction ID.
    pub async fn request_payment(&self, payment: &PaymentRequest) -> LinePayResult<Value> {
        self.request(payment, REQUEST_PATH, Method::POST).await
    }

    /// Completes a payment once the user has approved it.
    pub async fn confirm(
        &self,
        transaction_id: &str,
        amount: impl Into<Amount>,
        currency: &str,
    ) -> LinePayResult<Value> {
        let options = PaymentAmount {
            amount: amount.into(),
            currency: currency.to_string(),
        };
        let path = format!("/v3/payments/{}/confirm", path_segment(transaction_id));
        self.request(&options, &path, Method::POST).await
    }

    /// Captures an authorized payment.
    pub async fn capture(
        &self,
        transaction_id: &str,
        amount: impl Into<Amount>,
        currency: &str,
    ) -> LinePayResult<Value> {
        let options = PaymentAmount {
            amount: amount.into(),
            currency: currency.to_string(),
        };
        let path = format!(
            "/v3/payments/authorizations/{}/capture",
            path_segment(transaction_id)
        );
        self.request(&options, &path, Method::POST).await
    }

    /// Voids an authorized payment that has not been captured.
    pub async fn void(&self, transaction_id: &str) -> LinePayResult<Value> {
        let path = format!("/v3/payments/authorizations/{}/void", path_segment(transaction_id));
        self.request(&EmptyBody {}, &path, Method::POST).await
    }

    /// Refunds a completed payment; `None` refunds the full amount.
    pub async fn refund(
        &self,
        transaction_id: &str,
        refund_amount: Option<Amount>,
    ) -> LinePayResult<Value> {
        let options = RefundRequest { refund_amount };
        let path = format!("/v3/payments/{}/refund", path_segment(transaction_id));
        self.request(&options, &path, Method::POST).await
    }

    pub async fn payment_details(&self, query: &PaymentDetailsQuery) -> LinePayResult<Value> {
        self.request(query, "/v3/payments", Method::GET).await
    }

    pub async fn check_payment_status(&self, transaction_id: &str) -> LinePayResult<Value> {
        let path = format!("/v3/payments/requests/{}/check", path_segment(transaction_id));
        self.request(&(), &path, Method::GET).await
    }

    /// Charges a preapproved regKey without user interaction.
    pub async fn pay_preapproved(
        &self,
        reg_key: &str,
        payment: &PreapprovedPayment,
    ) -> LinePayResult<Value> {
        let path = format!("/v3/payments/preapprovedPay/{}/payment", path_segment(reg_key));
        self.request(payment, &path, Method::POST).await
    }

    pub async fn check_regkey(&self, reg_key: &str, credit_card_auth: bool) -> LinePayResult<Value> {
        let query = RegKeyCheckQuery { credit_card_auth };
        let path = format!("/v3/payments/preapprovedPay/{}/check", path_segment(reg_key));
        self.request(&query, &path, Method::GET).await
    }

    pub async fn expire_regkey(&self, reg_key: &str) -> LinePayResult<Value> {
        let path = format!("/v3/payments/preapprovedPay/{}/expire", path_segment(reg_key));
        self.request(&EmptyBody {}, &path, Method::POST).await
    }
}

impl fmt::Debug for LinePayApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinePayApi")
            .field("channel_id", &self.channel_id)
            .field("channel_secret", &"<redacted>")
            .field("is_sandbox", &self.is_sandbox)
            .field("api_endpoint", &self.api_endpoint)
            .finish_non_exhaustive()
    }
}

/// Percent-encodes one path parameter so it stays a single segment.
fn path_segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

fn parse_sandbox_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// `key=value&...` in serialized order, skipping nulls.
fn query_string<T>(options: &T) -> LinePayResult<String>
where
    T: Serialize + ?Sized,
{
    let params = match serde_json::to_value(options)? {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(LinePayError::invalid_argument(format!(
                "GET parameters must be an object, got {other}"
            )));
        }
    };

    let pairs = params
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(&key), urlencoding::encode(&value))
        })
        .collect::<Vec<_>>();

    Ok(pairs.join("&"))
}
