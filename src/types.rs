use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Return code the provider uses for success.
pub const SUCCESS_RETURN_CODE: &str = "0000";

/// A payment amount; integer for zero-decimal currencies such as JPY.
///
/// Serializing a NaN or infinite decimal fails instead of producing `null`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Integer(i64),
    Unsigned(u64),
    Decimal(f64),
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Amount::Integer(value) => serializer.serialize_i64(value),
            Amount::Unsigned(value) => serializer.serialize_u64(value),
            Amount::Decimal(value) if value.is_finite() => serializer.serialize_f64(value),
            Amount::Decimal(value) => Err(serde::ser::Error::custom(format!(
                "amount must be a finite number, got {value}"
            ))),
        }
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::Integer(value.into())
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::Integer(value.into())
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Integer(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Amount::Integer(value),
            Err(_) => Amount::Unsigned(value),
        }
    }
}

impl From<f32> for Amount {
    fn from(value: f32) -> Self {
        Amount::Decimal(value.into())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Decimal(value)
    }
}

/// Body of confirm and capture calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentAmount {
    pub amount: Amount,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<Amount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Amount,
    pub currency: String,
    pub order_id: String,
    pub packages: Vec<PaymentPackage>,
    pub redirect_urls: RedirectUrls,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPackage {
    pub id: String,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fee: Option<Amount>,
    pub name: String,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Amount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectUrls {
    pub confirm_url: String,
    pub cancel_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_url_type: Option<String>,
}

/// Body of a payment against a preapproved regKey.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreapprovedPayment {
    pub product_name: String,
    pub amount: Amount,
    pub currency: String,
    pub order_id: String,
    pub capture: bool,
}

/// Query parameters of the payment details lookup. Unset fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegKeyCheckQuery {
    pub credit_card_auth: bool,
}

/// An empty JSON object body, `{}`.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub(crate) struct EmptyBody {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_keeps_integer_and_decimal_forms() {
        assert_eq!(serde_json::to_string(&Amount::from(100)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&Amount::from(10.0)).unwrap(), "10.0");
        assert_eq!(serde_json::to_string(&Amount::from(12.5)).unwrap(), "12.5");
    }

    #[test]
    fn test_amount_from_wide_and_narrow_types() {
        assert_eq!(Amount::from(10u64), Amount::Integer(10));
        assert_eq!(serde_json::to_string(&Amount::from(u64::MAX)).unwrap(), u64::MAX.to_string());
        assert_eq!(serde_json::to_string(&Amount::from(2.5f32)).unwrap(), "2.5");
    }

    #[test]
    fn test_non_finite_amount_fails_to_serialize() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let body = PaymentAmount {
                amount: value.into(),
                currency: "JPY".to_string(),
            };
            assert!(serde_json::to_string(&body).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_payment_request_field_order() {
        let request = PaymentRequest {
            amount: 1.into(),
            currency: "JPY".to_string(),
            order_id: "order-1".to_string(),
            packages: vec![PaymentPackage {
                id: "package-999".to_string(),
                amount: 1.into(),
                user_fee: None,
                name: "Sample package".to_string(),
                products: vec![Product {
                    id: Some("product-001".to_string()),
                    name: "Sample product".to_string(),
                    image_url: None,
                    quantity: 1,
                    price: 1.into(),
                    original_price: None,
                }],
            }],
            redirect_urls: RedirectUrls {
                confirm_url: "https://example.com/pay/confirm".to_string(),
                cancel_url: "https://example.com/pay/cancel".to_string(),
                confirm_url_type: None,
            },
            options: None,
        };

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"amount":1,"currency":"JPY","orderId":"order-1","packages":[{"id":"package-999","amount":1,"name":"Sample package","products":[{"id":"product-001","name":"Sample product","quantity":1,"price":1}]}],"redirectUrls":{"confirmUrl":"https://example.com/pay/confirm","cancelUrl":"https://example.com/pay/cancel"}}"#
        );
    }

    #[test]
    fn test_refund_without_amount_is_empty_object() {
        let full = RefundRequest { refund_amount: None };
        let partial = RefundRequest {
            refund_amount: Some(500.into()),
        };

        assert_eq!(serde_json::to_string(&full).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&partial).unwrap(), r#"{"refundAmount":500}"#);
        assert_eq!(serde_json::to_string(&EmptyBody::default()).unwrap(), "{}");
    }
}
