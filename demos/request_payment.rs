use linepay::LinePayApi;
use linepay::types::{PaymentPackage, PaymentRequest, Product, RedirectUrls};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Reads LINE_PAY_CHANNEL_ID, LINE_PAY_CHANNEL_SECRET and LINE_PAY_SANDBOX
    let api = LinePayApi::from_env()?;
    println!("Endpoint: {}", api.api_endpoint());

    let order_id = env::var("ORDER_ID").unwrap_or_else(|_| "demo-order-0001".to_string());

    let payment = PaymentRequest {
        amount: 100.into(),
        currency: "JPY".to_string(),
        order_id,
        packages: vec![PaymentPackage {
            id: "package-1".to_string(),
            amount: 100.into(),
            user_fee: None,
            name: "Demo shop".to_string(),
            products: vec![Product {
                id: Some("product-1".to_string()),
                name: "Demo product".to_string(),
                image_url: None,
                quantity: 1,
                price: 100.into(),
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

    let res = api.request_payment(&payment).await?;
    println!("{:#}", res["info"]);

    Ok(())
}
