use serde::{Deserialize, Serialize};

use crate::cart::CartEntry;
use crate::http::{ApiError, ServiceClient};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub qty: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: String,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayResult {
    #[serde(default)]
    pub ok: bool,
    pub status: String,
}

#[derive(Serialize)]
struct OrderCreate<'a> {
    items: &'a [CartEntry],
}

pub struct OrderApi<'a> {
    client: &'a ServiceClient,
}

impl<'a> OrderApi<'a> {
    pub fn new(client: &'a ServiceClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, items: &[CartEntry]) -> Result<Order, ApiError> {
        self.client
            .post_json("/orders", &OrderCreate { items })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Order, ApiError> {
        self.client.get_json(&format!("/orders/{}", id)).await
    }

    pub async fn pay(&self, id: i64) -> Result<PayResult, ApiError> {
        self.client
            .post_json(&format!("/orders/{}/pay", id), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildConfig, Service};
    use crate::env::SharedEnv;
    use crate::storage::{MemoryStorage, TOKEN_KEY};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    fn order_client(url: &str) -> ServiceClient {
        ServiceClient::new(
            Service::Order,
            reqwest::Client::new(),
            Arc::new(SharedEnv::from_pairs(&[("ORDER_URL", url)])),
            BuildConfig::default(),
            Arc::new(MemoryStorage::with_item(TOKEN_KEY, "buyer")),
        )
    }

    #[tokio::test]
    async fn test_create_order_from_cart_entries() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/orders")
            .match_header("Authorization", "Bearer buyer")
            .match_body(Matcher::Json(json!({
                "items": [{"product_id": 1, "qty": 1}, {"product_id": 2, "qty": 1}]
            })))
            .with_status(200)
            .with_body(
                r#"{"id": 10, "status": "CREATED", "total": 4.5, "items": [
                    {"product_id": 1, "qty": 1, "unit_price": 2.0},
                    {"product_id": 2, "qty": 1, "unit_price": 2.5}
                ]}"#,
            )
            .create_async()
            .await;

        let client = order_client(&server.url());
        let order = OrderApi::new(&client)
            .create(&[
                CartEntry { product_id: 1, qty: 1 },
                CartEntry { product_id: 2, qty: 1 },
            ])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(order.id, 10);
        assert_eq!(order.status, "CREATED");
        assert_eq!(order.items.len(), 2);
    }

    #[tokio::test]
    async fn test_pay_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/orders/10/pay")
            .with_status(200)
            .with_body(r#"{"ok": true, "status": "PAID"}"#)
            .create_async()
            .await;

        let client = order_client(&server.url());
        let result = OrderApi::new(&client).pay(10).await.unwrap();

        mock.assert_async().await;
        assert!(result.ok);
        assert_eq!(result.status, "PAID");
    }

    #[tokio::test]
    async fn test_pay_in_wrong_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/orders/10/pay")
            .with_status(400)
            .with_body(r#"{"detail": "Cannot pay in status CANCELLED"}"#)
            .create_async()
            .await;

        let client = order_client(&server.url());
        let err = OrderApi::new(&client).pay(10).await.unwrap_err();

        assert!(matches!(err, ApiError::Client { status: 400, .. }));
        assert_eq!(
            err.user_message("Payment failed"),
            "Cannot pay in status CANCELLED"
        );
    }
}
