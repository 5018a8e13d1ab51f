use std::fmt;

use serde::{Deserialize, Serialize};

/// Document identifier assigned by the content store. Orders are never
/// created locally, so an id always originates from a fetched document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Fulfillment stage of an order. The store imposes no transition rules;
/// any value may follow any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Dispatch,
    Success,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Dispatch,
        OrderStatus::Success,
    ];

    /// Wire value as stored in the order document.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Dispatch => "dispatch",
            OrderStatus::Success => "success",
        }
    }

    /// Human-facing label. `success` reads as "Completed" in the admin UI.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Dispatch => "Dispatch",
            OrderStatus::Success => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<OrderStatus> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "dispatch" => Some(OrderStatus::Dispatch),
            "success" => Some(OrderStatus::Success),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active dashboard filter over the fixed selectable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == Some(*status),
        }
    }

    pub fn parse(value: &str) -> Option<StatusFilter> {
        if value.eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        OrderStatus::parse(value).map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// One cart line item as projected by the order query (product dereferenced).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_name: String,
    pub image: String,
}

/// Customer purchase record read from the content store. The admin surface
/// only reads these, patches `status`, or deletes whole records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub total: f64,
    pub discount: f64,
    pub order_date: String,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
}

impl Order {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: Option<OrderStatus>) -> Order {
        Order {
            id: OrderId::from(id),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: "555-0100".into(),
            email: "ada@example.com".into(),
            address: "12 Analytical Way".into(),
            city: "London".into(),
            zip_code: "N1".into(),
            total: 120.0,
            discount: 0.0,
            order_date: "2026-01-05T10:00:00Z".into(),
            status,
            cart_items: Vec::new(),
        }
    }

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("cancelled"), None);
    }

    #[test]
    fn filter_all_matches_any_status_including_absent() {
        assert!(StatusFilter::All.matches(&order("a", None)));
        assert!(StatusFilter::All.matches(&order("b", Some(OrderStatus::Pending))));
    }

    #[test]
    fn filter_only_requires_exact_status() {
        let filter = StatusFilter::Only(OrderStatus::Dispatch);
        assert!(filter.matches(&order("a", Some(OrderStatus::Dispatch))));
        assert!(!filter.matches(&order("b", Some(OrderStatus::Pending))));
        assert!(!filter.matches(&order("c", None)));
    }

    #[test]
    fn order_document_deserializes_store_fields() {
        let raw = serde_json::json!({
            "_id": "order-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "phone": "555-0100",
            "email": "ada@example.com",
            "address": "12 Analytical Way",
            "city": "London",
            "zipCode": "N1",
            "total": 120.5,
            "discount": 10.0,
            "orderDate": "2026-01-05T10:00:00Z",
            "status": "pending",
            "cartItems": [{"productName": "Lamp", "image": "img-ref"}]
        });
        let order: Order = serde_json::from_value(raw).expect("order");
        assert_eq!(order.id, OrderId::from("order-1"));
        assert_eq!(order.status, Some(OrderStatus::Pending));
        assert_eq!(order.cart_items[0].product_name, "Lamp");
    }

    #[test]
    fn missing_status_and_cart_items_default() {
        let raw = serde_json::json!({
            "_id": "order-2",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "phone": "555-0100",
            "email": "ada@example.com",
            "address": "12 Analytical Way",
            "city": "London",
            "zipCode": "N1",
            "total": 10.0,
            "discount": 0.0,
            "orderDate": "2026-01-05T10:00:00Z"
        });
        let order: Order = serde_json::from_value(raw).expect("order");
        assert_eq!(order.status, None);
        assert!(order.cart_items.is_empty());
    }
}
