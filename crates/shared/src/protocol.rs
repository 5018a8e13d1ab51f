use serde::{Deserialize, Serialize};

use crate::domain::OrderId;

/// Body of a delete request. The identifier is optional at the parse layer
/// so an absent field surfaces as a validation failure instead of a body
/// rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrderRequest {
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrderResponse {
    pub message: String,
    pub result: MutateResponse,
}

/// Error body for the delete endpoint. `error` carries the store failure
/// message on 500 responses and is absent on validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrderFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Envelope returned by the store's query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
}

/// Envelope returned by the store's mutate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    pub transaction_id: String,
    #[serde(default)]
    pub results: Vec<MutationResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResult {
    pub id: String,
    pub operation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_request_tolerates_missing_identifier() {
        let req: DeleteOrderRequest = serde_json::from_str("{}").expect("body");
        assert!(req.order_id.is_none());

        let req: DeleteOrderRequest =
            serde_json::from_str(r#"{"orderId": "order-9"}"#).expect("body");
        assert_eq!(req.order_id, Some(OrderId::from("order-9")));
    }

    #[test]
    fn mutate_response_parses_store_envelope() {
        let raw = serde_json::json!({
            "transactionId": "txn-1",
            "results": [{"id": "order-9", "operation": "delete"}]
        });
        let parsed: MutateResponse = serde_json::from_value(raw).expect("envelope");
        assert_eq!(parsed.transaction_id, "txn-1");
        assert_eq!(parsed.results[0].operation, "delete");
    }

    #[test]
    fn failure_body_omits_error_when_absent() {
        let body = DeleteOrderFailure {
            message: "Order ID is required".into(),
            error: None,
        };
        let raw = serde_json::to_value(&body).expect("json");
        assert!(raw.get("error").is_none());
    }
}
