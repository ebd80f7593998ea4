use serde::{Deserialize, Serialize};

/// The body of a Snap `POST /snap/v1/transactions` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapRequest {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub item_details: Vec<ItemDetail>,
}

impl SnapRequest {
    /// A request for a single item. Midtrans requires the item total to equal `gross_amount`.
    pub fn single_item(order_id: &str, gross_amount: i64, customer: CustomerDetails, item_name: &str) -> Self {
        let item = ItemDetail::new(order_id, gross_amount, item_name);
        Self {
            transaction_details: TransactionDetails { order_id: order_id.to_string(), gross_amount },
            customer_details: customer,
            item_details: vec![item],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub order_id: String,
    /// Whole Rupiah. IDR has no minor unit on Midtrans.
    pub gross_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: String,
    pub price: i64,
    pub quantity: u32,
    pub name: String,
}

const MAX_ITEM_NAME: usize = 50;

impl ItemDetail {
    pub fn new(id: &str, price: i64, name: &str) -> Self {
        // Midtrans rejects item names over 50 characters
        let name = name.chars().take(MAX_ITEM_NAME).collect();
        Self { id: id.to_string(), price, quantity: 1, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapResponse {
    pub token: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapErrorResponse {
    #[serde(default)]
    pub error_messages: Vec<String>,
}
