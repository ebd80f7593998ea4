use uuid::Uuid;

use crate::db_types::OrderCode;

pub const ORDER_CODE_PREFIX: &str = "CF-";

/// Allocates a fresh order code for a contribution: a fixed prefix followed by a simple-format UUIDv4.
///
/// Codes are 35 characters long, inside the gateway's 50 character order id limit.
pub fn new_order_code() -> OrderCode {
    OrderCode(format!("{ORDER_CODE_PREFIX}{}", Uuid::new_v4().simple()))
}
