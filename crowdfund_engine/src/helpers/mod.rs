mod order_code;
mod slug;

pub use order_code::{new_order_code, ORDER_CODE_PREFIX};
pub use slug::slugify;
