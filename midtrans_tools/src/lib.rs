mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::MidtransApi;
pub use config::{MidtransConfig, SANDBOX_BASE_URL};
pub use data_objects::{CustomerDetails, ItemDetail, SnapErrorResponse, SnapRequest, SnapResponse, TransactionDetails};
pub use error::MidtransApiError;
