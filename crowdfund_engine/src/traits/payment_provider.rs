use thiserror::Error;

use crate::traits::data_objects::{CheckoutHandle, PaymentRequest};

/// An external payment gateway that can open a checkout for a contribution.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// A short name for logs, e.g. "midtrans".
    fn name(&self) -> &str;

    async fn create_payment_request(&self, request: PaymentRequest) -> Result<CheckoutHandle, PaymentProviderError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentProviderError {
    #[error("The payment gateway could not be reached. {0}")]
    Unreachable(String),
    #[error("The payment gateway rejected the request with status {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("The payment gateway sent a response that could not be understood. {0}")]
    InvalidResponse(String),
    #[error("The payment gateway did not respond within {0} ms")]
    Timeout(u128),
}
