//! Adapters between the contribution engine and the services it talks to.
mod midtrans;

pub use midtrans::{MidtransGateway, NotificationVerifier};
