//! # Storage and gateway contracts
//!
//! This module defines the interfaces the contribution engine needs from its collaborators.
//!
//! * [`ContributionDatabase`] is the write side. It owns every state change a contribution goes through, including
//!   the atomic "mark paid and increment the campaign ledger" unit.
//! * [`TransactionManagement`] offers read-only queries over transactions.
//! * [`CampaignManagement`] offers read-only queries over campaigns and their images.
//! * [`PaymentProvider`] is the outbound payment gateway. Given an order code, an amount and a backer, it returns a
//!   checkout handle.
mod campaign_management;
mod contribution_database;
mod data_objects;
mod payment_provider;
mod transaction_management;

pub use campaign_management::{CampaignManagement, CampaignQueryError};
pub use contribution_database::{ContributionDatabase, ContributionDbError};
pub use data_objects::{CheckoutHandle, PaymentRequest, TransitionResult};
pub use payment_provider::{PaymentProvider, PaymentProviderError};
pub use transaction_management::{TransactionManagement, TransactionQueryError};
