//! Crowdfund Engine
//!
//! The engine tracks contributions to crowdfunding campaigns and reconciles them with the payment gateway. It is
//! gateway-agnostic: the outbound checkout call goes through the [`traits::PaymentProvider`] trait, and inbound
//! notifications arrive as plain order codes and status strings.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`traits`] and, with the `sqlite` feature, [`SqliteDatabase`]). The traits describe every state change
//!    a contribution goes through. Backends implement them. The most important of these is the conditional
//!    `pending -> paid` transition, which also credits the campaign ledger. Backends must do both in a single atomic
//!    unit.
//! 2. The public API ([`ContributionFlowApi`], [`TransactionsApi`] and [`CampaignApi`]). Clients should use these
//!    rather than talk to a backend directly.
//!
//! The engine also publishes events when a contribution is created, paid or closed. See [`mod@events`].
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

mod cf_api;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cf_api::{
    campaign_objects,
    campaigns_api::CampaignApi,
    contribution_flow_api::{ContributionFlowApi, DEFAULT_GATEWAY_TIMEOUT},
    contribution_objects,
    errors::{ContributionFlowError, TransactionApiError},
    transactions_api::TransactionsApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
