//! The public API of the contribution engine.
//!
//! * [`contribution_flow_api::ContributionFlowApi`] creates contributions and reconciles gateway notifications
//!   against them.
//! * [`transactions_api::TransactionsApi`] answers transaction queries, enforcing who may see what.
//! * [`campaigns_api::CampaignApi`] answers campaign queries.
pub mod campaign_objects;
pub mod campaigns_api;
pub mod contribution_flow_api;
pub mod contribution_objects;
pub mod errors;
pub mod transactions_api;
