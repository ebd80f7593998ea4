//! # Crowdfunding server
//! This crate hosts the HTTP server for the crowdfunding backend. It is responsible for:
//! * Starting contributions and opening Midtrans Snap checkouts for them.
//! * Receiving Midtrans payment notifications and reconciling them against stored transactions.
//! * Serving transaction and campaign reads to authenticated users.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/transactions/notification`: The Midtrans notification webhook.
//! * `/api/...`: Transaction and campaign endpoints. See [routes](routes/index.html).
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod expiry_worker;
pub mod integrations;
pub mod routes;
pub mod server;
