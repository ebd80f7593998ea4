use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use fund_common::Rupiah;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::helpers::slugify;

//--------------------------------------       Campaign        ---------------------------------------------------------
/// A fundraising campaign.
///
/// `current_amount` and `backer_count` are ledger totals. They are never written directly; the only path that touches
/// them is the paid-notification transition, which increments both in the same database transaction that marks the
/// contribution as paid.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub perks: String,
    pub backer_count: i64,
    pub goal_amount: Rupiah,
    pub current_amount: Rupiah,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// The perks field holds a comma-separated list.
    pub fn perk_list(&self) -> Vec<String> {
        self.perks.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
    }

    pub fn percent_funded(&self) -> i64 {
        self.current_amount.percent_of(self.goal_amount)
    }
}

#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub user_id: i64,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub perks: String,
    pub goal_amount: Rupiah,
}

impl NewCampaign {
    pub fn new<S: Into<String>>(user_id: i64, name: S, goal_amount: Rupiah) -> Self {
        Self {
            user_id,
            name: name.into(),
            short_description: String::default(),
            description: String::default(),
            perks: String::default(),
            goal_amount,
        }
    }

    pub fn with_short_description<S: Into<String>>(mut self, short_description: S) -> Self {
        self.short_description = short_description.into();
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_perks<S: Into<String>>(mut self, perks: S) -> Self {
        self.perks = perks.into();
        self
    }

    /// The slug is derived from the name and the owner id, so two owners can use the same campaign name.
    pub fn slug(&self) -> String {
        slugify(&format!("{} {}", self.name, self.user_id))
    }
}

//--------------------------------------     CampaignImage     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CampaignImage {
    pub id: i64,
    pub campaign_id: i64,
    pub file_name: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCampaignImage {
    pub campaign_id: i64,
    pub file_name: String,
    pub is_primary: bool,
}

impl NewCampaignImage {
    pub fn new<S: Into<String>>(campaign_id: i64, file_name: S, is_primary: bool) -> Self {
        Self { campaign_id, file_name: file_name.into(), is_primary }
    }
}

//--------------------------------------   TransactionStatus   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The contribution has been initiated and the buyer has not completed payment yet.
    Pending,
    /// The gateway confirmed the payment. The campaign ledger includes this amount.
    Paid,
    /// The payment was cancelled or denied by the gateway, or the checkout could not be created.
    Cancelled,
    /// The buyer did not complete the payment in time.
    Expire,
}

impl TransactionStatus {
    /// Terminal statuses never change again.
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Paid => write!(f, "paid"),
            TransactionStatus::Cancelled => write!(f, "cancelled"),
            TransactionStatus::Expire => write!(f, "expire"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid transaction status: {0}")]
pub struct ConversionError(String);

impl FromStr for TransactionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "expire" => Ok(Self::Expire),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid transaction status: {value}. But this conversion cannot fail. Defaulting to pending");
            TransactionStatus::Pending
        })
    }
}

//--------------------------------------       OrderCode       ---------------------------------------------------------
/// The external order identifier shared with the payment gateway. Notifications are correlated on this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderCode(pub String);

impl OrderCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      Transaction      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub campaign_id: i64,
    pub user_id: i64,
    pub backer_name: String,
    pub amount: Rupiah,
    pub status: TransactionStatus,
    pub code: OrderCode,
    pub payment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub campaign_id: i64,
    pub user_id: i64,
    pub backer_name: String,
    pub amount: Rupiah,
    pub code: OrderCode,
}

impl NewTransaction {
    pub fn new(campaign_id: i64, backer: &Backer, amount: Rupiah, code: OrderCode) -> Self {
        Self { campaign_id, user_id: backer.id, backer_name: backer.name.clone(), amount, code }
    }
}

/// A transaction joined with the summary of the campaign it supports.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TransactionWithCampaign {
    pub id: i64,
    pub campaign_id: i64,
    pub amount: Rupiah,
    pub status: TransactionStatus,
    pub code: OrderCode,
    pub created_at: DateTime<Utc>,
    pub campaign_name: String,
    pub campaign_slug: String,
    /// File name of the campaign's primary image, if it has one.
    pub campaign_image: Option<String>,
}

//--------------------------------------         Backer        ---------------------------------------------------------
/// The authenticated user making a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Backer {
    pub fn new<S: Into<String>>(id: i64, name: S, email: S) -> Self {
        Self { id, name: name.into(), email: email.into() }
    }
}
