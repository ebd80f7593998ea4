use std::{collections::HashMap, time::Duration};

use crowdfund_engine::{
    db_types::{Backer, OrderCode},
    events::EventProducers,
    ContributionFlowApi,
    ContributionFlowError,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

use crate::support::{
    prepare_env::{prepare_test_env, random_db_path},
    scripted_provider::{Script, ScriptedProvider},
};

#[derive(Default, Debug, World)]
pub struct CrowdfundWorld {
    pub system: Option<ContributionSystem>,
    /// Campaign ids by name
    pub campaigns: HashMap<String, i64>,
    /// Backers by name
    pub backers: HashMap<String, Backer>,
    /// Order codes by the label used in the feature file
    pub orders: HashMap<String, OrderCode>,
    pub last_error: Option<ContributionFlowError>,
}

#[derive(Debug)]
pub struct ContributionSystem {
    pub db_path: String,
    pub api: ContributionFlowApi<SqliteDatabase, ScriptedProvider>,
}

impl CrowdfundWorld {
    pub fn api(&self) -> &ContributionFlowApi<SqliteDatabase, ScriptedProvider> {
        &self.system.as_ref().expect("ContributionFlowApi not initialised").api
    }

    pub fn db(&self) -> &SqliteDatabase {
        self.api().db()
    }

    pub fn campaign_id(&self, name: &str) -> i64 {
        *self.campaigns.get(name).unwrap_or_else(|| panic!("Unknown campaign {name}"))
    }

    pub fn order(&self, label: &str) -> OrderCode {
        self.orders.get(label).cloned().unwrap_or_else(|| OrderCode::from(label))
    }

    pub fn backer(&mut self, name: &str) -> Backer {
        let next_id = 100 + self.backers.len() as i64;
        self.backers
            .entry(name.to_string())
            .or_insert_with(|| Backer::new(next_id, name.to_string(), format!("{}@example.com", name.to_lowercase())))
            .clone()
    }
}

impl ContributionSystem {
    pub async fn new(script: Script) -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("Created database: {url}");
        let api = ContributionFlowApi::new(db, ScriptedProvider::new(script), EventProducers::default())
            .with_gateway_timeout(Duration::from_millis(200));
        Self { db_path: url, api }
    }
}
