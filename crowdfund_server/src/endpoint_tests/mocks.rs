use chrono::Duration;
use crowdfund_engine::{
    db_types::{Campaign, CampaignImage, NewTransaction, OrderCode, Transaction, TransactionStatus, TransactionWithCampaign},
    traits::{
        CampaignManagement,
        CampaignQueryError,
        CheckoutHandle,
        ContributionDatabase,
        ContributionDbError,
        PaymentProvider,
        PaymentProviderError,
        PaymentRequest,
        TransactionManagement,
        TransactionQueryError,
        TransitionResult,
    },
};
use mockall::mock;

mock! {
    pub Database {}
    impl Clone for Database {
        fn clone(&self) -> Self;
    }
    impl ContributionDatabase for Database {
        fn url(&self) -> &str;
        async fn insert_pending_transaction(&self, tx: NewTransaction) -> Result<Transaction, ContributionDbError>;
        async fn attach_payment_url(&self, code: &OrderCode, url: &str) -> Result<Transaction, ContributionDbError>;
        async fn transition_transaction(&self, code: &OrderCode, new_status: TransactionStatus) -> Result<TransitionResult, ContributionDbError>;
        async fn expire_transactions(&self, older_than: Duration) -> Result<Vec<Transaction>, ContributionDbError>;
        async fn close(&mut self) -> Result<(), ContributionDbError>;
    }
    impl TransactionManagement for Database {
        async fn fetch_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>, TransactionQueryError>;
        async fn fetch_transaction_by_code(&self, code: &OrderCode) -> Result<Option<Transaction>, TransactionQueryError>;
        async fn fetch_transactions_for_campaign(&self, campaign_id: i64) -> Result<Vec<Transaction>, TransactionQueryError>;
        async fn fetch_transactions_for_user(&self, user_id: i64) -> Result<Vec<TransactionWithCampaign>, TransactionQueryError>;
    }
    impl CampaignManagement for Database {
        async fn fetch_campaign(&self, id: i64) -> Result<Option<Campaign>, CampaignQueryError>;
        async fn fetch_campaign_by_slug(&self, slug: &str) -> Result<Option<Campaign>, CampaignQueryError>;
        async fn fetch_campaigns(&self, owner: Option<i64>) -> Result<Vec<Campaign>, CampaignQueryError>;
        async fn fetch_campaign_images(&self, campaign_id: i64) -> Result<Vec<CampaignImage>, CampaignQueryError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentProvider for Gateway {
        fn name(&self) -> &str;
        async fn create_payment_request(&self, request: PaymentRequest) -> Result<CheckoutHandle, PaymentProviderError>;
    }
}
