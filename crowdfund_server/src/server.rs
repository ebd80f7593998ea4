use std::time::Duration;

use actix_web::{dev::Server, error, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use crowdfund_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    CampaignApi,
    ContributionFlowApi,
    SqliteDatabase,
    TransactionsApi,
};
use log::*;
use midtrans_tools::MidtransApi;

use crate::{
    auth::TokenValidator,
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    expiry_worker::start_expiry_worker,
    integrations::{MidtransGateway, NotificationVerifier},
    routes::{
        health,
        CampaignByIdRoute,
        CampaignBySlugRoute,
        CampaignTransactionsRoute,
        CampaignsRoute,
        CreateTransactionRoute,
        MyTransactionsRoute,
        NotificationRoute,
        TransactionByIdRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 256;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, create_logging_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let _expiry_worker = start_expiry_worker(db.clone(), producers.clone(), config.unpaid_transaction_timeout);
    let midtrans =
        MidtransApi::new(config.midtrans.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = MidtransGateway::new(midtrans);
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

fn create_logging_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_transaction_created(|ev| {
            Box::pin(async move {
                let tx = ev.transaction;
                debug!("📬️ Transaction [{}] opened for campaign #{}", tx.code, tx.campaign_id);
            })
        })
        .on_contribution_paid(|ev| {
            Box::pin(async move {
                info!("📬️ Campaign #{} received {} from [{}]", ev.campaign_id, ev.amount, ev.transaction.code);
            })
        })
        .on_transaction_closed(|ev| {
            Box::pin(async move {
                info!("📬️ Transaction [{}] closed as {}", ev.transaction.code, ev.status);
            })
        });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: MidtransGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let gateway_timeout = config.gateway_timeout();
    let verifier = NotificationVerifier::new(config.midtrans.server_key.clone(), options.verify_notification_signature);
    let validator = TokenValidator::new(&config.auth);
    let srv = HttpServer::new(move || {
        let flow_api = ContributionFlowApi::new(db.clone(), gateway.clone(), producers.clone())
            .with_gateway_timeout(gateway_timeout);
        let transactions_api = TransactionsApi::new(db.clone());
        let campaign_api = CampaignApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("crowdfund::access_log"))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(transactions_api))
            .app_data(web::Data::new(campaign_api))
            .app_data(web::Data::new(validator.clone()))
            .app_data(web::Data::new(verifier.clone()));
        let api_scope = web::scope("/api")
            .service(CreateTransactionRoute::<SqliteDatabase, MidtransGateway>::new())
            .service(MyTransactionsRoute::<SqliteDatabase>::new())
            .service(TransactionByIdRoute::<SqliteDatabase>::new())
            .service(CampaignTransactionsRoute::<SqliteDatabase>::new())
            .service(CampaignsRoute::<SqliteDatabase>::new())
            .service(CampaignBySlugRoute::<SqliteDatabase>::new())
            .service(CampaignByIdRoute::<SqliteDatabase>::new());
        app.service(health).service(NotificationRoute::<SqliteDatabase, MidtransGateway>::new()).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported as 422s in the standard envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejected request body. {err}");
        error::Error::from(ServerError::InvalidRequestBody(err.to_string()))
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| error::Error::from(ServerError::InvalidRequestPath(err.to_string())))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| error::Error::from(ServerError::InvalidRequestPath(err.to_string())))
}
