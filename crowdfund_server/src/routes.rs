//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! calls to Midtrans) must be awaited, never blocked on.
use actix_web::{get, web, HttpResponse, Responder};
use crowdfund_engine::{
    db_types::{OrderCode, Rupiah},
    traits::{CampaignManagement, ContributionDatabase, PaymentProvider},
    CampaignApi,
    ContributionFlowApi,
    TransactionsApi,
};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{
        CampaignDetailFormatter,
        CampaignFormatter,
        CampaignQuery,
        CampaignTransactionFormatter,
        JsonResponse,
        MidtransNotification,
        NewContributionFormatter,
        NewTransactionRequest,
        NotificationResult,
        TransactionFormatter,
        UserTransactionFormatter,
    },
    errors::ServerError,
    integrations::NotificationVerifier,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Transactions  ----------------------------------------------------
route!(create_transaction => Post "/transactions" impl ContributionDatabase, PaymentProvider);
/// Starts a contribution for the authenticated user.
///
/// The backer's identity comes from the access token. The response carries the pending transaction as well as the
/// Snap token and the payment URL the backer should be sent to.
pub async fn create_transaction<B: ContributionDatabase, P: PaymentProvider>(
    claims: JwtClaims,
    body: web::Json<NewTransactionRequest>,
    api: web::Data<ContributionFlowApi<B, P>>,
) -> Result<HttpResponse, ServerError> {
    let NewTransactionRequest { campaign_id, amount } = body.into_inner();
    debug!("💻️ POST create_transaction of {amount} to campaign #{campaign_id} by user #{}", claims.user_id);
    let contribution = api.create_transaction(campaign_id, claims.backer(), Rupiah::from(amount)).await?;
    let data = NewContributionFormatter::from(contribution);
    Ok(HttpResponse::Ok().json(JsonResponse::success("Success to create transaction", data)))
}

route!(my_transactions => Get "/transactions" impl ContributionDatabase);
pub async fn my_transactions<B: ContributionDatabase>(
    claims: JwtClaims,
    api: web::Data<TransactionsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_transactions for user #{}", claims.user_id);
    let txs = api.transactions_for_user(claims.user_id).await?;
    let data = txs.into_iter().map(UserTransactionFormatter::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(JsonResponse::success("User's transactions", data)))
}

route!(transaction_by_id => Get "/transactions/{id}" impl ContributionDatabase);
/// Backers can see their own transactions, and campaign owners can see transactions made to their campaigns. Anyone
/// else gets a 404.
pub async fn transaction_by_id<B: ContributionDatabase>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<TransactionsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET transaction #{id} for user #{}", claims.user_id);
    let tx = api.transaction_by_id(id, claims.user_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Transaction detail", TransactionFormatter::from(tx))))
}

route!(campaign_transactions => Get "/campaigns/{id}/transactions" impl ContributionDatabase);
pub async fn campaign_transactions<B: ContributionDatabase>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<TransactionsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let campaign_id = path.into_inner();
    debug!("💻️ GET transactions for campaign #{campaign_id} by user #{}", claims.user_id);
    let txs = api.transactions_for_campaign(campaign_id, claims.user_id).await?;
    let data = txs.into_iter().map(CampaignTransactionFormatter::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(JsonResponse::success("Campaign's transactions", data)))
}

//----------------------------------------------   Campaigns  ----------------------------------------------------
route!(campaigns => Get "/campaigns" impl CampaignManagement);
pub async fn campaigns<B: CampaignManagement>(
    query: web::Query<CampaignQuery>,
    api: web::Data<CampaignApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let owner = query.into_inner().user_id;
    trace!("💻️ GET campaigns (owner: {owner:?})");
    let campaigns = api.campaigns(owner).await?;
    let data = campaigns.into_iter().map(CampaignFormatter::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(JsonResponse::success("List of campaigns", data)))
}

route!(campaign_by_id => Get "/campaigns/{id}" impl CampaignManagement);
pub async fn campaign_by_id<B: CampaignManagement>(
    path: web::Path<i64>,
    api: web::Data<CampaignApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET campaign #{id}");
    let detail = api
        .campaign_by_id(id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Campaign {id} does not exist")))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Campaign detail", CampaignDetailFormatter::from(detail))))
}

route!(campaign_by_slug => Get "/campaigns/slug/{slug}" impl CampaignManagement);
pub async fn campaign_by_slug<B: CampaignManagement>(
    path: web::Path<String>,
    api: web::Data<CampaignApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    trace!("💻️ GET campaign '{slug}'");
    let detail = api
        .campaign_by_slug(&slug)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Campaign '{slug}' does not exist")))?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Campaign detail", CampaignDetailFormatter::from(detail))))
}

//----------------------------------------------   Notifications  ----------------------------------------------------
route!(notification => Post "/transactions/notification" impl ContributionDatabase, PaymentProvider);
/// The Midtrans HTTP notification webhook.
///
/// Midtrans retries any notification that is not answered with a 2xx, so redelivered and out-of-order notifications
/// are normal. Duplicates are answered with 200 and an `already_final` or `unchanged` outcome; they never change the
/// ledger.
pub async fn notification<B: ContributionDatabase, P: PaymentProvider>(
    body: web::Json<MidtransNotification>,
    verifier: web::Data<NotificationVerifier>,
    api: web::Data<ContributionFlowApi<B, P>>,
) -> Result<HttpResponse, ServerError> {
    let notification = body.into_inner();
    info!(
        "💻️ Notification for {}: {} ({}) via {}",
        notification.order_id,
        notification.transaction_status,
        notification.payment_status.as_deref().unwrap_or("-"),
        notification.payment_type.as_deref().unwrap_or("unknown payment type"),
    );
    verifier.verify(&notification)?;
    let code = OrderCode::from(notification.order_id.as_str());
    let outcome = api
        .process_gateway_notification(
            &code,
            &notification.transaction_status,
            notification.payment_status.as_deref(),
        )
        .await?;
    let data = NotificationResult::from(outcome);
    Ok(HttpResponse::Ok().json(JsonResponse::success("Notification processed", data)))
}
