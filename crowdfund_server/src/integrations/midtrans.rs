use crowdfund_engine::traits::{CheckoutHandle, PaymentProvider, PaymentProviderError, PaymentRequest};
use fund_common::Secret;
use log::*;
use midtrans_tools::{
    helpers::verify_notification_signature,
    CustomerDetails,
    MidtransApi,
    MidtransApiError,
    SnapRequest,
};

use crate::{data_objects::MidtransNotification, errors::AuthError};

/// Opens Snap checkouts on behalf of the contribution engine.
#[derive(Clone)]
pub struct MidtransGateway {
    api: MidtransApi,
}

impl MidtransGateway {
    pub fn new(api: MidtransApi) -> Self {
        Self { api }
    }
}

impl PaymentProvider for MidtransGateway {
    fn name(&self) -> &str {
        "midtrans"
    }

    async fn create_payment_request(&self, request: PaymentRequest) -> Result<CheckoutHandle, PaymentProviderError> {
        let customer = CustomerDetails { first_name: request.backer.name.clone(), email: request.backer.email.clone() };
        let snap = SnapRequest::single_item(
            request.order_id.as_str(),
            request.gross_amount.value(),
            customer,
            &request.item_name,
        );
        let response = self.api.create_snap_transaction(&snap).await.map_err(|e| {
            warn!("💳️ Could not open a Snap checkout for {}. {e}", request.order_id);
            match e {
                MidtransApiError::Timeout(_) => PaymentProviderError::Timeout(self.api.config().timeout.as_millis()),
                MidtransApiError::QueryError { status, message } => PaymentProviderError::Rejected { status, message },
                MidtransApiError::JsonError(s) => PaymentProviderError::InvalidResponse(s),
                MidtransApiError::Initialization(s) | MidtransApiError::RequestError(s) => {
                    PaymentProviderError::Unreachable(s)
                },
            }
        })?;
        Ok(CheckoutHandle { token: response.token, redirect_url: response.redirect_url })
    }
}

/// Checks the `signature_key` on incoming notifications.
#[derive(Clone, Debug)]
pub struct NotificationVerifier {
    server_key: Secret<String>,
    enabled: bool,
}

impl NotificationVerifier {
    pub fn new(server_key: Secret<String>, enabled: bool) -> Self {
        Self { server_key, enabled }
    }

    pub fn disabled() -> Self {
        Self { server_key: Secret::default(), enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn verify(&self, notification: &MidtransNotification) -> Result<(), AuthError> {
        if !self.enabled {
            trace!("💳️ Signature checks are disabled. Accepting notification for {}", notification.order_id);
            return Ok(());
        }
        let (Some(status_code), Some(gross_amount), Some(signature)) =
            (&notification.status_code, &notification.gross_amount, &notification.signature_key)
        else {
            warn!("💳️ Notification for {} is missing signature fields", notification.order_id);
            return Err(AuthError::InvalidNotificationSignature);
        };
        let valid = verify_notification_signature(
            &notification.order_id,
            status_code,
            gross_amount,
            self.server_key.reveal(),
            signature,
        );
        if valid {
            Ok(())
        } else {
            warn!("💳️ Notification for {} carries an invalid signature", notification.order_id);
            Err(AuthError::InvalidNotificationSignature)
        }
    }
}
