use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use crowdfund_engine::{traits::CampaignQueryError, ContributionFlowError, TransactionApiError};
use log::error;
use thiserror::Error;

use crate::data_objects::JsonResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    InvalidNotificationStatus(String),
    #[error("The payment gateway could not be used. {0}")]
    GatewayError(String),
    #[error("{0}")]
    ConsistencyError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidNotificationStatus(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidNotificationSignature => StatusCode::UNAUTHORIZED,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::GatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::ConsistencyError(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = JsonResponse::error(status, self.to_string());
        HttpResponse::build(status).json(body)
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No bearer token was provided.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("The notification signature is missing or invalid.")]
    InvalidNotificationSignature,
}

impl From<ContributionFlowError> for ServerError {
    fn from(e: ContributionFlowError) -> Self {
        match e {
            ContributionFlowError::Validation(s) => Self::ValidationError(s),
            ContributionFlowError::NotFound(s) => Self::NoRecordFound(s),
            ContributionFlowError::Gateway(s) => Self::GatewayError(s),
            ContributionFlowError::InvalidStatus(s) => Self::InvalidNotificationStatus(s),
            ContributionFlowError::Consistency(s) => {
                error!("💻️ Contribution could not be applied atomically. {s}");
                Self::ConsistencyError(s)
            },
            ContributionFlowError::Database(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<TransactionApiError> for ServerError {
    fn from(e: TransactionApiError) -> Self {
        match e {
            TransactionApiError::NotCampaignOwner { .. } => Self::InsufficientPermissions(e.to_string()),
            TransactionApiError::CampaignNotFound(_) | TransactionApiError::TransactionNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            TransactionApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<CampaignQueryError> for ServerError {
    fn from(e: CampaignQueryError) -> Self {
        Self::BackendError(e.to_string())
    }
}
