use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::paymentmodel::MilestoneStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Contract {0} not found")]
    ContractNotFound(Uuid),

    #[error("Escrow account {0} not found")]
    EscrowNotFound(Uuid),

    #[error("No escrow account exists for contract {0}")]
    EscrowMissingForContract(Uuid),

    #[error("An escrow account already exists for contract {0}")]
    EscrowAlreadyExists(Uuid),

    #[error("Milestone {0} not found")]
    MilestoneNotFound(Uuid),

    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("No transaction found for gateway reference {0}")]
    TransactionNotFound(String),

    #[error("Insufficient escrow funds: requested {requested}, available {available}")]
    InsufficientEscrowFunds { requested: f64, available: f64 },

    #[error("Invalid escrow state transition: {0}")]
    InvalidEscrowTransition(String),

    #[error("Milestone cannot move from {from:?} to {to:?}")]
    InvalidMilestoneTransition {
        from: MilestoneStatus,
        to: MilestoneStatus,
    },

    #[error("Milestone amounts must sum to the escrow total: expected {expected}, got {actual}")]
    MilestoneSumMismatch { expected: f64, actual: f64 },

    #[error("You have already reviewed this person for this project")]
    DuplicateReview,

    #[error("You are not involved in this project")]
    NotInvolvedInProject,

    #[error("User {0} is not authorized to perform this action on contract {1}")]
    UnauthorizedContractAccess(Uuid, Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ServiceError {
    /// Wrap a sqlx error, converting unique-constraint violations into the
    /// given conflict variant so duplicates admitted under concurrency are
    /// reported the same way as those caught up front.
    pub fn from_sqlx(err: sqlx::Error, on_conflict: ServiceError) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => on_conflict,
            _ => ServiceError::Database(err),
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::ContractNotFound(_)
            | ServiceError::EscrowNotFound(_)
            | ServiceError::EscrowMissingForContract(_)
            | ServiceError::MilestoneNotFound(_)
            | ServiceError::ProjectNotFound(_)
            | ServiceError::UserNotFound(_)
            | ServiceError::TransactionNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::EscrowAlreadyExists(_) | ServiceError::DuplicateReview => {
                HttpError::unique_constraint_violation(error.to_string())
            }

            ServiceError::InvalidEscrowTransition(_)
            | ServiceError::InvalidMilestoneTransition { .. }
            | ServiceError::MilestoneSumMismatch { .. }
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::InsufficientEscrowFunds { .. } => {
                HttpError::payment_required(error.to_string())
            }

            ServiceError::NotInvolvedInProject
            | ServiceError::UnauthorizedContractAccess(_, _) => {
                HttpError::forbidden(error.to_string())
            }

            ServiceError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        let id = Uuid::new_v4();

        let err: HttpError = ServiceError::ContractNotFound(id).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: HttpError = ServiceError::DuplicateReview.into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: HttpError = ServiceError::NotInvolvedInProject.into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let err: HttpError = ServiceError::InsufficientEscrowFunds {
            requested: 1200.0,
            available: 1000.0,
        }
        .into();
        assert_eq!(err.status, StatusCode::PAYMENT_REQUIRED);

        let err: HttpError = ServiceError::MilestoneSumMismatch {
            expected: 1000.0,
            actual: 900.0,
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
