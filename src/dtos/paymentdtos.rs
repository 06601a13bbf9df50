use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::paymentmodel::{EscrowAccount, PaymentMethodType, PaymentTransaction, TransactionStatus};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundEscrowDto {
    pub contract_id: Uuid,

    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,

    pub payment_method_id: Uuid,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneInputDto {
    #[validate(length(min = 1, max = 255, message = "Milestone title is required"))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 0.01, message = "Milestone amount must be positive"))]
    pub amount: f64,

    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestonesDto {
    pub contract_id: Uuid,

    #[validate]
    pub milestones: Vec<MilestoneInputDto>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePaymentDto {
    pub escrow_id: Uuid,
    pub milestone_id: Uuid,

    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentMethodDto {
    pub method_type: PaymentMethodType,

    #[validate(length(equal = 4, message = "last4 must be exactly 4 digits"))]
    pub last4: Option<String>,

    pub brand: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Expiry month must be between 1 and 12"))]
    pub expiry_month: Option<i32>,

    #[validate(range(min = 2024, max = 2100, message = "Expiry year is invalid"))]
    pub expiry_year: Option<i32>,
}

/// Inbound payment-gateway confirmation. `status` is the gateway's
/// terminal verdict for the referenced charge.
#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfirmationDto {
    #[validate(length(min = 1, message = "Gateway reference is required"))]
    pub gateway_reference: String,

    pub status: GatewayOutcome,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GatewayOutcome {
    Completed,
    Failed,
}

impl GatewayOutcome {
    pub fn to_transaction_status(self) -> TransactionStatus {
        match self {
            GatewayOutcome::Completed => TransactionStatus::Completed,
            GatewayOutcome::Failed => TransactionStatus::Failed,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MilestonesQuery {
    pub contract_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowFundingResponse {
    pub escrow_account: EscrowAccount,
    pub transaction: PaymentTransaction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_rejected() {
        let dto = FundEscrowDto {
            contract_id: Uuid::new_v4(),
            amount: 0.0,
            payment_method_id: Uuid::new_v4(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_nested_milestone_validation() {
        let dto = CreateMilestonesDto {
            contract_id: Uuid::new_v4(),
            milestones: vec![MilestoneInputDto {
                title: "".to_string(),
                description: None,
                amount: 400.0,
                due_date: None,
            }],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_gateway_outcome_wire_format() {
        let dto: GatewayConfirmationDto =
            serde_json::from_str(r#"{"gateway_reference":"pi_abc123","status":"failed"}"#).unwrap();
        assert_eq!(dto.status, GatewayOutcome::Failed);
        assert_eq!(
            dto.status.to_transaction_status(),
            TransactionStatus::Failed
        );
    }
}
