use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "escrow_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EscrowStatus {
    Pending,
    Funded,
    Released,
    Disputed,
}

impl EscrowStatus {
    pub fn to_str(&self) -> &str {
        match self {
            EscrowStatus::Pending => "pending",
            EscrowStatus::Funded => "funded",
            EscrowStatus::Released => "released",
            EscrowStatus::Disputed => "disputed",
        }
    }

    pub fn can_transition_to(&self, to: EscrowStatus) -> bool {
        match (self, to) {
            (EscrowStatus::Pending, EscrowStatus::Funded) => true,
            (EscrowStatus::Funded, EscrowStatus::Released) => true,
            (EscrowStatus::Funded, EscrowStatus::Disputed) => true,
            (EscrowStatus::Disputed, EscrowStatus::Released) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "milestone_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Submitted,
    Approved,
    Paid,
}

impl MilestoneStatus {
    pub fn to_str(&self) -> &str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Submitted => "submitted",
            MilestoneStatus::Approved => "approved",
            MilestoneStatus::Paid => "paid",
        }
    }

    /// Milestones only move forward: pending -> in_progress -> submitted
    /// -> approved -> paid. Submission may skip the in_progress step.
    pub fn can_transition_to(&self, to: MilestoneStatus) -> bool {
        match (self, to) {
            (MilestoneStatus::Pending, MilestoneStatus::InProgress) => true,
            (MilestoneStatus::Pending, MilestoneStatus::Submitted) => true,
            (MilestoneStatus::InProgress, MilestoneStatus::Submitted) => true,
            (MilestoneStatus::Submitted, MilestoneStatus::Approved) => true,
            (MilestoneStatus::Approved, MilestoneStatus::Paid) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    EscrowDeposit,
    MilestoneRelease,
    Refund,
    Bonus,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::Failed)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_method_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    Bank,
    Paypal,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EscrowAccount {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub total_amount: f64,
    pub held_amount: f64,
    pub released_amount: f64,
    pub status: EscrowStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub status: MilestoneStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: f64,
    pub platform_fee: f64,
    pub net_amount: f64,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub payment_method_id: Option<Uuid>,
    pub gateway_reference: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub user_id: Uuid,
    pub method_type: PaymentMethodType,
    pub last4: Option<String>,
    pub brand: Option<String>,
    pub expiry_month: Option<i32>,
    pub expiry_year: Option<i32>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escrow_transitions() {
        assert!(EscrowStatus::Pending.can_transition_to(EscrowStatus::Funded));
        assert!(EscrowStatus::Funded.can_transition_to(EscrowStatus::Released));
        assert!(EscrowStatus::Funded.can_transition_to(EscrowStatus::Disputed));
        assert!(!EscrowStatus::Pending.can_transition_to(EscrowStatus::Released));
        assert!(!EscrowStatus::Released.can_transition_to(EscrowStatus::Funded));
    }

    #[test]
    fn test_milestone_transitions_monotonic() {
        assert!(MilestoneStatus::Pending.can_transition_to(MilestoneStatus::InProgress));
        assert!(MilestoneStatus::InProgress.can_transition_to(MilestoneStatus::Submitted));
        assert!(MilestoneStatus::Submitted.can_transition_to(MilestoneStatus::Approved));
        assert!(MilestoneStatus::Approved.can_transition_to(MilestoneStatus::Paid));

        assert!(!MilestoneStatus::Submitted.can_transition_to(MilestoneStatus::InProgress));
        assert!(!MilestoneStatus::Paid.can_transition_to(MilestoneStatus::Approved));
        assert!(!MilestoneStatus::Pending.can_transition_to(MilestoneStatus::Paid));
    }

    #[test]
    fn test_terminal_transaction_statuses() {
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
        assert!(!TransactionStatus::Processing.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
    }
}
