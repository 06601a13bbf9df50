use std::sync::Arc;

use rand::{distr::Alphanumeric, Rng};
use uuid::Uuid;

use crate::{
    db::{db::DBClient, paymentdb::PaymentExt},
    dtos::paymentdtos::{GatewayOutcome, MilestoneInputDto},
    models::paymentmodel::{
        EscrowAccount, EscrowStatus, Milestone, MilestoneStatus, PaymentTransaction,
        TransactionStatus, TransactionType,
    },
    models::proposalmodel::Contract,
    service::error::ServiceError,
    utils::money::{cents_equal, net_amount, platform_fee, round_to_cents},
};

#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Open the escrow account for a contract and start the deposit charge.
    /// The account stays `pending` until the gateway confirms the charge;
    /// the transaction is created in `processing`.
    pub async fn create_and_fund_escrow(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
        amount: f64,
        payment_method_id: Uuid,
    ) -> Result<(EscrowAccount, PaymentTransaction), ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if contract.client_id != user_id {
            return Err(ServiceError::UnauthorizedContractAccess(user_id, contract_id));
        }

        let method = self
            .db_client
            .get_payment_method_by_id(payment_method_id)
            .await?
            .ok_or_else(|| ServiceError::Validation("Unknown payment method".to_string()))?;

        if method.user_id != user_id {
            return Err(ServiceError::Validation(
                "Payment method does not belong to you".to_string(),
            ));
        }

        let escrow = self
            .db_client
            .create_escrow_account(contract_id, round_to_cents(amount))
            .await
            .map_err(|e| {
                ServiceError::from_sqlx(e, ServiceError::EscrowAlreadyExists(contract_id))
            })?;

        let reference = Self::generate_gateway_reference();
        let transaction = self
            .db_client
            .create_transaction(
                contract_id,
                contract.client_id,
                contract.freelancer_id,
                amount,
                platform_fee(amount),
                net_amount(amount),
                TransactionType::EscrowDeposit,
                TransactionStatus::Processing,
                Some(method.id),
                Some(reference.clone()),
                format!("Escrow deposit for {}", contract.title),
            )
            .await?;

        tracing::info!(
            "escrow {} opened for contract {}, awaiting gateway confirmation of {}",
            escrow.id,
            contract_id,
            reference
        );

        Ok((escrow, transaction))
    }

    /// Apply a gateway verdict to the referenced transaction. Confirmation
    /// is idempotent: a transaction already in a terminal state is returned
    /// unchanged, so replayed callbacks cannot double-apply.
    pub async fn confirm_gateway(
        &self,
        gateway_reference: &str,
        outcome: GatewayOutcome,
    ) -> Result<PaymentTransaction, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let transaction = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            SELECT
                id, contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                transaction_type, status, payment_method_id, gateway_reference,
                description, created_at, processed_at
            FROM payment_transactions
            WHERE gateway_reference = $1
            FOR UPDATE
            "#,
        )
        .bind(gateway_reference)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::TransactionNotFound(gateway_reference.to_string()))?;

        if transaction.status.is_terminal() {
            tracing::info!(
                "gateway callback for {} replayed, transaction already {:?}",
                gateway_reference,
                transaction.status
            );
            tx.commit().await?;
            return Ok(transaction);
        }

        let updated = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            UPDATE payment_transactions
            SET status = $2, processed_at = NOW()
            WHERE id = $1
            RETURNING
                id, contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                transaction_type, status, payment_method_id, gateway_reference,
                description, created_at, processed_at
            "#,
        )
        .bind(transaction.id)
        .bind(outcome.to_transaction_status())
        .fetch_one(&mut *tx)
        .await?;

        if outcome == GatewayOutcome::Completed
            && updated.transaction_type == TransactionType::EscrowDeposit
        {
            sqlx::query(
                r#"
                UPDATE escrow_accounts
                SET status = 'funded'::escrow_status, updated_at = NOW()
                WHERE contract_id = $1 AND status = 'pending'::escrow_status
                "#,
            )
            .bind(updated.contract_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "transaction {} settled as {:?} via gateway reference {}",
            updated.id,
            updated.status,
            gateway_reference
        );

        Ok(updated)
    }

    /// Define the payment schedule for a contract. Amounts must sum to the
    /// escrow total; the schedule can only be set once.
    pub async fn create_milestones(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
        milestones: Vec<MilestoneInputDto>,
    ) -> Result<Vec<Milestone>, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if contract.client_id != user_id {
            return Err(ServiceError::UnauthorizedContractAccess(user_id, contract_id));
        }

        let escrow = self
            .db_client
            .get_escrow_by_contract_id(contract_id)
            .await?
            .ok_or(ServiceError::EscrowMissingForContract(contract_id))?;

        if milestones.is_empty() {
            return Err(ServiceError::Validation(
                "At least one milestone is required".to_string(),
            ));
        }

        let existing = self.db_client.get_milestones_for_contract(contract_id).await?;
        if !existing.is_empty() {
            return Err(ServiceError::Validation(
                "Milestones are already defined for this contract".to_string(),
            ));
        }

        let sum: f64 = milestones.iter().map(|m| m.amount).sum();
        if !cents_equal(sum, escrow.total_amount) {
            return Err(ServiceError::MilestoneSumMismatch {
                expected: escrow.total_amount,
                actual: round_to_cents(sum),
            });
        }

        let rows = milestones
            .into_iter()
            .map(|m| {
                (
                    m.title,
                    m.description.unwrap_or_default(),
                    round_to_cents(m.amount),
                    m.due_date,
                )
            })
            .collect();

        Ok(self.db_client.create_milestones(contract_id, rows).await?)
    }

    pub async fn start_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
    ) -> Result<Milestone, ServiceError> {
        self.transition_milestone(user_id, milestone_id, MilestoneStatus::InProgress)
            .await
    }

    pub async fn submit_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
    ) -> Result<Milestone, ServiceError> {
        self.transition_milestone(user_id, milestone_id, MilestoneStatus::Submitted)
            .await
    }

    pub async fn approve_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
    ) -> Result<Milestone, ServiceError> {
        self.transition_milestone(user_id, milestone_id, MilestoneStatus::Approved)
            .await
    }

    /// Move escrow funds to the freelancer for an approved milestone. The
    /// escrow row is locked for the read-modify-write so concurrent
    /// releases cannot overdraw it or break held + released == total.
    pub async fn release_milestone_payment(
        &self,
        user_id: Uuid,
        escrow_id: Uuid,
        milestone_id: Uuid,
        amount: f64,
    ) -> Result<(EscrowAccount, Milestone, PaymentTransaction), ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let escrow = sqlx::query_as::<_, EscrowAccount>(
            r#"
            SELECT
                id, contract_id, total_amount, held_amount, released_amount,
                status, created_at, updated_at
            FROM escrow_accounts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(escrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::EscrowNotFound(escrow_id))?;

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id, project_id, client_id, freelancer_id, proposal_id, title,
                budget, status, created_at, updated_at
            FROM contracts
            WHERE id = $1
            "#,
        )
        .bind(escrow.contract_id)
        .fetch_one(&mut *tx)
        .await?;

        if contract.client_id != user_id {
            return Err(ServiceError::UnauthorizedContractAccess(user_id, contract.id));
        }

        if escrow.status != EscrowStatus::Funded {
            return Err(ServiceError::InvalidEscrowTransition(format!(
                "escrow {} is {} and cannot release funds",
                escrow.id,
                escrow.status.to_str()
            )));
        }

        let milestone = sqlx::query_as::<_, Milestone>(
            r#"
            SELECT
                id, contract_id, title, description, amount, due_date, status,
                submitted_at, approved_at, paid_at, created_at
            FROM milestones
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(milestone_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::MilestoneNotFound(milestone_id))?;

        if milestone.contract_id != escrow.contract_id {
            return Err(ServiceError::Validation(
                "Milestone does not belong to this contract".to_string(),
            ));
        }

        if !milestone.status.can_transition_to(MilestoneStatus::Paid) {
            return Err(ServiceError::InvalidMilestoneTransition {
                from: milestone.status,
                to: MilestoneStatus::Paid,
            });
        }

        let amount = round_to_cents(amount);
        if (amount * 100.0).round() as i64 > (escrow.held_amount * 100.0).round() as i64 {
            return Err(ServiceError::InsufficientEscrowFunds {
                requested: amount,
                available: escrow.held_amount,
            });
        }

        let new_held = round_to_cents(escrow.held_amount - amount);
        let new_released = round_to_cents(escrow.released_amount + amount);
        let new_status = if cents_equal(new_held, 0.0) {
            EscrowStatus::Released
        } else {
            EscrowStatus::Funded
        };

        let updated_escrow = sqlx::query_as::<_, EscrowAccount>(
            r#"
            UPDATE escrow_accounts
            SET held_amount = $2, released_amount = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, contract_id, total_amount, held_amount, released_amount,
                status, created_at, updated_at
            "#,
        )
        .bind(escrow.id)
        .bind(new_held)
        .bind(new_released)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        let paid_milestone = sqlx::query_as::<_, Milestone>(
            r#"
            UPDATE milestones
            SET status = 'paid'::milestone_status, paid_at = NOW()
            WHERE id = $1
            RETURNING
                id, contract_id, title, description, amount, due_date, status,
                submitted_at, approved_at, paid_at, created_at
            "#,
        )
        .bind(milestone.id)
        .fetch_one(&mut *tx)
        .await?;

        // Internal ledger transfer, settled immediately
        let transaction = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            INSERT INTO payment_transactions
                (contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                 transaction_type, status, description, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6,
                    'milestone_release'::transaction_type,
                    'completed'::transaction_status, $7, NOW())
            RETURNING
                id, contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                transaction_type, status, payment_method_id, gateway_reference,
                description, created_at, processed_at
            "#,
        )
        .bind(contract.id)
        .bind(contract.client_id)
        .bind(contract.freelancer_id)
        .bind(amount)
        .bind(platform_fee(amount))
        .bind(net_amount(amount))
        .bind(format!("Milestone payment release for {}", paid_milestone.title))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "released {} from escrow {} for milestone {} (held {} -> {})",
            amount,
            escrow.id,
            milestone.id,
            escrow.held_amount,
            updated_escrow.held_amount
        );

        Ok((updated_escrow, paid_milestone, transaction))
    }

    pub async fn get_escrow_for_contract(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<EscrowAccount, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.involves(user_id) {
            return Err(ServiceError::UnauthorizedContractAccess(user_id, contract_id));
        }

        self.db_client
            .get_escrow_by_contract_id(contract_id)
            .await?
            .ok_or(ServiceError::EscrowMissingForContract(contract_id))
    }

    pub async fn list_milestones(
        &self,
        user_id: Uuid,
        contract_id: Uuid,
    ) -> Result<Vec<Milestone>, ServiceError> {
        let contract = self
            .db_client
            .get_contract_by_id(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))?;

        if !contract.involves(user_id) {
            return Err(ServiceError::UnauthorizedContractAccess(user_id, contract_id));
        }

        Ok(self.db_client.get_milestones_for_contract(contract_id).await?)
    }

    async fn transition_milestone(
        &self,
        user_id: Uuid,
        milestone_id: Uuid,
        to: MilestoneStatus,
    ) -> Result<Milestone, ServiceError> {
        let milestone = self
            .db_client
            .get_milestone_by_id(milestone_id)
            .await?
            .ok_or(ServiceError::MilestoneNotFound(milestone_id))?;

        let contract = self
            .db_client
            .get_contract_by_id(milestone.contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(milestone.contract_id))?;

        // The freelancer drives work-side transitions, the client approves
        let allowed = match to {
            MilestoneStatus::InProgress | MilestoneStatus::Submitted => {
                contract.freelancer_id == user_id
            }
            MilestoneStatus::Approved => contract.client_id == user_id,
            _ => false,
        };

        if !allowed {
            return Err(ServiceError::UnauthorizedContractAccess(user_id, contract.id));
        }

        if !milestone.status.can_transition_to(to) {
            return Err(ServiceError::InvalidMilestoneTransition {
                from: milestone.status,
                to,
            });
        }

        let updated = sqlx::query_as::<_, Milestone>(
            r#"
            UPDATE milestones
            SET status = $2,
                submitted_at = CASE WHEN $2 = 'submitted'::milestone_status
                                    THEN NOW() ELSE submitted_at END,
                approved_at = CASE WHEN $2 = 'approved'::milestone_status
                                   THEN NOW() ELSE approved_at END
            WHERE id = $1
            RETURNING
                id, contract_id, title, description, amount, due_date, status,
                submitted_at, approved_at, paid_at, created_at
            "#,
        )
        .bind(milestone.id)
        .bind(to)
        .fetch_one(&self.db_client.pool)
        .await?;

        Ok(updated)
    }

    fn generate_gateway_reference() -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..14).map(|_| rng.sample(Alphanumeric) as char).collect();

        format!("pi_{}", suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_reference_shape() {
        let reference = PaymentService::generate_gateway_reference();
        assert!(reference.starts_with("pi_"));
        assert_eq!(reference.len(), 17);
        assert!(reference[3..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_gateway_references_unique() {
        let a = PaymentService::generate_gateway_reference();
        let b = PaymentService::generate_gateway_reference();
        assert_ne!(a, b);
    }
}
