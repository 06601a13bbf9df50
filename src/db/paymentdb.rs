use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::paymentmodel::{
    EscrowAccount, Milestone, PaymentMethod, PaymentMethodType, PaymentTransaction,
    TransactionStatus, TransactionType,
};
use crate::models::proposalmodel::Contract;

#[async_trait]
pub trait PaymentExt {
    async fn get_contract_by_id(&self, contract_id: Uuid) -> Result<Option<Contract>, sqlx::Error>;

    async fn create_escrow_account(
        &self,
        contract_id: Uuid,
        amount: f64,
    ) -> Result<EscrowAccount, sqlx::Error>;

    async fn get_escrow_by_contract_id(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<EscrowAccount>, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn create_transaction(
        &self,
        contract_id: Uuid,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: f64,
        platform_fee: f64,
        net_amount: f64,
        transaction_type: TransactionType,
        status: TransactionStatus,
        payment_method_id: Option<Uuid>,
        gateway_reference: Option<String>,
        description: String,
    ) -> Result<PaymentTransaction, sqlx::Error>;

    async fn get_transactions_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PaymentTransaction>, sqlx::Error>;

    async fn create_milestones(
        &self,
        contract_id: Uuid,
        milestones: Vec<(String, String, f64, Option<DateTime<Utc>>)>,
    ) -> Result<Vec<Milestone>, sqlx::Error>;

    async fn get_milestone_by_id(
        &self,
        milestone_id: Uuid,
    ) -> Result<Option<Milestone>, sqlx::Error>;

    async fn get_milestones_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Vec<Milestone>, sqlx::Error>;

    async fn add_payment_method(
        &self,
        user_id: Uuid,
        method_type: PaymentMethodType,
        last4: Option<String>,
        brand: Option<String>,
        expiry_month: Option<i32>,
        expiry_year: Option<i32>,
    ) -> Result<PaymentMethod, sqlx::Error>;

    async fn get_payment_method_by_id(
        &self,
        method_id: Uuid,
    ) -> Result<Option<PaymentMethod>, sqlx::Error>;

    async fn get_payment_methods_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PaymentMethod>, sqlx::Error>;

    async fn delete_payment_method(&self, method_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn get_contract_by_id(&self, contract_id: Uuid) -> Result<Option<Contract>, sqlx::Error> {
        sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id, project_id, client_id, freelancer_id, proposal_id, title,
                budget, status, created_at, updated_at
            FROM contracts
            WHERE id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_escrow_account(
        &self,
        contract_id: Uuid,
        amount: f64,
    ) -> Result<EscrowAccount, sqlx::Error> {
        sqlx::query_as::<_, EscrowAccount>(
            r#"
            INSERT INTO escrow_accounts (contract_id, total_amount, held_amount, released_amount)
            VALUES ($1, $2, $2, 0)
            RETURNING
                id, contract_id, total_amount, held_amount, released_amount,
                status, created_at, updated_at
            "#,
        )
        .bind(contract_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_escrow_by_contract_id(
        &self,
        contract_id: Uuid,
    ) -> Result<Option<EscrowAccount>, sqlx::Error> {
        sqlx::query_as::<_, EscrowAccount>(
            r#"
            SELECT
                id, contract_id, total_amount, held_amount, released_amount,
                status, created_at, updated_at
            FROM escrow_accounts
            WHERE contract_id = $1
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_transaction(
        &self,
        contract_id: Uuid,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: f64,
        platform_fee: f64,
        net_amount: f64,
        transaction_type: TransactionType,
        status: TransactionStatus,
        payment_method_id: Option<Uuid>,
        gateway_reference: Option<String>,
        description: String,
    ) -> Result<PaymentTransaction, sqlx::Error> {
        sqlx::query_as::<_, PaymentTransaction>(
            r#"
            INSERT INTO payment_transactions
                (contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                 transaction_type, status, payment_method_id, gateway_reference, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                id, contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                transaction_type, status, payment_method_id, gateway_reference,
                description, created_at, processed_at
            "#,
        )
        .bind(contract_id)
        .bind(payer_id)
        .bind(payee_id)
        .bind(amount)
        .bind(platform_fee)
        .bind(net_amount)
        .bind(transaction_type)
        .bind(status)
        .bind(payment_method_id)
        .bind(gateway_reference)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_transactions_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PaymentTransaction>, sqlx::Error> {
        sqlx::query_as::<_, PaymentTransaction>(
            r#"
            SELECT
                id, contract_id, payer_id, payee_id, amount, platform_fee, net_amount,
                transaction_type, status, payment_method_id, gateway_reference,
                description, created_at, processed_at
            FROM payment_transactions
            WHERE payer_id = $1 OR payee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_milestones(
        &self,
        contract_id: Uuid,
        milestones: Vec<(String, String, f64, Option<DateTime<Utc>>)>,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(milestones.len());

        for (title, description, amount, due_date) in milestones {
            let milestone = sqlx::query_as::<_, Milestone>(
                r#"
                INSERT INTO milestones (contract_id, title, description, amount, due_date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING
                    id, contract_id, title, description, amount, due_date, status,
                    submitted_at, approved_at, paid_at, created_at
                "#,
            )
            .bind(contract_id)
            .bind(title)
            .bind(description)
            .bind(amount)
            .bind(due_date)
            .fetch_one(&mut *tx)
            .await?;

            created.push(milestone);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn get_milestone_by_id(
        &self,
        milestone_id: Uuid,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        sqlx::query_as::<_, Milestone>(
            r#"
            SELECT
                id, contract_id, title, description, amount, due_date, status,
                submitted_at, approved_at, paid_at, created_at
            FROM milestones
            WHERE id = $1
            "#,
        )
        .bind(milestone_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_milestones_for_contract(
        &self,
        contract_id: Uuid,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        sqlx::query_as::<_, Milestone>(
            r#"
            SELECT
                id, contract_id, title, description, amount, due_date, status,
                submitted_at, approved_at, paid_at, created_at
            FROM milestones
            WHERE contract_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn add_payment_method(
        &self,
        user_id: Uuid,
        method_type: PaymentMethodType,
        last4: Option<String>,
        brand: Option<String>,
        expiry_month: Option<i32>,
        expiry_year: Option<i32>,
    ) -> Result<PaymentMethod, sqlx::Error> {
        // The user's first stored method becomes their default
        sqlx::query_as::<_, PaymentMethod>(
            r#"
            INSERT INTO payment_methods
                (user_id, method_type, last4, brand, expiry_month, expiry_year, is_default)
            VALUES ($1, $2, $3, $4, $5, $6,
                    NOT EXISTS (SELECT 1 FROM payment_methods WHERE user_id = $1))
            RETURNING
                id, user_id, method_type, last4, brand, expiry_month, expiry_year,
                is_default, created_at
            "#,
        )
        .bind(user_id)
        .bind(method_type)
        .bind(last4)
        .bind(brand)
        .bind(expiry_month)
        .bind(expiry_year)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_payment_method_by_id(
        &self,
        method_id: Uuid,
    ) -> Result<Option<PaymentMethod>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethod>(
            r#"
            SELECT
                id, user_id, method_type, last4, brand, expiry_month, expiry_year,
                is_default, created_at
            FROM payment_methods
            WHERE id = $1
            "#,
        )
        .bind(method_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_payment_methods_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PaymentMethod>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethod>(
            r#"
            SELECT
                id, user_id, method_type, last4, brand, expiry_month, expiry_year,
                is_default, created_at
            FROM payment_methods
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_payment_method(&self, method_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM payment_methods WHERE id = $1")
            .bind(method_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
