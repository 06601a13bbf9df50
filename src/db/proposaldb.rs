use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::proposalmodel::{Contract, Proposal, ProposalStatus};

#[async_trait]
pub trait ProposalExt {
    /// Insert the proposal and bump the project's proposal counter in one
    /// transaction. A duplicate (project, freelancer) pair surfaces as a
    /// unique-constraint database error.
    async fn create_proposal(
        &self,
        project_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: String,
        proposed_budget: f64,
        proposed_timeline: String,
    ) -> Result<Proposal, sqlx::Error>;

    async fn get_proposal_by_id(&self, proposal_id: Uuid) -> Result<Option<Proposal>, sqlx::Error>;

    async fn get_proposals_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<Proposal>, sqlx::Error>;

    async fn get_proposals_by_freelancer(
        &self,
        freelancer_id: Uuid,
    ) -> Result<Vec<Proposal>, sqlx::Error>;

    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Proposal, sqlx::Error>;

    /// Accept a proposal: marks it accepted, moves the project to
    /// in_progress and creates the contract the escrow will reference.
    async fn accept_proposal(
        &self,
        proposal_id: Uuid,
    ) -> Result<(Proposal, Contract), sqlx::Error>;
}

#[async_trait]
impl ProposalExt for DBClient {
    async fn create_proposal(
        &self,
        project_id: Uuid,
        freelancer_id: Uuid,
        cover_letter: String,
        proposed_budget: f64,
        proposed_timeline: String,
    ) -> Result<Proposal, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let proposal = sqlx::query_as::<_, Proposal>(
            r#"
            INSERT INTO proposals
                (project_id, freelancer_id, cover_letter, proposed_budget, proposed_timeline)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, project_id, freelancer_id, cover_letter, proposed_budget,
                proposed_timeline, status, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(freelancer_id)
        .bind(cover_letter)
        .bind(proposed_budget)
        .bind(proposed_timeline)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE projects
            SET proposals_count = proposals_count + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(proposal)
    }

    async fn get_proposal_by_id(&self, proposal_id: Uuid) -> Result<Option<Proposal>, sqlx::Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, project_id, freelancer_id, cover_letter, proposed_budget,
                proposed_timeline, status, created_at, updated_at
            FROM proposals
            WHERE id = $1
            "#,
        )
        .bind(proposal_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_proposals_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, project_id, freelancer_id, cover_letter, proposed_budget,
                proposed_timeline, status, created_at, updated_at
            FROM proposals
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_proposals_by_freelancer(
        &self,
        freelancer_id: Uuid,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, project_id, freelancer_id, cover_letter, proposed_budget,
                proposed_timeline, status, created_at, updated_at
            FROM proposals
            WHERE freelancer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(freelancer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_proposal_status(
        &self,
        proposal_id: Uuid,
        status: ProposalStatus,
    ) -> Result<Proposal, sqlx::Error> {
        sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, project_id, freelancer_id, cover_letter, proposed_budget,
                proposed_timeline, status, created_at, updated_at
            "#,
        )
        .bind(proposal_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn accept_proposal(
        &self,
        proposal_id: Uuid,
    ) -> Result<(Proposal, Contract), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let proposal = sqlx::query_as::<_, Proposal>(
            r#"
            UPDATE proposals
            SET status = 'accepted'::proposal_status, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, project_id, freelancer_id, cover_letter, proposed_budget,
                proposed_timeline, status, created_at, updated_at
            "#,
        )
        .bind(proposal_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE projects
            SET status = 'in_progress'::project_status, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(proposal.project_id)
        .execute(&mut *tx)
        .await?;

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (project_id, client_id, freelancer_id, proposal_id, title, budget)
            SELECT p.id, p.client_id, $2, $1, p.title, $3
            FROM projects p
            WHERE p.id = $4
            RETURNING
                id, project_id, client_id, freelancer_id, proposal_id, title,
                budget, status, created_at, updated_at
            "#,
        )
        .bind(proposal.id)
        .bind(proposal.freelancer_id)
        .bind(proposal.proposed_budget)
        .bind(proposal.project_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((proposal, contract))
    }
}
