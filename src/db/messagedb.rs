use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::messagemodel::{ConversationSummary, MessageWithUsers};

#[async_trait]
pub trait MessageExt {
    async fn send_message(
        &self,
        conversation_id: String,
        sender_id: Uuid,
        recipient_id: Uuid,
        project_id: Option<Uuid>,
        content: String,
    ) -> Result<MessageWithUsers, sqlx::Error>;

    /// Messages in one conversation, oldest first.
    async fn get_conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<MessageWithUsers>, sqlx::Error>;

    /// One summary row per conversation the user participates in, most
    /// recently active first.
    async fn get_user_conversations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error>;
}

#[async_trait]
impl MessageExt for DBClient {
    async fn send_message(
        &self,
        conversation_id: String,
        sender_id: Uuid,
        recipient_id: Uuid,
        project_id: Option<Uuid>,
        content: String,
    ) -> Result<MessageWithUsers, sqlx::Error> {
        let message_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, recipient_id, project_id, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&conversation_id)
        .bind(sender_id)
        .bind(recipient_id)
        .bind(project_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query_as::<_, MessageWithUsers>(
            r#"
            SELECT
                m.id, m.conversation_id, m.sender_id, m.recipient_id, m.project_id,
                m.content, m.is_read, m.created_at,
                sender.first_name || ' ' || sender.last_name AS sender_name,
                sender.avatar_url AS sender_avatar,
                recipient.first_name || ' ' || recipient.last_name AS recipient_name,
                recipient.avatar_url AS recipient_avatar
            FROM messages m
            JOIN users sender ON m.sender_id = sender.id
            JOIN users recipient ON m.recipient_id = recipient.id
            WHERE m.id = $1
            "#,
        )
        .bind(message_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<MessageWithUsers>, sqlx::Error> {
        sqlx::query_as::<_, MessageWithUsers>(
            r#"
            SELECT
                m.id, m.conversation_id, m.sender_id, m.recipient_id, m.project_id,
                m.content, m.is_read, m.created_at,
                sender.first_name || ' ' || sender.last_name AS sender_name,
                sender.avatar_url AS sender_avatar,
                recipient.first_name || ' ' || recipient.last_name AS recipient_name,
                recipient.avatar_url AS recipient_avatar
            FROM messages m
            JOIN users sender ON m.sender_id = sender.id
            JOIN users recipient ON m.recipient_id = recipient.id
            WHERE m.conversation_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_conversations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            r#"
            SELECT * FROM (
                SELECT DISTINCT ON (m.conversation_id)
                    m.conversation_id,
                    CASE WHEN m.sender_id = $1 THEN m.recipient_id ELSE m.sender_id END
                        AS other_user_id,
                    CASE WHEN m.sender_id = $1
                         THEN recipient.first_name || ' ' || recipient.last_name
                         ELSE sender.first_name || ' ' || sender.last_name END
                        AS other_user_name,
                    CASE WHEN m.sender_id = $1 THEN recipient.avatar_url
                         ELSE sender.avatar_url END
                        AS other_user_avatar,
                    m.project_id,
                    p.title AS project_title,
                    m.content AS last_message,
                    m.created_at AS last_message_time
                FROM messages m
                JOIN users sender ON m.sender_id = sender.id
                JOIN users recipient ON m.recipient_id = recipient.id
                LEFT JOIN projects p ON m.project_id = p.id
                WHERE m.sender_id = $1 OR m.recipient_id = $1
                ORDER BY m.conversation_id, m.created_at DESC
            ) conversations
            ORDER BY last_message_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
