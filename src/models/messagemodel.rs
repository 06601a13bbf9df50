use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message row joined with sender/recipient display data.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct MessageWithUsers {
    pub id: Uuid,
    pub conversation_id: String,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub project_id: Option<Uuid>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_name: String,
    pub sender_avatar: Option<String>,
    pub recipient_name: String,
    pub recipient_avatar: Option<String>,
}

/// One row per conversation a user participates in, most recent first.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub other_user_id: Uuid,
    pub other_user_name: String,
    pub other_user_avatar: Option<String>,
    pub project_id: Option<Uuid>,
    pub project_title: Option<String>,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
}

/// Both participants must derive the same id regardless of who sends
/// first, so the pair is ordered before formatting. Project-scoped
/// threads are kept apart from the general thread between the same two
/// users.
pub fn conversation_id_for(a: Uuid, b: Uuid, project_id: Option<Uuid>) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let scope = project_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "general".to_string());

    format!("{}_{}_{}", low, high, scope)
}

/// True when `user_id` is one of the two participants encoded in the
/// conversation id.
pub fn conversation_involves(conversation_id: &str, user_id: Uuid) -> bool {
    let needle = user_id.to_string();
    conversation_id
        .split('_')
        .take(2)
        .any(|part| part == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let project = Some(Uuid::new_v4());

        assert_eq!(conversation_id_for(a, b, project), conversation_id_for(b, a, project));
        assert_eq!(conversation_id_for(a, b, None), conversation_id_for(b, a, None));
    }

    #[test]
    fn test_general_scope_suffix() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(conversation_id_for(a, b, None).ends_with("_general"));
    }

    #[test]
    fn test_project_scope_distinct_from_general() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let project = Uuid::new_v4();

        assert_ne!(
            conversation_id_for(a, b, Some(project)),
            conversation_id_for(a, b, None)
        );
    }

    #[test]
    fn test_conversation_involves_participants_only() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let other = Uuid::new_v4();
        let id = conversation_id_for(a, b, None);

        assert!(conversation_involves(&id, a));
        assert!(conversation_involves(&id, b));
        assert!(!conversation_involves(&id, other));
    }
}
