use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageDto {
    pub recipient_id: Uuid,

    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,

    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessagesQuery {
    pub conversation_id: Option<String>,
}
