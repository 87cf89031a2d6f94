use serde::Deserialize;

/// One role-tagged entry in a chat-shaped backend response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// The backend's raw output, whose shape varies by runtime and model format.
///
/// Deserialization is untagged: a payload is matched against the variants in
/// declaration order. Each variant has exactly one normalization rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawResponse {
    /// A list of role-tagged messages (chat template output).
    Chat(Vec<ChatTurn>),
    /// A single object carrying a `content` field.
    Turn(ChatTurn),
    /// A plain completion string.
    Text(String),
    /// `null` or an absent payload.
    Empty,
}

impl RawResponse {
    /// Collapse any response shape to a single plain-text string.
    ///
    /// For a message list, the last entry tagged as the model's own turn
    /// wins; when none is tagged, the last entry wins. Missing content
    /// becomes the empty string. Never fails.
    #[must_use]
    pub fn normalize(&self) -> String {
        match self {
            Self::Chat(turns) => turns
                .iter()
                .rev()
                .find(|t| is_model_turn(t.role.as_deref()))
                .or_else(|| turns.last())
                .and_then(|t| t.content.clone())
                .unwrap_or_default(),
            Self::Turn(turn) => turn.content.clone().unwrap_or_default(),
            Self::Text(text) => text.clone(),
            Self::Empty => String::new(),
        }
    }
}

fn is_model_turn(role: Option<&str>) -> bool {
    matches!(role, Some("assistant" | "model"))
}
