use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "hi" || v == "hi-in" || v == "hindi" => Self::Hi,
            _ => Self::En,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }
}

/// The closed set of crops the classification engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantType {
    Sugarcane,
    Wheat,
    Rice,
    Maize,
    Potato,
    Tomato,
    Cotton,
    Pulses,
    Mustard,
    Soybean,
}

impl PlantType {
    pub const ALL: [PlantType; 10] = [
        Self::Sugarcane,
        Self::Wheat,
        Self::Rice,
        Self::Maize,
        Self::Potato,
        Self::Tomato,
        Self::Cotton,
        Self::Pulses,
        Self::Mustard,
        Self::Soybean,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sugarcane" => Some(Self::Sugarcane),
            "wheat" => Some(Self::Wheat),
            "rice" => Some(Self::Rice),
            "maize" | "corn" => Some(Self::Maize),
            "potato" => Some(Self::Potato),
            "tomato" => Some(Self::Tomato),
            "cotton" => Some(Self::Cotton),
            "pulses" => Some(Self::Pulses),
            "mustard" => Some(Self::Mustard),
            "soybean" => Some(Self::Soybean),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sugarcane => "sugarcane",
            Self::Wheat => "wheat",
            Self::Rice => "rice",
            Self::Maize => "maize",
            Self::Potato => "potato",
            Self::Tomato => "tomato",
            Self::Cotton => "cotton",
            Self::Pulses => "pulses",
            Self::Mustard => "mustard",
            Self::Soybean => "soybean",
        }
    }

    /// Known disease patterns for the crop. Crops without curated
    /// patterns keep an empty set; the engine never invents diseases
    /// for them.
    pub fn disease_set(self) -> &'static [&'static str] {
        match self {
            Self::Sugarcane => &["red rot", "smut", "rust", "leaf scald"],
            Self::Wheat => &["rust", "powdery mildew", "loose smut", "leaf blight"],
            Self::Rice => &["blast", "blight", "sheath blight", "bacterial leaf streak"],
            Self::Maize => &["leaf blight", "rust", "smut", "stalk rot"],
            Self::Potato => &["late blight", "early blight", "black scurf", "viral infection"],
            _ => &[],
        }
    }
}

/// Plant health levels in severity order. The two most severe levels
/// are the only ones that may carry disease candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    MinorIssues,
    PossibleDisease,
    NeedsAttention,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        Self::Healthy,
        Self::MinorIssues,
        Self::PossibleDisease,
        Self::NeedsAttention,
    ];

    pub fn is_disease_level(self) -> bool {
        matches!(self, Self::PossibleDisease | Self::NeedsAttention)
    }

    pub fn label_en(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::MinorIssues => "minor issues",
            Self::PossibleDisease => "possible disease",
            Self::NeedsAttention => "needs attention",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub plant_type: String,
    pub confidence: f64,
    pub health_status: String,
    pub possible_diseases: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A single transcript turn. Owned by the chat surface; the core only
/// produces bot-side entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Message {
    pub fn from_user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            is_bot: false,
            timestamp: Utc::now(),
            image: None,
        }
    }

    pub fn from_bot(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            is_bot: true,
            timestamp: Utc::now(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyChannel {
    Remote,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply_text: String,
    pub channel: ReplyChannel,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum AgroError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("remote transport failed: {0}")]
    Transport(String),
    #[error("training precondition not met: {0}")]
    TrainingPrecondition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_defaults_to_english() {
        assert_eq!(Language::from_optional_str(None), Language::En);
        assert_eq!(Language::from_optional_str(Some("fr")), Language::En);
        assert_eq!(Language::from_optional_str(Some("HI-in")), Language::Hi);
    }

    #[test]
    fn rejects_unknown_plant() {
        assert_eq!(PlantType::parse("bamboo"), None);
        assert_eq!(PlantType::parse(" Sugarcane "), Some(PlantType::Sugarcane));
    }

    #[test]
    fn transcript_messages_keep_side_and_order() {
        let user = Message::from_user(1, "yield in lucknow");
        let bot = Message::from_bot(2, "use the yield tool");

        assert!(!user.is_bot);
        assert!(bot.is_bot);
        assert!(bot.id > user.id);
        assert!(user.image.is_none());
    }

    #[test]
    fn only_severe_levels_are_disease_levels() {
        assert!(!HealthStatus::Healthy.is_disease_level());
        assert!(!HealthStatus::MinorIssues.is_disease_level());
        assert!(HealthStatus::PossibleDisease.is_disease_level());
        assert!(HealthStatus::NeedsAttention.is_disease_level());
    }
}
