use serde::{Deserialize, Serialize};

use crate::models::identity::SenderProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Ready,
    Active,
    Completed,
}

impl CampaignStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ready" => Self::Ready,
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Launch is allowed from `ready`, or `active` for a follow-up batch.
    pub fn is_launchable(&self) -> bool {
        matches!(self, Self::Ready | Self::Active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub sender: String,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Campaign {
    pub fn status(&self) -> CampaignStatus {
        CampaignStatus::from_str(&self.status)
    }

    pub fn sender_profile(&self) -> SenderProfile {
        SenderProfile::from_str(&self.sender)
    }
}
