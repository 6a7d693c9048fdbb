//! Sending-domain rotation pool. Order is significant: it defines the
//! round-robin assignment order, and a stored `identity_index` must keep
//! resolving to the same identity on every later pass (retry, second launch).

use serde::{Deserialize, Serialize};

pub const ROTATION_DOMAINS: [&str; 8] = [
    "clearhavencapital.com",
    "clearhavenequity.com",
    "clearhavenfunds.com",
    "clearhavengroup.com",
    "clearhavenholdings.com",
    "clearhaveninvest.com",
    "clearhavenpartners.com",
    "clearhavenrealty.com",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SenderProfile {
    #[default]
    Acquisitions,
    InvestorRelations,
}

impl SenderProfile {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "investor-relations" | "investor_relations" | "ir" => Self::InvestorRelations,
            _ => Self::Acquisitions,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acquisitions => "acquisitions",
            Self::InvestorRelations => "investor-relations",
        }
    }

    fn persona(&self) -> (&'static str, &'static str) {
        match self {
            Self::Acquisitions => ("mike", "Mike Halvorsen"),
            Self::InvestorRelations => ("claire", "Claire Bennett"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SenderIdentity {
    pub domain: &'static str,
    pub local_part: &'static str,
    pub display_name: &'static str,
}

impl SenderIdentity {
    pub fn from_address(&self) -> String {
        format!("{} <{}@{}>", self.display_name, self.local_part, self.domain)
    }
}

/// Deterministic and order-stable for a given sender profile.
pub fn identities(sender: SenderProfile) -> Vec<SenderIdentity> {
    let (local_part, display_name) = sender.persona();
    ROTATION_DOMAINS
        .iter()
        .map(|domain| SenderIdentity { domain, local_part, display_name })
        .collect()
}

pub fn pool_size() -> usize {
    ROTATION_DOMAINS.len()
}
