use serde::{Deserialize, Serialize};
use std::fmt;

/// Business operation behind a queued entry. Used for display and grouping
/// only; replay always goes through the stored endpoint and method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    SaveTrip,
    UpdateProfile,
    SetGoal,
    UpdateVehicle,
    ClaimQuestReward,
    ExchangeProduct,
    RefreshUser,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::SaveTrip => "saveTrip",
            RequestKind::UpdateProfile => "updateProfile",
            RequestKind::SetGoal => "setGoal",
            RequestKind::UpdateVehicle => "updateVehicle",
            RequestKind::ClaimQuestReward => "claimQuestReward",
            RequestKind::ExchangeProduct => "exchangeProduct",
            RequestKind::RefreshUser => "refreshUser",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
