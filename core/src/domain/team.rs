use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Owner,
    Manager,
    Player,
}

impl TeamRole {
    /// Only managers and owners may approve design requests.
    pub fn can_approve(self) -> bool {
        matches!(self, TeamRole::Owner | TeamRole::Manager)
    }
}

/// Roster entry. The authoritative member list sizes new orders: one line
/// item per member at assembly time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub role: TeamRole,
    pub display_name: Option<String>,
}
