// server/src/models/team.rs

use sqlx::FromRow;
use uuid::Uuid;

use teamkit_core::domain::TeamMember;
use teamkit_core::EngineResult;

#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
  pub user_id: Uuid,
  pub team_id: Uuid,
  pub role: String,
  pub display_name: Option<String>,
}

impl TeamMemberRow {
  pub fn into_domain(self) -> EngineResult<TeamMember> {
    Ok(TeamMember {
      user_id: self.user_id,
      team_id: self.team_id,
      role: super::team_role(&self.role)?,
      display_name: self.display_name,
    })
  }
}
