//! Roster entries and player roles.

use serde::{Deserialize, Serialize};

/// In-game role. Cycled by roster index when the data carries no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Duelist,
    Controller,
    Sentinel,
    Initiator,
    Flex,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Duelist,
        Role::Controller,
        Role::Sentinel,
        Role::Initiator,
        Role::Flex,
    ];

    /// Role assigned to the `index`-th roster slot.
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Duelist => "Duelist",
            Role::Controller => "Controller",
            Role::Sentinel => "Sentinel",
            Role::Initiator => "Initiator",
            Role::Flex => "Flex",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated line for one player of the analyzed team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub kills: u32,
    pub deaths: u32,
    /// Games (maps) the player appeared in
    pub games: u32,
    /// Distinct agents, first-seen order
    pub agents: Vec<String>,
    /// Records the player appeared in, first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_ids: Vec<String>,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Kill/death ratio with deaths floored at 1.
    pub fn kd(&self) -> f64 {
        crate::calculate::kd_ratio(self.kills, self.deaths)
    }

    /// Average kills per game, 0.0 for no games.
    pub fn kills_per_game(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.kills as f64 / self.games as f64
        }
    }

    /// Role from the data, or the slot role for `index`.
    pub fn role_or_slot(&self, index: usize) -> Role {
        self.role.unwrap_or_else(|| Role::for_index(index))
    }

    /// Record an appearance in `record_id`; returns false if already counted.
    pub fn record_appearance(&mut self, record_id: &str) -> bool {
        if self.match_ids.iter().any(|id| id == record_id) {
            return false;
        }
        self.match_ids.push(record_id.to_string());
        true
    }

    /// Record an agent if not already known.
    pub fn add_agent(&mut self, agent: &str) {
        if !agent.is_empty() && !self.agents.iter().any(|a| a == agent) {
            self.agents.push(agent.to_string());
        }
    }
}
