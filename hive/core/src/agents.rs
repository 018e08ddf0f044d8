//! Agent Identity
//!
//! Identities for the autonomous participants of the collective. The roster
//! is configuration-supplied: the engine never hard-rejects an identifier it
//! has not seen before, it just renders a neutral fallback for it.
//!
//! # Design Philosophy
//!
//! Agent identifiers arrive over the wire as free-form strings. Treating
//! them as an open set (with a configured roster providing display metadata
//! for the known ones) means a server-side roster change never breaks a
//! connected client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single agent
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    /// Create an agent id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Who authored a transcript entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// One of the autonomous agents
    Agent(AgentId),
    /// The human participant
    User,
    /// Engine- or server-generated notice
    System,
}

impl Speaker {
    /// The agent id, if this speaker is an agent
    #[must_use]
    pub fn agent_id(&self) -> Option<&AgentId> {
        match self {
            Self::Agent(id) => Some(id),
            Self::User | Self::System => None,
        }
    }

    /// Map the wire's role/agent field pair to a speaker
    ///
    /// Echoed and replayed messages carry both fields. The explicit agent
    /// field wins when present; otherwise the role value itself is the id.
    #[must_use]
    pub fn from_wire(role: &str, agent: Option<&str>) -> Self {
        match role {
            "user" => Self::User,
            "system" => Self::System,
            role => Self::Agent(AgentId::new(agent.unwrap_or(role))),
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(id) => write!(f, "{id}"),
            Self::User => write!(f, "user"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Display metadata for one agent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Wire identifier
    pub id: AgentId,
    /// Name shown to the human
    pub display_name: String,
    /// One-word characterization of the agent's role in the collective
    pub archetype: String,
}

impl AgentProfile {
    /// Create a profile
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        archetype: impl Into<String>,
    ) -> Self {
        Self {
            id: AgentId::new(id),
            display_name: display_name.into(),
            archetype: archetype.into(),
        }
    }
}

/// The configured set of agents
///
/// Defaults to the three-agent Hive collective. The roster size doubles as
/// the rotation length used by the round estimate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRoster {
    agents: Vec<AgentProfile>,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self {
            agents: vec![
                AgentProfile::new("catalyst", "Catalyst", "Visionary"),
                AgentProfile::new("anchor", "Anchor", "Practical"),
                AgentProfile::new("weaver", "Weaver", "Synthesizer"),
            ],
        }
    }
}

impl AgentRoster {
    /// An empty roster (agents added via [`with_agent`](Self::with_agent))
    #[must_use]
    pub fn empty() -> Self {
        Self { agents: Vec::new() }
    }

    /// Add an agent, builder style
    #[must_use]
    pub fn with_agent(mut self, profile: AgentProfile) -> Self {
        self.agents.push(profile);
        self
    }

    /// Look up the profile for an id
    #[must_use]
    pub fn profile(&self, id: &AgentId) -> Option<&AgentProfile> {
        self.agents.iter().find(|p| &p.id == id)
    }

    /// Whether the id belongs to a configured agent
    #[must_use]
    pub fn is_known(&self, id: &AgentId) -> bool {
        self.profile(id).is_some()
    }

    /// Display name for an id, capitalizing unknown ids as a fallback
    #[must_use]
    pub fn display_name(&self, id: &AgentId) -> String {
        match self.profile(id) {
            Some(profile) => profile.display_name.clone(),
            None => capitalize(id.as_str()),
        }
    }

    /// Number of configured agents
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the roster is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Rotation length for the round estimate, never zero
    #[must_use]
    pub fn rotation(&self) -> usize {
        self.agents.len().max(1)
    }

    /// Iterate over the configured profiles
    pub fn iter(&self) -> impl Iterator<Item = &AgentProfile> {
        self.agents.iter()
    }
}

/// Uppercase the first character, leave the rest untouched
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
