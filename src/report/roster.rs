//! Deployment-specific lookup tables: the referral agent roster and the
//! teacher allow-list.
//!
//! Both are loaded once at startup and read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::report::names::display_name;
use crate::types::{ReportError, Result};

/// Mapping from referral agent code to the agent's display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRoster {
    agents: BTreeMap<i64, String>,
}

impl Default for AgentRoster {
    /// Field agents active for the current install campaign
    fn default() -> Self {
        Self::from_entries([
            (1001, "Cabdinuur Ciise Aaadan"),
            (1002, "Cumar Cabdikaafi Axmed"),
            (1003, "Saadaq Shariif Faarax"),
            (1004, "Xasan Salaad Tarabi"),
            (2000, "Team Hamza Campaign"),
        ])
    }
}

impl AgentRoster {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            agents: entries.into_iter().map(|(id, name)| (id, name.into())).collect(),
        }
    }

    /// Parse a JSON object of `{"<agentId>": "<name>"}`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| ReportError::Config(format!("Invalid agent roster: {}", e)))?;

        let mut agents = BTreeMap::new();
        for (key, name) in raw {
            let id: i64 = key.trim().parse().map_err(|_| {
                ReportError::Config(format!("Agent roster key '{}' is not a number", key))
            })?;
            agents.insert(id, name);
        }
        Ok(Self { agents })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("Cannot read agent roster {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn name(&self, agent_id: i64) -> Option<&str> {
        self.agents.get(&agent_id).map(String::as_str)
    }

    /// Agents in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.agents.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Teachers whose rows may appear in the grading report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherAllowList {
    /// Normalized, lowercased display names
    names: Vec<String>,
}

impl TeacherAllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| display_name([Some(n.as_ref())]).to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Parse a JSON array of teacher display names
    pub fn from_json(json: &str) -> Result<Self> {
        let names: Vec<String> = serde_json::from_str(json)
            .map_err(|e| ReportError::Config(format!("Invalid teacher allow-list: {}", e)))?;
        Ok(Self::new(names))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("Cannot read teacher allow-list {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Case-insensitive exact match on the normalized display name
    pub fn contains(&self, teacher_name: &str) -> bool {
        let needle = display_name([Some(teacher_name)]).to_lowercase();
        self.names.iter().any(|n| *n == needle)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Roster and allow-list shared by the report builders
#[derive(Debug, Clone, Default)]
pub struct ReportTables {
    pub agents: AgentRoster,
    pub allow_list: Option<TeacherAllowList>,
}
