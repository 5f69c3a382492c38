//! Panel: the ordered set of agents taking part in one debate

use super::entities::{Agent, AgentId};
use crate::core::error::DomainError;
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, id-unique set of agents (size ≥ 1)
///
/// Panel order is significant: sequential rounds speak in this order and
/// parallel rounds append their turns in this order.
#[derive(Debug, Clone)]
pub struct Panel {
    agents: Vec<Arc<Agent>>,
}

impl Panel {
    /// Build a panel, rejecting empty panels, duplicate ids and invalid agents
    pub fn new(agents: Vec<Arc<Agent>>) -> Result<Self, DomainError> {
        if agents.is_empty() {
            return Err(DomainError::EmptyPanel);
        }

        let mut seen = HashSet::new();
        for agent in &agents {
            agent.validate()?;
            if !seen.insert(agent.id.clone()) {
                return Err(DomainError::DuplicateAgent(agent.id.to_string()));
            }
        }

        Ok(Self { agents })
    }

    /// Convenience constructor taking owned agents
    pub fn from_agents(agents: impl IntoIterator<Item = Agent>) -> Result<Self, DomainError> {
        Self::new(agents.into_iter().map(Arc::new).collect())
    }

    pub fn agents(&self) -> &[Arc<Agent>] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Always false for a constructed panel; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: &AgentId) -> Option<&Arc<Agent>> {
        self.agents.iter().find(|a| &a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Agent>> {
        self.agents.iter()
    }
}
