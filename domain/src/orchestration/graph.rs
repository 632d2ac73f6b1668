//! Communication graph: which agent may hand off to which, and how.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// How the target of a handoff relates to its caller.
///
/// Both kinds run the target to completion and return its answer to the
/// caller; the kind is part of the edge so a graph can allow one and not
/// the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffKind {
    /// Ask the target a question and use its answer
    #[default]
    SendMessage,
    /// Hand the task over to the target
    Transfer,
}

impl HandoffKind {
    pub const ALL: [HandoffKind; 2] = [HandoffKind::SendMessage, HandoffKind::Transfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandoffKind::SendMessage => "send_message",
            HandoffKind::Transfer => "transfer",
        }
    }
}

impl std::str::FromStr for HandoffKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "send_message" | "message" => Ok(HandoffKind::SendMessage),
            "transfer" | "handoff" => Ok(HandoffKind::Transfer),
            other => Err(format!("Unknown handoff kind: {}", other)),
        }
    }
}

impl std::fmt::Display for HandoffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared permission: `from` may hand off to `to` using `kind`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: HandoffKind,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: HandoffKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.kind)
    }
}

/// Directed graph of agents and the handoffs they are allowed to make.
///
/// Built once while the agency is assembled and read-only afterwards.
/// A handoff is legal iff an edge matches `(current agent, target, kind)`.
#[derive(Debug, Clone, Default)]
pub struct CommunicationGraph {
    agents: BTreeSet<String>,
    edges: HashSet<Edge>,
}

impl CommunicationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Fails if the name is already present.
    pub fn add_agent(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        if !self.agents.insert(name.clone()) {
            return Err(DomainError::DuplicateAgent(name));
        }
        Ok(())
    }

    /// Add an edge between two known agents.
    ///
    /// Declaring the same edge twice is a no-op.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), DomainError> {
        for name in [&edge.from, &edge.to] {
            if !self.agents.contains(name) {
                return Err(DomainError::UnknownAgent(name.clone()));
            }
        }
        if edge.from == edge.to {
            return Err(DomainError::InvalidEdge {
                from: edge.from,
                to: edge.to,
                reason: "self edges are not allowed".to_string(),
            });
        }
        self.edges.insert(edge);
        Ok(())
    }

    pub fn contains_agent(&self, name: &str) -> bool {
        self.agents.contains(name)
    }

    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|s| s.as_str())
    }

    /// Whether `from` may hand off to `to` with `kind`
    pub fn allows(&self, from: &str, to: &str, kind: HandoffKind) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to && e.kind == kind)
    }

    /// Agents reachable from `from` by any kind, sorted and deduplicated
    pub fn targets(&self, from: &str) -> Vec<&str> {
        let targets: BTreeSet<&str> = self
            .edges
            .iter()
            .filter(|e| e.from == from)
            .map(|e| e.to.as_str())
            .collect();
        targets.into_iter().collect()
    }

    /// Kinds `from` may use towards any target, sorted
    pub fn kinds_from(&self, from: &str) -> Vec<HandoffKind> {
        let kinds: BTreeSet<HandoffKind> = self
            .edges
            .iter()
            .filter(|e| e.from == from)
            .map(|e| e.kind)
            .collect();
        kinds.into_iter().collect()
    }

    /// All edges, sorted for stable output
    pub fn edges(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.iter().collect();
        edges.sort();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> CommunicationGraph {
        let mut graph = CommunicationGraph::new();
        for name in ["planner", "coder", "reviewer"] {
            graph.add_agent(name).unwrap();
        }
        graph
            .add_edge(Edge::new("planner", "coder", HandoffKind::SendMessage))
            .unwrap();
        graph
            .add_edge(Edge::new("planner", "reviewer", HandoffKind::Transfer))
            .unwrap();
        graph
    }

    #[test]
    fn test_allows_matches_kind() {
        let graph = graph();
        assert!(graph.allows("planner", "coder", HandoffKind::SendMessage));
        assert!(!graph.allows("planner", "coder", HandoffKind::Transfer));
        assert!(!graph.allows("coder", "planner", HandoffKind::SendMessage));
    }

    #[test]
    fn test_targets_and_kinds() {
        let graph = graph();
        assert_eq!(graph.targets("planner"), vec!["coder", "reviewer"]);
        assert!(graph.targets("coder").is_empty());
        assert_eq!(
            graph.kinds_from("planner"),
            vec![HandoffKind::SendMessage, HandoffKind::Transfer]
        );
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let mut graph = graph();
        assert_eq!(
            graph.add_agent("coder"),
            Err(DomainError::DuplicateAgent("coder".to_string()))
        );
    }

    #[test]
    fn test_edge_to_unknown_agent_rejected() {
        let mut graph = graph();
        let err = graph
            .add_edge(Edge::new("planner", "ghost", HandoffKind::SendMessage))
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownAgent("ghost".to_string()));
    }

    #[test]
    fn test_self_edge_rejected() {
        let mut graph = graph();
        let err = graph
            .add_edge(Edge::new("coder", "coder", HandoffKind::SendMessage))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidEdge { .. }));
    }

    #[test]
    fn test_handoff_kind_parse() {
        assert_eq!("transfer".parse::<HandoffKind>(), Ok(HandoffKind::Transfer));
        assert_eq!(
            "send_message".parse::<HandoffKind>(),
            Ok(HandoffKind::SendMessage)
        );
        assert!("broadcast".parse::<HandoffKind>().is_err());
        assert_eq!(
            Edge::new("a", "b", HandoffKind::Transfer).to_string(),
            "a -> b (transfer)"
        );
    }
}
