use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{index, join, Enumerated, Schema, Validator, ViolationKind};
use crate::{mermaid, types::SchemaError};

/// A skill-dependency graph describing one learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapGraph {
	pub topic: String,
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	pub id: String,
	pub title: String,
	pub description: String,
	pub level: Level,
	pub estimated_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	pub from: String,
	pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Beginner,
	Intermediate,
	Advanced,
	Expert,
}

impl Enumerated for Level {
	const ALLOWED: &'static [&'static str] = &["beginner", "intermediate", "advanced", "expert"];

	fn from_name(name: &str) -> Option<Self> {
		match name {
			"beginner" => Some(Self::Beginner),
			"intermediate" => Some(Self::Intermediate),
			"advanced" => Some(Self::Advanced),
			"expert" => Some(Self::Expert),
			_ => None,
		}
	}
}

impl Level {
	/// Marker shown in front of a node title in diagrams.
	pub fn glyph(&self) -> &'static str {
		match self {
			Self::Beginner => "▦",
			Self::Intermediate => "▣",
			Self::Advanced => "▨",
			Self::Expert => "▧",
		}
	}
}

impl RoadmapGraph {
	/// Mermaid flowchart for this graph, see [`mermaid::generate`].
	pub fn to_mermaid(&self) -> String {
		mermaid::generate(&self.nodes, &self.edges)
	}

	/// Records duplicate node ids and edges pointing at undeclared nodes.
	fn check_references(&self, v: &mut Validator) {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for (i, node) in self.nodes.iter().enumerate() {
			if !ids.insert(node.id.as_str()) {
				v.violation(
					join(&index("nodes", i), "id"),
					ViolationKind::DuplicateId(node.id.clone()),
				);
			}
		}

		for (i, edge) in self.edges.iter().enumerate() {
			let path = index("edges", i);
			for (key, id) in [("from", &edge.from), ("to", &edge.to)] {
				if !ids.contains(id.as_str()) {
					v.violation(join(&path, key), ViolationKind::UnknownNode(id.clone()));
				}
			}
		}
	}
}

impl Schema for RoadmapGraph {
	fn validate(candidate: &Value) -> Result<Self, SchemaError> {
		let mut v = Validator::default();

		let graph = v.object(candidate, "").and_then(|root| {
			let topic = v.string(root, "topic", "");
			let nodes = v.each_object(root, "nodes", "", Node::check);
			let edges = v.each_object(root, "edges", "", Edge::check);
			Some(Self { topic: topic?, nodes: nodes?, edges: edges? })
		});

		if let Some(graph) = &graph {
			graph.check_references(&mut v);
		}

		v.finish(graph)
	}
}

/// Node ids end up as bare Mermaid identifiers.
///
/// `end` closes a subgraph and `--` starts a link, in either case Mermaid stops reading an id.
fn is_identifier(id: &str) -> bool {
	!id.is_empty() &&
		id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') &&
		!id.contains("--") &&
		!id.eq_ignore_ascii_case("end")
}

impl Node {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let id = v.string(obj, "id", path).filter(|id| {
			let ok = is_identifier(id);
			if !ok {
				v.violation(join(path, "id"), ViolationKind::BadFormat {
					expected: "an identifier made of letters, digits, '_' or single '-', other than 'end'",
				});
			}
			ok
		});
		let title = v.non_empty_string(obj, "title", path);
		let description = v.string(obj, "description", path);
		let level = v.enumerated(obj, "level", path);
		let estimated_hours = v.positive_number(obj, "estimatedHours", path);

		Some(Self {
			id: id?,
			title: title?,
			description: description?,
			level: level?,
			estimated_hours: estimated_hours?,
		})
	}
}

impl Edge {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let from = v.string(obj, "from", path);
		let to = v.string(obj, "to", path);
		Some(Self { from: from?, to: to? })
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn node(id: &str) -> Value {
		json!({
			"id": id,
			"title": "Basics",
			"description": "d",
			"level": "beginner",
			"estimatedHours": 40
		})
	}

	#[test]
	fn valid_graph() {
		let candidate = json!({
			"topic": "Go",
			"nodes": [node("node_1"), node("node_2")],
			"edges": [{ "from": "node_1", "to": "node_2" }],
			"extra": "ignored"
		});

		let graph = RoadmapGraph::validate(&candidate).unwrap();
		assert_eq!(graph.topic, "Go");
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].level, Level::Beginner);
		assert_eq!(graph.nodes[0].estimated_hours, 40.0);
		assert_eq!(graph.edges, vec![Edge { from: "node_1".into(), to: "node_2".into() }]);
	}

	#[test]
	fn rejects_unknown_level() {
		let candidate = json!({
			"topic": "Go",
			"nodes": [{
				"id": "n1",
				"title": "X",
				"description": "Y",
				"level": "master",
				"estimatedHours": 10
			}],
			"edges": []
		});

		let err = RoadmapGraph::validate(&candidate).unwrap_err();
		assert_eq!(err.violations.len(), 1);
		assert_eq!(err.violations[0].path, "nodes[0].level");
		assert!(matches!(
			&err.violations[0].kind,
			ViolationKind::NotInSet { value, .. } if value == "master"
		));
		assert!(err.to_string().contains("nodes[0].level"));
	}

	#[test]
	fn rejects_hours_as_string() {
		let mut bad = node("n1");
		bad["estimatedHours"] = json!("40");
		let candidate = json!({ "topic": "Go", "nodes": [bad], "edges": [] });

		let err = RoadmapGraph::validate(&candidate).unwrap_err();
		assert!(err.mentions("nodes[0].estimatedHours"));
	}

	#[test]
	fn enumerates_every_violation() {
		let candidate = json!({
			"nodes": [
				{ "id": "a", "title": ["X"], "description": "Y", "level": "beginner", "estimatedHours": -1 },
				{ "id": "b", "description": "Y", "level": "Beginner", "estimatedHours": 3 }
			],
			"edges": {}
		});

		let err = RoadmapGraph::validate(&candidate).unwrap_err();
		for path in [
			"topic",
			"nodes[0].title",
			"nodes[0].estimatedHours",
			"nodes[1].title",
			"nodes[1].level",
			"edges",
		] {
			assert!(err.mentions(path), "missing violation for {path}: {err}");
		}
		assert_eq!(err.violations.len(), 6);
	}

	#[test]
	fn rejects_non_object_root() {
		let err = RoadmapGraph::validate(&json!([1, 2])).unwrap_err();
		assert_eq!(err.violations[0].path, "");
		assert_eq!(
			err.violations[0].kind,
			ViolationKind::WrongType { expected: "object", found: "array" }
		);
	}

	#[test]
	fn rejects_dangling_edges() {
		let candidate = json!({
			"topic": "Go",
			"nodes": [node("node_1")],
			"edges": [{ "from": "node_1", "to": "node_9" }, { "from": "node_0", "to": "node_1" }]
		});

		let err = RoadmapGraph::validate(&candidate).unwrap_err();
		assert_eq!(err.violations.len(), 2);
		assert_eq!(err.violations[0].path, "edges[0].to");
		assert_eq!(err.violations[0].kind, ViolationKind::UnknownNode("node_9".into()));
		assert!(err.mentions("edges[1].from"));
	}

	#[test]
	fn rejects_duplicate_ids() {
		let candidate = json!({
			"topic": "Go",
			"nodes": [node("node_1"), node("node_1")],
			"edges": []
		});

		let err = RoadmapGraph::validate(&candidate).unwrap_err();
		assert_eq!(err.violations.len(), 1);
		assert_eq!(err.violations[0].path, "nodes[1].id");
	}

	#[test]
	fn rejects_ids_that_are_not_identifiers() {
		let candidate = json!({ "topic": "Go", "nodes": [node("node 1")], "edges": [] });

		let err = RoadmapGraph::validate(&candidate).unwrap_err();
		assert!(err.mentions("nodes[0].id"));
	}

	#[test]
	fn rejects_ids_mermaid_would_misread() {
		for id in ["end", "End", "END", "a--b", "node--", "-->x"] {
			let candidate = json!({ "topic": "Go", "nodes": [node(id)], "edges": [] });

			let err = RoadmapGraph::validate(&candidate).unwrap_err();
			assert!(err.mentions("nodes[0].id"), "{id} was accepted");
		}

		for id in ["endpoint", "back-end", "node-1"] {
			let candidate = json!({ "topic": "Go", "nodes": [node(id)], "edges": [] });
			assert!(RoadmapGraph::validate(&candidate).is_ok(), "{id} was rejected");
		}
	}

	#[test]
	fn serializes_with_camel_case() {
		let graph = RoadmapGraph::validate(&json!({
			"topic": "Go",
			"nodes": [node("node_1")],
			"edges": []
		}))
		.unwrap();

		let value = serde_json::to_value(&graph.nodes[0]).unwrap();
		assert_eq!(value["estimatedHours"], json!(40.0));
		assert_eq!(value["level"], json!("beginner"));
	}
}
