//! Mermaid flowchart rendering of a roadmap graph.

use crate::schema::{Edge, Node};

/// Renders `nodes` and `edges` as a top-down Mermaid flowchart.
///
/// Nodes come first, in input order, each labelled with its level glyph, title and estimated
/// hours. Edges follow in input order. The output only depends on the input, so equal graphs
/// always render to the same bytes.
///
/// No validation happens here: an edge pointing at an unknown id is emitted as is.
pub fn generate(nodes: &[Node], edges: &[Edge]) -> String {
	let mut diagram = String::from("graph TD\n");

	for node in nodes {
		diagram.push_str(&format!(
			"  {}[\"{} {}<br/>({}h)\"]\n",
			node.id,
			node.level.glyph(),
			escape(&node.title),
			node.estimated_hours
		));
	}

	for edge in edges {
		diagram.push_str(&format!("  {} --> {}\n", edge.from, edge.to));
	}

	diagram
}

/// Replaces characters Mermaid would read as syntax inside a quoted label with entity codes.
fn escape(label: &str) -> String {
	let mut escaped = String::with_capacity(label.len());
	for c in label.chars() {
		match c {
			'#' => escaped.push_str("#35;"),
			'"' => escaped.push_str("#quot;"),
			'<' => escaped.push_str("#lt;"),
			'>' => escaped.push_str("#gt;"),
			c => escaped.push(c),
		}
	}
	escaped
}
