use serde::{Deserialize, Deserializer, Serialize};

/// Node categories the backend emits. Unknown strings fall back to `Process`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Entry,
	Output,
	Decision,
	Database,
	Api,
	#[default]
	#[serde(other)]
	Process,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
	Pill,
	Rect,
	Diamond,
}

impl NodeShape {
	/// Horizontal padding before the badge and label. Diamonds keep text in
	/// their middle band.
	pub fn text_inset(self, width: f64) -> f64 {
		match self {
			NodeShape::Pill => 22.0,
			NodeShape::Rect => 18.0,
			NodeShape::Diamond => width / 4.0,
		}
	}
}

/// Colors used when drawing a node of a given kind.
#[derive(Clone, Copy, Debug)]
pub struct NodePalette {
	pub color: &'static str,
	pub fill: &'static str,
	pub glow: &'static str,
	pub shape: NodeShape,
}

impl NodeKind {
	pub const ALL: [NodeKind; 6] = [
		NodeKind::Entry,
		NodeKind::Output,
		NodeKind::Process,
		NodeKind::Decision,
		NodeKind::Database,
		NodeKind::Api,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Entry => "entry",
			NodeKind::Output => "output",
			NodeKind::Process => "process",
			NodeKind::Decision => "decision",
			NodeKind::Database => "database",
			NodeKind::Api => "api",
		}
	}

	pub fn palette(self) -> NodePalette {
		let (color, fill, glow, shape) = match self {
			NodeKind::Entry => (
				"#06FDD8",
				"rgba(6, 253, 216, 0.12)",
				"rgba(6, 253, 216, 0.4)",
				NodeShape::Pill,
			),
			NodeKind::Output => (
				"#00D4FF",
				"rgba(0, 212, 255, 0.12)",
				"rgba(0, 212, 255, 0.4)",
				NodeShape::Pill,
			),
			NodeKind::Process => (
				"#9D4EDD",
				"rgba(157, 78, 221, 0.12)",
				"rgba(157, 78, 221, 0.4)",
				NodeShape::Rect,
			),
			NodeKind::Decision => (
				"#F59E0B",
				"rgba(245, 158, 11, 0.12)",
				"rgba(245, 158, 11, 0.4)",
				NodeShape::Diamond,
			),
			NodeKind::Database => (
				"#8B5CF6",
				"rgba(139, 92, 246, 0.12)",
				"rgba(139, 92, 246, 0.4)",
				NodeShape::Rect,
			),
			NodeKind::Api => (
				"#EC4899",
				"rgba(236, 72, 153, 0.12)",
				"rgba(236, 72, 153, 0.4)",
				NodeShape::Rect,
			),
		};
		NodePalette {
			color,
			fill,
			glow,
			shape,
		}
	}
}

/// Generated graphs may carry `null` where a value is expected; treat it as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
	pub id: String,
	#[serde(rename = "type", default, deserialize_with = "null_as_default")]
	pub kind: NodeKind,
	#[serde(default, deserialize_with = "null_as_default")]
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
	pub from: String,
	pub to: String,
}

/// One snapshot of a repository workflow as served by `/api/workflow`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
	#[serde(default)]
	pub nodes: Vec<WorkflowNode>,
	#[serde(default)]
	pub edges: Vec<WorkflowEdge>,
}

impl WorkflowGraph {
	pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_backend_payload() {
		let graph: WorkflowGraph = serde_json::from_str(
			r#"{
				"nodes": [
					{"id": "n1", "label": "User Request", "description": "Browser sends request", "type": "entry"},
					{"id": "n2", "label": "REST API", "type": "api"}
				],
				"edges": [{"from": "n1", "to": "n2"}]
			}"#,
		)
		.unwrap();

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].kind, NodeKind::Entry);
		assert_eq!(graph.nodes[0].description.as_deref(), Some("Browser sends request"));
		assert_eq!(graph.nodes[1].kind, NodeKind::Api);
		assert_eq!(graph.nodes[1].description, None);
		assert_eq!(graph.edges[0].to, "n2");
	}

	#[test]
	fn unknown_or_missing_type_is_process() {
		let graph: WorkflowGraph = serde_json::from_str(
			r#"{"nodes": [{"id": "a", "label": "A", "type": "cloud"}, {"id": "b", "label": "B"}]}"#,
		)
		.unwrap();

		assert_eq!(graph.nodes[0].kind, NodeKind::Process);
		assert_eq!(graph.nodes[1].kind, NodeKind::Process);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn null_type_and_label_degrade_to_defaults() {
		let graph: WorkflowGraph = serde_json::from_str(
			r#"{
				"nodes": [
					{"id": "a", "label": "A", "type": null},
					{"id": "b", "label": null, "type": "decision", "description": null}
				],
				"edges": [{"from": "a", "to": "b"}]
			}"#,
		)
		.unwrap();

		assert_eq!(graph.nodes[0].kind, NodeKind::Process);
		assert_eq!(graph.nodes[0].label, "A");
		assert_eq!(graph.nodes[1].kind, NodeKind::Decision);
		assert_eq!(graph.nodes[1].label, "");
		assert_eq!(graph.nodes[1].description, None);
	}

	#[test]
	fn legend_order_is_stable() {
		let names: Vec<_> = NodeKind::ALL.iter().map(|k| k.as_str()).collect();
		assert_eq!(names, ["entry", "output", "process", "decision", "database", "api"]);
	}

	#[test]
	fn shapes_follow_kind() {
		assert_eq!(NodeKind::Decision.palette().shape, NodeShape::Diamond);
		assert_eq!(NodeKind::Entry.palette().shape, NodeShape::Pill);
		assert_eq!(NodeKind::Output.palette().shape, NodeShape::Pill);
		assert_eq!(NodeKind::Database.palette().shape, NodeShape::Rect);
		assert_eq!(NodeKind::Process.palette().color, "#9D4EDD");
	}

	#[test]
	fn diamond_text_fits_inside_the_outline() {
		// badge baseline sits 28px into a 200x90 node
		let (w, h, baseline) = (200.0, 90.0, 28.0);
		let half_width_at = |dy: f64| w / 2.0 * (1.0 - (dy - h / 2.0).abs() / (h / 2.0));
		let inset = NodeShape::Diamond.text_inset(w);
		assert!(w / 2.0 - inset <= half_width_at(baseline));
		assert!(NodeShape::Rect.text_inset(w) < inset);
	}
}
