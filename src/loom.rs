use std::marker::PhantomData;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument, trace};

use crate::{
	extract::extract_json,
	prompt,
	request::{Difficulty, RoadmapRequest, DEFAULT_DIFFICULTY, DEFAULT_TIMEFRAME},
	schema::{Edge, Node, Phase, RoadmapGraph, RoadmapPhases, Schema},
	types::{ExtractionError, LoomError},
	CompletionRequest, Config, Llm, LlmConfig, LlmOverrides,
};

/// Response of the graph variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponse {
	pub topic: String,
	pub mermaid_diagram: String,
	pub structure: GraphStructure,
	/// ISO-8601 UTC timestamp with millisecond precision.
	pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStructure {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

/// Response of the phases variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasesResponse {
	pub topic: String,
	pub difficulty: Difficulty,
	pub timeframe: String,
	pub phases: Vec<Phase>,
}

/// The machine that drives a roadmap request from prompt to validated response.
///
/// A `Loom` holds no per-request state. Share one behind an `Arc` and call it concurrently, every
/// call runs its own sequential pipeline with a single awaited LLM call.
#[derive(Debug)]
pub struct Loom<T: Config> {
	llm: T::Llm,
	defaults: LlmConfig,
	_phantom: PhantomData<T>,
}

impl<T: Config> Loom<T> {
	/// Creates a new `Loom` prompting `llm` with `defaults` unless a request overrides them.
	pub fn new(llm: T::Llm, defaults: LlmConfig) -> Self {
		Self { llm, defaults, _phantom: PhantomData }
	}

	pub fn llm(&self) -> &T::Llm {
		&self.llm
	}

	pub fn defaults(&self) -> &LlmConfig {
		&self.defaults
	}

	/// Generates a node/edge skill graph and its Mermaid diagram.
	///
	/// The response echoes the requested topic rather than the one the model wrote back.
	#[instrument(skip(self, request), fields(topic = %request.topic))]
	pub async fn weave_graph(&self, request: RoadmapRequest) -> Result<GraphResponse, LoomError> {
		let (roadmap, overrides) = request.validate()?;

		let prompt = prompt::graph_prompt(&roadmap);
		let graph: RoadmapGraph = self.generate(&prompt, &overrides).await?;

		trace!("Rendering diagram for {} nodes and {} edges", graph.nodes.len(), graph.edges.len());
		let mermaid_diagram = graph.to_mermaid();

		info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "Woven roadmap graph");

		Ok(GraphResponse {
			topic: roadmap.topic,
			mermaid_diagram,
			structure: GraphStructure { nodes: graph.nodes, edges: graph.edges },
			generated_at: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
		})
	}

	/// Generates a multi-phase roadmap.
	///
	/// Difficulty and timeframe fall back to [`DEFAULT_DIFFICULTY`] and [`DEFAULT_TIMEFRAME`].
	#[instrument(skip(self, request), fields(topic = %request.topic))]
	pub async fn weave_phases(&self, request: RoadmapRequest) -> Result<PhasesResponse, LoomError> {
		let (roadmap, overrides) = request.validate()?;
		let difficulty = roadmap.difficulty.unwrap_or(DEFAULT_DIFFICULTY);
		let timeframe = roadmap.timeframe.unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string());

		let prompt = prompt::phases_prompt(&roadmap.topic, difficulty, &timeframe);
		let roadmap_phases: RoadmapPhases = self.generate(&prompt, &overrides).await?;

		info!(phases = roadmap_phases.phases.len(), "Woven roadmap phases");

		Ok(PhasesResponse {
			topic: roadmap.topic,
			difficulty,
			timeframe,
			phases: roadmap_phases.phases,
		})
	}

	/// Prompts the LLM once and validates its answer as `S`.
	async fn generate<S: Schema>(
		&self,
		prompt: &str,
		overrides: &LlmOverrides,
	) -> Result<S, LoomError> {
		let config = self.defaults.with_overrides(overrides);
		trace!("Prompting LLM with {:?}", config);

		let completion = self
			.llm
			.complete(CompletionRequest {
				prompt,
				config: &config,
				temperature: T::TEMPERATURE,
				max_tokens: T::MAX_COMPLETION_TOKENS,
			})
			.await
			.map_err(|e| {
				error!("Failed to prompt LLM: {}", e);
				e
			})?;

		debug!("Completion: {}", completion);

		let candidate = Self::parse(&completion).map_err(|e| {
			error!("Failed to extract JSON from completion: {}", e);
			e
		})?;

		S::validate(&candidate).map_err(|e| {
			error!("{}", e);
			LoomError::from(e)
		})
	}

	fn parse(completion: &str) -> Result<Value, ExtractionError> {
		let json = extract_json(completion)?;
		serde_json::from_str(json).map_err(ExtractionError::Malformed)
	}
}
