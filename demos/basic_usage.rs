use async_trait::async_trait;
use roadmap_weaver::{
	types::UpstreamError, CompletionRequest, Config, Llm, LlmConfig, Loom, LoomError,
	RoadmapRequest,
};

// An LLM that always answers with the same chatty completion
#[derive(Debug, Default, Copy, Clone)]
struct CannedLlm;

#[async_trait]
impl Llm for CannedLlm {
	async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, UpstreamError> {
		println!("Prompting {} with {} characters", request.config.model, request.prompt.len());

		Ok(r#"Here is your roadmap:
```json
{
  "topic": "Rust",
  "nodes": [
    { "id": "basics", "title": "Syntax & Cargo", "description": "Toolchain and syntax", "level": "beginner", "estimatedHours": 10 },
    { "id": "ownership", "title": "Ownership", "description": "Moves, borrows and lifetimes", "level": "intermediate", "estimatedHours": 25 },
    { "id": "async", "title": "Async \"Rust\"", "description": "Futures and tokio", "level": "advanced", "estimatedHours": 40 }
  ],
  "edges": [
    { "from": "basics", "to": "ownership" },
    { "from": "ownership", "to": "async" }
  ]
}
```"#
			.to_string())
	}
}

// Define the configuration
#[derive(Debug)]
struct MyConfig;

impl Config for MyConfig {
	type Llm = CannedLlm;
}

#[tokio::main]
async fn main() -> Result<(), LoomError> {
	let loom = Loom::<MyConfig>::new(CannedLlm, LlmConfig::new("canned"));

	let request = RoadmapRequest { difficulty: Some("beginner".into()), ..RoadmapRequest::new("Rust") };
	let response = loom.weave_graph(request).await?;

	println!("Generated at: {}", response.generated_at);
	println!("Nodes: {}", response.structure.nodes.len());
	println!("{}", response.mermaid_diagram);

	Ok(())
}
