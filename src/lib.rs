//! Weaves structured learning roadmaps out of an LLM.
//!
//! Given a topic, and optionally a difficulty and a timeframe, Roadmap Weaver prompts an LLM for a
//! roadmap, pulls the JSON out of whatever the model answered, validates it strictly and returns
//! a typed structure. Two shapes are supported:
//!
//! - a skill graph ([`RoadmapGraph`]) of nodes and edges, returned together with a Mermaid
//!   flowchart of it;
//! - a multi-phase roadmap ([`RoadmapPhases`]) with resources, projects, assessments,
//!   troubleshooting tips and community links for every phase.
//!
//! The heart of the library is the [`Loom`], which runs one request through the pipeline:
//!
//! prompt → [`Llm::complete`] → [`extract::extract_json`] → [`Schema::validate`] → response
//!
//! The LLM is abstracted by the [`Llm`] trait. [`openai::OpenAiLlm`] talks to OpenAI or to any
//! server speaking its API. Which implementation a [`Loom`] uses is picked by the [`Config`]
//! trait, and how to reach it (model, endpoint, credential) by an [`LlmConfig`] value built once
//! at startup. Each request may override parts of that value.
//!
//! Nothing is retried, streamed or cached: one request is one completion call, and any failure
//! discards the whole generation.
//!
//! # Example
//!
//! ```ignore
//! use roadmap_weaver::{openai::OpenAiLlm, Config, LlmConfig, Loom, RoadmapRequest};
//!
//! #[derive(Debug)]
//! struct App;
//!
//! impl Config for App {
//!     type Llm = OpenAiLlm;
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roadmap_weaver::LoomError> {
//!     let defaults = LlmConfig::new("gpt-4o-mini").with_credential("sk-...");
//!     let loom = Loom::<App>::new(OpenAiLlm::new(&defaults), defaults);
//!
//!     let roadmap = loom.weave_graph(RoadmapRequest::new("Rust")).await?;
//!     println!("{}", roadmap.mermaid_diagram);
//!     Ok(())
//! }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

pub mod architecture;
pub mod config;
pub mod extract;
pub mod loom;
pub mod mermaid;
pub mod openai;
pub mod prompt;
pub mod request;
pub mod schema;
pub mod service;
pub mod text;
pub mod types;

#[cfg(test)]
mod mock;

pub use config::{LlmConfig, LlmOverrides};
pub use loom::{GraphResponse, GraphStructure, Loom, PhasesResponse};
pub use request::{Difficulty, RoadmapRequest};
pub use schema::{RoadmapGraph, RoadmapPhases, Schema};
pub use types::{ErrorClass, LoomError};

/// Compile time parameters of a [`Loom`].
///
/// Applications implement this once to pick their [`Llm`] and tune sampling.
pub trait Config: Debug + Send + Sync + 'static {
	/// The sampling temperature, between 0 and 2. Higher values like 0.8 make the output more
	/// random, lower values like 0.2 make it more focused and deterministic.
	///
	/// Defaults to `0.7`
	const TEMPERATURE: f32 = 0.7;
	/// Upper bound of tokens the model may produce for one roadmap.
	///
	/// Phase roadmaps are long, a too small value truncates the JSON and fails extraction.
	///
	/// Defaults to `4096`
	const MAX_COMPLETION_TOKENS: u32 = 4_096;

	/// The LLM every request is sent to.
	type Llm: Llm;
}

/// Everything an [`Llm`] needs for one completion.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
	/// The whole prompt, sent as a single user message.
	pub prompt: &'a str,
	/// Process defaults merged with the request overrides.
	pub config: &'a LlmConfig,
	pub temperature: f32,
	pub max_tokens: u32,
}

/// A text completion provider.
///
/// Implementations make exactly one call per [`Llm::complete`] and never retry, the caller
/// decides what to do with a failure.
#[async_trait]
pub trait Llm: Debug + Send + Sync + 'static {
	/// Returns the completion for `request.prompt`.
	///
	/// Fails with [`types::UpstreamError`] when the call errors, times out or comes back empty.
	async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, types::UpstreamError>;
}
