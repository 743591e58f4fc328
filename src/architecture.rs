/// The following diagram shows how one request travels through the library and where an
/// application plugs into it.
///
/// Only the traits [`Config`](crate::Config) and [`Llm`](crate::Llm) need to be implemented by
/// the application, everything else is provided.
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph TB
///     subgraph Application
///         App
///         http[HTTP service]
///         cli[CLI]
///     end
///     App-. impl .- Config
///     http-- RoadmapRequest --> weave
///     cli-- RoadmapRequest --> weave
///     subgraph Roadmap Weaver
///         llm>Llm]
///         openai[OpenAiLlm]-. impl .- llm
///         subgraph Config
///             llm_type[Llm]
///         end
///         subgraph Loom
///             weave[weave_graph / weave_phases]
///             weave-- validate input --> prompt[Prompt builder]
///             prompt-- complete --> llm_type
///             llm_type-- raw completion --> extract[extract_json]
///             extract-- serde_json::Value --> schema[Schema::validate]
///             schema-- RoadmapGraph --> mermaid[mermaid::generate]
///         end
///         llm_type --> openai
///     end
///     openai --> provider[(OpenAI compatible API)]
/// ```
///
/// The [`Loom`](crate::Loom) is built once with an [`LlmConfig`](crate::LlmConfig) holding the
/// process defaults (model, endpoint, credential). Requests may override those per call without
/// touching the shared value. Any failure along the way discards the generation and surfaces as
/// a [`LoomError`](crate::LoomError).
pub struct Diagram;
