use std::{fmt::Display, time::Duration};

use async_openai::error::OpenAIError;

use crate::schema::Violation;

/// Message returned to clients for every failure that is not their fault.
pub const GENERATION_FAILED: &str = "Failed to generate roadmap. Please try again.";

/// How a [`LoomError`] should be reported at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
	/// The request itself was invalid.
	BadInput,
	/// The model, the extractor or the validator failed us.
	GenerationFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum LoomError {
	Input(#[from] InputError),
	Upstream(#[from] UpstreamError),
	Extraction(#[from] ExtractionError),
	Schema(#[from] SchemaError),
}

impl LoomError {
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::Input(_) => ErrorClass::BadInput,
			Self::Upstream(_) | Self::Extraction(_) | Self::Schema(_) =>
				ErrorClass::GenerationFailed,
		}
	}

	/// Message that is safe to hand to an untrusted client.
	///
	/// Only input errors are surfaced verbatim, anything else may carry endpoint details.
	pub fn public_message(&self) -> String {
		match self {
			Self::Input(e) => e.to_string(),
			_ => GENERATION_FAILED.to_string(),
		}
	}
}

impl Display for LoomError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Input(e) => write!(f, "{}", e),
			Self::Upstream(e) => write!(f, "{}", e),
			Self::Extraction(e) => write!(f, "{}", e),
			Self::Schema(e) => write!(f, "{}", e),
		}
	}
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
	TopicTooShort,
	TopicTooLong,
	UnknownDifficulty(String),
	EmptyTimeframe,
	TimeframeTooLong,
	EmptyModel,
	BadEndpoint(String),
	EmptyCredential,
}

impl Display for InputError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::TopicTooShort => write!(f, "Topic must be at least 3 characters"),
			Self::TopicTooLong => write!(f, "Topic must not exceed 100 characters"),
			Self::UnknownDifficulty(d) => write!(
				f,
				"Unknown difficulty \"{}\", expected beginner, intermediate or advanced",
				d
			),
			Self::EmptyTimeframe => write!(f, "Timeframe must not be empty"),
			Self::TimeframeTooLong => write!(f, "Timeframe must not exceed 50 characters"),
			Self::EmptyModel => write!(f, "Model must not be empty"),
			Self::BadEndpoint(e) => write!(f, "Endpoint must be an http(s) URL, got \"{}\"", e),
			Self::EmptyCredential => write!(f, "API key must not be empty"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
	/// Failed to build or send the request to OpenAI.
	OpenAI(#[from] OpenAIError),
	/// Any other provider failure.
	Provider(String),
	/// The configured timeout elapsed before a completion came back.
	TimedOut(Duration),
	/// The provider answered without any content.
	EmptyCompletion,
}

impl Display for UpstreamError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::OpenAI(e) => write!(f, "Failed to prompt OpenAI: {}", e),
			Self::Provider(msg) => write!(f, "Failed to prompt LLM: {}", msg),
			Self::TimedOut(after) => write!(f, "LLM did not respond within {:?}", after),
			Self::EmptyCompletion => write!(f, "LLM returned an empty completion"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
	/// Nothing JSON-shaped in the completion.
	NoJson,
	/// Something JSON-shaped was found but did not parse.
	Malformed(serde_json::Error),
}

impl Display for ExtractionError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NoJson => write!(f, "No JSON found in completion"),
			Self::Malformed(e) => write!(f, "Malformed JSON in completion: {}", e),
		}
	}
}

/// Every violation found while validating one candidate.
#[derive(Debug, thiserror::Error, PartialEq)]
pub struct SchemaError {
	pub violations: Vec<Violation>,
}

impl SchemaError {
	/// Whether any violation points at `path`.
	pub fn mentions(&self, path: &str) -> bool {
		self.violations.iter().any(|v| v.path == path)
	}
}

impl Display for SchemaError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Completion failed validation with {} violation(s)", self.violations.len())?;
		for violation in &self.violations {
			write!(f, "\n  - {}", violation)?;
		}
		Ok(())
	}
}
