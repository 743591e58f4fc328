use serde::{Deserialize, Serialize};

use crate::{config::LlmOverrides, types::InputError};

const TOPIC_MIN_CHARS: usize = 3;
const TOPIC_MAX_CHARS: usize = 100;
const TIMEFRAME_MAX_CHARS: usize = 50;

/// Difficulty used by the phases variant when the caller does not pick one.
pub const DEFAULT_DIFFICULTY: Difficulty = Difficulty::Intermediate;
/// Timeframe used by the phases variant when the caller does not pick one.
pub const DEFAULT_TIMEFRAME: &str = "3-months";

/// What a caller asks for, as received at the boundary.
///
/// Nothing here is trusted until [`RoadmapRequest::validate`] accepted it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
	pub topic: String,
	#[serde(default)]
	pub difficulty: Option<String>,
	#[serde(default)]
	pub timeframe: Option<String>,
	#[serde(default)]
	pub model: Option<String>,
	#[serde(default)]
	pub endpoint: Option<String>,
	#[serde(default)]
	pub api_key: Option<String>,
}

/// A validated roadmap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roadmap {
	/// Trimmed topic, between 3 and 100 characters.
	pub topic: String,
	pub difficulty: Option<Difficulty>,
	pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	Beginner,
	Intermediate,
	Advanced,
}

impl Difficulty {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Beginner => "beginner",
			Self::Intermediate => "intermediate",
			Self::Advanced => "advanced",
		}
	}
}

impl std::str::FromStr for Difficulty {
	type Err = InputError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"beginner" => Ok(Self::Beginner),
			"intermediate" => Ok(Self::Intermediate),
			"advanced" => Ok(Self::Advanced),
			other => Err(InputError::UnknownDifficulty(other.to_string())),
		}
	}
}

impl RoadmapRequest {
	pub fn new(topic: impl Into<String>) -> Self {
		Self { topic: topic.into(), ..Default::default() }
	}

	/// Checks every field and splits the request into what to generate and how to reach the LLM.
	///
	/// Fails on the first invalid field.
	pub fn validate(self) -> Result<(Roadmap, LlmOverrides), InputError> {
		let topic = self.topic.trim();
		let topic_chars = topic.chars().count();
		if topic_chars < TOPIC_MIN_CHARS {
			return Err(InputError::TopicTooShort)
		}
		if topic_chars > TOPIC_MAX_CHARS {
			return Err(InputError::TopicTooLong)
		}

		let difficulty = self.difficulty.as_deref().map(str::parse::<Difficulty>).transpose()?;

		let timeframe = match self.timeframe.as_deref().map(str::trim) {
			Some("") => return Err(InputError::EmptyTimeframe),
			Some(t) if t.chars().count() > TIMEFRAME_MAX_CHARS =>
				return Err(InputError::TimeframeTooLong),
			t => t.map(str::to_string),
		};

		let model = match self.model.as_deref().map(str::trim) {
			Some("") => return Err(InputError::EmptyModel),
			m => m.map(str::to_string),
		};

		let endpoint = match self.endpoint.as_deref().map(str::trim) {
			Some(e) if !(e.starts_with("https://") || e.starts_with("http://")) =>
				return Err(InputError::BadEndpoint(e.to_string())),
			e => e.map(|e| e.trim_end_matches('/').to_string()),
		};

		let credential = match self.api_key {
			Some(key) if key.trim().is_empty() => return Err(InputError::EmptyCredential),
			key => key,
		};

		Ok((
			Roadmap { topic: topic.to_string(), difficulty, timeframe },
			LlmOverrides { model, endpoint, credential },
		))
	}
}
