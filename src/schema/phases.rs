use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{index, join, Enumerated, Schema, Validator, ViolationKind};
use crate::types::SchemaError;

/// A roadmap split into chronological learning phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhases {
	pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
	pub id: String,
	pub name: String,
	pub introduction: String,
	pub duration: String,
	pub prerequisites: Vec<String>,
	pub technologies: Vec<String>,
	pub concepts: Vec<String>,
	pub time_breakdown: TimeBreakdown,
	pub milestones: Vec<Milestone>,
	pub resources: Vec<Resource>,
	pub project: Project,
	pub assessment: Vec<Assessment>,
	pub troubleshooting: Vec<TroubleshootingTip>,
	pub community_resources: Vec<Community>,
}

/// How the time of a phase is split, as percentage strings such as `"40%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBreakdown {
	pub concepts: String,
	pub practice: String,
	pub project: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
	pub title: String,
	pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
	pub title: String,
	pub url: String,
	#[serde(rename = "type")]
	pub kind: ResourceKind,
	pub duration: String,
	pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
	Course,
	Tutorial,
	Documentation,
	Book,
	Article,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	pub title: String,
	pub overview: String,
	pub requirements: Vec<String>,
	pub acceptance_criteria: Vec<String>,
	pub learning_objectives: Vec<String>,
	pub challenge_level: ChallengeLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeLevel {
	Beginner,
	Intermediate,
	Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
	pub question: String,
	pub focus_area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroubleshootingTip {
	pub issue: String,
	pub solution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: CommunityKind,
	pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunityKind {
	Discord,
	Forum,
	GitHub,
	Slack,
}

impl ResourceKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Course => "course",
			Self::Tutorial => "tutorial",
			Self::Documentation => "documentation",
			Self::Book => "book",
			Self::Article => "article",
		}
	}
}

impl ChallengeLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Beginner => "Beginner",
			Self::Intermediate => "Intermediate",
			Self::Advanced => "Advanced",
		}
	}
}

impl Enumerated for ResourceKind {
	const ALLOWED: &'static [&'static str] =
		&["course", "tutorial", "documentation", "book", "article"];

	fn from_name(name: &str) -> Option<Self> {
		match name {
			"course" => Some(Self::Course),
			"tutorial" => Some(Self::Tutorial),
			"documentation" => Some(Self::Documentation),
			"book" => Some(Self::Book),
			"article" => Some(Self::Article),
			_ => None,
		}
	}
}

impl Enumerated for ChallengeLevel {
	const ALLOWED: &'static [&'static str] = &["Beginner", "Intermediate", "Advanced"];

	fn from_name(name: &str) -> Option<Self> {
		match name {
			"Beginner" => Some(Self::Beginner),
			"Intermediate" => Some(Self::Intermediate),
			"Advanced" => Some(Self::Advanced),
			_ => None,
		}
	}
}

impl Enumerated for CommunityKind {
	const ALLOWED: &'static [&'static str] = &["Discord", "Forum", "GitHub", "Slack"];

	fn from_name(name: &str) -> Option<Self> {
		match name {
			"Discord" => Some(Self::Discord),
			"Forum" => Some(Self::Forum),
			"GitHub" => Some(Self::GitHub),
			"Slack" => Some(Self::Slack),
			_ => None,
		}
	}
}

impl Schema for RoadmapPhases {
	fn validate(candidate: &Value) -> Result<Self, SchemaError> {
		let mut v = Validator::default();

		let roadmap = v.object(candidate, "").and_then(|root| {
			let phases = v.each_object(root, "phases", "", Phase::check)?;
			if phases.is_empty() {
				v.violation("phases", ViolationKind::Empty);
			}
			Some(Self { phases })
		});

		if let Some(roadmap) = &roadmap {
			let mut ids = HashSet::with_capacity(roadmap.phases.len());
			for (i, phase) in roadmap.phases.iter().enumerate() {
				if !ids.insert(phase.id.as_str()) {
					v.violation(
						join(&index("phases", i), "id"),
						ViolationKind::DuplicateId(phase.id.clone()),
					);
				}
			}
		}

		v.finish(roadmap)
	}
}

impl Phase {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let id = v.non_empty_string(obj, "id", path);
		let name = v.non_empty_string(obj, "name", path);
		let introduction = v.string(obj, "introduction", path);
		let duration = v.string(obj, "duration", path);
		let prerequisites = v.strings(obj, "prerequisites", path);
		let technologies = v.strings(obj, "technologies", path);
		let concepts = v.strings(obj, "concepts", path);
		let time_breakdown = v.nested(obj, "timeBreakdown", path, TimeBreakdown::check);
		let milestones = v.each_object(obj, "milestones", path, Milestone::check);
		let resources = v.each_object(obj, "resources", path, Resource::check);
		let project = v.nested(obj, "project", path, Project::check);
		let assessment = v.each_object(obj, "assessment", path, Assessment::check);
		let troubleshooting = v.each_object(obj, "troubleshooting", path, TroubleshootingTip::check);
		let community_resources = v.each_object(obj, "communityResources", path, Community::check);

		Some(Self {
			id: id?,
			name: name?,
			introduction: introduction?,
			duration: duration?,
			prerequisites: prerequisites?,
			technologies: technologies?,
			concepts: concepts?,
			time_breakdown: time_breakdown?,
			milestones: milestones?,
			resources: resources?,
			project: project?,
			assessment: assessment?,
			troubleshooting: troubleshooting?,
			community_resources: community_resources?,
		})
	}
}

/// Whole percentage between 0 and 100 followed by `%`.
fn is_percentage(s: &str) -> bool {
	s.strip_suffix('%')
		.filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
		.and_then(|digits| digits.parse::<u8>().ok())
		.is_some_and(|n| n <= 100)
}

impl TimeBreakdown {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let mut share = |key: &str| {
			let s = v.string(obj, key, path)?;
			if !is_percentage(&s) {
				v.violation(join(path, key), ViolationKind::BadFormat {
					expected: "a percentage such as \"40%\"",
				});
				return None
			}
			Some(s)
		};
		let concepts = share("concepts");
		let practice = share("practice");
		let project = share("project");
		Some(Self { concepts: concepts?, practice: practice?, project: project? })
	}
}

impl Milestone {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let title = v.string(obj, "title", path);
		let goal = v.string(obj, "goal", path);
		Some(Self { title: title?, goal: goal? })
	}
}

impl Resource {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let title = v.string(obj, "title", path);
		let url = v.url(obj, "url", path);
		let kind = v.enumerated(obj, "type", path);
		let duration = v.string(obj, "duration", path);
		let description = v.string(obj, "description", path);
		Some(Self {
			title: title?,
			url: url?,
			kind: kind?,
			duration: duration?,
			description: description?,
		})
	}
}

impl Project {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let title = v.string(obj, "title", path);
		let overview = v.string(obj, "overview", path);
		let requirements = v.strings(obj, "requirements", path);
		let acceptance_criteria = v.strings(obj, "acceptanceCriteria", path);
		let learning_objectives = v.strings(obj, "learningObjectives", path);
		let challenge_level = v.enumerated(obj, "challengeLevel", path);
		Some(Self {
			title: title?,
			overview: overview?,
			requirements: requirements?,
			acceptance_criteria: acceptance_criteria?,
			learning_objectives: learning_objectives?,
			challenge_level: challenge_level?,
		})
	}
}

impl Assessment {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let question = v.string(obj, "question", path);
		let focus_area = v.string(obj, "focusArea", path);
		Some(Self { question: question?, focus_area: focus_area? })
	}
}

impl TroubleshootingTip {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let issue = v.string(obj, "issue", path);
		let solution = v.string(obj, "solution", path);
		Some(Self { issue: issue?, solution: solution? })
	}
}

impl Community {
	fn check(v: &mut Validator, obj: &Map<String, Value>, path: &str) -> Option<Self> {
		let name = v.string(obj, "name", path);
		let kind = v.enumerated(obj, "type", path);
		let url = v.url(obj, "url", path);
		Some(Self { name: name?, kind: kind?, url: url? })
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use serde_json::json;

	use super::*;

	pub(crate) fn phase(id: &str) -> Value {
		json!({
			"id": id,
			"name": "Foundations",
			"introduction": "Get comfortable with the basics",
			"duration": "4 weeks",
			"prerequisites": ["Basic computer literacy"],
			"technologies": ["rustup", "cargo"],
			"concepts": ["ownership", "borrowing", "lifetimes"],
			"timeBreakdown": { "concepts": "40%", "practice": "30%", "project": "30%" },
			"milestones": [{ "title": "Hello world", "goal": "Compile and run a binary" }],
			"resources": [{
				"title": "The Rust Book",
				"url": "https://doc.rust-lang.org/book/",
				"type": "book",
				"duration": "20 hours",
				"description": "The official introduction"
			}],
			"project": {
				"title": "CLI todo list",
				"overview": "A small command line app",
				"requirements": ["add items", "list items"],
				"acceptanceCriteria": ["items persist between runs"],
				"learningObjectives": ["structs", "enums"],
				"challengeLevel": "Beginner"
			},
			"assessment": [{ "question": "What is a borrow?", "focusArea": "ownership" }],
			"troubleshooting": [{ "issue": "borrow checker errors", "solution": "clone less" }],
			"communityResources": [{
				"name": "Rust Users Forum",
				"type": "Forum",
				"url": "https://users.rust-lang.org"
			}]
		})
	}

	#[test]
	fn valid_phases() {
		let candidate = json!({ "phases": [phase("phase-1"), phase("phase-2")] });

		let roadmap = RoadmapPhases::validate(&candidate).unwrap();
		assert_eq!(roadmap.phases.len(), 2);
		assert_eq!(roadmap.phases[1].id, "phase-2");
		assert_eq!(roadmap.phases[0].resources[0].kind, ResourceKind::Book);
		assert_eq!(roadmap.phases[0].project.challenge_level, ChallengeLevel::Beginner);
		assert_eq!(roadmap.phases[0].community_resources[0].kind, CommunityKind::Forum);
	}

	#[test]
	fn round_trips_field_names() {
		let candidate = json!({ "phases": [phase("phase-1")] });
		let roadmap = RoadmapPhases::validate(&candidate).unwrap();

		assert_eq!(serde_json::to_value(&roadmap).unwrap(), candidate);
	}

	#[test]
	fn rejects_empty_phases() {
		let err = RoadmapPhases::validate(&json!({ "phases": [] })).unwrap_err();
		assert_eq!(err.violations.len(), 1);
		assert_eq!(err.violations[0].kind, ViolationKind::Empty);
	}

	#[test]
	fn rejects_nested_violations() {
		let mut bad = phase("phase-1");
		bad["resources"][0]["type"] = json!("video");
		bad["resources"][0]["url"] = json!("www.example.com");
		bad["project"]["challengeLevel"] = json!("beginner");
		bad["timeBreakdown"]["practice"] = json!(30);
		bad["timeBreakdown"]["project"] = json!("lots");
		bad["communityResources"][0]["type"] = json!("Reddit");
		bad["technologies"] = json!("rustup");

		let err = RoadmapPhases::validate(&json!({ "phases": [bad] })).unwrap_err();
		for path in [
			"phases[0].resources[0].type",
			"phases[0].resources[0].url",
			"phases[0].project.challengeLevel",
			"phases[0].timeBreakdown.practice",
			"phases[0].timeBreakdown.project",
			"phases[0].communityResources[0].type",
			"phases[0].technologies",
		] {
			assert!(err.mentions(path), "missing violation for {path}: {err}");
		}
		assert_eq!(err.violations.len(), 7);
	}

	#[test]
	fn rejects_missing_project() {
		let mut bad = phase("phase-1");
		bad.as_object_mut().unwrap().remove("project");

		let err = RoadmapPhases::validate(&json!({ "phases": [bad] })).unwrap_err();
		assert_eq!(err.violations.len(), 1);
		assert_eq!(err.violations[0].path, "phases[0].project");
		assert_eq!(err.violations[0].kind, ViolationKind::Missing);
	}

	#[test]
	fn rejects_duplicate_phase_ids() {
		let candidate = json!({ "phases": [phase("p"), phase("p")] });

		let err = RoadmapPhases::validate(&candidate).unwrap_err();
		assert!(err.mentions("phases[1].id"));
	}

	#[test]
	fn percentages() {
		assert!(is_percentage("0%"));
		assert!(is_percentage("40%"));
		assert!(is_percentage("100%"));
		assert!(!is_percentage("101%"));
		assert!(!is_percentage("40"));
		assert!(!is_percentage("%"));
		assert!(!is_percentage("-5%"));
		assert!(!is_percentage("4 0%"));
	}
}
