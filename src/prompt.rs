//! Instructions sent to the LLM.
//!
//! Both prompts embed a literal example of the JSON shape the validator expects and are pure
//! functions of their inputs.

use crate::request::{Difficulty, Roadmap};

/// Prompt for a node/edge skill graph.
///
/// Difficulty and timeframe are only mentioned when the caller supplied them.
pub fn graph_prompt(roadmap: &Roadmap) -> String {
	let mut constraints = String::new();
	if let Some(difficulty) = roadmap.difficulty {
		constraints.push_str(&format!("Target learner level: {}\n", difficulty.as_str()));
	}
	if let Some(timeframe) = &roadmap.timeframe {
		constraints.push_str(&format!("Available timeframe: {}\n", timeframe));
	}

	format!(
		r#"You are an expert career counselor and learning path designer.
Generate a comprehensive learning roadmap for: {topic}
{constraints}
Output ONLY valid JSON (no markdown, no code blocks):
{{
  "topic": {topic_json},
  "nodes": [
    {{
      "id": "node_1",
      "title": "Skill Name",
      "description": "What you'll learn",
      "level": "beginner|intermediate|advanced|expert",
      "estimatedHours": 40
    }}
  ],
  "edges": [
    {{"from": "node_1", "to": "node_2"}}
  ]
}}

Guidelines:
- Create 5-8 nodes for a realistic learning path
- Order nodes logically from beginner to advanced
- Provide realistic time estimates (40-200 hours per node) as plain numbers
- Use node IDs made of letters, digits and underscores (e.g., node_1, node_2)
- Ensure all edges reference valid nodes
- Cover both theoretical knowledge and practical skills"#,
		topic = roadmap.topic,
		topic_json = json_string(&roadmap.topic),
		constraints = constraints,
	)
}

/// Prompt for a multi-phase roadmap.
pub fn phases_prompt(topic: &str, difficulty: Difficulty, timeframe: &str) -> String {
	let difficulty = difficulty.as_str();
	format!(
		r#"You are an expert learning architect and curriculum designer. Create a detailed, comprehensive learning roadmap for the following:

Topic: {topic}
Difficulty Level: {difficulty}
Timeframe: {timeframe}

Generate a structured learning roadmap with 4-5 learning phases. For each phase, provide:

1. Phase name and a brief introduction explaining the phase's purpose
2. Estimated duration
3. Prerequisites - skills/knowledge needed before starting
4. Key technologies/tools to master
5. 3-4 key learning concepts
6. Time breakdown - how to allocate time as whole percentages (e.g., 40% concepts, 30% practice, 30% project)
7. Learning milestones - 3-4 specific checkpoints with measurable goals
8. Specific learning resources with full URLs (courses, tutorials, documentation, books, articles)
9. A detailed project specification with requirements, acceptance criteria, learning objectives and a challenge level
10. Assessment ideas - 2-3 self-test questions or topics to review
11. Common troubleshooting tips and solutions for this phase
12. Relevant community resources - Discord servers, forums, GitHub discussions, Slack workspaces

Format your response as a valid JSON object with this exact structure:
{{
  "phases": [
    {{
      "id": "phase-1",
      "name": "Phase name",
      "introduction": "Brief explanation of phase purpose and goals",
      "duration": "duration string",
      "prerequisites": ["prerequisite1", "prerequisite2"],
      "technologies": ["tech1", "tech2", "tech3"],
      "concepts": ["concept1", "concept2", "concept3", "concept4"],
      "timeBreakdown": {{
        "concepts": "40%",
        "practice": "30%",
        "project": "30%"
      }},
      "milestones": [
        {{
          "title": "Milestone title",
          "goal": "Specific, measurable learning goal"
        }}
      ],
      "resources": [
        {{
          "title": "Resource title",
          "url": "https://example.com/resource",
          "type": "course|tutorial|documentation|book|article",
          "duration": "estimated time",
          "description": "Brief description of what you'll learn"
        }}
      ],
      "project": {{
        "title": "Project title",
        "overview": "What you'll build and why",
        "requirements": ["requirement1", "requirement2", "requirement3"],
        "acceptanceCriteria": ["criteria1", "criteria2"],
        "learningObjectives": ["objective1", "objective2"],
        "challengeLevel": "Beginner|Intermediate|Advanced"
      }},
      "assessment": [
        {{
          "question": "Self-test question or review topic",
          "focusArea": "What concept this tests"
        }}
      ],
      "troubleshooting": [
        {{
          "issue": "Common issue or challenge",
          "solution": "How to overcome it"
        }}
      ],
      "communityResources": [
        {{
          "name": "Community name",
          "type": "Discord|Forum|GitHub|Slack",
          "url": "https://example.com/community"
        }}
      ]
    }}
  ]
}}

Ensure the roadmap is:
- Progressive and logical, building on previous phases
- Appropriate for the {difficulty} level
- Achievable within {timeframe}
- Uses real, working URLs rather than placeholders
- Practical with detailed, implementable projects
- Specific and actionable at every step

Only return valid JSON, no additional text."#
	)
}

/// `s` as a quoted JSON string literal.
fn json_string(s: &str) -> String {
	serde_json::Value::String(s.to_string()).to_string()
}
