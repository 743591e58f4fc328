//! Plain text rendering of a phased roadmap, for printing or saving next to the JSON.

use chrono::NaiveDate;

use crate::{schema::Phase, PhasesResponse};

const RULE_WIDTH: usize = 70;

/// Renders `roadmap` as plain text, stamped with `generated_on`.
///
/// A header with topic, difficulty, timeframe and date is followed by one section per phase, in
/// order, each closed by a dashed rule.
pub fn render_phases(roadmap: &PhasesResponse, generated_on: NaiveDate) -> String {
	let mut text = format!("LEARNING ROADMAP: {}\n", roadmap.topic);
	text.push_str(&format!("Difficulty: {}\n", roadmap.difficulty.as_str()));
	text.push_str(&format!("Timeframe: {}\n", roadmap.timeframe));
	text.push_str(&format!("Generated: {}\n\n", generated_on.format("%Y-%m-%d")));
	text.push_str(&"=".repeat(RULE_WIDTH));
	text.push_str("\n\n");

	for (i, phase) in roadmap.phases.iter().enumerate() {
		render_phase(&mut text, i + 1, phase);
	}

	text
}

fn render_phase(text: &mut String, number: usize, phase: &Phase) {
	text.push_str(&format!("PHASE {}: {}\n", number, phase.name));
	text.push_str(&format!("Duration: {}\n", phase.duration));
	text.push_str(&format!("\n{}\n\n", phase.introduction));

	bullets(text, "Prerequisites", &phase.prerequisites);
	bullets(text, "\nTechnologies", &phase.technologies);
	bullets(text, "\nKey Concepts", &phase.concepts);

	text.push_str("\nLearning Milestones:\n");
	for milestone in &phase.milestones {
		text.push_str(&format!("  • {}: {}\n", milestone.title, milestone.goal));
	}

	text.push_str("\nResources:\n");
	for resource in &phase.resources {
		text.push_str(&format!(
			"  • {} ({}) - {}\n",
			resource.title,
			resource.kind.as_str(),
			resource.duration
		));
		text.push_str(&format!("    URL: {}\n", resource.url));
		text.push_str(&format!("    {}\n", resource.description));
	}

	let project = &phase.project;
	text.push_str(&format!("\nPractical Project: {}\n", project.title));
	text.push_str(&format!("  Overview: {}\n", project.overview));
	text.push_str(&format!("  Challenge Level: {}\n", project.challenge_level.as_str()));
	text.push_str("  Requirements:\n");
	for requirement in &project.requirements {
		text.push_str(&format!("    • {}\n", requirement));
	}

	text.push_str("\nAssessment Topics:\n");
	for item in &phase.assessment {
		text.push_str(&format!("  • {}\n", item.question));
	}

	text.push_str("\nTroubleshooting:\n");
	for tip in &phase.troubleshooting {
		text.push_str(&format!("  • Issue: {}\n", tip.issue));
		text.push_str(&format!("    Solution: {}\n", tip.solution));
	}

	text.push('\n');
	text.push_str(&"-".repeat(RULE_WIDTH));
	text.push_str("\n\n");
}

fn bullets(text: &mut String, heading: &str, items: &[String]) {
	text.push_str(&format!("{}:\n", heading));
	for item in items {
		text.push_str(&format!("  • {}\n", item));
	}
}
