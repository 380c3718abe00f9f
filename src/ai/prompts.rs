//! Prompt templates for task augmentation.
//!
//! Each builder renders a fixed template from a partial task (the JSON object
//! a client sent). Fields that are missing or `null` render as
//! [`UNSPECIFIED`], so the same input always yields the same prompt.

use serde_json::{Map, Value};

use crate::models::Category;

/// System role sent with every augmentation request.
pub const SYSTEM_ROLE: &str =
    "You are an expert assistant in project management and software development.";

/// Placeholder for task fields the request did not provide.
pub const UNSPECIFIED: &str = "unspecified";

/// Render a task field for inclusion in a prompt.
pub fn field(task: &Map<String, Value>, name: &str) -> String {
    match task.get(name) {
        None | Some(Value::Null) => UNSPECIFIED.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Prompt asking for a short plain-text description.
pub fn describe(task: &Map<String, Value>) -> String {
    format!(
        r#"Write a clear and concise description for the following task:

Title: {title}
Priority: {priority}
Status: {status}
Assigned to: {assigned_to}

IMPORTANT:
- Return ONLY plain text, no markdown
- Do not use asterisks, dashes or lists
- At most 2-3 sentences
- Do not include titles or headings
- Answer directly with the description"#,
        title = field(task, "title"),
        priority = field(task, "priority"),
        status = field(task, "status"),
        assigned_to = field(task, "assigned_to"),
    )
}

/// Prompt asking for exactly one category name.
pub fn categorize(task: &Map<String, Value>) -> String {
    let categories: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("- {}", c.as_str()))
        .collect();
    format!(
        r#"Classify the following task into exactly ONE category.

Title: {title}
Description: {description}

Valid categories:
{categories}

IMPORTANT:
- Answer ONLY with the category name
- Do not add explanations or extra text
- Use exactly one of: Frontend, Backend, Testing, Infra or DevOps"#,
        title = field(task, "title"),
        description = field(task, "description"),
        categories = categories.join("\n"),
    )
}

/// Prompt asking for an effort estimate in hours.
pub fn estimate(task: &Map<String, Value>) -> String {
    format!(
        r#"Estimate the effort in hours needed to complete the following task:

Title: {title}
Description: {description}
Category: {category}

IMPORTANT:
- Answer ONLY with a number
- It may be an integer or a decimal (for example: 8 or 12.5)
- Do not add words such as "hours" or "approximately"
- Answer with the numeric value only"#,
        title = field(task, "title"),
        description = field(task, "description"),
        category = field(task, "category"),
    )
}

/// First audit prompt: identify the risks of a task.
pub fn risk_analysis(task: &Map<String, Value>) -> String {
    format!(
        r#"Analyze the potential risks of the following task:

Title: {title}
Description: {description}
Category: {category}
Priority: {priority}
Estimated effort: {effort_hours} hours

Identify the main technical, resourcing and schedule risks.

IMPORTANT:
- Answer in plain text, no markdown
- Do not use bulleted lists with dashes or asterisks
- At most 3-4 sentences
- Be specific and concise"#,
        title = field(task, "title"),
        description = field(task, "description"),
        category = field(task, "category"),
        priority = field(task, "priority"),
        effort_hours = field(task, "effort_hours"),
    )
}

/// Second audit prompt: a mitigation plan for the risks found by the first.
///
/// `risk_analysis` is embedded verbatim.
pub fn risk_mitigation(task: &Map<String, Value>, risk_analysis: &str) -> String {
    format!(
        r#"Based on the following identified risks, produce a mitigation plan:

TASK:
Title: {title}
Description: {description}

IDENTIFIED RISKS:
{risk_analysis}

Provide concrete actions to mitigate these risks.

IMPORTANT:
- Answer in plain text, no markdown
- Do not use bulleted lists with dashes or asterisks
- At most 3-4 sentences
- Give specific, practical actions"#,
        title = field(task, "title"),
        description = field(task, "description"),
    )
}
