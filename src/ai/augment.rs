//! Augmentation flows: fill task fields from a language model.
//!
//! Every flow takes a partial task, checks the inputs it needs, renders a
//! prompt and calls the model once, except [`TaskAugmenter::audit`], which
//! chains two calls. None of them touch the task file; callers decide whether
//! to persist the result.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};

use super::prompts::{self, SYSTEM_ROLE};
use super::{AugmentError, CompletionModel};
use crate::models::Category;
use crate::models::validation::is_absent;

/// Inputs required by [`TaskAugmenter::generate_description`].
pub const DESCRIBE_FIELDS: [&str; 4] = ["title", "priority", "status", "assigned_to"];

/// Inputs required by [`TaskAugmenter::categorize`].
pub const CATEGORIZE_FIELDS: [&str; 1] = ["title"];

/// Inputs required by [`TaskAugmenter::estimate_effort`].
pub const ESTIMATE_FIELDS: [&str; 2] = ["title", "description"];

/// Inputs required by [`TaskAugmenter::audit`].
pub const AUDIT_FIELDS: [&str; 2] = ["title", "description"];

/// First number in a model answer: digits with an optional `.` or `,` fraction.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:[.,]\d*)?").expect("Invalid regex"));

/// Result of a risk audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAudit {
    pub risk_analysis: String,
    pub risk_mitigation: String,
}

/// Runs augmentation flows against an injected model.
#[derive(Clone)]
pub struct TaskAugmenter {
    model: Arc<dyn CompletionModel>,
}

impl TaskAugmenter {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Generate a plain-text description from title, priority, status and owner.
    pub fn generate_description(&self, task: &Map<String, Value>) -> Result<String, AugmentError> {
        require(task, &DESCRIBE_FIELDS)?;
        Ok(self.ask(&prompts::describe(task))?)
    }

    /// Classify a task into one of the fixed categories.
    pub fn categorize(&self, task: &Map<String, Value>) -> Result<Category, AugmentError> {
        require(task, &CATEGORIZE_FIELDS)?;
        let raw = self.ask(&prompts::categorize(task))?;
        Category::match_text(&raw).ok_or(AugmentError::InvalidCategory(raw))
    }

    /// Estimate the effort of a task in hours.
    pub fn estimate_effort(&self, task: &Map<String, Value>) -> Result<f64, AugmentError> {
        require(task, &ESTIMATE_FIELDS)?;
        let raw = self.ask(&prompts::estimate(task))?;
        parse_effort(&raw)
    }

    /// Analyze the risks of a task, then ask for a plan to mitigate them.
    ///
    /// The second prompt embeds the text of the first answer, so the calls
    /// run in sequence. A failure in either call fails the whole audit.
    pub fn audit(&self, task: &Map<String, Value>) -> Result<RiskAudit, AugmentError> {
        require(task, &AUDIT_FIELDS)?;
        let risk_analysis = self.ask(&prompts::risk_analysis(task))?;
        let risk_mitigation = self.ask(&prompts::risk_mitigation(task, &risk_analysis))?;
        Ok(RiskAudit {
            risk_analysis,
            risk_mitigation,
        })
    }

    fn ask(&self, prompt: &str) -> Result<String, super::ModelError> {
        self.model.complete(SYSTEM_ROLE, prompt).inspect_err(|e| {
            tracing::error!(error = %e, "model call failed");
        })
    }
}

/// Check that every field in `fields` is present and non-null.
pub fn require(task: &Map<String, Value>, fields: &[&'static str]) -> Result<(), AugmentError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .copied()
        .filter(|f| is_absent(task, f))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AugmentError::MissingFields(missing))
    }
}

/// Extract an effort estimate from a model answer.
///
/// The first numeric token wins; a `,` decimal separator is read as `.`.
pub fn parse_effort(raw: &str) -> Result<f64, AugmentError> {
    let token = NUMBER_RE
        .find(raw)
        .ok_or_else(|| AugmentError::UnparseableEffort(raw.to_string()))?;
    let effort: f64 = token
        .as_str()
        .replace(',', ".")
        .parse()
        .map_err(|_| AugmentError::UnparseableEffort(raw.to_string()))?;
    if effort < 0.0 {
        return Err(AugmentError::NegativeEffort(effort));
    }
    Ok(effort)
}
