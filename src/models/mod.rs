//! Data models for taskdeck entities.
//!
//! This module defines the core data structures:
//! - `TaskRecord` - A unit of work as stored in the task file
//! - `Priority`, `TaskStatus` - Closed enumerations every stored task must satisfy
//! - `Category` - The fixed set of areas a task can be filed under
//!
//! The wire spelling of the enumerations (`"alta"`, `"en progreso"`, ...) is the
//! format existing task files and clients already use.

pub mod validation;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "baja")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "bloqueante")]
    Blocking,
}

impl Priority {
    /// Every priority, in ascending order.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Blocking,
    ];

    /// The wire spelling of this priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "baja",
            Priority::Medium => "media",
            Priority::High => "alta",
            Priority::Blocking => "bloqueante",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown priority: {}", s))
    }
}

/// Task status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en progreso")]
    InProgress,
    #[serde(rename = "en revisión")]
    InReview,
    #[serde(rename = "completada")]
    Completed,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Completed,
    ];

    /// The wire spelling of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pendiente",
            TaskStatus::InProgress => "en progreso",
            TaskStatus::InReview => "en revisión",
            TaskStatus::Completed => "completada",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// Area of work a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Frontend,
    Backend,
    Testing,
    Infra,
    DevOps,
}

impl Category {
    /// Every category. Order matters for fuzzy matching: the first hit wins.
    pub const ALL: [Category; 5] = [
        Category::Frontend,
        Category::Backend,
        Category::Testing,
        Category::Infra,
        Category::DevOps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::Testing => "Testing",
            Category::Infra => "Infra",
            Category::DevOps => "DevOps",
        }
    }

    /// Resolve free-form text to a category.
    ///
    /// An exact match wins. Otherwise the first category whose name appears
    /// anywhere in the text (ignoring case) is returned.
    pub fn match_text(text: &str) -> Option<Category> {
        let text = text.trim();
        if let Ok(category) = text.parse::<Category>() {
            return Some(category);
        }
        let lowered = text.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| lowered.contains(&c.as_str().to_lowercase()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A unit of work tracked by taskdeck.
///
/// Optional fields are always written out (as `null` when unset) so every
/// record in the task file has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique identifier (UUID v4 unless supplied by the client)
    pub id: String,

    /// Task title
    pub title: String,

    /// Detailed description
    pub description: String,

    pub priority: Priority,

    /// Estimated effort, never negative
    pub effort_hours: f64,

    pub status: TaskStatus,

    /// Owner of the task
    pub assigned_to: String,

    #[serde(default)]
    pub category: Option<Category>,

    /// Free-text risk analysis, usually produced by an audit
    #[serde(default)]
    pub risk_analysis: Option<String>,

    /// Free-text mitigation plan for `risk_analysis`
    #[serde(default)]
    pub risk_mitigation: Option<String>,
}

impl TaskRecord {
    /// Build a record from validated fields under the given id.
    pub fn from_fields(id: String, fields: validation::TaskFields) -> Self {
        let validation::TaskFields {
            title,
            description,
            priority,
            effort_hours,
            status,
            assigned_to,
            category,
            risk_analysis,
            risk_mitigation,
        } = fields;

        Self {
            id,
            title,
            description,
            priority,
            effort_hours,
            status,
            assigned_to,
            category: category.flatten(),
            risk_analysis: risk_analysis.flatten(),
            risk_mitigation: risk_mitigation.flatten(),
        }
    }

    /// Replace every required field and any optional field the payload carried.
    ///
    /// The id is never touched.
    pub fn apply(&mut self, fields: validation::TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.priority = fields.priority;
        self.effort_hours = fields.effort_hours;
        self.status = fields.status;
        self.assigned_to = fields.assigned_to;

        if let Some(category) = fields.category {
            self.category = category;
        }
        if let Some(risk_analysis) = fields.risk_analysis {
            self.risk_analysis = risk_analysis;
        }
        if let Some(risk_mitigation) = fields.risk_mitigation {
            self.risk_mitigation = risk_mitigation;
        }
    }
}

/// One entry of the task file.
///
/// Entries that do not fit [`TaskRecord`] (a free-form category or a
/// non-text title written by an older client) are kept as raw JSON. They are
/// listed and saved back untouched, and can still be fetched, replaced, or
/// deleted by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTask {
    Task(TaskRecord),
    Legacy(Value),
}

impl StoredTask {
    /// The entry's id, if it has a string one.
    pub fn id(&self) -> Option<&str> {
        match self {
            StoredTask::Task(task) => Some(&task.id),
            StoredTask::Legacy(value) => value.get("id").and_then(Value::as_str),
        }
    }

    /// Replace this entry with validated fields and return the result.
    ///
    /// A legacy entry becomes a full [`TaskRecord`]. Optional fields the
    /// payload does not name keep their old value when it is well-formed.
    pub fn apply(&mut self, mut fields: validation::TaskFields) -> TaskRecord {
        let task = match self {
            StoredTask::Task(task) => {
                task.apply(fields);
                task.clone()
            }
            StoredTask::Legacy(value) => {
                let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
                fields.category = fields
                    .category
                    .or_else(|| Some(text("category").and_then(|c| c.parse().ok())));
                fields.risk_analysis = fields
                    .risk_analysis
                    .or_else(|| Some(text("risk_analysis")));
                fields.risk_mitigation = fields
                    .risk_mitigation
                    .or_else(|| Some(text("risk_mitigation")));
                TaskRecord::from_fields(text("id").unwrap_or_default(), fields)
            }
        };
        *self = StoredTask::Task(task.clone());
        task
    }
}

impl From<TaskRecord> for StoredTask {
    fn from(task: TaskRecord) -> Self {
        StoredTask::Task(task)
    }
}
