//! Task operations for taskdeck.
//!
//! [`TaskService`] implements list/get/create/update/delete on top of the
//! validator and the JSON file store. Every call reloads the whole collection
//! from disk and mutating calls save the whole collection back, so the file
//! is the only state that survives between calls. Entries that are not valid
//! tasks are listed and saved back as they are.

use serde_json::{Map, Value};

use crate::models::{StoredTask, TaskRecord};
use crate::models::validation::parse_task_fields;
use crate::storage::JsonFileStore;
use crate::{Error, Result};

/// CRUD operations over the task file.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: JsonFileStore,
}

impl TaskService {
    pub fn new(store: JsonFileStore) -> Self {
        Self { store }
    }

    /// All tasks in file order.
    pub fn list(&self) -> Vec<StoredTask> {
        self.store.load()
    }

    /// The first task with the given id.
    pub fn get(&self, id: &str) -> Result<StoredTask> {
        self.store
            .load()
            .into_iter()
            .find(|t| t.id() == Some(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Validate `payload` and append a new task built from it.
    ///
    /// A fresh UUID is minted unless the payload carries a non-empty string
    /// `id`, which must not already be in use.
    pub fn create(&self, payload: &Map<String, Value>) -> Result<TaskRecord> {
        let fields = parse_task_fields(payload).map_err(Error::Validation)?;
        let mut tasks = self.store.load();

        let id = match payload.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                if tasks.iter().any(|t| t.id() == Some(id)) {
                    return Err(Error::Validation(vec![format!(
                        "Ya existe una tarea con el id '{}'.",
                        id
                    )]));
                }
                id.to_string()
            }
            _ => generate_id(),
        };

        let task = TaskRecord::from_fields(id, fields);
        tasks.push(task.clone().into());
        self.store.save(&tasks);

        tracing::info!(id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Replace the task `id` with the contents of `payload`.
    ///
    /// The id is looked up before the payload is validated, so an unknown id
    /// is reported even when the payload is also invalid. Required fields are
    /// always overwritten; optional fields only when the payload names them.
    /// An entry that was not a valid task becomes one.
    pub fn update(&self, id: &str, payload: &Map<String, Value>) -> Result<TaskRecord> {
        let mut tasks = self.store.load();
        let index = tasks
            .iter()
            .position(|t| t.id() == Some(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let fields = parse_task_fields(payload).map_err(Error::Validation)?;
        let task = tasks[index].apply(fields);
        self.store.save(&tasks);

        tracing::info!(id = %task.id, "task updated");
        Ok(task)
    }

    /// Remove the task `id`.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut tasks = self.store.load();
        let index = tasks
            .iter()
            .position(|t| t.id() == Some(id))
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        tasks.remove(index);
        self.store.save(&tasks);

        tracing::info!(id = %id, "task deleted");
        Ok(())
    }
}

/// Generate a new task id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority, TaskStatus};
    use crate::test_utils::TestEnv;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn valid_payload() -> Map<String, Value> {
        payload(json!({
            "title": "T",
            "description": "D",
            "priority": "alta",
            "effort_hours": 2.5,
            "status": "pendiente",
            "assigned_to": "X"
        }))
    }

    #[test]
    fn test_create_mints_unique_ids() {
        let env = TestEnv::new();
        let service = env.service();

        let a = service.create(&valid_payload()).unwrap();
        let b = service.create(&valid_payload()).unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(service.list().len(), 2);
    }

    #[test]
    fn test_create_persists_fields() {
        let env = TestEnv::new();
        let service = env.service();

        let task = service.create(&valid_payload()).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.category, None);

        let reloaded = env.store().load();
        assert_eq!(reloaded, vec![StoredTask::Task(task)]);
    }

    #[test]
    fn test_create_keeps_client_id() {
        let env = TestEnv::new();
        let service = env.service();
        let mut p = valid_payload();
        p.insert("id".to_string(), json!("custom-1"));

        let task = service.create(&p).unwrap();
        assert_eq!(task.id, "custom-1");
    }

    #[test]
    fn test_create_rejects_duplicate_client_id() {
        let env = TestEnv::new();
        let service = env.service();
        let mut p = valid_payload();
        p.insert("id".to_string(), json!("custom-1"));
        service.create(&p).unwrap();

        match service.create(&p) {
            Err(Error::Validation(errors)) => assert!(errors[0].contains("custom-1")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn test_create_invalid_payload_writes_nothing() {
        let env = TestEnv::new();
        let service = env.service();
        let mut p = valid_payload();
        p.insert("effort_hours".to_string(), json!(-1));

        assert!(matches!(service.create(&p), Err(Error::Validation(_))));
        assert!(!env.tasks_file().exists());
    }

    #[test]
    fn test_get_unknown_id() {
        let env = TestEnv::new();
        assert!(matches!(env.service().get("nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_unknown_id_checked_before_validation() {
        let env = TestEnv::new();
        let result = env.service().update("nope", &Map::new());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_replaces_required_and_named_optional_fields() {
        let env = TestEnv::new();
        let service = env.service();
        let mut p = valid_payload();
        p.insert("risk_analysis".to_string(), json!("Scope creep"));
        let created = service.create(&p).unwrap();

        let replacement = payload(json!({
            "title": "T2",
            "description": "D2",
            "priority": "bloqueante",
            "effort_hours": 8,
            "status": "en revisión",
            "assigned_to": "Y",
            "category": "Backend"
        }));
        let updated = service.update(&created.id, &replacement).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.priority, Priority::Blocking);
        assert_eq!(updated.status, TaskStatus::InReview);
        assert_eq!(updated.effort_hours, 8.0);
        assert_eq!(updated.category, Some(Category::Backend));
        assert_eq!(updated.risk_analysis.as_deref(), Some("Scope creep"));
        assert_eq!(service.get(&created.id).unwrap(), StoredTask::Task(updated));
    }

    #[test]
    fn test_update_null_clears_optional_field() {
        let env = TestEnv::new();
        let service = env.service();
        let mut p = valid_payload();
        p.insert("category".to_string(), json!("Testing"));
        let created = service.create(&p).unwrap();

        let mut replacement = valid_payload();
        replacement.insert("category".to_string(), Value::Null);
        let updated = service.update(&created.id, &replacement).unwrap();
        assert_eq!(updated.category, None);
    }

    #[test]
    fn test_update_ignores_payload_id() {
        let env = TestEnv::new();
        let service = env.service();
        let created = service.create(&valid_payload()).unwrap();

        let mut replacement = valid_payload();
        replacement.insert("id".to_string(), json!("hijacked"));
        let updated = service.update(&created.id, &replacement).unwrap();
        assert_eq!(updated.id, created.id);
    }

    #[test]
    fn test_failed_update_leaves_record_unchanged() {
        let env = TestEnv::new();
        let service = env.service();
        let created = service.create(&valid_payload()).unwrap();

        let mut bad = valid_payload();
        bad.insert("status".to_string(), json!("done"));
        bad.insert("title".to_string(), json!("changed"));
        assert!(matches!(
            service.update(&created.id, &bad),
            Err(Error::Validation(_))
        ));

        assert_eq!(service.get(&created.id).unwrap(), StoredTask::Task(created));
    }

    #[test]
    fn test_delete_then_get() {
        let env = TestEnv::new();
        let service = env.service();
        let keep = service.create(&valid_payload()).unwrap();
        let gone = service.create(&valid_payload()).unwrap();

        service.delete(&gone.id).unwrap();

        assert!(matches!(service.get(&gone.id), Err(Error::NotFound(_))));
        assert!(matches!(service.delete(&gone.id), Err(Error::NotFound(_))));
        assert_eq!(service.list(), vec![StoredTask::Task(keep)]);
    }

    #[test]
    fn test_operations_read_through_to_file() {
        let env = TestEnv::new();
        let first = env.service();
        let second = env.service();

        let task = first.create(&valid_payload()).unwrap();
        assert_eq!(second.get(&task.id).unwrap(), StoredTask::Task(task));
    }

    fn write_legacy_entry(env: &TestEnv) {
        let legacy = json!([{
            "id": "old-1",
            "title": "Migrate schema",
            "description": "Move tables",
            "priority": "alta",
            "effort_hours": 6,
            "status": "pendiente",
            "assigned_to": "luis",
            "category": "Database"
        }]);
        std::fs::write(env.tasks_file(), legacy.to_string()).unwrap();
    }

    #[test]
    fn test_create_keeps_legacy_entries() {
        let env = TestEnv::new();
        write_legacy_entry(&env);
        let service = env.service();

        let created = service.create(&valid_payload()).unwrap();

        let tasks = service.list();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id(), Some("old-1"));
        assert_eq!(tasks[1], StoredTask::Task(created));
    }

    #[test]
    fn test_legacy_entry_get_update_delete() {
        let env = TestEnv::new();
        write_legacy_entry(&env);
        let service = env.service();

        assert!(matches!(service.get("old-1").unwrap(), StoredTask::Legacy(_)));

        let updated = service.update("old-1", &valid_payload()).unwrap();
        assert_eq!(updated.id, "old-1");
        assert_eq!(service.get("old-1").unwrap(), StoredTask::Task(updated));

        service.delete("old-1").unwrap();
        assert!(service.list().is_empty());
    }
}
