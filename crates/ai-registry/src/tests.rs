//! Unit tests for ai-registry.

use std::io::Cursor;

use ai_core::AgentId;
use ai_task::{Task, TaskContext, TaskMeta, TaskResult};
use serde::Deserialize;
use serde_json::json;

use crate::{RegistryError, TaskInit, TaskRegistry, TaskSpec, load_tasks_reader, parse_task_specs};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct NapConfig {
    #[serde(default = "default_length")]
    length_secs: f32,
}

fn default_length() -> f32 {
    3.0
}

/// Minimal configurable task: runs for `length` seconds.
struct Nap {
    meta:   TaskMeta,
    length: f32,
    slept:  f32,
}

impl Task for Nap {
    fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    fn should_execute(&mut self, _ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        Ok(true)
    }

    fn continue_execute(&mut self, dt: f32, _ctx: &mut TaskContext<'_>) -> TaskResult<bool> {
        self.slept += dt;
        Ok(self.slept < self.length)
    }
}

fn nap_factory(init: TaskInit<'_>) -> Result<Box<dyn Task>, serde_json::Error> {
    let cfg: NapConfig = init.bind()?;
    Ok(Box::new(Nap { meta: init.meta, length: cfg.length_secs, slept: 0.0 }))
}

fn registry() -> TaskRegistry {
    let mut r = TaskRegistry::new();
    r.register("nap", nap_factory);
    r
}

/// Downcast-free peek at a built `Nap` through its metadata.
fn code_of(task: &dyn Task) -> &str {
    &task.meta().code
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;

    #[test]
    fn create_binds_meta_and_config() {
        let spec = TaskSpec::new("nap", 2, 1.5).with_config(json!({ "lengthSecs": 8.0 }));
        let task = registry().create(AgentId(4), &spec).unwrap();
        let meta = task.meta();
        assert_eq!(meta.code, "nap");
        assert_eq!(meta.slot, 2);
        assert_eq!(meta.priority, 1.5);
        assert_eq!(meta.priority_for_cancel, 1.5);
    }

    #[test]
    fn null_config_uses_defaults() {
        let reg = registry();
        let spec = TaskSpec::new("nap", 0, 0.0);
        assert!(reg.create(AgentId(0), &spec).is_ok());
    }

    #[test]
    fn unknown_code_errors() {
        let spec = TaskSpec::new("dance", 0, 0.0);
        match registry().create(AgentId(0), &spec) {
            Err(RegistryError::UnknownTaskCode { code }) => assert_eq!(code, "dance"),
            Err(e) => panic!("wrong error: {e}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn bad_config_is_config_error() {
        let spec = TaskSpec::new("nap", 0, 0.0).with_config(json!({ "lengthSecs": "long" }));
        match registry().create(AgentId(9), &spec) {
            Err(RegistryError::Config { code, agent, .. }) => {
                assert_eq!(code, "nap");
                assert_eq!(agent, AgentId(9));
            }
            Err(e) => panic!("wrong error: {e}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn last_registration_wins() {
        let mut reg = registry();
        let replaced = reg.register("nap", |init: TaskInit<'_>| {
            let meta = TaskMeta::new("nap-override", init.meta.slot, 0.0);
            Ok(Box::new(Nap { meta, length: 0.0, slept: 0.0 }) as Box<dyn Task>)
        });
        assert!(replaced);
        assert_eq!(reg.len(), 1);
        let task = reg.create(AgentId(0), &TaskSpec::new("nap", 0, 0.0)).unwrap();
        assert_eq!(code_of(task.as_ref()), "nap-override");
    }

    #[test]
    fn codes_are_sorted() {
        let mut reg = registry();
        reg.register("attack", nap_factory);
        reg.register("zzz", nap_factory);
        assert_eq!(reg.codes(), vec!["attack", "nap", "zzz"]);
        assert!(reg.contains("zzz"));
        assert!(!reg.contains("eat"));
    }

    #[test]
    fn factory_sees_agent() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(None));
        let mut reg = TaskRegistry::new();
        let sink = Arc::clone(&seen);
        reg.register("nap", move |init: TaskInit<'_>| {
            *sink.lock().unwrap() = Some(init.agent);
            nap_factory(init)
        });
        reg.create(AgentId(17), &TaskSpec::new("nap", 0, 0.0)).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(AgentId(17)));
    }
}

// ── Spec parsing ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod spec_tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let specs = parse_task_specs(r#"[ { "code": "nap" } ]"#).unwrap();
        assert_eq!(specs.len(), 1);
        let s = &specs[0];
        assert_eq!(s.slot, 0);
        assert_eq!(s.priority, 0.0);
        assert!(s.enabled);
        assert!(s.config.is_null());
        assert_eq!(s.meta().priority_for_cancel, 0.0);
    }

    #[test]
    fn parses_cancel_priority() {
        let specs = parse_task_specs(
            r#"[ { "code": "nap", "slot": 1, "priority": 2, "priorityForCancel": 9 } ]"#,
        )
        .unwrap();
        let meta = specs[0].meta();
        assert_eq!(meta.slot, 1);
        assert_eq!(meta.priority, 2.0);
        assert_eq!(meta.priority_for_cancel, 9.0);
    }

    #[test]
    fn malformed_document_fails() {
        assert!(matches!(parse_task_specs("{ not json"), Err(RegistryError::Parse(_))));
        assert!(matches!(parse_task_specs(r#"[ { "slot": 1 } ]"#), Err(RegistryError::Parse(_))));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use super::*;

    const LIST: &str = r#"[
        { "code": "nap",   "slot": 0, "priority": 2 },
        { "code": "dance", "slot": 0, "priority": 1 },
        { "code": "nap",   "slot": 1, "priority": 1, "config": { "lengthSecs": "x" } },
        { "code": "nap",   "slot": 2, "priority": 1, "enabled": false },
        { "code": "nap",   "slot": 3, "priority": 0, "config": { "lengthSecs": 1 } }
    ]"#;

    #[test]
    fn bad_entries_are_skipped_not_fatal() {
        let loaded = load_tasks_reader(Cursor::new(LIST), &registry(), AgentId(1)).unwrap();
        let slots: Vec<usize> = loaded.tasks.iter().map(|t| t.meta().slot).collect();
        assert_eq!(slots, vec![0, 3], "list order preserved, bad and disabled entries dropped");
        assert_eq!(loaded.skipped.len(), 2);
        assert!(!loaded.is_complete());
        assert!(matches!(loaded.skipped[0], RegistryError::UnknownTaskCode { .. }));
        assert!(matches!(loaded.skipped[1], RegistryError::Config { .. }));
    }

    #[test]
    fn clean_list_is_complete() {
        let loaded = load_tasks_reader(
            Cursor::new(r#"[ { "code": "nap" }, { "code": "nap", "slot": 1 } ]"#),
            &registry(),
            AgentId(0),
        )
        .unwrap();
        assert_eq!(loaded.tasks.len(), 2);
        assert!(loaded.is_complete());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = crate::load_tasks_json(
            std::path::Path::new("/definitely/not/here.json"),
            &registry(),
            AgentId(0),
        );
        assert!(matches!(result, Err(RegistryError::Io(_))));
    }
}
