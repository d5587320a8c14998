//! In-memory [`TaskStore`] with failure injection.
//!
//! Backs orchestrator tests and local experiments. Queries evaluate
//! [`TaskFilter::matches`] and return tasks most recently edited first, the
//! same order the Notion store uses.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use cadence_core::{NewTask, StoreError, Task, TaskFilter, TaskStore};
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
struct Faults {
    read_checkpoint: bool,
    write_checkpoint: bool,
    query: bool,
    create_for: HashSet<String>,
    creates_left: Option<usize>,
}

#[derive(Debug)]
struct State {
    tasks: Vec<Task>,
    checkpoint: Option<DateTime<Utc>>,
    clock: DateTime<Utc>,
    next_id: u64,
    faults: Faults,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                tasks: Vec::new(),
                checkpoint: None,
                clock: Utc::now(),
                next_id: 1,
                faults: Faults::default(),
            }),
        }
    }

    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let store = Self::new();
        store.lock().tasks.extend(tasks);
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, task: Task) {
        self.lock().tasks.push(task);
    }

    /// Snapshot of every stored task in insertion order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    #[must_use]
    pub fn checkpoint(&self) -> Option<DateTime<Utc>> {
        self.lock().checkpoint
    }

    pub fn set_checkpoint(&self, at: Option<DateTime<Utc>>) {
        self.lock().checkpoint = at;
    }

    /// Timestamp stamped on created tasks.
    pub fn set_clock(&self, at: DateTime<Utc>) {
        self.lock().clock = at;
    }

    /// Mark task `id` done as of `at`. Returns false if no such task.
    pub fn complete(&self, id: &str, at: DateTime<Utc>) -> bool {
        let mut state = self.lock();
        match state.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.done = true;
                task.last_edited_at = at;
                true
            }
            None => false,
        }
    }

    pub fn fail_checkpoint_read(&self, fail: bool) {
        self.lock().faults.read_checkpoint = fail;
    }

    pub fn fail_checkpoint_write(&self, fail: bool) {
        self.lock().faults.write_checkpoint = fail;
    }

    pub fn fail_queries(&self, fail: bool) {
        self.lock().faults.query = fail;
    }

    /// Reject creation of tasks named `name`.
    pub fn fail_create_for(&self, name: &str) {
        self.lock().faults.create_for.insert(name.to_string());
    }

    /// Allow `n` more creations, then reject the rest. `None` lifts the limit.
    pub fn limit_creates(&self, n: Option<usize>) {
        self.lock().faults.creates_left = n;
    }
}

fn unavailable(what: &str) -> StoreError {
    StoreError::Transport(format!("{what} unavailable (injected)"))
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn query_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let state = self.lock();
        if state.faults.query {
            return Err(unavailable("query"));
        }
        let mut matching: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.last_edited_at.cmp(&a.last_edited_at));
        Ok(matching)
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, StoreError> {
        let mut state = self.lock();
        if state.faults.create_for.contains(&task.name) {
            return Err(StoreError::Api {
                status: 400,
                message: format!("creation of '{}' rejected (injected)", task.name),
            });
        }
        if let Some(left) = state.faults.creates_left.as_mut() {
            if *left == 0 {
                return Err(unavailable("create"));
            }
            *left -= 1;
        }

        let id = format!("mem-{}", state.next_id);
        state.next_id += 1;
        let stored = Task {
            id,
            name: task.name.clone(),
            done: task.done,
            status: Some(task.status),
            priority: task.priority,
            tags: task.tags.clone(),
            schedule: task.schedule.clone(),
            due_date: Some(task.due_date),
            parent_id: task.parent_id.clone(),
            created_at: state.clock,
            last_edited_at: state.clock,
        };
        state.tasks.push(stored.clone());
        Ok(stored)
    }

    async fn read_checkpoint(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let state = self.lock();
        if state.faults.read_checkpoint {
            return Err(unavailable("checkpoint read"));
        }
        Ok(state.checkpoint)
    }

    async fn write_checkpoint(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.faults.write_checkpoint {
            return Err(unavailable("checkpoint write"));
        }
        state.checkpoint = Some(at);
        Ok(())
    }
}
