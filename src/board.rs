//! Boards, lists, and tasks
//!
//! The whole graph (boards -> lists -> tasks, for every user) is stored in
//! `boards.json` and rewritten under lock on every mutation. Entities are
//! identified by ULIDs; commands may also address boards and lists by a
//! unique title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

use crate::config::BoardsConfig;
use crate::deadline::parse_deadline;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "Invalid status '{}'. Expected: pending, completed",
                s
            ))),
        }
    }
}

/// A unit of work within a list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date (`YYYY-MM-DD`); interpretation belongs to the
    /// deadline classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named column of tasks within a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub title: String,
    pub position: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
}

/// A named collection of lists belonging to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub lists: Vec<List>,
    pub created_at: DateTime<Utc>,
}

impl Board {
    fn resolve_list_idx(&self, key: &str) -> Result<usize> {
        if let Some(idx) = self.lists.iter().position(|list| list.id == key) {
            return Ok(idx);
        }

        let mut matches = self
            .lists
            .iter()
            .enumerate()
            .filter(|(_, list)| list.title.eq_ignore_ascii_case(key.trim()));
        match (matches.next(), matches.next()) {
            (Some((idx, _)), None) => Ok(idx),
            (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
                "list title '{}' is ambiguous, use the id",
                key
            ))),
            _ => Err(Error::ListNotFound(key.to_string())),
        }
    }
}

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub responsible: Option<String>,
}

/// Partial update for an existing task; absent fields are left alone
///
/// An empty string clears the corresponding optional field, matching the
/// update semantics of the HTTP API this store replaces.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub responsible: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.deadline.is_none()
            && self.responsible.is_none()
            && self.status.is_none()
    }
}

/// The persisted board graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSet {
    pub boards: Vec<Board>,
}

impl BoardSet {
    /// Boards belonging to a user, newest first
    pub fn for_user(&self, user_id: &str) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self
            .boards
            .iter()
            .filter(|board| board.user_id == user_id)
            .collect();
        boards.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        boards
    }

    fn resolve_board_idx(&self, user_id: &str, key: &str) -> Result<usize> {
        if let Some(idx) = self
            .boards
            .iter()
            .position(|board| board.user_id == user_id && board.id == key)
        {
            return Ok(idx);
        }

        let mut matches = self.boards.iter().enumerate().filter(|(_, board)| {
            board.user_id == user_id && board.title.eq_ignore_ascii_case(key.trim())
        });
        match (matches.next(), matches.next()) {
            (Some((idx, _)), None) => Ok(idx),
            (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
                "board title '{}' is ambiguous, use the id",
                key
            ))),
            _ => Err(Error::BoardNotFound(key.to_string())),
        }
    }

    /// Validate the graph (unique entity ids)
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for board in &self.boards {
            if !ids.insert(board.id.as_str()) {
                return Err(Error::OperationFailed(format!(
                    "duplicate board id: {}",
                    board.id
                )));
            }
            for list in &board.lists {
                if !ids.insert(list.id.as_str()) {
                    return Err(Error::OperationFailed(format!(
                        "duplicate list id: {}",
                        list.id
                    )));
                }
                for task in &list.tasks {
                    if !ids.insert(task.id.as_str()) {
                        return Err(Error::OperationFailed(format!(
                            "duplicate task id: {}",
                            task.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Flatten boards -> lists -> tasks into one sequence
///
/// This is the feed the dashboard aggregator consumes.
pub fn flatten_tasks(boards: &[Board]) -> Vec<&Task> {
    boards
        .iter()
        .flat_map(|board| board.lists.iter())
        .flat_map(|list| list.tasks.iter())
        .collect()
}

/// Validate and normalize a deadline argument
///
/// Blank input clears the deadline; anything else must be a calendar date.
pub fn validate_deadline(raw: Option<&str>) -> Result<Option<String>> {
    let raw = match raw {
        Some(raw) => raw.trim(),
        None => return Ok(None),
    };
    if raw.is_empty() {
        return Ok(None);
    }
    match parse_deadline(raw) {
        Some(date) => Ok(Some(date.format(crate::deadline::DATE_FORMAT).to_string())),
        None => Err(Error::InvalidDeadline(raw.to_string())),
    }
}

fn normalize_optional(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn require_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Store for the board graph of all users
#[derive(Debug, Clone)]
pub struct BoardStore {
    storage: Storage,
    config: BoardsConfig,
}

impl BoardStore {
    pub fn new(storage: Storage, config: BoardsConfig) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Read the whole graph (missing file yields an empty set)
    pub fn read_set(&self) -> Result<BoardSet> {
        self.storage
            .read_json_or_default(&self.storage.boards_file())
    }

    fn update<R>(&self, f: impl FnOnce(&mut BoardSet) -> Result<R>) -> Result<R> {
        self.storage
            .update_json(&self.storage.boards_file(), |set: &mut BoardSet| {
                let result = f(set)?;
                set.validate()?;
                Ok(result)
            })
    }

    // =========================================================================
    // Boards
    // =========================================================================

    pub fn boards_for_user(&self, user_id: &str) -> Result<Vec<Board>> {
        let set = self.read_set()?;
        Ok(set.for_user(user_id).into_iter().cloned().collect())
    }

    pub fn create_board(&self, user_id: &str, title: &str, with_lists: bool) -> Result<Board> {
        let title = require_title(title)?;
        let now = Utc::now();

        let lists = if with_lists {
            self.config
                .default_lists
                .iter()
                .enumerate()
                .map(|(position, list_title)| List {
                    id: Ulid::new().to_string(),
                    title: list_title.clone(),
                    position: position as u32,
                    tasks: Vec::new(),
                    created_at: now,
                })
                .collect()
        } else {
            Vec::new()
        };

        let board = Board {
            id: Ulid::new().to_string(),
            user_id: user_id.to_string(),
            title,
            lists,
            created_at: now,
        };

        self.update(|set| {
            set.boards.push(board.clone());
            Ok(())
        })?;
        Ok(board)
    }

    pub fn rename_board(&self, user_id: &str, key: &str, title: &str) -> Result<Board> {
        let title = require_title(title)?;
        self.update(|set| {
            let idx = set.resolve_board_idx(user_id, key)?;
            set.boards[idx].title = title;
            Ok(set.boards[idx].clone())
        })
    }

    /// Delete a board; lists and tasks go with it
    pub fn delete_board(&self, user_id: &str, key: &str) -> Result<Board> {
        self.update(|set| {
            let idx = set.resolve_board_idx(user_id, key)?;
            Ok(set.boards.remove(idx))
        })
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub fn create_list(&self, user_id: &str, board_key: &str, title: &str) -> Result<List> {
        let title = require_title(title)?;
        self.update(|set| {
            let idx = set.resolve_board_idx(user_id, board_key)?;
            let board = &mut set.boards[idx];
            let list = List {
                id: Ulid::new().to_string(),
                title,
                position: board.lists.len() as u32,
                tasks: Vec::new(),
                created_at: Utc::now(),
            };
            board.lists.push(list.clone());
            Ok(list)
        })
    }

    pub fn rename_list(
        &self,
        user_id: &str,
        board_key: &str,
        list_key: &str,
        title: &str,
    ) -> Result<List> {
        let title = require_title(title)?;
        self.update(|set| {
            let board_idx = set.resolve_board_idx(user_id, board_key)?;
            let board = &mut set.boards[board_idx];
            let list_idx = board.resolve_list_idx(list_key)?;
            board.lists[list_idx].title = title;
            Ok(board.lists[list_idx].clone())
        })
    }

    /// Delete a list; its tasks go with it
    pub fn delete_list(&self, user_id: &str, board_key: &str, list_key: &str) -> Result<List> {
        self.update(|set| {
            let board_idx = set.resolve_board_idx(user_id, board_key)?;
            let board = &mut set.boards[board_idx];
            let list_idx = board.resolve_list_idx(list_key)?;
            Ok(board.lists.remove(list_idx))
        })
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn create_task(
        &self,
        user_id: &str,
        board_key: &str,
        list_key: &str,
        draft: TaskDraft,
    ) -> Result<Task> {
        let title = require_title(&draft.title)?;
        let deadline = validate_deadline(draft.deadline.as_deref())?;
        let now = Utc::now();

        let task = Task {
            id: Ulid::new().to_string(),
            title,
            description: normalize_optional(draft.description),
            deadline,
            responsible: normalize_optional(draft.responsible),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.update(|set| {
            let board_idx = set.resolve_board_idx(user_id, board_key)?;
            let board = &mut set.boards[board_idx];
            let list_idx = board.resolve_list_idx(list_key)?;
            board.lists[list_idx].tasks.push(task.clone());
            Ok(())
        })?;
        Ok(task)
    }

    pub fn update_task(&self, user_id: &str, task_id: &str, patch: TaskPatch) -> Result<Task> {
        if patch.is_empty() {
            return Err(Error::InvalidArgument("nothing to update".to_string()));
        }

        let title = match patch.title.as_deref() {
            Some(raw) => Some(require_title(raw)?),
            None => None,
        };
        let deadline = match patch.deadline.as_deref() {
            Some(raw) => Some(validate_deadline(Some(raw))?),
            None => None,
        };

        self.update(|set| {
            let task = find_task_mut(set, user_id, task_id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = patch.description {
                task.description = normalize_optional(Some(description));
            }
            if let Some(deadline) = deadline {
                task.deadline = deadline;
            }
            if let Some(responsible) = patch.responsible {
                task.responsible = normalize_optional(Some(responsible));
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            task.updated_at = Utc::now();
            Ok(task.clone())
        })
    }

    pub fn set_task_status(
        &self,
        user_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task> {
        self.update(|set| {
            let task = find_task_mut(set, user_id, task_id)?;
            task.status = status;
            task.updated_at = Utc::now();
            Ok(task.clone())
        })
    }

    pub fn delete_task(&self, user_id: &str, task_id: &str) -> Result<Task> {
        self.update(|set| {
            for board in set
                .boards
                .iter_mut()
                .filter(|board| board.user_id == user_id)
            {
                for list in board.lists.iter_mut() {
                    if let Some(idx) = list.tasks.iter().position(|task| task.id == task_id) {
                        return Ok(list.tasks.remove(idx));
                    }
                }
            }
            Err(Error::TaskNotFound(task_id.to_string()))
        })
    }

    /// All tasks of a user, flattened across boards and lists
    pub fn tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>> {
        let set = self.read_set()?;
        let boards: Vec<Board> = set.for_user(user_id).into_iter().cloned().collect();
        Ok(flatten_tasks(&boards).into_iter().cloned().collect())
    }
}

fn find_task_mut<'a>(set: &'a mut BoardSet, user_id: &str, task_id: &str) -> Result<&'a mut Task> {
    for board in set
        .boards
        .iter_mut()
        .filter(|board| board.user_id == user_id)
    {
        for list in board.lists.iter_mut() {
            if let Some(task) = list.tasks.iter_mut().find(|task| task.id == task_id) {
                return Ok(task);
            }
        }
    }
    Err(Error::TaskNotFound(task_id.to_string()))
}
