//! Notion page and property wire types, and the task codec.
//!
//! Property values are an internally tagged enum on `type`; kinds the codec
//! does not use deserialize as [`PropertyValue::Unsupported`].

use std::collections::BTreeMap;

use cadence_core::enums::{Priority, TaskStatus};
use cadence_core::{NewTask, Task, Zone};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotionError;

// ---------------------------------------------------------------------------
// Property names in the tasks database
// ---------------------------------------------------------------------------

pub const NAME: &str = "Name";
pub const DONE: &str = "Done";
pub const STATUS: &str = "Status";
pub const SCHEDULE: &str = "Schedule";
pub const PRIORITY: &str = "Priority";
pub const TAGS: &str = "Tags";
pub const DUE_DATE: &str = "Due date";
pub const PARENT: &str = "Parent";
pub const LAST_EDITED: &str = "Last edited time";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A database row as returned by the query and create endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// One page of `POST /databases/{id}/query` results.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Checkbox { checkbox: bool },
    Select { select: Option<SelectOption> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Date { date: Option<DateValue> },
    Relation { relation: Vec<PageRef> },
    LastEditedTime { last_edited_time: DateTime<Utc> },
    CreatedTime { created_time: DateTime<Utc> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing)]
    pub plain_text: String,
}

impl RichText {
    #[must_use]
    pub fn plain(content: &str) -> Self {
        Self {
            text: Some(TextContent {
                content: content.to_string(),
            }),
            plain_text: content.to_string(),
        }
    }

    fn as_str(&self) -> &str {
        if self.plain_text.is_empty() {
            self.text.as_ref().map_or("", |t| t.content.as_str())
        } else {
            &self.plain_text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SelectOption {
    fn named(name: &str) -> Self {
        Self {
            id: None,
            name: Some(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: String,
}

/// Concatenated plain text of a rich-text array.
pub(crate) fn joined(parts: &[RichText]) -> String {
    parts.iter().map(RichText::as_str).collect()
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a Notion date `start`: RFC 3339, or `YYYY-MM-DD` read as local
/// midnight in `zone`.
pub fn parse_date(raw: &str, zone: Zone) -> Result<DateTime<Utc>, NotionError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| zone.resolve(midnight))
            .ok_or_else(|| NotionError::Parse(format!("date '{raw}' is out of range")));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NotionError::Parse(format!("invalid date '{raw}': {e}")))
}

/// Format a due date for Notion in `zone`; local midnight is written
/// date-only, anything else with the offset in force at that instant.
#[must_use]
pub fn format_date(at: DateTime<Utc>, zone: Zone) -> String {
    let local = at.with_timezone(&zone.offset_at(at));
    if local.num_seconds_from_midnight() == 0 && local.nanosecond() == 0 {
        local.format("%Y-%m-%d").to_string()
    } else {
        local.to_rfc3339()
    }
}

// ---------------------------------------------------------------------------
// Task codec
// ---------------------------------------------------------------------------

/// Maps task pages to and from [`Task`] / [`NewTask`] in one time zone.
#[derive(Debug, Clone, Copy)]
pub struct TaskCodec {
    timezone: Zone,
}

impl TaskCodec {
    #[must_use]
    pub fn new(timezone: impl Into<Zone>) -> Self {
        Self { timezone: timezone.into() }
    }

    /// Decode a tasks-database page.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::Parse`] if a property has an unexpected type or
    /// an unparseable date.
    pub fn decode(&self, page: &Page) -> Result<Task, NotionError> {
        let mut task = Task {
            id: page.id.clone(),
            name: String::new(),
            done: false,
            status: None,
            priority: None,
            tags: Vec::new(),
            schedule: None,
            due_date: None,
            parent_id: None,
            created_at: page.created_time,
            last_edited_at: page.last_edited_time,
        };

        for (name, value) in &page.properties {
            match (name.as_str(), value) {
                (NAME, PropertyValue::Title { title }) => task.name = joined(title),
                (DONE, PropertyValue::Checkbox { checkbox }) => task.done = *checkbox,
                (STATUS, PropertyValue::Select { select }) => {
                    task.status = select_label(select.as_ref()).and_then(TaskStatus::from_label);
                }
                (PRIORITY, PropertyValue::Select { select }) => {
                    task.priority = select_label(select.as_ref()).and_then(Priority::from_label);
                }
                (TAGS, PropertyValue::MultiSelect { multi_select }) => {
                    task.tags = multi_select.iter().filter_map(|o| o.name.clone()).collect();
                }
                (SCHEDULE, PropertyValue::RichText { rich_text }) => {
                    let text = joined(rich_text);
                    task.schedule = (!text.trim().is_empty()).then_some(text);
                }
                (DUE_DATE, PropertyValue::Date { date }) => {
                    task.due_date = date
                        .as_ref()
                        .map(|d| parse_date(&d.start, self.timezone))
                        .transpose()?;
                }
                (PARENT, PropertyValue::Relation { relation }) => {
                    task.parent_id = relation.first().map(|r| r.id.clone());
                }
                (LAST_EDITED, PropertyValue::LastEditedTime { last_edited_time }) => {
                    task.last_edited_at = *last_edited_time;
                }
                (NAME | DONE | STATUS | PRIORITY | TAGS | SCHEDULE | DUE_DATE | PARENT, other) => {
                    return Err(NotionError::Parse(format!(
                        "property '{name}' on page {} has unexpected type: {other:?}",
                        page.id
                    )));
                }
                _ => {}
            }
        }

        Ok(task)
    }

    /// Property map for creating `task` as a page.
    #[must_use]
    pub fn encode(&self, task: &NewTask) -> BTreeMap<&'static str, PropertyValue> {
        let mut properties = BTreeMap::new();
        properties.insert(
            NAME,
            PropertyValue::Title {
                title: vec![RichText::plain(&task.name)],
            },
        );
        properties.insert(DONE, PropertyValue::Checkbox { checkbox: task.done });
        properties.insert(
            STATUS,
            PropertyValue::Select {
                select: Some(SelectOption::named(task.status.label())),
            },
        );
        if let Some(priority) = task.priority {
            properties.insert(
                PRIORITY,
                PropertyValue::Select {
                    select: Some(SelectOption::named(priority.label())),
                },
            );
        }
        properties.insert(
            TAGS,
            PropertyValue::MultiSelect {
                multi_select: task.tags.iter().map(|t| SelectOption::named(t)).collect(),
            },
        );
        if let Some(schedule) = &task.schedule {
            properties.insert(
                SCHEDULE,
                PropertyValue::RichText {
                    rich_text: vec![RichText::plain(schedule)],
                },
            );
        }
        properties.insert(
            DUE_DATE,
            PropertyValue::Date {
                date: Some(DateValue {
                    start: format_date(task.due_date, self.timezone),
                    end: None,
                }),
            },
        );
        if let Some(parent) = &task.parent_id {
            properties.insert(
                PARENT,
                PropertyValue::Relation {
                    relation: vec![PageRef { id: parent.clone() }],
                },
            );
        }
        properties
    }
}

fn select_label(option: Option<&SelectOption>) -> Option<&str> {
    option.and_then(|o| o.name.as_deref())
}
