//! Translation of [`TaskFilter`] into the Notion database query filter.

use cadence_core::{CheckboxField, Predicate, TaskFilter, TextField};
use chrono::SecondsFormat;
use serde_json::{Value, json};

use crate::properties::{DONE, NAME, SCHEDULE};

/// The `filter` object for a query, or `None` for an unfiltered query.
#[must_use]
pub fn to_notion_filter(filter: &TaskFilter) -> Option<Value> {
    let mut conditions: Vec<Value> = filter.predicates.iter().map(condition).collect();
    match conditions.len() {
        0 => None,
        1 => conditions.pop(),
        _ => Some(json!({ "and": conditions })),
    }
}

fn condition(predicate: &Predicate) -> Value {
    match predicate {
        Predicate::EditedOnOrAfter { at } => json!({
            "timestamp": "last_edited_time",
            "last_edited_time": { "on_or_after": at.to_rfc3339_opts(SecondsFormat::Millis, true) },
        }),
        Predicate::TextNotEmpty { field } => {
            let (property, kind) = text_property(*field);
            json!({ "property": property, kind: { "is_not_empty": true } })
        }
        Predicate::TextEquals { field, value } => {
            let (property, kind) = text_property(*field);
            json!({ "property": property, kind: { "equals": value } })
        }
        Predicate::CheckboxEquals { field, value } => {
            let property = match field {
                CheckboxField::Done => DONE,
            };
            json!({ "property": property, "checkbox": { "equals": value } })
        }
    }
}

/// Property name and Notion filter type for a text field.
const fn text_property(field: TextField) -> (&'static str, &'static str) {
    match field {
        TextField::Name => (NAME, "title"),
        TextField::Schedule => (SCHEDULE, "rich_text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn completed_recurring_filter() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let filter = to_notion_filter(&TaskFilter::completed_recurring_since(since)).unwrap();
        assert_eq!(
            filter,
            json!({
                "and": [
                    {
                        "timestamp": "last_edited_time",
                        "last_edited_time": { "on_or_after": "2024-03-01T12:00:00.000Z" }
                    },
                    { "property": "Schedule", "rich_text": { "is_not_empty": true } },
                    { "property": "Done", "checkbox": { "equals": true } }
                ]
            })
        );
    }

    #[test]
    fn open_by_name_filter() {
        let filter = to_notion_filter(&TaskFilter::open_by_name("Pay rent")).unwrap();
        assert_eq!(
            filter["and"][0],
            json!({ "property": "Name", "title": { "equals": "Pay rent" } })
        );
        assert_eq!(filter["and"][1]["checkbox"]["equals"], false);
    }

    #[test]
    fn empty_and_single_filters() {
        assert_eq!(to_notion_filter(&TaskFilter::new()), None);
        let single = TaskFilter::new().and(Predicate::CheckboxEquals {
            field: CheckboxField::Done,
            value: true,
        });
        assert_eq!(
            to_notion_filter(&single),
            Some(json!({ "property": "Done", "checkbox": { "equals": true } }))
        );
    }
}
