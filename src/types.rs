use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BugboardError;

/// Bug priority, 1 (most urgent) through 5.
///
/// Serialized as a bare number to match the wire format of the bugs API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum BugPriority {
    P1,
    P2,
    #[default]
    P3,
    P4,
    P5,
}

impl BugPriority {
    pub fn as_num(&self) -> u8 {
        match self {
            BugPriority::P1 => 1,
            BugPriority::P2 => 2,
            BugPriority::P3 => 3,
            BugPriority::P4 => 4,
            BugPriority::P5 => 5,
        }
    }

    /// Cycle forward through priorities (wrapping), for the form selector.
    pub fn next(self) -> Self {
        match self {
            BugPriority::P1 => BugPriority::P2,
            BugPriority::P2 => BugPriority::P3,
            BugPriority::P3 => BugPriority::P4,
            BugPriority::P4 => BugPriority::P5,
            BugPriority::P5 => BugPriority::P1,
        }
    }

    /// Cycle backward through priorities (wrapping).
    pub fn prev(self) -> Self {
        match self {
            BugPriority::P1 => BugPriority::P5,
            BugPriority::P2 => BugPriority::P1,
            BugPriority::P3 => BugPriority::P2,
            BugPriority::P4 => BugPriority::P3,
            BugPriority::P5 => BugPriority::P4,
        }
    }
}

impl TryFrom<u8> for BugPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BugPriority::P1),
            2 => Ok(BugPriority::P2),
            3 => Ok(BugPriority::P3),
            4 => Ok(BugPriority::P4),
            5 => Ok(BugPriority::P5),
            _ => Err(format!("invalid priority {value}, expected 1-5")),
        }
    }
}

impl From<BugPriority> for u8 {
    fn from(priority: BugPriority) -> u8 {
        priority.as_num()
    }
}

impl fmt::Display for BugPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_num())
    }
}

impl FromStr for BugPriority {
    type Err = BugboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num: u8 = s
            .parse()
            .map_err(|_| BugboardError::Other(format!("invalid priority: {s}")))?;
        BugPriority::try_from(num).map_err(BugboardError::Other)
    }
}

/// The table columns a list query can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Priority,
    Reporter,
    CreatedAt,
    Status,
}

impl SortField {
    /// Field name as the bugs API expects it in the `sort` query parameter.
    pub fn wire_name(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Priority => "priority",
            SortField::Reporter => "reporter",
            SortField::CreatedAt => "createdAt",
            SortField::Status => "status",
        }
    }

    /// Column label for the table header.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Priority => "Priority",
            SortField::Reporter => "Reporter",
            SortField::CreatedAt => "Created",
            SortField::Status => "Status",
        }
    }
}

/// All sortable columns, in table display order.
pub const SORT_COLUMNS: &[SortField] = &[
    SortField::Title,
    SortField::Priority,
    SortField::Reporter,
    SortField::CreatedAt,
    SortField::Status,
];

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for SortField {
    type Err = BugboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            "reporter" => Ok(SortField::Reporter),
            "createdAt" => Ok(SortField::CreatedAt),
            "status" => Ok(SortField::Status),
            _ => Err(BugboardError::Other(format!("invalid sort field: {s}"))),
        }
    }
}

/// Direction of a sorted list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Direction as the bugs API expects it in the `sort` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Arrow glyph for the table header of the sorted column.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Reporters offered by the form selector. The empty entry keeps the field
/// unset so the required-field validation has something to catch.
pub const REPORTERS: &[&str] = &["", "QA", "PO", "DEV"];

/// The reporter value that makes the status field mandatory.
pub const QA_REPORTER: &str = "QA";

/// Statuses offered by the form selector.
pub const STATUSES: &[&str] = &["", "Open", "In progress", "Resolved", "Rejected"];

/// A comment attached to a bug. Comments are append-only from the client's
/// perspective: the form accumulates new ones locally and merges them after
/// the record's existing comments at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub reporter: String,
    pub description: String,
}

/// The persisted unit of work tracked by the system.
///
/// `created_at` is set once at creation and must be resent verbatim on every
/// update; `updated_at` is restamped by the client on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugRecord {
    /// Server-assigned; absent until the record is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub priority: BugPriority,
    pub reporter: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Absent on records that were never commented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> &'static str {
        r#"{
            "id": 17,
            "title": "Login button unresponsive",
            "description": "Clicking login does nothing on Firefox.",
            "priority": 2,
            "reporter": "QA",
            "status": "Open",
            "createdAt": "2024-03-01T09:30:00Z",
            "updatedAt": "2024-03-02T10:00:00Z",
            "comments": [
                {"id": 3, "reporter": "DEV", "description": "Cannot reproduce on 124."}
            ]
        }"#
    }

    #[test]
    fn test_record_deserializes_camel_case() {
        let record: BugRecord = serde_json::from_str(record_json()).unwrap();
        assert_eq!(record.id, Some(17));
        assert_eq!(record.priority, BugPriority::P2);
        assert_eq!(record.created_at.to_string(), "2024-03-01T09:30:00Z");
        let comments = record.comments.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].reporter, "DEV");
    }

    #[test]
    fn test_record_without_comments_or_id() {
        let record: BugRecord = serde_json::from_str(
            r#"{
                "title": "t",
                "description": "d",
                "priority": 5,
                "reporter": "PO",
                "status": "",
                "createdAt": "2024-03-01T09:30:00Z",
                "updatedAt": "2024-03-01T09:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.comments, None);

        // Absent fields must also stay absent when serialized back.
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("comments").is_none());
        assert_eq!(json["priority"], 5);
        assert_eq!(json["createdAt"], "2024-03-01T09:30:00Z");
    }

    #[test]
    fn test_priority_rejects_out_of_range() {
        let result: Result<BugPriority, _> = serde_json::from_str("0");
        assert!(result.is_err());
        let result: Result<BugPriority, _> = serde_json::from_str("6");
        assert!(result.is_err());
    }

    #[test]
    fn test_priority_cycling_wraps() {
        assert_eq!(BugPriority::P5.next(), BugPriority::P1);
        assert_eq!(BugPriority::P1.prev(), BugPriority::P5);
    }

    #[test]
    fn test_sort_field_round_trip() {
        for field in SORT_COLUMNS {
            let parsed: SortField = field.wire_name().parse().unwrap();
            assert_eq!(parsed, *field);
        }
        assert!("updatedAt".parse::<SortField>().is_err());
    }

    #[test]
    fn test_sort_direction_params() {
        assert_eq!(SortDirection::Ascending.as_param(), "asc");
        assert_eq!(SortDirection::Descending.as_param(), "desc");
        assert_eq!(SortDirection::Descending.toggle(), SortDirection::Ascending);
    }
}
