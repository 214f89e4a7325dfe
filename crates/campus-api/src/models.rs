//! Resource records.
//!
//! Events, notifications and stats are displayed, never processed. A few
//! fields are typed for rendering; the rest is kept as raw JSON in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// ISO date as sent by the server.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub registered_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `data` of `GET /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub events: Vec<EventSummary>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `data` of `GET /notifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// `data` of `GET /users/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub registered_events: u64,
    #[serde(default)]
    pub upcoming_events: u64,
    #[serde(default)]
    pub notifications: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the dashboard view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub upcoming_events: Vec<EventSummary>,
    pub recent_notifications: Vec<NotificationRecord>,
    pub stats: UserStats,
}

/// Body of endpoints that only acknowledge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_page_decodes_sparse_records() {
        let page: EventPage = serde_json::from_value(json!({
            "events": [{
                "id": "e-1",
                "title": "Robotics Expo",
                "date": "2025-03-14T00:00:00.000Z",
                "time": "10:00",
                "location": "Main Hall",
                "category": "Technical",
                "registeredCount": 42,
                "maxParticipants": 100,
                "tags": ["ai"]
            }],
            "pagination": { "currentPage": 1, "totalPages": 3, "totalEvents": 30 }
        }))
        .unwrap();

        assert_eq!(page.events[0].registered_count, 42);
        assert_eq!(page.events[0].max_participants, Some(100));
        assert_eq!(page.events[0].extra["tags"], json!(["ai"]));
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.extra["totalEvents"], 30);
    }

    #[test]
    fn test_notification_type_field_is_renamed() {
        let record: NotificationRecord = serde_json::from_value(json!({
            "id": "n-1",
            "title": "Reminder",
            "message": "Starts soon",
            "type": "event_reminder",
            "priority": "high",
            "isRead": false
        }))
        .unwrap();
        assert_eq!(record.kind, "event_reminder");
        assert!(!record.is_read);
        assert_eq!(serde_json::to_value(&record).unwrap()["type"], "event_reminder");
    }

    #[test]
    fn test_stats_default_missing_counters() {
        let stats: UserStats =
            serde_json::from_value(json!({ "registeredEvents": 2, "badges": 1 })).unwrap();
        assert_eq!(stats.registered_events, 2);
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.extra["badges"], 1);
    }
}
