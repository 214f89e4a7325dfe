//! Query parameters for list endpoints.

use campus_auth::ApiRequest;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}' (expected asc or desc)")),
        }
    }
}

/// Filters for `GET /events`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Free-text search
    pub query: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl EventFilters {
    /// The dashboard's "upcoming events" slice.
    pub fn upcoming(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            sort: Some("date".to_string()),
            order: Some(SortOrder::Asc),
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(page) = self.page {
            request = request.with_query("page", page);
        }
        if let Some(limit) = self.limit {
            request = request.with_query("limit", limit);
        }
        if let Some(query) = non_blank(&self.query) {
            request = request.with_query("q", query);
        }
        if let Some(category) = non_blank(&self.category) {
            request = request.with_query("category", category);
        }
        if let Some(sort) = non_blank(&self.sort) {
            request = request.with_query("sort", sort);
        }
        if let Some(order) = self.order {
            request = request.with_query("order", order);
        }
        request
    }
}

/// Filters for `GET /notifications`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// `Some(true)` for read only, `Some(false)` for unread only.
    pub read: Option<bool>,
}

impl NotificationFilters {
    pub fn recent(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(page) = self.page {
            request = request.with_query("page", page);
        }
        if let Some(limit) = self.limit {
            request = request.with_query("limit", limit);
        }
        if let Some(read) = self.read {
            request = request.with_query("isRead", read);
        }
        request
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(request: &ApiRequest) -> Vec<(&str, &str)> {
        request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_event_filters_skip_unset_and_blank() {
        let filters = EventFilters {
            page: Some(2),
            limit: Some(12),
            query: Some("  ".to_string()),
            category: Some("Technical".to_string()),
            ..EventFilters::default()
        };
        let request = filters.apply(ApiRequest::get("/events"));
        assert_eq!(
            pairs(&request),
            vec![("page", "2"), ("limit", "12"), ("category", "Technical")]
        );
    }

    #[test]
    fn test_upcoming_events_query() {
        let request = EventFilters::upcoming(5).apply(ApiRequest::get("/events"));
        assert_eq!(
            pairs(&request),
            vec![("limit", "5"), ("sort", "date"), ("order", "asc")]
        );
    }

    #[test]
    fn test_notification_filters() {
        let filters = NotificationFilters {
            page: Some(1),
            limit: Some(50),
            read: Some(false),
        };
        let request = filters.apply(ApiRequest::get("/notifications"));
        assert_eq!(
            pairs(&request),
            vec![("page", "1"), ("limit", "50"), ("isRead", "false")]
        );
        assert!(NotificationFilters::default()
            .apply(ApiRequest::get("/notifications"))
            .query
            .is_empty());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
