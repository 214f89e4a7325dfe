//! Resource calls made by the client views.

use crate::filters::{EventFilters, NotificationFilters};
use crate::models::{
    Acknowledgement, Dashboard, EventPage, NotificationPage, UserStats,
};
use campus_auth::{ApiEnvelope, ApiRequest, ApiResult, HttpPipeline};
use std::sync::Arc;
use tracing::debug;

/// How many items each dashboard panel shows.
pub const DASHBOARD_LIMIT: u32 = 5;

/// Typed wrapper over the pipeline for events, notifications and stats.
#[derive(Clone)]
pub struct CampusApi {
    pipeline: Arc<HttpPipeline>,
}

impl CampusApi {
    pub fn new(pipeline: Arc<HttpPipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn list_events(&self, filters: &EventFilters) -> ApiResult<EventPage> {
        let request = filters.apply(ApiRequest::get("/events"));
        let envelope: ApiEnvelope<EventPage> = self.pipeline.send_json(request).await?;
        debug!(count = envelope.data.events.len(), "Fetched events");
        Ok(envelope.data)
    }

    pub async fn register_for_event(&self, event_id: &str) -> ApiResult<Acknowledgement> {
        self.pipeline
            .send_json(ApiRequest::post(event_registration_path(event_id)))
            .await
    }

    pub async fn unregister_from_event(&self, event_id: &str) -> ApiResult<Acknowledgement> {
        self.pipeline
            .delete(&event_registration_path(event_id))
            .await
    }

    pub async fn list_notifications(
        &self,
        filters: &NotificationFilters,
    ) -> ApiResult<NotificationPage> {
        let request = filters.apply(ApiRequest::get("/notifications"));
        let envelope: ApiEnvelope<NotificationPage> = self.pipeline.send_json(request).await?;
        debug!(
            count = envelope.data.notifications.len(),
            "Fetched notifications"
        );
        Ok(envelope.data)
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> ApiResult<Acknowledgement> {
        self.pipeline
            .send_json(ApiRequest::put(format!(
                "/notifications/{}/read",
                encode_segment(notification_id)
            )))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResult<Acknowledgement> {
        self.pipeline
            .send_json(ApiRequest::put("/notifications/mark-all-read"))
            .await
    }

    pub async fn delete_notification(&self, notification_id: &str) -> ApiResult<Acknowledgement> {
        self.pipeline
            .delete(&format!("/notifications/{}", encode_segment(notification_id)))
            .await
    }

    pub async fn user_stats(&self) -> ApiResult<UserStats> {
        let envelope: ApiEnvelope<UserStats> = self.pipeline.get("/users/stats").await?;
        Ok(envelope.data)
    }

    /// Fetch the three dashboard panels in order. The first failure aborts.
    pub async fn dashboard(&self) -> ApiResult<Dashboard> {
        let events = self
            .list_events(&EventFilters::upcoming(DASHBOARD_LIMIT))
            .await?;
        let notifications = self
            .list_notifications(&NotificationFilters::recent(DASHBOARD_LIMIT))
            .await?;
        let stats = self.user_stats().await?;

        Ok(Dashboard {
            upcoming_events: events.events,
            recent_notifications: notifications.notifications,
            stats,
        })
    }
}

fn event_registration_path(event_id: &str) -> String {
    format!("/events/{}/register", encode_segment(event_id))
}

/// Percent-encode an id so it stays a single path segment.
fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_auth::testing::{error_response, refresh_response, TestHarness};
    use campus_auth::Method;
    use serde_json::json;

    fn api(h: &TestHarness) -> CampusApi {
        CampusApi::new(h.pipeline.clone())
    }

    fn events_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "events": [
                    { "id": "e-1", "title": "Hack Night", "date": "2025-03-14", "time": "18:00",
                      "location": "Lab 3", "category": "Technical", "registeredCount": 12 }
                ],
                "pagination": { "currentPage": 1, "totalPages": 4 }
            }
        })
    }

    fn notifications_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "notifications": [
                    { "id": "n-1", "title": "Reminder", "message": "Hack Night starts at 18:00",
                      "type": "event_reminder", "priority": "medium", "isRead": false }
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_list_events_sends_filters() {
        let h = TestHarness::with_tokens("access-1", "refresh-1");
        h.transport.respond(200, events_body());

        let filters = EventFilters {
            page: Some(2),
            limit: Some(12),
            query: Some("hack".to_string()),
            ..EventFilters::default()
        };
        let page = api(&h).list_events(&filters).await.unwrap();

        assert_eq!(page.events[0].title, "Hack Night");
        assert_eq!(page.pagination.total_pages, 4);

        let request = &h.transport.requests()[0];
        assert_eq!(request.path, "/events");
        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "12".to_string()),
                ("q".to_string(), "hack".to_string()),
            ]
        );
        assert_eq!(request.bearer.as_deref(), Some("access-1"));
    }

    #[tokio::test]
    async fn test_event_registration_calls() {
        let h = TestHarness::with_tokens("access-1", "refresh-1");
        h.transport
            .respond(200, json!({ "success": true, "message": "Registered successfully" }))
            .respond(200, json!({ "success": true, "message": "Unregistered" }));

        let ack = api(&h).register_for_event("e-1").await.unwrap();
        assert_eq!(ack.message.as_deref(), Some("Registered successfully"));
        api(&h).unregister_from_event("e-1").await.unwrap();

        assert_eq!(
            h.transport.calls(),
            vec!["POST /events/e-1/register", "DELETE /events/e-1/register"]
        );
    }

    #[tokio::test]
    async fn test_notification_calls() {
        let h = TestHarness::with_tokens("access-1", "refresh-1");
        h.transport
            .respond(200, notifications_body())
            .respond(200, json!({ "success": true }))
            .respond(200, json!({ "success": true }))
            .respond(200, json!({ "success": true }));

        let filters = NotificationFilters {
            read: Some(true),
            ..NotificationFilters::default()
        };
        let page = api(&h).list_notifications(&filters).await.unwrap();
        assert_eq!(page.notifications[0].kind, "event_reminder");

        api(&h).mark_notification_read("n-1").await.unwrap();
        api(&h).mark_all_notifications_read().await.unwrap();
        api(&h).delete_notification("n-1").await.unwrap();

        assert_eq!(
            h.transport.calls(),
            vec![
                "GET /notifications",
                "PUT /notifications/n-1/read",
                "PUT /notifications/mark-all-read",
                "DELETE /notifications/n-1",
            ]
        );
        assert_eq!(
            h.transport.requests()[0].query,
            vec![("isRead".to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_dashboard_fetches_panels_in_order() {
        let h = TestHarness::with_tokens("access-1", "refresh-1");
        h.transport
            .respond(200, events_body())
            .respond(200, notifications_body())
            .respond(
                200,
                json!({ "success": true, "data": { "totalEvents": 30, "registeredEvents": 2,
                        "upcomingEvents": 1, "notifications": 4 } }),
            );

        let dashboard = api(&h).dashboard().await.unwrap();

        assert_eq!(dashboard.upcoming_events.len(), 1);
        assert_eq!(dashboard.recent_notifications.len(), 1);
        assert_eq!(dashboard.stats.notifications, 4);

        let requests = h.transport.requests();
        assert_eq!(
            requests.iter().map(|r| r.path.as_str()).collect::<Vec<_>>(),
            vec!["/events", "/notifications", "/users/stats"]
        );
        assert_eq!(
            requests[0].query,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("sort".to_string(), "date".to_string()),
                ("order".to_string(), "asc".to_string()),
            ]
        );
        assert_eq!(
            requests[1].query,
            vec![("limit".to_string(), "5".to_string())]
        );
    }

    #[tokio::test]
    async fn test_dashboard_stops_at_first_failure() {
        let h = TestHarness::with_tokens("access-1", "refresh-1");
        h.transport
            .respond(200, events_body())
            .respond(500, error_response("Database unavailable"));

        let err = api(&h).dashboard().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(h.transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_resource_calls_refresh_transparently() {
        let h = TestHarness::with_tokens("stale", "refresh-1");
        h.transport
            .respond(401, error_response("Token expired"))
            .respond(200, refresh_response("fresh"))
            .respond(200, json!({ "success": true, "data": { "totalEvents": 1 } }));

        let stats = api(&h).user_stats().await.unwrap();
        assert_eq!(stats.total_events, 1);

        let requests = h.transport.requests();
        assert_eq!(requests[2].method, Method::Get);
        assert_eq!(requests[2].bearer.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(encode_segment("abc-123"), "abc-123");
        assert_eq!(encode_segment("../admin"), "..%2Fadmin");
        assert_eq!(encode_segment("a b?c"), "a%20b%3Fc");
        assert_eq!(encode_segment("n#1"), "n%231");
    }

    #[tokio::test]
    async fn test_hostile_ids_stay_in_one_segment() {
        let h = TestHarness::with_tokens("access-1", "refresh-1");
        h.transport
            .respond(200, json!({ "success": true }))
            .respond(200, json!({ "success": true }));

        api(&h).register_for_event("../users/stats").await.unwrap();
        api(&h).delete_notification("n 1/read").await.unwrap();

        assert_eq!(
            h.transport.calls(),
            vec![
                "POST /events/..%2Fusers%2Fstats/register",
                "DELETE /notifications/n%201%2Fread",
            ]
        );
    }
}
