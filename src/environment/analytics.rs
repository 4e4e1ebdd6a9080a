use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;
use strum_macros::{Display, IntoStaticStr};
use url::Url;

#[derive(Serialize, IntoStaticStr, Display, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    PostCreated,
    EntrySubmitted,
    ContributionMade,
    LikeAdded,
    ShareClicked,
    ErrorOccurred,
    PageView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub event_type: EventType,
    pub event_data: Value,
    pub user_id: Option<String>,
    pub page_url: Option<String>,
}

impl AnalyticsEvent {
    pub fn new(event_type: EventType, event_data: Value, user_id: Option<String>) -> Self {
        Self {
            event_type,
            event_data,
            user_id,
            page_url: None,
        }
    }

    /// The page the user was on when the event happened
    pub fn with_page_url(mut self, page_url: Option<String>) -> Self {
        self.page_url = page_url;
        self
    }
}

/// Best effort event delivery. Implementations must not block and must
/// swallow their own failures.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        log::trace!("analytics disabled, dropping {}", event.event_type);
    }
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn event_types(&self) -> Vec<EventType> {
        self.events().iter().map(|e| e.event_type).collect()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBody<'a> {
    event_type: EventType,
    event_data: &'a Value,
    page_url: Option<&'a str>,
}

/// Posts events to the analytics endpoint of the API
#[derive(Debug, Clone)]
pub struct HttpAnalytics {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpAnalytics {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub async fn deliver(&self, event: &AnalyticsEvent) -> Result<(), String> {
        let body = EventBody {
            event_type: event.event_type,
            event_data: &event.event_data,
            page_url: event.page_url.as_deref(),
        };
        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(ref user_id) = event.user_id {
            request = request.header("x-user-id", user_id);
        }
        request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map(|_| ())
            .map_err(|e| format!("Event tracking failed: {e:?}"))
    }
}

impl AnalyticsSink for HttpAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("no runtime, dropping {} event", event.event_type);
            return;
        };
        let sink = self.clone();
        runtime.spawn(async move {
            if let Err(e) = sink.deliver(&event).await {
                log::debug!("{e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_snake_case() {
        assert_eq!(EventType::ShareClicked.to_string(), "share_clicked");
        let name: &'static str = EventType::PageView.into();
        assert_eq!(name, "page_view");
        assert_eq!(
            serde_json::to_value(EventType::LikeAdded).unwrap(),
            Value::String("like_added".to_string())
        );
    }

    #[test]
    fn body_shape() {
        let event = AnalyticsEvent::new(
            EventType::PostCreated,
            serde_json::json!({"postId": "p1"}),
            Some("user-1".to_string()),
        );
        let body = EventBody {
            event_type: event.event_type,
            event_data: &event.event_data,
            page_url: Some("/feed"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "eventType": "post_created",
                "eventData": {"postId": "p1"},
                "pageUrl": "/feed"
            })
        );
    }

    #[test]
    fn http_sink_without_runtime_does_not_panic() {
        let sink = HttpAnalytics::new(Url::parse("http://127.0.0.1:9/api/analytics/events").unwrap());
        sink.track(AnalyticsEvent::new(EventType::PageView, Value::Null, None));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_swallowed() {
        let sink = HttpAnalytics::new(Url::parse("http://127.0.0.1:9/api/analytics/events").unwrap());
        assert!(sink
            .deliver(&AnalyticsEvent::new(EventType::PageView, Value::Null, None))
            .await
            .is_err());
        sink.track(AnalyticsEvent::new(EventType::PageView, Value::Null, None));
    }
}
