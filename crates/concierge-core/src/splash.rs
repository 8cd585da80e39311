//! First-run beta splash
//!
//! Shown once: the document is fetched only while the dismissal flag is
//! absent, and dismissing it persists the flag.

use tracing::{debug, warn};

use crate::api::ConciergeApi;
use crate::store::{StateStore, StoreError};

pub const SPLASH_DISMISSED_KEY: &str = "betaSplashDismissed";

pub fn is_dismissed(store: &dyn StateStore) -> bool {
    store.get(SPLASH_DISMISSED_KEY).as_deref() == Some("true")
}

/// Splash markdown to show, or `None` if dismissed or unavailable.
///
/// A failed fetch shows nothing and leaves the flag unset, so the splash is
/// tried again on the next launch.
pub async fn pending(api: &dyn ConciergeApi, store: &dyn StateStore) -> Option<String> {
    if is_dismissed(store) {
        debug!("Splash already dismissed");
        return None;
    }

    match api.fetch_splash().await {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            debug!("Splash document is empty");
            None
        }
        Err(e) => {
            warn!("Failed to load splash document: {}", e);
            None
        }
    }
}

pub fn dismiss(store: &dyn StateStore) -> Result<(), StoreError> {
    store.set(SPLASH_DISMISSED_KEY, "true")
}

/// Forget the dismissal so the splash shows again
pub fn reset(store: &dyn StateStore) -> Result<(), StoreError> {
    store.remove(SPLASH_DISMISSED_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpConciergeClient;
    use crate::store::MemoryStateStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_splash_shown_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beta.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Beta notice"))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpConciergeClient::new(&server.uri(), None).unwrap();
        let store = MemoryStateStore::new();

        assert_eq!(
            pending(&api, &store).await.as_deref(),
            Some("# Beta notice")
        );
        dismiss(&store).unwrap();
        assert_eq!(store.get(SPLASH_DISMISSED_KEY).as_deref(), Some("true"));

        // No second fetch once dismissed
        assert_eq!(pending(&api, &store).await, None);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_flag_unset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beta.md"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = HttpConciergeClient::new(&server.uri(), None).unwrap();
        let store = MemoryStateStore::new();

        assert_eq!(pending(&api, &store).await, None);
        assert!(!is_dismissed(&store));
    }

    #[test]
    fn test_reset_clears_flag() {
        let store = MemoryStateStore::new();
        dismiss(&store).unwrap();
        assert!(is_dismissed(&store));
        reset(&store).unwrap();
        assert!(!is_dismissed(&store));
    }
}
