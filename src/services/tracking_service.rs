//! Ingest and management of tracking events.

use actix_web::web;
use validator::Validate;

use crate::db::Store;
use crate::errors::Result;
use crate::models::tracking_event::TrackingEvent;
use crate::structs::track_request::{TrackPayload, TrackResponse};

#[derive(Clone)]
pub struct TrackingService {
    store: Store,
}

impl TrackingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Persists one visit stamped with the observed address and the current time.
    ///
    /// The redirect target comes from the stored link named by `shortCode`;
    /// the client-reported `originalUrl` is ignored.
    pub async fn record_event(
        &self,
        payload: TrackPayload,
        observed_ip: String,
    ) -> Result<TrackResponse> {
        payload.validate()?;

        let store = self.store.clone();
        let response = web::block(move || -> Result<TrackResponse> {
            let link = match payload.short_code.as_deref() {
                Some(code) => store.find_link_by_code(code)?,
                None => None,
            };

            let event = TrackingEvent::new(
                payload,
                observed_ip,
                link.as_ref().map(|l| l.short_code.clone()),
            );
            store.insert_event(&event)?;

            log::info!(
                "Recorded tracking event {} from {} for {}",
                event.id,
                event.ip,
                event.short_code.as_deref().unwrap_or("unknown link")
            );

            Ok(TrackResponse {
                success: true,
                redirect: link.map(|l| l.original_url),
            })
        })
        .await??;

        Ok(response)
    }

    pub async fn list_events(&self) -> Result<Vec<TrackingEvent>> {
        let store = self.store.clone();
        Ok(web::block(move || store.list_events_by_time_desc()).await??)
    }

    /// Deleting an unknown id is not an error.
    pub async fn delete_event(&self, id: String) -> Result<()> {
        let store = self.store.clone();
        let deleted = web::block(move || store.delete_event(&id)).await??;
        log::info!("Deleted {} tracking event(s)", deleted);
        Ok(())
    }

    pub async fn delete_all_events(&self) -> Result<()> {
        let store = self.store.clone();
        let deleted = web::block(move || store.delete_all_events()).await??;
        log::info!("Cleared all tracking events ({} removed)", deleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::link::Link;
    use tempfile::TempDir;

    fn service() -> (TempDir, Store, TrackingService) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("events.db")).unwrap();
        (dir, store.clone(), TrackingService::new(store))
    }

    #[actix_web::test]
    async fn redirect_comes_from_the_stored_link() {
        let (_dir, store, service) = service();
        store
            .insert_link(&Link::new("https://real.example".into(), "abcd1234".into()))
            .unwrap();

        let payload = TrackPayload {
            short_code: Some("abcd1234".to_string()),
            original_url: Some("https://evil.example".to_string()),
            browser: Some("Firefox".to_string()),
            ..Default::default()
        };
        let response = service
            .record_event(payload, "203.0.113.7".to_string())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.redirect.as_deref(), Some("https://real.example"));

        let events = service.list_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].ip, "203.0.113.7");
        assert_eq!(events[0].browser.as_deref(), Some("Firefox"));
        assert_eq!(events[0].short_code.as_deref(), Some("abcd1234"));
    }

    #[actix_web::test]
    async fn unknown_code_is_stored_without_redirect() {
        let (_dir, _store, service) = service();
        let payload = TrackPayload {
            short_code: Some("missing1".to_string()),
            original_url: Some("https://evil.example".to_string()),
            ..Default::default()
        };

        let response = service
            .record_event(payload, "198.51.100.2".to_string())
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.redirect, None);

        let events = service.list_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].short_code, None);
    }

    #[actix_web::test]
    async fn oversized_fields_are_rejected() {
        let (_dir, _store, service) = service();
        let payload = TrackPayload {
            user_agent: Some("x".repeat(5000)),
            ..Default::default()
        };

        let err = service
            .record_event(payload, "127.0.0.1".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list_events().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn deletes_are_idempotent_and_bulk_clears() {
        let (_dir, _store, service) = service();
        for _ in 0..3 {
            service
                .record_event(TrackPayload::default(), "127.0.0.1".to_string())
                .await
                .unwrap();
        }

        let events = service.list_events().await.unwrap();
        let target = events[1].id.clone();

        service.delete_event(target.clone()).await.unwrap();
        service.delete_event(target.clone()).await.unwrap();

        let remaining = service.list_events().await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|e| e.id != target));

        service.delete_all_events().await.unwrap();
        assert!(service.list_events().await.unwrap().is_empty());
    }
}
