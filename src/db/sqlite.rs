//! SQLite-backed table store.
//!
//! Every operation opens its own connection, runs a single statement and drops
//! the connection before returning. Concurrent writers are serialized by
//! SQLite's file locking.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;
use crate::models::link::Link;
use crate::models::tracking_event::TrackingEvent;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS links (
        id           TEXT PRIMARY KEY,
        original_url TEXT NOT NULL,
        short_code   TEXT NOT NULL UNIQUE,
        created_at   INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tracking_events (
        id                TEXT PRIMARY KEY,
        short_code        TEXT,
        ip                TEXT NOT NULL,
        user_agent        TEXT,
        screen_resolution TEXT,
        language          TEXT,
        os                TEXT,
        browser           TEXT,
        location          TEXT,
        fingerprint       TEXT,
        referrer          TEXT,
        timestamp         INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_tracking_events_timestamp
        ON tracking_events(timestamp);
"#;

const EVENT_COLUMNS: &str = "id, short_code, ip, user_agent, screen_resolution, language, os, \
                             browser, location, fingerprint, referrer, timestamp";

#[derive(Clone, Debug)]
pub struct Store {
    path: Arc<PathBuf>,
}

impl Store {
    /// Points the store at `path` and creates the tables if they are missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: Arc::new(path.as_ref().to_path_buf()),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(self.path.as_path())?)
    }

    pub fn ping(&self) -> Result<()> {
        self.connect()?.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    // ============================================
    // Links
    // ============================================

    /// Inserts `link`. Returns `false` without writing when its short code is taken.
    pub fn insert_link(&self, link: &Link) -> Result<bool> {
        let changed = self.connect()?.execute(
            "INSERT INTO links (id, original_url, short_code, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT DO NOTHING",
            params![link.id, link.original_url, link.short_code, link.created_at],
        )?;
        Ok(changed == 1)
    }

    pub fn find_link_by_code(&self, short_code: &str) -> Result<Option<Link>> {
        let link = self
            .connect()?
            .query_row(
                "SELECT id, original_url, short_code, created_at
                 FROM links WHERE short_code = ?1",
                params![short_code],
                |row| {
                    Ok(Link {
                        id: row.get(0)?,
                        original_url: row.get(1)?,
                        short_code: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(link)
    }

    pub fn count_links(&self) -> Result<i64> {
        let count = self
            .connect()?
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count)
    }

    // ============================================
    // Tracking events
    // ============================================

    pub fn insert_event(&self, event: &TrackingEvent) -> Result<()> {
        self.connect()?.execute(
            &format!(
                "INSERT INTO tracking_events ({EVENT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            params![
                event.id,
                event.short_code,
                event.ip,
                event.user_agent,
                event.screen_resolution,
                event.language,
                event.os,
                event.browser,
                event.location,
                event.fingerprint,
                event.referrer,
                event.timestamp,
            ],
        )?;
        Ok(())
    }

    /// Newest first. Rows sharing a timestamp keep reverse insertion order.
    pub fn list_events_by_time_desc(&self) -> Result<Vec<TrackingEvent>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM tracking_events
             ORDER BY timestamp DESC, rowid DESC"
        ))?;
        let events = stmt
            .query_map([], event_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Deletes one event. Returns how many rows went away (0 for an unknown id).
    pub fn delete_event(&self, id: &str) -> Result<usize> {
        let deleted = self
            .connect()?
            .execute("DELETE FROM tracking_events WHERE id = ?1", params![id])?;
        Ok(deleted)
    }

    pub fn delete_all_events(&self) -> Result<usize> {
        let deleted = self.connect()?.execute("DELETE FROM tracking_events", [])?;
        Ok(deleted)
    }
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<TrackingEvent> {
    Ok(TrackingEvent {
        id: row.get(0)?,
        short_code: row.get(1)?,
        ip: row.get(2)?,
        user_agent: row.get(3)?,
        screen_resolution: row.get(4)?,
        language: row.get(5)?,
        os: row.get(6)?,
        browser: row.get(7)?,
        location: row.get(8)?,
        fingerprint: row.get(9)?,
        referrer: row.get(10)?,
        timestamp: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::track_request::TrackPayload;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("tracking.db")).unwrap();
        (dir, store)
    }

    fn event_at(id: &str, timestamp: i64) -> TrackingEvent {
        let payload = TrackPayload {
            user_agent: Some("Mozilla/5.0".to_string()),
            language: Some("en-US".to_string()),
            ..Default::default()
        };
        let mut event = TrackingEvent::new(payload, "10.0.0.1".to_string(), None);
        event.id = id.to_string();
        event.timestamp = timestamp;
        event
    }

    #[test]
    fn open_is_idempotent() {
        let (dir, store) = temp_store();
        store
            .insert_link(&Link::new("https://example.com".into(), "abcd1234".into()))
            .unwrap();

        let reopened = Store::open(dir.path().join("tracking.db")).unwrap();
        assert_eq!(reopened.count_links().unwrap(), 1);
    }

    #[test]
    fn link_round_trips_by_code() {
        let (_dir, store) = temp_store();
        let link = Link::new("https://example.com/page".into(), "abcd1234".into());

        assert!(store.insert_link(&link).unwrap());
        assert_eq!(store.find_link_by_code("abcd1234").unwrap(), Some(link));
        assert_eq!(store.find_link_by_code("missing1").unwrap(), None);
    }

    #[test]
    fn duplicate_code_is_not_written() {
        let (_dir, store) = temp_store();
        let first = Link::new("https://one.example".into(), "samecode".into());
        let second = Link::new("https://two.example".into(), "samecode".into());

        assert!(store.insert_link(&first).unwrap());
        assert!(!store.insert_link(&second).unwrap());
        assert_eq!(store.count_links().unwrap(), 1);
        assert_eq!(
            store.find_link_by_code("samecode").unwrap().unwrap().original_url,
            "https://one.example"
        );
    }

    #[test]
    fn events_list_newest_first() {
        let (_dir, store) = temp_store();
        store.insert_event(&event_at("e1", 1_000)).unwrap();
        store.insert_event(&event_at("e2", 2_000)).unwrap();
        store.insert_event(&event_at("e3", 3_000)).unwrap();

        let ids: Vec<String> = store
            .list_events_by_time_desc()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e3", "e2", "e1"]);
    }

    #[test]
    fn same_millisecond_events_keep_insertion_order_reversed() {
        let (_dir, store) = temp_store();
        for id in ["e1", "e2", "e3"] {
            store.insert_event(&event_at(id, 5_000)).unwrap();
        }

        let ids: Vec<String> = store
            .list_events_by_time_desc()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e3", "e2", "e1"]);
    }

    #[test]
    fn event_fields_are_stored_verbatim() {
        let (_dir, store) = temp_store();
        let mut event = event_at("e1", 1_000);
        event.referrer = Some("<script>alert(1)</script>".to_string());
        event.short_code = Some("abcd1234".to_string());
        store.insert_event(&event).unwrap();

        assert_eq!(store.list_events_by_time_desc().unwrap(), vec![event]);
    }

    #[test]
    fn delete_event_is_idempotent() {
        let (_dir, store) = temp_store();
        store.insert_event(&event_at("e1", 1_000)).unwrap();
        store.insert_event(&event_at("e2", 2_000)).unwrap();

        assert_eq!(store.delete_event("e1").unwrap(), 1);
        assert_eq!(store.delete_event("e1").unwrap(), 0);

        let remaining = store.list_events_by_time_desc().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "e2");
    }

    #[test]
    fn delete_all_clears_events_only() {
        let (_dir, store) = temp_store();
        store
            .insert_link(&Link::new("https://example.com".into(), "abcd1234".into()))
            .unwrap();
        store.insert_event(&event_at("e1", 1_000)).unwrap();
        store.insert_event(&event_at("e2", 2_000)).unwrap();

        assert_eq!(store.delete_all_events().unwrap(), 2);
        assert!(store.list_events_by_time_desc().unwrap().is_empty());
        assert_eq!(store.count_links().unwrap(), 1);
    }

    #[test]
    fn ping_succeeds_on_open_store() {
        let (_dir, store) = temp_store();
        store.ping().unwrap();
    }
}
