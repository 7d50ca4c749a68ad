use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use super::event::{Event, EventInput, EventRecord, EventView, DEFAULT_DATETIME_FORMAT};
use super::refresh::{RefreshTimer, REFRESH_INTERVAL};
use crate::error::CollectionError;
use crate::io::storage::Storage;

/// Storage slot holding the event list.
pub const STORAGE_KEY: &str = "Events.events";

/// Ordered set of all events; the single source of truth, persisted on every
/// mutation.
pub struct EventCollection {
    events: Vec<Event>,
    storage: Option<Box<dyn Storage>>,
    timer: Option<RefreshTimer>,
    datetime_format: String,
}

impl EventCollection {
    /// Load the persisted list, or start empty. A corrupt slot is discarded.
    pub fn new(storage: Option<Box<dyn Storage>>) -> Self {
        Self::with_format(storage, DEFAULT_DATETIME_FORMAT)
    }

    pub fn with_format(storage: Option<Box<dyn Storage>>, datetime_format: impl Into<String>) -> Self {
        let mut collection = Self {
            events: Vec::new(),
            storage,
            timer: None,
            datetime_format: datetime_format.into(),
        };
        if let Some(records) = collection.read_persisted() {
            collection.load_from_records(records.into_iter().map(EventInput::from));
        }
        collection
    }

    fn read_persisted(&mut self) -> Option<Vec<EventRecord>> {
        let storage = self.storage.as_mut()?;
        let raw = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved events");
                return None;
            }
        };
        match serde_json::from_str::<Vec<EventRecord>>(&raw) {
            Ok(records) => {
                tracing::info!(count = records.len(), "Loaded saved events");
                Some(records)
            }
            Err(e) => {
                tracing::warn!(error = %e, data = %raw, "Corrupt saved data, discarding");
                if let Err(e) = storage.remove(STORAGE_KEY) {
                    tracing::warn!(error = %e, "Could not remove corrupt saved data");
                }
                None
            }
        }
    }

    /// Recompute every event's countdown text, in order.
    pub fn refresh_all(&mut self) {
        self.refresh_all_at(Utc::now());
    }

    pub fn refresh_all_at(&mut self, now: DateTime<Utc>) {
        for event in &mut self.events {
            event.refresh_at(now);
        }
    }

    /// Write the list to storage. Without storage this does nothing.
    pub fn save(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let records: Vec<EventRecord> = self.events.iter().map(Event::to_record).collect();
        let json = match serde_json::to_string(&records) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize events");
                return;
            }
        };
        match storage.set(STORAGE_KEY, &json) {
            Ok(()) => tracing::debug!(count = records.len(), "Saved events"),
            Err(e) => tracing::warn!(error = %e, "Could not save events"),
        }
    }

    fn create_event(&self, input: EventInput) -> Event {
        Event::new(EventView::new(self.datetime_format.clone()), input)
    }

    /// Append a new event built from `input` and persist.
    pub fn add_new(&mut self, input: EventInput) -> &mut Event {
        let event = self.create_event(input);
        self.events.push(event);
        self.save();
        let last = self.events.len() - 1;
        &mut self.events[last]
    }

    /// Position of `event` if it is owned by this collection.
    pub fn index_of(&self, event: &Event) -> Option<usize> {
        self.events.iter().position(|e| std::ptr::eq(e, event))
    }

    /// Remove and return the event at `index`, then persist. Selection held
    /// elsewhere is the caller's to clear.
    pub fn remove_at(&mut self, index: usize) -> Result<Event, CollectionError> {
        self.check_index(index)?;
        let event = self.events.remove(index);
        self.save();
        Ok(event)
    }

    /// Overwrite the event at `index` from `input`, then persist.
    pub fn update_at(&mut self, index: usize, input: EventInput) -> Result<&mut Event, CollectionError> {
        self.check_index(index)?;
        self.events[index].load_from_input(input);
        self.save();
        Ok(&mut self.events[index])
    }

    fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        if index < self.events.len() {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.events.len(),
            })
        }
    }

    pub fn to_records(&self) -> Vec<EventRecord> {
        self.events.iter().map(Event::to_record).collect()
    }

    /// Replace every event, rebuilding each view from scratch, and persist.
    pub fn load_from_records<I>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = EventInput>,
    {
        self.events.clear();
        let rebuilt: Vec<Event> = inputs.into_iter().map(|input| self.create_event(input)).collect();
        self.events = rebuilt;
        self.save();
    }

    /// Start the one-second countdown refresh. No-op if already running.
    pub fn start_refreshing(&mut self) {
        self.start_refreshing_at(Instant::now());
    }

    pub fn start_refreshing_at(&mut self, now: Instant) {
        if self.timer.is_none() {
            self.timer = Some(RefreshTimer::new(REFRESH_INTERVAL, now));
        }
    }

    /// Safe to call repeatedly or when never started.
    pub fn stop_refreshing(&mut self) {
        self.timer = None;
    }

    pub fn is_refreshing(&self) -> bool {
        self.timer.is_some()
    }

    /// Drive the refresh timer. Returns true if the events were refreshed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let fired = self.timer.as_mut().is_some_and(|timer| timer.tick(now));
        if fired {
            self.refresh_all();
        }
        fired
    }

    /// Time until the next refresh, or `None` while stopped.
    pub fn until_next_refresh(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().map(|timer| timer.until_due(now))
    }

    /// First event with the smallest start.
    pub fn earliest_starting(&self) -> Option<&Event> {
        self.events.iter().fold(None, |best: Option<&Event>, event| match best {
            Some(b) if event.start() >= b.start() => Some(b),
            _ => Some(event),
        })
    }

    /// First event with the largest end.
    pub fn latest_ending(&self) -> Option<&Event> {
        self.events.iter().fold(None, |best: Option<&Event>, event| match best {
            Some(b) if event.end() <= b.end() => Some(b),
            _ => Some(event),
        })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.events.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn storage(&self) -> Option<&dyn Storage> {
        self.storage.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::event::TimeValue;

    fn input(name: &str, start: i64, end: i64) -> EventInput {
        EventInput::new(name, TimeValue::EpochMs(start), TimeValue::EpochMs(end))
    }

    fn memory_collection() -> EventCollection {
        EventCollection::new(Some(Box::new(MemoryStorage::new())))
    }

    fn stored(collection: &EventCollection) -> Option<String> {
        collection.storage().unwrap().get(STORAGE_KEY).unwrap()
    }

    fn names(collection: &EventCollection) -> Vec<&str> {
        collection.iter().map(Event::name).collect()
    }

    #[test]
    fn test_empty_storage_starts_empty() {
        let collection = memory_collection();
        assert!(collection.is_empty());
        assert!(stored(&collection).is_none());
    }

    #[test]
    fn test_add_persists() {
        let mut collection = memory_collection();
        let event = collection.add_new(input("a", 1, 2));
        assert_eq!(event.name(), "a");
        assert_eq!(
            stored(&collection).as_deref(),
            Some(r#"[{"name":"a","start":1,"end":2}]"#)
        );
    }

    #[test]
    fn test_loads_from_storage() {
        let mut storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY, r#"[{"name":"x","start":10,"end":20},{"name":"y","start":5,"end":6}]"#)
            .unwrap();
        let collection = EventCollection::new(Some(Box::new(storage)));
        assert_eq!(names(&collection), vec!["x", "y"]);
        assert_eq!(collection.get(1).unwrap().to_record().start, 5);
    }

    #[test]
    fn test_corrupt_storage_is_discarded() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "{not valid json").unwrap();
        let collection = EventCollection::new(Some(Box::new(storage)));
        assert!(collection.is_empty());
        assert!(stored(&collection).is_none());
    }

    #[test]
    fn test_wrong_shape_is_discarded() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, r#"{"name":"not an array"}"#).unwrap();
        let collection = EventCollection::new(Some(Box::new(storage)));
        assert!(collection.is_empty());
        assert!(stored(&collection).is_none());
    }

    #[test]
    fn test_without_storage_save_is_noop() {
        let mut collection = EventCollection::new(None);
        collection.add_new(input("a", 1, 2));
        collection.save();
        assert_eq!(collection.len(), 1);
        assert!(collection.storage().is_none());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut collection = memory_collection();
        collection.add_new(input("first", 300, 400));
        collection.add_new(input("second", 100, 900));
        collection.add_new(input("", -50, -10));
        let records = collection.to_records();

        collection.load_from_records(records.clone().into_iter().map(EventInput::from));
        assert_eq!(collection.to_records(), records);

        // A fresh collection over the same storage sees the same triples
        let stored_json = stored(&collection).unwrap();
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, &stored_json).unwrap();
        let reloaded = EventCollection::new(Some(Box::new(storage)));
        assert_eq!(reloaded.to_records(), records);
    }

    #[test]
    fn test_load_from_records_replaces_and_persists() {
        let mut collection = memory_collection();
        collection.add_new(input("old", 1, 2));
        collection.load_from_records(vec![input("new", 3, 4)]);
        assert_eq!(names(&collection), vec!["new"]);
        assert_eq!(
            stored(&collection).as_deref(),
            Some(r#"[{"name":"new","start":3,"end":4}]"#)
        );
        assert!(collection.get(0).unwrap().view().is_selectable());
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut collection = memory_collection();
        collection.add_new(input("a", 1, 2));
        collection.add_new(input("b", 3, 4));
        collection.add_new(input("c", 5, 6));

        let removed = collection.remove_at(1).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(names(&collection), vec!["a", "c"]);
        assert_eq!(collection.get(1).unwrap().name(), "c");
        assert_eq!(collection.to_records().len(), 2);
        assert!(stored(&collection).unwrap().contains("\"c\""));
        assert!(!stored(&collection).unwrap().contains("\"b\""));
    }

    #[test]
    fn test_remove_out_of_range_is_reported() {
        let mut collection = memory_collection();
        collection.add_new(input("a", 1, 2));
        assert_eq!(
            collection.remove_at(1).unwrap_err(),
            CollectionError::IndexOutOfRange { index: 1, len: 1 }
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_update_at_persists() {
        let mut collection = memory_collection();
        collection.add_new(input("a", 1, 2));
        collection.update_at(0, input("renamed", 7, 8)).unwrap();
        assert_eq!(
            stored(&collection).as_deref(),
            Some(r#"[{"name":"renamed","start":7,"end":8}]"#)
        );
        assert!(collection.update_at(3, input("x", 0, 0)).is_err());
    }

    #[test]
    fn test_index_of_owned_and_foreign() {
        let mut collection = memory_collection();
        collection.add_new(input("a", 1, 2));
        collection.add_new(input("b", 3, 4));
        let second = collection.get(1).unwrap();
        assert_eq!(collection.index_of(second), Some(1));

        let foreign = Event::new(EventView::default(), input("b", 3, 4));
        assert_eq!(collection.index_of(&foreign), None);
    }

    #[test]
    fn test_extrema() {
        let mut collection = memory_collection();
        collection.add_new(input("a", 100, 150));
        collection.add_new(input("b", 50, 400));
        collection.add_new(input("c", 200, 250));
        assert_eq!(collection.earliest_starting().unwrap().name(), "b");
        assert_eq!(collection.latest_ending().unwrap().name(), "b");
    }

    #[test]
    fn test_extrema_ties_keep_first() {
        let mut collection = memory_collection();
        collection.add_new(input("first", 50, 500));
        collection.add_new(input("second", 50, 500));
        assert_eq!(collection.earliest_starting().unwrap().name(), "first");
        assert_eq!(collection.latest_ending().unwrap().name(), "first");
    }

    #[test]
    fn test_extrema_empty() {
        let collection = memory_collection();
        assert!(collection.earliest_starting().is_none());
        assert!(collection.latest_ending().is_none());
    }

    #[test]
    fn test_start_refreshing_is_idempotent() {
        let mut collection = memory_collection();
        let t0 = Instant::now();
        collection.start_refreshing_at(t0);
        collection.start_refreshing_at(t0 + Duration::from_millis(500));
        assert!(collection.is_refreshing());
        // Second start did not reset the schedule
        assert_eq!(collection.until_next_refresh(t0), Some(REFRESH_INTERVAL));
        assert!(collection.tick(t0 + REFRESH_INTERVAL));
    }

    #[test]
    fn test_stop_refreshing_is_idempotent() {
        let mut collection = memory_collection();
        collection.stop_refreshing();
        assert!(!collection.is_refreshing());
        collection.start_refreshing();
        collection.stop_refreshing();
        collection.stop_refreshing();
        assert!(!collection.is_refreshing());
        assert!(!collection.tick(Instant::now() + Duration::from_secs(5)));
        assert_eq!(collection.until_next_refresh(Instant::now()), None);
    }

    #[test]
    fn test_refresh_all_rewrites_countdowns() {
        let mut collection = memory_collection();
        collection.add_new(input("a", 120_000, 130_000));
        collection.add_new(input("b", 0, 10));
        collection.refresh_all_at(DateTime::from_timestamp_millis(60_000).unwrap());
        assert_eq!(collection.get(0).unwrap().view().remaining_text(), "in 1 minute");
        assert_eq!(collection.get(1).unwrap().view().remaining_text(), "1 minute ago");
    }
}
