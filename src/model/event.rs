use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::duration::{human_duration, ONE_SECOND_MS};

/// Default format for start/end cells in the event table.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether chrono can render `format` without a formatting error.
pub fn is_valid_datetime_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// A point in time as it may appear in an event record: either an absolute
/// instant (RFC 3339 in JSON) or milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    EpochMs(i64),
    Instant(DateTime<Utc>),
}

impl TimeValue {
    /// Whether this value names an instant chrono can represent.
    pub fn is_representable(self) -> bool {
        match self {
            TimeValue::Instant(_) => true,
            TimeValue::EpochMs(ms) => DateTime::from_timestamp_millis(ms).is_some(),
        }
    }

    /// Resolve to an instant; epoch values chrono cannot represent become `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeValue::Instant(instant) => instant,
            TimeValue::EpochMs(ms) => DateTime::from_timestamp_millis(ms).unwrap_or_else(|| {
                tracing::warn!(ms, "Epoch time out of range, using now");
                now
            }),
        }
    }
}

impl From<DateTime<Utc>> for TimeValue {
    fn from(instant: DateTime<Utc>) -> Self {
        TimeValue::Instant(instant)
    }
}

/// Loose description of an event, as entered in a dialog or imported JSON.
/// Missing fields fall back to an empty name and the current time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<TimeValue>,
    #[serde(default)]
    pub end: Option<TimeValue>,
}

impl EventInput {
    pub fn new(name: impl Into<String>, start: impl Into<TimeValue>, end: impl Into<TimeValue>) -> Self {
        Self {
            name: Some(name.into()),
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

/// The persisted shape of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub name: String,
    /// Epoch milliseconds.
    pub start: i64,
    /// Epoch milliseconds.
    pub end: i64,
}

impl From<EventRecord> for EventInput {
    fn from(record: EventRecord) -> Self {
        Self {
            name: Some(record.name),
            start: Some(TimeValue::EpochMs(record.start)),
            end: Some(TimeValue::EpochMs(record.end)),
        }
    }
}

/// Display fragment for one event row. Holds the text the table shows and
/// the selection marker; the UI reads it, the owning [`Event`] writes it.
#[derive(Debug, Clone)]
pub struct EventView {
    datetime_format: String,
    name_text: String,
    start_text: String,
    end_text: String,
    remaining_text: String,
    selectable: bool,
    selected: bool,
}

impl Default for EventView {
    fn default() -> Self {
        Self::new(DEFAULT_DATETIME_FORMAT)
    }
}

impl EventView {
    pub fn new(datetime_format: impl Into<String>) -> Self {
        Self {
            datetime_format: datetime_format.into(),
            name_text: String::new(),
            start_text: String::new(),
            end_text: String::new(),
            remaining_text: String::new(),
            selectable: false,
            selected: false,
        }
    }

    pub fn name_text(&self) -> &str {
        &self.name_text
    }

    pub fn start_text(&self) -> &str {
        &self.start_text
    }

    pub fn end_text(&self) -> &str {
        &self.end_text
    }

    pub fn remaining_text(&self) -> &str {
        &self.remaining_text
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn format_instant(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&Local);
        let mut text = String::new();
        if write!(text, "{}", local.format(&self.datetime_format)).is_err() {
            text.clear();
            let _ = write!(text, "{}", local.format(DEFAULT_DATETIME_FORMAT));
        }
        text
    }
}

/// A named interval tracked by the widget, paired with its display fragment.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    view: EventView,
}

impl Event {
    /// Build an event into `view`, filling the view's text and tagging it selectable.
    pub fn new(view: EventView, input: EventInput) -> Self {
        Self::new_at(view, input, Utc::now())
    }

    /// Like [`Event::new`] with an explicit "now" for defaults and the countdown.
    pub fn new_at(mut view: EventView, input: EventInput, now: DateTime<Utc>) -> Self {
        let name = input.name.unwrap_or_default();
        let start = input.start.map_or(now, |t| t.resolve(now));
        let end = input.end.map_or(now, |t| t.resolve(now));

        view.name_text = name.clone();
        view.start_text = view.format_instant(start);
        view.end_text = view.format_instant(end);
        view.selectable = true;

        let mut event = Self {
            name,
            start,
            end,
            view,
        };
        event.refresh_at(now);
        event
    }

    /// Recompute the "time remaining" text against the wall clock.
    pub fn refresh(&mut self) {
        self.refresh_at(Utc::now());
    }

    pub fn refresh_at(&mut self, now: DateTime<Utc>) {
        let delta_ms = (self.start - now).num_milliseconds();
        self.view.remaining_text = human_duration(delta_ms, ONE_SECOND_MS);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn view(&self) -> &EventView {
        &self.view
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self.view.name_text = self.name.clone();
        self
    }

    /// Also refreshes the countdown, which is measured to the start.
    pub fn set_start(&mut self, start: DateTime<Utc>) -> &mut Self {
        self.start = start;
        self.view.start_text = self.view.format_instant(start);
        self.refresh();
        self
    }

    pub fn set_end(&mut self, end: DateTime<Utc>) -> &mut Self {
        self.end = end;
        self.view.end_text = self.view.format_instant(end);
        self
    }

    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            name: self.name.clone(),
            start: self.start.timestamp_millis(),
            end: self.end.timestamp_millis(),
        }
    }

    pub fn load_from_record(&mut self, record: &EventRecord) -> &mut Self {
        self.load_from_input(record.clone().into())
    }

    /// Apply every field of `input`; absent fields reset to empty / now.
    pub fn load_from_input(&mut self, input: EventInput) -> &mut Self {
        let now = Utc::now();
        self.set_name(input.name.unwrap_or_default())
            .set_start(input.start.map_or(now, |t| t.resolve(now)))
            .set_end(input.end.map_or(now, |t| t.resolve(now)))
    }

    pub fn select(&mut self) {
        self.view.selected = true;
    }

    pub fn deselect(&mut self) {
        self.view.selected = false;
    }

    pub fn is_selected(&self) -> bool {
        self.view.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_new_from_epoch_ms() {
        let now = at(1_000_000);
        let event = Event::new_at(
            EventView::default(),
            EventInput::new("Launch", TimeValue::EpochMs(1_060_000), TimeValue::EpochMs(2_000_000)),
            now,
        );
        assert_eq!(event.name(), "Launch");
        assert_eq!(event.start(), at(1_060_000));
        assert_eq!(event.end(), at(2_000_000));
        assert_eq!(event.view().name_text(), "Launch");
        assert_eq!(event.view().remaining_text(), "in 1 minute");
        assert!(event.view().is_selectable());
        assert!(!event.is_selected());
    }

    #[test]
    fn test_new_from_instant() {
        let now = at(0);
        let start = at(5_000);
        let event = Event::new_at(EventView::default(), EventInput::new("x", start, start), now);
        assert_eq!(event.start(), start);
        assert_eq!(event.end(), start);
    }

    #[test]
    fn test_missing_fields_default_to_now() {
        let now = at(42_000);
        let event = Event::new_at(EventView::default(), EventInput::default(), now);
        assert_eq!(event.name(), "");
        assert_eq!(event.start(), now);
        assert_eq!(event.end(), now);
        assert_eq!(event.view().remaining_text(), "now");
    }

    #[test]
    fn test_refresh_updates_only_remaining_text() {
        let event_start = at(10 * 60_000);
        let mut event = Event::new_at(
            EventView::default(),
            EventInput::new("a", event_start, event_start),
            at(0),
        );
        assert_eq!(event.view().remaining_text(), "in 10 minutes");
        let start_text = event.view().start_text().to_string();

        event.refresh_at(at(15 * 60_000));
        assert_eq!(event.view().remaining_text(), "5 minutes ago");
        assert_eq!(event.view().start_text(), start_text);
        assert_eq!(event.start(), event_start);
    }

    #[test]
    fn test_setters_chain_and_update_view() {
        let mut event = Event::new_at(EventView::default(), EventInput::default(), at(0));
        event.set_name("Renamed").set_start(at(1_000)).set_end(at(2_000));
        assert_eq!(event.name(), "Renamed");
        assert_eq!(event.view().name_text(), "Renamed");
        assert_eq!(event.start(), at(1_000));
        assert_eq!(event.end(), at(2_000));
        assert_eq!(
            event.view().end_text(),
            at(2_000).with_timezone(&Local).format(DEFAULT_DATETIME_FORMAT).to_string()
        );
    }

    #[test]
    fn test_record_round_trip_truncates_to_millis() {
        let precise = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let event = Event::new_at(EventView::default(), EventInput::new("p", precise, precise), at(0));
        let record = event.to_record();
        assert_eq!(record.start, 1_700_000_000_123);

        let mut other = Event::new_at(EventView::default(), EventInput::default(), at(0));
        other.load_from_record(&record);
        assert_eq!(other.to_record(), record);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut event = Event::new_at(EventView::default(), EventInput::default(), at(0));
        event.select();
        event.select();
        assert!(event.is_selected());
        event.deselect();
        event.deselect();
        assert!(!event.is_selected());
    }

    #[test]
    fn test_custom_view_format() {
        let event = Event::new_at(
            EventView::new("%Y"),
            EventInput::new("y", at(0), at(0)),
            at(0),
        );
        assert_eq!(event.view().start_text().len(), 4);
    }

    #[test]
    fn test_time_value_deserializes_both_shapes() {
        let input: EventInput =
            serde_json::from_str(r#"{"name":"a","start":1000,"end":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(input.start, Some(TimeValue::EpochMs(1000)));
        assert_eq!(
            input.end.map(|t| t.resolve(at(0))),
            Some("2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap())
        );
    }

    #[test]
    fn test_invalid_view_format_falls_back_to_default() {
        let event = Event::new_at(EventView::new("%Q"), EventInput::new("bad", at(0), at(0)), at(0));
        let expected = at(0).with_timezone(&Local).format(DEFAULT_DATETIME_FORMAT).to_string();
        assert_eq!(event.view().start_text(), expected);
        assert_eq!(event.view().end_text(), expected);
    }

    #[test]
    fn test_datetime_format_validation() {
        assert!(is_valid_datetime_format(DEFAULT_DATETIME_FORMAT));
        assert!(is_valid_datetime_format("%d/%m %H:%M"));
        assert!(!is_valid_datetime_format("%Q"));
        assert!(!is_valid_datetime_format("%Y-%m-%d %!"));
    }

    #[test]
    fn test_out_of_range_epoch_resolves_to_now() {
        let huge = TimeValue::EpochMs(8_640_000_000_000_000);
        assert!(!huge.is_representable());
        assert!(TimeValue::EpochMs(0).is_representable());
        assert_eq!(huge.resolve(at(42)), at(42));
    }
}
