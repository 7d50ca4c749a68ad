use chrono::{DateTime, Utc};

use super::collection::EventCollection;
use super::event::Event;

/// One bar of the chart, positioned in percent of the chart width.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttRow {
    pub name: String,
    pub offset_pct: f64,
    pub width_pct: f64,
}

/// Proportional bar layout of a collection against a shared timeline.
/// Holds only the rows of the last refresh; the collection is read live.
#[derive(Debug, Clone, Default)]
pub struct GanttChart {
    rows: Vec<GanttRow>,
    now_marker_pct: Option<f64>,
}

/// Left edge and span (ms) of the visible timeline.
#[derive(Debug, Clone, Copy)]
struct Timeline {
    anchor_ms: i64,
    span_ms: i64,
}

impl Timeline {
    /// If every event is still upcoming the left edge is "now"; otherwise
    /// it is the earliest start.
    fn new(earliest_start: DateTime<Utc>, latest_end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let anchor = if now < earliest_start { now } else { earliest_start };
        let anchor_ms = anchor.timestamp_millis();
        Self {
            anchor_ms,
            span_ms: latest_end.timestamp_millis() - anchor_ms,
        }
    }

    fn pct(&self, ms: i64) -> f64 {
        ms as f64 * 100.0 / self.span_ms as f64
    }

    fn row(&self, event: &Event) -> GanttRow {
        let start_ms = event.start().timestamp_millis();
        let end_ms = event.end().timestamp_millis();
        let (offset_pct, width_pct) = if self.span_ms <= 0 {
            // Everything collapses onto one instant
            (0.0, 100.0)
        } else {
            (self.pct(start_ms - self.anchor_ms), self.pct(end_ms - start_ms))
        };
        GanttRow {
            name: event.name().to_string(),
            offset_pct,
            width_pct,
        }
    }
}

impl GanttChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every row from the collection's current contents.
    pub fn refresh(&mut self, events: &EventCollection, now: DateTime<Utc>) {
        self.rows.clear();
        self.now_marker_pct = None;

        let (Some(earliest), Some(latest)) = (events.earliest_starting(), events.latest_ending()) else {
            return;
        };
        let timeline = Timeline::new(earliest.start(), latest.end(), now);

        self.rows = events.iter().map(|event| timeline.row(event)).collect();

        let anchored_at_now = now < earliest.start();
        if !anchored_at_now && timeline.span_ms > 0 {
            self.now_marker_pct = Some(timeline.pct(now.timestamp_millis() - timeline.anchor_ms));
        }
    }

    pub fn rows(&self) -> &[GanttRow] {
        &self.rows
    }

    /// Where "now" falls, when the timeline starts in the past.
    pub fn now_marker_pct(&self) -> Option<f64> {
        self.now_marker_pct
    }
}
