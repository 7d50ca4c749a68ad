pub mod collection;
pub mod duration;
pub mod event;
pub mod gantt;
pub mod refresh;

pub use collection::{EventCollection, STORAGE_KEY};
pub use event::{Event, EventInput, EventRecord, EventView, TimeValue};
pub use gantt::{GanttChart, GanttRow};
