pub mod dialogs;
pub mod event_table;
pub mod gantt_chart;
pub mod theme;
pub mod toolbar;
