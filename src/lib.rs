//! Event countdown widget: a list of named time intervals with live
//! countdowns, a proportional Gantt chart, and JSON persistence.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod ui;
