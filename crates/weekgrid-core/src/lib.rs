//! Core types: canonical events, week window, grid layout

pub mod event;
pub mod layout;
pub mod time;
pub mod tracing;

pub use event::{CanonicalEvent, UNTITLED_EVENT};
pub use layout::{DayColumn, GridConfig, GridLayout, GridLayoutEngine, TimedSlot};
pub use time::{EventTime, WeekWindow};
pub use crate::tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
