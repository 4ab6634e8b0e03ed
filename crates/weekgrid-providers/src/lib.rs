//! CalendarProvider trait and source adapters.
//!
//! This crate turns configuration into canonical events:
//!
//! - [`CalendarSourceConfig`] / [`SourceSelection`] - Which source to query
//! - [`CalendarProvider`] - The trait every source adapter implements
//! - [`RawEvent`] - Source-shaped event data before normalization
//! - [`normalize_events`] - Conversion to [`weekgrid_core::CanonicalEvent`]
//! - [`AbortHandle`] / [`AbortSignal`] - Render-time cancellation
//!
//! # Architecture
//!
//! ```text
//!         CalendarSourceConfig
//!                  │ select()
//!        ┌─────────┴──────────┐
//!        ▼                    ▼
//! ┌──────────────┐    ┌─────────────────┐
//! │ ICal feed    │    │ Google API key  │
//! └──────┬───────┘    └────────┬────────┘
//!        │   CalendarProvider  │
//!        └──────────┬──────────┘
//!                   ▼
//!              ┌──────────┐
//!              │ RawEvent │
//!              └────┬─────┘
//!                   ▼ normalize_events()
//!           ┌────────────────┐
//!           │ CanonicalEvent │
//!           └────────────────┘
//! ```

pub mod abort;
pub mod config;
pub mod error;
#[cfg(feature = "google")]
pub mod google;
#[cfg(any(feature = "ical", feature = "google"))]
mod http;
#[cfg(feature = "ical")]
pub mod ical;
pub mod normalize;
pub mod provider;
pub mod raw_event;

pub use abort::{AbortHandle, AbortSignal};
pub use config::{CalendarSourceConfig, SourceOverrides, SourceSelection};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_event, normalize_events};
pub use provider::{
    BoxFuture, CalendarProvider, FetchRequest, HttpSettings, build_provider,
};
pub use raw_event::{RawEvent, RawEventTime};
