//! Google Calendar provider (API-key access).
//!
//! Queries the `events.list` endpoint of a single calendar for the requested
//! week. Recurring events are expanded server-side (`singleEvents=true`) and
//! returned in start order.
//!
//! # Example
//!
//! ```ignore
//! use weekgrid_providers::google::{GoogleConfig, GoogleProvider};
//!
//! let config = GoogleConfig::new("api-key").with_calendar_id("team@example.com");
//! let provider = GoogleProvider::new(config)?;
//! let events = provider.fetch_events(FetchRequest::new(window)).await?;
//! ```

mod client;
mod config;
mod provider;

pub use client::GoogleCalendarClient;
pub use config::GoogleConfig;
pub use provider::GoogleProvider;
