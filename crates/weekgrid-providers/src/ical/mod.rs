//! iCalendar feed provider.
//!
//! Fetches a feed URL over HTTP and reads its `VEVENT` blocks with the
//! fixed-offset parser in [`parse`].
//!
//! ```ignore
//! use weekgrid_providers::ical::IcalFeedProvider;
//!
//! let provider = IcalFeedProvider::new("https://example.com/team.ics", timeout)?;
//! let events = provider.fetch_events(FetchRequest::new(window)).await?;
//! ```

pub mod parse;
mod provider;

pub use parse::parse_feed;
pub use provider::IcalFeedProvider;
