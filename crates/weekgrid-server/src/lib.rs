//! Week pipeline: source selection, event cache, fallback path.
//!
//! This crate ties the providers to a cache and produces the [`WeekData`]
//! payload the renderer consumes:
//! - Cache-aware loading keyed by the source configuration signature
//! - TTL and tag-based invalidation of cached weeks
//! - An uncached fallback that always yields a value
//!
//! # Example
//!
//! ```rust,no_run
//! use weekgrid_providers::{AbortSignal, CalendarSourceConfig, SourceOverrides};
//! use weekgrid_server::{PipelineConfig, WeekPipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = WeekPipeline::new(CalendarSourceConfig::from_env(), PipelineConfig::default());
//!     let week = pipeline
//!         .load(&SourceOverrides::default(), &AbortSignal::never())
//!         .await;
//!     println!("{}", serde_json::to_string(&week).unwrap());
//! }
//! ```

mod cache;
mod pipeline;
mod week_data;

pub use cache::{CALENDAR_EVENTS_TAG, CacheEntry, DEFAULT_TTL, EventCache};
pub use pipeline::{
    Cacheability, Clock, HttpProviderFactory, PipelineConfig, ProviderFactory, SkipReason,
    WeekPipeline,
};
pub use week_data::WeekData;
