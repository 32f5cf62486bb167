//! Observer adapters
//!
//! - `EventBusObserver`: forwards events to the shared event bus
//! - `NoOpObserver`: discards everything
//! - `RecordingObserver`: keeps events in memory for inspection

mod event_bus;
mod recording;

pub use event_bus::EventBusObserver;
pub use recording::{NoOpObserver, RecordingObserver};
