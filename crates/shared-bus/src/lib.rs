//! # Shared Bus - Inter-Component Communication
//!
//! Two substrates, both built on tokio channels and usable from plain
//! threads:
//!
//! - **Mailboxes** (`mailbox`): one multi-producer/single-consumer queue per
//!   recipient component. Senders never block. The owner drains one message
//!   at a time and may selectively wait for a specific message while the
//!   others keep their order.
//! - **Event bus** (`publisher`/`subscriber`): broadcast fan-out of ledger
//!   events to any number of observers. Publishing never waits for
//!   subscribers and ordering across subscribers is not guaranteed.
//!
//! ```text
//! ┌──────────┐  send()   ┌─────────────────┐  try_recv()   ┌───────────┐
//! │ Solver   │ ────────→ │ Validator inbox │ ────────────→ │ Validator │
//! │ Network  │ ────────→ │  (mpsc + stash) │               │  thread   │
//! └──────────┘           └─────────────────┘               └─────┬─────┘
//!                                                                │ publish()
//!                                                                ▼
//!                                                     ┌────────────────────┐
//!                                                     │ Event Bus          │──→ subscribers
//!                                                     └────────────────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod mailbox;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use mailbox::{mailbox, Mailbox, MailboxError, MailboxSender};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging subscribers drop events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
