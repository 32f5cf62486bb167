//! Adapters layer
//!
//! - `mailbox`: gateways that post messages to other components' mailboxes
//! - `store`: file-backed and in-memory ledger stores

mod mailbox;
mod store;

pub use mailbox::{MailboxNetworkGateway, MailboxSolverGateway};
pub use store::{FileLedgerStore, InMemoryLedgerStore};
