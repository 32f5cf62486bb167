//! Adapters for the solver's outbound ports

pub mod mailbox;

pub use mailbox::MailboxValidatorGateway;
