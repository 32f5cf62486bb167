//! # Standalone Network
//!
//! The network component of a node with no peers. It answers ledger
//! requests with an empty snapshot so a fresh validator can start, and
//! otherwise only logs what would have gone out on the wire.

use shared_bus::{Mailbox, MailboxError, MailboxSender};
use shared_types::{NetworkMessage, ValidatorMessage};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Snapshot of a ledger holding nothing but genesis.
pub const EMPTY_SNAPSHOT: &str = "[]";

pub struct StandaloneNetwork {
    inbox: Mailbox<NetworkMessage>,
    validator: MailboxSender<ValidatorMessage>,
    shutdown: watch::Receiver<bool>,
    idle: Duration,
    broadcasts: u64,
}

impl StandaloneNetwork {
    pub fn new(
        inbox: Mailbox<NetworkMessage>,
        validator: MailboxSender<ValidatorMessage>,
        shutdown: watch::Receiver<bool>,
        idle: Duration,
    ) -> Self {
        Self {
            inbox,
            validator,
            shutdown,
            idle,
            broadcasts: 0,
        }
    }

    /// Blocks announced so far.
    pub fn broadcasts(&self) -> u64 {
        self.broadcasts
    }

    pub fn spawn(mut self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("epi-network".into())
            .spawn(move || self.run())
    }

    pub fn run(&mut self) {
        while !*self.shutdown.borrow() {
            match self.run_once() {
                Ok(true) => {}
                Ok(false) => thread::sleep(self.idle),
                Err(MailboxError::Closed) => break,
            }
        }
        info!(broadcasts = self.broadcasts, "[network] Standalone network stopped");
    }

    /// Handle at most one outbound message.
    pub fn run_once(&mut self) -> Result<bool, MailboxError> {
        match self.inbox.try_recv()? {
            Some(message) => {
                self.handle(message);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn handle(&mut self, message: NetworkMessage) {
        match message {
            NetworkMessage::RequestFullLedger => {
                info!("[network] No peers, offering an empty ledger");
                let offer = ValidatorMessage::FullLedgerOffer(EMPTY_SNAPSHOT.to_string());
                if let Err(e) = self.validator.send(offer) {
                    warn!(error = %e, "[network] Validator unreachable");
                }
            }
            NetworkMessage::BroadcastBlock(record) => {
                self.broadcasts += 1;
                info!(hash = %record.hash, prev = %record.prev_hash, "[network] Block announced");
            }
            NetworkMessage::FullLedger(payload) => {
                debug!(bytes = payload.len(), "[network] No peer to receive full ledger");
            }
            NetworkMessage::ProblemSubmitted(work) => {
                debug!(problem = %work.problem, parameters = %work.parameters, "[network] Problem submitted");
            }
        }
    }
}
