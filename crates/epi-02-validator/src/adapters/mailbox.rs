//! Mailbox gateways

use crate::ports::{NetworkGateway, SolverGateway};
use shared_bus::MailboxSender;
use shared_types::{BlockRecord, NetworkMessage, SolverMessage, WorkItem};

/// Posts to the network component's mailbox.
#[derive(Debug, Clone)]
pub struct MailboxNetworkGateway {
    sender: MailboxSender<NetworkMessage>,
}

impl MailboxNetworkGateway {
    pub fn new(sender: MailboxSender<NetworkMessage>) -> Self {
        Self { sender }
    }

    fn send(&self, message: NetworkMessage) -> Result<(), String> {
        self.sender.send(message).map_err(|e| e.to_string())
    }
}

impl NetworkGateway for MailboxNetworkGateway {
    fn broadcast_block(&self, record: BlockRecord) -> Result<(), String> {
        self.send(NetworkMessage::BroadcastBlock(record))
    }

    fn request_full_ledger(&self) -> Result<(), String> {
        self.send(NetworkMessage::RequestFullLedger)
    }

    fn send_full_ledger(&self, payload: String) -> Result<(), String> {
        self.send(NetworkMessage::FullLedger(payload))
    }
}

/// Posts to the solver's mailbox.
#[derive(Debug, Clone)]
pub struct MailboxSolverGateway {
    sender: MailboxSender<SolverMessage>,
}

impl MailboxSolverGateway {
    pub fn new(sender: MailboxSender<SolverMessage>) -> Self {
        Self { sender }
    }
}

impl SolverGateway for MailboxSolverGateway {
    fn cancel(&self, work: WorkItem) -> Result<(), String> {
        self.sender
            .send(SolverMessage::Cancel(work))
            .map_err(|e| e.to_string())
    }
}
