//! Mailbox gateway to the validator

use crate::ports::ValidatorGateway;
use shared_bus::MailboxSender;
use shared_types::{ProblemRegistry, ValidatorMessage};

/// Posts to the validator's mailbox.
#[derive(Debug, Clone)]
pub struct MailboxValidatorGateway {
    sender: MailboxSender<ValidatorMessage>,
}

impl MailboxValidatorGateway {
    pub fn new(sender: MailboxSender<ValidatorMessage>) -> Self {
        Self { sender }
    }

    fn send(&self, message: ValidatorMessage) -> Result<(), String> {
        self.sender.send(message).map_err(|e| e.to_string())
    }
}

impl ValidatorGateway for MailboxValidatorGateway {
    fn publish_registry(&self, registry: ProblemRegistry) -> Result<(), String> {
        self.send(ValidatorMessage::ProblemsRegistry(registry))
    }

    fn problem_solved(
        &self,
        problem: String,
        parameters: String,
        solution: String,
    ) -> Result<(), String> {
        self.send(ValidatorMessage::ProblemSolved {
            problem,
            parameters,
            solution,
        })
    }
}
