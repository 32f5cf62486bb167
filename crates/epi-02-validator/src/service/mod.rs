//! Validator Service - the message loop owning the ledger
//!
//! # Architecture
//! - Single owner: the ledger never leaves the validator thread
//! - One inbox message per iteration, idle sleep otherwise
//! - Selective receive during initialization; skipped messages keep their order

use crate::domain::{Admission, AdmissionError, ValidatorConfig};
use crate::error::{ValidatorError, ValidatorResult};
use crate::metrics;
use crate::ports::{LedgerStore, NetworkGateway, SolverGateway};
use epi_01_block_tree::{decode_snapshot, encode_snapshot, Ledger, LedgerObserver};
use shared_bus::{Mailbox, MailboxError};
use shared_crypto::ChainHasher;
use shared_types::{BlockRecord, ComponentState, ProblemRegistry, ValidatorMessage};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Dependencies for ValidatorService
pub struct ValidatorDependencies<N, S, L> {
    pub config: ValidatorConfig,
    pub hasher: Arc<dyn ChainHasher>,
    pub network: Arc<N>,
    pub solver: Arc<S>,
    pub store: Arc<L>,
    pub observer: Box<dyn LedgerObserver + Send>,
}

/// Validator Service
pub struct ValidatorService<N, S, L>
where
    N: NetworkGateway,
    S: SolverGateway,
    L: LedgerStore,
{
    config: ValidatorConfig,
    hasher: Arc<dyn ChainHasher>,
    network: Arc<N>,
    solver: Arc<S>,
    store: Arc<L>,
    inbox: Mailbox<ValidatorMessage>,
    shutdown: watch::Receiver<bool>,
    ledger: Ledger,
    registry: Option<ProblemRegistry>,
    state: ComponentState,
}

impl<N, S, L> ValidatorService<N, S, L>
where
    N: NetworkGateway + 'static,
    S: SolverGateway + 'static,
    L: LedgerStore + 'static,
{
    /// Create a new ValidatorService
    ///
    /// The service owns `inbox`; everyone else talks to it through the
    /// matching sender. Flipping `shutdown` to `true` stops the loop.
    pub fn new(
        deps: ValidatorDependencies<N, S, L>,
        inbox: Mailbox<ValidatorMessage>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let ledger = Ledger::new(deps.config.block_tree, deps.hasher.clone())
            .with_observer(deps.observer);
        Self {
            config: deps.config,
            hasher: deps.hasher,
            network: deps.network,
            solver: deps.solver,
            store: deps.store,
            inbox,
            shutdown,
            ledger,
            registry: None,
            state: ComponentState::Uninitialized,
        }
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn registry(&self) -> Option<&ProblemRegistry> {
        self.registry.as_ref()
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    // === LIFECYCLE ===

    /// Run on a dedicated thread until shutdown or inbox closure.
    pub fn spawn(mut self) -> std::io::Result<JoinHandle<ValidatorResult<()>>> {
        thread::Builder::new()
            .name("epi-validator".into())
            .spawn(move || self.run())
    }

    /// Initialize, loop, then persist.
    pub fn run(&mut self) -> ValidatorResult<()> {
        self.config.validate()?;

        if !self.initialize() {
            info!("[epi-02] Stopped before initialization completed");
            self.state = ComponentState::Stopped;
            return Ok(());
        }

        info!(
            top_block = %self.ledger.top_block(),
            bedrocks = self.ledger.bedrocks().len(),
            "[epi-02] Validator running"
        );

        while !self.is_shutdown() {
            match self.run_once() {
                Ok(true) => {}
                Ok(false) => thread::sleep(self.config.idle()),
                Err(MailboxError::Closed) => {
                    info!("[epi-02] Inbox closed");
                    break;
                }
            }
        }

        self.stop()
    }

    /// Bring the ledger and the registry into place.
    ///
    /// Returns `false` if shutdown was requested (or the inbox closed)
    /// before both were available.
    pub fn initialize(&mut self) -> bool {
        self.state = ComponentState::Initializing;

        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "[epi-02] Persisted ledger unreadable, requesting a snapshot");
                None
            }
        };

        let mut offer = match stored {
            Some(records) => {
                let ledger =
                    Ledger::compile(&records, self.config.block_tree, self.hasher.clone());
                self.ledger.replace_with(ledger);
                info!(records = records.len(), "[epi-02] Ledger restored from store");
                None
            }
            None => {
                self.request_full_ledger();
                match self.await_full_ledger_offer() {
                    Some(payload) => Some(payload),
                    None => return false,
                }
            }
        };

        let Some(registry) = self.await_problems_registry() else {
            return false;
        };
        info!(problems = ?registry.problem_ids(), "[epi-02] Problem registry received");
        self.registry = Some(registry);

        while let Some(payload) = offer.take() {
            if self.adopt_snapshot(&payload) {
                break;
            }
            self.request_full_ledger();
            match self.await_full_ledger_offer() {
                Some(next) => offer = Some(next),
                None => return false,
            }
        }

        self.state = ComponentState::Running;
        true
    }

    /// Handle at most one inbox message.
    ///
    /// Returns `Ok(false)` when the inbox was empty.
    pub fn run_once(&mut self) -> Result<bool, MailboxError> {
        match self.inbox.try_recv()? {
            Some(message) => {
                self.handle(message);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the ledger and enter the terminal state.
    pub fn stop(&mut self) -> ValidatorResult<()> {
        self.state = ComponentState::Stopped;
        let records = self.ledger.decompile();
        self.store.save(&records).map_err(|e| {
            error!(error = %e, "[epi-02] Failed to persist ledger");
            ValidatorError::Persistence(e)
        })?;
        info!(records = records.len(), "[epi-02] Ledger persisted, validator stopped");
        Ok(())
    }

    // === SELECTIVE RECEIVE ===

    fn await_message<F>(&mut self, predicate: F) -> Option<ValidatorMessage>
    where
        F: FnMut(&ValidatorMessage) -> bool,
    {
        let shutdown = &self.shutdown;
        match self
            .inbox
            .recv_matching(predicate, self.config.idle(), &|| *shutdown.borrow())
        {
            Ok(found) => found,
            Err(MailboxError::Closed) => {
                info!("[epi-02] Inbox closed during initialization");
                None
            }
        }
    }

    fn await_full_ledger_offer(&mut self) -> Option<String> {
        debug!("[epi-02] Waiting for a full ledger offer");
        match self.await_message(|m| matches!(m, ValidatorMessage::FullLedgerOffer(_)))? {
            ValidatorMessage::FullLedgerOffer(payload) => Some(payload),
            _ => None,
        }
    }

    fn await_problems_registry(&mut self) -> Option<ProblemRegistry> {
        debug!("[epi-02] Waiting for the problem registry");
        match self.await_message(|m| matches!(m, ValidatorMessage::ProblemsRegistry(_)))? {
            ValidatorMessage::ProblemsRegistry(registry) => Some(registry),
            _ => None,
        }
    }

    // === MESSAGE HANDLING ===

    fn handle(&mut self, message: ValidatorMessage) {
        debug!(kind = message.kind(), "[epi-02] Handling message");
        match message {
            ValidatorMessage::ProblemsRegistry(_) => {
                debug!("[epi-02] Ignoring repeated problem registry");
            }
            ValidatorMessage::FullLedgerOffer(payload) => {
                self.adopt_snapshot(&payload);
            }
            ValidatorMessage::ProblemSolved {
                problem,
                parameters,
                solution,
            } => self.handle_problem_solved(&problem, &parameters, &solution),
            ValidatorMessage::RemoteBlock(record) => self.handle_remote_block(record),
            ValidatorMessage::FullLedgerRequested => self.serve_full_ledger(),
        }
    }

    fn admission(&self) -> Option<Admission<'_>> {
        self.registry
            .as_ref()
            .map(|registry| Admission::new(registry, self.hasher.as_ref()))
    }

    /// Validate every record; compile and adopt only if all pass.
    fn adopt_snapshot(&mut self, payload: &str) -> bool {
        let records = match decode_snapshot(payload) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "[epi-02] Discarding undecodable snapshot");
                metrics::record_snapshot_rejected();
                return false;
            }
        };

        let verdict = match self.admission() {
            Some(admission) => admission.admit_all(&records),
            None => {
                warn!("[epi-02] Discarding snapshot received before the problem registry");
                metrics::record_snapshot_rejected();
                return false;
            }
        };
        if let Err((index, e)) = verdict {
            warn!(index, error = %e, "[epi-02] Discarding invalid snapshot");
            metrics::record_snapshot_rejected();
            return false;
        }

        let ledger = Ledger::compile(&records, self.config.block_tree, self.hasher.clone());
        self.ledger.replace_with(ledger);
        metrics::record_snapshot_adopted();
        metrics::set_bedrock_blocks(self.ledger.bedrocks().len());
        info!(
            records = records.len(),
            top_block = %self.ledger.top_block(),
            "[epi-02] Snapshot adopted"
        );
        true
    }

    fn handle_problem_solved(&mut self, problem: &str, parameters: &str, solution: &str) {
        let checked = match self.admission() {
            Some(admission) => admission.check_solution(problem, parameters, solution),
            None => Err(AdmissionError::UnknownProblem(problem.to_string())),
        };
        if let Err(e) = checked {
            warn!(error = %e, "[epi-02] Discarding local solution");
            metrics::record_block_rejected(e.reason());
            return;
        }

        let prev = self.ledger.top_block();
        let block = self.ledger.chain_block(&prev, problem, parameters, solution);
        let record = block.clone().into_record(prev.clone());
        if !self.ledger.add_block(block, &prev) {
            debug!(hash = %record.hash, "[epi-02] Local block already known");
            return;
        }

        info!(hash = %record.hash, prev = %prev, %problem, "[epi-02] Local block accepted");
        metrics::record_block_accepted("local");
        metrics::set_bedrock_blocks(self.ledger.bedrocks().len());
        if let Err(e) = self.network.broadcast_block(record) {
            warn!(error = %e, "[epi-02] Failed to broadcast block");
        }
    }

    fn handle_remote_block(&mut self, record: BlockRecord) {
        if !self.ledger.can_branch(&record.prev_hash) {
            debug!(hash = %record.hash, prev = %record.prev_hash, "[epi-02] Remote block has untracked parent");
            metrics::record_block_rejected("untracked_parent");
            return;
        }
        if self.ledger.can_branch(&record.hash) {
            debug!(hash = %record.hash, "[epi-02] Remote block already known");
            return;
        }

        let verdict = match self.admission() {
            Some(admission) => admission.admit(&record),
            None => Err(AdmissionError::UnknownProblem(record.problem.clone())),
        };
        if let Err(e) = verdict {
            warn!(hash = %record.hash, error = %e, "[epi-02] Discarding remote block");
            metrics::record_block_rejected(e.reason());
            return;
        }

        if let Err(e) = self.solver.cancel(record.work_item()) {
            warn!(error = %e, "[epi-02] Failed to notify solver");
        }
        self.ledger.add_record(&record);

        info!(hash = %record.hash, prev = %record.prev_hash, "[epi-02] Remote block accepted");
        metrics::record_block_accepted("remote");
        metrics::set_bedrock_blocks(self.ledger.bedrocks().len());
    }

    fn serve_full_ledger(&self) {
        let payload = encode_snapshot(&self.ledger.decompile());
        if let Err(e) = self.network.send_full_ledger(payload) {
            warn!(error = %e, "[epi-02] Failed to send full ledger");
        }
    }

    fn request_full_ledger(&self) {
        info!("[epi-02] Requesting full ledger");
        if let Err(e) = self.network.request_full_ledger() {
            warn!(error = %e, "[epi-02] Failed to request full ledger");
        }
    }
}

#[cfg(test)]
mod tests;
