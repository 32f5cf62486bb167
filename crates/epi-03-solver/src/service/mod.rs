//! Solver Service - the solve loop
//!
//! Publishes the registry once, then alternates between draining the inbox
//! into the queue and solving the item at its head.

use crate::domain::{SolverConfig, WorkQueue};
use crate::ports::ValidatorGateway;
use shared_bus::{Mailbox, MailboxError};
use shared_types::{ComponentState, ProblemRegistry, SolverMessage, WorkItem};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct SolverService<V: ValidatorGateway> {
    config: SolverConfig,
    registry: ProblemRegistry,
    validator: Arc<V>,
    inbox: Mailbox<SolverMessage>,
    shutdown: watch::Receiver<bool>,
    queue: WorkQueue,
    state: ComponentState,
}

impl<V: ValidatorGateway + 'static> SolverService<V> {
    pub fn new(
        config: SolverConfig,
        registry: ProblemRegistry,
        validator: Arc<V>,
        inbox: Mailbox<SolverMessage>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            registry,
            validator,
            inbox,
            shutdown,
            queue: WorkQueue::new(),
            state: ComponentState::Uninitialized,
        }
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    pub fn registry(&self) -> &ProblemRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Run on a dedicated thread until shutdown or inbox closure.
    pub fn spawn(mut self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("epi-solver".into())
            .spawn(move || self.run())
    }

    pub fn run(&mut self) {
        self.start();

        while !self.is_shutdown() {
            match self.run_once() {
                Ok(true) => {}
                Ok(false) => thread::sleep(self.config.idle()),
                Err(MailboxError::Closed) => {
                    info!("[epi-03] Inbox closed");
                    break;
                }
            }
        }

        self.state = ComponentState::Stopped;
        info!(dropped = self.queue.len(), "[epi-03] Solver stopped");
    }

    /// Hand the registry to the validator.
    pub fn start(&mut self) {
        info!(problems = ?self.registry.problem_ids(), "[epi-03] Publishing problem registry");
        if let Err(e) = self.validator.publish_registry(self.registry.clone()) {
            warn!(error = %e, "[epi-03] Failed to publish problem registry");
        }
        self.state = ComponentState::Running;
    }

    /// Drain the inbox, then solve at most one queued item.
    ///
    /// Returns `Ok(false)` when there was nothing to do.
    pub fn run_once(&mut self) -> Result<bool, MailboxError> {
        let received = self.absorb(None)?;

        let Some(work) = self.queue.pop() else {
            return Ok(received.handled > 0);
        };

        debug!(problem = %work.problem, parameters = %work.parameters, "[epi-03] Solving");
        let outcome = self.registry.solve(&work.problem, &work.parameters);

        // Cancellations that arrived while solving void the result.
        if self.absorb(Some(&work))?.in_flight_cancelled {
            info!(problem = %work.problem, parameters = %work.parameters, "[epi-03] Discarding result of cancelled work");
            return Ok(true);
        }

        match outcome {
            Ok(solution) => {
                info!(problem = %work.problem, parameters = %work.parameters, "[epi-03] Problem solved");
                let WorkItem {
                    problem,
                    parameters,
                } = work;
                if let Err(e) = self.validator.problem_solved(problem, parameters, solution) {
                    warn!(error = %e, "[epi-03] Failed to deliver solution");
                }
            }
            Err(e) => warn!(error = %e, "[epi-03] Dropping work item"),
        }
        Ok(true)
    }

    /// Apply every pending message to the queue.
    fn absorb(&mut self, in_flight: Option<&WorkItem>) -> Result<Absorbed, MailboxError> {
        let mut absorbed = Absorbed::default();

        while let Some(message) = self.inbox.try_recv()? {
            absorbed.handled += 1;
            match message {
                SolverMessage::Solve(work) => {
                    if in_flight == Some(&work) || !self.queue.push(work.clone()) {
                        debug!(problem = %work.problem, parameters = %work.parameters, "[epi-03] Already pending");
                    }
                }
                SolverMessage::Cancel(work) => {
                    if in_flight == Some(&work) {
                        absorbed.in_flight_cancelled = true;
                    } else if self.queue.cancel(&work) {
                        debug!(problem = %work.problem, parameters = %work.parameters, "[epi-03] Queued work cancelled");
                    }
                }
            }
        }

        Ok(absorbed)
    }
}

#[derive(Debug, Default)]
struct Absorbed {
    handled: usize,
    in_flight_cancelled: bool,
}
