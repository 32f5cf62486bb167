//! # Node Runtime
//!
//! Owns the mailboxes, the event bus and the component threads.

use crate::adapters::{DetachedSolver, StandaloneNetwork};
use crate::container::{ConfigError, NodeConfig};
use epi_01_block_tree::EventBusObserver;
use epi_02_validator::{
    FileLedgerStore, MailboxNetworkGateway, MailboxSolverGateway, SolverGateway,
    ValidatorDependencies, ValidatorError, ValidatorResult, ValidatorService,
};
use epi_03_solver::{builtin_registry, MailboxValidatorGateway, SolverService};
use shared_bus::{
    mailbox, EventFilter, EventPublisher, InMemoryEventBus, Mailbox, MailboxError,
    MailboxSender, Subscription,
};
use shared_crypto::Sha256ChainHasher;
use shared_types::{NetworkMessage, SolverMessage, ValidatorMessage, WorkItem};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to spawn component thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Component mailbox closed: {0}")]
    Mailbox(#[from] MailboxError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error("{0} thread panicked")]
    Panicked(&'static str),
}

/// A running node.
///
/// Dropping the runtime signals shutdown without waiting for the threads;
/// call [`NodeRuntime::shutdown`] to wait for the ledger to be persisted.
pub struct NodeRuntime {
    config: NodeConfig,
    bus: Arc<InMemoryEventBus>,
    validator_tx: MailboxSender<ValidatorMessage>,
    solver_tx: Option<MailboxSender<SolverMessage>>,
    network_tx: MailboxSender<NetworkMessage>,
    shutdown_tx: watch::Sender<bool>,
    validator: Option<JoinHandle<ValidatorResult<()>>>,
    solver: Option<JoinHandle<()>>,
    network: Option<JoinHandle<()>>,
}

impl NodeRuntime {
    /// Validate the configuration and start every component.
    pub fn start(config: NodeConfig) -> Result<Self, RuntimeError> {
        Self::start_with_event_bus(config, Arc::new(InMemoryEventBus::new()))
    }

    /// Start publishing ledger events on an existing bus, so subscribers
    /// attached beforehand see the startup events too.
    pub fn start_with_event_bus(
        config: NodeConfig,
        bus: Arc<InMemoryEventBus>,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;

        info!("===========================================");
        info!("  Epichain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!(data_dir = %config.data_dir.display(), solver = config.solver_enabled, "Starting node");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (validator_tx, validator_box) = mailbox();
        let (network_tx, network_box) = mailbox();

        let network = StandaloneNetwork::new(
            network_box,
            validator_tx.clone(),
            shutdown_rx.clone(),
            config.validator.idle(),
        )
        .spawn()?;

        let components = Components {
            config: &config,
            bus: &bus,
            network_tx: &network_tx,
            validator_box,
            shutdown_rx,
        };

        let (validator, solver, solver_tx) = if config.solver_enabled {
            let (solver_tx, solver_box) = mailbox();
            let shutdown_rx = components.shutdown_rx.clone();
            let validator =
                components.spawn_validator(MailboxSolverGateway::new(solver_tx.clone()))?;
            let solver = SolverService::new(
                config.solver,
                builtin_registry(),
                Arc::new(MailboxValidatorGateway::new(validator_tx.clone())),
                solver_box,
                shutdown_rx,
            )
            .spawn()?;
            (validator, Some(solver), Some(solver_tx))
        } else {
            let validator = components.spawn_validator(DetachedSolver)?;
            // The validator still needs a registry to admit remote blocks.
            validator_tx.send(ValidatorMessage::ProblemsRegistry(builtin_registry()))?;
            (validator, None, None)
        };

        Ok(Self {
            config,
            bus,
            validator_tx,
            solver_tx,
            network_tx,
            shutdown_tx,
            validator: Some(validator),
            solver,
            network: Some(network),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn event_bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// Ledger events matching `filter`, from now on.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Queue a problem instance locally and announce it to the network.
    pub fn solve_problem(
        &self,
        problem: impl Into<String>,
        parameters: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        let work = WorkItem::new(problem, parameters);
        match &self.solver_tx {
            Some(solver) => solver.send(SolverMessage::Solve(work.clone()))?,
            None => warn!(problem = %work.problem, "Solver disabled, only announcing problem"),
        }
        self.network_tx.send(NetworkMessage::ProblemSubmitted(work))?;
        Ok(())
    }

    /// Deliver a message from a network transport to the validator.
    pub fn receive_from_network(&self, message: ValidatorMessage) -> Result<(), RuntimeError> {
        self.validator_tx.send(message)?;
        Ok(())
    }

    /// Stop every component and wait for the ledger to be persisted.
    pub fn shutdown(mut self) -> Result<(), RuntimeError> {
        info!("Initiating graceful shutdown...");
        self.signal_shutdown();

        let mut outcome = Ok(());
        if let Some(handle) = self.solver.take() {
            if handle.join().is_err() {
                error!("Solver thread panicked");
                outcome = Err(RuntimeError::Panicked("solver"));
            }
        }
        if let Some(handle) = self.validator.take() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "Validator stopped with an error");
                    outcome = Err(e.into());
                }
                Err(_) => {
                    error!("Validator thread panicked");
                    outcome = Err(RuntimeError::Panicked("validator"));
                }
            }
        }
        if let Some(handle) = self.network.take() {
            if handle.join().is_err() {
                error!("Network thread panicked");
                outcome = Err(RuntimeError::Panicked("network"));
            }
        }

        if outcome.is_ok() {
            info!("Shutdown complete");
        }
        outcome
    }

    fn signal_shutdown(&self) {
        // Fails only when every component already exited.
        let _ = self.shutdown_tx.send(true);
    }
}

/// Everything the validator thread is built from, apart from its solver.
struct Components<'a> {
    config: &'a NodeConfig,
    bus: &'a Arc<InMemoryEventBus>,
    network_tx: &'a MailboxSender<NetworkMessage>,
    validator_box: Mailbox<ValidatorMessage>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Components<'_> {
    fn spawn_validator<S: SolverGateway + 'static>(
        self,
        solver: S,
    ) -> std::io::Result<JoinHandle<ValidatorResult<()>>> {
        let deps = ValidatorDependencies {
            config: self.config.validator,
            hasher: Arc::new(Sha256ChainHasher::new()),
            network: Arc::new(MailboxNetworkGateway::new(self.network_tx.clone())),
            solver: Arc::new(solver),
            store: Arc::new(FileLedgerStore::in_dir(&self.config.data_dir)),
            observer: Box::new(EventBusObserver::new(
                self.bus.clone() as Arc<dyn EventPublisher>
            )),
        };
        ValidatorService::new(deps, self.validator_box, self.shutdown_rx).spawn()
    }
}

impl Drop for NodeRuntime {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}
