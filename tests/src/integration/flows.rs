//! # Integration Test Flows
//!
//! Two validators wired by hand and driven one message at a time, with the
//! test relaying what their network mailboxes emit.
//!
//! ## Flows Tested:
//!
//! 1. **Solver → Validator → Network → peer Validator → peer Solver**: a
//!    locally solved block propagates and cancels the peer's pending work
//! 2. **Full ledger sync**: a fresh node adopts a peer's snapshot
//! 3. **Snapshot rejection**: a tampered snapshot is discarded and re-requested

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use epi_01_block_tree::NoOpObserver;
    use epi_02_validator::{
        InMemoryLedgerStore, MailboxNetworkGateway, MailboxSolverGateway, ValidatorConfig,
        ValidatorDependencies, ValidatorService,
    };
    use epi_03_solver::{
        builtin_registry, MailboxValidatorGateway, PrimeFactorization, SolverConfig,
        SolverService, TypedProblem,
    };
    use shared_bus::{mailbox, Mailbox, MailboxSender};
    use shared_crypto::Sha256ChainHasher;
    use shared_types::{NetworkMessage, SolverMessage, ValidatorMessage, WorkItem, NULL_HASH};
    use tokio::sync::watch;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Validator =
        ValidatorService<MailboxNetworkGateway, MailboxSolverGateway, InMemoryLedgerStore>;

    /// One node: validator and solver services plus the mailboxes around them.
    struct Node {
        validator: Validator,
        solver: SolverService<MailboxValidatorGateway>,
        validator_tx: MailboxSender<ValidatorMessage>,
        solver_tx: MailboxSender<SolverMessage>,
        network: Mailbox<NetworkMessage>,
        _shutdown: watch::Sender<bool>,
    }

    impl Node {
        fn new(store: InMemoryLedgerStore) -> Self {
            let (validator_tx, validator_box) = mailbox();
            let (solver_tx, solver_box) = mailbox();
            let (network_tx, network) = mailbox();
            let (shutdown, shutdown_rx) = watch::channel(false);

            let deps = ValidatorDependencies {
                config: ValidatorConfig {
                    idle_ms: 1,
                    ..ValidatorConfig::default()
                },
                hasher: Arc::new(Sha256ChainHasher::new()),
                network: Arc::new(MailboxNetworkGateway::new(network_tx)),
                solver: Arc::new(MailboxSolverGateway::new(solver_tx.clone())),
                store: Arc::new(store),
                observer: Box::new(NoOpObserver),
            };
            let validator = ValidatorService::new(deps, validator_box, shutdown_rx.clone());
            let solver = SolverService::new(
                SolverConfig { idle_ms: 1 },
                builtin_registry(),
                Arc::new(MailboxValidatorGateway::new(validator_tx.clone())),
                solver_box,
                shutdown_rx,
            );

            Self {
                validator,
                solver,
                validator_tx,
                solver_tx,
                network,
                _shutdown: shutdown,
            }
        }

        /// A node restored from an empty store, registry in place.
        fn started() -> Self {
            let mut node = Self::new(InMemoryLedgerStore::with_records(Vec::new()));
            node.solver.start();
            assert!(node.validator.initialize());
            node
        }

        fn settle(&mut self) {
            while self.validator.run_once().unwrap() {}
        }

        fn outbound(&mut self) -> Vec<NetworkMessage> {
            std::iter::from_fn(|| self.network.try_recv().ok().flatten()).collect()
        }
    }

    fn factor(n: u64) -> WorkItem {
        WorkItem::new(PrimeFactorization::ID, format!(r#"{{"o":{n}}}"#))
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[test]
    fn test_solved_block_propagates_and_cancels_peer_work() {
        let mut a = Node::started();
        let mut b = Node::started();

        a.solver_tx.send(SolverMessage::Solve(factor(242))).unwrap();
        b.solver_tx.send(SolverMessage::Solve(factor(242))).unwrap();

        // A solves and its validator accepts.
        assert!(a.solver.run_once().unwrap());
        a.settle();
        let top = a.validator.ledger().top_block();
        assert_ne!(top, NULL_HASH);

        // Relay A's broadcast to B.
        let broadcasts = a.outbound();
        assert_eq!(broadcasts.len(), 1);
        for message in broadcasts {
            if let NetworkMessage::BroadcastBlock(record) = message {
                assert_eq!(record.solution, r#"{"o":[2,11,11]}"#);
                b.validator_tx
                    .send(ValidatorMessage::RemoteBlock(record))
                    .unwrap();
            }
        }
        b.settle();
        assert_eq!(b.validator.ledger().top_block(), top);

        // B's pending copy of the same work is cancelled before it is solved.
        assert!(b.solver.run_once().unwrap());
        assert!(b.solver.queue().is_empty());
        b.settle();
        assert_eq!(b.validator.ledger().top_block(), top);
        assert!(b.outbound().is_empty());
    }

    #[test]
    fn test_fresh_node_adopts_peer_snapshot() {
        let mut a = Node::started();
        for n in [6, 10, 15] {
            a.solver_tx.send(SolverMessage::Solve(factor(n))).unwrap();
            assert!(a.solver.run_once().unwrap());
            a.settle();
        }
        assert_eq!(a.validator.ledger().len(), 3);
        a.outbound();

        a.validator_tx
            .send(ValidatorMessage::FullLedgerRequested)
            .unwrap();
        a.settle();
        let payload = match a.outbound().pop() {
            Some(NetworkMessage::FullLedger(payload)) => payload,
            other => panic!("expected FullLedger, got {other:?}"),
        };

        let mut b = Node::new(InMemoryLedgerStore::new());
        b.validator_tx
            .send(ValidatorMessage::FullLedgerOffer(payload))
            .unwrap();
        b.solver.start();
        assert!(b.validator.initialize());

        assert_eq!(b.outbound(), vec![NetworkMessage::RequestFullLedger]);
        assert_eq!(
            b.validator.ledger().top_block(),
            a.validator.ledger().top_block()
        );
        assert_eq!(b.validator.ledger().decompile(), a.validator.ledger().decompile());
    }

    #[test]
    fn test_tampered_snapshot_is_rerequested() {
        let mut a = Node::started();
        a.solver_tx.send(SolverMessage::Solve(factor(35))).unwrap();
        assert!(a.solver.run_once().unwrap());
        a.settle();

        let records = a.validator.ledger().decompile();
        let mut forged = records.clone();
        forged[0].solution = r#"{"o":[35]}"#.into();
        let honest = epi_01_block_tree::encode_snapshot(&records);
        let forged = epi_01_block_tree::encode_snapshot(&forged);

        let mut b = Node::new(InMemoryLedgerStore::new());
        b.validator_tx
            .send(ValidatorMessage::FullLedgerOffer(forged))
            .unwrap();
        b.solver.start();
        b.validator_tx
            .send(ValidatorMessage::FullLedgerOffer(honest))
            .unwrap();
        assert!(b.validator.initialize());

        assert_eq!(
            b.outbound(),
            vec![
                NetworkMessage::RequestFullLedger,
                NetworkMessage::RequestFullLedger
            ]
        );
        assert_eq!(b.validator.ledger().decompile(), records);
    }
}
