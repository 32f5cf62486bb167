use super::*;
use crate::adapters::{InMemoryLedgerStore, MailboxNetworkGateway, MailboxSolverGateway};
use crate::error::StoreError;
use epi_01_block_tree::{BlockTreeConfig, RecordingObserver};
use shared_bus::{mailbox, LedgerEvent, MailboxSender};
use shared_crypto::Sha256ChainHasher;
use shared_types::{
    NetworkMessage, ProblemError, ProblemHandler, SolverMessage, WorkItem, NULL_HASH,
};
use std::time::Duration;

struct Upper;

impl ProblemHandler for Upper {
    fn id(&self) -> &str {
        "upper"
    }

    fn solve(&self, parameters: &str) -> Result<String, ProblemError> {
        Ok(parameters.to_uppercase())
    }

    fn check(&self, parameters: &str, solution: &str) -> bool {
        parameters.to_uppercase() == solution
    }
}

struct FailingStore;

impl LedgerStore for FailingStore {
    fn load(&self) -> Result<Option<Vec<BlockRecord>>, StoreError> {
        Ok(Some(Vec::new()))
    }

    fn save(&self, _records: &[BlockRecord]) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

fn registry() -> ProblemRegistry {
    ProblemRegistry::from_handlers([Arc::new(Upper) as Arc<dyn ProblemHandler>])
}

fn hasher() -> Sha256ChainHasher {
    Sha256ChainHasher::new()
}

/// A valid record solving `upper` for `parameters`, chained after `prev`.
fn record(prev: &str, parameters: &str) -> BlockRecord {
    let solution = parameters.to_uppercase();
    BlockRecord {
        problem: "upper".into(),
        parameters: parameters.into(),
        hash: hasher().hash(prev, "upper", parameters, &solution),
        solution,
        prev_hash: prev.into(),
    }
}

/// Valid linear chain of records starting at genesis.
fn chain(tags: &[&str]) -> Vec<BlockRecord> {
    let mut prev = NULL_HASH.to_string();
    tags.iter()
        .map(|tag| {
            let r = record(&prev, tag);
            prev = r.hash.clone();
            r
        })
        .collect()
}

struct Harness<L: LedgerStore + 'static> {
    service: ValidatorService<MailboxNetworkGateway, MailboxSolverGateway, L>,
    inbox: MailboxSender<ValidatorMessage>,
    network: Mailbox<NetworkMessage>,
    solver: Mailbox<SolverMessage>,
    shutdown: watch::Sender<bool>,
    recorder: RecordingObserver,
}

fn harness<L: LedgerStore + 'static>(store: Arc<L>) -> Harness<L> {
    let (inbox, validator_box) = mailbox();
    let (network_tx, network) = mailbox();
    let (solver_tx, solver) = mailbox();
    let (shutdown, shutdown_rx) = watch::channel(false);
    let recorder = RecordingObserver::new();

    let deps = ValidatorDependencies {
        config: ValidatorConfig {
            idle_ms: 1,
            block_tree: BlockTreeConfig::new(100, 100),
        },
        hasher: Arc::new(hasher()),
        network: Arc::new(MailboxNetworkGateway::new(network_tx)),
        solver: Arc::new(MailboxSolverGateway::new(solver_tx)),
        store,
        observer: Box::new(recorder.clone()),
    };

    Harness {
        service: ValidatorService::new(deps, validator_box, shutdown_rx),
        inbox,
        network,
        solver,
        shutdown,
        recorder,
    }
}

/// Harness already past initialization with an empty ledger.
fn running() -> Harness<InMemoryLedgerStore> {
    let mut h = harness(Arc::new(InMemoryLedgerStore::with_records(vec![])));
    h.inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();
    assert!(h.service.initialize());
    h.recorder.take();
    h
}

fn drain<M>(mailbox: &mut Mailbox<M>) -> Vec<M> {
    std::iter::from_fn(|| mailbox.try_recv().ok().flatten()).collect()
}

// === INITIALIZATION ===

#[test]
fn test_initialize_from_store() {
    let records = chain(&["a", "b", "c"]);
    let mut h = harness(Arc::new(InMemoryLedgerStore::with_records(records.clone())));
    h.inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();

    assert_eq!(h.service.state(), ComponentState::Uninitialized);
    assert!(h.service.initialize());

    assert_eq!(h.service.state(), ComponentState::Running);
    assert_eq!(h.service.ledger().top_block(), records[2].hash);
    assert!(h.service.registry().is_some());
    // Nothing requested from the network.
    assert!(drain(&mut h.network).is_empty());
}

#[test]
fn test_initialize_from_snapshot_preserves_other_messages() {
    let snapshot = chain(&["a", "b"]);
    let remote = record(&snapshot[1].hash, "c");
    let mut h = harness(Arc::new(InMemoryLedgerStore::new()));

    h.inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();
    h.inbox
        .send(ValidatorMessage::RemoteBlock(remote.clone()))
        .unwrap();
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer(encode_snapshot(&snapshot)))
        .unwrap();

    assert!(h.service.initialize());
    assert_eq!(drain(&mut h.network), vec![NetworkMessage::RequestFullLedger]);
    assert_eq!(h.service.ledger().top_block(), snapshot[1].hash);

    // The remote block was stashed during initialization and is handled now.
    assert_eq!(h.service.run_once(), Ok(true));
    assert_eq!(h.service.ledger().top_block(), remote.hash);
    assert_eq!(h.service.run_once(), Ok(false));
}

#[test]
fn test_initialize_rerequests_after_rejected_snapshot() {
    let good = chain(&["a", "b"]);
    let mut bad = good.clone();
    bad[1].hash = "forged".into();

    let mut h = harness(Arc::new(InMemoryLedgerStore::new()));
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer(encode_snapshot(&bad)))
        .unwrap();
    h.inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer(encode_snapshot(&good)))
        .unwrap();

    assert!(h.service.initialize());
    assert_eq!(
        drain(&mut h.network),
        vec![NetworkMessage::RequestFullLedger, NetworkMessage::RequestFullLedger]
    );
    assert_eq!(h.service.ledger().top_block(), good[1].hash);
}

#[test]
fn test_initialize_stops_on_shutdown() {
    let mut h = harness(Arc::new(InMemoryLedgerStore::new()));
    h.shutdown.send(true).unwrap();

    assert!(!h.service.initialize());
    assert_eq!(h.service.state(), ComponentState::Initializing);
}

#[test]
fn test_run_without_registry_stops_without_persisting() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let mut h = harness(store.clone());
    h.shutdown.send(true).unwrap();

    assert!(h.service.run().is_ok());
    assert_eq!(h.service.state(), ComponentState::Stopped);
    assert!(store.records().is_none());
}

// === RUNNING ===

#[test]
fn test_local_solution_accepted_and_broadcast() {
    let mut h = running();
    h.inbox
        .send(ValidatorMessage::ProblemSolved {
            problem: "upper".into(),
            parameters: "abc".into(),
            solution: "ABC".into(),
        })
        .unwrap();

    assert_eq!(h.service.run_once(), Ok(true));

    let expected = record(NULL_HASH, "abc");
    assert_eq!(h.service.ledger().top_block(), expected.hash);
    assert_eq!(drain(&mut h.network), vec![NetworkMessage::BroadcastBlock(expected)]);
    assert!(drain(&mut h.solver).is_empty());
}

#[test]
fn test_local_solution_chains_on_top_block() {
    let mut h = running();
    for parameters in ["a", "b"] {
        h.inbox
            .send(ValidatorMessage::ProblemSolved {
                problem: "upper".into(),
                parameters: parameters.into(),
                solution: parameters.to_uppercase(),
            })
            .unwrap();
        h.service.run_once().unwrap();
    }

    let expected = chain(&["a", "b"]);
    assert_eq!(h.service.ledger().top_block(), expected[1].hash);
    assert_eq!(
        drain(&mut h.network),
        expected
            .into_iter()
            .map(NetworkMessage::BroadcastBlock)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_incorrect_local_solution_discarded() {
    let mut h = running();
    h.inbox
        .send(ValidatorMessage::ProblemSolved {
            problem: "upper".into(),
            parameters: "abc".into(),
            solution: "abc".into(),
        })
        .unwrap();
    h.inbox
        .send(ValidatorMessage::ProblemSolved {
            problem: "unknown".into(),
            parameters: "abc".into(),
            solution: "ABC".into(),
        })
        .unwrap();

    h.service.run_once().unwrap();
    h.service.run_once().unwrap();

    assert!(h.service.ledger().is_empty());
    assert!(drain(&mut h.network).is_empty());
}

#[test]
fn test_remote_block_accepted_cancels_work() {
    let mut h = running();
    let remote = record(NULL_HASH, "abc");
    h.inbox
        .send(ValidatorMessage::RemoteBlock(remote.clone()))
        .unwrap();

    h.service.run_once().unwrap();

    assert!(h.service.ledger().contains(&remote.hash));
    assert_eq!(
        drain(&mut h.solver),
        vec![SolverMessage::Cancel(WorkItem::new("upper", "abc"))]
    );
    assert!(drain(&mut h.network).is_empty());
    assert!(matches!(
        h.recorder.events().as_slice(),
        [LedgerEvent::BlockAdded { block, .. }] if block.hash == remote.hash
    ));
}

#[test]
fn test_remote_block_rejections() {
    let mut h = running();
    let good = record(NULL_HASH, "abc");
    let mut forged = record(NULL_HASH, "xyz");
    forged.hash = "forged".into();
    let orphan = record("nowhere", "abc");

    for message in [
        ValidatorMessage::RemoteBlock(forged),
        ValidatorMessage::RemoteBlock(orphan),
        ValidatorMessage::RemoteBlock(good.clone()),
        ValidatorMessage::RemoteBlock(good.clone()),
    ] {
        h.inbox.send(message).unwrap();
        h.service.run_once().unwrap();
    }

    assert_eq!(h.service.ledger().len(), 1);
    assert!(h.service.ledger().contains(&good.hash));
    // Only the first copy of the good block cancels work.
    assert_eq!(drain(&mut h.solver).len(), 1);
}

#[test]
fn test_running_snapshot_adopted() {
    let mut h = running();
    let snapshot = chain(&["a", "b", "c"]);
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer(encode_snapshot(&snapshot)))
        .unwrap();

    h.service.run_once().unwrap();

    assert_eq!(h.service.ledger().top_block(), snapshot[2].hash);
    assert_eq!(
        h.recorder.events(),
        vec![LedgerEvent::LedgerReplaced {
            top_block: snapshot[2].hash.clone(),
            bedrock_count: 0
        }]
    );
}

#[test]
fn test_invalid_snapshot_leaves_ledger_untouched() {
    let mut h = running();
    let existing = record(NULL_HASH, "keep");
    h.inbox
        .send(ValidatorMessage::RemoteBlock(existing.clone()))
        .unwrap();
    h.service.run_once().unwrap();
    let before = h.service.ledger().decompile();

    let mut tampered = chain(&["a", "b", "c"]);
    tampered[2].hash = "forged".into();
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer(encode_snapshot(&tampered)))
        .unwrap();
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer("not json".into()))
        .unwrap();
    h.service.run_once().unwrap();
    h.service.run_once().unwrap();

    assert_eq!(h.service.ledger().decompile(), before);
    assert_eq!(h.service.ledger().top_block(), existing.hash);
}

#[test]
fn test_snapshot_with_unknown_predecessor_is_not_partially_adopted() {
    let mut h = running();

    let mut snapshot = chain(&["a", "b"]);
    snapshot.push(record("ZmFicmljYXRlZA==", "x"));
    h.inbox
        .send(ValidatorMessage::FullLedgerOffer(encode_snapshot(&snapshot)))
        .unwrap();
    h.service.run_once().unwrap();

    assert_eq!(h.service.ledger().top_block(), NULL_HASH);
    assert_eq!(h.service.ledger().len(), 0);
    assert!(h.recorder.events().is_empty());
}

#[test]
fn test_full_ledger_requested_is_served() {
    let mut h = running();
    let remote = record(NULL_HASH, "abc");
    h.inbox.send(ValidatorMessage::RemoteBlock(remote.clone())).unwrap();
    h.inbox.send(ValidatorMessage::FullLedgerRequested).unwrap();

    h.service.run_once().unwrap();
    h.service.run_once().unwrap();

    match drain(&mut h.network).as_slice() {
        [NetworkMessage::FullLedger(payload)] => {
            assert_eq!(decode_snapshot(payload).unwrap(), vec![remote]);
        }
        other => panic!("unexpected network traffic: {other:?}"),
    }
}

#[test]
fn test_repeated_registry_ignored() {
    let mut h = running();
    h.inbox
        .send(ValidatorMessage::ProblemsRegistry(ProblemRegistry::default()))
        .unwrap();

    h.service.run_once().unwrap();

    assert_eq!(h.service.registry().map(|r| r.len()), Some(1));
}

// === SHUTDOWN ===

#[test]
fn test_spawned_validator_persists_on_shutdown() {
    let store = Arc::new(InMemoryLedgerStore::new());
    let h = harness(store.clone());
    let Harness {
        service,
        inbox,
        mut network,
        shutdown,
        ..
    } = h;

    let handle = service.spawn().unwrap();
    inbox
        .send(ValidatorMessage::FullLedgerOffer("[]".into()))
        .unwrap();
    inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();
    inbox
        .send(ValidatorMessage::ProblemSolved {
            problem: "upper".into(),
            parameters: "abc".into(),
            solution: "ABC".into(),
        })
        .unwrap();

    // Wait for the broadcast so the block is known to be in the ledger.
    let broadcast = loop {
        if let Some(message) = network.try_recv().unwrap() {
            if let NetworkMessage::BroadcastBlock(record) = message {
                break record;
            }
        } else {
            std::thread::sleep(Duration::from_millis(1));
        }
    };

    shutdown.send(true).unwrap();
    handle.join().unwrap().unwrap();

    assert_eq!(store.records(), Some(vec![broadcast]));
}

#[test]
fn test_inbox_closure_stops_and_persists() {
    let store = Arc::new(InMemoryLedgerStore::with_records(vec![]));
    let Harness {
        mut service,
        inbox,
        shutdown: _shutdown,
        ..
    } = harness(store.clone());
    inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();
    inbox
        .send(ValidatorMessage::RemoteBlock(record(NULL_HASH, "abc")))
        .unwrap();
    drop(inbox);

    assert!(service.run().is_ok());
    assert_eq!(service.state(), ComponentState::Stopped);
    assert_eq!(store.records(), Some(vec![record(NULL_HASH, "abc")]));
}

#[test]
fn test_persistence_failure_surfaces() {
    let Harness {
        mut service,
        inbox,
        shutdown: _shutdown,
        ..
    } = harness(Arc::new(FailingStore));
    inbox
        .send(ValidatorMessage::ProblemsRegistry(registry()))
        .unwrap();
    drop(inbox);

    assert!(matches!(
        service.run(),
        Err(ValidatorError::Persistence(StoreError::Io(_)))
    ));
}
