//! # Node Runs
//!
//! Full [`NodeRuntime`] instances on their own threads: solve, persist on
//! shutdown, restore on restart.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use epi_03_solver::{PrimeFactorization, TypedProblem};
    use node_runtime::{NodeConfig, NodeRuntime};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, LedgerEvent, Subscription};
    use shared_types::{Hash, NULL_HASH};
    use tempfile::TempDir;
    use tokio::time::timeout;

    fn config(dir: &TempDir) -> NodeConfig {
        let mut config = NodeConfig {
            data_dir: dir.path().to_path_buf(),
            ..NodeConfig::default()
        };
        config.validator.idle_ms = 1;
        config.solver.idle_ms = 1;
        config.validator.block_tree.bedrock_delta = 2;
        config.validator.block_tree.branch_length_delta = 2;
        config
    }

    async fn next(events: &mut Subscription) -> LedgerEvent {
        timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("event within timeout")
            .expect("bus open")
    }

    /// Start a node whose bus already has a subscriber for every topic.
    fn start(dir: &TempDir) -> (NodeRuntime, Subscription) {
        let bus = Arc::new(InMemoryEventBus::new());
        let events = bus.subscribe(EventFilter::all());
        let runtime = NodeRuntime::start_with_event_bus(config(dir), bus).unwrap();
        (runtime, events)
    }

    /// Solve `n` and return the (hash, parent) of the resulting block.
    async fn solve(runtime: &NodeRuntime, events: &mut Subscription, n: u64) -> (Hash, Hash) {
        runtime
            .solve_problem(PrimeFactorization::ID, format!(r#"{{"o":{n}}}"#))
            .unwrap();
        loop {
            if let LedgerEvent::BlockAdded { block, parent } = next(events).await {
                return (block.hash, parent);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_node_persists_and_restores_ledger() {
        let dir = TempDir::new().unwrap();

        let (runtime, mut events) = start(&dir);
        assert!(matches!(
            next(&mut events).await,
            LedgerEvent::LedgerReplaced { .. }
        ));
        let (first, parent) = solve(&runtime, &mut events, 242).await;
        assert_eq!(parent, NULL_HASH);
        let (second, parent) = solve(&runtime, &mut events, 12).await;
        assert_eq!(parent, first);
        runtime.shutdown().unwrap();

        let (runtime, mut events) = start(&dir);
        match next(&mut events).await {
            LedgerEvent::LedgerReplaced { top_block, .. } => assert_eq!(top_block, second),
            other => panic!("expected LedgerReplaced, got {other:?}"),
        }
        let (_, parent) = solve(&runtime, &mut events, 30).await;
        assert_eq!(parent, second);
        runtime.shutdown().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_linear_growth_immortalizes_blocks() {
        let dir = TempDir::new().unwrap();
        let (runtime, events) = start(&dir);
        let bus = runtime.event_bus();
        let mut finality = bus.subscribe(EventFilter::topics(vec![EventTopic::Finality]));
        drop(events);

        let mut tree = bus.subscribe(EventFilter::topics(vec![EventTopic::Tree]));
        for n in [6, 10, 14, 22] {
            solve(&runtime, &mut tree, n).await;
        }

        // Deltas of 2: the chain outgrows the frontier and genesis hardens first.
        match next(&mut finality).await {
            LedgerEvent::BlockImmortalized(block) => assert!(block.is_genesis()),
            other => panic!("expected BlockImmortalized, got {other:?}"),
        }
        runtime.shutdown().unwrap();
    }
}
