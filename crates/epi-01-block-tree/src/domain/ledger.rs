//! # Ledger
//!
//! Blocks live in an arena keyed by hash. Each branch is a list of hashes
//! from the LCA (exclusive) to one tip, and every tree block records which
//! branches contain it. The LCA is held apart from the arena: it has no
//! tracked parent and belongs to no branch.
//!
//! ## Insertion
//!
//! ```text
//! parent is a tip ──→ every branch ending at parent grows by one
//! otherwise       ──→ new branch = path(LCA → parent) + [block]
//! ```
//!
//! ## Maintenance (`update_and_prune`)
//!
//! 1. optionally rebuild all branches from child links
//! 2. prune branches trailing the longest by `branch_length_delta` or more
//! 3. while the longest branch exceeds `bedrock_delta` and every branch
//!    starts with the same block, freeze the LCA into bedrock and promote
//!    that block

use super::{BlockTreeConfig, BranchId, TreeBlock};
use crate::adapters::NoOpObserver;
use crate::ports::LedgerObserver;
use shared_crypto::ChainHasher;
use shared_types::{Block, BlockRecord, Hash};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The block tree plus its frozen history.
pub struct Ledger {
    pub(super) config: BlockTreeConfig,
    pub(super) hasher: Arc<dyn ChainHasher>,
    pub(super) observer: Box<dyn LedgerObserver + Send>,
    /// Irreversible history, oldest first. Starts with the genesis sentinel
    /// once the frontier has moved at least once.
    pub(super) bedrocks: Vec<Block>,
    /// Finality frontier.
    pub(super) lca: TreeBlock,
    /// Every tracked block except the LCA.
    pub(super) tree: HashMap<Hash, TreeBlock>,
    pub(super) branches: BTreeMap<BranchId, Vec<Hash>>,
    pub(super) longest_branch_length: usize,
    pub(super) next_branch_id: u64,
    pub(super) next_seq: u64,
    /// Set while compiling; suppresses per-insert maintenance.
    pub(super) bulk_loading: bool,
}

impl Ledger {
    /// Empty ledger: the LCA is the genesis sentinel, nothing else is tracked.
    pub fn new(config: BlockTreeConfig, hasher: Arc<dyn ChainHasher>) -> Self {
        Self {
            config,
            hasher,
            observer: Box::new(NoOpObserver),
            bedrocks: Vec::new(),
            lca: TreeBlock::new(Block::genesis(), None, 0),
            tree: HashMap::new(),
            branches: BTreeMap::new(),
            longest_branch_length: 0,
            next_branch_id: 0,
            next_seq: 1,
            bulk_loading: false,
        }
    }

    /// Attach an observer (builder style).
    pub fn with_observer(mut self, observer: Box<dyn LedgerObserver + Send>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the observer, returning the previous one.
    pub fn set_observer(
        &mut self,
        observer: Box<dyn LedgerObserver + Send>,
    ) -> Box<dyn LedgerObserver + Send> {
        std::mem::replace(&mut self.observer, observer)
    }

    /// Take the observer out, leaving a no-op in its place.
    pub fn take_observer(&mut self) -> Box<dyn LedgerObserver + Send> {
        self.set_observer(Box::new(NoOpObserver))
    }

    /// Swap in an adopted ledger. The current observer stays attached.
    pub fn replace_with(&mut self, other: Ledger) {
        let observer = self.take_observer();
        *self = other;
        self.observer = observer;
        self.observer
            .ledger_replaced(&self.top_block(), self.bedrocks.len());
        debug!(
            top_block = %self.top_block(),
            bedrocks = self.bedrocks.len(),
            "[epi-01] Ledger replaced"
        );
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Tip of the longest branch, or the LCA hash when there are no branches.
    ///
    /// Among equally long branches the tip inserted first wins.
    pub fn top_block(&self) -> Hash {
        self.branches
            .values()
            .filter(|branch| branch.len() == self.longest_branch_length)
            .filter_map(|branch| branch.last())
            .min_by_key(|tip| self.tree.get(*tip).map_or(u64::MAX, |node| node.seq))
            .cloned()
            .unwrap_or_else(|| self.lca.block.hash.clone())
    }

    /// Whether a block may be chained after `hash`.
    pub fn can_branch(&self, hash: &str) -> bool {
        self.get(hash).is_some()
    }

    /// Look up the LCA or a tracked block.
    pub fn get(&self, hash: &str) -> Option<&TreeBlock> {
        if self.lca.block.hash == hash {
            Some(&self.lca)
        } else {
            self.tree.get(hash)
        }
    }

    /// Whether `hash` is a tracked block above the LCA.
    pub fn contains(&self, hash: &str) -> bool {
        self.tree.contains_key(hash)
    }

    /// Number of tracked blocks above the LCA.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn lca(&self) -> &Block {
        &self.lca.block
    }

    pub fn bedrocks(&self) -> &[Block] {
        &self.bedrocks
    }

    pub fn branches(&self) -> &BTreeMap<BranchId, Vec<Hash>> {
        &self.branches
    }

    pub fn branch(&self, id: BranchId) -> Option<&[Hash]> {
        self.branches.get(&id).map(Vec::as_slice)
    }

    pub fn longest_branch_length(&self) -> usize {
        self.longest_branch_length
    }

    pub fn config(&self) -> &BlockTreeConfig {
        &self.config
    }

    pub fn hasher(&self) -> &Arc<dyn ChainHasher> {
        &self.hasher
    }

    /// Build a block chained after `prev`, hashing it with this ledger's hasher.
    pub fn chain_block(&self, prev: &str, problem: &str, parameters: &str, solution: &str) -> Block {
        Block {
            problem: problem.to_string(),
            parameters: parameters.to_string(),
            solution: solution.to_string(),
            hash: self.hasher.hash(prev, problem, parameters, solution),
        }
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Insert `block` after `preceding_hash`.
    ///
    /// Returns `false` without touching the ledger when the predecessor is
    /// not tracked or the hash already is. The caller is responsible for
    /// having validated the block.
    pub fn add_block(&mut self, block: Block, preceding_hash: &str) -> bool {
        if !self.can_branch(preceding_hash) {
            debug!(hash = %block.hash, parent = %preceding_hash, "[epi-01] Ignoring block with untracked parent");
            return false;
        }
        if self.can_branch(&block.hash) {
            debug!(hash = %block.hash, "[epi-01] Ignoring duplicate block");
            return false;
        }

        let hash = block.hash.clone();
        let extended: Option<Vec<BranchId>> = match self.tree.get(preceding_hash) {
            Some(parent) if parent.is_tip() && !parent.member_branches.is_empty() => {
                Some(parent.member_branches.iter().copied().collect())
            }
            _ => None,
        };

        let seq = self.allocate_seq();
        let mut node = TreeBlock::new(block, Some(preceding_hash.to_string()), seq);

        match extended {
            Some(ids) => {
                for id in ids {
                    if let Some(branch) = self.branches.get_mut(&id) {
                        branch.push(hash.clone());
                        node.member_branches.insert(id);
                        self.longest_branch_length = self.longest_branch_length.max(branch.len());
                    }
                }
            }
            None => {
                let id = self.allocate_branch_id();
                let mut path = self.path_to(preceding_hash);
                for member in &path {
                    if let Some(ancestor) = self.tree.get_mut(member) {
                        ancestor.member_branches.insert(id);
                    }
                }
                path.push(hash.clone());
                node.member_branches.insert(id);
                self.longest_branch_length = self.longest_branch_length.max(path.len());
                self.branches.insert(id, path);
                debug!(%id, parent = %preceding_hash, "[epi-01] Fork created");
            }
        }

        if let Some(parent) = self.node_mut(preceding_hash) {
            parent.children.push(hash.clone());
        }
        self.tree.insert(hash.clone(), node);

        if let Some(node) = self.tree.get(&hash) {
            self.observer.block_added(&node.block, &preceding_hash.to_string());
        }

        if !self.bulk_loading {
            self.update_and_prune(false);
        }
        true
    }

    /// Insert a flat record (see [`Ledger::add_block`]).
    pub fn add_record(&mut self, record: &BlockRecord) -> bool {
        self.add_block(record.block(), &record.prev_hash)
    }

    /// Restore the tree invariants: optionally rebuild branches, prune
    /// trailing branches, then advance finality as far as allowed.
    pub fn update_and_prune(&mut self, force_full_rebuild: bool) {
        if force_full_rebuild {
            self.rebuild_branches();
        }
        self.prune_trailing_branches();
        self.promote_converged();
    }

    /// Remove a branch. Blocks left in no branch are evicted.
    ///
    /// Returns `false` if no such branch exists.
    pub fn destroy_branch(&mut self, id: BranchId) -> bool {
        let Some(branch) = self.branches.remove(&id) else {
            return false;
        };

        for hash in branch.iter().rev() {
            let orphaned = match self.tree.get_mut(hash) {
                Some(node) => {
                    node.member_branches.remove(&id);
                    node.member_branches.is_empty()
                }
                None => false,
            };
            if orphaned {
                self.evict(hash);
            }
        }

        self.longest_branch_length = self.branches.values().map(Vec::len).max().unwrap_or(0);
        debug!(%id, length = branch.len(), "[epi-01] Branch destroyed");
        true
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    pub(super) fn node_mut(&mut self, hash: &str) -> Option<&mut TreeBlock> {
        if self.lca.block.hash == hash {
            Some(&mut self.lca)
        } else {
            self.tree.get_mut(hash)
        }
    }

    pub(super) fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn allocate_branch_id(&mut self) -> BranchId {
        let id = BranchId(self.next_branch_id);
        self.next_branch_id += 1;
        id
    }

    /// Hashes from just above the LCA down to `hash` (inclusive).
    /// Empty for the LCA itself.
    fn path_to(&self, hash: &str) -> Vec<Hash> {
        let mut path = Vec::new();
        let mut current = hash;
        while let Some(node) = self.tree.get(current) {
            path.push(current.to_string());
            match &node.preceding_hash {
                Some(prev) => current = prev.as_str(),
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Drop a block from the arena and from its parent's child list.
    fn evict(&mut self, hash: &str) {
        let Some(node) = self.tree.remove(hash) else {
            return;
        };
        if let Some(parent) = node.preceding_hash.as_deref().and_then(|p| self.node_mut(p)) {
            parent.children.retain(|child| child != hash);
        }
        self.observer.block_pruned(&node.block.hash);
        debug!(%hash, "[epi-01] Block pruned");
    }

    /// One branch per leaf, found by walking child links depth-first from
    /// the LCA. Children are visited in insertion order.
    fn rebuild_branches(&mut self) {
        self.branches.clear();
        self.longest_branch_length = 0;
        for node in self.tree.values_mut() {
            node.member_branches.clear();
        }

        let mut stack: Vec<(Hash, usize)> = self
            .lca
            .children
            .iter()
            .rev()
            .map(|child| (child.clone(), 0))
            .collect();
        let mut path: Vec<Hash> = Vec::new();

        while let Some((hash, depth)) = stack.pop() {
            let Some(children) = self.tree.get(&hash).map(|node| node.children.clone()) else {
                continue;
            };
            path.truncate(depth);
            path.push(hash);

            if children.is_empty() {
                let id = self.allocate_branch_id();
                for member in &path {
                    if let Some(node) = self.tree.get_mut(member) {
                        node.member_branches.insert(id);
                    }
                }
                self.longest_branch_length = self.longest_branch_length.max(path.len());
                self.branches.insert(id, path.clone());
            } else {
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }

        debug!(
            branches = self.branches.len(),
            longest = self.longest_branch_length,
            "[epi-01] Branches rebuilt"
        );
    }

    fn prune_trailing_branches(&mut self) {
        let longest = self.longest_branch_length;
        let delta = self.config.branch_length_delta;
        let doomed: Vec<BranchId> = self
            .branches
            .iter()
            .filter(|(_, branch)| {
                branch.len() < longest && longest - branch.len() >= delta
            })
            .map(|(id, _)| *id)
            .collect();

        for id in doomed {
            self.destroy_branch(id);
        }
    }

    /// The first hash shared by every branch, if they all agree.
    fn converged_first(&self) -> Option<Hash> {
        let mut branches = self.branches.values();
        let first = branches.next()?.first()?;
        branches
            .all(|branch| branch.first() == Some(first))
            .then(|| first.clone())
    }

    fn promote_converged(&mut self) {
        while self.longest_branch_length > self.config.bedrock_delta {
            let Some(next) = self.converged_first() else {
                break;
            };
            let Some(mut new_lca) = self.tree.remove(&next) else {
                break;
            };
            new_lca.preceding_hash = None;
            new_lca.member_branches.clear();

            for branch in self.branches.values_mut() {
                branch.remove(0);
            }
            self.branches.retain(|_, branch| !branch.is_empty());
            self.longest_branch_length -= 1;

            let old = std::mem::replace(&mut self.lca, new_lca);
            self.observer.block_immortalized(&old.block);
            self.bedrocks.push(old.block);
            self.observer.lca_changed(&self.lca.block);

            debug!(
                lca = %self.lca.block.hash,
                bedrocks = self.bedrocks.len(),
                "[epi-01] Finality frontier advanced"
            );
        }
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("config", &self.config)
            .field("lca", &self.lca.block.hash)
            .field("bedrocks", &self.bedrocks.len())
            .field("tracked", &self.tree.len())
            .field("branches", &self.branches.len())
            .field("longest_branch_length", &self.longest_branch_length)
            .finish()
    }
}
