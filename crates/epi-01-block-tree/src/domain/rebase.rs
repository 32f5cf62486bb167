//! # Rebase
//!
//! Moving a block under a new parent changes its hash, and therefore the
//! hash of every descendant. The whole subtree is planned first (parent
//! before children) so that any failure leaves the ledger untouched.

use super::{BlockTreeError, BlockTreeResult, Ledger};
use shared_types::Hash;
use std::collections::{HashSet, VecDeque};
use tracing::info;

/// One block of the subtree being moved.
#[derive(Debug)]
struct Relink {
    old_hash: Hash,
    old_parent: Hash,
    new_parent: Hash,
    new_hash: Hash,
}

impl Ledger {
    /// Re-parent `hash` onto `new_preceding_hash`, re-hashing it and its
    /// whole subtree, then rebuild branches.
    ///
    /// Returns the block's new hash. The old hashes of the moved blocks are
    /// no longer resolvable afterwards.
    pub fn rebase(&mut self, hash: &str, new_preceding_hash: &str) -> BlockTreeResult<Hash> {
        if self.lca.block.hash == hash {
            return Err(BlockTreeError::FrozenFrontier(hash.to_string()));
        }
        if !self.contains(hash) {
            return Err(BlockTreeError::UnknownBlock(hash.to_string()));
        }
        if !self.can_branch(new_preceding_hash) {
            return Err(BlockTreeError::UnknownParent(new_preceding_hash.to_string()));
        }
        if self.is_descendant_or_self(new_preceding_hash, hash) {
            return Err(BlockTreeError::WouldCycle {
                hash: hash.to_string(),
                new_parent: new_preceding_hash.to_string(),
            });
        }

        let plan = self.plan_relinks(hash, new_preceding_hash);
        let mut fresh = HashSet::new();
        for relink in &plan {
            if self.can_branch(&relink.new_hash) || !fresh.insert(relink.new_hash.as_str()) {
                return Err(BlockTreeError::HashCollision(relink.new_hash.clone()));
            }
        }

        if let Some(old_parent) = self.tree.get(hash).and_then(|n| n.preceding_hash.clone()) {
            if let Some(parent) = self.node_mut(&old_parent) {
                parent.children.retain(|child| child != hash);
            }
        }

        for relink in &plan {
            let Some(mut node) = self.tree.remove(&relink.old_hash) else {
                continue;
            };
            node.block.hash = relink.new_hash.clone();
            node.preceding_hash = Some(relink.new_parent.clone());
            node.children.clear();
            node.member_branches.clear();
            node.seq = self.allocate_seq();

            if let Some(parent) = self.node_mut(&relink.new_parent) {
                parent.children.push(relink.new_hash.clone());
            }
            self.observer.branch_rebased(
                &node.block,
                &relink.old_parent,
                &relink.old_hash,
                &relink.new_parent,
            );
            self.tree.insert(relink.new_hash.clone(), node);
        }

        self.update_and_prune(true);

        let new_hash = plan
            .first()
            .map(|relink| relink.new_hash.clone())
            .ok_or_else(|| BlockTreeError::UnknownBlock(hash.to_string()))?;
        info!(
            old = %hash,
            new = %new_hash,
            parent = %new_preceding_hash,
            moved = plan.len(),
            "[epi-01] Branch rebased"
        );
        Ok(new_hash)
    }

    /// Walk up from `candidate`; true if `ancestor` is on the way.
    fn is_descendant_or_self(&self, candidate: &str, ancestor: &str) -> bool {
        let mut current = Some(candidate);
        while let Some(hash) = current {
            if hash == ancestor {
                return true;
            }
            current = self
                .tree
                .get(hash)
                .and_then(|node| node.preceding_hash.as_deref());
        }
        false
    }

    /// Breadth-first over the subtree rooted at `root`, children in order.
    fn plan_relinks(&self, root: &str, new_parent: &str) -> Vec<Relink> {
        let mut plan = Vec::new();
        let mut queue: VecDeque<(Hash, Hash)> = VecDeque::new();
        queue.push_back((root.to_string(), new_parent.to_string()));

        while let Some((old_hash, new_parent)) = queue.pop_front() {
            let Some(node) = self.tree.get(&old_hash) else {
                continue;
            };
            let block = &node.block;
            let new_hash =
                self.hasher
                    .hash(&new_parent, &block.problem, &block.parameters, &block.solution);

            for child in &node.children {
                queue.push_back((child.clone(), new_hash.clone()));
            }
            plan.push(Relink {
                old_parent: node.preceding_hash.clone().unwrap_or_default(),
                old_hash,
                new_parent,
                new_hash,
            });
        }
        plan
    }
}
