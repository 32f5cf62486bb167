//! # Mailboxes
//!
//! One unbounded multi-producer/single-consumer queue per recipient.
//!
//! `send` never blocks. The owner drains one message at a time with
//! [`Mailbox::try_recv`], or waits for one specific message with
//! [`Mailbox::recv_matching`]. Messages skipped by a selective wait are
//! stashed and put back in front of the queue in their original order, so
//! the next `try_recv` sees them exactly as if the wait never happened.

use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from mailbox operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// Every sender (or the receiver) is gone.
    #[error("Mailbox closed")]
    Closed,
}

/// Create a connected sender/mailbox pair.
pub fn mailbox<M>() -> (MailboxSender<M>, Mailbox<M>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        MailboxSender { inner: sender },
        Mailbox {
            receiver,
            pending: VecDeque::new(),
        },
    )
}

/// Cloneable sending half.
#[derive(Debug)]
pub struct MailboxSender<M> {
    inner: mpsc::UnboundedSender<M>,
}

impl<M> Clone for MailboxSender<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M> MailboxSender<M> {
    /// Enqueue a message. Fails only when the owning mailbox was dropped.
    pub fn send(&self, message: M) -> Result<(), MailboxError> {
        self.inner.send(message).map_err(|_| MailboxError::Closed)
    }

    /// Whether the owning mailbox was dropped.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

/// Receiving half, owned by exactly one component.
#[derive(Debug)]
pub struct Mailbox<M> {
    receiver: mpsc::UnboundedReceiver<M>,
    /// Messages put back after a selective receive; always drained first.
    pending: VecDeque<M>,
}

impl<M> Mailbox<M> {
    /// Take the next message, if any.
    ///
    /// Returns `Err(Closed)` only once the queue is empty and every sender
    /// has been dropped.
    pub fn try_recv(&mut self) -> Result<Option<M>, MailboxError> {
        if let Some(message) = self.pending.pop_front() {
            return Ok(Some(message));
        }
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(MailboxError::Closed),
        }
    }

    /// Wait until a message satisfying `predicate` arrives and return it.
    ///
    /// Non-matching messages are stashed and re-queued ahead of everything
    /// still in the mailbox, preserving FIFO order. Polls every `poll` while
    /// the queue is empty. Returns `Ok(None)` as soon as `stop` reports true.
    pub fn recv_matching<F>(
        &mut self,
        mut predicate: F,
        poll: Duration,
        stop: &dyn Fn() -> bool,
    ) -> Result<Option<M>, MailboxError>
    where
        F: FnMut(&M) -> bool,
    {
        let mut stash = VecDeque::new();
        let outcome = loop {
            if stop() {
                break Ok(None);
            }
            match self.try_recv() {
                Ok(Some(message)) if predicate(&message) => break Ok(Some(message)),
                Ok(Some(message)) => stash.push_back(message),
                Ok(None) => std::thread::sleep(poll),
                Err(e) => break Err(e),
            }
        };
        self.restash(stash);
        outcome
    }

    /// Number of messages already pulled off the channel but not yet consumed.
    pub fn stashed(&self) -> usize {
        self.pending.len()
    }

    /// Stop accepting new messages. Already queued messages stay readable.
    pub fn close(&mut self) {
        self.receiver.close();
    }

    fn restash(&mut self, mut stash: VecDeque<M>) {
        stash.append(&mut self.pending);
        self.pending = stash;
    }
}
