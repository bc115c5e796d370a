//! FIFO queue of variables awaiting constraint propagation.
//!
//! The queue never wraps: `front` and `back` only ever grow, and a
//! [`Checkpoint`] can rewind both back to where they stood when a branch was
//! opened. This is sound because a cell's domain only ever shrinks along a
//! single active (non-backtracked) solve path, so a variable is pushed at
//! most once between any two collapses of it — the buffer never needs more
//! than one slot per variable, and `N` (the wave's length) is always enough.

/// A FIFO queue of variable indices, deduplicated while pending.
pub struct PropagationQueue {
    buf: Vec<usize>,
    front: usize,
    back: usize,
    queued: Vec<bool>,
}

impl PropagationQueue {
    /// A queue sized for a wave of `len` variables.
    pub fn new(len: usize) -> Self {
        Self {
            buf: vec![0; len],
            front: 0,
            back: 0,
            queued: vec![false; len],
        }
    }

    /// Whether there is nothing left to propagate.
    pub fn is_empty(&self) -> bool {
        self.front == self.back
    }

    /// Whether the queue has no room for another push without a checkpoint
    /// first being restored.
    pub fn is_full(&self) -> bool {
        self.back == self.buf.len()
    }

    /// Whether `cell` is currently pending propagation.
    pub fn has(&self, cell: usize) -> bool {
        self.queued[cell]
    }

    /// Enqueue `cell`.
    ///
    /// `cell` must not already be pending — the solver only ever calls this
    /// on a genuine not-collapsed-to-collapsed transition, which by
    /// construction happens at most once per cell between any two
    /// checkpoints, so a debug build catches any double-push as a bug
    /// rather than silently coalescing it.
    pub fn push(&mut self, cell: usize) {
        debug_assert!(!self.is_full(), "propagation queue overflow");
        debug_assert!(!self.has(cell), "cell pushed while already pending");
        self.buf[self.back] = cell;
        self.back += 1;
        self.queued[cell] = true;
    }

    /// Dequeue the next variable to propagate, in FIFO order.
    pub fn pop(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let var = self.buf[self.front];
        self.front += 1;
        self.queued[var] = false;
        Some(var)
    }

    /// Open a checkpoint. Dropping the returned guard without calling
    /// [`Checkpoint::commit`] rewinds the queue to this point, undoing every
    /// push and pop made since.
    pub fn checkpoint(&mut self) -> Checkpoint<'_> {
        Checkpoint {
            front: self.front,
            back: self.back,
            queue: self,
            committed: false,
        }
    }
}

/// A guard over a [`PropagationQueue`] that restores its front/back cursors
/// on drop unless [`Checkpoint::commit`] is called first.
pub struct Checkpoint<'a> {
    queue: &'a mut PropagationQueue,
    front: usize,
    back: usize,
    committed: bool,
}

impl Checkpoint<'_> {
    /// Keep everything pushed and popped since this checkpoint was opened.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl std::ops::Deref for Checkpoint<'_> {
    type Target = PropagationQueue;

    fn deref(&self) -> &Self::Target {
        self.queue
    }
}

impl std::ops::DerefMut for Checkpoint<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.queue
    }
}

impl Drop for Checkpoint<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for i in self.back..self.queue.back {
            let var = self.queue.buf[i];
            self.queue.queued[var] = false;
        }
        self.queue.front = self.front;
        self.queue.back = self.back;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut q = PropagationQueue::new(4);
        q.push(2);
        q.push(0);
        q.push(3);
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn has_tracks_pending_membership() {
        let mut q = PropagationQueue::new(4);
        q.push(1);
        assert!(q.has(1));
        assert_eq!(q.pop(), Some(1));
        assert!(!q.has(1));
        // once popped, it can be queued again
        q.push(1);
        assert!(q.has(1));
    }

    #[test]
    #[should_panic(expected = "already pending")]
    fn duplicate_push_panics_in_debug() {
        let mut q = PropagationQueue::new(4);
        q.push(1);
        q.push(1);
    }

    #[test]
    fn checkpoint_rewinds_on_drop() {
        let mut q = PropagationQueue::new(4);
        q.push(0);
        q.pop();
        {
            let mut cp = q.checkpoint();
            cp.push(1);
            cp.push(2);
            cp.pop();
        }
        assert!(q.is_empty());
        assert!(!q.queued[1]);
        assert!(!q.queued[2]);
        // state is exactly as it was before the checkpoint was opened
        q.push(1);
        assert!(q.has(1));
    }

    #[test]
    fn checkpoint_commit_keeps_changes() {
        let mut q = PropagationQueue::new(4);
        {
            let mut cp = q.checkpoint();
            cp.push(3);
            cp.commit();
        }
        assert_eq!(q.pop(), Some(3));
    }
}
