//! # Double-buffered workspace shared between a worker and its controller.
//!
//! A [`Workspace`] owns the live, controller-visible value behind an
//! [`ExclusiveLock`]; a background worker computes on a private
//! [`WorkingCopy`] and exchanges whole buffers with the live side under the
//! lock. Every critical section is a bounded clone — no computation runs
//! while the lock is held, so the controller never observes a partially
//! updated buffer.
//!
//! ## Edit reconciliation
//! Controller edits bump a generation counter under the lock. A worker's
//! [`publish`](WorkingCopy::publish) is refused when the live generation has
//! moved past what the copy last saw — the worker then
//! [`refresh`](WorkingCopy::refresh)es and recomputes from the edited state.
//! Controller edits therefore always win; a publish never silently clobbers
//! them, and a whole-buffer publish never tears a concurrent edit.
//!
//! ```text
//! controller                     worker
//! ──────────                     ──────
//! edit(|v| ...)  gen += 1        refresh()  pulls live when gen moved
//! snapshot()     clone of live   publish()  working → live iff gen unmoved
//! ```

use crate::error::LockError;
use crate::sync::ExclusiveLock;

struct Versioned<T> {
    value: T,
    edits: u64,
}

/// # Lock-protected live value with edit generations.
///
/// # Example
/// ```
/// use threadvisor::Workspace;
///
/// let ws = Workspace::new(vec![0u8; 16]);
/// let mut copy = ws.checkout()?;
///
/// copy.get_mut().fill(1);
/// assert!(copy.publish(&ws)?, "no edits intervened");
/// assert_eq!(ws.snapshot()?, vec![1u8; 16]);
///
/// // A controller edit refuses the next stale publish.
/// ws.edit(|v| v[0] = 9)?;
/// copy.get_mut().fill(2);
/// assert!(!copy.publish(&ws)?, "stale publish must be refused");
/// assert!(copy.refresh(&ws)?, "copy picks up the edit");
/// assert_eq!(copy.get()[0], 9);
/// # Ok::<(), threadvisor::LockError>(())
/// ```
pub struct Workspace<T> {
    live: ExclusiveLock<Versioned<T>>,
}

impl<T: Clone> Workspace<T> {
    /// Creates a workspace whose live value starts as `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            live: ExclusiveLock::new(Versioned {
                value: initial,
                edits: 0,
            }),
        }
    }

    /// Clones the live value under the lock.
    ///
    /// Safe to call every frame; the critical section is one clone.
    pub fn snapshot(&self) -> Result<T, LockError> {
        let guard = self.live.acquire()?;
        Ok(guard.value.clone())
    }

    /// Applies a controller edit to the live value under the lock and bumps
    /// the edit generation.
    ///
    /// Keep `f` bounded — it runs inside the critical section.
    pub fn edit<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, LockError> {
        let mut guard = self.live.acquire()?;
        let out = f(&mut guard.value);
        guard.edits += 1;
        Ok(out)
    }

    /// Checks out a private working copy of the current live value.
    pub fn checkout(&self) -> Result<WorkingCopy<T>, LockError> {
        let guard = self.live.acquire()?;
        Ok(WorkingCopy {
            value: guard.value.clone(),
            seen: guard.edits,
        })
    }
}

impl<T: Clone + Default> Default for Workspace<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Private working copy owned by one background computation.
///
/// Mutate it freely without locking; exchange with the live side through
/// [`refresh`](WorkingCopy::refresh) and [`publish`](WorkingCopy::publish).
pub struct WorkingCopy<T> {
    value: T,
    seen: u64,
}

impl<T: Clone> WorkingCopy<T> {
    /// The working value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access to the working value. No lock is involved: the copy is
    /// private to its owner.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Pulls the live value into this copy when controller edits have landed
    /// since the copy last synced. Returns whether a pull happened.
    pub fn refresh(&mut self, ws: &Workspace<T>) -> Result<bool, LockError> {
        let guard = ws.live.acquire()?;
        if guard.edits == self.seen {
            return Ok(false);
        }
        self.value.clone_from(&guard.value);
        self.seen = guard.edits;
        Ok(true)
    }

    /// Publishes this copy as the new live value.
    ///
    /// Refused (returns `false`, live untouched) when controller edits landed
    /// since the copy last synced; call [`refresh`](WorkingCopy::refresh) and
    /// recompute. On success the live buffer is replaced wholesale within one
    /// bounded critical section.
    pub fn publish(&mut self, ws: &Workspace<T>) -> Result<bool, LockError> {
        let mut guard = ws.live.acquire()?;
        if guard.edits != self.seen {
            return Ok(false);
        }
        guard.value.clone_from(&self.value);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_publish_replaces_live() {
        let ws = Workspace::new(vec![0u32; 8]);
        let mut copy = ws.checkout().expect("checkout");
        copy.get_mut()[3] = 42;
        assert!(copy.publish(&ws).expect("publish"));
        assert_eq!(ws.snapshot().expect("snapshot")[3], 42);
    }

    #[test]
    fn test_edit_wins_over_stale_publish() {
        let ws = Workspace::new(0u64);
        let mut copy = ws.checkout().expect("checkout");

        ws.edit(|v| *v = 10).expect("edit");
        *copy.get_mut() = 99;

        assert!(!copy.publish(&ws).expect("publish"), "stale publish refused");
        assert_eq!(ws.snapshot().expect("snapshot"), 10, "edit preserved");

        assert!(copy.refresh(&ws).expect("refresh"));
        assert_eq!(*copy.get(), 10);
        assert!(copy.publish(&ws).expect("publish after refresh"));
    }

    #[test]
    fn test_refresh_is_noop_without_edits() {
        let ws = Workspace::new(5u8);
        let mut copy = ws.checkout().expect("checkout");
        assert!(!copy.refresh(&ws).expect("refresh"));
    }

    #[test]
    fn test_concurrent_publishes_never_tear() {
        // Two sides each replace the whole buffer with a uniform fill; any
        // snapshot must be uniform regardless of interleaving.
        let ws = Arc::new(Workspace::new(vec![0u8; 256]));

        let publisher = {
            let ws = Arc::clone(&ws);
            thread::spawn(move || {
                let mut copy = ws.checkout().expect("checkout");
                for round in 0..200u32 {
                    copy.get_mut().fill((round % 250) as u8 + 1);
                    if !copy.publish(&ws).expect("publish") {
                        copy.refresh(&ws).expect("refresh");
                    }
                }
            })
        };

        for _ in 0..200 {
            let seen = ws.snapshot().expect("snapshot");
            let first = seen[0];
            assert!(
                seen.iter().all(|&c| c == first),
                "snapshot observed a torn buffer"
            );
        }
        publisher.join().expect("publisher");
    }

    #[test]
    fn test_generation_tracks_every_edit() {
        let ws = Workspace::new(0u32);
        let mut copy = ws.checkout().expect("checkout");
        for i in 1..=5 {
            ws.edit(|v| *v = i).expect("edit");
        }
        assert!(copy.refresh(&ws).expect("refresh"));
        assert_eq!(*copy.get(), 5);
        assert!(copy.publish(&ws).expect("publish"));
    }
}
