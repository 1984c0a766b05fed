//! # Owner-tracked mutual exclusion with abandon detection.
//!
//! [`ExclusiveLock`] protects one value with classic blocking acquire
//! semantics: `acquire` parks the calling thread until ownership is obtained
//! and returns an RAII [`LockGuard`]. Ownership is recorded per thread, which
//! buys two things the plain platform primitive does not give:
//!
//! - **Abandon detection**: a holder whose thread panics marks the lock
//!   abandoned when its guard unwinds; the *next* acquirer gets
//!   [`LockError::Abandoned`] once instead of deadlocking forever, and the
//!   acquirer after that proceeds normally.
//! - **Undefined-owner release**: an explicit release from a thread that does
//!   not hold the lock is refused with [`LockError::ReleaseFailed`].
//!
//! ## Hazards (deliberate)
//! - Not reentrant: a second `acquire` on the owning thread blocks forever.
//! - No ownership transfer: the guard is pinned to the acquiring thread.
//!
//! Critical sections must stay bounded — copy or replace, never compute,
//! while holding a guard.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex};
use std::thread::{self, ThreadId};

use crate::error::LockError;

struct OwnerState {
    owner: Option<ThreadId>,
    abandoned: bool,
}

/// # Blocking, owner-tracked exclusive lock around one value.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use threadvisor::ExclusiveLock;
///
/// let shared = Arc::new(ExclusiveLock::new(0u64));
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let lock = Arc::clone(&shared);
///         thread::spawn(move || {
///             let mut guard = lock.acquire().expect("acquire");
///             *guard += 1;
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(*shared.acquire().expect("acquire"), 4);
/// ```
pub struct ExclusiveLock<T = ()> {
    state: Mutex<OwnerState>,
    available: Condvar,
    value: UnsafeCell<T>,
}

// SAFETY: the owner protocol guarantees at most one live guard, so `&mut T`
// handed out through a guard is exclusive; `T: Send` is required because the
// value is accessed from whichever thread holds the guard.
unsafe impl<T: Send> Sync for ExclusiveLock<T> {}

impl<T> ExclusiveLock<T> {
    /// Creates an unowned lock around `value`.
    pub fn new(value: T) -> Self {
        Self {
            state: Mutex::new(OwnerState {
                owner: None,
                abandoned: false,
            }),
            available: Condvar::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Blocks until the calling thread holds exclusive ownership.
    ///
    /// ### Errors
    /// - [`LockError::AcquireFailed`]: internal bookkeeping unusable.
    /// - [`LockError::Abandoned`]: the previous holder died without
    ///   releasing. Surfaced once; a subsequent `acquire` proceeds. Check the
    ///   protected value for partial writes before trusting it.
    pub fn acquire(&self) -> Result<LockGuard<'_, T>, LockError> {
        let mut state = self.state.lock().map_err(|_| LockError::AcquireFailed)?;
        while state.owner.is_some() {
            state = self
                .available
                .wait(state)
                .map_err(|_| LockError::AcquireFailed)?;
        }
        if state.abandoned {
            state.abandoned = false;
            // Wake another waiter so the surfaced error does not strand them.
            self.available.notify_one();
            return Err(LockError::Abandoned);
        }
        state.owner = Some(thread::current().id());
        Ok(LockGuard {
            lock: self,
            released: false,
            _not_send: PhantomData,
        })
    }

    /// Consumes the lock, returning the protected value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    fn unlock(&self, abandon: bool) -> Result<(), LockError> {
        let mut state = self.state.lock().map_err(|_| LockError::AcquireFailed)?;
        if state.owner != Some(thread::current().id()) {
            return Err(LockError::ReleaseFailed);
        }
        state.owner = None;
        state.abandoned = abandon;
        drop(state);
        self.available.notify_one();
        Ok(())
    }
}

impl<T: Default> Default for ExclusiveLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for ExclusiveLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let held = self
            .state
            .lock()
            .map(|s| s.owner.is_some())
            .unwrap_or(true);
        f.debug_struct("ExclusiveLock")
            .field("held", &held)
            .finish_non_exhaustive()
    }
}

/// RAII ownership of an [`ExclusiveLock`].
///
/// Dropping the guard releases the lock; dropping it during a panic marks the
/// lock abandoned for the next acquirer. [`release`](LockGuard::release) is
/// the explicit form for callers that want the release result.
pub struct LockGuard<'a, T> {
    lock: &'a ExclusiveLock<T>,
    released: bool,
    // Ownership is recorded per thread; moving the guard across threads
    // would desynchronize the owner record.
    _not_send: PhantomData<*const ()>,
}

impl<T> LockGuard<'_, T> {
    /// Releases ownership explicitly.
    ///
    /// ### Errors
    /// [`LockError::ReleaseFailed`] if the internal owner record no longer
    /// names the calling thread.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        self.lock.unlock(false)
    }
}

impl<T> Deref for LockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: a live guard implies this thread holds exclusive ownership.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for LockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: a live guard implies this thread holds exclusive ownership.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LockGuard<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&**self, f)
    }
}

impl<T> Drop for LockGuard<'_, T> {
    fn drop(&mut self) {
        if !self.released {
            // A release failure here means the owner record is already gone;
            // there is nothing further to unwind.
            let _ = self.lock.unlock(thread::panicking());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn test_acquire_release_roundtrip() {
        let lock = ExclusiveLock::new(41);
        let mut guard = lock.acquire().expect("acquire");
        *guard += 1;
        guard.release().expect("release");
        assert_eq!(*lock.acquire().expect("reacquire"), 42);
    }

    #[test]
    fn test_second_acquirer_blocks_until_release() {
        let lock = Arc::new(ExclusiveLock::new(Vec::<u32>::new()));
        let entered = Arc::new(AtomicBool::new(false));

        let guard = lock.acquire().expect("first acquire");

        let contender = {
            let lock = Arc::clone(&lock);
            let entered = Arc::clone(&entered);
            thread::spawn(move || {
                let mut guard = lock.acquire().expect("second acquire");
                entered.store(true, Ordering::SeqCst);
                guard.push(2);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(
            !entered.load(Ordering::SeqCst),
            "second acquirer must block while the lock is held"
        );

        drop(guard);
        contender.join().expect("contender");
        assert_eq!(*lock.acquire().expect("acquire"), vec![2]);
    }

    #[test]
    fn test_critical_sections_are_serialized() {
        // Each writer replaces the whole buffer; a torn interleaving would
        // leave a mixed buffer behind.
        let lock = Arc::new(ExclusiveLock::new(vec![0u8; 64]));
        let writers: Vec<_> = (1..=4u8)
            .map(|fill| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let mut guard = lock.acquire().expect("acquire");
                        for cell in guard.iter_mut() {
                            *cell = fill;
                        }
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().expect("writer");
        }

        let guard = lock.acquire().expect("acquire");
        let first = guard[0];
        assert!(
            guard.iter().all(|&c| c == first),
            "buffer must never be observed torn"
        );
    }

    #[test]
    fn test_abandoned_surfaces_once_then_recovers() {
        let lock = Arc::new(ExclusiveLock::new(7));

        let holder = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                let _guard = lock.acquire().expect("acquire");
                panic!("holder dies while holding");
            })
        };
        assert!(holder.join().is_err(), "holder must have panicked");

        assert_eq!(
            lock.acquire().expect_err("first acquire sees the abandon"),
            LockError::Abandoned
        );
        assert_eq!(*lock.acquire().expect("second acquire recovers"), 7);
    }

    #[test]
    fn test_release_is_refused_for_non_holder() {
        // Exercise the owner check directly: the owner record names another
        // thread, so this thread's release must be refused.
        let lock = Arc::new(ExclusiveLock::new(()));
        let guard = lock.acquire().expect("acquire");
        let err = thread::scope(|s| {
            s.spawn(|| lock.unlock(false)).join().expect("spawn")
        });
        assert_eq!(err, Err(LockError::ReleaseFailed));
        drop(guard);
    }

    #[test]
    fn test_into_inner_returns_value() {
        let lock = ExclusiveLock::new(String::from("done"));
        assert_eq!(lock.into_inner(), "done");
    }
}
