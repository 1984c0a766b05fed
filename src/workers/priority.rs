//! Scheduling priority for worker execution contexts.
//!
//! Five levels, mapped to nice values on Linux. The priority is always cached
//! on the [`Worker`](crate::Worker); applying it to a live thread is a
//! `setpriority(2)` call on the thread id recorded at spawn. Targets without
//! a per-thread priority call keep the cached value only.

/// Scheduling priority of a worker's execution context.
///
/// Default is [`Priority::Normal`]. Levels above `Normal` may require
/// elevated privileges to apply; the platform's refusal surfaces as
/// [`ControlError::PriorityChangeFailed`](crate::ControlError::PriorityChangeFailed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    BelowNormal,
    #[default]
    Normal,
    AboveNormal,
    High,
}

impl Priority {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::BelowNormal => "below_normal",
            Priority::Normal => "normal",
            Priority::AboveNormal => "above_normal",
            Priority::High => "high",
        }
    }

    /// Nice value for the Linux scheduler (higher priority = lower nice).
    #[cfg(target_os = "linux")]
    fn nice(self) -> i32 {
        match self {
            Priority::Low => 19,
            Priority::BelowNormal => 10,
            Priority::Normal => 0,
            Priority::AboveNormal => -5,
            Priority::High => -10,
        }
    }
}

/// Applies `priority` to the thread with native id `tid`.
///
/// Returns the raw OS error code when the scheduler refuses.
#[cfg(target_os = "linux")]
pub(crate) fn apply_to_thread(tid: i64, priority: Priority) -> Result<(), i32> {
    let rc = unsafe {
        libc::setpriority(libc::PRIO_PROCESS as _, tid as libc::id_t, priority.nice())
    };
    if rc == -1 {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        return Err(errno);
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn apply_to_thread(_tid: i64, _priority: Priority) -> Result<(), i32> {
    Ok(())
}

/// Native id of the calling thread, for later `setpriority` calls.
#[cfg(target_os = "linux")]
pub(crate) fn current_thread_id() -> i64 {
    i64::from(unsafe { libc::gettid() })
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn current_thread_id() -> i64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(Priority::Low.as_label(), "low");
        assert_eq!(Priority::AboveNormal.as_label(), "above_normal");
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(Priority::Low < Priority::BelowNormal);
        assert!(Priority::BelowNormal < Priority::Normal);
        assert!(Priority::Normal < Priority::AboveNormal);
        assert!(Priority::AboveNormal < Priority::High);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_lowering_own_priority_is_accepted() {
        // Lowering priority never needs privileges.
        let tid = current_thread_id();
        assert!(tid > 0, "gettid must return a real id");
        assert_eq!(apply_to_thread(tid, Priority::Low), Ok(()));
    }
}
