//! Wall-clock source and process identity for log records.

use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of record timestamps, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in milliseconds.
    fn now_millis(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Useful for replaying captured timelines and for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `millis`.
    pub fn new(millis: i64) -> Self {
        Self {
            now: AtomicI64::new(millis),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Move forward by `millis` and return the new time.
    pub fn advance(&self, millis: i64) -> i64 {
        self.now.fetch_add(millis, Ordering::SeqCst) + millis
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Identifier of the current OS process.
pub fn current_pid() -> i32 {
    std::process::id() as i32
}

/// Identifier of the calling thread.
///
/// On Linux and Android this is the kernel thread id, so it lines up with
/// what `top`, `systrace` and friends report.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn current_tid() -> i32 {
    // SAFETY: gettid takes no arguments and cannot fail.
    unsafe { libc::syscall(libc::SYS_gettid) as i32 }
}

/// Identifier of the calling thread.
///
/// Without a kernel thread id, threads are numbered in the order they first
/// ask for one.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn current_tid() -> i32 {
    use std::sync::atomic::AtomicI32;

    static NEXT_TID: AtomicI32 = AtomicI32::new(1);
    thread_local! {
        static TID: i32 = NEXT_TID.fetch_add(1, Ordering::Relaxed);
    }
    TID.with(|tid| *tid)
}
