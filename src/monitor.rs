//! Guarded-wait primitives for blocking on job conditions.
//!
//! A [`StatusMonitor`] pairs a guarded resource with a continuation
//! predicate and a condition variable. Waiters block while the predicate
//! holds; producers mutate the resource and fire the signal. The predicate
//! decides, the signal only triggers a re-check, so lost wakeups and
//! spurious wakes cannot produce incorrect behavior.
//!
//! [`CountingMonitor`] bounds how many polling cycles a waiter will
//! tolerate, independent of the underlying job's own behavior.

use std::sync::{Condvar, Mutex};

/// Continuation predicate evaluated under the monitor's lock.
///
/// Returning `true` means "keep waiting". Implemented for any
/// `Fn(&R) -> bool` closure.
pub trait Continuation<R>: Send + Sync {
    fn should_continue(&self, resource: &R) -> bool;
}

impl<R, F> Continuation<R> for F
where
    F: Fn(&R) -> bool + Send + Sync,
{
    fn should_continue(&self, resource: &R) -> bool {
        self(resource)
    }
}

/// A guarded resource plus a continuation predicate and a signal.
///
/// The monitor owns both the resource and the predicate's captured state
/// until [`into_inner`](StatusMonitor::into_inner) releases the resource.
pub struct StatusMonitor<R> {
    state: Mutex<R>,
    signal: Condvar,
    continuation: Box<dyn Continuation<R>>,
}

impl<R> StatusMonitor<R> {
    pub fn new(resource: R, continuation: impl Continuation<R> + 'static) -> Self {
        Self {
            state: Mutex::new(resource),
            signal: Condvar::new(),
            continuation: Box::new(continuation),
        }
    }

    /// Block the calling thread while the continuation predicate holds.
    ///
    /// Each wake re-evaluates the predicate under the lock before the
    /// waiter is allowed to proceed.
    pub fn wait(&self) {
        let mut guard = self.state.lock().expect("monitor lock poisoned");
        while self.continuation.should_continue(&guard) {
            guard = self.signal.wait(guard).expect("monitor lock poisoned");
        }
    }

    /// Wake all blocked waiters so they re-check the predicate.
    ///
    /// May be called from any thread, including one unrelated to the
    /// waiters.
    pub fn fire(&self) {
        self.signal.notify_all();
    }

    /// Mutate the guarded resource and fire the signal in one step.
    pub fn update<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let result = {
            let mut guard = self.state.lock().expect("monitor lock poisoned");
            f(&mut guard)
        };
        self.signal.notify_all();
        result
    }

    /// Read the guarded resource without signalling.
    pub fn peek<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let guard = self.state.lock().expect("monitor lock poisoned");
        f(&guard)
    }

    /// Evaluate the continuation predicate against the current resource.
    pub fn should_continue(&self) -> bool {
        let guard = self.state.lock().expect("monitor lock poisoned");
        self.continuation.should_continue(&guard)
    }

    /// Release the guarded resource. The predicate and its captured state
    /// are dropped with the monitor.
    pub fn into_inner(self) -> R {
        self.state.into_inner().expect("monitor lock poisoned")
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for StatusMonitor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusMonitor")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// A monitored resource paired with a cycle counter and inclusive limit.
#[derive(Debug)]
pub struct Counted<R> {
    pub resource: R,
    count: u32,
    limit: u32,
}

impl<R> Counted<R> {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// True once the counter has reached the limit. A limit of zero is
    /// reached from the start.
    pub fn limit_reached(&self) -> bool {
        self.count >= self.limit
    }
}

/// [`StatusMonitor`] variant that stops waiting after a bounded number of
/// cycles.
///
/// The wrapped continuation stops holding as soon as either the base
/// predicate stops holding or the counter reaches the limit. With limit
/// `L`, the [`increment`](CountingMonitor::increment) call that takes the
/// counter from `L - 1` to `L` is the first to report that the limit has
/// been reached.
pub struct CountingMonitor<R> {
    inner: StatusMonitor<Counted<R>>,
}

impl<R: 'static> CountingMonitor<R> {
    pub fn new(resource: R, limit: u32, continuation: impl Continuation<R> + 'static) -> Self {
        let counted = Counted {
            resource,
            count: 0,
            limit,
        };
        let guarded =
            move |c: &Counted<R>| !c.limit_reached() && continuation.should_continue(&c.resource);
        Self {
            inner: StatusMonitor::new(counted, guarded),
        }
    }

    /// Advance the cycle counter and report whether the limit has now been
    /// reached. Fires the signal so waiters re-check.
    pub fn increment(&self) -> bool {
        self.inner.update(|c| {
            c.count = c.count.saturating_add(1);
            c.limit_reached()
        })
    }

    /// Block while the base predicate holds and the limit is not reached.
    pub fn wait(&self) {
        self.inner.wait();
    }

    pub fn fire(&self) {
        self.inner.fire();
    }

    /// Mutate the wrapped resource and fire the signal.
    pub fn update<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        self.inner.update(|c| f(&mut c.resource))
    }

    pub fn peek<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        self.inner.peek(|c| f(&c.resource))
    }

    pub fn cycles(&self) -> u32 {
        self.inner.peek(Counted::count)
    }

    pub fn should_continue(&self) -> bool {
        self.inner.should_continue()
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner().resource
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for CountingMonitor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingMonitor")
            .field("inner", &self.inner)
            .finish()
    }
}
