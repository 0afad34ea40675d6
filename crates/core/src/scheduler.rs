use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::debug;

use crate::errors::CoreError;

/// One-shot deferred work. Receives the time it fired at.
pub type Task = Box<dyn FnOnce(DateTime<Utc>) + Send + 'static>;

/// Runs tasks after a delay. Scheduled tasks can be canceled until they fire.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Shared cancel flag that async waiters can also park on.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            // Registered on creation, so a cancel between here and the await
            // below still wakes us.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Caller's view of a scheduled task.
///
/// A task ends up either fired or cancelled, never both.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    token: CancellationToken,
    state: Arc<AtomicU8>,
}

impl TaskHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    /// Prevent the task from running. No effect once it has fired.
    pub fn cancel(&self) {
        if self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == CANCELLED
    }

    pub fn has_fired(&self) -> bool {
        self.state.load(Ordering::SeqCst) == FIRED
    }

    /// Still waiting: neither fired nor canceled.
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::SeqCst) == PENDING
    }

    /// Claim the right to run. `false` if the task was cancelled first.
    fn try_fire(&self) -> bool {
        self.state
            .compare_exchange(PENDING, FIRED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

// ── Tokio ───────────────────────────────────────────────────────────

/// Runs each task on a tokio runtime after sleeping for its delay.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running inside of.
    pub fn current() -> Result<Self, CoreError> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|e| CoreError::Scheduler(e.to_string()))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let watcher = handle.clone();
        self.handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if watcher.try_fire() {
                        task(Utc::now());
                    }
                }
                _ = watcher.token.cancelled() => {
                    debug!(?delay, "scheduled task canceled");
                }
            }
        });
        handle
    }
}

// ── Manual (virtual time) ───────────────────────────────────────────

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Nothing runs until [`advance`](Self::advance) moves the clock past a
/// task's due time. Tasks fire in due order, ties in scheduling order.
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

struct ManualState {
    now: DateTime<Utc>,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

struct PendingTask {
    due: DateTime<Utc>,
    seq: u64,
    task: Task,
    handle: TaskHandle,
}

impl ManualScheduler {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(ManualState {
                now: start,
                next_seq: 0,
                pending: Vec::new(),
            }),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.state.lock().now
    }

    /// Tasks that are neither fired nor canceled.
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .pending
            .iter()
            .filter(|p| p.handle.is_pending())
            .count()
    }

    /// Move the clock forward and run every task that became due.
    /// Returns how many tasks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = {
            let state = self.state.lock();
            state.now + chrono::Duration::milliseconds(by.as_millis() as i64)
        };

        let mut fired = 0;
        loop {
            // Pop outside the lock so tasks may schedule more work.
            let next = {
                let mut state = self.state.lock();
                state.pending.retain(|p| !p.handle.is_cancelled());
                let idx = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);
                match idx {
                    Some(i) => {
                        let task = state.pending.remove(i);
                        state.now = state.now.max(task.due);
                        task
                    }
                    None => {
                        state.now = target;
                        break;
                    }
                }
            };
            if next.handle.try_fire() {
                (next.task)(next.due);
                fired += 1;
            }
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.state.lock();
        let due = state.now + chrono::Duration::milliseconds(delay.as_millis() as i64);
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(PendingTask {
            due,
            seq,
            task,
            handle: handle.clone(),
        });
        handle
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}
