//! Deferred, abortable delivery of completions.
//!
//! Every dispatch is a tokio task that sleeps for its delay and then fires
//! exactly once. The dispatch state leaves `Scheduled` through a single
//! compare-exchange, so a completion and an abort can never both win.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::{debug, trace};
use vertebrae_router::{HandlerError, MatchResult, Method};

use crate::completion::Completion;
use crate::options::MockOptions;

/// Lifecycle of a mocked request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RequestState {
    /// Created but not yet sent.
    Created = 0,
    /// Sent; the completion is pending.
    Scheduled = 1,
    /// The completion fired.
    Completed = 2,
    /// Aborted before the completion fired.
    Aborted = 3,
}

impl RequestState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Scheduled,
            2 => Self::Completed,
            _ => Self::Aborted,
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    const fn new(state: RequestState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn get(&self) -> RequestState {
        RequestState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn finish(&self, to: RequestState) -> bool {
        self.0
            .compare_exchange(
                RequestState::Scheduled as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Handle to a scheduled dispatch.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    state: Arc<StateCell>,
    task: AbortHandle,
}

impl DispatchHandle {
    /// Cancels the dispatch if it has not fired yet.
    ///
    /// Returns `true` if this call cancelled it. Calling it after the
    /// completion fired, or a second time, does nothing.
    pub fn abort(&self) -> bool {
        if self.state.finish(RequestState::Aborted) {
            self.task.abort();
            debug!("mock request aborted");
            true
        } else {
            false
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state.get()
    }

    /// Returns whether the dispatch completed or was aborted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }
}

/// Schedules completions for resolved requests.
#[derive(Debug, Clone, Default)]
pub struct DispatchScheduler {
    options: MockOptions,
}

impl DispatchScheduler {
    /// Creates a scheduler with the given options.
    #[must_use]
    pub const fn new(options: MockOptions) -> Self {
        Self { options }
    }

    /// Returns the scheduler's options.
    #[must_use]
    pub const fn options(&self) -> &MockOptions {
        &self.options
    }

    /// Returns the scheduler's options for modification.
    pub fn options_mut(&mut self) -> &mut MockOptions {
        &mut self.options
    }

    /// Returns the delay before `result` completes.
    #[must_use]
    pub fn delay_for(&self, result: &MatchResult) -> Duration {
        result
            .route()
            .map_or(self.options.delay.not_found, vertebrae_router::Route::timeout)
    }

    /// Schedules the completion of `result` and returns its handle.
    ///
    /// `complete` is called at most once, on the tokio runtime, never from
    /// within this call. A matched route's handler runs when the delay
    /// elapses, not before.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn schedule<F>(&self, result: MatchResult, method: Method, complete: F) -> DispatchHandle
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let delay = self.delay_for(&result);
        let state = Arc::new(StateCell::new(RequestState::Scheduled));
        let task_state = Arc::clone(&state);

        trace!(?delay, matched = result.is_match(), "scheduling mock completion");

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if !task_state.finish(RequestState::Completed) {
                return;
            }

            let completion = deliver(result, &method);
            debug!(
                status = completion.status(),
                status_text = %completion.status_text(),
                "mock request completed"
            );
            complete(completion);
        });

        DispatchHandle {
            state,
            task: task.abort_handle(),
        }
    }
}

fn deliver(result: MatchResult, method: &Method) -> Completion {
    let MatchResult::Matched { route, captures } = result else {
        return Completion::NotFound;
    };
    let Some(handler) = route.handler(method) else {
        return Completion::NotFound;
    };

    match panic::catch_unwind(AssertUnwindSafe(|| handler(&captures))) {
        Ok(Ok(response_text)) => Completion::Delivered {
            status: route.status_code(),
            response_text,
        },
        Ok(Err(err)) => Completion::HandlerFailed(err),
        Err(payload) => Completion::HandlerFailed(HandlerError::new(panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "route handler panicked".to_string())
}
