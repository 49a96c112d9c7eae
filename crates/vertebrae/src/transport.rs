//! The mock transport façade.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::{debug, warn};
use vertebrae_router::{diagnose, resolve, RouteSpec, RouteTable};

use crate::completion::Completion;
use crate::error::{MockError, Result};
use crate::options::MockOptions;
use crate::request::{Headers, Request};
use crate::scheduler::{DispatchHandle, DispatchScheduler, RequestState};

#[derive(Debug, Clone, Default)]
struct Journal(Arc<Mutex<Vec<Request>>>);

impl Journal {
    fn record(&self, request: Request) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    fn snapshot(&self) -> Vec<Request> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Resolves requests against registered routes instead of performing I/O.
///
/// Each transport owns its route table and options; nothing is shared
/// between transports. Configure routes and options before sending
/// requests: in-flight requests keep the table they were sent against.
///
/// # Example
///
/// ```
/// use vertebrae::{MockTransport, Request, RouteSpec};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> vertebrae::Result<()> {
/// let mut transport = MockTransport::default();
/// transport.mock([(
///     "/users/:id",
///     RouteSpec::new().get(|c| format!(r#"{{"id":{}}}"#, c[0])),
/// )])?;
///
/// let completion = transport.fetch(Request::get("/users/42")).await?;
/// assert_eq!(completion.status(), 200);
/// assert_eq!(completion.payload().unwrap().response_text, r#"{"id":42}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Arc<RouteTable>,
    scheduler: DispatchScheduler,
    journal: Journal,
}

impl MockTransport {
    /// Creates a transport over `routes` with the given options.
    #[must_use]
    pub fn new(routes: RouteTable, options: MockOptions) -> Self {
        Self {
            routes: Arc::new(routes),
            scheduler: DispatchScheduler::new(options),
            journal: Journal::default(),
        }
    }

    /// Registers routes, replacing any with the same pattern.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::Router`] for the first pattern that fails to
    /// compile. Routes before it stay registered.
    pub fn mock<I, P>(&mut self, routes: I) -> Result<()>
    where
        I: IntoIterator<Item = (P, RouteSpec)>,
        P: AsRef<str>,
    {
        Arc::make_mut(&mut self.routes).register_routes(routes)?;
        Ok(())
    }

    /// Returns the route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the transport options.
    #[must_use]
    pub const fn options(&self) -> &MockOptions {
        self.scheduler.options()
    }

    /// Returns the transport options for modification.
    pub fn options_mut(&mut self) -> &mut MockOptions {
        self.scheduler.options_mut()
    }

    /// Clears routes and recorded requests and restores default options.
    pub fn reset(&mut self) {
        Arc::make_mut(&mut self.routes).clear();
        *self.scheduler.options_mut() = MockOptions::default();
        self.journal.clear();
    }

    /// Creates the per-request exchange for `request` without sending it.
    #[must_use]
    pub fn exchange(&self, request: Request) -> Exchange {
        Exchange {
            request,
            routes: Arc::clone(&self.routes),
            scheduler: self.scheduler.clone(),
            journal: self.journal.clone(),
            handle: None,
            aborted: false,
        }
    }

    /// Sends `request` and calls `complete` with its outcome.
    ///
    /// The returned exchange can abort the request.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn send<F>(&self, request: Request, complete: F) -> Exchange
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let mut exchange = self.exchange(request);
        exchange.send(&Headers::new(), complete);
        exchange
    }

    /// Sends `request` and returns a future of its outcome.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn fetch(&self, request: Request) -> PendingRequest {
        let (tx, rx) = oneshot::channel();
        let exchange = self.send(request, move |completion| {
            // The receiver may have been dropped; nobody is waiting then.
            let _ = tx.send(completion);
        });
        PendingRequest { exchange, rx }
    }

    /// Returns every request sent so far, in send order.
    #[must_use]
    pub fn received_requests(&self) -> Vec<Request> {
        self.journal.snapshot()
    }

    /// Returns the number of requests sent so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.journal.len()
    }
}

/// The transport object for a single request.
///
/// Exposes `send` and `abort`, the shape a request-issuing layer expects
/// from a pluggable transport.
#[derive(Debug)]
pub struct Exchange {
    request: Request,
    routes: Arc<RouteTable>,
    scheduler: DispatchScheduler,
    journal: Journal,
    handle: Option<DispatchHandle>,
    aborted: bool,
}

impl Exchange {
    /// Resolves the request and schedules its completion.
    ///
    /// `headers` are merged into the request. `complete` is never called
    /// from within this call, even when no route matches. Sending twice, or
    /// after an abort, does nothing.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn send<F>(&mut self, headers: &Headers, complete: F)
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        if self.handle.is_some() || self.aborted {
            warn!(
                method = %self.request.method,
                url = %self.request.url,
                "mock exchange already sent or aborted; ignoring send"
            );
            return;
        }

        self.request
            .headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.journal.record(self.request.clone());

        let Request { method, url, .. } = &self.request;
        let result = resolve(&self.routes, url, method);
        match result.route() {
            Some(route) => debug!(%method, %url, pattern = route.pattern(), "mock route matched"),
            None => debug!(error = %diagnose(&self.routes, url, method), "no mock route matched"),
        }

        self.handle = Some(self.scheduler.schedule(result, method.clone(), complete));
    }

    /// Cancels the request if its completion has not fired.
    ///
    /// Safe to call at any time and any number of times. Returns `true`
    /// only for the call that actually cancelled a pending request.
    pub fn abort(&mut self) -> bool {
        match &self.handle {
            Some(handle) => handle.abort(),
            None if !self.aborted => {
                self.aborted = true;
                true
            }
            None => false,
        }
    }

    /// Returns the request's lifecycle state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        match &self.handle {
            Some(handle) => handle.state(),
            None if self.aborted => RequestState::Aborted,
            None => RequestState::Created,
        }
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> &Request {
        &self.request
    }
}

/// A sent request whose outcome can be awaited.
///
/// Resolves to the [`Completion`], or to [`MockError::Aborted`] if
/// [`PendingRequest::abort`] cancelled it first.
#[derive(Debug)]
#[must_use = "dropping a PendingRequest discards its outcome"]
pub struct PendingRequest {
    exchange: Exchange,
    rx: oneshot::Receiver<Completion>,
}

impl PendingRequest {
    /// Cancels the request if its completion has not fired.
    pub fn abort(&mut self) -> bool {
        self.exchange.abort()
    }

    /// Returns the request's lifecycle state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.exchange.state()
    }

    /// Returns the request.
    #[must_use]
    pub const fn request(&self) -> &Request {
        self.exchange.request()
    }
}

impl Future for PendingRequest {
    type Output = Result<Completion>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(completion)) => Poll::Ready(Ok(completion)),
            Poll::Ready(Err(_)) if self.exchange.state() == RequestState::Aborted => {
                Poll::Ready(Err(MockError::Aborted))
            }
            Poll::Ready(Err(_)) => Poll::Ready(Err(MockError::Dropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}
