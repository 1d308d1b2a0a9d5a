//! Request correlation identifier.
//!
//! The active [`TraceId`] lives in tokio task-local storage so errors and log
//! events raised deep inside a store call can be tied back to the request
//! that caused them. Task-locals do not follow `tokio::spawn`; wrap spawned
//! work in [`TraceId::scope`] to carry the identifier along.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use address_book::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let trace_id = TraceId::generate();
/// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(trace_id));
/// assert!(TraceId::current().is_none());
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Mint a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The identifier in scope for the running task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run the synchronous closure `f` with `trace_id` in scope.
    pub fn sync_scope<F, R>(trace_id: Self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        TRACE_ID.sync_scope(trace_id, f)
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
