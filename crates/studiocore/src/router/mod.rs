//! Priority-ordered callback routing
//!
//! Buttons all over the bot produce callback identifiers, and many feature
//! modules register patterns for them. `CallbackRouter` is the single place
//! that decides who gets an identifier:
//!
//! - routes are tried in ascending `priority`, ties in registration order
//! - patterns match from the start of the identifier (prefix, not full-string)
//! - the first matching route handles the event; nothing else is tried
//! - overlapping patterns are allowed, and reported through a battery of
//!   sample identifiers at registration and by `validate_all_patterns`
//!
//! Registration needs `&mut self`; once the router is shared behind an `Arc`
//! for serving, the table can no longer change.
//!
//! # Example
//!
//! ```
//! use studiocore::{CallbackRequest, CallbackRouter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), studiocore::RouterError> {
//! let mut router: CallbackRouter<CallbackRequest, ()> = CallbackRouter::new();
//! router.register(r"^project_details_\d+$", 10, "project card", |_, _| async { Ok(()) })?;
//! router.register("^project_", 70, "project catch-all", |_, _| async { Ok(()) })?;
//!
//! assert_eq!(router.resolve("project_details_42").map(|r| r.priority()), Some(10));
//! assert!(router.route(CallbackRequest::new("project_revisions_42", 1), ()).await?);
//! assert!(!router.route(CallbackRequest::new("unrelated_event", 1), ()).await?);
//! # Ok(())
//! # }
//! ```

mod conflicts;
mod event;
mod stats;

pub use conflicts::{Conflict, DEFAULT_SAMPLES};
pub use event::{CallbackEvent, CallbackRequest};
pub use stats::RouterStats;

use futures_util::future::{BoxFuture, FutureExt};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::callback_data::MAX_CALLBACK_DATA_LEN;
use crate::error::{HandlerResult, RouterError, RouterResult};
use stats::StatsCounters;

/// Priority used by [`CallbackRouter::on`]
pub const DEFAULT_PRIORITY: i32 = 100;

type BoxedHandler<E, C> = Arc<dyn Fn(E, C) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Compiles `pattern` anchored at the start of the identifier.
fn compile(pattern: &str) -> RouterResult<Regex> {
    let invalid = |source| RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    // Compile the bare pattern first so an unbalanced ')' cannot close the anchoring group
    Regex::new(pattern).map_err(invalid)?;
    Regex::new(&format!(r"\A(?:{pattern})")).map_err(invalid)
}

/// A registered route. Immutable once created.
pub struct Route<E, C> {
    pattern: String,
    regex: Regex,
    handler: BoxedHandler<E, C>,
    priority: i32,
    description: String,
    seq: usize,
}

impl<E, C> Route<E, C> {
    /// Pattern as it was registered
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registration order, starting at 0. Breaks priority ties.
    pub fn seq(&self) -> usize {
        self.seq
    }

    /// Whether the pattern matches `data` from its first byte
    pub fn matches(&self, data: &str) -> bool {
        self.regex.is_match(data)
    }

    /// One-line summary used by `list_routes`
    pub fn describe(&self) -> String {
        let description = if self.description.is_empty() {
            "-"
        } else {
            self.description.as_str()
        };
        format!("{:>4}  {:<32} {}", self.priority, self.pattern, description)
    }
}

impl<E, C> fmt::Debug for Route<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("priority", &self.priority)
            .field("description", &self.description)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

/// Priority-ordered dispatch table for callback identifiers.
///
/// `E` is the inbound event, `C` the per-request context handed to the
/// handler by value alongside it.
pub struct CallbackRouter<E, C> {
    /// Always sorted by (priority, seq)
    routes: Vec<Route<E, C>>,
    samples: Vec<String>,
    next_seq: usize,
    stats: StatsCounters,
}

impl<E, C> Default for CallbackRouter<E, C> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            samples: DEFAULT_SAMPLES.iter().map(|s| s.to_string()).collect(),
            next_seq: 0,
            stats: StatsCounters::default(),
        }
    }
}

impl<E, C> fmt::Debug for CallbackRouter<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRouter")
            .field("routes", &self.routes)
            .field("samples", &self.samples.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl<E, C> CallbackRouter<E, C>
where
    E: CallbackEvent + Send + 'static,
    C: Send + 'static,
{
    /// Creates an empty router using [`DEFAULT_SAMPLES`] as conflict battery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the conflict battery.
    pub fn with_samples<I, S>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.samples = samples.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a route.
    ///
    /// The pattern is matched from the start of the identifier, as if it
    /// began with `^`. Overlaps with existing routes on the sample battery
    /// are logged as warnings but never prevent registration.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if the pattern does not compile.
    /// Callers are expected to abort startup on it.
    pub fn register<F, Fut>(
        &mut self,
        pattern: &str,
        priority: i32,
        description: &str,
        handler: F,
    ) -> RouterResult<&Route<E, C>>
    where
        F: Fn(E, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let regex = compile(pattern)?;

        self.warn_overlaps(pattern, priority, &regex);

        let handler: BoxedHandler<E, C> = Arc::new(move |event, ctx| handler(event, ctx).boxed());
        let route = Route {
            pattern: pattern.to_string(),
            regex,
            handler,
            priority,
            description: description.to_string(),
            seq: self.next_seq,
        };
        self.next_seq += 1;

        // Inserting after every route with priority <= ours is a stable re-sort
        let idx = self.routes.partition_point(|r| r.priority <= priority);
        self.routes.insert(idx, route);

        log::debug!(
            "Registered callback route '{}' (priority {}, {}) at position {}/{}",
            pattern,
            priority,
            if description.is_empty() { "-" } else { description },
            idx + 1,
            self.routes.len()
        );

        Ok(&self.routes[idx])
    }

    /// Registers a route with [`DEFAULT_PRIORITY`] and no description.
    pub fn on<F, Fut>(&mut self, pattern: &str, handler: F) -> RouterResult<&Route<E, C>>
    where
        F: Fn(E, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register(pattern, DEFAULT_PRIORITY, "", handler)
    }

    /// Samples the candidate route would share with routes already in the
    /// table, with the candidate placed where it would be inserted.
    fn overlaps(&self, pattern: &str, priority: i32, regex: &Regex) -> Vec<Conflict> {
        let shared: Vec<String> = self.samples.iter().filter(|s| regex.is_match(s)).cloned().collect();
        let idx = self.routes.partition_point(|r| r.priority <= priority);
        let table = self.routes[..idx]
            .iter()
            .map(|r| (r.pattern.as_str(), &r.regex))
            .chain(std::iter::once((pattern, regex)))
            .chain(self.routes[idx..].iter().map(|r| (r.pattern.as_str(), &r.regex)));
        conflicts::find_conflicts(&shared, table)
    }

    fn warn_overlaps(&self, pattern: &str, priority: i32, regex: &Regex) {
        for conflict in self.overlaps(pattern, priority, regex) {
            log::warn!(
                "Callback pattern '{}' (priority {}) overlaps: {}",
                pattern,
                priority,
                conflict
            );
        }
    }

    /// The route that would handle `data`, without invoking it.
    pub fn resolve(&self, data: &str) -> Option<&Route<E, C>> {
        self.routes.iter().find(|r| r.matches(data))
    }

    /// Dispatches an event to the first matching route.
    ///
    /// Returns `Ok(true)` if a route handled it and `Ok(false)` if the event
    /// has no identifier (an empty one counts as none) or nothing matched,
    /// so the caller can fall back to other handlers.
    ///
    /// The `handled` counter is bumped before the handler runs, so a failing
    /// handler still counts as handled; it additionally bumps `errored`.
    ///
    /// # Errors
    ///
    /// [`RouterError::Handler`] wrapping whatever the handler returned. The
    /// failure is logged here and then left to the caller.
    pub async fn route(&self, event: E, ctx: C) -> RouterResult<bool> {
        self.stats.record_attempt();

        let user_id = event.user_id();
        // Telegram never sends "", so an empty identifier is treated as absent
        let Some(data) = event.callback_data().filter(|d| !d.is_empty()) else {
            log::debug!("Callback without data from user {:?}, skipping", user_id);
            return Ok(false);
        };

        if data.len() > MAX_CALLBACK_DATA_LEN {
            log::warn!(
                "Callback data '{}' is {} bytes, over Telegram's {}-byte limit",
                data,
                data.len(),
                MAX_CALLBACK_DATA_LEN
            );
        }

        let Some(route) = self.resolve(data) else {
            self.stats.record_unhandled();
            log::debug!("No callback route for '{}' (user {:?})", data, user_id);
            return Ok(false);
        };
        let data = data.to_owned();

        self.stats.record_handled();
        log::debug!(
            "Callback '{}' from user {:?} -> '{}' (priority {})",
            data,
            user_id,
            route.pattern,
            route.priority
        );

        match (route.handler)(event, ctx).await {
            Ok(()) => Ok(true),
            Err(source) => {
                self.stats.record_error();
                log::error!(
                    "Callback handler '{}' ({}) failed on '{}' for user {:?}: {}",
                    route.pattern,
                    route.description,
                    data,
                    user_id,
                    source
                );
                Err(RouterError::Handler {
                    pattern: route.pattern.clone(),
                    source,
                })
            }
        }
    }

    /// Runs the sample battery against the whole table and reports every
    /// sample matched by more than one route.
    pub fn validate_all_patterns(&self) -> Vec<Conflict> {
        conflicts::find_conflicts(&self.samples, self.routes.iter().map(|r| (r.pattern.as_str(), &r.regex)))
    }

    /// Snapshot of the dispatch counters
    pub fn get_stats(&self) -> RouterStats {
        self.stats.snapshot()
    }

    /// Human-readable route table in dispatch order
    pub fn list_routes(&self) -> Vec<String> {
        self.routes.iter().map(Route::describe).collect()
    }

    /// Routes in dispatch order
    pub fn routes(&self) -> &[Route<E, C>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Logs the route table and any conflicts. Meant to run once after
    /// registration, before serving.
    pub fn log_summary(&self) {
        log::info!("Callback router: {} routes", self.routes.len());
        for line in self.list_routes() {
            log::info!("  {}", line);
        }
        let conflicts = self.validate_all_patterns();
        if conflicts.is_empty() {
            log::info!("Callback router: no pattern conflicts on {} samples", self.samples.len());
        } else {
            for conflict in &conflicts {
                log::warn!("Callback conflict: {}", conflict);
            }
        }
    }
}
