//! Path-based router driving view resolution.
//!
//! The router owns an ordered route table (first match wins), the current
//! [`NavigationState`], and the failure boundary around view handlers.
//! Handlers may be asynchronous; the router spawns them and returns to idle
//! as soon as the call is issued, collecting outcomes later through
//! [`Router::settle`] or [`Router::next_outcome`].
//!
//! There is no global router. Construct one per client and pass it around
//! explicitly; multiple instances can coexist in tests.

pub mod location;
pub mod pattern;

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinSet;

use self::location::{LocationBus, MemoryLocation};
use self::pattern::{PatternError, RoutePattern};

/// Error type handlers report across the router boundary.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a view handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;
type RouteHandler = Arc<dyn Fn(HashMap<String, String>) -> HandlerFuture + Send + Sync>;

struct Route {
    pattern: RoutePattern,
    handler: RouteHandler,
}

/// Router execution phase.
///
/// The router transitions to `Resolving` while a handler call is being
/// issued and returns to `Idle` immediately after; it never blocks on
/// handler completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterPhase {
    #[default]
    Idle,
    Resolving,
}

/// What the client shell should currently render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Nothing resolved yet.
    Blank,
    /// The view bound to the named route is active.
    View(String),
    /// A handler failed; offer navigation back to the default route.
    NavError { route: String, message: String },
    /// Terminal state: not even the default route matches. The router will
    /// not issue another corrective navigation from here.
    NoRoute { path: String },
}

/// The single navigation state of a running client.
///
/// Mutated only by the router, in response to location changes or explicit
/// [`Router::navigate`] calls.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub current_path: String,
    pub current_route: Option<String>,
    pub params: HashMap<String, String>,
}

/// Completion of a spawned handler, reported by [`Router::next_outcome`].
pub struct HandlerOutcome {
    route: String,
    result: HandlerResult,
}

impl HandlerOutcome {
    /// The route pattern whose handler completed.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Whether the handler succeeded.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Path router with an explicit registration table.
pub struct Router {
    routes: Vec<Route>,
    nav: NavigationState,
    default_route: String,
    phase: RouterPhase,
    screen: Screen,
    location: Arc<dyn LocationBus>,
    pending: JoinSet<HandlerOutcome>,
}

impl Router {
    /// Create a router over the given location surface.
    ///
    /// The default route starts as `/dashboard`; override it with
    /// [`Router::default_route`].
    pub fn new(location: impl LocationBus + 'static) -> Self {
        Self {
            routes: Vec::new(),
            nav: NavigationState::default(),
            default_route: "/dashboard".to_string(),
            phase: RouterPhase::Idle,
            screen: Screen::Blank,
            location: Arc::new(location),
            pending: JoinSet::new(),
        }
    }

    /// Create a router over an in-memory location bus.
    pub fn in_memory() -> Self {
        Self::new(MemoryLocation::default())
    }

    /// Set the route navigated to when no pattern matches.
    pub fn default_route(mut self, path: &str) -> Self {
        self.default_route = path.to_string();
        self
    }

    /// Register a route. Registration order is significant: the first
    /// registered pattern that matches a path wins. Registering after
    /// resolutions have happened is legal and takes effect on the next one.
    pub fn add_route<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<(), PatternError>
    where
        F: Fn(HashMap<String, String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let pattern = RoutePattern::compile(pattern)?;
        let handler: RouteHandler = Arc::new(move |params| Box::pin(handler(params)));
        self.routes.push(Route { pattern, handler });
        Ok(())
    }

    /// Navigate to a path.
    ///
    /// Updates the location when it differs from the current one; navigating
    /// to the path already shown still re-resolves, so the bound view runs
    /// again.
    pub fn navigate(&mut self, path: &str) {
        if path != self.location.current() {
            self.location.replace(path);
        }
        self.resolve(path);
    }

    /// Resolve whatever the location bus currently reports. Call this when
    /// the platform signals a location change (e.g. back/forward).
    pub fn handle_location_change(&mut self) {
        let path = self.location.current();
        self.resolve(&path);
    }

    /// Go back one history entry and re-resolve.
    pub fn go_back(&mut self) {
        self.location.back();
        self.handle_location_change();
    }

    fn resolve(&mut self, path: &str) {
        let hit = self.routes.iter().find_map(|route| {
            route
                .pattern
                .matches(path)
                .map(|captured| (route.pattern.clone(), route.handler.clone(), captured))
        });

        let Some((pattern, handler, captured)) = hit else {
            log::warn!("no route found for '{path}'");
            if path == self.default_route {
                // The default route itself is unmatched. Stop here instead
                // of navigating again.
                self.screen = Screen::NoRoute {
                    path: path.to_string(),
                };
            } else {
                let default = self.default_route.clone();
                self.navigate(&default);
            }
            return;
        };

        let params = pattern.params_from(captured);
        self.phase = RouterPhase::Resolving;
        self.nav = NavigationState {
            current_path: path.to_string(),
            current_route: Some(pattern.pattern().to_string()),
            params: params.clone(),
        };
        self.screen = Screen::View(pattern.pattern().to_string());

        let route = pattern.pattern().to_string();
        let fut = (handler)(params);
        self.pending.spawn(async move {
            let result = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(panic_message(&panic).into()),
            };
            HandlerOutcome { route, result }
        });

        // The handler call has been issued; the router does not wait for it.
        self.phase = RouterPhase::Idle;
    }

    /// Wait for the next spawned handler to complete.
    ///
    /// Returns `None` when no handlers are in flight.
    pub async fn next_outcome(&mut self) -> Option<HandlerOutcome> {
        while let Some(joined) = self.pending.join_next().await {
            // catch_unwind inside the task means join errors only arise from
            // cancellation; those carry no outcome worth reporting.
            if let Ok(outcome) = joined {
                return Some(outcome);
            }
        }
        None
    }

    /// Apply a handler outcome to the router state.
    ///
    /// A failure for the route currently shown becomes a navigation-error
    /// screen that re-offers the default route; a failure for a route the
    /// user has already left is only logged.
    pub fn apply_outcome(&mut self, outcome: HandlerOutcome) {
        if let Err(error) = outcome.result {
            log::error!("route handler for '{}' failed: {error}", outcome.route);
            if self.nav.current_route.as_deref() == Some(outcome.route.as_str()) {
                self.screen = Screen::NavError {
                    route: outcome.route,
                    message: error.to_string(),
                };
            }
        }
    }

    /// Drain and apply all in-flight handler outcomes.
    pub async fn settle(&mut self) {
        while let Some(outcome) = self.next_outcome().await {
            self.apply_outcome(outcome);
        }
    }

    /// Recompute the parameter mapping against the current location.
    ///
    /// This matches on demand rather than reading cached state; when nothing
    /// matches it returns an empty mapping.
    pub fn get_params(&self) -> HashMap<String, String> {
        let path = self.location.current();
        self.routes
            .iter()
            .find_map(|route| {
                route
                    .pattern
                    .matches(&path)
                    .map(|captured| route.pattern.params_from(captured))
            })
            .unwrap_or_default()
    }

    /// The pattern of the route currently resolved, if any.
    pub fn current_route(&self) -> Option<&str> {
        self.nav.current_route.as_deref()
    }

    /// Whether the current location is `path` or a child of it.
    pub fn is_current_route(&self, path: &str) -> bool {
        let current = self.location.current();
        current == path || current.starts_with(&format!("{path}/"))
    }

    /// The route navigated to when nothing matches, re-offered by the
    /// navigation-error screen.
    pub fn fallback_route(&self) -> &str {
        &self.default_route
    }

    /// Current navigation state.
    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    /// What the shell should render right now.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Current router phase.
    pub fn phase(&self) -> RouterPhase {
        self.phase
    }
}

/// Extract a readable message from a panic payload.
fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
