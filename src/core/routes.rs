//! Routes and navigation

use crate::core::error::NavigationError;
use std::fmt;
use std::sync::Mutex;

/// Pages of the employee flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Bill listing
    Bills,
    /// New bill form
    NewBill,
}

impl Route {
    /// Hash path of the route
    pub fn path(self) -> &'static str {
        match self {
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
        }
    }

    /// Parse a hash path
    pub fn from_path(path: &str) -> Result<Self, NavigationError> {
        match path {
            "#employee/bills" => Ok(Route::Bills),
            "#employee/bill/new" => Ok(Route::NewBill),
            other => Err(NavigationError::UnknownRoute {
                path: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Something able to switch the active route
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator recording requested routes
///
/// Controllers only request a navigation; the application shell takes the
/// pending route once the current handler has run to completion.
#[derive(Debug, Default)]
pub struct RouteHistory {
    inner: Mutex<HistoryState>,
}

#[derive(Debug, Default)]
struct HistoryState {
    visited: Vec<Route>,
    pending: Option<Route>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a route as displayed
    pub fn record(&self, route: Route) {
        if let Ok(mut state) = self.inner.lock() {
            state.visited.push(route);
        }
    }

    /// Take the route requested since the last call, if any
    pub fn take_pending(&self) -> Option<Route> {
        self.inner.lock().ok().and_then(|mut state| state.pending.take())
    }

    /// Last displayed route
    pub fn current(&self) -> Option<Route> {
        self.inner
            .lock()
            .ok()
            .and_then(|state| state.visited.last().copied())
    }

    /// Every displayed route, oldest first
    pub fn visited(&self) -> Vec<Route> {
        self.inner
            .lock()
            .map(|state| state.visited.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "navigation requested");
        if let Ok(mut state) = self.inner.lock() {
            state.pending = Some(route);
        }
    }
}
