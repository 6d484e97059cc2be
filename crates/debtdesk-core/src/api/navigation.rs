//! Navigation side effects signalled by the session layer.
//!
//! The API client and session controller never route anything themselves.
//! They call a `Navigator`, and whatever front end is attached decides what
//! a "go to login" means (full page redirect, screen switch, exit message).

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Ignores every navigation request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: Route) {
        debug!(route = route.path(), "Navigation requested with no navigator attached");
    }
}

/// Forwards routes into a channel the front end drains.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.tx.send(route).is_err() {
            debug!(route = route.path(), "Navigation receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Dashboard.path(), "/dashboard");
    }

    #[test]
    fn test_closure_navigator() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let navigator = move |route: Route| sink.lock().unwrap().push(route);

        navigator.navigate(Route::Login);
        navigator.navigate(Route::Dashboard);
        assert_eq!(*seen.lock().unwrap(), vec![Route::Login, Route::Dashboard]);
    }

    #[test]
    fn test_channel_navigator() {
        let (navigator, mut rx) = ChannelNavigator::channel();
        navigator.navigate(Route::Login);
        assert_eq!(rx.try_recv().unwrap(), Route::Login);
        assert!(rx.try_recv().is_err());

        // Closed receiver is not an error
        drop(rx);
        navigator.navigate(Route::Login);
    }
}
