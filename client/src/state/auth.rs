//! Session controller wiring for the browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` calls [`SessionHandle::start`] once. In the browser it builds the
//! controller with the hosted-backend adapters, mirrors every snapshot into
//! the `RwSignal<SessionSnapshot>` context, and keeps the backend's session
//! feed open until the app is torn down. During SSR there is no controller:
//! the snapshot stays in its unresolved default so every guarded page
//! renders the loading placeholder.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use session::{SessionController, SessionSnapshot};

/// Handle to the session controller, provided as context.
///
/// Holds no controller on the server.
#[derive(Clone, Default)]
pub struct SessionHandle {
    controller: Option<Arc<SessionController>>,
}

impl SessionHandle {
    /// Build the controller and start the session feed (browser only).
    pub fn start(snapshot: RwSignal<SessionSnapshot>) -> Self {
        #[cfg(feature = "hydrate")]
        {
            let controller = Arc::new(SessionController::new(
                Arc::new(crate::net::firebase::FirebaseIdentity),
                Arc::new(crate::net::firebase::FirestoreProfiles),
                Arc::new(crate::util::session_cache::BrowserSessionCache),
            ));
            snapshot.set(controller.snapshot());
            let subscription = controller.subscribe(move |next| snapshot.set(next.clone()));

            let (listener, abort) = futures::future::abortable(run_session(controller.clone()));
            leptos::task::spawn_local(async move {
                if listener.await.is_err() {
                    leptos::logging::log!("session feed released");
                }
            });
            on_cleanup(move || {
                abort.abort();
                drop(subscription);
            });

            Self { controller: Some(controller) }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = snapshot;
            Self::default()
        }
    }

    #[must_use]
    pub fn controller(&self) -> Option<Arc<SessionController>> {
        self.controller.clone()
    }

    /// Run a controller operation in the background. No-op without a controller.
    pub fn spawn<F, Fut>(&self, operation: F)
    where
        F: FnOnce(Arc<SessionController>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        if let Some(controller) = self.controller() {
            leptos::task::spawn_local(operation(controller));
        }
    }

    /// Clear the displayed fault.
    pub fn clear_fault(&self) {
        if let Some(controller) = &self.controller {
            controller.clear_fault();
        }
    }
}

/// Startup sequence: cached first paint, backend init, then the session feed.
#[cfg(feature = "hydrate")]
async fn run_session(controller: Arc<SessionController>) {
    controller.prime_from_cache();
    match crate::net::api::fetch_identity_config().await {
        Ok(config) => {
            if let Err(e) = crate::net::firebase::init(&config) {
                leptos::logging::warn!("identity backend init failed: {e}");
            }
        }
        Err(e) => leptos::logging::warn!("identity config unavailable: {e}"),
    }
    controller.listen().await;
}
