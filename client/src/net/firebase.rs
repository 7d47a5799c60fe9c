//! Bridge to the hosted identity provider and profile document store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend SDK only ships for JavaScript. `js/identity_bridge.js` wraps
//! the handful of calls the session controller needs, and this module turns
//! them into [`IdentityBackend`] and [`ProfileStore`] implementations.
//!
//! DESIGN
//! ======
//! Every value crossing the JS boundary is a JSON string (or `null`), and
//! every rejection is a plain `{ code, message }` object. Parsing and error
//! shaping stay in pure functions so they can be tested natively; only the
//! extern bindings and futures are compiled for the browser.
//!
//! ERROR HANDLING
//! ==============
//! Bridge rejections become [`BackendError`] with the SDK's own code, which
//! the controller maps to a friendly fault. Malformed payloads surface as
//! `invalid-response` rather than a panic.

#[cfg(test)]
#[path = "firebase_test.rs"]
mod firebase_test;

#[cfg(any(test, feature = "hydrate"))]
use session::{BackendError, Profile, Session};

#[cfg(feature = "hydrate")]
pub use browser::{FirebaseIdentity, FirestoreProfiles, init};

#[cfg(any(test, feature = "hydrate"))]
const UNKNOWN_CODE: &str = "unknown";

#[cfg(any(test, feature = "hydrate"))]
const INVALID_RESPONSE_CODE: &str = "invalid-response";

/// Shape a bridge rejection into a backend error.
#[cfg(any(test, feature = "hydrate"))]
fn backend_error(code: Option<String>, message: Option<String>) -> BackendError {
    BackendError::new(
        code.filter(|c| !c.is_empty()).unwrap_or_else(|| UNKNOWN_CODE.to_owned()),
        message.unwrap_or_default(),
    )
}

#[cfg(any(test, feature = "hydrate"))]
fn invalid_response(err: &serde_json::Error) -> BackendError {
    BackendError::new(INVALID_RESPONSE_CODE, err.to_string())
}

/// Parse a session payload. `None` (JS `null`) means signed out.
#[cfg(any(test, feature = "hydrate"))]
fn parse_session(raw: Option<&str>) -> Result<Option<Session>, BackendError> {
    raw.map(|json| serde_json::from_str::<Session>(json).map_err(|e| invalid_response(&e)))
        .transpose()
}

/// Parse a profile document. `None` means the document does not exist.
#[cfg(any(test, feature = "hydrate"))]
fn parse_profile(raw: Option<&str>) -> Result<Option<Profile>, BackendError> {
    raw.map(|json| serde_json::from_str::<Profile>(json).map_err(|e| invalid_response(&e)))
        .transpose()
}

#[cfg(any(test, feature = "hydrate"))]
fn encode_profile(profile: &Profile) -> Result<String, BackendError> {
    serde_json::to_string(profile).map_err(|e| invalid_response(&e))
}

#[cfg(feature = "hydrate")]
mod browser {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use async_trait::async_trait;
    use futures::channel::mpsc::{UnboundedReceiver, unbounded};
    use futures::{Stream, StreamExt};
    use leptos::logging::warn;
    use session::{BackendError, IdentityBackend, Profile, ProfileStore, Session, SessionFeed};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use super::{UNKNOWN_CODE, backend_error, encode_profile, parse_profile, parse_session};
    use crate::net::types::IdentityConfig;

    #[wasm_bindgen(module = "/js/identity_bridge.js")]
    extern "C" {
        #[wasm_bindgen(js_name = initIdentity, catch)]
        fn init_identity(config_json: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(js_name = signInWithProvider)]
        fn sign_in_with_provider() -> js_sys::Promise;

        #[wasm_bindgen(js_name = signInWithPassword)]
        fn sign_in_with_password(email: &str, password: &str) -> js_sys::Promise;

        #[wasm_bindgen(js_name = createAccount)]
        fn create_account(email: &str, password: &str) -> js_sys::Promise;

        #[wasm_bindgen(js_name = signOutUser)]
        fn sign_out_user() -> js_sys::Promise;

        #[wasm_bindgen(js_name = watchSession)]
        fn watch_session(callback: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;

        #[wasm_bindgen(js_name = getProfile)]
        fn get_profile(uid: &str) -> js_sys::Promise;

        #[wasm_bindgen(js_name = putProfile)]
        fn put_profile(uid: &str, profile_json: &str, merge: bool) -> js_sys::Promise;
    }

    /// Initialise the backend SDK. Must run before any other bridge call
    /// reaches the network; until then the session feed reports signed out.
    ///
    /// # Errors
    ///
    /// Returns the SDK's rejection when the config is refused.
    pub fn init(config: &IdentityConfig) -> Result<(), BackendError> {
        let json = serde_json::to_string(config).map_err(|e| BackendError::new("invalid-config", e.to_string()))?;
        init_identity(&json).map_err(|e| js_error(&e))
    }

    fn js_error(value: &JsValue) -> BackendError {
        let read = |key: &str| {
            js_sys::Reflect::get(value, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.as_string())
        };
        backend_error(read("code"), read("message").or_else(|| value.as_string()))
    }

    async fn settle(promise: js_sys::Promise) -> Result<Option<String>, BackendError> {
        JsFuture::from(promise)
            .await
            .map(|value| value.as_string())
            .map_err(|e| js_error(&e))
    }

    async fn signed_in(promise: js_sys::Promise) -> Result<Session, BackendError> {
        let raw = settle(promise).await?;
        parse_session(raw.as_deref())?.ok_or_else(|| BackendError::new(UNKNOWN_CODE, "sign-in returned no account"))
    }

    /// Identity provider backed by the hosted auth SDK.
    pub struct FirebaseIdentity;

    #[async_trait(?Send)]
    impl IdentityBackend for FirebaseIdentity {
        async fn sign_in_with_federated_provider(&self) -> Result<Session, BackendError> {
            signed_in(sign_in_with_provider()).await
        }

        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
            signed_in(sign_in_with_password(email, password)).await
        }

        async fn create_account_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
            signed_in(create_account(email, password)).await
        }

        async fn sign_out(&self) -> Result<(), BackendError> {
            settle(sign_out_user()).await.map(|_| ())
        }

        fn subscribe_to_session_changes(&self) -> SessionFeed {
            let (sender, receiver) = unbounded();
            let callback = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                match parse_session(value.as_string().as_deref()) {
                    Ok(session) => {
                        if sender.unbounded_send(session).is_err() {
                            warn!("session change arrived after the feed was released");
                        }
                    }
                    Err(e) => warn!("ignoring malformed session change: {e}"),
                }
            });
            let unsubscribe = watch_session(&callback);
            Box::pin(SessionWatch { receiver, unsubscribe, _callback: callback })
        }
    }

    /// Live session subscription. Dropping it unsubscribes from the SDK.
    struct SessionWatch {
        receiver: UnboundedReceiver<Option<Session>>,
        unsubscribe: js_sys::Function,
        _callback: Closure<dyn FnMut(JsValue)>,
    }

    impl Stream for SessionWatch {
        type Item = Option<Session>;

        fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            self.receiver.poll_next_unpin(cx)
        }
    }

    impl Drop for SessionWatch {
        fn drop(&mut self) {
            if let Err(e) = self.unsubscribe.call0(&JsValue::NULL) {
                warn!("session unsubscribe failed: {e:?}");
            }
        }
    }

    /// Profile store backed by the hosted document database, one document
    /// per account under `users/{uid}`.
    pub struct FirestoreProfiles;

    #[async_trait(?Send)]
    impl ProfileStore for FirestoreProfiles {
        async fn get_profile(&self, uid: &str) -> Result<Option<Profile>, BackendError> {
            let raw = settle(get_profile(uid)).await?;
            parse_profile(raw.as_deref())
        }

        async fn put_profile(&self, uid: &str, profile: &Profile, merge: bool) -> Result<(), BackendError> {
            let json = encode_profile(profile)?;
            settle(put_profile(uid, &json, merge)).await.map(|_| ())
        }
    }
}
