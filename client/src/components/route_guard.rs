//! Route guard wrapper applied by every page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders its children only when [`session::decide`] says the surface
//! applies. Otherwise it shows the loading placeholder and, for redirect
//! decisions, navigates away with a history replace.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::{GuardDecision, Route, SessionSnapshot, decide};

use crate::components::loading_screen::LoadingScreen;
use crate::util::auth::install_route_redirect;

#[component]
pub fn RouteGuard(target: Route, children: ChildrenFn) -> impl IntoView {
    let snapshot = expect_context::<RwSignal<SessionSnapshot>>();
    install_route_redirect(snapshot, target, use_navigate());

    let decision = Memo::new(move |_| snapshot.with(|state| decide(state, target)));

    view! {
        <Show when=move || decision.get() == GuardDecision::Render fallback=|| view! { <LoadingScreen/> }>
            {children()}
        </Show>
    }
}
