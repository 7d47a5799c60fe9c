//! Dismissible banner for the current authentication fault.

use leptos::prelude::*;
use session::SessionSnapshot;

use crate::state::auth::SessionHandle;

#[component]
pub fn FaultBanner() -> impl IntoView {
    let snapshot = expect_context::<RwSignal<SessionSnapshot>>();
    let handle = expect_context::<SessionHandle>();

    let message = move || snapshot.with(|state| state.fault.as_ref().map(|fault| fault.display_message.clone()));

    view! {
        <Show when=move || message().is_some()>
            <div class="fault-banner" role="alert">
                <span class="fault-banner__text">{move || message().unwrap_or_default()}</span>
                <button
                    type="button"
                    class="fault-banner__dismiss"
                    aria-label="Fechar"
                    on:click={
                        let handle = handle.clone();
                        move |_| handle.clear_fault()
                    }
                >
                    "×"
                </button>
            </div>
        </Show>
    }
}
