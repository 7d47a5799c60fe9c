//! Dashboard page: navigation shell for a fully registered account.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Only complete profiles reach it;
//! everyone else is forwarded by the route guard.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use session::{AccountKind, Route, SessionSnapshot};

use crate::components::fault_banner::FaultBanner;
use crate::components::route_guard::RouteGuard;
use crate::state::auth::SessionHandle;

pub const NAV_ITEMS: [&str; 7] = ["Início", "Processos", "Clientes", "Agenda", "Mensagens", "Documentos", "Configurações"];

const FALLBACK_NAME: &str = "Usuário";

/// Uppercased first letter of the email, `?` without one.
pub fn avatar_initial(email: Option<&str>) -> String {
    email
        .and_then(|e| e.trim().chars().next())
        .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect())
}

/// Local part of the email, used in the welcome banner.
pub fn welcome_name(email: Option<&str>) -> String {
    email
        .map(|e| e.trim().split('@').next().unwrap_or_default())
        .filter(|local| !local.is_empty())
        .unwrap_or(FALLBACK_NAME)
        .to_owned()
}

pub fn account_label(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Client => "Cliente",
        AccountKind::Lawyer => "Advogado",
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <RouteGuard target=Route::Dashboard>
            <DashboardShell/>
        </RouteGuard>
    }
}

#[component]
fn DashboardShell() -> impl IntoView {
    let snapshot = expect_context::<RwSignal<SessionSnapshot>>();
    let handle = expect_context::<SessionHandle>();
    let active = RwSignal::new(NAV_ITEMS[0]);

    let email = move || snapshot.with(|s| s.session.as_ref().and_then(|session| session.email.clone()));
    let full_name = move || snapshot.with(|s| s.profile.as_ref().map(|p| p.full_name.clone()));
    let kind = move || snapshot.with(|s| s.profile.as_ref().map(session::Profile::kind));

    let on_sign_out = move |_| {
        handle.spawn(|controller| async move {
            if let Err(e) = controller.sign_out().await {
                leptos::logging::warn!("sign-out reported an error: {e}");
            }
        });
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <div class="dashboard-brand">
                    <span class="dashboard-brand__name">"Law Me"</span>
                    <span class="dashboard-brand__tagline">"Sua plataforma jurídica"</span>
                </div>
                <div class="dashboard-account">
                    <span class="dashboard-account__avatar" aria-hidden="true">
                        {move || avatar_initial(email().as_deref())}
                    </span>
                    <span class="dashboard-account__name">
                        {move || full_name().or_else(email).unwrap_or_default()}
                    </span>
                    {move || kind().map(|k| view! { <span class="dashboard-account__kind">{account_label(k)}</span> })}
                    <button class="dashboard-account__sign-out" type="button" on:click=on_sign_out>
                        "Sair"
                    </button>
                </div>
            </header>
            <div class="dashboard-page__body">
                <nav class="dashboard-nav">
                    {NAV_ITEMS
                        .iter()
                        .copied()
                        .map(|item| {
                            view! {
                                <button
                                    type="button"
                                    class=move || {
                                        if active.get() == item { "dashboard-nav__item dashboard-nav__item--active" } else { "dashboard-nav__item" }
                                    }
                                    on:click=move |_| active.set(item)
                                >
                                    {item}
                                </button>
                            }
                        })
                        .collect_view()}
                </nav>
                <main class="dashboard-main">
                    <FaultBanner/>
                    <section class="dashboard-welcome">
                        <h1>{move || format!("Bem-vindo de volta, {}!", welcome_name(email().as_deref()))}</h1>
                        <p>"Aqui está o que está acontecendo na sua conta hoje."</p>
                    </section>
                </main>
            </div>
        </div>
    }
}
