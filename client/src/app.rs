//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};
use session::SessionSnapshot;

use crate::pages::{dashboard::DashboardPage, login::LoginPage, registration::RegistrationPage};
use crate::state::auth::SessionHandle;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="pt-BR">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session snapshot signal and the controller handle, then sets
/// up client-side routing. Every page applies the route guard itself.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let snapshot = RwSignal::new(SessionSnapshot::default());
    provide_context(snapshot);
    provide_context(SessionHandle::start(snapshot));

    view! {
        <Stylesheet id="leptos" href="/pkg/lawme.css"/>
        <Title text="Law Me"/>

        <Router>
            <Routes fallback=|| "Página não encontrada.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegistrationPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("") view=|| view! { <Redirect path="/dashboard"/> }/>
            </Routes>
        </Router>
    }
}
