//! Login page supporting email + password and federated sign-in.
//!
//! DESIGN
//! ======
//! One form serves both sign-in and account creation. Input shaping and
//! local validation are pure functions; the backend's own rejections come
//! back as the snapshot fault and are shown in the shared banner.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use session::{Route, SessionSnapshot};

use crate::components::fault_banner::FaultBanner;
use crate::components::route_guard::RouteGuard;
use crate::state::auth::SessionHandle;

/// Minimum password length accepted when creating an account.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Whether the form signs in or creates an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    SignIn,
    Register,
}

impl Mode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::Register,
            Self::Register => Self::SignIn,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Acesse sua conta",
            Self::Register => "Crie sua conta",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            Self::SignIn => "Bem-vindo de volta ao Law Me",
            Self::Register => "Comece a usar o Law Me hoje mesmo",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Entrar",
            Self::Register => "Cadastrar",
        }
    }

    fn switch_prompt(self) -> &'static str {
        match self {
            Self::SignIn => "Ainda não tem uma conta?",
            Self::Register => "Já tem uma conta?",
        }
    }

    fn switch_action(self) -> &'static str {
        match self {
            Self::SignIn => "Crie uma conta",
            Self::Register => "Faça login",
        }
    }
}

/// Trim and check the credentials before calling the backend.
///
/// Returns the trimmed email and the password unchanged.
///
/// # Errors
///
/// Returns the message to show next to the form.
pub fn validate_credentials(email: &str, password: &str, mode: Mode) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Informe seu email.");
    }
    if password.is_empty() {
        return Err("Informe sua senha.");
    }
    if mode == Mode::Register && password.chars().count() < MIN_PASSWORD_LEN {
        return Err("A senha deve ter pelo menos 6 caracteres.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <RouteGuard target=Route::Login>
            <LoginCard/>
        </RouteGuard>
    }
}

#[component]
fn LoginCard() -> impl IntoView {
    let snapshot = expect_context::<RwSignal<SessionSnapshot>>();
    let handle = expect_context::<SessionHandle>();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let mode = RwSignal::new(Mode::SignIn);
    let hint = RwSignal::new(None::<&'static str>);
    let busy = move || snapshot.with(|state| state.busy);

    let submit_handle = handle.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy() {
            return;
        }
        let current = mode.get_untracked();
        match validate_credentials(&email.get_untracked(), &password.get_untracked(), current) {
            Err(message) => hint.set(Some(message)),
            Ok((email_value, password_value)) => {
                hint.set(None);
                submit_handle.spawn(move |controller| async move {
                    let result = match current {
                        Mode::SignIn => controller.login_with_credentials(&email_value, &password_value).await,
                        Mode::Register => controller.register_with_credentials(&email_value, &password_value).await,
                    };
                    if let Err(e) = result {
                        leptos::logging::log!("authentication error: {e}");
                    }
                });
            }
        }
    };

    let federated_handle = handle.clone();
    let on_federated = move |_| {
        if busy() {
            return;
        }
        hint.set(None);
        federated_handle.spawn(|controller| async move {
            if let Err(e) = controller.sign_in_with_federated_provider().await {
                leptos::logging::log!("federated sign-in error: {e}");
            }
        });
    };

    let on_toggle = move |_| {
        mode.update(|m| *m = m.toggled());
        hint.set(None);
        handle.clear_fault();
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <header class="login-card__header">
                    <h1>{move || mode.get().title()}</h1>
                    <p class="login-card__subtitle">{move || mode.get().subtitle()}</p>
                </header>
                <FaultBanner/>
                <form class="login-form" on:submit=on_submit>
                    <label class="login-label" for="login-email">"Email"</label>
                    <input
                        id="login-email"
                        class="login-input"
                        type="email"
                        autocomplete="email"
                        placeholder="seu@email.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label class="login-label" for="login-password">"Senha"</label>
                    <input
                        id="login-password"
                        class="login-input"
                        type="password"
                        placeholder="••••••••"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || hint.get().is_some()>
                        <p class="login-message">{move || hint.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="login-button" type="submit" disabled=busy>
                        {move || if busy() { "Carregando..." } else { mode.get().submit_label() }}
                    </button>
                </form>
                <div class="login-divider"><span>"OU"</span></div>
                <button class="login-button login-button--federated" type="button" disabled=busy on:click=on_federated>
                    "Continuar com Google"
                </button>
                <p class="login-switch">
                    {move || mode.get().switch_prompt()}
                    " "
                    <button class="login-switch__action" type="button" on:click=on_toggle>
                        {move || mode.get().switch_action()}
                    </button>
                </p>
            </div>
        </div>
    }
}
