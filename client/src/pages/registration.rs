//! Registration page completing the account profile after first sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reached whenever a signed-in account has no profile or an incomplete
//! one. Saving writes a complete profile through the controller; the guard
//! then forwards to the dashboard on the next snapshot.
//!
//! DESIGN
//! ======
//! The form keeps fields for both account kinds so switching back and forth
//! does not lose input. [`RegistrationFields::to_draft`] keeps only the
//! fields of the chosen kind.

#[cfg(test)]
#[path = "registration_test.rs"]
mod registration_test;

use leptos::prelude::*;
use session::{AccountDetails, AccountKind, ProfileDraft, Route};

use crate::components::route_guard::RouteGuard;
use crate::state::auth::SessionHandle;

pub const AREAS_OF_LAW: [&str; 8] =
    ["Civil", "Trabalhista", "Tributário", "Empresarial", "Ambiental", "Penal", "Família", "Consumidor"];

/// Brazilian federative units, for the OAB state selector.
pub const FEDERATIVE_UNITS: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR", "PE", "PI", "RJ",
    "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

pub const SAVE_ERROR_MESSAGE: &str = "Erro ao salvar dados. Tente novamente.";
const MISSING_FIELDS_MESSAGE: &str = "Preencha todos os campos obrigatórios.";
const INVALID_STATE_MESSAGE: &str = "Selecione o estado da OAB.";

/// Add `tag` if absent, remove it if present. Order of the rest is kept.
pub fn toggle_tag(tags: &mut Vec<String>, tag: &str) {
    if let Some(index) = tags.iter().position(|t| t == tag) {
        tags.remove(index);
    } else {
        tags.push(tag.to_owned());
    }
}

/// Raw form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationFields {
    pub kind: AccountKind,
    pub full_name: String,
    pub phone: String,
    pub national_id: String,
    pub interests: Vec<String>,
    pub license_number: String,
    pub license_state: String,
    pub specializations: Vec<String>,
}

impl RegistrationFields {
    /// Trim the input and build the profile draft for the chosen kind.
    ///
    /// # Errors
    ///
    /// Returns the message to show when a required field is blank or the
    /// OAB state is not a federative unit.
    pub fn to_draft(&self) -> Result<ProfileDraft, &'static str> {
        let full_name = required(&self.full_name)?;
        let phone = required(&self.phone)?;
        let national_id = required(&self.national_id)?;
        let account = match self.kind {
            AccountKind::Client => AccountDetails::Client { interests: self.interests.clone() },
            AccountKind::Lawyer => {
                let license_number = required(&self.license_number)?;
                let license_state = self.license_state.trim();
                if !FEDERATIVE_UNITS.contains(&license_state) {
                    return Err(INVALID_STATE_MESSAGE);
                }
                AccountDetails::Lawyer {
                    license_number,
                    license_state: license_state.to_owned(),
                    specializations: self.specializations.clone(),
                }
            }
        };
        Ok(ProfileDraft { full_name, phone, national_id, account })
    }
}

fn required(value: &str) -> Result<String, &'static str> {
    let value = value.trim();
    if value.is_empty() { Err(MISSING_FIELDS_MESSAGE) } else { Ok(value.to_owned()) }
}

#[component]
pub fn RegistrationPage() -> impl IntoView {
    view! {
        <RouteGuard target=Route::Registration>
            <RegistrationCard/>
        </RouteGuard>
    }
}

#[component]
fn RegistrationCard() -> impl IntoView {
    let handle = expect_context::<SessionHandle>();
    let fields = RwSignal::new(RegistrationFields::default());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let draft = match fields.with_untracked(RegistrationFields::to_draft) {
            Ok(draft) => draft,
            Err(message) => {
                error.set(Some(message.to_owned()));
                return;
            }
        };
        error.set(None);
        saving.set(true);
        handle.spawn(move |controller| async move {
            if let Err(e) = controller.save_profile(draft).await {
                leptos::logging::warn!("profile save failed: {e}");
                error.set(Some(SAVE_ERROR_MESSAGE.to_owned()));
            }
            saving.set(false);
        });
    };

    let is_lawyer = move || fields.with(|f| f.kind == AccountKind::Lawyer);
    let kind_class = move |kind: AccountKind| {
        if fields.with(|f| f.kind == kind) { "kind-toggle__option kind-toggle__option--active" } else { "kind-toggle__option" }
    };

    view! {
        <div class="registration-page">
            <div class="registration-card">
                <header class="registration-card__header">
                    <h1>"Complete seu cadastro"</h1>
                    <p class="registration-card__subtitle">"Precisamos de algumas informações adicionais"</p>
                </header>
                <Show when=move || error.get().is_some()>
                    <div class="fault-banner" role="alert">
                        <span class="fault-banner__text">{move || error.get().unwrap_or_default()}</span>
                    </div>
                </Show>
                <form class="registration-form" on:submit=on_submit>
                    <div class="kind-toggle">
                        <button
                            type="button"
                            class=move || kind_class(AccountKind::Client)
                            on:click=move |_| fields.update(|f| f.kind = AccountKind::Client)
                        >
                            "Sou Cliente"
                        </button>
                        <button
                            type="button"
                            class=move || kind_class(AccountKind::Lawyer)
                            on:click=move |_| fields.update(|f| f.kind = AccountKind::Lawyer)
                        >
                            "Sou Advogado"
                        </button>
                    </div>

                    <label class="registration-label">
                        "Nome Completo"
                        <input
                            class="registration-input"
                            type="text"
                            required=true
                            prop:value=move || fields.with(|f| f.full_name.clone())
                            on:input=move |ev| fields.update(|f| f.full_name = event_target_value(&ev))
                        />
                    </label>
                    <label class="registration-label">
                        "Telefone"
                        <input
                            class="registration-input"
                            type="tel"
                            required=true
                            prop:value=move || fields.with(|f| f.phone.clone())
                            on:input=move |ev| fields.update(|f| f.phone = event_target_value(&ev))
                        />
                    </label>
                    <label class="registration-label">
                        "CPF"
                        <input
                            class="registration-input"
                            type="text"
                            required=true
                            prop:value=move || fields.with(|f| f.national_id.clone())
                            on:input=move |ev| fields.update(|f| f.national_id = event_target_value(&ev))
                        />
                    </label>

                    <Show
                        when=is_lawyer
                        fallback=move || view! {
                            <AreaPicker
                                legend="Áreas de Interesse"
                                selected=Signal::derive(move || fields.with(|f| f.interests.clone()))
                                on_toggle=Callback::new(move |area: String| fields.update(|f| toggle_tag(&mut f.interests, &area)))
                            />
                        }
                    >
                        <label class="registration-label">
                            "Número da OAB"
                            <input
                                class="registration-input"
                                type="text"
                                required=true
                                prop:value=move || fields.with(|f| f.license_number.clone())
                                on:input=move |ev| fields.update(|f| f.license_number = event_target_value(&ev))
                            />
                        </label>
                        <label class="registration-label">
                            "Estado da OAB"
                            <select
                                class="registration-input"
                                required=true
                                prop:value=move || fields.with(|f| f.license_state.clone())
                                on:change=move |ev| fields.update(|f| f.license_state = event_target_value(&ev))
                            >
                                <option value="">"Selecione"</option>
                                {FEDERATIVE_UNITS.iter().map(|uf| view! { <option value=*uf>{*uf}</option> }).collect_view()}
                            </select>
                        </label>
                        <AreaPicker
                            legend="Áreas de Especialização"
                            selected=Signal::derive(move || fields.with(|f| f.specializations.clone()))
                            on_toggle=Callback::new(move |area: String| fields.update(|f| toggle_tag(&mut f.specializations, &area)))
                        />
                    </Show>

                    <button class="registration-button" type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Salvando..." } else { "Completar Cadastro" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

/// Checkbox group over [`AREAS_OF_LAW`].
#[component]
fn AreaPicker(legend: &'static str, selected: Signal<Vec<String>>, on_toggle: Callback<String>) -> impl IntoView {
    view! {
        <fieldset class="area-picker">
            <legend class="registration-label">{legend}</legend>
            {AREAS_OF_LAW
                .iter()
                .copied()
                .map(|area| {
                    view! {
                        <label class="area-picker__option">
                            <input
                                type="checkbox"
                                prop:checked=move || selected.with(|tags| tags.iter().any(|t| t == area))
                                on:change=move |_| on_toggle.run(area.to_owned())
                            />
                            {area}
                        </label>
                    }
                })
                .collect_view()}
        </fieldset>
    }
}
