//! Session and profile records.
//!
//! DESIGN
//! ======
//! The profile document is stored flat with a `userType` discriminator, the
//! way the document store has always held it. In Rust the kind-specific
//! fields live in [`AccountDetails`] so a client profile can never carry a
//! bar license and a lawyer profile can never carry interest tags.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Identity of the signed-in account as reported by the identity backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Backend account identifier.
    pub uid: String,
    /// Email address, if the provider shared one.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, if the provider shared one.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Session {
    /// Name to greet the user with: display name, then email, then `None`.
    #[must_use]
    pub fn greeting_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.email.as_deref())
    }
}

/// Which side of the platform an account is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[default]
    Client,
    Lawyer,
}

/// Kind-specific profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum AccountDetails {
    /// Someone looking for legal services.
    Client {
        /// Areas of law the client is interested in.
        #[serde(default)]
        interests: Vec<String>,
    },
    /// A licensed lawyer offering services.
    Lawyer {
        /// Bar (OAB) registration number.
        #[serde(rename = "oabNumber")]
        license_number: String,
        /// Federative unit that issued the registration (e.g. `"SP"`).
        #[serde(rename = "oabState")]
        license_state: String,
        /// Areas of law the lawyer practices.
        #[serde(default)]
        specializations: Vec<String>,
    },
}

impl AccountDetails {
    #[must_use]
    pub fn kind(&self) -> AccountKind {
        match self {
            Self::Client { .. } => AccountKind::Client,
            Self::Lawyer { .. } => AccountKind::Lawyer,
        }
    }

    /// Area-of-law tags regardless of kind.
    #[must_use]
    pub fn areas(&self) -> &[String] {
        match self {
            Self::Client { interests } => interests,
            Self::Lawyer { specializations, .. } => specializations,
        }
    }
}

/// Extended account data stored per account in the profile store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub phone: String,
    /// Brazilian CPF.
    #[serde(rename = "cpf")]
    pub national_id: String,
    /// Set once the registration form has been submitted. Never reset.
    #[serde(default)]
    pub completed_registration: bool,
    #[serde(flatten)]
    pub account: AccountDetails,
}

impl Profile {
    #[must_use]
    pub fn kind(&self) -> AccountKind {
        self.account.kind()
    }
}

/// Registration form payload submitted by the user.
///
/// A draft has no `completed_registration` flag at all; the only way to turn
/// it into a [`Profile`] marks registration as complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileDraft {
    pub full_name: String,
    pub phone: String,
    pub national_id: String,
    pub account: AccountDetails,
}

impl ProfileDraft {
    /// Build the stored profile, always with `completed_registration = true`.
    #[must_use]
    pub fn into_profile(self) -> Profile {
        Profile {
            full_name: self.full_name,
            phone: self.phone,
            national_id: self.national_id,
            completed_registration: true,
            account: self.account,
        }
    }
}
