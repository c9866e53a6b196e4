//! Multi-step registration wizard.
//!
//! The wizard collects a [`RegistrationDraft`] over four ordered steps and
//! only lets the user advance once the current step validates:
//!
//! ```text
//! Personal ──next──▶ Banking ──next──▶ CryptoCredentials ──next──▶ Terms ──submit──▶ Register
//!    ◀──previous──       ◀──previous──            ◀──previous──
//! ```
//!
//! - `draft`: field storage and the strongly keyed [`Field`] set
//! - `validate`: pure per-step validators (first failing rule wins)
//! - `wizard`: the reducer; returns [`WizardEffect`]s for the runtime to run

mod draft;
mod validate;
mod wizard;

pub use draft::{Field, PixKeyType, RegistrationDraft};
pub use validate::{
    MIN_PASSWORD_LEN, PASSWORD_HINT, Step, ValidationError, is_valid_btc_address,
    is_valid_email, is_valid_usdt_address, parse_birth_date, validate_step,
};
pub use wizard::{RegistrationWizard, WizardEffect, WizardEvent};

/// Keeps only ASCII digits (`"111.222.333-44"` → `"11122233344"`).
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
