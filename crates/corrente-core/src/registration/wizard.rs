use chrono::{Local, NaiveDate};

use super::digits_only;
use super::draft::{Field, RegistrationDraft};
use super::validate::{Step, validate_step};
use crate::services::auth::RegistrationRequest;
use crate::services::cep::CepAddress;

/// Input to the wizard reducer.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    Edit(Field, String),
    AcceptTerms(bool),
    Next,
    Previous,
    Submit,
    /// Result of a [`WizardEffect::LookupCep`]; `None` for unknown codes.
    CepResolved(Option<CepAddress>),
    SubmitFailed(String),
}

/// Side effects for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    LookupCep { cep: String },
    Register(RegistrationRequest),
}

/// Registration wizard state machine.
///
/// The wizard never performs I/O. Each call to [`update`](Self::update)
/// mutates local state and returns the effects the caller must run; the
/// caller feeds results back as `CepResolved` / `SubmitFailed` events.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    draft: RegistrationDraft,
    step: Step,
    error: Option<String>,
    submitting: bool,
    today: NaiveDate,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    /// Wizard whose age check is anchored at `today`.
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            draft: RegistrationDraft::new(),
            step: Step::Personal,
            error: None,
            submitting: false,
            today,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn update(&mut self, event: WizardEvent) -> Vec<WizardEffect> {
        match event {
            WizardEvent::Edit(field, value) => self.edit(field, value),
            WizardEvent::AcceptTerms(accepted) => {
                self.draft.terms_accepted = accepted;
                vec![]
            }
            WizardEvent::Next => {
                self.next();
                vec![]
            }
            WizardEvent::Previous => {
                self.previous();
                vec![]
            }
            WizardEvent::Submit => self.submit().map(WizardEffect::Register).into_iter().collect(),
            WizardEvent::CepResolved(address) => {
                if let Some(address) = address {
                    self.apply_cep(&address);
                }
                vec![]
            }
            WizardEvent::SubmitFailed(message) => {
                self.submitting = false;
                self.error = Some(message);
                vec![]
            }
        }
    }

    fn edit(&mut self, field: Field, value: String) -> Vec<WizardEffect> {
        let cep = (field == Field::Cep).then(|| digits_only(&value));
        self.draft.set_field(field, value);

        match cep {
            Some(cep) if cep.len() == 8 => vec![WizardEffect::LookupCep { cep }],
            _ => vec![],
        }
    }

    /// Advances if every step up to the current one validates. Otherwise
    /// records the error, moves to the first failing step and returns
    /// `false`. Returns whether the wizard advanced.
    pub fn next(&mut self) -> bool {
        if !self.check_through(self.step) {
            return false;
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Validates `Personal..=last` in order. The first failure becomes the
    /// current step and its message the wizard error.
    fn check_through(&mut self, last: Step) -> bool {
        let mut step = Step::Personal;
        loop {
            if let Err(err) = validate_step(step, &self.draft, self.today) {
                self.step = step;
                self.error = Some(err.to_string());
                return false;
            }
            match step.next() {
                Some(following) if following <= last => step = following,
                _ => break,
            }
        }
        self.error = None;
        true
    }

    /// Goes back one step without validating. Returns whether the step changed.
    pub fn previous(&mut self) -> bool {
        self.error = None;
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Steps back until `target` is current. Never moves forward.
    /// Returns whether the step changed.
    pub fn back_to(&mut self, target: Step) -> bool {
        let start = self.step;
        while self.step > target && self.previous() {}
        self.step != start
    }

    /// Validates every step and, on success, returns the payload to send.
    /// A failing earlier step becomes current again.
    ///
    /// Ignored outside the last step and while a submission is in flight.
    pub fn submit(&mut self) -> Option<RegistrationRequest> {
        if self.step != Step::Terms || self.submitting {
            return None;
        }
        if !self.check_through(Step::Terms) {
            return None;
        }
        self.submitting = true;
        Some(self.draft.to_request())
    }

    /// Fills address fields the user has not typed yet.
    fn apply_cep(&mut self, address: &CepAddress) {
        let pairs = [
            (Field::Address, &address.street),
            (Field::Neighborhood, &address.neighborhood),
            (Field::City, &address.city),
            (Field::State, &address.state),
        ];
        for (field, value) in pairs {
            if self.draft.get(field).trim().is_empty() && !value.is_empty() {
                self.draft.set_field(field, value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn edit(wizard: &mut RegistrationWizard, field: Field, value: &str) -> Vec<WizardEffect> {
        wizard.update(WizardEvent::Edit(field, value.to_string()))
    }

    fn fill_personal(wizard: &mut RegistrationWizard) {
        edit(wizard, Field::FirstName, "Ana");
        edit(wizard, Field::LastName, "Souza");
        edit(wizard, Field::Email, "ana@example.com");
        edit(wizard, Field::Phone, "11987654321");
        edit(wizard, Field::Cpf, "11122233344");
        edit(wizard, Field::BirthDate, "1990-05-01");
    }

    fn fill_banking(wizard: &mut RegistrationWizard) {
        edit(wizard, Field::Cep, "01310100");
        edit(wizard, Field::Address, "Av. Paulista");
        edit(wizard, Field::AddressNumber, "1000");
        edit(wizard, Field::Bank, "001");
        edit(wizard, Field::Agency, "1234");
        edit(wizard, Field::Account, "56789-0");
        edit(wizard, Field::PixKeyType, "email");
        edit(wizard, Field::PixOwnerName, "Ana Souza");
        edit(wizard, Field::PixCopyPaste, "00020126...");
        edit(wizard, Field::PixQrCode, "data:image/png;base64,AAAA");
    }

    fn fill_credentials(wizard: &mut RegistrationWizard) {
        edit(wizard, Field::Password, "secret1");
        edit(wizard, Field::ConfirmPassword, "secret1");
    }

    fn at_terms() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::with_today(today());
        fill_personal(&mut wizard);
        assert!(wizard.next());
        fill_banking(&mut wizard);
        assert!(wizard.next());
        fill_credentials(&mut wizard);
        assert!(wizard.next());
        assert_eq!(wizard.step(), Step::Terms);
        wizard
    }

    #[test]
    fn test_starts_on_first_step() {
        let wizard = RegistrationWizard::with_today(today());
        assert_eq!(wizard.step(), Step::Personal);
        assert!(wizard.error().is_none());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_invalid_cpf_blocks_then_fix_advances() {
        let mut wizard = RegistrationWizard::with_today(today());
        fill_personal(&mut wizard);
        edit(&mut wizard, Field::Cpf, "123");

        wizard.update(WizardEvent::Next);
        assert_eq!(wizard.step(), Step::Personal);
        assert_eq!(wizard.error(), Some("CPF must have 11 digits"));

        edit(&mut wizard, Field::Cpf, "111.222.333-44");
        wizard.update(WizardEvent::Next);
        assert_eq!(wizard.step(), Step::Banking);
        assert!(wizard.error().is_none());
    }

    #[test]
    fn test_failed_next_leaves_draft_untouched() {
        let mut wizard = RegistrationWizard::with_today(today());
        edit(&mut wizard, Field::FirstName, "Ana");
        let before = wizard.draft().clone();

        assert!(!wizard.next());
        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.step(), Step::Personal);
    }

    #[test]
    fn test_previous_on_first_step_is_noop() {
        let mut wizard = RegistrationWizard::with_today(today());
        assert!(!wizard.previous());
        assert_eq!(wizard.step(), Step::Personal);
    }

    #[test]
    fn test_previous_then_next_returns_to_same_step() {
        let mut wizard = at_terms();
        let draft = wizard.draft().clone();

        assert!(wizard.previous());
        assert_eq!(wizard.step(), Step::CryptoCredentials);
        assert!(wizard.next());
        assert_eq!(wizard.step(), Step::Terms);
        assert_eq!(wizard.draft(), &draft);
    }

    #[test]
    fn test_previous_clears_error() {
        let mut wizard = at_terms();
        wizard.previous();
        edit(&mut wizard, Field::ConfirmPassword, "other");
        assert!(!wizard.next());
        assert!(wizard.error().is_some());

        wizard.previous();
        assert!(wizard.error().is_none());
    }

    #[test]
    fn test_email_edits_autofill_pix_key() {
        let mut wizard = RegistrationWizard::with_today(today());
        edit(&mut wizard, Field::Email, "a@b.com");
        assert_eq!(wizard.draft().pix_key, "a@b.com");

        let mut wizard = RegistrationWizard::with_today(today());
        edit(&mut wizard, Field::PixKey, "xyz");
        edit(&mut wizard, Field::Email, "a@b.com");
        assert_eq!(wizard.draft().pix_key, "xyz");
    }

    #[test]
    fn test_complete_cep_requests_lookup() {
        let mut wizard = RegistrationWizard::with_today(today());
        assert!(edit(&mut wizard, Field::Cep, "01310-1").is_empty());
        assert_eq!(
            edit(&mut wizard, Field::Cep, "01310-100"),
            vec![WizardEffect::LookupCep {
                cep: "01310100".to_string()
            }]
        );
    }

    #[test]
    fn test_cep_result_fills_only_empty_fields() {
        let mut wizard = RegistrationWizard::with_today(today());
        edit(&mut wizard, Field::City, "Santos");

        wizard.update(WizardEvent::CepResolved(Some(CepAddress {
            street: "Avenida Paulista".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        })));

        let draft = wizard.draft();
        assert_eq!(draft.address, "Avenida Paulista");
        assert_eq!(draft.neighborhood, "Bela Vista");
        assert_eq!(draft.city, "Santos");
        assert_eq!(draft.state, "SP");
    }

    #[test]
    fn test_unknown_cep_changes_nothing() {
        let mut wizard = RegistrationWizard::with_today(today());
        let before = wizard.draft().clone();
        wizard.update(WizardEvent::CepResolved(None));
        assert_eq!(wizard.draft(), &before);
    }

    #[test]
    fn test_submit_requires_terms() {
        let mut wizard = at_terms();
        assert!(wizard.update(WizardEvent::Submit).is_empty());
        assert_eq!(wizard.error(), Some("You must accept the terms to continue"));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_submit_emits_register_once() {
        let mut wizard = at_terms();
        wizard.update(WizardEvent::AcceptTerms(true));

        let effects = wizard.update(WizardEvent::Submit);
        assert_eq!(effects.len(), 1);
        let WizardEffect::Register(request) = &effects[0] else {
            panic!("expected register effect");
        };
        assert_eq!(request.email, "ana@example.com");
        assert_eq!(request.pix_key, "ana@example.com");
        assert_eq!(request.pix_key_type, "email");
        assert!(wizard.is_submitting());

        assert!(wizard.update(WizardEvent::Submit).is_empty());
    }

    #[test]
    fn test_submit_failure_shows_message_and_allows_retry() {
        let mut wizard = at_terms();
        wizard.update(WizardEvent::AcceptTerms(true));
        wizard.update(WizardEvent::Submit);

        wizard.update(WizardEvent::SubmitFailed("Email already registered".to_string()));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.error(), Some("Email already registered"));
        assert_eq!(wizard.step(), Step::Terms);

        assert_eq!(wizard.update(WizardEvent::Submit).len(), 1);
    }

    #[test]
    fn test_breaking_an_earlier_step_blocks_next() {
        let mut wizard = RegistrationWizard::with_today(today());
        fill_personal(&mut wizard);
        assert!(wizard.next());
        fill_banking(&mut wizard);
        assert!(wizard.next());
        fill_credentials(&mut wizard);

        edit(&mut wizard, Field::Cpf, "123");
        assert!(!wizard.next());
        assert_eq!(wizard.step(), Step::Personal);
        assert_eq!(wizard.error(), Some("CPF must have 11 digits"));

        edit(&mut wizard, Field::Cpf, "11122233344");
        assert!(wizard.next());
        assert_eq!(wizard.step(), Step::Banking);
    }

    #[test]
    fn test_submit_revalidates_every_step() {
        let mut wizard = at_terms();
        wizard.update(WizardEvent::AcceptTerms(true));
        edit(&mut wizard, Field::Email, "");

        assert!(wizard.update(WizardEvent::Submit).is_empty());
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.step(), Step::Personal);
        assert_eq!(wizard.error(), Some("Email is required"));
    }

    #[test]
    fn test_back_to_only_moves_backwards() {
        let mut wizard = at_terms();
        assert!(wizard.back_to(Step::Personal));
        assert_eq!(wizard.step(), Step::Personal);
        assert!(!wizard.back_to(Step::Terms));
        assert_eq!(wizard.step(), Step::Personal);
    }

    #[test]
    fn test_submit_outside_terms_step_is_ignored() {
        let mut wizard = RegistrationWizard::with_today(today());
        fill_personal(&mut wizard);
        assert!(wizard.update(WizardEvent::Submit).is_empty());
        assert_eq!(wizard.step(), Step::Personal);
    }
}
