use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::digits_only;
use super::draft::{Field, PixKeyType, RegistrationDraft};

/// Minimum password length enforced on step 3.
///
/// The form hint advertises [`PASSWORD_HINT`]; the enforced minimum stays at 6
/// until the product copy and the rule are reconciled.
pub const MIN_PASSWORD_LEN: usize = 6;
pub const PASSWORD_HINT: &str = "Minimum 8 characters";

const MIN_AGE_YEARS: i32 = 18;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static BTC_LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$").expect("legacy btc regex")
});
static BTC_BECH32_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bc1[ac-hj-np-z02-9]{39,59}$").expect("bech32 btc regex"));
static USDT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("usdt regex"));

/// The four ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Personal = 1,
    Banking = 2,
    CryptoCredentials = 3,
    Terms = 4,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Step> {
        match number {
            1 => Some(Step::Personal),
            2 => Some(Step::Banking),
            3 => Some(Step::CryptoCredentials),
            4 => Some(Step::Terms),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Personal data",
            Step::Banking => "Address and banking",
            Step::CryptoCredentials => "Crypto wallets and password",
            Step::Terms => "Terms",
        }
    }

    /// The following step, or `None` on the last one.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Personal => Some(Step::Banking),
            Step::Banking => Some(Step::CryptoCredentials),
            Step::CryptoCredentials => Some(Step::Terms),
            Step::Terms => None,
        }
    }

    /// The preceding step, or `None` on the first one.
    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Personal => None,
            Step::Banking => Some(Step::Personal),
            Step::CryptoCredentials => Some(Step::Banking),
            Step::Terms => Some(Step::CryptoCredentials),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} of 4: {}", self.number(), self.title())
    }
}

/// First rule a step failed, with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Missing(Field),
    CpfLength,
    InvalidEmail,
    PhoneLength,
    InvalidBirthDate,
    Underage,
    CepLength,
    PixKeyMismatch(PixKeyType),
    PasswordMismatch,
    PasswordTooShort,
    InvalidBtcAddress,
    InvalidUsdtAddress,
    TermsNotAccepted,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "{} is required", field.label()),
            ValidationError::CpfLength => f.write_str("CPF must have 11 digits"),
            ValidationError::InvalidEmail => f.write_str("Enter a valid email address"),
            ValidationError::PhoneLength => {
                f.write_str("Phone must have 11 digits (area code + number)")
            }
            ValidationError::InvalidBirthDate => {
                f.write_str("Enter a valid birth date (YYYY-MM-DD or DD/MM/YYYY)")
            }
            ValidationError::Underage => {
                write!(f, "You must be at least {MIN_AGE_YEARS} years old")
            }
            ValidationError::CepLength => f.write_str("CEP must have 8 digits"),
            ValidationError::PixKeyMismatch(PixKeyType::Email) => {
                f.write_str("PIX key must be a valid email for the email key type")
            }
            ValidationError::PixKeyMismatch(PixKeyType::Phone) => {
                f.write_str("PIX phone key must have 11 digits")
            }
            ValidationError::PixKeyMismatch(PixKeyType::Cpf) => {
                f.write_str("PIX CPF key must have 11 digits")
            }
            ValidationError::PixKeyMismatch(PixKeyType::Random) => {
                f.write_str("PIX random key is invalid")
            }
            ValidationError::PasswordMismatch => f.write_str("Passwords do not match"),
            ValidationError::PasswordTooShort => write!(
                f,
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ),
            ValidationError::InvalidBtcAddress => f.write_str("Invalid Bitcoin address"),
            ValidationError::InvalidUsdtAddress => f.write_str("Invalid USDT (ERC-20) address"),
            ValidationError::TermsNotAccepted => {
                f.write_str("You must accept the terms to continue")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Legacy (`1`/`3` prefix, base58) or bech32 (`bc1`) address shape.
pub fn is_valid_btc_address(value: &str) -> bool {
    let value = value.trim();
    BTC_LEGACY_RE.is_match(value) || BTC_BECH32_RE.is_match(value)
}

/// ERC-20 address shape: `0x` + 40 hex digits.
pub fn is_valid_usdt_address(value: &str) -> bool {
    USDT_RE.is_match(value.trim())
}

/// Accepts `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

/// Validates the fields owned by `step`, returning the first failing rule.
///
/// `today` anchors the age check, which compares calendar years only.
///
/// # Errors
/// Returns the first [`ValidationError`] in rule order.
pub fn validate_step(
    step: Step,
    draft: &RegistrationDraft,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    match step {
        Step::Personal => validate_personal(draft, today),
        Step::Banking => validate_banking(draft),
        Step::CryptoCredentials => validate_credentials(draft),
        Step::Terms => {
            if draft.terms_accepted {
                Ok(())
            } else {
                Err(ValidationError::TermsNotAccepted)
            }
        }
    }
}

fn require(draft: &RegistrationDraft, fields: &[Field]) -> Result<(), ValidationError> {
    match fields.iter().find(|f| draft.get(**f).trim().is_empty()) {
        Some(field) => Err(ValidationError::Missing(*field)),
        None => Ok(()),
    }
}

fn validate_personal(draft: &RegistrationDraft, today: NaiveDate) -> Result<(), ValidationError> {
    require(
        draft,
        &[
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Phone,
            Field::Cpf,
            Field::BirthDate,
        ],
    )?;

    if digits_only(&draft.cpf).len() != 11 {
        return Err(ValidationError::CpfLength);
    }
    if !is_valid_email(&draft.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if digits_only(&draft.phone).len() != 11 {
        return Err(ValidationError::PhoneLength);
    }

    let birth = parse_birth_date(&draft.birth_date).ok_or(ValidationError::InvalidBirthDate)?;
    if today.year() - birth.year() < MIN_AGE_YEARS {
        return Err(ValidationError::Underage);
    }
    Ok(())
}

fn validate_banking(draft: &RegistrationDraft) -> Result<(), ValidationError> {
    require(
        draft,
        &[
            Field::Cep,
            Field::Address,
            Field::AddressNumber,
            Field::Bank,
            Field::Agency,
            Field::Account,
            Field::PixKeyType,
            Field::PixKey,
            Field::PixOwnerName,
            Field::PixCopyPaste,
            Field::PixQrCode,
        ],
    )?;

    if digits_only(&draft.cep).len() != 8 {
        return Err(ValidationError::CepLength);
    }

    match draft.pix_key_type {
        Some(PixKeyType::Email) if !is_valid_email(&draft.pix_key) => {
            Err(ValidationError::PixKeyMismatch(PixKeyType::Email))
        }
        Some(kind @ (PixKeyType::Phone | PixKeyType::Cpf))
            if digits_only(&draft.pix_key).len() != 11 =>
        {
            Err(ValidationError::PixKeyMismatch(kind))
        }
        _ => Ok(()),
    }
}

fn validate_credentials(draft: &RegistrationDraft) -> Result<(), ValidationError> {
    require(draft, &[Field::Password, Field::ConfirmPassword])?;

    if draft.password != draft.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if draft.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !draft.btc_address.trim().is_empty() && !is_valid_btc_address(&draft.btc_address) {
        return Err(ValidationError::InvalidBtcAddress);
    }
    if !draft.usdt_address.trim().is_empty() && !is_valid_usdt_address(&draft.usdt_address) {
        return Err(ValidationError::InvalidUsdtAddress);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn personal() -> RegistrationDraft {
        let mut draft = RegistrationDraft::new();
        draft.set_field(Field::FirstName, "Ana");
        draft.set_field(Field::LastName, "Souza");
        draft.set_field(Field::Email, "ana@example.com");
        draft.set_field(Field::Phone, "(11) 98765-4321");
        draft.set_field(Field::Cpf, "111.222.333-44");
        draft.set_field(Field::BirthDate, "1990-05-01");
        draft
    }

    fn banking() -> RegistrationDraft {
        let mut draft = personal();
        draft.set_field(Field::Cep, "01310-100");
        draft.set_field(Field::Address, "Av. Paulista");
        draft.set_field(Field::AddressNumber, "1000");
        draft.set_field(Field::Bank, "001");
        draft.set_field(Field::Agency, "1234");
        draft.set_field(Field::Account, "56789-0");
        draft.set_field(Field::PixKeyType, "email");
        draft.set_field(Field::PixOwnerName, "Ana Souza");
        draft.set_field(Field::PixCopyPaste, "00020126...");
        draft.set_field(Field::PixQrCode, "data:image/png;base64,AAAA");
        draft
    }

    #[test]
    fn test_formatted_cpf_passes_short_cpf_fails() {
        let draft = personal();
        assert_eq!(validate_step(Step::Personal, &draft, today()), Ok(()));

        let mut short = personal();
        short.set_field(Field::Cpf, "1112223334");
        assert_eq!(
            validate_step(Step::Personal, &short, today()),
            Err(ValidationError::CpfLength)
        );
    }

    #[test]
    fn test_missing_field_is_reported_first() {
        let mut draft = personal();
        draft.set_field(Field::LastName, "  ");
        draft.set_field(Field::Cpf, "123");
        let err = validate_step(Step::Personal, &draft, today()).unwrap_err();
        assert_eq!(err, ValidationError::Missing(Field::LastName));
        assert_eq!(err.to_string(), "Last name is required");
    }

    #[test]
    fn test_rule_order_cpf_before_email_before_phone() {
        let mut draft = personal();
        draft.set_field(Field::Cpf, "123");
        draft.set_field(Field::Email, "nope");
        draft.set_field(Field::Phone, "1");
        assert_eq!(
            validate_step(Step::Personal, &draft, today()),
            Err(ValidationError::CpfLength)
        );

        draft.set_field(Field::Cpf, "11122233344");
        assert_eq!(
            validate_step(Step::Personal, &draft, today()),
            Err(ValidationError::InvalidEmail)
        );

        draft.set_field(Field::Email, "ana@example.com");
        assert_eq!(
            validate_step(Step::Personal, &draft, today()),
            Err(ValidationError::PhoneLength)
        );
    }

    #[test]
    fn test_age_compares_years_only() {
        // 18 years minus one day still passes: only the year is compared.
        let mut draft = personal();
        draft.set_field(Field::BirthDate, "2008-10-20");
        assert_eq!(validate_step(Step::Personal, &draft, today()), Ok(()));

        draft.set_field(Field::BirthDate, "20/10/2008");
        assert_eq!(validate_step(Step::Personal, &draft, today()), Ok(()));

        draft.set_field(Field::BirthDate, "2009-01-01");
        assert_eq!(
            validate_step(Step::Personal, &draft, today()),
            Err(ValidationError::Underage)
        );
    }

    #[test]
    fn test_unparseable_birth_date() {
        let mut draft = personal();
        draft.set_field(Field::BirthDate, "yesterday");
        assert_eq!(
            validate_step(Step::Personal, &draft, today()),
            Err(ValidationError::InvalidBirthDate)
        );
    }

    #[test]
    fn test_banking_requires_eight_digit_cep() {
        let draft = banking();
        assert_eq!(validate_step(Step::Banking, &draft, today()), Ok(()));

        let mut bad = banking();
        bad.set_field(Field::Cep, "0131010");
        assert_eq!(
            validate_step(Step::Banking, &bad, today()),
            Err(ValidationError::CepLength)
        );
    }

    #[test]
    fn test_banking_requires_pix_qr_code() {
        let mut draft = banking();
        draft.set_field(Field::PixQrCode, "");
        assert_eq!(
            validate_step(Step::Banking, &draft, today()),
            Err(ValidationError::Missing(Field::PixQrCode))
        );
    }

    #[test]
    fn test_pix_key_shape_follows_key_type() {
        let mut draft = banking();
        draft.set_field(Field::PixKeyType, "phone");
        assert_eq!(
            validate_step(Step::Banking, &draft, today()),
            Err(ValidationError::PixKeyMismatch(PixKeyType::Phone))
        );

        draft.set_field(Field::PixKey, "(11) 98765-4321");
        assert_eq!(validate_step(Step::Banking, &draft, today()), Ok(()));

        draft.set_field(Field::PixKeyType, "email");
        assert_eq!(
            validate_step(Step::Banking, &draft, today()),
            Err(ValidationError::PixKeyMismatch(PixKeyType::Email))
        );

        draft.set_field(Field::PixKeyType, "random");
        assert_eq!(validate_step(Step::Banking, &draft, today()), Ok(()));
    }

    #[test]
    fn test_credentials_rules() {
        let mut draft = RegistrationDraft::new();
        draft.set_field(Field::Password, "secret1");
        draft.set_field(Field::ConfirmPassword, "secret2");
        assert_eq!(
            validate_step(Step::CryptoCredentials, &draft, today()),
            Err(ValidationError::PasswordMismatch)
        );

        draft.set_field(Field::Password, "abc");
        draft.set_field(Field::ConfirmPassword, "abc");
        assert_eq!(
            validate_step(Step::CryptoCredentials, &draft, today()),
            Err(ValidationError::PasswordTooShort)
        );

        draft.set_field(Field::Password, "abcdef");
        draft.set_field(Field::ConfirmPassword, "abcdef");
        assert_eq!(validate_step(Step::CryptoCredentials, &draft, today()), Ok(()));

        draft.set_field(Field::BtcAddress, "not-a-wallet");
        assert_eq!(
            validate_step(Step::CryptoCredentials, &draft, today()),
            Err(ValidationError::InvalidBtcAddress)
        );
    }

    #[test]
    fn test_wallet_address_shapes() {
        assert!(is_valid_btc_address("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"));
        assert!(is_valid_btc_address("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"));
        assert!(is_valid_btc_address(
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        ));
        assert!(!is_valid_btc_address("0BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"));
        // `l` is not in the base58 alphabet
        assert!(!is_valid_btc_address("1lvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"));
        // `b`, `i`, `o` and `1` are outside the bech32 data charset
        assert!(!is_valid_btc_address(
            "bc1qbr0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        ));
        assert!(!is_valid_btc_address(
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5md1"
        ));

        assert!(is_valid_usdt_address(
            "0xdAC17F958D2ee523a2206206994597C13D831ec7"
        ));
        assert!(!is_valid_usdt_address("0xdAC17F958D2ee523a2206206994597C13D831ec"));
        assert!(!is_valid_usdt_address("dAC17F958D2ee523a2206206994597C13D831ec7"));
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut draft = RegistrationDraft::new();
        assert_eq!(
            validate_step(Step::Terms, &draft, today()),
            Err(ValidationError::TermsNotAccepted)
        );
        draft.terms_accepted = true;
        assert_eq!(validate_step(Step::Terms, &draft, today()), Ok(()));
    }

    #[test]
    fn test_step_navigation_bounds() {
        assert_eq!(Step::Personal.previous(), None);
        assert_eq!(Step::Terms.next(), None);
        assert_eq!(Step::Banking.next(), Some(Step::CryptoCredentials));
        assert_eq!(Step::Terms.number(), 4);
        assert_eq!(Step::from_number(2), Some(Step::Banking));
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(5), None);
    }
}
