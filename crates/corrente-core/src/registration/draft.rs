use std::fmt;
use std::str::FromStr;

use crate::services::auth::RegistrationRequest;

use super::validate::Step;

/// How the PIX key identifies the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixKeyType {
    Email,
    Phone,
    Cpf,
    Random,
}

impl PixKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyType::Email => "email",
            PixKeyType::Phone => "phone",
            PixKeyType::Cpf => "cpf",
            PixKeyType::Random => "random",
        }
    }

    pub fn all() -> &'static [PixKeyType] {
        &[
            PixKeyType::Email,
            PixKeyType::Phone,
            PixKeyType::Cpf,
            PixKeyType::Random,
        ]
    }
}

impl FromStr for PixKeyType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "cpf" => Ok(Self::Cpf),
            "random" => Ok(Self::Random),
            other => Err(format!("Unknown PIX key type: {other}")),
        }
    }
}

impl fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every editable text field of the draft.
///
/// One `set` entry point takes a `Field` and a value, so there is no
/// stringly-typed field indexing anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Cpf,
    BirthDate,
    Cep,
    Address,
    AddressNumber,
    Complement,
    Neighborhood,
    City,
    State,
    Bank,
    Agency,
    Account,
    PixKeyType,
    PixKey,
    PixOwnerName,
    PixCopyPaste,
    PixQrCode,
    BtcAddress,
    BtcQrCode,
    UsdtAddress,
    UsdtQrCode,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Cpf => "CPF",
            Field::BirthDate => "Birth date",
            Field::Cep => "CEP",
            Field::Address => "Address",
            Field::AddressNumber => "Address number",
            Field::Complement => "Complement",
            Field::Neighborhood => "Neighborhood",
            Field::City => "City",
            Field::State => "State",
            Field::Bank => "Bank",
            Field::Agency => "Agency",
            Field::Account => "Account",
            Field::PixKeyType => "PIX key type",
            Field::PixKey => "PIX key",
            Field::PixOwnerName => "PIX owner name",
            Field::PixCopyPaste => "PIX copy-paste code",
            Field::PixQrCode => "PIX QR code",
            Field::BtcAddress => "BTC address",
            Field::BtcQrCode => "BTC QR code",
            Field::UsdtAddress => "USDT address",
            Field::UsdtQrCode => "USDT QR code",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm password",
        }
    }

    /// The wizard step that owns this field.
    pub fn step(&self) -> Step {
        match self {
            Field::FirstName
            | Field::LastName
            | Field::Email
            | Field::Phone
            | Field::Cpf
            | Field::BirthDate => Step::Personal,
            Field::Cep
            | Field::Address
            | Field::AddressNumber
            | Field::Complement
            | Field::Neighborhood
            | Field::City
            | Field::State
            | Field::Bank
            | Field::Agency
            | Field::Account
            | Field::PixKeyType
            | Field::PixKey
            | Field::PixOwnerName
            | Field::PixCopyPaste
            | Field::PixQrCode => Step::Banking,
            Field::BtcAddress
            | Field::BtcQrCode
            | Field::UsdtAddress
            | Field::UsdtQrCode
            | Field::Password
            | Field::ConfirmPassword => Step::CryptoCredentials,
        }
    }

    /// Fields holding a base64 image data URL instead of typed text.
    pub fn is_image(&self) -> bool {
        matches!(self, Field::PixQrCode | Field::BtcQrCode | Field::UsdtQrCode)
    }

    pub fn all() -> &'static [Field] {
        &[
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Phone,
            Field::Cpf,
            Field::BirthDate,
            Field::Cep,
            Field::Address,
            Field::AddressNumber,
            Field::Complement,
            Field::Neighborhood,
            Field::City,
            Field::State,
            Field::Bank,
            Field::Agency,
            Field::Account,
            Field::PixKeyType,
            Field::PixKey,
            Field::PixOwnerName,
            Field::PixCopyPaste,
            Field::PixQrCode,
            Field::BtcAddress,
            Field::BtcQrCode,
            Field::UsdtAddress,
            Field::UsdtQrCode,
            Field::Password,
            Field::ConfirmPassword,
        ]
    }

    /// Fields shown on `step`, in form order.
    pub fn for_step(step: Step) -> impl Iterator<Item = Field> {
        Self::all().iter().copied().filter(move |f| f.step() == step)
    }
}

/// The registration form being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub birth_date: String,

    pub cep: String,
    pub address: String,
    pub address_number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub bank: String,
    pub agency: String,
    pub account: String,

    pub pix_key_type: Option<PixKeyType>,
    pub pix_key: String,
    pub pix_owner_name: String,
    pub pix_copy_paste: String,
    pub pix_qr_code: String,

    pub btc_address: String,
    pub btc_qr_code: String,
    pub usdt_address: String,
    pub usdt_qr_code: String,

    pub password: String,
    pub confirm_password: String,

    pub terms_accepted: bool,

    /// `pix_key` currently mirrors `email` and was never typed by the user.
    pix_key_autofilled: bool,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `field` (`PixKeyType` as its wire name, or empty).
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Cpf => &self.cpf,
            Field::BirthDate => &self.birth_date,
            Field::Cep => &self.cep,
            Field::Address => &self.address,
            Field::AddressNumber => &self.address_number,
            Field::Complement => &self.complement,
            Field::Neighborhood => &self.neighborhood,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Bank => &self.bank,
            Field::Agency => &self.agency,
            Field::Account => &self.account,
            Field::PixKeyType => self.pix_key_type.map_or("", |t| t.as_str()),
            Field::PixKey => &self.pix_key,
            Field::PixOwnerName => &self.pix_owner_name,
            Field::PixCopyPaste => &self.pix_copy_paste,
            Field::PixQrCode => &self.pix_qr_code,
            Field::BtcAddress => &self.btc_address,
            Field::BtcQrCode => &self.btc_qr_code,
            Field::UsdtAddress => &self.usdt_address,
            Field::UsdtQrCode => &self.usdt_qr_code,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    /// Updates one field.
    ///
    /// Editing `Email` also copies the value into `pix_key` while the PIX key
    /// is empty or still auto-filled; a PIX key typed by the user is never
    /// overwritten. An unknown `PixKeyType` value clears the key type.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Email => {
                if self.pix_key.is_empty() || self.pix_key_autofilled {
                    self.pix_key.clone_from(&value);
                    self.pix_key_autofilled = true;
                }
                self.email = value;
            }
            Field::PixKey => {
                self.pix_key = value;
                self.pix_key_autofilled = false;
            }
            Field::PixKeyType => {
                self.pix_key_type = value.parse().ok();
            }
            other => {
                if let Some(slot) = self.text_slot_mut(other) {
                    *slot = value;
                }
            }
        }
    }

    /// Backing string of a free-text field; `None` for `PixKeyType`.
    fn text_slot_mut(&mut self, field: Field) -> Option<&mut String> {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Cpf => &mut self.cpf,
            Field::BirthDate => &mut self.birth_date,
            Field::Cep => &mut self.cep,
            Field::Address => &mut self.address,
            Field::AddressNumber => &mut self.address_number,
            Field::Complement => &mut self.complement,
            Field::Neighborhood => &mut self.neighborhood,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Bank => &mut self.bank,
            Field::Agency => &mut self.agency,
            Field::Account => &mut self.account,
            Field::PixKey => &mut self.pix_key,
            Field::PixKeyType => return None,
            Field::PixOwnerName => &mut self.pix_owner_name,
            Field::PixCopyPaste => &mut self.pix_copy_paste,
            Field::PixQrCode => &mut self.pix_qr_code,
            Field::BtcAddress => &mut self.btc_address,
            Field::BtcQrCode => &mut self.btc_qr_code,
            Field::UsdtAddress => &mut self.usdt_address,
            Field::UsdtQrCode => &mut self.usdt_qr_code,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        };
        Some(slot)
    }

    /// Builds the registration payload, dropping `confirm_password` and
    /// `terms_accepted`. Blank optional fields are omitted.
    pub fn to_request(&self) -> RegistrationRequest {
        fn optional(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        RegistrationRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
            birth_date: self.birth_date.trim().to_string(),
            cep: self.cep.trim().to_string(),
            address: self.address.trim().to_string(),
            address_number: self.address_number.trim().to_string(),
            complement: optional(&self.complement),
            neighborhood: optional(&self.neighborhood),
            city: optional(&self.city),
            state: optional(&self.state),
            bank: self.bank.trim().to_string(),
            agency: self.agency.trim().to_string(),
            account: self.account.trim().to_string(),
            pix_key_type: self
                .pix_key_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            pix_key: self.pix_key.trim().to_string(),
            pix_owner_name: self.pix_owner_name.trim().to_string(),
            pix_copy_paste: self.pix_copy_paste.trim().to_string(),
            pix_qr_code: self.pix_qr_code.clone(),
            btc_address: optional(&self.btc_address),
            btc_qr_code: optional(&self.btc_qr_code),
            usdt_address: optional(&self.usdt_address),
            usdt_qr_code: optional(&self.usdt_qr_code),
            password: self.password.clone(),
        }
    }
}
