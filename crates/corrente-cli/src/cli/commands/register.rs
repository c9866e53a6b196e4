//! Interactive registration wizard.
//!
//! Drives the core wizard reducer from stdin and executes its effects: CEP
//! lookups go to the postal-code service, the final payload goes through the
//! session store so the new account is signed in immediately.

use anyhow::Result;
use corrente_core::config::Config;
use corrente_core::files;
use corrente_core::registration::{
    Field, PASSWORD_HINT, PixKeyType, RegistrationWizard, Step, WizardEffect, WizardEvent,
};
use corrente_core::services::cep::CepClient;
use corrente_core::session::{self, FileCredentialStore, SessionStore};

use super::prompt;

const TERMS: &str = "\
Corrente is a solidarity contribution network. By registering you agree that:
  - donations are voluntary and sent directly between members;
  - you will upload a truthful payment proof for every donation you send;
  - you will confirm received payments promptly or report problems;
  - accounts that fail to pay on time may be blocked.";

pub async fn run(config: &Config) -> Result<()> {
    let mut session = session::open(config)?;
    let cep = CepClient::from_config(config)?;
    let mut wizard = RegistrationWizard::new();

    println!("Create your Corrente account. Press Enter to keep a value shown in [brackets].");

    loop {
        println!();
        println!("{}", wizard.step());

        if wizard.step() == Step::Terms {
            println!("{TERMS}");
            let accepted = prompt::confirm("Do you accept the terms?")?;
            wizard.update(WizardEvent::AcceptTerms(accepted));

            let effects = wizard.update(WizardEvent::Submit);
            if let Some(error) = wizard.error() {
                eprintln!("✗ {error}");
                if !prompt::confirm("Try again?")? {
                    anyhow::bail!("Registration cancelled");
                }
                continue;
            }
            if run_effects(&mut wizard, effects, &cep, &mut session).await? {
                return Ok(());
            }
            match ask_step_to_edit()? {
                Some(step) => {
                    wizard.back_to(step);
                }
                None => anyhow::bail!("Registration cancelled"),
            }
            continue;
        }

        for field in Field::for_step(wizard.step()) {
            let value = ask(field, wizard.draft().get(field))?;
            let effects = wizard.update(WizardEvent::Edit(field, value));
            run_effects(&mut wizard, effects, &cep, &mut session).await?;
        }

        if !wizard.next() {
            if let Some(error) = wizard.error() {
                eprintln!("✗ {error}");
            }
            if wizard.step() != Step::Personal && prompt::confirm("Go back one step?")? {
                wizard.previous();
            }
        }
    }
}

/// Asks which earlier step to reopen after the server rejected the data.
fn ask_step_to_edit() -> Result<Option<Step>> {
    loop {
        let answer =
            prompt::line("Edit which step? (1 personal, 2 banking, 3 password; Enter to cancel)")?;
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse().ok().and_then(Step::from_number) {
            Some(step) if step != Step::Terms => return Ok(Some(step)),
            _ => eprintln!("✗ Enter 1, 2 or 3"),
        }
    }
}

fn ask(field: Field, current: &str) -> Result<String> {
    if field.is_image() {
        let shown = if current.is_empty() { "" } else { "keep current image" };
        let path = prompt::line_or_keep(&format!("{} (image file path)", field.label()), shown)?;
        if path.is_empty() || path == shown {
            return Ok(current.to_string());
        }
        return match files::image_data_url(&path) {
            Ok(data_url) => Ok(data_url),
            Err(e) => {
                eprintln!("✗ {e:#}");
                Ok(current.to_string())
            }
        };
    }

    let label = match field {
        Field::PixKeyType => {
            let kinds: Vec<&str> = PixKeyType::all().iter().map(PixKeyType::as_str).collect();
            format!("{} ({})", field.label(), kinds.join("/"))
        }
        Field::BirthDate => format!("{} (YYYY-MM-DD or DD/MM/YYYY)", field.label()),
        Field::Password => format!("{} ({PASSWORD_HINT})", field.label()),
        Field::Complement
        | Field::Neighborhood
        | Field::City
        | Field::State
        | Field::BtcAddress
        | Field::UsdtAddress => format!("{} (optional)", field.label()),
        _ => field.label().to_string(),
    };
    prompt::line_or_keep(&label, current)
}

/// Executes wizard effects. Returns `true` once the account was created.
async fn run_effects(
    wizard: &mut RegistrationWizard,
    effects: Vec<WizardEffect>,
    cep: &CepClient,
    session: &mut SessionStore<FileCredentialStore>,
) -> Result<bool> {
    let mut registered = false;
    for effect in effects {
        match effect {
            WizardEffect::LookupCep { cep: code } => {
                let address = match cep.lookup(&code).await {
                    Ok(address) => address,
                    Err(e) => {
                        tracing::warn!(error = %e, "CEP lookup failed");
                        None
                    }
                };
                if let Some(address) = &address {
                    println!(
                        "  Found: {}, {} - {}/{}",
                        address.street, address.neighborhood, address.city, address.state
                    );
                }
                wizard.update(WizardEvent::CepResolved(address));
            }
            WizardEffect::Register(request) => match session.register(&request).await {
                Ok(user) => {
                    println!();
                    println!("✓ Account created. Signed in as {}", user.full_name());
                    println!("  Check your email and phone for verification codes:");
                    println!("  corrente verify email <CODE> / corrente verify phone <CODE>");
                    registered = true;
                }
                Err(e) => {
                    eprintln!("✗ {e:#}");
                    wizard.update(WizardEvent::SubmitFailed(format!("{e:#}")));
                }
            },
        }
    }
    Ok(registered)
}
