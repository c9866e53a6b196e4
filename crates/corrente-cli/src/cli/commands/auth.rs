//! Session command handlers: login, logout, profile and verification.

use anyhow::Result;
use corrente_core::config::Config;
use corrente_core::session::{self, BootstrapPhase, CredentialStore, mask_token};
use corrente_types::User;

use super::{output, print_message, prompt, signed_in};

pub async fn login(config: &Config, email: &str, password: Option<String>) -> Result<()> {
    let mut session = session::open(config)?;

    if let Some(existing) = session.credentials().load()? {
        println!(
            "Replacing the session of {} (token: {})",
            existing.user.email,
            mask_token(&existing.token)
        );
    }

    let password = match password {
        Some(p) => p,
        None => prompt::line("Password")?,
    };

    let user = session.login(email.trim(), &password).await?;
    println!("✓ Signed in as {} ({})", user.full_name(), user.email);
    println!(
        "  Session saved to: {}",
        session.credentials().path().display()
    );
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let mut session = session::open(config)?;
    let had_session = session.credentials().load()?.is_some();
    session.logout()?;

    if had_session {
        println!("✓ Signed out");
        println!(
            "  Session removed from: {}",
            session.credentials().path().display()
        );
    } else {
        println!("Not signed in (no stored session).");
    }
    Ok(())
}

pub async fn profile(config: &Config) -> Result<()> {
    let mut session = session::open(config)?;

    match session.bootstrap().await?.clone() {
        BootstrapPhase::Anonymous => {
            println!("Not signed in. Run `corrente login` first.");
            return Ok(());
        }
        BootstrapPhase::Unconfirmed { error } => {
            eprintln!("warning: could not refresh profile ({error}); showing stored data");
        }
        BootstrapPhase::Reverted { error } => {
            anyhow::bail!("Session is no longer valid ({error}). Sign in again.");
        }
        BootstrapPhase::Hydrating | BootstrapPhase::Optimistic | BootstrapPhase::Confirmed => {}
    }

    if let Some(user) = session.user() {
        print_profile(user);
    }
    Ok(())
}

pub(super) fn print_profile(user: &User) {
    let verified = |flag: bool| if flag { "verified" } else { "not verified" };

    let mut table = output::table(&["Field", "Value"]);
    table.add_row(vec!["Name".to_string(), user.full_name()]);
    table.add_row(vec![
        "Email".to_string(),
        format!("{} ({})", user.email, verified(user.email_verified)),
    ]);
    table.add_row(vec![
        "Phone".to_string(),
        format!("{} ({})", output::or_dash(&user.phone), verified(user.phone_verified)),
    ]);
    table.add_row(vec!["CPF".to_string(), output::or_dash(&user.cpf)]);
    table.add_row(vec!["Level".to_string(), user.current_level.to_string()]);
    table.add_row(vec!["Status".to_string(), user.status.as_str().to_string()]);
    if user.is_admin() {
        table.add_row(vec!["Role".to_string(), "admin".to_string()]);
    }
    table.add_row(vec![
        "PIX key".to_string(),
        output::or_dash(user.pix_key.as_deref().unwrap_or_default()),
    ]);
    table.add_row(vec!["Member since".to_string(), output::date(user.created_at.as_ref())]);
    println!("{table}");
}

pub async fn verify_email(config: &Config, code: &str) -> Result<()> {
    let mut session = signed_in(config)?;
    let message = session.verify_email(code.trim()).await?;
    print_message(message, "Email verified");
    Ok(())
}

pub async fn verify_phone(config: &Config, code: &str) -> Result<()> {
    let mut session = signed_in(config)?;
    let message = session.verify_phone(code.trim()).await?;
    print_message(message, "Phone verified");
    Ok(())
}

pub async fn resend_email(config: &Config) -> Result<()> {
    let session = signed_in(config)?;
    let message = session.resend_email_verification().await?;
    print_message(message, "Verification email sent");
    Ok(())
}

pub async fn resend_phone(config: &Config) -> Result<()> {
    let session = signed_in(config)?;
    let message = session.resend_phone_verification().await?;
    print_message(message, "Verification SMS sent");
    Ok(())
}
