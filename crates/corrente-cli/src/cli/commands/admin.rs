//! Admin command handlers.

use anyhow::{Context, Result, bail};
use corrente_core::config::Config;
use corrente_core::services::donations::DonationSearch;
use corrente_core::services::{donations, queue, reports, users};
use corrente_types::{Donation, NewQueueEntry, QueueEntry, QueueUpdate, Report, User, UserStatus};

use super::output::{self, ListOptions};
use super::{LIST_RETRY, admin_session, print_message};

fn donation_row(d: &Donation) -> Vec<String> {
    vec![
        d.id.clone(),
        output::or_dash(d.donor_name()),
        output::or_dash(d.receiver_name()),
        output::money(d.amount),
        d.kind.label().to_string(),
        d.status.as_str().to_string(),
        output::date(d.created_at.as_ref()),
    ]
}

const DONATION_HEADER: &[&str] = &["ID", "Donor", "Receiver", "Amount", "Kind", "Status", "Created"];

pub async fn users(config: &Config, list: &ListOptions) -> Result<()> {
    let session = admin_session(config)?;
    let items = users::admin_list(session.client())
        .await
        .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(
        &view,
        &["ID", "Name", "Email", "CPF", "Phone", "Level", "Status"],
        |u: &User| {
            vec![
                u.id.clone(),
                u.full_name(),
                u.email.clone(),
                output::or_dash(&u.cpf),
                output::or_dash(&u.phone),
                u.current_level.to_string(),
                u.status.as_str().to_string(),
            ]
        },
    );
    Ok(())
}

pub async fn user(config: &Config, user_id: &str) -> Result<()> {
    let session = admin_session(config)?;
    let user = users::get(session.client(), user_id).await?;
    super::auth::print_profile(&user);
    Ok(())
}

fn parse_status(value: &str) -> Result<UserStatus> {
    match value.trim().to_ascii_lowercase().as_str() {
        "active" => Ok(UserStatus::Active),
        "inactive" => Ok(UserStatus::Inactive),
        "blocked" => Ok(UserStatus::Blocked),
        other => bail!("Unknown status '{other}' (expected active, inactive or blocked)"),
    }
}

pub async fn set_user_status(config: &Config, user_id: &str, status: &str) -> Result<()> {
    let status = parse_status(status)?;
    let session = admin_session(config)?;
    let user = users::set_status(session.client(), user_id, status).await?;
    println!(
        "✓ {} is now {}",
        user.full_name(),
        user.status.as_str()
    );
    Ok(())
}

pub async fn donations(config: &Config, list: &ListOptions) -> Result<()> {
    let session = admin_session(config)?;
    let items = donations::admin_all(session.client())
        .await
        .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(&view, DONATION_HEADER, donation_row);
    Ok(())
}

pub async fn search_donations(config: &Config, search: &DonationSearch) -> Result<()> {
    let session = admin_session(config)?;
    let page = donations::admin_search(session.client(), search).await?;

    if page.items.is_empty() {
        println!("No results.");
    } else {
        let mut table = output::table(DONATION_HEADER);
        for d in &page.items {
            table.add_row(donation_row(d));
        }
        println!("{table}");
    }
    println!(
        "Page {} · {} of {} result(s)",
        page.page.max(1),
        page.items.len(),
        page.total
    );
    Ok(())
}

pub async fn reports(config: &Config, list: &ListOptions) -> Result<()> {
    let session = admin_session(config)?;
    let items = reports::admin_list(session.client())
        .await
        .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(
        &view,
        &["ID", "Donation", "Reporter", "Reason", "Status", "Created"],
        |r: &Report| {
            vec![
                r.id.clone(),
                r.donation_id.clone(),
                output::or_dash(r.reporter_name()),
                r.reason.clone(),
                r.status.as_str().to_string(),
                output::date(r.created_at.as_ref()),
            ]
        },
    );
    Ok(())
}

pub async fn resolve_report(config: &Config, report_id: &str, resolution: &str) -> Result<()> {
    if resolution.trim().is_empty() {
        bail!("A resolution is required");
    }
    let session = admin_session(config)?;
    let report = reports::resolve(session.client(), report_id, resolution.trim()).await?;
    println!("✓ Report {} is {}", report.id, report.status.as_str());
    Ok(())
}

pub async fn queue(config: &Config, level: Option<u32>, list: &ListOptions) -> Result<()> {
    let session = admin_session(config)?;
    let items = match level {
        Some(level) => queue::by_level(session.client(), level).await,
        None => queue::list(session.client()).await,
    }
    .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(
        &view,
        &["ID", "User", "Email", "Level", "Position", "Donation #", "Active"],
        |q: &QueueEntry| {
            vec![
                q.id.clone(),
                output::or_dash(q.user_name()),
                output::or_dash(q.user_email()),
                q.level.to_string(),
                q.position.to_string(),
                q.donation_number.to_string(),
                if q.is_active { "yes" } else { "no" }.to_string(),
            ]
        },
    );
    Ok(())
}

pub async fn queue_add(
    config: &Config,
    user_id: String,
    level: u32,
    donation_number: u32,
) -> Result<()> {
    let session = admin_session(config)?;
    let entry = queue::create(
        session.client(),
        &NewQueueEntry {
            user_id,
            level,
            donation_number,
        },
    )
    .await?;
    println!(
        "✓ Queued {} at level {} position {}",
        output::or_dash(entry.user_name()),
        entry.level,
        entry.position
    );
    Ok(())
}

pub async fn queue_update(config: &Config, entry_id: &str, update: &QueueUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update: pass --position, --level or --donation-number");
    }
    let session = admin_session(config)?;
    let entry = queue::update(session.client(), entry_id, update).await?;
    println!(
        "✓ Entry {} now at level {} position {}",
        entry.id, entry.level, entry.position
    );
    Ok(())
}

pub async fn queue_remove(config: &Config, entry_id: &str) -> Result<()> {
    let session = admin_session(config)?;
    let message = queue::remove(session.client(), entry_id).await?;
    print_message(message, "Queue entry removed");
    Ok(())
}

pub async fn monthly_pull(config: &Config) -> Result<()> {
    let session = admin_session(config)?;
    let message = donations::generate_monthly_pull(session.client()).await?;
    print_message(message, "Monthly pull generated");
    Ok(())
}

pub async fn level_stats(config: &Config, level: u32) -> Result<()> {
    let session = admin_session(config)?;
    let stats = donations::level_stats(session.client(), level).await?;

    let mut table = output::table(&["Metric", "Value"]);
    table.add_row(vec!["Level".to_string(), stats.level.to_string()]);
    table.add_row(vec!["Users".to_string(), stats.total_users.to_string()]);
    table.add_row(vec!["In queue".to_string(), stats.in_queue.to_string()]);
    table.add_row(vec!["Completed".to_string(), stats.completed_users.to_string()]);
    table.add_row(vec!["Donations".to_string(), stats.total_donations.to_string()]);
    table.add_row(vec!["Total amount".to_string(), output::money(stats.total_amount)]);
    println!("{table}");
    Ok(())
}
