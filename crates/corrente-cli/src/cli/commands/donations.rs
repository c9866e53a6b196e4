//! Donation command handlers for members.

use anyhow::{Context, Result, bail};
use corrente_core::config::Config;
use corrente_core::files;
use corrente_core::proof::{
    ReviewEffect, ReviewEvent, ReviewFlow, ReviewState, UploadEffect, UploadEvent, UploadFlow,
};
use corrente_core::services::{donations, reports};
use corrente_types::{Comprovante, Donation, Report};

use super::output::{self, ListOptions};
use super::{LIST_RETRY, print_message, prompt, signed_in};

pub async fn inbox(config: &Config, list: &ListOptions) -> Result<()> {
    let session = signed_in(config)?;
    let items = donations::to_receive(session.client())
        .await
        .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(
        &view,
        &["ID", "From", "Amount", "Kind", "Status", "Deadline"],
        |d: &Donation| {
            vec![
                d.id.clone(),
                output::or_dash(d.donor_name()),
                output::money(d.amount),
                d.kind.label().to_string(),
                d.status.as_str().to_string(),
                output::date(d.deadline.as_ref()),
            ]
        },
    );
    Ok(())
}

pub async fn outbox(config: &Config, list: &ListOptions) -> Result<()> {
    let session = signed_in(config)?;
    let items = donations::to_send(session.client())
        .await
        .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(
        &view,
        &["ID", "To", "PIX key", "Amount", "Kind", "Status", "Deadline"],
        |d: &Donation| {
            let pix = d
                .receiver
                .as_ref()
                .and_then(|r| r.pix_key.as_deref())
                .unwrap_or_default();
            vec![
                d.id.clone(),
                output::or_dash(d.receiver_name()),
                output::or_dash(pix),
                output::money(d.amount),
                d.kind.label().to_string(),
                d.status.as_str().to_string(),
                output::date(d.deadline.as_ref()),
            ]
        },
    );
    Ok(())
}

pub async fn progress(config: &Config) -> Result<()> {
    let session = signed_in(config)?;
    let progress = donations::my_level_progress(session.client()).await?;

    println!("Current level: {}", progress.current_level);
    let mut table = output::table(&["Level", "Received", "Total", "Progress", "Status"]);
    for level in &progress.levels {
        let status = if level.can_upgrade {
            "upgrade available"
        } else if level.completed {
            "completed"
        } else {
            "in progress"
        };
        table.add_row(vec![
            level.level.to_string(),
            format!("{}/{}", level.donations_received, level.donations_required),
            output::money(level.total_received),
            output::progress_bar(level.percent()),
            status.to_string(),
        ]);
    }
    println!("{table}");

    if let Some((from, to)) = progress.upgrade_offer() {
        println!();
        println!("Level {from} is complete. Move up to level {to} with:");
        println!("  corrente donations accept-upgrade --from {from} --to {to}");
    }
    Ok(())
}

pub async fn accept_upgrade(config: &Config, from_level: u32, to_level: u32) -> Result<()> {
    let session = signed_in(config)?;
    let message = donations::accept_upgrade(session.client(), from_level, to_level).await?;
    print_message(message, &format!("Upgrade to level {to_level} accepted"));
    Ok(())
}

pub async fn upload_proof(config: &Config, donation_id: &str, file: &str) -> Result<()> {
    let session = signed_in(config)?;
    let mut flow = UploadFlow::new(donation_id);

    flow.update(UploadEvent::Select(files::image_data_url(file)?));
    let Some(UploadEffect::Upload {
        donation_id,
        data_url,
    }) = flow.update(UploadEvent::Submit)
    else {
        bail!("{}", flow.error().unwrap_or("Nothing to upload"));
    };

    match donations::upload_comprovante(session.client(), &donation_id, &data_url).await {
        Ok(message) => {
            flow.update(UploadEvent::Succeeded);
            print_message(message, "Payment proof uploaded");
            Ok(())
        }
        Err(e) => {
            flow.update(UploadEvent::Failed(e.to_string()));
            bail!("{}", flow.error().unwrap_or("Upload failed"));
        }
    }
}

pub async fn proof(config: &Config, donation_id: &str) -> Result<()> {
    let session = signed_in(config)?;
    let proof = donations::comprovante(session.client(), donation_id).await?;
    print_proof(&proof);
    Ok(())
}

fn print_proof(proof: &Comprovante) {
    let (kind, size) = describe_data_url(&proof.comprovante);
    let mut table = output::table(&["Field", "Value"]);
    table.add_row(vec!["Donation".to_string(), proof.donation_id.clone()]);
    table.add_row(vec!["Type".to_string(), kind]);
    table.add_row(vec!["Size".to_string(), size]);
    table.add_row(vec![
        "Uploaded".to_string(),
        output::date(proof.uploaded_at.as_ref()),
    ]);
    println!("{table}");
}

/// MIME type and approximate decoded size of a `data:` URL, or the raw
/// value when the server returned a plain URL.
fn describe_data_url(value: &str) -> (String, String) {
    match value
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((mime, payload)) => {
            let bytes = payload.len() / 4 * 3;
            (mime.to_string(), format!("{} KB", bytes.div_ceil(1024)))
        }
        None => ("link".to_string(), value.to_string()),
    }
}

/// Shows the proof, then lets the receiver confirm the payment or report it.
pub async fn review(config: &Config, donation_id: &str) -> Result<()> {
    let session = signed_in(config)?;
    let proof = donations::comprovante(session.client(), donation_id).await?;
    print_proof(&proof);

    let mut flow = ReviewFlow::new(donation_id);
    while !flow.is_done() {
        if let Some(error) = flow.error() {
            eprintln!("✗ {error}");
        }
        let choice = prompt::line("[c]onfirm payment, [r]eport a problem, [q]uit")?;
        let effect = match choice.to_ascii_lowercase().as_str() {
            "c" | "confirm" => flow.update(ReviewEvent::Confirm),
            "r" | "report" => {
                flow.update(ReviewEvent::OpenReport);
                flow.update(ReviewEvent::EditReason(prompt::line("Reason")?));
                flow.update(ReviewEvent::EditDescription(prompt::line(
                    "Details (optional)",
                )?));
                match flow.update(ReviewEvent::SubmitReport) {
                    Some(effect) => Some(effect),
                    None => {
                        if let Some(error) = flow.error() {
                            eprintln!("✗ {error}");
                        }
                        flow.update(ReviewEvent::CancelReport);
                        continue;
                    }
                }
            }
            "q" | "quit" | "" => return Ok(()),
            _ => continue,
        };
        if let Some(effect) = effect {
            run_review_effect(&session, &mut flow, effect).await;
        }
        // a failed report returns to the form; go back to the menu instead
        if matches!(flow.state(), ReviewState::Reporting { .. }) {
            if let Some(error) = flow.error() {
                eprintln!("✗ {error}");
            }
            flow.update(ReviewEvent::CancelReport);
        }
    }
    Ok(())
}

pub async fn confirm(config: &Config, donation_id: &str) -> Result<()> {
    let session = signed_in(config)?;
    let mut flow = ReviewFlow::new(donation_id);
    if let Some(effect) = flow.update(ReviewEvent::Confirm) {
        run_review_effect(&session, &mut flow, effect).await;
    }
    finish(&flow)
}

pub async fn report(
    config: &Config,
    donation_id: &str,
    reason: &str,
    description: &str,
) -> Result<()> {
    let session = signed_in(config)?;
    let mut flow = ReviewFlow::new(donation_id);
    flow.update(ReviewEvent::OpenReport);
    flow.update(ReviewEvent::EditReason(reason.to_string()));
    flow.update(ReviewEvent::EditDescription(description.to_string()));
    if let Some(effect) = flow.update(ReviewEvent::SubmitReport) {
        run_review_effect(&session, &mut flow, effect).await;
    }
    finish(&flow)
}

pub async fn my_reports(config: &Config, list: &ListOptions) -> Result<()> {
    let session = signed_in(config)?;
    let items = reports::mine(session.client())
        .await
        .context(LIST_RETRY)?;
    let view = list.view(items, config);
    output::print_view(
        &view,
        &["ID", "Donation", "Reason", "Status", "Resolution", "Created"],
        |r: &Report| {
            vec![
                r.id.clone(),
                r.donation_id.clone(),
                r.reason.clone(),
                r.status.as_str().to_string(),
                output::or_dash(r.resolution.as_deref().unwrap_or_default()),
                output::date(r.created_at.as_ref()),
            ]
        },
    );
    Ok(())
}

fn finish(flow: &ReviewFlow) -> Result<()> {
    match flow.error() {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

async fn run_review_effect(session: &super::Session, flow: &mut ReviewFlow, effect: ReviewEffect) {
    match effect {
        ReviewEffect::Confirm { donation_id } => {
            match donations::confirm(session.client(), &donation_id).await {
                Ok(message) => {
                    flow.update(ReviewEvent::ConfirmSucceeded);
                    print_message(message, "Payment confirmed");
                }
                Err(e) => {
                    flow.update(ReviewEvent::ConfirmFailed(e.to_string()));
                }
            }
        }
        ReviewEffect::SubmitReport(report) => {
            match reports::create(session.client(), &report).await {
                Ok(created) => {
                    flow.update(ReviewEvent::ReportSucceeded);
                    println!("✓ Report {} submitted", created.id);
                }
                Err(e) => {
                    flow.update(ReviewEvent::ReportFailed(e.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_data_url() {
        let (kind, size) = describe_data_url("data:image/png;base64,AAAA");
        assert_eq!(kind, "image/png");
        assert_eq!(size, "1 KB");

        let (kind, value) = describe_data_url("https://cdn.example.com/p.png");
        assert_eq!(kind, "link");
        assert_eq!(value, "https://cdn.example.com/p.png");
    }
}
