//! Overview commands: status, filter, import and export.

use std::path::Path;

use anyhow::Context;
use console::style;

use attack_tracker::overview::{stored_filter, FilterManager, ProgressTracker, StatusTracker};
use attack_tracker::transfer::{TransferController, TransferError};
use attack_tracker::{ChangeRow, CompletionStatus, StatusFilter};

use super::{print_notice, App, ChangeArgs, PairArgs};

pub async fn cmd_status(
    app: &App,
    change: &ChangeArgs,
    status: CompletionStatus,
    category: Option<String>,
) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let id = change.id();

    // The previous status is not known here; the row only carries what the request needs
    let mut row = ChangeRow::new(id.clone(), "", CompletionStatus::NotDone);
    row.category = category;
    let mut tracker = StatusTracker::new(change.pair.pair(), vec![row]);

    let icon = tracker
        .change_status(&backend, &id, status)
        .await
        .with_context(|| format!("Failed to update status of {}", id))?;

    println!("{} {} is now {} [{}]", style("✓").green(), id, style(status).bold(), icon.classes());
    Ok(())
}

pub fn cmd_filter(app: &App, pair: &PairArgs, value: Option<StatusFilter>) -> anyhow::Result<()> {
    let pair = pair.pair();
    match value {
        Some(filter) => {
            let mut manager = FilterManager::new(pair.clone());
            manager.select(app.store(), &ProgressTracker::default(), filter)?;
            println!("Filter for {} set to {}", pair, style(filter).bold());
        }
        None => {
            let filter = stored_filter(app.store(), &pair)?;
            println!("Filter for {}: {}", pair, style(filter).bold());
        }
    }
    Ok(())
}

pub async fn cmd_import(app: &App, pair: &PairArgs, file: Option<&Path>) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let mut transfer = TransferController::new(pair.pair());

    match transfer.import_path(&backend, file).await {
        Ok(notice) => {
            print_notice(&notice);
            Ok(())
        }
        Err(TransferError::Api(e)) => {
            println!("{} {}", style("✗").red(), e.user_message());
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_export(app: &App, pair: &PairArgs) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let mut transfer = TransferController::new(pair.pair());

    let notice = transfer.export(&backend).await.context("Export failed")?;
    print_notice(&notice);
    Ok(())
}
