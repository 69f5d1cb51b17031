//! Homepage commands: theme preference and upgrade launch.

use anyhow::Context;
use console::style;

use attack_tracker::theme::ThemeToggle;
use attack_tracker::upgrade::UpgradeLauncher;
use attack_tracker::Theme;

use super::{print_notice, App};

pub fn cmd_theme(app: &App, toggle: bool) -> anyhow::Result<()> {
    let mut theme = ThemeToggle::load(app.store(), Theme::default())?;
    if toggle {
        theme.toggle(app.store())?;
    }
    println!("Theme: {}", style(theme.current().as_str()).bold());
    Ok(())
}

pub async fn cmd_upgrade(
    app: &App,
    versions: Vec<String>,
    selected: &str,
    confirm: bool,
) -> anyhow::Result<()> {
    let mut launcher = UpgradeLauncher::new(versions);
    println!("{}", launcher.hint(selected)?);

    if !confirm {
        println!("{}", style("Re-run with --confirm to start the upgrade.").dim());
        return Ok(());
    }

    let backend = app.backend()?;
    let notice = launcher
        .initiate(&backend, selected)
        .await
        .with_context(|| format!("Failed to start upgrade from {}", selected))?;
    print_notice(&notice);
    for link in launcher.upgrades() {
        println!("  {} {}", link.text, style(&link.href).cyan());
    }
    Ok(())
}
