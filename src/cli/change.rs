//! Detail page commands: diff, classification, evaluation and links.

use std::path::Path;

use anyhow::Context;
use console::style;

use attack_tracker::detail::{
    ChangeContext, ClassificationEditor, DimensionPanels, EvaluationEditor,
};
use attack_tracker::diff::{count_changed_words, diff_words, extract_blocks, DiffViewer, DiffView, SpanKind};
use attack_tracker::navigation::{NavControl, NavigationLinks};
use attack_tracker::overview::stored_filter;
use attack_tracker::{AnnotationKind, ClassificationTarget, CriticalitySums, Dimension};

use super::{print_notice, App, ChangeArgs};

fn context(change: &ChangeArgs) -> ChangeContext {
    ChangeContext::new(change.pair.pair(), change.id())
}

pub async fn cmd_diff(old: &Path, new: &Path, html: bool) -> anyhow::Result<()> {
    let old_html = tokio::fs::read_to_string(old)
        .await
        .with_context(|| format!("Failed to read {}", old.display()))?;
    let new_html = tokio::fs::read_to_string(new)
        .await
        .with_context(|| format!("Failed to read {}", new.display()))?;

    let mut viewer = DiffViewer::new(old_html.as_str(), new_html.as_str());
    if viewer.is_unchanged() {
        println!("{}", style("Descriptions are identical.").dim());
        return Ok(());
    }

    if html {
        if let DiffView::Annotated { diff, .. } = viewer.toggle() {
            println!("{}", diff.to_html());
        }
        return Ok(());
    }

    let old_blocks = extract_blocks(&old_html);
    let new_blocks = extract_blocks(&new_html);
    for (idx, block) in new_blocks.iter().enumerate() {
        let old_text = old_blocks.get(idx).map(|b| b.text.as_str()).unwrap_or("");
        let line: String = diff_words(old_text, &block.text)
            .iter()
            .map(|span| match span.kind {
                SpanKind::Equal => span.value.clone(),
                SpanKind::Added => style(&span.value).green().underlined().to_string(),
                SpanKind::Removed => style(&span.value).red().strikethrough().to_string(),
            })
            .collect();
        let bullet = if block.tag == "li" { "  • " } else { "" };
        println!("{}{}\n", bullet, line);
    }
    for block in old_blocks.iter().skip(new_blocks.len()) {
        println!("{}\n", style(&block.text).red().strikethrough());
    }

    let (added, removed) = count_changed_words(&old_blocks, &new_blocks);
    println!(
        "{} words added, {} words removed",
        style(added).green().bold(),
        style(removed).red().bold()
    );
    Ok(())
}

fn print_panels(sums: CriticalitySums, panels: &DimensionPanels) {
    for panel in panels.iter() {
        let dimension = panel.dimension();
        let state = if panel.is_enabled() {
            style("enabled").green()
        } else {
            style("disabled").dim()
        };
        println!(
            "  {:<8} sum {:>3}  {}  evaluation: {}",
            dimension.as_str(),
            sums.get(dimension),
            state,
            panel.evaluation_status()
        );
    }
}

pub async fn cmd_classify(
    app: &App,
    change: &ChangeArgs,
    target: ClassificationTarget,
    value: i64,
    eval_status: &str,
) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let context = context(change);

    // Current sums are unknown locally; start with every dimension enabled
    let start = CriticalitySums {
        client: 1,
        infra: 1,
        service: 1,
    };
    let mut editor = ClassificationEditor::new(
        start,
        DimensionPanels::new([eval_status, eval_status, eval_status], start),
    );

    editor
        .change(&backend, &context, target, value)
        .await
        .with_context(|| format!("Failed to set {} for {}", target, context.id))?;

    println!("{} {} = {} for {}", style("✓").green(), target, value, context.id);
    print_panels(editor.sums(), editor.panels());
    Ok(())
}

pub async fn cmd_evaluate(
    app: &App,
    change: &ChangeArgs,
    dimension: Dimension,
    status: &str,
) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let context = context(change);
    let enabled = CriticalitySums {
        client: 1,
        infra: 1,
        service: 1,
    };
    let mut panels = DimensionPanels::new([status, status, status], enabled);

    EvaluationEditor::new()
        .set_status(&backend, &context, &mut panels, dimension, status, std::time::Instant::now())
        .await
        .with_context(|| format!("Failed to set {} evaluation for {}", dimension, context.id))?;

    println!("{} {} evaluation of {} is now {}", style("✓").green(), dimension, context.id, status);
    Ok(())
}

pub async fn cmd_annotate(
    app: &App,
    change: &ChangeArgs,
    dimension: Dimension,
    kind: AnnotationKind,
    text: &str,
) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let context = context(change);
    let enabled = CriticalitySums {
        client: 1,
        infra: 1,
        service: 1,
    };
    let panels = DimensionPanels::new(["", "", ""], enabled);

    let notice = EvaluationEditor::new()
        .submit(
            &backend,
            &context,
            &panels,
            dimension,
            kind,
            text,
            std::time::Instant::now(),
        )
        .await
        .with_context(|| format!("Failed to save {} for {}", kind.control_id(dimension), context.id))?;

    print_notice(&notice);
    Ok(())
}

pub async fn cmd_links(app: &App, change: &ChangeArgs, category: Option<&str>) -> anyhow::Result<()> {
    let backend = app.backend()?;
    let context = context(change);
    let filter = stored_filter(app.store(), &context.pair)?;

    let links = NavigationLinks::fetch(&backend, &context, filter, category)
        .await
        .context("Failed to look up links")?;

    println!("Filter: {}", style(filter).bold());
    for (label, control) in [("previous", &links.prev), ("next", &links.next)] {
        match control {
            NavControl::Enabled(url) => println!("  {:<9} {}", label, style(url).cyan()),
            NavControl::Disabled => println!("  {:<9} {}", label, style("(none)").dim()),
        }
    }
    Ok(())
}
