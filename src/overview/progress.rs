//! Completion percentages over the maintained row collection.

use std::collections::HashMap;

use crate::models::{ChangeId, ChangeRow, CompletionStatus, NOT_APPLICABLE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    done: usize,
    total: usize,
}

impl Tally {
    fn percentage(&self) -> Option<f64> {
        percentage(self.done, self.total)
    }
}

/// `done / total * 100` rounded to two decimals; `None` when there is nothing to count.
pub fn percentage(done: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let raw = done as f64 / total as f64 * 100.0;
    Some((raw * 100.0).round() / 100.0)
}

/// Two-decimal rendering, `n.a.` for an undefined percentage.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}%", value),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Every row of the overview, hidden or not, with running done/total counts.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    rows: Vec<ChangeRow>,
    index: HashMap<ChangeId, usize>,
    overall: Tally,
    categories: HashMap<String, Tally>,
}

impl ProgressTracker {
    pub fn new(rows: Vec<ChangeRow>) -> Self {
        let mut tracker = Self::default();
        for row in rows {
            tracker.insert(row);
        }
        tracker
    }

    fn insert(&mut self, row: ChangeRow) {
        let done = usize::from(row.status == CompletionStatus::Done);
        self.overall.total += 1;
        self.overall.done += done;
        let tally = self.categories.entry(row.change_category.clone()).or_default();
        tally.total += 1;
        tally.done += done;

        // A repeated id replaces the earlier row.
        if let Some(&idx) = self.index.get(&row.id) {
            let old = std::mem::replace(&mut self.rows[idx], row);
            self.forget(&old);
        } else {
            self.index.insert(row.id.clone(), self.rows.len());
            self.rows.push(row);
        }
    }

    fn forget(&mut self, row: &ChangeRow) {
        let done = usize::from(row.status == CompletionStatus::Done);
        self.overall.total -= 1;
        self.overall.done -= done;
        if let Some(tally) = self.categories.get_mut(&row.change_category) {
            tally.total -= 1;
            tally.done -= done;
        }
    }

    pub fn rows(&self) -> &[ChangeRow] {
        &self.rows
    }

    pub fn row(&self, id: &ChangeId) -> Option<&ChangeRow> {
        self.index.get(id).map(|&idx| &self.rows[idx])
    }

    /// Record a new status; returns the previous one, or `None` for an unknown id.
    pub fn set_status(&mut self, id: &ChangeId, status: CompletionStatus) -> Option<CompletionStatus> {
        let idx = *self.index.get(id)?;
        let row = &mut self.rows[idx];
        let previous = row.status;
        row.status = status;
        let change_category = row.change_category.clone();

        let delta_done = |tally: &mut Tally| match (previous, status) {
            (CompletionStatus::Done, s) if s != CompletionStatus::Done => tally.done -= 1,
            (p, CompletionStatus::Done) if p != CompletionStatus::Done => tally.done += 1,
            _ => {}
        };
        delta_done(&mut self.overall);
        if let Some(tally) = self.categories.get_mut(&change_category) {
            delta_done(tally);
        }
        Some(previous)
    }

    pub fn overall(&self) -> Option<f64> {
        self.overall.percentage()
    }

    pub fn category(&self, change_category: &str) -> Option<f64> {
        self.categories
            .get(change_category)
            .copied()
            .unwrap_or_default()
            .percentage()
    }

    /// Heading text above the overview.
    pub fn total_text(&self) -> String {
        format!("Total: {}", format_percentage(self.overall()))
    }

    /// Heading text of a category section.
    pub fn category_text(&self, change_category: &str) -> String {
        format!("Status: {}", format_percentage(self.category(change_category)))
    }
}
