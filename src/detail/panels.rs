//! Per-dimension evaluation panels and their enablement cascade.

use crate::models::{CriticalitySums, Dimension, NOT_APPLICABLE};

/// Enabled/disabled state of one dependent control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub id: String,
    pub disabled: bool,
}

/// Evaluation controls of one dimension: status selector, reasoning and measures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionPanel {
    dimension: Dimension,
    enabled: bool,
    shown_status: String,
    /// Last status the user chose, restored when the panel is re-enabled.
    cached_status: String,
}

impl DimensionPanel {
    pub fn new(dimension: Dimension, status: &str, sum: i64) -> Self {
        let enabled = sum > 0;
        Self {
            dimension,
            enabled,
            shown_status: if enabled {
                status.to_string()
            } else {
                NOT_APPLICABLE.to_string()
            },
            cached_status: status.to_string(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Value the status selector currently shows.
    pub fn evaluation_status(&self) -> &str {
        &self.shown_status
    }

    pub fn cached_status(&self) -> &str {
        &self.cached_status
    }

    /// The user picked a status in the selector.
    pub fn select_status(&mut self, value: &str) {
        self.cached_status = value.to_string();
        self.shown_status = value.to_string();
    }

    /// React to a new aggregate sum for this dimension.
    ///
    /// Returns true when the enablement changed.
    pub fn apply_sum(&mut self, sum: i64) -> bool {
        match (sum > 0, self.enabled) {
            (false, true) => {
                if self.shown_status != NOT_APPLICABLE {
                    self.cached_status = self.shown_status.clone();
                }
                self.shown_status = NOT_APPLICABLE.to_string();
                self.enabled = false;
                true
            }
            (true, false) => {
                self.shown_status = self.cached_status.clone();
                self.enabled = true;
                true
            }
            (false, false) => {
                self.shown_status = NOT_APPLICABLE.to_string();
                false
            }
            (true, true) => false,
        }
    }

    /// The five controls gated by this panel's enablement.
    pub fn controls(&self) -> Vec<ControlState> {
        let dim = self.dimension.as_str();
        [
            format!("{}-reasoning", dim),
            format!("{}-reasoning-btn", dim),
            format!("{}-measures", dim),
            format!("{}-measures-btn", dim),
            format!("{}-status", dim),
        ]
        .into_iter()
        .map(|id| ControlState {
            id,
            disabled: !self.enabled,
        })
        .collect()
    }
}

/// The three panels of a change, one per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionPanels {
    client: DimensionPanel,
    infra: DimensionPanel,
    service: DimensionPanel,
}

impl DimensionPanels {
    /// Build from the statuses and sums the page was rendered with.
    pub fn new(statuses: [&str; 3], sums: CriticalitySums) -> Self {
        Self {
            client: DimensionPanel::new(Dimension::Client, statuses[0], sums.client),
            infra: DimensionPanel::new(Dimension::Infra, statuses[1], sums.infra),
            service: DimensionPanel::new(Dimension::Service, statuses[2], sums.service),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &DimensionPanel {
        match dimension {
            Dimension::Client => &self.client,
            Dimension::Infra => &self.infra,
            Dimension::Service => &self.service,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut DimensionPanel {
        match dimension {
            Dimension::Client => &mut self.client,
            Dimension::Infra => &mut self.infra,
            Dimension::Service => &mut self.service,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimensionPanel> {
        [&self.client, &self.infra, &self.service].into_iter()
    }

    /// Apply fresh server sums to every panel; returns the dimensions whose enablement flipped.
    pub fn apply_sums(&mut self, sums: CriticalitySums) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|dim| self.get_mut(*dim).apply_sum(sums.get(*dim)))
            .collect()
    }
}
