//! Wave and group definitions supplied by the UI layer.
//!
//! These are plain data snapshots. The engine never mutates them; it only
//! reads a resolved set per invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveError {
    #[error("wave `{id}` has non-positive period {period}")]
    NonPositivePeriod { id: String, period: f64 },
    #[error("wave `{id}` has a non-finite period")]
    NonFinitePeriod { id: String },
    #[error("wave `{id}` has a non-finite phase origin")]
    NonFiniteOrigin { id: String },
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wave {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Period in days.
    pub period: f64,
    /// Presentation only.
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub group_ids: Vec<String>,
    /// Phase origin overriding the shared epoch (ms since the Unix epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<f64>,
}

impl Wave {
    pub fn new(id: impl Into<String>, period: f64) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            period,
            color: String::new(),
            visible: true,
            group_ids: Vec::new(),
            origin: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ids.push(group_id.into());
        self
    }

    pub fn with_origin(mut self, origin: f64) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn validate(&self) -> Result<(), WaveError> {
        if !self.period.is_finite() {
            return Err(WaveError::NonFinitePeriod {
                id: self.id.clone(),
            });
        }
        if self.period <= 0.0 {
            return Err(WaveError::NonPositivePeriod {
                id: self.id.clone(),
                period: self.period,
            });
        }
        if matches!(self.origin, Some(origin) if !origin.is_finite()) {
            return Err(WaveError::NonFiniteOrigin {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub member_wave_ids: Vec<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            enabled,
            member_wave_ids: Vec::new(),
        }
    }

    pub fn with_member(mut self, wave_id: impl Into<String>) -> Self {
        let wave_id = wave_id.into();
        if !self.member_wave_ids.contains(&wave_id) {
            self.member_wave_ids.push(wave_id);
        }
        self
    }

    /// Membership is recorded on either side: the group lists the wave, or the
    /// wave lists the group.
    pub fn contains(&self, wave: &Wave) -> bool {
        self.member_wave_ids.iter().any(|id| *id == wave.id)
            || wave.group_ids.iter().any(|id| *id == self.id)
    }
}

/// Immutable view of the collaborator's state for one engine call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveSnapshot {
    /// Shared zero-phase instant (ms since the Unix epoch).
    #[serde(default)]
    pub epoch: f64,
    #[serde(default)]
    pub waves: Vec<Wave>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl WaveSnapshot {
    pub fn new(epoch: f64, waves: Vec<Wave>, groups: Vec<Group>) -> Self {
        Self {
            epoch,
            waves,
            groups,
        }
    }
}
