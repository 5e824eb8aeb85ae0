//! Appointment type lookup table and label resolution
//!
//! Appointments store only the type's stable `value` key. Rows can be
//! deleted out from under stored keys, so display resolution runs an
//! ordered chain of strategies and never fails: exact match, legacy
//! alias table, case-insensitive substring against known labels, and
//! finally the raw stored value unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configurable appointment category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: Uuid,
    /// Stable key stored on appointments.
    pub value: String,
    /// Display text.
    pub label: String,
    pub color: String,
    pub icon: String,
}

/// Which stage of the resolution chain produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    Exact,
    Alias,
    Fuzzy,
    Raw,
}

/// A resolved display label together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLabel {
    pub label: String,
    pub via: ResolvedVia,
}

/// Legacy type keys from before types became configurable rows.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("meeting", "Reunião"),
    ("sync", "Alinhamento"),
    ("review", "Revisão"),
    ("oneonone", "1:1"),
    ("training", "Treinamento"),
];

/// Resolve the display label for a stored type value.
pub fn resolve_label(value: &str, known_types: &[AppointmentType]) -> ResolvedLabel {
    if let Some(found) = known_types.iter().find(|t| t.value == value) {
        return ResolvedLabel {
            label: found.label.clone(),
            via: ResolvedVia::Exact,
        };
    }

    if let Some((_, alias)) = LEGACY_ALIASES.iter().find(|(key, _)| *key == value) {
        return ResolvedLabel {
            label: (*alias).to_string(),
            via: ResolvedVia::Alias,
        };
    }

    let needle = value.to_lowercase();
    if !needle.is_empty() {
        if let Some(found) = known_types
            .iter()
            .find(|t| t.label.to_lowercase().contains(&needle))
        {
            return ResolvedLabel {
                label: found.label.clone(),
                via: ResolvedVia::Fuzzy,
            };
        }
    }

    ResolvedLabel {
        label: value.to_string(),
        via: ResolvedVia::Raw,
    }
}

/// Resolve the display color for a stored type value, falling back to a
/// neutral default when the row is gone.
pub fn resolve_color(value: &str, known_types: &[AppointmentType]) -> String {
    known_types
        .iter()
        .find(|t| t.value == value)
        .map(|t| t.color.clone())
        .unwrap_or_else(|| "#64748b".to_string())
}
