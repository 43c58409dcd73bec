use serde::{Deserialize, Serialize};

use crate::api::cartesian_plane::PlaneFrame;
use crate::core::{ChartData, ChartKind, EdgeInsets, Rect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::layout::Label;

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub viewport: Viewport,
    pub kind: ChartKind,
    pub entry_count: usize,
    pub number_of_values: usize,
    /// `None` when the pass drew the no-data placeholder.
    pub value_range: Option<(f64, f64)>,
    pub margins: Option<EdgeInsets>,
    pub chart_rect: Option<Rect>,
    pub data_region: Option<Rect>,
    pub labels: Vec<Label>,
    pub average: Option<f64>,
    pub bar_cells: Vec<Rect>,
    pub highlighted_index: Option<usize>,
    pub initial_animation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    #[must_use]
    pub(crate) fn from_pass(
        viewport: Viewport,
        kind: ChartKind,
        data: &ChartData,
        plane: &PlaneFrame,
        bar_cells: Vec<Rect>,
        highlighted_index: Option<usize>,
        initial_animation: bool,
    ) -> Self {
        let layout = plane.layout.as_ref();
        Self {
            viewport,
            kind,
            entry_count: data.entries.len(),
            number_of_values: data.number_of_values(),
            value_range: layout.map(|layout| layout.scale.domain()),
            margins: layout.map(|layout| layout.margins),
            chart_rect: layout.map(|layout| layout.chart_rect()),
            data_region: plane.data_region(),
            labels: plane.labels.iter().cloned().collect(),
            average: layout
                .and_then(|layout| layout.average_badge.as_ref())
                .map(|badge| badge.average),
            bar_cells,
            highlighted_index,
            initial_animation,
        }
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts both a bare snapshot and a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
