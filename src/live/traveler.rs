use crate::foundation::error::{CourseError, CourseResult};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Progress of one traveler through the race.
pub enum TravelerStatus {
    /// Registered but not yet moving; waits at the start line.
    #[default]
    #[serde(alias = "ready", alias = "registered")]
    NotStarted,
    /// On the course.
    #[serde(alias = "playing", alias = "running")]
    InProgress,
    /// Reached a terminal.
    Finished,
    /// Gave up; parked at the last known node.
    #[serde(alias = "dnf")]
    Abandoned,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Lifecycle of the race as a whole.
pub enum RaceStatus {
    /// Accepting participants.
    #[default]
    #[serde(alias = "draft", alias = "open")]
    Setup,
    /// Underway.
    #[serde(alias = "in_progress")]
    Running,
    /// Over.
    Finished,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// One entry of a traveler's visit history.
pub struct VisitEntry {
    /// Node entered.
    pub node_id: String,
    /// Race clock when the node was entered.
    #[serde(alias = "igt_ms")]
    pub elapsed_ms: u64,
    /// Death counter when the node was entered.
    pub deaths: u32,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// A live race participant.
pub struct Traveler {
    /// Stable participant id.
    pub id: String,
    /// Name shown on the map.
    pub display_name: String,
    /// Index into the traveler palette.
    pub color_index: u32,
    /// Race progress.
    pub status: TravelerStatus,
    /// Node the traveler is in right now.
    #[serde(alias = "current_zone")]
    pub current_node: Option<String>,
    /// Layer of `current_node`, as reported.
    pub current_layer: u32,
    /// Race clock.
    #[serde(alias = "igt_ms")]
    pub elapsed_ms: u64,
    /// Total deaths so far.
    #[serde(alias = "death_count")]
    pub deaths: u32,
    /// Visits in order, possibly skipping intermediate nodes.
    #[serde(alias = "zone_history")]
    pub history: Vec<VisitEntry>,
}

impl Traveler {
    /// Traveler named after its id, with no history.
    pub fn new(id: impl Into<String>, color_index: u32) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            color_index,
            ..Self::default()
        }
    }

    /// Builder-style status setter.
    pub fn with_status(mut self, status: TravelerStatus) -> Self {
        self.status = status;
        self
    }

    /// Append visits to `nodes` and move the traveler onto the last one.
    pub fn visiting<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in nodes {
            let node_id = id.into();
            self.history.push(VisitEntry {
                node_id: node_id.clone(),
                elapsed_ms: self.elapsed_ms,
                deaths: self.deaths,
            });
            self.current_node = Some(node_id);
        }
        self
    }

    /// Visited node ids in order; the current node is appended when it is not the last visit.
    pub fn visit_ids(&self) -> Vec<String> {
        let mut out = self
            .history
            .iter()
            .map(|v| v.node_id.clone())
            .collect::<Vec<_>>();
        if let Some(cur) = &self.current_node
            && out.last() != Some(cur)
        {
            out.push(cur.clone());
        }
        out
    }

    /// Last known node: the current node, falling back to the final history entry.
    pub fn last_node(&self) -> Option<&str> {
        self.current_node
            .as_deref()
            .or_else(|| self.history.last().map(|v| v.node_id.as_str()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// The latest state of a race as pushed by the race service.
pub struct LiveSnapshot {
    /// Race lifecycle.
    #[serde(alias = "status")]
    pub race_status: RaceStatus,
    /// Every participant, in display order.
    #[serde(alias = "participants")]
    pub travelers: Vec<Traveler>,
}

impl LiveSnapshot {
    /// Parse one snapshot document.
    pub fn from_json_str(s: &str) -> CourseResult<Self> {
        serde_json::from_str(s).map_err(|e| CourseError::serde(e.to_string()))
    }

    /// Traveler by id.
    pub fn traveler(&self, id: &str) -> Option<&Traveler> {
        self.travelers.iter().find(|t| t.id == id)
    }
}

/// Parse a JSON-lines stream of snapshots. Blank and unparsable lines are skipped.
pub fn parse_snapshot_lines(text: &str) -> Vec<LiveSnapshot> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(n, line)| match LiveSnapshot::from_json_str(line) {
            Ok(snap) => Some(snap),
            Err(err) => {
                tracing::debug!(line = n + 1, %err, "skipping unparsable snapshot");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/live/traveler.rs"]
mod tests;
