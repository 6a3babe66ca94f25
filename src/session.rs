//! In-flight run registry.
//!
//! `SessionStore` is an explicit, cheaply clonable handle over a concurrent
//! map of runs. A `SessionSink` keeps one run's state in step with the
//! orchestrator's progress events.

use crate::dimensions::AgentKind;
use crate::models::AssessmentResult;
use crate::progress::{Phase, ProgressEvent, ProgressSink};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Share of progress reserved for per-dimension analysis.
const DIMENSION_PROGRESS_START: f64 = 10.0;
const DIMENSION_PROGRESS_SPAN: f64 = 50.0;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Created,
    Analyzing,
    Completed,
}

/// What one agent is doing within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub active: bool,
    pub tasks_completed: usize,
}

/// State of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub id: Uuid,
    pub organization: String,
    pub created_at: DateTime<Utc>,
    pub phase: SessionPhase,
    /// Orchestrator phase in progress, if any.
    pub current_phase: Option<Phase>,
    pub completion_percentage: f64,
    pub agents: BTreeMap<AgentKind, AgentStatus>,
    pub insights_generated: usize,
    pub result: Option<AssessmentResult>,
    /// Dimensions started but not completed, with their primary agent.
    #[serde(skip)]
    in_flight: BTreeMap<String, AgentKind>,
    #[serde(skip)]
    dimensions_started: usize,
    #[serde(skip)]
    dimensions_completed: usize,
}

impl RunState {
    fn new(organization: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization: organization.to_string(),
            created_at: Utc::now(),
            phase: SessionPhase::Created,
            current_phase: None,
            completion_percentage: 0.0,
            agents: AgentKind::ALL
                .iter()
                .map(|kind| (*kind, AgentStatus::default()))
                .collect(),
            insights_generated: 0,
            result: None,
            in_flight: BTreeMap::new(),
            dimensions_started: 0,
            dimensions_completed: 0,
        }
    }

    /// Fold a progress event into the state.
    pub fn apply(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::DimensionStarted { dimension, agent } => {
                self.phase = SessionPhase::Analyzing;
                self.dimensions_started += 1;
                self.in_flight.insert(dimension.clone(), *agent);
                self.agents.entry(*agent).or_default().active = true;
                self.refresh_dimension_progress();
            }
            ProgressEvent::DimensionCompleted { dimension, .. } => {
                self.dimensions_completed += 1;
                if let Some(agent) = self.in_flight.remove(dimension) {
                    let still_busy = self.in_flight.values().any(|a| *a == agent);
                    let status = self.agents.entry(agent).or_default();
                    status.tasks_completed += 1;
                    status.active = still_busy;
                }
                self.refresh_dimension_progress();
            }
            ProgressEvent::PhaseStarted { phase } => {
                self.phase = SessionPhase::Analyzing;
                self.current_phase = Some(*phase);
                if let Some(percentage) = phase_progress(*phase) {
                    self.completion_percentage = percentage;
                }
            }
            ProgressEvent::PhaseCompleted { .. } | ProgressEvent::AgentFailed { .. } => {}
            ProgressEvent::RunCompleted { .. } => {
                self.current_phase = None;
                self.completion_percentage = 100.0;
            }
        }
    }

    fn refresh_dimension_progress(&mut self) {
        if self.dimensions_started == 0 {
            return;
        }
        let done = self.dimensions_completed as f64 / self.dimensions_started as f64;
        self.completion_percentage = DIMENSION_PROGRESS_START + DIMENSION_PROGRESS_SPAN * done;
    }
}

/// Progress at the start of each aggregation phase.
fn phase_progress(phase: Phase) -> Option<f64> {
    match phase {
        Phase::DimensionAnalysis => Some(DIMENSION_PROGRESS_START),
        Phase::PatternRecognition => Some(70.0),
        Phase::InsightGeneration => Some(78.0),
        Phase::StrategicPlanning => Some(85.0),
        Phase::RoiProjection => Some(90.0),
        Phase::WorkshopPlanning => Some(95.0),
    }
}

/// Activity of one agent across all sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub active_sessions: usize,
    pub tasks_completed: usize,
}

/// Concurrent registry of runs.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, RunState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new run and return its id.
    pub fn create(&self, organization: &str) -> Uuid {
        let state = RunState::new(organization);
        let id = state.id;
        self.sessions.insert(id, state);
        debug!(session = %id, "Session created");
        id
    }

    /// Snapshot of a run.
    pub fn get(&self, id: &Uuid) -> Option<RunState> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Mutate a run in place. Returns false when the id is unknown.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut RunState)) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                f(entry.value_mut());
                true
            }
            None => false,
        }
    }

    /// Store the final result and mark the run completed.
    pub fn complete(&self, id: &Uuid, result: AssessmentResult) -> bool {
        self.update(id, |state| {
            state.phase = SessionPhase::Completed;
            state.current_phase = None;
            state.completion_percentage = 100.0;
            state.insights_generated = result.insights.len();
            for status in state.agents.values_mut() {
                status.active = false;
            }
            state.result = Some(result);
        })
    }

    pub fn remove(&self, id: &Uuid) -> Option<RunState> {
        self.sessions.remove(id).map(|(_, state)| state)
    }

    /// Drop runs created more than `ttl` ago. Returns how many were dropped.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, state| state.created_at > cutoff);
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Agent activity aggregated over every session.
    pub fn agent_stats(&self) -> BTreeMap<AgentKind, AgentStats> {
        let mut stats: BTreeMap<AgentKind, AgentStats> = AgentKind::ALL
            .iter()
            .map(|kind| (*kind, AgentStats::default()))
            .collect();

        for entry in self.sessions.iter() {
            for (kind, status) in &entry.value().agents {
                let agent = stats.entry(*kind).or_default();
                if status.active {
                    agent.active_sessions += 1;
                }
                agent.tasks_completed += status.tasks_completed;
            }
        }

        stats
    }

    /// Sink that feeds one run's progress events into this store.
    pub fn sink(&self, id: Uuid) -> SessionSink {
        SessionSink {
            store: self.clone(),
            id,
        }
    }
}

/// Progress sink bound to one session.
#[derive(Debug, Clone)]
pub struct SessionSink {
    store: SessionStore,
    id: Uuid,
}

impl ProgressSink for SessionSink {
    fn emit(&self, event: ProgressEvent) {
        self.store.update(&self.id, |state| state.apply(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRegistry;
    use crate::analysis::AssessmentOrchestrator;
    use crate::dimensions::DimensionRegistry;
    use crate::intake::demo_responses;

    #[test]
    fn test_create_get_remove() {
        let store = SessionStore::new();
        let id = store.create("Acme");

        let state = store.get(&id).unwrap();
        assert_eq!(state.organization, "Acme");
        assert_eq!(state.phase, SessionPhase::Created);
        assert_eq!(state.agents.len(), 3);
        assert_eq!(store.len(), 1);

        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
        assert!(!store.update(&id, |_| {}));
    }

    #[test]
    fn test_dimension_progress() {
        let store = SessionStore::new();
        let id = store.create("Acme");
        let sink = store.sink(id);

        sink.emit(ProgressEvent::DimensionStarted {
            dimension: "leadership".to_string(),
            agent: AgentKind::StrategySpecialist,
        });
        sink.emit(ProgressEvent::DimensionStarted {
            dimension: "innovation".to_string(),
            agent: AgentKind::StrategySpecialist,
        });
        sink.emit(ProgressEvent::DimensionCompleted {
            dimension: "leadership".to_string(),
            score: 35.0,
            degraded: false,
        });

        let state = store.get(&id).unwrap();
        assert_eq!(state.phase, SessionPhase::Analyzing);
        assert_eq!(state.completion_percentage, 35.0);
        let strategy = &state.agents[&AgentKind::StrategySpecialist];
        assert!(strategy.active);
        assert_eq!(strategy.tasks_completed, 1);

        let stats = store.agent_stats();
        assert_eq!(stats[&AgentKind::StrategySpecialist].active_sessions, 1);
        assert_eq!(stats[&AgentKind::CultureSpecialist], AgentStats::default());
    }

    #[test]
    fn test_purge_expired() {
        let store = SessionStore::new();
        let old = store.create("Old Co");
        let fresh = store.create("New Co");
        store.update(&old, |state| state.created_at = Utc::now() - Duration::hours(3));

        assert_eq!(store.purge_expired(Duration::hours(1)), 1);
        assert!(store.get(&old).is_none());
        assert!(store.get(&fresh).is_some());
    }

    #[test]
    fn test_session_tracks_a_full_run() {
        let store = SessionStore::new();
        let id = store.create("Acme");
        let orchestrator =
            AssessmentOrchestrator::new(DimensionRegistry::standard(), AgentRegistry::heuristic())
                .with_sink(Arc::new(store.sink(id)));

        let result = tokio_test::block_on(orchestrator.run(&demo_responses())).unwrap();
        let state = store.get(&id).unwrap();
        assert_eq!(state.completion_percentage, 100.0);
        assert_eq!(state.phase, SessionPhase::Analyzing);
        let tasks: usize = state.agents.values().map(|s| s.tasks_completed).sum();
        assert_eq!(tasks, 3);

        assert!(store.complete(&id, result));
        let state = store.get(&id).unwrap();
        assert_eq!(state.phase, SessionPhase::Completed);
        assert_eq!(state.insights_generated, 3);
        assert!(state.agents.values().all(|s| !s.active));
        assert!(state.result.is_some());
    }
}
