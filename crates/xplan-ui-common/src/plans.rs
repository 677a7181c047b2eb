//! Expansion plans and their candidate units.
//!
//! The [`PlanStore`] keeps plans in memory and validates every change
//! synchronously; an invalid change leaves the store untouched. Changes are
//! broadcast as [`PlanEvent`]s.

use std::fmt;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::events::PlanEvent;

/// Unique identifier for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(Uuid);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a candidate unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(Uuid);

impl CandidateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a numeric form field, keeping `previous` when the text is not a number.
pub fn parse_numeric_field(text: &str, previous: f64) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => previous,
    }
}

/// Settings passed to the external solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Maximum build cycles the search may run.
    pub max_build_cycles: u32,
    /// Relative MIP gap, in `[0, 1)`.
    pub mip_gap: f64,
    pub discount_rate: f64,
    pub planning_horizon_years: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_build_cycles: 10,
            mip_gap: 0.01,
            discount_rate: 0.07,
            planning_horizon_years: 20,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_build_cycles == 0 {
            return Err(Error::Validation(
                "at least one build cycle is required".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.mip_gap) {
            return Err(Error::Validation("MIP gap must be in [0, 1)".into()));
        }
        if self.discount_rate < 0.0 {
            return Err(Error::Validation("discount rate cannot be negative".into()));
        }
        if self.planning_horizon_years == 0 {
            return Err(Error::Validation(
                "planning horizon must be at least one year".into(),
            ));
        }
        Ok(())
    }
}

/// Candidate category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    #[default]
    Generation,
    Transmission,
}

/// Input for adding or updating a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub name: String,
    pub kind: CandidateKind,
    pub technology: String,
    pub capacity_mw: f64,
    /// Overnight capital cost in $/MW.
    pub capital_cost: f64,
    pub lifetime_years: u32,
}

impl CandidateDraft {
    pub fn generation(name: impl Into<String>, technology: impl Into<String>, capacity_mw: f64) -> Self {
        Self {
            name: name.into(),
            kind: CandidateKind::Generation,
            technology: technology.into(),
            capacity_mw,
            capital_cost: 0.0,
            lifetime_years: 30,
        }
    }

    pub fn transmission(name: impl Into<String>, capacity_mw: f64) -> Self {
        Self {
            kind: CandidateKind::Transmission,
            ..Self::generation(name, "Transmission", capacity_mw)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("candidate name is required".into()));
        }
        if self.capacity_mw < 0.0 {
            return Err(Error::Validation(format!(
                "capacity cannot be negative ({} MW)",
                self.capacity_mw
            )));
        }
        if self.capital_cost < 0.0 {
            return Err(Error::Validation("capital cost cannot be negative".into()));
        }
        Ok(())
    }
}

/// A candidate unit within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(flatten)]
    pub spec: CandidateDraft,
}

/// An expansion plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: String,
    pub solver: SolverSettings,
    pub candidates: Vec<Candidate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Total candidate capacity in MW.
    pub fn candidate_capacity(&self) -> f64 {
        self.candidates.iter().map(|c| c.spec.capacity_mw).sum()
    }
}

/// In-memory plan storage.
pub struct PlanStore {
    plans: DashMap<PlanId, Plan>,
    events_tx: broadcast::Sender<PlanEvent>,
}

impl PlanStore {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            plans: DashMap::new(),
            events_tx,
        }
    }

    /// Create a plan with default solver settings.
    pub fn create(&self, name: &str, description: &str) -> Result<PlanId> {
        let name = self.validate_name(name, None)?;
        let now = Utc::now();
        let id = PlanId::new();

        self.plans.insert(
            id,
            Plan {
                id,
                name: name.clone(),
                description: description.trim().to_string(),
                solver: SolverSettings::default(),
                candidates: Vec::new(),
                created_at: now,
                updated_at: now,
            },
        );
        debug!("created plan {} ({})", name, id);
        let _ = self.events_tx.send(PlanEvent::Created { id, name });
        Ok(id)
    }

    pub fn get(&self, id: PlanId) -> Result<Plan> {
        self.plans
            .get(&id)
            .map(|p| p.value().clone())
            .ok_or(Error::PlanNotFound(id))
    }

    /// All plans, oldest first.
    pub fn list(&self) -> Vec<Plan> {
        let mut plans: Vec<Plan> = self.plans.iter().map(|p| p.value().clone()).collect();
        plans.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn rename(&self, id: PlanId, name: &str) -> Result<()> {
        let name = self.validate_name(name, Some(id))?;
        self.update(id, |plan| {
            plan.name = name;
            Ok(())
        })?;
        let _ = self.events_tx.send(PlanEvent::Updated { id });
        Ok(())
    }

    pub fn set_description(&self, id: PlanId, description: &str) -> Result<()> {
        self.update(id, |plan| {
            plan.description = description.trim().to_string();
            Ok(())
        })?;
        let _ = self.events_tx.send(PlanEvent::Updated { id });
        Ok(())
    }

    pub fn set_solver(&self, id: PlanId, solver: SolverSettings) -> Result<()> {
        solver.validate()?;
        self.update(id, |plan| {
            plan.solver = solver;
            Ok(())
        })?;
        let _ = self.events_tx.send(PlanEvent::Updated { id });
        Ok(())
    }

    pub fn delete(&self, id: PlanId) -> Result<Plan> {
        let (_, plan) = self.plans.remove(&id).ok_or(Error::PlanNotFound(id))?;
        let _ = self.events_tx.send(PlanEvent::Deleted { id });
        Ok(plan)
    }

    pub fn add_candidate(&self, plan: PlanId, draft: CandidateDraft) -> Result<CandidateId> {
        draft.validate()?;
        let candidate = CandidateId::new();
        self.update(plan, |p| {
            p.candidates.push(Candidate {
                id: candidate,
                spec: draft,
            });
            Ok(())
        })?;
        let _ = self
            .events_tx
            .send(PlanEvent::CandidatesChanged { plan, candidate });
        Ok(candidate)
    }

    pub fn update_candidate(
        &self,
        plan: PlanId,
        candidate: CandidateId,
        draft: CandidateDraft,
    ) -> Result<()> {
        draft.validate()?;
        self.update(plan, |p| {
            let slot = p
                .candidates
                .iter_mut()
                .find(|c| c.id == candidate)
                .ok_or(Error::CandidateNotFound(candidate))?;
            slot.spec = draft;
            Ok(())
        })?;
        let _ = self
            .events_tx
            .send(PlanEvent::CandidatesChanged { plan, candidate });
        Ok(())
    }

    pub fn remove_candidate(&self, plan: PlanId, candidate: CandidateId) -> Result<()> {
        self.update(plan, |p| {
            let before = p.candidates.len();
            p.candidates.retain(|c| c.id != candidate);
            if p.candidates.len() == before {
                return Err(Error::CandidateNotFound(candidate));
            }
            Ok(())
        })?;
        let _ = self
            .events_tx
            .send(PlanEvent::CandidatesChanged { plan, candidate });
        Ok(())
    }

    /// Subscribe to plan events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlanEvent> {
        self.events_tx.subscribe()
    }

    /// Apply `change` to a plan and bump its timestamp; an error leaves it untouched.
    fn update(&self, id: PlanId, change: impl FnOnce(&mut Plan) -> Result<()>) -> Result<()> {
        let mut entry = self.plans.get_mut(&id).ok_or(Error::PlanNotFound(id))?;
        let mut draft = entry.value().clone();
        change(&mut draft)?;
        draft.updated_at = Utc::now();
        *entry = draft;
        Ok(())
    }

    /// Trimmed name, unique among plans other than `except` (case-insensitive).
    fn validate_name(&self, name: &str, except: Option<PlanId>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("plan name is required".into()));
        }
        let taken = self
            .plans
            .iter()
            .any(|p| Some(p.id) != except && p.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(Error::Validation(format!(
                "a plan named '{name}' already exists"
            )));
        }
        Ok(name.to_string())
    }
}

impl Default for PlanStore {
    fn default() -> Self {
        Self::new()
    }
}
