//! The wizard state machine.
//!
//! [`PipelineController`] owns the whole session: the current step, the
//! selection, every asset, and the single in-flight generation (if any).
//! Gating rules live here; storage and invalidation are delegated to
//! [`AssetStore`] and [`InvalidationManager`].

use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::assets::{AssetStore, VersionId, VersionSource};
use crate::error::{Result, StagecraftError};
use crate::export::ExportPackage;
use crate::gateway::{Generated, GenerationGateway, GenerationRequest};
use crate::library::{AssetLibrary, LibraryEntry};

use super::{DependencyGraph, InvalidationManager, PipelineStep, Selection, StepKind};

/// What a step looks like to the user right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// A selection step, waiting for (or showing) the user's choice.
    Selecting,
    /// An asset step with no content and nothing in flight.
    AwaitingGeneration,
    /// An asset step with a generation in flight.
    Generating,
    /// An asset step with live content.
    Ready,
    /// The final read-only aggregation.
    Reviewing,
}

/// Caller's answer to "this discards downstream content, continue?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Unconfirmed
        }
    }
}

/// What regenerating the current step would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegeneratePlan {
    pub step: PipelineStep,
    /// Every derived step, populated or not.
    pub affected: Vec<PipelineStep>,
    /// The derived steps that currently hold content and would be lost.
    pub populated: Vec<PipelineStep>,
}

impl RegeneratePlan {
    pub fn requires_confirmation(&self) -> bool {
        !self.populated.is_empty()
    }
}

/// Result of a successful [`PipelineController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The step now current.
    pub step: PipelineStep,
    /// Set when entering the step triggered a generation.
    pub generated: Option<VersionId>,
}

/// Claim on the single in-flight generation.
///
/// Hand [`request`](Self::request) to a gateway, then return the ticket with
/// the outcome to [`PipelineController::complete_generation`].
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    step: PipelineStep,
    epoch: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    pub fn step(&self) -> PipelineStep {
        self.step
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// Outcome of completing a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The content was committed as a new version.
    Committed(VersionId),
    /// The session moved on while the generation ran; nothing was written.
    Discarded,
}

/// A finished session.
#[derive(Debug, Clone)]
pub struct Finalized {
    pub package: ExportPackage,
    /// The library entry, when saving succeeded.
    pub entry: Option<LibraryEntry>,
}

/// Drives one content-generation session through the seven steps.
#[derive(Debug, Clone)]
pub struct PipelineController {
    step: PipelineStep,
    selection: Selection,
    store: AssetStore,
    invalidation: InvalidationManager,
    /// Epoch of the live ticket, if a generation is in flight.
    in_flight: Option<u64>,
    /// Bumped on every begin, navigation and reset; tickets from older
    /// epochs are stale.
    epoch: u64,
}

impl PipelineController {
    /// Start a session on the first step with the standard dependency graph.
    pub fn new() -> Self {
        Self::with_graph(DependencyGraph::standard())
    }

    /// Start a session with a custom dependency graph.
    pub fn with_graph(graph: DependencyGraph) -> Self {
        Self {
            step: PipelineStep::first(),
            selection: Selection::default(),
            store: AssetStore::new(),
            invalidation: InvalidationManager::new(graph),
            in_flight: None,
            epoch: 0,
        }
    }

    pub fn current_step(&self) -> PipelineStep {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn invalidation(&self) -> &InvalidationManager {
        &self.invalidation
    }

    /// State of the current step.
    pub fn state(&self) -> StepState {
        self.state_of(self.step)
    }

    /// State of any step, as it would appear if it were current.
    pub fn state_of(&self, step: PipelineStep) -> StepState {
        match step.kind() {
            StepKind::Selection => StepState::Selecting,
            StepKind::Review => StepState::Reviewing,
            StepKind::Asset => {
                if self.in_flight.is_some() && step == self.step {
                    StepState::Generating
                } else if self.store.has_content(step) {
                    StepState::Ready
                } else {
                    StepState::AwaitingGeneration
                }
            }
        }
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    // --- selection ---

    pub fn select_channel(&mut self, channel: impl Into<String>) -> Result<()> {
        self.require_step(PipelineStep::Channel, "channel can only be chosen on its own step")?;
        self.selection.channel = Some(channel.into());
        Ok(())
    }

    pub fn set_platforms<I, S>(&mut self, platforms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_step(
            PipelineStep::Platforms,
            "platforms can only be chosen on their own step",
        )?;
        self.selection.platforms = platforms.into_iter().map(Into::into).collect();
        Ok(())
    }

    pub fn select_action(&mut self, action: impl Into<String>) -> Result<()> {
        self.require_step(PipelineStep::Action, "action can only be chosen on its own step")?;
        self.selection.action = Some(action.into());
        Ok(())
    }

    fn require_step(&self, step: PipelineStep, message: &str) -> Result<()> {
        if self.step != step {
            return Err(self.transition_error(message));
        }
        Ok(())
    }

    fn transition_error(&self, message: impl Into<String>) -> StagecraftError {
        StagecraftError::InvalidTransition {
            from: self.step,
            message: message.into(),
        }
    }

    // --- navigation ---

    /// Move forward one step.
    ///
    /// Entering an empty asset step generates it once through `gateway`. If
    /// that generation fails the controller stays on the new step, awaiting
    /// an explicit [`generate`](Self::generate), and the error is returned.
    pub fn advance(&mut self, gateway: &dyn GenerationGateway) -> Result<Advance> {
        match self.state() {
            StepState::Selecting if !self.selection.is_filled(self.step) => {
                return Err(self.transition_error("make a selection first"));
            }
            StepState::AwaitingGeneration => {
                return Err(self.transition_error("asset is empty"));
            }
            StepState::Generating => {
                return Err(self.transition_error("generation in progress"));
            }
            StepState::Reviewing => {
                return Err(self.transition_error("review is the last step"));
            }
            StepState::Selecting | StepState::Ready => {}
        }

        let Some(next) = self.step.next() else {
            return Err(self.transition_error("no next step"));
        };

        debug!(from = %self.step, to = %next, "Advancing");
        self.step = next;
        self.epoch += 1;

        let generated = if self.state() == StepState::AwaitingGeneration {
            Some(self.generate(gateway)?)
        } else {
            None
        };

        Ok(Advance {
            step: self.step,
            generated,
        })
    }

    /// Move back one step, abandoning any in-flight generation.
    pub fn back(&mut self) -> Result<PipelineStep> {
        let Some(previous) = self.step.previous() else {
            return Err(self.transition_error("already at the first step"));
        };

        if self.in_flight.take().is_some() {
            debug!(step = %self.step, "Abandoning in-flight generation");
        }
        debug!(from = %self.step, to = %previous, "Going back");
        self.step = previous;
        self.epoch += 1;
        Ok(previous)
    }

    /// Discard the whole session and return to the first step.
    pub fn start_over(&mut self) {
        info!("Starting over");
        self.store.clear();
        self.selection = Selection::default();
        self.in_flight = None;
        self.epoch += 1;
        self.step = PipelineStep::first();
    }

    // --- generation ---

    /// Claim the in-flight slot for a first generation of the current step.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket> {
        match self.state() {
            StepState::AwaitingGeneration => Ok(self.issue_ticket()),
            StepState::Ready => Err(self.transition_error("asset already generated; regenerate instead")),
            StepState::Generating => Err(self.transition_error("generation in progress")),
            _ => Err(StagecraftError::NotAnAssetStep { step: self.step }),
        }
    }

    /// Describe what regenerating the current step would discard.
    pub fn plan_regenerate(&self) -> Result<RegeneratePlan> {
        self.require_ready()?;
        Ok(RegeneratePlan {
            step: self.step,
            affected: self.invalidation.affected(self.step),
            populated: self.invalidation.populated_dependents(self.step, &self.store),
        })
    }

    /// Claim the in-flight slot for a regeneration, invalidating dependents.
    ///
    /// Fails with [`StagecraftError::ConfirmationRequired`] when dependents
    /// hold content and `confirmation` is not [`Confirmation::Confirmed`].
    pub fn begin_regeneration(&mut self, confirmation: Confirmation) -> Result<GenerationTicket> {
        let plan = self.plan_regenerate()?;
        if plan.requires_confirmation() && confirmation != Confirmation::Confirmed {
            let keys: Vec<_> = plan.populated.iter().map(|s| s.key()).collect();
            return Err(StagecraftError::ConfirmationRequired {
                step: self.step,
                affected: keys.join(", "),
            });
        }

        self.invalidation.on_regenerate(self.step, &mut self.store);
        Ok(self.issue_ticket())
    }

    fn issue_ticket(&mut self) -> GenerationTicket {
        self.epoch += 1;
        self.in_flight = Some(self.epoch);
        debug!(step = %self.step, epoch = self.epoch, "Generation started");
        GenerationTicket {
            step: self.step,
            epoch: self.epoch,
            request: self.build_request(self.step),
        }
    }

    /// Everything the gateway needs to generate `step`.
    pub fn build_request(&self, step: PipelineStep) -> GenerationRequest {
        let upstream: BTreeMap<PipelineStep, String> = self
            .invalidation
            .graph()
            .transitive_dependencies(step)
            .into_iter()
            .filter_map(|dep| self.store.current(dep).map(|c| (dep, c.to_string())))
            .collect();

        GenerationRequest {
            step,
            selection: self.selection.clone(),
            upstream,
            revision: self.store.history(step).len() as u32 + 1,
        }
    }

    /// Hand back a ticket with the gateway's outcome.
    ///
    /// Stale tickets are dropped without touching the session. A gateway
    /// error or blank content becomes [`StagecraftError::GenerationFailed`]
    /// and leaves the asset as it was.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: anyhow::Result<Generated>,
    ) -> Result<Completion> {
        if self.in_flight != Some(ticket.epoch) {
            warn!(step = %ticket.step, "Discarding result of abandoned generation");
            return Ok(Completion::Discarded);
        }
        self.in_flight = None;

        let generated = outcome.map_err(|e| {
            warn!(step = %ticket.step, error = %e, "Generation failed");
            StagecraftError::GenerationFailed {
                step: ticket.step,
                message: format!("{:#}", e),
            }
        })?;

        if generated.content.trim().is_empty() {
            warn!(step = %ticket.step, "Generator returned blank content");
            return Err(StagecraftError::GenerationFailed {
                step: ticket.step,
                message: "generator returned no content".to_string(),
            });
        }

        if let Some(tokens) = generated.tokens_used {
            debug!(step = %ticket.step, tokens, "Generation finished");
        }
        let id = self
            .store
            .commit(ticket.step, generated.content, VersionSource::AiGenerated)?;
        Ok(Completion::Committed(id))
    }

    /// Generate the current (empty) step synchronously.
    pub fn generate(&mut self, gateway: &dyn GenerationGateway) -> Result<VersionId> {
        let ticket = self.begin_generation()?;
        self.run_ticket(ticket, gateway)
    }

    /// Regenerate the current step synchronously.
    pub fn regenerate(
        &mut self,
        gateway: &dyn GenerationGateway,
        confirmation: Confirmation,
    ) -> Result<VersionId> {
        let ticket = self.begin_regeneration(confirmation)?;
        self.run_ticket(ticket, gateway)
    }

    fn run_ticket(
        &mut self,
        ticket: GenerationTicket,
        gateway: &dyn GenerationGateway,
    ) -> Result<VersionId> {
        let step = ticket.step;
        let outcome = gateway.generate(ticket.request());
        match self.complete_generation(ticket, outcome)? {
            Completion::Committed(id) => Ok(id),
            Completion::Discarded => Err(StagecraftError::GenerationFailed {
                step,
                message: "generation was abandoned".to_string(),
            }),
        }
    }

    // --- editing ---

    /// Commit a manual edit of the current asset.
    pub fn edit(&mut self, content: impl Into<String>) -> Result<VersionId> {
        self.require_ready()?;
        self.store
            .commit(self.step, content, VersionSource::ManualEdit)
    }

    /// Make an earlier version of the current asset live again.
    pub fn restore(&mut self, version: VersionId) -> Result<()> {
        self.require_ready()?;
        self.store.restore(self.step, version)
    }

    fn require_ready(&self) -> Result<()> {
        match self.state() {
            StepState::Ready => Ok(()),
            StepState::AwaitingGeneration => Err(self.transition_error("asset is empty")),
            StepState::Generating => Err(self.transition_error("generation in progress")),
            _ => Err(StagecraftError::NotAnAssetStep { step: self.step }),
        }
    }

    // --- review ---

    /// Assemble the export package. Only valid on the review step.
    pub fn package(&self) -> Result<ExportPackage> {
        if self.state() != StepState::Reviewing {
            return Err(self.transition_error("packages are built on the review step"));
        }
        Ok(ExportPackage::from_parts(
            &self.selection,
            self.store.snapshot(),
            Utc::now(),
        ))
    }

    /// Save the package to `library` and end the session.
    ///
    /// A failed save is logged and reported as `entry: None`; the session is
    /// reset either way.
    pub fn finalize(&mut self, library: &dyn AssetLibrary) -> Result<Finalized> {
        let package = self.package()?;
        self.finalize_package(package, library)
    }

    /// Like [`finalize`](Self::finalize), but saves a package already built
    /// with [`package`](Self::package), so an export written beforehand and
    /// the library entry carry the same timestamp.
    pub fn finalize_package(
        &mut self,
        package: ExportPackage,
        library: &dyn AssetLibrary,
    ) -> Result<Finalized> {
        if self.state() != StepState::Reviewing {
            return Err(self.transition_error("packages are finalized on the review step"));
        }
        let entry = match library.save(&package) {
            Ok(entry) => {
                info!(id = %entry.id, "Saved package to library");
                Some(entry)
            }
            Err(e) => {
                warn!(error = %e, "Failed to save package to library");
                None
            }
        };
        self.start_over();
        Ok(Finalized { package, entry })
    }
}

impl Default for PipelineController {
    fn default() -> Self {
        Self::new()
    }
}
