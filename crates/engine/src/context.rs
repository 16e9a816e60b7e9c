// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State shared by the cycle driver and the batch coordinator
//!
//! The cycle state, the sync flags, the batch phase and the cycle's busy
//! marker live under one lock, so suspension, the safe-point claim and the
//! completion handshake each happen in a single critical section.
//!
//! Lock order: coordination, then queue, then rotation. Stats, triggers and
//! observers are never held together with coordination.

use crate::observer::Observers;
use crate::EngineError;
use std::sync::{Arc, Mutex, MutexGuard};
use tw_core::{
    BatchPhase, Clock, CycleInput, CycleState, CycleStats, DeferredAction, EnqueueOutcome,
    MaintenanceTriggers, Operation, OperationKind, OperationQueue, PhaseError,
    RotationAllocator, RotationSnapshot, SyncFlags, TidewatchConfig, ToolId, TriggerReason,
};

type Change = Option<(CycleState, CycleState)>;

#[derive(Debug)]
struct Coordination {
    state: CycleState,
    flags: SyncFlags,
    phase: BatchPhase,
    /// The cycle holds an [`ActionLease`]
    cycle_busy: bool,
}

impl Coordination {
    fn transition(&mut self, input: CycleInput) -> Change {
        let old = self.state;
        let new = old.on(input)?;
        self.state = new;
        Some((old, new))
    }
}

pub(crate) struct CycleContext<C: Clock> {
    pub(crate) config: TidewatchConfig,
    pub(crate) clock: C,
    pub(crate) queue: OperationQueue,
    pub(crate) observers: Observers,
    coord: Mutex<Coordination>,
    rotation: Mutex<RotationAllocator>,
    triggers: Mutex<MaintenanceTriggers>,
    stats: Mutex<CycleStats>,
}

impl<C: Clock> CycleContext<C> {
    pub(crate) fn new(config: TidewatchConfig, clock: C, rotation: RotationAllocator) -> Self {
        let triggers = MaintenanceTriggers::new(&config.triggers, &clock);
        Self {
            config,
            clock,
            queue: OperationQueue::new(),
            observers: Observers::default(),
            coord: Mutex::new(Coordination {
                state: CycleState::Stopped,
                flags: SyncFlags::default(),
                phase: BatchPhase::Idle,
                cycle_busy: false,
            }),
            rotation: Mutex::new(rotation),
            triggers: Mutex::new(triggers),
            stats: Mutex::new(CycleStats::default()),
        }
    }

    fn coord(&self) -> MutexGuard<'_, Coordination> {
        self.coord.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn with_rotation<R>(&self, f: impl FnOnce(&mut RotationAllocator) -> R) -> R {
        f(&mut self.rotation.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub(crate) fn with_triggers<R>(&self, f: impl FnOnce(&mut MaintenanceTriggers) -> R) -> R {
        f(&mut self.triggers.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub(crate) fn update_stats<R>(&self, f: impl FnOnce(&mut CycleStats) -> R) -> R {
        f(&mut self.stats.lock().unwrap_or_else(|e| e.into_inner()))
    }

    // Reads

    pub(crate) fn state(&self) -> CycleState {
        self.coord().state
    }

    pub(crate) fn phase(&self) -> BatchPhase {
        self.coord().phase
    }

    pub(crate) fn flags(&self) -> SyncFlags {
        self.coord().flags.clone()
    }

    pub(crate) fn stats(&self) -> CycleStats {
        self.update_stats(|s| s.clone())
    }

    pub(crate) fn rotation_snapshot(&self) -> RotationSnapshot {
        self.with_rotation(|r| r.snapshot())
    }

    pub(crate) fn current_tool(&self) -> ToolId {
        self.with_rotation(|r| r.current_tool().clone())
    }

    /// A batch is queued or in flight
    pub(crate) fn batch_pending(&self) -> bool {
        let coord = self.coord();
        coord.phase != BatchPhase::Idle || self.queue.has_pending()
    }

    // Transitions

    fn announce(&self, change: Change) {
        if let Some((old, new)) = change {
            tracing::info!(from = %old, to = %new, "cycle state changed");
            self.observers.state_changed(old, new);
        }
    }

    /// Apply an input, returning whether it was accepted
    pub(crate) fn apply(&self, input: CycleInput) -> bool {
        let change = self.coord().transition(input);
        let applied = change.is_some();
        self.announce(change);
        applied
    }

    fn command(&self, command: &'static str, input: CycleInput) -> Result<(), EngineError> {
        let (change, state) = {
            let mut coord = self.coord();
            (coord.transition(input), coord.state)
        };
        if change.is_none() {
            return Err(EngineError::InvalidCommand { command, state });
        }
        self.announce(change);
        Ok(())
    }

    pub(crate) fn start(&self) -> Result<(), EngineError> {
        let (change, state) = {
            let mut coord = self.coord();
            let change = coord.transition(CycleInput::Start);
            if change.is_some() {
                self.queue.reopen();
            }
            (change, coord.state)
        };
        if change.is_none() {
            return Err(EngineError::InvalidCommand {
                command: "start",
                state,
            });
        }
        self.announce(change);
        Ok(())
    }

    /// Stop or emergency-stop. Pending operations are discarded; a batch
    /// already past its window keeps running until it closes.
    pub(crate) fn halt(&self, input: CycleInput) {
        let (change, discarded) = {
            let mut coord = self.coord();
            let change = coord.transition(input);
            let discarded = self.queue.close();
            if coord.phase == BatchPhase::Idle {
                coord.flags.release();
                self.with_rotation(|r| r.clear_pending_switch());
            }
            (change, discarded)
        };
        if !discarded.is_empty() {
            let kinds: Vec<OperationKind> = discarded.iter().map(|op| op.kind).collect();
            tracing::info!(?kinds, "discarded pending operations");
        }
        self.announce(change);
    }

    pub(crate) fn pause(&self) -> Result<(), EngineError> {
        self.command("pause", CycleInput::Pause)
    }

    pub(crate) fn resume(&self) -> Result<(), EngineError> {
        let (change, state) = {
            let mut coord = self.coord();
            let batch_pending = coord.phase != BatchPhase::Idle || self.queue.has_pending();
            let change = coord.transition(CycleInput::Resume { batch_pending });
            if change.is_some() && batch_pending {
                coord.flags.begin_wait();
            }
            (change, coord.state)
        };
        if change.is_none() {
            return Err(EngineError::InvalidCommand {
                command: "resume",
                state,
            });
        }
        self.announce(change);
        Ok(())
    }

    /// Move the cycle to `Error`
    pub(crate) fn fail(&self, err: &EngineError) {
        tracing::error!(error = %err, "fatal error");
        self.update_stats(|s| s.errors += 1);
        let change = self.coord().transition(CycleInput::Fail);
        self.announce(change);
        self.observers.errored(err);
    }

    /// Count and publish an error the cycle survives
    pub(crate) fn report_error(&self, err: &EngineError) {
        tracing::warn!(error = %err, "error");
        self.update_stats(|s| s.errors += 1);
        self.observers.errored(err);
    }

    // Queue

    /// Enqueue, counting duplicates
    pub(crate) fn enqueue(&self, op: Operation) -> EnqueueOutcome {
        let kind = op.kind;
        let reason = op.reason;
        let outcome = self.queue.enqueue(op);
        self.count_enqueue(kind, outcome);
        tracing::debug!(%kind, %reason, ?outcome, "enqueue");
        outcome
    }

    fn count_enqueue(&self, kind: OperationKind, outcome: EnqueueOutcome) {
        self.update_stats(|s| {
            if outcome.is_duplicate() {
                s.duplicate_requests += 1;
            } else if outcome.is_accepted() && kind == OperationKind::Service {
                s.services_requested += 1;
            }
        });
    }

    /// Steer the rotation to `target` and queue the marker that makes the
    /// next batch equip it
    pub(crate) fn request_pair_switch(
        &self,
        target: &ToolId,
    ) -> Result<EnqueueOutcome, EngineError> {
        let tool = self.with_rotation(|r| r.request_pair_switch(target))?;
        self.update_stats(|s| s.pair_switches += 1);

        let op = Operation::new(OperationKind::PairSwitch, TriggerReason::External, &self.clock)
            .with_target(tool.clone());
        let outcome = {
            // Held across the enqueue so the cycle cannot take the switch
            // as orphaned in between
            let mut coord = self.coord();
            coord.flags.record_deferred_switch(tool);
            self.queue.enqueue(op)
        };
        self.count_enqueue(OperationKind::PairSwitch, outcome);
        Ok(outcome)
    }

    // Cycle side

    /// Suspend the cycle if a batch is queued or in flight
    ///
    /// Returns true when the cycle must not attempt.
    pub(crate) fn suspend_if_batch_pending(&self) -> bool {
        let change = {
            let mut coord = self.coord();
            if coord.phase == BatchPhase::Idle && !self.queue.has_pending() {
                return false;
            }
            let change = coord.transition(CycleInput::SuspendForBatch);
            if change.is_some() {
                coord.flags.begin_wait();
            }
            change
        };
        self.announce(change);
        true
    }

    /// Claim the right to drive the actuator for one attempt
    ///
    /// Only granted while the cycle is active and no batch is queued or in
    /// flight. A deferred switch that no batch will consume is handed over
    /// with the lease.
    pub(crate) fn try_begin_action(self: &Arc<Self>) -> Option<ActionLease<C>> {
        let mut coord = self.coord();
        if !coord.state.is_active()
            || coord.cycle_busy
            || coord.phase != BatchPhase::Idle
            || self.queue.has_pending()
        {
            return None;
        }
        coord.cycle_busy = true;
        let orphaned_switch = coord.flags.deferred_switch.take();
        if orphaned_switch.is_some() {
            self.with_rotation(|r| r.clear_pending_switch());
        }
        Some(ActionLease {
            ctx: Arc::clone(self),
            orphaned_switch,
            released: false,
        })
    }

    pub(crate) fn record_deferred_switch(&self, tool: ToolId) {
        self.coord().flags.record_deferred_switch(tool);
    }

    /// End an attempt: suspend for a pending batch or keep attempting
    pub(crate) fn finish_attempt(&self, mut lease: ActionLease<C>) {
        let change = {
            let mut coord = self.coord();
            let change = if coord.phase != BatchPhase::Idle || self.queue.has_pending() {
                let change = coord.transition(CycleInput::SuspendForBatch);
                if change.is_some() {
                    coord.flags.begin_wait();
                }
                change
            } else if coord.state == CycleState::ActionSucceeded {
                coord.transition(CycleInput::Continue)
            } else {
                None
            };
            coord.cycle_busy = false;
            change
        };
        lease.released = true;
        self.announce(change);
    }

    // Coordinator side

    /// True once the cycle is not mid-attempt. While the phase is not idle
    /// the cycle cannot start another one.
    pub(crate) fn claim_safe_point(&self) -> bool {
        !self.coord().cycle_busy
    }

    pub(crate) fn advance_phase(&self, next: BatchPhase) -> Result<(), PhaseError> {
        let mut coord = self.coord();
        coord.phase = coord.phase.advance(next)?;
        tracing::debug!(phase = %next, "batch phase");
        Ok(())
    }

    pub(crate) fn mark_session_operations(&self) {
        self.coord().flags.mark_session_operations();
    }

    pub(crate) fn mark_serviced(&self, tool: &ToolId) {
        self.coord().flags.mark_serviced(tool);
    }

    pub(crate) fn deferred_action(&self) -> DeferredAction {
        self.coord().flags.deferred_action()
    }

    /// Completion steps after the deferred switch: reset the batch flags,
    /// clear the wait, go idle and resume a suspended cycle.
    ///
    /// `consumed` is the deferred switch step one acted on; a newer one
    /// recorded meanwhile is kept for the cycle to pick up.
    fn finish_batch(&self, consumed: Option<&ToolId>) {
        let change = {
            let mut coord = self.coord();
            if coord.flags.deferred_switch.as_ref() == consumed {
                coord.flags.reset_batch();
                self.with_rotation(|r| r.clear_pending_switch());
            } else {
                coord.flags.had_session_operations = false;
                coord.flags.switch_readied = false;
            }
            coord.flags.end_wait();
            coord.phase = BatchPhase::Idle;
            let change = if coord.state == CycleState::WaitingForBatch {
                coord.transition(CycleInput::BatchComplete)
            } else {
                None
            };
            self.queue.finish_batch();
            change
        };
        self.announce(change);
    }

    /// Unconditional release on shutdown
    pub(crate) fn release_flags(&self) {
        let mut coord = self.coord();
        coord.flags.release();
        coord.phase = BatchPhase::Idle;
        self.with_rotation(|r| r.clear_pending_switch());
        self.queue.finish_batch();
    }
}

/// The cycle's claim on the actuator for one attempt
///
/// While held, the coordinator will not drain the queue.
pub(crate) struct ActionLease<C: Clock> {
    ctx: Arc<CycleContext<C>>,
    pub(crate) orphaned_switch: Option<ToolId>,
    released: bool,
}

impl<C: Clock> Drop for ActionLease<C> {
    fn drop(&mut self) {
        if !self.released {
            self.ctx.coord().cycle_busy = false;
        }
    }
}

/// Runs the completion steps if the batch ends without reaching them
pub(crate) struct CompletionGuard<C: Clock> {
    ctx: Arc<CycleContext<C>>,
    consumed: Option<ToolId>,
    armed: bool,
}

impl<C: Clock> CompletionGuard<C> {
    pub(crate) fn new(ctx: Arc<CycleContext<C>>) -> Self {
        Self {
            ctx,
            consumed: None,
            armed: true,
        }
    }

    pub(crate) fn consume(&mut self, tool: ToolId) {
        self.consumed = Some(tool);
    }

    pub(crate) fn complete(mut self) {
        self.armed = false;
        self.ctx.finish_batch(self.consumed.as_ref());
    }
}

impl<C: Clock> Drop for CompletionGuard<C> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("batch ended early; releasing flags");
            self.ctx.finish_batch(self.consumed.as_ref());
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
