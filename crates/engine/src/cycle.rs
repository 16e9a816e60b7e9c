// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle driver
//!
//! Polls the cycle state and performs attempts while it is `Attempting`.
//! Every attempt runs under an action lease, so it never overlaps a batch.

use crate::context::{ActionLease, CycleContext};
use crate::EngineError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tw_adapters::{Actuator, Capabilities, StorageSession, Vision};
use tw_core::{BatchPhase, Clock, CycleInput, CycleState, ToolId, Trigger};

pub(crate) struct CycleDriver<A, V, S, C: Clock> {
    ctx: Arc<CycleContext<C>>,
    actuator: A,
    vision: V,
    session: S,
    capabilities: Capabilities,
    /// The active tool has to be equipped before the next attempt
    needs_equip: bool,
}

enum Attempt {
    Succeeded,
    /// The cycle left the active states mid-attempt
    Interrupted,
}

impl<A, V, S, C> CycleDriver<A, V, S, C>
where
    A: Actuator,
    V: Vision,
    S: StorageSession,
    C: Clock,
{
    pub(crate) fn new(
        ctx: Arc<CycleContext<C>>,
        actuator: A,
        vision: V,
        session: S,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            ctx,
            actuator,
            vision,
            session,
            capabilities,
            needs_equip: false,
        }
    }

    pub(crate) async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let poll = self.ctx.config.cycle.poll_interval;
        loop {
            if *shutdown.borrow() {
                break;
            }
            match self.ctx.state() {
                CycleState::Starting => self.start_up(),
                CycleState::Attempting => self.attempt().await,
                _ => {}
            }
            tokio::select! {
                _ = tokio::time::sleep(poll) => {}
                _ = shutdown.changed() => {}
            }
        }
        tracing::debug!("cycle driver stopped");
    }

    /// Dependency check on start
    fn start_up(&mut self) {
        if self.ctx.phase() == BatchPhase::Idle && self.session.is_open() {
            self.ctx.fail(&EngineError::SessionStuckOpen);
            return;
        }
        self.needs_equip = true;
        self.ctx.apply(CycleInput::DepsReady);
    }

    async fn attempt(&mut self) {
        if self.ctx.suspend_if_batch_pending() {
            return;
        }
        let Some(mut lease) = CycleContext::try_begin_action(&self.ctx) else {
            return;
        };

        if let Some(tool) = lease.orphaned_switch.take() {
            tracing::info!(%tool, "applying switch no batch consumed");
            self.needs_equip = true;
        }
        if self.needs_equip {
            let tool = self.ctx.current_tool();
            if let Err(e) = self.capabilities.equip(&tool).await {
                self.ctx.fail(&EngineError::Capability(e));
                return;
            }
            tracing::info!(%tool, "equipped");
            self.needs_equip = false;
        }

        let tool = self.ctx.current_tool();
        let timeout = self.ctx.config.cycle.attempt_timeout;
        let result = tokio::time::timeout(timeout, self.perform()).await;
        match result {
            Ok(Ok(Attempt::Succeeded)) => self.on_success(&tool, lease).await,
            Ok(Ok(Attempt::Interrupted)) => {
                tracing::debug!("attempt interrupted");
            }
            Ok(Err(e)) => self.on_failure(&tool, lease, Some(e)),
            Err(_) => {
                tracing::debug!(%tool, "attempt timed out");
                // Retract so the next cast starts clean
                let complete = &self.ctx.config.cycle.complete_button;
                if let Err(e) = self.actuator.press_and_release(complete).await {
                    tracing::debug!(error = %e, "retract failed");
                }
                self.on_failure(&tool, lease, None);
            }
        }
    }

    /// Cast, wait for a confirmed detection, complete
    async fn perform(&self) -> Result<Attempt, EngineError> {
        let cycle = &self.ctx.config.cycle;
        self.actuator.press_and_release(&cycle.cast_button).await?;
        loop {
            if !self.ctx.state().is_active() {
                return Ok(Attempt::Interrupted);
            }
            let detection = self.vision.detect_success().await?;
            if detection.confirms(cycle.min_confidence) {
                self.actuator
                    .press_and_release(&cycle.complete_button)
                    .await?;
                return Ok(Attempt::Succeeded);
            }
            tokio::time::sleep(cycle.detect_interval).await;
        }
    }

    async fn on_success(&mut self, tool: &ToolId, lease: ActionLease<C>) {
        let ctx = &self.ctx;
        ctx.apply(CycleInput::Succeeded);
        let count = ctx.update_stats(|s| {
            s.record_success(Utc::now());
            s.successes
        });
        tracing::info!(%tool, count, "success");
        ctx.observers.succeeded(count);

        let triggers = ctx.with_triggers(|t| t.on_success(tool, &ctx.clock));
        self.enqueue_triggers(triggers);

        // Let concurrent requests land before deciding whether a batch follows
        tokio::time::sleep(ctx.config.cycle.grace_delay).await;

        let will_open_batch = ctx.batch_pending();
        let switched = ctx.with_rotation(|r| r.register_use(tool, true, will_open_batch));
        if let Some(next) = switched {
            ctx.update_stats(|s| s.pair_switches += 1);
            if will_open_batch {
                tracing::info!(tool = %next, "pair switch deferred to batch");
                ctx.record_deferred_switch(next);
            } else if let Err(e) = self.capabilities.equip(&next).await {
                ctx.report_error(&EngineError::Capability(e));
                self.needs_equip = true;
            }
        }

        ctx.finish_attempt(lease);
    }

    fn on_failure(&self, tool: &ToolId, lease: ActionLease<C>, err: Option<EngineError>) {
        let ctx = &self.ctx;
        ctx.update_stats(|s| s.failures += 1);
        if let Some(err) = err {
            ctx.report_error(&err);
        }

        let triggers = ctx.with_triggers(|t| t.on_failure(tool, &ctx.clock));
        self.enqueue_triggers(triggers);
        ctx.with_rotation(|r| r.register_use(tool, false, false));

        ctx.finish_attempt(lease);
    }

    fn enqueue_triggers(&self, triggers: Vec<Trigger>) {
        for trigger in triggers {
            tracing::info!(kind = %trigger.kind, reason = %trigger.reason, "maintenance due");
            self.ctx
                .enqueue(trigger.into_operation(self.ctx.clock.now()));
        }
    }
}

#[cfg(test)]
#[path = "cycle_tests.rs"]
mod tests;
