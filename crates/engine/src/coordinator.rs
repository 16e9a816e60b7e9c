// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch coordinator
//!
//! Waits for the first queued operation, lets the debounce window collect
//! more, then runs everything inside one storage session. Completion always
//! runs, whatever happened to the session or the operations.

use crate::context::{CompletionGuard, CycleContext};
use crate::EngineError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;
use tw_adapters::{Capabilities, StorageSession, Vision};
use tw_core::{
    Batch, BatchPhase, BatchReport, Clock, DeferredAction, DeferredOutcome, IdGen, Operation,
    OperationKind, SessionOutcome, ToolId, TriggerReason,
};

pub(crate) struct BatchCoordinator<V, S, C: Clock, I> {
    ctx: Arc<CycleContext<C>>,
    vision: V,
    session: S,
    capabilities: Capabilities,
    id_gen: I,
}

enum Window {
    Elapsed,
    ShutDown,
}

impl<V, S, C, I> BatchCoordinator<V, S, C, I>
where
    V: Vision,
    S: StorageSession,
    C: Clock,
    I: IdGen,
{
    pub(crate) fn new(
        ctx: Arc<CycleContext<C>>,
        vision: V,
        session: S,
        capabilities: Capabilities,
        id_gen: I,
    ) -> Self {
        Self {
            ctx,
            vision,
            session,
            capabilities,
            id_gen,
        }
    }

    pub(crate) async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = self.ctx.queue.wait_for_pending() => {}
                _ = shutdown.changed() => continue,
            }

            let batch_id = self.id_gen.next();
            let span = tracing::info_span!("batch", %batch_id);
            self.run_batch(batch_id, &mut shutdown)
                .instrument(span)
                .await;
        }
        tracing::debug!("coordinator stopped");
    }

    async fn run_batch(&self, batch_id: String, shutdown: &mut watch::Receiver<bool>) {
        if let Err(e) = self.ctx.advance_phase(BatchPhase::WindowOpen) {
            self.ctx.fail(&EngineError::Phase(e));
            self.ctx.release_flags();
            return;
        }
        let mut guard = CompletionGuard::new(Arc::clone(&self.ctx));
        let mut report = BatchReport::new(&batch_id, Utc::now());

        let window = self.wait_for_window(shutdown).await;
        let batch = Batch::new(batch_id, self.ctx.queue.drain_all(), self.ctx.clock.now());
        tracing::info!(ops = ?batch.kinds(), "window closed");

        if let Err(e) = self.execute(batch, window, &mut report).await {
            self.ctx.fail(&e);
        }

        let action = self.ctx.deferred_action();
        if let DeferredAction::Run(tool) | DeferredAction::Skip(tool) = &action {
            guard.consume(tool.clone());
        }
        let report = self.complete(report, action).await;
        guard.complete();

        tracing::info!(
            executed = ?report.executed,
            failed = ?report.failed,
            skipped = ?report.skipped,
            session = ?report.session,
            "batch complete"
        );
        self.ctx.observers.batch_completed(&report);
    }

    /// Debounce, then wait until the cycle is between attempts
    async fn wait_for_window(&self, shutdown: &mut watch::Receiver<bool>) -> Window {
        let debounce = self.ctx.config.batch.debounce_window;
        tokio::select! {
            _ = tokio::time::sleep(debounce) => {}
            _ = shutdown.changed() => return Window::ShutDown,
        }

        let poll = self.ctx.config.batch.poll_interval;
        loop {
            if self.ctx.claim_safe_point() {
                return Window::Elapsed;
            }
            tokio::select! {
                _ = tokio::time::sleep(poll) => {}
                _ = shutdown.changed() => return Window::ShutDown,
            }
        }
    }

    /// Open the session, run the operations, close the session
    async fn execute(
        &self,
        mut batch: Batch,
        window: Window,
        report: &mut BatchReport,
    ) -> Result<(), EngineError> {
        if matches!(window, Window::ShutDown) {
            tracing::info!("shutting down; batch abandoned");
            report.skipped = batch.kinds();
            self.ctx.advance_phase(BatchPhase::Idle)?;
            return Ok(());
        }
        if !batch.needs_session() {
            report.skipped = batch.kinds();
            self.ctx.advance_phase(BatchPhase::Idle)?;
            return Ok(());
        }

        let reason = batch
            .kinds()
            .iter()
            .filter(|k| k.uses_session())
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join("+");

        if self.session.is_open() {
            report.session = SessionOutcome::AlreadyOpen;
            report.skipped = batch.kinds();
            self.ctx.advance_phase(BatchPhase::Idle)?;
            return Err(EngineError::SessionAlreadyOpen {
                batch_id: batch.id.clone(),
            });
        }

        if !self.session.open(&reason).await {
            tracing::warn!(%reason, "session open failed; batch discarded");
            self.ctx.update_stats(|s| s.session_open_failures += 1);
            report.session = SessionOutcome::OpenFailed;
            report.skipped = batch.kinds();
            self.ctx.advance_phase(BatchPhase::Idle)?;
            return Ok(());
        }
        report.session = SessionOutcome::Opened;
        self.ctx.advance_phase(BatchPhase::Executing)?;

        if let Some(service) = self.opportunistic_service(&batch).await {
            tracing::info!(reason = %service.reason, "adding service");
            report.opportunistic = true;
            batch.push(service);
        }

        for op in &batch.operations {
            self.run_operation(op, report).await;
        }

        self.ctx.advance_phase(BatchPhase::Closing)?;
        let closed = self.session.close(&reason).await;
        report.close_ok = Some(closed);
        if !closed {
            tracing::warn!(%reason, "session close failed");
            self.ctx.update_stats(|s| s.session_close_failures += 1);
        }
        Ok(())
    }

    /// Servicing nobody asked for that is worth doing while the session is
    /// open anyway
    async fn opportunistic_service(&self, batch: &Batch) -> Option<Operation> {
        if batch.contains(OperationKind::Service)
            || !self.capabilities.supports(OperationKind::Service)
        {
            return None;
        }

        if self.ctx.flags().deferred_switch.is_some() {
            return Some(Operation::new(
                OperationKind::Service,
                TriggerReason::Rotation,
                &self.ctx.clock,
            ));
        }

        let active = self.ctx.current_tool();
        let status = match self.vision.detect_slot_status(&active).await {
            Ok(status) => status,
            Err(e) => {
                self.ctx.report_error(&EngineError::Vision(e));
                return None;
            }
        };
        let priority = status.service_priority();
        tracing::debug!(tool = %active, %status, priority, "slot status");
        if priority >= self.ctx.config.batch.opportunistic_threshold {
            Some(Operation::new(
                OperationKind::Service,
                TriggerReason::Opportunistic,
                &self.ctx.clock,
            ))
        } else {
            None
        }
    }

    async fn run_operation(&self, op: &Operation, report: &mut BatchReport) {
        if !op.kind.uses_session() {
            report.skipped.push(op.kind);
            return;
        }

        let active = self.ctx.current_tool();
        let caps = self.capabilities.clone();
        let task_op = op.clone();
        let task_tool = active.clone();
        let joined =
            tokio::spawn(async move { caps.execute(&task_op, &task_tool).await }).await;

        let result = match joined {
            Ok(result) => result.map_err(|source| EngineError::Operation {
                kind: op.kind,
                source,
            }),
            Err(e) => Err(EngineError::Panicked {
                task: format!("{} ({})", op.kind, e),
            }),
        };

        match result {
            Ok(true) => {
                tracing::info!(kind = %op.kind, reason = %op.reason, "operation done");
                self.ctx.mark_session_operations();
                self.ctx.update_stats(|s| s.operations_executed += 1);
                report.executed.push(op.kind);
                if op.kind == OperationKind::Service {
                    self.ctx.with_triggers(|t| t.clear_failures(&active));
                    self.ctx.mark_serviced(&active);
                }
            }
            Ok(false) => {
                tracing::info!(kind = %op.kind, "no capability; skipped");
                report.skipped.push(op.kind);
            }
            Err(e) => {
                tracing::warn!(kind = %op.kind, error = %e, "operation failed");
                self.ctx.mark_session_operations();
                self.ctx.update_stats(|s| s.operations_failed += 1);
                report.failed.push(op.kind);
            }
        }
    }

    /// Step one of completion: run or skip the deferred switch
    async fn complete(&self, mut report: BatchReport, action: DeferredAction) -> BatchReport {
        report.deferred = match action {
            DeferredAction::None => DeferredOutcome::None,
            DeferredAction::Skip(tool) => {
                tracing::info!(%tool, "deferred switch already readied by servicing");
                self.ctx.update_stats(|s| s.deferred_switches_skipped += 1);
                DeferredOutcome::Skipped { tool }
            }
            DeferredAction::Run(tool) => {
                let ok = self.equip(&tool).await;
                self.ctx.update_stats(|s| s.deferred_switches_run += 1);
                DeferredOutcome::Ran { tool, ok }
            }
        };
        self.ctx.update_stats(|s| s.batches_run += 1);
        report
    }

    async fn equip(&self, tool: &ToolId) -> bool {
        tracing::info!(%tool, "running deferred switch");
        let caps = self.capabilities.clone();
        let task_tool = tool.clone();
        match tokio::spawn(async move { caps.equip(&task_tool).await }).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                self.ctx.report_error(&EngineError::Capability(e));
                false
            }
            Err(e) => {
                self.ctx.report_error(&EngineError::Panicked {
                    task: format!("equip {} ({})", tool, e),
                });
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
