// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime: spawns the cycle driver and the batch coordinator, and exposes
//! the command and observation surface

use crate::context::CycleContext;
use crate::coordinator::BatchCoordinator;
use crate::cycle::CycleDriver;
use crate::observer::CycleObserver;
use crate::EngineError;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tw_adapters::{
    Actuator, Capabilities, StorageSession, TracedActuator, TracedStorageSession, Vision,
};
use tw_core::{
    BatchPhase, Clock, CycleInput, CycleState, CycleStats, EnqueueOutcome, IdGen, Operation,
    OperationKind, RotationAllocator, RotationSnapshot, SyncFlags, TidewatchConfig, ToolId,
    TriggerReason,
};

/// Runtime adapter dependencies
pub struct RuntimeDeps<A, V, S> {
    pub actuator: A,
    pub vision: V,
    pub session: S,
    pub capabilities: Capabilities,
}

/// Handle to a running cycle and coordinator
///
/// The cycle starts `Stopped`; call [`Runtime::start`] to begin.
pub struct Runtime<C: Clock> {
    ctx: Arc<CycleContext<C>>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: Clock> Runtime<C> {
    /// Validate the configuration and spawn both tasks on the current
    /// tokio runtime
    pub fn spawn<A, V, S, I>(
        deps: RuntimeDeps<A, V, S>,
        config: TidewatchConfig,
        clock: C,
        id_gen: I,
    ) -> Result<Self, EngineError>
    where
        A: Actuator,
        V: Vision,
        S: StorageSession,
        I: IdGen,
    {
        config.validate()?;
        let rotation = RotationAllocator::new(&config.rotation)?;
        let ctx = Arc::new(CycleContext::new(config, clock, rotation));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let session = TracedStorageSession::new(deps.session);
        let coordinator = BatchCoordinator::new(
            Arc::clone(&ctx),
            deps.vision.clone(),
            session.clone(),
            deps.capabilities.clone(),
            id_gen,
        );
        let driver = CycleDriver::new(
            Arc::clone(&ctx),
            TracedActuator::new(deps.actuator),
            deps.vision,
            session,
            deps.capabilities,
        );

        let tasks = vec![
            tokio::spawn(coordinator.run(shutdown_rx.clone())),
            tokio::spawn(driver.run(shutdown_rx)),
        ];
        tracing::info!("runtime spawned");

        Ok(Self {
            ctx,
            shutdown,
            tasks: Mutex::new(tasks),
        })
    }

    // Commands

    pub fn start(&self) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.ctx.start()
    }

    /// Stop attempting and discard queued work. A batch that already opened
    /// the session still closes it.
    pub fn stop(&self) {
        self.ctx.halt(CycleInput::Stop);
    }

    pub fn emergency_stop(&self) {
        tracing::warn!("emergency stop");
        self.ctx.halt(CycleInput::EmergencyStop);
    }

    pub fn pause(&self) -> Result<(), EngineError> {
        self.ctx.pause()
    }

    pub fn resume(&self) -> Result<(), EngineError> {
        self.ctx.resume()
    }

    pub fn request_restock(&self) -> EnqueueOutcome {
        self.request(OperationKind::Restock)
    }

    pub fn request_cleanup(&self) -> EnqueueOutcome {
        self.request(OperationKind::Cleanup)
    }

    pub fn request_service(&self) -> EnqueueOutcome {
        self.request(OperationKind::Service)
    }

    /// Switch the rotation to `target`. The equip happens through the next
    /// batch.
    pub fn request_pair_switch(
        &self,
        target: impl Into<ToolId>,
    ) -> Result<EnqueueOutcome, EngineError> {
        self.ctx.request_pair_switch(&target.into())
    }

    fn request(&self, kind: OperationKind) -> EnqueueOutcome {
        self.ctx
            .enqueue(Operation::new(kind, TriggerReason::External, &self.ctx.clock))
    }

    // Observation

    pub fn state(&self) -> CycleState {
        self.ctx.state()
    }

    pub fn stats(&self) -> CycleStats {
        self.ctx.stats()
    }

    pub fn rotation(&self) -> RotationSnapshot {
        self.ctx.rotation_snapshot()
    }

    pub fn batch_phase(&self) -> BatchPhase {
        self.ctx.phase()
    }

    pub fn flags(&self) -> SyncFlags {
        self.ctx.flags()
    }

    pub fn queued(&self) -> Vec<OperationKind> {
        self.ctx.queue.pending_kinds()
    }

    pub fn subscribe(&self, observer: Arc<dyn CycleObserver>) {
        self.ctx.observers.add(observer);
    }

    // Lifecycle

    fn ensure_running(&self) -> Result<(), EngineError> {
        if *self.shutdown.borrow() {
            Err(EngineError::ShutDown)
        } else {
            Ok(())
        }
    }

    /// Stop, wait for both tasks, then release the flags unconditionally
    pub async fn shutdown(&self) {
        self.stop();
        let _ = self.shutdown.send(true);

        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(|e| e.into_inner()));
        for task in tasks {
            if let Err(e) = task.await {
                self.ctx.report_error(&EngineError::Panicked {
                    task: format!("runtime task ({})", e),
                });
            }
        }

        self.ctx.release_flags();
        tracing::info!("runtime shut down");
    }
}

impl<C: Clock> Drop for Runtime<C> {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
