// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single in-flight export guard.
//
// Rasterization is CPU-bound and runs on tokio's blocking pool. Only one
// export may be outstanding; a second trigger fails fast instead of queueing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use redline_core::error::{RedlineError, Result};
use tracing::{debug, error, instrument};

/// Shared flag that admits one export at a time.
#[derive(Debug, Clone, Default)]
pub struct ExportGate {
    busy: Arc<AtomicBool>,
}

/// Proof of holding the gate. Dropping it reopens the gate, whichever way the
/// export ended.
#[derive(Debug)]
pub struct ExportTicket {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        debug!("export gate released");
    }
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the gate, or fail with `ExportInProgress`.
    pub fn try_acquire(&self) -> Result<ExportTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RedlineError::ExportInProgress)?;
        debug!("export gate acquired");
        Ok(ExportTicket {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Run `job` on the blocking pool while holding the gate.
    ///
    /// A panic inside `job` surfaces as `ExportFailure`; the gate is reopened
    /// either way.
    #[instrument(skip_all)]
    pub async fn run_blocking<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ticket = self.try_acquire()?;
        tokio::task::spawn_blocking(move || {
            let _ticket = ticket;
            job()
        })
        .await
        .map_err(|err| {
            error!(%err, "export worker did not complete");
            RedlineError::ExportFailure(format!("export worker did not complete: {err}"))
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let gate = ExportGate::new();
        let ticket = gate.try_acquire().expect("first");
        assert!(gate.is_busy());
        assert!(matches!(
            gate.try_acquire(),
            Err(RedlineError::ExportInProgress)
        ));
        drop(ticket);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }

    #[tokio::test]
    async fn busy_gate_rejects_blocking_job() {
        let gate = ExportGate::new();
        let _held = gate.try_acquire().expect("hold");
        let result = gate.run_blocking(|| Ok(1)).await;
        assert!(matches!(result, Err(RedlineError::ExportInProgress)));
    }

    #[tokio::test]
    async fn gate_reopens_after_success_and_error() {
        let gate = ExportGate::new();
        assert_eq!(gate.run_blocking(|| Ok(7)).await.expect("ok"), 7);
        assert!(!gate.is_busy());

        let failed: Result<()> = gate
            .run_blocking(|| Err(RedlineError::ExportFailure("boom".into())))
            .await;
        assert!(failed.is_err());
        assert!(!gate.is_busy());
    }

    #[tokio::test]
    async fn panicking_job_becomes_export_failure() {
        let gate = ExportGate::new();
        let result: Result<()> = gate.run_blocking(|| panic!("rasterizer exploded")).await;
        assert!(matches!(result, Err(RedlineError::ExportFailure(_))));
        assert!(!gate.is_busy());
    }
}
