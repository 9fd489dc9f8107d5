// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{AggregateError, ProvisionError, StepFailure};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::error;

/// Collects step failures from concurrently running work.
///
/// Clones share the same list. [`FailureCollector::finish`] consumes the
/// collector, so the list is drained exactly once.
#[derive(Debug, Clone, Default)]
pub struct FailureCollector {
    failures: Arc<Mutex<Vec<StepFailure>>>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StepFailure>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, step: &str, namespace: &str, error: ProvisionError) {
        error!(namespace, step, "Step failed: {}", error);
        self.lock().push(StepFailure {
            step: step.to_string(),
            namespace: namespace.to_string(),
            error,
        });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain the collected failures into a single error, if there are any
    pub fn finish(self) -> Result<(), AggregateError> {
        let failures = std::mem::take(&mut *self.lock());
        match AggregateError::from_failures(failures) {
            Some(aggregate) => Err(aggregate),
            None => Ok(()),
        }
    }
}
