//! Structured observability hooks for reconciliation runs.
//!
//! This module provides:
//! - A run-scoped tracing span via the `ReconcileSpan` RAII guard
//! - Emission functions for run start, finish, rule application and data defects
//!
//! Lifecycle events are emitted at `info!`, per-rule detail at `debug!` and
//! data defects at `warn!`. Filter with `RUST_LOG`.

use tracing::{debug, info, warn};

use crate::diagnostic::DiagnosticKind;

/// RAII guard that enters a reconciliation-scoped span for its lifetime.
///
/// # Example
///
/// ```ignore
/// let _span = ReconcileSpan::enter(snapshot.configuration_items.len(), states.len());
/// // every event below is tagged with the input sizes
/// ```
pub struct ReconcileSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReconcileSpan {
    pub fn enter(inventory_items: usize, state_files: usize) -> Self {
        let span = tracing::info_span!(
            "iac.reconcile",
            inventory_items = inventory_items,
            state_files = state_files
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: reconciliation started.
pub fn emit_reconcile_started(inventory_items: usize, state_files: usize) {
    info!(
        event = "reconcile.started",
        inventory_items = inventory_items,
        state_files = state_files
    );
}

/// Emit event: reconciliation finished.
pub fn emit_reconcile_finished(records: usize, diagnostics: usize) {
    info!(
        event = "reconcile.finished",
        records = records,
        diagnostics = diagnostics
    );
}

/// Emit event: an ownership rule finished its pass over the inventory.
pub fn emit_rule_applied(rule: &str, assigned: usize) {
    debug!(event = "rule.applied", rule = %rule, assigned = assigned);
}

/// Emit event: a skippable data defect (warning level).
pub fn emit_data_defect(kind: DiagnosticKind, message: &str) {
    warn!(event = "data.defect", kind = ?kind, "{message}");
}
