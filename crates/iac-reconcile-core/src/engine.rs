//! The reconciliation run: index the inventory, infer ownership, then
//! correlate declarative state.

use std::collections::HashMap;

use iac_load::{Snapshot, StateSet};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::aws;
use crate::correlate::{CorrelatedInstance, Correlator};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::index::IdentityIndex;
use crate::obs::{emit_reconcile_finished, emit_reconcile_started, ReconcileSpan};
use crate::ownership::{OwnershipEngine, RuleContext};
use crate::record::{ReconciledRecord, RecordId};
use crate::typemap::TypeMap;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    records: Vec<ReconciledRecord>,
    diagnostics: Vec<Diagnostic>,
    correlations: Vec<CorrelatedInstance>,
    state_files: usize,
    #[serde(skip)]
    by_key: HashMap<(String, String), RecordId>,
}

impl Reconciliation {
    fn new(
        records: Vec<ReconciledRecord>,
        diagnostics: Vec<Diagnostic>,
        correlations: Vec<CorrelatedInstance>,
        state_files: usize,
    ) -> Self {
        let by_key = records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.resource_type.clone(), r.key().to_string()), RecordId(i)))
            .collect();
        Self {
            records,
            diagnostics,
            correlations,
            state_files,
            by_key,
        }
    }

    /// All records, including ephemeral placeholders.
    pub fn records(&self) -> &[ReconciledRecord] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> &ReconciledRecord {
        &self.records[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &ReconciledRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (RecordId(i), r))
    }

    /// Records seen in at least one source.
    pub fn visible(&self) -> impl Iterator<Item = &ReconciledRecord> {
        self.records.iter().filter(|r| !r.ephemeral())
    }

    /// Look up a record by type and primary key.
    pub fn get(&self, resource_type: &str, key: &str) -> Option<&ReconciledRecord> {
        self.find(resource_type, key).map(|id| self.record(id))
    }

    pub fn find(&self, resource_type: &str, key: &str) -> Option<RecordId> {
        self.by_key
            .get(&(resource_type.to_string(), key.to_string()))
            .copied()
    }

    pub fn parent_of(&self, record: &ReconciledRecord) -> Option<&ReconciledRecord> {
        record.parent().map(|id| self.record(id))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn correlations(&self) -> &[CorrelatedInstance] {
        &self.correlations
    }

    /// Number of state documents correlated.
    pub fn state_files(&self) -> usize {
        self.state_files
    }

    /// SHA-256 over every record's identity, flags and parent identity,
    /// independent of record order.
    pub fn fingerprint(&self) -> String {
        let mut lines: Vec<String> = self
            .records
            .iter()
            .map(|r| {
                let (parent_type, parent_key) = match self.parent_of(r) {
                    Some(p) => (p.resource_type.as_str(), p.key()),
                    None => ("", ""),
                };
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    r.resource_type,
                    r.key(),
                    u8::from(r.in_inventory()),
                    u8::from(r.in_declarative_state()),
                    parent_type,
                    parent_key,
                    u8::from(r.type_is_mapped()),
                )
            })
            .collect();
        lines.sort();

        let mut hasher = Sha256::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

/// Reconcile a snapshot against a set of state documents with the standard
/// ownership rules.
pub fn reconcile(snapshot: &Snapshot, states: &StateSet, types: &TypeMap) -> Reconciliation {
    reconcile_with(snapshot, states, types, &OwnershipEngine::standard())
}

/// As [`reconcile`], with a caller-supplied rule set.
pub fn reconcile_with(
    snapshot: &Snapshot,
    states: &StateSet,
    types: &TypeMap,
    rules: &OwnershipEngine,
) -> Reconciliation {
    let items = &snapshot.configuration_items;
    let _span = ReconcileSpan::enter(items.len(), states.len());
    emit_reconcile_started(items.len(), states.len());

    let mut index = IdentityIndex::new(types);
    let mut diagnostics = Diagnostics::default();

    let mut inventory = Vec::with_capacity(items.len());
    for item in items {
        if item.resource_type == aws::CONFIG_COMPLIANCE {
            continue;
        }
        if item.resource_type.is_empty() {
            diagnostics.push(
                DiagnosticKind::EmptyResourceType,
                format!(
                    "snapshot: empty resource type for item {:?}",
                    if item.arn.is_empty() { &item.resource_id } else { &item.arn }
                ),
            );
            continue;
        }
        match index.insert_inventory(item) {
            Some(record) => inventory.push((record, item)),
            None => diagnostics.push(
                DiagnosticKind::MissingIdentity,
                format!(
                    "snapshot: {} {:?} has neither resource ID nor ARN",
                    item.resource_type, item.resource_name
                ),
            ),
        }
    }

    {
        let mut ctx = RuleContext {
            index: &mut index,
            diagnostics: &mut diagnostics,
        };
        rules.run(&inventory, &mut ctx);
    }

    let mut correlations = Vec::new();
    {
        let mut correlator = Correlator::new(&mut index, &mut diagnostics);
        for (document, state) in states {
            correlations.extend(correlator.correlate_document(document, state));
        }
    }

    let records = index.into_records();
    let diagnostics = diagnostics.into_vec();
    emit_reconcile_finished(records.len(), diagnostics.len());
    Reconciliation::new(records, diagnostics, correlations, states.len())
}
