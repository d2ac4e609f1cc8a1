//! Counts by source and by resource type.
//!
//! Ephemeral records are never counted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::Reconciliation;
use crate::record::{ReconciledRecord, Source};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// In both the snapshot and the declarative state.
    pub both: usize,
    /// One entry per [`Source`], in [`Source::ALL`] order.
    pub sources: Vec<SourceSummary>,
    /// One entry per resource type, sorted by type.
    pub by_type: Vec<TypeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub total: usize,
    /// Present here but not in the opposing source; see [`only_in`].
    pub only: usize,
    pub only_mapped: usize,
    pub only_unmapped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub resource_type: String,
    pub count: usize,
    /// Seen by exactly one of the two inputs.
    pub single_only: usize,
    pub both: usize,
    /// Count per source name.
    pub source: BTreeMap<String, usize>,
}

impl TypeSummary {
    /// Count for a source name; zero for unknown names.
    pub fn source_count(&self, name: &str) -> usize {
        self.source.get(name).copied().unwrap_or(0)
    }
}

impl Summary {
    pub fn source(&self, source: Source) -> Option<&SourceSummary> {
        self.sources.iter().find(|s| s.name == source.as_str())
    }
}

/// Whether `record` is in `source` and not in the source it is weighed
/// against: config against terraform, terraform against config, and owned
/// against config (managed but missing from the inventory).
pub fn only_in(record: &ReconciledRecord, source: Source) -> bool {
    let opposing = match source {
        Source::Config => Source::Terraform,
        Source::Terraform | Source::Owned => Source::Config,
    };
    record.source(source) && !record.source(opposing)
}

fn in_both(record: &ReconciledRecord) -> bool {
    record.in_inventory() && record.in_declarative_state()
}

pub fn summarize(reconciliation: &Reconciliation) -> Summary {
    let mut summary = Summary {
        sources: Source::ALL
            .iter()
            .map(|s| SourceSummary {
                name: s.as_str().to_string(),
                total: 0,
                only: 0,
                only_mapped: 0,
                only_unmapped: 0,
            })
            .collect(),
        ..Default::default()
    };
    let mut by_type: BTreeMap<&str, TypeSummary> = BTreeMap::new();

    for record in reconciliation.visible() {
        let both = in_both(record);
        if both {
            summary.both += 1;
        }

        for (source, counts) in Source::ALL.iter().zip(summary.sources.iter_mut()) {
            if !record.source(*source) {
                continue;
            }
            counts.total += 1;
            if only_in(record, *source) {
                counts.only += 1;
                if record.type_is_mapped() {
                    counts.only_mapped += 1;
                } else {
                    counts.only_unmapped += 1;
                }
            }
        }

        let entry = by_type
            .entry(record.resource_type.as_str())
            .or_insert_with(|| TypeSummary {
                resource_type: record.resource_type.clone(),
                source: Source::ALL
                    .iter()
                    .map(|s| (s.as_str().to_string(), 0))
                    .collect(),
                ..Default::default()
            });
        entry.count += 1;
        if both {
            entry.both += 1;
        } else {
            entry.single_only += 1;
        }
        for source in Source::ALL {
            if record.source(source) {
                *entry.source.entry(source.as_str().to_string()).or_default() += 1;
            }
        }
    }

    summary.by_type = by_type.into_values().collect();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_in_weighs_against_opposing_source() {
        let mut rec = ReconciledRecord::placeholder("AWS::EC2::VPC", "vpc-1", true);
        rec.in_inventory = true;
        assert!(only_in(&rec, Source::Config));
        assert!(!only_in(&rec, Source::Terraform));
        assert!(!only_in(&rec, Source::Owned));

        rec.in_declarative_state = true;
        assert!(!only_in(&rec, Source::Config));
        assert!(!only_in(&rec, Source::Terraform));

        rec.in_inventory = false;
        assert!(only_in(&rec, Source::Terraform));
        assert!(only_in(&rec, Source::Owned));
    }
}
