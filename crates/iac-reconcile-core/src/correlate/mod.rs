//! Declarative-state correlation.
//!
//! Runs after ownership inference. Each managed AWS resource instance in a
//! Terraform state document is resolved to an existing record, matched
//! structurally inside a container, or recorded as declared-only.

mod structural;

use iac_load::{Instance, Resource, TerraformState};
use serde::Serialize;
use tracing::debug;

use crate::aws;
use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::index::IdentityIndex;
use crate::record::{ReconciledRecord, RecordId};

use structural::{StructuralMatch, SubResource};

/// How one declared instance was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum CorrelationOutcome {
    /// An existing record now carries the declarative flag.
    Matched { record: RecordId },
    /// Matched an entry inside a container's configuration. No record of its
    /// own; `container` is `None` for types AWS Config never tracks.
    Structural { container: Option<RecordId> },
    /// A new declared-only record.
    Created { record: RecordId },
    /// Not usable: no identity or an invalid rule.
    Skipped,
}

/// Outcome of one declared instance, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelatedInstance {
    /// State document identifier.
    pub document: String,
    /// Terraform address of the resource block.
    pub address: String,
    /// Position within the block's instances.
    pub instance: usize,
    #[serde(flatten)]
    pub outcome: CorrelationOutcome,
}

/// True for the AWS provider, legacy or registry form, optionally
/// module-qualified and optionally aliased.
pub fn is_aws_provider(provider: &str) -> bool {
    [aws::TF_PROVIDER_LEGACY, aws::TF_PROVIDER_REGISTRY]
        .iter()
        .any(|known| {
            provider.match_indices(known).any(|(at, _)| {
                let before = &provider[..at];
                let after = &provider[at + known.len()..];
                let qualified = before.is_empty() || before.ends_with('.');
                let aliased = after.is_empty()
                    || after
                        .strip_prefix('.')
                        .is_some_and(|alias| !alias.is_empty() && !alias.contains('.'));
                qualified && aliased
            })
        })
}

/// Walks state documents against an index.
pub(crate) struct Correlator<'a, 't> {
    index: &'a mut IdentityIndex<'t>,
    diagnostics: &'a mut Diagnostics,
}

impl<'a, 't> Correlator<'a, 't> {
    pub(crate) fn new(index: &'a mut IdentityIndex<'t>, diagnostics: &'a mut Diagnostics) -> Self {
        Self { index, diagnostics }
    }

    /// Correlate every managed AWS instance of one document.
    pub(crate) fn correlate_document(
        &mut self,
        document: &str,
        state: &TerraformState,
    ) -> Vec<CorrelatedInstance> {
        let mut results = Vec::new();
        for resource in &state.resources {
            if !resource.is_managed() || !is_aws_provider(&resource.provider) {
                continue;
            }
            let address = resource.address();
            for (position, instance) in resource.instances.iter().enumerate() {
                let outcome = self.correlate_instance(document, &address, resource, position, instance);
                debug!(document, address = %address, instance = position, ?outcome, "correlated");
                results.push(CorrelatedInstance {
                    document: document.to_string(),
                    address: address.clone(),
                    instance: position,
                    outcome,
                });
            }
        }
        results
    }

    fn correlate_instance(
        &mut self,
        document: &str,
        address: &str,
        resource: &Resource,
        position: usize,
        instance: &Instance,
    ) -> CorrelationOutcome {
        let (canonical, mapped) = self.index.types().to_inventory_type(&resource.resource_type);

        let arn = instance.str_attr("arn");
        let id = instance.str_attr("id");
        let name = instance.str_attr("name");
        let key = if !arn.is_empty() { arn } else { id };
        if key.is_empty() {
            self.diagnostics.push(
                DiagnosticKind::MissingIdentity,
                format!("{document}: {address}[{position}] has neither id nor arn"),
            );
            return CorrelationOutcome::Skipped;
        }

        let existing = match SubResource::classify(canonical) {
            Some(kind) => match kind.resolve(instance, self.index) {
                StructuralMatch::Found { container } => {
                    return CorrelationOutcome::Structural { container };
                }
                StructuralMatch::UnknownDirection(direction) => {
                    self.diagnostics.push(
                        DiagnosticKind::UnknownRuleDirection,
                        format!(
                            "{document}: {address}[{position}] has unknown rule type {direction:?}"
                        ),
                    );
                    return CorrelationOutcome::Skipped;
                }
                // a sub-resource seen in an earlier document
                StructuralMatch::NotFound => self.lookup(canonical, key, id, name, arn),
            },
            None => self.lookup(canonical, key, id, name, arn),
        };

        if let Some(record) = existing {
            self.index.record_mut(record).in_declarative_state = true;
            return CorrelationOutcome::Matched { record };
        }

        let mut created = ReconciledRecord::placeholder(canonical, id, mapped);
        created.arn = arn.to_string();
        created.resource_name = name.to_string();
        created.in_declarative_state = true;
        let record = self.index.insert(created);
        CorrelationOutcome::Created { record }
    }

    /// Key, then ID when the key was the ARN, then name, then ARN.
    fn lookup(&self, canonical: &str, key: &str, id: &str, name: &str, arn: &str) -> Option<RecordId> {
        self.index
            .get(canonical, key)
            .or_else(|| (key != id).then(|| self.index.get(canonical, id)).flatten())
            .or_else(|| self.index.get_by_name(canonical, name))
            .or_else(|| self.index.get_by_arn(canonical, arn))
    }
}
