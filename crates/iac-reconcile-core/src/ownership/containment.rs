//! CloudFormation stacks and Elastic Beanstalk applications own whatever
//! they contain.

use iac_load::ConfigurationItem;

use super::{OwnershipRule, RuleContext};
use crate::aws;
use crate::diagnostic::DiagnosticKind;
use crate::record::RecordId;

/// Every `Contains` relationship of a stack or Beanstalk application, plus
/// each resource listed as unsupported in its supplementary configuration,
/// is owned by the stack.
///
/// Contained resources the snapshot never listed get a placeholder record,
/// so that Terraform state can still be correlated against them later.
pub struct StackContainment;

impl OwnershipRule for StackContainment {
    fn name(&self) -> &'static str {
        "stack-containment"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::STACK || resource_type == aws::ELASTIC_BEANSTALK_APPLICATION
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let mut assigned = 0;

        for rel in &item.relationships {
            if rel.name.trim() != aws::REL_CONTAINS {
                continue;
            }
            if rel.resource_type.is_empty() {
                ctx.report(
                    DiagnosticKind::EmptyResourceType,
                    format!(
                        "snapshot: empty resource type in relationship of {} {}",
                        item.resource_type,
                        item.key()
                    ),
                );
                continue;
            }
            let key = rel.key();
            if key.is_empty() {
                ctx.report(
                    DiagnosticKind::MissingIdentity,
                    format!(
                        "snapshot: contained {} of {} {} has no ID or name",
                        rel.resource_type,
                        item.resource_type,
                        item.key()
                    ),
                );
                continue;
            }
            let child = match ctx.index.find(&rel.resource_type, key) {
                Some(child) => child,
                None if rel.resource_id.is_empty() => ctx
                    .index
                    .get_or_create_named(&rel.resource_type, &rel.resource_name),
                None => ctx.index.get_or_create(&rel.resource_type, key),
            };
            assigned += ctx.adopt(child, record);
        }

        for unsupported in &item.supplementary_configuration.unsupported_resources {
            if unsupported.resource_type.is_empty() {
                ctx.report(
                    DiagnosticKind::EmptyResourceType,
                    format!(
                        "snapshot: empty resource type for unsupported resource {} of {}",
                        unsupported.resource_id,
                        item.key()
                    ),
                );
                continue;
            }
            if unsupported.resource_id.is_empty() {
                ctx.report(
                    DiagnosticKind::MissingIdentity,
                    format!(
                        "snapshot: empty resource ID for unsupported {} of {}",
                        unsupported.resource_type,
                        item.key()
                    ),
                );
                continue;
            }
            let child = match ctx
                .index
                .find(&unsupported.resource_type, &unsupported.resource_id)
            {
                Some(child) => child,
                None => ctx
                    .index
                    .get_or_create(&unsupported.resource_type, &unsupported.resource_id),
            };
            assigned += ctx.adopt(child, record);
        }

        assigned
    }
}
