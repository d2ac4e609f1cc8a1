//! VPC plumbing: route table associations and interfaces owned by the
//! resource they are listed under.

use iac_load::ConfigurationItem;

use super::{OwnershipRule, RuleContext};
use crate::aws;
use crate::diagnostic::DiagnosticKind;
use crate::record::RecordId;

/// AWS Config has no record type for subnet associations; they only appear
/// inside their route table. One record is synthesized per association,
/// marked as seen in the inventory and owned by the table.
pub struct RouteTableAssociations;

impl OwnershipRule for RouteTableAssociations {
    fn name(&self) -> &'static str {
        "route-table-associations"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ROUTE_TABLE
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let mut assigned = 0;
        for assoc in &item.configuration.associations {
            let id = assoc.route_table_association_id.as_str();
            if id.is_empty() {
                continue;
            }
            let child = ctx.index.get_or_create(aws::ROUTE_TABLE_ASSOCIATION, id);
            let synthesized = ctx.index.record_mut(child);
            synthesized.in_inventory = true;
            synthesized.type_is_mapped = true;
            assigned += ctx.adopt(child, record);
        }
        assigned
    }
}

/// Interfaces listed in an instance's relationships belong to the instance.
pub struct InstanceInterfaces;

impl OwnershipRule for InstanceInterfaces {
    fn name(&self) -> &'static str {
        "instance-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::EC2_INSTANCE
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let mut assigned = 0;
        for rel in &item.relationships {
            if rel.resource_type != aws::ENI {
                continue;
            }
            if let Some(eni) = ctx.index.get(aws::ENI, &rel.resource_id) {
                assigned += ctx.adopt(eni, record);
            }
        }
        assigned
    }
}

/// Interface endpoints list the ENIs they created.
pub struct VpcEndpointInterfaces;

impl OwnershipRule for VpcEndpointInterfaces {
    fn name(&self) -> &'static str {
        "vpc-endpoint-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::VPC_ENDPOINT
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let mut assigned = 0;
        for eni_id in &item.configuration.network_interface_ids {
            match ctx.index.get(aws::ENI, eni_id) {
                Some(eni) => assigned += ctx.adopt(eni, record),
                None => ctx.report(
                    DiagnosticKind::UnknownReference,
                    format!(
                        "snapshot: {} {} references unknown {} {}",
                        item.resource_type,
                        item.key(),
                        aws::ENI,
                        eni_id
                    ),
                ),
            }
        }
        assigned
    }
}
