//! Compute and storage resources owned by what they are attached to or
//! launched from.

use iac_load::ConfigurationItem;

use super::{owning_cluster, OwnershipRule, RuleContext};
use crate::aws;
use crate::diagnostic::DiagnosticKind;
use crate::record::RecordId;

/// EBS volumes: the EKS cluster tagged as owner, otherwise the instance
/// they are attached to.
pub struct VolumeOwners;

impl OwnershipRule for VolumeOwners {
    fn name(&self) -> &'static str {
        "volume-owners"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::EBS_VOLUME
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        if let Some(cluster) = owning_cluster(item) {
            // an EKS-owned volume never falls back to its instance
            return match ctx.index.find(aws::EKS_CLUSTER, cluster) {
                Some(parent) => ctx.adopt(record, parent),
                None => 0,
            };
        }

        let mut assigned = 0;
        for rel in &item.relationships {
            if rel.name.trim() != aws::REL_ATTACHED_TO_INSTANCE {
                continue;
            }
            if rel.resource_type.is_empty() {
                ctx.report(
                    DiagnosticKind::EmptyResourceType,
                    format!(
                        "snapshot: empty resource type in attachment of {}",
                        item.key()
                    ),
                );
                continue;
            }
            let key = rel.key();
            match ctx.index.find(&rel.resource_type, key) {
                Some(parent) => assigned += ctx.adopt(record, parent),
                None => ctx.report(
                    DiagnosticKind::UnknownReference,
                    format!(
                        "snapshot: volume {} attached to unknown {} {}",
                        item.key(),
                        rel.resource_type,
                        key
                    ),
                ),
            }
        }
        assigned
    }
}

/// Auto Scaling groups own their current instances.
pub struct AsgInstances;

impl OwnershipRule for AsgInstances {
    fn name(&self) -> &'static str {
        "asg-instances"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ASG
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let mut assigned = 0;
        for instance in &item.configuration.instances {
            match ctx.index.get(aws::EC2_INSTANCE, &instance.instance_id) {
                Some(child) => assigned += ctx.adopt(child, record),
                None => ctx.report(
                    DiagnosticKind::UnknownReference,
                    format!(
                        "snapshot: auto scaling group {} lists unknown instance {:?}",
                        item.key(),
                        instance.instance_id
                    ),
                ),
            }
        }
        assigned
    }
}

/// CloudWatch alarms on a classic ELB metric belong to that load balancer.
pub struct ElbAlarms;

impl OwnershipRule for ElbAlarms {
    fn name(&self) -> &'static str {
        "elb-alarms"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ALARM
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let config = &item.configuration;
        if config.namespace != aws::CLOUDWATCH_NAMESPACE_ELB {
            return 0;
        }
        let Some(lb_name) = config
            .dimensions
            .iter()
            .find(|d| d.name == aws::DIMENSION_LOAD_BALANCER_NAME)
            .map(|d| d.value.as_str())
        else {
            return 0;
        };
        match ctx.index.find(aws::ELB, lb_name) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

/// EC2 fleets launched from a launch template.
pub struct FleetLaunchTemplates;

impl OwnershipRule for FleetLaunchTemplates {
    fn name(&self) -> &'static str {
        "fleet-launch-templates"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::EC2_FLEET
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let mut assigned = 0;
        for lt in &item.configuration.launch_template_configs {
            let id = &lt.launch_template_specification.launch_template_id;
            if let Some(parent) = ctx.index.get(aws::LAUNCH_TEMPLATE, id) {
                assigned += ctx.adopt(record, parent);
            }
        }
        assigned
    }
}

/// RDS cluster snapshots belong to their cluster.
pub struct RdsClusterSnapshots;

impl OwnershipRule for RdsClusterSnapshots {
    fn name(&self) -> &'static str {
        "rds-cluster-snapshots"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::RDS_CLUSTER_SNAPSHOT
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        match ctx
            .index
            .find(aws::RDS_CLUSTER, &item.configuration.db_cluster_identifier)
        {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}
