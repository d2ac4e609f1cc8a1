//! Resources the EKS control plane and its controllers create on behalf of
//! a cluster.

use iac_load::ConfigurationItem;

use super::{owning_cluster, OwnershipRule, RuleContext};
use crate::aws;
use crate::record::RecordId;

/// Security groups and classic load balancers tagged
/// `kubernetes.io/cluster/<name> = owned`.
pub struct ClusterTaggedResources;

impl OwnershipRule for ClusterTaggedResources {
    fn name(&self) -> &'static str {
        "cluster-tagged-resources"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::SECURITY_GROUP || resource_type == aws::ELB
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let Some(cluster) = owning_cluster(item) else {
            return 0;
        };
        match ctx.index.find(aws::EKS_CLUSTER, cluster) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

/// Load balancers the AWS load balancer controller created, which carry the
/// cluster name as the value of `elbv2.k8s.aws/cluster`.
pub struct ElbV2ClusterTag;

impl OwnershipRule for ElbV2ClusterTag {
    fn name(&self) -> &'static str {
        "elbv2-cluster-tag"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ELB_V2
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let Some(cluster) = item.tag(aws::ELBV2_CLUSTER_TAG) else {
            return 0;
        };
        match ctx.index.find(aws::EKS_CLUSTER, cluster) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}
