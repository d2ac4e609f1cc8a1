//! Network interfaces created implicitly by other services.
//!
//! AWS rarely tags these consistently. Most rules go by the interface
//! description, which services fill with a fixed prefix followed by the
//! owning resource's name or ID.

use iac_load::ConfigurationItem;
use uuid::Uuid;

use super::{owning_cluster, OwnershipRule, RuleContext};
use crate::aws;
use crate::record::RecordId;

/// Length of a hyphenated UUID.
const UUID_LEN: usize = 36;

/// ENIs the EKS VPC resource controller created for a cluster: tagged both
/// with cluster ownership and with the controller as ENI owner.
pub struct EksManagedInterfaces;

impl OwnershipRule for EksManagedInterfaces {
    fn name(&self) -> &'static str {
        "eks-managed-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ENI
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        if item.tag(aws::EKS_ENI_OWNER_TAG) != Some(aws::EKS_ENI_OWNER_VALUE) {
            return 0;
        }
        let Some(cluster) = owning_cluster(item) else {
            return 0;
        };
        match ctx.index.find(aws::EKS_CLUSTER, cluster) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

/// ENIs a Kubernetes node attached, tagged with the node's instance ID.
pub struct NodeInterfaces;

impl OwnershipRule for NodeInterfaces {
    fn name(&self) -> &'static str {
        "node-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ENI
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let Some(instance_id) = item.tag(aws::K8S_INSTANCE_TAG) else {
            return 0;
        };
        match ctx.index.get(aws::EC2_INSTANCE, instance_id) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

/// RDS-created ENIs carry no tag or ID linking them to their instance, only
/// a fixed description. They are all attached to one shared RDS placeholder,
/// which marks them as owned without claiming to know which database.
pub struct RdsInterfaces;

impl OwnershipRule for RdsInterfaces {
    fn name(&self) -> &'static str {
        "rds-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ENI
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        if item.configuration.description != aws::RDS_ENI_DESCRIPTION {
            return 0;
        }
        let parent = ctx
            .index
            .get_or_create(aws::RDS_INSTANCE, aws::RDS_ENI_DESCRIPTION);
        ctx.adopt(record, parent)
    }
}

/// ENIs of classic and v2 load balancers.
///
/// The description is `ELB <name>` for both generations, so the classic ELB
/// is tried by name first; failing that, a v2 ARN is rebuilt from the
/// interface's own region and account.
pub struct LoadBalancerInterfaces;

impl OwnershipRule for LoadBalancerInterfaces {
    fn name(&self) -> &'static str {
        "load-balancer-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ENI
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let config = &item.configuration;
        let Some(lb_name) = config.description.strip_prefix(aws::ELB_PREFIX) else {
            return 0;
        };
        let owned_by_elb = config.association.ip_owner_id == aws::ELB_OWNER
            || config.attachment.instance_owner_id == aws::ELB_OWNER
            || config.interface_type == aws::NLB_INTERFACE_TYPE;
        if !owned_by_elb || lb_name.is_empty() {
            return 0;
        }

        if let Some(parent) = ctx.index.find(aws::ELB, lb_name) {
            return ctx.adopt(record, parent);
        }
        if item.region.is_empty() || item.aws_account_id.is_empty() {
            return 0;
        }
        let arn = elb_v2_arn(&item.region, &item.aws_account_id, lb_name);
        match ctx
            .index
            .get(aws::ELB_V2, &arn)
            .or_else(|| ctx.index.get_by_arn(aws::ELB_V2, &arn))
        {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

/// `arn:aws:elasticloadbalancing:<region>:<account>:loadbalancer/<name>`
pub(crate) fn elb_v2_arn(region: &str, account: &str, name: &str) -> String {
    format!(
        "{}:{}:{}:loadbalancer/{}",
        aws::ELB_ARN_PREFIX,
        region,
        account,
        name
    )
}

/// Lambda hyperplane ENIs: `AWS Lambda VPC ENI-<function>-<uuid>`.
pub struct LambdaInterfaces;

impl OwnershipRule for LambdaInterfaces {
    fn name(&self) -> &'static str {
        "lambda-interfaces"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ENI
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let config = &item.configuration;
        if config.interface_type != aws::LAMBDA_INTERFACE_TYPE {
            return 0;
        }
        let Some(rest) = config.description.strip_prefix(aws::LAMBDA_PREFIX) else {
            return 0;
        };
        let function = strip_uuid_suffix(rest);
        match ctx.index.find(aws::LAMBDA, function) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

/// Drop a trailing `-<uuid>` that Lambda appends to ENI descriptions.
pub(crate) fn strip_uuid_suffix(name: &str) -> &str {
    if name.len() <= UUID_LEN {
        return name;
    }
    let split = name.len() - UUID_LEN;
    if !name.is_char_boundary(split) {
        return name;
    }
    let (head, tail) = name.split_at(split);
    if Uuid::parse_str(tail).is_err() {
        return name;
    }
    head.strip_suffix('-').unwrap_or(head)
}

/// ENIs whose description is a fixed prefix followed by the owner's ID.
pub struct DescriptionPrefixInterfaces {
    name: &'static str,
    interface_type: Option<&'static str>,
    prefix: &'static str,
    parent_type: &'static str,
}

impl DescriptionPrefixInterfaces {
    /// `Interface for NAT Gateway nat-...`
    pub fn nat_gateway() -> Self {
        Self {
            name: "nat-gateway-interfaces",
            interface_type: Some(aws::NAT_GATEWAY_INTERFACE_TYPE),
            prefix: aws::NAT_GATEWAY_PREFIX,
            parent_type: aws::NAT_GATEWAY,
        }
    }

    /// `ElastiCache <cluster-id>`
    pub fn elasticache() -> Self {
        Self {
            name: "elasticache-interfaces",
            interface_type: None,
            prefix: aws::ELASTICACHE_PREFIX,
            parent_type: aws::ELASTICACHE_CLUSTER,
        }
    }

    /// `Network Interface for Transit Gateway Attachment tgw-attach-...`
    pub fn transit_gateway() -> Self {
        Self {
            name: "transit-gateway-interfaces",
            interface_type: Some(aws::TRANSIT_GATEWAY_INTERFACE_TYPE),
            prefix: aws::TRANSIT_GATEWAY_PREFIX,
            parent_type: aws::TRANSIT_GATEWAY_ATTACHMENT,
        }
    }
}

impl OwnershipRule for DescriptionPrefixInterfaces {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::ENI
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let config = &item.configuration;
        if let Some(expected) = self.interface_type {
            if config.interface_type != expected {
                return 0;
            }
        }
        let Some(owner) = config.description.strip_prefix(self.prefix) else {
            return 0;
        };
        match ctx.index.find(self.parent_type, owner) {
            Some(parent) => ctx.adopt(record, parent),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_uuid_suffix() {
        assert_eq!(
            strip_uuid_suffix("my-func-0b3c2b5e-9d1a-4c1e-8f4e-1b2c3d4e5f60"),
            "my-func"
        );
        assert_eq!(strip_uuid_suffix("my-func"), "my-func");
        assert_eq!(
            strip_uuid_suffix("my-function-name-that-is-long-enough-xyz"),
            "my-function-name-that-is-long-enough-xyz"
        );
        // exactly a uuid, nothing in front of it: left alone
        assert_eq!(
            strip_uuid_suffix("0b3c2b5e-9d1a-4c1e-8f4e-1b2c3d4e5f60"),
            "0b3c2b5e-9d1a-4c1e-8f4e-1b2c3d4e5f60"
        );
    }

    #[test]
    fn test_elb_v2_arn() {
        assert_eq!(
            elb_v2_arn("eu-west-1", "111122223333", "net/my-nlb/50dc6c495c0c9188"),
            "arn:aws:elasticloadbalancing:eu-west-1:111122223333:loadbalancer/net/my-nlb/50dc6c495c0c9188"
        );
    }
}
