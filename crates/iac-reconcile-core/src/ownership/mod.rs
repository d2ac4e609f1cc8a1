//! Ownership inference.
//!
//! Many resources exist only as side effects of another resource: the ENIs a
//! load balancer creates, the volumes attached to an instance, everything a
//! CloudFormation stack contains. Neither source says so directly; each
//! [`OwnershipRule`] recognises one such pattern and assigns a parent.
//!
//! The [`OwnershipEngine`] runs its rules in a fixed order, each rule over the
//! whole inventory before the next starts. A record's parent is assigned at
//! most once, so earlier rules take precedence over later ones regardless of
//! the order items appear in the snapshot.
//!
//! Rules never fail. Missing or unresolvable ownership data simply leaves the
//! record without a parent.

mod cluster;
mod compute;
mod containment;
mod iam;
mod interfaces;
mod network;

use iac_load::ConfigurationItem;

use crate::aws;
use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::index::IdentityIndex;
use crate::obs::emit_rule_applied;
use crate::record::RecordId;

pub use cluster::{ClusterTaggedResources, ElbV2ClusterTag};
pub use compute::{AsgInstances, ElbAlarms, FleetLaunchTemplates, RdsClusterSnapshots, VolumeOwners};
pub use containment::StackContainment;
pub use iam::ServiceLinkedRoles;
pub use interfaces::{
    DescriptionPrefixInterfaces, EksManagedInterfaces, LambdaInterfaces, LoadBalancerInterfaces,
    NodeInterfaces, RdsInterfaces,
};
pub use network::{InstanceInterfaces, RouteTableAssociations, VpcEndpointInterfaces};

/// Mutable state a rule works against.
pub struct RuleContext<'a, 't> {
    pub index: &'a mut IdentityIndex<'t>,
    pub(crate) diagnostics: &'a mut Diagnostics,
}

impl<'a, 't> RuleContext<'a, 't> {
    /// Record a non-fatal data defect.
    pub fn report(&mut self, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(kind, message);
    }

    /// Assign `parent` to `child`; returns 1 if the assignment took effect,
    /// for tallying.
    pub fn adopt(&mut self, child: RecordId, parent: RecordId) -> usize {
        usize::from(self.index.assign_parent(child, parent))
    }
}

/// One ownership heuristic.
pub trait OwnershipRule {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether items of `resource_type` are inspected by this rule.
    fn matches(&self, resource_type: &str) -> bool;

    /// Inspect one inventory item (already indexed as `record`) and assign
    /// parents. Returns the number of assignments made.
    fn infer(&self, item: &ConfigurationItem, record: RecordId, ctx: &mut RuleContext<'_, '_>)
        -> usize;
}

/// Ordered registry of ownership rules.
pub struct OwnershipEngine {
    rules: Vec<Box<dyn OwnershipRule>>,
}

impl OwnershipEngine {
    /// No rules at all.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The full rule set, in precedence order.
    ///
    /// Containment comes first: if a stack declares a resource, the stack
    /// owns it even when a heuristic would also match.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(StackContainment)
            .with_rule(RouteTableAssociations)
            .with_rule(EksManagedInterfaces)
            .with_rule(NodeInterfaces)
            .with_rule(InstanceInterfaces)
            .with_rule(VpcEndpointInterfaces)
            .with_rule(RdsInterfaces)
            .with_rule(LoadBalancerInterfaces)
            .with_rule(LambdaInterfaces)
            .with_rule(DescriptionPrefixInterfaces::nat_gateway())
            .with_rule(DescriptionPrefixInterfaces::elasticache())
            .with_rule(DescriptionPrefixInterfaces::transit_gateway())
            .with_rule(VolumeOwners)
            .with_rule(AsgInstances)
            .with_rule(ElbAlarms)
            .with_rule(FleetLaunchTemplates)
            .with_rule(ClusterTaggedResources)
            .with_rule(ElbV2ClusterTag)
            .with_rule(ServiceLinkedRoles)
            .with_rule(RdsClusterSnapshots)
    }

    /// Append a rule (builder pattern). It runs after every rule already added.
    pub fn with_rule(mut self, rule: impl OwnershipRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule to every matching inventory item.
    pub fn run(&self, inventory: &[(RecordId, &ConfigurationItem)], ctx: &mut RuleContext<'_, '_>) {
        for rule in &self.rules {
            let mut assigned = 0;
            for (record, item) in inventory {
                if rule.matches(&item.resource_type) {
                    assigned += rule.infer(item, *record, ctx);
                }
            }
            emit_rule_applied(rule.name(), assigned);
        }
    }
}

impl Default for OwnershipEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Cluster name from a `kubernetes.io/cluster/<name> = owned` tag.
pub(crate) fn owning_cluster(item: &ConfigurationItem) -> Option<&str> {
    item.tags.iter().find_map(|(name, value)| {
        if value != aws::OWNED {
            return None;
        }
        name.strip_prefix(aws::EKS_CLUSTER_OWNER_TAG_PREFIX)
            .filter(|cluster| !cluster.is_empty())
    })
}
