//! Service-linked IAM roles.

use iac_load::ConfigurationItem;

use super::{OwnershipRule, RuleContext};
use crate::aws;
use crate::record::RecordId;

/// Roles under `/aws-service-role/<service>/` are created and deleted by the
/// AWS service itself. Each is attached to a synthetic `AWS::Service`
/// record, one per service, shared by all of that service's roles.
pub struct ServiceLinkedRoles;

impl OwnershipRule for ServiceLinkedRoles {
    fn name(&self) -> &'static str {
        "service-linked-roles"
    }

    fn matches(&self, resource_type: &str) -> bool {
        resource_type == aws::IAM_ROLE
    }

    fn infer(
        &self,
        item: &ConfigurationItem,
        record: RecordId,
        ctx: &mut RuleContext<'_, '_>,
    ) -> usize {
        let Some(service) = service_name(&item.configuration.path) else {
            return 0;
        };
        let parent = ctx.index.get_or_create(aws::SERVICE, service);
        ctx.adopt(record, parent)
    }
}

fn service_name(path: &str) -> Option<&str> {
    let service = path.strip_prefix(aws::SERVICE_LINKED_ROLE_PATH_PREFIX)?;
    let service = service.strip_suffix('/').unwrap_or(service);
    (!service.is_empty()).then_some(service)
}
