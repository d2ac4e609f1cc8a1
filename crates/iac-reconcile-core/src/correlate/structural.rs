//! Structural matching for sub-resources with no identity of their own.
//!
//! Security group rules, routes, NACL entries, role policy attachments and
//! ASG attachments are Terraform resources, but AWS Config only reports them
//! as part of their container's configuration. A declared instance matches
//! when its container is in the inventory and one of the container's
//! entries carries the same field values.

use iac_load::{Instance, IpPermission};

use crate::aws;
use crate::index::IdentityIndex;
use crate::record::RecordId;

const INGRESS: &str = "ingress";
const EGRESS: &str = "egress";

/// Terraform types resolved against their container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubResource {
    SecurityGroupRule,
    Route,
    NetworkAclEntry,
    RolePolicyAttachment,
    AsgAttachment,
    /// Not tracked by AWS Config at all.
    Route53Record,
}

/// Result of a structural lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StructuralMatch {
    /// A matching entry exists; `container` is the record holding it.
    Found { container: Option<RecordId> },
    NotFound,
    /// Security group rule with an unusable `type`.
    UnknownDirection(String),
}

impl SubResource {
    /// Canonical type is either the inventory type (when the Terraform type
    /// is mapped) or the Terraform type itself.
    pub(crate) fn classify(canonical: &str) -> Option<Self> {
        match canonical {
            aws::TF_SECURITY_GROUP_RULE => Some(Self::SecurityGroupRule),
            aws::TF_ROUTE | aws::ROUTE => Some(Self::Route),
            aws::TF_NETWORK_ACL_RULE | aws::NETWORK_ACL_ENTRY => Some(Self::NetworkAclEntry),
            aws::TF_ROLE_POLICY_ATTACHMENT => Some(Self::RolePolicyAttachment),
            aws::TF_ASG_ATTACHMENT => Some(Self::AsgAttachment),
            aws::TF_ROUTE53_RECORD | aws::ROUTE53_RECORD_SET => Some(Self::Route53Record),
            _ => None,
        }
    }

    pub(crate) fn resolve(self, instance: &Instance, index: &IdentityIndex<'_>) -> StructuralMatch {
        match self {
            Self::SecurityGroupRule => security_group_rule(instance, index),
            Self::Route => route(instance, index),
            Self::NetworkAclEntry => network_acl_entry(instance, index),
            Self::RolePolicyAttachment => role_policy_attachment(instance, index),
            Self::AsgAttachment => asg_attachment(instance, index),
            Self::Route53Record => StructuralMatch::Found { container: None },
        }
    }
}

fn found_if(container: RecordId, matched: bool) -> StructuralMatch {
    if matched {
        StructuralMatch::Found {
            container: Some(container),
        }
    } else {
        StructuralMatch::NotFound
    }
}

/// Declared shape of an `aws_security_group_rule`.
struct DeclaredRule<'a> {
    from_port: i64,
    to_port: i64,
    protocol: &'a str,
    description: &'a str,
    peer_group: &'a str,
    ipv4: Vec<String>,
    ipv6: Vec<String>,
}

impl DeclaredRule<'_> {
    fn matches(&self, permission: &IpPermission) -> bool {
        if permission.from_port.unwrap_or(0) != self.from_port
            || permission.to_port.unwrap_or(0) != self.to_port
            || permission.ip_protocol != self.protocol
        {
            return false;
        }
        let group_match = !self.peer_group.is_empty()
            && permission
                .user_id_group_pairs
                .iter()
                .any(|p| p.group_id == self.peer_group && p.description == self.description);
        group_match || self.cidrs_covered(permission)
    }

    /// Every declared range must appear in the permission with the same
    /// description. Partial coverage is a miss.
    fn cidrs_covered(&self, permission: &IpPermission) -> bool {
        if self.ipv4.is_empty() && self.ipv6.is_empty() {
            return false;
        }
        let v4 = self.ipv4.iter().all(|cidr| {
            permission
                .ipv4_ranges
                .iter()
                .any(|r| &r.cidr_ip == cidr && r.description == self.description)
        });
        let v6 = self.ipv6.iter().all(|cidr| {
            permission
                .ipv6_ranges
                .iter()
                .any(|r| &r.cidr_ipv6 == cidr && r.description == self.description)
        });
        v4 && v6
    }
}

fn security_group_rule(instance: &Instance, index: &IdentityIndex<'_>) -> StructuralMatch {
    let direction = instance.str_attr("type");
    if direction != INGRESS && direction != EGRESS {
        return StructuralMatch::UnknownDirection(direction.to_string());
    }
    let group_id = instance.str_attr("security_group_id");
    let Some(group) = index.find(aws::SECURITY_GROUP, group_id) else {
        return StructuralMatch::NotFound;
    };
    let Some(item) = index.record(group).item() else {
        return StructuralMatch::NotFound;
    };

    let peer_group = if instance.bool_attr("self") {
        group_id
    } else {
        instance.str_attr("source_security_group_id")
    };
    let declared = DeclaredRule {
        from_port: instance.i64_attr("from_port").unwrap_or(0),
        to_port: instance.i64_attr("to_port").unwrap_or(0),
        protocol: instance.str_attr("protocol"),
        description: instance.str_attr("description"),
        peer_group,
        ipv4: instance.str_list_attr("cidr_blocks"),
        ipv6: instance.str_list_attr("ipv6_cidr_blocks"),
    };

    let permissions = if direction == INGRESS {
        &item.configuration.ip_permissions
    } else {
        &item.configuration.ip_permissions_egress
    };
    found_if(group, permissions.iter().any(|p| declared.matches(p)))
}

fn route(instance: &Instance, index: &IdentityIndex<'_>) -> StructuralMatch {
    let Some(table) = index.find(aws::ROUTE_TABLE, instance.str_attr("route_table_id")) else {
        return StructuralMatch::NotFound;
    };
    let Some(item) = index.record(table).item() else {
        return StructuralMatch::NotFound;
    };
    let matched = item.configuration.routes.iter().any(|r| {
        r.destination_cidr_block == instance.str_attr("destination_cidr_block")
            && r.origin == instance.str_attr("origin")
            && r.vpc_peering_connection_id == instance.str_attr("vpc_peering_connection_id")
            && r.gateway_id == instance.str_attr("gateway_id")
            && r.nat_gateway_id == instance.str_attr("nat_gateway_id")
    });
    found_if(table, matched)
}

fn network_acl_entry(instance: &Instance, index: &IdentityIndex<'_>) -> StructuralMatch {
    let Some(acl) = index.find(aws::NETWORK_ACL, instance.str_attr("network_acl_id")) else {
        return StructuralMatch::NotFound;
    };
    let Some(item) = index.record(acl).item() else {
        return StructuralMatch::NotFound;
    };
    let rule_number = instance.i64_attr("rule_number");
    let matched = item.configuration.entries.iter().any(|e| {
        e.cidr_block == instance.str_attr("cidr_block")
            && e.egress == instance.bool_attr("egress")
            && e.protocol == instance.str_attr("protocol")
            && e.rule_action == instance.str_attr("rule_action")
            && Some(e.rule_number) == rule_number
    });
    found_if(acl, matched)
}

fn role_policy_attachment(instance: &Instance, index: &IdentityIndex<'_>) -> StructuralMatch {
    let role_ref = instance.str_attr("role");
    let Some(role) = index.find(aws::IAM_ROLE, role_ref) else {
        return StructuralMatch::NotFound;
    };
    let Some(policy) = index.get_by_arn(aws::IAM_POLICY, instance.str_attr("policy_arn")) else {
        return StructuralMatch::NotFound;
    };
    let Some(item) = index.record(policy).item() else {
        return StructuralMatch::NotFound;
    };
    let role_id = &index.record(role).resource_id;
    let matched = item.relationships.iter().any(|rel| {
        rel.resource_type == aws::IAM_ROLE
            && rel.name.trim() == aws::REL_ATTACHED_TO_ROLE
            && (rel.resource_id == role_ref || &rel.resource_id == role_id)
    });
    found_if(policy, matched)
}

fn asg_attachment(instance: &Instance, index: &IdentityIndex<'_>) -> StructuralMatch {
    let Some(asg) = index.find(aws::ASG, instance.str_attr("autoscaling_group_name")) else {
        return StructuralMatch::NotFound;
    };
    let Some(item) = index.record(asg).item() else {
        return StructuralMatch::NotFound;
    };
    let declared: Vec<&str> = ["alb_target_group_arn", "lb_target_group_arn"]
        .into_iter()
        .map(|name| instance.str_attr(name))
        .filter(|arn| !arn.is_empty())
        .collect();
    let matched = item
        .configuration
        .target_group_arns
        .iter()
        .any(|tg| declared.contains(&tg.as_str()));
    found_if(asg, matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iac_load::{Ipv4Range, UserIdGroupPair};

    fn permission(from: i64, to: i64, protocol: &str) -> IpPermission {
        IpPermission {
            from_port: Some(from),
            to_port: Some(to),
            ip_protocol: protocol.to_string(),
            ..Default::default()
        }
    }

    fn rule<'a>(peer_group: &'a str, ipv4: &[&str]) -> DeclaredRule<'a> {
        DeclaredRule {
            from_port: 443,
            to_port: 443,
            protocol: "tcp",
            description: "",
            peer_group,
            ipv4: ipv4.iter().map(|s| s.to_string()).collect(),
            ipv6: Vec::new(),
        }
    }

    #[test]
    fn test_classify_accepts_both_vocabularies() {
        assert_eq!(SubResource::classify("aws_route"), Some(SubResource::Route));
        assert_eq!(SubResource::classify("AWS::EC2::Route"), Some(SubResource::Route));
        assert_eq!(
            SubResource::classify("AWS::Route53::RecordSet"),
            Some(SubResource::Route53Record)
        );
        assert_eq!(SubResource::classify("AWS::EC2::VPC"), None);
    }

    #[test]
    fn test_group_pair_match_needs_same_description() {
        let mut perm = permission(443, 443, "tcp");
        perm.user_id_group_pairs.push(UserIdGroupPair {
            group_id: "sg-peer".to_string(),
            description: "from lb".to_string(),
        });
        assert!(!rule("sg-peer", &[]).matches(&perm));

        let mut declared = rule("sg-peer", &[]);
        declared.description = "from lb";
        assert!(declared.matches(&perm));
    }

    #[test]
    fn test_missing_ports_compare_as_zero() {
        let perm = IpPermission {
            ip_protocol: "-1".to_string(),
            ipv4_ranges: vec![Ipv4Range {
                cidr_ip: "10.0.0.0/8".to_string(),
                description: String::new(),
            }],
            ..Default::default()
        };
        let declared = DeclaredRule {
            from_port: 0,
            to_port: 0,
            protocol: "-1",
            description: "",
            peer_group: "",
            ipv4: vec!["10.0.0.0/8".to_string()],
            ipv6: Vec::new(),
        };
        assert!(declared.matches(&perm));
    }

    #[test]
    fn test_no_peer_declared_never_matches() {
        let perm = permission(443, 443, "tcp");
        assert!(!rule("", &[]).matches(&perm));
    }
}
