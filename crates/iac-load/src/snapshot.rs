//! AWS Config snapshot documents.
//!
//! A snapshot is the authoritative listing of what exists in an account at a
//! point in time. Only the fields the reconciler reads are modelled; anything
//! else in the `configuration` payload is ignored on decode.
//!
//! AWS Config freely emits `null` where a list, map or string is expected, so
//! every optional field goes through [`null_default`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Decodes `null` (or a missing field, with `#[serde(default)]`) as `T::default()`.
mod null_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        let value = Option::<T>::deserialize(deserializer)?;
        Ok(value.unwrap_or_default())
    }
}

/// Top-level snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Format/version tag; carried but never interpreted.
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub file_version: String,
    #[serde(
        default,
        rename = "configSnapshotId",
        deserialize_with = "null_default::deserialize"
    )]
    pub config_snapshot_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub configuration_items: Vec<ConfigurationItem>,
}

/// One resource as reported by the inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_name: String,
    #[serde(default, rename = "ARN", deserialize_with = "null_default::deserialize")]
    pub arn: String,
    #[serde(
        default,
        rename = "awsRegion",
        deserialize_with = "null_default::deserialize"
    )]
    pub region: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub availability_zone: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub aws_account_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub configuration_item_status: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub relationships: Vec<Relationship>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub configuration: Configuration,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub supplementary_configuration: SupplementaryConfiguration,
}

impl ConfigurationItem {
    /// Primary identity key: the resource ID, or the ARN when there is no ID.
    pub fn key(&self) -> &str {
        if self.resource_id.is_empty() {
            &self.arn
        } else {
            &self.resource_id
        }
    }

    /// Value of a tag, if present.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

/// A directed edge from one configuration item to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_name: String,
    /// Relationship label, e.g. `Contains` or `Is attached to Instance`.
    #[serde(
        default,
        alias = "relationshipName",
        deserialize_with = "null_default::deserialize"
    )]
    pub name: String,
}

impl Relationship {
    /// The ID if present, otherwise the name.
    pub fn key(&self) -> &str {
        if self.resource_id.is_empty() {
            &self.resource_name
        } else {
            &self.resource_id
        }
    }
}

/// Type-specific configuration payload.
///
/// A single flattened struct covers every resource type; fields that do not
/// apply to a given type simply decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    // route tables
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub associations: Vec<RouteTableAssociation>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub routes: Vec<Route>,

    // network interfaces
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub interface_type: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub association: InterfaceAssociation,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub attachment: InterfaceAttachment,

    // vpc endpoints
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub network_interface_ids: Vec<String>,

    // security groups
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ip_permissions: Vec<IpPermission>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ip_permissions_egress: Vec<IpPermission>,

    // network acls
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub entries: Vec<NetworkAclEntry>,

    // auto scaling groups
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub instances: Vec<AsgInstance>,
    #[serde(
        default,
        rename = "targetGroupARNs",
        deserialize_with = "null_default::deserialize"
    )]
    pub target_group_arns: Vec<String>,

    // cloudwatch alarms
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub namespace: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub dimensions: Vec<Dimension>,

    // ec2 fleets
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub launch_template_configs: Vec<LaunchTemplateConfig>,

    // iam roles
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub path: String,

    // rds cluster snapshots
    #[serde(
        default,
        rename = "dBClusterIdentifier",
        alias = "dbClusterIdentifier",
        deserialize_with = "null_default::deserialize"
    )]
    pub db_cluster_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTableAssociation {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub route_table_association_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub subnet_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub main: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub destination_cidr_block: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub origin: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub vpc_peering_connection_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub gateway_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub nat_gateway_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceAssociation {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ip_owner_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceAttachment {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub instance_owner_id: String,
}

/// One ingress or egress permission of a security group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpPermission {
    /// Absent for "all traffic" permissions.
    #[serde(default)]
    pub from_port: Option<i64>,
    #[serde(default)]
    pub to_port: Option<i64>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ip_protocol: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub user_id_group_pairs: Vec<UserIdGroupPair>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ipv4_ranges: Vec<Ipv4Range>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub ipv6_ranges: Vec<Ipv6Range>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdGroupPair {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub group_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4Range {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub cidr_ip: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6Range {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub cidr_ipv6: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAclEntry {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub cidr_block: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub egress: bool,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub protocol: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub rule_action: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub rule_number: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsgInstance {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub instance_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchTemplateConfig {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub launch_template_specification: LaunchTemplateSpecification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchTemplateSpecification {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub launch_template_id: String,
}

/// Extra data AWS Config attaches outside the main configuration payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementaryConfiguration {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub unsupported_resources: Vec<UnsupportedResource>,
}

/// A stack-owned resource whose type AWS Config does not record natively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedResource {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub resource_id: String,
}
