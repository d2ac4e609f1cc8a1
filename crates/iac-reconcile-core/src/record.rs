//! Reconciled records: one per resource, whichever source saw it first.

use std::fmt;

use iac_load::ConfigurationItem;
use serde::{Deserialize, Serialize};

/// Stable handle to a record inside an [`crate::IdentityIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub(crate) usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a record was seen, as used by presentation and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Present in the AWS Config snapshot.
    Config,
    /// Declared in a Terraform state file.
    Terraform,
    /// Declared, or owned by something else.
    Owned,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Config, Source::Terraform, Source::Owned];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Config => "config",
            Source::Terraform => "terraform",
            Source::Owned => "owned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "config" => Some(Source::Config),
            "terraform" => Some(Source::Terraform),
            "owned" => Some(Source::Owned),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource as known to the reconciler.
///
/// # Invariants
///
/// - `parent` is assigned at most once and never points at the record
///   itself or at one of its descendants.
/// - A record with neither source flag set is ephemeral: a placeholder made
///   while resolving some other resource's relationship.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledRecord {
    pub resource_type: String,
    pub resource_id: String,
    pub resource_name: String,
    pub arn: String,
    #[serde(skip)]
    pub(crate) item: Option<ConfigurationItem>,
    pub(crate) in_inventory: bool,
    pub(crate) in_declarative_state: bool,
    pub(crate) parent: Option<RecordId>,
    pub(crate) type_is_mapped: bool,
}

impl ReconciledRecord {
    /// A bare record with only type and identity populated.
    pub(crate) fn placeholder(resource_type: &str, key: &str, type_is_mapped: bool) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            resource_id: key.to_string(),
            resource_name: String::new(),
            arn: String::new(),
            item: None,
            in_inventory: false,
            in_declarative_state: false,
            parent: None,
            type_is_mapped,
        }
    }

    pub(crate) fn from_item(item: &ConfigurationItem, type_is_mapped: bool) -> Self {
        Self {
            resource_type: item.resource_type.clone(),
            resource_id: item.resource_id.clone(),
            resource_name: item.resource_name.clone(),
            arn: item.arn.clone(),
            item: Some(item.clone()),
            in_inventory: true,
            in_declarative_state: false,
            parent: None,
            type_is_mapped,
        }
    }

    /// Primary key: the ID, or the ARN when there is no ID.
    pub fn key(&self) -> &str {
        if self.resource_id.is_empty() {
            &self.arn
        } else {
            &self.resource_id
        }
    }

    /// The wrapped AWS Config item, when the snapshot reported this resource.
    pub fn item(&self) -> Option<&ConfigurationItem> {
        self.item.as_ref()
    }

    pub fn in_inventory(&self) -> bool {
        self.in_inventory
    }

    pub fn in_declarative_state(&self) -> bool {
        self.in_declarative_state
    }

    pub fn parent(&self) -> Option<RecordId> {
        self.parent
    }

    pub fn type_is_mapped(&self) -> bool {
        self.type_is_mapped
    }

    /// Managed directly by Terraform, or indirectly through a parent.
    pub fn owned(&self) -> bool {
        self.in_declarative_state || self.parent.is_some()
    }

    /// Seen in neither source.
    pub fn ephemeral(&self) -> bool {
        !self.in_inventory && !self.in_declarative_state
    }

    pub fn source(&self, source: Source) -> bool {
        match source {
            Source::Config => self.in_inventory,
            Source::Terraform => self.in_declarative_state,
            Source::Owned => self.owned(),
        }
    }
}
