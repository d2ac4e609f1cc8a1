//! Terraform state documents.
//!
//! Only the v4 state layout is modelled. Instance attributes are left as raw
//! JSON because their shape is defined by each provider, not by Terraform;
//! the typed accessors on [`Instance`] never fail, they return empty values
//! when an attribute is absent or has an unexpected type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mode of resources that Terraform creates and manages.
pub const MANAGED: &str = "managed";

/// A full `.tfstate` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerraformState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub terraform_version: String,
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub lineage: String,
    #[serde(default)]
    pub outputs: BTreeMap<String, Value>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// One `resource` or `data` block, possibly expanded into several instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default, rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl Resource {
    pub fn is_managed(&self) -> bool {
        self.mode == MANAGED
    }

    /// Address as Terraform prints it, e.g. `module.net.aws_vpc.main`.
    pub fn address(&self) -> String {
        if self.module.is_empty() {
            format!("{}.{}", self.resource_type, self.name)
        } else {
            format!("{}.{}.{}", self.module, self.resource_type, self.name)
        }
    }
}

/// A single managed object created from a resource block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub index_key: Option<Value>,
}

impl Instance {
    /// String attribute; empty when absent, null or not a string.
    pub fn str_attr(&self, name: &str) -> &str {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Integer attribute. Terraform writes numbers as JSON floats in some
    /// providers and as numeric strings in others; both are accepted.
    pub fn i64_attr(&self, name: &str) -> Option<i64> {
        match self.attributes.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Boolean attribute; `false` when absent.
    pub fn bool_attr(&self, name: &str) -> bool {
        match self.attributes.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    /// List-of-strings attribute; non-string entries are dropped.
    pub fn str_list_attr(&self, name: &str) -> Vec<String> {
        self.attributes
            .get(name)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
