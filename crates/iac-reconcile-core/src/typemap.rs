//! Bidirectional translation between Terraform and AWS Config type names.
//!
//! The table is a JSON object of `terraform_type -> AWS::Config::Type`. A
//! default table is compiled into the crate; callers may supply their own.
//! The translator is built once and then only read, so a shared reference
//! can be used from any number of threads.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{ReconcileError, Result};

const DEFAULT_TABLE: &str = include_str!("typemap.json");

/// Read-only type translator.
#[derive(Debug, Clone)]
pub struct TypeMap {
    to_inventory: BTreeMap<String, String>,
    to_declarative: HashMap<String, String>,
}

impl TypeMap {
    /// The built-in table.
    ///
    /// The embedded table is validated by the test suite, so failure here
    /// means the crate itself was built from a broken table.
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_TABLE)
    }

    /// Build a translator from a JSON table.
    ///
    /// Rejects empty names and tables where two Terraform types map onto the
    /// same AWS Config type, since the reverse direction would be ambiguous.
    pub fn from_json(json: &str) -> Result<Self> {
        let to_inventory: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut to_declarative = HashMap::with_capacity(to_inventory.len());

        for (declarative, inventory) in &to_inventory {
            if declarative.trim().is_empty() || inventory.trim().is_empty() {
                return Err(ReconcileError::TypeMap(format!(
                    "empty type name in mapping {declarative:?} -> {inventory:?}"
                )));
            }
            if let Some(previous) = to_declarative.insert(inventory.clone(), declarative.clone()) {
                return Err(ReconcileError::TypeMap(format!(
                    "inventory type {inventory} is mapped from both {previous} and {declarative}"
                )));
            }
        }

        Ok(Self {
            to_inventory,
            to_declarative,
        })
    }

    /// Build a translator from a JSON table on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ReconcileError::TypeMapIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Translate a Terraform type to its AWS Config type.
    ///
    /// Unmapped types come back unchanged with `mapped == false`.
    pub fn to_inventory_type<'a>(&'a self, declarative: &'a str) -> (&'a str, bool) {
        match self.to_inventory.get(declarative) {
            Some(inventory) => (inventory.as_str(), true),
            None => (declarative, false),
        }
    }

    /// Translate an AWS Config type to its Terraform type.
    pub fn to_declarative_type<'a>(&'a self, inventory: &'a str) -> (&'a str, bool) {
        match self.to_declarative.get(inventory) {
            Some(declarative) => (declarative.as_str(), true),
            None => (inventory, false),
        }
    }

    /// Whether an AWS Config type has a Terraform counterpart.
    pub fn is_mapped_inventory_type(&self, inventory: &str) -> bool {
        self.to_declarative.contains_key(inventory)
    }

    pub fn len(&self) -> usize {
        self.to_inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_inventory.is_empty()
    }

    /// `(terraform, aws_config)` pairs in Terraform-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.to_inventory
            .iter()
            .map(|(d, i)| (d.as_str(), i.as_str()))
    }
}
