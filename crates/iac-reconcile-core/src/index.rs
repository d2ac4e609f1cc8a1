//! Identity index: an arena of [`ReconciledRecord`]s plus three lookup
//! tables keyed by resource type.
//!
//! - by key: `resourceId`, or the ARN when there is no ID
//! - by name: `resourceName`; CloudFormation and Beanstalk refer to some
//!   resources by name while calling it an ID
//! - by ARN: for callers that hold an ARN for a type keyed by ID
//!
//! All three tables hold [`RecordId`] handles into the same arena, so a
//! record found through any of them is the same record. Secondary bindings
//! are first-wins: once a name or ARN points at a record it is never rebound.

use std::collections::HashMap;

use iac_load::ConfigurationItem;
use tracing::debug;

use crate::record::{ReconciledRecord, RecordId};
use crate::typemap::TypeMap;

type Table = HashMap<String, HashMap<String, RecordId>>;

#[derive(Debug)]
pub struct IdentityIndex<'t> {
    types: &'t TypeMap,
    records: Vec<ReconciledRecord>,
    by_key: Table,
    by_name: Table,
    by_arn: Table,
}

impl<'t> IdentityIndex<'t> {
    pub fn new(types: &'t TypeMap) -> Self {
        Self {
            types,
            records: Vec::new(),
            by_key: Table::new(),
            by_name: Table::new(),
            by_arn: Table::new(),
        }
    }

    pub fn types(&self) -> &'t TypeMap {
        self.types
    }

    /// Register an inventory item, or mark an existing record with the same
    /// key as seen in the inventory. Returns `None` when the item has neither
    /// an ID nor an ARN.
    pub fn insert_inventory(&mut self, item: &ConfigurationItem) -> Option<RecordId> {
        let key = item.key();
        if key.is_empty() {
            return None;
        }
        if let Some(id) = self.get(&item.resource_type, key) {
            let record = &mut self.records[id.0];
            record.in_inventory = true;
            if record.item.is_none() {
                record.item = Some(item.clone());
                if record.resource_name.is_empty() {
                    record.resource_name = item.resource_name.clone();
                }
                if record.arn.is_empty() {
                    record.arn = item.arn.clone();
                }
            }
            self.register_secondary(id);
            return Some(id);
        }

        let mapped = self.types.is_mapped_inventory_type(&item.resource_type);
        Some(self.insert(ReconciledRecord::from_item(item, mapped)))
    }

    /// Add a record to the arena and bind it in every table for which it has
    /// a non-empty field. The primary key binding is overwritten; secondary
    /// bindings are first-wins.
    pub fn insert(&mut self, record: ReconciledRecord) -> RecordId {
        let id = RecordId(self.records.len());
        let resource_type = record.resource_type.clone();
        let key = record.key().to_string();
        self.records.push(record);
        if !key.is_empty() {
            self.by_key
                .entry(resource_type)
                .or_default()
                .insert(key, id);
        }
        self.register_secondary(id);
        id
    }

    fn register_secondary(&mut self, id: RecordId) {
        let record = &self.records[id.0];
        if !record.resource_name.is_empty() {
            self.by_name
                .entry(record.resource_type.clone())
                .or_default()
                .entry(record.resource_name.clone())
                .or_insert(id);
        }
        if !record.arn.is_empty() {
            self.by_arn
                .entry(record.resource_type.clone())
                .or_default()
                .entry(record.arn.clone())
                .or_insert(id);
        }
    }

    /// Find by primary key, creating a placeholder when absent.
    pub fn get_or_create(&mut self, resource_type: &str, key: &str) -> RecordId {
        if let Some(id) = self.get(resource_type, key) {
            return id;
        }
        let mapped = self.types.is_mapped_inventory_type(resource_type);
        debug!(resource_type, key, "creating placeholder record");
        self.insert(ReconciledRecord::placeholder(resource_type, key, mapped))
    }

    /// Find by key or name, creating a placeholder known only by `name` when
    /// absent. The placeholder is bound by name as well as by key, so a later
    /// declaration with a different ID still resolves to it by name.
    pub fn get_or_create_named(&mut self, resource_type: &str, name: &str) -> RecordId {
        if let Some(id) = self.find(resource_type, name) {
            return id;
        }
        let mapped = self.types.is_mapped_inventory_type(resource_type);
        debug!(resource_type, name, "creating named placeholder record");
        let mut record = ReconciledRecord::placeholder(resource_type, name, mapped);
        record.resource_name = name.to_string();
        self.insert(record)
    }

    /// Pure lookup by primary key.
    pub fn get(&self, resource_type: &str, key: &str) -> Option<RecordId> {
        lookup(&self.by_key, resource_type, key)
    }

    pub fn get_by_name(&self, resource_type: &str, name: &str) -> Option<RecordId> {
        lookup(&self.by_name, resource_type, name)
    }

    pub fn get_by_arn(&self, resource_type: &str, arn: &str) -> Option<RecordId> {
        lookup(&self.by_arn, resource_type, arn)
    }

    /// Primary key first, then name.
    pub fn find(&self, resource_type: &str, key_or_name: &str) -> Option<RecordId> {
        self.get(resource_type, key_or_name)
            .or_else(|| self.get_by_name(resource_type, key_or_name))
    }

    pub fn record(&self, id: RecordId) -> &ReconciledRecord {
        &self.records[id.0]
    }

    pub(crate) fn record_mut(&mut self, id: RecordId) -> &mut ReconciledRecord {
        &mut self.records[id.0]
    }

    /// Set `child`'s parent.
    ///
    /// Returns `false` and leaves the record alone if it already has a parent,
    /// if `child == parent`, or if `parent` is a descendant of `child`.
    pub fn assign_parent(&mut self, child: RecordId, parent: RecordId) -> bool {
        if child == parent {
            return false;
        }
        if let Some(existing) = self.records[child.0].parent {
            debug!(
                child = %self.describe(child),
                existing = %self.describe(existing),
                rejected = %self.describe(parent),
                "parent already assigned"
            );
            return false;
        }
        if self.ancestors(parent).any(|a| a == child) {
            debug!(
                child = %self.describe(child),
                parent = %self.describe(parent),
                "parent assignment would form a cycle"
            );
            return false;
        }
        self.records[child.0].parent = Some(parent);
        true
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: RecordId) -> impl Iterator<Item = RecordId> + '_ {
        std::iter::successors(self.records[id.0].parent, move |p| self.records[p.0].parent)
    }

    /// The top-most owner of `id` (itself when unowned).
    pub fn root_of(&self, id: RecordId) -> RecordId {
        self.ancestors(id).last().unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &ReconciledRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordId(i), r))
    }

    pub(crate) fn into_records(self) -> Vec<ReconciledRecord> {
        self.records
    }

    fn describe(&self, id: RecordId) -> String {
        let r = &self.records[id.0];
        format!("{} {}", r.resource_type, r.key())
    }
}

fn lookup(table: &Table, resource_type: &str, key: &str) -> Option<RecordId> {
    if key.is_empty() {
        return None;
    }
    table.get(resource_type)?.get(key).copied()
}
