//! IaC-Load: input documents for the IaC reconciler
//!
//! This crate reads the two document families the reconciler compares:
//! AWS Config snapshots (what exists) and Terraform state files (what
//! Terraform believes it manages).
//!
//! ## Layer 0 - Input/Decoding
//!
//! Focus: Faithful decoding. Nothing here interprets the documents; it only
//! turns files into typed values.
//!
//! ## Key Components
//!
//! - `Snapshot` / `ConfigurationItem`: the inventory side
//! - `TerraformState` / `Resource` / `Instance`: the declarative side
//! - `load_states`: discovers and loads one or many `.tfstate` files

mod error;
pub mod snapshot;
pub mod tfstate;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

pub use error::LoadError;
pub use snapshot::{
    AsgInstance, ConfigurationItem, Configuration, Dimension, InterfaceAssociation,
    InterfaceAttachment, IpPermission, Ipv4Range, Ipv6Range, LaunchTemplateConfig,
    LaunchTemplateSpecification, NetworkAclEntry, Relationship, Route, RouteTableAssociation,
    Snapshot, SupplementaryConfiguration, UnsupportedResource, UserIdGroupPair,
};
pub use tfstate::{Instance, Resource, TerraformState, MANAGED};

/// Result type for iac-load operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// State documents keyed by their identifier (path relative to the search
/// root). A `BTreeMap` so iteration is always in sorted identifier order.
pub type StateSet = BTreeMap<String, TerraformState>;

const STATE_EXTENSION: &str = "tfstate";

/// Load an AWS Config snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    read_json(path, "snapshot")
}

/// Load a single Terraform state file.
pub fn load_state(path: &Path) -> Result<TerraformState> {
    read_json(path, "terraform state")
}

/// Find the state files to load.
///
/// Without `recursive`, `root` is the state file itself. With it, `root` is
/// a directory that is walked for `*.tfstate` files. Results are sorted.
pub fn discover_state_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !recursive {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(LoadError::NotADirectory(root.to_path_buf()));
    }
    let mut files = Vec::new();
    collect_files(root, &mut files)?;
    files.retain(|p| p.extension().map(|e| e == STATE_EXTENSION).unwrap_or(false));
    files.sort();
    Ok(files)
}

/// Discover and load every state file under `root`.
///
/// Keys are paths relative to `root` (or the file name when `root` is a
/// single file), which is what diagnostics print.
pub fn load_states(root: &Path, recursive: bool) -> Result<StateSet> {
    let mut states = StateSet::new();
    for path in discover_state_files(root, recursive)? {
        let state = load_state(&path)?;
        let id = state_identifier(root, &path, recursive);
        debug!(file = %id, resources = state.resources.len(), "loaded terraform state");
        states.insert(id, state);
    }
    Ok(states)
}

fn state_identifier(root: &Path, path: &Path, recursive: bool) -> String {
    let relative = if recursive {
        path.strip_prefix(root).unwrap_or(path)
    } else {
        path.file_name().map(Path::new).unwrap_or(path)
    };
    relative.to_string_lossy().into_owned()
}

fn read_json<T: DeserializeOwned>(path: &Path, kind: &'static str) -> Result<T> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Decode {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Every regular file below `dir`. Symlinked directories are not entered,
/// so a link cycle cannot recurse forever; symlinked files are kept.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| LoadError::io(&path, e))?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            out.push(path);
        }
    }
    Ok(())
}
