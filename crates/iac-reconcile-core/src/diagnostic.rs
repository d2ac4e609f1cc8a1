//! Non-fatal data defects found while reconciling.

use serde::{Deserialize, Serialize};

use crate::obs::emit_data_defect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An inventory item or relationship with no resource type.
    EmptyResourceType,
    /// An inventory item, or declared instance, with neither ID nor ARN.
    MissingIdentity,
    /// A relationship or reference to something not in the inventory.
    UnknownReference,
    /// A security group rule that is neither ingress nor egress.
    UnknownRuleDirection,
}

/// One recorded defect. The source document (snapshot or state file) is
/// named in `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Collects diagnostics and mirrors each one to the log as a warning.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, kind: DiagnosticKind, message: String) {
        emit_data_defect(kind, &message);
        self.entries.push(Diagnostic { kind, message });
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
