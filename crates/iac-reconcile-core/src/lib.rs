//! IaC Reconcile Core
//!
//! Reconciles an AWS Config snapshot against Terraform state: which
//! resources exist, which are declared, and which are owned indirectly
//! through another resource.
//!
//! ```ignore
//! let types = TypeMap::builtin()?;
//! let result = reconcile(&snapshot, &states, &types);
//! let summary = summarize(&result);
//! ```

pub mod aws;
pub mod correlate;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod index;
pub mod obs;
pub mod ownership;
pub mod record;
pub mod summary;
pub mod telemetry;
pub mod typemap;

pub use correlate::{is_aws_provider, CorrelatedInstance, CorrelationOutcome};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use engine::{reconcile, reconcile_with, Reconciliation};
pub use error::{ReconcileError, Result};
pub use index::IdentityIndex;
pub use ownership::{OwnershipEngine, OwnershipRule, RuleContext};
pub use record::{ReconciledRecord, RecordId, Source};
pub use summary::{summarize, SourceSummary, Summary, TypeSummary};
pub use telemetry::init_tracing;
pub use typemap::TypeMap;

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
