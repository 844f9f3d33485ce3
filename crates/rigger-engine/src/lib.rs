//! Design-parameter extraction and stylesheet rewriting.
//!
//! `rigger-engine` finds the tunable literals in a front-end project
//! (colors, spacing, type scale, radii, shadows, motion), gives each one a
//! stable identity and a custom property name, and rewrites the stylesheet
//! so those literals read from an injected `:root` block.
//!
//! # Quick Start
//!
//! ```rust
//! use rigger_engine::{rewrite, scan_stylesheet, Overrides};
//!
//! let css = "h1 { color: #ff0000; }";
//! let params = scan_stylesheet(css, "site.css");
//! let updated = rewrite(css, &params, &Overrides::new());
//!
//! assert!(updated.starts_with("/* rigger:start */"));
//! assert!(updated.contains(&format!("color: var({});", params[0].css_var)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ProjectSource ──► detect_project_type
//!               ──► rank_candidates ──► primary stylesheet
//!                                        │
//!               scan_stylesheet ◄────────┘
//!               extract_tokens  ◄── tailwind.config.*
//!                        │
//!                        ▼
//!                   ScanResult ──► EditPlan (rewrite + RigConfig)
//!                              ──► RigSnapshot
//! ```
//!
//! Extraction, ranking and rewriting are pure functions of their text
//! inputs and never fail; unparsable input degrades to fewer parameters.
//! Only the document helpers return [`Result`].
//!
//! # Identity
//!
//! Parameter ids hash `file|selector|property|value` with a fixed 32-bit
//! FNV-1a over UTF-16 units ([`text::stable_hash`]). Saved overrides are
//! keyed by these ids, so the hash is part of the on-disk contract.

pub mod css;
pub mod discover;
mod document;
mod error;
mod param;
mod plan;
pub mod project;
pub mod rank;
mod scan;
pub mod text;
pub mod tokens;

pub use css::{scan_stylesheet, Declaration, MAX_CSS_PARAMS};
pub use document::{
    build_config, build_snapshot, overrides_from_json, to_pretty_json, FileEntry, Overrides,
    RigConfig, RigSnapshot, SnapshotParam, DOCUMENT_VERSION,
};
pub use error::{Result, RiggerError};
pub use param::{
    compare_params, sort_params, NumericRange, Origin, ParamGroup, ParamSource, ParamType,
    ParamValue, Parameter,
};
pub use plan::{
    build_root_block, carried_declarations, inject_root_block, rewrite, variable_id,
    CarriedDeclaration, EditPlan, BLOCK_END, BLOCK_START,
};
pub use project::{
    detect_project_type, find_token_config, load_token_params, MemoryProject, ProjectSource,
    ProjectType,
};
pub use rank::{primary, rank_candidates, Candidate, CandidateSet, RankLimits, Signal};
pub use scan::{build_scan_result, scan_project, scan_with_stylesheet, ScanOptions, ScanResult};
pub use tokens::{extract_tokens, TokenSection, DEFAULT_TOKEN_LIMIT};
