/*
 * Dataflow Core - memory data dependence and points-to graph checks
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Offset)
 * - config/      : Options, presets, YAML loading
 * - features/    : read_write_graph → reaching_definitions | memory_ssa → data_dependence
 *                  points_to (graph + validator)
 *
 * Single-threaded; the library installs no tracing subscriber.
 */

// Crate-level lint configuration
#![allow(clippy::upper_case_acronyms)] // SSA, PS naming
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Analysis features
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnalysisConfig, DataDependenceOptions, Preset, ValidatorOptions};
pub use errors::{AnalysisError, Result};
pub use features::data_dependence::{
    DataDependenceAnalysis, DataDependenceEngine, DataDependenceError, DataDependenceResult,
};
pub use features::points_to::{
    Diagnostic, PSNodeId, PSNodeType, PointerGraph, PointerGraphValidator, ValidationReport,
};
pub use features::read_write_graph::{DefSite, NodeId, RWNodeType, ReadWriteGraph};
pub use shared::models::Offset;
