//! Shared constants for the Ripple analysis engine.

/// Maximum file size in bytes for scanning (default: 1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

// ---- Traversal bounds ----

/// Depth bound for impact propagation over reverse call edges.
pub const DEFAULT_MAX_IMPACT_DEPTH: u32 = 3;

/// Depth bound for critical-path enumeration.
pub const CRITICAL_PATH_MAX_DEPTH: u32 = 5;

// ---- Call graph heuristics ----

/// Name fragments that mark a function as a helper.
pub const HELPER_NAME_PATTERNS: [&str; 6] =
    ["helper", "util", "internal", "validate", "parse", "format"];

/// Bodies with fewer statements than this (and few parameters) are helpers.
pub const HELPER_MAX_STATEMENTS: usize = 10;

/// Parameter ceiling for the short-body helper rule.
pub const HELPER_MAX_PARAMETERS: usize = 3;

/// Caller count above which a helper change is a "high" impact.
pub const DEFAULT_HELPER_HIGH_IMPACT_THRESHOLD: usize = 5;

/// Callers listed per helper impact summary.
pub const HELPER_CALLER_LIST_LIMIT: usize = 10;

// ---- Scoring ----

/// Multiplier applied when the changed seed function is a helper.
pub const HELPER_IMPACT_MULTIPLIER: f64 = 1.5;

/// Upper bound for the complexity and caller-count factors.
pub const MAX_SCORE_FACTOR: f64 = 2.0;

/// Base strength of a confirmed repository dependency.
pub const BASE_DEPENDENCY_STRENGTH: f64 = 0.8;

/// Strength added per source file importing the target repository.
pub const DEPENDENCY_STRENGTH_PER_FILE: f64 = 0.05;

/// Test recommendation cutoffs.
pub const HIGH_IMPACT_SCORE: f64 = 0.7;
pub const MEDIUM_IMPACT_SCORE: f64 = 0.4;

/// Directories never descended into by the scanner.
pub const DEFAULT_SKIP_DIRS: [&str; 9] = [
    ".git",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    ".eggs",
    "target",
];
