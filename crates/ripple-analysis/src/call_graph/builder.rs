//! Two-pass call graph construction: catalog every declaration, then resolve
//! the calls inside each one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use ripple_core::config::ScanConfig;
use ripple_core::errors::ParseError;
use ripple_core::types::FunctionId;

use super::classify::is_helper;
use super::resolution::resolve_call;
use super::types::{CallGraph, FunctionNode};
use crate::parsers::registry::ParserRegistry;
use crate::parsers::traits::LanguageParser;
use crate::parsers::types::{Declaration, SourceFile};
use crate::scanner::walker::Walker;

/// One repository to build a graph for.
#[derive(Debug, Clone)]
pub struct RepositorySource {
    pub name: String,
    pub root: PathBuf,
    pub changed_files: Vec<String>,
}

/// Builds call graphs using an injected parser registry.
pub struct CallGraphBuilder<'r> {
    registry: &'r ParserRegistry,
    walker: Walker,
}

struct ParsedFile<'r> {
    file: SourceFile,
    parser: &'r dyn LanguageParser,
    declarations: Vec<Declaration>,
}

impl<'r> CallGraphBuilder<'r> {
    pub fn new(registry: &'r ParserRegistry, scan: &ScanConfig) -> Self {
        Self {
            registry,
            walker: Walker::new(scan),
        }
    }

    /// Walk `root` and build its call graph. Never fails: unreadable or
    /// unparseable files are skipped.
    pub fn build(&self, root: &Path) -> CallGraph {
        let start = Instant::now();
        let mut sources = Vec::new();
        for scanned in self.walker.collect(root) {
            match scanned.read_source() {
                Ok(source) => sources.push((scanned.relative, source)),
                Err(err) => tracing::debug!(error = %err, "skipping unreadable file"),
            }
        }
        let graph = self.build_from_sources(&sources);
        tracing::info!(
            root = %root.display(),
            functions = graph.function_count(),
            edges = graph.edge_count(),
            resolution_rate = graph.diagnostics.resolution_rate(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "call graph built"
        );
        graph
    }

    /// Build from in-memory `(relative_path, source)` pairs, in the given order.
    pub fn build_from_sources(&self, sources: &[(String, String)]) -> CallGraph {
        let mut graph = CallGraph::new();
        let mut parsed = Vec::with_capacity(sources.len());

        for (path, source) in sources {
            match self.parse(path, source) {
                Ok(file) => parsed.push(file),
                Err(err) => {
                    tracing::debug!(error = %err, "file skipped for catalog");
                    graph.diagnostics.skipped_files.push(path.clone());
                }
            }
        }

        // Pass 1: catalog.
        for pf in &parsed {
            for decl in &pf.declarations {
                graph.add_function(function_node(&pf.file, decl));
            }
        }

        // Pass 2: calls.
        for pf in &parsed {
            let language = pf.file.language.name();
            for decl in &pf.declarations {
                let Some(caller_id) = graph.lookup(&decl.qualified_name) else {
                    continue;
                };
                let Some(caller) = graph.get(caller_id).cloned() else {
                    continue;
                };
                // A later duplicate replaced this declaration.
                if caller.file_path != pf.file.path || caller.start_line != decl.start_line {
                    continue;
                }

                for call in pf.parser.parse_calls(&pf.file, decl) {
                    match resolve_call(&graph, &call, &caller) {
                        Some((callee_id, strategy)) => {
                            graph.diagnostics.record(Some(strategy), language);
                            if let Err(err) = graph.add_call(caller_id, callee_id) {
                                tracing::warn!(error = %err, "dropping call edge");
                            }
                        }
                        None => {
                            graph.diagnostics.record(None, language);
                            tracing::trace!(
                                caller = %caller.qualified_name,
                                callee = %call.callee_name,
                                "unresolved call target"
                            );
                        }
                    }
                }
            }
        }

        graph
    }

    fn parse(&self, path: &str, source: &str) -> Result<ParsedFile<'r>, ParseError> {
        let parser = self.registry.for_path(Path::new(path)).ok_or_else(|| {
            ParseError::UnsupportedLanguage {
                extension: Path::new(path)
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }
        })?;
        let file = parser.parse_file(source, path)?;
        if file.has_errors() {
            return Err(ParseError::SyntaxErrors {
                path: path.into(),
                error_count: file.error_count,
            });
        }
        let declarations = parser.parse_declarations(&file);
        Ok(ParsedFile {
            file,
            parser,
            declarations,
        })
    }
}

fn function_node(file: &SourceFile, decl: &Declaration) -> FunctionNode {
    FunctionNode {
        id: FunctionId::new(0),
        name: decl.name.clone(),
        qualified_name: decl.qualified_name.clone(),
        file_path: file.path.clone(),
        start_line: decl.start_line,
        end_line: decl.end_line,
        enclosing_type: decl.enclosing_type.clone(),
        language: file.language,
        is_helper: is_helper(decl),
        complexity: decl.complexity.max(1),
        parameter_count: decl.parameter_count,
        statement_count: decl.statement_count,
    }
}

/// Build the call graph for one repository with the default parsers.
pub fn build_call_graph<S: AsRef<str>>(root: &Path, changed_files: &[S]) -> CallGraph {
    let registry = ParserRegistry::with_defaults();
    let builder = CallGraphBuilder::new(&registry, &ScanConfig::default());
    let mut graph = builder.build(root);
    graph.set_changed_files(changed_files.iter().map(|s| s.as_ref().to_string()).collect());
    graph
}

/// Build several repositories' graphs in parallel. Each worker owns its graph;
/// results are collected only once every graph is complete.
pub fn build_call_graphs(
    repositories: &[RepositorySource],
    registry: &ParserRegistry,
    scan: &ScanConfig,
) -> BTreeMap<String, CallGraph> {
    repositories
        .par_iter()
        .map(|repo| {
            let builder = CallGraphBuilder::new(registry, scan);
            let mut graph = builder.build(&repo.root);
            graph.set_changed_files(repo.changed_files.clone());
            (repo.name.clone(), graph)
        })
        .collect()
}
