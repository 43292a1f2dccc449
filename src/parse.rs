//! Compiler entry points: parse, lower, print.

use crate::error::{CompilerError, ERR_INTERNAL, ERR_PARSE};
use crate::transform::TemplateTransformer;
use oxc_allocator::Allocator;
use oxc_ast::AstBuilder;
use oxc_ast_visit::VisitMut;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[cfg(feature = "napi")]
use napi_derive::napi;

pub const DEFAULT_ENVIRONMENT: &str = "@rumious/browser";

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT / OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Module,
    Script,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileMetadata {
    pub filename: String,
    #[serde(default)]
    pub source_type: SourceKind,
}

impl CompileMetadata {
    pub fn module(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            source_type: SourceKind::Module,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Module specifier every runtime helper is imported from.
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub verbose: bool,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub code: String,
    /// Source map (v3 JSON) back into the input file.
    pub map: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileInput {
    pub source: String,
    pub metadata: CompileMetadata,
}

/// JSX is always enabled; TypeScript follows the file extension.
pub fn source_type_for(metadata: &CompileMetadata) -> SourceType {
    let is_ts = [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| metadata.filename.ends_with(ext));
    SourceType::default()
        .with_jsx(true)
        .with_typescript(is_ts)
        .with_module(metadata.source_type == SourceKind::Module)
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILE
// ═══════════════════════════════════════════════════════════════════════════════

pub fn compile(
    source: &str,
    metadata: &CompileMetadata,
    options: &CompileOptions,
) -> Result<CompileResult, CompilerError> {
    let allocator = Allocator::default();
    let source_type = source_type_for(metadata);

    if options.verbose {
        eprintln!(
            "[RumiousNative] Compiling {} (typescript: {})",
            metadata.filename,
            source_type.is_typescript()
        );
    }

    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(diagnostic) = ret.errors.first() {
        let offset = diagnostic
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset() as u32);
        let mut error = CompilerError::new(ERR_PARSE, &diagnostic.to_string(), "", 0, 0);
        error.offset = offset;
        return Err(error.locate(&metadata.filename, source));
    }

    let mut program = ret.program;
    let mut transformer = TemplateTransformer::new(&allocator, options);
    transformer.visit_program(&mut program);
    if let Some(error) = transformer.errors.into_iter().next() {
        return Err(error.locate(&metadata.filename, source));
    }

    program.comments = AstBuilder::new(&allocator).vec();

    let codegen_options = CodegenOptions {
        source_map_path: Some(PathBuf::from(&metadata.filename)),
        ..CodegenOptions::default()
    };
    let printed = Codegen::new().with_options(codegen_options).build(&program);

    let map = match printed.map {
        Some(map) => serde_json::from_str(&map.to_json_string()).map_err(|e| {
            CompilerError::new(ERR_INTERNAL, &e.to_string(), &metadata.filename, 0, 0)
        })?,
        None => serde_json::Value::Null,
    };

    Ok(CompileResult {
        code: printed.code,
        map,
    })
}

/// Compiles every input in parallel. Results keep input order.
pub fn compile_batch(
    inputs: &[CompileInput],
    options: &CompileOptions,
) -> Vec<Result<CompileResult, CompilerError>> {
    inputs
        .par_iter()
        .map(|input| compile(&input.source, &input.metadata, options))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn compile_native(
    source: String,
    filename: String,
    source_type: Option<String>,
    environment: Option<String>,
) -> napi::Result<serde_json::Value> {
    let metadata = CompileMetadata {
        filename,
        source_type: match source_type.as_deref() {
            Some("script") => SourceKind::Script,
            _ => SourceKind::Module,
        },
    };
    let mut options = CompileOptions::default();
    if let Some(environment) = environment {
        options.environment = environment;
    }
    let result =
        compile(&source, &metadata, &options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(result).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn is_component_tag_native(tag_name: String) -> bool {
    crate::jsx_lowerer::is_component_tag(&tag_name)
}
