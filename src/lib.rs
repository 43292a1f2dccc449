//! # Rumious Compiler
//!
//! Compiles JSX templates into imperative DOM construction code for the
//! Rumious fine-grained reactive runtime.
//!
//! Every JSX literal in a file is replaced by a closure
//! `(ctx) => { const root = document.createDocumentFragment(); ...; return root; }`
//! whose body creates elements, components and text through runtime helpers.
//! Reads of reactive values (`x.get`) become dependencies, so the runtime can
//! re-run only the parts of a template that actually depend on a changed value.
//!
//! ## Invariants
//!
//! 1. **One alias per helper**: every runtime helper is imported once per file,
//!    under a generated local alias that never collides with a user name.
//! 2. **Generated names are fresh**: identifiers are minted only after the
//!    program scope has been entered, and skip every name in the file.
//! 3. **Source order**: statements inside a template are emitted in the order
//!    their nodes appear.
//! 4. **All or nothing**: any error aborts the file; no partial output.

mod context;
mod control;
mod dependency;
mod directive;
mod error;
mod imports;
mod jsx_lowerer;
mod parse;
mod scope;
mod snippet;
mod transform;
mod whitespace;

#[cfg(test)]
mod lowering_tests;

pub use context::{CompileDirectives, Scope};
pub use control::ControlConstruct;
pub use dependency::{extract_dependencies, is_dependency_path, ReactiveExpression};
pub use directive::{classify_attribute, AttributeKind, Directive};
pub use error::*;
pub use imports::ImportRegistry;
pub use jsx_lowerer::{is_component_tag, TemplateLowerer};
pub use parse::{
    compile, compile_batch, source_type_for, CompileInput, CompileMetadata, CompileOptions,
    CompileResult, SourceKind, DEFAULT_ENVIRONMENT,
};
pub use scope::UidGenerator;
pub use transform::TemplateTransformer;
pub use whitespace::{normalize_text, WhitespaceMode};

#[cfg(feature = "napi")]
pub use parse::{compile_native, is_component_tag_native};
