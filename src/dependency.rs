//! Reactive dependency extraction.
//!
//! The reactive runtime exposes readable values through a `.get` accessor. An
//! expression that reads `path.get` depends on `path`, so the binding built
//! from it is re-evaluated whenever one of those paths changes.

use crate::error::CompilerError;
use crate::snippet::Snippets;
use oxc_allocator::{Allocator, CloneIn};
use oxc_ast::ast::{Expression, StaticMemberExpression};
use oxc_ast_visit::walk::walk_static_member_expression;
use oxc_ast_visit::Visit;

pub struct ReactiveExpression<'a> {
    /// `() => <clone of the expression>`
    pub closure: Expression<'a>,
    /// Every dependency root read through `.get`, in traversal order.
    pub dependencies: Vec<Expression<'a>>,
}

impl<'a> ReactiveExpression<'a> {
    pub fn is_reactive(&self) -> bool {
        !self.dependencies.is_empty()
    }

    /// The value handed to the runtime: the closure when anything reactive is
    /// read, the untouched expression otherwise.
    pub fn into_value(self, original: &Expression<'a>, allocator: &'a Allocator) -> (Expression<'a>, Vec<Expression<'a>>) {
        if self.is_reactive() {
            (self.closure, self.dependencies)
        } else {
            (original.clone_in(allocator), Vec::new())
        }
    }
}

/// Clone `expr`, scan the clone for `.get` reads, and wrap the clone in a
/// zero-argument closure. `expr` itself is left untouched.
pub fn extract_dependencies<'a>(
    expr: &Expression<'a>,
    allocator: &'a Allocator,
    snippets: &Snippets<'a>,
) -> Result<ReactiveExpression<'a>, CompilerError> {
    let cloned = expr.clone_in(allocator);

    let mut collector = DependencyCollector {
        allocator,
        dependencies: Vec::new(),
    };
    collector.visit_expression(&cloned);
    let dependencies = collector.dependencies;

    let closure = snippets.arrow("", cloned)?;
    Ok(ReactiveExpression {
        closure,
        dependencies,
    })
}

/// Identifiers, `this`, and non-computed member chains over them.
pub fn is_dependency_path(expr: &Expression<'_>) -> bool {
    match expr {
        Expression::Identifier(_) | Expression::ThisExpression(_) => true,
        Expression::StaticMemberExpression(member) => is_dependency_path(&member.object),
        _ => false,
    }
}

struct DependencyCollector<'a> {
    allocator: &'a Allocator,
    dependencies: Vec<Expression<'a>>,
}

impl<'a> Visit<'a> for DependencyCollector<'a> {
    fn visit_static_member_expression(&mut self, member: &StaticMemberExpression<'a>) {
        if member.property.name == "get" && is_dependency_path(&member.object) {
            self.dependencies.push(member.object.clone_in(self.allocator));
        }
        walk_static_member_expression(self, member);
    }
}
