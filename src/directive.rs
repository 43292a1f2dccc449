//! Directive attributes: classification and lowering to runtime calls.
//!
//! Attribute names are split on `:` into a directive name and a modifier.
//! `ref`, `model` and `view` are directives on their own; every other
//! namespaced name is a directive with a modifier (`bind:value`,
//! `on:click`, or any runtime-defined `name:modifier`). The `compile:`
//! namespace is reserved for compile-time options.

use crate::context::Scope;
use crate::dependency::extract_dependencies;
use crate::error::CompilerError;
use crate::jsx_lowerer::TemplateLowerer;
use oxc_ast::ast::{Expression, Statement};
use oxc_span::SPAN;
use oxc_syntax::identifier::is_identifier_name;

pub const COMPILE_NAMESPACE: &str = "compile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'n> {
    /// `bind:<prop>`
    Bind(&'n str),
    /// `attr:<name>`
    Attr(&'n str),
    Ref,
    View,
    Model,
    /// `on:<event>`
    On(&'n str),
    /// Any other `name:modifier`, dispatched through the runtime's
    /// `directives` registry.
    Custom { name: &'n str, modifier: &'n str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind<'n> {
    /// `compile:<modifier>`
    Compile(&'n str),
    Directive(Directive<'n>),
    Prop,
}

pub fn classify_attribute(name: &str) -> AttributeKind<'_> {
    match name.split_once(':') {
        Some((COMPILE_NAMESPACE, modifier)) => AttributeKind::Compile(modifier),
        Some((directive, modifier)) => AttributeKind::Directive(match directive {
            "bind" => Directive::Bind(modifier),
            "attr" => Directive::Attr(modifier),
            "on" => Directive::On(modifier),
            "ref" => Directive::Ref,
            "view" => Directive::View,
            "model" => Directive::Model,
            _ => Directive::Custom {
                name: directive,
                modifier,
            },
        }),
        None => match name {
            "ref" => AttributeKind::Directive(Directive::Ref),
            "view" => AttributeKind::Directive(Directive::View),
            "model" => AttributeKind::Directive(Directive::Model),
            _ => AttributeKind::Prop,
        },
    }
}

/// `.name` when `name` is a valid identifier, `["name"]` otherwise.
fn member_accessor(name: &str) -> String {
    if is_identifier_name(name) {
        format!(".{}", name)
    } else {
        format!("[{}]", quote(name))
    }
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

impl<'a> TemplateLowerer<'a> {
    pub(crate) fn resolve_directive(
        &mut self,
        scope: Scope<'a>,
        target: &'a str,
        directive: Directive<'_>,
        value: &Expression<'a>,
    ) -> Result<Statement<'a>, CompilerError> {
        let call = match directive {
            Directive::Bind(property) => {
                let apply = self.snippets.expression(&format!(
                    "(value) => {}{} = value",
                    target,
                    member_accessor(property)
                ))?;
                self.reactive_callback(scope, apply, value)?
            }
            Directive::Attr(attribute) => {
                let apply = self.snippets.expression(&format!(
                    "(value) => {}.setAttribute({}, value)",
                    target,
                    quote(attribute)
                ))?;
                self.reactive_callback(scope, apply, value)?
            }
            Directive::Ref => {
                let ref_fn = self.require_id("ref")?;
                self.call(
                    self.ident(ref_fn),
                    vec![self.ident(scope.root_ctx), self.ident(target), self.clone_expr(value)],
                )
            }
            Directive::View => {
                let view_fn = self.require_id("view")?;
                self.call(
                    self.ident(view_fn),
                    vec![self.ident(scope.root_ctx), self.ident(target), self.clone_expr(value)],
                )
            }
            Directive::Model => {
                let detect_fn = self.require_id("detectValueChange")?;
                let set_state_fn = self.require_id("setStateValue")?;
                let param = self.generate_uid("value")?;
                let write_back = self.call(
                    self.ident(set_state_fn),
                    vec![self.clone_expr(value), self.ident(param)],
                );
                let on_change = self.snippets.arrow(param, write_back)?;
                self.call(self.ident(detect_fn), vec![on_change, self.ident(target)])
            }
            Directive::On(event) => {
                let create_event_fn = self.require_id("createEvent")?;
                self.event_names.push(event.to_string());
                self.call(
                    self.ident(create_event_fn),
                    vec![
                        self.ident(scope.root_ctx),
                        self.ident(target),
                        self.string(event),
                        self.clone_expr(value),
                    ],
                )
            }
            Directive::Custom { name, modifier } => {
                let registry = self.require_id("directives")?;
                let callee = self
                    .snippets
                    .expression(&format!("{}{}", registry, member_accessor(name)))?;
                self.call(
                    callee,
                    vec![
                        self.ident(scope.root_ctx),
                        self.ident(target),
                        self.string(modifier),
                        self.clone_expr(value),
                    ],
                )
            }
        };
        Ok(self.ast.statement_expression(SPAN, call))
    }

    /// `reactiveCallback(ctx, apply, valueOrClosure, [deps])`
    fn reactive_callback(
        &mut self,
        scope: Scope<'a>,
        apply: Expression<'a>,
        value: &Expression<'a>,
    ) -> Result<Expression<'a>, CompilerError> {
        let callback_fn = self.require_id("reactiveCallback")?;
        let (value, dependencies) =
            extract_dependencies(value, self.allocator, &self.snippets)?.into_value(value, self.allocator);
        Ok(self.call(
            self.ident(callback_fn),
            vec![
                self.ident(scope.root_ctx),
                apply,
                value,
                self.array(dependencies),
            ],
        ))
    }
}
