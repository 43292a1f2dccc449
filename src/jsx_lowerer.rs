//! JSX Lowering for Rumious Compiler

use crate::context::{CompileDirectives, Context, Scope};
use crate::dependency::extract_dependencies;
use crate::directive::{classify_attribute, AttributeKind};
use crate::error::{CompilerError, ERR_UNKNOWN_ELEMENT, ERR_UNSUPPORTED_MODIFIER};
use crate::imports::ImportRegistry;
use crate::parse::CompileOptions;
use crate::scope::UidGenerator;
use crate::snippet::Snippets;
use crate::whitespace::{decode_entities, normalize_text, WhitespaceMode};
use oxc_allocator::{Allocator, Box as oxc_box, CloneIn, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::{GetSpan, SPAN};
use oxc_syntax::identifier::is_identifier_name;

// ═══════════════════════════════════════════════════════════════════════════════
// TAG CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Check if a tag name represents a component (leading segment is uppercase).
/// Dotted names are judged by their last segment; namespaced names never are.
pub fn is_component_tag(tag_name: &str) -> bool {
    if tag_name.contains(':') {
        return false;
    }
    tag_name
        .rsplit('.')
        .next()
        .and_then(|segment| segment.chars().next())
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

pub fn is_component_element(name: &JSXElementName<'_>) -> bool {
    match name {
        JSXElementName::Identifier(id) => is_component_tag(id.name.as_str()),
        JSXElementName::IdentifierReference(id) => is_component_tag(id.name.as_str()),
        JSXElementName::MemberExpression(member) => is_component_tag(member.property.name.as_str()),
        JSXElementName::NamespacedName(_) | JSXElementName::ThisExpression(_) => false,
    }
}

/// The tag as written: `div`, `svg:rect`, `ui.card`.
pub fn element_name(name: &JSXElementName<'_>) -> String {
    match name {
        JSXElementName::Identifier(id) => id.name.to_string(),
        JSXElementName::IdentifierReference(id) => id.name.to_string(),
        JSXElementName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
        JSXElementName::MemberExpression(member) => member_name(member),
        JSXElementName::ThisExpression(_) => "this".to_string(),
    }
}

fn member_name(member: &JSXMemberExpression<'_>) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(inner) => member_name(inner),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}

pub fn attribute_name(name: &JSXAttributeName<'_>) -> String {
    match name {
        JSXAttributeName::Identifier(id) => id.name.to_string(),
        JSXAttributeName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
    }
}

/// `compile:preserveWhitespace` with no value or `{true}` preserves, `"smart"`
/// (literal or in braces) folds indentation, anything else collapses.
fn whitespace_mode_of(value: &Option<JSXAttributeValue<'_>>) -> WhitespaceMode {
    match value {
        None => WhitespaceMode::Preserve,
        Some(JSXAttributeValue::StringLiteral(s)) if s.value == "smart" => WhitespaceMode::Smart,
        Some(JSXAttributeValue::ExpressionContainer(container)) => {
            match container.expression.as_expression() {
                Some(Expression::BooleanLiteral(b)) if b.value => WhitespaceMode::Preserve,
                Some(Expression::StringLiteral(s)) if s.value == "smart" => WhitespaceMode::Smart,
                _ => WhitespaceMode::Collapse,
            }
        }
        _ => WhitespaceMode::Collapse,
    }
}

pub(crate) fn apply_compile_directive(
    directives: &mut CompileDirectives,
    modifier: &str,
    attr: &JSXAttribute<'_>,
) -> Result<(), CompilerError> {
    match modifier {
        "preserveWhitespace" => {
            directives.preserve_whitespace = Some(whitespace_mode_of(&attr.value));
            Ok(())
        }
        _ => Err(CompilerError::at(
            ERR_UNSUPPORTED_MODIFIER,
            &format!("Unsupported modifier '{}'", modifier),
            attr.span.start,
        )),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE LOWERER
// Turns JSX trees into closures that build DOM through the runtime
// ═══════════════════════════════════════════════════════════════════════════════

pub(crate) struct LoweredAttributes<'a> {
    pub props: Expression<'a>,
    pub directives: ArenaVec<'a, Statement<'a>>,
    pub compile: CompileDirectives,
}

pub struct TemplateLowerer<'a> {
    pub allocator: &'a Allocator,
    pub ast: AstBuilder<'a>,
    pub snippets: Snippets<'a>,
    pub imports: ImportRegistry,
    /// Every `on:` event seen in the file, in order, with repeats.
    pub event_names: Vec<String>,
    environment: String,
    uids: Option<UidGenerator>,
    verbose: bool,
}

impl<'a> TemplateLowerer<'a> {
    pub fn new(allocator: &'a Allocator, options: &CompileOptions) -> Self {
        Self {
            allocator,
            ast: AstBuilder::new(allocator),
            snippets: Snippets::new(allocator),
            imports: ImportRegistry::new(),
            event_names: Vec::new(),
            environment: options.environment.clone(),
            uids: None,
            verbose: options.verbose,
        }
    }

    /// Establishes the program scope. Identifiers can only be minted after this.
    pub fn enter_program(&mut self, program: &Program<'a>) {
        self.uids = Some(UidGenerator::for_program(program));
    }

    pub fn has_program_scope(&self) -> bool {
        self.uids.is_some()
    }

    pub(crate) fn generate_uid(&mut self, name: &str) -> Result<&'a str, CompilerError> {
        let uids = self.uids.as_mut().ok_or_else(CompilerError::scope_unavailable)?;
        let id = uids.generate(name);
        Ok(self.allocator.alloc_str(&id))
    }

    /// Local alias of a runtime symbol, importing it on first use.
    pub(crate) fn require_id(&mut self, symbol: &str) -> Result<&'a str, CompilerError> {
        let uids = self.uids.as_mut().ok_or_else(CompilerError::scope_unavailable)?;
        let alias = self.imports.require_id(uids, symbol, &self.environment);
        Ok(self.allocator.alloc_str(&alias))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AST helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn ident(&self, name: &'a str) -> Expression<'a> {
        self.ast.expression_identifier(SPAN, name)
    }

    pub(crate) fn string(&self, value: &str) -> Expression<'a> {
        let value = self.allocator.alloc_str(value);
        self.ast.expression_string_literal(SPAN, value, None)
    }

    pub(crate) fn array(&self, items: Vec<Expression<'a>>) -> Expression<'a> {
        let mut elements = self.ast.vec();
        for item in items {
            elements.push(ArrayExpressionElement::from(item));
        }
        self.ast.expression_array(SPAN, elements)
    }

    pub(crate) fn call(&self, callee: Expression<'a>, args: Vec<Expression<'a>>) -> Expression<'a> {
        let mut arguments = self.ast.vec();
        for arg in args {
            arguments.push(Argument::from(arg));
        }
        self.ast.expression_call(
            SPAN,
            callee,
            None::<oxc_box<TSTypeParameterInstantiation>>,
            arguments,
            false,
        )
    }

    pub(crate) fn member(&self, object: Expression<'a>, property: &'a str) -> Expression<'a> {
        Expression::from(self.ast.member_expression_static(
            SPAN,
            object,
            self.ast.identifier_name(SPAN, property),
            false,
        ))
    }

    pub(crate) fn clone_expr(&self, expr: &Expression<'a>) -> Expression<'a> {
        expr.clone_in(self.allocator)
    }

    pub(crate) fn statement(&self, expr: Expression<'a>) -> Statement<'a> {
        self.ast.statement_expression(SPAN, expr)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Templates
    // ─────────────────────────────────────────────────────────────────────────

    fn new_template_scope(&mut self) -> Result<Scope<'a>, CompilerError> {
        Ok(Scope {
            root_element: self.generate_uid("root")?,
            root_ctx: self.generate_uid("ctx")?,
        })
    }

    /// `(ctx) => { const root = document.createDocumentFragment(); ...; return root; }`
    pub fn lower_template(&mut self, element: &JSXElement<'a>) -> Result<Expression<'a>, CompilerError> {
        let scope = self.new_template_scope()?;
        if self.verbose {
            eprintln!(
                "[RumiousNative] Lowering <{}> into {}",
                element_name(&element.opening_element.name),
                scope.root_element
            );
        }
        let mut ctx = Context::new(self.ast, scope, CompileDirectives::root());
        self.lower_element(&mut ctx, element)?;
        self.snippets
            .fragment_closure(scope.root_element, scope.root_ctx, ctx.statements)
    }

    pub fn lower_template_fragment(
        &mut self,
        fragment: &JSXFragment<'a>,
    ) -> Result<Expression<'a>, CompilerError> {
        let scope = self.new_template_scope()?;
        let mut ctx = Context::new(self.ast, scope, CompileDirectives::root());
        self.lower_children(&mut ctx, &fragment.children)?;
        self.snippets
            .fragment_closure(scope.root_element, scope.root_ctx, ctx.statements)
    }

    /// Prepends the runtime imports to `body` and appends
    /// `eventDelegate([...events])`.
    pub fn finish_program(
        &mut self,
        body: ArenaVec<'a, Statement<'a>>,
    ) -> Result<ArenaVec<'a, Statement<'a>>, CompilerError> {
        let event_delegate = self.require_id("eventDelegate")?;
        let events = self.event_names.iter().map(|name| self.string(name)).collect();
        let delegate = self.statement(self.call(self.ident(event_delegate), vec![self.array(events)]));

        let mut out = self.imports.generate_import_declarations(&self.snippets)?;
        for stmt in body {
            out.push(stmt);
        }
        out.push(delegate);
        Ok(out)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn lower_children(
        &mut self,
        ctx: &mut Context<'a>,
        children: &[JSXChild<'a>],
    ) -> Result<(), CompilerError> {
        let append_text = self.require_id("appendText")?;
        let mode = ctx.directives.whitespace_mode();
        let mut text_buffer = String::new();

        for child in children {
            if let JSXChild::Text(text) = child {
                let decoded = decode_entities(text.value.as_str());
                text_buffer.push_str(&normalize_text(&decoded, mode));
                continue;
            }
            self.flush_text(ctx, append_text, &mut text_buffer);
            match child {
                JSXChild::Element(element) => self.lower_element(ctx, element)?,
                JSXChild::Fragment(fragment) => self.lower_children(ctx, &fragment.children)?,
                JSXChild::ExpressionContainer(container) => {
                    if let Some(expr) = container.expression.as_expression() {
                        self.lower_dynamic_part(ctx, expr)?;
                    }
                }
                JSXChild::Spread(spread) => self.lower_dynamic_part(ctx, &spread.expression)?,
                JSXChild::Text(_) => {}
            }
        }
        self.flush_text(ctx, append_text, &mut text_buffer);
        Ok(())
    }

    fn flush_text(&self, ctx: &mut Context<'a>, append_text: &'a str, buffer: &mut String) {
        if buffer.is_empty() {
            return;
        }
        let call = self.call(
            self.ident(append_text),
            vec![self.ident(ctx.scope.root_element), self.string(buffer)],
        );
        ctx.statements.push(self.statement(call));
        buffer.clear();
    }

    /// `reactivePart(ctx, root, valueOrClosure, [deps])`
    fn lower_dynamic_part(
        &mut self,
        ctx: &mut Context<'a>,
        expr: &Expression<'a>,
    ) -> Result<(), CompilerError> {
        let reactive_part = self.require_id("reactivePart")?;
        let (value, dependencies) =
            extract_dependencies(expr, self.allocator, &self.snippets)?.into_value(expr, self.allocator);
        let call = self.call(
            self.ident(reactive_part),
            vec![
                self.ident(ctx.scope.root_ctx),
                self.ident(ctx.scope.root_element),
                value,
                self.array(dependencies),
            ],
        );
        ctx.statements.push(self.statement(call));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Elements
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn lower_element(
        &mut self,
        ctx: &mut Context<'a>,
        element: &JSXElement<'a>,
    ) -> Result<(), CompilerError> {
        let name = &element.opening_element.name;
        if is_component_element(name) {
            return self.lower_component(ctx, element);
        }

        let tag = element_name(name);
        let element_fn = self.require_id("element")?;
        let var = self.generate_uid("ele")?;
        let attrs = self.lower_attributes(ctx.scope, var, &element.opening_element.attributes)?;

        let create = self.call(
            self.ident(element_fn),
            vec![
                self.ident(ctx.scope.root_element),
                self.ident(ctx.scope.root_ctx),
                self.string(&tag),
                attrs.props,
            ],
        );
        ctx.statements.push(self.snippets.const_declaration(var, create)?);
        ctx.append(attrs.directives);

        if element.children.is_empty() {
            return Ok(());
        }
        let scope = Scope {
            root_element: var,
            root_ctx: ctx.scope.root_ctx,
        };
        let mut child = ctx.descend(self.ast, scope, attrs.compile);
        self.lower_children(&mut child, &element.children)?;
        ctx.append(child.statements);
        Ok(())
    }

    fn lower_component(
        &mut self,
        ctx: &mut Context<'a>,
        element: &JSXElement<'a>,
    ) -> Result<(), CompilerError> {
        if let Some(construct) = crate::control::ControlConstruct::of(&element.opening_element.name) {
            return self.lower_control_construct(ctx, construct, element);
        }

        let reference = self.component_reference(&element.opening_element.name)?;
        let create_fn = self.require_id("createComponent")?;
        let var = self.generate_uid("comp")?;
        let attrs = self.lower_attributes(ctx.scope, var, &element.opening_element.attributes)?;

        let create = self.call(
            self.ident(create_fn),
            vec![
                self.ident(ctx.scope.root_element),
                self.ident(ctx.scope.root_ctx),
                reference,
                attrs.props,
            ],
        );
        ctx.statements.push(self.snippets.const_declaration(var, create)?);
        ctx.append(attrs.directives);

        if element.children.is_empty() {
            return Ok(());
        }
        let slot_scope = self.new_template_scope()?;
        let mut slot = ctx.descend(self.ast, slot_scope, attrs.compile);
        self.lower_children(&mut slot, &element.children)?;
        let closure = self.snippets.fragment_closure(
            slot_scope.root_element,
            slot_scope.root_ctx,
            slot.statements,
        )?;
        let set_slot = self.call(self.member(self.ident(var), "setSlot"), vec![closure]);
        ctx.statements.push(self.statement(set_slot));
        Ok(())
    }

    /// The component tag as an expression: identifiers and dotted paths only.
    fn component_reference(&self, name: &JSXElementName<'a>) -> Result<Expression<'a>, CompilerError> {
        match name {
            JSXElementName::IdentifierReference(id) => Ok(self
                .ast
                .expression_identifier(id.span, self.allocator.alloc_str(id.name.as_str()))),
            JSXElementName::Identifier(id) if is_identifier_name(id.name.as_str()) => Ok(self
                .ast
                .expression_identifier(id.span, self.allocator.alloc_str(id.name.as_str()))),
            JSXElementName::MemberExpression(member) => Ok(self.member_reference(member)),
            _ => Err(unknown_element(name)),
        }
    }

    fn member_reference(&self, member: &JSXMemberExpression<'a>) -> Expression<'a> {
        let object = match &member.object {
            JSXMemberExpressionObject::IdentifierReference(id) => self
                .ast
                .expression_identifier(id.span, self.allocator.alloc_str(id.name.as_str())),
            JSXMemberExpressionObject::MemberExpression(inner) => self.member_reference(inner),
            JSXMemberExpressionObject::ThisExpression(this) => self.ast.expression_this(this.span),
        };
        let property = self.allocator.alloc_str(member.property.name.as_str());
        Expression::from(self.ast.member_expression_static(
            member.span,
            object,
            self.ast.identifier_name(member.property.span, property),
            false,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn lower_attributes(
        &mut self,
        scope: Scope<'a>,
        target: &'a str,
        attributes: &[JSXAttributeItem<'a>],
    ) -> Result<LoweredAttributes<'a>, CompilerError> {
        let mut props = self.ast.vec();
        let mut directives = self.ast.vec();
        let mut compile = CompileDirectives::default();

        for item in attributes {
            let attr = match item {
                JSXAttributeItem::SpreadAttribute(spread) => {
                    props.push(
                        self.ast
                            .object_property_kind_spread_property(SPAN, self.clone_expr(&spread.argument)),
                    );
                    continue;
                }
                JSXAttributeItem::Attribute(attr) => attr,
            };

            let name = attribute_name(&attr.name);
            match classify_attribute(&name) {
                AttributeKind::Compile(modifier) => {
                    apply_compile_directive(&mut compile, modifier, attr)?;
                }
                AttributeKind::Directive(directive) => {
                    let value = match &attr.value {
                        None => self.ast.expression_null_literal(SPAN),
                        value => self.attribute_value(value),
                    };
                    directives.push(self.resolve_directive(scope, target, directive, &value)?);
                }
                AttributeKind::Prop => {
                    let key_name = self.allocator.alloc_str(&name);
                    let key = PropertyKey::StringLiteral(
                        self.ast.alloc(self.ast.string_literal(SPAN, key_name, None)),
                    );
                    let value = self.attribute_value(&attr.value);
                    props.push(self.ast.object_property_kind_object_property(
                        SPAN,
                        PropertyKind::Init,
                        key,
                        value,
                        false,
                        false,
                        false,
                    ));
                }
            }
        }

        Ok(LoweredAttributes {
            props: self.ast.expression_object(SPAN, props),
            directives,
            compile,
        })
    }

    /// No value is `true`, `{}` is `null`. Element values stay JSX and are
    /// lowered later as templates of their own. Valueless directives get
    /// `null` instead, see `lower_attributes`.
    fn attribute_value(&self, value: &Option<JSXAttributeValue<'a>>) -> Expression<'a> {
        match value {
            None => self.ast.expression_boolean_literal(SPAN, true),
            Some(JSXAttributeValue::StringLiteral(s)) => {
                let value = self.allocator.alloc_str(&decode_entities(s.value.as_str()));
                self.ast.expression_string_literal(s.span, value, None)
            }
            Some(JSXAttributeValue::ExpressionContainer(container)) => {
                match container.expression.as_expression() {
                    Some(expr) => self.clone_expr(expr),
                    None => self.ast.expression_null_literal(SPAN),
                }
            }
            Some(JSXAttributeValue::Element(element)) => {
                Expression::JSXElement(element.clone_in(self.allocator))
            }
            Some(JSXAttributeValue::Fragment(fragment)) => {
                Expression::JSXFragment(fragment.clone_in(self.allocator))
            }
        }
    }
}

fn unknown_element(name: &JSXElementName<'_>) -> CompilerError {
    CompilerError::at(
        ERR_UNKNOWN_ELEMENT,
        &format!("Unknown element <{}>", element_name(name)),
        name.span().start,
    )
}
