//! Synthesis of generated code fragments.
//!
//! Generated statements whose shape is fixed (declarations, arrow skeletons,
//! import declarations) are written as source text, parsed into the file's
//! arena and stripped of their spans so they never map back into the user's
//! source. User expressions are then spliced into the parsed skeletons.

use crate::error::CompilerError;
use oxc_allocator::{Allocator, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::VisitMut;
use oxc_parser::Parser;
use oxc_span::{SourceType, Span, SPAN};

struct SpanEraser;

impl<'a> VisitMut<'a> for SpanEraser {
    fn visit_span(&mut self, span: &mut Span) {
        *span = SPAN;
    }
}

#[derive(Clone, Copy)]
pub struct Snippets<'a> {
    allocator: &'a Allocator,
    ast: AstBuilder<'a>,
}

impl<'a> Snippets<'a> {
    pub fn new(allocator: &'a Allocator) -> Self {
        Self {
            allocator,
            ast: AstBuilder::new(allocator),
        }
    }

    pub fn expression(&self, code: &str) -> Result<Expression<'a>, CompilerError> {
        let source = self.allocator.alloc_str(code);
        let mut expr = Parser::new(self.allocator, source, SourceType::mjs())
            .parse_expression()
            .map_err(|_| CompilerError::internal(&format!("Invalid generated expression `{}`", code)))?;
        SpanEraser.visit_expression(&mut expr);
        Ok(expr)
    }

    pub fn statements(&self, code: &str) -> Result<ArenaVec<'a, Statement<'a>>, CompilerError> {
        let source = self.allocator.alloc_str(code);
        let ret = Parser::new(self.allocator, source, SourceType::mjs()).parse();
        if ret.panicked || !ret.errors.is_empty() {
            return Err(CompilerError::internal(&format!(
                "Invalid generated statements `{}`",
                code
            )));
        }
        let mut body = ret.program.body;
        for stmt in body.iter_mut() {
            SpanEraser.visit_statement(stmt);
        }
        Ok(body)
    }

    /// `const <name> = <init>;`
    pub fn const_declaration(
        &self,
        name: &str,
        init: Expression<'a>,
    ) -> Result<Statement<'a>, CompilerError> {
        let mut stmt = self.single_statement(&format!("const {} = 0;", name))?;
        if let Statement::VariableDeclaration(decl) = &mut stmt {
            if let Some(declarator) = decl.declarations.first_mut() {
                declarator.init = Some(init);
            }
        }
        Ok(stmt)
    }

    /// `(<params>) => <body>` with an expression body.
    pub fn arrow(&self, params: &str, body: Expression<'a>) -> Result<Expression<'a>, CompilerError> {
        let mut expr = self.expression(&format!("({}) => 0", params))?;
        if let Expression::ArrowFunctionExpression(arrow) = &mut expr {
            if let Some(Statement::ExpressionStatement(stmt)) = arrow.body.statements.first_mut() {
                stmt.expression = body;
            }
        }
        Ok(expr)
    }

    /// `(<ctx>) => { const <root> = document.createDocumentFragment(); ...; return <root>; }`
    pub fn fragment_closure(
        &self,
        root_element: &str,
        root_ctx: &str,
        statements: ArenaVec<'a, Statement<'a>>,
    ) -> Result<Expression<'a>, CompilerError> {
        let mut expr = self.expression(&format!(
            "({ctx}) => {{ const {root} = document.createDocumentFragment(); return {root}; }}",
            ctx = root_ctx,
            root = root_element
        ))?;
        if let Expression::ArrowFunctionExpression(arrow) = &mut expr {
            let skeleton = std::mem::replace(&mut arrow.body.statements, self.ast.vec());
            let mut skeleton = skeleton.into_iter();
            let mut body = self.ast.vec();
            if let Some(create_root) = skeleton.next() {
                body.push(create_root);
            }
            for stmt in statements {
                body.push(stmt);
            }
            if let Some(return_root) = skeleton.next() {
                body.push(return_root);
            }
            arrow.body.statements = body;
        }
        Ok(expr)
    }

    fn single_statement(&self, code: &str) -> Result<Statement<'a>, CompilerError> {
        self.statements(code)?
            .into_iter()
            .next()
            .ok_or_else(|| CompilerError::internal(&format!("Empty generated statement `{}`", code)))
    }
}
