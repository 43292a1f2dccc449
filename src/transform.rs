//! Program-level driver: finds every JSX literal and replaces it in place
//! with its lowered template closure.

use crate::error::CompilerError;
use crate::jsx_lowerer::TemplateLowerer;
use crate::parse::CompileOptions;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Program};
use oxc_ast_visit::walk_mut::{walk_expression, walk_program};
use oxc_ast_visit::VisitMut;

pub struct TemplateTransformer<'a> {
    pub lowerer: TemplateLowerer<'a>,
    pub errors: Vec<CompilerError>,
    pub templates: usize,
    verbose: bool,
}

impl<'a> TemplateTransformer<'a> {
    pub fn new(allocator: &'a Allocator, options: &CompileOptions) -> Self {
        Self {
            lowerer: TemplateLowerer::new(allocator, options),
            errors: Vec::new(),
            templates: 0,
            verbose: options.verbose,
        }
    }

    fn lower(&mut self, expr: &Expression<'a>) -> Option<Result<Expression<'a>, CompilerError>> {
        match expr {
            Expression::JSXElement(element) => Some(self.lowerer.lower_template(element)),
            Expression::JSXFragment(fragment) => Some(self.lowerer.lower_template_fragment(fragment)),
            _ => None,
        }
    }
}

impl<'a> VisitMut<'a> for TemplateTransformer<'a> {
    fn visit_program(&mut self, program: &mut Program<'a>) {
        self.lowerer.enter_program(program);
        walk_program(self, program);
        if !self.errors.is_empty() {
            return;
        }

        let body = std::mem::replace(&mut program.body, self.lowerer.ast.vec());
        match self.lowerer.finish_program(body) {
            Ok(body) => program.body = body,
            Err(e) => self.errors.push(e),
        }
        if self.verbose {
            eprintln!(
                "[RumiousNative] Lowered {} template(s), {} delegated event(s)",
                self.templates,
                self.lowerer.event_names.len()
            );
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        match self.lower(expr) {
            Some(Ok(template)) => {
                *expr = template;
                self.templates += 1;
            }
            Some(Err(e)) => {
                self.errors.push(e);
                return;
            }
            None => {}
        }
        // Props and dynamic parts may still hold JSX; those become templates
        // of their own.
        walk_expression(self, expr);
    }
}
