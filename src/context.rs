//! Per-frame lowering state.

use crate::whitespace::WhitespaceMode;
use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::Statement;
use oxc_ast::AstBuilder;

/// The already-constructed node new statements attach to, and the reactive
/// context identifier they run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope<'a> {
    pub root_element: &'a str,
    pub root_ctx: &'a str,
}

/// Compile-time options set through the `compile:` attribute namespace.
/// `None` means "inherit from the parent".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileDirectives {
    pub preserve_whitespace: Option<WhitespaceMode>,
}

impl CompileDirectives {
    /// Directives every top-level template starts from.
    pub fn root() -> Self {
        Self {
            preserve_whitespace: Some(WhitespaceMode::Preserve),
        }
    }

    /// Overrides win; gaps are filled from `self`.
    pub fn merge(self, overrides: CompileDirectives) -> Self {
        Self {
            preserve_whitespace: overrides.preserve_whitespace.or(self.preserve_whitespace),
        }
    }

    pub fn whitespace_mode(&self) -> WhitespaceMode {
        self.preserve_whitespace.unwrap_or(WhitespaceMode::Collapse)
    }
}

/// One lowering frame. The statement list is owned by this frame only and is
/// moved into the parent's list once the frame is finished.
pub struct Context<'a> {
    pub scope: Scope<'a>,
    pub statements: ArenaVec<'a, Statement<'a>>,
    pub directives: CompileDirectives,
}

impl<'a> Context<'a> {
    pub fn new(ast: AstBuilder<'a>, scope: Scope<'a>, directives: CompileDirectives) -> Self {
        Self {
            scope,
            statements: ast.vec(),
            directives,
        }
    }

    /// A child frame under `scope` inheriting this frame's directives.
    pub fn descend(
        &self,
        ast: AstBuilder<'a>,
        scope: Scope<'a>,
        overrides: CompileDirectives,
    ) -> Self {
        Self::new(ast, scope, self.directives.merge(overrides))
    }

    pub fn append(&mut self, statements: ArenaVec<'a, Statement<'a>>) {
        for stmt in statements {
            self.statements.push(stmt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;

    #[test]
    fn test_child_directives_win() {
        let parent = CompileDirectives::root();
        let child = CompileDirectives {
            preserve_whitespace: Some(WhitespaceMode::Smart),
        };
        assert_eq!(
            parent.merge(child).preserve_whitespace,
            Some(WhitespaceMode::Smart)
        );
    }

    #[test]
    fn test_parent_fills_gaps() {
        let parent = CompileDirectives::root();
        assert_eq!(
            parent.merge(CompileDirectives::default()).whitespace_mode(),
            WhitespaceMode::Preserve
        );
        assert_eq!(
            CompileDirectives::default().whitespace_mode(),
            WhitespaceMode::Collapse
        );
    }

    #[test]
    fn test_descend_isolates_siblings() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let scope = Scope {
            root_element: "_root",
            root_ctx: "_ctx",
        };
        let parent = Context::new(ast, scope, CompileDirectives::root());

        let collapsed = parent.descend(
            ast,
            scope,
            CompileDirectives {
                preserve_whitespace: Some(WhitespaceMode::Collapse),
            },
        );
        let sibling = parent.descend(ast, scope, CompileDirectives::default());

        assert_eq!(collapsed.directives.whitespace_mode(), WhitespaceMode::Collapse);
        assert_eq!(sibling.directives.whitespace_mode(), WhitespaceMode::Preserve);
        assert_eq!(parent.directives, CompileDirectives::root());
    }
}
