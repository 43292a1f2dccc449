//! Control-flow components: `<If>`, `<For>` and `<Fragment>`.
//!
//! `If` and `For` hand their props to runtime components that template their
//! own children, so children are never lowered here. `Fragment` flattens its
//! children into the enclosing scope.

use crate::context::{CompileDirectives, Context};
use crate::directive::{classify_attribute, AttributeKind};
use crate::error::CompilerError;
use crate::jsx_lowerer::{apply_compile_directive, attribute_name, TemplateLowerer};
use oxc_ast::ast::{JSXAttributeItem, JSXElement, JSXElementName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlConstruct {
    If,
    For,
    Fragment,
}

impl ControlConstruct {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "If" => Some(ControlConstruct::If),
            "For" => Some(ControlConstruct::For),
            "Fragment" => Some(ControlConstruct::Fragment),
            _ => None,
        }
    }

    /// Only bare identifiers name a control construct; `ui.If` is a component.
    pub fn of(name: &JSXElementName<'_>) -> Option<Self> {
        match name {
            JSXElementName::IdentifierReference(id) => Self::from_tag(id.name.as_str()),
            JSXElementName::Identifier(id) => Self::from_tag(id.name.as_str()),
            _ => None,
        }
    }

    fn runtime_constructor(self) -> Option<(&'static str, &'static str)> {
        match self {
            ControlConstruct::If => Some(("createIfComponent", "if_comp")),
            ControlConstruct::For => Some(("createForComponent", "for_comp")),
            ControlConstruct::Fragment => None,
        }
    }
}

impl<'a> TemplateLowerer<'a> {
    pub(crate) fn lower_control_construct(
        &mut self,
        ctx: &mut Context<'a>,
        construct: ControlConstruct,
        element: &JSXElement<'a>,
    ) -> Result<(), CompilerError> {
        let Some((constructor, binding)) = construct.runtime_constructor() else {
            return self.lower_fragment_component(ctx, element);
        };

        let create_fn = self.require_id(constructor)?;
        let var = self.generate_uid(binding)?;
        let attrs = self.lower_attributes(ctx.scope, var, &element.opening_element.attributes)?;
        let create = self.call(
            self.ident(create_fn),
            vec![
                self.ident(ctx.scope.root_element),
                self.ident(ctx.scope.root_ctx),
                attrs.props,
            ],
        );
        ctx.statements.push(self.snippets.const_declaration(var, create)?);
        // Directives on If/For bind to the control component itself.
        ctx.append(attrs.directives);
        Ok(())
    }

    fn lower_fragment_component(
        &mut self,
        ctx: &mut Context<'a>,
        element: &JSXElement<'a>,
    ) -> Result<(), CompilerError> {
        let mut directives = CompileDirectives::default();
        for item in &element.opening_element.attributes {
            if let JSXAttributeItem::Attribute(attr) = item {
                let name = attribute_name(&attr.name);
                if let AttributeKind::Compile(modifier) = classify_attribute(&name) {
                    apply_compile_directive(&mut directives, modifier, attr)?;
                }
            }
        }

        let mut inner = ctx.descend(self.ast, ctx.scope, directives);
        self.lower_children(&mut inner, &element.children)?;
        ctx.append(inner.statements);
        Ok(())
    }
}
