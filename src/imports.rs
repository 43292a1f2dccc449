//! Deduplicated runtime imports for one compiled file.

use crate::error::CompilerError;
use crate::scope::UidGenerator;
use crate::snippet::Snippets;
use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::Statement;

#[derive(Debug)]
struct ModuleImports {
    module: String,
    /// (imported symbol, local alias) in request order
    symbols: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct ImportRegistry {
    modules: Vec<ModuleImports>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the local alias for `symbol` imported from `module`, minting it
    /// on the first request. The same alias is returned for every later
    /// request of the same pair.
    pub fn require_id(&mut self, uids: &mut UidGenerator, symbol: &str, module: &str) -> String {
        let index = match self.modules.iter().position(|m| m.module == module) {
            Some(index) => index,
            None => {
                self.modules.push(ModuleImports {
                    module: module.to_string(),
                    symbols: Vec::new(),
                });
                self.modules.len() - 1
            }
        };
        let entry = &mut self.modules[index];

        if let Some((_, alias)) = entry.symbols.iter().find(|(name, _)| name == symbol) {
            return alias.clone();
        }

        let alias = uids.generate(symbol);
        entry.symbols.push((symbol.to_string(), alias.clone()));
        alias
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// (module, [(symbol, alias)]) pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[(String, String)])> {
        self.modules
            .iter()
            .map(|m| (m.module.as_str(), m.symbols.as_slice()))
    }

    /// One `import { symbol as alias, ... } from "module";` per module.
    pub fn generate_import_declarations<'a>(
        &self,
        snippets: &Snippets<'a>,
    ) -> Result<ArenaVec<'a, Statement<'a>>, CompilerError> {
        let code = self
            .modules
            .iter()
            .map(|m| {
                let specifiers = m
                    .symbols
                    .iter()
                    .map(|(symbol, alias)| format!("{} as {}", symbol, alias))
                    .collect::<Vec<_>>()
                    .join(", ");
                let source = serde_json::to_string(&m.module).unwrap_or_default();
                format!("import {{ {} }} from {};", specifiers, source)
            })
            .collect::<Vec<_>>()
            .join("\n");
        snippets.statements(&code)
    }
}
