//! Program scope: collision-free identifier generation for one file.

use oxc_ast::ast::{BindingIdentifier, IdentifierReference, Program};
use oxc_ast_visit::Visit;
use std::collections::{HashMap, HashSet};

/// Mints `_name`, `_name2`, `_name3`, ... skipping every name that already
/// exists in the file or has been handed out before.
#[derive(Debug, Default)]
pub struct UidGenerator {
    used: HashSet<String>,
    counters: HashMap<String, u32>,
}

impl UidGenerator {
    pub fn new(used: HashSet<String>) -> Self {
        Self {
            used,
            counters: HashMap::new(),
        }
    }

    /// Establish the program scope by collecting every identifier in it.
    pub fn for_program(program: &Program<'_>) -> Self {
        let mut collector = NameCollector {
            names: HashSet::new(),
        };
        collector.visit_program(program);
        Self::new(collector.names)
    }

    pub fn generate(&mut self, name: &str) -> String {
        let base = name.trim_matches('_');
        let base = if base.is_empty() { "temp" } else { base };

        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = if *counter == 1 {
                format!("_{}", base)
            } else {
                format!("_{}{}", base, counter)
            };
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}

struct NameCollector {
    names: HashSet<String>,
}

impl<'a> Visit<'a> for NameCollector {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.names.insert(ident.name.to_string());
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.names.insert(ident.name.to_string());
    }
}
