use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::generics::{GenericTypeInfo, generic_type_information, strip_generic_suffix};
use crate::errors::MapperError;

static QUALIFIED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("static regex compile")
});

/// Returns true for a dotted qualified name such as `app.dao.ConfigMapper`.
#[must_use]
pub fn is_qualified_name(name: &str) -> bool {
    QUALIFIED_NAME_RE.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Interface,
    Class,
}

/// Runtime metadata for a named type: its qualified name and the interfaces
/// it declares directly, as generic type strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub interfaces: Vec<String>,
}

impl Declaration {
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::Interface,
            interfaces: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DeclarationKind::Class,
            interfaces: Vec::new(),
        }
    }

    /// Adds a directly declared interface, e.g. `"java.util.List<app.Foo>"`.
    #[must_use]
    pub fn extends(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Interfaces declared on this type itself, in declaration order.
    pub fn declared_interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(String::as_str)
    }

    #[must_use]
    pub fn generic_type_information(&self) -> GenericTypeInfo {
        let info = generic_type_information(self.declared_interfaces());
        debug!(declaration = %self.name, ?info, "Generic type information");
        info
    }
}

/// Name-indexed table of every declaration the resolver can see.
///
/// Built once, then shared read-only behind an `Arc`.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    declarations: HashMap<String, Arc<Declaration>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Fails if the name is not a dotted qualified name or is already registered.
    pub fn register(&mut self, declaration: Declaration) -> Result<(), MapperError> {
        if !is_qualified_name(&declaration.name) {
            return Err(MapperError::InvalidDeclaration(format!(
                "{:?} is not a qualified name",
                declaration.name
            )));
        }
        if self.declarations.contains_key(&declaration.name) {
            return Err(MapperError::DuplicateDeclaration(declaration.name));
        }
        debug!(declaration = %declaration.name, interfaces = ?declaration.interfaces, "Registered declaration");
        self.declarations
            .insert(declaration.name.clone(), Arc::new(declaration));
        Ok(())
    }

    /// Builder-style [`TypeRegistry::register`].
    ///
    /// # Errors
    ///
    /// Same as [`TypeRegistry::register`].
    pub fn with(mut self, declaration: Declaration) -> Result<Self, MapperError> {
        self.register(declaration)?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Declaration>> {
        self.declarations.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Checks whether `name` implements `interface` anywhere in its interface
    /// hierarchy. Unknown names implement nothing; cycles are tolerated.
    #[must_use]
    pub fn implements(&self, name: &str, interface: &str) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![name];

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(declaration) = self.declarations.get(current) else {
                continue;
            };
            for declared in declaration.declared_interfaces() {
                let Some(raw) = strip_generic_suffix(declared) else {
                    warn!(declaration = %current, interface = %declared, "Skipping malformed generic interface");
                    continue;
                };
                if raw == interface {
                    return true;
                }
                pending.push(raw);
            }
        }
        false
    }
}
