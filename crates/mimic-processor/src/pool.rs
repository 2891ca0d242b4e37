use std::collections::HashSet;

use indexmap::IndexMap;
use mimic_model::{InheritedMembers, MethodSignature, Modifiers, TypeDef};

/// Where the processor looks types up and writes composed types back.
pub trait TypePool {
    fn get(&self, name: &str) -> Option<&TypeDef>;

    /// Stores `ty` under its own name, returning the type it replaced.
    fn insert(&mut self, ty: TypeDef) -> Option<TypeDef>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Members `name` inherits from its superclass chain.
    ///
    /// The nearest declaration of a method signature or field name wins;
    /// private members are not inherited. Ancestors missing from the pool end
    /// the walk, but the inherited view recorded on the last known ancestor is
    /// still merged in.
    fn inherited_members(&self, name: &str) -> Option<InheritedMembers> {
        let ty = self.get(name)?;
        let mut out = InheritedMembers::default();
        let mut seen_methods = HashSet::<MethodSignature>::new();
        let mut seen_fields = HashSet::<String>::new();
        let mut visited = HashSet::from([ty.name.as_str()]);

        let mut last = ty;
        let mut next = ty.superclass.as_deref();
        while let Some(super_name) = next {
            if !visited.insert(super_name) {
                tracing::warn!(target: "mimic.processor", ty = name, "cyclic superclass chain");
                break;
            }
            let Some(ancestor) = self.get(super_name) else {
                break;
            };
            for method in &ancestor.methods {
                if !method.modifiers.contains(Modifiers::PRIVATE)
                    && seen_methods.insert(method.signature())
                {
                    out.methods.push(method.header());
                }
            }
            for field in &ancestor.fields {
                if !field.modifiers.contains(Modifiers::PRIVATE)
                    && seen_fields.insert(field.name.clone())
                {
                    out.fields.push(field.clone());
                }
            }
            last = ancestor;
            next = ancestor.superclass.as_deref();
        }

        let outer = if std::ptr::eq(last, ty) {
            // No ancestor in the pool: keep whatever view the type already had.
            &ty.inherited
        } else {
            &last.inherited
        };
        for header in &outer.methods {
            if seen_methods.insert(header.signature()) {
                out.methods.push(header.clone());
            }
        }
        for field in &outer.fields {
            if seen_fields.insert(field.name.clone()) {
                out.fields.push(field.clone());
            }
        }
        Some(out)
    }
}

/// Simple in-memory pool, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTypePool {
    types: IndexMap<String, TypeDef>,
}

impl MemoryTypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool from a JSON array of type definitions.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let types: Vec<TypeDef> = serde_json::from_str(text)?;
        Ok(types.into_iter().collect())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let types: Vec<&TypeDef> = self.types.values().collect();
        serde_json::to_string_pretty(&types)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }
}

impl FromIterator<TypeDef> for MemoryTypePool {
    fn from_iter<I: IntoIterator<Item = TypeDef>>(iter: I) -> Self {
        let mut pool = Self::new();
        for ty in iter {
            pool.insert(ty);
        }
        pool
    }
}

impl TypePool for MemoryTypePool {
    fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    fn insert(&mut self, ty: TypeDef) -> Option<TypeDef> {
        self.types.insert(ty.name.clone(), ty)
    }
}
