//! A small generic registry used by all five provider kinds.
//!
//! Each provider kind has independent, unrelated trait objects, so the
//! registry is generic over `T: ?Sized` rather than duck-typed through
//! `Box<dyn Any>` — callers always get back a concretely-typed
//! `Arc<dyn Trait>` for the kind they asked for.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::StagecraftError;

pub struct ProviderRegistry<T: ?Sized> {
    component: &'static str,
    providers: BTreeMap<String, Arc<T>>,
}

impl<T: ?Sized> ProviderRegistry<T> {
    pub fn new(component: &'static str) -> Self {
        ProviderRegistry {
            component,
            providers: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, id: impl Into<String>, provider: Arc<T>) -> Result<(), StagecraftError> {
        let id = id.into();
        if self.providers.contains_key(&id) {
            return Err(StagecraftError::already_exists(format!(
                "{} provider '{id}' is already registered",
                self.component
            )));
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Arc<T>, StagecraftError> {
        self.providers.get(id).cloned().ok_or_else(|| {
            StagecraftError::not_found(format!(
                "{} provider '{id}' not found (known: {})",
                self.component,
                self.ids().join(", ")
            ))
        })
    }

    pub fn ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}
