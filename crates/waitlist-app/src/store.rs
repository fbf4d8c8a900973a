// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::collections::BTreeSet;

use crate::ids::ProviderId;
use crate::model::ServiceProvider;

/// The working record set. Volatile: created once at startup from the
/// injected seed and mutated in place by id-replacement, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WaitlistStore {
    providers: Vec<ServiceProvider>,
}

impl WaitlistStore {
    /// Builds the store from the initial data set, rejecting duplicate ids
    /// so id-keyed replacement stays unambiguous.
    pub fn new(providers: Vec<ServiceProvider>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for provider in &providers {
            if !seen.insert(provider.id) {
                bail!(
                    "duplicate provider id {} in seed data; ids must be unique",
                    provider.id.get()
                );
            }
        }
        Ok(Self { providers })
    }

    pub fn providers(&self) -> &[ServiceProvider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get(&self, id: ProviderId) -> Option<&ServiceProvider> {
        self.providers.iter().find(|provider| provider.id == id)
    }

    /// Replaces the record whose id matches `updated`, wholesale and in
    /// place. Last write wins; position and every other record are
    /// untouched. Returns false when no record carries that id.
    pub fn apply_update(&mut self, updated: ServiceProvider) -> bool {
        match self
            .providers
            .iter_mut()
            .find(|provider| provider.id == updated.id)
        {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}
