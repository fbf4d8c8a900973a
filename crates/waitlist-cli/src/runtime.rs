// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use waitlist_app::{ServiceProvider, WaitlistStore};
use waitlist_tui::AppRuntime;

/// In-memory runtime: loads once at startup and applies edits to the
/// working set. Nothing is written back to the seed file.
#[derive(Debug)]
pub struct MemoryRuntime {
    store: WaitlistStore,
}

impl MemoryRuntime {
    pub fn new(providers: Vec<ServiceProvider>) -> Result<Self> {
        Ok(Self {
            store: WaitlistStore::new(providers)?,
        })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}

impl AppRuntime for MemoryRuntime {
    fn load_providers(&mut self) -> Result<Vec<ServiceProvider>> {
        Ok(self.store.providers().to_vec())
    }

    fn update_provider(&mut self, provider: ServiceProvider) -> Result<()> {
        let id = provider.id;
        if !self.store.apply_update(provider) {
            bail!("no provider with id {}", id.get());
        }
        Ok(())
    }
}

/// Reads a JSON array of provider records.
pub fn load_seed_file(path: &Path) -> Result<Vec<ServiceProvider>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read seed file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse seed file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{MemoryRuntime, load_seed_file};
    use anyhow::Result;
    use waitlist_app::{OnboardingStatus, ProviderId};
    use waitlist_testkit::{ProviderFaker, temp_seed_file};
    use waitlist_tui::AppRuntime;

    #[test]
    fn seed_file_loads_into_the_runtime() -> Result<()> {
        let mut faker = ProviderFaker::new(21);
        let providers = faker.providers(6);
        let (_dir, path) = temp_seed_file(&providers)?;

        let loaded = load_seed_file(&path)?;
        let mut runtime = MemoryRuntime::new(loaded)?;
        assert_eq!(runtime.len(), 6);
        assert_eq!(runtime.load_providers()?, providers);
        Ok(())
    }

    #[test]
    fn malformed_seed_file_reports_the_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json")?;

        let error = load_seed_file(&path).expect_err("malformed seed should fail");
        assert!(error.to_string().contains("parse seed file"));
        Ok(())
    }

    #[test]
    fn duplicate_seed_ids_are_rejected() -> Result<()> {
        let mut faker = ProviderFaker::new(3);
        let mut providers = faker.providers(2);
        providers[1].id = providers[0].id;

        let error = MemoryRuntime::new(providers).expect_err("duplicate ids should fail");
        assert!(error.to_string().contains("duplicate provider id"));
        Ok(())
    }

    #[test]
    fn update_replaces_the_record_in_place() -> Result<()> {
        let mut faker = ProviderFaker::new(14);
        let mut runtime = MemoryRuntime::new(faker.providers(3))?;

        let mut updated = runtime.load_providers()?[1].clone();
        updated.status = OnboardingStatus::Onboarded;
        runtime.update_provider(updated.clone())?;

        let providers = runtime.load_providers()?;
        assert_eq!(providers[1], updated);
        assert_eq!(providers.len(), 3);
        Ok(())
    }

    #[test]
    fn update_for_unknown_id_fails() -> Result<()> {
        let mut faker = ProviderFaker::new(5);
        let mut runtime = MemoryRuntime::new(faker.providers(2))?;

        let mut ghost = runtime.load_providers()?[0].clone();
        ghost.id = ProviderId::new(999);
        let error = runtime
            .update_provider(ghost)
            .expect_err("unknown id should fail");
        assert!(error.to_string().contains("no provider with id 999"));
        Ok(())
    }
}
