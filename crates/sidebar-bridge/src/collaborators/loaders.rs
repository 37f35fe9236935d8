//! Entity loaders and their registry.
//!
//! A loader owns the platform-specific work for one entity type (campaigns,
//! placements, ads and so on). The bridge only routes jobs to it: each call
//! receives the job envelope and mutates it in place, and whatever the loader
//! leaves in the job is returned to the sidebar.

use std::collections::HashMap;
use std::fmt;

use sidebar_types::Job;
use thiserror::Error;

/// Failure reported by a loader. The message reaches the sidebar verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoaderError {
    message: String,
}

impl LoaderError {
    /// Creates an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message shown to the sidebar.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Entity-specific business logic invoked by the loader operations.
pub trait Loader {
    /// Works out which items a load should fetch and records them on `job`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] when the items cannot be determined.
    fn identify_items_to_load(&self, job: &mut Job) -> Result<(), LoaderError>;

    /// Fetches items from the platform into the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] when the platform call fails.
    fn load(&self, job: &mut Job) -> Result<(), LoaderError>;

    /// Pushes sheet rows to the platform.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] when the platform rejects the push.
    fn push(&self, job: &mut Job) -> Result<(), LoaderError>;

    /// Rewrites the feed carried by `job`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] when the feed cannot be updated.
    fn update_feed(&self, job: &mut Job) -> Result<(), LoaderError>;

    /// Splits the push described by `job` into sub-jobs.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] when the sub-jobs cannot be planned.
    fn create_push_jobs(&self, job: &mut Job) -> Result<(), LoaderError>;
}

/// Loaders keyed by the entity tag carried in `job.entity`.
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Box<dyn Loader>>,
}

impl LoaderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `loader` for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] if a loader is already registered for
    /// `entity`. The existing loader is kept.
    pub fn register(
        &mut self,
        entity: impl Into<String>,
        loader: Box<dyn Loader>,
    ) -> Result<(), LoaderError> {
        let entity = entity.into();
        if self.loaders.contains_key(&entity) {
            return Err(LoaderError::new(format!(
                "loader for entity '{entity}' is already registered"
            )));
        }
        self.loaders.insert(entity, loader);
        Ok(())
    }

    /// Looks up the loader for `entity`. Matching is exact.
    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&dyn Loader> {
        self.loaders.get(entity).map(Box::as_ref)
    }

    /// Registered entity tags in alphabetical order.
    #[must_use]
    pub fn entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        entities.sort_unstable();
        entities
    }

    /// Returns the number of registered loaders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Returns `true` when no loaders are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("entities", &self.entities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::tests::support::MockEntityLoader;

    #[fixture]
    fn registry() -> LoaderRegistry {
        let mut registry = LoaderRegistry::new();
        registry
            .register("Campaign", Box::new(MockEntityLoader::new()))
            .expect("register campaign loader");
        registry
    }

    #[rstest]
    fn looks_up_registered_loaders(registry: LoaderRegistry) {
        assert!(registry.get("Campaign").is_some());
        assert!(registry.get("campaign").is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[rstest]
    fn rejects_duplicate_entities(mut registry: LoaderRegistry) {
        let error = registry
            .register("Campaign", Box::new(MockEntityLoader::new()))
            .expect_err("duplicate registration");
        assert!(error.message().contains("already registered"));
        assert_eq!(registry.len(), 1);
    }

    #[rstest]
    fn lists_entities_in_order(mut registry: LoaderRegistry) {
        registry
            .register("Ad", Box::new(MockEntityLoader::new()))
            .expect("register ad loader");
        assert_eq!(registry.entities(), vec!["Ad", "Campaign"]);
        assert_eq!(format!("{registry:?}"), r#"LoaderRegistry { entities: ["Ad", "Campaign"] }"#);
    }

    #[test]
    fn registered_loader_receives_the_job() {
        let mut loader = MockEntityLoader::new();
        loader.expect_load().once().returning(|job: &mut Job| {
            job.sheet_name = Some("Campaign".to_owned());
            Ok(())
        });
        let mut registry = LoaderRegistry::new();
        registry
            .register("Campaign", Box::new(loader))
            .expect("register");

        let mut job = Job::for_entity("Campaign");
        registry
            .get("Campaign")
            .expect("loader")
            .load(&mut job)
            .expect("load");
        assert_eq!(job.sheet_name.as_deref(), Some("Campaign"));
    }
}
