//! Persisting the id map between sessions.

use sidebar_types::Job;

use super::{OperationError, Services};

/// Replaces the stored id map with `job.idMap`.
///
/// # Errors
///
/// Returns [`OperationError::MissingField`] without an id map and store
/// failures verbatim.
pub fn save_id_map(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    let map = job
        .id_map
        .clone()
        .ok_or_else(|| OperationError::missing_field("idMap"))?;
    services.id_store.initialize(map);
    services.id_store.store()?;
    Ok(())
}

/// Reads the stored id map into `job.idMap`.
///
/// # Errors
///
/// Returns store failures verbatim; `job.idMap` is left untouched.
pub fn load_id_map(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    services.id_store.load()?;
    job.id_map = Some(services.id_store.data());
    Ok(())
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;
    use serde_json::json;
    use sidebar_types::IdMap;

    use super::*;
    use crate::collaborators::StoreError;
    use crate::tests::support::{MockIds, memory_services, services_with_id_store};

    fn campaign_map() -> IdMap {
        let mut map = IdMap::new();
        map.insert("Campaign", json!({"ext-1": 1001}));
        map
    }

    #[test]
    fn initializes_then_stores() {
        let mut ids = MockIds::new();
        let mut sequence = Sequence::new();
        ids.expect_initialize()
            .with(eq(campaign_map()))
            .once()
            .in_sequence(&mut sequence)
            .return_const(());
        ids.expect_store()
            .once()
            .in_sequence(&mut sequence)
            .returning(|| Ok(()));
        let mut services = services_with_id_store(ids);

        let mut job = Job {
            id_map: Some(campaign_map()),
            ..Job::new()
        };
        save_id_map(&mut services, &mut job).expect("save");
        assert_eq!(job.id_map, Some(campaign_map()));
    }

    #[test]
    fn saving_requires_an_id_map() {
        let mut services = services_with_id_store(MockIds::new());
        let error = save_id_map(&mut services, &mut Job::new()).expect_err("missing id map");
        assert!(matches!(error, OperationError::MissingField { field: "idMap" }));
    }

    #[test]
    fn load_failures_leave_the_job_untouched() {
        let mut ids = MockIds::new();
        ids.expect_load()
            .once()
            .returning(|| Err(StoreError::corrupt("Store", "expected value")));
        let mut services = services_with_id_store(ids);

        let mut job = Job::new();
        let error = load_id_map(&mut services, &mut job).expect_err("load failure");
        assert_eq!(error.to_string(), "corrupt data in Store: expected value");
        assert!(job.id_map.is_none());
    }

    #[test]
    fn round_trips_through_the_store_sheet() {
        let (mut services, _workbook, _properties) = memory_services();
        let mut saved = Job {
            id_map: Some(campaign_map()),
            ..Job::new()
        };
        save_id_map(&mut services, &mut saved).expect("save");

        let mut loaded = Job::new();
        load_id_map(&mut services, &mut loaded).expect("load");
        assert_eq!(loaded.id_map, Some(campaign_map()));
    }
}
