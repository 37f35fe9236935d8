//! Operations routed to the loader registered for `job.entity`.

use sidebar_types::Job;

use super::{OperationError, Services};

/// Records the items a load should fetch.
///
/// # Errors
///
/// Returns [`OperationError::MissingField`] without an entity,
/// [`OperationError::UnknownEntity`] when no loader handles it, and loader
/// failures verbatim.
pub fn identify_items_to_load(
    services: &mut Services,
    job: &mut Job,
) -> Result<(), OperationError> {
    services.loader_for(job)?.identify_items_to_load(job)?;
    Ok(())
}

/// Loads items from the platform.
///
/// # Errors
///
/// As for [`identify_items_to_load`].
pub fn cm_load(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    services.loader_for(job)?.load(job)?;
    Ok(())
}

/// Pushes sheet rows to the platform.
///
/// # Errors
///
/// As for [`identify_items_to_load`].
pub fn cm_push(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    services.loader_for(job)?.push(job)?;
    Ok(())
}

/// Rewrites the feed carried by the job.
///
/// # Errors
///
/// As for [`identify_items_to_load`].
pub fn update_feed(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    services.loader_for(job)?.update_feed(job)?;
    Ok(())
}

/// Splits a push into sub-jobs.
///
/// # Errors
///
/// As for [`identify_items_to_load`].
pub fn create_push_jobs(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    services.loader_for(job)?.create_push_jobs(job)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use sidebar_types::{ItemId, SubJob};

    use super::*;
    use crate::collaborators::LoaderError;
    use crate::tests::support::{MockEntityLoader, services_with_loader};

    type Handler = fn(&mut Services, &mut Job) -> Result<(), OperationError>;

    fn expect_call(loader: &mut MockEntityLoader, handler: &str) {
        let mark = |job: &mut Job| -> Result<(), LoaderError> {
            job.extra.insert("handledBy".to_owned(), json!("loader"));
            Ok(())
        };
        match handler {
            "identify" => {
                loader.expect_identify_items_to_load().once().returning(mark);
            }
            "load" => {
                loader.expect_load().once().returning(mark);
            }
            "push" => {
                loader.expect_push().once().returning(mark);
            }
            "feed" => {
                loader.expect_update_feed().once().returning(mark);
            }
            "plan" => {
                loader.expect_create_push_jobs().once().returning(mark);
            }
            other => panic!("unknown handler {other}"),
        }
    }

    #[rstest]
    #[case("identify", identify_items_to_load as Handler)]
    #[case("load", cm_load as Handler)]
    #[case("push", cm_push as Handler)]
    #[case("feed", update_feed as Handler)]
    #[case("plan", create_push_jobs as Handler)]
    fn routes_to_the_matching_loader_method(#[case] name: &str, #[case] handler: Handler) {
        let mut loader = MockEntityLoader::new();
        expect_call(&mut loader, name);
        let mut services = services_with_loader("Campaign", loader);

        let mut job = Job::for_entity("Campaign");
        handler(&mut services, &mut job).expect("handler succeeds");
        assert_eq!(job.extra.get("handledBy"), Some(&json!("loader")));
    }

    #[rstest]
    fn requires_an_entity() {
        let mut services = services_with_loader("Campaign", MockEntityLoader::new());
        let error = cm_load(&mut services, &mut Job::new()).expect_err("missing entity");
        assert!(matches!(error, OperationError::MissingField { field: "entity" }));
    }

    #[rstest]
    fn rejects_unregistered_entities() {
        let mut services = services_with_loader("Campaign", MockEntityLoader::new());
        let error =
            cm_push(&mut services, &mut Job::for_entity("Creative")).expect_err("unknown entity");
        assert_eq!(error.to_string(), "no loader registered for entity 'Creative'");
    }

    #[rstest]
    fn keeps_partial_results_when_the_loader_fails() {
        let mut loader = MockEntityLoader::new();
        loader.expect_create_push_jobs().once().returning(|job: &mut Job| {
            job.jobs = Some(vec![SubJob::default()]);
            job.ids_to_load = Some(vec![ItemId::Numeric(7)]);
            Err(LoaderError::new("quota exceeded"))
        });
        let mut services = services_with_loader("Ad", loader);

        let mut job = Job::for_entity("Ad");
        let error = create_push_jobs(&mut services, &mut job).expect_err("loader failure");
        assert_eq!(error.to_string(), "quota exceeded");
        assert_eq!(job.jobs.as_ref().map(Vec::len), Some(1));
        assert_eq!(job.ids_to_load, Some(vec![ItemId::Numeric(7)]));
    }
}
