//! Mocks and service builders shared by the unit and behavioural suites.

use mockall::mock;
use serde_json::Value;
use sidebar_types::{IdMap, Job};

use crate::a1::{A1Range, A1Span};
use crate::collaborators::{
    IdStore, Loader, LoaderError, LoaderRegistry, MemoryPropertyStore, MemoryWorkbook,
    PropertyStore, Rows, SheetIdStore, SheetStore, StoreError,
};
use crate::operations::Services;
use crate::session::Session;

pub(crate) const LOG_SHEET: &str = "Log";
pub(crate) const STORE_SHEET: &str = "Store";
pub(crate) const JOB_ID_KEY: &str = "jobId";

mock! {
    pub Sheets {}
    impl SheetStore for Sheets {
        fn clear(&self, sheet: &str, range: Option<A1Span>) -> Result<(), StoreError>;
        fn set_values(
            &self,
            sheet: &str,
            range: A1Range,
            rows: &[Vec<Value>],
        ) -> Result<(), StoreError>;
        fn get_values(&self, sheet: &str) -> Result<Rows, StoreError>;
        fn go_to_tab(&self, tab: &str) -> Result<(), StoreError>;
    }
}

mock! {
    pub Ids {}
    impl IdStore for Ids {
        fn initialize(&mut self, map: IdMap);
        fn store(&mut self) -> Result<(), StoreError>;
        fn load(&mut self) -> Result<(), StoreError>;
        fn data(&self) -> IdMap;
    }
}

mock! {
    pub Properties {}
    impl PropertyStore for Properties {
        fn get_property(&self, key: &str) -> Result<Option<String>, StoreError>;
        fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError>;
    }
}

mock! {
    pub EntityLoader {}
    impl Loader for EntityLoader {
        fn identify_items_to_load(&self, job: &mut Job) -> Result<(), LoaderError>;
        fn load(&self, job: &mut Job) -> Result<(), LoaderError>;
        fn push(&self, job: &mut Job) -> Result<(), LoaderError>;
        fn update_feed(&self, job: &mut Job) -> Result<(), LoaderError>;
        fn create_push_jobs(&self, job: &mut Job) -> Result<(), LoaderError>;
    }
}

/// Assembles services from the given parts, logging to [`LOG_SHEET`].
pub(crate) fn services(
    sheets: impl SheetStore + 'static,
    id_store: impl IdStore + 'static,
    loaders: LoaderRegistry,
    properties: impl PropertyStore + 'static,
) -> Services {
    Services::new(
        Box::new(sheets),
        Box::new(id_store),
        loaders,
        Session::new(Box::new(properties), JOB_ID_KEY),
        LOG_SHEET,
    )
}

/// Services whose only expected collaborator calls go to `sheets`.
pub(crate) fn services_with_sheets(sheets: MockSheets) -> Services {
    services(
        sheets,
        MockIds::new(),
        LoaderRegistry::new(),
        MockProperties::new(),
    )
}

/// Services whose only expected collaborator calls go to `id_store`.
pub(crate) fn services_with_id_store(id_store: MockIds) -> Services {
    services(
        MockSheets::new(),
        id_store,
        LoaderRegistry::new(),
        MockProperties::new(),
    )
}

/// Services with `loader` registered for `entity`.
pub(crate) fn services_with_loader(entity: &str, loader: MockEntityLoader) -> Services {
    let mut loaders = LoaderRegistry::new();
    loaders
        .register(entity, Box::new(loader))
        .expect("register loader");
    services(MockSheets::new(), MockIds::new(), loaders, MockProperties::new())
}

/// Services backed by the in-memory reference collaborators.
///
/// The returned workbook and property store share state with the services,
/// so tests can inspect what operations wrote.
pub(crate) fn memory_services() -> (Services, MemoryWorkbook, MemoryPropertyStore) {
    let workbook = MemoryWorkbook::with_sheets([LOG_SHEET, STORE_SHEET]);
    let properties = MemoryPropertyStore::new();
    let id_store = SheetIdStore::new(workbook.clone(), STORE_SHEET, 64);
    let services = services(
        workbook.clone(),
        id_store,
        LoaderRegistry::new(),
        properties.clone(),
    );
    (services, workbook, properties)
}
