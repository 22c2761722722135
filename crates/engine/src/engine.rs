//! The product rule engine.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use tradegate_catalog::{
    NewProduct, Product, ProductDetail, ProductValidator, StandardProductValidator,
};
use tradegate_core::{CategoryId, Clock, Money, ProductId, SystemClock};
use tradegate_infra::{CacheStore, InMemoryCacheStore, QueryCache, TransactionRunner};
use tradegate_store::{CategoryProvider, ProductStore};

use crate::access::{AccessPolicy, PermitAll, Permission};
use crate::config::EngineConfig;
use crate::error::{EngineError, RuleViolation};
use crate::filter::ProductFilter;
use crate::pipeline::Pipeline;
use crate::policy::MaintenanceWindow;
use crate::rules::{self, BusinessRule};

/// Every cached product read lives under this key prefix; a successful add
/// drops the whole namespace.
const CACHE_PREFIX: &str = "products.";

/// A category may hold this many products; one more is rejected.
const CATEGORY_PRODUCT_LIMIT: usize = 10;

/// The catalog may hold this many categories; one more blocks adds.
const CATEGORY_LIMIT: usize = 15;

/// Interval between attempts to take the mutation gate.
const GATE_RETRY: Duration = Duration::from_millis(10);

/// Gatekeeper for all product mutations and reads.
///
/// ## Responsibilities
///
/// - run field validation and the three ordered business rules before any
///   mutation reaches the store
/// - serialize mutations through a bounded-wait gate so two concurrent adds
///   cannot both pass the count and uniqueness checks
/// - cache the hot read paths and invalidate them on every successful add
/// - refuse the details view during the maintenance hour
///
/// ## Collaborators
///
/// The engine owns no state beyond its mutation gate. Products live in a
/// [`ProductStore`], categories come from a [`CategoryProvider`], field
/// checks from a [`ProductValidator`], permissions from an [`AccessPolicy`]
/// and time from a [`Clock`]; all are injected, with sensible defaults for
/// everything but the two data sources.
///
/// ## Failure model
///
/// Expected outcomes (validation, rule violations, the maintenance gate,
/// missing permissions) come back as [`EngineError`] values with stable
/// display strings. Reads treat absence as data: an unknown id is
/// `Ok(None)` and an unknown category or empty price window is an empty
/// vector.
pub struct ProductEngine {
    store: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryProvider>,
    validator: Arc<dyn ProductValidator>,
    access: Arc<dyn AccessPolicy>,
    clock: Arc<dyn Clock>,
    cache_store: Arc<dyn CacheStore>,
    config: EngineConfig,
    mutation_gate: Mutex<()>,
}

impl ProductEngine {
    /// Engine over the given data sources with default collaborators:
    /// standard validator, permit-all access policy, system clock,
    /// process-local cache and default configuration.
    pub fn new(store: Arc<dyn ProductStore>, categories: Arc<dyn CategoryProvider>) -> Self {
        Self {
            store,
            categories,
            validator: Arc::new(StandardProductValidator),
            access: Arc::new(PermitAll),
            clock: Arc::new(SystemClock),
            cache_store: Arc::new(InMemoryCacheStore::new()),
            config: EngineConfig::default(),
            mutation_gate: Mutex::new(()),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn ProductValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_access_policy(mut self, access: Arc<dyn AccessPolicy>) -> Self {
        self.access = access;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cache_store(mut self, cache_store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = cache_store;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate, rule-check and insert one product, returning its id.
    ///
    /// Stages: `validate` → `authorize` → `acquire-gate` → `rule-check` →
    /// `execute` → `invalidate-cache`. The rule sequence short-circuits on
    /// its first failure and the store is never touched by a rejected add.
    pub fn add_product(&self, draft: NewProduct) -> Result<ProductId, EngineError> {
        let run = Pipeline::start("add_product", self.config.slow_op_threshold);
        run.stage("validate", || {
            self.validator.validate(&draft).map_err(EngineError::from)
        })?;
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_ADD)
                .map_err(EngineError::from)
        })?;
        let _gate = run.stage("acquire-gate", || self.acquire_gate())?;
        let id = self.add_unsynced(&run, draft)?;
        run.stage("invalidate-cache", || {
            self.cache().invalidate_prefix(CACHE_PREFIX);
            Ok::<(), EngineError>(())
        })?;
        Ok(id)
    }

    /// All products, optionally narrowed by a declarative filter. Served
    /// from the query cache within the staleness window.
    pub fn get_all(&self, filter: Option<ProductFilter>) -> Result<Vec<Product>, EngineError> {
        let run = Pipeline::start("get_all", self.config.slow_op_threshold);
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_READ)
                .map_err(EngineError::from)
        })?;
        // A filter with no conditions keys the same cache slot as no filter.
        let filter = filter.filter(|f| !f.is_empty());
        let key = match &filter {
            None => format!("{CACHE_PREFIX}get_all"),
            Some(f) => format!("{CACHE_PREFIX}get_all:{}", f.cache_key()),
        };
        run.stage("query", || {
            self.cache().get_or_compute(&key, || match &filter {
                None => self.store.get_all(None).map_err(EngineError::from),
                Some(f) => self
                    .store
                    .get_all(Some(&|p: &Product| f.matches(p)))
                    .map_err(EngineError::from),
            })
        })
    }

    /// Single product by id; an unknown id is `Ok(None)`, never a failure.
    /// Served from the query cache within the staleness window.
    pub fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, EngineError> {
        let run = Pipeline::start("get_by_id", self.config.slow_op_threshold);
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_READ)
                .map_err(EngineError::from)
        })?;
        let key = format!("{CACHE_PREFIX}by_id:{id}");
        run.stage("query", || {
            self.cache()
                .get_or_compute(&key, || self.store.get_by_id(id).map_err(EngineError::from))
        })
    }

    /// Joined product/category rows, refused during the maintenance hour.
    pub fn get_product_details(&self) -> Result<Vec<ProductDetail>, EngineError> {
        let run = Pipeline::start("get_product_details", self.config.slow_op_threshold);
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_READ)
                .map_err(EngineError::from)
        })?;
        run.stage("maintenance-gate", || {
            let window = MaintenanceWindow::at_hour(self.config.maintenance_hour);
            if window.denies(self.clock.as_ref()) {
                Err(EngineError::Maintenance)
            } else {
                Ok(())
            }
        })?;
        run.stage("query", || self.store.details().map_err(EngineError::from))
    }

    /// Products in one category; an unknown id yields an empty vector.
    pub fn get_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, EngineError> {
        let run = Pipeline::start("get_products_by_category", self.config.slow_op_threshold);
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_READ)
                .map_err(EngineError::from)
        })?;
        run.stage("query", || {
            self.store
                .get_all_by_category(category_id)
                .map_err(EngineError::from)
        })
    }

    /// Products with `min <= unit_price <= max`, both ends inclusive.
    /// Inverted bounds yield an empty vector, not an error.
    pub fn get_products_by_price_range(
        &self,
        min: Money,
        max: Money,
    ) -> Result<Vec<Product>, EngineError> {
        let run = Pipeline::start("get_products_by_price_range", self.config.slow_op_threshold);
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_READ)
                .map_err(EngineError::from)
        })?;
        run.stage("query", || {
            self.store
                .get_all(Some(&|p: &Product| {
                    let price = p.unit_price();
                    price >= min && price <= max
                }))
                .map_err(EngineError::from)
        })
    }

    /// Rollback demonstration: performs one gated add, then raises an
    /// unconditional fatal signal before a second add that is permanently
    /// out of reach. The transaction runner restores the store, so the
    /// first add leaves no trace, and the fatal error reaches the caller
    /// unswallowed. Intentional example behavior, not a bug.
    pub fn add_product_with_transaction(&self, draft: NewProduct) -> Result<(), EngineError> {
        let run = Pipeline::start("add_product_with_transaction", self.config.slow_op_threshold);
        run.stage("validate", || {
            self.validator.validate(&draft).map_err(EngineError::from)
        })?;
        run.stage("authorize", || {
            self.access
                .authorize(&Permission::PRODUCT_ADD)
                .map_err(EngineError::from)
        })?;
        // One gate acquisition for both steps; the unsynced path below must
        // not retake it.
        let _gate = run.stage("acquire-gate", || self.acquire_gate())?;

        TransactionRunner::run(&self.store, || self.transactional_steps(&run, draft))?;

        run.stage("invalidate-cache", || {
            self.cache().invalidate_prefix(CACHE_PREFIX);
            Ok::<(), EngineError>(())
        })?;
        Ok(())
    }

    /// Step 1, fatal signal, unreachable step 2. The dead second add is the
    /// point of the exercise: it proves the runner rolls back everything
    /// before the signal.
    #[allow(unreachable_code)]
    fn transactional_steps(&self, run: &Pipeline, draft: NewProduct) -> Result<(), EngineError> {
        self.add_unsynced(run, draft.clone())?;
        return Err(EngineError::Fatal(
            "deliberate failure between transactional steps".into(),
        ));
        self.add_unsynced(run, draft)?;
        Ok(())
    }

    /// Rule-check and insert without taking the mutation gate; callers hold
    /// it already.
    fn add_unsynced(&self, run: &Pipeline, draft: NewProduct) -> Result<ProductId, EngineError> {
        run.stage("rule-check", || {
            rules::run([
                BusinessRule::new("category-product-count", || {
                    let in_category = self.store.get_all_by_category(draft.category_id)?.len();
                    if in_category > CATEGORY_PRODUCT_LIMIT {
                        return Err(RuleViolation::CategoryProductCount.into());
                    }
                    Ok(())
                }),
                BusinessRule::new("unique-name", || {
                    let same_name = self
                        .store
                        .get_all(Some(&|p: &Product| p.name() == draft.name))?;
                    if !same_name.is_empty() {
                        return Err(RuleViolation::DuplicateName.into());
                    }
                    Ok(())
                }),
                BusinessRule::new("category-capacity", || {
                    let categories = self.categories.get_categories()?.len();
                    if categories > CATEGORY_LIMIT {
                        return Err(RuleViolation::CategoryCapacity.into());
                    }
                    Ok(())
                }),
            ])
        })?;
        run.stage("execute", || self.store.add(draft).map_err(EngineError::from))
    }

    /// Take the mutation gate, waiting at most the configured bound.
    fn acquire_gate(&self) -> Result<MutexGuard<'_, ()>, EngineError> {
        let deadline = Instant::now() + self.config.gate_wait;
        loop {
            match self.mutation_gate.try_lock() {
                Ok(guard) => return Ok(guard),
                // The gate guards no data, so poisoning leaves nothing to
                // corrupt; take it over.
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        tracing::warn!(
                            wait_ms = self.config.gate_wait.as_millis() as u64,
                            "mutation gate still busy, giving up"
                        );
                        return Err(EngineError::GateTimeout(self.config.gate_wait));
                    }
                    thread::sleep(GATE_RETRY);
                }
            }
        }
    }

    fn cache(&self) -> QueryCache {
        QueryCache::new(
            Arc::clone(&self.cache_store),
            Arc::clone(&self.clock),
            self.config.cache_ttl,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc;

    use tradegate_catalog::Category;
    use tradegate_store::{InMemoryCatalog, StoreError, StoreSnapshot};

    fn draft(name: &str) -> NewProduct {
        NewProduct {
            category_id: CategoryId::new(1),
            name: name.to_owned(),
            unit_price: Money::from_major(10),
            units_in_stock: 3,
        }
    }

    fn engine_over(catalog: Arc<InMemoryCatalog>) -> ProductEngine {
        let store: Arc<dyn ProductStore> = catalog.clone();
        ProductEngine::new(store, catalog)
    }

    /// Blocks inside `add` until released, so a test can keep the mutation
    /// gate busy for as long as it needs.
    struct StallingStore {
        inner: InMemoryCatalog,
        entered: mpsc::Sender<()>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ProductStore for StallingStore {
        fn add(&self, draft: NewProduct) -> Result<ProductId, StoreError> {
            let _ = self.entered.send(());
            let _ = self.release.lock().map(|rx| rx.recv());
            self.inner.add(draft)
        }

        fn update(&self, product: Product) -> Result<(), StoreError> {
            self.inner.update(product)
        }

        fn delete(&self, id: ProductId) -> Result<(), StoreError> {
            self.inner.delete(id)
        }

        fn get_all(
            &self,
            filter: Option<&dyn Fn(&Product) -> bool>,
        ) -> Result<Vec<Product>, StoreError> {
            self.inner.get_all(filter)
        }

        fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
            self.inner.get_by_id(id)
        }

        fn get_all_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
            self.inner.get_all_by_category(category_id)
        }

        fn details(&self) -> Result<Vec<ProductDetail>, StoreError> {
            self.inner.details()
        }

        fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
            self.inner.snapshot()
        }

        fn restore(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
            self.inner.restore(snapshot)
        }
    }

    #[test]
    fn add_assigns_ids_and_reports_them() {
        let engine = engine_over(Arc::new(InMemoryCatalog::seeded()));
        let id = engine.add_product(draft("Monitor")).unwrap();
        assert_eq!(id, ProductId::new(6));
    }

    #[test]
    fn empty_filter_shares_the_unfiltered_cache_slot() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let engine = engine_over(Arc::clone(&catalog));

        assert!(engine.get_all(None).unwrap().is_empty());
        // Bypass the engine so nothing invalidates the cache.
        catalog.add(draft("Bardak")).unwrap();

        let via_empty_filter = engine.get_all(Some(ProductFilter::any())).unwrap();
        assert!(via_empty_filter.is_empty(), "expected the cached listing");
    }

    #[test]
    fn gate_times_out_instead_of_blocking_forever() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Arc::new(StallingStore {
            inner: InMemoryCatalog::new(),
            entered: entered_tx,
            release: Mutex::new(release_rx),
        });
        let categories = Arc::new(InMemoryCatalog::with_data(
            Vec::new(),
            vec![Category::new(CategoryId::new(1), "Mutfak")],
        ));
        let engine = Arc::new(
            ProductEngine::new(store, categories).with_config(EngineConfig {
                gate_wait: Duration::from_millis(50),
                ..EngineConfig::default()
            }),
        );

        let background = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.add_product(draft("Bardak")))
        };
        entered_rx.recv().unwrap();

        let contended = engine.add_product(draft("Kamera"));
        assert_eq!(
            contended,
            Err(EngineError::GateTimeout(Duration::from_millis(50)))
        );

        release_tx.send(()).unwrap();
        assert!(background.join().unwrap().is_ok());
    }
}
