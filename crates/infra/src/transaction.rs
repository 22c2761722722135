//! Snapshot-based transactional execution.

use uuid::Uuid;

use tradegate_store::{ProductStore, StoreError};

/// Runs a batch of store mutations with rollback semantics.
///
/// The store captures its complete state up front; if the batch returns an
/// error, that state is restored before the error continues upward. The
/// caller's error type only needs a `From<StoreError>` conversion so the
/// snapshot step can report its own failures.
///
/// Rollback is best-effort: when the restore itself fails the original
/// error still wins, and the restore failure is logged at error level
/// because the store may now hold a partially applied batch.
pub struct TransactionRunner;

impl TransactionRunner {
    pub fn run<S, T, E>(store: &S, work: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        S: ProductStore + ?Sized,
        E: From<StoreError>,
    {
        let transaction_id = Uuid::now_v7();
        let span = tracing::info_span!("transaction", %transaction_id);
        let _guard = span.enter();

        let snapshot = store.snapshot().map_err(E::from)?;
        match work() {
            Ok(value) => {
                tracing::debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!("transaction failed, rolling back");
                if let Err(restore_err) = store.restore(snapshot) {
                    tracing::error!(
                        error = %restore_err,
                        "rollback failed, store state may hold a partial batch"
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tradegate_catalog::NewProduct;
    use tradegate_core::{CategoryId, Money, ProductId};
    use tradegate_store::InMemoryCatalog;

    fn draft(name: &str) -> NewProduct {
        NewProduct {
            category_id: CategoryId::new(1),
            name: name.to_owned(),
            unit_price: Money::from_major(10),
            units_in_stock: 5,
        }
    }

    #[test]
    fn successful_work_is_kept() {
        let store = InMemoryCatalog::new();

        let added = TransactionRunner::run(&store, || {
            let first = store.add(draft("Bardak"))?;
            let second = store.add(draft("Kupa"))?;
            Ok::<_, StoreError>((first, second))
        })
        .unwrap();

        assert_eq!(added, (ProductId::new(1), ProductId::new(2)));
        assert_eq!(store.get_all(None).unwrap().len(), 2);
    }

    #[test]
    fn failing_work_is_rolled_back() {
        let store = InMemoryCatalog::seeded();

        let result: Result<(), StoreError> = TransactionRunner::run(&store, || {
            store.add(draft("Monitor"))?;
            store.delete(ProductId::new(1))?;
            Err(StoreError::ProductNotFound(ProductId::new(77)))
        });

        assert_eq!(result, Err(StoreError::ProductNotFound(ProductId::new(77))));
        assert_eq!(store.get_all(None).unwrap().len(), 5);
        assert!(store.get_by_id(ProductId::new(1)).unwrap().is_some());
        // Ids handed out inside the rolled-back batch are reissued.
        assert_eq!(store.add(draft("Monitor")).unwrap(), ProductId::new(6));
    }

    #[test]
    fn nested_reads_see_uncommitted_work() {
        let store = InMemoryCatalog::new();

        TransactionRunner::run(&store, || {
            store.add(draft("Bardak"))?;
            assert_eq!(store.get_all(None)?.len(), 1);
            Ok::<_, StoreError>(())
        })
        .unwrap();
    }
}
