//! Property-based tests for reconciliation.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::sync::Arc;

use crate::reconcile::{Confirm, Outcome, Reconciler};
use crate::store::{DirectoryStore, MemoryStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    // Digits never appear in the sample names, so these never clash.
    #[test]
    fn test_unmatched_name_grows_directory(name in "[0-9]{1,12}", number in "[0-9-]{1,16}") {
        runtime().block_on(async {
            let store = Arc::new(MemoryStore::with_sample_contacts());
            let reconciler = Reconciler::new(store.clone());
            let before = store.find_all().await.unwrap();

            let outcome = reconciler.reconcile(&name, &number, &mut Confirm(true)).await.unwrap();
            let Outcome::Created(created) = outcome else {
                return Err(TestCaseError::fail("expected Created"));
            };

            prop_assert!(before.iter().all(|c| c.id != created.id));
            prop_assert_eq!(store.count().await.unwrap(), before.len() + 1);
            prop_assert_eq!(store.find_by_id(&created.id).await.unwrap(), Some(created));
            Ok(())
        })?;
    }

    #[test]
    fn test_confirmed_update_keeps_id_and_size(index in 0usize..4, number in "[0-9-]{1,16}") {
        runtime().block_on(async {
            let store = Arc::new(MemoryStore::with_sample_contacts());
            let reconciler = Reconciler::new(store.clone());
            let target = store.find_all().await.unwrap()[index].clone();

            let outcome = reconciler
                .reconcile(&target.name, &number, &mut Confirm(true))
                .await
                .unwrap();
            let Outcome::Updated(updated) = outcome else {
                return Err(TestCaseError::fail("expected Updated"));
            };

            prop_assert_eq!(&updated.id, &target.id);
            prop_assert_eq!(&updated.number, &number);
            prop_assert_eq!(store.count().await.unwrap(), 4);
            Ok(())
        })?;
    }

    #[test]
    fn test_missing_fields_never_mutate(name in "[A-Za-z]{0,8}", blank_name in any::<bool>()) {
        runtime().block_on(async {
            let store = Arc::new(MemoryStore::with_sample_contacts());
            let reconciler = Reconciler::new(store.clone());
            let before = store.find_all().await.unwrap();

            let (name, number) = if blank_name { ("", name.as_str()) } else { (name.as_str(), "") };
            let result = reconciler.reconcile(name, number, &mut Confirm(true)).await;

            prop_assert!(result.is_err());
            prop_assert_eq!(store.find_all().await.unwrap(), before);
            Ok(())
        })?;
    }
}
