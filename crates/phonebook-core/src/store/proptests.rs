//! Property-based tests for directory stores.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::HashSet;

use super::{DirectoryStore, MemoryStore};
use crate::contact::ContactId;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn test_inserted_ids_are_unique(names in prop::collection::vec("[A-Za-z ]{1,16}", 1..24)) {
        runtime().block_on(async {
            let store = MemoryStore::with_sample_contacts();
            for name in &names {
                store.insert(name, "555").await.unwrap();
            }

            let all = store.find_all().await.unwrap();
            let ids: HashSet<ContactId> = all.iter().map(|c| c.id.clone()).collect();
            prop_assert_eq!(ids.len(), all.len());
            prop_assert_eq!(all.len(), names.len() + 4);
            Ok(())
        })?;
    }

    #[test]
    fn test_insert_then_find_by_id_round_trip(name in "\\PC{1,32}", number in "[0-9-]{1,16}") {
        runtime().block_on(async {
            let store = MemoryStore::new();
            let created = store.insert(&name, &number).await.unwrap();
            let found = store.find_by_id(&created.id).await.unwrap();
            prop_assert_eq!(found, Some(created));
            Ok(())
        })?;
    }

    #[test]
    fn test_delete_twice_is_noop(index in 0usize..4) {
        runtime().block_on(async {
            let store = MemoryStore::with_sample_contacts();
            let id = ContactId::new((index + 1).to_string());

            prop_assert!(store.delete_by_id(&id).await.unwrap());
            let after_first = store.find_all().await.unwrap();
            prop_assert!(!store.delete_by_id(&id).await.unwrap());
            prop_assert_eq!(store.find_all().await.unwrap(), after_first);
            Ok(())
        })?;
    }
}
