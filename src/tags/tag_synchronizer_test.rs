use std::collections::BTreeSet;
use std::sync::Arc;

use mockall::predicate::eq;
use mockall::Sequence;

use crate::platform::MockRemoteTopicService;
use crate::tags::TagSynchronizer;
use crate::test_utils::MemoryKeyValueStore;
use crate::Error;
use crate::RegistrationStore;
use crate::SubscriptionError;

fn fresh_store() -> Arc<RegistrationStore> {
    Arc::new(RegistrationStore::new(MemoryKeyValueStore::new_arc()).expect("store should build"))
}

fn tags_of(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Case 1: add then remove (both remote calls succeeding) round-trips the
/// persisted set
#[tokio::test]
async fn test_add_remove_round_trip() {
    let store = fresh_store();
    let before = store.tags().unwrap();

    let mut remote = MockRemoteTopicService::new();
    remote
        .expect_subscribe()
        .with(eq("A"))
        .times(1)
        .returning(|_| Ok(()));
    remote
        .expect_unsubscribe()
        .with(eq("A"))
        .times(1)
        .returning(|_| Ok(()));

    let sync = TagSynchronizer::new(store.clone(), Arc::new(remote));
    sync.add_tag("A").await.expect("add should succeed");
    assert_eq!(store.tags().unwrap(), tags_of(&["A"]));

    sync.remove_tag("A").await.expect("remove should succeed");
    assert_eq!(store.tags().unwrap(), before);
}

/// Case 2: a rejected subscribe leaves the persisted set untouched
#[tokio::test]
async fn test_add_tag_remote_failure_skips_store() {
    let store = fresh_store();

    let mut remote = MockRemoteTopicService::new();
    remote
        .expect_subscribe()
        .with(eq("A"))
        .times(1)
        .returning(|_| Err("backend rejected".into()));

    let sync = TagSynchronizer::new(store.clone(), Arc::new(remote));
    let r = sync.add_tag("A").await;

    match r {
        Err(Error::Subscription(SubscriptionError::Remote { tag, .. })) => {
            assert_eq!(tag, "A");
        }
        other => panic!("expected remote subscription error, got {other:?}"),
    }
    assert!(store.tags().unwrap().is_empty());
}

/// Case 3: set_tags issues one unsubscribe per persisted tag, then one
/// subscribe per requested tag in caller order
#[tokio::test]
async fn test_set_tags_call_order() {
    let store = fresh_store();
    store.set_tags(&tags_of(&["news"])).unwrap();

    let mut remote = MockRemoteTopicService::new();
    let mut seq = Sequence::new();
    remote
        .expect_unsubscribe()
        .with(eq("news"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    remote
        .expect_subscribe()
        .with(eq("sports"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    remote
        .expect_subscribe()
        .with(eq("news"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let sync = TagSynchronizer::new(store.clone(), Arc::new(remote));
    sync.set_tags(&["sports".to_string(), "news".to_string()])
        .await
        .expect("set_tags should succeed");

    assert_eq!(store.tags().unwrap(), tags_of(&["news", "sports"]));
}

/// Case 4: clear_tags continues past a failed unsubscribe; the failed tag
/// stays persisted, the others are removed
#[tokio::test]
async fn test_clear_tags_partial_failure_continues() {
    let store = fresh_store();
    store.set_tags(&tags_of(&["a", "b", "c"])).unwrap();

    let mut remote = MockRemoteTopicService::new();
    remote
        .expect_unsubscribe()
        .with(eq("a"))
        .times(1)
        .returning(|_| Ok(()));
    remote
        .expect_unsubscribe()
        .with(eq("b"))
        .times(1)
        .returning(|_| Err("backend down".into()));
    remote
        .expect_unsubscribe()
        .with(eq("c"))
        .times(1)
        .returning(|_| Ok(()));

    let sync = TagSynchronizer::new(store.clone(), Arc::new(remote));
    sync.clear_tags().await.expect("clear reports no error");

    assert_eq!(store.tags().unwrap(), tags_of(&["b"]));
}

/// Case 5: removing a tag that was never persisted still asks the remote
/// service, since it owns subscription state
#[tokio::test]
async fn test_remove_absent_tag_still_calls_remote() {
    let store = fresh_store();

    let mut remote = MockRemoteTopicService::new();
    remote
        .expect_unsubscribe()
        .with(eq("ghost"))
        .times(1)
        .returning(|_| Ok(()));

    let sync = TagSynchronizer::new(store.clone(), Arc::new(remote));
    sync.remove_tag("ghost").await.expect("remove should succeed");
    assert!(store.tags().unwrap().is_empty());
}
