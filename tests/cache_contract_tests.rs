//! Cache contract tests through the public library API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use keyed_cache::cache::{
    create_cache_key, KeyMatcher, KeyPattern, KeyedTtlCache, MockClock, NotificationSink,
    TtlPreset, CLEAR_SENTINEL,
};
use keyed_cache::error::ListenerError;

type Calls = Arc<Mutex<Vec<(String, Option<i64>)>>>;

fn cache_at(ms: u64) -> (KeyedTtlCache<i64, MockClock>, MockClock) {
    let clock = MockClock::starting_at(ms);
    (KeyedTtlCache::with_clock(clock.clone()), clock)
}

#[derive(Default)]
struct CollectingSink {
    failures: Mutex<Vec<String>>,
}

impl NotificationSink for CollectingSink {
    fn listener_failed(&self, error: ListenerError) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

#[test]
fn expiry_after_duration() {
    let (mut cache, clock) = cache_at(0);

    cache.set("shift:today", 8, Some(TtlPreset::Short.duration()));
    assert_eq!(cache.get("shift:today").as_deref(), Some(&8));

    clock.advance(TtlPreset::Short.duration());
    assert!(cache.get("shift:today").is_none());
}

#[test]
fn zero_duration_is_an_immediate_miss() {
    let (mut cache, _) = cache_at(0);

    cache.set("k", 1, Some(Duration::ZERO));

    assert!(cache.get("k").is_none());
}

#[test]
fn overwrite_replaces_value() {
    let (mut cache, _) = cache_at(0);

    cache.set("k", 1, None);
    cache.set("k", 2, None);

    assert_eq!(cache.get("k").as_deref(), Some(&2));
}

#[test]
fn pattern_invalidation_spares_other_keys() {
    let (mut cache, _) = cache_at(0);
    cache.set("user:1", 1, None);
    cache.set("user:2", 2, None);
    cache.set("order:1", 3, None);

    let pattern = regex::Regex::new("^user:").unwrap();
    assert_eq!(cache.invalidate(pattern), 2);

    assert!(cache.get("user:1").is_none());
    assert!(cache.get("user:2").is_none());
    assert_eq!(cache.get("order:1").as_deref(), Some(&3));
}

#[test]
fn key_construction_is_deterministic() {
    let forward = create_cache_key("/api/x", [("b", 2), ("a", 1)]);
    let backward = create_cache_key("/api/x", [("a", 1), ("b", 2)]);
    let empty: [(&str, i32); 0] = [];

    assert_eq!(forward, backward);
    assert_eq!(forward, "/api/x?a=1&b=2");
    assert_eq!(create_cache_key("/api/x", empty), "/api/x");
}

#[test]
fn failing_listener_does_not_stop_fan_out() {
    let sink = Arc::new(CollectingSink::default());
    let (cache, _) = cache_at(0);
    let mut cache = cache.with_sink(sink.clone());

    let _throws = cache.subscribe(|_, _| panic!("listener exploded"));
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = calls.clone();
    let _records = cache.subscribe(move |key, value| {
        recorder
            .lock()
            .unwrap()
            .push((key.to_string(), value.copied()));
        Ok(())
    });

    cache.set("k", 5, None);

    assert_eq!(*calls.lock().unwrap(), vec![("k".to_string(), Some(5))]);
    let failures = sink.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("listener exploded"));
}

#[test]
fn invalidation_and_clear_notifications() {
    let (mut cache, _) = cache_at(0);
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = calls.clone();
    let _subscription = cache.subscribe(move |key, value| {
        recorder
            .lock()
            .unwrap()
            .push((key.to_string(), value.copied()));
        Ok(())
    });

    cache.invalidate("absent");
    cache.invalidate(KeyPattern::new("^user:"));
    cache.invalidate(KeyMatcher::pattern("(unclosed"));
    cache.clear();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            ("absent".to_string(), None),
            ("^user:".to_string(), None),
            ("(unclosed".to_string(), None),
            (CLEAR_SENTINEL.to_string(), None),
        ]
    );
}

#[test]
fn clear_removes_everything() {
    let (mut cache, _) = cache_at(0);
    let keys: Vec<String> = (0..10).map(|i| format!("employee:{}", i)).collect();
    for (i, key) in keys.iter().enumerate() {
        cache.set(key.as_str(), i as i64, None);
    }

    cache.clear();

    assert_eq!(cache.get_stats().size, 0);
    for key in &keys {
        assert!(cache.get(key).is_none());
    }
}

#[test]
fn dispose_twice_is_harmless() {
    let (mut cache, _) = cache_at(0);
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = calls.clone();
    let subscription = cache.subscribe(move |key, value| {
        recorder
            .lock()
            .unwrap()
            .push((key.to_string(), value.copied()));
        Ok(())
    });

    subscription.dispose();
    subscription.dispose();
    cache.set("k", 1, None);

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(cache.subscriber_count(), 0);
}

#[test]
fn shared_cache_behind_one_lock() {
    let cache = Arc::new(Mutex::new(KeyedTtlCache::<i64>::new()));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    cache.lock().unwrap().set(format!("t{}:{}", t, i), i, None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut cache = cache.lock().unwrap();
    assert_eq!(cache.len(), 100);
    assert_eq!(cache.invalidate(KeyMatcher::pattern("^t0:")), 25);
}
