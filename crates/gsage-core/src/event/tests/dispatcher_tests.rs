use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::event::{callback, DispatcherEvent, EventCallback, EventDispatcher, EventResult, KeyboardEvent};

const TEST_EVENT: &str = "test.event";

type CallLog = Arc<Mutex<Vec<String>>>;

fn recorder(log: &CallLog, label: &str, result: EventResult) -> EventCallback {
    let log = Arc::clone(log);
    let label = label.to_string();
    callback(move |_, _| {
        log.lock().unwrap().push(label.clone());
        result
    })
}

fn counter(count: &Arc<AtomicU32>) -> EventCallback {
    let count = Arc::clone(count);
    callback(move |_, _| {
        count.fetch_add(1, Ordering::SeqCst);
        EventResult::Continue
    })
}

#[test]
fn test_fire_follows_priority_order() {
    let dispatcher = EventDispatcher::new();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));

    dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "5", EventResult::Continue), 5);
    dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "0", EventResult::Continue), 0);
    dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "10", EventResult::Continue), 10);

    let handled = dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT));

    assert_eq!(handled, 3);
    assert_eq!(*log.lock().unwrap(), vec!["0", "5", "10"]);
}

#[test]
fn test_same_priority_ids_follow_registration() {
    let dispatcher = EventDispatcher::new();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));

    let ids: Vec<u64> = ["first", "second", "third"]
        .iter()
        .map(|label| dispatcher.add_event_listener(TEST_EVENT, recorder(&log, label, EventResult::Continue), 0).id())
        .collect();

    dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT));

    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn test_stop_consumes_event() {
    let dispatcher = EventDispatcher::new();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));

    dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "A", EventResult::Continue), 0);
    dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "B", EventResult::Stop), 1);
    dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "C", EventResult::Continue), 2);

    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 2);
    assert_eq!(*log.lock().unwrap(), vec!["A", "B"], "C should never be invoked");
}

#[test]
fn test_fire_without_listeners_has_no_side_effect() {
    let dispatcher = EventDispatcher::new();

    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 0);
    assert!(!dispatcher.has_listeners_for_type(TEST_EVENT), "Firing must not create a signal");
    assert_eq!(dispatcher.listener_count(TEST_EVENT), 0);
}

#[test]
fn test_types_are_compared_by_content() {
    let dispatcher = EventDispatcher::new();
    let count = Arc::new(AtomicU32::new(0));

    let owned_type = String::from("KeyboardEvent::") + "KEY_DOWN";
    dispatcher.add_event_listener(&owned_type, counter(&count), 0);

    let handled = dispatcher.fire_event(&KeyboardEvent::new(KeyboardEvent::KEY_DOWN, 13, 0, 0));

    assert_eq!(handled, 1);
    assert_eq!(dispatcher.fire_event(&KeyboardEvent::new(KeyboardEvent::KEY_UP, 13, 0, 0)), 0);
}

#[test]
fn test_disconnect_removes_exactly_one_slot() {
    let dispatcher = EventDispatcher::new();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));

    let first = dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "id0", EventResult::Continue), 0);
    let second = dispatcher.add_event_listener(TEST_EVENT, recorder(&log, "id1", EventResult::Continue), 0);
    assert_eq!((first.id(), second.id()), (0, 1));

    first.disconnect();
    let handled = dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT));

    assert_eq!(handled, 1);
    assert_eq!(*log.lock().unwrap(), vec!["id1"]);
}

#[test]
fn test_double_disconnect_matches_single() {
    let dispatcher = EventDispatcher::new();
    let count = Arc::new(AtomicU32::new(0));

    let connection = dispatcher.add_event_listener(TEST_EVENT, counter(&count), 0);
    dispatcher.add_event_listener(TEST_EVENT, counter(&count), 0);

    connection.disconnect();
    connection.disconnect();

    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 1);
    assert_eq!(dispatcher.listener_count(TEST_EVENT), 1);
}

#[test]
fn test_empty_signal_stays_registered() {
    let dispatcher = EventDispatcher::new();
    let connection = dispatcher.add_event_listener(TEST_EVENT, counter(&Arc::new(AtomicU32::new(0))), 0);

    connection.disconnect();

    assert!(dispatcher.has_listeners_for_type(TEST_EVENT));
    assert_eq!(dispatcher.listener_count(TEST_EVENT), 0);
    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 0);
}

#[test]
fn test_remove_all_listeners_resets_dispatcher() {
    let dispatcher = EventDispatcher::new();
    let count = Arc::new(AtomicU32::new(0));
    let types = ["a", "b", "c"];

    for event_type in types {
        for priority in 0..3 {
            dispatcher.add_event_listener(event_type, counter(&count), priority);
        }
    }

    dispatcher.remove_all_listeners();

    for event_type in types {
        assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(event_type)), 0);
        assert!(!dispatcher.has_listeners_for_type(event_type));
    }
    assert_eq!(count.load(Ordering::SeqCst), 0);

    // Still usable afterwards
    dispatcher.add_event_listener("a", counter(&count), 0);
    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new("a")), 1);
}

#[test]
fn test_drop_fires_force_unsubscribe_once() {
    let force_count = Arc::new(AtomicU32::new(0));
    let other_count = Arc::new(AtomicU32::new(0));
    let saw_other_type = Arc::new(AtomicU32::new(0));

    {
        let dispatcher = EventDispatcher::named("texture");
        dispatcher.add_event_listener(DispatcherEvent::FORCE_UNSUBSCRIBE, counter(&force_count), 0);
        dispatcher.add_event_listener(TEST_EVENT, counter(&other_count), 0);

        let saw = Arc::clone(&saw_other_type);
        dispatcher.add_event_listener(
            DispatcherEvent::FORCE_UNSUBSCRIBE,
            callback(move |dispatcher, event| {
                assert!(event.is(DispatcherEvent::FORCE_UNSUBSCRIBE));
                // The map is cleared only after the notification
                if dispatcher.has_listeners_for_type(TEST_EVENT) {
                    saw.fetch_add(1, Ordering::SeqCst);
                }
                EventResult::Continue
            }),
            1,
        );
    }

    assert_eq!(force_count.load(Ordering::SeqCst), 1);
    assert_eq!(saw_other_type.load(Ordering::SeqCst), 1);
    assert_eq!(other_count.load(Ordering::SeqCst), 0, "Other types receive nothing on teardown");
}

#[test]
fn test_explicit_reset_then_drop_notifies_once() {
    let force_count = Arc::new(AtomicU32::new(0));

    let dispatcher = EventDispatcher::new();
    dispatcher.add_event_listener(DispatcherEvent::FORCE_UNSUBSCRIBE, counter(&force_count), 0);
    dispatcher.remove_all_listeners();
    drop(dispatcher);

    assert_eq!(force_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_connection_outlives_dispatcher() {
    let dispatcher = EventDispatcher::new();
    let connection = dispatcher.add_event_listener(TEST_EVENT, counter(&Arc::new(AtomicU32::new(0))), 0);

    drop(dispatcher);

    connection.disconnect();
    connection.disconnect();
    assert!(!connection.is_connected());
}

#[test]
fn test_listener_registers_on_same_type_while_firing() {
    let dispatcher = EventDispatcher::new();
    let count = Arc::new(AtomicU32::new(0));
    let registered = Arc::new(AtomicU32::new(0));

    let count_clone = Arc::clone(&count);
    let registered_clone = Arc::clone(&registered);
    dispatcher.add_event_listener(
        TEST_EVENT,
        callback(move |dispatcher, _| {
            if registered_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                // Connection handle is dropped; the listener stays connected
                dispatcher.add_event_listener(TEST_EVENT, counter(&count_clone), 0);
            }
            EventResult::Continue
        }),
        0,
    );

    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 1);
    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 2);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nested_fire_from_listener() {
    let dispatcher = EventDispatcher::new();
    let inner_count = Arc::new(AtomicU32::new(0));

    dispatcher.add_event_listener("inner", counter(&inner_count), 0);
    dispatcher.add_event_listener(
        "outer",
        callback(|dispatcher, _| {
            let handled = dispatcher.fire_event(&DispatcherEvent::new("inner"));
            EventResult::from(handled == 1)
        }),
        0,
    );

    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new("outer")), 1);
    assert_eq!(inner_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_listener_receives_firing_dispatcher() {
    let dispatcher = EventDispatcher::named("engine");
    let seen = Arc::new(AtomicU32::new(0));
    let seen_clone = Arc::clone(&seen);
    let expected = dispatcher.id();

    dispatcher.add_event_listener(
        TEST_EVENT,
        callback(move |dispatcher, _| {
            if dispatcher.id() == expected && dispatcher.name() == Some("engine") {
                seen_clone.fetch_add(1, Ordering::SeqCst);
            }
            EventResult::Continue
        }),
        0,
    );
    dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT));

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_register_and_fire_from_multiple_threads() {
    let dispatcher = Arc::new(EventDispatcher::new());
    let count = Arc::new(AtomicU32::new(0));
    let fired = Arc::new(AtomicUsize::new(0));

    let registrars: Vec<_> = (0..4)
        .map(|priority| {
            let dispatcher = Arc::clone(&dispatcher);
            let count = Arc::clone(&count);
            thread::spawn(move || {
                for _ in 0..25 {
                    dispatcher.add_event_listener(TEST_EVENT, counter(&count), priority);
                }
            })
        })
        .collect();

    let firers: Vec<_> = (0..2)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            let fired = Arc::clone(&fired);
            thread::spawn(move || {
                for _ in 0..50 {
                    fired.fetch_add(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in registrars.into_iter().chain(firers) {
        handle.join().expect("thread panicked");
    }

    assert_eq!(dispatcher.listener_count(TEST_EVENT), 100);
    assert_eq!(count.load(Ordering::SeqCst) as usize, fired.load(Ordering::SeqCst));
    assert_eq!(dispatcher.fire_event(&DispatcherEvent::new(TEST_EVENT)), 100);
}

#[test]
fn test_dispatcher_ids_are_unique() {
    let a = EventDispatcher::new();
    let b = EventDispatcher::default();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.name(), None);
}
