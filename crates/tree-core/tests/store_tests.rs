// Shared store: defaults, photo appends, subscriptions and torn-read safety.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tree_core::photos::featured_index;
use tree_core::{Mode, SceneStore, StoreEvent};

#[test]
fn new_store_starts_formed_with_default_photos() {
    let store = SceneStore::new();
    let snap = store.snapshot();
    assert_eq!(snap.mode, Mode::Formed);
    assert_eq!(snap.progress, 0.0);
    assert_eq!(snap.photos.len(), 7);
    assert_eq!(featured_index(&snap.photos), None);
}

#[test]
fn uploaded_photo_is_appended_and_featured() {
    let store = SceneStore::new();
    store.add_photo("blob:abc");
    let photos = store.photos();
    assert_eq!(photos.len(), 8);
    assert_eq!(photos[7], "blob:abc");
    assert_eq!(featured_index(&photos), Some(7));
    // earlier entries keep their order
    assert_eq!(photos[0], "/photos/1.jpg");
}

#[test]
fn duplicate_photos_are_kept() {
    let store = SceneStore::with_photos(vec![]);
    store.add_photo("blob:x");
    store.add_photo("blob:x");
    assert_eq!(store.photos().len(), 2);
}

#[test]
fn reader_sees_writes() {
    let store = SceneStore::new();
    let reader = store.reader();
    store.set_mode(Mode::Chaos);
    store.set_pointer(0.25, -0.5);
    store.set_camera_target(1.0, 0.2);
    assert_eq!(reader.mode(), Mode::Chaos);
    assert_eq!(reader.pointer().to_array(), [0.25, -0.5]);
    assert_eq!(reader.camera_target().to_array(), [1.0, 0.2]);
}

#[test]
fn subscribers_receive_events_until_unsubscribed() {
    let store = SceneStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

    store.set_mode(Mode::Chaos);
    store.add_photo("blob:1");
    assert!(store.unsubscribe(id));
    store.set_mode(Mode::Formed);

    let events = seen.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            StoreEvent::ModeChanged(Mode::Chaos),
            StoreEvent::PhotoAdded {
                index: 7,
                url: "blob:1".to_string()
            },
        ]
    );
    assert!(!store.unsubscribe(id));
}

#[test]
fn listener_may_read_the_store() {
    let store = SceneStore::new();
    let reader = store.reader();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    store.subscribe(move |_| {
        if reader.mode() == Mode::Chaos {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    store.set_mode(Mode::Chaos);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn pointer_is_never_torn_across_threads() {
    let store = SceneStore::new();
    let writer = store.clone();
    let handle = thread::spawn(move || {
        for i in 0..5_000 {
            let v = i as f32;
            writer.set_pointer(v, v);
        }
    });
    let reader = store.reader();
    for _ in 0..5_000 {
        let p = reader.pointer();
        assert_eq!(p.x, p.y);
    }
    handle.join().unwrap();
    assert_eq!(store.pointer().x, 4_999.0);
}

#[test]
fn progress_is_clamped_and_sanitised() {
    let store = SceneStore::new();
    let progress = store.progress_publisher();
    progress.publish(1.7);
    assert_eq!(store.progress(), 1.0);
    progress.publish(-0.3);
    assert_eq!(store.progress(), 0.0);
    progress.publish(0.4);
    assert_eq!(store.progress(), 0.4);
    assert_eq!(store.reader().progress(), 0.4);
    progress.publish(f32::NAN);
    assert_eq!(store.progress(), 0.0);
}

#[test]
fn mode_toggle_round_trips() {
    assert_eq!(Mode::Formed.toggled(), Mode::Chaos);
    assert_eq!(Mode::Chaos.toggled().toggled(), Mode::Chaos);
    assert_eq!(Mode::Chaos.progress_target(), 1.0);
    assert_eq!(Mode::Formed.progress_target(), 0.0);
}
