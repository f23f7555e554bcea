//! Session-level tests: hub subscription, callback dispatch and teardown.

use nextmic::{KeyEventHub, ShortcutActions, ShortcutSession};
use nextmic_config::{Config, KeyBinding};
use nextmic_keybindings::{KeyDisposition, KeyEvent, Route, ShortcutCommand, host};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use winit::event::ElementState;
use winit::keyboard::{Key, ModifiersState, NamedKey, SmolStr};

#[derive(Clone, Default)]
struct Recorder {
    search: Arc<AtomicUsize>,
    new: Arc<AtomicUsize>,
    toolkit: Arc<AtomicUsize>,
    routes: Arc<Mutex<Vec<Route>>>,
}

impl Recorder {
    fn actions(&self) -> ShortcutActions {
        let search = Arc::clone(&self.search);
        let new = Arc::clone(&self.new);
        let toolkit = Arc::clone(&self.toolkit);
        ShortcutActions::new()
            .on_open_search(move || {
                search.fetch_add(1, Ordering::SeqCst);
            })
            .on_open_new(move || {
                new.fetch_add(1, Ordering::SeqCst);
            })
            .on_open_toolkit(move || {
                toolkit.fetch_add(1, Ordering::SeqCst);
            })
    }

    fn navigator(&self) -> impl FnMut(Route) + Send + 'static {
        let routes = Arc::clone(&self.routes);
        move |route| routes.lock().push(route)
    }

    fn attach(&self, hub: &KeyEventHub, config: &Config) -> ShortcutSession {
        ShortcutSession::attach(hub, config, self.actions(), self.navigator())
    }

    fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

fn at(start: Instant, millis: u64) -> Instant {
    start + Duration::from_millis(millis)
}

#[test]
fn modifier_shortcuts_invoke_callbacks_once() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let _session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();

    assert_eq!(
        hub.dispatch(&KeyEvent::with_modifier("k"), t0),
        KeyDisposition::Consumed(Some(ShortcutCommand::OpenSearch))
    );
    hub.dispatch(&KeyEvent::with_modifier("n"), t0);
    hub.dispatch(&KeyEvent::with_modifier("/"), t0);

    assert_eq!(rec.search.load(Ordering::SeqCst), 1);
    assert_eq!(rec.new.load(Ordering::SeqCst), 1);
    assert_eq!(rec.toolkit.load(Ordering::SeqCst), 1);
    assert!(rec.routes().is_empty());
}

#[test]
fn sequences_navigate_to_fixed_routes() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let _session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();

    for (i, key) in ["h", "f", "p", "b", "c"].iter().enumerate() {
        let base = i as u64 * 2000;
        hub.dispatch(&KeyEvent::plain("g"), at(t0, base));
        hub.dispatch(&KeyEvent::plain(*key), at(t0, base + 300));
    }

    let paths: Vec<&str> = rec.routes().iter().map(|r| r.path()).collect();
    assert_eq!(
        paths,
        vec!["/dashboard", "/find", "/pipeline", "/business", "/calendar"]
    );
}

#[test]
fn missing_callbacks_are_consumed_no_ops() {
    let hub = KeyEventHub::new();
    let routes: Arc<Mutex<Vec<Route>>> = Arc::default();
    let nav_routes = Arc::clone(&routes);
    let _session = ShortcutSession::attach(
        &hub,
        &Config::default(),
        ShortcutActions::new(),
        move |route| nav_routes.lock().push(route),
    );

    let disposition = hub.dispatch(&KeyEvent::with_modifier("n"), Instant::now());
    assert_eq!(
        disposition,
        KeyDisposition::Consumed(Some(ShortcutCommand::OpenNew))
    );
    assert!(routes.lock().is_empty());
}

#[test]
fn help_state_is_visible_through_session() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();

    hub.dispatch(&KeyEvent::plain("?"), t0);
    assert!(session.help_visible());
    session.close_help();
    assert!(!session.help_visible());

    hub.dispatch(&KeyEvent::plain("?"), t0);
    hub.dispatch(&KeyEvent::plain("Escape"), t0);
    assert!(!session.help_visible());
}

#[test]
fn pending_indicator_follows_prefix() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();

    assert_eq!(session.pending_indicator(t0), None);
    hub.dispatch(&KeyEvent::plain("g"), t0);
    assert_eq!(session.pending_indicator(at(t0, 10)).as_deref(), Some("G…"));
    assert!(session.is_pending(at(t0, 10)));
    assert_eq!(session.pending_indicator(at(t0, 1001)), None);
    assert!(session.check_timeout(at(t0, 1001)));
    assert!(!session.check_timeout(at(t0, 1002)));
}

#[test]
fn detached_session_receives_nothing() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();

    // Arm the prefix, then tear the view down before the selector arrives
    hub.dispatch(&KeyEvent::plain("g"), t0);
    assert!(session.is_attached());
    assert_eq!(hub.subscriber_count(), 1);
    session.detach();
    assert_eq!(hub.subscriber_count(), 0);

    assert_eq!(
        hub.dispatch(&KeyEvent::plain("h"), at(t0, 100)),
        KeyDisposition::PassThrough
    );
    assert_eq!(
        hub.dispatch(&KeyEvent::with_modifier("k"), at(t0, 100)),
        KeyDisposition::PassThrough
    );
    assert!(rec.routes().is_empty());
    assert_eq!(rec.search.load(Ordering::SeqCst), 0);
}

#[test]
fn each_view_owns_its_own_state() {
    let hub = KeyEventHub::new();
    let rec_a = Recorder::default();
    let rec_b = Recorder::default();
    let view_a = rec_a.attach(&hub, &Config::default());
    let t0 = Instant::now();

    hub.dispatch(&KeyEvent::plain("g"), t0);
    // View B mounts after the prefix; it never saw `g`
    let view_b = rec_b.attach(&hub, &Config::default());
    assert!(view_a.is_pending(at(t0, 10)));
    assert!(!view_b.is_pending(at(t0, 10)));

    hub.dispatch(&KeyEvent::plain("p"), at(t0, 20));
    assert_eq!(rec_a.routes(), vec![Route::Pipeline]);
    assert!(rec_b.routes().is_empty());
}

#[test]
fn disabled_shortcuts_never_subscribe() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let config = Config {
        shortcuts_enabled: false,
        ..Config::default()
    };
    let session = rec.attach(&hub, &config);

    assert!(!session.is_attached());
    assert_eq!(hub.subscriber_count(), 0);
    assert_eq!(
        hub.dispatch(&KeyEvent::with_modifier("k"), Instant::now()),
        KeyDisposition::PassThrough
    );
    assert_eq!(rec.search.load(Ordering::SeqCst), 0);
}

#[test]
fn callback_may_tear_down_its_own_view() {
    let hub = KeyEventHub::new();
    let slot: Arc<Mutex<Option<ShortcutSession>>> = Arc::default();
    let teardown = Arc::clone(&slot);
    let session = ShortcutSession::attach(
        &hub,
        &Config::default(),
        ShortcutActions::new().on_open_new(move || {
            // Navigating away unmounts the view that handled the key
            teardown.lock().take();
        }),
        |_route: Route| {},
    );
    *slot.lock() = Some(session);

    hub.dispatch(&KeyEvent::with_modifier("n"), Instant::now());
    assert!(slot.lock().is_none());
    assert_eq!(hub.subscriber_count(), 0);
}

#[test]
fn callback_may_dispatch_on_the_same_hub() {
    let hub = KeyEventHub::new();
    let listener = Recorder::default();
    let _listener = listener.attach(&hub, &Config::default());

    let forward_hub = hub.clone();
    let forwarded = Arc::new(Mutex::new(None));
    let forwarded_result = Arc::clone(&forwarded);
    let _forwarder = ShortcutSession::attach(
        &hub,
        &Config::default(),
        ShortcutActions::new().on_open_new(move || {
            let disposition = forward_hub.dispatch(&KeyEvent::with_modifier("k"), Instant::now());
            *forwarded_result.lock() = Some(disposition);
        }),
        |_route: Route| {},
    );

    hub.dispatch(&KeyEvent::with_modifier("n"), Instant::now());

    // The nested press reached the other view and returned normally
    assert_eq!(
        *forwarded.lock(),
        Some(KeyDisposition::Consumed(Some(ShortcutCommand::OpenSearch)))
    );
    assert_eq!(listener.search.load(Ordering::SeqCst), 1);
    assert_eq!(listener.new.load(Ordering::SeqCst), 1);
}

#[test]
fn modified_selector_completes_pending_chord() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();

    hub.dispatch(&KeyEvent::plain("g"), t0);
    assert_eq!(
        hub.dispatch(&KeyEvent::with_modifier("h"), at(t0, 10)),
        KeyDisposition::Consumed(Some(ShortcutCommand::NavigateHome))
    );
    assert_eq!(rec.routes(), vec![Route::Home]);
    assert!(!session.is_pending(at(t0, 10)));
}

#[test]
fn host_releases_never_reach_the_session() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let session = rec.attach(&hub, &Config::default());
    let t0 = Instant::now();
    let g = Key::Character(SmolStr::new("g"));
    let h = Key::Character(SmolStr::new("h"));
    let none = ModifiersState::empty();

    // Release of `g` alone does not arm the prefix
    let released = host::from_parts(ElementState::Released, &g, none, false);
    assert_eq!(hub.dispatch_normalized(released, t0), KeyDisposition::PassThrough);
    assert!(!session.is_pending(t0));

    hub.dispatch_normalized(host::from_parts(ElementState::Pressed, &g, none, false), t0);
    hub.dispatch_normalized(host::from_parts(ElementState::Released, &g, none, false), at(t0, 5));
    assert!(session.is_pending(at(t0, 5)));

    let disposition =
        hub.dispatch_normalized(host::from_parts(ElementState::Pressed, &h, none, false), at(t0, 10));
    assert_eq!(
        disposition,
        KeyDisposition::Consumed(Some(ShortcutCommand::NavigateHome))
    );
    // The matching release is not a second press
    hub.dispatch_normalized(host::from_parts(ElementState::Released, &h, none, false), at(t0, 15));
    assert_eq!(rec.routes(), vec![Route::Home]);

    let escape = Key::Named(NamedKey::Escape);
    hub.dispatch_normalized(
        host::from_parts(ElementState::Pressed, &Key::Character(SmolStr::new("?")), none, false),
        at(t0, 20),
    );
    hub.dispatch_normalized(host::from_parts(ElementState::Released, &escape, none, false), at(t0, 25));
    assert!(session.help_visible());
    hub.dispatch_normalized(host::from_parts(ElementState::Pressed, &escape, none, false), at(t0, 30));
    assert!(!session.help_visible());
}

#[test]
fn help_sections_reflect_configured_bindings() {
    let hub = KeyEventHub::new();
    let rec = Recorder::default();
    let config = Config::default().with_keybindings(vec![KeyBinding::new(
        "Ctrl+J",
        "open_search",
    )]);
    let session = rec.attach(&hub, &config);

    let sections = session.help_sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].rows[0].description, "Open search");
}
