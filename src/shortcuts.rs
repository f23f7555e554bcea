//! View-scoped keyboard shortcut session.
//!
//! A [`ShortcutSession`] ties one [`ChordInterpreter`] to one active view:
//! attaching subscribes to the host's [`KeyEventHub`], and dropping the
//! session (or calling [`ShortcutSession::detach`]) releases the subscription.
//! Once released, no further key press can reach the view's callbacks or its
//! navigator, and any armed prefix is discarded with the interpreter.
//!
//! The hub and session are `Send` so an owner may live on another thread, but
//! dispatch is synchronous on whichever thread calls [`KeyEventHub::dispatch`].

use nextmic_config::Config;
use nextmic_keybindings::{
    ChordInterpreter, KeyDisposition, KeyEvent, Route, ShortcutCommand, host,
};
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

/// Boxed key handler registered with a [`KeyEventHub`].
pub type KeyHandler = Box<dyn FnMut(&KeyEvent, Instant) -> KeyDisposition + Send>;

/// Optional action callback.
pub type Action = Box<dyn FnMut() + Send>;

/// Callbacks a view supplies for the non-navigation shortcuts.
///
/// Each field is independently optional; a missing callback makes the
/// shortcut a consumed no-op.
#[derive(Default)]
pub struct ShortcutActions {
    pub on_open_toolkit: Option<Action>,
    pub on_open_search: Option<Action>,
    pub on_open_new: Option<Action>,
}

impl ShortcutActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open_toolkit(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_open_toolkit = Some(Box::new(f));
        self
    }

    pub fn on_open_search(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_open_search = Some(Box::new(f));
        self
    }

    pub fn on_open_new(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_open_new = Some(Box::new(f));
        self
    }

    fn slot(&mut self, command: ShortcutCommand) -> Option<&mut Action> {
        match command {
            ShortcutCommand::OpenToolkit => self.on_open_toolkit.as_mut(),
            ShortcutCommand::OpenSearch => self.on_open_search.as_mut(),
            ShortcutCommand::OpenNew => self.on_open_new.as_mut(),
            _ => None,
        }
    }
}

/// Router side effect for the `Navigate*` commands.
pub trait Navigator: Send {
    fn navigate(&mut self, route: Route);
}

impl<F> Navigator for F
where
    F: FnMut(Route) + Send,
{
    fn navigate(&mut self, route: Route) {
        self(route)
    }
}

struct HandlerSlot {
    id: u64,
    active: AtomicBool,
    /// Reentrant so a handler's own callbacks may dispatch on the same hub;
    /// the `RefCell` then refuses the nested call instead of deadlocking.
    handler: ReentrantMutex<RefCell<KeyHandler>>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    slots: Vec<Arc<HandlerSlot>>,
}

/// Host-side broadcaster of key presses.
///
/// Cloning yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct KeyEventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl KeyEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler until the returned guard is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, handler: KeyHandler) -> Subscription {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let slot = Arc::new(HandlerSlot {
            id,
            active: AtomicBool::new(true),
            handler: ReentrantMutex::new(RefCell::new(handler)),
        });
        inner.slots.push(Arc::clone(&slot));
        log::debug!("Key handler {} subscribed", id);

        Subscription {
            hub: Arc::downgrade(&self.inner),
            slot,
        }
    }

    /// Deliver one key press to every live subscriber.
    ///
    /// The event counts as consumed if any subscriber consumed it; the first
    /// command produced is reported.
    ///
    /// Callbacks may dispatch on the same hub. The nested event reaches every
    /// other subscriber; the handler whose callback is still running skips it.
    pub fn dispatch(&self, event: &KeyEvent, now: Instant) -> KeyDisposition {
        // Snapshot so handlers may subscribe or unsubscribe while running
        let slots: Vec<Arc<HandlerSlot>> = self.inner.lock().slots.clone();

        let mut result = KeyDisposition::PassThrough;
        for slot in slots {
            // Unsubscribed by an earlier handler in this same dispatch
            if !slot.active.load(Ordering::Acquire) {
                continue;
            }
            let guard = slot.handler.lock();
            let Ok(mut handler) = guard.try_borrow_mut() else {
                log::debug!("Key handler {} busy, skipping nested dispatch", slot.id);
                continue;
            };
            let disposition = (*handler)(event, now);
            drop(handler);
            drop(guard);
            result = match (result, disposition) {
                (KeyDisposition::Consumed(Some(first)), _) => KeyDisposition::Consumed(Some(first)),
                (KeyDisposition::Consumed(None), KeyDisposition::Consumed(cmd)) => {
                    KeyDisposition::Consumed(cmd)
                }
                (KeyDisposition::Consumed(None), KeyDisposition::PassThrough) => {
                    KeyDisposition::Consumed(None)
                }
                (KeyDisposition::PassThrough, other) => other,
            };
        }
        result
    }

    /// Normalise and deliver a winit key event.
    ///
    /// Key releases and keys without a DOM-style name pass through untouched.
    pub fn dispatch_winit(
        &self,
        event: &winit::event::KeyEvent,
        modifiers: &winit::event::Modifiers,
        target_is_text_input: bool,
        now: Instant,
    ) -> KeyDisposition {
        self.dispatch_normalized(
            host::from_winit(event, modifiers, target_is_text_input),
            now,
        )
    }

    /// Deliver the output of [`host::from_parts`] or [`host::from_winit`].
    pub fn dispatch_normalized(&self, event: Option<KeyEvent>, now: Instant) -> KeyDisposition {
        match event {
            Some(event) => self.dispatch(&event, now),
            None => KeyDisposition::PassThrough,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().slots.len()
    }
}

/// Guard for a hub subscription; unsubscribes on drop.
pub struct Subscription {
    hub: Weak<Mutex<HubInner>>,
    slot: Arc<HandlerSlot>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.slot.active.store(false, Ordering::Release);
        if let Some(hub) = self.hub.upgrade() {
            hub.lock().slots.retain(|s| s.id != self.slot.id);
            log::debug!("Key handler {} unsubscribed", self.slot.id);
        }
    }
}

/// Callbacks and navigator owned by a session.
struct SessionOutputs {
    actions: ShortcutActions,
    navigator: Box<dyn Navigator>,
}

impl SessionOutputs {
    fn run(&mut self, command: ShortcutCommand) {
        if let Some(route) = command.route() {
            log::info!("Shortcut {} navigating to {}", command, route);
            self.navigator.navigate(route);
            return;
        }
        match self.actions.slot(command) {
            Some(action) => {
                log::info!("Shortcut {} invoking callback", command);
                action();
            }
            None => log::trace!("Shortcut {} has no callback attached", command),
        }
    }
}

/// Shortcut handling for one active view.
pub struct ShortcutSession {
    interpreter: Arc<Mutex<ChordInterpreter>>,
    _outputs: Arc<Mutex<SessionOutputs>>,
    subscription: Option<Subscription>,
}

impl ShortcutSession {
    /// Create the view's interpreter and subscribe it to `hub`.
    ///
    /// With `shortcuts_enabled: false` the session is created detached and
    /// never sees a key press.
    pub fn attach(
        hub: &KeyEventHub,
        config: &Config,
        actions: ShortcutActions,
        navigator: impl Navigator + 'static,
    ) -> Self {
        let interpreter = Arc::new(Mutex::new(ChordInterpreter::from_config(config)));
        let outputs = Arc::new(Mutex::new(SessionOutputs {
            actions,
            navigator: Box::new(navigator),
        }));

        let subscription = if config.shortcuts_enabled {
            let weak_interp = Arc::downgrade(&interpreter);
            let weak_outputs = Arc::downgrade(&outputs);
            Some(hub.subscribe(Box::new(move |event: &KeyEvent, now: Instant| {
                let (Some(interp), Some(outputs)) = (weak_interp.upgrade(), weak_outputs.upgrade())
                else {
                    return KeyDisposition::PassThrough;
                };
                // Interpreter lock is released before callbacks run so they
                // may query the session.
                let disposition = interp.lock().handle_key_event(event, now);
                if let Some(command) = disposition.command() {
                    outputs.lock().run(command);
                }
                disposition
            })))
        } else {
            log::info!("Keyboard shortcuts disabled by config");
            None
        };

        Self {
            interpreter,
            _outputs: outputs,
            subscription,
        }
    }

    /// Whether the session is receiving key presses.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release the hub subscription. Equivalent to dropping the session.
    pub fn detach(self) {}

    pub fn help_visible(&self) -> bool {
        self.interpreter.lock().help_visible()
    }

    /// Close action from the help overlay.
    pub fn close_help(&self) {
        self.interpreter.lock().close_help();
    }

    pub fn is_pending(&self, now: Instant) -> bool {
        self.interpreter.lock().is_pending(now)
    }

    /// Text for a pending-prefix indicator, e.g. `"G…"`.
    pub fn pending_indicator(&self, now: Instant) -> Option<String> {
        self.interpreter
            .lock()
            .pending_prefix(now)
            .map(|key| format!("{key}…"))
    }

    /// Deferred expiry hook; see [`ChordInterpreter::check_timeout`].
    pub fn check_timeout(&self, now: Instant) -> bool {
        self.interpreter.lock().check_timeout(now)
    }

    /// Help rows for the session's active bindings.
    pub fn help_sections(&self) -> Vec<crate::help_ui::HelpSection> {
        crate::help_ui::shortcut_table(self.interpreter.lock().registry())
    }
}

impl Drop for ShortcutSession {
    fn drop(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("Shortcut session detached");
        }
    }
}
