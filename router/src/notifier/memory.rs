use std::{cell::RefCell, rc::Rc};

use super::{ChangeNotifier, LocationCallback, Subscription};
use crate::location::Location;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: Vec<(u64, LocationCallback)>,
}

/// Notifier for platforms without an addressable location history.
///
/// Recording is a no-op. Nothing is reported inbound unless the host calls
/// [`MemoryNotifier::emit`], e.g. from a hardware back button handler.
/// Clones share the same listeners.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    initial: Option<String>,
    addressable: bool,
    waker: Option<Rc<dyn Fn()>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_location(location: impl Into<String>) -> Self {
        Self {
            initial: Some(location.into()),
            ..Self::default()
        }
    }

    /// A notifier for rendering a request on the server, where the request URL
    /// is the starting location and its absence is worth a warning.
    pub fn for_request(request_url: Option<String>) -> Self {
        Self {
            initial: request_url,
            addressable: true,
            ..Self::default()
        }
    }

    /// Requests a repaint of `ctx` after every [`MemoryNotifier::emit`], so
    /// locations emitted outside a frame are picked up without further input.
    #[must_use]
    pub fn with_context(self, ctx: egui::Context) -> Self {
        self.with_waker(move || ctx.request_repaint())
    }

    /// Runs `waker` after every [`MemoryNotifier::emit`].
    #[must_use]
    pub fn with_waker(mut self, waker: impl Fn() + 'static) -> Self {
        self.waker = Some(Rc::new(waker));
        self
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().callbacks.len()
    }

    /// Reports `location` to every subscriber as if the platform navigated there.
    ///
    /// Callbacks must not subscribe or unsubscribe while being run.
    pub fn emit(&self, location: &str) {
        {
            let mut listeners = self.listeners.borrow_mut();
            for (_, callback) in &mut listeners.callbacks {
                callback(location.to_string());
            }
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }
}

impl ChangeNotifier for MemoryNotifier {
    fn initial_location(&self) -> Option<String> {
        self.initial.clone()
    }

    fn has_addressable_location(&self) -> bool {
        self.addressable
    }

    fn subscribe(&mut self, callback: LocationCallback) -> Subscription {
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.callbacks.push((id, callback));
            id
        };

        let listeners = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners
                    .borrow_mut()
                    .callbacks
                    .retain(|(other, _)| *other != id);
            }
        })
    }

    fn record_navigation(&mut self, location: &Location) -> anyhow::Result<()> {
        log::trace!("No platform history to record {location}");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::MemoryNotifier;
    use crate::notifier::ChangeNotifier;

    #[test]
    fn emit_reaches_subscribers_until_unsubscribed() {
        let mut notifier = MemoryNotifier::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        let subscription = notifier.subscribe(Box::new(move |location: String| {
            sink.borrow_mut().push(location);
        }));
        assert_eq!(notifier.subscriber_count(), 1);

        notifier.emit("http://localhost/a");
        notifier.clone().emit("http://localhost/b");
        subscription.unsubscribe();
        notifier.emit("http://localhost/c");

        assert_eq!(notifier.subscriber_count(), 0);
        assert_eq!(*seen.borrow(), ["http://localhost/a", "http://localhost/b"]);
    }

    #[test]
    fn emit_wakes_the_host() {
        let wakes = Rc::new(Cell::new(0));
        let counter = wakes.clone();
        let mut notifier =
            MemoryNotifier::new().with_waker(move || counter.set(counter.get() + 1));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = notifier.subscribe(Box::new(move |location: String| {
            sink.borrow_mut().push(location);
        }));

        notifier.emit("http://localhost/a");
        notifier.clone().emit("http://localhost/b");
        assert_eq!(wakes.get(), 2);
        assert_eq!(seen.borrow().len(), 2);

        // Repainting a context from outside a frame is allowed.
        MemoryNotifier::new()
            .with_context(egui::Context::default())
            .emit("http://localhost/c");
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let mut notifier = MemoryNotifier::new();
        {
            let _subscription = notifier.subscribe(Box::new(|_: String| {}));
            assert_eq!(notifier.subscriber_count(), 1);
        }
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn initial_location() {
        assert_eq!(MemoryNotifier::new().initial_location(), None);
        assert_eq!(
            MemoryNotifier::with_initial_location("http://localhost/x").initial_location(),
            Some("http://localhost/x".to_string())
        );
        assert!(!MemoryNotifier::new().has_addressable_location());
        assert!(MemoryNotifier::for_request(None).has_addressable_location());
    }
}
