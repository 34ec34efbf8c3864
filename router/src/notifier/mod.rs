use crate::location::Location;

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultNotifier = memory::MemoryNotifier;

#[cfg(target_arch = "wasm32")]
pub type DefaultNotifier = web::WebNotifier;

/// The notifier for the platform being compiled for. Reported locations
/// request a repaint of `ctx`.
pub fn default_notifier(ctx: egui::Context) -> anyhow::Result<DefaultNotifier> {
    #[cfg(not(target_arch = "wasm32"))]
    return Ok(memory::MemoryNotifier::new().with_context(ctx));

    #[cfg(target_arch = "wasm32")]
    return web::WebNotifier::new(ctx);
}

/// Receives raw location strings reported by the platform.
pub type LocationCallback = Box<dyn FnMut(String)>;

/// The platform's view of navigation: it reports locations the user reached
/// outside of the router (back gestures, the address bar) and is told about
/// locations the router commits.
pub trait ChangeNotifier {
    /// The location the platform is currently showing, if it has one.
    fn initial_location(&self) -> Option<String> {
        None
    }

    /// Whether this platform is expected to supply a starting location. A
    /// session warns when such a platform doesn't.
    fn has_addressable_location(&self) -> bool {
        false
    }

    fn subscribe(&mut self, callback: LocationCallback) -> Subscription;

    fn record_navigation(&mut self, location: &Location) -> anyhow::Result<()>;
}

/// Keeps a [`ChangeNotifier::subscribe`] callback registered until it is
/// dropped or explicitly unsubscribed.
#[must_use]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to undo.
    pub fn empty() -> Self {
        Self { unsubscribe: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
