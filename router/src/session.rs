use std::{cell::RefCell, rc::Rc};

use crate::{
    error::{ConfigurationWarning, InvalidLocationError},
    history::{History, HistoryEntry, Transition},
    location::Location,
    notifier::{ChangeNotifier, DefaultNotifier, Subscription},
    options::RouterOptions,
    page::{PageInfo, PresentationState},
    scroll::{ScrollRestoration, ScrollStep},
    DEFAULT_LOCATION,
};

type LocationChangeFn = Box<dyn FnMut(&Location)>;

/// A navigation session: the history plus everything that reacts to it.
///
/// Application code drives it through [`Session::navigate`], [`Session::go_back`]
/// and [`Session::go_forward`]. Locations reported by the platform queue up and
/// are applied by [`Session::poll_platform`].
pub struct Session<N: ChangeNotifier = DefaultNotifier> {
    history: History,
    options: RouterOptions,
    notifier: N,
    inbox: Rc<RefCell<Vec<String>>>,
    _subscription: Subscription,
    scroll: Option<ScrollRestoration>,
    on_location_change: Option<LocationChangeFn>,
    warnings: Vec<ConfigurationWarning>,
}

impl<N: ChangeNotifier> Session<N> {
    pub fn new(mut notifier: N, options: RouterOptions) -> Self {
        let mut warnings = Vec::new();
        let initial = starting_location(&notifier, &options, &mut warnings);
        for warning in &warnings {
            log::warn!("{warning}");
        }

        let inbox = Rc::new(RefCell::new(Vec::new()));
        let subscription = {
            let inbox = inbox.clone();
            notifier.subscribe(Box::new(move |href: String| inbox.borrow_mut().push(href)))
        };

        log::debug!("Starting navigation session at {initial}");
        Self {
            history: History::new(initial),
            options,
            notifier,
            inbox,
            _subscription: subscription,
            scroll: None,
            on_location_change: None,
            warnings,
        }
    }

    /// Runs `callback` after each transition that changes the current location.
    ///
    /// The callback runs while the session is mutably borrowed. A [`crate::Router`]
    /// defers it until its own borrow is released.
    pub fn set_on_location_change(&mut self, callback: impl FnMut(&Location) + 'static) {
        self.on_location_change = Some(Box::new(callback));
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn warnings(&self) -> &[ConfigurationWarning] {
        &self.warnings
    }

    pub fn current(&self) -> &HistoryEntry {
        self.history.current()
    }

    pub fn current_page(&self) -> PageInfo {
        self.history.current_page()
    }

    pub fn pages(&self) -> Vec<PageInfo> {
        self.history.pages()
    }

    pub fn all_with_state(&self) -> Vec<(&HistoryEntry, PresentationState)> {
        self.history.all_with_state()
    }

    /// Resolves `destination` against the current location and navigates there.
    ///
    /// Nothing changes when the destination can't be decoded.
    pub fn navigate(&mut self, destination: &str) -> Result<Transition, InvalidLocationError> {
        let destination = self.history.current().location.resolve(destination)?;
        Ok(self.navigate_to(destination))
    }

    pub fn navigate_to(&mut self, destination: Location) -> Transition {
        let transition = self.apply(destination);
        if transition.is_change() {
            let location = &self.history.current().location;
            if let Err(e) = self.notifier.record_navigation(location) {
                log::error!("Failed to record navigation to {location}: {e}");
            }
        }
        transition
    }

    /// Moves the cursor to the older neighbour.
    ///
    /// The platform history is left alone: on the web the address bar keeps
    /// showing the location being left until the next [`Session::navigate`].
    /// Driving `history.back()` instead would leave the site whenever the
    /// browser's own stack is shorter than this one.
    pub fn go_back(&mut self) -> Transition {
        let before = self.history.current().location.clone();
        let transition = self.history.go_back();
        self.after_move(transition, &before);
        transition
    }

    /// Moves the cursor to the newer neighbour. Like [`Session::go_back`], this
    /// does not touch the platform history.
    pub fn go_forward(&mut self) -> Transition {
        let before = self.history.current().location.clone();
        let transition = self.history.go_forward();
        self.after_move(transition, &before);
        transition
    }

    /// Applies every location the platform reported since the last poll.
    /// Reports are absolute; undecodable ones are logged and skipped.
    pub fn poll_platform(&mut self) -> usize {
        let reported = std::mem::take(&mut *self.inbox.borrow_mut());
        let mut changes = 0;
        for href in reported {
            match Location::parse(&href) {
                Ok(destination) => {
                    if self.apply(destination).is_change() {
                        changes += 1;
                    }
                }
                Err(e) => log::warn!("Ignoring location reported by the platform: {e}"),
            }
        }
        changes
    }

    fn apply(&mut self, destination: Location) -> Transition {
        let transition = self.history.classify(&destination);
        if transition == Transition::Unchanged {
            log::debug!("Already at {destination}");
            return transition;
        }

        let before = self.history.current().location.clone();
        self.history.navigate(destination);
        self.after_move(transition, &before);
        transition
    }

    fn after_move(&mut self, transition: Transition, before: &Location) {
        if !transition.is_change() {
            return;
        }

        // A fresh restoration replaces (and so cancels) any stale one.
        self.scroll = self.wants_scroll(transition).then(|| {
            ScrollRestoration::new(self.options.scroll_duration_secs())
        });

        let location = &self.history.current().location;
        if location == before {
            return;
        }
        log::info!("Navigating to {location}");
        if let Some(callback) = &mut self.on_location_change {
            callback(location);
        }
    }

    fn wants_scroll(&self, transition: Transition) -> bool {
        !self.options.scroll_disabled
            && (self.options.scroll_always || transition == Transition::Pushed)
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Advances any in-flight scroll restoration and returns the offset the
    /// host should scroll to this frame.
    pub fn step_scroll(&mut self, now: f64, offset: f32) -> Option<f32> {
        let task = self.scroll.as_mut()?;
        match task.step(now, offset) {
            ScrollStep::Continue(target) => Some(target),
            ScrollStep::Finish(target) => {
                self.scroll = None;
                Some(target)
            }
            ScrollStep::Stopped => {
                self.scroll = None;
                None
            }
        }
    }

    pub fn cancel_scroll(&mut self) {
        self.scroll = None;
    }
}

fn starting_location(
    notifier: &impl ChangeNotifier,
    options: &RouterOptions,
    warnings: &mut Vec<ConfigurationWarning>,
) -> Location {
    let sentinel = Location::parse(DEFAULT_LOCATION).expect("DEFAULT_LOCATION is valid");

    match options
        .initial_location
        .clone()
        .or_else(|| notifier.initial_location())
    {
        // Relative starts resolve the same way `Session::navigate` does.
        Some(href) => sentinel.resolve(&href).unwrap_or_else(|error| {
            warnings.push(ConfigurationWarning::InvalidStartingLocation {
                error,
                sentinel: DEFAULT_LOCATION.to_string(),
            });
            sentinel.clone()
        }),
        None => {
            if notifier.has_addressable_location() {
                warnings.push(ConfigurationWarning::NoStartingLocation {
                    sentinel: DEFAULT_LOCATION.to_string(),
                });
            }
            sentinel
        }
    }
}
