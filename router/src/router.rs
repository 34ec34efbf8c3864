use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    error::InvalidLocationError,
    history::Transition,
    location::Location,
    notifier::{self, ChangeNotifier, DefaultNotifier},
    options::RouterOptions,
    page::PageInfo,
    session::Session,
};

type PageFn<T> = dyn Fn(&mut T, &mut egui::Ui, &PageContext<'_>);
type TransitionFn = dyn Fn(&mut egui::Ui, &PageInfo, &mut dyn FnMut(&mut egui::Ui));
type LocationChangeFn = dyn FnMut(&Location);

/// Navigation actions available to anything rendered by a [`Router`].
pub trait Navigator {
    fn navigate(&self, destination: &str) -> Result<(), InvalidLocationError>;
    fn back(&self);
    fn forward(&self);
    fn set_title(&self, ctx: &egui::Context, title: String);
}

/// Handed to every page the router renders. Pass it on to anything below the
/// page that needs to read the location or navigate.
pub struct PageContext<'a> {
    pub page: PageInfo,
    navigator: &'a dyn Navigator,
}

impl<'a> PageContext<'a> {
    pub fn new(page: PageInfo, navigator: &'a dyn Navigator) -> Self {
        Self { page, navigator }
    }

    pub fn navigate(&self, destination: &str) -> Result<(), InvalidLocationError> {
        self.navigator.navigate(destination)
    }

    pub fn back(&self) {
        self.navigator.back();
    }

    pub fn forward(&self) {
        self.navigator.forward();
    }

    /// Sets the window title, but only while this page is the active one.
    pub fn set_title(&self, ui: &egui::Ui, title: impl Into<String>) {
        if self.page.state.is_active() {
            self.navigator.set_title(ui.ctx(), title.into());
        }
    }

    /// Whether `href` points at this page (ignoring origin and fragment).
    pub fn is_current(&self, href: &str) -> bool {
        self.page
            .location
            .resolve(href)
            .is_ok_and(|location| location.to() == self.page.to)
    }

    /// A hyperlink that navigates on click and is emphasised when it points
    /// at this page.
    pub fn link(&self, ui: &mut egui::Ui, text: impl Into<String>, href: &str) -> egui::Response {
        let text = egui::RichText::new(text);
        let text = if self.is_current(href) {
            text.strong()
        } else {
            text
        };

        let response = ui.link(text).on_hover_text(href);
        if response.clicked() {
            if let Err(e) = self.navigate(href) {
                log::error!("Failed to navigate: {e}");
            }
        }
        response
    }
}

/// Renders the pages of a navigation [`Session`] inside an egui scroll area.
///
/// By default only the active page is shown. With a transition renderer every
/// visited page is shown, oldest first, so the renderer can animate pages in
/// and out based on their [`crate::PresentationState`].
pub struct Router<T, N: ChangeNotifier = DefaultNotifier> {
    id: egui::Id,
    session: RefCell<Session<N>>,
    render_page: Box<PageFn<T>>,
    render_transition: Option<Box<TransitionFn>>,
    title_formatter: Box<dyn Fn(String) -> String>,
    last_title: RefCell<Option<String>>,
    scroll_offset: Cell<f32>,
    changes: Rc<RefCell<Vec<Location>>>,
    on_location_change: RefCell<Option<Box<LocationChangeFn>>>,
}

impl<T> Router<T> {
    /// A router on the platform's default notifier. Locations the platform
    /// reports request a repaint of `ctx`.
    pub fn new(
        ctx: egui::Context,
        options: RouterOptions,
        render_page: impl Fn(&mut T, &mut egui::Ui, &PageContext<'_>) + 'static,
    ) -> anyhow::Result<Self> {
        Ok(Self::from_notifier(
            notifier::default_notifier(ctx)?,
            options,
            render_page,
        ))
    }
}

impl<T, N: ChangeNotifier> Router<T, N> {
    pub fn from_notifier(
        notifier: N,
        options: RouterOptions,
        render_page: impl Fn(&mut T, &mut egui::Ui, &PageContext<'_>) + 'static,
    ) -> Self {
        Self::from_session(Session::new(notifier, options), render_page)
    }

    pub fn from_session(
        session: Session<N>,
        render_page: impl Fn(&mut T, &mut egui::Ui, &PageContext<'_>) + 'static,
    ) -> Self {
        Self {
            id: egui::Id::new("page_router"),
            session: RefCell::new(session),
            render_page: Box::new(render_page),
            render_transition: None,
            title_formatter: Box::new(|title| title),
            last_title: RefCell::new(None),
            scroll_offset: Cell::new(0.0),
            changes: Rc::default(),
            on_location_change: RefCell::new(None),
        }
    }

    /// Distinguishes this router's state from other routers in the same
    /// [`egui::Context`].
    pub fn set_id(&mut self, id: impl Into<egui::Id>) {
        self.id = id.into();
    }

    pub fn id(&self) -> egui::Id {
        self.id
    }

    pub fn set_transition(
        &mut self,
        render_transition: impl Fn(&mut egui::Ui, &PageInfo, &mut dyn FnMut(&mut egui::Ui)) + 'static,
    ) {
        self.render_transition = Some(Box::new(render_transition));
    }

    pub fn set_title_formatter(&mut self, formatter: impl Fn(String) -> String + 'static) {
        self.title_formatter = Box::new(formatter);
    }

    /// Runs `callback` after each change of the current location, once the
    /// router is no longer borrowed. The callback may read the router or
    /// navigate it again.
    pub fn set_on_location_change(&mut self, callback: impl FnMut(&Location) + 'static) {
        let changes = self.changes.clone();
        self.session
            .get_mut()
            .set_on_location_change(move |location| changes.borrow_mut().push(location.clone()));
        self.on_location_change = RefCell::new(Some(Box::new(callback)));
    }

    fn flush_changes(&self) {
        // Taken out while running, so a callback that navigates queues more
        // changes for this loop instead of re-entering it.
        let Some(mut callback) = self.on_location_change.take() else {
            return;
        };
        loop {
            let changes = std::mem::take(&mut *self.changes.borrow_mut());
            if changes.is_empty() {
                break;
            }
            for location in &changes {
                callback(location);
            }
        }
        self.on_location_change.replace(Some(callback));
    }

    pub fn session(&self) -> std::cell::Ref<'_, Session<N>> {
        self.session.borrow()
    }

    pub fn current_page(&self) -> PageInfo {
        self.session.borrow().current_page()
    }

    pub fn pages(&self) -> Vec<PageInfo> {
        self.session.borrow().pages()
    }

    pub fn navigate(&self, destination: &str) -> Result<Transition, InvalidLocationError> {
        let transition = self.session.borrow_mut().navigate(destination);
        self.flush_changes();
        transition
    }

    pub fn back(&self) -> Transition {
        let transition = self.session.borrow_mut().go_back();
        self.flush_changes();
        transition
    }

    pub fn forward(&self) -> Transition {
        let transition = self.session.borrow_mut().go_forward();
        self.flush_changes();
        transition
    }

    pub fn ui(&self, state: &mut T, ui: &mut egui::Ui) {
        let (pages, scroll_to) = {
            let mut session = self.session.borrow_mut();
            session.poll_platform();

            let now = ui.input(|i| i.time);
            let scroll_to = session.step_scroll(now, self.scroll_offset.get());
            if session.is_scrolling() {
                ui.ctx().request_repaint();
            }

            let pages = if self.render_transition.is_some() {
                session.pages()
            } else {
                vec![session.current_page()]
            };
            (pages, scroll_to)
        };
        self.flush_changes();

        let active_key = pages
            .iter()
            .find(|page| page.state.is_active())
            .map(|page| {
                ui.ctx().data_mut(|d| d.insert_temp(self.id, page.clone()));
                page.key
            });

        let mut area = egui::ScrollArea::vertical()
            .id_salt(self.id)
            .auto_shrink(false);
        if let Some(offset) = scroll_to {
            area = area.vertical_scroll_offset(offset);
        }

        let output = area.show(ui, |ui| match &self.render_transition {
            Some(render_transition) => {
                for page in pages.into_iter().rev() {
                    let ctx = PageContext::new(page, self);
                    ui.push_id(ctx.page.key, |ui| {
                        render_transition(ui, &ctx.page, &mut |ui: &mut egui::Ui| {
                            (self.render_page)(state, ui, &ctx)
                        });
                    });
                }
            }
            None => {
                for page in pages {
                    let ctx = PageContext::new(page, self);
                    ui.push_id(ctx.page.key, |ui| (self.render_page)(state, ui, &ctx));
                }
            }
        });
        self.scroll_offset.set(output.state.offset.y);

        if Some(self.session.borrow().current().key) != active_key {
            ui.ctx().request_discard("Navigation requested");
        }
    }
}

impl<T, N: ChangeNotifier> Navigator for Router<T, N> {
    fn navigate(&self, destination: &str) -> Result<(), InvalidLocationError> {
        Router::navigate(self, destination).map(|_| ())
    }

    fn back(&self) {
        Router::back(self);
    }

    fn forward(&self) {
        Router::forward(self);
    }

    fn set_title(&self, ctx: &egui::Context, title: String) {
        let title = (self.title_formatter)(title);
        if self.last_title.borrow().as_ref() == Some(&title) {
            return;
        }
        apply_title(ctx, &title);
        self.last_title.replace(Some(title));
    }
}

/// The active page of the router with `router_id`, as of its last frame.
///
/// For widgets outside the router's page tree, such as a navigation bar.
pub fn active_page(ctx: &egui::Context, router_id: egui::Id) -> Option<PageInfo> {
    ctx.data(|d| d.get_temp(router_id))
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_title(ctx: &egui::Context, title: &str) {
    ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.to_string()));
}

#[cfg(target_arch = "wasm32")]
fn apply_title(_ctx: &egui::Context, title: &str) {
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        document.set_title(title);
    }
}

#[cfg(test)]
mod test {
    use std::{
        cell::RefCell,
        rc::{Rc, Weak},
    };

    use super::{active_page, PageContext, Router};
    use crate::{
        notifier::memory::MemoryNotifier, options::RouterOptions, page::PresentationState,
    };

    #[derive(Default)]
    struct State {
        rendered: Vec<(String, PresentationState)>,
        follow: Option<String>,
    }

    fn render(state: &mut State, _ui: &mut egui::Ui, ctx: &PageContext<'_>) {
        state
            .rendered
            .push((ctx.page.location.path().to_string(), ctx.page.state));
        if let Some(href) = state.follow.take() {
            ctx.navigate(&href).unwrap();
        }
    }

    fn frame(ctx: &egui::Context, router: &Router<State, MemoryNotifier>, state: &mut State) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            state.rendered.clear();
            egui::CentralPanel::default().show(ctx, |ui| router.ui(state, ui));
        });
    }

    fn router(notifier: MemoryNotifier) -> Router<State, MemoryNotifier> {
        Router::from_notifier(notifier, RouterOptions::default(), render)
    }

    #[test]
    fn renders_active_page() {
        let ctx = egui::Context::default();
        let router = router(MemoryNotifier::new());
        let mut state = State::default();

        router.navigate("/a").unwrap();
        router.navigate("/b").unwrap();
        router.back();
        frame(&ctx, &router, &mut state);

        assert_eq!(
            state.rendered,
            [("/a".to_string(), PresentationState::Active)]
        );
        let page = active_page(&ctx, router.id()).unwrap();
        assert_eq!(page.to, "/a");
    }

    #[test]
    fn transitions_render_every_page_oldest_first() {
        let ctx = egui::Context::default();
        let mut router = router(MemoryNotifier::new());
        let wrapped = Rc::new(RefCell::new(Vec::new()));
        let sink = wrapped.clone();
        router.set_transition(move |ui, page, render| {
            sink.borrow_mut().push(page.key);
            render(ui);
        });
        let mut state = State::default();

        router.navigate("/a").unwrap();
        router.navigate("/b").unwrap();
        router.back();
        frame(&ctx, &router, &mut state);

        assert_eq!(
            state.rendered,
            [
                ("/".to_string(), PresentationState::Back),
                ("/a".to_string(), PresentationState::Active),
                ("/b".to_string(), PresentationState::Forward),
            ]
        );
        assert!(!wrapped.borrow().is_empty());
    }

    #[test]
    fn pages_can_navigate() {
        let ctx = egui::Context::default();
        let router = router(MemoryNotifier::new());
        let mut state = State {
            follow: Some("/next?from=home".to_string()),
            ..State::default()
        };

        frame(&ctx, &router, &mut state);
        assert_eq!(router.current_page().to, "/next?from=home");
        assert_eq!(router.current_page().param("from"), Some("home"));

        frame(&ctx, &router, &mut state);
        assert_eq!(
            state.rendered,
            [("/next".to_string(), PresentationState::Active)]
        );
    }

    #[test]
    fn platform_locations_apply_next_frame() {
        let ctx = egui::Context::default();
        let notifier = MemoryNotifier::new();
        let router = router(notifier.clone());
        let mut state = State::default();
        router.navigate("/a").unwrap();

        notifier.emit("http://localhost/");
        frame(&ctx, &router, &mut state);
        assert_eq!(
            state.rendered,
            [("/".to_string(), PresentationState::Active)]
        );
        assert_eq!(router.session().history().cursor(), 1);
    }

    #[test]
    fn link_activity() {
        let router = router(MemoryNotifier::new());
        router.navigate("/docs?page=2").unwrap();
        let ctx = PageContext::new(router.current_page(), &router);
        assert!(ctx.is_current("/docs?page=2"));
        assert!(ctx.is_current("http://localhost/docs?page=2#top"));
        assert!(!ctx.is_current("/docs"));
        assert!(!ctx.is_current("http://[::1"));
    }

    #[test]
    fn title_only_from_active_page() {
        let mut router = router(MemoryNotifier::new());
        router.set_title_formatter(|title| format!("{title} - Demo"));
        router.navigate("/a").unwrap();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let pages = router.pages();
                for page in pages {
                    let page_ctx = PageContext::new(page, &router);
                    page_ctx.set_title(ui, page_ctx.page.location.path().to_string());
                }
            });
        });
        assert_eq!(router.last_title.borrow().as_deref(), Some("/a - Demo"));
    }

    #[test]
    fn location_change_may_reenter_router() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let router = Rc::new_cyclic(|weak: &Weak<Router<State, MemoryNotifier>>| {
            let weak = weak.clone();
            let mut router = router(MemoryNotifier::new());
            router.set_on_location_change(move |location| {
                let router = weak.upgrade().unwrap();
                sink.borrow_mut().push(router.current_page().to);
                if location.path() == "/a" {
                    router.navigate("/b").unwrap();
                }
            });
            router
        });

        router.navigate("/a").unwrap();
        assert_eq!(*seen.borrow(), ["/a", "/b"]);
        assert_eq!(router.current_page().to, "/b");
        assert_eq!(router.session().history().len(), 3);
    }

    #[test]
    fn scroll_restoration_drives_scroll_area() {
        fn tall(_: &mut State, ui: &mut egui::Ui, _: &PageContext<'_>) {
            ui.add_space(5000.0);
        }
        fn frame_at(ctx: &egui::Context, router: &Router<State, MemoryNotifier>, time: f64) {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(400.0, 300.0),
                )),
                time: Some(time),
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default()
                    .show(ctx, |ui| router.ui(&mut State::default(), ui));
            });
        }

        let ctx = egui::Context::default();
        let router = Router::from_notifier(MemoryNotifier::new(), RouterOptions::default(), tall);
        frame_at(&ctx, &router, 9.0);
        router.scroll_offset.set(400.0);

        router.navigate("/a").unwrap();
        assert!(router.session().is_scrolling());

        frame_at(&ctx, &router, 10.0);
        assert!((router.scroll_offset.get() - 400.0).abs() < 1.0);
        frame_at(&ctx, &router, 10.25);
        assert!((router.scroll_offset.get() - 200.0).abs() < 1.0);
        frame_at(&ctx, &router, 10.5);
        assert!(router.scroll_offset.get().abs() < 1.0);
        assert!(!router.session().is_scrolling());
    }
}
