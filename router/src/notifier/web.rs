use eframe::wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::window;

use super::{ChangeNotifier, LocationCallback, Subscription};
use crate::{location::Location, utils::JsErr};

const EVENTS: [&str; 2] = ["popstate", "hashchange"];

/// Notifier backed by the browser's history API.
///
/// Every reported location requests a repaint of `ctx`, since egui on the
/// web only redraws on input.
pub struct WebNotifier {
    ctx: egui::Context,
    history: web_sys::History,
}

impl WebNotifier {
    pub fn new(ctx: egui::Context) -> anyhow::Result<Self> {
        let window = window().ok_or_else(|| JsErr::msg("No window"))?;
        Ok(Self {
            ctx,
            history: window.history().map_err(JsErr::from)?,
        })
    }

    fn current_href() -> Option<String> {
        window()?.location().href().ok()
    }
}

impl ChangeNotifier for WebNotifier {
    fn initial_location(&self) -> Option<String> {
        Self::current_href()
    }

    fn has_addressable_location(&self) -> bool {
        true
    }

    fn subscribe(&mut self, mut callback: LocationCallback) -> Subscription {
        let Some(window) = window() else {
            log::error!("No window to listen for location changes on");
            return Subscription::empty();
        };

        let ctx = self.ctx.clone();
        let cb = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(href) = Self::current_href() {
                callback(href);
                ctx.request_repaint();
            }
        }) as Box<dyn FnMut(_)>);

        for event in EVENTS {
            if let Err(e) =
                window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
            {
                log::error!("Failed to listen for {event}: {}", JsErr::from(e));
            }
        }

        Subscription::new(move || {
            for event in EVENTS {
                if let Err(e) =
                    window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
                {
                    log::error!("Failed to stop listening for {event}: {}", JsErr::from(e));
                }
            }
        })
    }

    fn record_navigation(&mut self, location: &Location) -> anyhow::Result<()> {
        if Self::current_href().as_deref() == Some(location.href()) {
            return Ok(());
        }
        self.history
            .push_state_with_url(&JsValue::null(), "", Some(location.href()))
            .map_err(JsErr::from)?;
        Ok(())
    }
}
