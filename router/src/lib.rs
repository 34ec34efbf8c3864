#![warn(
    clippy::all,
    rust_2018_idioms,
    rust_2021_compatibility,
    rust_2024_compatibility
)]

//! Client-side page navigation for egui applications.
//!
//! A [`Session`] keeps a newest-first list of visited locations and a cursor
//! into it. Pushing a new location drops everything ahead of the cursor,
//! navigating to a direct neighbour just moves the cursor, and every entry can
//! be classified as active, back or forward relative to the cursor. A
//! [`Router`] renders a session's pages inside an egui scroll area.

pub mod error;
pub mod history;
pub mod location;
pub mod notifier;
pub mod options;
pub mod page;
pub mod router;
pub mod scroll;
pub mod session;
mod utils;

pub use error::{ConfigurationWarning, InvalidLocationError, InvalidLocationReason};
pub use history::{EntryKey, History, HistoryEntry, Transition};
pub use location::{decode, DecodedLocation, Location};
pub use notifier::{ChangeNotifier, DefaultNotifier, Subscription};
pub use options::RouterOptions;
pub use page::{PageInfo, PresentationState};
pub use router::{active_page, Navigator, PageContext, Router};
pub use session::Session;

pub const IS_WEB: bool = cfg!(target_arch = "wasm32");

/// Where a session starts when neither the options nor the platform name a location.
pub const DEFAULT_LOCATION: &str = "http://localhost/";
