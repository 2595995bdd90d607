//! History page rendering.
//!
//! Turns a [`bin_core::HistorySnapshot`] into a self-contained HTML page.
//! Two built-in themes ship compiled into the binary; the active one is
//! chosen by `RequestBinOptions::renderer_template` and validated at
//! startup so a typo fails the process instead of the first page view.

pub mod html;
pub mod view;

pub use html::{HistoryRenderer, HtmlRenderer, TEMPLATE_NAMES};
pub use view::{HistoryView, PairView, RequestView, SettingsView};
