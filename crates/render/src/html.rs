//! HTML rendering of bin history.
//!
//! Templates are compiled into the binary and registered under `*.html`
//! names so tera's autoescape covers every interpolated value. Captured
//! request data is attacker-controlled; nothing reaches the page unescaped.

use std::time::Instant;

use tera::{Context, Tera};
use tracing::debug;

use bin_core::{Error, HistorySnapshot, RequestBinOptions, Result};
use telemetry::metrics;

use crate::view::HistoryView;

const DARK_TEMPLATE: &str = include_str!("../templates/dark.html");
const LIGHT_TEMPLATE: &str = include_str!("../templates/light.html");

/// Template names accepted for `renderer_template`.
pub const TEMPLATE_NAMES: &[&str] = &["dark.html", "light.html"];

/// Renders a bin's history into a browser-ready page.
pub trait HistoryRenderer: Send + Sync {
    /// Full history page for `bin_id`.
    fn render_history(
        &self,
        bin_id: &str,
        bin_url: &str,
        snapshot: &HistorySnapshot,
    ) -> Result<String>;

    /// Error page carrying `message` in place of the request list.
    fn render_error(&self, bin_id: &str, bin_url: &str, message: &str) -> Result<String>;
}

/// Tera-backed renderer with both built-in themes registered.
#[derive(Debug)]
pub struct HtmlRenderer {
    tera: Tera,
    template: String,
    options: RequestBinOptions,
}

impl HtmlRenderer {
    /// Builds the renderer, failing when `options.renderer_template` names an
    /// unknown template. Startup is the right place to find that out.
    pub fn new(options: RequestBinOptions) -> Result<Self> {
        if !TEMPLATE_NAMES.contains(&options.renderer_template.as_str()) {
            return Err(Error::config(format!(
                "The Renderer '{}' specified in the configuration is not implemented.",
                options.renderer_template
            )));
        }

        let mut tera = Tera::default();
        tera.add_raw_template("dark.html", DARK_TEMPLATE)
            .map_err(|e| Error::config(format!("failed to compile dark.html: {e}")))?;
        tera.add_raw_template("light.html", LIGHT_TEMPLATE)
            .map_err(|e| Error::config(format!("failed to compile light.html: {e}")))?;

        Ok(Self {
            template: options.renderer_template.clone(),
            tera,
            options,
        })
    }

    fn render_view(&self, view: &HistoryView) -> Result<String> {
        let started = Instant::now();

        let context = Context::from_serialize(view)
            .map_err(|e| Error::render(format!("failed to build template context: {e}")))?;
        let page = self.tera.render(&self.template, &context).map_err(|e| {
            metrics().render_errors.inc();
            Error::render(format!("failed to render '{}': {e}", self.template))
        })?;

        metrics().pages_rendered.inc();
        metrics()
            .render_latency_ms
            .observe(started.elapsed().as_millis() as u64);
        debug!(
            bin_id = %view.bin_id,
            requests = view.requests.len(),
            template = %self.template,
            "Rendered template"
        );
        Ok(page)
    }
}

impl HistoryRenderer for HtmlRenderer {
    fn render_history(
        &self,
        bin_id: &str,
        bin_url: &str,
        snapshot: &HistorySnapshot,
    ) -> Result<String> {
        let view = HistoryView::for_bin(bin_id, bin_url, snapshot, &self.options);
        self.render_view(&view)
    }

    fn render_error(&self, bin_id: &str, bin_url: &str, message: &str) -> Result<String> {
        let view = HistoryView::for_error(bin_id, bin_url, message, &self.options);
        self.render_view(&view)
    }
}
