//! # Viewstack
//!
//! Fragment view loader and navigation stack for storefront shells.
//!
//! The engine maintains an ordered navigation history of named view
//! containers, fetches remote content fragments into them, re-runs the
//! scripts embedded in each fragment in document order, and supports
//! back-navigation as the structural inverse of forward promotion.
//!
//! The controller owns all navigation state. Collaborators are traits:
//! content comes from a [`content::ContentStore`], external scripts load
//! through a [`reactivate::ScriptLoader`], and containers are opaque
//! [`surface::Surface`]s resolved by a [`surface::SurfaceHost`].

pub mod content;
pub mod controller;
pub mod dispatch;
pub mod reactivate;
pub mod registry;
pub mod style;
pub mod surface;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use controller::NavigationController;
pub use dispatch::NavHook;
pub use style::DEFAULT_STYLE_RULES;

/// Default post-reactivation settle delay, in milliseconds.
///
/// Gives injected content a beat to lay out before hooks run. A scheduling
/// courtesy, not a correctness requirement.
pub const DEFAULT_SETTLE_MS: u64 = 300;

// ---------------------------------------------------------------------------
// Navigation Status
// ---------------------------------------------------------------------------

/// How a `navigate_forward` call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavStatus {
    /// Content was fetched, injected, and reactivated.
    Completed,
    /// The container was already registered — promoted to the top of the
    /// stack without a fetch.
    Promoted,
    /// The navigation stopped early. The previously visible container is
    /// left exactly as it was.
    Aborted,
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A structured diagnostic collected while a navigation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// NavigatePlan
// ---------------------------------------------------------------------------

/// Describes WHAT to navigate to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatePlan {
    /// Opaque fragment address, resolved by the content store.
    pub address: String,
    /// Identifier of the target view container.
    pub container_id: String,
}

// ---------------------------------------------------------------------------
// NavigateOptions
// ---------------------------------------------------------------------------

/// Describes HOW to navigate.
#[derive(Clone)]
pub struct NavigateOptions {
    /// Post-reactivation settle delay in milliseconds.
    pub settle_ms: u64,
    /// Scoped style rules installed for the container. The style registry
    /// tags the record with the container id so a later clear can find it.
    pub style_rules: String,
    /// Completion hooks, invoked in order once the view is ready (or
    /// promoted). A failing hook never prevents later hooks.
    pub hooks: Vec<NavHook>,
    /// Discard and re-fetch the container's content even if it is already
    /// registered.
    pub force_reload: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            settle_ms: DEFAULT_SETTLE_MS,
            style_rules: DEFAULT_STYLE_RULES.to_string(),
            hooks: Vec::new(),
            force_reload: false,
        }
    }
}

impl fmt::Debug for NavigateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigateOptions")
            .field("settle_ms", &self.settle_ms)
            .field("style_rules", &self.style_rules)
            .field("hooks", &self.hooks.len())
            .field("force_reload", &self.force_reload)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NavReport
// ---------------------------------------------------------------------------

/// The sealed outcome of a `navigate_forward` call.
///
/// No navigation ever surfaces an error to its caller; a failed call degrades
/// to an `Aborted` report with the reason in `diagnostics`. Callers that need
/// to distinguish "nothing to do" from "something failed" inspect `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavReport {
    pub status: NavStatus,
    pub container_id: String,
    pub address: String,
    /// Whether fragment content was actually fetched this call.
    pub fetched: bool,
    /// Registered script units executed during reactivation.
    pub units_run: usize,
    /// External scripts that loaded successfully.
    pub externals_loaded: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl NavReport {
    pub(crate) fn started(plan: &NavigatePlan) -> Self {
        Self {
            status: NavStatus::Aborted,
            container_id: plan.container_id.clone(),
            address: plan.address.clone(),
            fetched: false,
            units_run: 0,
            externals_loaded: 0,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn abort(&mut self, reason: impl Into<String>) {
        self.status = NavStatus::Aborted;
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            message: reason.into(),
            context: None,
        });
    }

    pub(crate) fn note(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Info,
            message: message.into(),
            context: None,
        });
    }
}

// ---------------------------------------------------------------------------
// NavError
// ---------------------------------------------------------------------------

/// Errors that stop part of a navigation.
///
/// These never cross the public boundary: the controller folds them into
/// the report and logs them.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Fetch failed for '{address}': {reason}")]
    Fetch { address: String, reason: String },

    #[error("No rendering surface registered for container '{0}'")]
    ContainerNotFound(String),

    #[error("Script unit '{name}' failed: {source}")]
    UnitFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("External script '{src}' failed to load: {reason}")]
    ExternalLoad { src: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
