//! The navigation controller.
//!
//! Owns the registry, the style records, and the unit table, and composes
//! the collaborators into the two public operations: `navigate_forward`
//! and `navigate_back`. Nothing else mutates the registry.
//!
//! Overlapping navigations are serialized through an internal gate: a
//! second call taken while one is suspended at a fetch or an external load
//! queues behind it instead of interleaving registry mutations and
//! container writes.
//!
//! No error escapes this module's public surface. Failed forwards degrade
//! to an `Aborted` report; a back with no history logs a warning and
//! returns `false`.

use std::sync::Mutex;
use std::time::Duration;

use crate::content::ContentStore;
use crate::dispatch;
use crate::reactivate::{self, ScriptLoader, UnitRegistry};
use crate::registry::Registry;
use crate::style::StyleRegistry;
use crate::surface::SurfaceHost;
use crate::{NavError, NavReport, NavStatus, NavigateOptions, NavigatePlan};

pub struct NavigationController<C, L, H>
where
    C: ContentStore,
    L: ScriptLoader,
    H: SurfaceHost,
{
    store: C,
    loader: L,
    surfaces: H,
    registry: Mutex<Registry>,
    styles: StyleRegistry,
    units: UnitRegistry,
    /// Serializes navigations. Held across every suspension point of one
    /// call so an overlapping call queues rather than races.
    gate: tokio::sync::Mutex<()>,
}

impl<C, L, H> NavigationController<C, L, H>
where
    C: ContentStore,
    L: ScriptLoader,
    H: SurfaceHost,
{
    pub fn new(store: C, loader: L, surfaces: H) -> Self {
        Self {
            store,
            loader,
            surfaces,
            registry: Mutex::new(Registry::new()),
            styles: StyleRegistry::new(),
            units: UnitRegistry::new(),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// The script-unit table fragments bind to via `data-unit`.
    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    /// Snapshot of the registry, oldest first.
    pub fn registry_ids(&self) -> Vec<String> {
        self.registry.lock().expect("registry poisoned").ids().to_vec()
    }

    /// Whether a style record is currently installed for `container_id`.
    pub fn has_style(&self, container_id: &str) -> bool {
        self.styles.contains(container_id)
    }

    /// The installed style block for `container_id`, if any.
    pub fn style_block(&self, container_id: &str) -> Option<String> {
        self.styles.get(container_id).map(|record| record.block)
    }

    // -----------------------------------------------------------------------
    // navigate-forward
    // -----------------------------------------------------------------------

    /// Load `plan.address` into `plan.container_id` and make it the active
    /// view. Suspends until the view is ready or the navigation aborted.
    pub async fn navigate_forward(
        &self,
        plan: NavigatePlan,
        opts: NavigateOptions,
    ) -> NavReport {
        let _turn = self.gate.lock().await;
        let mut report = NavReport::started(&plan);

        let skip = match self.admit(&plan.container_id, opts.force_reload) {
            Ok(skip) => skip,
            Err(e) => {
                tracing::warn!(container = %plan.container_id, error = %e, "admission failed");
                report.abort(e.to_string());
                return report;
            }
        };

        if skip {
            // No-op promotion path: the container keeps its content.
            tracing::debug!(container = %plan.container_id, "already loaded, promoted");
            report.status = NavStatus::Promoted;
            report.note(format!(
                "Container '{}' already loaded; promoted without fetch",
                plan.container_id
            ));
            dispatch::dispatch(&opts.hooks);
            return report;
        }

        if opts.force_reload {
            self.clear(&plan.container_id);
        }

        let content = match self.store.retrieve(&plan.address).await {
            Ok(content) => content,
            Err(e) => {
                // Abort silently: the container and its visibility are left
                // exactly as they were.
                tracing::warn!(address = %plan.address, error = %e, "fetch failed, navigation aborted");
                report.abort(e.to_string());
                return report;
            }
        };
        report.fetched = true;

        let Some(surface) = self.surfaces.surface(&plan.container_id) else {
            // The surface existed at admission; losing it mid-call still
            // only aborts this navigation.
            let e = NavError::ContainerNotFound(plan.container_id.clone());
            tracing::warn!(container = %plan.container_id, "surface vanished after admission");
            report.abort(e.to_string());
            return report;
        };

        surface.replace_content(&content);
        surface.set_visible(true);

        self.styles.apply(&plan.container_id, &opts.style_rules);

        let summary = reactivate::reactivate(&content, &self.units, &self.loader).await;
        report.units_run = summary.units_run;
        report.externals_loaded = summary.externals_loaded;
        if summary.units_failed > 0 || summary.externals_failed > 0 {
            report.note(format!(
                "Reactivation contained {} unit failure(s), {} external failure(s)",
                summary.units_failed, summary.externals_failed
            ));
        }

        if opts.settle_ms > 0 {
            tokio::time::sleep(Duration::from_millis(opts.settle_ms)).await;
        }

        dispatch::dispatch(&opts.hooks);

        report.status = NavStatus::Completed;
        report.note(format!(
            "View '{}' ready: {} unit(s) run, {} external(s) loaded",
            plan.container_id, summary.units_run, summary.externals_loaded
        ));
        report
    }

    // -----------------------------------------------------------------------
    // navigate-back
    // -----------------------------------------------------------------------

    /// Pop the current view and restore the previous one.
    ///
    /// Returns `false` when there is no history to return to.
    pub async fn navigate_back(&self) -> bool {
        let _turn = self.gate.lock().await;

        let (popped, restored) = {
            let mut registry = self.registry.lock().expect("registry poisoned");
            if registry.len() < 2 {
                tracing::warn!(entries = registry.len(), "no navigation history to return to");
                return false;
            }
            let Some(popped) = registry.pop() else {
                return false;
            };
            let Some(restored) = registry.active().map(str::to_string) else {
                return false;
            };
            (popped, restored)
        };

        if let Some(surface) = self.surfaces.surface(&popped) {
            surface.set_visible(false);
        }
        self.clear(&popped);

        match self.surfaces.surface(&restored) {
            Some(surface) => surface.set_visible(true),
            None => {
                tracing::warn!(container = %restored, "restored container has no surface")
            }
        }

        tracing::debug!(popped = %popped, restored = %restored, "navigated back");
        true
    }

    // -----------------------------------------------------------------------
    // internals
    // -----------------------------------------------------------------------

    /// Admission control: hide everything, then decide skip-vs-load.
    ///
    /// Walks the full registry hiding every container, which restores the
    /// single-active invariant even if prior state is inconsistent. A
    /// missing surface during the walk is logged and skipped (fail open
    /// toward a fresh load).
    fn admit(&self, container_id: &str, force_reload: bool) -> Result<bool, NavError> {
        let mut registry = self.registry.lock().expect("registry poisoned");

        for id in registry.ids() {
            match self.surfaces.surface(id) {
                Some(surface) => surface.set_visible(false),
                None => tracing::warn!(container = %id, "registered container has no surface"),
            }
        }

        let Some(target) = self.surfaces.surface(container_id) else {
            return Err(NavError::ContainerNotFound(container_id.to_string()));
        };

        if registry.activate(container_id) {
            target.set_visible(true);
            Ok(!force_reload)
        } else {
            Ok(false)
        }
    }

    /// Remove the container's style record and empty its content.
    ///
    /// Safe on an already-empty or unknown container — shared by forced
    /// reload and back-navigation.
    fn clear(&self, container_id: &str) {
        self.styles.remove(container_id);
        if let Some(surface) = self.surfaces.surface(container_id) {
            surface.clear_content();
        }
    }
}
