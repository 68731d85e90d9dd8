//! Script reactivation — re-running the executable pieces of a fragment
//! after its markup lands in a container.
//!
//! Injected markup does not run its own scripts, so the engine scans the
//! fresh content for `<script>` tags in document order and drives each one:
//!
//! - An inline script names a **registered unit** via `data-unit="name"`.
//!   Units are closures captured at registration time, each invoked in its
//!   own scope — nothing shares a global namespace, so repeated loads cannot
//!   collide on top-level declarations.
//! - A script with `src="..."` is an **external script**: its load-or-error
//!   signal is awaited before the next fragment in the sequence runs.
//!
//! A failing unit or a failed load is logged and counted, never propagated:
//! the remaining sequence always gets its turn. The guarantee is
//! at-least-attempted ordering, not all-or-nothing.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use regex::Regex;

use crate::NavError;

/// Loads an externally-sourced script and resolves when it has either
/// loaded or failed.
pub trait ScriptLoader: Send + Sync {
    fn load(&self, src: &str) -> impl Future<Output = Result<(), NavError>> + Send;
}

/// A loader that treats every external script as instantly loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoader;

impl ScriptLoader for NoopLoader {
    fn load(&self, _src: &str) -> impl Future<Output = Result<(), NavError>> + Send {
        async { Ok(()) }
    }
}

// ---------------------------------------------------------------------------
// Script scanning
// ---------------------------------------------------------------------------

/// One embedded executable fragment, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRef {
    /// Inline script bound to a registered unit.
    Unit(String),
    /// Externally-sourced script.
    External(String),
    /// Inline script with no `data-unit` binding — skipped with a log.
    Unbound,
}

/// Enumerate every `<script>` tag in `markup`, in document order.
pub fn scan_scripts(markup: &str) -> Vec<ScriptRef> {
    // Matches: <script ...attrs...> body </script>, body may span lines
    let tag = Regex::new(r"(?s)<script\b([^>]*)>(.*?)</script>").unwrap();
    // Token boundary so `data-src=` never reads as `src=`
    let src_attr = Regex::new(r#"(?:^|\s)src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
    let unit_attr = Regex::new(r#"data-unit\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();

    let attr_value = |caps: &regex::Captures| -> Option<String> {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    };

    tag.captures_iter(markup)
        .map(|cap| {
            let attrs = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            if let Some(src) = src_attr.captures(attrs).and_then(|c| attr_value(&c)) {
                ScriptRef::External(src)
            } else if let Some(name) = unit_attr.captures(attrs).and_then(|c| attr_value(&c)) {
                ScriptRef::Unit(name)
            } else {
                ScriptRef::Unbound
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit registry
// ---------------------------------------------------------------------------

/// An independently invocable script unit.
pub type UnitFn = dyn Fn() -> anyhow::Result<()> + Send + Sync;

/// Thread-safe table of registered script units keyed by name.
#[derive(Default)]
pub struct UnitRegistry {
    units: DashMap<String, Arc<UnitFn>>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under `name`, replacing any previous registration.
    pub fn register<F>(&self, name: &str, unit: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.units.insert(name.to_string(), Arc::new(unit));
    }

    pub fn get(&self, name: &str) -> Option<Arc<UnitFn>> {
        self.units.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("units", &self.units.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Reactivation
// ---------------------------------------------------------------------------

/// Counts collected while a fragment sequence runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactivationSummary {
    pub units_run: usize,
    pub units_failed: usize,
    /// `data-unit` names with no registered unit — skipped silently.
    pub units_missing: usize,
    /// Inline scripts carrying no `data-unit` binding.
    pub unbound: usize,
    pub externals_loaded: usize,
    pub externals_failed: usize,
}

/// Run every embedded fragment in `markup`, strictly in document order.
///
/// External scripts are real suspension points: the next fragment does not
/// start until the previous load has resolved, successfully or not.
pub async fn reactivate<L: ScriptLoader>(
    markup: &str,
    units: &UnitRegistry,
    loader: &L,
) -> ReactivationSummary {
    let mut summary = ReactivationSummary::default();

    for script in scan_scripts(markup) {
        match script {
            ScriptRef::Unit(name) => match units.get(&name) {
                Some(unit) => match (unit.as_ref())() {
                    Ok(()) => summary.units_run += 1,
                    Err(e) => {
                        summary.units_failed += 1;
                        tracing::error!(unit = %name, error = %e, "script unit failed");
                    }
                },
                None => {
                    summary.units_missing += 1;
                    tracing::debug!(unit = %name, "no registered unit, skipping");
                }
            },
            ScriptRef::External(src) => match loader.load(&src).await {
                Ok(()) => summary.externals_loaded += 1,
                Err(e) => {
                    summary.externals_failed += 1;
                    tracing::warn!(src = %src, error = %e, "external script failed to load");
                }
            },
            ScriptRef::Unbound => {
                summary.unbound += 1;
                tracing::warn!("inline script without data-unit binding, skipping");
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scan_finds_scripts_in_document_order() {
        let markup = r#"
            <div id="cart"></div>
            <script data-unit="init-cart"></script>
            <script src="vendor/slider.js"></script>
            <script data-unit="bind-totals">ignored body</script>
        "#;
        assert_eq!(
            scan_scripts(markup),
            vec![
                ScriptRef::Unit("init-cart".to_string()),
                ScriptRef::External("vendor/slider.js".to_string()),
                ScriptRef::Unit("bind-totals".to_string()),
            ]
        );
    }

    #[test]
    fn scan_handles_single_quotes_and_multiline_bodies() {
        let markup = "<script data-unit='a'>\nlet x = 1;\nlet y = 2;\n</script>";
        assert_eq!(scan_scripts(markup), vec![ScriptRef::Unit("a".to_string())]);
    }

    #[test]
    fn scan_marks_unbound_inline_scripts() {
        let markup = "<script>console.log(1)</script>";
        assert_eq!(scan_scripts(markup), vec![ScriptRef::Unbound]);
    }

    #[test]
    fn scan_ignores_markup_without_scripts() {
        assert!(scan_scripts("<div><p>static</p></div>").is_empty());
    }

    #[test]
    fn src_wins_over_data_unit() {
        let markup = r#"<script src="x.js" data-unit="x"></script>"#;
        assert_eq!(
            scan_scripts(markup),
            vec![ScriptRef::External("x.js".to_string())]
        );
    }

    #[test]
    fn register_replaces_previous_unit() {
        let units = UnitRegistry::new();
        units.register("a", || Ok(()));
        units.register("a", || anyhow::bail!("second"));
        assert_eq!(units.len(), 1);
        let unit = units.get("a").unwrap();
        assert!((unit.as_ref())().is_err());
    }

    #[tokio::test]
    async fn failing_unit_does_not_stop_later_units() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let units = UnitRegistry::new();
        let ran = Arc::new(AtomicUsize::new(0));

        units.register("boom", || anyhow::bail!("kaput"));
        let ran_clone = Arc::clone(&ran);
        units.register("after", move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let markup = r#"
            <script data-unit="boom"></script>
            <script data-unit="after"></script>
        "#;
        let summary = reactivate(markup, &units, &NoopLoader).await;

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(summary.units_run, 1);
        assert_eq!(summary.units_failed, 1);
    }

    #[tokio::test]
    async fn missing_unit_is_skipped_not_failed() {
        let units = UnitRegistry::new();
        let markup = r#"<script data-unit="ghost"></script>"#;
        let summary = reactivate(markup, &units, &NoopLoader).await;
        assert_eq!(summary.units_missing, 1);
        assert_eq!(summary.units_failed, 0);
    }
}
