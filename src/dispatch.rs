//! Completion hooks, dispatched once a view has finished loading.
//!
//! Hooks are explicit closures handed to the navigation call — there is no
//! name lookup against a global table. They run in the given order; a
//! failing hook is logged and later hooks still run.

use std::sync::Arc;

/// A completion hook invoked after a navigation finishes (or promotes).
pub type NavHook = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Invoke every hook in order. Returns the number of hooks that failed.
pub fn dispatch(hooks: &[NavHook]) -> usize {
    let mut failed = 0;
    for (index, hook) in hooks.iter().enumerate() {
        if let Err(e) = (hook.as_ref())() {
            failed += 1;
            tracing::error!(hook = index, error = %e, "completion hook failed");
        }
    }
    failed
}
