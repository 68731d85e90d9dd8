//! Fragment content retrieval.
//!
//! A content store resolves an opaque address into raw fragment content
//! (markup plus embedded script references). Retrieval must be no-cache:
//! repeated navigation to the same address re-reads the source, never a
//! transport-level copy.
//!
//! The controller converts a retrieval failure into a logged abort; the
//! error never reaches the controller's caller.

use std::future::Future;
use std::path::PathBuf;

use crate::reactivate::ScriptLoader;
use crate::NavError;

/// Resolves fragment content for an opaque address.
pub trait ContentStore: Send + Sync {
    fn retrieve(&self, address: &str) -> impl Future<Output = Result<String, NavError>> + Send;
}

// ---------------------------------------------------------------------------
// Filesystem store
// ---------------------------------------------------------------------------

/// Serves fragments from files under a root directory.
///
/// Every `retrieve` call reads the file afresh, which gives the required
/// no-cache semantics for free.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl ContentStore for FsStore {
    fn retrieve(&self, address: &str) -> impl Future<Output = Result<String, NavError>> + Send {
        let path = self.root.join(address);
        let address = address.to_string();

        async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| NavError::Fetch {
                    address,
                    reason: e.to_string(),
                })
        }
    }
}

/// An external script "loads" if its file under the root is readable.
/// The content itself is not executed; units carry the behavior.
impl ScriptLoader for FsStore {
    fn load(&self, src: &str) -> impl Future<Output = Result<(), NavError>> + Send {
        let path = self.root.join(src);
        let src = src.to_string();

        async move {
            tokio::fs::metadata(&path)
                .await
                .map(|_| ())
                .map_err(|e| NavError::ExternalLoad {
                    src,
                    reason: e.to_string(),
                })
        }
    }
}
