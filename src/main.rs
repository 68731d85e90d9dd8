//! Driver binary: executes a JSON navigation script against the engine.
//!
//! Reads the script on stdin, runs the steps against a filesystem content
//! store and an in-memory surface set, and prints the step outcomes as JSON.
//!
//! Example input:
//! ```json
//! {
//!   "root": "fragments",
//!   "containers": ["home", "cart"],
//!   "steps": [
//!     { "op": "forward", "address": "home.frag", "container": "home" },
//!     { "op": "forward", "address": "cart.frag", "container": "cart" },
//!     { "op": "back" }
//!   ]
//! }
//! ```

use std::io::{self, Read};
use std::process;

use serde::{Deserialize, Serialize};

use viewstack::content::FsStore;
use viewstack::surface::MemorySurfaces;
use viewstack::{NavReport, NavigateOptions, NavigatePlan, NavigationController};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NavScript {
    /// Directory fragments and external scripts are served from.
    root: String,
    /// Container ids to register before the first step.
    containers: Vec<String>,
    steps: Vec<NavStep>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
enum NavStep {
    Forward {
        address: String,
        container: String,
        #[serde(default)]
        force_reload: bool,
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    Back,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StepOutcome {
    Forward(NavReport),
    Back { op: &'static str, ok: bool },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Failed to read stdin: {}", e);
        process::exit(1);
    }

    let script: NavScript = match serde_json::from_str(&input) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Invalid navigation script: {}", e);
            process::exit(1);
        }
    };

    let surfaces = MemorySurfaces::new();
    for id in &script.containers {
        surfaces.register(id);
    }

    // FsStore doubles as the external-script loader.
    let store = FsStore::new(&script.root);
    let controller = NavigationController::new(store.clone(), store, surfaces);

    let mut outcomes = Vec::with_capacity(script.steps.len());
    for step in script.steps {
        match step {
            NavStep::Forward {
                address,
                container,
                force_reload,
                settle_ms,
            } => {
                let mut opts = NavigateOptions {
                    force_reload,
                    ..Default::default()
                };
                if let Some(ms) = settle_ms {
                    opts.settle_ms = ms;
                }
                let report = controller
                    .navigate_forward(
                        NavigatePlan {
                            address,
                            container_id: container,
                        },
                        opts,
                    )
                    .await;
                outcomes.push(StepOutcome::Forward(report));
            }
            NavStep::Back => {
                let ok = controller.navigate_back().await;
                outcomes.push(StepOutcome::Back { op: "back", ok });
            }
        }
    }

    match serde_json::to_string_pretty(&outcomes) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize outcomes: {}", e);
            process::exit(1);
        }
    }
}
