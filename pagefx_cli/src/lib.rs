//! Replay front end for [`pagefx_core`]: scenario files in, a rendered
//! transcript of everything the page did out.

pub mod report;
pub mod runner;
pub mod scenario;

pub use report::{print_human, to_json};
pub use runner::{run, RunOptions, RunReport, StateSummary};
pub use scenario::{sample, PageSpec, Scenario, ScriptEvent, Step};
