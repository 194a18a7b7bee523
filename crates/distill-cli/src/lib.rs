//! CLI interface for distill

mod render;
mod session;
mod ui;

pub use render::{print_answer, print_report, print_retrieved};
pub use session::{SessionOptions, run_session};
pub use ui::{display_banner, handle_input_with_history, print_help};

// Re-export core types
pub use distill_core::{Error, Result};
