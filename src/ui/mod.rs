//! User interface module - terminal output.
//!
//! The tool is non-interactive: runs are meant for CI, so there are no prompts.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_derivation, display_error, display_manual_push_instruction,
    display_proposed_tag, display_status, display_success, format_applied_bump,
};
