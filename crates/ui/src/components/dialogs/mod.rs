//! # Dialog Components
//!
//! Modal dialogs drawn by the overlay in `app.rs`:
//! - **LinkDialog**: relation link picker
//! - **NgramDialog**: n-gram analysis settings

pub mod link_dialog;
pub mod ngram_dialog;

pub use link_dialog::LinkDialog;
pub use ngram_dialog::NgramDialog;
