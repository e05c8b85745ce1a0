//! # UI Components
//!
//! Reusable Dioxus components for the Corpografo console.
//!
//! ```text
//! App
//! ├── Header / Drawer (chrome)
//! ├── page (pages module)
//! │   ├── DataTable, FilterBox, Pager
//! │   └── TextInput, TextArea, Select, Button
//! ├── Toasts
//! └── Dialogs
//!     ├── LinkDialog
//!     └── NgramDialog
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod chrome;
pub mod dialogs;
pub mod inputs;
pub mod table;
pub mod toasts;

// ============================================================================
// Re-exports
// ============================================================================

pub use chrome::{Drawer, Header};
pub use dialogs::{LinkDialog, NgramDialog};
pub use inputs::{Button, Select, SelectChoice, TextArea, TextInput};
pub use table::{DataTable, FilterBox, Pager, TableRow};
pub use toasts::Toasts;
