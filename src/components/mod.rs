//! UI Components
//!
//! Each component encapsulates its own view state and rendering logic.
//! Components communicate through Actions rather than direct state mutation;
//! every view is redrawn from the current session state on each frame.

pub mod layout;
pub mod quit_dialog;
pub mod relate;
pub mod table;
pub mod upload;
pub mod visualize;

pub use layout::{centered_popup, draw_header, draw_help_bar, view_layout};
pub use quit_dialog::{QuitDialog, StartOverDialog};
pub use relate::{RelateComponent, RelateField};
pub use table::build_table_lines;
pub use upload::UploadComponent;
pub use visualize::VisualizeComponent;

use crate::model::WizardSession;

/// Read-only context handed to every view's draw call
pub struct ViewContext<'a> {
    pub session: &'a WizardSession,
    pub error: Option<&'a str>,
    pub status: Option<&'a str>,
}
