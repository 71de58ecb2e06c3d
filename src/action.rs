//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for time-based updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Close the current modal
    CloseModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Upload step
    // ─────────────────────────────────────────────────────────────────────────
    /// Load the workbook at the given path into the session
    SubmitUpload(String),
    /// Preview the previous sheet
    PrevSheetPreview,
    /// Preview the next sheet
    NextSheetPreview,
    /// Advance to the Relate step (requires a loaded store)
    AdvanceToRelate,

    // ─────────────────────────────────────────────────────────────────────────
    // Relate step
    // ─────────────────────────────────────────────────────────────────────────
    /// Focus the next selector field
    FocusNextField,
    /// Focus the previous selector field
    FocusPrevField,
    /// Cycle the focused selector forward
    SelectionNext,
    /// Cycle the focused selector backward
    SelectionPrev,
    /// Execute the configured merge
    ExecuteMerge,
    /// Skip the merge and use the selected left sheet verbatim
    SkipMerge,
    /// Go back to the Upload step (store stays loaded)
    BackToUpload,
    /// Advance to Visualize after a successful merge
    AdvanceToVisualize,

    // ─────────────────────────────────────────────────────────────────────────
    // Visualize step
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll the table up one row
    ScrollUp,
    /// Scroll the table down one row
    ScrollDown,
    /// Scroll the table up one page
    PageUp,
    /// Scroll the table down one page
    PageDown,
    /// Shift the visible columns left
    ScrollLeft,
    /// Shift the visible columns right
    ScrollRight,
    /// Export the final table to CSV
    ExportCsv,
    /// Open the start-over confirmation dialog
    OpenStartOverDialog,
    /// Reset the whole session and return to Upload
    StartOver,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::SubmitUpload(path) => write!(f, "SubmitUpload({})", path),
            Action::PrevSheetPreview => write!(f, "PrevSheetPreview"),
            Action::NextSheetPreview => write!(f, "NextSheetPreview"),
            Action::AdvanceToRelate => write!(f, "AdvanceToRelate"),
            Action::FocusNextField => write!(f, "FocusNextField"),
            Action::FocusPrevField => write!(f, "FocusPrevField"),
            Action::SelectionNext => write!(f, "SelectionNext"),
            Action::SelectionPrev => write!(f, "SelectionPrev"),
            Action::ExecuteMerge => write!(f, "ExecuteMerge"),
            Action::SkipMerge => write!(f, "SkipMerge"),
            Action::BackToUpload => write!(f, "BackToUpload"),
            Action::AdvanceToVisualize => write!(f, "AdvanceToVisualize"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::ScrollLeft => write!(f, "ScrollLeft"),
            Action::ScrollRight => write!(f, "ScrollRight"),
            Action::ExportCsv => write!(f, "ExportCsv"),
            Action::OpenStartOverDialog => write!(f, "OpenStartOverDialog"),
            Action::StartOver => write!(f, "StartOver"),
        }
    }
}
