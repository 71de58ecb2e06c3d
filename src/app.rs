//! Root application component
//!
//! The App struct implements the Component trait, acting as the root that
//! routes key events to the current wizard step and processes Actions.
//! All wizard semantics live in the model layer; App wires user input to
//! session transitions and holds the per-view components.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    QuitDialog, RelateComponent, StartOverDialog, UploadComponent, ViewContext,
    VisualizeComponent,
};
use crate::config::Config;
use crate::model::{Step, WizardSession};
use crate::services::{self, VizConfig, EXPORT_PATH, VIZ_CONFIG_PATH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::path::Path;

/// Modal overlay currently displayed, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    QuitConfirm,
    StartOverConfirm,
}

/// Main application state - coordinates between components
pub struct App {
    /// The wizard session: step, table store, final table
    pub session: WizardSession,

    /// Active modal overlay
    pub modal: Option<Modal>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Persisted app config (last workbook path)
    pub config: Config,

    /// Visualization config blob, loaded when entering Visualize
    pub viz_config: Option<VizConfig>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub upload: UploadComponent,
    pub relate: RelateComponent,
    pub visualize: VisualizeComponent,
    pub quit_dialog: QuitDialog,
    pub start_over_dialog: StartOverDialog,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new App instance
    pub fn new() -> App {
        let config = Config::load().unwrap_or_default();

        let mut upload = UploadComponent::new();
        upload.input = config.last_workbook.clone();

        App {
            session: WizardSession::new(),
            modal: None,
            should_quit: false,
            error: None,
            status_message: None,
            config,
            viz_config: None,
            upload,
            relate: RelateComponent::new(),
            visualize: VisualizeComponent::new(),
            quit_dialog: QuitDialog,
            start_over_dialog: StartOverDialog,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Per-step key handling
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_upload_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.session.store.is_empty() {
            // Path prompt mode
            let action = match key.code {
                KeyCode::Enter => Some(Action::SubmitUpload(self.upload.input.clone())),
                KeyCode::Esc => Some(Action::OpenQuitDialog),
                KeyCode::Backspace => {
                    self.upload.input.pop();
                    self.error = None;
                    None
                }
                KeyCode::Char(c) => {
                    self.upload.input.push(c);
                    self.error = None;
                    None
                }
                _ => None,
            };
            Ok(action)
        } else {
            // Preview mode
            let action = match key.code {
                KeyCode::Enter | KeyCode::Char('n') => Some(Action::AdvanceToRelate),
                KeyCode::Tab | KeyCode::Right => Some(Action::NextSheetPreview),
                KeyCode::BackTab | KeyCode::Left => Some(Action::PrevSheetPreview),
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::OpenQuitDialog),
                _ => None,
            };
            Ok(action)
        }
    }

    fn handle_relate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab => Some(Action::FocusNextField),
            KeyCode::BackTab => Some(Action::FocusPrevField),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionPrev),
            KeyCode::Char('m') => Some(Action::ExecuteMerge),
            KeyCode::Char('s') => Some(Action::SkipMerge),
            KeyCode::Enter => {
                if self.session.final_table.is_some() {
                    Some(Action::AdvanceToVisualize)
                } else {
                    Some(Action::ExecuteMerge)
                }
            }
            KeyCode::Esc => Some(Action::BackToUpload),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn handle_visualize_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::Char('h') | KeyCode::Left => Some(Action::ScrollLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::ScrollRight),
            KeyCode::Char('e') => Some(Action::ExportCsv),
            KeyCode::Char('s') => Some(Action::OpenStartOverDialog),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Step effects
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the workbook at `raw` into the session's table store
    ///
    /// Load failures leave the session untouched; the user corrects the path
    /// and retries. A load while sheets are already held is a no-op so the
    /// in-progress join configuration survives a back-navigation.
    fn load_workbook(&mut self, raw: &str) {
        let path = raw.trim().to_string();
        if path.is_empty() {
            self.error = Some("Enter a file path".to_string());
            return;
        }

        match services::load_workbook(Path::new(&path)) {
            Ok(tables) => {
                let count = tables.len();
                if self.session.load_sheets(tables) {
                    self.error = None;
                    self.status_message = Some(format!(
                        "Successfully loaded {} sheet{}!",
                        count,
                        if count == 1 { "" } else { "s" }
                    ));
                    self.upload.selected_sheet = 0;
                    self.config.last_workbook = path;
                    let _ = self.config.save();
                } else {
                    self.status_message = Some(
                        "Sheets already loaded for this session; start over to load a new file"
                            .to_string(),
                    );
                }
            }
            Err(e) => {
                self.status_message = None;
                self.error = Some(format!("Error loading file: {}", e));
            }
        }
    }

    fn execute_merge(&mut self) {
        match self.relate.join_spec(&self.session) {
            Some(spec) => match self.session.merge_sheets(&spec) {
                Ok(()) => {
                    self.error = None;
                    if let Some(table) = &self.session.final_table {
                        self.status_message = Some(format!(
                            "Tables merged successfully! {} rows × {} columns",
                            table.row_count(),
                            table.column_count()
                        ));
                    }
                }
                Err(e) => {
                    self.status_message = None;
                    self.error = Some(format!("Merge failed: {}", e));
                }
            },
            None => {
                self.error = Some(
                    "At least two sheets are needed for a merge; press 's' to use the base sheet"
                        .to_string(),
                );
            }
        }
    }

    fn skip_merge(&mut self) {
        // Skip is only offered before a successful merge (original behavior)
        if self.session.final_table.is_some() {
            return;
        }
        let left = match self.relate.left_name(&self.session) {
            Some(name) => name,
            None => return,
        };
        match self.session.skip_merge(&left) {
            Ok(()) => self.enter_visualize(),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Entering Visualize loads the opaque viz config blob
    fn enter_visualize(&mut self) {
        self.error = None;
        self.status_message = None;
        self.visualize.reset();

        match VizConfig::load(VIZ_CONFIG_PATH) {
            Ok(config) => self.viz_config = Some(config),
            Err(e) => {
                self.viz_config = Some(VizConfig::empty(VIZ_CONFIG_PATH));
                self.status_message = Some(format!("Visualization config ignored: {}", e));
            }
        }
    }

    /// Write the viz config blob back to disk (read-write contract)
    fn save_viz_config(&mut self) {
        if let Some(config) = &self.viz_config {
            if let Err(e) = config.save() {
                self.error = Some(e.to_string());
            }
        }
    }

    fn export_final_table(&mut self) {
        if let Some(table) = &self.session.final_table {
            match services::export_csv(table, Path::new(EXPORT_PATH)) {
                Ok(()) => {
                    self.error = None;
                    self.status_message =
                        Some(format!("Exported {} rows to {}", table.row_count(), EXPORT_PATH));
                }
                Err(e) => {
                    self.status_message = None;
                    self.error = Some(format!("Export failed: {}", e));
                }
            }
        }
    }

    fn start_over(&mut self) {
        self.save_viz_config();
        self.viz_config = None;
        self.session.start_over();
        self.relate.reset();
        self.visualize.reset();
        self.upload.selected_sheet = 0;
        self.upload.input = self.config.last_workbook.clone();
        self.error = None;
        self.status_message = None;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modal {
            return match modal {
                Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
                Modal::StartOverConfirm => self.start_over_dialog.handle_key_event(key),
            };
        }

        match self.session.step {
            Step::Upload => self.handle_upload_key(key),
            Step::Relate => self.handle_relate_key(key),
            Step::Visualize => self.handle_visualize_key(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {}
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.save_viz_config();
                self.should_quit = true;
            }
            Action::OpenQuitDialog => {
                self.modal = Some(Modal::QuitConfirm);
            }
            Action::CloseModal => {
                self.modal = None;
            }

            // ─────────────────────────────────────────────────────────────────
            // Upload
            // ─────────────────────────────────────────────────────────────────
            Action::SubmitUpload(path) => {
                self.load_workbook(&path);
            }
            Action::NextSheetPreview => {
                self.upload.select_next_sheet(self.session.store.len());
            }
            Action::PrevSheetPreview => {
                self.upload.select_prev_sheet(self.session.store.len());
            }
            Action::AdvanceToRelate => {
                if self.session.advance_to_relate() {
                    self.relate.clamp(&self.session);
                    self.error = None;
                    self.status_message = None;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Relate
            // ─────────────────────────────────────────────────────────────────
            Action::FocusNextField => self.relate.focus_next(),
            Action::FocusPrevField => self.relate.focus_prev(),
            Action::SelectionNext => self.relate.selection_next(&self.session),
            Action::SelectionPrev => self.relate.selection_prev(&self.session),
            Action::ExecuteMerge => self.execute_merge(),
            Action::SkipMerge => self.skip_merge(),
            Action::BackToUpload => {
                self.session.back_to_upload();
                self.error = None;
                self.status_message = None;
            }
            Action::AdvanceToVisualize => {
                if self.session.advance_to_visualize() {
                    self.enter_visualize();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Visualize
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp => self.visualize.scroll_up(),
            Action::ScrollDown => self.visualize.scroll_down(),
            Action::PageUp => self.visualize.page_up(),
            Action::PageDown => self.visualize.page_down(),
            Action::ScrollLeft => self.visualize.scroll_left(),
            Action::ScrollRight => self.visualize.scroll_right(),
            Action::ExportCsv => self.export_final_table(),
            Action::OpenStartOverDialog => {
                self.modal = Some(Modal::StartOverConfirm);
            }
            Action::StartOver => {
                self.modal = None;
                self.start_over();
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = ViewContext {
            session: &self.session,
            error: self.error.as_deref(),
            status: self.status_message.as_deref(),
        };

        match self.session.step {
            Step::Upload => self.upload.draw_view(frame, area, &ctx)?,
            Step::Relate => self.relate.draw_view(frame, area, &ctx)?,
            Step::Visualize => self.visualize.draw_view(frame, area, &ctx)?,
        }

        if let Some(modal) = self.modal {
            match modal {
                Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
                Modal::StartOverConfirm => self.start_over_dialog.draw(frame, area)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NamedTable, Value};

    fn app_with_sheets(names: &[&str]) -> App {
        let mut app = App::new();
        app.session.load_sheets(
            names
                .iter()
                .map(|n| {
                    NamedTable::new(
                        *n,
                        vec!["id".to_string()],
                        vec![vec![Value::Number(1.0)]],
                    )
                })
                .collect(),
        );
        app
    }

    #[test]
    fn test_merge_then_advance() {
        let mut app = app_with_sheets(&["a", "b"]);
        app.update(Action::AdvanceToRelate).unwrap();
        assert_eq!(app.session.step, Step::Relate);

        app.update(Action::ExecuteMerge).unwrap();
        assert!(app.session.final_table.is_some());
        assert!(app.error.is_none());
        assert_eq!(app.session.step, Step::Relate);

        app.update(Action::AdvanceToVisualize).unwrap();
        assert_eq!(app.session.step, Step::Visualize);
    }

    #[test]
    fn test_merge_with_single_sheet_reports_error() {
        let mut app = app_with_sheets(&["only"]);
        app.update(Action::AdvanceToRelate).unwrap();

        app.update(Action::ExecuteMerge).unwrap();
        assert!(app.error.is_some());
        assert!(app.session.final_table.is_none());
        assert_eq!(app.session.step, Step::Relate);
    }

    #[test]
    fn test_skip_path_advances_with_base_sheet() {
        let mut app = app_with_sheets(&["only"]);
        app.update(Action::AdvanceToRelate).unwrap();

        app.update(Action::SkipMerge).unwrap();
        assert_eq!(app.session.step, Step::Visualize);
        assert_eq!(
            app.session.final_table.as_ref().map(|t| t.name.as_str()),
            Some("only")
        );
    }

    #[test]
    fn test_skip_ignored_after_successful_merge() {
        let mut app = app_with_sheets(&["a", "b"]);
        app.update(Action::AdvanceToRelate).unwrap();
        app.update(Action::ExecuteMerge).unwrap();
        let merged_name = app.session.final_table.as_ref().unwrap().name.clone();

        app.update(Action::SkipMerge).unwrap();
        assert_eq!(app.session.step, Step::Relate);
        assert_eq!(app.session.final_table.as_ref().unwrap().name, merged_name);
    }

    #[test]
    fn test_start_over_resets_session_and_views() {
        let mut app = app_with_sheets(&["a", "b"]);
        app.update(Action::AdvanceToRelate).unwrap();
        app.update(Action::ExecuteMerge).unwrap();
        app.update(Action::AdvanceToVisualize).unwrap();

        app.update(Action::OpenStartOverDialog).unwrap();
        assert_eq!(app.modal, Some(Modal::StartOverConfirm));

        app.update(Action::StartOver).unwrap();
        assert_eq!(app.modal, None);
        assert_eq!(app.session.step, Step::Upload);
        assert!(app.session.store.is_empty());
        assert!(app.session.final_table.is_none());
    }

    #[test]
    fn test_modal_cancel_keeps_state() {
        let mut app = app_with_sheets(&["a", "b"]);
        app.update(Action::OpenQuitDialog).unwrap();
        app.update(Action::CloseModal).unwrap();
        assert_eq!(app.modal, None);
        assert!(!app.should_quit);
    }
}
