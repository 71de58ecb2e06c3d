//! Wizard session state machine
//!
//! One `WizardSession` per run of the program. It owns the table store and
//! the final table, and every transition goes through a guarded method here;
//! the UI layer never mutates the step directly. A failed merge changes
//! nothing, and "start over" is a full reset, not a partial rollback.

use super::join::{self, JoinSpec, MergeError};
use super::store::{StoreError, TableStore};
use super::table::NamedTable;

/// The three wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Upload,
    Relate,
    Visualize,
}

impl Step {
    pub fn number(&self) -> usize {
        match self {
            Step::Upload => 1,
            Step::Relate => 2,
            Step::Visualize => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Upload => "Upload Your Data",
            Step::Relate => "Build Relational Tables",
            Step::Visualize => "Visualizer Dashboard",
        }
    }
}

/// Session state threaded through every action handler
#[derive(Debug, Default)]
pub struct WizardSession {
    pub step: Step,
    pub store: TableStore,
    pub final_table: Option<NamedTable>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            step: Step::Upload,
            store: TableStore::new(),
            final_table: None,
        }
    }

    /// Populate the store with loaded sheets; no-op if already populated
    pub fn load_sheets(&mut self, sheets: Vec<NamedTable>) -> bool {
        self.store.load_from(sheets)
    }

    /// Upload -> Relate, only once at least one sheet is loaded
    pub fn advance_to_relate(&mut self) -> bool {
        if self.step == Step::Upload && !self.store.is_empty() {
            self.step = Step::Relate;
            true
        } else {
            false
        }
    }

    /// Relate -> Upload; the store stays loaded
    pub fn back_to_upload(&mut self) {
        if self.step == Step::Relate {
            self.step = Step::Upload;
        }
    }

    /// Legal right-sheet choices for a given left sheet
    ///
    /// The left sheet itself is excluded, which is what prevents a
    /// self-join in this workflow.
    pub fn right_sheet_choices(&self, left: &str) -> Vec<String> {
        self.store
            .names()
            .into_iter()
            .filter(|n| *n != left)
            .map(String::from)
            .collect()
    }

    /// Execute a merge and store its result as the final table
    ///
    /// On error the final table stays unset and the step stays `Relate`.
    /// Success does not advance the step; the user confirms with
    /// `advance_to_visualize` after seeing the preview.
    pub fn merge_sheets(&mut self, spec: &JoinSpec) -> Result<(), MergeError> {
        let left = self.store.get(&spec.left)?;
        let right = self.store.get(&spec.right)?;

        let merged = join::merge(left, right, &spec.left_key, &spec.right_key, spec.kind)?;
        self.final_table = Some(merged);
        Ok(())
    }

    /// Relate -> Visualize after a successful merge
    pub fn advance_to_visualize(&mut self) -> bool {
        if self.step == Step::Relate && self.final_table.is_some() {
            self.step = Step::Visualize;
            true
        } else {
            false
        }
    }

    /// Skip the merge: the selected left sheet becomes the final table
    /// verbatim, and the wizard advances straight to Visualize
    pub fn skip_merge(&mut self, left: &str) -> Result<(), StoreError> {
        if self.step != Step::Relate {
            return Ok(());
        }
        let table = self.store.get(left)?.clone();
        self.final_table = Some(table);
        self.step = Step::Visualize;
        Ok(())
    }

    /// Full session reset: empty store, no final table, back to Upload
    pub fn start_over(&mut self) {
        self.store.reset();
        self.final_table = None;
        self.step = Step::Upload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::join::JoinKind;
    use crate::model::value::Value;

    fn sheet(name: &str, key_col: &str, keys: &[f64]) -> NamedTable {
        NamedTable::new(
            name,
            vec![key_col.to_string()],
            keys.iter().map(|k| vec![Value::Number(*k)]).collect(),
        )
    }

    fn loaded_session() -> WizardSession {
        let mut session = WizardSession::new();
        session.load_sheets(vec![
            sheet("orders", "id", &[1.0, 2.0]),
            sheet("customers", "id", &[1.0, 3.0]),
        ]);
        session
    }

    #[test]
    fn test_cannot_advance_with_empty_store() {
        let mut session = WizardSession::new();
        assert!(!session.advance_to_relate());
        assert_eq!(session.step, Step::Upload);
    }

    #[test]
    fn test_advance_after_load() {
        let mut session = loaded_session();
        assert!(session.advance_to_relate());
        assert_eq!(session.step, Step::Relate);
    }

    #[test]
    fn test_right_choices_exclude_left() {
        let session = loaded_session();
        let choices = session.right_sheet_choices("orders");
        assert_eq!(choices, vec!["customers".to_string()]);
        assert!(!choices.contains(&"orders".to_string()));
    }

    #[test]
    fn test_merge_sets_final_table_without_advancing() {
        let mut session = loaded_session();
        session.advance_to_relate();

        let spec = JoinSpec {
            left: "orders".to_string(),
            right: "customers".to_string(),
            left_key: "id".to_string(),
            right_key: "id".to_string(),
            kind: JoinKind::Inner,
        };
        session.merge_sheets(&spec).unwrap();

        assert!(session.final_table.is_some());
        assert_eq!(session.step, Step::Relate);
        assert!(session.advance_to_visualize());
        assert_eq!(session.step, Step::Visualize);
    }

    #[test]
    fn test_merge_failure_leaves_state_untouched() {
        let mut session = loaded_session();
        session.advance_to_relate();

        let spec = JoinSpec {
            left: "orders".to_string(),
            right: "customers".to_string(),
            left_key: "missing".to_string(),
            right_key: "id".to_string(),
            kind: JoinKind::Inner,
        };
        assert!(session.merge_sheets(&spec).is_err());

        assert!(session.final_table.is_none());
        assert_eq!(session.step, Step::Relate);
        assert!(!session.advance_to_visualize());
    }

    #[test]
    fn test_skip_uses_left_sheet_verbatim() {
        let mut session = loaded_session();
        session.advance_to_relate();

        session.skip_merge("orders").unwrap();

        let final_table = session.final_table.as_ref().unwrap();
        assert_eq!(final_table, session.store.get("orders").unwrap());
        assert_eq!(session.step, Step::Visualize);
    }

    #[test]
    fn test_back_to_upload_keeps_store_and_reload_is_noop() {
        let mut session = loaded_session();
        session.advance_to_relate();
        session.back_to_upload();

        assert_eq!(session.step, Step::Upload);
        assert_eq!(session.store.len(), 2);
        assert!(!session.load_sheets(vec![sheet("extra", "id", &[9.0])]));
        assert_eq!(session.store.len(), 2);
    }

    #[test]
    fn test_start_over_resets_everything() {
        let mut session = loaded_session();
        session.advance_to_relate();
        session.skip_merge("orders").unwrap();

        session.start_over();

        assert_eq!(session.step, Step::Upload);
        assert!(session.store.is_empty());
        assert!(session.final_table.is_none());

        // A fresh load after reset is accepted
        assert!(session.load_sheets(vec![sheet("new", "id", &[1.0])]));
    }
}
