//! Model layer - session state and the relational core
//!
//! - `WizardSession` - per-session state machine (step, store, final table)
//! - `TableStore` - load-once collection of the workbook's sheets
//! - `join` - the relational merge engine
//! - `Value` - loosely-typed cell values with join-key coercion rules

pub mod join;
pub mod session;
pub mod store;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use join::{JoinKind, JoinSpec, MergeError};
pub use session::{Step, WizardSession};
pub use store::{StoreError, TableStore};
pub use table::NamedTable;
pub use value::{Value, ValueKind};
