//! External collaborators
//!
//! - Workbook reading (calamine behind `reader`)
//! - CSV export of the final table
//! - The visualization config blob

pub mod export;
pub mod reader;
pub mod viz;

pub use export::{export_csv, EXPORT_PATH};
pub use reader::{load_workbook, LoadError};
pub use viz::{VizConfig, VIZ_CONFIG_PATH};
