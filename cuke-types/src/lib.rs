//! Payload values for cuke events
//!
//! Immutable value objects that travel inside events as attribute values:
//!
//! - [`Step`] - a Gherkin step with its keyword, text, location and
//!   optional multiline argument
//! - [`DataTable`] - a rectangular grid of string cells
//! - [`DocString`] - a block of text tagged with a content type
//!
//! All of them compare structurally and serialize with `serde`.
//!
//! ```rust
//! use cuke_types::{DataTable, DocString, Location, MultilineArgument, Step};
//!
//! let table = DataTable::new(vec![
//!     vec!["name".to_string(), "age".to_string()],
//!     vec!["alice".to_string(), "30".to_string()],
//! ]).unwrap();
//!
//! let step = Step::new("en", Location::new("features/users.feature", 4), "Given ", "these users:")
//!     .with_multiline_arg(MultilineArgument::DataTable(table));
//!
//! assert_eq!(step.text(), "Given these users:");
//! assert!(step.multiline_arg().is_data_table());
//! assert_eq!(DocString::new("hi", "text/plain"), "hi");
//! ```

pub mod data_table;
pub mod doc_string;
pub mod error;
pub mod step;

pub use data_table::DataTable;
pub use doc_string::DocString;
pub use error::{Result, TableError};
pub use step::{Location, MultilineArgument, Step};
