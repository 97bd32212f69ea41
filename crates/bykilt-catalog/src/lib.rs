//! # Bykilt Catalog
//!
//! Loads the YAML action catalog (`llms.txt`).
//!
//! ```yaml
//! actions:
//!   - name: search-docs
//!     type: browser-control
//!     flow:
//!       - action: navigate
//!         url: "${params.base_url}/search"
//! ```
//!
//! Only the presence of a `type` is checked here. Everything else is
//! validated by the dispatcher when the action runs.

mod catalog;
mod error;
mod parser;

pub use catalog::ActionCatalog;
pub use error::CatalogError;
pub use parser::parse_catalog;
