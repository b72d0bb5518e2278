//! Convert QFX/OFX investment statement exports into flat CSV, one row
//! per bank-type transaction.
//!
//! ```rust,ignore
//! use qfx2csv::{Config, batch};
//!
//! let summary = batch::run(&Config::default())?;
//! println!("{} converted, {} failed", summary.converted, summary.failed);
//! ```

mod config;
mod tree;

pub mod batch;
pub mod errors;
pub mod logging;
pub mod statement;
pub mod writer;

pub use batch::{BatchSummary, convert_file, run};
pub use config::Config;
pub use errors::{ConvertError, ConvertResult};
pub use tree::{Node, extract_xml, parse_document};
