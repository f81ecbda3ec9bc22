pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod flavour;
pub mod frontmatter;
pub mod fs;
pub mod note;
pub mod stage;

pub use cli::Cli;
pub use config::{Config, FieldType, FrontmatterRule};
pub use error::{ExportError, Result};
pub use exporter::{ExportReport, Exporter};
pub use flavour::DialectRewriter;
pub use note::{Note, NoteBatch, SourceInfo};
pub use stage::{Pipeline, Stage};
