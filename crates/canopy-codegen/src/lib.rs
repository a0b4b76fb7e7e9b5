//! React/TSX generation from Canopy designs.
//!
//! This crate drives a whole conversion run: it builds the IR of every
//! target component, styles it through the selected backend, renders the
//! JSX and assembles the component, types, stylesheet and barrel files.
//!
//! # Features
//!
//! - `parallel` - Convert independent components on the `rayon` thread pool
//!
//! # Example
//!
//! ```ignore
//! use canopy_codegen::{ConvertOptions, Converter};
//!
//! let converter = Converter::new(ConvertOptions::from_json_str(options_json)?)?;
//! let output = converter.convert_json(document_json)?;
//! for file in &output.files {
//!     println!("{}", file.path);
//! }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod files;
pub mod markup;
pub mod templates;

pub use config::ConvertOptions;
pub use convert::{convert, ConversionOutput, Converter};
pub use error::{CodegenError, Result};
pub use files::FileAssembler;
pub use markup::{Markup, MarkupBuilder};
pub use templates::TemplateEngine;

pub use canopy_style::Backend;
