//! Normalization of design source trees into the Canopy IR.
//!
//! Given a source node tree, this crate:
//! 1. Classifies each node into an IR kind and element name
//! 2. Normalizes auto-layout into a flexbox box model
//! 3. Normalizes fills, strokes, effects and typography
//! 4. Extracts component props from variants and property definitions
//! 5. Detects repeated sibling structures

pub mod builder;
pub mod classify;
pub mod layout;
pub mod naming;
pub mod patterns;
pub mod style;
pub mod variants;

pub use builder::{build_ir, build_registry, IrBuilder};
pub use classify::{Classification, NodeClassifier};
pub use layout::normalize_layout;
pub use naming::{component_ident, to_identifier};
pub use patterns::{apply_patterns, detect_repetition, same_structure};
pub use style::normalize_style;
pub use variants::{extract_props, extract_variant_props};
