//! Identifier derivation from free-form layer names.

use convert_case::{Case, Casing};

/// Convert a layer name into an identifier in the given case.
///
/// Every non-alphanumeric character acts as a word break. The result is
/// never empty and never starts with a digit.
pub fn to_identifier(name: &str, case: Case) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let ident = spaced.trim().to_case(case);
    match ident.chars().next() {
        None => "unnamed".to_case(case),
        Some(c) if c.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident,
    }
}

/// Component identifier for a layer name (`primary button` gives `PrimaryButton`).
pub fn component_ident(name: &str) -> String {
    let ident = to_identifier(name, Case::Pascal);
    if ident.starts_with('_') {
        format!("Component{ident}")
    } else {
        ident
    }
}
