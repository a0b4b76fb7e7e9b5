//! Variant extraction.
//!
//! A variant set is a component set whose children are the individual
//! variants. Each variant carries a `{property: value}` map, either structured
//! or encoded in its name as `Key=Value, Key2=Value2`. The union of those maps
//! becomes the prop list of the generated component.

use canopy_core::ir::IrPropDef;
use canopy_core::source::SourceNode;
use crate::naming::to_identifier;
use convert_case::Case;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static VARIANT_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^=]+?)\s*=\s*(.*?)\s*$").expect("variant pair pattern is valid"));

/// Parse a variant name like `State=Hover, Size=Large`.
///
/// Segments without `=` are ignored.
pub fn parse_variant_name(name: &str) -> IndexMap<String, String> {
    name.split(',')
        .filter_map(|segment| VARIANT_PAIR.captures(segment))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// The `{property: value}` map of one variant.
pub fn variant_values(node: &SourceNode) -> IndexMap<String, String> {
    match &node.variant_properties {
        Some(props) if !props.is_empty() => props.clone(),
        _ => parse_variant_name(&node.name),
    }
}

/// Collect the distinct values of each key, in first-seen order.
pub fn collect_values<I>(cases: I) -> IndexMap<String, Vec<String>>
where
    I: IntoIterator<Item = IndexMap<String, String>>,
{
    let mut values: IndexMap<String, Vec<String>> = IndexMap::new();
    for case in cases {
        for (key, value) in case {
            let seen = values.entry(key).or_default();
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
    }
    values
}

/// Infer the prop for one variant key from its distinct values.
///
/// Values that are all `true`/`false` in any case, with both present, make a
/// boolean. A single value is a string, anything else is an enum. The first
/// value is the default.
pub fn infer_prop(name: &str, values: Vec<String>) -> Option<IrPropDef> {
    let default_value = values.first().cloned();
    let is_boolean = values.iter().all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
        && values.iter().any(|v| v.eq_ignore_ascii_case("true"))
        && values.iter().any(|v| v.eq_ignore_ascii_case("false"));

    if is_boolean {
        Some(IrPropDef::boolean(name, default_value.map(|v| v.to_lowercase())))
    } else if values.len() == 1 {
        Some(IrPropDef::string(name, default_value))
    } else {
        IrPropDef::enumeration(name, values, default_value)
    }
}

/// Props declared by a set of variant cases.
pub fn extract_props<I>(cases: I) -> Vec<IrPropDef>
where
    I: IntoIterator<Item = IndexMap<String, String>>,
{
    collect_values(cases)
        .into_iter()
        .filter_map(|(key, values)| infer_prop(&key, values))
        .collect()
}

/// Props declared by the variants of a component set node.
pub fn extract_variant_props(set: &SourceNode) -> Vec<IrPropDef> {
    extract_props(set.child_nodes().map(variant_values))
}

/// Identifier used for a property key in generated code.
///
/// Drops the `#id` suffix the source tool appends to property keys and
/// camel-cases the rest.
pub fn prop_identifier(key: &str) -> String {
    let base = key.split('#').next().unwrap_or(key);
    to_identifier(base, Case::Camel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::ir::PropType;
    use canopy_core::source::NodeType;

    fn case(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_variant_name() {
        let parsed = parse_variant_name("State=Hover, Size = Large");
        assert_eq!(parsed.get("State").map(String::as_str), Some("Hover"));
        assert_eq!(parsed.get("Size").map(String::as_str), Some("Large"));
        assert!(parse_variant_name("Primary").is_empty());
    }

    #[test]
    fn test_four_cases_give_two_enums() {
        let props = extract_props(vec![
            case(&[("State", "Default"), ("Size", "Small")]),
            case(&[("State", "Default"), ("Size", "Large")]),
            case(&[("State", "Hover"), ("Size", "Small")]),
            case(&[("State", "Hover"), ("Size", "Large")]),
        ]);
        assert_eq!(props.len(), 2);
        for prop in &props {
            assert_eq!(prop.prop_type, PropType::Enum);
            assert_eq!(prop.values.len(), 2);
        }
        assert_eq!(props[0].name, "State");
        assert_eq!(props[0].values, vec!["Default", "Hover"]);
        assert_eq!(props[0].default_value.as_deref(), Some("Default"));
    }

    #[test]
    fn test_true_false_is_boolean() {
        let props = extract_props(vec![case(&[("Disabled", "True")]), case(&[("Disabled", "False")])]);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].prop_type, PropType::Boolean);
        assert_eq!(props[0].default_value.as_deref(), Some("true"));
    }

    #[test]
    fn test_mixed_case_booleans_stay_boolean() {
        let props = extract_props(vec![
            case(&[("Disabled", "True")]),
            case(&[("Disabled", "true")]),
            case(&[("Disabled", "False")]),
        ]);
        assert_eq!(props[0].prop_type, PropType::Boolean);
        assert_eq!(props[0].default_value.as_deref(), Some("true"));

        let prop = infer_prop("Open", vec!["FALSE".into(), "true".into()]).unwrap();
        assert_eq!(prop.prop_type, PropType::Boolean);
        assert_eq!(prop.default_value.as_deref(), Some("false"));
    }

    #[test]
    fn test_single_value_is_string() {
        let props = extract_props(vec![case(&[("Theme", "Dark")]), case(&[("Theme", "Dark")])]);
        assert_eq!(props[0].prop_type, PropType::String);
    }

    #[test]
    fn test_no_variants_no_props() {
        let set = SourceNode::new("1:1", "Button", NodeType::ComponentSet);
        assert!(extract_variant_props(&set).is_empty());
    }

    #[test]
    fn test_structured_values_win_over_name() {
        let mut variant = SourceNode::new("1:2", "State=Hover", NodeType::Component);
        variant.variant_properties = Some(case(&[("State", "Pressed")]));
        assert_eq!(variant_values(&variant).get("State").map(String::as_str), Some("Pressed"));
    }

    #[test]
    fn test_prop_identifier() {
        assert_eq!(prop_identifier("Label#12:0"), "label");
        assert_eq!(prop_identifier("Show Icon#3:4"), "showIcon");
        assert_eq!(prop_identifier("State"), "state");
        assert_eq!(prop_identifier("2 Columns"), "_2Columns");
    }
}
