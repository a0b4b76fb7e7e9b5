//! End-to-end conversion tests over design tool JSON.

use canopy_codegen::{Backend, CodegenError, ConvertOptions, Converter};
use canopy_core::diagnostics::DiagnosticCode;
use canopy_merge::{apply_updates, MemorySink, OutputSink, UpdateAction};
use serde_json::{json, Value};

fn blue() -> Value {
    json!({"type": "SOLID", "color": {"r": 0.2314, "g": 0.5098, "b": 0.9647, "a": 1.0}})
}

fn button() -> Value {
    json!({
        "id": "1:1",
        "name": "Button",
        "type": "COMPONENT",
        "layoutMode": "HORIZONTAL",
        "itemSpacing": 8,
        "paddingTop": 8, "paddingBottom": 8, "paddingLeft": 16, "paddingRight": 16,
        "cornerRadius": 4,
        "fills": [blue()],
        "componentPropertyDefinitions": {
            "Label#1:0": {"type": "TEXT", "defaultValue": "Submit"}
        },
        "children": [{
            "id": "1:2",
            "name": "Label",
            "type": "TEXT",
            "characters": "Submit",
            "style": {"fontSize": 16, "fontWeight": 500},
            "componentPropertyReferences": {"characters": "Label#1:0"}
        }]
    })
}

fn document(components: Vec<Value>) -> String {
    json!({
        "name": "Kit",
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{"id": "0:1", "name": "Page", "type": "CANVAS", "children": components}]
        }
    })
    .to_string()
}

fn convert(json: &str, options: ConvertOptions) -> canopy_codegen::ConversionOutput {
    Converter::new(options).unwrap().convert_json(json).unwrap()
}

#[test]
fn test_button_with_text_prop() {
    let output = convert(&document(vec![button()]), ConvertOptions::default());
    let file = output.file("components/Button.tsx").unwrap();

    assert!(file.content.contains("<button"));
    assert!(file.content.contains("className="));
    assert!(file.content.contains("{label}"));
    assert!(file.content.contains("export function Button({ label = 'Submit' }: ButtonProps) {"));
    assert!(file.content.contains("bg-blue-500"));

    let types = output.file("components/Button.types.ts").unwrap();
    assert!(types.content.contains("export interface ButtonProps {\n  label?: string;\n}"));
    assert!(output.diagnostics.is_clean());
}

#[test]
fn test_large_bold_text_is_heading() {
    let hero = json!({
        "id": "2:1",
        "name": "Hero",
        "type": "COMPONENT",
        "layoutMode": "VERTICAL",
        "itemSpacing": 16,
        "children": [
            {"id": "2:2", "name": "Copy", "type": "TEXT", "characters": "Welcome",
             "style": {"fontSize": 24, "fontWeight": 700}},
            {"id": "2:3", "name": "Body", "type": "TEXT", "characters": "Start here",
             "style": {"fontSize": 16}}
        ]
    });
    let output = convert(&document(vec![hero]), ConvertOptions::default());
    let content = &output.file("components/Hero.tsx").unwrap().content;
    assert!(content.contains("<h2 className=\"text-2xl font-bold"));
    assert!(content.contains(">Welcome</h2>"));
    assert!(content.contains(">Start here</p>"));
}

#[test]
fn test_instances_reference_components() {
    let toolbar = json!({
        "id": "3:1",
        "name": "Toolbar",
        "type": "COMPONENT",
        "layoutMode": "HORIZONTAL",
        "itemSpacing": 8,
        "children": [{
            "id": "3:2",
            "name": "Save button",
            "type": "INSTANCE",
            "componentId": "1:1",
            "componentProperties": {"Label#1:0": {"type": "TEXT", "value": "Save"}}
        }, {
            "id": "3:3",
            "name": "Ghost",
            "type": "INSTANCE",
            "componentId": "404:1"
        }]
    });
    let output = convert(&document(vec![button(), toolbar]), ConvertOptions::default());
    let content = &output.file("components/Toolbar.tsx").unwrap().content;

    assert!(content.contains("import { Button } from './Button';"));
    assert!(content.contains("<Button label=\"Save\" />"));
    assert!(content.contains("{/* missing component: Ghost */}"));
    assert_eq!(output.diagnostics.count(DiagnosticCode::NodeNotFound), 1);
}

#[test]
fn test_repeated_children_render_as_map() {
    let item = |n: usize| {
        json!({
            "id": format!("4:{n}"),
            "name": format!("Item {n}"),
            "type": "FRAME",
            "layoutMode": "HORIZONTAL",
            "itemSpacing": 4,
            "children": [{"id": format!("4:{n}0"), "name": "Text", "type": "TEXT", "characters": "Row"}]
        })
    };
    let list = json!({
        "id": "4:0",
        "name": "List",
        "type": "COMPONENT",
        "layoutMode": "VERTICAL",
        "itemSpacing": 8,
        "children": [item(1), item(2), item(3)]
    });
    let output = convert(&document(vec![list]), ConvertOptions::default());
    let content = &output.file("components/List.tsx").unwrap().content;

    assert!(content.contains("{itemItems.map((item, index) => ("));
    assert!(content.contains("key={index}"));
    assert_eq!(content.matches("<div key={index}").count(), 1);
    assert!(content.contains("itemItems = Array.from({ length: 3 })"));
    assert!(output.file("components/List.types.ts").unwrap().content.contains("itemItems?: unknown[];"));
}

#[test]
fn test_interaction_hints_become_notes() {
    let dropdown = json!({
        "id": "5:1",
        "name": "Dropdown",
        "type": "COMPONENT",
        "layoutMode": "VERTICAL",
        "children": []
    });
    let output = convert(&document(vec![dropdown]), ConvertOptions::default());
    assert_eq!(output.diagnostics.count(DiagnosticCode::InteractionHint), 1);
    let content = &output.file("components/Dropdown.tsx").unwrap().content;
    assert!(content.contains("  // interactive behavior likely needed (dropdown)\n  return ("));
}

#[test]
fn test_every_backend_converts() {
    let json = document(vec![button()]);
    for backend in Backend::ALL {
        let output = convert(&json, ConvertOptions { backend, ..ConvertOptions::default() });
        assert!(!output.diagnostics.has_errors(), "{backend} reported errors");
        let content = &output.file("components/Button.tsx").unwrap().content;
        assert!(content.contains("{label}"), "{backend} lost the label binding");
    }
}

#[test]
fn test_regeneration_keeps_user_code() {
    let json = document(vec![button()]);
    let converter = Converter::new(ConvertOptions::default()).unwrap();
    let first = converter.convert_json(&json).unwrap();

    let mut sink = MemorySink::new();
    let report = apply_updates(&mut sink, &first.files);
    assert_eq!(report.count(UpdateAction::Create), first.files.len());

    let path = "components/Button.tsx";
    let edited = sink
        .get(path)
        .unwrap()
        .replace("  // @canopy-user-start logic\n", "  // @canopy-user-start logic\n  const [count, setCount] = useState(0);\n");
    sink.write(path, &edited).unwrap();

    let second = converter.convert_json(&json).unwrap();
    let report = apply_updates(&mut sink, &second.files);
    assert_eq!(report.count(UpdateAction::Merge), 1);
    assert_eq!(report.count(UpdateAction::Skip), second.files.len() - 1);
    assert!(sink.get(path).unwrap().contains("  const [count, setCount] = useState(0);\n"));
}

#[test]
fn test_shared_fill_style_maps_to_token() {
    let json = json!({
        "name": "Kit",
        "styles": {"S:brand": {"name": "Red/500", "styleType": "FILL"}},
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{"id": "0:1", "name": "Page", "type": "CANVAS", "children": [{
                "id": "6:1",
                "name": "Tag",
                "type": "COMPONENT",
                "layoutMode": "HORIZONTAL",
                "fills": [{"type": "SOLID", "color": {"r": 0.9, "g": 0.3, "b": 0.3, "a": 1.0}}],
                "styles": {"fill": "S:brand"}
            }]}]
        }
    })
    .to_string();
    let output = convert(&json, ConvertOptions::default());
    let content = &output.file("components/Tag.tsx").unwrap().content;
    assert!(content.contains("bg-red-500"));
}

#[test]
fn test_invalid_document_is_an_error() {
    let converter = Converter::new(ConvertOptions::default()).unwrap();
    let err = converter.convert_json("{\"document\": 42}").unwrap_err();
    assert!(matches!(err, CodegenError::Source(_)));
}
