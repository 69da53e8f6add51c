use serde::Serialize;
use vectorforge_document::{GeometricNode, Layer, Mutation};
use vectorforge_editor::Editor;
use vectorforge_path::{parse_with_options, ParseOptions, Serializer};
use vectorforge_render::{export_to_render_tree, import_from_render_tree, ReconcileOptions};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct ExportResult {
    markup: String,
    error: Option<String>,
}

#[wasm_bindgen]
impl ExportResult {
    /// New markup, or the previous markup unchanged when `error` is set
    #[wasm_bindgen(getter)]
    pub fn markup(&self) -> String {
        self.markup.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

/// Interpret path data and return its nodes as JSON
#[wasm_bindgen(js_name = parsePath)]
pub fn parse_path_js(data: &str, options_json: Option<String>) -> Result<String, JsValue> {
    parse_path(data, options_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Serialize nodes JSON back to canonical path data
#[wasm_bindgen(js_name = serializePath)]
pub fn serialize_path_js(nodes_json: &str, precision: Option<usize>) -> Result<String, JsValue> {
    serialize_path(nodes_json, precision).map_err(|e| JsValue::from_str(&e))
}

/// Read the layers of a markup document as JSON
#[wasm_bindgen(js_name = importDocument)]
pub fn import_document_js(markup: &str, options_json: Option<String>) -> Result<String, JsValue> {
    import_document(markup, options_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Write layers JSON over previous markup. Export failures are reported on
/// the result, never thrown.
#[wasm_bindgen(js_name = exportDocument)]
pub fn export_document_js(
    layers_json: &str,
    previous: &str,
    options_json: Option<String>,
) -> Result<ExportResult, JsValue> {
    export_document(layers_json, previous, options_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Long-lived editor for a single document
#[wasm_bindgen]
pub struct EditorSession {
    editor: Editor,
}

#[wasm_bindgen]
impl EditorSession {
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<EditorSession, JsValue> {
        let options =
            reconcile_options(options_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self {
            editor: Editor::new(options),
        })
    }

    /// Replace the document with the layers found in `markup`
    pub fn open(&mut self, markup: &str) -> Result<u32, JsValue> {
        self.editor
            .revert(markup)
            .map(|version| version as u32)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply a mutation given as JSON; returns the edit result as JSON
    pub fn apply(&mut self, mutation_json: &str) -> Result<String, JsValue> {
        apply_mutation(&mut self.editor, mutation_json).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = newDocument)]
    pub fn new_document(&mut self) -> u32 {
        self.editor.new_document() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn markup(&self) -> String {
        self.editor.markup().to_string()
    }

    /// Current layers as JSON
    #[wasm_bindgen(js_name = layersJson)]
    pub fn layers_json(&self) -> Result<String, JsValue> {
        to_json(self.editor.layers()).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> u32 {
        self.editor.version() as u32
    }

    #[wasm_bindgen(getter, js_name = inSync)]
    pub fn in_sync(&self) -> bool {
        self.editor.is_in_sync()
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn reconcile_options(options_json: Option<&str>) -> Result<ReconcileOptions, String> {
    match options_json {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("Invalid options: {}", e)),
        None => Ok(ReconcileOptions::default()),
    }
}

fn parse_path(data: &str, options_json: Option<&str>) -> Result<String, String> {
    let options: ParseOptions = match options_json {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("Invalid options: {}", e))?,
        None => ParseOptions::default(),
    };
    to_json(&parse_with_options(data, options))
}

fn serialize_path(nodes_json: &str, precision: Option<usize>) -> Result<String, String> {
    let nodes: Vec<GeometricNode> =
        serde_json::from_str(nodes_json).map_err(|e| format!("Invalid nodes: {}", e))?;
    let serializer = match precision {
        Some(precision) => Serializer::with_precision(precision),
        None => Serializer::new(),
    };
    Ok(serializer.serialize(&nodes))
}

fn import_document(markup: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = reconcile_options(options_json)?;
    let layers = import_from_render_tree(markup, &options)
        .map_err(|e| format!("Parse error: {}", e))?;
    to_json(&layers)
}

fn export_document(
    layers_json: &str,
    previous: &str,
    options_json: Option<&str>,
) -> Result<ExportResult, String> {
    let options = reconcile_options(options_json)?;
    let layers: Vec<Layer> =
        serde_json::from_str(layers_json).map_err(|e| format!("Invalid layers: {}", e))?;

    let outcome = export_to_render_tree(&layers, previous, &options);
    Ok(ExportResult {
        error: outcome.error.map(|e| e.to_string()),
        markup: outcome.markup,
    })
}

fn apply_mutation(editor: &mut Editor, mutation_json: &str) -> Result<String, String> {
    let mutation: Mutation =
        serde_json::from_str(mutation_json).map_err(|e| format!("Invalid mutation: {}", e))?;
    let result = editor.apply(mutation).map_err(|e| e.to_string())?;
    to_json(&result)
}
