//! WASM bridge for FC: exposes the flowchart editor core to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page's canvas component
//! forwards its callbacks here and redraws from `get_scene_json` whenever a
//! call reports a change.

use fc_core::{ConnectionGesture, EdgeStyle, ElementId, HandleId, NodeStyle, Position, ShapeKind};
use fc_editor::shortcuts::ShortcutAction;
use fc_editor::{CanvasEvent, EdgeChange, Editor, EditorConfig, Modifiers, NodeChange};
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
///
/// Holds the editor session. All interaction from the page goes through
/// this struct; return values are plain bools and JSON strings.
#[wasm_bindgen]
pub struct FcCanvas {
    editor: Editor,
}

impl Default for FcCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FcCanvas {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        init_logging();
        Self {
            editor: Editor::new(),
        }
    }

    /// Create an editor from a JSON `EditorConfig`. Malformed JSON falls
    /// back to the defaults.
    pub fn with_config(json: &str) -> Self {
        init_logging();
        let config = EditorConfig::from_json(json).unwrap_or_else(|err| {
            log::warn!("bad editor config, using defaults: {err}");
            EditorConfig::default()
        });
        Self {
            editor: Editor::with_config(config),
        }
    }

    /// Store revision; changes whenever the scene must be redrawn.
    pub fn revision(&self) -> f64 {
        self.editor.revision() as f64
    }

    /// Apply one event in its JSON form (`{"type":"nodeClick","id":"..."}`).
    /// Returns true if the canvas must redraw.
    pub fn handle_event(&mut self, json: &str) -> bool {
        match CanvasEvent::from_json(json) {
            Ok(event) => self.editor.handle(event),
            Err(err) => {
                log::debug!("unparseable event: {err}");
                false
            }
        }
    }

    // ─── Canvas callbacks ────────────────────────────────────────────────

    /// A connection drag ended. Empty `target` means it ended on nothing.
    /// Returns the new edge id, or an empty string if no edge was made.
    pub fn on_connect(
        &mut self,
        source: &str,
        source_handle: &str,
        target: &str,
        target_handle: &str,
    ) -> String {
        let gesture = ConnectionGesture {
            source: element(source),
            source_handle: HandleId::parse(source_handle),
            target: element(target),
            target_handle: HandleId::parse(target_handle),
        };
        self.editor
            .on_connect(&gesture)
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    pub fn on_node_click(&mut self, id: &str) -> bool {
        match ElementId::lookup(id) {
            Some(id) => self.editor.on_node_click(id),
            None => self.editor.on_background_click(),
        }
    }

    pub fn on_edge_click(&mut self, id: &str) -> bool {
        match ElementId::lookup(id) {
            Some(id) => self.editor.on_edge_click(id),
            None => self.editor.on_background_click(),
        }
    }

    pub fn on_background_click(&mut self) -> bool {
        self.editor.on_background_click()
    }

    /// Drop a palette shape at a canvas-space point. Returns the node id.
    pub fn on_node_drop(&mut self, shape: &str, x: f32, y: f32) -> String {
        self.editor
            .on_node_drop(ShapeKind::from_name(shape), Position::new(x, y))
            .to_string()
    }

    /// Apply a JSON array of node changes.
    pub fn on_nodes_changed(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<NodeChange>>(json) {
            Ok(changes) => self.editor.on_nodes_changed(&changes),
            Err(err) => {
                log::debug!("unparseable node changes: {err}");
                false
            }
        }
    }

    /// Apply a JSON array of edge changes.
    pub fn on_edges_changed(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<EdgeChange>>(json) {
            Ok(changes) => self.editor.on_edges_changed(&changes),
            Err(err) => {
                log::debug!("unparseable edge changes: {err}");
                false
            }
        }
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        let revision = self.editor.revision();
        let selection = self.editor.selection();

        let action = self.editor.on_key(key, modifiers);
        let changed =
            self.editor.revision() != revision || self.editor.selection() != selection;

        let action_name = action.map(|a| a.name()).unwrap_or("none");
        format!(r#"{{"changed":{changed},"action":"{action_name}"}}"#)
    }

    /// Delete the selected element. Returns true if anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    /// Run a shortcut by action name (`"delete"`, `"deselect"`), e.g. from
    /// a toolbar button. Returns true if anything changed.
    pub fn run_action(&mut self, name: &str) -> bool {
        match name {
            n if n == ShortcutAction::Delete.name() => self.editor.delete_selected(),
            n if n == ShortcutAction::Deselect.name() => self.editor.on_background_click(),
            _ => false,
        }
    }

    // ─── Property panel ──────────────────────────────────────────────────

    /// Shallow-merge a JSON partial node style. Returns true on success.
    pub fn update_node(&mut self, id: &str, json: &str) -> bool {
        let Some(id) = ElementId::lookup(id) else {
            return false;
        };
        match serde_json::from_str::<NodeStyle>(json) {
            Ok(patch) => self.editor.update_node(id, &patch),
            Err(err) => {
                log::debug!("bad node style: {err}");
                false
            }
        }
    }

    /// Apply a JSON partial edge style as an authored edit.
    pub fn update_edge(&mut self, id: &str, json: &str) -> bool {
        let Some(id) = ElementId::lookup(id) else {
            return false;
        };
        match serde_json::from_str::<EdgeStyle>(json) {
            Ok(patch) => self.editor.update_edge(id, &patch),
            Err(err) => {
                log::debug!("bad edge style: {err}");
                false
            }
        }
    }

    /// Set a property on the selected node. Returns `true` if it was set.
    pub fn set_node_prop(&mut self, key: &str, value: &str) -> bool {
        self.editor.set_node_prop(key, value)
    }

    /// Set a property on the selected edge. Returns `true` if it was set.
    pub fn set_edge_prop(&mut self, key: &str, value: &str) -> bool {
        self.editor.set_edge_prop(key, value)
    }

    /// Panel snapshot for the selection as JSON, or `{}` when idle.
    pub fn get_selected_props(&self) -> String {
        self.editor
            .selected_props()
            .and_then(|props| serde_json::to_string(&props).ok())
            .unwrap_or_else(|| "{}".to_string())
    }

    // ─── Scene output ────────────────────────────────────────────────────

    /// Full scene view for a redraw.
    pub fn get_scene_json(&self) -> String {
        serde_json::to_string(&self.editor.view()).unwrap_or_else(|_| "{}".to_string())
    }

    /// `{"kind":"idle"}`, `{"kind":"node","id":...}` or `{"kind":"edge","id":...}`.
    pub fn get_selection_json(&self) -> String {
        serde_json::to_string(&self.editor.selection())
            .unwrap_or_else(|_| r#"{"kind":"idle"}"#.to_string())
    }

    /// Id of the selected element, or an empty string.
    pub fn get_selected_id(&self) -> String {
        self.editor
            .selection()
            .id()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

/// Resolve a gesture endpoint coming from JS. Empty means "no element".
/// Unknown ids still resolve so the store can reject them by name.
fn element(id: &str) -> Option<ElementId> {
    if id.is_empty() {
        None
    } else {
        Some(ElementId::lookup(id).unwrap_or_else(|| ElementId::intern(id)))
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────

/// Palette entries as `[[kind, label], ...]`.
#[wasm_bindgen]
pub fn palette() -> js_sys::Array {
    ShapeKind::palette()
        .iter()
        .map(|(shape, label)| {
            js_sys::Array::of2(&JsValue::from_str(shape.as_str()), &JsValue::from_str(label))
        })
        .collect()
}

/// Minimap tint for a shape name, as `#rrggbb`.
#[wasm_bindgen]
pub fn minimap_color(shape: &str) -> String {
    ShapeKind::from_name(shape).minimap_color().to_hex()
}

// ─── Logging and panic hook ──────────────────────────────────────────────

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = console_log::init_with_level(log::Level::Debug);
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FC WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_api_walkthrough() {
        let mut canvas = FcCanvas::new();
        let n1 = canvas.on_node_drop("rectangle", 100.0, 100.0);
        let n2 = canvas.on_node_drop("ellipse", 300.0, 100.0);
        let e1 = canvas.on_connect(&n1, "right-source", &n2, "left-target");
        assert!(!e1.is_empty());

        assert!(canvas.on_edge_click(&e1));
        assert_eq!(canvas.get_selected_id(), e1);
        let props: serde_json::Value = serde_json::from_str(&canvas.get_selected_props()).unwrap();
        assert_eq!(props["kind"], "edge");
        assert_eq!(props["source"], n2.as_str());

        let scene: serde_json::Value = serde_json::from_str(&canvas.get_scene_json()).unwrap();
        assert_eq!(scene["edges"][0]["style"]["stroke"], "#3b82f6");

        assert!(canvas.on_background_click());
        assert_eq!(canvas.get_selected_props(), "{}");
        assert_eq!(canvas.get_selection_json(), r#"{"kind":"idle"}"#);
    }

    #[test]
    fn cancelled_and_unknown_connections_return_empty() {
        let mut canvas = FcCanvas::new();
        let n1 = canvas.on_node_drop("circle", 0.0, 0.0);
        assert_eq!(canvas.on_connect(&n1, "top-source", "", ""), "");
        assert_eq!(canvas.on_connect(&n1, "", "node_never_dropped", ""), "");
    }

    #[test]
    fn handle_key_reports_action() {
        let mut canvas = FcCanvas::new();
        let n1 = canvas.on_node_drop("triangle", 0.0, 0.0);
        canvas.on_node_click(&n1);
        assert_eq!(
            canvas.handle_key("Delete", false, false, false, false),
            r#"{"changed":true,"action":"delete"}"#
        );
        assert_eq!(
            canvas.handle_key("k", false, false, false, false),
            r#"{"changed":false,"action":"none"}"#
        );
    }

    #[test]
    fn json_entry_points() {
        let mut canvas = FcCanvas::with_config(r#"{"snapGrid":[10,10]}"#);
        let n1 = canvas.on_node_drop("rectangle", 0.0, 0.0);
        let moved = canvas.on_nodes_changed(&format!(
            r#"[{{"type":"position","id":"{n1}","position":{{"x":14,"y":26}},"dragging":true}}]"#
        ));
        assert!(moved);
        assert!(canvas.update_node(&n1, r##"{"backgroundColor":"#000000"}"##));
        assert!(!canvas.update_node(&n1, "not json"));
        assert!(!canvas.handle_event(r#"{"type":"teleport"}"#));

        let scene: serde_json::Value = serde_json::from_str(&canvas.get_scene_json()).unwrap();
        assert_eq!(scene["nodes"][0]["position"]["x"], 10.0);
        assert_eq!(scene["nodes"][0]["position"]["y"], 30.0);
        assert_eq!(scene["nodes"][0]["style"]["backgroundColor"], "#000000");
        assert_eq!(minimap_color("ellipse"), "#10b981");
    }
}
