pub mod config;
pub mod input;
pub mod panel;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod view;

pub use config::EditorConfig;
pub use input::{CanvasEvent, EdgeChange, Modifiers, NodeChange};
pub use selection::{Selection, SelectionController};
pub use session::Editor;
pub use view::SceneView;
