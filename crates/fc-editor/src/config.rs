//! Editor configuration, accepted from the host page as JSON.

use fc_core::{ConnectionBuilder, ConnectionPolicy, EdgeStyle, Highlight};
use serde::{Deserialize, Serialize};

/// Grid used for dragged nodes when snapping is on.
pub const DEFAULT_SNAP_GRID: [f32; 2] = [15.0, 15.0];

/// Tunables for one editor session. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snap dragged positions to this grid; `None` disables snapping.
    pub snap_grid: Option<[f32; 2]>,
    /// Overlay drawn on the selected edge.
    pub highlight: Highlight,
    pub allow_self_loops: bool,
    /// Attributes laid over the stock style of new connections.
    pub edge_defaults: EdgeStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_grid: Some(DEFAULT_SNAP_GRID),
            highlight: Highlight::default(),
            allow_self_loops: true,
            edge_defaults: EdgeStyle::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The connection builder new edges go through.
    pub fn connection_builder(&self) -> ConnectionBuilder {
        ConnectionBuilder::new(ConnectionPolicy {
            allow_self_loops: self.allow_self_loops,
        })
        .with_defaults(&self.edge_defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg = EditorConfig::from_json(
            r##"{
                "snapGrid": null,
                "allowSelfLoops": false,
                "highlight": {"stroke": "#ff0000"},
                "edgeDefaults": {"animated": false, "curve": "straight"}
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.snap_grid, None);
        assert!(!cfg.allow_self_loops);
        assert_eq!(cfg.highlight.stroke, Color::rgb8(255, 0, 0));
        assert_eq!(cfg.highlight.width_delta, 1.0);

        let builder = cfg.connection_builder();
        assert!(!builder.policy().allow_self_loops);
        assert_eq!(builder.defaults().animated, Some(false));
        assert_eq!(builder.defaults().stroke_width, Some(2.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EditorConfig::from_json(r#"{"snapGrid": "big"}"#).is_err());
    }
}
