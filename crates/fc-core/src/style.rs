//! Node and edge style records.
//!
//! Both records are bags of optional attributes. A `None` means "not set
//! here"; merges only overwrite attributes that are `Some` in the patch,
//! and every node attribute has a documented fallback so a partial style
//! always resolves to something drawable.

use crate::model::{Color, Dimension, NEUTRAL_GRAY, ShapeKind};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;

// ─── Node style ──────────────────────────────────────────────────────────

/// Horizontal text alignment inside a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Per-node visual attributes, as edited through the side panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A node style with every fallback applied. This is what gets drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNodeStyle {
    pub text: String,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub border_radius: f32,
    pub text_color: Color,
    pub font_size: f32,
    pub font_family: String,
    pub text_align: TextAlign,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_strikethrough: bool,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub has_shadow: bool,
    pub shadow_opacity: f32,
    pub opacity: f32,
    pub icon: String,
}

pub const DEFAULT_BACKGROUND: Color = Color::rgb8(0xff, 0xff, 0xff);
pub const DEFAULT_BORDER: Color = Color::rgb8(0x9c, 0xa3, 0xaf);
pub const DEFAULT_TEXT_COLOR: Color = Color::rgb8(0x00, 0x00, 0x00);
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

impl NodeStyle {
    /// Fully populated style for a freshly dropped shape.
    pub fn defaults_for(shape: ShapeKind) -> Self {
        Self {
            text: Some(shape.as_str().to_string()),
            background_color: Some(DEFAULT_BACKGROUND),
            border_color: Some(DEFAULT_BORDER),
            border_width: Some(2.0),
            border_radius: Some(8.0),
            text_color: Some(DEFAULT_TEXT_COLOR),
            font_size: Some(14.0),
            font_family: Some(DEFAULT_FONT_FAMILY.to_string()),
            text_align: Some(TextAlign::Center),
            is_bold: Some(false),
            is_italic: Some(false),
            is_strikethrough: Some(false),
            width: Some(Dimension::Auto),
            height: Some(Dimension::Auto),
            padding: Some(16.0),
            has_shadow: Some(true),
            shadow_opacity: Some(0.1),
            opacity: Some(1.0),
            icon: Some(String::new()),
        }
    }

    /// Apply fallbacks for every unset attribute.
    pub fn resolve(&self, shape: ShapeKind) -> ResolvedNodeStyle {
        let (default_w, default_h) = shape.default_size();
        let width = self.width.unwrap_or_default().or(default_w);
        let height = if shape.is_square() {
            width
        } else {
            self.height.unwrap_or_default().or(default_h)
        };

        ResolvedNodeStyle {
            text: self
                .text
                .clone()
                .unwrap_or_else(|| shape.as_str().to_string()),
            background_color: self.background_color.unwrap_or(DEFAULT_BACKGROUND),
            border_color: self.border_color.unwrap_or(DEFAULT_BORDER),
            border_width: self.border_width.unwrap_or(2.0),
            border_radius: self.border_radius.unwrap_or(8.0),
            text_color: self.text_color.unwrap_or(DEFAULT_TEXT_COLOR),
            font_size: self.font_size.unwrap_or(14.0),
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            text_align: self.text_align.unwrap_or_default(),
            is_bold: self.is_bold.unwrap_or(false),
            is_italic: self.is_italic.unwrap_or(false),
            is_strikethrough: self.is_strikethrough.unwrap_or(false),
            width,
            height,
            padding: self.padding.unwrap_or(16.0),
            has_shadow: self.has_shadow.unwrap_or(true),
            shadow_opacity: self.shadow_opacity.unwrap_or(0.1),
            opacity: self.opacity.unwrap_or(1.0),
            icon: self.icon.clone().unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == NodeStyle::default()
    }
}

/// Merge `src` node style into `dst`, overwriting only `Some` fields.
pub fn merge_node_style(dst: &mut NodeStyle, src: &NodeStyle) {
    macro_rules! take {
        ($($field:ident),* $(,)?) => {
            $(
                if src.$field.is_some() {
                    dst.$field = src.$field.clone();
                }
            )*
        };
    }
    take!(
        text,
        background_color,
        border_color,
        border_width,
        border_radius,
        text_color,
        font_size,
        font_family,
        text_align,
        is_bold,
        is_italic,
        is_strikethrough,
        width,
        height,
        padding,
        has_shadow,
        shadow_opacity,
        opacity,
        icon,
    );
}

// ─── Edge style ──────────────────────────────────────────────────────────

/// How the edge path is routed between two handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveKind {
    /// Cubic bezier; the canvas calls this one `default`.
    #[default]
    #[serde(rename = "default")]
    Bezier,
    Straight,
    Step,
    SmoothStep,
    SimpleBezier,
}

impl CurveKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "default" | "bezier" => Some(CurveKind::Bezier),
            "straight" => Some(CurveKind::Straight),
            "step" => Some(CurveKind::Step),
            "smooth-step" | "smoothstep" => Some(CurveKind::SmoothStep),
            "simple-bezier" | "simplebezier" => Some(CurveKind::SimpleBezier),
            _ => None,
        }
    }
}

/// Stroke dash pattern. Serialized in SVG `stroke-dasharray` form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashPattern {
    #[default]
    Solid,
    Dashed(SmallVec<[f32; 4]>),
}

impl DashPattern {
    /// Accepts `"none"`, `""`, or segment lengths separated by commas
    /// and/or whitespace (`"5,5"`, `"8 4 2 4"`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("solid") {
            return Some(DashPattern::Solid);
        }
        let mut segments = SmallVec::new();
        for part in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if part.is_empty() {
                continue;
            }
            let v: f32 = part.parse().ok()?;
            if !v.is_finite() || v < 0.0 {
                return None;
            }
            segments.push(v);
        }
        if segments.iter().all(|v| *v == 0.0) {
            return Some(DashPattern::Solid);
        }
        Some(DashPattern::Dashed(segments))
    }

    pub fn to_dasharray(&self) -> String {
        match self {
            DashPattern::Solid => "none".to_string(),
            DashPattern::Dashed(segments) => segments
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl Serialize for DashPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_dasharray())
    }
}

impl<'de> Deserialize<'de> for DashPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DashPattern::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid dash `{s}`")))
    }
}

/// Arrow head drawn at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MarkerSpec {
    None,
    Arrow { width: f32, height: f32, color: Color },
    ArrowClosed { width: f32, height: f32, color: Color },
}

impl MarkerSpec {
    /// The same marker recolored. `None` stays `None`.
    pub fn with_color(self, color: Color) -> Self {
        match self {
            MarkerSpec::None => MarkerSpec::None,
            MarkerSpec::Arrow { width, height, .. } => MarkerSpec::Arrow {
                width,
                height,
                color,
            },
            MarkerSpec::ArrowClosed { width, height, .. } => MarkerSpec::ArrowClosed {
                width,
                height,
                color,
            },
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            MarkerSpec::None => None,
            MarkerSpec::Arrow { color, .. } | MarkerSpec::ArrowClosed { color, .. } => {
                Some(*color)
            }
        }
    }

    /// Parse a panel marker kind (`none`, `arrow`, `arrow-closed`) using
    /// `size` and `color` for the head.
    pub fn from_kind(kind: &str, size: f32, color: Color) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "" | "none" => Some(MarkerSpec::None),
            "arrow" => Some(MarkerSpec::Arrow {
                width: size,
                height: size,
                color,
            }),
            "arrow-closed" | "arrowclosed" => Some(MarkerSpec::ArrowClosed {
                width: size,
                height: size,
                color,
            }),
            _ => None,
        }
    }
}

/// Per-edge visual attributes. Used both as a full record and as a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<DashPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<MarkerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<MarkerSpec>,
}

/// Size of the closed arrow head on new connections.
pub const DEFAULT_ARROW_SIZE: f32 = 20.0;

impl EdgeStyle {
    /// Style given to every newly drawn connection.
    pub fn connection_default() -> Self {
        Self {
            stroke: Some(NEUTRAL_GRAY),
            stroke_width: Some(2.0),
            opacity: Some(1.0),
            dash: Some(DashPattern::Solid),
            curve: Some(CurveKind::SmoothStep),
            animated: Some(true),
            label: None,
            label_color: Some(NEUTRAL_GRAY),
            marker_end: Some(MarkerSpec::ArrowClosed {
                width: DEFAULT_ARROW_SIZE,
                height: DEFAULT_ARROW_SIZE,
                color: NEUTRAL_GRAY,
            }),
            marker_start: Some(MarkerSpec::None),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == EdgeStyle::default()
    }
}

macro_rules! for_each_edge_field {
    ($mac:ident) => {
        $mac!(
            stroke,
            stroke_width,
            opacity,
            dash,
            curve,
            animated,
            label,
            label_color,
            marker_end,
            marker_start,
        )
    };
}

/// Merge `src` edge style into `dst`, overwriting only `Some` fields.
pub fn merge_edge_style(dst: &mut EdgeStyle, src: &EdgeStyle) {
    macro_rules! take {
        ($($field:ident),* $(,)?) => {
            $(
                if src.$field.is_some() {
                    dst.$field = src.$field.clone();
                }
            )*
        };
    }
    for_each_edge_field!(take);
}

/// Copy `src` into every attribute that is still unset in `dst`.
/// Returns true if anything was filled.
pub fn fill_unset_edge_style(dst: &mut EdgeStyle, src: &EdgeStyle) -> bool {
    let mut filled = false;
    macro_rules! fill {
        ($($field:ident),* $(,)?) => {
            $(
                if dst.$field.is_none() && src.$field.is_some() {
                    dst.$field = src.$field.clone();
                    filled = true;
                }
            )*
        };
    }
    for_each_edge_field!(fill);
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_resolve_to_themselves() {
        let style = NodeStyle::defaults_for(ShapeKind::Rectangle);
        let resolved = style.resolve(ShapeKind::Rectangle);
        assert_eq!(resolved, NodeStyle::default().resolve(ShapeKind::Rectangle));
        assert_eq!(resolved.background_color.to_hex(), "#ffffff");
        assert_eq!(resolved.text, "rectangle");
        assert_eq!((resolved.width, resolved.height), (120.0, 60.0));
    }

    #[test]
    fn circle_height_follows_width() {
        let style = NodeStyle {
            width: Some(Dimension::Px(150.0)),
            height: Some(Dimension::Px(40.0)),
            ..Default::default()
        };
        let resolved = style.resolve(ShapeKind::Circle);
        assert_eq!((resolved.width, resolved.height), (150.0, 150.0));
    }

    #[test]
    fn node_merge_is_shallow_and_keywise() {
        let mut style = NodeStyle::defaults_for(ShapeKind::Ellipse);
        let patch = NodeStyle {
            text: Some("Decision".into()),
            is_bold: Some(true),
            ..Default::default()
        };
        merge_node_style(&mut style, &patch);
        assert_eq!(style.text.as_deref(), Some("Decision"));
        assert_eq!(style.is_bold, Some(true));
        assert_eq!(style.background_color, Some(DEFAULT_BACKGROUND));
        assert_eq!(style.font_size, Some(14.0));
    }

    #[test]
    fn node_patch_from_json_keeps_unspecified_unset() {
        let patch: NodeStyle =
            serde_json::from_str(r##"{"backgroundColor":"#fde68a","width":"auto","height":90}"##)
                .unwrap();
        assert_eq!(patch.background_color, Color::from_hex("#fde68a"));
        assert_eq!(patch.width, Some(Dimension::Auto));
        assert_eq!(patch.height, Some(Dimension::Px(90.0)));
        assert!(patch.border_color.is_none());
    }

    #[test]
    fn dash_parsing() {
        assert_eq!(DashPattern::parse("none"), Some(DashPattern::Solid));
        assert_eq!(DashPattern::parse("0 0"), Some(DashPattern::Solid));
        let dashed = DashPattern::parse("5, 5").unwrap();
        assert_eq!(dashed.to_dasharray(), "5,5");
        assert!(DashPattern::parse("5,x").is_none());
        assert!(DashPattern::parse("-2").is_none());
    }

    #[test]
    fn connection_default_is_complete() {
        let style = EdgeStyle::connection_default();
        let mut probe = EdgeStyle::default();
        fill_unset_edge_style(&mut probe, &style);
        assert_eq!(probe, style);
        assert_eq!(style.stroke.map(|c| c.to_hex()).as_deref(), Some("#374151"));
        assert_eq!(style.curve, Some(CurveKind::SmoothStep));
    }

    #[test]
    fn fill_unset_leaves_set_fields_alone() {
        let mut dst = EdgeStyle {
            stroke: Some(Color::rgb8(1, 2, 3)),
            ..Default::default()
        };
        let filled = fill_unset_edge_style(&mut dst, &EdgeStyle::connection_default());
        assert!(filled);
        assert_eq!(dst.stroke, Some(Color::rgb8(1, 2, 3)));
        assert_eq!(dst.stroke_width, Some(2.0));
        assert!(!fill_unset_edge_style(&mut dst, &EdgeStyle::connection_default()));
    }

    #[test]
    fn marker_serializes_tagged() {
        let json = serde_json::to_value(MarkerSpec::ArrowClosed {
            width: 20.0,
            height: 20.0,
            color: NEUTRAL_GRAY,
        })
        .unwrap();
        assert_eq!(json["type"], "arrow-closed");
        assert_eq!(json["color"], "#374151");
        let none: MarkerSpec = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, MarkerSpec::None);
    }

    #[test]
    fn curve_parsing_accepts_collaborator_names() {
        assert_eq!(CurveKind::parse("smoothstep"), Some(CurveKind::SmoothStep));
        assert_eq!(CurveKind::parse("smooth-step"), Some(CurveKind::SmoothStep));
        assert_eq!(CurveKind::parse("bezier"), Some(CurveKind::Bezier));
        assert_eq!(CurveKind::parse("zigzag"), None);
    }
}
