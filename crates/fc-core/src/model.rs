//! Core data model for FC diagrams.
//!
//! A diagram is a flat set of shape nodes joined by directed connection
//! edges. Nodes carry a free-form position reported by the canvas; edges
//! carry two explicit style records (what is drawn now, and what the user
//! authored). Styles themselves live in [`crate::style`].

use crate::id::ElementId;
use crate::style::{EdgeStyle, NodeStyle};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let mut ch = [255u8; 4];
                for (slot, &b) in ch.iter_mut().zip(bytes) {
                    *slot = hex_val(b)? * 17;
                }
                Some(Self::rgba8(ch[0], ch[1], ch[2], ch[3]))
            }
            6 | 8 => {
                let mut ch = [255u8; 4];
                for (slot, pair) in ch.iter_mut().zip(bytes.chunks(2)) {
                    *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
                }
                Some(Self::rgba8(ch[0], ch[1], ch[2], ch[3]))
            }
            _ => None,
        }
    }

    /// Emit as lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
        let channels = [self.r, self.g, self.b, self.a].map(|c| (c * 255.0).round() as u8);
        let take = if channels[3] == 255 { 3 } else { 4 };

        let mut out = String::with_capacity(1 + take * 2);
        out.push('#');
        for c in &channels[..take] {
            out.push(HEX_CHARS[(c >> 4) as usize] as char);
            out.push(HEX_CHARS[(c & 0xF) as usize] as char);
        }
        out
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────

/// Neutral gray used for new connections (stroke, arrow head, label).
pub const NEUTRAL_GRAY: Color = Color::rgb8(0x37, 0x41, 0x51);

/// Selection accent: highlighted edges, selected node borders, handles.
pub const ACCENT: Color = Color::rgb8(0x3b, 0x82, 0xf6);

// ─── Geometry ────────────────────────────────────────────────────────────

/// Canvas-space position of a node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round each axis to the nearest multiple of the grid step.
    /// Non-positive steps leave that axis untouched.
    pub fn snapped(self, grid: [f32; 2]) -> Self {
        let snap = |v: f32, step: f32| {
            if step > 0.0 {
                (v / step).round() * step
            } else {
                v
            }
        };
        Self {
            x: snap(self.x, grid[0]),
            y: snap(self.y, grid[1]),
        }
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// The visual shape of a node. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Circle,
    Triangle,
    #[default]
    Generic,
}

impl ShapeKind {
    /// Shapes offered by the palette, in display order, with their labels.
    pub fn palette() -> [(ShapeKind, &'static str); 4] {
        [
            (ShapeKind::Rectangle, "Rectangle"),
            (ShapeKind::Ellipse, "Ellipse"),
            (ShapeKind::Circle, "Circle"),
            (ShapeKind::Triangle, "Triangle"),
        ]
    }

    /// Map a palette drag payload to a shape. Anything unknown is `Generic`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => ShapeKind::Rectangle,
            "ellipse" => ShapeKind::Ellipse,
            "circle" => ShapeKind::Circle,
            "triangle" => ShapeKind::Triangle,
            _ => ShapeKind::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Generic => "generic",
        }
    }

    /// Size used when width/height are `auto`.
    pub fn default_size(&self) -> (f32, f32) {
        match self {
            ShapeKind::Circle => (96.0, 96.0),
            ShapeKind::Ellipse => (120.0, 80.0),
            ShapeKind::Rectangle => (120.0, 60.0),
            ShapeKind::Triangle => (120.0, 100.0),
            ShapeKind::Generic => (100.0, 50.0),
        }
    }

    /// Tint used for this shape in the overview minimap.
    pub fn minimap_color(&self) -> Color {
        match self {
            ShapeKind::Rectangle => ACCENT,
            ShapeKind::Ellipse => Color::rgb8(0x10, 0xb9, 0x81),
            ShapeKind::Circle => Color::rgb8(0x63, 0x66, 0xf1),
            ShapeKind::Triangle => Color::rgb8(0xf5, 0x9e, 0x0b),
            ShapeKind::Generic => Color::rgb8(0x6b, 0x72, 0x80),
        }
    }

    /// Circles keep a 1:1 aspect; only the width is honored.
    pub fn is_square(&self) -> bool {
        matches!(self, ShapeKind::Circle)
    }
}

// ─── Handles ─────────────────────────────────────────────────────────────

/// Which side of a node a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleSide {
    pub const ALL: [HandleSide; 4] = [
        HandleSide::Top,
        HandleSide::Right,
        HandleSide::Bottom,
        HandleSide::Left,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleSide::Top => "top",
            HandleSide::Right => "right",
            HandleSide::Bottom => "bottom",
            HandleSide::Left => "left",
        }
    }
}

/// Whether a handle was declared as a connection start or end point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    Source,
    Target,
}

impl HandleRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandleRole::Source => "source",
            HandleRole::Target => "target",
        }
    }
}

/// Anchor point on a node: `right-source`, `left-target`, or a bare side.
///
/// Every node exposes all eight side/role combinations, and the canvas
/// runs in loose mode, so either role may start or end a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId {
    pub side: HandleSide,
    pub role: Option<HandleRole>,
}

impl HandleId {
    pub const fn new(side: HandleSide, role: HandleRole) -> Self {
        Self {
            side,
            role: Some(role),
        }
    }

    pub const fn bare(side: HandleSide) -> Self {
        Self { side, role: None }
    }

    /// Parse `"<side>"` or `"<side>-<role>"`, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        let (side, role) = match s.split_once('-') {
            Some((side, role)) => (side.to_string(), Some(role.to_string())),
            None => (s, None),
        };
        let side = match side.as_str() {
            "top" => HandleSide::Top,
            "right" => HandleSide::Right,
            "bottom" => HandleSide::Bottom,
            "left" => HandleSide::Left,
            _ => return None,
        };
        let role = match role.as_deref() {
            None => None,
            Some("source") => Some(HandleRole::Source),
            Some("target") => Some(HandleRole::Target),
            Some(_) => return None,
        };
        Some(Self { side, role })
    }

    /// All handles a node exposes, in render order.
    pub fn all() -> impl Iterator<Item = HandleId> {
        HandleSide::ALL.into_iter().flat_map(|side| {
            [
                HandleId::new(side, HandleRole::Source),
                HandleId::new(side, HandleRole::Target),
            ]
        })
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Some(role) => write!(f, "{}-{}", self.side.as_str(), role.as_str()),
            None => f.write_str(self.side.as_str()),
        }
    }
}

impl Serialize for HandleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HandleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HandleId::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid handle `{s}`")))
    }
}

// ─── Node sizing ─────────────────────────────────────────────────────────

/// Explicit pixel size, or `auto` to use the shape default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Px(f32),
}

impl Dimension {
    /// Accepts `"auto"`, `""`, or a number (`"140"`, `"140px"`, `"140.5"`).
    /// Fractional pixel values are truncated like the panel's integer fields.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Some(Dimension::Auto);
        }
        let digits = s.strip_suffix("px").unwrap_or(s).trim();
        digits
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| Dimension::Px(v.trunc()))
    }

    pub fn or(self, fallback: f32) -> f32 {
        match self {
            Dimension::Auto => fallback,
            Dimension::Px(v) => v,
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Auto => serializer.serialize_str("auto"),
            Dimension::Px(v) => serializer.serialize_f32(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Px(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Px(v) if v.is_finite() && v >= 0.0 => Ok(Dimension::Px(v.trunc() as f32)),
            Raw::Px(v) => Err(de::Error::custom(format!("invalid size `{v}`"))),
            Raw::Text(s) => {
                Dimension::parse(&s).ok_or_else(|| de::Error::custom(format!("invalid size `{s}`")))
            }
        }
    }
}

// ─── Entities ────────────────────────────────────────────────────────────

/// A shape on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntity {
    pub id: ElementId,
    pub position: Position,
    pub shape: ShapeKind,
    pub style: NodeStyle,
}

impl NodeEntity {
    /// A node with every style attribute populated from the defaults.
    pub fn new(id: ElementId, shape: ShapeKind, position: Position) -> Self {
        Self {
            id,
            position,
            shape,
            style: NodeStyle::defaults_for(shape),
        }
    }
}

/// A directed connection between two nodes.
///
/// `render_style` is what the canvas draws right now. `original_style` is
/// what the user last authored; the two differ only while the edge is the
/// highlighted selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEntity {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
    pub source_handle: Option<HandleId>,
    pub target_handle: Option<HandleId>,
    pub render_style: EdgeStyle,
    pub original_style: EdgeStyle,
}

impl EdgeEntity {
    /// An edge whose render and authored styles both start as `style`.
    pub fn new(
        id: ElementId,
        source: ElementId,
        target: ElementId,
        source_handle: Option<HandleId>,
        target_handle: Option<HandleId>,
        style: EdgeStyle,
    ) -> Self {
        Self {
            id,
            source,
            target,
            source_handle,
            target_handle,
            render_style: style.clone(),
            original_style: style,
        }
    }

    pub fn touches(&self, node: ElementId) -> bool {
        self.source == node || self.target == node
    }

    /// True when both edges join the same endpoints through the same handles.
    pub fn same_connection(&self, other: &EdgeEntity) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.source_handle == other.source_handle
            && self.target_handle == other.target_handle
    }
}

/// Which collection an element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Edge,
}

impl ElementKind {
    /// Prefix used for generated ids of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Edge => "edge",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => f.write_str("node"),
            ElementKind::Edge => f.write_str("edge"),
        }
    }
}
