//! Retained scene
//!
//! Charts produce a [`Scene`]: plain geometry keyed by stable mark ids. The previous scene is
//! kept by the owner and diffed against the next one to find entering, updated and exiting
//! marks, so a renderer only touches what changed.

use indexmap::IndexMap;
use pulse_core::{Color, Point, Rect};
use rustc_hash::FxHashSet;

/// Paint order conventions. Renderers sort by `(z, insertion order)`.
pub mod z {
    pub const SERIES_FILL: i32 = 0;
    pub const SERIES_STROKE: i32 = 10;
    pub const NODES: i32 = 20;
    pub const AXIS_RULES: i32 = 30;
    pub const AXIS_LABELS: i32 = 40;
    pub const AXIS_TITLES: i32 = 50;
    pub const LEGEND_SWATCHES: i32 = 60;
    pub const LEGEND_LABELS: i32 = 70;
    pub const TITLES: i32 = 80;
    pub const OVERLAY: i32 = 90;
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    ArcTo {
        radius: f32,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

/// Path geometry built from drawing commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    cmds: Vec<PathCmd>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.cmds.push(PathCmd::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.cmds.push(PathCmd::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.cmds.push(PathCmd::CubicTo(c1, c2, to));
        self
    }

    pub fn arc_to(mut self, radius: f32, large_arc: bool, sweep: bool, to: Point) -> Self {
        self.cmds.push(PathCmd::ArcTo {
            radius,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg_d(&self) -> String {
        let mut out = String::new();
        for cmd in &self.cmds {
            match cmd {
                PathCmd::MoveTo(p) => out.push_str(&format!("M{},{}", num(p.x), num(p.y))),
                PathCmd::LineTo(p) => out.push_str(&format!("L{},{}", num(p.x), num(p.y))),
                PathCmd::CubicTo(a, b, p) => out.push_str(&format!(
                    "C{},{},{},{},{},{}",
                    num(a.x),
                    num(a.y),
                    num(b.x),
                    num(b.y),
                    num(p.x),
                    num(p.y)
                )),
                PathCmd::ArcTo {
                    radius,
                    large_arc,
                    sweep,
                    to,
                } => out.push_str(&format!(
                    "A{r},{r},0,{},{},{},{}",
                    *large_arc as u8,
                    *sweep as u8,
                    num(to.x),
                    num(to.y),
                    r = num(*radius)
                )),
                PathCmd::Close => out.push('Z'),
            }
        }
        out
    }
}

/// Coordinates rounded to 3 decimals, trailing zeroes dropped.
pub(crate) fn num(v: f32) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let mut s = format!("{rounded:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    pub pos: Point,
    pub text: String,
    pub size: f32,
    pub anchor: TextAnchor,
    /// Rotation in degrees about `pos`
    pub rotate: f32,
    pub bold: bool,
}

impl TextMark {
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
            size: 10.0,
            anchor: TextAnchor::Start,
            rotate: 0.0,
            bold: false,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Path(PathData),
    Line { from: Point, to: Point },
    Text(TextMark),
}

/// One drawable element with a stable identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub id: String,
    pub z: i32,
    pub shape: Shape,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl Mark {
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            z: z::SERIES_FILL,
            shape,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }

    pub fn rect(id: impl Into<String>, rect: Rect) -> Self {
        Self::new(id, Shape::Rect(rect))
    }

    pub fn path(id: impl Into<String>, path: PathData) -> Self {
        Self::new(id, Shape::Path(path))
    }

    pub fn line(id: impl Into<String>, from: Point, to: Point) -> Self {
        Self::new(id, Shape::Line { from, to }).with_stroke(Color::BLACK, 1.0)
    }

    pub fn text(id: impl Into<String>, text: TextMark) -> Self {
        Self::new(id, Shape::Text(text)).with_fill(Color::BLACK)
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Marks of one rendered frame, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    marks: IndexMap<String, Mark>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            marks: IndexMap::new(),
        }
    }

    /// Add a mark; a mark with the same id is replaced in place.
    pub fn push(&mut self, mark: Mark) {
        self.marks.insert(mark.id.clone(), mark);
    }

    pub fn extend(&mut self, marks: impl IntoIterator<Item = Mark>) {
        for mark in marks {
            self.push(mark);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Mark> {
        self.marks.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Mark> {
        self.marks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Mark> {
        self.marks.get_mut(id)
    }

    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.marks.values()
    }

    /// Marks whose id starts with `prefix`.
    pub fn marks_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Mark> {
        self.marks.values().filter(move |m| m.id.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marks in paint order.
    pub fn paint_order(&self) -> Vec<&Mark> {
        let mut marks: Vec<&Mark> = self.marks.values().collect();
        marks.sort_by_key(|m| m.z);
        marks
    }

    /// What changed going from `prev` to `self`.
    pub fn diff(&self, prev: &Scene) -> SceneDiff {
        let mut out = SceneDiff::default();
        for (id, mark) in &self.marks {
            match prev.marks.get(id) {
                None => out.entered.push(id.clone()),
                Some(old) if old != mark => out.updated.push(id.clone()),
                Some(_) => out.unchanged += 1,
            }
        }
        let current: FxHashSet<&str> = self.marks.keys().map(String::as_str).collect();
        out.exited = prev
            .marks
            .keys()
            .filter(|id| !current.contains(id.as_str()))
            .cloned()
            .collect();
        out
    }
}

/// Enter/update/exit sets between two scenes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneDiff {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub exited: Vec<String>,
    pub unchanged: usize,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.updated.is_empty() && self.exited.is_empty()
    }
}
