//! SVG serialisation of a [`Scene`].

use std::fmt::Write as _;

use pulse_core::Color;

use crate::scene::{num, Mark, Scene, Shape, TextAnchor};

/// Standalone SVG document, marks in paint order.
pub fn to_svg_string(scene: &Scene) -> String {
    let mut out = String::new();
    let (w, h) = (num(scene.width), num(scene.height));
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#
    );
    for mark in scene.paint_order() {
        write_mark(&mut out, mark);
    }
    out.push_str("</svg>\n");
    out
}

fn write_mark(out: &mut String, mark: &Mark) {
    match &mark.shape {
        Shape::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect id="{}" x="{}" y="{}" width="{}" height="{}""#,
                escape_xml(&mark.id),
                num(r.x()),
                num(r.y()),
                num(r.width().max(0.0)),
                num(r.height().max(0.0))
            );
            write_paint(out, mark);
            out.push_str("/>\n");
        }
        Shape::Path(p) => {
            let _ = write!(out, r#"<path id="{}" d="{}""#, escape_xml(&mark.id), p.to_svg_d());
            write_paint(out, mark);
            out.push_str("/>\n");
        }
        Shape::Line { from, to } => {
            let _ = write!(
                out,
                r#"<line id="{}" x1="{}" y1="{}" x2="{}" y2="{}""#,
                escape_xml(&mark.id),
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y)
            );
            write_paint(out, mark);
            out.push_str("/>\n");
        }
        Shape::Text(t) => {
            let _ = write!(
                out,
                r#"<text id="{}" x="{}" y="{}" font-size="{}""#,
                escape_xml(&mark.id),
                num(t.pos.x),
                num(t.pos.y),
                num(t.size)
            );
            if t.rotate != 0.0 {
                let _ = write!(
                    out,
                    r#" transform="rotate({} {} {})""#,
                    num(t.rotate),
                    num(t.pos.x),
                    num(t.pos.y)
                );
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            if t.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            write_paint(out, mark);
            out.push('>');
            out.push_str(&escape_xml(&t.text));
            out.push_str("</text>\n");
        }
    }
}

fn write_paint(out: &mut String, mark: &Mark) {
    write_color_attr(out, "fill", mark.fill);
    if let Some(stroke) = mark.stroke.filter(|_| mark.stroke_width > 0.0) {
        write_color_attr(out, "stroke", Some(stroke));
        let _ = write!(out, r#" stroke-width="{}""#, num(mark.stroke_width));
    }
    if mark.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, num(mark.opacity));
    }
}

fn write_color_attr(out: &mut String, name: &str, color: Option<Color>) {
    match color {
        None => {
            let _ = write!(out, r#" {name}="none""#);
        }
        Some(c) => {
            let _ = write!(out, r#" {name}="{}""#, c.to_hex_string());
            if c.a < 1.0 {
                let _ = write!(out, r#" {name}-opacity="{}""#, num(c.a));
            }
        }
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pulse_core::{Point, Rect};

    use super::*;
    use crate::scene::{z, TextMark};

    #[test]
    fn marks_are_written_in_paint_order() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.push(
            Mark::text("title", TextMark::new(Point::new(50.0, 10.0), "a < b")).with_z(z::TITLES),
        );
        scene.push(
            Mark::rect("bar/x", Rect::new(0.0, 0.0, 10.0, 20.0))
                .with_fill(Color::from_hex(0x4e79a7))
                .with_opacity(0.2),
        );
        let svg = to_svg_string(&scene);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        let rect_at = svg.find("<rect").unwrap();
        let text_at = svg.find("<text").unwrap();
        assert!(rect_at < text_at);
        assert!(svg.contains(r##"fill="#4e79a7" opacity="0.2""##));
        assert!(svg.contains("a &lt; b"));
    }

    #[test]
    fn lines_carry_stroke_and_rotated_text_a_transform() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(Mark::line("rule", Point::new(0.0, 0.0), Point::new(5.0, 0.0)));
        scene.push(Mark::text(
            "label",
            TextMark::new(Point::new(1.0, 2.0), "x").rotate(-45.0),
        ));
        let svg = to_svg_string(&scene);
        assert!(svg.contains(r##"fill="none" stroke="#000000" stroke-width="1""##));
        assert!(svg.contains(r#"transform="rotate(-45 1 2)""#));
    }
}
