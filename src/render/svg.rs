use std::{f64::consts::PI, fmt::Write as _};

use crate::{
    foundation::core::{Point, Rgba8},
    render::scene::{NodeShape, Scene, SceneItem},
};

/// Serialize a scene to a standalone SVG document sized to its view box.
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_svg(scene, &mut out);
    out
}

fn write_svg(scene: &Scene, out: &mut String) -> std::fmt::Result {
    let vb = scene.view_box;
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="{x:.2} {y:.2} {w:.2} {h:.2}">"#,
        x = vb.x0,
        y = vb.y0,
        w = vb.width(),
        h = vb.height(),
    )?;
    writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
        vb.x0,
        vb.y0,
        vb.width(),
        vb.height(),
        fill_attr(scene.background, 1.0),
    )?;
    for item in &scene.items {
        write_item(item, out)?;
    }
    writeln!(out, "</svg>")
}

fn write_item(item: &SceneItem, out: &mut String) -> std::fmt::Result {
    match item {
        SceneItem::Polyline {
            points,
            color,
            width,
            opacity,
        } => writeln!(
            out,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{width:.2}" stroke-opacity="{:.3}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            points_attr(points),
            color.to_hex(),
            opacity * color.alpha_f64(),
        ),
        SceneItem::Node {
            center,
            radius,
            shape,
            fill,
            stroke,
            opacity,
        } => {
            let paint = format!(
                r#"{} stroke="{}" stroke-width="2" opacity="{:.3}""#,
                fill_attr(*fill, 1.0),
                stroke.to_hex(),
                opacity,
            );
            write_shape(out, *center, *radius, *shape, &paint)
        }
        SceneItem::Label {
            anchor,
            text,
            size,
            color,
            opacity,
        } => writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{size:.1}" text-anchor="middle" {}>{}</text>"#,
            anchor.x,
            anchor.y,
            fill_attr(*color, *opacity),
            escape(text),
        ),
        SceneItem::Marker {
            center,
            radius,
            shape,
            color,
            opacity,
        } => {
            let paint = match shape {
                NodeShape::Cross => format!(
                    r#"fill="none" stroke="{}" stroke-width="2.5" opacity="{:.3}""#,
                    color.to_hex(),
                    opacity,
                ),
                _ => format!(
                    r##"{} stroke="#000000" stroke-width="1" opacity="{:.3}""##,
                    fill_attr(*color, 1.0),
                    opacity,
                ),
            };
            write_shape(out, *center, *radius, *shape, &paint)
        }
    }
}

fn write_shape(
    out: &mut String,
    c: Point,
    r: f64,
    shape: NodeShape,
    paint: &str,
) -> std::fmt::Result {
    match shape {
        NodeShape::Circle => writeln!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}" {paint}/>"#,
            c.x, c.y
        ),
        NodeShape::DoubleCircle => {
            writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}" {paint}/>"#,
                c.x, c.y
            )?;
            writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {paint}/>"#,
                c.x,
                c.y,
                r * 0.55
            )
        }
        NodeShape::Square => writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {paint}/>"#,
            c.x - r,
            c.y - r,
            2.0 * r,
            2.0 * r
        ),
        NodeShape::Diamond => polygon(out, &regular(c, r * 1.2, 4, PI / 2.0), paint),
        NodeShape::Hexagon => polygon(out, &regular(c, r, 6, 0.0), paint),
        NodeShape::Star => polygon(out, &star(c, r * 1.2, r * 0.5), paint),
        NodeShape::Unknown => {
            writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}" {paint} stroke-dasharray="3 2"/>"#,
                c.x, c.y
            )?;
            writeln!(
                out,
                r##"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" text-anchor="middle" fill="#e8e6e3">?</text>"##,
                c.x,
                c.y + r * 0.45,
                r * 1.3
            )
        }
        NodeShape::Cross => writeln!(
            out,
            r#"<path d="M{:.2},{:.2} L{:.2},{:.2} M{:.2},{:.2} L{:.2},{:.2}" {paint}/>"#,
            c.x - r,
            c.y - r,
            c.x + r,
            c.y + r,
            c.x - r,
            c.y + r,
            c.x + r,
            c.y - r
        ),
    }
}

fn polygon(out: &mut String, points: &[Point], paint: &str) -> std::fmt::Result {
    writeln!(out, r#"<polygon points="{}" {paint}/>"#, points_attr(points))
}

fn regular(c: Point, r: f64, sides: usize, start: f64) -> Vec<Point> {
    (0..sides)
        .map(|k| {
            let a = start + 2.0 * PI * k as f64 / sides as f64;
            Point::new(c.x + r * a.cos(), c.y - r * a.sin())
        })
        .collect()
}

fn star(c: Point, outer: f64, inner: f64) -> Vec<Point> {
    (0..10)
        .map(|k| {
            let r = if k % 2 == 0 { outer } else { inner };
            let a = PI / 2.0 + PI * k as f64 / 5.0;
            Point::new(c.x + r * a.cos(), c.y - r * a.sin())
        })
        .collect()
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fill_attr(color: Rgba8, opacity: f64) -> String {
    format!(
        r#"fill="{}" fill-opacity="{:.3}""#,
        color.to_hex(),
        opacity * color.alpha_f64()
    )
}

/// Escape text content and attribute values.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
