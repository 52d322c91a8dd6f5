use nannou::prelude::*;

use super::compositor::BACKGROUND;
use super::surface::{DisplayList, DrawCommand, Rgba};

fn color(c: Rgba) -> Srgba<f32> {
    srgba(
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        c.a,
    )
}

pub fn clear(draw: &Draw) {
    draw.background().color(color(BACKGROUND));
}

/// Replays `list` into `draw`, mapping pixel coordinates (top-left origin,
/// y down) onto the window rect.
pub fn paint(draw: &Draw, win: Rect, list: &DisplayList, font: Option<&nannou::text::Font>) {
    let to_win = |p: Vec2| pt2(win.left() + p.x, win.top() - p.y);
    clear(draw);

    for cmd in list.commands() {
        match cmd {
            DrawCommand::FillRect {
                x,
                y,
                w,
                h,
                color: c,
            } => {
                draw.rect()
                    .xy(to_win(vec2(x + w / 2.0, y + h / 2.0)))
                    .w_h(*w, *h)
                    .color(color(*c));
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color: c,
            } => {
                draw.ellipse()
                    .xy(to_win(*center))
                    .radius(*radius)
                    .color(color(*c));
            }
            DrawCommand::StrokeCircle {
                center,
                radius,
                weight,
                color: c,
            } => {
                draw.ellipse()
                    .xy(to_win(*center))
                    .radius(*radius)
                    .no_fill()
                    .stroke_weight(*weight)
                    .stroke(color(*c));
            }
            DrawCommand::StrokeLine {
                from,
                to,
                weight,
                color: c,
            } => {
                draw.line()
                    .start(to_win(*from))
                    .end(to_win(*to))
                    .weight(*weight)
                    .color(color(*c));
            }
            DrawCommand::StrokePolyline {
                points,
                weight,
                color: c,
            } => {
                draw.polyline()
                    .weight(*weight)
                    .points(points.iter().map(|&p| to_win(p)))
                    .color(color(*c));
            }
            DrawCommand::FillText {
                text,
                center,
                size,
                color: c,
            } => {
                let label = draw
                    .text(text)
                    .xy(to_win(*center))
                    .wh(vec2(win.w(), *size as f32 * 2.0))
                    .font_size(*size)
                    .center_justify()
                    .color(color(*c));
                if let Some(font) = font {
                    label.font(font.clone());
                }
            }
        }
    }
}
