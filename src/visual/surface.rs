use nannou::prelude::Vec2;

/// An sRGB color with byte channels and a linear alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(level: u8, a: f32) -> Self {
        Self::new(level, level, level, a)
    }

    pub const fn white(a: f32) -> Self {
        Self::gray(255, a)
    }
}

/// Gray level from an unclamped intensity, saturating at 255.
pub fn gray_level(value: f32) -> u8 {
    value.floor().clamp(0.0, 255.0) as u8
}

/// A 2D drawing target in pixel coordinates, origin top-left, y down.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, weight: f32, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, weight: f32, color: Rgba);
    fn stroke_polyline(&mut self, points: &[Vec2], weight: f32, color: Rgba);
    fn fill_text(&mut self, text: &str, center: Vec2, size: u32, color: Rgba);

    fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgba,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        weight: f32,
        color: Rgba,
    },
    StrokeLine {
        from: Vec2,
        to: Vec2,
        weight: f32,
        color: Rgba,
    },
    StrokePolyline {
        points: Vec<Vec2>,
        weight: f32,
        color: Rgba,
    },
    FillText {
        text: String,
        center: Vec2,
        size: u32,
        color: Rgba,
    },
}

/// The recorded commands of one frame.
///
/// Frame steps draw into a display list; the window replays it on every
/// refresh, so the last frame stays visible while the scheduler is idle.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DisplayList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, weight: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            weight,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, weight: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            weight,
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], weight: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            weight,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, center: Vec2, size: u32, color: Rgba) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_owned(),
            center,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::vec2;

    #[test]
    fn gray_level_saturates() {
        assert_eq!(gray_level(337.5), 255);
        assert_eq!(gray_level(199.9), 199);
        assert_eq!(gray_level(-3.0), 0);
    }

    #[test]
    fn records_in_order() {
        let mut list = DisplayList::new(10.0, 20.0);
        list.fill_rect(0.0, 0.0, 10.0, 20.0, Rgba::gray(20, 1.0));
        list.stroke_line(vec2(0.0, 0.0), vec2(1.0, 1.0), 1.0, Rgba::white(0.5));
        assert_eq!(list.len(), 2);
        assert!(matches!(list.commands()[0], DrawCommand::FillRect { .. }));

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.width(), 10.0);
    }

    #[test]
    fn single_point_polyline_is_dropped() {
        let mut list = DisplayList::new(10.0, 10.0);
        list.stroke_polyline(&[vec2(1.0, 1.0)], 2.0, Rgba::white(1.0));
        assert!(list.is_empty());
    }

    #[test]
    fn zero_area_is_degenerate() {
        assert!(DisplayList::new(0.0, 640.0).is_degenerate());
        assert!(!DisplayList::new(360.0, 640.0).is_degenerate());
    }
}
