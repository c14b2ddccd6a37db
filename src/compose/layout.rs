//! Fixed 1920×1080 thumbnail layout.
//!
//! Positions are in canvas pixels with the origin at the top-left corner. Rotations are in
//! degrees, counter-clockwise as seen on screen.

use crate::foundation::core::{Affine, Canvas, Point, Vec2};

/// Canvas every thumbnail is painted on.
pub const CANVAS: Canvas = Canvas::THUMBNAIL;

/// Default font for title, subtitle and player names.
pub const DEFAULT_TITLE_FONT: &str = "HelveticaNeue.ttc";
/// Default font for deck names and the "vs" marker.
pub const DEFAULT_DECKNAME_FONT: &str = "Impact.ttf";

/// Face indices inside the title font collection.
pub const FACE_REGULAR: u32 = 0;
pub const FACE_BOLD: u32 = 1;
pub const FACE_BOLD_ITALIC: u32 = 3;

/// Text drawn between the two deck names.
pub const VERSUS_TEXT: &str = "vs";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn pick<T>(self, left: T, right: T) -> T {
        match self {
            Side::Left => left,
            Side::Right => right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotAlign {
    /// The rotated image's bounding box has its top-left corner at the slot origin.
    TopLeft,
    /// The rotated image is centered inside the slot bounds.
    CenterInBounds,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where and how an image is placed.
pub struct ImageSlot {
    /// Images are scaled to fit inside this box, keeping their aspect ratio.
    pub bounds: (u32, u32),
    pub origin: Point,
    pub rotation_deg: f64,
    pub align: SlotAlign,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Title font (`titleFont` / Helvetica Neue).
    Title,
    /// Deck-name font (`decknameFont` / Impact).
    Deckname,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where and how a text label is drawn.
pub struct TextSlot {
    /// Horizontal center and ascender line of the first text line.
    pub anchor: Point,
    pub font: FontRole,
    pub face_index: u32,
    pub size_px: f32,
    /// Outline width in pixels; 0 draws no outline.
    pub stroke_width: f32,
}

/// Logo box, horizontally centered on the canvas. The contained logo is centered inside the box
/// rather than pinned to its top-left corner, so narrow or short logos stay on the canvas axis.
pub const LOGO: ImageSlot = ImageSlot {
    bounds: (352, 352),
    origin: Point::new(784.0, 233.0),
    rotation_deg: 0.0,
    align: SlotAlign::CenterInBounds,
};

const PFP_BOUNDS: (u32, u32) = (303, 303);
const CARD_BOUNDS: (u32, u32) = (579, 826);

pub fn pfp(side: Side) -> ImageSlot {
    ImageSlot {
        bounds: PFP_BOUNDS,
        origin: side.pick(Point::new(508.0, 825.0), Point::new(1073.0, 825.0)),
        rotation_deg: 0.0,
        align: SlotAlign::TopLeft,
    }
}

pub fn back_card(side: Side) -> ImageSlot {
    ImageSlot {
        bounds: CARD_BOUNDS,
        origin: side.pick(Point::new(-98.0, 294.0), Point::new(1130.0, 332.0)),
        rotation_deg: side.pick(332.4, 23.3),
        align: SlotAlign::TopLeft,
    }
}

pub fn front_card(side: Side) -> ImageSlot {
    ImageSlot {
        bounds: CARD_BOUNDS,
        origin: side.pick(Point::new(-189.0, 294.0), Point::new(1383.0, 332.0)),
        rotation_deg: side.pick(351.8, 11.4),
        align: SlotAlign::TopLeft,
    }
}

pub const TITLE: TextSlot = TextSlot {
    anchor: Point::new(960.0, -7.0),
    font: FontRole::Title,
    face_index: FACE_BOLD,
    size_px: 130.0,
    stroke_width: 0.0,
};

pub const SUBTITLE: TextSlot = TextSlot {
    anchor: Point::new(960.0, 137.0),
    font: FontRole::Title,
    face_index: FACE_BOLD_ITALIC,
    size_px: 70.0,
    stroke_width: 0.0,
};

pub const VERSUS: TextSlot = TextSlot {
    anchor: Point::new(960.0, 800.0),
    font: FontRole::Deckname,
    face_index: FACE_REGULAR,
    size_px: 80.0,
    stroke_width: 2.0,
};

pub fn player_name(side: Side) -> TextSlot {
    TextSlot {
        anchor: side.pick(Point::new(384.0, 183.0), Point::new(1536.0, 183.0)),
        font: FontRole::Title,
        face_index: FACE_BOLD,
        size_px: 68.0,
        stroke_width: 0.0,
    }
}

pub fn deck_name(side: Side) -> TextSlot {
    TextSlot {
        anchor: side.pick(Point::new(960.0, 667.0), Point::new(960.0, 906.0)),
        font: FontRole::Deckname,
        face_index: FACE_REGULAR,
        size_px: 110.0,
        stroke_width: 2.0,
    }
}

/// Integer size of the box that holds a `width`×`height` image rotated by `rotation_deg`.
pub fn rotated_bounds(width: u32, height: u32, rotation_deg: f64) -> (f64, f64) {
    let (w, h) = (f64::from(width), f64::from(height));
    let rot = rotation(rotation_deg);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ]
    .map(|p| rot * p);

    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    // Trim float noise so axis-aligned rotations keep their exact size.
    let snap = |v: f64| (v * 1e6).round() / 1e6;
    (
        snap(max_x).ceil() - snap(min_x).floor(),
        snap(max_y).ceil() - snap(min_y).floor(),
    )
}

/// Transform mapping a `width`×`height` image (in its own pixel space) onto the canvas.
pub fn slot_transform(slot: &ImageSlot, width: u32, height: u32) -> Affine {
    let (w, h) = (f64::from(width), f64::from(height));
    let (bw, bh) = rotated_bounds(width, height, slot.rotation_deg);

    let top_left = match slot.align {
        SlotAlign::TopLeft => slot.origin.to_vec2(),
        SlotAlign::CenterInBounds => {
            let (sw, sh) = (f64::from(slot.bounds.0), f64::from(slot.bounds.1));
            let inset = Vec2::new(((sw - bw) / 2.0).floor(), ((sh - bh) / 2.0).floor());
            slot.origin.to_vec2() + inset
        }
    };

    Affine::translate(top_left + Vec2::new(bw / 2.0, bh / 2.0))
        * rotation(slot.rotation_deg)
        * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0))
}

// kurbo angles turn clockwise on a y-down canvas.
fn rotation(rotation_deg: f64) -> Affine {
    Affine::rotate(-rotation_deg.to_radians())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod tests;
