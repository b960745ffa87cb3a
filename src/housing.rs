//! The traffic light drawing shown on the graphic display.
//!
//! The housing is an outlined rectangle split into three equal cells, red on top. The letter of
//! the active phase is written inside its cell. Every draw starts from a cleared buffer, there is
//! no partial update.

use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::phase::DayPhase;

pub const HOUSING_LEFT: i32 = 54;
pub const HOUSING_RIGHT: i32 = 74;
pub const HOUSING_TOP: i32 = 2;
pub const HOUSING_BOTTOM: i32 = 62;
/// Height of each of the three cells
pub const CELL_HEIGHT: i32 = (HOUSING_BOTTOM - HOUSING_TOP) / 3;

const GLYPH_WIDTH: i32 = 6;
const GLYPH_HEIGHT: i32 = 10;

/// Top edge (on the outline) of the cell used by `phase`
pub const fn cell_top(phase: DayPhase) -> i32 {
    HOUSING_TOP + CELL_HEIGHT * phase.index() as i32
}

/// Interior of the cell used by `phase`, outline excluded
pub fn cell_interior(phase: DayPhase) -> Rectangle {
    Rectangle::with_corners(
        Point::new(HOUSING_LEFT + 1, cell_top(phase) + 1),
        Point::new(HOUSING_RIGHT - 1, cell_top(phase) + CELL_HEIGHT - 1),
    )
}

/// Top left corner of the letter for `phase`, centred in its cell
pub fn letter_origin(phase: DayPhase) -> Point {
    let interior = cell_interior(phase);
    interior.top_left
        + Point::new(
            (interior.size.width as i32 - GLYPH_WIDTH) / 2,
            (interior.size.height as i32 - GLYPH_HEIGHT) / 2,
        )
}

/// Clears `target` and draws the housing with the letter of `phase` in its cell.
///
/// With `inverted` set the background is lit and the drawing is dark.
pub fn draw_housing<D>(target: &mut D, phase: DayPhase, inverted: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let (background, ink) = if inverted {
        (BinaryColor::On, BinaryColor::Off)
    } else {
        (BinaryColor::Off, BinaryColor::On)
    };
    target.clear(background)?;

    let outline = PrimitiveStyle::with_stroke(ink, 1);
    Rectangle::with_corners(
        Point::new(HOUSING_LEFT, HOUSING_TOP),
        Point::new(HOUSING_RIGHT, HOUSING_BOTTOM),
    )
    .into_styled(outline)
    .draw(target)?;
    for divider in 1..3 {
        let y = HOUSING_TOP + divider * CELL_HEIGHT;
        Line::new(Point::new(HOUSING_LEFT, y), Point::new(HOUSING_RIGHT, y))
            .into_styled(outline)
            .draw(target)?;
    }

    let mut utf8 = [0u8; 4];
    let letter = phase.letter().encode_utf8(&mut utf8);
    Text::with_baseline(
        letter,
        letter_origin(phase),
        MonoTextStyle::new(&FONT_6X10, ink),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}
