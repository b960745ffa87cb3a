//! The 5×5 addressable LED matrix: colour packing, the predefined frames and frame rendering.
//!
//! The matrix is a single chain of WS2812-style LEDs. Each LED takes one 32 bit word whose bytes
//! are, from the most significant down, green, red, blue and padding. The chain is wired so that
//! the first word on the wire lands on the last cell of the frame in raster order, which is why
//! frames are streamed back to front.

use smart_leds::RGB8;

use crate::{MATRIX_PIXELS, MATRIX_SIDE, hal::PixelStream};

/// A colour packed in the matrix wire order `G R B pad`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelWord(pub u32);

impl PixelWord {
    pub const OFF: PixelWord = PixelWord(0);

    pub const fn green(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

impl From<PixelWord> for RGB8 {
    fn from(word: PixelWord) -> Self {
        RGB8::new(word.red(), word.green(), word.blue())
    }
}

impl From<RGB8> for PixelWord {
    fn from(colour: RGB8) -> Self {
        PixelWord((u32::from(colour.g) << 24) | (u32::from(colour.r) << 16) | (u32::from(colour.b) << 8))
    }
}

/// Packs three normalised channels (0.0 to 1.0) into a [`PixelWord`].
///
/// Values outside the range saturate at 0 and 255.
pub fn matrix_rgb(r: f32, g: f32, b: f32) -> PixelWord {
    PixelWord::from(RGB8::new(channel(r), channel(g), channel(b)))
}

fn channel(level: f32) -> u8 {
    // Float to int `as` casts saturate and map NaN to 0
    (level * 255.0) as u8
}

/// Symbolic content of one matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CellColor {
    Off = 0,
    Red = 1,
    Yellow = 2,
    Green = 3,
}

impl CellColor {
    /// The numeric cell value used in the frame tables
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Wire word for this cell
    pub fn word(self) -> PixelWord {
        match self {
            CellColor::Off => matrix_rgb(0.0, 0.0, 0.0),
            CellColor::Red => matrix_rgb(1.0, 0.0, 0.0),
            CellColor::Yellow => matrix_rgb(1.0, 1.0, 0.0),
            CellColor::Green => matrix_rgb(0.0, 1.0, 0.0),
        }
    }
}

/// An immutable 5×5 bitmap, stored in raster order (top row first, left to right)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    cells: [CellColor; MATRIX_PIXELS],
}

impl Frame {
    pub const fn new(cells: [CellColor; MATRIX_PIXELS]) -> Self {
        Self { cells }
    }

    pub const fn cell(&self, row: usize, col: usize) -> CellColor {
        self.cells[row * MATRIX_SIDE + col]
    }

    /// Cells in the order they have to go out on the wire: last raster cell first
    pub fn stream_order(&self) -> impl Iterator<Item = CellColor> + '_ {
        self.cells.iter().rev().copied()
    }
}

const O: CellColor = CellColor::Off;
const R: CellColor = CellColor::Red;
const Y: CellColor = CellColor::Yellow;
const G: CellColor = CellColor::Green;

#[rustfmt::skip]
pub const DOT_TOP: Frame = Frame::new([
    O, O, R, O, O,
    O, O, O, O, O,
    O, O, O, O, O,
    O, O, O, O, O,
    O, O, O, O, O,
]);

#[rustfmt::skip]
pub const DOT_CENTER: Frame = Frame::new([
    O, O, O, O, O,
    O, O, O, O, O,
    O, O, Y, O, O,
    O, O, O, O, O,
    O, O, O, O, O,
]);

#[rustfmt::skip]
pub const DOT_BOTTOM: Frame = Frame::new([
    O, O, O, O, O,
    O, O, O, O, O,
    O, O, O, O, O,
    O, O, O, O, O,
    O, O, G, O, O,
]);

pub const BLANK: Frame = Frame::new([O; MATRIX_PIXELS]);

/// Names for the four predefined frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameId {
    DotTop,
    DotCenter,
    DotBottom,
    Blank,
}

impl FrameId {
    pub const fn frame(self) -> &'static Frame {
        match self {
            FrameId::DotTop => &DOT_TOP,
            FrameId::DotCenter => &DOT_CENTER,
            FrameId::DotBottom => &DOT_BOTTOM,
            FrameId::Blank => &BLANK,
        }
    }
}

/// Wire words for a whole frame, in transmission order
pub fn encode_frame(frame: &Frame) -> [PixelWord; MATRIX_PIXELS] {
    let mut words = [PixelWord::OFF; MATRIX_PIXELS];
    for (word, cell) in words.iter_mut().zip(frame.stream_order()) {
        *word = cell.word();
    }
    words
}

/// Streams all 25 words of `frame`. Returns only once the last word has been accepted, so a frame
/// is never interleaved with the next one.
pub async fn render_frame<S: PixelStream>(stream: &mut S, frame: &Frame) {
    for word in encode_frame(frame) {
        stream.send(word).await;
    }
}
