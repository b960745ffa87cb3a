pub mod audio;
pub mod display;
pub mod indicator;
pub mod matrix;
pub mod mode_switch;
pub mod reset;

pub use audio::audio_cue;
pub use display::display;
pub use indicator::color_indicator;
pub use matrix::matrix_animator;
pub use mode_switch::mode_switch;
pub use reset::update_button;
