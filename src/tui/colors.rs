//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Column accents for the two board axes.

/// High priority column.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Medium priority and in-progress columns.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Low priority and done columns.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// To-do column.
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);
