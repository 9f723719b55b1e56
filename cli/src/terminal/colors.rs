use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const ALLOW: Color = Color::Green;
pub const DENY: Color = Color::Yellow;
pub const FAIL: Color = Color::Red;
