//! Shared colors for the scope and channel controls

use iced::Color;
use lissgen_core::Channel;

/// Scope background
pub const SCOPE_BACKGROUND: Color = Color::from_rgb(0.02, 0.02, 0.03);

/// Center cross
pub const SCOPE_GRID_COLOR: Color = Color::from_rgb(0.15, 0.15, 0.15);

/// Range circles
pub const SCOPE_CIRCLE_COLOR: Color = Color::from_rgb(0.12, 0.12, 0.12);

/// Trail color; alpha is replaced per segment
pub const TRACE_COLOR: Color = Color::from_rgb(0.2, 1.0, 0.4);

/// Oldest visible point
pub const START_MARKER_COLOR: Color = Color::from_rgb(1.0, 0.2, 0.2);

/// Newest visible point
pub const END_MARKER_COLOR: Color = Color::WHITE;

/// Channel accent colors (Left, Right)
///
/// Left drives the scope X axis, Right the Y axis.
pub const CHANNEL_COLORS: [Color; 2] = [
    Color::from_rgb(0.3, 0.6, 0.9), // Left - Blue
    Color::from_rgb(0.9, 0.5, 0.2), // Right - Orange
];

/// Muted row accent
pub const MUTED_COLOR: Color = Color::from_rgb(0.8, 0.2, 0.2);

/// Audio running accent
pub const PLAYING_COLOR: Color = Color::from_rgb(0.2, 0.7, 0.3);

pub fn channel_color(channel: Channel) -> Color {
    match channel {
        Channel::Left => CHANNEL_COLORS[0],
        Channel::Right => CHANNEL_COLORS[1],
    }
}
