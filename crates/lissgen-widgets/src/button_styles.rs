//! Raised/pressed button styling
//!
//! - Action buttons (add, remove, apply): raised, pressed in while held
//! - Toggles (play, mute, loop): stay pressed in while active

use iced::widget::button::{Status, Style};
use iced::{Background, Border, Color, Shadow, Vector};

/// Idle button background
pub const DEFAULT_BG: Color = Color::from_rgb(0.22, 0.22, 0.24);

const RADIUS: f32 = 4.0;

fn shift(color: Color, amount: f32) -> Color {
    Color::from_rgb(
        (color.r + amount).clamp(0.0, 1.0),
        (color.g + amount).clamp(0.0, 1.0),
        (color.b + amount).clamp(0.0, 1.0),
    )
}

fn raised(base: Color) -> Style {
    Style {
        background: Some(Background::Color(base)),
        text_color: Color::WHITE,
        border: Border {
            color: shift(base, 0.1),
            width: 1.0,
            radius: RADIUS.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.4),
            offset: Vector::new(1.5, 1.5),
            blur_radius: 3.0,
        },
        snap: false,
    }
}

fn pressed(base: Color) -> Style {
    Style {
        background: Some(Background::Color(shift(base, -0.08))),
        text_color: Color::WHITE,
        border: Border {
            color: shift(base, -0.15),
            width: 1.0,
            radius: RADIUS.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.2),
            offset: Vector::new(0.5, 0.5),
            blur_radius: 1.0,
        },
        snap: false,
    }
}

fn disabled() -> Style {
    Style {
        background: Some(Background::Color(Color::from_rgb(0.16, 0.16, 0.17))),
        text_color: Color::from_rgb(0.45, 0.45, 0.45),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: RADIUS.into(),
        },
        shadow: Shadow::default(),
        snap: false,
    }
}

/// Momentary button in `base` color
///
/// Use with `.style(|_theme, status| action_style(status, DEFAULT_BG))`
pub fn action_style(status: Status, base: Color) -> Style {
    match status {
        Status::Active => raised(base),
        Status::Hovered => raised(shift(base, 0.08)),
        Status::Pressed => pressed(base),
        Status::Disabled => disabled(),
    }
}

/// Toggle button: gray and raised when off, `active_color` and pressed when on
pub fn toggle_style(status: Status, is_active: bool, active_color: Color) -> Style {
    if !is_active {
        return action_style(status, DEFAULT_BG);
    }
    match status {
        Status::Active => pressed(active_color),
        Status::Hovered => pressed(shift(active_color, 0.08)),
        Status::Pressed => pressed(shift(active_color, -0.08)),
        Status::Disabled => disabled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_uses_active_color_only_when_on() {
        let on = toggle_style(Status::Active, true, Color::from_rgb(0.5, 0.5, 0.5));
        let off = toggle_style(Status::Active, false, Color::from_rgb(0.5, 0.5, 0.5));
        assert_eq!(off.background, Some(Background::Color(DEFAULT_BG)));
        assert_ne!(on.background, off.background);
    }

    #[test]
    fn test_shift_clamps() {
        assert_eq!(shift(Color::WHITE, 0.5), Color::WHITE);
        assert_eq!(shift(Color::BLACK, -0.5), Color::BLACK);
    }
}
