//! Scope display settings

use iced::widget::{button, checkbox, column, container, pick_list, row, slider, text, Space};
use iced::{Alignment, Element, Length};
use lissgen_core::audio::{DeviceId, OutputDevice};
use lissgen_core::render::{FrameClock, RenderSettings};
use lissgen_widgets::button_styles::{action_style, DEFAULT_BG};

/// Selectable render rates
pub const FPS_OPTIONS: [u32; 6] = [60, 120, 144, 240, 360, 480];

#[derive(Debug, Clone)]
pub enum DisplayMessage {
    SetTrailPercent(u8),
    SetShowEndpoints(bool),
    SetTargetFps(u32),
    /// Output device for the next start
    SetDevice(OutputDevice),
    RescanDevices,
    /// Write display and audio settings to the config file
    SaveSettings,
}

pub fn view<'a>(
    settings: &RenderSettings,
    clock: &FrameClock,
    devices: &'a [OutputDevice],
    configured: Option<&DeviceId>,
) -> Element<'a, DisplayMessage> {
    let trail = row![
        text("Trail").size(12).width(Length::Fixed(60.0)),
        slider(1..=100u8, settings.trail_percent, DisplayMessage::SetTrailPercent)
            .width(Length::Fill),
        text(format!("{:>3}%", settings.trail_percent)).size(12),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let fps = row![
        text("Target").size(12).width(Length::Fixed(60.0)),
        pick_list(
            FPS_OPTIONS,
            Some(clock.target_fps()),
            DisplayMessage::SetTargetFps
        )
        .text_size(12),
        text(format!(
            "FPS: {:.0} / {}",
            clock.measured_fps(),
            clock.target_fps()
        ))
        .size(12),
        Space::new().width(Length::Fill),
        checkbox(settings.show_endpoints)
            .label("Endpoints")
            .on_toggle(DisplayMessage::SetShowEndpoints)
            .size(14),
        button(text("Save settings").size(12))
            .on_press(DisplayMessage::SaveSettings)
            .padding([2, 8])
            .style(|_theme, status| action_style(status, DEFAULT_BG)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let selected = devices.iter().find(|d| Some(&d.id) == configured);
    let device = row![
        text("Output").size(12).width(Length::Fixed(60.0)),
        pick_list(devices, selected, DisplayMessage::SetDevice)
            .placeholder("System default")
            .text_size(12)
            .width(Length::Fill),
        button(text("Rescan").size(12))
            .on_press(DisplayMessage::RescanDevices)
            .padding([2, 8])
            .style(|_theme, status| action_style(status, DEFAULT_BG)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    container(column![text("Display").size(16), trail, fps, device].spacing(6))
        .padding(8)
        .width(Length::Fill)
        .into()
}
