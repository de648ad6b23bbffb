//! Oscillator rows of one channel

use std::collections::HashMap;

use iced::widget::{button, column, container, pick_list, row, text, text_input, Button, Space};
use iced::{Alignment, Element, Length};
use lissgen_core::synth::Waveform;
use lissgen_core::wave::{Row, RowId};
use lissgen_core::Channel;
use lissgen_widgets::button_styles::{action_style, toggle_style, DEFAULT_BG};
use lissgen_widgets::theme::{channel_color, MUTED_COLOR};

#[derive(Debug, Clone)]
pub enum ChannelMessage {
    AddRow,
    Duplicate(usize),
    Remove(usize),
    MoveUp(usize),
    MoveDown(usize),
    /// Frequency field edited (not yet applied)
    FrequencyInput(RowId, String),
    /// Frequency field submitted with Enter
    FrequencySubmit(RowId),
    /// One step up (true) or down (false)
    Nudge(usize, bool),
    Double(usize),
    Halve(usize),
    ToggleMute(usize),
    SetWaveform(usize, Waveform),
}

/// Parse a frequency field; any finite value is accepted
pub fn parse_frequency(input: &str) -> Option<f32> {
    input
        .trim()
        .trim_end_matches("Hz")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|f| f.is_finite())
}

fn small_button(label: &'static str, message: ChannelMessage) -> Button<'static, ChannelMessage> {
    button(text(label).size(12))
        .on_press(message)
        .padding([2, 6])
        .style(|_theme, status| action_style(status, DEFAULT_BG))
}

fn row_view<'a>(
    index: usize,
    row_data: &'a Row,
    draft: Option<&'a String>,
    is_last: bool,
) -> Element<'a, ChannelMessage> {
    let params = row_data.params;
    let id = row_data.id;

    let frequency = draft
        .cloned()
        .unwrap_or_else(|| format!("{:.3}", params.frequency));
    let frequency_input = text_input("Hz", &frequency)
        .on_input(move |s| ChannelMessage::FrequencyInput(id, s))
        .on_submit(ChannelMessage::FrequencySubmit(id))
        .size(13)
        .width(Length::Fixed(90.0));

    let waveform = pick_list(Waveform::ALL, Some(params.waveform), move |w| {
        ChannelMessage::SetWaveform(index, w)
    })
    .text_size(12)
    .width(Length::Fixed(96.0));

    let mute = button(text("M").size(12))
        .on_press(ChannelMessage::ToggleMute(index))
        .padding([2, 6])
        .style(move |_theme, status| toggle_style(status, params.muted, MUTED_COLOR));

    let mut up = button(text("↑").size(12)).padding([2, 6]);
    if index > 0 {
        up = up.on_press(ChannelMessage::MoveUp(index));
    }
    let mut down = button(text("↓").size(12)).padding([2, 6]);
    if !is_last {
        down = down.on_press(ChannelMessage::MoveDown(index));
    }

    row![
        text(format!("{:>2}", index + 1)).size(12).width(Length::Fixed(20.0)),
        small_button("-", ChannelMessage::Nudge(index, false)),
        frequency_input,
        small_button("+", ChannelMessage::Nudge(index, true)),
        small_button("½", ChannelMessage::Halve(index)),
        small_button("×2", ChannelMessage::Double(index)),
        waveform,
        mute,
        up.style(|_theme, status| action_style(status, DEFAULT_BG)),
        down.style(|_theme, status| action_style(status, DEFAULT_BG)),
        small_button("Dup", ChannelMessage::Duplicate(index)),
        small_button("✕", ChannelMessage::Remove(index)),
    ]
    .spacing(4)
    .align_y(Alignment::Center)
    .into()
}

/// Row list with header for `channel`
///
/// `engine_rows` is what the audio thread currently mixes, shown next to the
/// title so a stalled queue is visible.
pub fn view<'a>(
    channel: Channel,
    rows: &'a [Row],
    drafts: &'a HashMap<RowId, String>,
    engine_rows: Option<u32>,
) -> Element<'a, ChannelMessage> {
    let mut title = format!("{} · {} rows", channel.name(), rows.len());
    if let Some(engine_rows) = engine_rows {
        if engine_rows as usize != rows.len() {
            title.push_str(&format!(" · engine {}", engine_rows));
        }
    }

    let header = row![
        text(title).size(16).color(channel_color(channel)),
        Space::new().width(Length::Fill),
        small_button("+ Row", ChannelMessage::AddRow),
    ]
    .align_y(Alignment::Center);

    let last = rows.len().saturating_sub(1);
    let items: Vec<Element<ChannelMessage>> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| row_view(i, r, drafts.get(&r.id), i == last))
        .collect();

    let body: Element<ChannelMessage> = if items.is_empty() {
        text("No rows (silent)").size(12).into()
    } else {
        column(items).spacing(4).into()
    };

    container(column![header, body].spacing(6))
        .padding(8)
        .width(Length::Fill)
        .into()
}
