//! Playlist panel: items, sequencer transport, playlist files

use std::collections::HashMap;

use iced::widget::{button, checkbox, column, container, row, scrollable, text, text_input, Space};
use iced::{Alignment, Element, Length};
use lissgen_core::codec::describe_preset;
use lissgen_core::playlist::{Playlist, Sequencer};
use lissgen_widgets::button_styles::{action_style, toggle_style, DEFAULT_BG};
use lissgen_widgets::theme::PLAYING_COLOR;

#[derive(Debug, Clone)]
pub enum PlaylistMessage {
    /// Duration field for new items edited
    NewDurationChanged(String),
    /// Append the current rows as an item
    AddCurrent,
    Remove(usize),
    MoveUp(usize),
    MoveDown(usize),
    /// Copy an item's rows into the editor
    Edit(usize),
    /// Start the sequencer at this item
    PlayFrom(usize),
    DurationInput(usize, String),
    DurationSubmit(usize),
    SetLoop(bool),
    Start,
    Stop,
    Clear,
    FileNameChanged(String),
    LoadFile,
    SaveFile,
}

/// Parse a duration field: positive finite seconds
pub fn parse_duration(input: &str) -> Option<f32> {
    input
        .trim()
        .trim_end_matches('s')
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Text fields owned by the panel
#[derive(Debug, Clone, Default)]
pub struct PlaylistDrafts {
    /// Duration for the next added item
    pub new_duration: String,
    /// Per-item duration edits, by index
    pub durations: HashMap<usize, String>,
    /// Playlist file name
    pub file_name: String,
}

fn action(label: &'static str, message: Option<PlaylistMessage>) -> Element<'static, PlaylistMessage> {
    button(text(label).size(12))
        .on_press_maybe(message)
        .padding([2, 6])
        .style(|_theme, status| action_style(status, DEFAULT_BG))
        .into()
}

pub fn view<'a>(
    playlist: &'a Playlist,
    sequencer: &'a Sequencer,
    drafts: &'a PlaylistDrafts,
) -> Element<'a, PlaylistMessage> {
    let playing = sequencer.current_index();

    let status = match (playing, sequencer.remaining()) {
        (Some(index), Some(remaining)) => {
            format!("Item {}/{} · {:.1}s left", index + 1, playlist.len(), remaining.max(0.0))
        }
        _ => format!(
            "{} items · {:.1}s per pass",
            playlist.len(),
            playlist.total_duration()
        ),
    };

    let header = row![
        text("Playlist").size(16),
        Space::new().width(Length::Fill),
        text(status).size(12),
    ]
    .align_y(Alignment::Center);

    let transport = row![
        button(text("▶ Start").size(12))
            .on_press_maybe((!playlist.is_empty()).then_some(PlaylistMessage::Start))
            .padding([2, 8])
            .style(move |_theme, status| toggle_style(status, playing.is_some(), PLAYING_COLOR)),
        action("■ Stop", playing.map(|_| PlaylistMessage::Stop)),
        checkbox(playlist.is_looping())
            .label("Loop")
            .on_toggle(PlaylistMessage::SetLoop)
            .size(14),
        Space::new().width(Length::Fill),
        action("Clear", (!playlist.is_empty()).then_some(PlaylistMessage::Clear)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let add = row![
        text_input("seconds", &drafts.new_duration)
            .on_input(PlaylistMessage::NewDurationChanged)
            .on_submit(PlaylistMessage::AddCurrent)
            .size(13)
            .width(Length::Fixed(70.0)),
        action("+ Add current", Some(PlaylistMessage::AddCurrent)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let last = playlist.len().saturating_sub(1);
    let items: Vec<Element<PlaylistMessage>> = playlist
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if playing == Some(i) { "▶" } else { " " };
            let duration = drafts
                .durations
                .get(&i)
                .cloned()
                .unwrap_or_else(|| format!("{:.3}", item.duration));
            row![
                text(format!("{} {:>2}.", marker, i + 1)).size(12).width(Length::Fixed(36.0)),
                text(describe_preset(&item.preset)).size(12).width(Length::Fixed(60.0)),
                text_input("s", &duration)
                    .on_input(move |s| PlaylistMessage::DurationInput(i, s))
                    .on_submit(PlaylistMessage::DurationSubmit(i))
                    .size(12)
                    .width(Length::Fixed(70.0)),
                action("Edit", Some(PlaylistMessage::Edit(i))),
                action("Play", Some(PlaylistMessage::PlayFrom(i))),
                action("↑", (i > 0).then_some(PlaylistMessage::MoveUp(i))),
                action("↓", (i < last).then_some(PlaylistMessage::MoveDown(i))),
                action("✕", Some(PlaylistMessage::Remove(i))),
            ]
            .spacing(4)
            .align_y(Alignment::Center)
            .into()
        })
        .collect();

    let list: Element<PlaylistMessage> = if items.is_empty() {
        text("Empty. Add the current rows to start a playlist.").size(12).into()
    } else {
        scrollable(column(items).spacing(4))
            .height(Length::Fixed(160.0))
            .into()
    };

    let files = row![
        text_input("playlist.lsjp", &drafts.file_name)
            .on_input(PlaylistMessage::FileNameChanged)
            .size(13)
            .width(Length::Fill),
        action("Load", Some(PlaylistMessage::LoadFile)),
        action("Save", Some(PlaylistMessage::SaveFile)),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    container(column![header, transport, add, list, files].spacing(6))
        .padding(8)
        .width(Length::Fill)
        .into()
}
