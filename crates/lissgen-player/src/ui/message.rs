//! Application messages for the LissGen player

use std::time::Instant;

use iced::widget::text_editor;
use lissgen_core::wave::FrequencyStep;
use lissgen_core::Channel;

use super::channel_view::ChannelMessage;
use super::display_view::DisplayMessage;
use super::playlist_view::PlaylistMessage;

#[derive(Debug, Clone)]
pub enum Message {
    /// Frame tick: advance the sequencer, rebuild the scope frame
    Tick(Instant),
    /// Row edits of one channel
    Channel(Channel, ChannelMessage),
    SwapChannels,
    /// Step used by the frequency -/+ buttons
    SetStep(FrequencyStep),

    // Transport
    Play,
    Stop,
    ToggleAudioMute,

    // Live text editor
    TextAction(text_editor::Action),
    TextRefresh,
    TextApply,

    // Wave files
    FileNameChanged(String),
    LoadWave,
    SaveWave,

    Playlist(PlaylistMessage),
    Display(DisplayMessage),
}
