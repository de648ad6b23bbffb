//! Main iced application for the LissGen player
//!
//! - Row editors for both channels, live text editor, wave files
//! - Playlist panel driving the sequencer
//! - Scope redrawn on every frame tick at the configured rate

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_editor, text_input, Space};
use iced::{time, Alignment, Element, Fill, Length, Subscription, Task, Theme};
use lissgen_core::audio::{available_output_devices, OutputDevice};
use lissgen_core::codec::{clamp_text_buffer, PLAYLIST_EXTENSION, TEXT_BUFFER_CAPACITY, WAVE_EXTENSION};
use lissgen_core::config::save_config;
use lissgen_core::playlist::{SequencerEvent, DEFAULT_ITEM_DURATION};
use lissgen_core::render::{FrameClock, RenderSettings, TraceFrame};
use lissgen_core::wave::{FrequencyStep, RowId};
use lissgen_core::Channel;
use lissgen_widgets::button_styles::{action_style, toggle_style, DEFAULT_BG};
use lissgen_widgets::lissajous_scope;
use lissgen_widgets::theme::{MUTED_COLOR, PLAYING_COLOR};

use super::channel_view::{self, parse_frequency, ChannelMessage};
use super::display_view::{self, DisplayMessage};
use super::message::Message;
use super::playlist_view::{self, parse_duration, PlaylistDrafts, PlaylistMessage};
use crate::config::PlayerConfig;
use crate::domain::LissDomain;

/// Output stream details shown in the header
#[derive(Debug, Clone)]
pub struct AudioInfo {
    pub device_name: String,
    pub sample_rate: u32,
    pub buffer_size: u32,
    pub latency_ms: f32,
}

/// Resolve a file name typed by the user
///
/// Relative names live in `library`; the extension is added when missing.
/// Returns None for a blank name.
pub fn library_file(library: &Path, name: &str, extension: &str) -> Option<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let mut path = PathBuf::from(name);
    if path.extension().is_none() {
        path.set_extension(extension);
    }
    if path.is_relative() {
        path = library.join(path);
    }
    Some(path)
}

/// Application state
pub struct LissApp {
    domain: LissDomain,
    config: PlayerConfig,
    config_path: PathBuf,
    audio_info: Option<AudioInfo>,
    devices: Vec<OutputDevice>,

    // Scope
    render: RenderSettings,
    clock: FrameClock,
    frame: TraceFrame,

    // Row editing
    step: FrequencyStep,
    frequency_drafts: HashMap<RowId, String>,

    // Text editor
    editor: text_editor::Content,
    editor_error: Option<String>,

    wave_file_name: String,
    playlist_drafts: PlaylistDrafts,

    status: String,
}

impl LissApp {
    pub fn new(
        domain: LissDomain,
        config: PlayerConfig,
        config_path: PathBuf,
        audio_info: Option<AudioInfo>,
    ) -> Self {
        let status = match &audio_info {
            Some(info) => format!("Audio: {} @ {} Hz", info.device_name, info.sample_rate),
            None => "No audio device, running UI only".to_string(),
        };
        let editor = text_editor::Content::with_text(&domain.text_buffer());
        Self {
            render: config.display.render_settings(),
            clock: FrameClock::new(config.display.clamped_target_fps()),
            frame: TraceFrame::default(),
            step: FrequencyStep::default(),
            frequency_drafts: HashMap::new(),
            editor,
            editor_error: None,
            wave_file_name: String::new(),
            playlist_drafts: PlaylistDrafts {
                new_duration: format!("{}", DEFAULT_ITEM_DURATION),
                ..PlaylistDrafts::default()
            },
            domain,
            config,
            config_path,
            audio_info,
            devices: available_output_devices(),
            status,
        }
    }

    fn library(&self) -> &Path {
        &self.config.library_path
    }

    /// Resolve a file name for saving; creates the library folder
    fn save_target(&mut self, name: &str, extension: &str) -> Option<PathBuf> {
        let path = library_file(self.library(), name, extension)?;
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Could not create {:?}: {}", parent, e);
            }
        }
        Some(path)
    }

    fn refresh_editor(&mut self) {
        self.editor = text_editor::Content::with_text(&self.domain.text_buffer());
        self.editor_error = None;
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick(now) => {
                let dt = self.clock.tick(now);
                if let Some(event) = self.domain.tick(dt.as_secs_f32()) {
                    self.on_sequencer_event(event);
                }
                self.frame = self.domain.trace_frame(&self.render);
            }

            Message::Channel(channel, msg) => self.handle_channel(channel, msg),

            Message::SwapChannels => {
                self.domain.edit_wave(|wave| {
                    wave.swap_channels();
                    true
                });
            }

            Message::SetStep(step) => self.step = step,

            Message::Play => self.domain.play(),
            Message::Stop => self.domain.stop(),
            Message::ToggleAudioMute => {
                let muted = !self.domain.is_audio_muted();
                self.domain.set_audio_muted(muted);
            }

            Message::TextAction(action) => {
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    let text = self.editor.text();
                    if text.chars().count() > TEXT_BUFFER_CAPACITY {
                        self.editor = text_editor::Content::with_text(&clamp_text_buffer(text));
                    }
                }
            }
            Message::TextRefresh => self.refresh_editor(),
            Message::TextApply => {
                let text = self.editor.text();
                match self.domain.apply_text(&text) {
                    Ok(()) => {
                        self.editor_error = None;
                        self.frequency_drafts.clear();
                        self.status = "Text applied".to_string();
                    }
                    Err(e) => {
                        log::warn!("Text apply failed: {}", e);
                        self.editor_error = Some(e.to_string());
                    }
                }
            }

            Message::FileNameChanged(name) => self.wave_file_name = name,
            Message::LoadWave => {
                let Some(path) = library_file(self.library(), &self.wave_file_name, WAVE_EXTENSION)
                else {
                    self.status = "Enter a wave file name".to_string();
                    return Task::none();
                };
                match self.domain.load_wave(&path) {
                    Ok(()) => {
                        self.frequency_drafts.clear();
                        self.refresh_editor();
                        self.status = format!("Loaded {}", path.display());
                    }
                    Err(e) => self.status = e.to_string(),
                }
            }
            Message::SaveWave => {
                let name = self.wave_file_name.clone();
                let Some(path) = self.save_target(&name, WAVE_EXTENSION) else {
                    self.status = "Enter a wave file name".to_string();
                    return Task::none();
                };
                self.status = match self.domain.save_wave(&path) {
                    Ok(()) => format!("Saved {}", path.display()),
                    Err(e) => e.to_string(),
                };
            }

            Message::Playlist(msg) => self.handle_playlist(msg),
            Message::Display(msg) => self.handle_display(msg),
        }
        Task::none()
    }

    fn on_sequencer_event(&mut self, event: SequencerEvent) {
        match event {
            SequencerEvent::Started(index) | SequencerEvent::Advanced(index) => {
                self.frequency_drafts.clear();
                self.refresh_editor();
                self.status = format!("Playlist item {}", index + 1);
            }
            SequencerEvent::Finished => self.status = "Playlist finished".to_string(),
        }
    }

    fn handle_channel(&mut self, channel: Channel, msg: ChannelMessage) {
        let step = self.step.hz();
        match msg {
            ChannelMessage::AddRow => {
                self.domain.edit_wave(|wave| wave.add_row(channel).is_some());
            }
            ChannelMessage::Duplicate(i) => {
                self.domain
                    .edit_wave(|wave| wave.duplicate_row(channel, i).is_some());
            }
            ChannelMessage::Remove(i) => {
                if let Some(row) = self.domain.wave().row(channel, i) {
                    self.frequency_drafts.remove(&row.id);
                }
                self.domain
                    .edit_wave(|wave| wave.remove_row(channel, i).is_some());
            }
            ChannelMessage::MoveUp(i) => {
                if i > 0 {
                    self.domain.edit_wave(|wave| wave.move_row(channel, i, i - 1));
                }
            }
            ChannelMessage::MoveDown(i) => {
                self.domain.edit_wave(|wave| wave.move_row(channel, i, i + 1));
            }
            ChannelMessage::FrequencyInput(id, input) => {
                self.frequency_drafts.insert(id, input);
            }
            ChannelMessage::FrequencySubmit(id) => {
                let Some(draft) = self.frequency_drafts.remove(&id) else {
                    return;
                };
                let index = self
                    .domain
                    .wave()
                    .rows(channel)
                    .iter()
                    .position(|row| row.id == id);
                match (index, parse_frequency(&draft)) {
                    (Some(index), Some(frequency)) => {
                        self.domain
                            .edit_wave(|wave| wave.set_frequency(channel, index, frequency));
                    }
                    (Some(_), None) => {
                        self.status = format!("'{}' is not a frequency", draft.trim());
                    }
                    (None, _) => {}
                }
            }
            ChannelMessage::Nudge(i, up) => {
                let delta = if up { step } else { -step };
                self.domain
                    .edit_wave(|wave| wave.nudge_frequency(channel, i, delta));
            }
            ChannelMessage::Double(i) => {
                self.domain
                    .edit_wave(|wave| wave.scale_frequency(channel, i, 2.0));
            }
            ChannelMessage::Halve(i) => {
                self.domain
                    .edit_wave(|wave| wave.scale_frequency(channel, i, 0.5));
            }
            ChannelMessage::ToggleMute(i) => {
                self.domain.edit_wave(|wave| wave.toggle_muted(channel, i));
            }
            ChannelMessage::SetWaveform(i, waveform) => {
                self.domain
                    .edit_wave(|wave| wave.set_waveform(channel, i, waveform));
            }
        }
    }

    fn handle_playlist(&mut self, msg: PlaylistMessage) {
        match msg {
            PlaylistMessage::NewDurationChanged(input) => self.playlist_drafts.new_duration = input,
            PlaylistMessage::AddCurrent => {
                let duration = parse_duration(&self.playlist_drafts.new_duration)
                    .unwrap_or(DEFAULT_ITEM_DURATION);
                let index = self.domain.add_current_to_playlist(duration);
                self.status = format!("Added playlist item {}", index + 1);
            }
            PlaylistMessage::Remove(i) => {
                self.playlist_drafts.durations.clear();
                self.domain.remove_playlist_item(i);
            }
            PlaylistMessage::MoveUp(i) => {
                if i > 0 {
                    self.playlist_drafts.durations.clear();
                    self.domain.move_playlist_item(i, i - 1);
                }
            }
            PlaylistMessage::MoveDown(i) => {
                self.playlist_drafts.durations.clear();
                self.domain.move_playlist_item(i, i + 1);
            }
            PlaylistMessage::Edit(i) => {
                if self.domain.load_playlist_item(i) {
                    self.frequency_drafts.clear();
                    self.refresh_editor();
                }
            }
            PlaylistMessage::PlayFrom(i) => {
                if self.domain.start_playlist_at(i) {
                    self.on_sequencer_event(SequencerEvent::Started(i));
                }
            }
            PlaylistMessage::DurationInput(i, input) => {
                self.playlist_drafts.durations.insert(i, input);
            }
            PlaylistMessage::DurationSubmit(i) => {
                let Some(draft) = self.playlist_drafts.durations.remove(&i) else {
                    return;
                };
                let applied = parse_duration(&draft)
                    .map(|seconds| self.domain.set_item_duration(i, seconds))
                    .unwrap_or(false);
                if !applied {
                    self.status = format!("'{}' is not a valid duration", draft.trim());
                }
            }
            PlaylistMessage::SetLoop(looping) => self.domain.set_playlist_loop(looping),
            PlaylistMessage::Start => {
                if self.domain.start_playlist_at(0) {
                    self.on_sequencer_event(SequencerEvent::Started(0));
                }
            }
            PlaylistMessage::Stop => self.domain.stop_playlist(),
            PlaylistMessage::Clear => {
                self.playlist_drafts.durations.clear();
                self.domain.clear_playlist();
            }
            PlaylistMessage::FileNameChanged(name) => self.playlist_drafts.file_name = name,
            PlaylistMessage::LoadFile => {
                let Some(path) = library_file(
                    self.library(),
                    &self.playlist_drafts.file_name,
                    PLAYLIST_EXTENSION,
                ) else {
                    self.status = "Enter a playlist file name".to_string();
                    return;
                };
                self.playlist_drafts.durations.clear();
                self.status = match self.domain.load_playlist(&path) {
                    Ok(count) => format!("Loaded {} items from {}", count, path.display()),
                    Err(e) => e.to_string(),
                };
            }
            PlaylistMessage::SaveFile => {
                let name = self.playlist_drafts.file_name.clone();
                let Some(path) = self.save_target(&name, PLAYLIST_EXTENSION) else {
                    self.status = "Enter a playlist file name".to_string();
                    return;
                };
                self.status = match self.domain.save_playlist(&path) {
                    Ok(()) => format!("Saved {}", path.display()),
                    Err(e) => e.to_string(),
                };
            }
        }
    }

    fn handle_display(&mut self, msg: DisplayMessage) {
        match msg {
            DisplayMessage::SetTrailPercent(percent) => {
                self.render = RenderSettings::new(percent, self.render.show_endpoints);
            }
            DisplayMessage::SetShowEndpoints(show) => {
                self.render = RenderSettings::new(self.render.trail_percent, show);
            }
            DisplayMessage::SetTargetFps(fps) => self.clock.set_target_fps(fps),
            DisplayMessage::SetDevice(device) => {
                self.status = format!("Output set to {}; save settings and restart to apply", device);
                self.config.audio.device = Some(device.id);
            }
            DisplayMessage::RescanDevices => {
                self.devices = available_output_devices();
                self.status = format!("{} output devices", self.devices.len());
            }
            DisplayMessage::SaveSettings => {
                self.config.display.trail_percent = self.render.trail_percent;
                self.config.display.show_endpoints = self.render.show_endpoints;
                self.config.display.target_fps = self.clock.target_fps();
                self.status = match save_config(&self.config, &self.config_path) {
                    Ok(()) => "Settings saved".to_string(),
                    Err(e) => {
                        log::error!("Failed to save settings: {:#}", e);
                        format!("Failed to save settings: {}", e)
                    }
                };
            }
        }
    }

    /// Frame ticks at the target render rate
    pub fn subscription(&self) -> Subscription<Message> {
        time::every(self.clock.frame_interval()).map(Message::Tick)
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = self.view_header();

        let engine_rows = |channel| {
            self.domain
                .is_running()
                .then(|| self.domain.atomics().row_count(channel))
        };
        let channels = column![
            channel_view::view(
                Channel::Left,
                self.domain.wave().rows(Channel::Left),
                &self.frequency_drafts,
                engine_rows(Channel::Left),
            )
            .map(|m| Message::Channel(Channel::Left, m)),
            channel_view::view(
                Channel::Right,
                self.domain.wave().rows(Channel::Right),
                &self.frequency_drafts,
                engine_rows(Channel::Right),
            )
            .map(|m| Message::Channel(Channel::Right, m)),
        ]
        .spacing(4);

        let controls = column![
            channels,
            self.view_row_tools(),
            self.view_editor(),
            playlist_view::view(
                self.domain.playlist(),
                self.domain.sequencer(),
                &self.playlist_drafts,
            )
            .map(Message::Playlist),
            display_view::view(
                &self.render,
                &self.clock,
                &self.devices,
                self.config.audio.device.as_ref(),
            )
            .map(Message::Display),
        ]
        .spacing(8);

        let main_content = row![
            scrollable(controls).width(Length::FillPortion(2)),
            container(lissajous_scope(&self.frame))
                .width(Length::FillPortion(3))
                .height(Fill),
        ]
        .spacing(10)
        .height(Fill);

        let status_bar = container(text(&self.status).size(12)).padding(5);

        container(column![header, main_content, status_bar].spacing(10).padding(10))
            .width(Fill)
            .height(Fill)
            .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let running = self.domain.is_running();
        let muted = self.domain.is_audio_muted();
        let connected = self.domain.is_audio_connected();

        let play = button(text(if running { "■ Stop" } else { "▶ Play" }))
            .on_press_maybe(connected.then_some(if running { Message::Stop } else { Message::Play }))
            .padding([4, 12])
            .style(move |_theme, status| toggle_style(status, running, PLAYING_COLOR));

        let mute = button(text("Mute"))
            .on_press_maybe(connected.then_some(Message::ToggleAudioMute))
            .padding([4, 12])
            .style(move |_theme, status| toggle_style(status, muted, MUTED_COLOR));

        let device = match &self.audio_info {
            Some(info) => format!(
                "● {} · {} Hz · {} frames ({:.1} ms)",
                info.device_name, info.sample_rate, info.buffer_size, info.latency_ms
            ),
            None => "○ No audio".to_string(),
        };

        row![
            text("LISSGEN").size(24),
            play,
            mute,
            Space::new().width(Fill),
            text(device).size(12),
        ]
        .spacing(12)
        .align_y(Alignment::Center)
        .padding(5)
        .into()
    }

    fn view_row_tools(&self) -> Element<'_, Message> {
        row![
            button(text("Swap L ⇄ R").size(12))
                .on_press(Message::SwapChannels)
                .padding([2, 8])
                .style(|_theme, status| action_style(status, DEFAULT_BG)),
            Space::new().width(Fill),
            text("Step").size(12),
            pick_list(FrequencyStep::ALL, Some(self.step), Message::SetStep).text_size(12),
        ]
        .spacing(8)
        .padding([0, 8])
        .align_y(Alignment::Center)
        .into()
    }

    fn view_editor(&self) -> Element<'_, Message> {
        let editor = text_editor(&self.editor)
            .on_action(Message::TextAction)
            .size(13)
            .height(Length::Fixed(80.0));

        let buttons = row![
            button(text("Refresh").size(12))
                .on_press(Message::TextRefresh)
                .padding([2, 8])
                .style(|_theme, status| action_style(status, DEFAULT_BG)),
            button(text("Apply").size(12))
                .on_press(Message::TextApply)
                .padding([2, 8])
                .style(|_theme, status| action_style(status, DEFAULT_BG)),
            Space::new().width(Fill),
            text_input("wave.lsj", &self.wave_file_name)
                .on_input(Message::FileNameChanged)
                .size(13)
                .width(Length::Fixed(160.0)),
            button(text("Load").size(12))
                .on_press(Message::LoadWave)
                .padding([2, 8])
                .style(|_theme, status| action_style(status, DEFAULT_BG)),
            button(text("Save").size(12))
                .on_press(Message::SaveWave)
                .padding([2, 8])
                .style(|_theme, status| action_style(status, DEFAULT_BG)),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let mut content = column![text("Text").size(16), editor, buttons].spacing(6);
        if let Some(error) = &self.editor_error {
            content = content.push(text(error).size(12).color(MUTED_COLOR));
        }

        container(content).padding(8).width(Fill).into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}
