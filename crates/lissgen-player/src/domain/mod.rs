//! Domain layer for the LissGen player
//!
//! Separates the UI from the synth:
//! - **UI Layer**: display and user input only
//! - **Domain Layer**: the authoritative wave store, playlist and sequencer
//! - **Engine**: reached only through the lock-free command queue
//!
//! Every wave edit goes through [`LissDomain::edit_wave`], which publishes a
//! fresh snapshot to the engine. A full queue is not fatal: the snapshot is
//! re-published on the next tick.
//!
//! ```ignore
//! domain.edit_wave(|wave| wave.toggle_muted(Channel::Left, 0));
//! domain.play();
//! if let Some(event) = domain.tick(dt) { /* update status */ }
//! ```

use std::path::Path;
use std::sync::Arc;

use lissgen_core::codec::{
    describe_preset, format_text_buffer, load_playlist_file, load_wave_file, parse_text_buffer,
    save_playlist_file, save_wave_file, CodecResult, ParseError,
};
use lissgen_core::engine::{CommandSender, SynthAtomics, SynthCommand};
use lissgen_core::playlist::{Playlist, Sequencer, SequencerEvent};
use lissgen_core::render::{build_trace_frame, RenderSettings, TraceFrame};
use lissgen_core::trace::TraceBuffer;
use lissgen_core::wave::WaveState;
use lissgen_core::TracePoint;

/// Orchestrates the wave store, playlist and engine commands
pub struct LissDomain {
    wave: WaveState,
    playlist: Playlist,
    sequencer: Sequencer,
    /// None in UI-only mode
    sender: Option<CommandSender>,
    atomics: Arc<SynthAtomics>,
    trace: Arc<TraceBuffer>,
    /// Latest snapshot has not reached the queue yet
    publish_pending: bool,
    /// Reused for trace snapshots
    trace_scratch: Vec<TracePoint>,
}

impl LissDomain {
    /// Create the domain and publish the start-up wave
    pub fn new(
        sender: Option<CommandSender>,
        atomics: Arc<SynthAtomics>,
        trace: Arc<TraceBuffer>,
    ) -> Self {
        let capacity = trace.capacity();
        let mut domain = Self {
            wave: WaveState::new(),
            playlist: Playlist::new(),
            sequencer: Sequencer::new(),
            sender,
            atomics,
            trace,
            publish_pending: false,
            trace_scratch: Vec::with_capacity(capacity),
        };
        domain.publish_wave();
        domain
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn wave(&self) -> &WaveState {
        &self.wave
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn atomics(&self) -> &SynthAtomics {
        &self.atomics
    }

    /// Audio device available
    pub fn is_audio_connected(&self) -> bool {
        self.sender.is_some()
    }

    /// Engine is producing sound
    pub fn is_running(&self) -> bool {
        self.atomics.is_running()
    }

    pub fn is_audio_muted(&self) -> bool {
        self.atomics.is_audio_muted()
    }

    // =========================================================================
    // Engine commands
    // =========================================================================

    fn send(&mut self, cmd: SynthCommand) -> bool {
        let Some(sender) = self.sender.as_mut() else {
            log::debug!("No audio, dropping {:?}", cmd);
            return false;
        };
        match sender.send(cmd) {
            Ok(()) => true,
            Err(cmd) => {
                log::warn!("Command queue full, dropping {:?}", cmd);
                false
            }
        }
    }

    /// Hand the current rows to the engine
    fn publish_wave(&mut self) {
        if self.sender.is_none() {
            return;
        }
        let cmd = SynthCommand::load_wave(self.wave.snapshot());
        self.publish_pending = !self.send(cmd);
    }

    /// Apply an edit to the wave store; publishes if `edit` reports a change
    pub fn edit_wave(&mut self, edit: impl FnOnce(&mut WaveState) -> bool) -> bool {
        let changed = edit(&mut self.wave);
        if changed {
            self.publish_wave();
        }
        changed
    }

    /// Start producing from phase 0
    pub fn play(&mut self) {
        if self.publish_pending {
            self.publish_wave();
        }
        if self.send(SynthCommand::Play) {
            log::info!("Play ({})", describe_preset(&self.wave.to_preset()));
        }
    }

    pub fn stop(&mut self) {
        if self.send(SynthCommand::Stop) {
            log::info!("Stop");
        }
    }

    pub fn set_audio_muted(&mut self, muted: bool) {
        self.send(SynthCommand::SetAudioMuted(muted));
    }

    // =========================================================================
    // Frame tick
    // =========================================================================

    /// Advance the sequencer by `dt` seconds and retry a pending publish
    ///
    /// The sequencer only moves while the engine is producing sound.
    pub fn tick(&mut self, dt: f32) -> Option<SequencerEvent> {
        if self.publish_pending {
            self.publish_wave();
        }
        let event = self
            .sequencer
            .tick(&self.playlist, dt, self.atomics.is_running())?;
        self.apply_sequencer_event(event);
        Some(event)
    }

    fn apply_sequencer_event(&mut self, event: SequencerEvent) {
        match event {
            SequencerEvent::Started(index) | SequencerEvent::Advanced(index) => {
                self.load_playlist_item(index);
            }
            SequencerEvent::Finished => log::info!("Playlist finished"),
        }
    }

    /// Current scope frame built from the trace buffer
    pub fn trace_frame(&mut self, settings: &RenderSettings) -> TraceFrame {
        self.trace.snapshot_into(&mut self.trace_scratch);
        build_trace_frame(&self.trace_scratch, settings)
    }

    // =========================================================================
    // Playlist
    // =========================================================================

    /// Append the current rows as a new item
    pub fn add_current_to_playlist(&mut self, duration: f32) -> usize {
        let index = self.playlist.add_item(self.wave.to_preset(), duration);
        log::info!(
            "Playlist item {} added ({}s)",
            index + 1,
            self.playlist.items()[index].duration
        );
        index
    }

    /// Copy an item's preset into the editor
    pub fn load_playlist_item(&mut self, index: usize) -> bool {
        let Some(item) = self.playlist.get(index) else {
            return false;
        };
        let preset = item.preset.clone();
        self.wave.load_preset(&preset);
        self.publish_wave();
        log::debug!("Loaded playlist item {} ({})", index + 1, describe_preset(&preset));
        true
    }

    pub fn remove_playlist_item(&mut self, index: usize) -> bool {
        if self.playlist.remove_item(index).is_none() {
            return false;
        }
        self.sequencer.item_removed(&self.playlist, index);
        true
    }

    pub fn move_playlist_item(&mut self, from: usize, to: usize) -> bool {
        if !self.playlist.move_item(from, to) {
            return false;
        }
        self.sequencer.item_moved(from, to);
        true
    }

    pub fn set_item_duration(&mut self, index: usize, seconds: f32) -> bool {
        self.playlist.set_duration(index, seconds)
    }

    pub fn set_playlist_loop(&mut self, looping: bool) {
        self.playlist.set_loop(looping);
    }

    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
        self.sequencer.stop();
    }

    /// Start the playlist at `index`, loading that item's preset
    ///
    /// Also starts the engine if it is stopped, since the sequencer only
    /// advances while sound is produced.
    pub fn start_playlist_at(&mut self, index: usize) -> bool {
        let Some(event) = self.sequencer.jump_to(&self.playlist, index) else {
            return false;
        };
        self.apply_sequencer_event(event);
        if !self.is_running() {
            self.play();
        }
        true
    }

    pub fn stop_playlist(&mut self) {
        self.sequencer.stop();
    }

    // =========================================================================
    // Files
    // =========================================================================

    pub fn load_wave(&mut self, path: &Path) -> CodecResult<()> {
        let preset = load_wave_file(path)?;
        self.wave.load_preset(&preset);
        self.publish_wave();
        Ok(())
    }

    pub fn save_wave(&self, path: &Path) -> CodecResult<()> {
        save_wave_file(path, &self.wave.to_preset())
    }

    /// Replace the playlist; a playing sequencer stops
    pub fn load_playlist(&mut self, path: &Path) -> CodecResult<usize> {
        let items = load_playlist_file(path)?;
        let count = items.len();
        self.sequencer.stop();
        self.playlist.replace_items(items);
        Ok(count)
    }

    pub fn save_playlist(&self, path: &Path) -> CodecResult<()> {
        save_playlist_file(path, self.playlist.items())
    }

    // =========================================================================
    // Live text editor
    // =========================================================================

    /// Editor buffer for the current rows
    pub fn text_buffer(&self) -> String {
        format_text_buffer(&self.wave.to_preset())
    }

    /// Replace both channels from the editor buffer
    ///
    /// On error nothing changes.
    pub fn apply_text(&mut self, text: &str) -> Result<(), ParseError> {
        let preset = parse_text_buffer(text)?;
        self.wave.load_preset(&preset);
        self.publish_wave();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lissgen_core::engine::command_channel;
    use lissgen_core::playlist::SequencerState;
    use lissgen_core::synth::Waveform;
    use lissgen_core::Channel;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn connected() -> (LissDomain, rtrb::Consumer<SynthCommand>) {
        let (producer, consumer) = command_channel();
        let domain = LissDomain::new(
            Some(CommandSender::new(producer)),
            Arc::new(SynthAtomics::new()),
            Arc::new(TraceBuffer::with_capacity(16)),
        );
        (domain, consumer)
    }

    fn ui_only() -> LissDomain {
        LissDomain::new(
            None,
            Arc::new(SynthAtomics::new()),
            Arc::new(TraceBuffer::with_capacity(16)),
        )
    }

    fn drain(rx: &mut rtrb::Consumer<SynthCommand>) -> Vec<SynthCommand> {
        let mut out = Vec::new();
        while let Ok(cmd) = rx.pop() {
            out.push(cmd);
        }
        out
    }

    #[test]
    fn test_startup_publishes_wave() {
        let (_domain, mut rx) = connected();
        let cmds = drain(&mut rx);
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            SynthCommand::LoadWave(snapshot) => {
                assert_eq!(snapshot.left.len(), 1);
                assert_eq!(snapshot.right.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_edit_publishes_only_on_change() {
        let (mut domain, mut rx) = connected();
        drain(&mut rx);

        assert!(domain.edit_wave(|w| w.set_waveform(Channel::Left, 0, Waveform::Square)));
        assert!(!domain.edit_wave(|w| w.set_muted(Channel::Left, 9, true)));

        let cmds = drain(&mut rx);
        assert_eq!(cmds.len(), 1);
        let SynthCommand::LoadWave(snapshot) = &cmds[0] else {
            panic!("expected LoadWave");
        };
        assert_eq!(snapshot.left[0].params.waveform, Waveform::Square);
    }

    #[test]
    fn test_transport_commands() {
        let (mut domain, mut rx) = connected();
        drain(&mut rx);
        domain.play();
        domain.set_audio_muted(true);
        domain.stop();
        let names: Vec<String> = drain(&mut rx).iter().map(|c| format!("{:?}", c)).collect();
        assert_eq!(names, vec!["Play", "SetAudioMuted(true)", "Stop"]);
    }

    #[test]
    fn test_full_queue_republishes_on_tick() {
        let (mut domain, mut rx) = connected();
        // Fill the queue with edits
        for _ in 0..100 {
            domain.edit_wave(|w| {
                w.add_row(Channel::Right);
                true
            });
        }
        assert!(domain.publish_pending);
        drain(&mut rx);

        domain.tick(0.0);
        assert!(!domain.publish_pending);
        let cmds = drain(&mut rx);
        let SynthCommand::LoadWave(snapshot) = &cmds[0] else {
            panic!("expected LoadWave");
        };
        assert_eq!(snapshot.right.len(), domain.wave().rows(Channel::Right).len());
    }

    #[test]
    fn test_ui_only_mode() {
        let mut domain = ui_only();
        assert!(!domain.is_audio_connected());
        domain.play();
        assert!(!domain.is_running());

        // Playlist never advances without audio
        domain.add_current_to_playlist(0.5);
        domain.add_current_to_playlist(0.5);
        assert!(domain.start_playlist_at(0));
        assert_eq!(domain.tick(10.0), None);
        assert_eq!(domain.sequencer().current_index(), Some(0));
    }

    #[test]
    fn test_sequencer_loads_presets() {
        let (mut domain, mut rx) = connected();
        domain.add_current_to_playlist(1.0);
        domain.edit_wave(|w| w.set_frequency(Channel::Left, 0, 880.0));
        domain.add_current_to_playlist(1.0);

        assert!(domain.start_playlist_at(0));
        assert_eq!(domain.wave().rows(Channel::Left)[0].params.frequency, 440.0);

        domain.atomics.running.store(true, Ordering::Relaxed);
        drain(&mut rx);
        assert_eq!(domain.tick(1.0), Some(SequencerEvent::Advanced(1)));
        assert_eq!(domain.wave().rows(Channel::Left)[0].params.frequency, 880.0);
        assert_eq!(drain(&mut rx).len(), 1);

        assert_eq!(domain.tick(1.0), Some(SequencerEvent::Finished));
        assert_eq!(domain.sequencer().state(), SequencerState::Stopped);
    }

    #[test]
    fn test_playlist_start_starts_engine() {
        let (mut domain, mut rx) = connected();
        domain.add_current_to_playlist(1.0);
        drain(&mut rx);

        assert!(domain.start_playlist_at(0));
        let names: Vec<String> = drain(&mut rx)
            .iter()
            .map(|c| match c {
                SynthCommand::LoadWave(_) => "LoadWave".to_string(),
                other => format!("{:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["LoadWave", "Play"]);

        // Already running: jumping only loads the item
        domain.atomics.running.store(true, Ordering::Relaxed);
        assert!(domain.start_playlist_at(0));
        let cmds = drain(&mut rx);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], SynthCommand::LoadWave(_)));

        assert!(!domain.start_playlist_at(4));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_removing_items_keeps_sequencer_valid() {
        let mut domain = ui_only();
        for _ in 0..3 {
            domain.add_current_to_playlist(1.0);
        }
        domain.start_playlist_at(2);
        assert!(domain.remove_playlist_item(0));
        assert_eq!(domain.sequencer().current_index(), Some(1));
        assert!(!domain.remove_playlist_item(5));
        domain.clear_playlist();
        assert!(!domain.sequencer().is_playing());
    }

    #[test]
    fn test_apply_text() {
        let mut domain = ui_only();
        domain.apply_text("L:{S100,Q200}\nR:{W300(M)}").unwrap();
        assert_eq!(domain.wave().rows(Channel::Left).len(), 2);
        assert!(domain.wave().rows(Channel::Right)[0].params.muted);

        let before = domain.wave().to_preset();
        let err = domain.apply_text("L:{S100}\nR:{S1,S2,oops}").unwrap_err();
        assert_eq!(err.to_string(), "Channel R, item 3: 'oops' is invalid.");
        assert_eq!(domain.wave().to_preset(), before);
    }

    #[test]
    fn test_text_buffer_reflects_rows() {
        let domain = ui_only();
        assert_eq!(domain.text_buffer(), "L:{S440.000}\nR:{S440.000}");
    }

    #[test]
    fn test_wave_and_playlist_files() {
        let dir = TempDir::new().unwrap();
        let wave_path = dir.path().join("a.lsj");
        let list_path = dir.path().join("set.lsjp");

        let mut domain = ui_only();
        domain.edit_wave(|w| w.set_frequency(Channel::Right, 0, 123.5));
        domain.save_wave(&wave_path).unwrap();
        domain.add_current_to_playlist(2.0);
        domain.save_playlist(&list_path).unwrap();

        let mut other = ui_only();
        other.load_wave(&wave_path).unwrap();
        assert_eq!(other.wave().to_preset(), domain.wave().to_preset());
        assert_eq!(other.load_playlist(&list_path).unwrap(), 1);
        assert_eq!(other.playlist().items()[0].duration, 2.0);

        assert!(other.load_wave(&dir.path().join("missing.lsj")).is_err());
    }

    #[test]
    fn test_trace_frame_reads_buffer() {
        let mut domain = ui_only();
        assert!(domain.trace_frame(&RenderSettings::default()).is_empty());
        domain.trace.push_slice(&[TracePoint::new(0.0, 0.0), TracePoint::new(0.5, -0.5)]);
        let frame = domain.trace_frame(&RenderSettings::default());
        assert_eq!(frame.vertices.len(), 2);
        assert_eq!(frame.end_marker(), Some((1.0, -1.0)));
    }
}
