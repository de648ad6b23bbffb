//! Lock-free command queue from the UI thread to the synth engine
//!
//! The UI never touches oscillator state directly. Every edit produces a
//! fresh [`WaveSnapshot`] which travels to the audio thread through an
//! `rtrb` SPSC ringbuffer and is adopted between two buffers, so a buffer is
//! always rendered from one consistent row list.
//!
//! Snapshots are wrapped in `basedrop::Shared` so that dropping the old one
//! on the audio thread only enqueues it for the collector thread.

use basedrop::Shared;

use crate::wave::WaveSnapshot;

use super::gc::gc_handle;

/// Commands queued before they are dropped when the audio thread stalls
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Commands sent from the UI thread to the synth engine
pub enum SynthCommand {
    /// Replace both channels' row lists; rows keep their phase by id
    LoadWave(Shared<WaveSnapshot>),
    /// Reset every phase to 0 and start producing
    Play,
    /// Produce silence; phases and trace are frozen
    Stop,
    /// Zero the device output while the trace keeps running
    SetAudioMuted(bool),
}

impl SynthCommand {
    /// Wrap a snapshot for RT-safe hand-off
    pub fn load_wave(snapshot: WaveSnapshot) -> Self {
        SynthCommand::LoadWave(Shared::new(&gc_handle(), snapshot))
    }
}

impl std::fmt::Debug for SynthCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthCommand::LoadWave(snapshot) => write!(
                f,
                "LoadWave({}L/{}R)",
                snapshot.left.len(),
                snapshot.right.len()
            ),
            SynthCommand::Play => write!(f, "Play"),
            SynthCommand::Stop => write!(f, "Stop"),
            SynthCommand::SetAudioMuted(muted) => write!(f, "SetAudioMuted({})", muted),
        }
    }
}

/// Create the command queue
///
/// Returns `(Producer, Consumer)`: the producer goes to the UI thread, the
/// consumer to the audio callback.
pub fn command_channel() -> (rtrb::Producer<SynthCommand>, rtrb::Consumer<SynthCommand>) {
    rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY)
}

/// UI-side end of the command queue
pub struct CommandSender {
    producer: rtrb::Producer<SynthCommand>,
}

impl CommandSender {
    pub fn new(producer: rtrb::Producer<SynthCommand>) -> Self {
        Self { producer }
    }

    /// Send a command to the audio thread
    ///
    /// Returns the command back if the queue is full.
    pub fn send(&mut self, cmd: SynthCommand) -> Result<(), SynthCommand> {
        self.producer.push(cmd).map_err(|e| match e {
            rtrb::PushError::Full(value) => value,
        })
    }

    pub fn has_space(&self) -> bool {
        self.producer.slots() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::WaveState;

    #[test]
    fn test_command_channel_roundtrip() {
        let (tx, mut rx) = command_channel();
        let mut sender = CommandSender::new(tx);
        sender.send(SynthCommand::Play).unwrap();
        sender
            .send(SynthCommand::load_wave(WaveState::new().snapshot()))
            .unwrap();

        assert!(matches!(rx.pop(), Ok(SynthCommand::Play)));
        match rx.pop() {
            Ok(SynthCommand::LoadWave(snapshot)) => assert_eq!(snapshot.left.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(rx.pop().is_err());
    }

    #[test]
    fn test_full_queue_returns_command() {
        let (tx, _rx) = command_channel();
        let mut sender = CommandSender::new(tx);
        for _ in 0..COMMAND_QUEUE_CAPACITY {
            sender.send(SynthCommand::Stop).unwrap();
        }
        assert!(!sender.has_space());
        assert!(matches!(
            sender.send(SynthCommand::Play),
            Err(SynthCommand::Play)
        ));
    }
}
