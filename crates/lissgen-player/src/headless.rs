//! Headless playback: `lissgen --headless <file.lsj> [--seconds N]`
//!
//! Plays one wave file through the configured device without a window and
//! logs engine telemetry once per second.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use lissgen_core::audio::{start_audio_system, AudioConfig};
use lissgen_core::codec::{describe_preset, load_wave_file};
use lissgen_core::engine::SynthCommand;
use lissgen_core::wave::WaveState;
use lissgen_core::Channel;

const DEFAULT_SECONDS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessOptions {
    pub wave_file: PathBuf,
    pub seconds: u64,
}

/// Parse headless flags; Ok(None) when `--headless` is absent
pub fn parse_args(args: &[String]) -> Result<Option<HeadlessOptions>> {
    let Some(pos) = args.iter().position(|a| a == "--headless") else {
        return Ok(None);
    };
    let wave_file = args
        .get(pos + 1)
        .filter(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("--headless needs a wave file"))?;

    let seconds = match args.iter().position(|a| a == "--seconds") {
        Some(i) => args
            .get(i + 1)
            .ok_or_else(|| anyhow!("--seconds needs a value"))?
            .parse::<u64>()
            .context("--seconds must be a whole number")?,
        None => DEFAULT_SECONDS,
    };

    Ok(Some(HeadlessOptions { wave_file, seconds }))
}

pub fn run(audio: &AudioConfig, options: &HeadlessOptions) -> Result<()> {
    let preset = load_wave_file(&options.wave_file)?;
    let wave = WaveState::from_preset(&preset);

    let mut system = start_audio_system(audio).context("Could not start audio")?;
    log::info!(
        "Headless: {} ({}) on {} for {}s",
        options.wave_file.display(),
        describe_preset(&preset),
        system.handle.device_name(),
        options.seconds
    );

    for cmd in [SynthCommand::load_wave(wave.snapshot()), SynthCommand::Play] {
        if let Err(cmd) = system.command_sender.send(cmd) {
            bail!("Command queue full, could not send {:?}", cmd);
        }
    }

    for _ in 0..options.seconds {
        std::thread::sleep(Duration::from_secs(1));
        let atomics = &system.atomics;
        log::info!(
            "frames={} buffers={} rows={}L/{}R trace={}",
            atomics.frames(),
            atomics.buffers(),
            atomics.row_count(Channel::Left),
            atomics.row_count(Channel::Right),
            system.trace.len()
        );
    }

    if system.command_sender.send(SynthCommand::Stop).is_err() {
        log::warn!("Command queue full on stop");
    }
    // Give the callback one buffer to pick up the stop
    std::thread::sleep(Duration::from_millis(system.latency_ms.ceil() as u64 + 10));
    Ok(())
}
