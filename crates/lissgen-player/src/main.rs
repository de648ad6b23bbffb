//! LissGen - two-channel Lissajous synthesizer
//!
//! This is the entry point of the GUI application. It:
//! 1. Loads the player configuration
//! 2. Starts the cpal output stream (falls back to UI-only mode)
//! 3. Launches the iced GUI application
//!
//! ## Command line flags
//!
//! - `--headless <file.lsj> [--seconds N]`: play a wave file without a window

mod config;
mod domain;
mod headless;
mod ui;

use std::cell::RefCell;
use std::sync::Arc;

use iced::{Size, Task};
use lissgen_core::audio::start_audio_system;
use lissgen_core::config::{default_config_path, load_config};
use lissgen_core::engine::SynthAtomics;
use lissgen_core::trace::TraceBuffer;

use config::PlayerConfig;
use domain::LissDomain;
use ui::app::AudioInfo;
use ui::message::Message;
use ui::LissApp;

fn main() -> iced::Result {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("lissgen starting up");

    let config_path = default_config_path();
    let config: PlayerConfig = load_config(&config_path);

    let args: Vec<String> = std::env::args().collect();
    match headless::parse_args(&args) {
        Ok(Some(options)) => {
            if let Err(e) = headless::run(&config.audio, &options) {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
            return Ok(());
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(2);
        }
    }

    let (audio_handle, sender, atomics, trace, audio_info) = match start_audio_system(&config.audio)
    {
        Ok(audio) => {
            let info = AudioInfo {
                device_name: audio.handle.device_name().to_string(),
                sample_rate: audio.sample_rate,
                buffer_size: audio.buffer_size,
                latency_ms: audio.latency_ms,
            };
            log::info!(
                "Audio started on {} ({} Hz, {} frames)",
                info.device_name,
                info.sample_rate,
                info.buffer_size
            );
            (
                Some(audio.handle),
                Some(audio.command_sender),
                audio.atomics,
                audio.trace,
                Some(info),
            )
        }
        Err(e) => {
            log::warn!("Could not start audio: {}", e);
            log::warn!("Running in UI-only mode (no audio output)");
            (
                None,
                None,
                Arc::new(SynthAtomics::new()),
                Arc::new(TraceBuffer::new()),
                None,
            )
        }
    };

    let domain = LissDomain::new(sender, atomics, trace);
    let app = LissApp::new(domain, config, config_path, audio_info);

    // The boot closure must be Fn; it is only called once
    let app_cell = RefCell::new(Some(app));

    let result = iced::application(
        move || {
            let app = app_cell.borrow_mut().take().expect("application booted twice");
            (app, Task::none())
        },
        update,
        view,
    )
    .subscription(subscription)
    .theme(theme)
    .title("LissGen")
    .window_size(Size::new(1280.0, 800.0))
    .run();

    // Stream stays alive until the window closes
    drop(audio_handle);
    log::info!("lissgen stopped");

    result
}

fn update(app: &mut LissApp, message: Message) -> Task<Message> {
    app.update(message)
}

fn view(app: &LissApp) -> iced::Element<'_, Message> {
    app.view()
}

fn subscription(app: &LissApp) -> iced::Subscription<Message> {
    app.subscription()
}

fn theme(app: &LissApp) -> iced::Theme {
    app.theme()
}
