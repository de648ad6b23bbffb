//! Deferred deallocation for the audio thread
//!
//! Wave snapshots reach the engine as `basedrop::Shared<WaveSnapshot>`. When
//! the engine drops one it is only queued; the collector thread started here
//! frees it, so the audio callback never calls into the allocator.

use basedrop::{Collector, Handle};
use std::sync::mpsc;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

static GC_HANDLE: OnceLock<Handle> = OnceLock::new();

/// How often the collector thread frees queued values
const COLLECT_INTERVAL: Duration = Duration::from_millis(100);

fn init_gc() -> Handle {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("synth-gc".to_string())
        .spawn(move || {
            // Collector is !Sync, so it lives on this thread only
            let mut collector = Collector::new();
            if tx.send(collector.handle()).is_err() {
                return;
            }
            log::info!("Synth GC thread started");

            loop {
                collector.collect();
                thread::sleep(COLLECT_INTERVAL);
            }
        });

    match spawned.ok().and_then(|_| rx.recv().ok()) {
        Some(handle) => handle,
        None => {
            // Without a collector thread, values are kept until exit
            log::error!("Failed to start synth GC thread, snapshots will leak");
            let collector = Collector::new();
            let handle = collector.handle();
            std::mem::forget(collector);
            handle
        }
    }
}

/// Handle for allocating `Shared<T>` values
pub fn gc_handle() -> Handle {
    GC_HANDLE.get_or_init(init_gc).clone()
}
