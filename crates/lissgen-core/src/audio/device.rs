//! Output device enumeration
//!
//! Devices are listed from every cpal host available on the platform, so a
//! user on Linux can pick an ALSA device even when another host is the
//! default.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Host, HostId};

use super::config::DeviceId;
use super::error::{AudioError, AudioResult};

/// Display name of a cpal host
fn host_label(host_id: HostId) -> String {
    let name = format!("{:?}", host_id);
    match name.as_str() {
        "Alsa" => "ALSA".to_string(),
        "Jack" => "JACK".to_string(),
        "Wasapi" => "WASAPI".to_string(),
        "Asio" => "ASIO".to_string(),
        _ => name,
    }
}

fn host_by_label(label: &str) -> Option<Host> {
    cpal::available_hosts()
        .into_iter()
        .find(|id| host_label(*id) == label)
        .and_then(|id| cpal::host_from_id(id).ok())
}

fn device_name(device: &cpal::Device) -> Option<String> {
    device.name().ok()
}

/// An output device able to play stereo f32
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDevice {
    pub id: DeviceId,
    pub name: String,
    /// Host backend label (e.g. "ALSA", "CoreAudio")
    pub host: String,
    /// Default device of its host
    pub is_default: bool,
    pub max_channels: u16,
}

impl std::fmt::Display for OutputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id.display_label())
    }
}

/// Stereo-capable output devices of every host, defaults first
pub fn list_output_devices() -> AudioResult<Vec<OutputDevice>> {
    let mut found = Vec::new();

    for host_id in cpal::available_hosts() {
        let host = match cpal::host_from_id(host_id) {
            Ok(host) => host,
            Err(e) => {
                log::debug!("Skipping audio host {:?}: {}", host_id, e);
                continue;
            }
        };
        let label = host_label(host_id);
        let default_name = host.default_output_device().as_ref().and_then(device_name);

        let devices = match host.output_devices() {
            Ok(devices) => devices,
            Err(e) => {
                log::debug!("Cannot list devices of {}: {}", label, e);
                continue;
            }
        };

        for device in devices {
            let Some(name) = device_name(&device) else {
                continue;
            };
            let max_channels = match device.supported_output_configs() {
                Ok(configs) => configs.map(|c| c.channels()).max().unwrap_or(0),
                Err(_) => continue,
            };
            if max_channels < 2 {
                continue;
            }

            found.push(OutputDevice {
                id: DeviceId::with_host(&name, &label),
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
                host: label.clone(),
                max_channels,
            });
        }
    }

    if found.is_empty() {
        return Err(AudioError::NoDevices);
    }

    found.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| a.host.cmp(&b.host))
            .then_with(|| a.name.cmp(&b.name))
    });
    log::info!("Found {} stereo output devices", found.len());
    Ok(found)
}

/// Device list for the settings view; empty when enumeration fails
pub fn available_output_devices() -> Vec<OutputDevice> {
    list_output_devices().unwrap_or_else(|e| {
        log::warn!("Failed to enumerate audio devices: {}", e);
        Vec::new()
    })
}

/// Resolve a configured device
///
/// Looks in the named host first, then in every host by name.
pub fn find_device(id: &DeviceId) -> AudioResult<cpal::Device> {
    let matches = |d: &cpal::Device| device_name(d).as_deref() == Some(id.name.as_str());

    if let Some(host) = id.host.as_deref().and_then(host_by_label) {
        return host
            .output_devices()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?
            .find(matches)
            .ok_or_else(|| AudioError::DeviceNotFound(id.display_label()));
    }

    cpal::available_hosts()
        .into_iter()
        .filter_map(|host_id| cpal::host_from_id(host_id).ok())
        .filter_map(|host| host.output_devices().ok())
        .flatten()
        .find(matches)
        .ok_or_else(|| AudioError::DeviceNotFound(id.display_label()))
}

/// Default output device of the default host
pub fn default_device() -> AudioResult<cpal::Device> {
    cpal::default_host()
        .default_output_device()
        .ok_or(AudioError::NoDefaultDevice)
}
