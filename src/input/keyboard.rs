//! Virtual keyboard used to send undo/redo chords.

use evdevil::event::{InputEvent, Key};
use evdevil::uinput::UinputDevice;
use evdevil::{Bus, InputId};

use super::event::{RawEvent, Timestamp};

const KEYBOARD_NAME: &str = "kb-emulator";

fn create_keyboard_device() -> Result<UinputDevice, Box<dyn std::error::Error + Send + Sync>> {
    let device = UinputDevice::builder()?
        .with_input_id(InputId::new(Bus::from_raw(0x03), 0x01, 0x01, 1))?
        .with_keys([Key::KEY_LEFTCTRL, Key::KEY_Y, Key::KEY_Z])?
        .build(KEYBOARD_NAME)?;
    Ok(device)
}

/// Key events collected until the next sync marker.
#[derive(Debug, Default)]
pub struct KeyBatch {
    events: Vec<InputEvent>,
}

impl KeyBatch {
    pub fn push(&mut self, code: u16, value: i32) {
        self.events
            .push(RawEvent::key(code, value, Timestamp::ZERO).to_input_event());
    }

    pub fn take(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

pub struct Keyboard {
    device: UinputDevice,
    batch: KeyBatch,
}

impl Keyboard {
    pub fn create() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let device = create_keyboard_device()
            .map_err(|e| format!("Unable to create keyboard: {}", e))?;
        Ok(Self {
            device,
            batch: KeyBatch::default(),
        })
    }

    /// sysfs name of the created device, e.g. `input7`.
    pub fn sysname(&self) -> Option<String> {
        self.device
            .sysname()
            .ok()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn key(&mut self, code: u16, value: i32) {
        log::debug!("writing keyboard: code = {}, value = {}", code, value);
        self.batch.push(code, value);
    }

    /// Write the pending batch. uinput terminates it with SYN_REPORT.
    pub fn sync(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let events = self.batch.take();
        log::debug!("writing keyboard: SYN_REPORT after {} event(s)", events.len());
        self.device.write(&events)?;
        Ok(())
    }
}
