//! Pen device I/O and the main event loop.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use crate::click::ClickEngine;
use crate::config::Config;
use crate::emit::{self, Emission};

use super::event::{decode, encode, RawEvent, Timestamp, BTN_STYLUS};
use super::keyboard::Keyboard;

/// The physical pen: events are read from and tool-state events written back
/// to the same handle.
pub struct PenDevice<T = File> {
    handle: T,
    event_size: usize,
    buf: Vec<u8>,
}

impl PenDevice<File> {
    pub fn open(path: &str, event_size: usize) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| format!("{} is not a valid device: {}", path, e))?;
        Ok(Self::from_handle(file, event_size))
    }
}

impl<T> PenDevice<T> {
    pub fn from_handle(handle: T, event_size: usize) -> Self {
        Self {
            handle,
            event_size,
            buf: vec![0u8; event_size],
        }
    }
}

impl<T: Read> PenDevice<T> {
    /// Block until the next event arrives.
    pub fn read_event(&mut self) -> Result<RawEvent, Box<dyn std::error::Error + Send + Sync>> {
        self.handle.read_exact(&mut self.buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                "Pen device closed".to_string()
            } else {
                format!("Failed to read pen event: {}", e)
            }
        })?;
        decode(&self.buf, self.event_size)
            .ok_or_else(|| format!("Unsupported input_event size {}", self.event_size).into())
    }
}

impl<T: Write> PenDevice<T> {
    /// Write one key event stamped with the current time.
    pub fn write_key(&mut self, code: u16, value: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ev = RawEvent::key(code, value, Timestamp::now());
        log::debug!(
            "writing pen: seconds = {}, usec = {}, code = {}, value = {}",
            ev.timestamp.sec,
            ev.timestamp.usec,
            ev.code,
            ev.value
        );
        self.handle
            .write_all(&encode(&ev, self.event_size))
            .map_err(|e| format!("Failed to write pen event: {}", e))?;
        Ok(())
    }
}

/// Outside toggle mode the button acts as a held eraser: mirror it onto the
/// rubber tool.
fn momentary_eraser(ev: &RawEvent, toggle: bool) -> Option<Emission> {
    if toggle || !ev.is_key(BTN_STYLUS) {
        return None;
    }
    Some(emit::rubber(ev.value))
}

fn apply<T: Write>(
    emissions: Vec<Emission>,
    pen: &mut PenDevice<T>,
    keyboard: &mut Keyboard,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    for emission in emissions {
        match emission {
            Emission::Pen { code, value } => pen.write_key(code, value)?,
            Emission::Key { code, value } => keyboard.key(code, value),
            Emission::Sync => keyboard.sync()?,
        }
    }
    Ok(())
}

/// Kernel name of an event node, from sysfs.
fn device_name(path: &str) -> Option<String> {
    let node = Path::new(path).file_name()?;
    let sys = Path::new("/sys/class/input").join(node).join("device/name");
    std::fs::read_to_string(sys).ok().map(|s| s.trim().to_string())
}

pub fn run_pen(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut pen = PenDevice::open(&config.pen_device, config.profile.input_event_size)?;
    let mut keyboard = Keyboard::create()?;

    log::info!("Using devices:");
    log::info!(
        "1. pen: {} ({})",
        config.pen_device,
        device_name(&config.pen_device).unwrap_or_else(|| "Unknown".into())
    );
    log::info!(
        "2. keyboard: /sys/devices/virtual/input/{}",
        keyboard.sysname().unwrap_or_else(|| "Unknown".into())
    );

    let mut engine = ClickEngine::new(config.toggle);

    loop {
        let ev = pen.read_event()?;

        if let Some(passthrough) = momentary_eraser(&ev, config.toggle) {
            apply(vec![passthrough], &mut pen, &mut keyboard)?;
        }

        let emissions = engine.handle(&ev);
        if !emissions.is_empty() {
            apply(emissions, &mut pen, &mut keyboard)?;
            log::trace!(
                "idle={} eraser_on={}",
                engine.session().is_idle(),
                engine.eraser_on()
            );
        }
    }
}
