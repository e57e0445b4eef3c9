//! Linux `input_event` records as read from and written to the pen device.
//!
//! The reMarkable 1 and 2 are 32-bit ARM (16 bytes per event), the Paper Pro is
//! 64-bit ARM (24 bytes per event). Only this module knows the byte layout.

use std::time::{SystemTime, UNIX_EPOCH};

use evdevil::event::{EventType, InputEvent};

/// Size of struct input_event on 32-bit ARM (timeval 8 + type 2 + code 2 + value 4).
pub const INPUT_EVENT_SIZE_32: usize = 16;
/// Size of struct input_event on 64-bit ARM (timeval 16 + type 2 + code 2 + value 4).
pub const INPUT_EVENT_SIZE_64: usize = 24;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const SYN_REPORT: u16 = 0;

pub const KEY_Y: u16 = 21;
pub const KEY_LEFTCTRL: u16 = 29;
pub const KEY_Z: u16 = 44;
pub const BTN_TOOL_PEN: u16 = 0x140; // 320
pub const BTN_TOOL_RUBBER: u16 = 0x141; // 321
pub const BTN_STYLUS: u16 = 0x14b; // 331

/// Event category. Anything that isn't a key or sync event is carried through
/// as `Other` with its raw type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Syn,
    Key,
    Other(u16),
}

impl Category {
    pub fn from_raw(ty: u16) -> Self {
        match ty {
            EV_SYN => Category::Syn,
            EV_KEY => Category::Key,
            other => Category::Other(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Category::Syn => EV_SYN,
            Category::Key => EV_KEY,
            Category::Other(ty) => ty,
        }
    }
}

/// Event time as seconds + microseconds, as the kernel reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub sec: i64,
    pub usec: i64,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { sec: 0, usec: 0 };

    pub fn new(sec: i64, usec: i64) -> Self {
        Self { sec, usec }
    }

    /// Current wall-clock time, used to stamp synthetic events.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            sec: since_epoch.as_secs() as i64,
            usec: since_epoch.subsec_micros() as i64,
        }
    }

    /// Seconds elapsed from `then` to `self` (negative if `then` is later).
    pub fn seconds_since(&self, then: Timestamp) -> f64 {
        (self.sec - then.sec) as f64 + (self.usec as f64 / 1_000_000.0 - then.usec as f64 / 1_000_000.0)
    }

    /// True iff more than `delta` seconds separate `then` and `self`.
    /// Equality is not "later".
    pub fn is_later_than(&self, then: Timestamp, delta: f64) -> bool {
        self.seconds_since(then) > delta
    }
}

/// One decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub category: Category,
    pub code: u16,
    pub value: i32,
    pub timestamp: Timestamp,
}

impl RawEvent {
    pub fn new(category: Category, code: u16, value: i32, timestamp: Timestamp) -> Self {
        Self {
            category,
            code,
            value,
            timestamp,
        }
    }

    pub fn key(code: u16, value: i32, timestamp: Timestamp) -> Self {
        Self::new(Category::Key, code, value, timestamp)
    }

    pub fn syn_report(timestamp: Timestamp) -> Self {
        Self::new(Category::Syn, SYN_REPORT, 0, timestamp)
    }

    pub fn is_key(&self, code: u16) -> bool {
        self.category == Category::Key && self.code == code
    }

    pub fn is_syn_report(&self) -> bool {
        self.category == Category::Syn && self.code == SYN_REPORT
    }

    /// Convert for writing through a uinput device. The kernel stamps the time.
    pub fn to_input_event(&self) -> InputEvent {
        InputEvent::new(EventType::from_raw(self.category.raw()), self.code, self.value)
    }
}

/// Parse one input_event from raw bytes using the layout for `event_size`.
/// Returns None if the buffer is too short or the size is not a known layout.
pub fn decode(buf: &[u8], event_size: usize) -> Option<RawEvent> {
    if buf.len() < event_size {
        return None;
    }
    match event_size {
        INPUT_EVENT_SIZE_32 => {
            let sec = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64;
            let usec = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as i64;
            Some(decode_tail(&buf[8..16], Timestamp::new(sec, usec)))
        }
        INPUT_EVENT_SIZE_64 => {
            let mut sec = [0u8; 8];
            let mut usec = [0u8; 8];
            sec.copy_from_slice(&buf[0..8]);
            usec.copy_from_slice(&buf[8..16]);
            let ts = Timestamp::new(i64::from_le_bytes(sec), i64::from_le_bytes(usec));
            Some(decode_tail(&buf[16..24], ts))
        }
        _ => None,
    }
}

fn decode_tail(tail: &[u8], timestamp: Timestamp) -> RawEvent {
    let ty = u16::from_le_bytes([tail[0], tail[1]]);
    let code = u16::from_le_bytes([tail[2], tail[3]]);
    let value = i32::from_le_bytes([tail[4], tail[5], tail[6], tail[7]]);
    RawEvent::new(Category::from_raw(ty), code, value, timestamp)
}

/// Serialize an event with the layout for `event_size`.
pub fn encode(ev: &RawEvent, event_size: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(event_size);
    if event_size == INPUT_EVENT_SIZE_64 {
        buf.extend_from_slice(&ev.timestamp.sec.to_le_bytes());
        buf.extend_from_slice(&ev.timestamp.usec.to_le_bytes());
    } else {
        buf.extend_from_slice(&(ev.timestamp.sec as i32).to_le_bytes());
        buf.extend_from_slice(&(ev.timestamp.usec as i32).to_le_bytes());
    }
    buf.extend_from_slice(&ev.category.raw().to_le_bytes());
    buf.extend_from_slice(&ev.code.to_le_bytes());
    buf.extend_from_slice(&ev.value.to_le_bytes());
    buf
}
