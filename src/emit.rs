//! Synthetic event sequences produced for each gesture.
//!
//! Order matters: the input stack reads a modifier release before the key
//! release as a different chord, so every sequence here is written as-is.

use crate::input::event::{BTN_TOOL_PEN, BTN_TOOL_RUBBER, KEY_LEFTCTRL, KEY_Y, KEY_Z};

/// One primitive write requested by the click engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Key event written back to the pen device (tool state).
    Pen { code: u16, value: i32 },
    /// Key event on the virtual keyboard.
    Key { code: u16, value: i32 },
    /// SYN_REPORT on the virtual keyboard.
    Sync,
}

/// Ctrl+Z (undo) or Ctrl+Y (redo), each step followed by a sync.
pub fn undo_redo(redo: bool) -> Vec<Emission> {
    let key = if redo { KEY_Y } else { KEY_Z };
    vec![
        Emission::Key { code: KEY_LEFTCTRL, value: 1 },
        Emission::Sync,
        Emission::Key { code: key, value: 1 },
        Emission::Sync,
        Emission::Key { code: key, value: 0 },
        Emission::Sync,
        Emission::Key { code: KEY_LEFTCTRL, value: 0 },
        Emission::Sync,
    ]
}

/// Eraser tool on or off.
///
/// Clearing the rubber tool alone doesn't bring the pen back; the pen tool has
/// to go out of range and back in.
pub fn eraser(on: bool) -> Vec<Emission> {
    let mut out = vec![rubber(on as i32)];
    if !on {
        out.push(Emission::Pen { code: BTN_TOOL_PEN, value: 0 });
        out.push(Emission::Pen { code: BTN_TOOL_PEN, value: 1 });
    }
    out
}

/// Rubber tool state with a raw value (used for proximity echoes and the
/// momentary pass-through).
pub fn rubber(value: i32) -> Emission {
    Emission::Pen {
        code: BTN_TOOL_RUBBER,
        value,
    }
}
