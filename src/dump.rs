//! Dump raw pen events for debugging.
//! Run: rm-stylus-button dump  to stream and print events.

use crate::config::Config;
use crate::input::event::{
    Category, RawEvent, BTN_STYLUS, BTN_TOOL_PEN, BTN_TOOL_RUBBER, SYN_REPORT,
};
use crate::input::PenDevice;

fn code_name(ev: &RawEvent) -> String {
    match ev.category {
        Category::Syn if ev.code == SYN_REPORT => "SYN_REPORT".into(),
        Category::Syn => format!("SYN/{}", ev.code),
        Category::Key => {
            let key = match ev.code {
                BTN_TOOL_PEN => "TOOL_PEN",
                BTN_TOOL_RUBBER => "TOOL_RUBBER",
                0x14a => "TOUCH",
                BTN_STYLUS => "STYLUS",
                0x14c => "STYLUS2",
                _ => return format!("KEY/{}", ev.code),
            };
            format!("BTN_{}", key)
        }
        Category::Other(0x03) => {
            let abs = match ev.code {
                0x00 => "X",
                0x01 => "Y",
                0x18 => "PRESSURE",
                0x19 => "DISTANCE",
                0x1a => "TILT_X",
                0x1b => "TILT_Y",
                _ => "?",
            };
            format!("ABS_{}({})", abs, ev.code)
        }
        Category::Other(ty) => format!("type{} code{}", ty, ev.code),
    }
}

pub fn run_dump(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut pen = PenDevice::open(&config.pen_device, config.profile.input_event_size)?;
    eprintln!(
        "Dumping pen events from {} (button={}, pen={}, rubber={}; Ctrl+C to stop):\n",
        config.pen_device, BTN_STYLUS, BTN_TOOL_PEN, BTN_TOOL_RUBBER
    );
    let mut n = 0u64;
    loop {
        let ev = pen.read_event()?;
        n += 1;
        println!(
            "{:6}  {}.{:06}  {}  value={}",
            n,
            ev.timestamp.sec,
            ev.timestamp.usec,
            code_name(&ev),
            ev.value
        );
    }
}
