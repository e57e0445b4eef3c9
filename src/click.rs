//! Stylus button click classification.
//!
//! Presses and releases are counted while they keep arriving within
//! [`PRESS_TIMEOUT`] of each other. Once a released burst has been quiet for
//! longer than that, the next SYN_REPORT closes it and the click count picks the
//! gesture: one click toggles the eraser (toggle mode only), two clicks undo,
//! three or more redo.
//!
//! There is no timer. A burst is only closed or abandoned when a later event
//! arrives from the pen.

use std::fmt;

use crate::emit::{self, Emission};
use crate::input::event::{RawEvent, Timestamp, BTN_STYLUS, BTN_TOOL_PEN};

/// Debounce window in seconds.
pub const PRESS_TIMEOUT: f64 = 0.2;

/// Classified outcome of a closed click burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Single,
    Undo,
    Redo,
}

impl Gesture {
    pub fn from_clicks(clicks: u32) -> Option<Self> {
        match clicks {
            0 => None,
            1 => Some(Gesture::Single),
            2 => Some(Gesture::Undo),
            _ => Some(Gesture::Redo),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Single => write!(f, "single click"),
            Gesture::Undo => write!(f, "undo"),
            Gesture::Redo => write!(f, "redo"),
        }
    }
}

/// Click burst in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickSession {
    pub click_count: u32,
    /// Released in time; waiting for a SYN_REPORT past the window.
    pub primed: bool,
    /// Last press or release of this burst.
    pub last_click_time: Timestamp,
}

impl ClickSession {
    pub fn is_idle(&self) -> bool {
        self.click_count == 0 && !self.primed
    }

    fn reset(&mut self) {
        self.click_count = 0;
        self.primed = false;
    }
}

/// Click session plus the latched eraser state. Feed it every event read from
/// the pen, in order, and write out what it returns.
#[derive(Debug, Default)]
pub struct ClickEngine {
    session: ClickSession,
    eraser_on: bool,
    toggle: bool,
}

impl ClickEngine {
    pub fn new(toggle: bool) -> Self {
        Self {
            toggle,
            ..Self::default()
        }
    }

    pub fn session(&self) -> &ClickSession {
        &self.session
    }

    pub fn eraser_on(&self) -> bool {
        self.eraser_on
    }

    /// Process one event and return the synthetic events to write, in order.
    pub fn handle(&mut self, ev: &RawEvent) -> Vec<Emission> {
        if ev.is_key(BTN_STYLUS) {
            match ev.value {
                1 => self.press(ev.timestamp),
                0 => self.release(ev.timestamp),
                _ => {}
            }
            return Vec::new();
        }

        if self.session.primed
            && ev.is_syn_report()
            && ev.timestamp.is_later_than(self.session.last_click_time, PRESS_TIMEOUT)
        {
            return self.dispatch();
        }

        if self.eraser_on && ev.is_key(BTN_TOOL_PEN) {
            // Leaving proximity clears the hardware's rubber flag; follow the
            // pen's in-range value so it is set again on re-entry.
            log::info!("Writing eraser tool {}", ev.value);
            return vec![emit::rubber(ev.value)];
        }

        log::trace!("ignored {:?} code {} value {}", ev.category, ev.code, ev.value);
        Vec::new()
    }

    fn press(&mut self, at: Timestamp) {
        if self.session.click_count != 0
            && at.is_later_than(self.session.last_click_time, PRESS_TIMEOUT)
        {
            log::debug!("abandoning stale burst of {} click(s)", self.session.click_count);
            self.session.reset();
        }
        self.session.click_count += 1;
        self.session.last_click_time = at;
        self.session.primed = false;
    }

    fn release(&mut self, at: Timestamp) {
        if self.session.click_count == 0 {
            return;
        }
        if !at.is_later_than(self.session.last_click_time, PRESS_TIMEOUT) {
            self.session.primed = true;
            self.session.last_click_time = at;
        } else {
            log::debug!("release too slow, dropping burst");
            self.session.reset();
        }
    }

    fn dispatch(&mut self) -> Vec<Emission> {
        let clicks = self.session.click_count;
        self.session.reset();
        log::info!("{}x click event detected", clicks);

        match Gesture::from_clicks(clicks) {
            Some(Gesture::Single) if self.toggle => {
                self.eraser_on = !self.eraser_on;
                log::info!("Writing eraser tool {}", self.eraser_on as i32);
                emit::eraser(self.eraser_on)
            }
            Some(gesture @ (Gesture::Undo | Gesture::Redo)) => {
                log::info!("Sending {}", gesture);
                emit::undo_redo(gesture == Gesture::Redo)
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{
        Category, BTN_TOOL_RUBBER, KEY_LEFTCTRL, KEY_Y, KEY_Z,
    };

    const T0: i64 = 1_000;

    /// Time `ms` milliseconds after T0.
    fn at(ms: i64) -> Timestamp {
        Timestamp::new(T0 + ms / 1000, (ms % 1000) * 1000)
    }

    fn press(ms: i64) -> RawEvent {
        RawEvent::key(BTN_STYLUS, 1, at(ms))
    }

    fn release(ms: i64) -> RawEvent {
        RawEvent::key(BTN_STYLUS, 0, at(ms))
    }

    fn sync(ms: i64) -> RawEvent {
        RawEvent::syn_report(at(ms))
    }

    fn feed(engine: &mut ClickEngine, events: &[RawEvent]) -> Vec<Emission> {
        events.iter().flat_map(|ev| engine.handle(ev)).collect()
    }

    #[test]
    fn test_quick_clicks_are_counted() {
        for n in 1..=5u32 {
            let mut engine = ClickEngine::new(false);
            let mut out = Vec::new();
            for i in 0..n as i64 {
                let t = i * 100;
                out.extend(feed(&mut engine, &[press(t), sync(t), release(t + 50), sync(t + 50)]));
            }
            assert_eq!(engine.session().click_count, n);
            assert!(engine.session().primed);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_dispatch_happens_once() {
        let mut engine = ClickEngine::new(false);
        let out = feed(
            &mut engine,
            &[press(0), release(50), press(100), release(150), sync(400), sync(500)],
        );
        assert_eq!(out, emit::undo_redo(false));
        assert!(engine.session().is_idle());
    }

    #[test]
    fn test_double_click_undo_scenario() {
        let mut engine = ClickEngine::new(false);
        let out = feed(
            &mut engine,
            &[press(0), release(50), sync(50), press(100), release(120)],
        );
        assert!(out.is_empty());
        assert_eq!(engine.session().click_count, 2);

        // 180ms after the last release: still inside the window.
        assert!(engine.handle(&sync(300)).is_empty());
        assert_eq!(engine.session().click_count, 2);

        let out = engine.handle(&sync(350));
        assert_eq!(out, emit::undo_redo(false));
        assert!(engine.session().is_idle());
    }

    #[test]
    fn test_triple_and_more_is_redo() {
        for n in [3i64, 4, 7] {
            let mut engine = ClickEngine::new(true);
            let mut events = Vec::new();
            for i in 0..n {
                events.push(press(i * 100));
                events.push(release(i * 100 + 40));
            }
            events.push(sync(n * 100 + 300));
            let out = feed(&mut engine, &events);
            assert_eq!(out.len(), 8);
            assert_eq!(out[2], Emission::Key { code: KEY_Y, value: 1 });
            assert_eq!(out[6], Emission::Key { code: KEY_LEFTCTRL, value: 0 });
            assert!(!engine.eraser_on());
        }
    }

    #[test]
    fn test_undo_emits_z_chord() {
        let mut engine = ClickEngine::new(true);
        let out = feed(&mut engine, &[press(0), release(40), press(90), release(130), sync(400)]);
        assert_eq!(out.len(), 8);
        assert_eq!(out[2], Emission::Key { code: KEY_Z, value: 1 });
        assert_eq!(out[4], Emission::Key { code: KEY_Z, value: 0 });
    }

    #[test]
    fn test_single_click_without_toggle_does_nothing() {
        let mut engine = ClickEngine::new(false);
        let out = feed(&mut engine, &[press(0), release(60), sync(300)]);
        assert!(out.is_empty());
        assert!(!engine.eraser_on());
        assert!(engine.session().is_idle());
    }

    #[test]
    fn test_toggle_eraser_on_then_off() {
        let mut engine = ClickEngine::new(true);
        let out = feed(&mut engine, &[press(0), release(60), sync(300)]);
        assert_eq!(out, vec![emit::rubber(1)]);
        assert!(engine.eraser_on());

        let out = feed(&mut engine, &[press(1000), release(1060), sync(1300)]);
        assert_eq!(
            out,
            vec![
                Emission::Pen { code: BTN_TOOL_RUBBER, value: 0 },
                Emission::Pen { code: BTN_TOOL_PEN, value: 0 },
                Emission::Pen { code: BTN_TOOL_PEN, value: 1 },
            ]
        );
        assert!(!engine.eraser_on());
        assert!(engine.session().is_idle());
    }

    #[test]
    fn test_release_at_window_edge_is_prompt() {
        let mut engine = ClickEngine::new(false);
        feed(&mut engine, &[press(0), release(200)]);
        assert!(engine.session().primed);
        assert_eq!(engine.session().click_count, 1);
    }

    #[test]
    fn test_late_release_abandons_burst() {
        let mut engine = ClickEngine::new(true);
        let out = feed(&mut engine, &[press(0), release(201), sync(600)]);
        assert!(out.is_empty());
        assert!(engine.session().is_idle());
        assert!(!engine.eraser_on());
    }

    #[test]
    fn test_stale_burst_reset_on_next_press() {
        let mut engine = ClickEngine::new(false);
        // Primed but no sync report came to close it.
        feed(&mut engine, &[press(0), release(50)]);
        let out = feed(&mut engine, &[press(900), release(950), sync(1300)]);
        assert!(out.is_empty());
        assert!(engine.session().is_idle());
    }

    #[test]
    fn test_sync_before_window_waits() {
        let mut engine = ClickEngine::new(true);
        feed(&mut engine, &[press(900), release(1000)]);
        assert!(engine.handle(&sync(1100)).is_empty());
        assert!(engine.handle(&sync(1200)).is_empty());
        assert!(engine.session().primed);
        assert_eq!(engine.handle(&sync(1201)), vec![emit::rubber(1)]);
    }

    #[test]
    fn test_release_without_press_stays_idle() {
        let mut engine = ClickEngine::new(true);
        feed(&mut engine, &[press(1000), release(1050), sync(1400)]);
        assert!(engine.eraser_on());

        // Clock stepped back: release lands within the window of the last click.
        engine.handle(&release(1100));
        assert!(engine.session().is_idle());
        assert!(engine.handle(&sync(1500)).is_empty());
        assert!(engine.eraser_on());
    }

    #[test]
    fn test_unprimed_sync_does_not_dispatch() {
        let mut engine = ClickEngine::new(true);
        feed(&mut engine, &[press(0), press(100)]);
        assert!(engine.handle(&sync(800)).is_empty());
        assert_eq!(engine.session().click_count, 2);
    }

    #[test]
    fn test_unrelated_events_ignored_when_idle() {
        let mut engine = ClickEngine::new(true);
        let events = [
            RawEvent::new(Category::Other(0x03), 0x18, 1200, at(0)),
            RawEvent::key(BTN_TOOL_PEN, 1, at(10)),
            RawEvent::key(0x14a, 1, at(20)),
            sync(30),
            RawEvent::new(Category::Syn, 2, 0, at(40)),
        ];
        for ev in &events {
            assert!(engine.handle(ev).is_empty());
            assert_eq!(*engine.session(), ClickSession::default());
            assert!(!engine.eraser_on());
        }
    }

    #[test]
    fn test_proximity_echo_while_erasing() {
        let mut engine = ClickEngine::new(true);
        feed(&mut engine, &[press(0), release(60), sync(300)]);
        assert!(engine.eraser_on());

        assert_eq!(
            engine.handle(&RawEvent::key(BTN_TOOL_PEN, 0, at(2000))),
            vec![emit::rubber(0)]
        );
        assert_eq!(
            engine.handle(&RawEvent::key(BTN_TOOL_PEN, 1, at(2500))),
            vec![emit::rubber(1)]
        );
        assert!(engine.eraser_on());
        assert!(engine.session().is_idle());
    }

    #[test]
    fn test_gesture_from_clicks() {
        assert_eq!(Gesture::from_clicks(0), None);
        assert_eq!(Gesture::from_clicks(1), Some(Gesture::Single));
        assert_eq!(Gesture::from_clicks(2), Some(Gesture::Undo));
        assert_eq!(Gesture::from_clicks(3), Some(Gesture::Redo));
        assert_eq!(Gesture::from_clicks(40), Some(Gesture::Redo));
    }
}
