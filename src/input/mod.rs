pub mod event;
mod keyboard;
mod pen;

pub use pen::{run_pen, PenDevice};
