//! # Events Module
//!
//! Progress reporting for scans and deletions.
//!
//! The engine emits events through a channel so that any controlling
//! surface (CLI, GUI) can display progress without the engine knowing
//! about it. Events are informational only; the scan result itself is
//! handed over once, as a single value, when the pass ends.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Hash(HashEvent::Progress(p)) = event {
//!             println!("Hashed {} files", p.completed);
//!         }
//!     }
//! });
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
