//! Session logging.
//!
//! Every processed frame can be appended to a session file under `sessions/`
//! as one JSON object per line, grouped in one directory per day.

mod session;

pub use session::*;
