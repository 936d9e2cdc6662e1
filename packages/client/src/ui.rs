//! UI utilities for the client.

use std::io::Write;

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(room: &str) {
    print!("{}> ", room);
    std::io::stdout().flush().ok();
}
