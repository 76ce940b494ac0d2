//! ANSI escape codes for diagnostic output.

pub const OKBLUE: &str = "\x1b[94m";
pub const OKGREEN: &str = "\x1b[92m";
pub const WARNING: &str = "\x1b[93m";
pub const FAIL: &str = "\x1b[91m";
pub const ENDC: &str = "\x1b[0m";
pub const BLACKONYELLOW: &str = "\x1b[0;30;43m";
pub const WHITEONRED: &str = "\x1b[0;37;41m";
pub const BOLDRED: &str = "\x1b[1;31m";

pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

/// Wrap `text` in `color` and reset afterwards.
pub fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, ENDC)
}
