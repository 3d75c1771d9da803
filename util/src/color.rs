// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use std::fmt::{Debug, Display};

pub const GREY: &str = "\x1b[0;0m\x1b[90m";
pub const LAVENDER: &str = "\x1b[38;5;183;1m";
pub const MINT: &str = "\x1b[38;5;48;1m";
pub const RED: &str = "\x1b[31;1m";
pub const CLEAR: &str = "\x1b[0;0m";

pub trait Color {
    fn color(&self, color: &str) -> String;

    fn grey(&self) -> String;
    fn lavender(&self) -> String;
    fn mint(&self) -> String;
    fn red(&self) -> String;
}

#[rustfmt::skip]
impl<T> Color for T where T: Display {
    fn color(&self, color: &str) -> String {
        format!("{}{}{}", color, self, CLEAR)
    }

    fn grey(&self)     -> String { self.color(GREY)     }
    fn lavender(&self) -> String { self.color(LAVENDER) }
    fn mint(&self)     -> String { self.color(MINT)     }
    fn red(&self)      -> String { self.color(RED)      }
}

pub trait DebugColor {
    fn debug_color(&self, color: &str) -> String;

    fn debug_lavender(&self) -> String;
}

impl<T> DebugColor for T where T: Debug {
    fn debug_color(&self, color: &str) -> String {
        format!("{}{:?}{}", color, self, CLEAR)
    }

    fn debug_lavender(&self) -> String {
        self.debug_color(LAVENDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_text_in_escape_codes() {
        assert_eq!("ok".mint(), format!("{MINT}ok{CLEAR}"));
        assert_eq!(7.red(), format!("{RED}7{CLEAR}"));
        assert_eq!("a".debug_lavender(), format!("{LAVENDER}\"a\"{CLEAR}"));
    }
}
