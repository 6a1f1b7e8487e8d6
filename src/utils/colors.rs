/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::models::belt::Belt;
use crate::models::direction::Direction;
use crate::models::round::RoundResult;

/// win → green, loss → red, draw → yellow, none → grey
pub fn color_for_result(result: Option<RoundResult>) -> &'static str {
    match result {
        Some(RoundResult::Win) => GREEN,
        Some(RoundResult::Loss) => RED,
        Some(RoundResult::Draw) => YELLOW,
        None => GREY,
    }
}

pub fn color_for_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Offensive => GREEN,
        Direction::Defensive => RED,
    }
}

pub fn color_for_belt(belt: Belt) -> &'static str {
    match belt {
        Belt::White => RESET,
        Belt::Blue => BLUE,
        Belt::Purple => MAGENTA,
        Belt::Brown => YELLOW,
        Belt::Black => GREY,
    }
}

/// Grey placeholder for empty values ("", "--", "--:--").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" || v == "--:--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
