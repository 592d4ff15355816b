use std::thread;
use std::time::Duration;

use colored::*;

const SPLASH_DELAY: Duration = Duration::from_millis(1500);

const ASCII_ART: &[&str] = &[
    r" __      __        _             ",
    r" \ \    / /       (_)            ",
    r"  \ \  / /_ _  ___ _ _ __ __ _   ",
    r"   \ \/ / _` |/ __| | '__/ _` |  ",
    r"    \  / (_| | (__| | | | (_| |  ",
    r"     \/ \__,_|\___| |_|  \__,_|  ",
];

/// Display startup splash screen
pub fn show_splash() {
    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80);

    println!();
    for line in ASCII_ART {
        println!("{}", center(line, width).cyan().bold());
    }
    println!("{}", center("SYSTEM SENTINEL v1.0", width).white().bold());
    println!();
    println!("{}", center("Initializing guardian protocols...", width).dimmed());

    thread::sleep(SPLASH_DELAY);
}

/// Pad `text` on the left so it sits in the middle of `width` columns
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let padding = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(padding), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pads_left() {
        assert_eq!(center("ab", 6), "  ab");
    }

    #[test]
    fn test_center_wider_than_terminal() {
        assert_eq!(center("abcdef", 4), "abcdef");
    }
}
