//! Numeric counters
//!
//! Counter text such as `"$1,250+"` or `"1.3B"` is split into a prefix, a
//! number and a suffix. While the counter is in view the number tweens from
//! zero to its target; leaving view snaps it back to exactly zero so the next
//! entry replays the count.

use std::fmt;
use std::str::FromStr;

use reveal_animation::Easing;
use reveal_core::{Boundary, Result, RevealError};
use tracing::warn;

use crate::playback::{Playable, PlaybackController, PlaybackState};

/// Parsed counter text
#[derive(Clone, Debug, PartialEq)]
pub struct CounterValue {
    pub prefix: String,
    pub target: f64,
    /// Digits after the decimal point in the authored value
    pub decimals: usize,
    /// Whether the authored value used thousands separators
    pub grouped: bool,
    pub suffix: String,
}

impl CounterValue {
    /// Render `value` in the authored format
    pub fn format(&self, value: f64) -> String {
        let number = format!("{:.*}", self.decimals, value);
        let number = if self.grouped {
            group_thousands(&number)
        } else {
            number
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }
}

impl FromStr for CounterValue {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RevealError::InvalidCounterValue(s.to_string());

        let start = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (mut prefix, rest) = s.split_at(start);
        let negative = prefix.ends_with('-');
        if negative {
            prefix = &prefix[..prefix.len() - 1];
        }

        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
            .unwrap_or(rest.len());
        // A trailing separator belongs to the suffix ("12." reads as "12" + ".")
        let digits = rest[..end].trim_end_matches([',', '.']);
        let suffix = &rest[digits.len()..];

        let grouped = digits.contains(',');
        let plain: String = digits.chars().filter(|c| *c != ',').collect();
        if plain.matches('.').count() > 1 {
            return Err(invalid());
        }
        let decimals = plain.split_once('.').map_or(0, |(_, frac)| frac.len());
        let magnitude: f64 = plain.parse().map_err(|_| invalid())?;

        Ok(Self {
            prefix: prefix.to_string(),
            target: if negative { -magnitude } else { magnitude },
            decimals,
            grouped,
            suffix: suffix.to_string(),
        })
    }
}

impl fmt::Display for CounterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(self.target))
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Tween state of one counter
#[derive(Clone, Debug)]
pub struct CounterState {
    value: Option<CounterValue>,
    raw: String,
    current: f64,
    running: bool,
    clock_ms: f32,
    started_at_ms: Option<f32>,
    elapsed_ms: f32,
    duration_ms: u32,
    easing: Easing,
}

impl CounterState {
    fn new(raw: &str, duration_ms: u32, easing: Easing) -> Self {
        Self {
            value: parse_or_warn(raw),
            raw: raw.to_string(),
            current: 0.0,
            running: false,
            clock_ms: 0.0,
            started_at_ms: None,
            elapsed_ms: 0.0,
            duration_ms,
            easing,
        }
    }

    fn tick(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms;
        if !self.running {
            return;
        }
        let Some(value) = &self.value else {
            self.running = false;
            return;
        };

        self.elapsed_ms += dt_ms;
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms as f32).min(1.0)
        };
        self.current = value.target * f64::from(self.easing.apply(t));
        if t >= 1.0 {
            self.current = value.target;
            self.running = false;
        }
    }
}

impl Playable for CounterState {
    fn play(&mut self) {
        self.running = true;
        self.started_at_ms = Some(self.clock_ms);
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn seek_start(&mut self) {
        self.current = 0.0;
        self.elapsed_ms = 0.0;
    }
}

fn parse_or_warn(raw: &str) -> Option<CounterValue> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%err, "counter shows its text unanimated");
            None
        }
    }
}

/// Host-visible inputs of a counter
#[derive(Clone, Debug, PartialEq)]
pub struct CounterInput<'a> {
    pub value: &'a str,
    pub in_view: bool,
}

/// A counter that replays its count-up on every entry into view
#[derive(Clone, Debug)]
pub struct Counter {
    state: CounterState,
    controller: PlaybackController,
}

impl Counter {
    pub fn new(value: &str, duration_ms: u32, easing: Easing) -> Self {
        Self {
            state: CounterState::new(value, duration_ms, easing),
            controller: PlaybackController::new(),
        }
    }

    /// Apply host inputs, advance by `dt_ms`, and return the text to display
    pub fn update(&mut self, input: CounterInput<'_>, dt_ms: f32) -> String {
        self.set_value(input.value);
        self.set_in_view(input.in_view);
        self.tick(dt_ms);
        self.display()
    }

    /// Replace the authored value; a running count restarts from zero
    pub fn set_value(&mut self, raw: &str) {
        if raw == self.state.raw {
            return;
        }
        self.state.raw = raw.to_string();
        self.state.value = parse_or_warn(raw);
        self.state.seek_start();
        if self.controller.state() == PlaybackState::Playing {
            self.state.play();
        }
    }

    pub fn set_in_view(&mut self, in_view: bool) {
        let boundary = if in_view {
            Boundary::Enter
        } else {
            Boundary::Leave
        };
        self.controller.handle(boundary, &mut self.state);
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.state.tick(dt_ms);
    }

    /// Stop counting without changing the displayed value
    pub fn cancel(&mut self) {
        self.state.pause();
    }

    pub fn display(&self) -> String {
        match &self.state.value {
            Some(value) => value.format(self.state.current),
            None => self.state.raw.clone(),
        }
    }

    /// Text once the count has finished
    pub fn final_display(&self) -> String {
        match &self.state.value {
            Some(value) => value.to_string(),
            None => self.state.raw.clone(),
        }
    }

    pub fn current(&self) -> f64 {
        self.state.current
    }

    pub fn target(&self) -> Option<f64> {
        self.state.value.as_ref().map(|v| v.target)
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Counter clock time at which the current count started
    pub fn started_at_ms(&self) -> Option<f32> {
        self.state.started_at_ms
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> CounterValue {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_suffix_and_decimals() {
        let v = parse("1.3B");
        assert_eq!(v.prefix, "");
        assert_eq!(v.target, 1.3);
        assert_eq!(v.decimals, 1);
        assert_eq!(v.suffix, "B");
        assert_eq!(v.to_string(), "1.3B");
    }

    #[test]
    fn test_parse_prefix_and_grouping() {
        let v = parse("$12,500+");
        assert_eq!(v.prefix, "$");
        assert_eq!(v.target, 12500.0);
        assert!(v.grouped);
        assert_eq!(v.suffix, "+");
        assert_eq!(v.format(1234.4), "$1,234+");
        assert_eq!(v.to_string(), "$12,500+");
    }

    #[test]
    fn test_parse_negative_and_trailing_dot() {
        let v = parse("-40%");
        assert_eq!(v.target, -40.0);
        assert_eq!(v.to_string(), "-40%");

        let v = parse("99.");
        assert_eq!(v.target, 99.0);
        assert_eq!(v.suffix, ".");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "N/A".parse::<CounterValue>(),
            Err(RevealError::InvalidCounterValue(_))
        ));
        assert!("1.2.3".parse::<CounterValue>().is_err());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567.25"), "1,234,567.25");
        assert_eq!(group_thousands("-1000"), "-1,000");
        assert_eq!(group_thousands("999"), "999");
    }

    #[test]
    fn test_counts_up_in_view() {
        let mut counter = Counter::new("1.3B", 2000, Easing::EaseOutCubic);
        let input = |in_view| CounterInput {
            value: "1.3B",
            in_view,
        };

        assert_eq!(counter.update(input(false), 16.0), "0.0B");
        let mid = counter.update(input(true), 1000.0);
        assert_ne!(mid, "0.0B");
        assert!(counter.current() > 0.0 && counter.current() < 1.3);
        assert_eq!(counter.started_at_ms(), Some(16.0));

        assert_eq!(counter.update(input(true), 1500.0), "1.3B");
        assert!(!counter.is_running());
    }

    #[test]
    fn test_leaving_view_resets_to_zero() {
        let mut counter = Counter::new("250+", 2000, Easing::EaseOut);
        counter.update(CounterInput { value: "250+", in_view: true }, 700.0);
        assert!(counter.current() > 0.0);

        let text = counter.update(CounterInput { value: "250+", in_view: false }, 16.0);
        assert_eq!(counter.current(), 0.0);
        assert_eq!(text, "0+");
        assert_eq!(counter.state(), PlaybackState::Paused);

        // Re-entry counts again from zero
        counter.update(CounterInput { value: "250+", in_view: true }, 2000.0);
        assert_eq!(counter.display(), "250+");
    }

    #[test]
    fn test_value_change_restarts() {
        let mut counter = Counter::new("100", 1000, Easing::Linear);
        counter.update(CounterInput { value: "100", in_view: true }, 1000.0);
        assert_eq!(counter.display(), "100");

        counter.update(CounterInput { value: "500", in_view: true }, 0.0);
        assert_eq!(counter.display(), "0");
        assert_eq!(counter.target(), Some(500.0));
    }

    #[test]
    fn test_unparseable_value_passes_through() {
        let mut counter = Counter::new("soon", 1000, Easing::Linear);
        assert_eq!(counter.update(CounterInput { value: "soon", in_view: true }, 100.0), "soon");
        assert_eq!(counter.final_display(), "soon");
        assert_eq!(counter.target(), None);
    }
}
