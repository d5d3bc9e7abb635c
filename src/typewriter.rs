//! Role-title typewriter: types a phrase one character at a time, holds it,
//! deletes it, then moves on to the next phrase, forever.
//!
//! The machine is driven externally: every [`Typewriter::tick`] mutates the
//! displayed text and returns how long to wait before the next tick. The
//! browser loop sleeps on a timer between ticks; tests drive it on a virtual
//! clock.

use std::time::Duration;

pub const TYPED_ROLE_ID: &str = "typed-role";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub type_interval: Duration,
    pub delete_interval: Duration,
    pub hold: Duration,
    pub rest: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Typing,
    Deleting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick<'a> {
    pub text: &'a str,
    pub delay: Duration,
}

#[derive(Debug)]
pub struct Typewriter {
    phrases: Vec<Vec<char>>,
    timing: Timing,
    phrase_index: usize,
    shown: usize,
    phase: Phase,
    display: String,
}

impl Typewriter {
    /// Returns `None` when there is nothing to type.
    pub fn new(phrases: &[String], timing: Timing) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }

        Some(Self {
            phrases: phrases.iter().map(|phrase| phrase.chars().collect()).collect(),
            timing,
            phrase_index: 0,
            shown: 0,
            phase: Phase::Typing,
            display: String::new(),
        })
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn text(&self) -> &str {
        &self.display
    }

    pub fn tick(&mut self) -> Tick<'_> {
        let delay = match self.phase {
            Phase::Typing => self.type_step(),
            Phase::Deleting => self.delete_step(),
        };

        Tick {
            text: &self.display,
            delay,
        }
    }

    fn type_step(&mut self) -> Duration {
        let phrase = &self.phrases[self.phrase_index];

        if let Some(&next) = phrase.get(self.shown) {
            self.display.push(next);
            self.shown += 1;
            return self.timing.type_interval;
        }

        // The deletion interval starts after the hold, so the first removal
        // lands one interval later.
        self.phase = Phase::Deleting;
        self.timing.hold + self.timing.delete_interval
    }

    fn delete_step(&mut self) -> Duration {
        if self.shown > 0 {
            self.display.pop();
            self.shown -= 1;
        }

        if self.shown > 0 {
            return self.timing.delete_interval;
        }

        self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
        self.phase = Phase::Typing;
        self.timing.rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> Timing {
        Timing {
            type_interval: Duration::from_millis(40),
            delete_interval: Duration::from_millis(30),
            hold: Duration::from_millis(1_400),
            rest: Duration::from_millis(220),
        }
    }

    fn phrases(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    // Duration of one full type/hold/delete/rest cycle for a phrase of `len` chars.
    fn cycle_length(len: u32, timing: Timing) -> Duration {
        timing.type_interval * len
            + timing.hold
            + timing.delete_interval * len
            + timing.rest
    }

    #[test]
    fn empty_phrase_list_is_rejected() {
        assert!(Typewriter::new(&[], timing()).is_none());
    }

    #[test]
    fn types_then_holds_then_deletes() {
        let mut typewriter = Typewriter::new(&phrases(&["ab"]), timing()).expect("one phrase");

        assert_eq!(typewriter.tick(), Tick { text: "a", delay: Duration::from_millis(40) });
        assert_eq!(typewriter.tick(), Tick { text: "ab", delay: Duration::from_millis(40) });
        assert_eq!(typewriter.tick(), Tick { text: "ab", delay: Duration::from_millis(1_430) });
        assert_eq!(typewriter.tick(), Tick { text: "a", delay: Duration::from_millis(30) });
        assert_eq!(typewriter.tick(), Tick { text: "", delay: Duration::from_millis(220) });
        assert_eq!(typewriter.tick(), Tick { text: "a", delay: Duration::from_millis(40) });
    }

    #[test]
    fn multibyte_characters_are_typed_whole() {
        let mut typewriter = Typewriter::new(&phrases(&["a • b"]), timing()).expect("one phrase");
        let mut seen = Vec::new();

        for _ in 0..5 {
            seen.push(typewriter.tick().text.to_string());
        }

        assert_eq!(seen, vec!["a", "a ", "a •", "a • ", "a • b"]);
    }

    #[test]
    fn empty_phrase_is_skipped_without_underflow() {
        let mut typewriter = Typewriter::new(&phrases(&["", "x"]), timing()).expect("two phrases");

        assert_eq!(typewriter.tick().text, "");
        assert_eq!(typewriter.tick().text, "");
        assert_eq!(typewriter.phrase_index(), 1);
        assert_eq!(typewriter.tick().text, "x");
    }

    #[test]
    fn full_cycles_show_every_phrase_in_order() {
        let input = phrases(&["BIM Coordinator", "MSc", "4D • Clash"]);
        let timing = timing();
        let mut typewriter = Typewriter::new(&input, timing).expect("three phrases");

        let total: Duration = input
            .iter()
            .map(|phrase| cycle_length(phrase.chars().count() as u32, timing))
            .sum::<Duration>()
            * 2;

        let mut clock = Duration::ZERO;
        let mut completed = Vec::new();
        let mut previous = String::new();

        while clock < total {
            let tick = typewriter.tick();
            let (text, delay) = (tick.text.to_string(), tick.delay);
            let phrase = &input[typewriter.phrase_index()];
            if text == *phrase && previous != *phrase {
                completed.push(text.clone());
            }
            previous = text;
            clock += delay;
        }

        assert_eq!(clock, total);
        let expected: Vec<String> = input.iter().chain(input.iter()).cloned().collect();
        assert_eq!(completed, expected);
        assert_eq!(typewriter.phrase_index(), 0);
        assert_eq!(typewriter.text(), "");
    }
}
