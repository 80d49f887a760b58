//! Counters, progress bars and progress rings in the `#stats` section.
//! Everything animates once, the first time the section scrolls into view.

use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

use web_sys::Element;

use crate::config::StatsConfig;
use crate::dom::{self, ObserverOptions};

/// Assumed frame length when spreading a count over its duration.
const FRAME_MS: f64 = 16.0;
const RING_RADIUS: f64 = 36.0;
/// Dash offset of an empty ring.
const RING_EMPTY_OFFSET: &str = "226";
const MAX_START_JITTER_MS: f64 = 200.0;

/// Ring element ids and their fill targets.
const RINGS: [(&str, f64); 4] = [
    ("progress-ring-1", 226.0),
    ("progress-ring-2", 221.0),
    ("progress-ring-3", 215.0),
    ("progress-ring-4", 224.0),
];

/// A count-up from zero to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    current: f64,
    target: f64,
    increment: f64,
}

impl CounterAnimation {
    pub fn new(target: f64, duration_ms: u32) -> Self {
        let frames = (f64::from(duration_ms) / FRAME_MS).max(1.0);
        Self {
            current: 0.0,
            target,
            increment: target / frames,
        }
    }

    /// Advance one frame. Returns the text to show and whether more frames
    /// are needed.
    pub fn step(&mut self) -> (String, bool) {
        self.current += self.increment;
        if self.current < self.target {
            (format!("{}", self.current.ceil()), true)
        } else {
            (format!("{}", self.target), false)
        }
    }
}

/// `stroke-dashoffset` for a ring filled to `target` percent.
pub fn ring_offset(target: f64) -> f64 {
    let circumference = 2.0 * PI * RING_RADIUS;
    circumference - (target / 100.0) * circumference
}

/// Leading integer of a `data-target` value, like `parseInt`.
pub fn parse_target(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse::<i64>().ok().map(|n| n as f64)
}

struct StatsAnimator {
    config: StatsConfig,
    animated: Cell<bool>,
    counters: Vec<Element>,
    bars: Vec<Element>,
    rings: Vec<(Element, f64)>,
}

impl StatsAnimator {
    fn start(&self) {
        self.animate_counters();
        self.animate_bars();
        self.animate_rings();
    }

    fn animate_counters(&self) {
        for counter in &self.counters {
            // NaN target, like parseInt on garbage
            let target = counter
                .get_attribute("data-target")
                .and_then(|raw| parse_target(&raw))
                .unwrap_or(f64::NAN);
            let mut animation = CounterAnimation::new(target, self.config.counter_duration_ms);
            let counter = counter.clone();
            let jitter = (js_sys::Math::random() * MAX_START_JITTER_MS) as i32;
            dom::set_timeout(jitter, move || {
                dom::animate(move || {
                    let (text, more) = animation.step();
                    counter.set_text_content(Some(text.as_str()));
                    more
                });
            });
        }
    }

    fn animate_bars(&self) {
        for (index, bar) in self.bars.iter().enumerate() {
            let width = bar.get_attribute("data-width").unwrap_or_default();
            let bar = bar.clone();
            dom::set_timeout(index as i32 * self.config.bar_stagger_ms, move || {
                dom::set_style(&bar, "width", &format!("{}%", width));
            });
        }
    }

    fn animate_rings(&self) {
        for (index, (ring, target)) in self.rings.iter().enumerate() {
            let offset = ring_offset(*target);
            let ring = ring.clone();
            dom::set_timeout(index as i32 * self.config.ring_stagger_ms, move || {
                dom::set_style(&ring, "stroke-dashoffset", &offset.to_string());
            });
        }
    }

    fn reset(&self) {
        for counter in &self.counters {
            counter.set_text_content(Some("0"));
        }
        for bar in &self.bars {
            dom::set_style(bar, "width", "0%");
        }
        for (ring, _) in &self.rings {
            dom::set_style(ring, "stroke-dashoffset", RING_EMPTY_OFFSET);
        }
        self.animated.set(false);
    }

    /// Start unless already started. Returns true if this call started it.
    fn trigger(&self) -> bool {
        if self.animated.replace(true) {
            return false;
        }
        self.start();
        true
    }
}

pub fn init(config: &StatsConfig) {
    let Some(section) = dom::by_id("stats") else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    let animator = Rc::new(StatsAnimator {
        config: config.clone(),
        animated: Cell::new(false),
        counters: dom::query_all(".counter"),
        bars: dom::query_all(".progress-bar"),
        rings: RINGS
            .iter()
            .filter_map(|(id, target)| dom::by_id(id).map(|el| (el, *target)))
            .collect(),
    });

    let on_visible = animator.clone();
    dom::observe_visible(
        &[section],
        ObserverOptions {
            threshold: 0.5,
            root_margin: "0px 0px -50px 0px",
        },
        move |_, _| {
            on_visible.trigger();
        },
    );

    dom::listen::<web_sys::Event>(&window, "resize", move |_| {
        if !animator.animated.get() {
            return;
        }
        animator.reset();
        let replay = animator.clone();
        dom::set_timeout(animator.config.replay_delay_ms, move || {
            replay.trigger();
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_reaches_target_exactly() {
        let mut animation = CounterAnimation::new(250.0, 2000);
        let mut frames = 0;
        let last = loop {
            let (text, more) = animation.step();
            frames += 1;
            if !more {
                break text;
            }
            assert!(frames < 1000, "counter never finished");
        };
        assert_eq!(last, "250");
        assert_eq!(frames, 125);
    }

    #[test]
    fn test_counter_shows_rounded_up_values() {
        let mut animation = CounterAnimation::new(10.0, 2000);
        // 10 / 125 per frame
        assert_eq!(animation.step(), ("1".to_string(), true));
    }

    #[test]
    fn test_zero_duration_finishes_in_one_frame() {
        let mut animation = CounterAnimation::new(99.0, 0);
        assert_eq!(animation.step(), ("99".to_string(), false));
    }

    #[test]
    fn test_ring_offset() {
        let circumference = 2.0 * PI * 36.0;
        assert!((ring_offset(0.0) - circumference).abs() < 1e-9);
        assert!(ring_offset(100.0).abs() < 1e-9);
        assert!((ring_offset(50.0) - circumference / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_target_like_parse_int() {
        assert_eq!(parse_target("1500"), Some(1500.0));
        assert_eq!(parse_target(" 98% "), Some(98.0));
        assert_eq!(parse_target("-5"), Some(-5.0));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
    }
}
