use std::cell::Cell;
use std::rc::Rc;

use tracing::warn;
use web_sys::{Element, MouseEvent};

use crate::config::PartnersConfig;
use crate::dom;

/// Endless horizontal scroll. The logo strip is rendered twice, so jumping
/// back to 0 at the halfway point is seamless.
#[derive(Debug)]
pub struct Marquee {
    speed: f64,
    paused: Cell<bool>,
}

impl Marquee {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            paused: Cell::new(false),
        }
    }

    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn resume(&self) {
        self.paused.set(false);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Scroll position for the next frame.
    pub fn advance(&self, scroll_left: f64, scroll_width: f64) -> f64 {
        if self.is_paused() {
            return scroll_left;
        }
        let next = scroll_left + self.speed;
        if next >= scroll_width / 2.0 {
            0.0
        } else {
            next
        }
    }
}

pub fn init(config: &PartnersConfig) {
    let Some(carousel) = dom::query_all(".partners-carousel").into_iter().next() else {
        warn!("Partners carousel element not found");
        return;
    };
    let marquee = Rc::new(Marquee::new(config.scroll_speed));

    bind_pause(&carousel, &marquee);
    start(carousel, marquee);
}

fn bind_pause(carousel: &Element, marquee: &Rc<Marquee>) {
    let m = marquee.clone();
    dom::listen::<MouseEvent>(carousel, "mouseenter", move |_| m.pause());
    let m = marquee.clone();
    dom::listen::<MouseEvent>(carousel, "mouseleave", move |_| m.resume());

    for logo in dom::query_all_within(carousel, ".partner-logo") {
        let m = marquee.clone();
        dom::listen::<web_sys::Event>(&logo, "focusin", move |_| m.pause());
        let m = marquee.clone();
        dom::listen::<web_sys::Event>(&logo, "focusout", move |_| m.resume());
    }
}

fn start(carousel: Element, marquee: Rc<Marquee>) {
    // scrollLeft is integral, so fractional speeds accumulate here
    let position = Cell::new(f64::from(carousel.scroll_left()));
    dom::animate(move || {
        if !carousel.is_connected() {
            return false;
        }
        let next = marquee.advance(position.get(), f64::from(carousel.scroll_width()));
        position.set(next);
        carousel.set_scroll_left(next as i32);
        true
    });
}
