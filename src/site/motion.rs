use tracing::{debug, info};

use crate::dom::{Document, ElementId};

pub const REVEAL_ATTR: &str = "data-reveal";
pub const PARALLAX_ATTR: &str = "data-parallax";
pub const COUNT_ATTR: &str = "data-count";
pub const COUNT_SUFFIX_ATTR: &str = "data-count-suffix";

const DEFAULT_PARALLAX_SPEED: f32 = 0.2;
const REVEALED_STYLE: &str = "opacity: 1; transform: none";
const PENDING_STYLE: &str = "opacity: 0; transform: translateY(40px)";

/// What the client can do: is the animation library loaded, and does the
/// user ask the OS for reduced motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionEnvironment {
    pub library_available: bool,
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Scroll-linked effects driven by the animation library.
    Animated,
    /// CSS-only: everything is shown in its final state.
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollEffect {
    Reveal { element: ElementId },
    Parallax { element: ElementId, speed: f32 },
    Counter { element: ElementId, target: u64 },
}

/// Chooses between scroll-triggered effects and the static fallback.
///
/// Nothing here can fail; any doubt resolves to [`MotionMode::Static`].
#[derive(Debug, Clone)]
pub struct MotionController {
    env: MotionEnvironment,
    mode: MotionMode,
    effects: Vec<ScrollEffect>,
}

impl MotionController {
    pub fn init(doc: &mut Document, env: MotionEnvironment) -> Self {
        let mut controller = Self {
            env,
            mode: MotionMode::Static,
            effects: Vec::new(),
        };
        controller.apply(doc);
        controller
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn environment(&self) -> MotionEnvironment {
        self.env
    }

    pub fn effects(&self) -> &[ScrollEffect] {
        &self.effects
    }

    /// OS-level reduced-motion setting changed while the page is open.
    pub fn set_reduced_motion(&mut self, doc: &mut Document, reduced: bool) {
        if self.env.reduced_motion == reduced {
            return;
        }
        self.env.reduced_motion = reduced;
        self.apply(doc);
    }

    /// The animation library failed to load or threw during setup.
    pub fn on_library_failed(&mut self, doc: &mut Document) {
        if !self.env.library_available {
            return;
        }
        info!("Animation library unavailable, falling back to CSS transitions");
        self.env.library_available = false;
        self.apply(doc);
    }

    /// Re-evaluate the mode and bring every marked element in line with it.
    pub fn apply(&mut self, doc: &mut Document) {
        self.mode = if self.env.library_available && !self.env.reduced_motion {
            MotionMode::Animated
        } else {
            MotionMode::Static
        };
        self.effects.clear();

        for element in doc.find_all_by_attr(REVEAL_ATTR) {
            match self.mode {
                MotionMode::Animated => {
                    doc.set_attr(element, "style", PENDING_STYLE);
                    doc.set_attr(element, "data-motion-state", "pending");
                    doc.remove_class(element, "is-visible");
                    self.effects.push(ScrollEffect::Reveal { element });
                }
                MotionMode::Static => {
                    doc.set_attr(element, "style", REVEALED_STYLE);
                    doc.remove_attr(element, "data-motion-state");
                    doc.add_class(element, "is-visible");
                }
            }
        }

        for element in doc.find_all_by_attr(PARALLAX_ATTR) {
            match self.mode {
                MotionMode::Animated => {
                    let speed = doc
                        .attr(element, PARALLAX_ATTR)
                        .and_then(|raw| raw.trim().parse::<f32>().ok())
                        .filter(|speed| speed.is_finite())
                        .unwrap_or(DEFAULT_PARALLAX_SPEED);
                    doc.remove_attr(element, "data-parallax-disabled");
                    self.effects.push(ScrollEffect::Parallax { element, speed });
                }
                MotionMode::Static => {
                    doc.set_attr(element, "data-parallax-disabled", "true");
                    // Revealed elements already carry `transform: none`.
                    if !doc.has_attr(element, REVEAL_ATTR) {
                        doc.remove_attr(element, "style");
                    }
                }
            }
        }

        for element in doc.find_all_by_attr(COUNT_ATTR) {
            let Some(target) = doc
                .attr(element, COUNT_ATTR)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
            else {
                debug!("Skipping counter with invalid target");
                continue;
            };
            let suffix = doc.attr(element, COUNT_SUFFIX_ATTR).unwrap_or_default().to_string();
            match self.mode {
                MotionMode::Animated => {
                    doc.set_text(element, &format!("0{suffix}"));
                    self.effects.push(ScrollEffect::Counter { element, target });
                }
                MotionMode::Static => doc.set_text(element, &format!("{target}{suffix}")),
            }
        }

        let html = doc.html();
        doc.toggle_class(html, "motion-static", self.mode == MotionMode::Static);
        debug!(mode = ?self.mode, effects = self.effects.len(), "Motion applied");
    }
}
