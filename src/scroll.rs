use crate::constants::{
    COLLAPSED_HEIGHT, EXPANDED_HEIGHT, HEIGHT_ANIMATION_MS, ITEM_SIZE, NO_TARGET_COLLAPSE_DELAY_MS,
    SNAP_RESCHEDULE_DELAY_MS,
};
use crate::time::Clock;

/// Phase of a stop list's scroll/snap state machine.
///
/// Exactly one phase holds at any instant: `UserInteracting` while a drag
/// is down, `Settling` while momentum continues after the drag,
/// `IdleExpanded` while an expanded list awaits its delayed collapse, and
/// `IdleCollapsed` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    IdleCollapsed,
    IdleExpanded,
    UserInteracting,
    Settling,
}

/// A programmatic scroll for the host list to execute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub offset: f64,
    pub animated: bool,
}

impl ScrollCommand {
    fn scroll_to(offset: f64) -> Self {
        Self { offset, animated: true }
    }
}

/// Scroll offset that centers the stop at `index` under the snap anchor
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn snap_offset(index: usize) -> f64 {
    index as f64 * ITEM_SIZE - ITEM_SIZE / 2.0
}

/// Linear interpolation of `value` from the `input` range to the `output`
/// range, matching the rendering layer's interpolate helper
fn interpolate(value: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let (in_start, in_end) = input;
    let (out_start, out_end) = output;
    if (in_end - in_start).abs() < f64::EPSILON {
        return out_start;
    }

    let t = (value - in_start) / (in_end - in_start);
    out_start + (out_end - out_start) * t
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Time-parameterized value interpolation, evaluated against the injected
/// clock so the state machine is testable without a rendering clock
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    from: f64,
    to: f64,
    start_ms: f64,
    duration_ms: f64,
}

impl Animation {
    fn fixed(value: f64) -> Self {
        Self { from: value, to: value, start_ms: 0.0, duration_ms: 0.0 }
    }

    fn retarget(&mut self, to: f64, now_ms: f64) {
        self.from = self.value_at(now_ms);
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = HEIGHT_ANIMATION_MS;
    }

    #[must_use]
    pub fn value_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }

        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_in_out(t)
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }
}

/// Owns one stop list's scroll offset, container height and snap target,
/// arbitrating between user scrolling, momentum and snapping to the
/// tracked stop.
///
/// The host forwards scroll events (`drag_start`, `drag_end`,
/// `momentum_begin`, `momentum_end`, `scrolled`), drives logical time via
/// `tick`, and executes commands drained with `take_command`. At most one
/// programmatic scroll is in flight; a newer target supersedes a pending
/// one. Changing the container's height never visibly moves a snapped
/// stop off its anchor point: mid-list the concurrent snap scroll holds
/// the anchor, and otherwise the offset is re-derived by interpolating
/// between the expanded and collapsed height bounds.
pub struct ScrollSnapController<C: Clock> {
    clock: C,
    phase: ScrollPhase,
    dragging: bool,
    momentum: bool,
    tracked: Option<usize>,
    scroll_y: f64,
    scroll_y_start: f64,
    snapped: bool,
    at_end: bool,
    height: Animation,
    last_height: f64,
    collapse_deadline: Option<f64>,
    pending_snap: Option<(f64, usize)>,
    command: Option<ScrollCommand>,
}

impl<C: Clock> ScrollSnapController<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            phase: ScrollPhase::IdleCollapsed,
            dragging: false,
            momentum: false,
            tracked: None,
            scroll_y: 0.0,
            scroll_y_start: 0.0,
            snapped: false,
            at_end: false,
            height: Animation::fixed(COLLAPSED_HEIGHT),
            last_height: COLLAPSED_HEIGHT,
            collapse_deadline: None,
            pending_snap: None,
            command: None,
        }
    }

    /// The stop index the Closest-Stop Tracker currently reports.
    ///
    /// A new target while idle re-snaps after a settle delay rather than
    /// immediately, so the list's layout pass after a data refresh is not
    /// raced; a newer target replaces a still-pending one.
    pub fn set_tracked(&mut self, tracked: Option<usize>) {
        if tracked == self.tracked {
            return;
        }
        self.tracked = tracked;

        let Some(index) = tracked else { return };
        if matches!(self.phase, ScrollPhase::IdleCollapsed | ScrollPhase::IdleExpanded) {
            self.pending_snap = Some((self.clock.now_ms() + SNAP_RESCHEDULE_DELAY_MS, index));
        }
    }

    pub fn drag_start(&mut self) {
        let now = self.clock.now_ms();
        self.dragging = true;
        self.phase = ScrollPhase::UserInteracting;
        // User interaction discards any pending programmatic scroll
        self.pending_snap = None;
        self.collapse_deadline = None;
        self.command = None;
        self.height.retarget(EXPANDED_HEIGHT, now);
    }

    pub fn drag_end(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;

        if self.momentum {
            self.phase = ScrollPhase::Settling;
        } else {
            self.settle(self.clock.now_ms());
        }
    }

    pub fn momentum_begin(&mut self) {
        let now = self.clock.now_ms();
        self.momentum = true;
        self.pending_snap = None;
        self.collapse_deadline = None;
        if !self.dragging {
            self.phase = ScrollPhase::Settling;
        }
        self.height.retarget(EXPANDED_HEIGHT, now);
    }

    pub fn momentum_end(&mut self) {
        if !self.momentum {
            return;
        }
        self.momentum = false;

        if !self.dragging {
            self.settle(self.clock.now_ms());
        }
    }

    /// Forwarded scroll event from the host list
    pub fn scrolled(&mut self, offset: f64, viewport_height: f64, content_height: f64) {
        self.scroll_y = offset;
        self.at_end = viewport_height + offset > content_height;
    }

    /// Drain due timers and run the height reaction against logical time
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();

        if let Some(due) = self.collapse_deadline {
            if now >= due {
                self.collapse_deadline = None;
                self.height.retarget(COLLAPSED_HEIGHT, now);
                self.phase = ScrollPhase::IdleCollapsed;
            }
        }

        if let Some((due, index)) = self.pending_snap {
            if now >= due {
                self.pending_snap = None;
                self.snapped = true;
                self.command = Some(ScrollCommand::scroll_to(snap_offset(index)));
            }
        }

        self.height_reaction(now);
    }

    /// Interaction has ended: snap to the tracked stop and collapse, or
    /// hold the expansion briefly when there is nothing to snap to
    fn settle(&mut self, now: f64) {
        self.scroll_y_start = self.scroll_y;

        if let Some(index) = self.tracked {
            self.snapped = true;
            self.command = Some(ScrollCommand::scroll_to(snap_offset(index)));
            self.height.retarget(COLLAPSED_HEIGHT, now);
            self.phase = ScrollPhase::IdleCollapsed;
        } else {
            self.snapped = false;
            self.collapse_deadline = Some(now + NO_TARGET_COLLAPSE_DELAY_MS);
            self.phase = ScrollPhase::IdleExpanded;
        }
    }

    fn height_reaction(&mut self, now: f64) {
        let height = self.height.value_at(now);
        if (height - self.last_height).abs() < f64::EPSILON {
            return;
        }
        self.last_height = height;

        // The finger owns the offset during interaction
        if self.is_interacting() {
            return;
        }
        // Mid-list the snap scroll itself holds the anchor; a correction
        // here would fight it. At the end of the list the snap target is
        // clamped, so the full-range correction takes over.
        if self.snapped && !self.at_end {
            return;
        }

        let range = EXPANDED_HEIGHT - COLLAPSED_HEIGHT;
        let target_end = if self.at_end { range } else { range / 2.0 };
        let offset = interpolate(height, (EXPANDED_HEIGHT, COLLAPSED_HEIGHT), (0.0, target_end));
        self.command = Some(ScrollCommand::scroll_to(self.scroll_y_start + offset));
    }

    /// The single in-flight programmatic scroll, if any
    pub fn take_command(&mut self) -> Option<ScrollCommand> {
        self.command.take()
    }

    #[must_use]
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Container height at the current logical time
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height.value_at(self.clock.now_ms())
    }

    #[must_use]
    pub fn height_target(&self) -> f64 {
        self.height.target()
    }

    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.dragging || self.momentum
    }

    #[must_use]
    pub fn is_snapped(&self) -> bool {
        self.snapped
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_y
    }
}
