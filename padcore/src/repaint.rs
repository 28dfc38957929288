//! Repaint scheduling for a mostly idle editor.
//!
//! egui redraws every frame it runs. `RepaintController` keeps the app
//! asleep until either input arrives or something outside the input
//! stream (a finished background task, a notice that just appeared) calls
//! [`RepaintController::mark_needs_repaint`].
//!
//! While a background task is running the app can switch to continuous
//! mode so progress text in the status bar keeps updating.

use std::time::Duration;

/// Interval between frames while continuous mode is on.
const DEFAULT_REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// What to ask of egui once the current frame is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextFrame {
    Idle,
    Now,
    After(Duration),
}

/// Controls when the egui context should request repaints.
///
/// Call [`begin_frame`](Self::begin_frame) at the top of `update()` and
/// [`end_frame`](Self::end_frame) at the bottom.
#[derive(Debug)]
pub struct RepaintController {
    continuous: bool,
    needs_repaint: bool,
    interval: Duration,
}

impl Default for RepaintController {
    fn default() -> Self {
        Self::new()
    }
}

impl RepaintController {
    pub fn new() -> Self {
        Self {
            continuous: false,
            needs_repaint: false,
            interval: DEFAULT_REPAINT_INTERVAL,
        }
    }

    /// Keep scheduling frames at the controller's interval until turned off.
    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    /// Request one more frame after the current one.
    pub fn mark_needs_repaint(&mut self) {
        self.needs_repaint = true;
    }

    pub fn begin_frame(&mut self) {
        self.needs_repaint = false;
    }

    pub fn end_frame(&mut self, ctx: &egui::Context) {
        match self.next_frame() {
            NextFrame::After(interval) => ctx.request_repaint_after(interval),
            NextFrame::Now => ctx.request_repaint(),
            NextFrame::Idle => {}
        }
    }

    fn next_frame(&self) -> NextFrame {
        if self.continuous {
            NextFrame::After(self.interval)
        } else if self.needs_repaint {
            NextFrame::Now
        } else {
            NextFrame::Idle
        }
    }
}
