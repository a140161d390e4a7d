// src/handlers/guard.rs

//! Content-protection guard for proctored sessions.
//!
//! The guard is a pure state machine: the embedding UI feeds it events and
//! the current `Instant`, then polls it to learn when the forced logout is
//! due. Nothing here reads a clock or spawns timers.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::{
    api::AuthApi,
    config::{
        EXTENSION_AREA_HEIGHT_PX, EXTENSION_AREA_WIDTH_PX, EXTENSION_WATCH_WINDOW,
        FULLSCREEN_EXIT_WINDOW, FULLSCREEN_REQUEST_WINDOW, RESIZE_THRESHOLD_PX, TOOLBAR_BAND_PX,
        VIOLATION_GRACE_PERIOD,
    },
    handlers::{Notice, Page},
    routes::Route,
    session::SessionStore,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardEvent {
    VisibilityChanged { hidden: bool },
    FullscreenChanged { active: bool },
    /// Emitted just before the UI asks for fullscreen.
    FullscreenRequested,
    PointerMoved { x: f64, y: f64, viewport_width: f64 },
    FocusLost,
    Resized { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    TabSwitch,
    ExtensionArea,
    Toolbar,
    FocusLost,
    WindowResized,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Violation::TabSwitch => "tab switch",
            Violation::ExtensionArea => "pointer in extension icon area",
            Violation::Toolbar => "pointer in browser toolbar area",
            Violation::FocusLost => "window focus lost",
            Violation::WindowResized => "window resized",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    Monitoring { since: Instant },
    ViolationDetected { at: Instant, violation: Violation },
    LoggedOut,
}

/// What the caller should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPoll {
    Inactive,
    Watching,
    /// Warning is on screen; logout in `remaining`.
    Pending { remaining: Duration },
    LogoutDue,
}

/// What a detector sees besides the event itself.
#[derive(Debug, Clone, Copy)]
pub struct DetectorContext {
    /// Time since monitoring started.
    pub elapsed: Duration,
    /// Viewport size when the guard was armed.
    pub baseline: Viewport,
}

impl DetectorContext {
    fn in_watch_window(&self) -> bool {
        self.elapsed < EXTENSION_WATCH_WINDOW
    }
}

pub trait Detector: Send + Sync {
    fn inspect(&self, event: &GuardEvent, ctx: &DetectorContext) -> Option<Violation>;
}

/// Tab hidden. Active for the whole session.
pub struct TabSwitchDetector;

impl Detector for TabSwitchDetector {
    fn inspect(&self, event: &GuardEvent, _ctx: &DetectorContext) -> Option<Violation> {
        match event {
            GuardEvent::VisibilityChanged { hidden: true } => Some(Violation::TabSwitch),
            _ => None,
        }
    }
}

/// Pointer near the extension icons or anywhere in the toolbar band.
pub struct ToolbarDetector;

impl Detector for ToolbarDetector {
    fn inspect(&self, event: &GuardEvent, ctx: &DetectorContext) -> Option<Violation> {
        let GuardEvent::PointerMoved { x, y, viewport_width } = *event else {
            return None;
        };
        if !ctx.in_watch_window() {
            return None;
        }
        if y < EXTENSION_AREA_HEIGHT_PX && x > viewport_width - EXTENSION_AREA_WIDTH_PX {
            Some(Violation::ExtensionArea)
        } else if y < TOOLBAR_BAND_PX {
            Some(Violation::Toolbar)
        } else {
            None
        }
    }
}

pub struct FocusDetector;

impl Detector for FocusDetector {
    fn inspect(&self, event: &GuardEvent, ctx: &DetectorContext) -> Option<Violation> {
        (matches!(event, GuardEvent::FocusLost) && ctx.in_watch_window()).then_some(Violation::FocusLost)
    }
}

/// Either dimension moved by more than the threshold since arming.
pub struct ResizeDetector;

impl Detector for ResizeDetector {
    fn inspect(&self, event: &GuardEvent, ctx: &DetectorContext) -> Option<Violation> {
        let GuardEvent::Resized { width, height } = *event else {
            return None;
        };
        let moved = width.abs_diff(ctx.baseline.width) > RESIZE_THRESHOLD_PX
            || height.abs_diff(ctx.baseline.height) > RESIZE_THRESHOLD_PX;
        (moved && ctx.in_watch_window()).then_some(Violation::WindowResized)
    }
}

pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(TabSwitchDetector),
        Box::new(ToolbarDetector),
        Box::new(FocusDetector),
        Box::new(ResizeDetector),
    ]
}

pub struct SessionGuard {
    state: GuardState,
    detectors: Vec<Box<dyn Detector>>,
    baseline: Viewport,
    fullscreen: bool,
    quiet_until: Option<Instant>,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::with_detectors(default_detectors())
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self {
            state: GuardState::Idle,
            detectors,
            baseline: Viewport { width: 0, height: 0 },
            fullscreen: false,
            quiet_until: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Starts monitoring. Ignored once a violation is pending or after logout.
    pub fn arm(&mut self, now: Instant, viewport: Viewport) {
        if matches!(self.state, GuardState::Idle | GuardState::Monitoring { .. }) {
            self.state = GuardState::Monitoring { since: now };
            self.baseline = viewport;
            self.fullscreen = false;
            self.quiet_until = None;
            tracing::info!("Session guard armed ({}x{})", viewport.width, viewport.height);
        }
    }

    /// Stops monitoring, e.g. when playback ends. A pending logout still stands.
    pub fn disarm(&mut self) {
        if let GuardState::Monitoring { .. } = self.state {
            self.state = GuardState::Idle;
            tracing::info!("Session guard disarmed");
        }
    }

    fn suppressed(&self, now: Instant) -> bool {
        self.fullscreen || self.quiet_until.is_some_and(|until| now < until)
    }

    /// Feeds one event. Returns the violation if this event triggered one.
    pub fn handle(&mut self, event: GuardEvent, now: Instant) -> Option<Violation> {
        let GuardState::Monitoring { since } = self.state else {
            return None;
        };

        match event {
            GuardEvent::FullscreenRequested => {
                self.quiet_until = Some(now + FULLSCREEN_REQUEST_WINDOW);
                return None;
            }
            GuardEvent::FullscreenChanged { active } => {
                self.fullscreen = active;
                if !active {
                    self.quiet_until = Some(now + FULLSCREEN_EXIT_WINDOW);
                }
                return None;
            }
            _ => {}
        }

        if self.suppressed(now) {
            tracing::debug!("Ignoring {:?} during fullscreen transition", event);
            return None;
        }

        let ctx = DetectorContext {
            elapsed: now.saturating_duration_since(since),
            baseline: self.baseline,
        };
        let violation = self.detectors.iter().find_map(|d| d.inspect(&event, &ctx))?;

        tracing::warn!("Security violation detected: {}", violation);
        self.state = GuardState::ViolationDetected { at: now, violation };
        Some(violation)
    }

    pub fn poll(&self, now: Instant) -> GuardPoll {
        match self.state {
            GuardState::Idle | GuardState::LoggedOut => GuardPoll::Inactive,
            GuardState::Monitoring { .. } => GuardPoll::Watching,
            GuardState::ViolationDetected { at, .. } => {
                let waited = now.saturating_duration_since(at);
                if waited >= VIOLATION_GRACE_PERIOD {
                    GuardPoll::LogoutDue
                } else {
                    GuardPoll::Pending {
                        remaining: VIOLATION_GRACE_PERIOD - waited,
                    }
                }
            }
        }
    }

    /// Warning to show while the logout is pending.
    pub fn warning(&self) -> Option<Notice> {
        match self.state {
            GuardState::ViolationDetected { .. } => {
                Some(Notice::error("Security violation detected! Logging out..."))
            }
            _ => None,
        }
    }

    /// Forced logout. The server call is best-effort; the local session is
    /// always cleared.
    pub async fn logout<A>(&mut self, api: &A, store: &dyn SessionStore) -> Page<()>
    where
        A: AuthApi + ?Sized,
    {
        if let Err(e) = api.logout().await {
            tracing::error!("Failed to call logout API: {}", e);
        }
        if let Err(e) = store.clear() {
            tracing::error!("Failed to clear session: {}", e);
        }
        self.state = GuardState::LoggedOut;
        Page::Redirect {
            to: Route::Login,
            notice: Notice::success("You have been logged out for security reasons."),
        }
    }
}
