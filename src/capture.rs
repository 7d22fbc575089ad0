//! On-screen text capture
//!
//! Accessibility events deliver the text of the focused window. Each line of
//! a capture becomes one hypothesis so a command shown on screen resolves the
//! same way as a spoken one.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{HypothesisSet, Locale, Resolution};
use crate::engine::{Engine, IntentSink};

/// Confidence given to captured lines; screen text carries no recognizer score
pub const CAPTURE_CONFIDENCE: f32 = 0.9;

/// Text read from another application's window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Package or application id that produced the text
    pub package: String,
    pub text: String,
}

impl CaptureEvent {
    pub fn new(package: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            text: text.into(),
        }
    }
}

pub struct ScreenCapture {
    engine: Arc<Engine>,
    locale: Locale,
    excluded: HashSet<String>,
    confidence: f32,
}

impl ScreenCapture {
    pub fn new(engine: Arc<Engine>, locale: Locale) -> Self {
        Self {
            engine,
            locale,
            excluded: HashSet::new(),
            confidence: CAPTURE_CONFIDENCE,
        }
    }

    /// Ignore events coming from `package`
    pub fn exclude(mut self, package: impl Into<String>) -> Self {
        self.excluded.insert(package.into());
        self
    }

    /// Override the confidence attached to captured lines (clamped to [0, 1])
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Hypotheses for `event`, or `None` if the event should be ignored
    pub fn hypotheses(&self, event: &CaptureEvent) -> Option<HypothesisSet> {
        if self.excluded.contains(&event.package) {
            debug!("Ignoring capture from excluded package {}", event.package);
            return None;
        }

        let lines: Vec<&str> = event
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return None;
        }

        HypothesisSet::uniform(lines, self.confidence).ok()
    }

    /// Resolve a capture event, returning `None` for ignored events
    pub fn handle(&self, event: &CaptureEvent) -> Option<Resolution> {
        let hypotheses = self.hypotheses(event)?;
        Some(self.engine.resolve(&hypotheses, &self.locale))
    }

    /// Resolve a capture event and dispatch the result
    pub fn handle_and_dispatch(
        &self,
        event: &CaptureEvent,
        sink: &dyn IntentSink,
    ) -> Result<Option<Resolution>> {
        let Some(hypotheses) = self.hypotheses(event) else {
            return Ok(None);
        };
        self.engine
            .resolve_and_dispatch(&hypotheses, &self.locale, sink)
            .map(Some)
    }
}
