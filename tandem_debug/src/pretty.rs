// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in milliseconds.

use std::io::Write;

use tandem_core::timing::TickKind;
use tandem_core::trace::{FrameEvent, RegistrationChange, RegistrationEvent, TickEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

fn kind_name(kind: TickKind) -> &'static str {
    match kind {
        TickKind::Fixed => "fixed",
        TickKind::Variable => "variable",
    }
}

fn owner_or_unknown(owner: &str) -> &str {
    if owner.is_empty() { "?" } else { owner }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick(&mut self, e: &TickEvent) {
        let frame = e.frame_index.map_or_else(|| "-".to_owned(), |f| f.to_string());
        let _ = match e.hybrid_delta {
            Some(delta) => writeln!(
                self.writer,
                "[tick:{}] #{} frame={frame} delta={:.3}ms invoked={} stolen={:.3}ms",
                kind_name(e.kind),
                e.tick_index,
                ms(delta),
                e.invoked,
                ms(e.stolen_time),
            ),
            None => writeln!(
                self.writer,
                "[tick:{}] #{} frame={frame} skipped elapsed={:.3}ms stolen={:.3}ms",
                kind_name(e.kind),
                e.tick_index,
                ms(e.elapsed),
                ms(e.stolen_time),
            ),
        };
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let variable = if e.variable_pass { "pass" } else { "skip" };
        let _ = writeln!(
            self.writer,
            "[frame] #{} delta={:.3}ms fixed={} dropped={} variable={variable} \
             delivered={:.3}ms carry={:.3}ms",
            e.frame_index,
            ms(e.clamped_delta),
            e.fixed_ticks,
            e.dropped_fixed_ticks,
            ms(e.delivered),
            ms(e.accumulator),
        );
    }

    fn on_registration(&mut self, e: &RegistrationEvent) {
        let _ = match e.change {
            RegistrationChange::Registered { priority } => writeln!(
                self.writer,
                "[register] id={} owner={} priority={priority}",
                e.id.get(),
                owner_or_unknown(e.owner),
            ),
            RegistrationChange::Unregistered { removed } => writeln!(
                self.writer,
                "[unregister] id={} owner={} removed={removed}",
                e.id.get(),
                owner_or_unknown(e.owner),
            ),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::registry::RegistrationId;

    #[test]
    fn pretty_print_pass_and_skip() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tick(&TickEvent {
            tick_index: 1,
            frame_index: Some(0),
            kind: TickKind::Fixed,
            elapsed: 0.02,
            hybrid_delta: Some(0.02),
            invoked: 3,
            stolen_time: 0.0,
        });
        sink.on_tick(&TickEvent {
            tick_index: 2,
            frame_index: None,
            kind: TickKind::Variable,
            elapsed: 0.005,
            hybrid_delta: None,
            invoked: 0,
            stolen_time: 0.005,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[tick:fixed] #1 frame=0"), "got: {output}");
        assert!(lines[0].contains("delta=20.000ms"), "got: {output}");
        assert!(lines[1].contains("frame=- skipped"), "got: {output}");
    }

    #[test]
    fn pretty_print_unknown_owner() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_registration(&RegistrationEvent::unregistered(
            RegistrationId::INVALID,
            "",
            false,
        ));
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[unregister] id=0 owner=? removed=false\n");
    }
}
