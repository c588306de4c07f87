// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Recordings carry deltas, not timestamps, so the exporter lays events out on
//! a logical timeline:
//!
//! - each driver frame occupies its clamped delta, starting where the
//!   previous frame ended;
//! - fixed passes inside a frame are placed back to back from the frame start
//!   (thread 0), the variable pass at the frame start (thread 1), and the
//!   frame itself on thread 2;
//! - variable ticks recorded outside a driver advance the timeline by their
//!   elapsed time.
//!
//! Skipped variable ticks and registration changes are instant events.
//! Stolen time is exported as a counter track.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use tandem_core::timing::TickKind;
use tandem_core::trace::RegistrationChange;

use crate::recorder::{RecordedEvent, decode};

const TID_FIXED: u32 = 0;
const TID_VARIABLE: u32 = 1;
const TID_FRAME: u32 = 2;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Start of the current frame, and the offset of the next fixed pass
    // within it, both in microseconds.
    let mut cursor = 0.0_f64;
    let mut fixed_offset = 0.0_f64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Tick(e) => {
                let (name, tid, ts) = match e.kind {
                    TickKind::Fixed => ("FixedPass", TID_FIXED, cursor + fixed_offset),
                    TickKind::Variable => ("VariablePass", TID_VARIABLE, cursor),
                };
                let args = json!({
                    "tick_index": e.tick_index,
                    "frame_index": e.frame_index,
                    "elapsed_ms": e.elapsed * 1000.0,
                    "invoked": e.invoked,
                });
                match e.hybrid_delta {
                    Some(delta) => events.push(json!({
                        "ph": "X",
                        "name": name,
                        "cat": "Tick",
                        "ts": ts,
                        "dur": seconds_to_us(delta),
                        "pid": 0,
                        "tid": tid,
                        "args": args,
                    })),
                    None => events.push(json!({
                        "ph": "i",
                        "name": "VariableSkip",
                        "cat": "Tick",
                        "ts": ts,
                        "pid": 0,
                        "tid": tid,
                        "s": "t",
                        "args": args,
                    })),
                }
                events.push(json!({
                    "ph": "C",
                    "name": "StolenTime",
                    "ts": ts,
                    "pid": 0,
                    "args": { "stolen_ms": e.stolen_time * 1000.0 },
                }));

                match (e.kind, e.frame_index) {
                    (TickKind::Fixed, _) => fixed_offset += seconds_to_us(e.elapsed),
                    (TickKind::Variable, None) => {
                        cursor += seconds_to_us(e.elapsed);
                        fixed_offset = 0.0;
                    }
                    (TickKind::Variable, Some(_)) => {}
                }
            }
            RecordedEvent::Frame(e) => {
                let dur = seconds_to_us(e.clamped_delta);
                events.push(json!({
                    "ph": "X",
                    "name": "Frame",
                    "cat": "Driver",
                    "ts": cursor,
                    "dur": dur,
                    "pid": 0,
                    "tid": TID_FRAME,
                    "args": {
                        "frame_index": e.frame_index,
                        "frame_delta_ms": e.frame_delta * 1000.0,
                        "fixed_ticks": e.fixed_ticks,
                        "dropped_fixed_ticks": e.dropped_fixed_ticks,
                        "variable_pass": e.variable_pass,
                        "delivered_ms": e.delivered * 1000.0,
                        "accumulator_ms": e.accumulator * 1000.0,
                    }
                }));
                cursor += dur;
                fixed_offset = 0.0;
            }
            RecordedEvent::Registration { id, owner, change } => {
                let (name, args) = match change {
                    RegistrationChange::Registered { priority } => (
                        "Register",
                        json!({ "id": id, "owner": owner, "priority": priority }),
                    ),
                    RegistrationChange::Unregistered { removed } => (
                        "Unregister",
                        json!({ "id": id, "owner": owner, "removed": removed }),
                    ),
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Registry",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": args,
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn seconds_to_us(seconds: f64) -> f64 {
    seconds * 1_000_000.0
}
