// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Registration owner tags are stored as length-prefixed UTF-8, so decoded
//! registrations carry an owned `String`.

use tandem_core::timing::TickKind;
use tandem_core::trace::{FrameEvent, RegistrationChange, RegistrationEvent, TickEvent, TraceSink};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TICK: u8 = 1;
const TAG_FRAME: u8 = 2;
const TAG_REGISTRATION: u8 = 3;

const CHANGE_REGISTERED: u8 = 0;
const CHANGE_UNREGISTERED: u8 = 1;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_option_f64(&mut self, v: Option<f64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_f64(val);
            }
            None => {
                self.write_u8(0);
                self.write_f64(0.0);
            }
        }
    }

    fn write_kind(&mut self, kind: TickKind) {
        self.write_u8(match kind {
            TickKind::Fixed => 0,
            TickKind::Variable => 1,
        });
    }

    fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "owner tags are type names, far below u32::MAX bytes"
        )]
        let len = bytes.len().min(u32::MAX as usize) as u32;
        self.write_u32(len);
        self.buf.extend_from_slice(&bytes[..len as usize]);
    }
}

impl TraceSink for RecorderSink {
    fn on_tick(&mut self, e: &TickEvent) {
        self.write_u8(TAG_TICK);
        self.write_u64(e.tick_index);
        self.write_option_u64(e.frame_index);
        self.write_kind(e.kind);
        self.write_f64(e.elapsed);
        self.write_option_f64(e.hybrid_delta);
        self.write_u32(e.invoked);
        self.write_f64(e.stolen_time);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_f64(e.frame_delta);
        self.write_f64(e.clamped_delta);
        self.write_u32(e.fixed_ticks);
        self.write_u32(e.dropped_fixed_ticks);
        self.write_u8(u8::from(e.variable_pass));
        self.write_f64(e.delivered);
        self.write_f64(e.accumulator);
    }

    fn on_registration(&mut self, e: &RegistrationEvent) {
        self.write_u8(TAG_REGISTRATION);
        self.write_u64(e.id.get());
        match e.change {
            RegistrationChange::Registered { priority } => {
                self.write_u8(CHANGE_REGISTERED);
                self.write_i32(priority);
            }
            RegistrationChange::Unregistered { removed } => {
                self.write_u8(CHANGE_UNREGISTERED);
                self.write_i32(i32::from(removed));
            }
        }
        self.write_str(e.owner);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`TickEvent`].
    Tick(TickEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`RegistrationEvent`], with the handle as its raw value.
    Registration {
        /// Raw registration handle (see `RegistrationId::get`).
        id: u64,
        /// Owner tag.
        owner: String,
        /// What changed.
        change: RegistrationChange,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, n: usize) -> Option<&[u8]> {
        if self.remaining() < n {
            return None;
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    fn read_i32(&mut self) -> Option<i32> {
        Some(i32::from_le_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.read_bytes(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_le_bytes(self.read_bytes(8)?.try_into().ok()?))
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_option_f64(&mut self) -> Option<Option<f64>> {
        let present = self.read_u8()?;
        let val = self.read_f64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_kind(&mut self) -> Option<TickKind> {
        match self.read_u8()? {
            0 => Some(TickKind::Fixed),
            1 => Some(TickKind::Variable),
            _ => None,
        }
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    fn decode_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Tick(TickEvent {
            tick_index: self.read_u64()?,
            frame_index: self.read_option_u64()?,
            kind: self.read_kind()?,
            elapsed: self.read_f64()?,
            hybrid_delta: self.read_option_f64()?,
            invoked: self.read_u32()?,
            stolen_time: self.read_f64()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            frame_delta: self.read_f64()?,
            clamped_delta: self.read_f64()?,
            fixed_ticks: self.read_u32()?,
            dropped_fixed_ticks: self.read_u32()?,
            variable_pass: self.read_u8()? != 0,
            delivered: self.read_f64()?,
            accumulator: self.read_f64()?,
        }))
    }

    fn decode_registration(&mut self) -> Option<RecordedEvent> {
        let id = self.read_u64()?;
        let change = match self.read_u8()? {
            CHANGE_REGISTERED => RegistrationChange::Registered {
                priority: self.read_i32()?,
            },
            CHANGE_UNREGISTERED => RegistrationChange::Unregistered {
                removed: self.read_i32()? != 0,
            },
            _ => return None,
        };
        let owner = self.read_string()?;
        Some(RecordedEvent::Registration { id, owner, change })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TICK => self.decode_tick(),
            TAG_FRAME => self.decode_frame(),
            TAG_REGISTRATION => self.decode_registration(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
