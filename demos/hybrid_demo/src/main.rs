// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host loop that exercises the coordinator, driver, and
//! diagnostics pipeline.
//!
//! Runs 90 synthetic frames with jittery deltas (and one long hitch) through a
//! [`FixedStepDriver`] feeding a 50 Hz [`HybridCoordinator`], recording events
//! to both a [`PrettyPrintSink`](tandem_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](tandem_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use tandem_core::config::{CoordinatorConfig, DriverConfig};
use tandem_core::coordinator::HybridCoordinator;
use tandem_core::driver::FixedStepDriver;
use tandem_core::receiver::TimeStepReceiver;
use tandem_core::registry::RegistrationId;
use tandem_core::trace::{RegistrationEvent, Tracer};

use tandem_debug::Tee;
use tandem_debug::pretty::PrettyPrintSink;
use tandem_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 90;
/// Nominal 60 Hz frame time in seconds.
const FRAME_TIME: f64 = 1.0 / 60.0;
/// Per-frame jitter pattern in seconds, cycled.
const JITTER: [f64; 5] = [0.0, 0.002, -0.003, 0.004, -0.001];
const HITCH_FRAME: u64 = 30;
const HITCH_DELTA: f64 = 0.4;
const UNREGISTER_FRAME: u64 = 60;

/// A falling body integrated with whatever delta it is handed.
#[derive(Debug, Default)]
struct Body {
    height: f64,
    velocity: f64,
    integrated: f64,
}

impl TimeStepReceiver for Body {
    fn on_hybrid_update(&mut self, delta: f64) {
        self.velocity -= 9.81 * delta;
        self.height += self.velocity * delta;
        self.integrated += delta;
    }
}

fn frame_delta(frame_index: u64) -> f64 {
    if frame_index == HITCH_FRAME {
        return HITCH_DELTA;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "index is reduced modulo the pattern length first"
    )]
    let jitter = JITTER[(frame_index % JITTER.len() as u64) as usize];
    FRAME_TIME + jitter
}

fn announce(coordinator: &HybridCoordinator, id: RegistrationId, tracer: &mut Tracer<'_>) {
    if let Some(registration) = coordinator.registrations().find(|r| r.id() == id) {
        tracer.registration(&RegistrationEvent::registered(registration));
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut sink = Tee::new(
        PrettyPrintSink::new(Box::new(std::io::stdout())),
        RecorderSink::new(),
    );

    // -- coordinator ---------------------------------------------------------
    let mut coordinator = HybridCoordinator::new(CoordinatorConfig::HZ_50);
    let mut driver = FixedStepDriver::new(DriverConfig::DEFAULT);

    let body = Rc::new(RefCell::new(Body {
        height: 100.0,
        ..Body::default()
    }));
    let animation_time = Rc::new(RefCell::new(0.0_f64));
    let camera_updates = Rc::new(RefCell::new(0_u32));

    let mut tracer = Tracer::new(&mut sink);

    let body_id = coordinator
        .register(Rc::clone(&body), -10)
        .expect("body registers once");
    announce(&coordinator, body_id, &mut tracer);

    let clock = Rc::clone(&animation_time);
    let animation_id = coordinator
        .register(
            Rc::new(RefCell::new(move |dt: f64| *clock.borrow_mut() += dt)),
            0,
        )
        .expect("animation registers once");
    announce(&coordinator, animation_id, &mut tracer);

    let counter = Rc::clone(&camera_updates);
    let camera_id = coordinator
        .register_dyn(
            Rc::new(RefCell::new(move |_dt: f64| *counter.borrow_mut() += 1)),
            "camera",
            10,
        )
        .expect("camera registers once");
    announce(&coordinator, camera_id, &mut tracer);

    // -- simulated loop ----------------------------------------------------
    let mut dropped = 0_u32;
    for frame_index in 0..FRAME_COUNT {
        if frame_index == UNREGISTER_FRAME {
            let removed = coordinator
                .unregister(camera_id)
                .expect("camera id is valid");
            tracer.registration(&RegistrationEvent::unregistered(
                camera_id, "camera", removed,
            ));
        }

        let report = driver
            .advance(&mut coordinator, frame_delta(frame_index), &mut tracer)
            .expect("synthetic frame deltas are valid");
        dropped += report.dropped_fixed_ticks;
    }
    drop(tracer);

    let stats = coordinator.stats();
    println!(
        "{} fixed passes, {} variable passes, {} skipped, {dropped} fixed ticks dropped",
        stats.fixed_passes, stats.variable_passes, stats.skipped_variable_ticks,
    );
    println!(
        "body integrated {:.3}s (height {:.2}), animation {:.3}s, camera {} updates",
        body.borrow().integrated,
        body.borrow().height,
        animation_time.borrow(),
        camera_updates.borrow(),
    );

    // -- export Chrome trace -----------------------------------------------
    let (_, recorder) = sink.into_inner();
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    tandem_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
