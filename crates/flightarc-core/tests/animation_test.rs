//! End-to-end animation tests.
//!
//! Loads a flight document through the spherical arc generator, drives
//! insertion and painting with a manual clock and checks what gets drawn.

use flightarc_core::{
    ActivationGate, AnimationConfig, AnimationScheduler, Clock, FeatureState, FlightDocument,
    FlightFeatureStore, FrameState, GateTrigger, GreatCircle, ManualClock, RecordingContext,
    StaticLayer, WORLD_WIDTH,
};

const FLIGHTS: &str = r#"{
    "flights": [
        [[51.47, -0.45], [40.64, -73.78]],
        [[48.85, 2.35], [52.52, 13.40]],
        [null, [35.55, 139.78]],
        [[1.36, 103.99], [-33.94, 151.18]],
        [[25.25, 55.36], [19.09, 72.87]]
    ]
}"#;

fn setup(config: AnimationConfig) -> (FlightFeatureStore, AnimationScheduler, GateTrigger) {
    let (gate, trigger) = ActivationGate::closed();
    let store = FlightFeatureStore::new(gate.clone(), Box::new(GreatCircle), &config);
    let scheduler = AnimationScheduler::new(gate, &config);
    (store, scheduler, trigger)
}

#[test]
fn malformed_record_leaves_four_batches() {
    let (store, _scheduler, _trigger) = setup(AnimationConfig::default());
    let document = FlightDocument::parse(FLIGHTS).unwrap();

    let batches = store.load_document(&document);

    assert_eq!(batches.len(), 4);
    let flights: Vec<_> = batches.iter().map(|b| b.flight).collect();
    assert_eq!(flights, vec![0, 1, 3, 4]);
    assert!(batches.iter().all(|b| b.point_count() == 100));
}

#[test]
fn unparseable_document_is_a_load_error() {
    assert!(FlightDocument::parse("{\"flights\": [").is_err());
    assert!(FlightDocument::parse("flights").is_err());
}

#[test]
fn two_hundred_points_finish_after_ten_seconds() {
    let config = AnimationConfig {
        arc_segments: 200,
        ..AnimationConfig::default()
    };
    let (mut store, mut scheduler, trigger) = setup(config);
    let clock = ManualClock::new(0);
    let document =
        FlightDocument::parse(r#"{"flights": [[[48.85, 2.35], [52.52, 13.40]]]}"#).unwrap();

    trigger.open();
    let batches = store.load_document(&document);
    store.schedule_all(batches, clock.now_ms());
    store.advance(clock.now_ms());

    let mut ctx = RecordingContext::new();
    let mut last_revealed = 0;
    let mut finished_at = None;
    while clock.now_ms() <= 12_000 {
        let frame = FrameState::new(clock.now_ms(), 0.0);
        scheduler.on_paint(&mut store, &frame, &mut ctx);

        let feature = &store.active_features()[0];
        assert!(feature.revealed() >= last_revealed);
        last_revealed = feature.revealed();
        if feature.is_finished() && finished_at.is_none() {
            finished_at = Some(clock.now_ms());
        }
        clock.advance(16);
    }

    let finished_at = finished_at.unwrap();
    assert!((10_000..10_016).contains(&finished_at), "finished at {finished_at}");
    assert_eq!(last_revealed, 200);
    assert!(!scheduler.animation_active());
}

#[test]
fn finished_flag_never_reverts() {
    let (mut store, mut scheduler, trigger) = setup(AnimationConfig::default());
    let document = FlightDocument::parse(FLIGHTS).unwrap();
    trigger.open();
    let batches = store.load_document(&document);
    store.schedule_all(batches, 0);

    let mut ctx = RecordingContext::new();
    let mut seen_finished: Vec<bool> = Vec::new();
    for t in (0..20_000).step_by(40) {
        store.advance(t);
        scheduler.on_paint(&mut store, &FrameState::new(t, 0.0), &mut ctx);

        let states: Vec<bool> = store.active_features().iter().map(|f| f.is_finished()).collect();
        for (was, now) in seen_finished.iter().zip(&states) {
            assert!(!was || *now, "finished feature reverted at {t}");
        }
        seen_finished = states;
    }

    assert_eq!(store.active_features().len(), 4);
    assert!(seen_finished.iter().all(|f| *f));
    assert!(store
        .active_features()
        .iter()
        .all(|f| f.state_at(20_000) == FeatureState::Finished));
}

#[test]
fn world_wrap_draws_offset_and_next_copy() {
    let (mut store, mut scheduler, trigger) = setup(AnimationConfig::default());
    let document =
        FlightDocument::parse(r#"{"flights": [[[51.47, -0.45], [40.64, -73.78]]]}"#).unwrap();
    trigger.open();
    let batches = store.load_document(&document);
    store.schedule_all(batches, 0);
    store.advance(0);

    let frame = FrameState {
        time: 1_000,
        view_center_x: 3.0 * WORLD_WIDTH + 10.0,
        world_width: WORLD_WIDTH,
    };
    let mut ctx = RecordingContext::new();
    let report = scheduler.on_paint(&mut store, &frame, &mut ctx);

    assert_eq!(report.draw_calls, 2);
    let original = store.active_features()[0].full_path()[0];
    let lines: Vec<_> = ctx.lines().collect();
    assert_eq!(lines[0].len(), 20);
    assert!((lines[0][0].x - (original.x + 3.0 * WORLD_WIDTH)).abs() < 1e-6);
    assert!((lines[1][0].x - (original.x + 4.0 * WORLD_WIDTH)).abs() < 1e-6);
}

#[test]
fn late_gate_drops_already_fired_batches() {
    let (mut store, mut scheduler, trigger) = setup(AnimationConfig::default());
    let document = FlightDocument::parse(FLIGHTS).unwrap();
    let batches = store.load_document(&document);
    store.schedule_all(batches, 0);

    // flights 0 and 1 fire at 0 ms and 50 ms while the gate is still closed
    assert_eq!(store.advance(100).dropped_batches, 2);
    trigger.open();
    let report = store.advance(1_000);

    assert_eq!(report.inserted_batches, 2);
    assert_eq!(store.dropped_batches(), 2);
    let flights: Vec<_> = store.active_features().iter().map(|f| f.id().flight).collect();
    assert_eq!(flights, vec![3, 4]);

    let mut ctx = RecordingContext::new();
    scheduler.on_paint(&mut store, &FrameState::new(1_500, 0.0), &mut ctx);
    assert_eq!(ctx.line_count(), 4);
}

#[test]
fn static_layer_takes_over_finished_features() {
    let config = AnimationConfig::default();
    let (mut store, mut scheduler, trigger) = setup(config.clone());
    let document =
        FlightDocument::parse(r#"{"flights": [[[48.85, 2.35], [52.52, 13.40]]]}"#).unwrap();
    trigger.open();
    let batches = store.load_document(&document);
    store.schedule_all(batches, 0);
    store.advance(0);

    let layer = StaticLayer::new(config.stroke.clone());
    let mut ctx = RecordingContext::new();

    let frame = FrameState::new(5_000, 0.0);
    assert_eq!(layer.render(store.static_features(), &frame, &mut ctx), 0);
    scheduler.on_paint(&mut store, &frame, &mut ctx);

    ctx.clear();
    let frame = FrameState::new(6_000, 0.0);
    assert_eq!(layer.render(store.static_features(), &frame, &mut ctx), 1);
    let report = scheduler.on_paint(&mut store, &frame, &mut ctx);
    assert_eq!(report.drawn_features, 0);
    assert_eq!(ctx.line_count(), 2);
}
