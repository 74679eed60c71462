//! Flight feature store with deferred, gate-checked insertion.

use crate::config::AnimationConfig;
use crate::error::RecordError;
use crate::gate::ActivationGate;
use crate::great_circle::{ArcOptions, GreatCircleProvider};
use crate::models::{FeatureId, FlightBatch, FlightDocument, FlightFeature, FlightRecord};
use crate::task_queue::TaskQueue;

/// Outcome of running the insertions that became due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionReport {
    pub inserted_batches: usize,
    pub inserted_features: usize,
    /// Batches discarded because the gate was closed when they fired
    pub dropped_batches: usize,
}

/// Owns every flight feature and its animation state.
///
/// Batches wait in a time-keyed queue until [`advance`](Self::advance)
/// reaches their fire time. A batch that fires while the gate is closed is
/// discarded and never retried, even once the gate opens.
pub struct FlightFeatureStore {
    gate: ActivationGate,
    provider: Box<dyn GreatCircleProvider>,
    points_per_ms: f64,
    batch_stagger_ms: i64,
    arc_segments: usize,
    arc_options: ArcOptions,
    active: Vec<FlightFeature>,
    pending: TaskQueue<FlightBatch>,
    dropped_batches: usize,
}

impl FlightFeatureStore {
    pub fn new(
        gate: ActivationGate,
        provider: Box<dyn GreatCircleProvider>,
        config: &AnimationConfig,
    ) -> Self {
        Self {
            gate,
            provider,
            points_per_ms: config.points_per_ms,
            batch_stagger_ms: config.batch_stagger_ms,
            arc_segments: config.arc_segments,
            arc_options: ArcOptions {
                offset: config.dateline_offset_deg,
            },
            active: Vec::new(),
            pending: TaskQueue::new(),
            dropped_batches: 0,
        }
    }

    /// Build one batch per usable record, preserving input order. Bad
    /// records are logged and skipped.
    pub fn load_batches<I>(&self, records: I) -> Vec<FlightBatch>
    where
        I: IntoIterator<Item = Result<FlightRecord, RecordError>>,
    {
        let mut batches = Vec::new();
        for (flight, record) in records.into_iter().enumerate() {
            match record.and_then(|record| self.build_batch(flight, record)) {
                Ok(batch) => batches.push(batch),
                Err(e) => tracing::warn!("Skipping flight record {}: {}", flight, e),
            }
        }
        tracing::debug!("Loaded {} flight batch(es)", batches.len());
        batches
    }

    /// Load every record from a parsed flight document.
    pub fn load_document(&self, document: &FlightDocument) -> Vec<FlightBatch> {
        self.load_batches(document.records())
    }

    fn build_batch(&self, flight: usize, record: FlightRecord) -> Result<FlightBatch, RecordError> {
        let pieces = self.provider.generate_arc(
            record.origin,
            record.destination,
            self.arc_segments,
            &self.arc_options,
        )?;

        let features = pieces
            .into_iter()
            .enumerate()
            .map(|(piece, path)| FlightFeature::new(FeatureId { flight, piece }, path))
            .collect();

        Ok(FlightBatch {
            flight,
            record,
            features,
        })
    }

    /// Queue `batch` for insertion `delay_ms` after `now`.
    pub fn schedule_insertion(&mut self, batch: FlightBatch, delay_ms: i64, now: i64) {
        self.pending.schedule(now + delay_ms.max(0), batch);
    }

    /// Queue every batch, staggered by its flight index.
    pub fn schedule_all(&mut self, batches: Vec<FlightBatch>, now: i64) {
        for batch in batches {
            let delay = batch.flight as i64 * self.batch_stagger_ms;
            self.schedule_insertion(batch, delay, now);
        }
    }

    /// Run every insertion due at `now`.
    pub fn advance(&mut self, now: i64) -> InsertionReport {
        let mut report = InsertionReport::default();

        for (fire_at, batch) in self.pending.pop_due(now) {
            if !self.gate.is_open() {
                tracing::debug!(
                    "Gate closed at {}; dropping flight {} ({} feature(s))",
                    fire_at,
                    batch.flight,
                    batch.features.len()
                );
                self.dropped_batches += 1;
                report.dropped_batches += 1;
                continue;
            }

            report.inserted_features += self.insert_batch(batch, now);
            report.inserted_batches += 1;
        }

        report
    }

    /// Chain start times through the batch and append it to the active set.
    fn insert_batch(&mut self, batch: FlightBatch, now: i64) -> usize {
        let count = batch.features.len();
        let mut start = now as f64;
        for mut feature in batch.features {
            feature.assign_start(start.round() as i64);
            start += feature.duration_ms(self.points_per_ms);
            self.active.push(feature);
        }
        tracing::debug!("Inserted flight {} with {} feature(s) at {}", batch.flight, count, now);
        count
    }

    /// Active features in insertion order.
    pub fn active_features(&self) -> &[FlightFeature] {
        &self.active
    }

    pub(crate) fn active_features_mut(&mut self) -> &mut [FlightFeature] {
        &mut self.active
    }

    /// Finished features, the ones drawn with the static style.
    pub fn static_features(&self) -> impl Iterator<Item = &FlightFeature> {
        self.active.iter().filter(|f| f.is_finished())
    }

    pub fn has_unfinished(&self) -> bool {
        self.active.iter().any(|f| !f.is_finished())
    }

    pub fn pending_insertions(&self) -> usize {
        self.pending.len()
    }

    pub fn next_insertion_at(&self) -> Option<i64> {
        self.pending.next_fire_time()
    }

    pub fn dropped_batches(&self) -> usize {
        self.dropped_batches
    }

    /// Reveal rate shared by chained start times and the per-frame reveal.
    pub fn points_per_ms(&self) -> f64 {
        self.points_per_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArcError, Endpoint};
    use crate::models::{Coordinate, Point};

    /// Provider that returns straight pieces of fixed lengths.
    struct FixedPieces(Vec<usize>);

    impl GreatCircleProvider for FixedPieces {
        fn generate_arc(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
            _segments: usize,
            _options: &ArcOptions,
        ) -> Result<Vec<Vec<Point>>, ArcError> {
            Ok(self
                .0
                .iter()
                .map(|&len| (0..len).map(|i| Point::new(i as f64, 0.0)).collect())
                .collect())
        }
    }

    fn record() -> FlightRecord {
        FlightRecord::new(Coordinate::new(10.0, 10.0), Coordinate::new(20.0, 20.0))
    }

    fn store_with(pieces: Vec<usize>) -> (FlightFeatureStore, crate::gate::GateTrigger) {
        let (gate, trigger) = ActivationGate::closed();
        let store = FlightFeatureStore::new(
            gate,
            Box::new(FixedPieces(pieces)),
            &AnimationConfig::default(),
        );
        (store, trigger)
    }

    #[test]
    fn chained_start_times_follow_previous_duration() {
        let (mut store, trigger) = store_with(vec![50, 100, 150]);
        trigger.open();

        let batches = store.load_batches([Ok(record())]);
        store.schedule_all(batches, 1_000);
        let report = store.advance(1_000);

        assert_eq!(report.inserted_batches, 1);
        assert_eq!(report.inserted_features, 3);
        let starts: Vec<_> = store
            .active_features()
            .iter()
            .map(|f| f.start_time().unwrap())
            .collect();
        assert_eq!(starts, vec![1_000, 3_500, 8_500]);
    }

    #[test]
    fn closed_gate_drops_batch_for_good() {
        let (mut store, trigger) = store_with(vec![10]);
        let batches = store.load_batches([Ok(record())]);
        store.schedule_insertion(batches.into_iter().next().unwrap(), 50, 0);

        let before = store.active_features().len();
        let report = store.advance(50);
        assert_eq!(report.dropped_batches, 1);
        assert_eq!(store.active_features().len(), before);

        trigger.open();
        let report = store.advance(10_000);
        assert_eq!(report, InsertionReport::default());
        assert!(store.active_features().is_empty());
        assert_eq!(store.dropped_batches(), 1);
    }

    #[test]
    fn insertion_waits_for_its_delay() {
        let (mut store, trigger) = store_with(vec![10]);
        trigger.open();
        let batches = store.load_batches([Ok(record()), Ok(record())]);
        store.schedule_all(batches, 0);

        assert_eq!(store.advance(0).inserted_batches, 1);
        assert_eq!(store.pending_insertions(), 1);
        assert_eq!(store.next_insertion_at(), Some(50));
        assert_eq!(store.advance(49).inserted_batches, 0);
        assert_eq!(store.advance(50).inserted_batches, 1);
        assert_eq!(store.active_features()[1].start_time(), Some(50));
    }

    #[test]
    fn malformed_records_are_skipped() {
        let (store, _trigger) = store_with(vec![10]);
        let records = vec![
            Ok(record()),
            Err(RecordError::MissingEndpoint(Endpoint::Origin)),
            Ok(record()),
            Ok(record()),
            Ok(record()),
        ];
        let batches = store.load_batches(records);
        assert_eq!(batches.len(), 4);
        let flights: Vec<_> = batches.iter().map(|b| b.flight).collect();
        assert_eq!(flights, vec![0, 2, 3, 4]);
    }

    #[test]
    fn features_have_no_start_time_before_insertion() {
        let (store, _trigger) = store_with(vec![10, 20]);
        let batches = store.load_batches([Ok(record())]);
        assert!(batches[0].features.iter().all(|f| f.start_time().is_none()));
        assert_eq!(batches[0].point_count(), 30);
    }
}
