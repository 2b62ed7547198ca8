//! Collision-free 1-D layout of a point's observation history.
//!
//! The time stack places one frame per observation along a single axis,
//! newest at the bottom. Each frame's extent is proportional to the
//! wall-clock time elapsed since its neighbor, its size to the delta
//! magnitude, so a long quiet period reads as a tall thin segment and a
//! large movement as a fat disc.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::budget::{AdmissionController, RenderCategory};

use super::classify::PointClassification;

/// Layout constants for the time-stack projection.
///
/// Any positive divisor satisfies the layout invariants; the defaults come
/// from [`crate::config::LayoutConfig`]. One parameter set serves every
/// visual variant; there is exactly one projector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Elapsed minutes represented by one unit of stack length.
    pub minutes_per_unit: f64,
    /// Scale from delta magnitude (meters) to frame size.
    pub size_scale: f64,
    /// Size floor; also the size of a zero-magnitude frame.
    pub min_size: f64,
    /// Size cap; frames at the cap are flagged saturated.
    pub max_size: f64,
    /// Thickness floor, keeps zero-duration gaps visible and finite.
    pub min_thickness: f64,
    /// Age beyond which the most recent frame is dimmed as stale.
    pub stale_after: Duration,
}

/// Input to the projector: one chronologically ordered sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSample {
    pub timestamp: DateTime<Utc>,
    /// Delta magnitude feeding the frame size; `None` skips emission but
    /// still occupies time on the axis.
    pub magnitude: Option<f64>,
    pub classification: PointClassification,
}

/// One laid-out primitive, ready for the external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutFrame {
    pub timestamp: DateTime<Utc>,
    /// Cumulative stack position; non-decreasing from newest to oldest.
    pub altitude: f64,
    /// Extent on the stack axis, elapsed minutes over the divisor.
    pub thickness: f64,
    pub size: f64,
    /// The size hit its cap.
    pub saturated: bool,
    /// Set on the most recent frame when it is older than the staleness
    /// threshold.
    pub stale: bool,
    pub classification: PointClassification,
}

fn minutes_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    // Identical or out-of-order timestamps clamp to zero rather than
    // producing negative extents.
    ((later - earlier).num_milliseconds() as f64 / 60_000.0).max(0.0)
}

/// Project an ascending-ordered sample sequence into a time stack.
///
/// Iterates newest to oldest, accumulating altitude by the trapezoidal rule:
/// each frame sits half its own thickness plus half its predecessor's past
/// the previous altitude, so adjacent frames of different thickness never
/// collide. Emission stops silently once the `TimeStack` budget for this
/// entity is exhausted; skipped and suppressed samples still advance the
/// spacing state.
pub fn project_time_stack(
    samples: &[LayoutSample],
    now: DateTime<Utc>,
    params: &LayoutParams,
    budget: &AdmissionController,
    entity_id: &str,
) -> Vec<LayoutFrame> {
    debug_assert!(
        samples.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp),
        "layout samples must be in ascending timestamp order"
    );

    let mut frames = Vec::new();
    let mut altitude = 0.0;
    let mut prev_thickness = 0.0;
    let mut prev_timestamp = now;
    let mut exhausted = false;

    for sample in samples.iter().rev() {
        let elapsed_minutes = minutes_between(prev_timestamp, sample.timestamp);
        let thickness = (elapsed_minutes / params.minutes_per_unit).max(params.min_thickness);
        altitude += 0.5 * thickness + 0.5 * prev_thickness;
        prev_timestamp = sample.timestamp;
        prev_thickness = thickness;

        let Some(magnitude) = sample.magnitude else {
            continue;
        };

        if exhausted {
            continue;
        }
        if budget.is_limit_reached(RenderCategory::TimeStack, entity_id) {
            exhausted = true;
            continue;
        }
        budget.increment(RenderCategory::TimeStack);

        let size = (magnitude.abs() * params.size_scale + params.min_size).min(params.max_size);
        let stale = frames.is_empty() && now - sample.timestamp > params.stale_after;

        frames.push(LayoutFrame {
            timestamp: sample.timestamp,
            altitude,
            thickness,
            size,
            saturated: size == params.max_size,
            stale,
            classification: sample.classification,
        });
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classify::Classification;
    use chrono::TimeZone;

    fn params() -> LayoutParams {
        LayoutParams {
            minutes_per_unit: 24_000.0,
            size_scale: 20.0,
            min_size: 0.15,
            max_size: 1.5,
            min_thickness: 0.0005,
            stale_after: Duration::days(180),
        }
    }

    fn unlimited() -> AdmissionController {
        AdmissionController::new([(RenderCategory::TimeStack, usize::MAX)])
    }

    fn unclassified() -> PointClassification {
        PointClassification {
            height: Classification::UNDEFINED,
            plane: Classification::UNDEFINED,
        }
    }

    fn sample(timestamp: DateTime<Utc>, magnitude: Option<f64>) -> LayoutSample {
        LayoutSample { timestamp, magnitude, classification: unclassified() }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn three_observation_stack_matches_hand_computation() {
        // Observations at t0, t0+1d, t0+10d, divisor 24000 minutes, with
        // `now` pinned to the newest observation. Newest to oldest:
        //   frame 1: elapsed 0          -> thickness floors at 0.0005
        //   frame 2: elapsed 12960 min  -> thickness 0.54
        //   frame 3: elapsed 1440 min   -> thickness 0.06
        let samples = [
            sample(t0(), Some(0.01)),
            sample(t0() + Duration::days(1), Some(0.01)),
            sample(t0() + Duration::days(10), Some(0.01)),
        ];
        let now = t0() + Duration::days(10);

        let frames = project_time_stack(&samples, now, &params(), &unlimited(), "p");
        assert_eq!(frames.len(), 3);

        assert!((frames[0].thickness - 0.0005).abs() < 1e-12);
        assert!((frames[1].thickness - 0.54).abs() < 1e-12);
        assert!((frames[2].thickness - 0.06).abs() < 1e-12);

        // Trapezoidal accumulation, half own plus half predecessor.
        assert!((frames[0].altitude - 0.00025).abs() < 1e-12);
        assert!((frames[1].altitude - 0.2705).abs() < 1e-12);
        assert!((frames[2].altitude - 0.5705).abs() < 1e-12);
    }

    #[test]
    fn altitude_is_non_decreasing_newest_to_oldest() {
        let mut samples = Vec::new();
        for i in 0..50i64 {
            // Irregular, widening spacing.
            let offset = Duration::minutes(i * i * 7) + Duration::seconds((i % 3) * 10);
            samples.push(sample(t0() + offset, Some(0.001 * i as f64)));
        }
        samples.sort_by_key(|s| s.timestamp);

        let now = t0() + Duration::days(400);
        let frames = project_time_stack(&samples, now, &params(), &unlimited(), "p");

        assert_eq!(frames.len(), 50);
        for pair in frames.windows(2) {
            assert!(pair[1].altitude >= pair[0].altitude);
        }
    }

    #[test]
    fn size_clamps_and_flags_saturation() {
        let samples = [
            sample(t0(), Some(10.0)),
            sample(t0() + Duration::days(1), Some(0.01)),
        ];
        let now = t0() + Duration::days(2);

        let frames = project_time_stack(&samples, now, &params(), &unlimited(), "p");

        // Newest first: 0.01 * 20 + 0.15 = 0.35, unsaturated.
        assert!((frames[0].size - 0.35).abs() < 1e-12);
        assert!(!frames[0].saturated);
        // 10.0 * 20 + 0.15 clamps to the cap.
        assert!((frames[1].size - 1.5).abs() < 1e-12);
        assert!(frames[1].saturated);
    }

    #[test]
    fn null_magnitude_skips_emission_but_keeps_spacing() {
        let with_gap = [
            sample(t0(), Some(0.01)),
            sample(t0() + Duration::days(1), None),
            sample(t0() + Duration::days(2), Some(0.01)),
        ];
        let without_middle = [with_gap[0], with_gap[2]];
        let now = t0() + Duration::days(2);

        let gapped = project_time_stack(&with_gap, now, &params(), &unlimited(), "p");
        let plain = project_time_stack(&without_middle, now, &params(), &unlimited(), "p");

        assert_eq!(gapped.len(), 2);
        assert_eq!(gapped[1].timestamp, t0());

        // The skipped sample still occupies time: the oldest frame sits
        // higher than it would if the middle observation did not exist.
        assert!(gapped[1].altitude > plain[1].altitude);
    }

    #[test]
    fn budget_exhaustion_stops_emission_silently() {
        let samples: Vec<LayoutSample> = (0..10)
            .map(|i| sample(t0() + Duration::days(i), Some(0.01)))
            .collect();
        let now = t0() + Duration::days(10);
        let budget = AdmissionController::new([(RenderCategory::TimeStack, 4)]);

        let frames = project_time_stack(&samples, now, &params(), &budget, "p");

        assert_eq!(frames.len(), 4);
        // The newest observations win; the tail of history is dropped.
        assert_eq!(frames[0].timestamp, t0() + Duration::days(9));
        assert_eq!(frames[3].timestamp, t0() + Duration::days(6));
    }

    #[test]
    fn allow_listed_entity_ignores_the_budget() {
        let samples: Vec<LayoutSample> = (0..10)
            .map(|i| sample(t0() + Duration::days(i), Some(0.01)))
            .collect();
        let now = t0() + Duration::days(10);
        let mut budget = AdmissionController::new([(RenderCategory::TimeStack, 2)]);
        budget.add_to_allow_list("focused");

        let frames = project_time_stack(&samples, now, &params(), &budget, "focused");
        assert_eq!(frames.len(), 10);
    }

    #[test]
    fn recent_frame_is_marked_stale_after_threshold() {
        let samples = [sample(t0(), Some(0.01)), sample(t0() + Duration::days(1), Some(0.01))];

        let fresh = project_time_stack(
            &samples,
            t0() + Duration::days(2),
            &params(),
            &unlimited(),
            "p",
        );
        assert!(!fresh[0].stale);

        let aged = project_time_stack(
            &samples,
            t0() + Duration::days(365),
            &params(),
            &unlimited(),
            "p",
        );
        // Only the most recent frame carries the flag.
        assert!(aged[0].stale);
        assert!(!aged[1].stale);
    }

    #[test]
    fn zero_duration_gaps_stay_finite() {
        let samples = [sample(t0(), Some(0.01)), sample(t0(), Some(0.02))];
        let frames = project_time_stack(&samples, t0(), &params(), &unlimited(), "p");

        for frame in &frames {
            assert!(frame.thickness >= 0.0005);
            assert!(frame.altitude.is_finite());
        }
    }
}
