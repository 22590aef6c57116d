//! Frame sampling and timeline integration tests.
//!
//! These exercise the pure planning logic and need no fixtures.

use lottie2webp::{ConversionPlan, ConvertError, FrameSampler, Timeline};

// ── FrameSampler ───────────────────────────────────────────────────

#[test]
fn indices_start_at_zero_and_stay_in_range() {
    for total_frames in 1..=60_u32 {
        for stride in 1..=total_frames {
            let sampler = FrameSampler::new(total_frames, Some(stride), None).unwrap();
            let indices: Vec<u32> = sampler.indices().collect();

            assert_eq!(indices[0], 0);
            assert!(indices.windows(2).all(|pair| pair[1] == pair[0] + stride));
            assert!(indices.iter().all(|&index| index < total_frames));
            assert_eq!(indices.len() as u32, total_frames.div_ceil(stride));
            assert_eq!(indices.len() as u32, sampler.sample_count());
        }
    }
}

#[test]
fn indices_are_restartable() {
    let sampler = FrameSampler::new(30, Some(4), None).unwrap();
    let first: Vec<u32> = sampler.indices().collect();
    let second: Vec<u32> = (&sampler).into_iter().collect();
    assert_eq!(first, second);
}

#[test]
fn budget_derives_stride_by_integer_division() {
    let sampler = FrameSampler::new(100, None, Some(20)).unwrap();
    assert_eq!(sampler.stride(), 5);
    assert_eq!(sampler.sample_count(), 20);

    // 59 / 20 = 2, so 30 frames are emitted: above the budget.
    let sampler = FrameSampler::new(59, None, Some(20)).unwrap();
    assert_eq!(sampler.stride(), 2);
    assert_eq!(sampler.sample_count(), 30);

    // 180 / 25 = 7, so 26 frames.
    let sampler = FrameSampler::new(180, None, Some(25)).unwrap();
    assert_eq!(sampler.stride(), 7);
    assert_eq!(sampler.sample_count(), 26);
}

#[test]
fn at_budget_keeps_every_frame() {
    let sampler = FrameSampler::new(20, None, Some(20)).unwrap();
    assert_eq!(sampler.stride(), 1);
}

#[test]
fn explicit_stride_overrides_budget() {
    let sampler = FrameSampler::new(100, Some(2), Some(20)).unwrap();
    assert_eq!(sampler.stride(), 2);
    assert_eq!(sampler.sample_count(), 50);
}

#[test]
fn stride_equal_to_total_yields_one_frame() {
    let sampler = FrameSampler::new(9, Some(9), None).unwrap();
    assert_eq!(sampler.indices().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn empty_animation_is_rejected() {
    assert!(matches!(
        FrameSampler::new(0, None, Some(20)),
        Err(ConvertError::EmptyAnimation)
    ));
    assert!(matches!(
        FrameSampler::new(0, Some(1), None),
        Err(ConvertError::EmptyAnimation)
    ));
}

#[test]
fn invalid_explicit_strides_are_configuration_errors() {
    assert!(matches!(
        FrameSampler::new(10, Some(0), None),
        Err(ConvertError::Configuration(_))
    ));
    assert!(matches!(
        FrameSampler::new(10, Some(11), None),
        Err(ConvertError::Configuration(_))
    ));
}

// ── Timeline ───────────────────────────────────────────────────────

#[test]
fn hundred_frames_four_seconds_stride_five() {
    let timeline = Timeline::new(4.0, 100, 5).unwrap();
    assert_eq!(timeline.emitted_frame_count(), 20);
    assert_eq!(timeline.frame_duration_ms(), 200);

    let timestamps: Vec<u64> = timeline.timestamps(20).collect();
    let expected: Vec<u64> = (0..20).map(|k| k * 200).collect();
    assert_eq!(timestamps, expected);
    assert_eq!(timestamps.last(), Some(&3800));
    assert_eq!(timeline.end_timestamp(20), 4000);
}

#[test]
fn seven_frames_one_second_rounds() {
    let timeline = Timeline::new(1.0, 7, 1).unwrap();
    assert_eq!(timeline.emitted_frame_count(), 7);
    assert_eq!(timeline.frame_duration_ms(), 143);
    // Rounding error accumulates instead of being corrected.
    assert_eq!(timeline.end_timestamp(7), 1001);
}

#[test]
fn timestamps_are_non_decreasing_from_zero() {
    for (duration, total_frames, stride) in [(3.0, 90, 4), (0.5, 13, 1), (2.2, 61, 3)] {
        let timeline = Timeline::new(duration, total_frames, stride).unwrap();
        let count = timeline.emitted_frame_count();
        let timestamps: Vec<u64> = timeline.timestamps(count).collect();

        assert_eq!(timestamps[0], 0);
        assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(
            *timestamps.last().unwrap(),
            u64::from(count - 1) * u64::from(timeline.frame_duration_ms())
        );
    }
}

#[test]
fn stride_above_total_is_a_configuration_error() {
    assert!(matches!(
        Timeline::new(1.0, 5, 6),
        Err(ConvertError::Configuration(_))
    ));
}

#[test]
fn positive_duration_gives_positive_frames() {
    for total_frames in [1_u32, 10, 1000, 100_000] {
        let timeline = Timeline::new(0.01, total_frames, 1).unwrap();
        assert!(timeline.frame_duration_ms() > 0);
    }
}

// ── ConversionPlan ─────────────────────────────────────────────────

#[test]
fn plan_pairs_indices_with_timestamps() {
    let plan = ConversionPlan::new(100, 4.0, None, Some(20)).unwrap();
    assert_eq!(plan.stride(), 5);
    assert_eq!(plan.frame_count(), 20);

    let frames: Vec<(u32, u64)> = plan.frames().collect();
    assert_eq!(frames.len(), 20);
    assert_eq!(frames[0], (0, 0));
    assert_eq!(frames[1], (5, 200));
    assert_eq!(frames[19], (95, 3800));
    assert_eq!(plan.end_timestamp_ms(), 4000);
}

#[test]
fn plan_with_uneven_stride_emits_trailing_frame() {
    // 7 frames, stride 2: indices 0, 2, 4, 6, durations averaged over 7 / 2 = 3.
    let plan = ConversionPlan::new(7, 0.9, Some(2), None).unwrap();
    assert_eq!(plan.frame_count(), 4);
    assert_eq!(plan.frame_duration_ms(), 300);
    assert_eq!(
        plan.frames().collect::<Vec<_>>(),
        vec![(0, 0), (2, 300), (4, 600), (6, 900)]
    );
    assert_eq!(plan.end_timestamp_ms(), 1200);
}

#[test]
fn plan_without_budget_renders_everything() {
    let plan = ConversionPlan::new(7, 1.0, None, Some(20)).unwrap();
    assert_eq!(plan.stride(), 1);
    assert_eq!(plan.frame_count(), 7);
    assert_eq!(plan.frame_duration_ms(), 143);
}

#[test]
fn zero_duration_plan_needs_a_single_frame() {
    assert!(matches!(
        ConversionPlan::new(10, 0.0, None, None),
        Err(ConvertError::Configuration(_))
    ));

    let plan = ConversionPlan::new(10, 0.0, Some(10), None).unwrap();
    assert_eq!(plan.frame_count(), 1);
    assert_eq!(plan.frames().collect::<Vec<_>>(), vec![(0, 0)]);
}
