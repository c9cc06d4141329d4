use color_mixer::{
    mix_hex, Algorithm, Color, Error, Ramp, RampQuery, RampRequest, RampService, Space,
    ToneSchedule, MAX_STEPS,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SPACES: [Space; 8] = [
    Space::Srgb,
    Space::LinearSrgb,
    Space::Oklab,
    Space::Okhsv,
    Space::Okhsl,
    Space::Hct,
    Space::Cam16Ucs,
    Space::Cam16Jmh,
];

fn any_color() -> impl Strategy<Value = Color> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::new(r, g, b))
}

fn any_algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

fn query(a: Color, b: Color, steps: i64, algorithm: Algorithm) -> Ramp {
    RampQuery
        .query(&RampRequest::new(a, b, steps, algorithm))
        .unwrap()
}

#[test]
fn invalid_inputs_fail_with_their_own_error() {
    assert_eq!(
        mix_hex("zzzzzz", "#ffffff", 5, "oklab", None),
        Err(Error::InvalidColor("zzzzzz".to_string()))
    );
    assert_eq!(
        mix_hex("#000000", "#ffffff", 5, "not_an_algo", None),
        Err(Error::InvalidAlgorithm("not_an_algo".to_string()))
    );
    assert_eq!(
        mix_hex("#000000", "#ffffff", 5, "hct_tone", Some("bumpy")),
        Err(Error::InvalidSchedule("bumpy".to_string()))
    );
}

#[test]
fn error_messages_name_the_input() {
    let message = mix_hex("#12", "#ffffff", 5, "oklab", None).unwrap_err().to_string();
    assert!(message.contains("#12"), "{message}");
}

#[test]
fn step_counts_are_clamped() {
    for algorithm in Algorithm::ALL {
        let (a, b) = (Color::new(200, 30, 60), Color::new(20, 90, 240));
        assert_eq!(query(a, b, 1, algorithm), query(a, b, 2, algorithm));
        assert_eq!(query(a, b, 9999, algorithm), query(a, b, 512, algorithm));
        assert_eq!(query(a, b, 9999, algorithm).len(), MAX_STEPS);
    }
}

#[test]
fn mix_hex_returns_canonical_strings() {
    let ramp = mix_hex("FF0000", "#0000FF", 3, "SRGB", None).unwrap();
    assert_eq!(ramp, vec!["#ff0000", "#800080", "#0000ff"]);
}

#[test]
fn pigment_midpoint_is_darker_than_linear() {
    let pigment = mix_hex("#ff0000", "#0000ff", 3, "km_sub", None).unwrap();
    let linear = mix_hex("#ff0000", "#0000ff", 3, "linear", None).unwrap();

    assert_ne!(pigment[1], linear[1]);

    let tone = |hex: &str| Color::from_hex(hex).unwrap().in_space(Space::Hct)[2];
    assert!(tone(&pigment[1]) + 10.0 < tone(&linear[1]), "{} vs {}", pigment[1], linear[1]);
}

#[test]
fn hue_midpoint_stays_near_red() {
    // Both endpoints share tone and chroma and sit either side of 0 degrees.
    let start = [350.0, 40.0, 50.0];
    let end = [10.0, 40.0, 50.0];
    let a = Color::from_space(Space::Hct, start);
    let b = Color::from_space(Space::Hct, end);

    let ramp = query(a, b, 3, Algorithm::Hct);
    let hue = ramp.colors()[1].in_space(Space::Hct)[0];
    assert!(!(30.0..330.0).contains(&hue), "midpoint hue {hue}");
}

#[test]
fn tone_ramp_runs_through_every_schedule() {
    for schedule in ToneSchedule::ALL {
        let ramp = mix_hex("#3b82f6", "#ffffff", 11, "hct_tone", Some(schedule.as_str())).unwrap();
        assert_eq!(ramp.len(), 11);
        assert_eq!(ramp[0], "#3b82f6");
        assert_eq!(ramp[10], "#ffffff");
    }
}

proptest! {
    #[test]
    fn two_steps_are_exactly_the_endpoints(
        a in any_color(),
        b in any_color(),
        algorithm in any_algorithm(),
    ) {
        prop_assert_eq!(query(a, b, 2, algorithm).into_inner(), vec![a, b]);
    }

    #[test]
    fn identical_endpoints_give_a_constant_ramp(
        a in any_color(),
        steps in 2i64..64,
        algorithm in any_algorithm(),
    ) {
        let ramp = query(a, a, steps, algorithm);
        prop_assert_eq!(ramp.len(), steps as usize);
        prop_assert!(ramp.iter().all(|c| *c == a));
    }

    #[test]
    fn ramps_start_and_end_on_the_endpoints(
        a in any_color(),
        b in any_color(),
        steps in 3i64..40,
        algorithm in any_algorithm(),
    ) {
        let ramp = query(a, b, steps, algorithm);
        prop_assert_eq!(ramp.len(), steps as usize);
        prop_assert_eq!(ramp.sample(0.0), Some(a));
        prop_assert_eq!(ramp.sample(1.0), Some(b));
        prop_assert_eq!(ramp.first(), Some(a));
        prop_assert_eq!(ramp.last(), Some(b));
    }

    #[test]
    fn every_space_round_trips_within_one_unit(color in any_color()) {
        for space in SPACES {
            let back = Color::from_space(space, color.in_space(space));
            let (r0, g0, b0) = color.components();
            let (r1, g1, b1) = back.components();

            prop_assert!(
                r0.abs_diff(r1) <= 1 && g0.abs_diff(g1) <= 1 && b0.abs_diff(b1) <= 1,
                "{:?}: {} -> {}", space, color, back
            );
        }
    }

    #[test]
    fn schedules_are_strictly_increasing(
        schedule in prop::sample::select(ToneSchedule::ALL.to_vec()),
    ) {
        let tones: Vec<f64> = (0..=10).map(|i| schedule.tone(f64::from(i) / 10.0)).collect();
        prop_assert!(tones.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", tones);
    }
}
