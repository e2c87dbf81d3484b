//! A miniature go/no-go paradigm built on the engine, end to end: the
//! sequence generator orders the trials, the runner drives them, and the
//! stats layer reduces the outcomes to a summary.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::{Duration, sleep};

use cogbat_core::{Evaluation, ItiSpec, TrialConfig, sequence::ratio_sequence};
use cogbat_response::{InputHub, RawInput};
use cogbat_runner::TrialRunner;
use cogbat_stats::{accuracy, d_prime, mean, response_bias};
use cogbat_timing::TrialClock;

#[derive(Debug, Clone, Copy, PartialEq)]
enum GoNogo {
    Go,
    Nogo,
}

fn go_nogo_trials(count: usize, go_ratio: f64, seed: u64) -> Vec<TrialConfig<GoNogo>> {
    let mut rng = StdRng::seed_from_u64(seed);
    ratio_sequence(&mut rng, count, go_ratio)
        .into_iter()
        .map(|is_go| TrialConfig {
            fixation_duration: 0.0,
            stimulus_duration: Some(100.0),
            response_window: None,
            feedback_duration: 0.0,
            show_feedback: false,
            iti: ItiSpec::Fixed(0.0),
            stimulus: if is_go { GoNogo::Go } else { GoNogo::Nogo },
            valid_responses: Some(vec!["space".into()]),
        })
        .collect()
}

fn evaluate(stimulus: &GoNogo, responded: bool) -> Evaluation {
    let label = match (stimulus, responded) {
        (GoNogo::Go, true) => "hit",
        (GoNogo::Go, false) => "omission",
        (GoNogo::Nogo, true) => "commission",
        (GoNogo::Nogo, false) => "correct_rejection",
    };
    Evaluation::new(matches!(stimulus, GoNogo::Go) == responded).with_data("outcome", label)
}

#[tokio::test(start_paused = true)]
async fn go_nogo_summary_from_engine_outcomes() {
    let trials = go_nogo_trials(20, 0.75, 99);
    let go_count = trials.iter().filter(|t| t.stimulus == GoNogo::Go).count();
    let nogo_count = trials.len() - go_count;
    assert_eq!(go_count, 15);

    // A perfect subject: presses on every go stimulus 40 ms after onset,
    // withholds on no-go. Trials chain back to back; go trials end at the
    // response (40 ms), no-go trials at the 100 ms timeout.
    let schedule: Vec<bool> = trials.iter().map(|t| t.stimulus == GoNogo::Go).collect();
    let clock = Arc::new(TrialClock::without_frames());
    let hub = InputHub::new();
    let runner = TrialRunner::new(clock, hub.clone());

    tokio::spawn(async move {
        for is_go in schedule {
            if is_go {
                sleep(Duration::from_millis(40)).await;
                hub.publish(RawInput::key("space"));
            } else {
                sleep(Duration::from_millis(100)).await;
            }
        }
    });

    let results = runner
        .run(trials, |stimulus, response| {
            evaluate(stimulus, response.is_some())
        })
        .await
        .unwrap();
    assert_eq!(results.len(), 20);

    let count = |label: &str| {
        results
            .iter()
            .filter(|o| o.custom_data["outcome"] == label)
            .count()
    };
    let hits = count("hit");
    let commissions = count("commission");
    assert_eq!(hits, 15);
    assert_eq!(commissions, 0);
    assert_eq!(count("correct_rejection"), nogo_count);

    let hit_rts: Vec<f64> = results.iter().filter_map(|o| o.reaction_time).collect();
    assert_eq!(hit_rts.len(), 15);
    assert!((mean(&hit_rts) - 40.0).abs() < 1e-6);

    assert_eq!(accuracy(results.iter().filter(|o| o.correct).count(), 20), 1.0);
    let sensitivity = d_prime(hits, go_count, commissions, nogo_count);
    assert!(sensitivity.is_finite() && sensitivity > 2.0);
    assert!(response_bias(hits, go_count, commissions, nogo_count).is_finite());
}
