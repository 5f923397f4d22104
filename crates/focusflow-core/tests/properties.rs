//! Property tests over arbitrary intent sequences.

use focusflow_core::storage::settings::load_sessions;
use focusflow_core::{MemoryStore, NullNotifier, SessionTimer, TimerMode};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Intent {
    StartOrPause,
    Tick(u16),
    Stop,
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::StartOrPause),
        (1u16..200).prop_map(Intent::Tick),
        Just(Intent::Stop),
    ]
}

fn timer(learn: i64, brk: i64) -> (SessionTimer, MemoryStore) {
    let store = MemoryStore::new();
    let mut timer = SessionTimer::restore(store.clone(), NullNotifier);
    timer.set_learn_duration(learn).unwrap();
    timer.set_break_duration(brk).unwrap();
    (timer, store)
}

proptest! {
    #[test]
    fn start_or_pause_only_leaves_idle_once(presses in 1usize..20) {
        let (mut timer, _) = timer(25, 5);
        for i in 0..presses {
            let was_active = timer.is_active();
            timer.start_or_pause();
            prop_assert_eq!(timer.is_active(), !was_active);
            prop_assert_eq!(timer.mode(), TimerMode::Learn, "press {}", i);
        }
        prop_assert_eq!(timer.time_left(), 25 * 60);
    }

    #[test]
    fn intervals_alternate_and_log_stays_consistent(
        learn in 1i64..3,
        brk in 1i64..3,
        intents in proptest::collection::vec(intent(), 0..60),
    ) {
        let (mut timer, store) = timer(learn, brk);
        let mut expected_next = TimerMode::Learn;

        for intent in intents {
            let before = timer.sessions().len();
            let mode = timer.mode();
            match intent {
                Intent::StartOrPause => {
                    timer.start_or_pause();
                }
                Intent::Tick(n) => {
                    let mut completions = 0;
                    for _ in 0..n {
                        if timer.tick().is_some() {
                            completions += 1;
                        }
                    }
                    prop_assert!(completions <= 1);
                    if completions == 1 {
                        let session = &timer.sessions()[before];
                        prop_assert_eq!(session.duration, timer.configured_secs(mode));
                        expected_next = mode.following().unwrap();
                    }
                }
                Intent::Stop => {
                    let elapsed = timer.configured_secs(mode).saturating_sub(timer.time_left());
                    let event = timer.stop();
                    if mode == TimerMode::Idle {
                        prop_assert!(event.is_none());
                    } else {
                        expected_next = mode.following().unwrap();
                        let logged = timer.sessions().len() - before;
                        prop_assert_eq!(logged, usize::from(elapsed > 0));
                        if elapsed > 0 {
                            prop_assert_eq!(timer.sessions()[before].duration, elapsed);
                        }
                    }
                }
            }

            prop_assert_eq!(timer.next_mode(), expected_next);
            if timer.mode() == TimerMode::Idle {
                prop_assert!(!timer.is_active());
            }
            for session in timer.sessions() {
                if session.mode() == TimerMode::Break {
                    prop_assert!(session.label().is_none() && session.note().is_none());
                }
            }
        }

        prop_assert_eq!(load_sessions(&store), timer.sessions());
    }
}
