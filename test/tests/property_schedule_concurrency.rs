/// PROPERTY-BASED TESTS: Schedule intake under concurrent producers
///
/// Request threads add instances while the simulation thread pops batches.
///
/// Key invariants:
/// 1. Every added instance is returned by exactly one pop
/// 2. No pop returns an instance twice, across types or batches
/// 3. Instances land in the list of their own type

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use proptest::prelude::*;

use downflux_shared::{ClientId, FsmType, Instance, InstanceId, Schedule};
use downflux_test::TestOrder;

const TYPES: [FsmType; 3] = [FsmType::MOVE, FsmType::ATTACK, FsmType::PRODUCE];

fn drain(schedule: &Schedule, seen: &mut Vec<InstanceId>) {
    let batch = schedule.pop().unwrap();
    for fsm_type in TYPES {
        for instance in batch.get(fsm_type).unwrap().iter() {
            assert_eq!(instance.fsm_type(), fsm_type);
            seen.push(instance.id().clone());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Test that concurrent adds and pops neither lose nor duplicate instances
    #[test]
    fn prop_concurrent_adds_are_popped_exactly_once(
        producers in 1usize..6,
        per_producer in 1usize..40,
    ) {
        let schedule = Schedule::new(TYPES);
        let client = ClientId::from("client");
        let done = AtomicUsize::new(0);
        let mut seen = Vec::new();

        thread::scope(|scope| {
            for producer in 0..producers {
                let schedule = &schedule;
                let client = &client;
                let done = &done;
                scope.spawn(move || {
                    for index in 0..per_producer {
                        let fsm_type = TYPES[index % TYPES.len()];
                        let id = format!("p{}-{}", producer, index);
                        let order: Arc<dyn Instance> =
                            TestOrder::with_id(fsm_type, &id, client, &id, index as u64);
                        schedule.add(order).unwrap();
                    }
                    done.fetch_add(1, Ordering::Release);
                });
            }

            while done.load(Ordering::Acquire) < producers {
                drain(&schedule, &mut seen);
                thread::yield_now();
            }
        });
        drain(&schedule, &mut seen);

        let unique: BTreeSet<_> = seen.iter().cloned().collect();
        prop_assert_eq!(seen.len(), producers * per_producer);
        prop_assert_eq!(unique.len(), seen.len());
        prop_assert!(schedule.is_empty().unwrap());
    }

    /// Test that a schedule built from a subset of types rejects the rest
    /// without touching its lists
    #[test]
    fn prop_unregistered_adds_leave_schedule_unchanged(
        accepted in 0usize..3,
        count in 1usize..20,
    ) {
        let schedule = Schedule::new([TYPES[accepted]]);
        let client = ClientId::from("client");

        for index in 0..count {
            let fsm_type = TYPES[index % TYPES.len()];
            let id = format!("o{}", index);
            let result = schedule.add(TestOrder::with_id(fsm_type, &id, &client, &id, 0));
            prop_assert_eq!(result.is_ok(), fsm_type == TYPES[accepted]);
        }

        let expected = (0..count).filter(|index| index % TYPES.len() == accepted).count();
        prop_assert_eq!(schedule.len().unwrap(), expected);
    }
}
