/// INTEGRATION TESTS: Tick loop staging and conflict resolution
///
/// Every tick pops the intake schedule, cancels instances superseded by a
/// newer sibling of the same conflict group, and then runs one visitor stage
/// per registered visitor over the whole entity tree. A stage finishes on
/// every entity before the next stage starts, and a failing stage is
/// reported without aborting the tick.

use std::{
    collections::BTreeSet,
    sync::{atomic::AtomicBool, Arc},
    thread,
    time::Duration,
};

use downflux_server::ServerConfig;
use downflux_shared::{
    EntityId, ErrorKind, FsmState, FsmType, Instance, InstanceId, VisitError, Visitor,
};
use downflux_test::{
    assert_kind, init_logging, open_grid, visit_log, FailingVisitor, RecordingVisitor,
    SlowVisitor, TestOrder, TestServer,
};

fn recording_server() -> (TestServer, Arc<RecordingVisitor>, Arc<RecordingVisitor>) {
    let log = visit_log();
    let attack = Arc::new(RecordingVisitor::new(FsmType::ATTACK, &log));
    let moves = Arc::new(RecordingVisitor::new(FsmType::MOVE, &log));
    let server = TestServer::with_visitors(vec![
        attack.clone() as Arc<dyn Visitor>,
        moves.clone() as Arc<dyn Visitor>,
    ]);
    server.spawn_probe("unit");
    (server, attack, moves)
}

#[test]
fn newer_sibling_supersedes_active_instance() {
    init_logging();
    let (server, attack, moves) = recording_server();

    let order = TestOrder::new(FsmType::MOVE, &server.client, "unit", 0);
    server.executor.schedule(order.clone()).unwrap();
    server.executor.tick().unwrap();
    assert_eq!(server.executor.active(FsmType::MOVE).unwrap().len(), 1);

    server
        .executor
        .schedule(TestOrder::new(FsmType::ATTACK, &server.client, "unit", 1))
        .unwrap();
    let report = server.executor.tick().unwrap();

    assert_eq!(report.superseded, vec![InstanceId::from("unit/MOVE")]);
    assert_eq!(order.state().unwrap(), FsmState::Canceled);
    assert!(server.executor.active(FsmType::MOVE).unwrap().is_empty());
    assert_eq!(server.executor.active(FsmType::ATTACK).unwrap().len(), 1);

    // visitors see the post-resolution schedule
    assert_eq!(moves.scheduled().last().unwrap(), &(2, vec![]));
    assert_eq!(
        attack.scheduled().last().unwrap(),
        &(2, vec![InstanceId::from("unit/ATTACK")])
    );
}

#[test]
fn conflicting_orders_in_one_batch_leave_a_single_survivor() {
    let (server, _, _) = recording_server();
    let moves = TestOrder::new(FsmType::MOVE, &server.client, "unit", 0);
    let attack = TestOrder::new(FsmType::ATTACK, &server.client, "unit", 0);
    server.executor.schedule(moves.clone()).unwrap();
    server.executor.schedule(attack.clone()).unwrap();

    let report = server.executor.tick().unwrap();

    assert_eq!(report.superseded.len(), 1);
    let active = server.executor.active(FsmType::MOVE).unwrap().len()
        + server.executor.active(FsmType::ATTACK).unwrap().len();
    assert_eq!(active, 1);
    let states = [moves.state().unwrap(), attack.state().unwrap()];
    assert_eq!(
        states
            .iter()
            .filter(|state| **state == FsmState::Canceled)
            .count(),
        1
    );
}

#[test]
fn orders_on_different_entities_do_not_conflict() {
    let (server, _, _) = recording_server();
    server.spawn_probe("other");
    server
        .executor
        .schedule(TestOrder::new(FsmType::MOVE, &server.client, "unit", 0))
        .unwrap();
    server
        .executor
        .schedule(TestOrder::new(FsmType::ATTACK, &server.client, "other", 0))
        .unwrap();

    let report = server.executor.tick().unwrap();

    assert!(report.superseded.is_empty());
    assert_eq!(server.executor.active(FsmType::MOVE).unwrap().len(), 1);
    assert_eq!(server.executor.active(FsmType::ATTACK).unwrap().len(), 1);
}

#[test]
fn stages_run_in_registration_order_over_the_whole_tree() {
    let log = visit_log();
    let server = TestServer::with_visitors(vec![
        Arc::new(RecordingVisitor::new(FsmType::ATTACK, &log)) as Arc<dyn Visitor>,
        Arc::new(RecordingVisitor::new(FsmType::MOVE, &log)),
    ]);
    for id in ["a", "b", "c"] {
        server.spawn_probe(id);
    }

    server.executor.tick().unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 8);
    let (first, second) = log.split_at(4);
    assert!(first.iter().all(|(fsm_type, _)| *fsm_type == FsmType::ATTACK));
    assert!(second.iter().all(|(fsm_type, _)| *fsm_type == FsmType::MOVE));
}

#[test]
fn failing_stage_is_reported_and_later_stages_still_run() {
    let log = visit_log();
    let moves = Arc::new(RecordingVisitor::new(FsmType::MOVE, &log));
    let server = TestServer::with_visitors(vec![
        Arc::new(FailingVisitor::new(FsmType::ATTACK, &["b"], &log)) as Arc<dyn Visitor>,
        moves.clone(),
    ]);
    for id in ["a", "b", "c"] {
        server.spawn_probe(id);
    }

    let report = server.executor.tick().unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.stage_errors.len(), 1);
    let stage = &report.stage_errors[0];
    assert_eq!(stage.fsm_type, FsmType::ATTACK);
    assert_eq!(
        stage.error,
        VisitError::Failed {
            fsm_type: FsmType::ATTACK,
            entity_id: EntityId::from("b"),
            reason: "injected failure".to_string(),
        }
    );
    assert_eq!(stage.error.kind(), ErrorKind::Internal);

    // siblings of the failing entity are still visited
    let attacked: BTreeSet<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|(fsm_type, _)| *fsm_type == FsmType::ATTACK)
        .map(|(_, id)| id.as_str().to_string())
        .collect();
    assert_eq!(
        attacked,
        BTreeSet::from(["a".to_string(), "c".to_string(), "root".to_string()])
    );
    assert_eq!(moves.visited().len(), 4);

    // the loop keeps going
    assert_eq!(server.executor.tick().unwrap().tick, 2);
}

#[test]
fn stage_past_its_deadline_times_out() {
    let server = TestServer::with_visitors_and_config(
        vec![Arc::new(SlowVisitor::new(FsmType::ATTACK, Duration::from_millis(5)))],
        ServerConfig {
            visit_deadline: Some(Duration::from_millis(1)),
            ..ServerConfig::default()
        },
    );
    for id in ["a", "b", "c"] {
        server.spawn_probe(id);
    }

    let report = server.executor.tick().unwrap();

    assert_eq!(report.stage_errors.len(), 1);
    assert_eq!(report.stage_errors[0].error.kind(), ErrorKind::Timeout);
    assert!(matches!(
        report.stage_errors[0].error,
        VisitError::Timeout {
            fsm_type: FsmType::ATTACK,
            ..
        }
    ));
}

#[test]
fn type_without_a_visitor_is_unimplemented() {
    let server = TestServer::new(open_grid(2, 2));
    server.spawn_probe("factory");

    assert_kind!(
        server.executor.schedule(TestOrder::new(
            FsmType::PRODUCE,
            &server.client,
            "factory",
            0
        )),
        ErrorKind::Unimplemented
    );
    assert_eq!(server.executor.pending().unwrap(), 0);
}

#[test]
fn type_outside_the_schedule_is_rejected() {
    const SCOUT: FsmType = FsmType::new("SCOUT");
    let log = visit_log();
    let server =
        TestServer::with_visitors(vec![Arc::new(RecordingVisitor::new(SCOUT, &log))]);
    server.spawn_probe("unit");

    assert_kind!(
        server
            .executor
            .schedule(TestOrder::new(SCOUT, &server.client, "unit", 0)),
        ErrorKind::FailedPrecondition
    );
    assert_eq!(server.executor.pending().unwrap(), 0);

    // an unscheduled visitor still runs, with an empty batch
    server.executor.tick().unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn run_loop_stops_on_request() {
    let server = TestServer::with_visitors_and_config(
        vec![],
        ServerConfig {
            tick_interval: Duration::from_millis(1),
            visit_deadline: None,
            ..ServerConfig::default()
        },
    );
    let flag = AtomicBool::new(false);

    thread::scope(|scope| {
        let runner = scope.spawn(|| server.executor.run(&flag));
        while server.executor.status().tick() < 5 {
            thread::sleep(Duration::from_millis(1));
        }
        server.executor.stop().unwrap();
        runner.join().unwrap().unwrap();
    });

    assert!(server.executor.status().is_stopped());
    assert!(server.executor.status().tick() >= 5);
}
