/// INTEGRATION TESTS: Entity lifecycle in the running simulation
///
/// Deleted entities stay in the tree with an end tick so that their history
/// can still be replicated. Orders targeting an entity past its end tick are
/// canceled. Composites keep visiting every child when one of them fails.

use std::sync::Arc;

use downflux_shared::{
    Entity, EntityError, EntityId, EntityList, ErrorKind, FsmType, Position, Visitor,
};
use downflux_test::{
    assert_kind, init_logging, open_grid, visit_log, FailingVisitor, ProbeEntity,
    RecordingVisitor, TestServer,
};

#[test]
fn deleted_tank_stops_moving_and_stays_exportable() {
    init_logging();
    let server = TestServer::new(open_grid(10, 1));
    let tank = server.spawn_tank("tank", Position::new(0.0, 0.0));
    server.move_tank("tank", Position::new(9.0, 0.0));
    server.tick_until(40);

    server
        .executor
        .delete_entity(&EntityId::from("tank"), 50)
        .unwrap();
    assert!(tank.is_alive(49));
    assert!(!tank.is_alive(50));

    server.tick_until(51);

    assert!(server.executor.active(FsmType::MOVE).unwrap().is_empty());
    let found = server
        .executor
        .root()
        .find(&EntityId::from("tank"))
        .unwrap()
        .unwrap();
    assert_eq!(found.end(), Some(50));

    let snapshot = server.executor.export(0, None).unwrap();
    let exported = snapshot
        .entities
        .iter()
        .find(|entity| entity.id == EntityId::from("tank"))
        .unwrap();
    assert_eq!(exported.end, Some(50));
}

#[test]
fn entity_cannot_be_deleted_twice() {
    let server = TestServer::new(open_grid(2, 2));
    server.spawn_probe("probe");
    server
        .executor
        .delete_entity(&EntityId::from("probe"), 5)
        .unwrap();

    assert_kind!(
        server.executor.delete_entity(&EntityId::from("probe"), 6),
        ErrorKind::FailedPrecondition
    );
    assert_kind!(
        server.executor.delete_entity(&EntityId::from("nobody"), 6),
        ErrorKind::NotFound
    );
}

#[test]
fn duplicate_spawn_is_rejected() {
    let server = TestServer::new(open_grid(2, 2));
    server.spawn_probe("probe");

    assert_kind!(
        server
            .executor
            .add_entity(ProbeEntity::new("probe", 0).shared()),
        ErrorKind::AlreadyExists
    );
    assert_eq!(server.executor.root().len().unwrap(), 1);
}

#[test]
fn nested_composites_are_visited_once_per_entity() {
    let log = visit_log();
    let visitor = RecordingVisitor::new(FsmType::ATTACK, &log);

    let squad = Arc::new(EntityList::new("squad", 0));
    for id in ["s1", "s2"] {
        squad.add(ProbeEntity::new(id, 0).shared()).unwrap();
    }
    let root = EntityList::new("root", 0);
    root.add(squad.clone()).unwrap();
    root.add(ProbeEntity::new("loner", 0).shared()).unwrap();

    root.accept(&visitor).unwrap();

    assert_eq!(log.lock().unwrap().len(), 5);
    assert!(root.find(&EntityId::from("s2")).unwrap().is_some());
    assert_eq!(root.walk().unwrap().len(), 5);
}

#[test]
fn composite_returns_a_child_failure_after_visiting_every_child() {
    let log = visit_log();
    let visitor = FailingVisitor::new(FsmType::ATTACK, &["c3", "c7"], &log);

    let root = EntityList::new("root", 0);
    for index in 0..10 {
        root.add(ProbeEntity::new(&format!("c{}", index), 0).shared())
            .unwrap();
    }

    let err = root.accept(&visitor as &dyn Visitor).unwrap_err();

    // first failure in id order
    assert!(err.to_string().contains("c3"));
    // root plus the eight healthy children
    assert_eq!(log.lock().unwrap().len(), 9);
}

#[test]
fn composite_cannot_contain_itself() {
    let root = Arc::new(EntityList::new("root", 0));
    let child = Arc::new(EntityList::new("child", 0));
    root.add(child.clone()).unwrap();

    let err = child.add(root.clone()).unwrap_err();

    assert!(matches!(err, EntityError::Cycle { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
