/// INTEGRATION TESTS: Move orders through the tick loop
///
/// A Move order is scheduled by a client, picked up at the next tick, turned
/// into a position curve by the Move visitor and finished once the tank
/// reaches its destination. Unreachable destinations are reported back to
/// the issuing client instead of failing the tick.

use std::sync::Arc;

use downflux_server::{pathing::TileAStar, MoveArgs, MoveCommand, ServerConfig, TickReport};
use downflux_shared::{
    ClientId, Curve, CurveCategory, DatumValue, EntityId, ErrorKind, FsmState, FsmType, Position,
};
use downflux_test::{
    assert_kind, assert_samples, init_logging, open_grid, pathing, walled_grid, TestServer,
};

fn position_curve(server: &TestServer, id: &str) -> Curve<Position> {
    let tank = server
        .executor
        .root()
        .find(&EntityId::from(id))
        .unwrap()
        .unwrap();
    let curves = tank.curves().unwrap().get(CurveCategory::Position).unwrap();
    curves.as_position().unwrap().clone()
}

#[test]
fn move_order_walks_to_destination_and_finishes() {
    init_logging();
    let server = TestServer::new(open_grid(4, 4));
    let tank = server.spawn_tank("tank", Position::new(0.0, 0.0));
    server.move_tank("tank", Position::new(3.0, 0.0));

    let first = server.executor.tick().unwrap();
    assert!(first.is_clean());
    assert_eq!(server.executor.active(FsmType::MOVE).unwrap().len(), 1);
    assert_eq!(
        server.executor.active(FsmType::MOVE).unwrap()[0].state().unwrap(),
        FsmState::Executing
    );

    assert_samples!(
        position_curve(&server, "tank"),
        [(0, 0, 0), (1, 0, 0), (11, 1, 0), (21, 2, 0), (31, 3, 0)]
    );
    assert_eq!(tank.position(6).unwrap(), Position::new(0.5, 0.0));

    // finished at 31, dropped from the active schedule at 32
    server.tick_until(32);
    assert!(server.executor.active(FsmType::MOVE).unwrap().is_empty());
    assert_eq!(tank.position(40).unwrap(), Position::new(3.0, 0.0));
}

#[test]
fn committed_curve_is_exported_in_the_tick_delta() {
    let server = TestServer::new(open_grid(4, 4));
    server.spawn_tank("tank", Position::new(0.0, 0.0));
    // flush the spawn marks
    server.executor.tick().unwrap();
    server.move_tank("tank", Position::new(0.0, 2.0));

    let report: TickReport = server.executor.tick().unwrap();

    let curve = report
        .delta
        .curves
        .iter()
        .find(|curve| curve.curve_id.as_str() == "tank/position")
        .unwrap();
    let last = curve.data.last().unwrap();
    assert_eq!(last, &(22, DatumValue::Position(Position::new(0.0, 2.0))));
    assert!(report
        .delta
        .curves
        .iter()
        .all(|curve| curve.curve_id.as_str() != "tank/health"));
}

#[test]
fn truncated_paths_are_replanned_until_arrival() {
    let server = TestServer::with_config(
        open_grid(6, 1),
        ServerConfig {
            visit_deadline: None,
            path_lookahead: 3,
            ..ServerConfig::default()
        },
    );
    server.spawn_tank("tank", Position::new(0.0, 0.0));
    server.move_tank("tank", Position::new(5.0, 0.0));

    server.executor.tick().unwrap();
    assert_samples!(
        position_curve(&server, "tank"),
        [(0, 0, 0), (1, 0, 0), (11, 1, 0), (21, 2, 0)]
    );

    server.tick_until(52);
    assert_samples!(
        position_curve(&server, "tank"),
        [
            (0, 0, 0),
            (1, 0, 0),
            (11, 1, 0),
            (21, 2, 0),
            (31, 3, 0),
            (41, 4, 0),
            (51, 5, 0),
        ]
    );
    assert!(server.executor.active(FsmType::MOVE).unwrap().is_empty());
}

#[test]
fn newer_order_for_the_same_tank_replaces_the_older() {
    let server = TestServer::new(open_grid(8, 8));
    let tank = server.spawn_tank("tank", Position::new(0.0, 0.0));
    server.move_tank("tank", Position::new(7.0, 0.0));
    server.tick_until(11);

    server.move_tank("tank", Position::new(1.0, 3.0));
    server.tick_until(12);

    let active = server.executor.active(FsmType::MOVE).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].tick(), 11);

    server.tick_until(60);
    assert_eq!(tank.position(60).unwrap(), Position::new(1.0, 3.0));
}

#[test]
fn replanning_mid_tile_keeps_exported_history() {
    let server = TestServer::new(open_grid(4, 4));
    let tank = server.spawn_tank("tank", Position::new(0.0, 0.0));
    server.move_tank("tank", Position::new(3.0, 0.0));
    server.tick_until(7);
    let before: Vec<Position> = (0..=8).map(|tick| tank.position(tick).unwrap()).collect();

    server.move_tank("tank", Position::new(3.0, 2.0));
    server.tick_until(8);

    for (tick, expected) in (0..=8).zip(before.iter()) {
        let actual = tank.position(tick).unwrap();
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "position at tick {} moved from {:?} to {:?}",
            tick,
            expected,
            actual
        );
    }
    assert_eq!(tank.position(8).unwrap(), Position::new(0.7, 0.0));
    assert_eq!(tank.position(11).unwrap(), Position::new(1.0, 0.0));

    server.tick_until(60);
    assert_eq!(tank.position(60).unwrap(), Position::new(3.0, 2.0));
}

#[test]
fn unreachable_destination_is_reported_to_the_client() {
    // column x = 2 splits the map in two
    let server = TestServer::new(walled_grid(5, 3, &[(2, 0), (2, 1), (2, 2)]));
    let tank = server.spawn_tank("tank", Position::new(0.0, 1.0));
    server.move_tank("tank", Position::new(4.0, 1.0));

    let report = server.executor.tick().unwrap();

    assert!(report.stage_errors.is_empty());
    assert_eq!(report.command_failures.len(), 1);
    let failure = &report.command_failures[0];
    assert_eq!(failure.client_id, server.client);
    assert_eq!(failure.entity_id, EntityId::from("tank"));
    assert_eq!(failure.fsm_type, FsmType::MOVE);
    assert_eq!(failure.error.kind(), ErrorKind::NotFound);

    // the order is canceled and the tank stays put
    server.tick_until(2);
    assert!(server.executor.active(FsmType::MOVE).unwrap().is_empty());
    assert_eq!(tank.position(2).unwrap(), Position::new(0.0, 1.0));
    assert!(server.executor.tick().unwrap().command_failures.is_empty());
}

#[test]
fn move_into_a_wall_is_rejected() {
    let server = TestServer::new(walled_grid(3, 3, &[(1, 1)]));
    server.spawn_tank("tank", Position::new(0.0, 0.0));
    server.move_tank("tank", Position::new(1.0, 1.0));

    let report = server.executor.tick().unwrap();

    assert_eq!(report.command_failures.len(), 1);
    assert_eq!(
        report.command_failures[0].error.kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn move_for_a_missing_tank_is_not_queued() {
    let server = TestServer::new(open_grid(3, 3));

    assert_kind!(
        server.executor.schedule_move(
            server.client.clone(),
            EntityId::from("ghost"),
            Position::new(1.0, 1.0)
        ),
        ErrorKind::NotFound
    );
    assert_eq!(server.executor.pending().unwrap(), 0);
}

#[test]
fn command_routes_around_walls_outside_the_tick_loop() {
    // wall at x = 1 with a gap at y = 2
    let (map, graph) = pathing(walled_grid(3, 3, &[(1, 0), (1, 1)]));
    let command = MoveCommand::new(
        Arc::new(TileAStar),
        map,
        graph,
        ClientId::from("client"),
        EntityId::from("tank"),
        Position::new(2.0, 0.0),
    )
    .with_ticks_per_tile(5);

    let curve = command
        .execute(MoveArgs {
            tick: 10,
            source: Position::new(0.0, 0.0),
        })
        .unwrap();

    assert_samples!(
        curve,
        [
            (10, 0, 0),
            (15, 0, 1),
            (20, 0, 2),
            (25, 1, 2),
            (30, 2, 2),
            (35, 2, 1),
            (40, 2, 0),
        ]
    );
}
