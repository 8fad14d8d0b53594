use robodino_core::{ActorId, Coordinates, Direction, Step, StepRejection, Turn};
use robodino_system_session::{ErrorKind, Session, SessionConfig, SessionError};

fn session_with_grid(width: u32, height: u32) -> Session {
    let mut session = Session::new(SessionConfig::default());
    let _ = session.create_grid(width, height).expect("grid");
    session
}

#[test]
fn every_operation_requires_a_grid() {
    let mut session = Session::new(SessionConfig::default());

    assert_eq!(session.state(), Err(SessionError::NoGrid));
    assert_eq!(
        session.create_mover(0, 0, Direction::Up),
        Err(SessionError::NoGrid)
    );
    assert_eq!(session.create_vessel(0, 0, None), Err(SessionError::NoGrid));
    assert_eq!(session.turn("0", Turn::Left), Err(SessionError::NoGrid));
    assert_eq!(session.step("0", Step::Forward), Err(SessionError::NoGrid));
    assert_eq!(session.attack("0"), Err(SessionError::NoGrid));
    assert_eq!(session.visualize(), Err(SessionError::NoGrid));
    assert_eq!(SessionError::NoGrid.kind(), ErrorKind::Unprocessable);
}

#[test]
fn zero_sized_grids_are_refused() {
    let mut session = Session::new(SessionConfig::default());
    assert_eq!(
        session.create_grid(0, 5),
        Err(SessionError::InvalidDimensions {
            width: 0,
            height: 5
        })
    );
    assert!(session.grid().is_none());
}

#[test]
fn default_grid_uses_configured_size() {
    let config = SessionConfig {
        grid_width: 3,
        grid_height: 2,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);
    let _ = session.create_default_grid().expect("grid");

    assert_eq!(
        session.visualize().expect("board"),
        "#####\n#...#\n#...#\n#####"
    );
}

#[test]
fn placement_outside_grid_reports_valid_ranges() {
    let mut session = session_with_grid(10, 5);

    let error = session
        .create_mover(-1, 0, Direction::Up)
        .expect_err("negative column");
    assert_eq!(error.kind(), ErrorKind::OutOfRange);

    let error = session
        .create_vessel(3, 5, None)
        .expect_err("row past the edge");
    assert_eq!(
        error.to_string(),
        "(3, 5) is out of bounds: x must be in [0; 9] and y in [0; 4]"
    );
}

#[test]
fn placement_on_occupied_tile_is_refused() {
    let mut session = session_with_grid(3, 3);
    let _ = session.create_mover(1, 1, Direction::Up).expect("mover");

    assert_eq!(
        session.create_vessel(1, 1, None),
        Err(SessionError::TileOccupied(Coordinates::new(1, 1)))
    );
    assert_eq!(
        session.create_mover(1, 1, Direction::Down),
        Err(SessionError::TileOccupied(Coordinates::new(1, 1)))
    );
    assert_eq!(session.state().expect("state").movers.len(), 1);
}

#[test]
fn unknown_identifiers_are_not_found() {
    let mut session = session_with_grid(3, 3);

    assert_eq!(
        session.turn("7", Turn::Right),
        Err(SessionError::MoverNotFound(ActorId::new("7")))
    );
    assert_eq!(
        session.vessel("7"),
        Err(SessionError::VesselNotFound(ActorId::new("7")))
    );
    assert_eq!(
        session.healthbar("7").map_err(|error| error.kind()),
        Err(ErrorKind::NotFound)
    );
}

#[test]
fn turning_and_attacking_wounds_adjacent_vessel() {
    let mut session = session_with_grid(10, 10);
    let _ = session.create_mover(3, 2, Direction::Down).expect("mover");
    let _ = session.create_vessel(3, 3, Some(2)).expect("vessel");

    let state = session.turn("0", Turn::Left).expect("turn");
    assert_eq!(state.movers[0].facing, Direction::Right);

    let state = session.attack("0").expect("attack");
    assert_eq!(state.vessels[0].health, 1);
    assert_eq!(session.healthbar("0").expect("bar"), "[-----     ] 1 / 2");
}

#[test]
fn eleven_health_vessel_wounded_once() {
    let mut session = session_with_grid(10, 10);
    let _ = session.create_mover(3, 2, Direction::Down).expect("mover");
    let _ = session.create_vessel(3, 3, Some(11)).expect("vessel");

    let state = session.attack("0").expect("attack");

    assert_eq!(state.vessels[0].health, 10);
    let bar = session.healthbar("0").expect("bar");
    assert_eq!(bar, "[--------- ] 10 / 11");
    let board = session.visualize().expect("board");
    let row: Vec<&str> = board.lines().collect();
    assert_eq!(row[3], "#...↓......#");
    assert_eq!(row[4], "#...10......#");
}

#[test]
fn single_actor_lookups_return_snapshots() {
    let mut session = session_with_grid(3, 3);
    let _ = session.create_mover(0, 2, Direction::Left).expect("mover");

    let mover = session.mover("0").expect("mover");
    assert_eq!(mover.coordinates, Coordinates::new(0, 2));
    assert_eq!(mover.facing, Direction::Left);
    assert_eq!(
        session.mover("1"),
        Err(SessionError::MoverNotFound(ActorId::new("1")))
    );
}

#[test]
fn refused_steps_leave_state_unchanged() {
    let mut session = session_with_grid(2, 1);
    let _ = session.create_mover(0, 0, Direction::Left).expect("mover");
    let _ = session.create_vessel(1, 0, None).expect("vessel");
    let before = session.state().expect("state");

    assert_eq!(
        session.step("0", Step::Forward),
        Err(SessionError::StepRejected {
            id: ActorId::new("0"),
            reason: StepRejection::OutOfBounds,
        })
    );
    assert_eq!(
        session.step("0", Step::Backward),
        Err(SessionError::StepRejected {
            id: ActorId::new("0"),
            reason: StepRejection::Occupied,
        })
    );
    assert_eq!(session.state().expect("state"), before);
}

#[test]
fn destroyed_vessels_leave_the_registry() {
    let mut session = session_with_grid(3, 3);
    let _ = session.create_mover(1, 1, Direction::Up).expect("mover");
    let _ = session.create_vessel(1, 0, Some(1)).expect("fragile");
    let _ = session.create_vessel(0, 1, Some(3)).expect("sturdy");

    let state = session.attack("0").expect("attack");

    assert_eq!(state.vessels.len(), 1);
    assert_eq!(state.vessels[0].id.as_str(), "1");
    assert_eq!(state.vessels[0].health, 2);
    assert_eq!(
        session.vessel("0"),
        Err(SessionError::VesselNotFound(ActorId::new("0")))
    );
    assert_eq!(
        session.visualize().expect("board"),
        "#####\n#...#\n#2↑.#\n#...#\n#####"
    );

    let bars = session.healthbars().expect("bars");
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].0.as_str(), "1");
}

#[test]
fn identifiers_are_not_reused_after_destruction() {
    let mut session = session_with_grid(3, 1);
    let _ = session.create_mover(0, 0, Direction::Right).expect("mover");
    let _ = session.create_vessel(1, 0, Some(1)).expect("vessel");
    let _ = session.attack("0").expect("attack");

    let state = session.create_vessel(2, 0, Some(4)).expect("vessel");
    assert_eq!(state.vessels.len(), 1);
    assert_eq!(state.vessels[0].id.as_str(), "1");
}

#[test]
fn new_grid_discards_previous_actors() {
    let mut session = session_with_grid(4, 4);
    let _ = session.create_mover(0, 0, Direction::Up).expect("mover");
    let _ = session.create_vessel(3, 3, None).expect("vessel");

    let state = session.create_grid(2, 2).expect("grid");
    assert!(state.movers.is_empty());
    assert!(state.vessels.is_empty());

    let state = session.create_mover(1, 1, Direction::Up).expect("mover");
    assert_eq!(state.movers[0].id.as_str(), "0");
}

#[test]
fn state_lists_actors_in_creation_order() {
    let mut session = session_with_grid(20, 1);
    for x in 0..12 {
        let _ = session.create_mover(x, 0, Direction::Up).expect("mover");
    }

    let ids: Vec<String> = session
        .movers()
        .expect("movers")
        .into_iter()
        .map(|mover| mover.id.to_string())
        .collect();
    let expected: Vec<String> = (0..12).map(|index: u32| index.to_string()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn closing_drops_the_grid() {
    let mut session = session_with_grid(2, 2);
    session.close();
    assert_eq!(session.state(), Err(SessionError::NoGrid));
}
