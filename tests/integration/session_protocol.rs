use crate::common::session::SessionFixture;
use crate::common::test_data::{back_rank_mate, board_with, mv, stalemate};
use gambit::storage::{GameId, GameStore};
use gambit::{Board, ClientCommand, Color, Game, PieceType, ServerMessage, Turn};

#[test]
fn test_observer_connect_is_announced() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let mut carol = fx.client("carol");

    fx.handler
        .handle(&carol.connection, ClientCommand::connect(&carol.token, fx.game_id));

    let to_carol = carol.drain();
    assert_eq!(to_carol.len(), 1);
    match &to_carol[0] {
        ServerMessage::LoadGame(record) => assert_eq!(record.game_id, fx.game_id),
        other => panic!("expected LOAD_GAME, got {:?}", other),
    }
    assert_eq!(
        alice.drain(),
        vec![ServerMessage::notification(
            "carol connected to the game as an observer"
        )]
    );
}

#[test]
fn test_connect_to_unknown_game() {
    let fx = SessionFixture::new();
    let mut alice = fx.client("alice");

    fx.handler
        .handle(&alice.connection, ClientCommand::connect(&alice.token, GameId(404)));

    let messages = alice.drain();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_error());
    assert!(fx.handler.registry().participants(GameId(404)).is_empty());
}

#[test]
fn test_move_by_player_not_on_turn() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let mut bob = fx.connected("bob");
    alice.drain();

    fx.handler.handle(
        &bob.connection,
        ClientCommand::make_move(&bob.token, fx.game_id, mv("e7e5")),
    );

    let to_bob = bob.drain();
    assert_eq!(to_bob, vec![ServerMessage::error("Error: It is not your turn")]);
    assert!(alice.drain().iter().all(|m| !m.is_load_game()));
    let record = fx.store.load(fx.game_id).unwrap();
    assert_eq!(record.game, Game::new());
}

#[test]
fn test_observer_cannot_move() {
    let fx = SessionFixture::new();
    let mut carol = fx.connected("carol");

    fx.handler.handle(
        &carol.connection,
        ClientCommand::make_move(&carol.token, fx.game_id, mv("e2e4")),
    );

    assert_eq!(carol.drain(), vec![ServerMessage::error("Error: It is not your turn")]);
}

#[test]
fn test_illegal_move_reports_reason() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let mut bob = fx.connected("bob");
    alice.drain();

    fx.handler.handle(
        &alice.connection,
        ClientCommand::make_move(&alice.token, fx.game_id, mv("e2e5")),
    );

    let to_alice = alice.drain();
    assert_eq!(to_alice.len(), 1);
    match &to_alice[0] {
        ServerMessage::Error(text) => assert!(text.starts_with("Error: Illegal move"), "{}", text),
        other => panic!("expected ERROR, got {:?}", other),
    }
    assert!(bob.drain().is_empty());
}

#[test]
fn test_full_exchange_reaches_observer() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let mut bob = fx.connected("bob");
    let mut carol = fx.connected("carol");
    alice.drain();
    bob.drain();

    fx.handler.handle(
        &alice.connection,
        ClientCommand::make_move(&alice.token, fx.game_id, mv("e2e4")),
    );
    fx.handler.handle(
        &bob.connection,
        ClientCommand::make_move(&bob.token, fx.game_id, mv("e7e5")),
    );

    let to_carol = carol.drain();
    assert_eq!(to_carol.len(), 4);
    assert!(to_carol[0].is_load_game());
    assert_eq!(to_carol[1], ServerMessage::notification("alice moved e2e4"));
    assert!(to_carol[2].is_load_game());
    assert_eq!(to_carol[3], ServerMessage::notification("bob moved e7e5"));

    match &to_carol[2] {
        ServerMessage::LoadGame(record) => assert_eq!(record.game.turn(), Turn::White),
        other => panic!("expected LOAD_GAME, got {:?}", other),
    }
}

#[test]
fn test_check_is_announced() {
    let fx = SessionFixture::new();
    let mut record = fx.store.load(fx.game_id).unwrap();
    record.game = Game::with_board(
        board_with(&[
            ("e1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("e8", Color::Black, PieceType::King),
        ]),
        Turn::White,
    );
    fx.store.store(&record).unwrap();
    let mut alice = fx.connected("alice");
    let mut bob = fx.connected("bob");
    alice.drain();

    fx.handler.handle(
        &alice.connection,
        ClientCommand::make_move(&alice.token, fx.game_id, mv("a1a8")),
    );

    assert_eq!(
        bob.drain().last(),
        Some(&ServerMessage::notification("bob (black) is in check"))
    );
    assert_eq!(fx.store.load(fx.game_id).unwrap().game.turn(), Turn::Black);
}

#[test]
fn test_stalemate_ends_game() {
    let fx = SessionFixture::new();
    let mut record = fx.store.load(fx.game_id).unwrap();
    // One white move away from the stalemate fixture: the queen comes from f1.
    let mut board = stalemate();
    board.set_piece("f7".parse().unwrap(), None);
    board.set_piece(
        "f1".parse().unwrap(),
        Some(gambit::Piece::new(Color::White, PieceType::Queen)),
    );
    record.game = Game::with_board(board, Turn::White);
    fx.store.store(&record).unwrap();
    let mut alice = fx.connected("alice");

    fx.handler.handle(
        &alice.connection,
        ClientCommand::make_move(&alice.token, fx.game_id, mv("f1f7")),
    );

    assert_eq!(
        alice.drain().last(),
        Some(&ServerMessage::notification(
            "bob (black) is in stalemate. The game is a draw"
        ))
    );
    let stored = fx.store.load(fx.game_id).unwrap();
    assert_eq!(stored.game.turn(), Turn::Ended);
    assert_eq!(stored.game.board(), &stalemate());
}

#[test]
fn test_move_after_mate_is_rejected() {
    let fx = SessionFixture::new();
    let mut record = fx.store.load(fx.game_id).unwrap();
    record.game = Game::with_board(back_rank_mate(), Turn::Ended);
    fx.store.store(&record).unwrap();
    let mut bob = fx.connected("bob");

    fx.handler.handle(
        &bob.connection,
        ClientCommand::make_move(&bob.token, fx.game_id, mv("g7g6")),
    );

    assert_eq!(bob.drain(), vec![ServerMessage::error("Error: The game is over")]);
}

#[test]
fn test_resign_by_observer_then_player() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let mut bob = fx.connected("bob");
    let mut carol = fx.connected("carol");
    alice.drain();
    bob.drain();

    fx.handler
        .handle(&carol.connection, ClientCommand::resign(&carol.token, fx.game_id));
    assert_eq!(carol.drain(), vec![ServerMessage::error("Error: Only players can resign")]);
    assert!(alice.drain().is_empty());
    assert_eq!(fx.store.load(fx.game_id).unwrap().game.turn(), Turn::White);

    fx.handler
        .handle(&alice.connection, ClientCommand::resign(&alice.token, fx.game_id));
    let resigned = ServerMessage::notification("alice resigned. The game is over");
    assert_eq!(alice.drain(), vec![resigned.clone()]);
    assert_eq!(bob.drain(), vec![resigned.clone()]);
    assert_eq!(carol.drain(), vec![resigned]);
    assert_eq!(fx.store.load(fx.game_id).unwrap().game.turn(), Turn::Ended);

    fx.handler
        .handle(&bob.connection, ClientCommand::resign(&bob.token, fx.game_id));
    assert_eq!(bob.drain(), vec![ServerMessage::error("Error: The game is over")]);
}

#[test]
fn test_player_not_on_turn_may_resign() {
    let fx = SessionFixture::new();
    let mut bob = fx.connected("bob");

    fx.handler
        .handle(&bob.connection, ClientCommand::resign(&bob.token, fx.game_id));

    assert_eq!(
        bob.drain(),
        vec![ServerMessage::notification("bob resigned. The game is over")]
    );
}

#[test]
fn test_leave_frees_seat() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let mut bob = fx.connected("bob");
    let mut carol = fx.connected("carol");
    alice.drain();
    bob.drain();

    fx.handler
        .handle(&carol.connection, ClientCommand::leave(&carol.token, fx.game_id));
    assert_eq!(alice.drain(), vec![ServerMessage::notification("carol left the game")]);
    bob.drain();

    fx.handler
        .handle(&bob.connection, ClientCommand::leave(&bob.token, fx.game_id));
    assert_eq!(alice.drain(), vec![ServerMessage::notification("bob left the game")]);
    assert!(bob.drain().is_empty());

    let record = fx.store.load(fx.game_id).unwrap();
    assert_eq!(record.white_username.as_deref(), Some("alice"));
    assert_eq!(record.black_username, None);
    assert_eq!(fx.handler.registry().participants(fx.game_id), vec!["alice".to_string()]);

    // bob's seat is free again
    fx.store.add_player(fx.game_id, Color::Black, "dave").unwrap();
}

#[test]
fn test_reconnect_on_new_connection() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let first = fx.connected("bob");
    let mut second = fx.client("bob");
    second.token = first.token.clone();
    alice.drain();

    fx.handler
        .handle(&second.connection, ClientCommand::connect(&second.token, fx.game_id));
    second.drain();
    alice.drain();

    // The old transport closing must not drop the new registration.
    fx.handler.disconnect(first.connection.id());
    assert!(alice.drain().is_empty());

    fx.handler.handle(
        &alice.connection,
        ClientCommand::make_move(&alice.token, fx.game_id, mv("d2d4")),
    );
    let to_bob = second.drain();
    assert_eq!(to_bob.len(), 2);
    assert_eq!(to_bob[1], ServerMessage::notification("alice moved d2d4"));
}

#[test]
fn test_disconnect_keeps_seat() {
    let fx = SessionFixture::new();
    let mut alice = fx.connected("alice");
    let bob = fx.connected("bob");
    alice.drain();

    fx.handler.disconnect(bob.connection.id());

    assert_eq!(alice.drain(), vec![ServerMessage::notification("bob disconnected")]);
    let record = fx.store.load(fx.game_id).unwrap();
    assert_eq!(record.black_username.as_deref(), Some("bob"));
    assert_eq!(record.game.board(), &Board::new());
}
