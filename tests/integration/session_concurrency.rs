use crate::common::session::SessionFixture;
use crate::common::test_data::{mv, pos};
use gambit::storage::GameStore;
use gambit::{ClientCommand, Color, PieceType, ServerMessage, Turn};
use std::sync::Barrier;
use std::thread;

fn count_errors(messages: &[ServerMessage]) -> usize {
    messages.iter().filter(|m| m.is_error()).count()
}

#[test]
fn test_duplicate_move_applies_once() {
    for _ in 0..20 {
        let fx = SessionFixture::new();
        let mut alice = fx.connected("alice");
        let (connection, token) = (&alice.connection, alice.token.as_str());
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| {
                    barrier.wait();
                    fx.handler.handle(
                        connection,
                        ClientCommand::make_move(token, fx.game_id, mv("e2e4")),
                    );
                });
            }
        });

        let messages = alice.drain();
        assert_eq!(count_errors(&messages), 1);
        assert_eq!(messages.iter().filter(|m| m.is_load_game()).count(), 1);

        let record = fx.store.load(fx.game_id).unwrap();
        assert_eq!(record.game.turn(), Turn::Black);
        assert!(record.game.board().get_piece(pos("e2")).is_none());
        assert_eq!(
            record.game.board().get_piece(pos("e4")).map(|p| p.piece_type),
            Some(PieceType::Pawn)
        );
    }
}

#[test]
fn test_competing_moves_apply_once() {
    for _ in 0..20 {
        let fx = SessionFixture::new();
        let mut alice = fx.connected("alice");
        let (connection, token) = (&alice.connection, alice.token.as_str());
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            for notation in ["e2e4", "d2d4"] {
                let fx = &fx;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    fx.handler.handle(
                        connection,
                        ClientCommand::make_move(token, fx.game_id, mv(notation)),
                    );
                });
            }
        });

        assert_eq!(count_errors(&alice.drain()), 1);
        let record = fx.store.load(fx.game_id).unwrap();
        assert_eq!(record.game.turn(), Turn::Black);
        let moved = ["e4", "d4"]
            .iter()
            .filter(|square| record.game.board().get_piece(pos(square)).is_some())
            .count();
        assert_eq!(moved, 1);
    }
}

#[test]
fn test_parallel_games_do_not_interfere() {
    let fx = SessionFixture::new();
    let second = fx.store.create_game("second").unwrap().game_id;
    fx.store.add_player(second, Color::White, "carol").unwrap();
    let alice = fx.connected("alice");
    let carol = fx.client("carol");
    let (alice_connection, alice_token) = (&alice.connection, alice.token.as_str());
    let (carol_connection, carol_token) = (&carol.connection, carol.token.as_str());

    thread::scope(|scope| {
        scope.spawn(|| {
            fx.handler.handle(
                alice_connection,
                ClientCommand::make_move(alice_token, fx.game_id, mv("e2e4")),
            );
        });
        scope.spawn(|| {
            fx.handler
                .handle(carol_connection, ClientCommand::connect(carol_token, second));
            fx.handler.handle(
                carol_connection,
                ClientCommand::make_move(carol_token, second, mv("g1f3")),
            );
        });
    });

    assert_eq!(fx.store.load(fx.game_id).unwrap().game.turn(), Turn::Black);
    assert_eq!(fx.store.load(second).unwrap().game.turn(), Turn::Black);
    assert_eq!(fx.handler.registry().participants(second), vec!["carol".to_string()]);
}
