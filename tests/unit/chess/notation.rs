use gambit::{ChessError, Color, Move, PieceType, Position};
use regex::Regex;

#[test]
fn test_display_matches_wire_notation() {
    let pattern = Regex::new(r"^[a-h][1-8][a-h][1-8](=[qrbn])?$").unwrap();
    for square in Position::all() {
        let forward = square.offset(1, 0).unwrap_or(square);
        let plain = Move::new(square, forward);
        assert!(pattern.is_match(&plain.to_string()), "{}", plain);
    }
    for promotion in PieceType::PROMOTIONS {
        let m = Move::with_promotion("b7".parse().unwrap(), "b8".parse().unwrap(), promotion);
        assert!(pattern.is_match(&m.to_string()), "{}", m);
        assert_eq!(m.to_string().parse::<Move>().unwrap(), m);
    }
}

#[test]
fn test_rejects_malformed_moves() {
    for input in ["", "e2", "e2-e4", "e2e9", "i2i4", "e7e8q", "e7e8=k", "Nf3", "O-O"] {
        assert!(
            matches!(input.parse::<Move>(), Err(ChessError::InvalidNotation(_))),
            "accepted {:?}",
            input
        );
    }
}

#[test]
fn test_position_errors() {
    assert_eq!(
        Position::new(9, 1),
        Err(ChessError::InvalidCoordinate { row: 9, column: 1 })
    );
    assert!(matches!(
        "z9".parse::<Position>(),
        Err(ChessError::InvalidNotation(_))
    ));
}

#[test]
fn test_color_and_piece_names() {
    assert_eq!("white".parse::<Color>().unwrap(), Color::White);
    assert_eq!("BLACK".parse::<Color>().unwrap(), Color::Black);
    assert_eq!(Color::White.opposite(), Color::Black);
    assert_eq!(Color::Black.to_string(), "Black");
    assert!("green".parse::<Color>().is_err());
    assert_eq!("queen".parse::<PieceType>().unwrap(), PieceType::Queen);
}
