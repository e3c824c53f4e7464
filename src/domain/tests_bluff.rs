//! The wild-draw-four bluff-challenge sub-protocol.

use crate::domain::cards::{Card, Color};
use crate::domain::events::GameEvent;
use crate::domain::test_support::{started_game, user};
use crate::errors::EngineError;

/// Three seats, red five on top, seat 0 about to play a wild draw four
/// while holding `side_card`.
fn game_with_wd4_played(side_card: Card, seed: u64) -> crate::domain::game::Game {
    let mut game = started_game(3, seed);
    game.force_top(Card::number(Color::Red, 5), Color::Red);
    game.force_hand(user(0), vec![Card::WildDrawFour, side_card]);
    game.play_card(user(0), Card::WildDrawFour, Some(Color::Blue))
        .unwrap();
    assert_eq!(game.pending_draws(), 4);
    assert_eq!(game.current_user(), Some(user(1)));
    game
}

#[test]
fn caught_bluffer_draws_and_challenger_keeps_the_turn() {
    // Seat 0 held a red card under a red top: the wild draw four was a bluff.
    let mut game = game_with_wd4_played(Card::number(Color::Red, 3), 3);

    let events = game.call_bluff(user(1)).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::BluffResolved {
            challenger,
            offender,
            was_bluff: true,
            cards_drawn: 4,
        } if *challenger == user(1) && *offender == user(0)
    )));
    assert_eq!(game.player(user(0)).unwrap().hand_size(), 1 + 4);
    assert_eq!(game.pending_draws(), 0);
    assert_eq!(game.current_user(), Some(user(1)));
}

#[test]
fn wrong_call_costs_the_chain_plus_penalty() {
    // Seat 0 held no red card: the play was clean.
    let mut game = game_with_wd4_played(Card::number(Color::Green, 3), 3);

    let before = game.player(user(1)).unwrap().hand_size();
    let events = game.call_bluff(user(1)).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::BluffResolved {
            was_bluff: false,
            cards_drawn: 6, // 4 pending + 2 penalty
            ..
        }
    )));
    assert_eq!(game.player(user(1)).unwrap().hand_size(), before + 6);
    assert_eq!(game.pending_draws(), 0);
    assert_eq!(game.current_user(), Some(user(2)));
}

#[test]
fn bluff_resolution_is_deterministic() {
    for seed in [3, 17, 99] {
        let mut a = game_with_wd4_played(Card::number(Color::Red, 3), seed);
        let mut b = game_with_wd4_played(Card::number(Color::Red, 3), seed);
        let ea = a.call_bluff(user(1)).unwrap();
        let eb = b.call_bluff(user(1)).unwrap();
        assert_eq!(ea, eb);
        assert_eq!(a.current_user(), b.current_user());
    }
}

#[test]
fn only_the_threatened_player_may_call() {
    let mut game = game_with_wd4_played(Card::number(Color::Red, 3), 5);
    assert!(matches!(
        game.call_bluff(user(2)),
        Err(EngineError::IllegalPlay(_))
    ));
}

#[test]
fn no_window_after_a_draw_two() {
    let mut game = started_game(3, 5);
    game.force_top(Card::number(Color::Red, 5), Color::Red);
    game.force_hand(
        user(0),
        vec![Card::draw_two(Color::Red), Card::number(Color::Blue, 2)],
    );
    game.play_card(user(0), Card::draw_two(Color::Red), None)
        .unwrap();
    assert_eq!(game.call_bluff(user(1)), Err(EngineError::BluffWindowClosed));
}

#[test]
fn window_closes_once_the_chain_is_taken() {
    let mut game = game_with_wd4_played(Card::number(Color::Red, 3), 5);
    game.draw(user(1)).unwrap();
    assert_eq!(game.pending_draws(), 0);
    assert_eq!(game.call_bluff(user(2)), Err(EngineError::BluffWindowClosed));
}

#[test]
fn no_window_without_any_chain() {
    let mut game = started_game(2, 5);
    assert_eq!(game.call_bluff(user(0)), Err(EngineError::BluffWindowClosed));
}

#[test]
fn stacked_wild_draw_four_rebinds_the_challenge() {
    let mut game = game_with_wd4_played(Card::number(Color::Green, 3), 5);
    // Seat 1 extends the chain with their own wild draw four, bluffing
    // against the blue color seat 0 imposed.
    game.force_hand(
        user(1),
        vec![Card::WildDrawFour, Card::number(Color::Blue, 8)],
    );
    game.play_card(user(1), Card::WildDrawFour, Some(Color::Yellow))
        .unwrap();
    assert_eq!(game.pending_draws(), 8);

    let events = game.call_bluff(user(2)).unwrap();
    // The new offender is seat 1, judged against blue.
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::BluffResolved {
            offender,
            was_bluff: true,
            cards_drawn: 8,
            ..
        } if *offender == user(1)
    )));
    assert_eq!(game.current_user(), Some(user(2)));
}

#[test]
fn offender_leaving_closes_the_window() {
    let mut game = game_with_wd4_played(Card::number(Color::Red, 3), 5);
    game.leave(user(0), false).unwrap();
    assert_eq!(game.call_bluff(user(1)), Err(EngineError::BluffWindowClosed));
    // The obligation itself survives for the threatened player.
    assert_eq!(game.pending_draws(), 4);
}
