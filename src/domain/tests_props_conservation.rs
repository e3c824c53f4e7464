//! Property tests over random action sequences (pure domain, no timers).
//!
//! Properties:
//! - The multiset of cards across draw pile, discard pile, and hands always
//!   equals the starting composition.
//! - The turn only moves through defined transitions, and the turn epoch
//!   never goes backwards.
//! - Reshuffling never loses, duplicates, or disturbs the top discard.

use proptest::prelude::*;

use crate::domain::cards::Color;
use crate::domain::deck::Deck;
use crate::domain::game::{Game, Phase};
use crate::domain::rules::{self, GameMode};
use crate::domain::test_support::started_game;

/// One fuzzed player intent; illegal actions are expected and ignored.
#[derive(Debug, Clone, Copy)]
enum Intent {
    PlayNth(usize, Color),
    Draw,
    Skip,
    CallBluff,
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        (0usize..12, color()).prop_map(|(n, c)| Intent::PlayNth(n, c)),
        Just(Intent::Draw),
        Just(Intent::Skip),
        Just(Intent::CallBluff),
    ]
}

fn color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::Red),
        Just(Color::Yellow),
        Just(Color::Green),
        Just(Color::Blue),
    ]
}

fn apply(game: &mut Game, intent: Intent) {
    let Some(actor) = game.current_user() else {
        return;
    };
    let result = match intent {
        Intent::PlayNth(n, chosen) => {
            let hand = &game.player(actor).expect("current player exists").hand;
            let Some(card) = hand.get(n % hand.len().max(1)).copied() else {
                return;
            };
            game.play_card(actor, card, Some(chosen))
        }
        Intent::Draw => game.draw(actor),
        Intent::Skip => game.skip(actor),
        Intent::CallBluff => game.call_bluff(actor),
    };
    // Rejected actions must leave no partial mutation; the surrounding
    // assertions verify that via conservation and epoch checks.
    let _ = result;
}

proptest! {
    #[test]
    fn random_play_conserves_cards(
        seed in any::<u64>(),
        players in 2usize..6,
        intents in prop::collection::vec(intent(), 1..80),
    ) {
        let mut game = started_game(players, seed);
        let total = game.total_cards();
        let mut last_epoch = game.turn_epoch();

        for intent in intents {
            if game.phase() == Phase::Finished {
                break;
            }
            apply(&mut game, intent);

            prop_assert_eq!(game.cards_in_play(), total);
            prop_assert!(game.turn_epoch() >= last_epoch);
            last_epoch = game.turn_epoch();

            if game.phase() == Phase::Active {
                let snapshot = game.snapshot();
                prop_assert!(snapshot.current_player.is_some());
                prop_assert!(snapshot.last_card.is_some());
                prop_assert!(snapshot.current_color.is_some());
            }
        }
    }

    #[test]
    fn repeated_exhaustion_conserves_the_deck(
        seed in any::<u64>(),
        takes in prop::collection::vec(1usize..20, 1..40),
    ) {
        let mut deck = Deck::with_seed(GameMode::Classic, seed);
        let total = deck.total_cards();
        let mut out: Vec<_> = Vec::new();

        for take in takes {
            // Discard everything we hold so the reshuffle has material.
            for card in out.drain(..) {
                deck.play(card);
            }
            let top_before = deck.last();
            match deck.deal(take) {
                Ok(cards) => out = cards,
                Err(_) => break,
            }
            prop_assert_eq!(
                deck.draw_pile_len() + deck.discard_pile_len() + out.len(),
                total
            );
            // Dealing may reshuffle, but never the top discard.
            prop_assert_eq!(deck.last(), top_before);
        }
    }

    #[test]
    fn timeouts_never_stall_or_leak(
        seed in any::<u64>(),
        fires in 1usize..30,
    ) {
        let mut game = started_game(3, seed);
        let total = game.total_cards();
        for _ in 0..fires {
            if game.phase() != Phase::Active {
                break;
            }
            let epoch = game.turn_epoch();
            let events = game.timeout_skip(epoch);
            prop_assert!(events.is_some());
            // A second fire for the same epoch must be a no-op.
            prop_assert!(game.timeout_skip(epoch).is_none());
            prop_assert_eq!(game.cards_in_play(), total);
        }
    }

    #[test]
    fn compositions_are_stable(mode_wild in any::<bool>()) {
        let mode = if mode_wild { GameMode::Wild } else { GameMode::Classic };
        let a = rules::composition(mode);
        let b = rules::composition(mode);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn epoch_strictly_increases_on_defined_transitions() {
    let mut game = started_game(3, 21);
    let mut prev = game.turn_epoch();
    for _ in 0..10 {
        let actor = game.current_user().unwrap();
        game.skip(actor).unwrap();
        assert!(game.turn_epoch() > prev);
        prev = game.turn_epoch();
    }
}
