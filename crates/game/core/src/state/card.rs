//! The player's card piles.

use crate::rng::GameRng;

use super::Appearance;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    pub appearance: Appearance,
}

/// Deck, discard pile, hand and cards in play.
///
/// A card lives in exactly one pile at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardState {
    pub deck: Vec<Card>,
    pub discard: Vec<Card>,
    pub hand: Vec<Card>,
    pub in_play: Vec<Card>,
    next_card_id: u32,
}

/// Outcome of a single draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Draw {
    Drawn(Card),
    /// The discard pile was shuffled back into the deck before drawing.
    ShuffledThenDrawn(Card),
    /// Both deck and discard pile are empty.
    Exhausted,
}

impl CardState {
    pub fn new() -> Self {
        Self {
            next_card_id: 1,
            ..Self::default()
        }
    }

    /// Creates a card and puts it on the discard pile.
    pub fn add_to_discard(&mut self, appearance: Appearance) -> Card {
        let card = Card {
            id: CardId(self.next_card_id.max(1)),
            appearance,
        };
        self.next_card_id = card.id.0 + 1;
        self.discard.push(card);
        card
    }

    /// Draws the top card of the deck into the hand, reshuffling the discard
    /// pile into the deck when the deck runs out.
    pub fn draw(&mut self, rng: &mut GameRng) -> Draw {
        let mut shuffled = false;
        if self.deck.is_empty() {
            if self.discard.is_empty() {
                return Draw::Exhausted;
            }
            self.deck.append(&mut self.discard);
            rng.shuffle(&mut self.deck);
            shuffled = true;
        }
        match self.deck.pop() {
            Some(card) => {
                self.hand.push(card);
                if shuffled {
                    Draw::ShuffledThenDrawn(card)
                } else {
                    Draw::Drawn(card)
                }
            }
            None => Draw::Exhausted,
        }
    }

    /// Moves a card from the hand into play. Returns false if it is not in hand.
    pub fn play(&mut self, id: CardId) -> bool {
        let Some(index) = self.hand.iter().position(|c| c.id == id) else {
            return false;
        };
        let card = self.hand.remove(index);
        self.in_play.push(card);
        true
    }

    /// Sends every card in hand and in play to the discard pile.
    pub fn discard_hand(&mut self) -> usize {
        let count = self.hand.len() + self.in_play.len();
        self.discard.append(&mut self.hand);
        self.discard.append(&mut self.in_play);
        count
    }

    /// Removes a card from whichever pile holds it.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        for pile in [
            &mut self.deck,
            &mut self.discard,
            &mut self.hand,
            &mut self.in_play,
        ] {
            if let Some(index) = pile.iter().position(|c| c.id == id) {
                return Some(pile.remove(index));
            }
        }
        None
    }

    pub fn total(&self) -> usize {
        self.deck.len() + self.discard.len() + self.hand.len() + self.in_play.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_reshuffles_discard_once_deck_is_empty() {
        let mut cards = CardState::new();
        let mut rng = GameRng::new(3);
        let a = cards.add_to_discard(Appearance::CardStrike);
        let b = cards.add_to_discard(Appearance::CardPoison);
        assert_ne!(a.id, b.id);

        assert!(matches!(cards.draw(&mut rng), Draw::ShuffledThenDrawn(_)));
        assert!(matches!(cards.draw(&mut rng), Draw::Drawn(_)));
        assert_eq!(cards.draw(&mut rng), Draw::Exhausted);
        assert_eq!(cards.hand.len(), 2);
        assert_eq!(cards.total(), 2);
    }

    #[test]
    fn play_and_discard_keep_every_card_in_one_pile() {
        let mut cards = CardState::new();
        let mut rng = GameRng::new(3);
        let card = cards.add_to_discard(Appearance::CardHeal);
        cards.draw(&mut rng);
        assert!(cards.play(card.id));
        assert!(!cards.play(card.id));
        assert_eq!(cards.in_play.len(), 1);
        assert_eq!(cards.discard_hand(), 1);
        assert_eq!(cards.discard.len(), 1);
        assert_eq!(cards.total(), 1);
        assert_eq!(cards.remove(card.id), Some(card));
        assert_eq!(cards.total(), 0);
    }
}
