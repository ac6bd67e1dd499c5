//! Two-slot card selector
//!
//! Used by the postcard guide and by the double action in hand. The click
//! rule is a small state machine, not a FIFO and not "last two clicked":
//!
//! 1. nothing selected: the card takes slot 1
//! 2. slot 1 clicked, slot 2 empty: slot 1 is cleared
//! 3. slot 1 clicked, slot 2 taken: slot 2 moves up to slot 1
//! 4. slot 2 clicked: slot 2 is cleared
//! 5. a third card while both are taken: slot 1 is evicted, slot 2 moves up
//!    and the new card takes slot 2

use crate::core::NodeId;
use smallvec::{smallvec, SmallVec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    One(NodeId),
    Two(NodeId, NodeId),
}

/// Presentation change a transition asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Mark the card selected
    Select(NodeId),
    /// Return the card to plain active
    Unselect(NodeId),
}

pub type Effects = SmallVec<[SelectionEffect; 2]>;

impl Selection {
    /// Apply one click and report what has to change on screen
    pub fn click(self, card: NodeId) -> (Selection, Effects) {
        use SelectionEffect::*;
        match self {
            Selection::Empty => (Selection::One(card), smallvec![Select(card)]),
            Selection::One(first) if first == card => (Selection::Empty, smallvec![Unselect(first)]),
            Selection::One(first) => (Selection::Two(first, card), smallvec![Select(card)]),
            // Rule 3: A, B, A leaves {B}
            Selection::Two(first, second) if first == card => {
                (Selection::One(second), smallvec![Unselect(first)])
            }
            Selection::Two(first, second) if second == card => {
                (Selection::One(first), smallvec![Unselect(second)])
            }
            Selection::Two(first, second) => (
                Selection::Two(second, card),
                smallvec![Unselect(first), Select(card)],
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Empty => 0,
            Selection::One(_) => 1,
            Selection::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }

    /// Whether enough cards are picked to allow confirming
    pub fn ready(&self, min: usize) -> bool {
        self.len() >= min
    }

    pub fn contains(&self, card: NodeId) -> bool {
        self.cards().contains(&card)
    }

    /// Selected cards, slot 1 first
    pub fn cards(&self) -> SmallVec<[NodeId; 2]> {
        match *self {
            Selection::Empty => SmallVec::new(),
            Selection::One(a) => smallvec![a],
            Selection::Two(a, b) => smallvec![a, b],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SelectionEffect::*;

    fn run(clicks: &[u32]) -> (Selection, Vec<Effects>) {
        let mut state = Selection::Empty;
        let mut log = Vec::new();
        for id in clicks {
            let (next, effects) = state.click(NodeId::new(*id));
            state = next;
            log.push(effects);
        }
        (state, log)
    }

    #[test]
    fn test_first_click_takes_slot_one() {
        let (state, effects) = run(&[1]);
        assert_eq!(state, Selection::One(NodeId::new(1)));
        assert_eq!(effects[0].as_slice(), &[Select(NodeId::new(1))]);
    }

    #[test]
    fn test_reclick_alone_deselects() {
        let (state, effects) = run(&[1, 1]);
        assert_eq!(state, Selection::Empty);
        assert_eq!(effects[1].as_slice(), &[Unselect(NodeId::new(1))]);
    }

    #[test]
    fn test_third_card_evicts_slot_one() {
        let (state, effects) = run(&[1, 2, 3]);
        assert_eq!(state, Selection::Two(NodeId::new(2), NodeId::new(3)));
        assert_eq!(
            effects[2].as_slice(),
            &[Unselect(NodeId::new(1)), Select(NodeId::new(3))]
        );
    }

    #[test]
    fn test_reclick_slot_one_promotes_slot_two() {
        let (state, effects) = run(&[1, 2, 1]);
        assert_eq!(state, Selection::One(NodeId::new(2)));
        assert_eq!(effects[2].as_slice(), &[Unselect(NodeId::new(1))]);
    }

    #[test]
    fn test_reclick_slot_two_clears_it() {
        let (state, _) = run(&[1, 2, 2]);
        assert_eq!(state, Selection::One(NodeId::new(1)));
    }

    #[test]
    fn test_four_card_sequence() {
        let (state, _) = run(&[1, 2, 3, 4]);
        assert_eq!(state, Selection::Two(NodeId::new(3), NodeId::new(4)));
        assert!(state.ready(2));
        assert!(!state.contains(NodeId::new(1)));
    }
}
