//! Supply rows: a deck top plus a face-up row
//!
//! Each card in a supply container carries a `supply` slot used only for
//! layout. Slot 1 is the deck top and is pinned; slots 2.. are the row,
//! assigned in ascending child id order.

use super::ElementTree;
use crate::core::{ArgValue, Args, Attr, ChildId, NodeId, NodeKind};
use crate::{Result, UiError};
use std::time::Duration;

/// Slot value marking the deck top
pub const DECK_SLOT: i64 = 1;

/// First slot of the row
pub const FIRST_ROW_SLOT: i64 = 2;

/// View over a supply container holding cards of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyRow {
    container: NodeId,
    kind: NodeKind,
}

impl SupplyRow {
    pub fn new(container: NodeId, kind: NodeKind) -> Self {
        SupplyRow { container, kind }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    fn slot(tree: &ElementTree, card: NodeId) -> Option<i64> {
        tree.arg(card, Attr::Supply).and_then(ArgValue::as_int)
    }

    pub fn top(&self, tree: &ElementTree) -> Option<NodeId> {
        tree.children(self.container, self.kind)
            .into_iter()
            .find(|card| Self::slot(tree, *card) == Some(DECK_SLOT))
    }

    /// Row cards (everything but the top), in child id order
    pub fn row(&self, tree: &ElementTree) -> Vec<NodeId> {
        tree.children(self.container, self.kind)
            .into_iter()
            .filter(|card| Self::slot(tree, *card) != Some(DECK_SLOT))
            .collect()
    }

    /// Top card when the caller knows there is one
    pub fn take_top(&self, tree: &ElementTree) -> Result<NodeId> {
        self.top(tree)
            .ok_or_else(|| UiError::NoTopCard(self.kind.as_str().to_string()))
    }

    /// Reassign row slots `2..n` in ascending child id order
    ///
    /// `except` keeps its current slot and is skipped, so a card that was
    /// just taken can freeze in place while the others close the gap.
    pub fn rearrange(&self, tree: &mut ElementTree, except: Option<NodeId>) -> Result<()> {
        let mut slot = FIRST_ROW_SLOT;
        for card in self.row(tree) {
            if Some(card) == except {
                continue;
            }
            tree.set_arg(card, Attr::Supply, slot)?;
            slot += 1;
        }
        Ok(())
    }

    /// Remove every row card and resolve once the discard has played out
    ///
    /// Returns the child ids that were discarded.
    pub async fn discard_all_but_top(
        &self,
        tree: &mut ElementTree,
        duration: Duration,
    ) -> Result<Vec<ChildId>> {
        let row = self.row(tree);
        let mut discarded = Vec::with_capacity(row.len());
        for card in row {
            discarded.push(tree.get(card)?.child_id().clone());
            tree.remove(card)?;
        }
        tokio::time::sleep(duration).await;
        Ok(discarded)
    }

    /// Turn the old top into a row card, add the new top, then relayout
    ///
    /// The order matters: `rearrange` pins whatever has slot 1, so the old
    /// top must lose its flag before the new one gets it.
    pub fn refill(
        &self,
        tree: &mut ElementTree,
        new_top: Option<(ChildId, Args)>,
    ) -> Result<Option<NodeId>> {
        if let Some(old_top) = self.top(tree) {
            tree.clear_arg(old_top, Attr::Supply)?;
        }
        let created = match new_top {
            Some((child_id, mut args)) => {
                args.insert(Attr::Supply, ArgValue::Int(DECK_SLOT));
                Some(tree.create(self.container, child_id, self.kind, args)?)
            }
            None => None,
        };
        self.rearrange(tree, None)?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_args;

    fn supply_with(ids: &[u32], top: Option<u32>) -> (ElementTree, SupplyRow) {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let container = tree.create(root, "postcard", NodeKind::Supply, Args::new()).unwrap();
        for id in ids {
            tree.create(container, *id, NodeKind::Postcard, node_args![Attr::Supply => 0u32])
                .unwrap();
        }
        if let Some(top) = top {
            tree.create(container, top, NodeKind::Postcard, node_args![Attr::Supply => 1u32])
                .unwrap();
        }
        (tree, SupplyRow::new(container, NodeKind::Postcard))
    }

    fn slots(tree: &ElementTree, supply: &SupplyRow) -> Vec<(u32, i64)> {
        tree.children(supply.container(), NodeKind::Postcard)
            .into_iter()
            .map(|card| {
                let node = tree.get(card).unwrap();
                (
                    node.child_id().as_num().unwrap(),
                    node.int_arg(Attr::Supply).unwrap_or(0),
                )
            })
            .collect()
    }

    #[test]
    fn test_rearrange_follows_child_id_order() {
        let (mut tree, supply) = supply_with(&[12, 3, 7, 5], Some(9));
        let taken = tree.find(supply.container(), NodeKind::Postcard, 3).unwrap();
        tree.remove(taken).unwrap();

        supply.rearrange(&mut tree, None).unwrap();
        assert_eq!(slots(&tree, &supply), vec![(5, 2), (7, 3), (9, 1), (12, 4)]);
        tree.verify_consistency().unwrap();
    }

    #[test]
    fn test_rearrange_skips_excluded_card() {
        let (mut tree, supply) = supply_with(&[4, 6, 8], None);
        supply.rearrange(&mut tree, None).unwrap();
        let frozen = tree.find(supply.container(), NodeKind::Postcard, 4).unwrap();

        supply.rearrange(&mut tree, Some(frozen)).unwrap();
        assert_eq!(slots(&tree, &supply), vec![(4, 2), (6, 2), (8, 3)]);
    }

    #[test]
    fn test_refill_moves_old_top_into_row() {
        let (mut tree, supply) = supply_with(&[2, 8], Some(5));
        let created = supply
            .refill(&mut tree, Some((ChildId::Num(11), Args::new())))
            .unwrap()
            .unwrap();

        assert_eq!(supply.top(&tree), Some(created));
        assert_eq!(slots(&tree, &supply), vec![(2, 2), (5, 3), (8, 4), (11, 1)]);
    }

    #[test]
    fn test_refill_without_new_top_empties_deck() {
        let (mut tree, supply) = supply_with(&[2], Some(5));
        assert_eq!(supply.refill(&mut tree, None).unwrap(), None);
        assert_eq!(supply.top(&tree), None);
        assert!(matches!(supply.take_top(&tree), Err(UiError::NoTopCard(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_all_but_top_waits_for_animation() {
        let (mut tree, supply) = supply_with(&[1, 2, 3], Some(4));
        let start = tokio::time::Instant::now();
        let discarded = supply
            .discard_all_but_top(&mut tree, Duration::from_millis(500))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(discarded, vec![ChildId::Num(1), ChildId::Num(2), ChildId::Num(3)]);
        assert!(supply.row(&tree).is_empty());
        assert!(supply.top(&tree).is_some());
    }
}
