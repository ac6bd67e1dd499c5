//! Initial table snapshot and the tree it builds
//!
//! The host hands over a complete snapshot once, when the table loads. The
//! tree laid out from it looks like:
//!
//! ```text
//! game
//!   board:board
//!     region:<r>            (campsites, souvenir spaces, pawns, stamp, stars)
//!   supply:travel | supply:gift | supply:postcard | supply:guide
//!   player:<id>
//!     hand:hand  used:used  (travel cards)
//!     postcard:<id>  gift:<id>  souvenir:<space>  bonus:<kind>
//!     counter:score | counter:hand | counter:camps | counter:stars
//! ```

use crate::core::content::{self, REGIONS};
use crate::core::{ArgValue, Args, Attr, BonusKind, NodeId, NodeKind, PlayerId};
use crate::node_args;
use crate::tree::supply::{DECK_SLOT, FIRST_ROW_SLOT};
use crate::tree::{ElementTree, SupplyRow};
use crate::Result;
use serde::{Deserialize, Serialize};

pub const BOARD: &str = "board";
pub const HAND: &str = "hand";
pub const USED: &str = "used";

/// Counters shown on every player board
pub const COUNTERS: [&str; 4] = ["score", "hand", "camps", "stars"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcardSetup {
    pub id: u32,
    #[serde(default)]
    pub sent: bool,
    /// Regions whose stamp is already on the card
    #[serde(default)]
    pub stamps: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub score: i64,
    /// Travel cards in hand; only known for the viewer
    #[serde(default)]
    pub hand: Vec<u32>,
    #[serde(default)]
    pub hand_count: u32,
    /// Travel cards played this turn
    #[serde(default)]
    pub used: Vec<u32>,
    #[serde(default)]
    pub camps_left: u32,
    /// Region the pawn stands in
    pub pawn: u32,
    /// Occupied campsites
    #[serde(default)]
    pub camps: Vec<u32>,
    #[serde(default)]
    pub souvenirs: Vec<u32>,
    #[serde(default)]
    pub postcards: Vec<PostcardSetup>,
    #[serde(default)]
    pub gifts: Vec<u32>,
    /// Bonus actions already spent
    #[serde(default)]
    pub used_bonus: Vec<BonusKind>,
    /// Regions holding one of this player's stars
    #[serde(default)]
    pub stars: Vec<u32>,
}

fn all_souvenir_spaces() -> Vec<u32> {
    REGIONS
        .iter()
        .flat_map(|r| content::souvenir_spaces_of(r.id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSetup {
    /// Souvenir spaces whose souvenir is still on the board
    #[serde(default = "all_souvenir_spaces")]
    pub souvenirs: Vec<u32>,
}

impl Default for BoardSetup {
    fn default() -> Self {
        BoardSetup {
            souvenirs: all_souvenir_spaces(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplySetup {
    /// Face-down deck top, if the deck is not empty
    #[serde(default)]
    pub top: Option<u32>,
    #[serde(default)]
    pub row: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSetup {
    pub players: Vec<PlayerSetup>,
    #[serde(default)]
    pub board: BoardSetup,
    #[serde(default)]
    pub travel: SupplySetup,
    #[serde(default)]
    pub gift: SupplySetup,
    #[serde(default)]
    pub postcard: SupplySetup,
    #[serde(default)]
    pub guide: Vec<u32>,
    #[serde(default)]
    pub current_player: Option<PlayerId>,
}

impl GameSetup {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSetup> {
        self.players.iter().find(|p| p.id == id)
    }
}

/// Handles of the fixed containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub board: NodeId,
    pub travel: SupplyRow,
    pub gift: SupplyRow,
    pub postcard: SupplyRow,
    pub guide: SupplyRow,
}

/// Args for a card node, including its tooltip
pub(crate) fn card_args(kind: NodeKind, id: u32, face_up: bool) -> Args {
    let mut args = node_args![Attr::FaceUp => face_up];
    if let Some(text) = content::tooltip(kind, id) {
        args.insert(Attr::Tooltip, ArgValue::Str(text));
    }
    args
}

pub(crate) fn region_color(region: u32) -> &'static str {
    content::region(region).map(|r| r.color).unwrap_or("grey")
}

/// Build the whole tree from a snapshot
pub fn build(tree: &mut ElementTree, setup: &GameSetup) -> Result<Layout> {
    let root = tree.root();
    let board = tree.create(root, BOARD, NodeKind::Board, Args::new())?;
    build_board(tree, board, setup)?;

    let travel = build_supply(tree, "travel", NodeKind::Travel, &setup.travel)?;
    let gift = build_supply(tree, "gift", NodeKind::Gift, &setup.gift)?;
    let postcard = build_supply(tree, "postcard", NodeKind::Postcard, &setup.postcard)?;
    let guide = build_supply(
        tree,
        "guide",
        NodeKind::Postcard,
        &SupplySetup {
            top: None,
            row: setup.guide.clone(),
        },
    )?;

    for (order, player) in setup.players.iter().enumerate() {
        build_player(tree, board, player, order as u32 + 1, setup.current_player == Some(player.id))?;
    }

    Ok(Layout {
        board,
        travel,
        gift,
        postcard,
        guide,
    })
}

fn build_board(tree: &mut ElementTree, board: NodeId, setup: &GameSetup) -> Result<()> {
    for info in REGIONS.iter() {
        let mut args = node_args![
            Attr::Color => info.color,
            Attr::Label => info.name,
        ];
        if let Some(text) = content::tooltip(NodeKind::Region, info.id) {
            args.insert(Attr::Tooltip, ArgValue::Str(text));
        }
        let region = tree.create(board, info.id, NodeKind::Region, args)?;

        for site in content::campsites_of(info.id) {
            let mut args = Args::new();
            if let Some(kind) = content::campsite_type(site) {
                args.insert(Attr::Kind, ArgValue::from(kind));
            }
            if let Some(text) = content::tooltip(NodeKind::Campsite, site) {
                args.insert(Attr::Tooltip, ArgValue::Str(text));
            }
            tree.create(region, site, NodeKind::Campsite, args)?;
        }

        for space in content::souvenir_spaces_of(info.id) {
            let mut args = Args::new();
            if let Some(kind) = content::souvenir_kind(space) {
                args.insert(Attr::Kind, ArgValue::from(kind));
            }
            if let Some(text) = content::tooltip(NodeKind::SouvenirSpace, space) {
                args.insert(Attr::Tooltip, ArgValue::Str(text));
            }
            let node = tree.create(region, space, NodeKind::SouvenirSpace, args)?;
            if setup.board.souvenirs.contains(&space) {
                tree.create(node, space, NodeKind::Souvenir, Args::new())?;
            }
        }

        tree.create(
            region,
            info.id,
            NodeKind::Stamp,
            node_args![Attr::Color => info.color],
        )?;
    }
    Ok(())
}

fn build_supply(
    tree: &mut ElementTree,
    name: &str,
    kind: NodeKind,
    setup: &SupplySetup,
) -> Result<SupplyRow> {
    let root = tree.root();
    let container = tree.create(root, name, NodeKind::Supply, Args::new())?;
    let supply = SupplyRow::new(container, kind);

    let mut row: Vec<u32> = setup.row.clone();
    row.sort_unstable();
    for (slot, id) in (FIRST_ROW_SLOT..).zip(row) {
        let mut args = card_args(kind, id, true);
        args.insert(Attr::Supply, ArgValue::Int(slot));
        tree.create(container, id, kind, args)?;
    }
    if let Some(top) = setup.top {
        let mut args = card_args(kind, top, false);
        args.insert(Attr::Supply, ArgValue::Int(DECK_SLOT));
        tree.create(container, top, kind, args)?;
    }
    Ok(supply)
}

fn build_player(
    tree: &mut ElementTree,
    board: NodeId,
    player: &PlayerSetup,
    order: u32,
    current: bool,
) -> Result<()> {
    let root = tree.root();
    let node = tree.create(
        root,
        player.id,
        NodeKind::Player,
        node_args![
            Attr::Color => player.color.as_str(),
            Attr::Label => player.name.as_str(),
            Attr::Order => order,
            Attr::Current => current,
        ],
    )?;

    let hand = tree.create(node, HAND, NodeKind::Hand, Args::new())?;
    for card in &player.hand {
        tree.create(hand, *card, NodeKind::Travel, card_args(NodeKind::Travel, *card, true))?;
    }
    let used = tree.create(node, USED, NodeKind::Used, Args::new())?;
    for card in &player.used {
        let mut args = card_args(NodeKind::Travel, *card, true);
        args.insert(Attr::Used, ArgValue::Bool(true));
        tree.create(used, *card, NodeKind::Travel, args)?;
    }

    for postcard in &player.postcards {
        let mut args = card_args(NodeKind::Postcard, postcard.id, true);
        args.insert(Attr::Sent, ArgValue::Bool(postcard.sent));
        let card = tree.create(node, postcard.id, NodeKind::Postcard, args)?;
        for region in &postcard.stamps {
            tree.create(
                card,
                *region,
                NodeKind::Stamp,
                node_args![Attr::Color => region_color(*region)],
            )?;
        }
    }
    for gift in &player.gifts {
        tree.create(node, *gift, NodeKind::Gift, card_args(NodeKind::Gift, *gift, true))?;
    }
    for space in &player.souvenirs {
        tree.create(node, *space, NodeKind::Souvenir, Args::new())?;
    }
    for kind in BonusKind::ALL {
        tree.create(
            node,
            kind.as_str(),
            NodeKind::Bonus,
            node_args![
                Attr::Label => kind.label(),
                Attr::Used => player.used_bonus.contains(&kind),
            ],
        )?;
    }

    let hand_count = if player.hand.is_empty() {
        player.hand_count
    } else {
        player.hand.len() as u32
    };
    let values = [
        player.score,
        hand_count as i64,
        player.camps_left as i64,
        player.stars.len() as i64,
    ];
    for (name, value) in COUNTERS.iter().zip(values) {
        tree.create(node, *name, NodeKind::Counter, node_args![Attr::Value => value])?;
    }

    // Pieces on the board
    let color = player.color.as_str();
    let region = tree.child(board, NodeKind::Region, player.pawn)?;
    tree.create(region, player.id, NodeKind::Pawn, node_args![Attr::Color => color])?;
    for site in &player.camps {
        let region_id = content::space_region(*site).unwrap_or(0);
        let region = tree.child(board, NodeKind::Region, region_id)?;
        let campsite = tree.child(region, NodeKind::Campsite, *site)?;
        tree.create(
            campsite,
            player.id,
            NodeKind::Camp,
            node_args![Attr::Color => color, Attr::Player => player.id.as_u32()],
        )?;
    }
    for region_id in &player.stars {
        let region = tree.child(board, NodeKind::Region, *region_id)?;
        tree.create(region, player.id, NodeKind::Star, node_args![Attr::Color => color])?;
    }
    Ok(())
}
