use crate::error::{ConfigError, ConfigResult};
use std::fmt;

/// Player id in `1..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Player(u8);

impl Player {
    pub const ONE: Player = Player(1);
    pub const TWO: Player = Player(2);
    pub const THREE: Player = Player(3);
    pub const FOUR: Player = Player(4);
    pub const ALL: [Player; 4] = [Player::ONE, Player::TWO, Player::THREE, Player::FOUR];

    pub fn new(id: i64) -> ConfigResult<Self> {
        if (1..=4).contains(&id) { Ok(Player(id as u8)) } else { Err(ConfigError::PlayerOutOfRange(id)) }
    }

    pub fn id(self) -> u8 { self.0 }

    /// Zero-based slot, for per-player arrays.
    pub fn index(self) -> usize { (self.0 - 1) as usize }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "P{}", self.0) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Normal,
    Fortified,
    Base,
    Neutral,
}

const KIND_NORMAL: u8 = 0x00;
const KIND_BASE: u8 = 0x10;
const KIND_FORTIFIED: u8 = 0x20;
const KIND_NEUTRAL: u8 = 0x30;
const KIND_MASK: u8 = 0x30;
const OWNER_MASK: u8 = 0x0F;

/// A board cell packed into one byte: owner in the low nibble, kind in bits 4..5.
///
/// `owner == 0` with kind `Normal` is the empty cell. Neutral cells never have an
/// owner; Fortified and Base cells always have one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    pub const NEUTRAL: Cell = Cell(KIND_NEUTRAL);

    pub fn normal(p: Player) -> Cell { Cell(KIND_NORMAL | p.id()) }
    pub fn fortified(p: Player) -> Cell { Cell(KIND_FORTIFIED | p.id()) }
    pub fn base(p: Player) -> Cell { Cell(KIND_BASE | p.id()) }

    /// Build a cell from an owner id (0 = none) and a kind, rejecting combinations
    /// the game cannot produce.
    pub fn new(owner: u8, kind: CellKind) -> Result<Cell, &'static str> {
        if owner > 4 { return Err("owner must be 0..=4"); }
        match kind {
            CellKind::Normal => Ok(Cell(KIND_NORMAL | owner)),
            CellKind::Neutral if owner == 0 => Ok(Cell::NEUTRAL),
            CellKind::Neutral => Err("neutral cells cannot be owned"),
            CellKind::Fortified | CellKind::Base if owner == 0 => Err("fortified and base cells need an owner"),
            CellKind::Fortified => Ok(Cell(KIND_FORTIFIED | owner)),
            CellKind::Base => Ok(Cell(KIND_BASE | owner)),
        }
    }

    /// Owner id, 0 when unowned.
    pub fn owner_id(self) -> u8 { self.0 & OWNER_MASK }

    pub fn owner(self) -> Option<Player> {
        match self.owner_id() { 0 => None, id => Some(Player(id)) }
    }

    pub fn kind(self) -> CellKind {
        match self.0 & KIND_MASK {
            KIND_NORMAL => CellKind::Normal,
            KIND_BASE => CellKind::Base,
            KIND_FORTIFIED => CellKind::Fortified,
            _ => CellKind::Neutral,
        }
    }

    pub fn is_empty(self) -> bool { self.0 == 0 }
    pub fn is_owned_by(self, p: Player) -> bool { self.owner_id() == p.id() }
    pub fn is_fortified(self) -> bool { self.0 & KIND_MASK == KIND_FORTIFIED }
    pub fn is_base(self) -> bool { self.0 & KIND_MASK == KIND_BASE }
    pub fn is_neutral(self) -> bool { self.0 & KIND_MASK == KIND_NEUTRAL }

    /// Owned by someone other than `p` (neutral and empty cells are nobody's).
    pub fn is_enemy_of(self, p: Player) -> bool {
        let o = self.owner_id();
        o != 0 && o != p.id()
    }

    /// Only empty cells and plain owned cells can ever be targeted.
    pub fn is_targetable(self) -> bool { self.0 & KIND_MASK == KIND_NORMAL }

    /// Zobrist piece index in `0..PIECE_TYPES`: empty, normal 1..4, fortified 1..4,
    /// base 1..4, neutral.
    pub fn piece_type(self) -> usize {
        let o = self.owner_id() as usize;
        match self.kind() {
            CellKind::Normal => o,
            CellKind::Fortified => 4 + o,
            CellKind::Base => 8 + o,
            CellKind::Neutral => 13,
        }
    }
}

pub const PIECE_TYPES: usize = 14;

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.owner_id()) {
            (CellKind::Normal, 0) => write!(f, "."),
            (CellKind::Normal, o) => write!(f, "{o}"),
            (CellKind::Fortified, o) => write!(f, "{o}f"),
            (CellKind::Base, o) => write!(f, "{o}b"),
            (CellKind::Neutral, _) => write!(f, "x"),
        }
    }
}
