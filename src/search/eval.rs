use crate::board::{Board, MoveGen, Player, Pos};
use crate::error::{ConfigError, ConfigResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Minimum bonus/penalty for a side left without moves.
pub const TERMINAL_SCORE: f64 = 10_000.0;
/// Largest accepted absolute weight.
pub const MAX_WEIGHT: f64 = 1_000.0;

const CELL_VALUE: f64 = 10.0;
const FORTIFIED_VALUE: f64 = 20.0;
const ATTACK_VALUE: f64 = 5.0;
/// Opponent mobility is summed over up to three other players.
const OPPONENTS_MAX: f64 = 3.0;

/// Evaluation profile. Field names on the wire follow the bot settings JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    #[serde(rename = "materialWeight")]
    pub material: f64,
    #[serde(rename = "mobilityWeight")]
    pub mobility: f64,
    #[serde(rename = "positionWeight")]
    pub position: f64,
    #[serde(rename = "redundancyWeight")]
    pub redundancy: f64,
    #[serde(rename = "cohesionWeight")]
    pub cohesion: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { material: 30.0, mobility: 150.0, position: 130.0, redundancy: 40.0, cohesion: 40.0 }
    }
}

impl Weights {
    pub fn uniform(w: f64) -> Self {
        Self { material: w, mobility: w, position: w, redundancy: w, cohesion: w }
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("material", self.material),
            ("mobility", self.mobility),
            ("position", self.position),
            ("redundancy", self.redundancy),
            ("cohesion", self.cohesion),
        ]
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in self.named() {
            if !value.is_finite() || value.abs() > MAX_WEIGHT { return Err(ConfigError::InvalidWeight { name, value }); }
        }
        Ok(())
    }

    /// Scale each weight by an independent factor in `[1 - spread, 1 + spread]`.
    pub fn jittered<R: Rng>(&self, rng: &mut R, spread: f64) -> Weights {
        let spread = spread.clamp(0.0, 1.0);
        let mut f = |w: f64| w * (1.0 - spread + 2.0 * spread * rng.gen::<f64>());
        Weights {
            material: f(self.material),
            mobility: f(self.mobility),
            position: f(self.position),
            redundancy: f(self.redundancy),
            cohesion: f(self.cohesion),
        }
    }
}

/// Raw, unweighted feature differences (searching side minus everyone else).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Features {
    pub material: f64,
    pub mobility: f64,
    pub position: f64,
    pub redundancy: f64,
    pub cohesion: f64,
}

impl Features {
    pub fn score(&self, w: &Weights) -> f64 {
        self.material * w.material
            + self.mobility * w.mobility
            + self.position * w.position
            + self.redundancy * w.redundancy
            + self.cohesion * w.cohesion
    }
}

/// Upper bound on `|evaluate|` over every board of this size.
pub fn magnitude_bound(rows: usize, cols: usize, w: &Weights) -> f64 {
    let n = (rows * cols) as f64;
    let span = (rows + cols) as f64;
    (CELL_VALUE + FORTIFIED_VALUE) * n * w.material.abs()
        + OPPONENTS_MAX * n * w.mobility.abs()
        + (span + ATTACK_VALUE) * n * w.position.abs()
        + n * w.redundancy.abs()
        + 8.0 * n * w.cohesion.abs()
}

/// Offset applied to positions where the side to move has no moves; always
/// larger than twice any ordinary evaluation.
pub fn terminal_margin(rows: usize, cols: usize, w: &Weights) -> f64 {
    TERMINAL_SCORE.max(2.0 * magnitude_bound(rows, cols, w) + 1.0)
}

/// Position evaluator. Holds move generation scratch; the score itself depends
/// only on the board, the perspective and the weights.
#[derive(Default)]
pub struct Evaluator {
    movegen: MoveGen,
}

impl Evaluator {
    pub fn new() -> Self { Self::default() }

    pub fn evaluate(&mut self, board: &Board, me: Player, w: &Weights) -> f64 {
        self.features(board, me).score(w)
    }

    pub fn features(&mut self, board: &Board, me: Player) -> Features {
        let (rows, cols) = (board.rows(), board.cols());
        let span = (rows + cols) as f64;
        let my_base = board.base(me);

        let (mut my_cells, mut my_fort, mut their_cells, mut their_fort) = (0i64, 0i64, 0i64, 0i64);
        let (mut my_attacks, mut their_attacks) = (0i64, 0i64);
        let (mut my_redundant, mut their_redundant) = (0i64, 0i64);
        let (mut my_gaps, mut their_gaps) = (0i64, 0i64);
        let mut position = 0.0;

        for r in 0..rows {
            for c in 0..cols {
                let cell = board.cell(r, c);
                // neighbour count per owner id, slot 0 = unowned
                let mut around = [0i64; 5];
                for (nr, nc) in board.neighbors(r, c) { around[board.cell(nr, nc).owner_id() as usize] += 1; }
                let enemies_of = |p: Player| around[1..].iter().sum::<i64>() - around[p.id() as usize];

                match cell.owner() {
                    Some(p) if p == me => {
                        my_cells += 1;
                        if cell.is_fortified() { my_fort += 1; }
                        if let Some(d) = board.nearest_opponent_base_distance(me, Pos::new(r, c)) { position += span - d as f64; }
                        if enemies_of(me) > 0 { their_attacks += 1; }
                        if around[me.id() as usize] >= 2 { my_redundant += 1; }
                    }
                    Some(p) => {
                        their_cells += 1;
                        if cell.is_fortified() { their_fort += 1; }
                        if let Some(b) = my_base { position -= span - b.manhattan(Pos::new(r, c)) as f64; }
                        if around[me.id() as usize] > 0 { my_attacks += 1; }
                        if around[p.id() as usize] >= 2 { their_redundant += 1; }
                    }
                    None => {
                        let mine = around[me.id() as usize];
                        if mine >= 2 { my_gaps += mine; }
                        for o in board.opponents(me) {
                            let theirs = around[o.id() as usize];
                            if theirs >= 2 { their_gaps += theirs; }
                        }
                    }
                }
            }
        }

        let my_moves = self.movegen.count(board, me) as i64;
        let mut their_moves = 0i64;
        for o in board.opponents(me) { their_moves += self.movegen.count(board, o) as i64; }

        Features {
            material: CELL_VALUE * (my_cells - their_cells) as f64 + FORTIFIED_VALUE * (my_fort - their_fort) as f64,
            mobility: (my_moves - their_moves) as f64,
            position: position + ATTACK_VALUE * (my_attacks - their_attacks) as f64,
            redundancy: (my_redundant - their_redundant) as f64,
            cohesion: (their_gaps - my_gaps) as f64,
        }
    }
}

/// One-shot evaluation of `board` for `me`.
pub fn evaluate(board: &Board, me: Player, w: &Weights) -> f64 {
    Evaluator::new().evaluate(board, me, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_opening_is_balanced() {
        let b = Board::starting(8, 8, 2).unwrap();
        let f1 = Evaluator::new().features(&b, Player::ONE);
        assert_eq!(f1, Features::default());
    }

    #[test]
    fn fortified_cells_count_extra() {
        let b = Board::from_ascii("1b 1f .\n.  .  2b").unwrap();
        let f = Evaluator::new().features(&b, Player::ONE);
        // P1: base + fortified, P2: base
        assert_eq!(f.material, 10.0 * 1.0 + 20.0);
    }

    #[test]
    fn perspective_flips_two_player_score() {
        let b = Board::from_ascii(
            "1b 1 1 . .
             .  1 . 2 .
             .  . 2 2 2b",
        )
        .unwrap();
        let w = Weights::default();
        let a = evaluate(&b, Player::ONE, &w);
        let z = evaluate(&b, Player::TWO, &w);
        assert!((a + z).abs() < 1e-9, "{a} vs {z}");
    }

    #[test]
    fn gaps_inside_territory_are_penalised() {
        let closed = Board::from_ascii("1b 1 1\n1 . 1\n1 1 1\n. . 2b").unwrap();
        let f = Evaluator::new().features(&closed, Player::ONE);
        assert!(f.cohesion < 0.0);
    }

    #[test]
    fn weights_validate_range() {
        assert!(Weights::default().validate().is_ok());
        assert!(Weights { mobility: f64::NAN, ..Weights::default() }.validate().is_err());
        assert!(Weights::uniform(MAX_WEIGHT + 1.0).validate().is_err());
    }

    #[test]
    fn jitter_stays_within_spread() {
        use rand::{rngs::SmallRng, SeedableRng};
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let w = Weights::uniform(10.0).jittered(&mut rng, 0.5);
            for (_, v) in w.named() { assert!((5.0..=15.0).contains(&v)); }
        }
    }
}
