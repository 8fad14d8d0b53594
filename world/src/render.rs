//! Text projections of the grid and of vessel health.

use crate::grid::{Grid, Occupant};

const BORDER: char = '#';
const EMPTY: char = '.';
const UNKNOWN: char = '?';
const HEALTHBAR_SEGMENTS: usize = 10;

impl Grid {
    /// Renders the board as a `#`-bordered block of text.
    ///
    /// Empty tiles are `.`, movers are an arrow in their facing direction,
    /// and vessels show their current health. Rows are separated by `\n`
    /// with no trailing newline.
    #[must_use]
    pub fn visualize(&self) -> String {
        let border: String = std::iter::repeat(BORDER)
            .take(self.width() as usize + 2)
            .collect();
        let mut rows = Vec::with_capacity(self.height() as usize + 2);
        rows.push(border.clone());

        let mut row = String::new();
        for tile in self.tiles() {
            if row.is_empty() {
                row.push(BORDER);
            }
            match tile.occupant() {
                None => row.push(EMPTY),
                Some(occupant) => self.render_occupant(occupant, &mut row),
            }
            if tile.coordinates().x() + 1 == self.width() {
                row.push(BORDER);
                rows.push(std::mem::take(&mut row));
            }
        }

        rows.push(border);
        rows.join("\n")
    }

    fn render_occupant(&self, occupant: Occupant, out: &mut String) {
        match occupant {
            Occupant::Mover(key) => match self.mover(key) {
                Some(mover) => out.push(mover.facing().glyph()),
                None => out.push(UNKNOWN),
            },
            Occupant::Vessel(key) => match self.vessel(key) {
                Some(vessel) => out.push_str(&vessel.health().to_string()),
                None => out.push(UNKNOWN),
            },
        }
    }
}

/// Formats `[-----     ] health / max` with the filled share rounded to the
/// nearest segment, ties to even.
pub(crate) fn healthbar(health: u32, max_health: u32) -> String {
    let filled = filled_segments(health, max_health);
    format!(
        "[{}{}] {health} / {max_health}",
        "-".repeat(filled),
        " ".repeat(HEALTHBAR_SEGMENTS - filled)
    )
}

fn filled_segments(health: u32, max_health: u32) -> usize {
    if max_health == 0 {
        return 0;
    }
    let share = f64::from(health) / f64::from(max_health) * HEALTHBAR_SEGMENTS as f64;
    let rounded = share.round_ties_even();
    if rounded <= 0.0 {
        0
    } else {
        (rounded as usize).min(HEALTHBAR_SEGMENTS)
    }
}
