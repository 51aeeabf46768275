//! Players, their colours and how they are controlled.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::topology::{Area, PlayerCount};

/// Seat index, 0-based in turn order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who decides a player's moves.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    Human,
    Computer,
}

/// Computer strength. Only `Easy` exists; it picks uniformly at random.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
}

/// The fixed piece palette.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
    Green,
    Orange,
    Purple,
    Yellow,
    Pink,
    Cyan,
    Magenta,
}

impl Color {
    /// Every palette entry, in menu order.
    pub const ALL: [Color; 9] = [
        Color::Blue,
        Color::Red,
        Color::Green,
        Color::Orange,
        Color::Purple,
        Color::Yellow,
        Color::Pink,
        Color::Cyan,
        Color::Magenta,
    ];

    /// Colour pre-selected for seat `seat`.
    pub fn default_for_seat(seat: usize) -> Color {
        // The first six palette entries are the per-seat defaults.
        Color::ALL[seat % 6]
    }

    /// CSS colour name.
    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Purple => "purple",
            Color::Yellow => "yellow",
            Color::Pink => "pink",
            Color::Cyan => "cyan",
            Color::Magenta => "magenta",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Color {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| GameError::InvalidConfiguration(format!("unknown color '{}'", s)))
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub controller: Controller,
    pub color: Color,
    pub area: Area,
    pub target: Area,
    /// Opponent pieces captured so far.
    pub score: u32,
    pub difficulty: Difficulty,
}

impl Player {
    #[inline]
    pub fn is_human(&self) -> bool {
        self.controller == Controller::Human
    }
}

/// Seat players in order: the first `human_count` seats are human, the rest
/// computer. Home areas and targets follow the board's table.
///
/// `names` and `colors` need one entry per seat.
pub fn seat_players(
    player_count: PlayerCount,
    human_count: usize,
    names: &[String],
    colors: &[Color],
) -> Result<Vec<Player>, GameError> {
    let seats = player_count.get();
    if names.len() != seats || colors.len() != seats {
        return Err(GameError::InvalidConfiguration(format!(
            "{} seats need {} names and colors (got {} names, {} colors)",
            seats,
            seats,
            names.len(),
            colors.len()
        )));
    }
    if human_count > seats {
        return Err(GameError::InvalidConfiguration(format!(
            "{} humans for {} seats",
            human_count, seats
        )));
    }
    let players = player_count
        .areas()
        .iter()
        .zip(names.iter().zip(colors))
        .enumerate()
        .map(|(i, (&area, (name, &color)))| Player {
            id: PlayerId(i as u8),
            name: name.clone(),
            controller: if i < human_count {
                Controller::Human
            } else {
                Controller::Computer
            },
            color,
            area,
            target: player_count.target_of(area),
            score: 0,
            difficulty: Difficulty::Easy,
        })
        .collect();
    Ok(players)
}
