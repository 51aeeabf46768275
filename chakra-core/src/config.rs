//! Settings chosen before a game starts.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::player::{seat_players, Color, Player};
use crate::topology::PlayerCount;

/// Setup for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub player_count: u8,
    /// Seats `0..human_count` are human, the rest computer.
    pub human_count: u8,
    pub names: Vec<String>,
    /// Palette names, case-insensitive.
    pub colors: Vec<String>,
    #[serde(default)]
    pub enable_rotation: bool,
}

impl SessionConfig {
    /// Names "Player 1".. and the default colour order.
    pub fn with_defaults(player_count: u8, human_count: u8) -> Self {
        SessionConfig {
            player_count,
            human_count,
            names: (1..=player_count).map(|n| format!("Player {}", n)).collect(),
            colors: (0..player_count as usize)
                .map(|seat| Color::default_for_seat(seat).name().to_string())
                .collect(),
            enable_rotation: false,
        }
    }

    /// Check counts, list lengths and colours.
    pub fn validate(&self) -> Result<(), GameError> {
        self.resolve().map(|_| ())
    }

    /// Validate and seat the players.
    pub fn seat(&self) -> Result<(PlayerCount, Vec<Player>), GameError> {
        let (count, colors) = self.resolve()?;
        let players = seat_players(count, self.human_count as usize, &self.names, &colors)?;
        Ok((count, players))
    }

    fn resolve(&self) -> Result<(PlayerCount, Vec<Color>), GameError> {
        let count = PlayerCount::try_from(self.player_count)?;
        if self.human_count < 1 || self.human_count > self.player_count {
            return Err(GameError::InvalidConfiguration(format!(
                "human_count must be between 1 and {} (got {})",
                self.player_count, self.human_count
            )));
        }
        if self.names.len() != count.get() {
            return Err(GameError::InvalidConfiguration(format!(
                "expected {} names, got {}",
                count.get(),
                self.names.len()
            )));
        }
        if self.colors.len() != count.get() {
            return Err(GameError::InvalidConfiguration(format!(
                "expected {} colors, got {}",
                count.get(),
                self.colors.len()
            )));
        }
        let colors = self
            .colors
            .iter()
            .map(|c| c.parse::<Color>())
            .collect::<Result<Vec<_>, _>>()?;
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].contains(color) {
                return Err(GameError::InvalidConfiguration(format!(
                    "color '{}' chosen by more than one player",
                    color
                )));
            }
        }
        Ok((count, colors))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::with_defaults(2, 1)
    }
}
