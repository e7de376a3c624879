use std::{str::FromStr, sync::Arc};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    roller::Roller,
    sprite::{Sprite, SpriteError, SpriteProvider},
};

#[derive(Debug, Error)]
pub enum DiceError {
    #[error("face value {face} is out of range for {die_type}")]
    OutOfRange { face: u32, die_type: DieType },
    #[error(transparent)]
    Sprite(#[from] SpriteError),
}

#[derive(Debug, Error)]
#[error("unknown die type: {0}")]
pub struct ParseDieTypeError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    #[display("D6")]
    D6Alt,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    pub fn all() -> Vec<DieType> {
        vec![
            DieType::D4,
            DieType::D6,
            DieType::D6Alt,
            DieType::D8,
            DieType::D10,
            DieType::D12,
            DieType::D20,
        ]
    }

    pub fn face_count(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D6Alt => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
        }
    }

    /// Sheet index of the first face. Faces run contiguously from here.
    pub fn sprite_start(&self) -> u32 {
        match self {
            DieType::D4 => 57,
            DieType::D6 => 1,
            DieType::D6Alt => 9,
            DieType::D8 => 17,
            // shares its run with D12
            DieType::D10 => 25,
            DieType::D12 => 25,
            DieType::D20 => 37,
        }
    }
}

impl FromStr for DieType {
    type Err = ParseDieTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d4" => Ok(DieType::D4),
            "d6" => Ok(DieType::D6),
            "d6alt" => Ok(DieType::D6Alt),
            "d8" => Ok(DieType::D8),
            "d10" => Ok(DieType::D10),
            "d12" => Ok(DieType::D12),
            "d20" => Ok(DieType::D20),
            _ => Err(ParseDieTypeError(s.to_string())),
        }
    }
}

/// One die on the table.
///
/// Dice share a sprite sheet and borrow the game's [`Roller`] when rolled.
#[derive(Debug, Clone)]
pub struct Die {
    die_type: DieType,
    sheet: Arc<dyn SpriteProvider>,
    sides: u32,
    last_roll: u32,
}

impl Die {
    pub fn new(die_type: DieType, sheet: Arc<dyn SpriteProvider>) -> Self {
        Self {
            die_type,
            sheet,
            sides: die_type.face_count(),
            last_roll: 0,
        }
    }

    pub fn die_type(&self) -> DieType {
        self.die_type
    }

    pub fn sheet(&self) -> &Arc<dyn SpriteProvider> {
        &self.sheet
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// The stored last-roll value; `0` until the die is first rolled or set.
    pub fn last_value(&self) -> u32 {
        self.last_roll
    }

    /// Rolls the die, returning the zero-based face drawn and its sprite.
    ///
    /// A failed sprite lookup still reports the face.
    pub fn roll(&mut self, roller: &mut Roller) -> (u32, Option<Sprite>) {
        let face = roller.range(self.sides);
        self.last_roll = face + 1;
        let sprite_start = self.die_type.sprite_start();
        let sprite_index = face + sprite_start - 1;
        log::info!(
            "Rolling {}: value: {}, sprite: {}",
            self.die_type,
            self.last_roll,
            sprite_index
        );

        match self.sheet.get(sprite_index) {
            Ok(sprite) => (face, Some(sprite)),
            Err(e) => {
                log::debug!("No sprite for {} face {}: {}", self.die_type, face, e);
                (face, None)
            }
        }
    }

    /// Puts the die on a specific face in `1..=sides`.
    pub fn set(&mut self, face: u32) -> Result<Sprite, DiceError> {
        if face == 0 || face > self.sides {
            return Err(DiceError::OutOfRange {
                face,
                die_type: self.die_type,
            });
        }

        self.last_roll = face + 1;
        let sprite = self.sheet.get(face + self.die_type.sprite_start())?;
        Ok(sprite)
    }

    /// Resolves the sprite for the stored last roll.
    pub fn last_roll(&self) -> (u32, Option<Sprite>) {
        match self.sheet.get(self.last_roll + self.die_type.sprite_start()) {
            Ok(sprite) => (self.last_roll + 1, Some(sprite)),
            Err(_) => (self.last_roll, None),
        }
    }
}
