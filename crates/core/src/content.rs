//! Enemy records and the character data source rooms draw spawns from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapgen::Biome;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read roster '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid roster JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyClass {
    Goblin,
    Skeleton,
    Orc,
    Slime,
    Bat,
    Dragon,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub name: String,
    pub class: EnemyClass,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: u32,
}

impl EnemyRecord {
    pub fn is_dragon(&self) -> bool {
        self.class == EnemyClass::Dragon
    }
}

/// Lookup surface for enemy base statistics. Misses return an empty list.
pub trait CharacterSource {
    fn enemies_of_class(&self, class: EnemyClass) -> Vec<&EnemyRecord>;

    /// Every enemy allowed to appear in `biome`: dragons in the lair, anything
    /// else everywhere else.
    fn enemies_for_biome(&self, biome: Biome) -> Vec<&EnemyRecord>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRoster {
    enemies: Vec<EnemyRecord>,
}

impl CharacterRoster {
    pub fn new(enemies: Vec<EnemyRecord>) -> Self {
        Self { enemies }
    }

    pub fn build_default() -> Self {
        let record = |name: &str, class, hp, attack, defense, speed: u32| EnemyRecord {
            name: name.to_string(),
            class,
            hp,
            attack,
            defense,
            speed,
        };
        Self::new(vec![
            record("Goblin Scout", EnemyClass::Goblin, 8, 2, 0, 13),
            record("Goblin Brute", EnemyClass::Goblin, 14, 4, 1, 9),
            record("Rattling Skeleton", EnemyClass::Skeleton, 12, 3, 2, 8),
            record("Skeleton Archer", EnemyClass::Skeleton, 9, 5, 0, 10),
            record("Orc Raider", EnemyClass::Orc, 18, 5, 2, 9),
            record("Orc Warlord", EnemyClass::Orc, 26, 7, 3, 7),
            record("Cave Slime", EnemyClass::Slime, 10, 2, 1, 6),
            record("Vampire Bat", EnemyClass::Bat, 6, 2, 0, 16),
            record("Young Dragon", EnemyClass::Dragon, 45, 8, 4, 8),
            record("Elder Dragon", EnemyClass::Dragon, 80, 11, 6, 7),
        ])
    }

    pub fn from_json_str(text: &str) -> Result<Self, RosterError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let text = fs::read_to_string(path)
            .map_err(|source| RosterError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }

    pub fn enemies(&self) -> &[EnemyRecord] {
        &self.enemies
    }
}

impl CharacterSource for CharacterRoster {
    fn enemies_of_class(&self, class: EnemyClass) -> Vec<&EnemyRecord> {
        self.enemies.iter().filter(|enemy| enemy.class == class).collect()
    }

    fn enemies_for_biome(&self, biome: Biome) -> Vec<&EnemyRecord> {
        let lair = biome == Biome::Lair;
        self.enemies.iter().filter(|enemy| enemy.is_dragon() == lair).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DungeonError;

    #[test]
    fn default_roster_covers_every_class() {
        let roster = CharacterRoster::default();
        assert!(roster.enemies().is_empty());

        let roster = CharacterRoster::build_default();
        for class in [
            EnemyClass::Goblin,
            EnemyClass::Skeleton,
            EnemyClass::Orc,
            EnemyClass::Slime,
            EnemyClass::Bat,
            EnemyClass::Dragon,
        ] {
            assert!(!roster.enemies_of_class(class).is_empty(), "missing {class:?}");
        }
    }

    #[test]
    fn lair_only_offers_dragons_and_other_biomes_never_do() {
        let roster = CharacterRoster::build_default();
        assert!(roster.enemies_for_biome(Biome::Lair).iter().all(|enemy| enemy.is_dragon()));
        for biome in [Biome::Wilds, Biome::Warren, Biome::Crypt, Biome::Stronghold] {
            let enemies = roster.enemies_for_biome(biome);
            assert!(!enemies.is_empty());
            assert!(enemies.iter().all(|enemy| !enemy.is_dragon()), "{biome:?}");
        }
    }

    #[test]
    fn roster_parses_from_json() {
        let roster = CharacterRoster::from_json_str(
            r#"{"enemies":[{"name":"Ash Wyrm","class":"dragon","hp":50,"attack":9,"defense":5,"speed":8}]}"#,
        )
        .expect("roster json should parse");
        assert_eq!(roster.enemies_of_class(EnemyClass::Dragon).len(), 1);
        assert!(roster.enemies_for_biome(Biome::Wilds).is_empty());
    }

    #[test]
    fn unknown_class_is_rejected() {
        let result = CharacterRoster::from_json_str(
            r#"{"enemies":[{"name":"Imp","class":"demon","hp":5,"attack":1,"defense":0,"speed":9}]}"#,
        );
        assert!(matches!(result, Err(RosterError::Parse(_))));
    }

    #[test]
    fn missing_roster_file_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("roster.json");

        let error = CharacterRoster::load(&path).expect_err("file does not exist");
        match &error {
            RosterError::Io { path: reported, source } => {
                assert_eq!(reported, &path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(error.to_string().contains("roster.json"));
    }

    #[test]
    fn malformed_roster_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("roster.json");
        fs::write(&path, r#"{"enemies":[{"name":"Imp""#).expect("write roster");

        let error = CharacterRoster::load(&path).expect_err("truncated json");
        assert!(matches!(error, RosterError::Parse(_)));
        let error = DungeonError::from(error);
        assert!(matches!(error, DungeonError::Roster(RosterError::Parse(_))));
    }
}
