//! Turns a template's spawn grid into room content.

use tracing::debug;

use crate::content::{CharacterSource, EnemyClass, EnemyRecord};
use crate::mapgen::Biome;
use crate::mapgen::seed::DungeonRng;
use crate::templates::{ContentCategory, RoomTemplate, SpawnRule};

use super::model::{Content, Door, Spawn};

pub(super) fn roll_spawns(
    template: &RoomTemplate,
    biome: Biome,
    characters: &dyn CharacterSource,
    rng: &mut DungeonRng,
) -> Vec<Spawn> {
    let chances = template.chances();
    let mut spawns = Vec::new();

    for (pos, code) in template.spawns() {
        let Some(rule) = code.rule() else {
            continue;
        };
        let (category, guaranteed) = match rule {
            SpawnRule::Guaranteed(category) => (category, true),
            SpawnRule::Random(category) => {
                if rng.percent() >= chances.chance(category) {
                    continue;
                }
                (category, false)
            }
        };

        let content = match category {
            ContentCategory::Enemy => match pick_enemy(characters, biome, rng) {
                Some(record) => Content::Enemy(record),
                None => {
                    debug!(template = template.name(), ?biome, "no enemy fits biome; skipped");
                    continue;
                }
            },
            ContentCategory::Potion => Content::Potion,
            ContentCategory::Chest => Content::Chest,
            ContentCategory::Bomb => Content::Bomb,
            ContentCategory::Trap => Content::Trap,
            ContentCategory::BreakableWall => Content::BreakableWall,
            ContentCategory::Pillar => Content::Pillar,
            ContentCategory::Exit => Content::Exit,
        };
        spawns.push(Spawn { content, pos, guaranteed });
    }

    spawns
}

/// One breakable wall plugging the middle of each door opening.
pub(super) fn door_barricades(doors: &[Door]) -> Vec<Spawn> {
    doors
        .iter()
        .map(|door| Spawn {
            content: Content::BreakableWall,
            pos: door.bounds.center(),
            guaranteed: true,
        })
        .collect()
}

/// Dragons only appear in the lair, and only dragons appear there.
fn pick_enemy(
    characters: &dyn CharacterSource,
    biome: Biome,
    rng: &mut DungeonRng,
) -> Option<EnemyRecord> {
    let themed = match biome {
        Biome::Warren => Some(EnemyClass::Goblin),
        Biome::Crypt => Some(EnemyClass::Skeleton),
        Biome::Stronghold => Some(EnemyClass::Orc),
        Biome::Wilds | Biome::Lair => None,
    };
    let lair = biome == Biome::Lair;
    let allowed = |record: &&EnemyRecord| record.is_dragon() == lair;

    let mut candidates: Vec<&EnemyRecord> = themed
        .map(|class| characters.enemies_of_class(class).into_iter().filter(allowed).collect())
        .unwrap_or_default();
    if candidates.is_empty() {
        candidates = characters.enemies_for_biome(biome).into_iter().filter(allowed).collect();
    }
    rng.choose(&candidates).map(|record| (*record).clone())
}
