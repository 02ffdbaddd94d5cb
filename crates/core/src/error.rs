use thiserror::Error;

use crate::config::ConfigError;
use crate::content::RosterError;
use crate::templates::TemplateError;
use crate::types::{Direction, RoomId};

#[derive(Debug, Error)]
pub enum DungeonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    /// The room layout cannot be rendered without its template.
    #[error("no room template named '{name}' (needed by {room})")]
    MissingTemplate { name: String, room: RoomId },
    #[error("every one of {attempts} carve attempts hit the walk step limit")]
    CarveExhausted { attempts: u32 },
    #[error("{0} is not part of this dungeon")]
    UnknownRoom(RoomId),
    #[error("{room} has no {direction:?} door")]
    NoDoor { room: RoomId, direction: Direction },
}
