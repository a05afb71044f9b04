use std::io;

use thiserror::Error;

use crate::priority_lock::Priority;

/// Fatal conditions that abort a contention run or a sweep.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to spawn the {actor} actor thread")]
    Spawn {
        actor: Priority,
        #[source]
        source: io::Error,
    },

    #[error("the {actor} actor panicked: {message}")]
    ActorPanicked { actor: Priority, message: String },

    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
