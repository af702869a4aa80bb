use std::path::PathBuf;

/// Construction-time failures. All of these are fatal for the entity or scene
/// being built; nothing is left half-initialised.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("settings validation failed for {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("no image configured for character '{entity}'")]
    MissingImage { entity: String },

    /// The resolved collision box has zero width or height, e.g. the box
    /// came from a fully transparent image. It would never touch anything.
    #[error("collision box of '{entity}' has no area")]
    EmptyCollisionBox { entity: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SceneStackError {
    /// The stack was queried or popped with no scene on it. Indicates a
    /// driver bug: the loop must stop once the quit signal is raised.
    #[error("scene stack is empty")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    SceneStack(#[from] SceneStackError),
}
