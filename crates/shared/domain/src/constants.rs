/// Display label of the synthetic root of every hierarchy.
pub const WORLD_NAME: &str = "World";

/// Separator used when a trail is rendered as a single line.
pub const TRAIL_SEPARATOR: &str = " › ";
