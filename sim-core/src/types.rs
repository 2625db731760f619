/// Identifier for a branch node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`, and is only meaningful within
/// the lifetime of a given `Tree` instance.
pub type NodeId = usize;

/// Normalized scalar in `[0, 1]` attached to every primitive.
///
/// Scenes use it for whatever the consumer should vary (iteration ratio,
/// branch depth, attention weight). Turning it into a color is left to
/// the consumer.
pub type Shade = f32;
