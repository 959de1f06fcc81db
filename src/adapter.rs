use crate::{
    core::{Point, RectPx},
    depth::DepthImage,
    error::DriftResult,
};

pub mod layers;
pub mod mesh;
pub mod sprite;

/// Shared lifecycle contract of the three rendering backends.
///
/// Hosts wire pointer events into `pointer_moved`/`pointer_left` and register
/// `tick` with their frame scheduler (one call per presented frame,
/// deregistered on teardown). All state lives behind `&mut self`; adapters
/// never share smoothing state with each other.
///
/// Failure semantics: a collapsed reference rectangle drops the event
/// (state unchanged), missing depth data forces the neutral state. Both are
/// reported as recoverable errors and neither may leak NaN into the
/// rendering primitive.
pub trait ParallaxAdapter {
    /// Feed one pointer-move event, re-querying the host's bounding rect.
    fn pointer_moved(&mut self, client: Point, rect: RectPx) -> DriftResult<()>;

    /// The pointer left the host area: return to the neutral displacement
    /// state immediately, regardless of prior history.
    fn pointer_left(&mut self);

    /// Advance smoothing by one render tick. Called every frame whether or
    /// not the pointer moved, so eased values keep converging between
    /// events.
    fn tick(&mut self);

    /// True when the adapter would write only identity/zero values.
    fn is_neutral(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    Layers,
    Sprite,
    Mesh,
}

/// Build an adapter with its default configuration. The sprite and mesh
/// backends sample a depth map; without one they stay neutral and report
/// missing depth on every move.
pub fn create_adapter(
    kind: AdapterKind,
    depth: Option<DepthImage>,
) -> DriftResult<Box<dyn ParallaxAdapter>> {
    match kind {
        AdapterKind::Layers => Ok(Box::new(layers::LayerStack::with_defaults(4)?)),
        AdapterKind::Sprite => {
            let mut adapter = sprite::SpriteAdapter::new(sprite::SpriteConfig::classic())?;
            if let Some(map) = depth {
                adapter.set_depth_sprite(map);
            }
            Ok(Box::new(adapter))
        }
        AdapterKind::Mesh => {
            let mut adapter = mesh::MeshAdapter::new(mesh::MeshConfig::default())?;
            if let Some(map) = depth {
                adapter.set_depth_texture(map);
            }
            Ok(Box::new(adapter))
        }
    }
}
