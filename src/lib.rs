#![forbid(unsafe_code)]

pub mod adapter;
pub mod core;
pub mod depth;
pub mod error;
pub mod field;
pub mod pointer;
pub mod service;
pub mod smooth;

pub use crate::adapter::{AdapterKind, ParallaxAdapter, create_adapter};
pub use crate::adapter::{layers::LayerStack, mesh::MeshAdapter, sprite::SpriteAdapter};
pub use crate::core::{Displacement, Point, PointerSample, RectPx, Vec2, ViewRect};
pub use crate::depth::{ConstantDepth, DepthImage, DepthSample};
pub use crate::error::{DriftError, DriftResult};
pub use crate::field::{Falloff, FieldConfig, Gain, TiltConfig};
pub use crate::smooth::{Lerp, Smoother};
