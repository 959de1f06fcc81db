use crate::{
    core::{Point, PointerSample, RectPx, ViewRect},
    error::DriftResult,
};

impl PointerSample {
    /// Normalize one raw pointer event against the host's current bounding
    /// rectangle.
    ///
    /// `client` is the event position in the same pixel space as `rect`
    /// (clientX/clientY). The rectangle is validated here; a collapsed or
    /// non-finite rect fails with
    /// [`DriftError::InvalidReferenceRect`](crate::DriftError) and the caller
    /// must drop the event rather than feed the model.
    ///
    /// Pure per-event function; nothing is cached between calls, so hosts
    /// that resize between events stay correct by construction.
    pub fn from_event(client: Point, rect: RectPx) -> DriftResult<Self> {
        let rect = ViewRect::new(rect)?;
        Ok(Self {
            uv: rect.normalize(client),
            px: client,
            rect,
        })
    }

    /// Sample at the rect center: the neutral pointer position.
    pub fn centered(rect: RectPx) -> DriftResult<Self> {
        let rect = ViewRect::new(rect)?;
        Ok(Self {
            uv: Point::new(0.5, 0.5),
            px: rect.center(),
            rect,
        })
    }
}
