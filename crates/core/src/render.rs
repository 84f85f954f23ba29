//! Drawing lifecycle for map scenes.
//!
//! The geometry code only produces values. Whatever actually draws them
//! implements [`RenderTarget`], and a [`SceneLayer`] keeps track of what it
//! drew so the previous frame is removed before the next one goes up.

use tracing::{debug, warn};

use crate::decay::MarkerVisual;
use crate::geodesic::PathSegment;
use crate::scene::MapScene;

/// A map surface that can draw polylines and circle markers.
pub trait RenderTarget {
    /// Token returned for each drawn object, used to remove it later
    type Handle;

    fn draw_polyline(&mut self, segment: &PathSegment) -> Self::Handle;
    fn draw_marker(&mut self, marker: &MarkerVisual) -> Self::Handle;
    fn remove(&mut self, handle: Self::Handle);
}

/// Owns the handles of one drawn scene.
///
/// Every handle acquired by [`SceneLayer::replace`] is released by the next
/// `replace` or by [`SceneLayer::clear`].
#[derive(Debug)]
pub struct SceneLayer<H> {
    handles: Vec<H>,
}

impl<H> Default for SceneLayer<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H> SceneLayer<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently drawn
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Remove the previous scene from `target`, then draw `scene`.
    pub fn replace<R>(&mut self, target: &mut R, scene: &MapScene)
    where
        R: RenderTarget<Handle = H>,
    {
        self.clear(target);

        for marker in &scene.markers {
            self.handles.push(target.draw_marker(marker));
        }
        for segment in scene.arc.iter().flatten() {
            self.handles.push(target.draw_polyline(segment));
        }

        debug!(objects = self.handles.len(), "drew scene");
    }

    /// Remove everything this layer drew.
    pub fn clear<R>(&mut self, target: &mut R)
    where
        R: RenderTarget<Handle = H>,
    {
        for handle in self.handles.drain(..) {
            target.remove(handle);
        }
    }
}

impl<H> Drop for SceneLayer<H> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            warn!(
                leaked = self.handles.len(),
                "scene layer dropped without clearing its target"
            );
        }
    }
}
