//! Decoded images shared by every scene.
//!
//! An `ImageHandle` is what gameplay code sees: a texture key plus the pixel
//! size and the opaque-pixel bounds used to size collision boxes. The decoded
//! RGBA data stays in the registry until the renderer has uploaded it.

use image::RgbaImage;
use pounce_core::geometry::Rect;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub key: Arc<str>,
    pub width: u32,
    pub height: u32,
    /// Bounds of the non-transparent pixels, relative to the image's top-left.
    pub opaque_bounds: Rect,
}

impl ImageHandle {
    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

pub struct ImageRegistry {
    root: PathBuf,
    images: HashMap<Arc<str>, (ImageHandle, RgbaImage)>,
}

impl ImageRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    /// Decode `relative` under the asset root once; later calls reuse it.
    pub fn load(&mut self, relative: &str) -> Result<ImageHandle, ConfigError> {
        if let Some((handle, _)) = self.images.get(relative) {
            return Ok(handle.clone());
        }
        let path = self.root.join(relative);
        let pixels = image::open(&path)
            .map_err(|source| ConfigError::Image {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        log::info!(
            "Loaded image '{}' ({}x{})",
            path.display(),
            pixels.width(),
            pixels.height()
        );
        Ok(self.insert(relative, pixels))
    }

    pub fn load_optional(
        &mut self,
        relative: Option<&str>,
    ) -> Result<Option<ImageHandle>, ConfigError> {
        relative.map(|path| self.load(path)).transpose()
    }

    pub fn insert(&mut self, key: &str, pixels: RgbaImage) -> ImageHandle {
        let handle = ImageHandle {
            key: Arc::from(key),
            width: pixels.width(),
            height: pixels.height(),
            opaque_bounds: opaque_bounds(&pixels),
        };
        self.images
            .insert(Arc::clone(&handle.key), (handle.clone(), pixels));
        handle
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &RgbaImage)> {
        self.images.iter().map(|(key, (_, pixels))| (key, pixels))
    }
}

/// Smallest rect holding every pixel with non-zero alpha. A fully
/// transparent image yields an empty rect at the origin.
pub fn opaque_bounds(pixels: &RgbaImage) -> Rect {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, pixel) in pixels.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    if min_x == u32::MAX {
        return Rect::default();
    }
    Rect::new(
        min_x as f32,
        min_y as f32,
        (max_x - min_x + 1) as f32,
        (max_y - min_y + 1) as f32,
    )
}
