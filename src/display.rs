//! GPU textures for uploaded images.

use eframe::egui;
use log::{debug, warn};

use crate::error::{AppError, Result};
use crate::session::{DisplayStore, SourceFile};

/// What the canvas and filmstrip draw for one image. `texture` is `None` for
/// files that could not be decoded; those still take part in the session.
pub struct Display {
    texture: Option<egui::TextureHandle>,
    size: egui::Vec2,
}

impl Display {
    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    /// Pixel size of the decoded image, zero when undecodable.
    pub fn size(&self) -> egui::Vec2 {
        self.size
    }
}

pub fn decode(file: &SourceFile) -> Result<egui::ColorImage> {
    let img = image::load_from_memory(&file.bytes).map_err(|source| AppError::Decode {
        name: file.name.clone(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.as_flat_samples();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()))
}

/// Uploads decoded images to egui and drops the texture on release.
pub struct TextureStore {
    ctx: egui::Context,
    live: usize,
}

impl TextureStore {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx, live: 0 }
    }

    /// Handles created and not yet released.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl DisplayStore for TextureStore {
    type Handle = Display;

    fn create(&mut self, file: &SourceFile) -> Display {
        self.live += 1;
        match decode(file) {
            Ok(color_image) => {
                let size = egui::vec2(color_image.size[0] as f32, color_image.size[1] as f32);
                let texture = self.ctx.load_texture(
                    format!("image:{}", file.name),
                    color_image,
                    egui::TextureOptions::LINEAR,
                );
                debug!("texture for {} ({}x{})", file.name, size.x, size.y);
                Display {
                    texture: Some(texture),
                    size,
                }
            }
            Err(err) => {
                warn!("{err}");
                Display {
                    texture: None,
                    size: egui::Vec2::ZERO,
                }
            }
        }
    }

    fn release(&mut self, handle: Display) {
        self.live = self.live.saturating_sub(1);
        if let Some(texture) = handle.texture {
            debug!("freeing texture {:?}", texture.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let file = SourceFile::new("red.png", png(4, 3));
        let color_image = decode(&file).unwrap();
        assert_eq!(color_image.size, [4, 3]);
    }

    #[test]
    fn test_decode_garbage() {
        let file = SourceFile::new("notes.txt", b"hello".to_vec());
        assert!(matches!(decode(&file), Err(AppError::Decode { .. })));
    }

    #[test]
    fn test_store_tracks_live_handles() {
        let mut store = TextureStore::new(egui::Context::default());
        let good = store.create(&SourceFile::new("red.png", png(2, 2)));
        let bad = store.create(&SourceFile::new("notes.txt", b"hello".to_vec()));
        assert_eq!(store.live(), 2);
        assert!(good.texture().is_some());
        assert_eq!(good.size(), egui::vec2(2.0, 2.0));
        assert!(bad.texture().is_none());

        store.release(good);
        store.release(bad);
        assert_eq!(store.live(), 0);
    }
}
