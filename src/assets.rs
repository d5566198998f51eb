//! Font loading and glyph atlases.
//!
//! Fonts are rasterized once with fontdue at [`ATLAS_FONT_SIZE`] into a single
//! R8 texture per face. Text of any other size is drawn by scaling the atlas
//! quads, which keeps one atlas per face no matter how often the viewport (and
//! with it the heading size) changes.

use std::collections::HashMap;
use std::path::Path;

use fontdue::{Font, FontSettings};
use log::{debug, info};

use crate::error::{GardenError, Result};
use crate::gpu::GpuContext;
use crate::scene::FontStyle;

/// Pixel size glyphs are rasterized at.
pub const ATLAS_FONT_SIZE: f32 = 64.0;

const ATLAS_PADDING: u32 = 1;
const INITIAL_ATLAS_SIZE: u32 = 512;

/// Loads the font faces the scene's text is drawn with.
pub trait FontLoader {
    /// Load the font at `path` and make it available as `style`.
    fn load_font(&mut self, style: FontStyle, path: &Path) -> Result<()>;
}

/// Information about a single glyph in the font atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphInfo {
    /// UV coordinates in the atlas (x, y, width, height) normalized to [0, 1].
    pub uv: [f32; 4],
    /// Size of the glyph in atlas pixels.
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the glyph's bottom-left corner.
    pub offset_x: f32,
    pub offset_y: f32,
    /// How far to advance the pen after this glyph.
    pub advance: f32,
}

/// Shelf-pack glyph rectangles into a power-of-two atlas.
///
/// Starts at 512×512 and doubles the smaller side until everything fits.
/// Returns the atlas size and the top-left corner of each rectangle.
fn pack_glyphs(sizes: &[(u32, u32)]) -> ((u32, u32), Vec<(u32, u32)>) {
    let mut atlas = (INITIAL_ATLAS_SIZE, INITIAL_ATLAS_SIZE);
    loop {
        if let Some(origins) = try_pack(sizes, atlas) {
            return (atlas, origins);
        }
        if atlas.0 <= atlas.1 {
            atlas.0 *= 2;
        } else {
            atlas.1 *= 2;
        }
    }
}

fn try_pack(sizes: &[(u32, u32)], (atlas_w, atlas_h): (u32, u32)) -> Option<Vec<(u32, u32)>> {
    let mut origins = Vec::with_capacity(sizes.len());
    let (mut x, mut y) = (ATLAS_PADDING, ATLAS_PADDING);
    let mut row_height = 0;

    for &(w, h) in sizes {
        if w + 2 * ATLAS_PADDING > atlas_w {
            return None;
        }
        if x + w + ATLAS_PADDING > atlas_w {
            x = ATLAS_PADDING;
            y += row_height + ATLAS_PADDING;
            row_height = 0;
        }
        if y + h + ATLAS_PADDING > atlas_h {
            return None;
        }
        origins.push((x, y));
        x += w + ATLAS_PADDING;
        row_height = row_height.max(h);
    }
    Some(origins)
}

/// A font face rasterized into a GPU texture.
pub struct FontAtlas {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    glyphs: HashMap<char, GlyphInfo>,
    size: f32,
}

impl FontAtlas {
    /// Parse TTF/OTF data and upload printable ASCII glyphs.
    ///
    /// `path` only labels the error if the data does not parse.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        font_data: &[u8],
        size: f32,
        path: &Path,
    ) -> Result<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default()).map_err(|reason| {
            GardenError::FontParse {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            }
        })?;

        let rasterized: Vec<(char, fontdue::Metrics, Vec<u8>)> = (32u8..=126u8)
            .map(char::from)
            .map(|c| {
                let (metrics, bitmap) = font.rasterize(c, size);
                (c, metrics, bitmap)
            })
            .collect();

        let sizes: Vec<(u32, u32)> = rasterized
            .iter()
            .map(|(_, m, _)| (m.width as u32, m.height as u32))
            .collect();
        let ((atlas_width, atlas_height), origins) = pack_glyphs(&sizes);

        let mut atlas_data = vec![0u8; (atlas_width * atlas_height) as usize];
        let mut glyphs = HashMap::with_capacity(rasterized.len());

        for ((c, metrics, bitmap), &(x, y)) in rasterized.iter().zip(&origins) {
            let glyph_w = metrics.width as u32;
            let glyph_h = metrics.height as u32;

            for gy in 0..glyph_h {
                let src = (gy * glyph_w) as usize;
                let dst = ((y + gy) * atlas_width + x) as usize;
                atlas_data[dst..dst + glyph_w as usize]
                    .copy_from_slice(&bitmap[src..src + glyph_w as usize]);
            }

            glyphs.insert(
                *c,
                GlyphInfo {
                    uv: [
                        x as f32 / atlas_width as f32,
                        y as f32 / atlas_height as f32,
                        glyph_w as f32 / atlas_width as f32,
                        glyph_h as f32 / atlas_height as f32,
                    ],
                    width: glyph_w,
                    height: glyph_h,
                    offset_x: metrics.xmin as f32,
                    offset_y: metrics.ymin as f32,
                    advance: metrics.advance_width,
                },
            );
        }
        debug!(
            "rasterized {} glyphs into a {atlas_width}x{atlas_height} atlas",
            glyphs.len()
        );

        let extent = wgpu::Extent3d {
            width: atlas_width,
            height: atlas_height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas_data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas_width),
                rows_per_image: Some(atlas_height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Font Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            view,
            sampler,
            glyphs,
            size,
        })
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    /// Pixel size the glyphs were rasterized at.
    pub fn size(&self) -> f32 {
        self.size
    }
}

/// The loaded font faces, one atlas per [`FontStyle`].
pub struct Assets {
    device: wgpu::Device,
    queue: wgpu::Queue,
    fonts: HashMap<FontStyle, FontAtlas>,
}

impl Assets {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            device: gpu.device.clone(),
            queue: gpu.queue.clone(),
            fonts: HashMap::new(),
        }
    }

    pub fn font(&self, style: FontStyle) -> Option<&FontAtlas> {
        self.fonts.get(&style)
    }

    pub(crate) fn fonts(&self) -> impl Iterator<Item = (FontStyle, &FontAtlas)> {
        self.fonts.iter().map(|(style, atlas)| (*style, atlas))
    }
}

impl FontLoader for Assets {
    fn load_font(&mut self, style: FontStyle, path: &Path) -> Result<()> {
        let data = std::fs::read(path).map_err(|source| GardenError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let atlas = FontAtlas::new(&self.device, &self.queue, &data, ATLAS_FONT_SIZE, path)?;
        info!("loaded {style:?} font from {}", path.display());
        self.fonts.insert(style, atlas);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_into_initial_atlas() {
        let sizes = vec![(30, 40); 95];
        let ((w, h), origins) = pack_glyphs(&sizes);
        assert_eq!((w, h), (512, 512));
        assert_eq!(origins.len(), 95);
        assert_eq!(origins[0], (ATLAS_PADDING, ATLAS_PADDING));
    }

    #[test]
    fn packed_rects_stay_inside_and_apart() {
        let sizes: Vec<(u32, u32)> = (0..95).map(|i| (10 + i % 40, 20 + i % 30)).collect();
        let ((w, h), origins) = pack_glyphs(&sizes);

        for (i, (&(x, y), &(gw, gh))) in origins.iter().zip(&sizes).enumerate() {
            assert!(x + gw <= w && y + gh <= h);
            for (&(ox, oy), &(ow, oh)) in origins[i + 1..].iter().zip(&sizes[i + 1..]) {
                let apart = x + gw <= ox || ox + ow <= x || y + gh <= oy || oy + oh <= y;
                assert!(apart, "glyph {i} overlaps");
            }
        }
    }

    #[test]
    fn grows_when_glyphs_do_not_fit() {
        let sizes = vec![(100, 100); 40];
        let ((w, h), _) = pack_glyphs(&sizes);
        assert_eq!((w, h), (1024, 512));

        let wide = [(700, 10)];
        let ((w, _), origins) = pack_glyphs(&wide);
        assert_eq!(w, 1024);
        assert_eq!(origins, vec![(1, 1)]);
    }

    #[test]
    fn empty_glyphs_take_no_room() {
        // Space rasterizes to a zero-sized bitmap.
        let ((w, h), origins) = pack_glyphs(&[(0, 0), (5, 5)]);
        assert_eq!((w, h), (512, 512));
        assert_eq!(origins, vec![(1, 1), (2, 1)]);
    }
}
