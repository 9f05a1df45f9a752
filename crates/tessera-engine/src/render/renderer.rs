use crate::device::Device;
use crate::paint::Paint;
use crate::scene::{DrawCmd, DrawList};
use crate::texture::Texture;

use super::{BatchFill, RenderBatch, RenderError};

/// Turns draw lists into render batches.
///
/// The batch buffer is reused across frames.
#[derive(Debug, Default)]
pub struct Renderer {
    batches: Vec<RenderBatch>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches of the last successful pass.
    #[inline]
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Renders `list` into `target`, or the default framebuffer when `None`.
    ///
    /// The default framebuffer is bound again when the pass ends, whether it
    /// succeeded or not.
    pub fn render(
        &mut self,
        device: &mut dyn Device,
        list: &mut DrawList,
        target: Option<&Texture>,
    ) -> Result<&[RenderBatch], RenderError> {
        self.batches.clear();

        let framebuffer = match target {
            Some(t) => Some(t.framebuffer().ok_or(RenderError::TargetNotReady { id: t.id() })?),
            None => None,
        };
        device.bind_framebuffer(framebuffer)?;

        let recorded = self.record(device, list);
        let restored = device.bind_framebuffer(None);
        if recorded.is_err() {
            self.batches.clear();
        }
        recorded?;
        restored?;

        log::trace!(
            "render pass: {} batch(es) from {} item(s) into {}",
            self.batches.len(),
            list.len(),
            target.map_or_else(|| "default framebuffer".to_owned(), |t| format!("texture {}", t.id()))
        );
        Ok(&self.batches)
    }

    fn record(&mut self, device: &mut dyn Device, list: &mut DrawList) -> Result<(), RenderError> {
        for item in list.iter_in_paint_order() {
            let DrawCmd::Rect(cmd) = &item.cmd;
            if cmd.rect.is_empty() {
                continue;
            }

            let fill = match &cmd.paint {
                Paint::Solid(color) => {
                    if color.a <= 0.0 {
                        continue;
                    }
                    BatchFill::Solid(*color)
                }
                Paint::Texture(fill) => {
                    let sampler = fill.mode.sampler();
                    match fill.texture.resolve_device_handle(device, &sampler)? {
                        Some(handle) => BatchFill::Textured {
                            texture: fill.texture.id(),
                            handle,
                            sampler,
                            flip_v: fill.mode.is_flipped(),
                        },
                        None => {
                            log::warn!("texture {} has no pixels; skipping fill", fill.texture.id());
                            continue;
                        }
                    }
                }
            };

            self.batches.push(RenderBatch { key: item.key, rect: cmd.rect, fill });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::coords::Rect;
    use crate::device::{FailPoint, HeadlessConfig, HeadlessDevice};
    use crate::paint::{Color, TextureFill};
    use crate::scene::ZIndex;
    use crate::texture::{PixelSource, SampleMode, TextureFlags};

    fn device() -> HeadlessDevice {
        HeadlessDevice::new(HeadlessConfig::default())
    }

    #[test]
    fn binds_target_and_restores_default() {
        let mut dev = device();
        let target = Texture::render_target(TextureFlags::RGBA, 16, 16);
        target.init_as_render_target(&mut dev).unwrap();

        let mut list = DrawList::new();
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 4.0, 4.0), Color::from_premul(1.0, 0.0, 0.0, 1.0));

        let mut renderer = Renderer::new();
        let batches = renderer.render(&mut dev, &mut list, Some(&target)).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(dev.bound_framebuffer(), None);
    }

    #[test]
    fn skips_empty_and_transparent_rects() {
        let mut dev = device();
        let mut list = DrawList::new();
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 0.0, 4.0), Color::from_premul(1.0, 1.0, 1.0, 1.0));
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 4.0, 4.0), Color::transparent());

        let mut renderer = Renderer::new();
        assert!(renderer.render(&mut dev, &mut list, None).unwrap().is_empty());
    }

    #[test]
    fn texture_fill_resolves_handle_with_mode_sampler() {
        let mut dev = device();
        let tex = Arc::new(Texture::new(
            TextureFlags::RGBA,
            1,
            1,
            PixelSource::Array(Arc::from(vec![255u8, 255, 255, 255])),
        ));
        let mut list = DrawList::new();
        let fill = TextureFill::new(Arc::clone(&tex), SampleMode::PointFlipped);
        list.push_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 2.0, 2.0), fill.into());

        let mut renderer = Renderer::new();
        let batches = renderer.render(&mut dev, &mut list, None).unwrap();
        match batches[0].fill {
            BatchFill::Textured { texture, handle, sampler, flip_v } => {
                assert_eq!(texture, tex.id());
                assert_eq!(sampler, SampleMode::PointFlipped.sampler());
                assert_eq!(dev.texture_sampler(handle), Some(sampler));
                assert!(flip_v);
            }
            BatchFill::Solid(_) => panic!("expected a textured batch"),
        }
    }

    #[test]
    fn deleted_target_is_rejected() {
        let mut dev = device();
        let target = Texture::render_target(TextureFlags::RGBA, 4, 4);
        target.init_as_render_target(&mut dev).unwrap();
        target.delete(&mut dev);

        let err = Renderer::new().render(&mut dev, &mut DrawList::new(), Some(&target)).unwrap_err();
        assert!(matches!(err, RenderError::TargetNotReady { .. }));
    }

    #[test]
    fn failure_mid_pass_still_restores_default() {
        let mut dev = device();
        let target = Texture::render_target(TextureFlags::RGBA, 4, 4);
        target.init_as_render_target(&mut dev).unwrap();
        let tex = Arc::new(Texture::new(
            TextureFlags::RGBA,
            1,
            1,
            PixelSource::Array(Arc::from(vec![0u8, 0, 0, 255])),
        ));
        let mut list = DrawList::new();
        list.push_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 1.0, 1.0), crate::paint::Paint::texture(tex));

        dev.fail_next(FailPoint::CreateTexture);
        let mut renderer = Renderer::new();
        assert!(matches!(
            renderer.render(&mut dev, &mut list, Some(&target)),
            Err(RenderError::Texture(_))
        ));
        assert_eq!(dev.bound_framebuffer(), None);
        assert!(renderer.batches().is_empty());
    }
}
