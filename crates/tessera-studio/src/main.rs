use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tessera_canvas::prelude::*;
use tessera_engine::device::{HeadlessConfig, HeadlessDevice};
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::paint::TextureFill;
use tessera_engine::render::{BatchFill, Renderer};
use tessera_engine::texture::{SampleMode, Texture, TextureConfig, TextureFlags, TextureManager};

const FRAMES: usize = 3;
const SCREEN: Viewport = Viewport::new(800.0, 800.0);

/// 2x2 checker, uploaded once and shared by every frame through the cache.
const CHECKER: [u8; 16] = [
    255, 255, 255, 255, 40, 40, 40, 255, //
    40, 40, 40, 255, 255, 255, 255, 255,
];

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut device = HeadlessDevice::new(
        HeadlessConfig::default().with_extensions(["OES_texture_half_float", "OES_texture_half_float_linear"]),
    );
    let textures = TextureManager::new(TextureConfig::default());

    let target = textures
        .create_render_target(&mut device, TextureFlags::empty(), SCREEN.width as u32, SCREEN.height as u32)
        .context("creating the screen render target")?;
    log::info!("render target {} ({})", target.id(), target.type_string());

    let mut renderer = Renderer::new();
    let mut list = DrawList::new();

    for frame in 0..FRAMES {
        let started = Instant::now();
        let checker = textures.from_array(&CHECKER, 2, 2).context("creating the checker texture")?;

        list = Canvas::with_draw_list(SCREEN, list)
            .run(|c| compose(c, &checker))
            .with_context(|| format!("laying out frame {frame}"))?;
        let laid_out = started.elapsed();

        let batches = renderer
            .render(&mut device, &mut list, Some(&target))
            .with_context(|| format!("rendering frame {frame}"))?;
        let textured = batches.iter().filter(|b| matches!(b.fill, BatchFill::Textured { .. })).count();

        log::info!(
            "frame {frame}: {} rect(s), {} batch(es) ({textured} textured), layout {laid_out:?}, total {:?}",
            list.len(),
            batches.len(),
            started.elapsed()
        );
    }

    let cache = textures.cache().stats();
    log::info!("texture cache: {} hit(s), {} miss(es)", cache.hits, cache.misses);
    log::info!("device: {:?}", device.stats());

    resize_and_release(&mut device, &target)
}

/// Centred orange panel of five wrapping tiles, each split into a yellow and
/// a red half, followed by a checker swatch in the top-left corner.
fn compose(c: &mut Canvas, checker: &Arc<Texture>) -> Result<(), LayoutError> {
    c.begin_rect(
        &RectSpec::new()
            .walk(Walk::LrtbWrap)
            .align(Align::CENTER)
            .color_str("orange")?
            .padding(30.0)
            .margin(30.0)
            .w(200),
    )?;
    for _ in 0..5 {
        c.begin_rect(
            &RectSpec::new()
                .margin(1.0)
                .walk(Walk::LrtbWrap)
                .align(Align::LEFT_TOP)
                .color_str("blue")?
                .padding(0.0)
                .w(100)
                .h(100),
        )?;
        c.draw_rect(
            &RectSpec::new()
                .color_str("yellow")?
                .x(LayoutValue::left(0.0))
                .y(LayoutValue::top(3.0))
                .w(LayoutValue::width("50%")?)
                .h(LayoutValue::height("100%-5")?),
        )?;
        c.draw_rect(
            &RectSpec::new()
                .color_str("red")?
                .x(LayoutValue::right(0.0))
                .y(LayoutValue::top(3.0))
                .w(LayoutValue::width("50%")?)
                .h(LayoutValue::width("100%-5")?),
        )?;
        c.end_rect()?;
    }
    let panel = c.end_rect()?;
    log::debug!("panel placed at {:?}", panel.rect);

    let swatch = c.draw_rect(
        &RectSpec::new()
            .x(LayoutValue::left(10.0))
            .y(LayoutValue::top(10.0))
            .w(64)
            .h(64)
            .color(TextureFill::new(Arc::clone(checker), SampleMode::Point)),
    )?;
    log::trace!("checker swatch at {:?}", swatch.rect);
    Ok(())
}

fn resize_and_release(device: &mut HeadlessDevice, target: &Texture) -> Result<()> {
    target.resize(device, 400, 300).context("resizing the render target")?;
    log::info!("render target {} resized to {:?}", target.id(), target.size());

    target.delete(device);
    let stats = device.stats();
    log::info!("device objects still alive after release: {}", stats.live_objects());
    Ok(())
}
