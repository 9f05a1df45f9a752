use std::sync::Arc;
use std::thread;

use tessera_engine::coords::{Rect, Vec2};
use tessera_engine::device::{DataType, Device, FailPoint, HeadlessConfig, HeadlessDevice, SamplerConfig};
use tessera_engine::paint::{Color, Paint, TextureFill};
use tessera_engine::render::{BatchFill, Renderer};
use tessera_engine::scene::{DrawList, ZIndex};
use tessera_engine::texture::{
    CachePolicy, SampleMode, TextureCache, TextureConfig, TextureError, TextureFlags, TextureManager,
};

fn manager() -> TextureManager {
    TextureManager::new(TextureConfig::default()).with_cache(Arc::new(TextureCache::new(CachePolicy::Unbounded)))
}

fn device() -> HeadlessDevice {
    HeadlessDevice::new(HeadlessConfig::default())
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

// ── cached textures ───────────────────────────────────────────────────────

#[test]
fn repeated_array_allocates_once_on_the_device() {
    let mgr = manager();
    let mut dev = device();

    let a = mgr.from_array(&RED, 1, 1).unwrap();
    a.resolve_device_handle(&mut dev, &SamplerConfig::LINEAR_CLAMP).unwrap();
    let b = mgr.from_array(&RED, 1, 1).unwrap();
    b.resolve_device_handle(&mut dev, &SamplerConfig::LINEAR_CLAMP).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(dev.stats().textures_created, 1);
    assert_eq!(dev.stats().uploads, 1);
    assert_eq!(mgr.cache().stats().hits, 1);
}

#[test]
fn concurrent_requests_build_once() {
    let mgr = manager();
    let bytes = [7u8; 64];

    let textures: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = (0..8).map(|_| s.spawn(|| mgr.from_array(&bytes, 4, 4).unwrap())).collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert!(textures.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    let stats = mgr.cache().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
}

#[test]
fn stale_handle_is_uploaded_again() {
    let mgr = manager();
    let mut dev = device();
    let tex = mgr.from_array(&RED, 1, 1).unwrap();

    let first = tex.resolve_device_handle(&mut dev, &SamplerConfig::NEAREST_CLAMP).unwrap();
    assert_eq!(tex.point(&mut dev, Vec2::new(0.5, 0.5)).unwrap().r, 1.0);

    tex.set_pixels(BLUE.to_vec(), 1, 1).unwrap();
    let second = tex.resolve_device_handle(&mut dev, &SamplerConfig::NEAREST_CLAMP).unwrap();

    assert_eq!(first, second);
    assert_eq!(dev.stats().uploads, 2);
    let texel = tex.point(&mut dev, Vec2::new(0.5, 0.5)).unwrap();
    assert_eq!((texel.r, texel.b), (0.0, 1.0));
}

#[test]
fn each_sampler_gets_its_own_handle() {
    let mgr = manager();
    let mut dev = device();
    let tex = mgr.from_array(&RED, 1, 1).unwrap();

    tex.sample(&mut dev, Vec2::new(0.5, 0.5)).unwrap();
    tex.point(&mut dev, Vec2::new(0.5, 0.5)).unwrap();
    tex.point_xy(&mut dev, 0.25, 0.75).unwrap();

    assert_eq!(tex.device_handle_count(), 2);
    tex.delete(&mut dev);
    assert_eq!(tex.device_handle_count(), 0);
    assert_eq!(dev.stats().live_objects(), 0);
}

#[test]
fn repainted_texture_still_answers_its_original_bytes() {
    let mgr = manager();
    let first = mgr.from_array(&RED, 1, 1).unwrap();
    first.set_pixels(BLUE.to_vec(), 1, 1).unwrap();

    for _ in 0..2 {
        let again = mgr.from_array(&RED, 1, 1).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
    let blue = mgr.from_array(&BLUE, 1, 1).unwrap();
    assert!(!Arc::ptr_eq(&first, &blue));
    assert_eq!(mgr.cache().stats().hits, 2);
}

// ── render targets ────────────────────────────────────────────────────────

#[test]
fn render_targets_are_never_shared() {
    let mgr = manager();
    let mut dev = device();

    let a = mgr.create_render_target(&mut dev, TextureFlags::empty(), 32, 32).unwrap();
    let b = mgr.create_render_target(&mut dev, TextureFlags::empty(), 32, 32).unwrap();

    assert_ne!(a.id(), b.id());
    assert_ne!(a.framebuffer(), b.framebuffer());
    assert_eq!(dev.stats().framebuffers_created, 2);
    assert!(mgr.cache().is_empty());
}

#[test]
fn resize_keeps_identity_and_releases_old_objects_once() {
    let mgr = manager();
    let mut dev = device();
    let target = mgr.create_render_target(&mut dev, TextureFlags::empty(), 32, 32).unwrap();
    let (id, flags) = (target.id(), target.flags());
    let old_fb = target.framebuffer().unwrap();

    target.resize(&mut dev, 64, 16).unwrap();

    let new_fb = target.framebuffer().unwrap();
    assert_ne!(old_fb, new_fb);
    assert!(!dev.is_framebuffer(old_fb));
    assert_eq!((target.id(), target.flags()), (id, flags));
    assert_eq!(target.size(), (64, 16));
    assert_eq!(dev.texture_size(target.color_attachment().unwrap()), Some((64, 16)));

    let stats = dev.stats();
    assert_eq!(stats.framebuffers_deleted, 1);
    assert_eq!(stats.renderbuffers_deleted, 1);
    assert_eq!(stats.textures_deleted, 1);
}

#[test]
fn delete_is_idempotent() {
    let mgr = manager();
    let mut dev = device();
    let target = mgr.create_render_target(&mut dev, TextureFlags::RGBA | TextureFlags::DEPTH, 8, 8).unwrap();

    target.delete(&mut dev);
    target.delete(&mut dev);

    let stats = dev.stats();
    assert_eq!(stats.live_objects(), 0);
    assert_eq!(stats.framebuffers_deleted, 1);
    assert_eq!(stats.renderbuffers_deleted, 1);
    assert!(target.framebuffer().is_none());
}

#[test]
fn failed_construction_leaves_nothing_behind() {
    let mgr = manager();
    for point in [FailPoint::CreateTexture, FailPoint::Upload, FailPoint::CreateRenderbuffer, FailPoint::RenderbufferStorage] {
        let mut dev = device();
        dev.fail_next(point);
        let err = mgr.create_render_target(&mut dev, TextureFlags::empty(), 16, 16).unwrap_err();
        assert!(matches!(err, TextureError::Device { .. }), "{point:?}: {err}");
        assert_eq!(dev.stats().live_objects(), 0, "{point:?}");
    }
}

#[test]
fn float_target_needs_its_extension() {
    let mgr = manager();
    let mut bare = device();
    let err = mgr.create_render_target(&mut bare, TextureFlags::RGBA | TextureFlags::FLOAT, 4, 4).unwrap_err();
    assert!(matches!(err, TextureError::UnsupportedFormat { extension: "OES_texture_float", .. }));
    assert_eq!(bare.stats().textures_created + bare.stats().framebuffers_created, 0);

    let mut capable = HeadlessDevice::new(HeadlessConfig::default().with_extension("OES_texture_float"));
    let target = mgr.create_render_target(&mut capable, TextureFlags::RGBA | TextureFlags::FLOAT, 4, 4).unwrap();
    let (_, data_type) = capable.texture_layout(target.color_attachment().unwrap()).unwrap();
    assert_eq!(data_type, DataType::Float);
}

// ── render pass ───────────────────────────────────────────────────────────

#[test]
fn render_into_target_resolves_texture_fills() {
    let mgr = manager();
    let mut dev = device();
    let target = mgr.create_render_target(&mut dev, TextureFlags::RGBA, 64, 64).unwrap();
    let tile = mgr.from_array(&BLUE, 1, 1).unwrap();

    let mut list = DrawList::new();
    list.push_solid_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 64.0, 64.0), Color::from_premul(1.0, 1.0, 1.0, 1.0));
    list.push_rect(
        ZIndex::BASE,
        Rect::new(8.0, 8.0, 16.0, 16.0),
        Paint::Texture(TextureFill::new(Arc::clone(&tile), SampleMode::PointFlipped)),
    );

    let mut renderer = Renderer::new();
    let batches = renderer.render(&mut dev, &mut list, Some(&target)).unwrap();

    assert_eq!(batches.len(), 2);
    assert!(matches!(batches[0].fill, BatchFill::Solid(_)));
    match batches[1].fill {
        BatchFill::Textured { texture, sampler, flip_v, .. } => {
            assert_eq!(texture, tile.id());
            assert_eq!(sampler, SampleMode::PointFlipped.sampler());
            assert!(flip_v);
        }
        other => panic!("unexpected fill {other:?}"),
    }
    assert_eq!(dev.bound_framebuffer(), None);
}
