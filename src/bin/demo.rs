//! A minimal, non-interactive demonstration of the rasterizer: an inline
//! cube, orbited by a fixed camera path, presented through SDL2.
//!
//! Deliberately thin (per the crate's scope): no OBJ loading, no input-driven
//! camera, no texturing. This binary is a caller of the public API, not part
//! of the library, and exists only so the pipeline described in the crate's
//! docs can be seen running.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use swrast::{Mat4, Rasterizer, RenderTarget, RendererInterface, Vec3, Vec4, Viewport};

/// Twelve triangles (two per face), counter-clockwise front-face winding,
/// as a flat index buffer into [`CUBE_VERTICES`].
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // back
    5, 4, 7, 5, 7, 6, // front
    4, 0, 3, 4, 3, 7, // left
    1, 5, 6, 1, 6, 2, // right
    3, 2, 6, 3, 6, 7, // top
    4, 5, 1, 4, 1, 0, // bottom
];

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

/// The eight corners of a unit cube, centered on the origin.
const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
];

/// Packs a linear `[0, 1]` color into the byte order SDL2's
/// `PixelFormatEnum::ARGB8888` expects in memory on a little-endian host:
/// blue, green, red, alpha.
fn write_pixel(out: &mut [u8], color: Vec4) {
    out[0] = (color.z.clamp(0.0, 1.0) * 255.0) as u8;
    out[1] = (color.y.clamp(0.0, 1.0) * 255.0) as u8;
    out[2] = (color.x.clamp(0.0, 1.0) * 255.0) as u8;
    out[3] = (color.w.clamp(0.0, 1.0) * 255.0) as u8;
}

fn main() -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("swrast demo", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::ARGB8888, WINDOW_WIDTH, WINDOW_HEIGHT)
        .map_err(|e| e.to_string())?;

    let target = Rc::new(RefCell::new(RenderTarget::new(WINDOW_WIDTH, WINDOW_HEIGHT)));
    let mut rasterizer = Rasterizer::new(target.clone());
    rasterizer.set_viewport(Viewport::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT));
    rasterizer.set_projection(Mat4::perspective_lh(
        std::f32::consts::FRAC_PI_4,
        WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32,
        0.1,
        100.0,
    ));

    let start = Instant::now();
    let mut event_pump = sdl_context.event_pump()?;
    let mut pixel_bytes = vec![0u8; (WINDOW_WIDTH * WINDOW_HEIGHT * 4) as usize];

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                _ => {}
            }
        }

        let angle = start.elapsed().as_secs_f32() * 0.6;
        let model_view = Mat4::translation(0.0, 0.0, 3.0) * Mat4::rotation_y(angle);
        rasterizer.set_model_view(model_view);

        rasterizer.clear(Vec4::ZERO);
        rasterizer.draw_triangles(&CUBE_VERTICES, &CUBE_INDICES);

        {
            let target = target.borrow();
            for (i, pixel) in target.color().pixels().iter().enumerate() {
                write_pixel(&mut pixel_bytes[i * 4..i * 4 + 4], *pixel);
            }
        }

        texture
            .update(None, &pixel_bytes, (WINDOW_WIDTH * 4) as usize)
            .map_err(|e| e.to_string())?;

        canvas.clear();
        canvas.copy(
            &texture,
            None,
            Some(Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT)),
        )?;
        canvas.present();
    }

    Ok(())
}
