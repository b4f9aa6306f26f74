//! Procedural DriveSweep icon: a drive enclosure with a usage strip and
//! activity LED, under two sweeping arcs.
//!
//! Depends on `std` only so the build script can include this file with
//! `#[path]` and bake the same pixels into the Windows `.ico` resource.

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // ── Layout ──────────────────────────────────────────────────
    let body = (s * 0.10, s * 0.42, s * 0.90, s * 0.84);
    let body_radius = s * 0.09;
    let strip = (s * 0.19, s * 0.58, s * 0.64, s * 0.68);
    let led = (s * 0.76, s * 0.63, s * 0.045);
    let arc_centre = (s * 0.50, s * 0.44);
    let arcs = [(s * 0.20, [0x89, 0xb4, 0xfa]), (s * 0.32, [0x74, 0xc7, 0xec])];
    let arc_half_width = s * 0.032;

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let mut out = [0.0f32; 4];

            // 1. Sweep arcs over the upper half. ─────────────────
            let dx = px - arc_centre.0;
            let dy = py - arc_centre.1;
            let dist = (dx * dx + dy * dy).sqrt();
            let angle = dy.atan2(dx).to_degrees();
            // Screen space: upward is negative y, so the upper half is
            // angles in (-180, 0). Fade the tips out.
            if (-160.0..=-20.0).contains(&angle) {
                let tip_fade = ((angle + 160.0).min(-20.0 - angle) / 25.0).clamp(0.0, 1.0);
                for &(radius, rgb) in &arcs {
                    let cover = coverage(-(dist - radius).abs() + arc_half_width);
                    blend(&mut out, rgb, cover * tip_fade);
                }
            }

            // 2. Enclosure. ──────────────────────────────────────
            let d_body = rounded_rect_distance(px, py, body, body_radius);
            let body_cover = coverage(-d_body);
            if body_cover > 0.0 {
                let t = ((py - body.1) / (body.3 - body.1)).clamp(0.0, 1.0);
                let top = [0x4c, 0x52, 0x66];
                let bottom = [0x2c, 0x30, 0x40];
                let rgb = [
                    lerp(top[0], bottom[0], t),
                    lerp(top[1], bottom[1], t),
                    lerp(top[2], bottom[2], t),
                ];
                blend(&mut out, rgb, body_cover);

                // Bevel: a lighter rim just inside the edge.
                let rim = coverage(-(d_body + s * 0.02).abs() + s * 0.008);
                blend(&mut out, [0x6c, 0x72, 0x86], rim * body_cover * 0.6);
            }

            // 3. Usage strip: track, then a fill from green to pink. ─
            let d_strip = rounded_rect_distance(px, py, strip, s * 0.02);
            let strip_cover = coverage(-d_strip);
            if strip_cover > 0.0 {
                blend(&mut out, [0x1e, 0x1e, 0x2e], strip_cover);
                let fill_end = strip.0 + (strip.2 - strip.0) * 0.72;
                if px < fill_end {
                    let t = ((px - strip.0) / (fill_end - strip.0)).clamp(0.0, 1.0);
                    let rgb = [lerp(0xa6, 0xf3, t), lerp(0xe3, 0x8b, t), lerp(0xa1, 0xa8, t)];
                    let inset = coverage(-d_strip - s * 0.012);
                    blend(&mut out, rgb, inset);
                }
            }

            // 4. Activity LED. ───────────────────────────────────
            let ldx = px - led.0;
            let ldy = py - led.1;
            let led_dist = (ldx * ldx + ldy * ldy).sqrt();
            let glow = (1.0 - led_dist / (led.2 * 2.2)).clamp(0.0, 1.0) * 0.35;
            blend(&mut out, [0xa6, 0xe3, 0xa1], glow * body_cover);
            blend(&mut out, [0xa6, 0xe3, 0xa1], coverage(led.2 - led_dist));

            let idx = ((y * size + x) * 4) as usize;
            pixels[idx] = out[0].round().clamp(0.0, 255.0) as u8;
            pixels[idx + 1] = out[1].round().clamp(0.0, 255.0) as u8;
            pixels[idx + 2] = out[2].round().clamp(0.0, 255.0) as u8;
            pixels[idx + 3] = (out[3] * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }

    pixels
}

/// Encode a multi-resolution `.ico` (32-bit BMP entries) from [`render`].
pub fn encode_ico(sizes: &[u32]) -> Vec<u8> {
    let images: Vec<(u32, Vec<u8>)> = sizes
        .iter()
        .map(|&size| (size, ico_bitmap(&render(size), size)))
        .collect();

    let mut ico = Vec::new();
    ico.extend_from_slice(&0u16.to_le_bytes()); // reserved
    ico.extend_from_slice(&1u16.to_le_bytes()); // type: icon
    ico.extend_from_slice(&(images.len() as u16).to_le_bytes());

    let mut offset = 6 + 16 * images.len();
    for (size, bmp) in &images {
        let dim = if *size >= 256 { 0 } else { *size as u8 };
        ico.extend_from_slice(&[dim, dim, 0, 0]);
        ico.extend_from_slice(&1u16.to_le_bytes()); // planes
        ico.extend_from_slice(&32u16.to_le_bytes()); // bpp
        ico.extend_from_slice(&(bmp.len() as u32).to_le_bytes());
        ico.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += bmp.len();
    }
    for (_, bmp) in &images {
        ico.extend_from_slice(bmp);
    }
    ico
}

/// BITMAPINFOHEADER + bottom-up BGRA pixels + AND mask.
fn ico_bitmap(rgba: &[u8], size: u32) -> Vec<u8> {
    let mut bmp = Vec::new();
    bmp.extend_from_slice(&40u32.to_le_bytes());
    bmp.extend_from_slice(&(size as i32).to_le_bytes());
    // Height covers XOR and AND masks.
    bmp.extend_from_slice(&(size as i32 * 2).to_le_bytes());
    bmp.extend_from_slice(&1u16.to_le_bytes());
    bmp.extend_from_slice(&32u16.to_le_bytes());
    bmp.extend_from_slice(&[0u8; 24]);

    for y in (0..size).rev() {
        for x in 0..size {
            let i = ((y * size + x) * 4) as usize;
            bmp.extend_from_slice(&[rgba[i + 2], rgba[i + 1], rgba[i], rgba[i + 3]]);
        }
    }

    let row_bytes = size.div_ceil(32) * 4;
    for y in (0..size).rev() {
        let mut row = vec![0u8; row_bytes as usize];
        for x in 0..size {
            if rgba[((y * size + x) * 4 + 3) as usize] < 128 {
                row[(x / 8) as usize] |= 0x80 >> (x % 8);
            }
        }
        bmp.extend_from_slice(&row);
    }
    bmp
}

// ── Helpers ─────────────────────────────────────────────────────

/// Signed distance to a rounded rectangle `(x0, y0, x1, y1)`; negative inside.
fn rounded_rect_distance(px: f32, py: f32, rect: (f32, f32, f32, f32), radius: f32) -> f32 {
    let (x0, y0, x1, y1) = rect;
    let qx = (px - (x0 + x1) * 0.5).abs() - ((x1 - x0) * 0.5 - radius);
    let qy = (py - (y0 + y1) * 0.5).abs() - ((y1 - y0) * 0.5 - radius);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

/// One-pixel anti-aliased coverage for a signed "inside" distance.
fn coverage(inside: f32) -> f32 {
    (inside + 0.5).clamp(0.0, 1.0)
}

/// Source-over composite of an opaque colour at `alpha` onto `dst`.
fn blend(dst: &mut [f32; 4], rgb: [u8; 3], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let out_a = alpha + dst[3] * (1.0 - alpha);
    for c in 0..3 {
        let src = rgb[c] as f32;
        dst[c] = if out_a > 0.0 {
            (src * alpha + dst[c] * dst[3] * (1.0 - alpha)) / out_a
        } else {
            0.0
        };
    }
    dst[3] = out_a;
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 * (1.0 - t) + b as f32 * t).round().clamp(0.0, 255.0) as u8
}
