use crate::config::Rgba8;

pub const SNOW_LINE: f32 = -0.95;
pub const GRASS_LINE: f32 = -0.25;
pub const ROCK_LINE: f32 = 0.5;

pub const BROWN: Rgba8 = Rgba8::new(165, 42, 42, 255);

/// Display colour for an unscaled elevation. Lower elevations sit higher on
/// screen, so the snow band is the most negative one.
pub fn classify(height: f32) -> Rgba8 {
    if height < SNOW_LINE {
        let c = channel(((height - SNOW_LINE) * 20.0) as i32 + 235);
        return Rgba8::new(c, c, c, 255);
    }
    if height < GRASS_LINE {
        let g = channel((height / -1.5 * 155.0) as i32 + 100);
        return Rgba8::new(0, g, 0, 255);
    }
    if height < ROCK_LINE {
        let r = channel(((height - GRASS_LINE) / 0.75 * 100.0 + 50.0) as i32);
        return Rgba8::new(r, 60, 0, 255);
    }
    BROWN
}

// Saturates instead of wrapping when an elevation strays past the band it was
// tuned for.
fn channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
