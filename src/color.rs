use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour map for the correlation heatmap
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

/// Histogram bar / KDE colour.
pub const HISTOGRAM_FILL: Color32 = Color32::from_rgb(135, 206, 235);
/// Colour for cells with an undefined coefficient.
pub const UNDEFINED: Color32 = Color32::from_gray(90);

fn linear(rgb: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(rgb.0, rgb.1, rgb.2).into_format::<f32>().into_linear()
}

/// Map a correlation coefficient in `[-1, 1]` to a blue–grey–red colour,
/// mixing in linear RGB. `NaN` maps to [`UNDEFINED`].
pub fn coolwarm(value: f64) -> Color32 {
    if value.is_nan() {
        return UNDEFINED;
    }
    let t = value.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        linear(NEUTRAL).mix(linear(COOL), -t)
    } else {
        linear(NEUTRAL).mix(linear(WARM), t)
    };
    let rgb: Srgb<u8> = Srgb::from_linear(mixed);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color32, b: Color32) -> bool {
        a.r().abs_diff(b.r()) <= 1 && a.g().abs_diff(b.g()) <= 1 && a.b().abs_diff(b.b()) <= 1
    }

    #[test]
    fn test_coolwarm_endpoints() {
        assert!(close(coolwarm(-1.0), Color32::from_rgb(59, 76, 192)));
        assert!(close(coolwarm(0.0), Color32::from_rgb(221, 221, 221)));
        assert!(close(coolwarm(1.0), Color32::from_rgb(180, 4, 38)));
        assert_eq!(coolwarm(f64::NAN), UNDEFINED);
    }

    #[test]
    fn test_coolwarm_is_warmer_for_positive_values() {
        let c = coolwarm(0.5);
        assert!(c.r() > c.b());
        let c = coolwarm(-0.5);
        assert!(c.b() > c.r());
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(contrasting_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrasting_text(Color32::from_rgb(59, 76, 192)), Color32::WHITE);
    }
}
