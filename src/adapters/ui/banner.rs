//! Startup banner: "DIETICIAN" in figlet's standard font with a gradient
//! from Singapore red to leafy green.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Singapore red (#ef3340).
const SG_RED: (u8, u8, u8) = (0xef, 0x33, 0x40);
/// Leafy green (#2e8b57), the vegetable quarter of the plate.
const LEAF_GREEN: (u8, u8, u8) = (0x2e, 0x8b, 0x57);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

fn render_art(text: &str) -> Option<String> {
    let font = FIGfont::standard().ok()?;
    font.convert(text).map(|figure| figure.to_string())
}

/// Prints the banner, the version and the address the UI will listen on.
/// Falls back to plain text when the figlet font cannot be loaded.
pub fn print_welcome(listen_on: &str) {
    let mut out = stdout();
    let art = render_art("DIETICIAN").unwrap_or_else(|| "SINGAPORE AI DIETICIAN".to_string());
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len();

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(SG_RED, LEAF_GREEN, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: LEAF_GREEN.0,
        g: LEAF_GREEN.1,
        b: LEAF_GREEN.2,
    }));
    let _ = out.execute(Print(format!(
        "v{}  Singapore AI Dietician\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(Print(format!("Open http://{}/ in your browser\r\n", listen_on)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
