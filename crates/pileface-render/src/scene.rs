//! Frame layout for the terminal renderer.

use pileface_flip::CoinFlipResult;

use crate::canvas::{COIN, COIN_TEXT, Canvas, Cell, STATUS};
use crate::sprite::CoinSprite;

/// Largest coin radius, in rows.
const MAX_RADIUS: f64 = 4.0;

/// Rows reserved under the coins for the caption.
const CAPTION_ROWS: i32 = 4;

/// Terminal cells are about twice as tall as wide.
const ASPECT: f64 = 2.0;

/// Everything drawn on one frame.
pub struct Scene<'a> {
    pub diagram: &'a [String],
    pub status: &'a str,
    pub coins: &'a [CoinSprite],
    pub caption: Option<&'a CoinFlipResult>,
    pub hint: Option<&'a str>,
}

/// Radius that fits `coins` coins side by side in a `width × height` frame.
pub fn coin_radius(coins: usize, width: u16, height: u16, diagram_rows: usize) -> f64 {
    let coins = coins.max(1) as f64;
    let by_width = (f64::from(width) / coins - 2.0) / (2.0 * ASPECT);
    let free_rows = f64::from(height) - diagram_rows as f64 - 3.0 - f64::from(CAPTION_ROWS);
    // The bounce lifts a coin by up to three quarters of its radius.
    let by_height = (free_rows - 1.0) / 2.75;
    by_width.min(by_height).clamp(1.0, MAX_RADIUS).floor()
}

impl Scene<'_> {
    /// Draw the scene into a fresh canvas.
    pub fn compose(&self, width: u16, height: u16) -> Canvas {
        let mut canvas = Canvas::new(width, height);

        let mut row = 1;
        for line in self.diagram {
            canvas.text(2, row, line, STATUS);
            row += 1;
        }
        row += 1;
        canvas.centered_text(row, self.status, STATUS);

        let baseline = i32::from(height) - CAPTION_ROWS - 1;
        self.draw_coins(&mut canvas, baseline);

        if let Some(result) = self.caption {
            if result.len() == 1 {
                if let Some(outcome) = result.first() {
                    canvas.centered_text(baseline + 1, &spaced(outcome.label()), COIN);
                }
            }
            canvas.centered_text(baseline + 2, &result.to_string(), STATUS);
        }
        if let Some(hint) = self.hint {
            canvas.centered_text(baseline + 3, hint, STATUS);
        }

        canvas
    }

    fn draw_coins(&self, canvas: &mut Canvas, baseline: i32) {
        let n = self.coins.len();
        if n == 0 {
            return;
        }
        let slot = f64::from(canvas.width()) / n as f64;

        for (i, coin) in self.coins.iter().enumerate() {
            let radius = coin.radius();
            let pose = coin.pose();
            let cx = slot * (i as f64 + 0.5);
            let rest_cy = f64::from(baseline) - radius;
            let cy = rest_cy - pose.lift;

            canvas.ellipse(cx, cy, radius * ASPECT, pose.height / 2.0);

            if let Some(letter) = pose.face {
                canvas.put(
                    cx.floor() as i32,
                    cy.floor() as i32,
                    Cell {
                        ch: letter,
                        fg: COIN_TEXT,
                        bg: COIN,
                    },
                );
            }
        }
    }
}

fn spaced(label: &str) -> String {
    let letters: Vec<String> = label.chars().map(String::from).collect();
    letters.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pileface_flip::Outcome;

    fn lines_containing(canvas: &Canvas, needle: &str) -> usize {
        canvas.lines().iter().filter(|l| l.contains(needle)).count()
    }

    #[test]
    fn test_radius_fits() {
        assert_eq!(coin_radius(1, 80, 24, 1), 4.0);
        assert_eq!(coin_radius(6, 80, 24, 6), 2.0);
        assert_eq!(coin_radius(20, 80, 40, 20), 1.0);
    }

    #[test]
    fn test_resting_coin_shows_letter() {
        let diagram = vec!["q0: ──┤H├──┤M├══ c0".to_string()];
        let coins = vec![CoinSprite::new(3.0)];
        let scene = Scene {
            diagram: &diagram,
            status: "Flipping on simulator...",
            coins: &coins,
            caption: None,
            hint: None,
        };
        let canvas = scene.compose(60, 24);

        assert_eq!(lines_containing(&canvas, "q0: ──┤H├"), 1);
        assert_eq!(lines_containing(&canvas, "Flipping on simulator..."), 1);
        assert_eq!(lines_containing(&canvas, "H"), 2);
        assert!(canvas.rows().flatten().any(|c| c.ch == 'H' && c.bg == COIN));
    }

    #[test]
    fn test_settled_caption() {
        let mut coin = CoinSprite::new(3.0);
        coin.flip_to(Outcome::Tails, 1);
        coin.tick();
        let coins = vec![coin];
        let result = CoinFlipResult::new(vec![Outcome::Tails], "simulator");
        let scene = Scene {
            diagram: &[],
            status: "",
            coins: &coins,
            caption: Some(&result),
            hint: Some("press any key"),
        };
        let canvas = scene.compose(60, 24);

        assert_eq!(lines_containing(&canvas, "T A I L S"), 1);
        assert_eq!(lines_containing(&canvas, "Results: 0 Heads, 1 Tails"), 1);
        assert_eq!(lines_containing(&canvas, "press any key"), 1);
        assert!(canvas.rows().flatten().any(|c| c.ch == 'T' && c.fg == COIN_TEXT));
    }

    #[test]
    fn test_multi_coin_has_no_big_label() {
        let coins = vec![CoinSprite::new(2.0), CoinSprite::new(2.0)];
        let result = CoinFlipResult::new(vec![Outcome::Heads, Outcome::Tails], "sim");
        let scene = Scene {
            diagram: &[],
            status: "",
            coins: &coins,
            caption: Some(&result),
            hint: None,
        };
        let canvas = scene.compose(60, 24);

        assert_eq!(lines_containing(&canvas, "H E A D S"), 0);
        assert_eq!(lines_containing(&canvas, "Results: 1 Heads, 1 Tails"), 1);
    }

    #[test]
    fn test_flipping_coin_has_no_letter() {
        let mut coin = CoinSprite::new(3.0);
        coin.flip_to(Outcome::Heads, 30);
        coin.tick();
        let coins = vec![coin];
        let scene = Scene {
            diagram: &[],
            status: "",
            coins: &coins,
            caption: None,
            hint: None,
        };
        let canvas = scene.compose(60, 24);

        assert!(!canvas.rows().flatten().any(|c| c.fg == COIN_TEXT));
    }
}
