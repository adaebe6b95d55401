use serde::Serialize;

use crate::text::TextContent;
use crate::transform::{Transform, Viewport};

const DEFAULT_ASCENT: f64 = 1.0;

/// A text run resolved to screen coordinates inside the page wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedSpan {
    pub text: String,
    pub left: f64,
    pub top: f64,
    pub font_size: f64,
    pub font_family: Option<String>,
    /// Clockwise rotation in radians; zero for horizontal text.
    pub angle: f64,
}

/// Everything needed to draw one page of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayer {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub spans: Vec<PositionedSpan>,
}

/// Places every non-empty run of `content` on a viewport-sized page.
///
/// Each run's matrix is composed with the viewport transform and a vertical
/// flip; the flipped matrix's vertical scale becomes the font size and its
/// translation the baseline origin. Runs with degenerate matrices are dropped.
pub fn layout_page(page_number: usize, viewport: &Viewport, content: &TextContent) -> PageLayer {
    let mut spans = Vec::with_capacity(content.items.len());

    for run in &content.items {
        if run.text.is_empty() {
            continue;
        }

        let tx = viewport
            .transform
            .compose(&run.transform)
            .compose(&Transform::VERTICAL_FLIP);
        if !tx.is_finite() {
            continue;
        }

        let font_size = tx.vertical_scale();
        let style = content.style_for(run);
        let ascent = style
            .and_then(|s| s.ascent)
            .filter(|a| *a > 0.0)
            .unwrap_or(DEFAULT_ASCENT);
        let (left, baseline) = tx.translation();
        let angle = tx.angle();

        spans.push(PositionedSpan {
            text: run.text.clone(),
            left,
            top: baseline - font_size * ascent,
            font_size,
            font_family: style.and_then(|s| s.font_family.clone()),
            angle: if angle.abs() < 1e-6 { 0.0 } else { angle },
        });
    }

    PageLayer {
        page_number,
        width: viewport.width,
        height: viewport.height,
        spans,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::text::{FontStyle, TextRun};

    fn content(items: Vec<TextRun>) -> TextContent {
        TextContent {
            items,
            styles: HashMap::new(),
        }
    }

    #[test]
    fn horizontal_run_is_placed_above_its_baseline() {
        let viewport = Viewport::for_page(612.0, 792.0, 1.5);
        let run = TextRun::new("Title", Transform::new(12.0, 0.0, 0.0, 12.0, 72.0, 700.0));
        let layer = layout_page(1, &viewport, &content(vec![run]));

        assert_eq!(layer.width, 918.0);
        assert_eq!(layer.height, 1188.0);
        let span = &layer.spans[0];
        assert!((span.font_size - 18.0).abs() < 1e-9);
        assert!((span.left - 108.0).abs() < 1e-9);
        // baseline at (792 - 700) * 1.5 = 138, minus one font size
        assert!((span.top - 120.0).abs() < 1e-9);
        assert_eq!(span.angle, 0.0);
    }

    #[test]
    fn font_ascent_and_family_come_from_styles() {
        let viewport = Viewport::for_page(100.0, 100.0, 1.0);
        let run = TextRun::new("x", Transform::new(10.0, 0.0, 0.0, 10.0, 0.0, 50.0))
            .with_font("f1");
        let mut styles = HashMap::new();
        styles.insert(
            "f1".to_string(),
            FontStyle {
                font_family: Some("sans-serif".into()),
                ascent: Some(0.8),
                descent: Some(-0.2),
                vertical: false,
            },
        );
        let layer = layout_page(
            1,
            &viewport,
            &TextContent {
                items: vec![run],
                styles,
            },
        );

        let span = &layer.spans[0];
        assert_eq!(span.font_family.as_deref(), Some("sans-serif"));
        assert!((span.top - 42.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_degenerate_runs_are_skipped() {
        let viewport = Viewport::for_page(100.0, 100.0, 1.0);
        let layer = layout_page(
            2,
            &viewport,
            &content(vec![
                TextRun::new("", Transform::IDENTITY),
                TextRun::new("nan", Transform::new(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0)),
                TextRun::new("ok", Transform::IDENTITY),
            ]),
        );
        assert_eq!(layer.page_number, 2);
        assert_eq!(layer.spans.len(), 1);
        assert_eq!(layer.spans[0].text, "ok");
    }

    #[test]
    fn rotated_run_reports_angle() {
        let viewport = Viewport::for_page(100.0, 100.0, 1.0);
        let run = TextRun::new("up", Transform::new(0.0, 10.0, -10.0, 0.0, 20.0, 20.0));
        let layer = layout_page(1, &viewport, &content(vec![run]));
        let span = &layer.spans[0];
        assert!((span.font_size - 10.0).abs() < 1e-9);
        assert!((span.angle + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
