use crate::core::font::TextExtent;

/// Bounds and search parameters for [`fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConstraints {
    pub max_width: u32,
    pub max_height: u32,
    pub initial_size: u32,
    /// The search never measures at or below this size.
    pub min_size: u32,
    pub step: u32,
    /// Gap between lines as a fraction of the line height.
    pub line_gap_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedCaption {
    pub font_size: u32,
    pub line_height: u32,
    pub gap: u32,
    pub total_height: u32,
    pub max_line_width: u32,
    /// `false` when the size floor was reached without satisfying the bounds.
    pub fits: bool,
}

fn measure_block<F>(lines: &[&str], size: u32, line_gap_ratio: f64, measure: &F) -> FittedCaption
where
    F: Fn(&str, u32) -> TextExtent,
{
    let (max_line_width, line_height) = lines.iter().fold((0, 0), |(w, h), line| {
        let extent = measure(line, size);
        (w.max(extent.width), h.max(extent.height))
    });

    let n = lines.len() as u32;
    let gap = (line_height as f64 * line_gap_ratio) as u32;
    let total_height = n * line_height + n.saturating_sub(1) * gap;

    FittedCaption {
        font_size: size,
        line_height,
        gap,
        total_height,
        max_line_width,
        fits: false,
    }
}

/// Largest font size, walking down from `initial_size`, at which every line
/// fits the box. Best effort: when the floor is reached, the last measurement
/// is returned with `fits == false`.
pub fn fit<F>(lines: &[&str], constraints: &FitConstraints, measure: F) -> FittedCaption
where
    F: Fn(&str, u32) -> TextExtent,
{
    let step = constraints.step.max(1);
    let mut size = constraints.initial_size;

    loop {
        let mut block = measure_block(lines, size, constraints.line_gap_ratio, &measure);
        if block.max_line_width <= constraints.max_width
            && block.total_height <= constraints.max_height
        {
            block.fits = true;
            return block;
        }

        let next = size.saturating_sub(step);
        if next <= constraints.min_size {
            tracing::warn!(
                "caption does not fit {}x{} even at size {}",
                constraints.max_width,
                constraints.max_height,
                size
            );
            return block;
        }
        size = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Monospace stand-in: each char is 0.6 em wide, line height is the size.
    fn mono(text: &str, size: u32) -> TextExtent {
        TextExtent {
            width: (text.chars().count() as f32 * size as f32 * 0.6) as u32,
            height: size,
        }
    }

    fn constraints(max_width: u32, max_height: u32) -> FitConstraints {
        FitConstraints {
            max_width,
            max_height,
            initial_size: 250,
            min_size: 10,
            step: 2,
            line_gap_ratio: 0.22,
        }
    }

    const LINES: [&str; 2] = ["ARAÇ SAHİBİNE", "ULAŞMAK İÇİN KODU OKUT"];

    #[test]
    fn test_initial_size_kept_when_it_fits() {
        let fitted = fit(&["HI"], &constraints(10_000, 10_000), mono);
        assert!(fitted.fits);
        assert_eq!(fitted.font_size, 250);
        assert_eq!(fitted.total_height, 250);
    }

    #[test]
    fn test_picks_first_size_that_fits() {
        let fitted = fit(&LINES, &constraints(853, 327), mono);
        assert!(fitted.fits);
        assert!(fitted.max_line_width <= 853);
        assert!(fitted.total_height <= 327);

        // two units larger must break one of the bounds
        let bigger = measure_block(&LINES, fitted.font_size + 2, 0.22, &mono);
        assert!(bigger.max_line_width > 853 || bigger.total_height > 327);
    }

    #[test]
    fn test_block_height_includes_gaps() {
        let fitted = fit(&["A", "B", "C"], &constraints(10_000, 10_000), mono);
        assert_eq!(fitted.gap, 55);
        assert_eq!(fitted.total_height, 3 * 250 + 2 * 55);
    }

    #[test]
    fn test_floor_returns_best_effort() {
        let fitted = fit(&LINES, &constraints(5, 5), mono);
        assert!(!fitted.fits);
        assert_eq!(fitted.font_size, 12);
        assert!(fitted.max_line_width > 5);
    }

    #[test]
    fn test_initial_below_floor_measures_once() {
        let c = FitConstraints {
            initial_size: 8,
            ..constraints(1, 1)
        };
        let fitted = fit(&LINES, &c, mono);
        assert_eq!(fitted.font_size, 8);
        assert!(!fitted.fits);
    }

    #[test]
    fn test_shrinking_width_never_grows_font() {
        let mut previous = u32::MAX;
        for max_width in (50..=1200).rev().step_by(25) {
            let fitted = fit(&LINES, &constraints(max_width, 327), mono);
            assert!(fitted.font_size <= previous, "width {} grew the font", max_width);
            previous = fitted.font_size;
        }
    }
}
