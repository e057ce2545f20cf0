//! Configuration for the layout engine

use serde::Deserialize;

/// Configuration options for placement computation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Distance kept from every slide edge
    pub margin: f64,

    /// Grid that sanitized rectangles snap to
    pub grid: f64,

    /// Minimum size of any sanitized rectangle (width, height)
    pub min_size: (f64, f64),

    /// Minimum size a search candidate must have to be scored (width, height)
    pub candidate_min_size: (f64, f64),

    /// Desired width of new content as a fraction of slide width
    pub width_ratio: f64,

    /// Lower bound for the desired width
    pub min_desired_width: f64,

    /// Clamp for the desired height estimated from content
    pub height_range: (f64, f64),

    /// Vertical stride of the grid sweep
    pub sweep_stride: f64,

    /// Horizontal start positions of the grid sweep, as fractions of slide width
    pub sweep_columns: Vec<f64>,

    /// Gap between the title and the candidate placed below it
    pub title_gap: f64,

    /// Gap between an occupied rectangle and the candidate placed below it
    pub stack_gap: f64,

    pub scoring: ScoringWeights,

    pub title: TitleDetection,

    pub text: TextEstimate,

    pub subtitle: SubtitleConfig,
}

/// Weights of the candidate scoring function
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScoringWeights {
    pub overlap: f64,
    pub center: f64,
    pub top: f64,
    pub hint: f64,
}

/// Heuristics for recognising the slide title
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TitleDetection {
    /// Title must start above this fraction of slide height
    pub max_top_ratio: f64,
    /// Title must span at least this fraction of slide width
    pub min_width_ratio: f64,
    /// Title text must be shorter than this many characters
    pub max_chars: usize,
}

/// Text measurement estimates
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TextEstimate {
    /// Characters per line assumed when estimating box height
    pub chars_per_line: usize,
    /// Font size assumed when estimating box height
    pub font_size: f64,
    /// Bulleted text longer than this many lines is truncated
    pub max_bullet_lines: usize,
    /// Lines kept after truncation on short slides / tall slides
    pub kept_lines: (usize, usize),
    /// Slide height from which the larger kept-line count applies
    pub tall_slide_height: f64,
}

/// Geometry of the subtitle reservation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SubtitleConfig {
    /// Subtitle width as a fraction of slide width
    pub width_ratio: f64,
    /// Gap between title bottom and subtitle top
    pub gap: f64,
    /// Clamp for the desired subtitle height
    pub height_range: (f64, f64),
    /// Extra room required below the subtitle before content is shifted
    pub buffer: f64,
    /// Height cap when there is no lower content
    pub compact_max_height: f64,
    /// Smallest subtitle height ever produced
    pub min_height: f64,
    /// Longest text treated as a subtitle
    pub max_chars: usize,
    /// Shifted shapes must end at least this far above the slide bottom
    pub bottom_margin: f64,
    /// Font size assumed when estimating subtitle height
    pub font_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 24.0,
            grid: 4.0,
            min_size: (260.0, 44.0),
            candidate_min_size: (260.0, 90.0),
            width_ratio: 0.76,
            min_desired_width: 420.0,
            height_range: (120.0, 320.0),
            sweep_stride: 12.0,
            sweep_columns: vec![0.12, 0.18],
            title_gap: 18.0,
            stack_gap: 12.0,
            scoring: ScoringWeights::default(),
            title: TitleDetection::default(),
            text: TextEstimate::default(),
            subtitle: SubtitleConfig::default(),
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            overlap: 2000.0,
            center: 1.8,
            top: 1.1,
            hint: 0.35,
        }
    }
}

impl Default for TitleDetection {
    fn default() -> Self {
        Self {
            max_top_ratio: 0.38,
            min_width_ratio: 0.38,
            max_chars: 120,
        }
    }
}

impl Default for TextEstimate {
    fn default() -> Self {
        Self {
            chars_per_line: 55,
            font_size: 20.0,
            max_bullet_lines: 22,
            kept_lines: (16, 20),
            tall_slide_height: 520.0,
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            width_ratio: 0.74,
            gap: 10.0,
            height_range: (48.0, 92.0),
            buffer: 6.0,
            compact_max_height: 88.0,
            min_height: 44.0,
            max_chars: 180,
            bottom_margin: 20.0,
            font_size: 22.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide edge margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the snapping grid
    pub fn with_grid(mut self, grid: f64) -> Self {
        self.grid = grid;
        self
    }

    /// Set the minimum sanitized size
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_size = (width, height);
        self
    }

    /// Set the grid sweep stride
    pub fn with_sweep_stride(mut self, stride: f64) -> Self {
        self.sweep_stride = stride;
        self
    }

    /// Set the candidate scoring weights
    pub fn with_scoring(mut self, scoring: ScoringWeights) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the subtitle reservation geometry
    pub fn with_subtitle(mut self, subtitle: SubtitleConfig) -> Self {
        self.subtitle = subtitle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.margin, 24.0);
        assert_eq!(config.grid, 4.0);
        assert_eq!(config.min_size, (260.0, 44.0));
        assert_eq!(config.candidate_min_size, (260.0, 90.0));
        assert_eq!(config.height_range, (120.0, 320.0));
        assert_eq!(config.scoring.overlap, 2000.0);
        assert_eq!(config.subtitle.height_range, (48.0, 92.0));
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new().with_margin(16.0).with_grid(8.0);

        assert_eq!(config.margin, 16.0);
        assert_eq!(config.grid, 8.0);
        assert_eq!(config.sweep_stride, 12.0);
    }

    #[test]
    fn test_partial_toml() {
        let config: LayoutConfig = toml::from_str(
            r#"
            margin = 32.0
            [subtitle]
            gap = 14.0
            "#,
        )
        .unwrap();

        assert_eq!(config.margin, 32.0);
        assert_eq!(config.subtitle.gap, 14.0);
        assert_eq!(config.subtitle.buffer, 6.0);
        assert_eq!(config.grid, 4.0);
    }
}
