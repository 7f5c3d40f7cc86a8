use std::path::PathBuf;

pub const ALL_LABEL: &str = "All";

/// The analysis matrix and output settings. `None` in `directions` or
/// `years` means "no restriction" and is reported as `All`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub directions: Vec<Option<String>>,
    pub years: Vec<Option<i32>>,
    pub import_direction: String,
    pub export_direction: String,
    pub output_root: PathBuf,
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let import_direction = "Imports".to_string();
        let export_direction = "Exports".to_string();
        let mut years = vec![None];
        years.extend((2015..=2020).map(Some));

        Self {
            directions: vec![
                None,
                Some(import_direction.clone()),
                Some(export_direction.clone()),
            ],
            years,
            import_direction,
            export_direction,
            output_root: PathBuf::from("exploration"),
            top_n: crate::query::ranking::DEFAULT_TOP_N,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// `<root>/option_<n>/<direction>/<year>`
    pub fn slice_dir(&self, option: u8, direction: Option<&str>, year: Option<i32>) -> PathBuf {
        self.option_dir(option, direction).join(year_label(year))
    }

    /// `<root>/option_<n>/<direction>`
    pub fn option_dir(&self, option: u8, direction: Option<&str>) -> PathBuf {
        self.output_root
            .join(format!("option_{option}"))
            .join(direction.unwrap_or(ALL_LABEL))
    }
}

pub fn year_label(year: Option<i32>) -> String {
    year.map_or_else(|| ALL_LABEL.to_string(), |y| y.to_string())
}
