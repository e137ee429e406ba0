use serde::{Deserialize, Serialize};

/// Performance category assigned to a cell or a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Performance-Critical")]
    PerformanceCritical,
    #[serde(rename = "CPU-Intensive")]
    CpuIntensive,
    #[serde(rename = "Loop-Intensive")]
    LoopIntensive,
    #[serde(rename = "Memory-Intensive")]
    MemoryIntensive,
    Normal,
}

/// Display color token handed to the editor decoration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationColor {
    Red,
    Orange,
    Green,
    Purple,
    Gray,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::PerformanceCritical,
        Category::CpuIntensive,
        Category::LoopIntensive,
        Category::MemoryIntensive,
        Category::Normal,
    ];

    /// Label as written by the profiler and shown in cell summaries
    pub fn label(&self) -> &'static str {
        match self {
            Category::PerformanceCritical => "Performance-Critical",
            Category::CpuIntensive => "CPU-Intensive",
            Category::LoopIntensive => "Loop-Intensive",
            Category::MemoryIntensive => "Memory-Intensive",
            Category::Normal => "Normal",
        }
    }

    /// Parse a label, falling back to `Normal` for anything unrecognised
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == label)
            .unwrap_or(Category::Normal)
    }

    pub fn color(&self) -> AnnotationColor {
        match self {
            Category::PerformanceCritical => AnnotationColor::Red,
            Category::CpuIntensive => AnnotationColor::Orange,
            Category::LoopIntensive => AnnotationColor::Green,
            Category::MemoryIntensive => AnnotationColor::Purple,
            Category::Normal => AnnotationColor::Gray,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl AnnotationColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationColor::Red => "red",
            AnnotationColor::Orange => "orange",
            AnnotationColor::Green => "green",
            AnnotationColor::Purple => "purple",
            AnnotationColor::Gray => "gray",
        }
    }
}

impl std::fmt::Display for AnnotationColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
