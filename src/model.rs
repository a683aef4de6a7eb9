//! Records shared by every stage.

use std::fmt;

/// One listing entry as extracted by normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
}

impl Movie {
    pub fn new(id: i64, title: impl Into<String>, year: i32) -> Self {
        Movie {
            id,
            title: title.into(),
            year,
        }
    }
}

/// Content category. Declaration order is rule priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Documentary,
    Animation,
    SequelSeries,
    Movie,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Documentary => "Documentary",
            Category::Animation => "Animation",
            Category::SequelSeries => "Sequel/Series",
            Category::Movie => "Movie",
        }
    }

    /// Relational table (and artifact stem) this category is stored under.
    pub fn table_name(self) -> String {
        table_name(self.label())
    }

    pub fn artifact_name(self) -> String {
        format!("{}.parquet", self.table_name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-cases a label and replaces `/` and spaces with `_`.
pub fn table_name(label: &str) -> String {
    label.to_lowercase().replace(['/', ' '], "_")
}
