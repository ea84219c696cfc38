//! Gherkin steps and their source locations

use crate::{DataTable, DocString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a node in a feature file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The optional block argument under a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MultilineArgument {
    #[default]
    None,
    DataTable(DataTable),
    DocString(DocString),
}

impl MultilineArgument {
    pub fn is_none(&self) -> bool {
        matches!(self, MultilineArgument::None)
    }

    pub fn is_data_table(&self) -> bool {
        matches!(self, MultilineArgument::DataTable(_))
    }

    pub fn is_doc_string(&self) -> bool {
        matches!(self, MultilineArgument::DocString(_))
    }

    pub fn as_data_table(&self) -> Option<&DataTable> {
        match self {
            MultilineArgument::DataTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_doc_string(&self) -> Option<&DocString> {
        match self {
            MultilineArgument::DocString(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<DataTable> for MultilineArgument {
    fn from(table: DataTable) -> Self {
        MultilineArgument::DataTable(table)
    }
}

impl From<DocString> for MultilineArgument {
    fn from(doc: DocString) -> Self {
        MultilineArgument::DocString(doc)
    }
}

/// A single Gherkin step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    language: String,
    location: Location,
    keyword: String,
    name: String,
    #[serde(default)]
    multiline_arg: MultilineArgument,
}

impl Step {
    /// `keyword` keeps its trailing space as written in the source (`"Given "`).
    pub fn new(
        language: impl Into<String>,
        location: Location,
        keyword: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            location,
            keyword: keyword.into(),
            name: name.into(),
            multiline_arg: MultilineArgument::None,
        }
    }

    pub fn with_multiline_arg(mut self, arg: impl Into<MultilineArgument>) -> Self {
        self.multiline_arg = arg.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiline_arg(&self) -> &MultilineArgument {
        &self.multiline_arg
    }

    /// Keyword and name as they read in the feature file.
    pub fn text(&self) -> String {
        format!("{}{}", self.keyword, self.name)
    }
}
