use serde::{Deserialize, Serialize};

use crate::error::RmError;

/// Career hierarchy level, totally ordered from associate to executive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    Associate,
    Supervisor,
    Manager,
    Director,
    Executive,
}

impl Default for HierarchyLevel {
    fn default() -> Self {
        Self::Associate
    }
}

impl std::str::FromStr for HierarchyLevel {
    type Err = RmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "associate" => Ok(Self::Associate),
            "supervisor" => Ok(Self::Supervisor),
            "manager" => Ok(Self::Manager),
            "director" => Ok(Self::Director),
            "executive" => Ok(Self::Executive),
            other => Err(RmError::Validation(format!(
                "invalid hierarchy level: {other} (expected associate, supervisor, manager, director, or executive)"
            ))),
        }
    }
}

impl std::fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Associate => write!(f, "associate"),
            Self::Supervisor => write!(f, "supervisor"),
            Self::Manager => write!(f, "manager"),
            Self::Director => write!(f, "director"),
            Self::Executive => write!(f, "executive"),
        }
    }
}

/// Free-text description of a person's job, constructed per request.
///
/// Immutable value object; never persisted directly. The derived
/// [`search_text`](Self::search_text) is the single query string used
/// for both embedding and keyword search, so its construction must stay
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub level: HierarchyLevel,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
}

impl JobDescription {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            industry: None,
            level: HierarchyLevel::default(),
            requirements: None,
            responsibilities: None,
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_level(mut self, level: HierarchyLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }

    pub fn with_responsibilities(mut self, responsibilities: impl Into<String>) -> Self {
        self.responsibilities = Some(responsibilities.into());
        self
    }

    /// Deterministic concatenation of title + level + description
    /// (+ requirements/responsibilities when present). Used as the one
    /// query string for embedding generation.
    pub fn search_text(&self) -> String {
        let mut parts = vec![
            self.title.trim().to_string(),
            self.level.to_string(),
            self.description.trim().to_string(),
        ];
        if let Some(req) = &self.requirements {
            if !req.trim().is_empty() {
                parts.push(req.trim().to_string());
            }
        }
        if let Some(resp) = &self.responsibilities {
            if !resp.trim().is_empty() {
                parts.push(resp.trim().to_string());
            }
        }
        parts.join(" ")
    }

    /// Text-query string for the keyword leg of a hybrid search.
    pub fn text_query(&self) -> String {
        format!("{} {}", self.title.trim(), self.description.trim())
    }
}
