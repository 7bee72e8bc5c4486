//! Static role → question → answer catalog.
//!
//! The catalog is loaded once at startup from a single artifact (the embedded
//! `data/catalog.json` unless configured otherwise), validated, and then shared
//! read-only across all request handlers without synchronization.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The canonical catalog compiled into the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

/// A related link shown next to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

/// On-disk shape of the catalog artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub roles: Vec<RoleDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<ResourceLink>,
    pub questions: Vec<QuestionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub question: String,
    pub answer: String,
}

fn default_version() -> u32 {
    1
}

/// One role bucket: its metadata plus the ordered question → answer map.
#[derive(Debug, Clone)]
pub struct RoleEntry {
    name: String,
    description: String,
    resources: Vec<ResourceLink>,
    answers: IndexMap<String, String>,
}

impl RoleEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn resources(&self) -> &[ResourceLink] {
        &self.resources
    }

    /// Number of canned questions registered under this role.
    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    /// Questions in display order.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }
}

/// Immutable two-level mapping of role → question → canned answer.
#[derive(Debug, Clone)]
pub struct AnswerCatalog {
    version: u32,
    roles: IndexMap<String, RoleEntry>,
}

impl AnswerCatalog {
    /// Load the catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    /// Load from an external artifact. `.yaml`/`.yml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        tracing::info!(path = %path.display(), yaml = is_yaml, "Loading answer catalog from file");

        if is_yaml {
            Self::from_yaml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    /// Load either the configured file or the embedded artifact.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(raw)
            .map_err(|e| Error::Catalog(format!("Invalid catalog JSON: {}", e)))?;
        Self::from_document(document)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let document: CatalogDocument = serde_yaml::from_str(raw)
            .map_err(|e| Error::Catalog(format!("Invalid catalog YAML: {}", e)))?;
        Self::from_document(document)
    }

    /// Build and validate a catalog from its document form.
    ///
    /// Rejects empty catalogs, blank or duplicate role names, roles without
    /// questions, blank or duplicate questions within a role, and blank answers.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        if document.roles.is_empty() {
            return Err(Error::Catalog("Catalog defines no roles".to_string()));
        }

        let mut roles = IndexMap::with_capacity(document.roles.len());

        for role in document.roles {
            if role.name.trim().is_empty() {
                return Err(Error::Catalog("Role name cannot be blank".to_string()));
            }
            if roles.contains_key(&role.name) {
                return Err(Error::Catalog(format!("Duplicate role: {}", role.name)));
            }
            if role.questions.is_empty() {
                return Err(Error::Catalog(format!(
                    "Role '{}' has no questions",
                    role.name
                )));
            }

            let mut answers = IndexMap::with_capacity(role.questions.len());
            for entry in role.questions {
                if entry.question.trim().is_empty() {
                    return Err(Error::Catalog(format!(
                        "Role '{}' has a blank question",
                        role.name
                    )));
                }
                if entry.answer.trim().is_empty() {
                    return Err(Error::Catalog(format!(
                        "Question '{}' under role '{}' has a blank answer",
                        entry.question, role.name
                    )));
                }
                if answers.contains_key(&entry.question) {
                    return Err(Error::Catalog(format!(
                        "Duplicate question under role '{}': {}",
                        role.name, entry.question
                    )));
                }
                answers.insert(entry.question, entry.answer);
            }

            roles.insert(
                role.name.clone(),
                RoleEntry {
                    name: role.name,
                    description: role.description,
                    resources: role.resources,
                    answers,
                },
            );
        }

        let catalog = Self {
            version: document.version,
            roles,
        };

        tracing::debug!(
            version = catalog.version,
            roles = catalog.roles.len(),
            questions = catalog.question_count(),
            "Answer catalog validated"
        );

        Ok(catalog)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// All roles in catalog order.
    pub fn list_roles(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    }

    /// Role entries in catalog order.
    pub fn roles(&self) -> impl Iterator<Item = &RoleEntry> {
        self.roles.values()
    }

    /// Role metadata and question bucket.
    pub fn role(&self, role: &str) -> Result<&RoleEntry> {
        self.roles
            .get(role)
            .ok_or_else(|| Error::UnknownRole(role.to_string()))
    }

    /// Questions registered for `role`, in display order.
    pub fn list_questions(&self, role: &str) -> Result<Vec<&str>> {
        Ok(self.role(role)?.questions().collect())
    }

    /// The canned answer for `(role, question)`, exactly as authored.
    pub fn get_answer(&self, role: &str, question: &str) -> Result<&str> {
        let entry = self.role(role)?;
        entry
            .answers
            .get(question)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownQuestion {
                role: role.to_string(),
                question: question.to_string(),
            })
    }

    /// Total number of questions across all roles.
    pub fn question_count(&self) -> usize {
        self.roles.values().map(RoleEntry::question_count).sum()
    }

    /// Roles that register `question`. Used for diagnostics when a lookup misses.
    pub fn roles_with_question(&self, question: &str) -> Vec<&str> {
        self.roles
            .values()
            .filter(|entry| entry.answers.contains_key(question))
            .map(RoleEntry::name)
            .collect()
    }
}
