//! The catalog of templates new chunks are drawn from.
//!
//! The catalog is built once per session and is read-only afterwards.
//! Building it drops missing or invalid entries, sorts by name so draws are
//! reproducible regardless of authoring order, and collapses duplicate names
//! keeping the first occurrence.

use std::sync::Arc;

use ahash::AHashSet;
use ledge_common::{LevelError, LevelResult, SchemaVersion};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::template::{ChunkTemplate, TemplateError};

/// Diagnostics collected while building a catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogReport {
    /// Entries that were missing (`None`)
    pub missing: usize,
    /// Entries that failed validation, by name
    pub rejected: Vec<(String, TemplateError)>,
    /// Names that appeared more than once; only the first was kept
    pub duplicates: Vec<String>,
}

impl CatalogReport {
    /// Number of entries dropped as missing or invalid.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.missing + self.rejected.len()
    }
}

/// Immutable, de-duplicated set of chunk templates.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<Arc<ChunkTemplate>>,
    report: CatalogReport,
}

impl Catalog {
    /// Builds a catalog from raw authored entries.
    pub fn build<I>(raw: I) -> LevelResult<Self>
    where
        I: IntoIterator<Item = Option<ChunkTemplate>>,
    {
        let mut report = CatalogReport::default();
        let mut valid = Vec::new();

        for entry in raw {
            let Some(template) = entry else {
                report.missing += 1;
                continue;
            };
            match template.validate() {
                Ok(()) => valid.push(template),
                Err(e) => {
                    warn!("Dropping chunk template {:?}: {e}", template.name);
                    report.rejected.push((template.name, e));
                },
            }
        }

        // Stable sort keeps the first authored duplicate in front
        valid.sort_by(|a, b| a.name.cmp(&b.name));

        let mut seen = AHashSet::with_capacity(valid.len());
        let mut templates = Vec::with_capacity(valid.len());
        for template in valid {
            if seen.insert(template.name.clone()) {
                templates.push(Arc::new(template));
            } else {
                warn!("Duplicate chunk template name {:?}, keeping first", template.name);
                report.duplicates.push(template.name);
            }
        }

        if templates.is_empty() {
            return Err(LevelError::EmptyCatalog {
                rejected: report.dropped(),
            });
        }
        if templates.iter().all(|t| t.is_dead_end()) {
            warn!("Every catalog template is a dead end; levels will stop after one step");
        }

        debug!(
            "Built chunk catalog: {} templates, {} dropped, {} duplicates",
            templates.len(),
            report.dropped(),
            report.duplicates.len()
        );

        Ok(Self { templates, report })
    }

    /// Builds a catalog from templates that are all present.
    pub fn from_templates(templates: Vec<ChunkTemplate>) -> LevelResult<Self> {
        Self::build(templates.into_iter().map(Some))
    }

    /// Returns the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always false for a built catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Gets a template by draw index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<ChunkTemplate>> {
        self.templates.get(index)
    }

    /// Finds a template by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<ChunkTemplate>> {
        self.templates
            .binary_search_by(|t| t.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.templates[i])
    }

    /// Iterates templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ChunkTemplate>> + '_ {
        self.templates.iter()
    }

    /// Diagnostics from construction.
    #[must_use]
    pub fn report(&self) -> &CatalogReport {
        &self.report
    }
}

/// On-disk catalog format (RON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Schema version the file was written with
    #[serde(default)]
    pub version: SchemaVersion,
    /// Authored templates, in any order
    pub templates: Vec<ChunkTemplate>,
}

impl CatalogFile {
    /// Parses a catalog file and checks its version.
    pub fn from_ron_str(source: &str) -> LevelResult<Self> {
        let file: Self =
            ron::from_str(source).map_err(|e| LevelError::CatalogFormat(e.to_string()))?;
        if !SchemaVersion::CHUNK_CATALOG.can_read(&file.version) {
            return Err(LevelError::CatalogFormat(format!(
                "unsupported version {}, expected {}",
                file.version,
                SchemaVersion::CHUNK_CATALOG
            )));
        }
        Ok(file)
    }

    /// Looks up a template by name without building a catalog.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&ChunkTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Builds a catalog from the file's templates.
    pub fn into_catalog(self) -> LevelResult<Catalog> {
        Catalog::from_templates(self.templates)
    }
}
