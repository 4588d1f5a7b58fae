//! Policy toolkit data layer
//!
//! The toolkit is four YAML documents in one directory:
//! - `tools.yaml`: the policy tool catalogue
//! - `tags_list.yaml`: display names for every tag, by category
//! - `objectives_grouped.yaml`: policy objectives, grouped
//! - `terms.yaml`: glossary entries
//!
//! Loading is one-shot. Any failure collapses to a single static message.

use crate::terms::Term;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error};

/// Shown whenever the toolkit documents cannot be loaded
pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load toolkit data. Please refresh the page to try again.";

/// A policy tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    /// URL slug; derived from the name when absent
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub overall_assessment: Option<String>,
    #[serde(default)]
    pub economic_analysis: Option<String>,
    #[serde(default)]
    pub further_reading: Vec<Reference>,
    #[serde(default)]
    pub tags: ToolTags,
    /// Remaining narrative sections, kept as raw YAML
    #[serde(flatten)]
    pub sections: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Tags attached to a tool, by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolTags {
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub innovation_stage: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub delivery_mechanism: Vec<String>,
    #[serde(default)]
    pub targeting: Vec<String>,
    #[serde(default)]
    pub timeline: Vec<String>,
}

impl ToolTags {
    /// Tags that filters match against; delivery mechanism is display-only
    pub fn filterable(&self) -> impl Iterator<Item = &str> {
        self.objectives
            .iter()
            .chain(&self.innovation_stage)
            .chain(&self.sectors)
            .chain(&self.targeting)
            .chain(&self.timeline)
            .map(String::as_str)
    }
}

/// Tag display names, by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagsList {
    #[serde(default)]
    pub tags: TagCategories,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagCategories {
    #[serde(default)]
    pub objectives: Vec<TagEntry>,
    #[serde(default)]
    pub innovation_stage: Vec<TagEntry>,
    #[serde(default)]
    pub sectors: Vec<TagEntry>,
    #[serde(default)]
    pub delivery_mechanism: Vec<TagEntry>,
    #[serde(default)]
    pub targeting: Vec<TagEntry>,
    #[serde(default)]
    pub timeline: Vec<TagEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEntry {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TagsList {
    /// Display name for a tag, searching every category in order
    ///
    /// Unknown tags display as themselves.
    pub fn display_name<'a>(&'a self, tag: &'a str) -> &'a str {
        let t = &self.tags;
        [
            &t.objectives,
            &t.innovation_stage,
            &t.sectors,
            &t.delivery_mechanism,
            &t.targeting,
            &t.timeline,
        ]
        .into_iter()
        .flatten()
        .find(|entry| entry.tag == tag)
        .map(|entry| entry.name.as_str())
        .unwrap_or(tag)
    }
}

/// A policy objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveGroup {
    pub group: String,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

#[derive(Deserialize)]
struct ToolsDocument {
    tools: Vec<Tool>,
}

#[derive(Deserialize)]
struct ObjectivesDocument {
    objective_groups: Vec<ObjectiveGroup>,
}

#[derive(Deserialize)]
struct TermsDocument {
    terms: Vec<Term>,
}

/// Everything the toolkit views need
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolkitData {
    pub tools: Vec<Tool>,
    pub tags_list: TagsList,
    /// Objectives with their groups flattened away
    pub objectives: Vec<Objective>,
    pub terms: Vec<Term>,
}

impl ToolkitData {
    pub fn find_tool(&self, tag: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.tag == tag)
    }

    pub fn find_objective(&self, tag: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.tag == tag)
    }
}

/// Load all four toolkit documents from `dir`
pub fn load_toolkit(dir: &Path) -> Result<ToolkitData> {
    let tools: ToolsDocument = read_yaml(&dir.join("tools.yaml"))?;
    let tags_list: TagsList = read_yaml(&dir.join("tags_list.yaml"))?;
    let objectives: ObjectivesDocument = read_yaml(&dir.join("objectives_grouped.yaml"))?;
    let terms: TermsDocument = read_yaml(&dir.join("terms.yaml"))?;

    let tools = tools
        .tools
        .into_iter()
        .map(|mut tool| {
            if tool.tag.is_empty() {
                tool.tag = slugify(&tool.name);
            }
            tool
        })
        .collect::<Vec<_>>();

    let objectives = objectives
        .objective_groups
        .into_iter()
        .flat_map(|group| group.objectives)
        .collect::<Vec<_>>();

    debug!(
        tools = tools.len(),
        objectives = objectives.len(),
        terms = terms.terms.len(),
        dir = %dir.display(),
        "loaded toolkit"
    );

    Ok(ToolkitData {
        tools,
        tags_list,
        objectives,
        terms: terms.terms,
    })
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Outcome of the one-shot toolkit load
#[derive(Debug, Clone, PartialEq)]
pub enum ToolkitLoad {
    Loaded(ToolkitData),
    /// Static user-facing message; the cause goes to the log
    Failed(&'static str),
}

impl ToolkitLoad {
    pub fn from_result(result: Result<ToolkitData>) -> Self {
        match result {
            Ok(data) => ToolkitLoad::Loaded(data),
            Err(e) => {
                error!(error = %format!("{:#}", e), "toolkit load failed");
                ToolkitLoad::Failed(LOAD_ERROR_MESSAGE)
            }
        }
    }

    pub fn load(dir: &Path) -> Self {
        ToolkitLoad::from_result(load_toolkit(dir))
    }
}

/// URL slug for a tool name
///
/// Lowercase, `&` spelled `and`, every run of other characters outside
/// `[a-z0-9]` collapsed to one `_`, no leading or trailing `_`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase().replace('&', "and");
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_sep = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Active tag filters plus a name search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFilter {
    active: Vec<String>,
    search: String,
}

impl ToolFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active filters in the order they were added
    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn add(&mut self, tag: &str) {
        if !self.active.iter().any(|t| t == tag) {
            self.active.push(tag.to_string());
        }
    }

    pub fn remove(&mut self, tag: &str) {
        self.active.retain(|t| t != tag);
    }

    pub fn toggle(&mut self, tag: &str) {
        if self.active.iter().any(|t| t == tag) {
            self.remove(tag);
        } else {
            self.add(tag);
        }
    }

    /// Drop every filter and the search term
    pub fn clear(&mut self) {
        self.active.clear();
        self.search.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.search.is_empty()
    }

    /// Tools carrying every active tag whose name contains the search term
    pub fn apply<'a>(&self, tools: &'a [Tool]) -> Vec<&'a Tool> {
        let needle = self.search.to_lowercase();
        tools
            .iter()
            .filter(|tool| {
                self.active
                    .iter()
                    .all(|tag| tool.tags.filterable().any(|t| t == tag))
            })
            .filter(|tool| tool.name.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str, tags: ToolTags) -> Tool {
        Tool {
            name: name.to_string(),
            tag: slugify(name),
            overall_assessment: None,
            economic_analysis: None,
            further_reading: Vec::new(),
            tags,
            sections: BTreeMap::new(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("R&D Tax Credits"), "randd_tax_credits");
        assert_eq!(slugify("  Patent Box  "), "patent_box");
        assert_eq!(slugify("ARIA (Advanced Research)"), "aria_advanced_research");
        assert_eq!(slugify("Catapult -- Centres"), "catapult_centres");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_filter_add_is_idempotent() {
        let mut f = ToolFilter::new();
        f.add("early_stage");
        f.add("early_stage");
        assert_eq!(f.active(), ["early_stage".to_string()]);
        f.toggle("early_stage");
        assert!(f.active().is_empty());
        f.toggle("sme");
        assert_eq!(f.active().len(), 1);
    }

    #[test]
    fn test_clear_drops_search_too() {
        let mut f = ToolFilter::new();
        f.add("sme");
        f.set_search("grant");
        f.clear();
        assert!(f.is_empty());
    }

    #[test]
    fn test_apply_requires_every_filter() {
        let tools = vec![
            tool(
                "Grants",
                ToolTags {
                    innovation_stage: vec!["early_stage".into()],
                    targeting: vec!["sme".into()],
                    ..Default::default()
                },
            ),
            tool(
                "Tax Credits",
                ToolTags {
                    targeting: vec!["sme".into()],
                    ..Default::default()
                },
            ),
        ];

        let mut f = ToolFilter::new();
        assert_eq!(f.apply(&tools).len(), 2);

        f.add("sme");
        f.add("early_stage");
        let hits = f.apply(&tools);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Grants");
    }

    #[test]
    fn test_delivery_mechanism_is_not_filterable() {
        let tools = vec![tool(
            "Loans",
            ToolTags {
                delivery_mechanism: vec!["finance".into()],
                ..Default::default()
            },
        )];
        let mut f = ToolFilter::new();
        f.add("finance");
        assert!(f.apply(&tools).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let tools = vec![tool("Patent Box", ToolTags::default())];
        let mut f = ToolFilter::new();
        f.set_search("PATENT");
        assert_eq!(f.apply(&tools).len(), 1);
        f.set_search("grant");
        assert!(f.apply(&tools).is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_tag() {
        let list = TagsList {
            tags: TagCategories {
                timeline: vec![TagEntry {
                    tag: "long_term".into(),
                    name: "Long term".into(),
                    description: None,
                }],
                ..Default::default()
            },
        };
        assert_eq!(list.display_name("long_term"), "Long term");
        assert_eq!(list.display_name("mystery"), "mystery");
    }

    #[test]
    fn test_failed_load_uses_static_message() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ToolkitLoad::load(dir.path()),
            ToolkitLoad::Failed(LOAD_ERROR_MESSAGE)
        );
    }
}
