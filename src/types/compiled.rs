use super::dispatcher::DispatcherConfig;
use super::document::{Document, Node};
use super::farm::file_name;

/// Glob the include document uses to pull in per-farm files.
pub const FARM_INCLUDE_GLOB: &str = "dispatcher.*.inc.any";

/// One farm compiled into its configuration document.
///
/// Immutable once built. Safe to share across threads behind `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFarm {
    pub(crate) name: String,
    pub(crate) priority: u8,
    pub(crate) document: Document,
}

impl CompiledFarm {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// `dispatcher.<NN>-<name>.inc.any`
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name(self.priority, &self.name)
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The `/<name> { ... }` block itself.
    #[must_use]
    pub fn block(&self) -> Option<&Node> {
        self.document.get(&self.name)
    }

    /// Canonical text of the farm document.
    #[must_use]
    pub fn text(&self) -> String {
        self.document.to_string()
    }

    #[cfg(feature = "digest")]
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        self.document.digest()
    }
}

/// Every farm of a set, in composition order, plus the module settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFarmSet {
    pub(crate) farms: Vec<CompiledFarm>,
    pub(crate) dispatcher: DispatcherConfig,
}

impl CompiledFarmSet {
    /// Farms ordered by priority, then declaration order.
    #[must_use]
    pub fn farms(&self) -> &[CompiledFarm] {
        &self.farms
    }

    #[must_use]
    pub fn farm(&self, name: &str) -> Option<&CompiledFarm> {
        self.farms.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn dispatcher(&self) -> &DispatcherConfig {
        &self.dispatcher
    }

    /// The composed artifact: `/farms { <every farm block> }`.
    #[must_use]
    pub fn farms_document(&self) -> Document {
        let children = self
            .farms
            .iter()
            .flat_map(|f| f.document.nodes.iter().cloned())
            .collect();
        Document::new(vec![Node::block("farms", children)])
    }

    /// `/farms { $include "dispatcher.*.inc.any" }`, for collaborators that
    /// write each farm to its own [`CompiledFarm::file_name`].
    #[must_use]
    pub fn include_document(&self) -> Document {
        Document::new(vec![Node::block(
            "farms",
            vec![Node::Include(format!("\"{FARM_INCLUDE_GLOB}\""))],
        )])
    }

    /// Text of [`farms_document`](Self::farms_document).
    #[must_use]
    pub fn text(&self) -> String {
        self.farms_document().to_string()
    }

    /// Web-server directives loading the module.
    #[must_use]
    pub fn module_config(&self) -> String {
        self.dispatcher.module_config()
    }

    /// BLAKE3 digest over the farms artifact and the module configuration.
    #[cfg(feature = "digest")]
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.text().as_bytes());
        hasher.update(self.module_config().as_bytes());
        *hasher.finalize().as_bytes()
    }
}
