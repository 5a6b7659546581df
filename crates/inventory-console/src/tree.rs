//! Resource tree synchronizer
//!
//! Keeps a client-side tree that mirrors the service's resource hierarchy.
//! Roots are fetched on refresh; children are fetched lazily the first time
//! a node is expanded and cached until the next full refresh.
//!
//! Each fetch is split into a `begin_*` step that hands out a ticket and an
//! `apply_*` step that consumes it. Tickets carry the tree generation they
//! were issued under, and results for an older generation are dropped, so a
//! slow response can never overwrite a newer tree. The `load_roots` and
//! `expand_node` helpers chain both steps around the API call for callers
//! that can await in place.

use tracing::debug;

use crate::client::InventoryApi;
use crate::error::{ConsoleError, Result};
use crate::generation::{Applied, Generation};
use crate::model::{Metric, Resource, sort_metrics, sort_resources};
use crate::notify::{Notifier, report_error};

/// Shown in the detail pane before anything is selected
pub const NO_SELECTION_TEXT: &str = "Select a resource to see its detail";

/// View-model wrapping a [`Resource`]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub checkable: bool,
    /// Children have not been fetched yet
    pub lazy_load: bool,
    pub selectable: bool,
    /// `[type] name`
    pub text: String,
    pub resource: Resource,
    pub children: Vec<TreeNode>,
    pub expanded: bool,
    /// A children fetch for this node is in flight
    pub loading: bool,
}

impl TreeNode {
    pub fn from_resource(resource: Resource) -> Self {
        Self {
            checkable: false,
            lazy_load: true,
            selectable: true,
            text: resource.label(),
            resource,
            children: Vec::new(),
            expanded: false,
            loading: false,
        }
    }
}

/// Sort resources into display order and wrap them as unexpanded nodes
pub fn build_branch(mut resources: Vec<Resource>) -> Vec<TreeNode> {
    sort_resources(&mut resources);
    resources.into_iter().map(TreeNode::from_resource).collect()
}

/// Position of a node as child indices from the root list downwards
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// 0 for roots
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

fn node_at<'a>(nodes: &'a [TreeNode], path: &[usize]) -> Option<&'a TreeNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at(&node.children, rest)
    }
}

fn node_at_mut<'a>(nodes: &'a mut [TreeNode], path: &[usize]) -> Option<&'a mut TreeNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get_mut(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at_mut(&mut node.children, rest)
    }
}

/// A row of the tree as currently displayed
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    pub node: &'a TreeNode,
    pub path: NodePath,
    pub depth: usize,
}

fn flatten<'a>(
    nodes: &'a [TreeNode],
    prefix: &mut Vec<usize>,
    rows: &mut Vec<VisibleRow<'a>>,
) {
    for (index, node) in nodes.iter().enumerate() {
        prefix.push(index);
        rows.push(VisibleRow {
            node,
            path: NodePath(prefix.clone()),
            depth: prefix.len() - 1,
        });
        if node.expanded {
            flatten(&node.children, prefix, rows);
        }
        prefix.pop();
    }
}

/// Ticket for an in-flight root refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootsTicket {
    generation: u64,
}

impl RootsTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Ticket for an in-flight children fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandTicket {
    generation: u64,
    path: NodePath,
    resource_id: String,
}

impl ExpandTicket {
    /// Raw identifier of the resource whose children are fetched
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }
}

/// What expanding a node requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Children were already fetched; the node is now expanded
    Cached,
    /// Children must be fetched with this ticket
    Fetch(ExpandTicket),
    /// A fetch for this node is already in flight
    Pending,
    /// No node at that path
    Missing,
}

/// Resource currently shown in the detail pane
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDetail {
    pub resource: Option<Resource>,
    pub json: String,
    /// Sorted by display name
    pub metrics: Vec<Metric>,
}

impl Default for ResourceDetail {
    fn default() -> Self {
        Self {
            resource: None,
            json: NO_SELECTION_TEXT.to_string(),
            metrics: Vec::new(),
        }
    }
}

/// State of the Resources view
#[derive(Debug, Default)]
pub struct ResourceTree {
    roots: Option<Vec<TreeNode>>,
    /// Generation the current roots were loaded under
    roots_generation: u64,
    generation: Generation,
    refreshing: bool,
    selected: Option<NodePath>,
    detail: ResourceDetail,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root nodes, or `None` before the first successful load
    pub fn tree(&self) -> Option<&[TreeNode]> {
        self.roots.as_deref()
    }

    /// Root nodes (empty before the first successful load)
    pub fn roots(&self) -> &[TreeNode] {
        self.roots.as_deref().unwrap_or(&[])
    }

    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn node(&self, path: &NodePath) -> Option<&TreeNode> {
        node_at(self.roots(), path.indices())
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut TreeNode> {
        let roots = self.roots.as_mut()?;
        node_at_mut(roots, path.indices())
    }

    /// Rows in display order, descending only into expanded nodes
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        flatten(self.roots(), &mut Vec::new(), &mut rows);
        rows
    }

    pub fn selected(&self) -> Option<&NodePath> {
        self.selected.as_ref()
    }

    pub fn detail(&self) -> &ResourceDetail {
        &self.detail
    }

    // Roots

    /// Start a full refresh. Any fetch issued before this call becomes stale.
    pub fn begin_refresh(&mut self) -> RootsTicket {
        let generation = self.generation.advance();
        self.refreshing = true;
        debug!("[Resources] refresh tree roots, generation {}", generation);
        RootsTicket { generation }
    }

    /// Apply a root query result.
    ///
    /// On success the tree is replaced wholesale. On failure the error is
    /// reported once and the tree is left as it was.
    pub fn apply_roots(
        &mut self,
        ticket: RootsTicket,
        result: Result<Vec<Resource>>,
        notifier: &dyn Notifier,
    ) -> Result<Applied> {
        if !self.generation.is_current(ticket.generation) {
            debug!(
                "[Resources] discarding roots for stale generation {} (current {})",
                ticket.generation,
                self.generation.current()
            );
            return Ok(Applied::Stale);
        }
        self.refreshing = false;

        match result {
            Ok(resources) => {
                let roots = build_branch(resources);
                debug!("[Resources] loaded {} root resources", roots.len());
                self.roots = Some(roots);
                self.roots_generation = ticket.generation;
                self.selected = None;
                Ok(Applied::Updated)
            }
            Err(e) => {
                report_error(notifier, "Resources", &e);
                Err(e)
            }
        }
    }

    /// Fetch the root resources and rebuild the tree
    pub async fn load_roots(
        &mut self,
        api: &dyn InventoryApi,
        notifier: &dyn Notifier,
    ) -> Result<&[TreeNode]> {
        let ticket = self.begin_refresh();
        let result = api.root_resources().await;
        self.apply_roots(ticket, result, notifier)?;
        Ok(self.roots())
    }

    // Expansion

    /// Expand the node at `path`, deciding whether a fetch is needed.
    ///
    /// A node is fetched at most once; later expansions reuse the cached
    /// branch and a node with a fetch in flight is not fetched again.
    pub fn begin_expand(&mut self, path: &NodePath) -> Expansion {
        let generation = self.generation.current();
        let Some(node) = self.node_mut(path) else {
            return Expansion::Missing;
        };

        if node.loading {
            return Expansion::Pending;
        }
        if !node.lazy_load {
            node.expanded = true;
            return Expansion::Cached;
        }

        node.loading = true;
        Expansion::Fetch(ExpandTicket {
            generation,
            path: path.clone(),
            resource_id: node.resource.id.clone(),
        })
    }

    /// Apply a children query result to the node the ticket was issued for
    pub fn apply_children(
        &mut self,
        ticket: ExpandTicket,
        result: Result<Vec<Resource>>,
        notifier: &dyn Notifier,
    ) -> Result<Applied> {
        if !self.generation.is_current(ticket.generation) {
            debug!(
                "[Resources] discarding children of [{}] for stale generation {}",
                ticket.resource_id, ticket.generation
            );
            // The node still belongs to the displayed tree when no refresh
            // has replaced it since; it must not stay pending.
            if ticket.generation >= self.roots_generation {
                if let Some(node) = self
                    .node_mut(&ticket.path)
                    .filter(|n| n.resource.id == ticket.resource_id)
                {
                    node.loading = false;
                }
            }
            return Ok(Applied::Stale);
        }

        let Some(node) = self
            .node_mut(&ticket.path)
            .filter(|n| n.resource.id == ticket.resource_id)
        else {
            return Ok(Applied::Stale);
        };
        node.loading = false;

        match result {
            Ok(resources) => {
                node.children = build_branch(resources);
                node.lazy_load = false;
                node.expanded = true;
                debug!(
                    "[Resources] loaded {} children of [{}]",
                    node.children.len(),
                    node.resource.id
                );
                Ok(Applied::Updated)
            }
            Err(e) => {
                report_error(notifier, "Resources", &e);
                Err(e)
            }
        }
    }

    /// Expand the node at `path`, fetching its children if needed, and
    /// return its branch
    pub async fn expand_node(
        &mut self,
        path: &NodePath,
        api: &dyn InventoryApi,
        notifier: &dyn Notifier,
    ) -> Result<&[TreeNode]> {
        match self.begin_expand(path) {
            Expansion::Missing => {
                return Err(ConsoleError::Precondition(format!(
                    "No tree node at {:?}",
                    path.indices()
                )));
            }
            Expansion::Cached | Expansion::Pending => {}
            Expansion::Fetch(ticket) => {
                let result = api.children(ticket.resource_id()).await;
                self.apply_children(ticket, result, notifier)?;
            }
        }
        Ok(self
            .node(path)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[]))
    }

    /// Collapse the node at `path`; its cached children are kept
    pub fn collapse(&mut self, path: &NodePath) -> bool {
        match self.node_mut(path) {
            Some(node) if node.expanded => {
                node.expanded = false;
                true
            }
            _ => false,
        }
    }

    // Selection

    /// Show the resource of the node at `path` in the detail pane
    pub fn select_node(&mut self, path: &NodePath) -> Option<&ResourceDetail> {
        let node = self.node(path).filter(|n| n.selectable)?;

        let resource = node.resource.clone();
        let mut metrics = resource.metrics.clone();
        sort_metrics(&mut metrics);

        self.detail = ResourceDetail {
            json: resource.to_pretty_json(),
            metrics,
            resource: Some(resource),
        };
        self.selected = Some(path.clone());
        Some(&self.detail)
    }

    // Deletion

    /// Delete `resource` on the service. The tree is not touched; the
    /// operator refreshes to see the result.
    pub async fn delete_resource(
        &self,
        resource: &Resource,
        api: &dyn InventoryApi,
        notifier: &dyn Notifier,
    ) -> Result<()> {
        match api.delete_resource(&resource.id).await {
            Ok(()) => {
                debug!("[Resources] deleted resource [{}]", resource.id);
                Ok(())
            }
            Err(e) => {
                report_error(notifier, "Resources", &e);
                Err(e)
            }
        }
    }
}
