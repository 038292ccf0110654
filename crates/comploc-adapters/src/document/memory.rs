//! In-memory document host.
//!
//! Backs the JSON document file in the CLI and every engine test. Node
//! identities come from one counter shared by containers and leaves, so an
//! identity is never reused within a document.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use comploc_core::{
    application::{ApplicationError, ports::DocumentHost},
    domain::{ContainerId, Folder, LeafContent, LeafId, NodeRef, Reference},
    error::CompLocResult,
};
use tracing::debug;

use super::json::{ContainerRecord, DocumentFile, DocumentFileError, LeafRecord, ReferenceRecord};

/// Thread-safe in-memory document.
///
/// Cloning the handle shares the document. Transactions are snapshots:
/// `begin` copies the node graph, `rollback` restores the copy, `commit`
/// drops it.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    graph: Graph,
    transaction: Option<Transaction>,
}

#[derive(Debug)]
struct Transaction {
    label: String,
    snapshot: Graph,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Graph {
    next_id: u64,
    containers: BTreeMap<ContainerId, ContainerNode>,
    leaves: BTreeMap<LeafId, LeafNode>,
}

#[derive(Debug, Clone, PartialEq)]
struct ContainerNode {
    name: String,
    folder: Option<Folder>,
    slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    name: String,
    target: NodeRef,
}

#[derive(Debug, Clone, PartialEq)]
struct LeafNode {
    name: String,
    content: LeafContent,
}

impl MemoryDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level container with no slots.
    pub fn add_container(&self, name: impl Into<String>) -> CompLocResult<ContainerId> {
        let mut inner = self.write()?;
        let id = ContainerId(inner.graph.allocate());
        inner.graph.containers.insert(
            id,
            ContainerNode {
                name: name.into(),
                folder: None,
                slots: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Append a text leaf slot to `container`.
    pub fn add_text(
        &self,
        container: ContainerId,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> CompLocResult<LeafId> {
        self.add_leaf(container, name.into(), LeafContent::Text(text.into()))
    }

    /// Append an asset leaf slot to `container`.
    pub fn add_asset(
        &self,
        container: ContainerId,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> CompLocResult<LeafId> {
        self.add_leaf(container, name.into(), LeafContent::Asset(path.into()))
    }

    /// Append a slot of `parent` that targets `child`.
    pub fn add_child(
        &self,
        parent: ContainerId,
        name: impl Into<String>,
        child: ContainerId,
    ) -> CompLocResult<()> {
        let mut inner = self.write()?;
        inner.graph.container(child)?;
        inner.graph.container_mut(parent)?.slots.push(Slot {
            name: name.into(),
            target: NodeRef::Container(child),
        });
        Ok(())
    }

    pub fn container_count(&self) -> CompLocResult<usize> {
        Ok(self.read()?.graph.containers.len())
    }

    pub fn leaf_count(&self) -> CompLocResult<usize> {
        Ok(self.read()?.graph.leaves.len())
    }

    /// Every container, in creation order.
    pub fn containers(&self) -> CompLocResult<Vec<ContainerId>> {
        Ok(self.read()?.graph.containers.keys().copied().collect())
    }

    pub fn folder(&self, id: ContainerId) -> CompLocResult<Option<Folder>> {
        Ok(self.read()?.graph.container(id)?.folder.clone())
    }

    /// Current content of a leaf.
    pub fn leaf(&self, id: LeafId) -> CompLocResult<LeafContent> {
        Ok(self.read()?.graph.leaf(id)?.content.clone())
    }

    /// Label of the open transaction, if any.
    pub fn transaction(&self) -> CompLocResult<Option<String>> {
        Ok(self
            .read()?
            .transaction
            .as_ref()
            .map(|t| t.label.clone()))
    }

    /// Serializable form of the document.
    pub fn to_file(&self) -> CompLocResult<DocumentFile> {
        let inner = self.read()?;
        let graph = &inner.graph;

        let containers = graph
            .containers
            .iter()
            .map(|(id, node)| ContainerRecord {
                id: *id,
                name: node.name.clone(),
                folder: node.folder.clone(),
                references: node
                    .slots
                    .iter()
                    .map(|slot| match slot.target {
                        NodeRef::Container(container) => ReferenceRecord::Container {
                            name: slot.name.clone(),
                            container,
                        },
                        NodeRef::TextLeaf(leaf) | NodeRef::AssetLeaf(leaf) => {
                            ReferenceRecord::Leaf { leaf }
                        }
                    })
                    .collect(),
            })
            .collect();

        let leaves = graph
            .leaves
            .iter()
            .map(|(id, node)| LeafRecord {
                id: *id,
                name: node.name.clone(),
                content: node.content.clone(),
            })
            .collect();

        Ok(DocumentFile { containers, leaves })
    }

    /// Build a document from its serializable form.
    ///
    /// Every reference must target a node defined in the file and no
    /// identity may appear twice.
    pub fn from_file(file: DocumentFile) -> Result<Self, DocumentFileError> {
        let mut graph = Graph::default();

        for record in file.leaves {
            if graph.leaves.contains_key(&record.id) {
                return Err(DocumentFileError::DuplicateId {
                    node: record.id.to_string(),
                });
            }
            graph.leaves.insert(
                record.id,
                LeafNode {
                    name: record.name,
                    content: record.content,
                },
            );
        }

        for record in &file.containers {
            if graph.containers.contains_key(&record.id) {
                return Err(DocumentFileError::DuplicateId {
                    node: record.id.to_string(),
                });
            }
            graph.containers.insert(
                record.id,
                ContainerNode {
                    name: record.name.clone(),
                    folder: record.folder.clone(),
                    slots: Vec::new(),
                },
            );
        }

        for record in file.containers {
            let mut slots = Vec::with_capacity(record.references.len());
            for reference in record.references {
                slots.push(match reference {
                    ReferenceRecord::Container { name, container } => {
                        if !graph.containers.contains_key(&container) {
                            return Err(DocumentFileError::DanglingReference {
                                container: record.name.clone(),
                                target: container.to_string(),
                            });
                        }
                        Slot {
                            name,
                            target: NodeRef::Container(container),
                        }
                    }
                    ReferenceRecord::Leaf { leaf } => {
                        let node = graph.leaves.get(&leaf).ok_or_else(|| {
                            DocumentFileError::DanglingReference {
                                container: record.name.clone(),
                                target: leaf.to_string(),
                            }
                        })?;
                        Slot {
                            name: node.name.clone(),
                            target: leaf_ref(leaf, &node.content),
                        }
                    }
                });
            }
            if let Some(node) = graph.containers.get_mut(&record.id) {
                node.slots = slots;
            }
        }

        let highest = graph
            .containers
            .keys()
            .map(|c| c.0)
            .chain(graph.leaves.keys().map(|l| l.0))
            .max();
        graph.next_id = highest.map_or(1, |id| id + 1);

        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                graph,
                transaction: None,
            })),
        })
    }

    // ── Internal Helpers ─────────────────────────────────────────────────────

    fn add_leaf(
        &self,
        container: ContainerId,
        name: String,
        content: LeafContent,
    ) -> CompLocResult<LeafId> {
        let mut inner = self.write()?;
        inner.graph.container(container)?;

        let id = LeafId(inner.graph.allocate());
        let target = leaf_ref(id, &content);
        inner.graph.leaves.insert(
            id,
            LeafNode {
                name: name.clone(),
                content,
            },
        );
        inner.graph.container_mut(container)?.slots.push(Slot { name, target });
        Ok(id)
    }

    fn read(&self) -> CompLocResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::HostLockError.into())
    }

    fn write(&self) -> CompLocResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::HostLockError.into())
    }
}

impl Graph {
    fn allocate(&mut self) -> u64 {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn container(&self, id: ContainerId) -> CompLocResult<&ContainerNode> {
        self.containers.get(&id).ok_or_else(|| unknown(id))
    }

    fn container_mut(&mut self, id: ContainerId) -> CompLocResult<&mut ContainerNode> {
        self.containers.get_mut(&id).ok_or_else(|| unknown(id))
    }

    fn leaf(&self, id: LeafId) -> CompLocResult<&LeafNode> {
        self.leaves.get(&id).ok_or_else(|| unknown(id))
    }

    fn leaf_mut(&mut self, id: LeafId) -> CompLocResult<&mut LeafNode> {
        self.leaves.get_mut(&id).ok_or_else(|| unknown(id))
    }
}

impl DocumentHost for MemoryDocument {
    fn find_container(&self, name: &str) -> CompLocResult<Option<ContainerId>> {
        let inner = self.read()?;
        Ok(inner
            .graph
            .containers
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| *id))
    }

    fn container_name(&self, id: ContainerId) -> CompLocResult<String> {
        Ok(self.read()?.graph.container(id)?.name.clone())
    }

    fn references(&self, id: ContainerId) -> CompLocResult<Vec<Reference>> {
        let inner = self.read()?;
        Ok(inner
            .graph
            .container(id)?
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| Reference::new(index, slot.name.clone(), slot.target))
            .collect())
    }

    fn clone_container(&self, id: ContainerId) -> CompLocResult<ContainerId> {
        let mut inner = self.write()?;
        let graph = &mut inner.graph;
        let original = graph.container(id)?.clone();

        // Leaves are deep-copied; container slots keep their targets.
        let mut slots = Vec::with_capacity(original.slots.len());
        for slot in original.slots {
            let target = match slot.target {
                NodeRef::Container(_) => slot.target,
                NodeRef::TextLeaf(leaf) | NodeRef::AssetLeaf(leaf) => {
                    let copy = graph.leaf(leaf)?.clone();
                    let fresh = LeafId(graph.allocate());
                    let target = leaf_ref(fresh, &copy.content);
                    graph.leaves.insert(fresh, copy);
                    target
                }
            };
            slots.push(Slot {
                name: slot.name,
                target,
            });
        }

        let duplicate = ContainerId(graph.allocate());
        graph.containers.insert(
            duplicate,
            ContainerNode {
                name: original.name,
                folder: original.folder,
                slots,
            },
        );
        debug!(original = %id, duplicate = %duplicate, "container cloned");
        Ok(duplicate)
    }

    fn set_container_name(&self, id: ContainerId, name: &str) -> CompLocResult<()> {
        self.write()?.graph.container_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn set_folder(&self, id: ContainerId, folder: &Folder) -> CompLocResult<()> {
        self.write()?.graph.container_mut(id)?.folder = Some(folder.clone());
        Ok(())
    }

    fn relink(&self, id: ContainerId, slot: usize, target: ContainerId) -> CompLocResult<()> {
        let mut inner = self.write()?;
        inner.graph.container(target)?;

        let node = inner.graph.container_mut(id)?;
        let entry = node.slots.get_mut(slot).ok_or_else(|| {
            host_error("relink", format!("{id} has no slot {slot}"))
        })?;
        if entry.target.is_leaf() {
            return Err(host_error(
                "relink",
                format!("slot {slot} of {id} holds a leaf"),
            ));
        }
        entry.target = NodeRef::Container(target);
        Ok(())
    }

    fn text(&self, leaf: LeafId) -> CompLocResult<String> {
        match &self.read()?.graph.leaf(leaf)?.content {
            LeafContent::Text(text) => Ok(text.clone()),
            LeafContent::Asset(_) => {
                Err(host_error("read text", format!("{leaf} is an asset leaf")))
            }
        }
    }

    fn set_text(&self, leaf: LeafId, text: &str) -> CompLocResult<()> {
        let mut inner = self.write()?;
        match &mut inner.graph.leaf_mut(leaf)?.content {
            LeafContent::Text(current) => {
                *current = text.to_string();
                Ok(())
            }
            LeafContent::Asset(_) => {
                Err(host_error("set text", format!("{leaf} is an asset leaf")))
            }
        }
    }

    fn asset_path(&self, leaf: LeafId) -> CompLocResult<PathBuf> {
        match &self.read()?.graph.leaf(leaf)?.content {
            LeafContent::Asset(path) => Ok(path.clone()),
            LeafContent::Text(_) => {
                Err(host_error("read asset", format!("{leaf} is a text leaf")))
            }
        }
    }

    fn set_asset_path(&self, leaf: LeafId, path: &Path) -> CompLocResult<()> {
        let mut inner = self.write()?;
        match &mut inner.graph.leaf_mut(leaf)?.content {
            LeafContent::Asset(current) => {
                *current = path.to_path_buf();
                Ok(())
            }
            LeafContent::Text(_) => {
                Err(host_error("rebind asset", format!("{leaf} is a text leaf")))
            }
        }
    }

    fn begin_transaction(&self, label: &str) -> CompLocResult<()> {
        let mut inner = self.write()?;
        if let Some(open) = &inner.transaction {
            return Err(ApplicationError::TransactionError {
                reason: format!("'{}' is already open", open.label),
            }
            .into());
        }
        let snapshot = inner.graph.clone();
        inner.transaction = Some(Transaction {
            label: label.to_string(),
            snapshot,
        });
        debug!(label, "transaction opened");
        Ok(())
    }

    fn commit_transaction(&self) -> CompLocResult<()> {
        let mut inner = self.write()?;
        let open = inner.transaction.take().ok_or_else(no_transaction)?;
        debug!(label = %open.label, "transaction committed");
        Ok(())
    }

    fn rollback_transaction(&self) -> CompLocResult<()> {
        let mut inner = self.write()?;
        let open = inner.transaction.take().ok_or_else(no_transaction)?;
        inner.graph = open.snapshot;
        debug!(label = %open.label, "transaction rolled back");
        Ok(())
    }
}

fn leaf_ref(id: LeafId, content: &LeafContent) -> NodeRef {
    match content {
        LeafContent::Text(_) => NodeRef::TextLeaf(id),
        LeafContent::Asset(_) => NodeRef::AssetLeaf(id),
    }
}

fn unknown(node: impl ToString) -> comploc_core::error::CompLocError {
    ApplicationError::UnknownNode {
        node: node.to_string(),
    }
    .into()
}

fn host_error(operation: &'static str, reason: String) -> comploc_core::error::CompLocError {
    ApplicationError::HostError { operation, reason }.into()
}

fn no_transaction() -> comploc_core::error::CompLocError {
    ApplicationError::TransactionError {
        reason: "no transaction is open".into(),
    }
    .into()
}
