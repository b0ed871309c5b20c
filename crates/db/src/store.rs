//! In-memory transactional store
//!
//! Every commit gets the next transaction id and is applied atomically under
//! the state write lock, so readers see either all of a transaction or none
//! of it. The transaction log maps each id to the entities it touched, which
//! keeps "what changed after T" proportional to recent write volume.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. take the state write lock
//! 2. allocate txn id (last committed + 1)
//! 3. apply upserts and deletes, stamping nodes with the id
//! 4. append touched entities to the log
//! 5. publish the id as last committed
//! ```

use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use tessera_core::request::DEFAULT_STORE;
use tessera_core::{ChangedEntity, EntityRef, Error, FieldValue, Result, TxnId};

/// Type given to nodes that do not name one
pub const DEFAULT_NODE_TYPE: &str = "cm:content";

/// A searchable node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable reference
    pub entity: EntityRef,
    /// Store the node lives in
    pub store: String,
    /// Tenant domain; `None` is the default domain
    pub tenant: Option<String>,
    /// Content type, e.g. `cm:content`
    pub node_type: String,
    /// Primary parent
    pub parent: Option<EntityRef>,
    /// Authorities allowed to read; empty means everyone
    pub readers: Vec<String>,
    /// Property values
    pub properties: BTreeMap<String, FieldValue>,
    /// Full-text content
    pub text: String,
    /// Transaction that last wrote the node (set on commit)
    pub txn_id: TxnId,
}

impl Node {
    /// A readable-by-all content node in the default store
    pub fn new(entity: impl Into<EntityRef>) -> Self {
        Node {
            entity: entity.into(),
            store: DEFAULT_STORE.to_string(),
            tenant: None,
            node_type: DEFAULT_NODE_TYPE.to_string(),
            parent: None,
            readers: vec![],
            properties: BTreeMap::new(),
            text: String::new(),
            txn_id: TxnId::ZERO,
        }
    }

    /// Builder: set store
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = store.into();
        self
    }

    /// Builder: set tenant
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Builder: set type
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    /// Builder: set parent
    pub fn with_parent(mut self, parent: impl Into<EntityRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder: restrict reading to `readers`
    pub fn with_readers<I, S>(mut self, readers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readers = readers.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Builder: set full-text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Whether a caller holding `authorities` may read this node
    pub fn is_readable_by(&self, authorities: &[String]) -> bool {
        self.readers.is_empty() || self.readers.iter().any(|r| authorities.contains(r))
    }
}

/// One write within a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create or replace a node
    Upsert(Node),
    /// Remove a node
    Delete(EntityRef),
}

impl Mutation {
    fn entity(&self) -> &EntityRef {
        match self {
            Mutation::Upsert(node) => &node.entity,
            Mutation::Delete(entity) => entity,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    nodes: BTreeMap<EntityRef, Node>,
    log: BTreeMap<TxnId, Vec<EntityRef>>,
}

/// Transactional node store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
    /// Last committed transaction id, readable without the lock
    last_committed: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `mutations` as one transaction and return its id
    ///
    /// An empty transaction is rejected and allocates no id.
    pub fn commit(&self, mutations: Vec<Mutation>) -> Result<TxnId> {
        if mutations.is_empty() {
            return Err(Error::InvalidRequest("empty transaction".to_string()));
        }

        let mut state = self.state.write();
        let txn_id = TxnId::new(self.last_committed.load(Ordering::SeqCst)).next();

        let mut touched = BTreeSet::new();
        for mutation in mutations {
            touched.insert(mutation.entity().clone());
            match mutation {
                Mutation::Upsert(mut node) => {
                    node.txn_id = txn_id;
                    state.nodes.insert(node.entity.clone(), node);
                }
                Mutation::Delete(entity) => {
                    state.nodes.remove(&entity);
                }
            }
        }
        state.log.insert(txn_id, touched.into_iter().collect());

        self.last_committed.store(txn_id.as_u64(), Ordering::SeqCst);
        Ok(txn_id)
    }

    /// Upsert a single node in its own transaction
    pub fn put(&self, node: Node) -> Result<TxnId> {
        self.commit(vec![Mutation::Upsert(node)])
    }

    /// Delete a single node in its own transaction
    pub fn delete(&self, entity: impl Into<EntityRef>) -> Result<TxnId> {
        self.commit(vec![Mutation::Delete(entity.into())])
    }

    /// Id of the newest committed transaction (`TxnId::ZERO` when none)
    pub fn last_committed(&self) -> TxnId {
        TxnId::new(self.last_committed.load(Ordering::SeqCst))
    }

    /// Current version of a node
    pub fn get(&self, entity: &EntityRef) -> Option<Node> {
        self.state.read().nodes.get(entity).cloned()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.state.read().nodes.len()
    }

    /// Whether no live node exists
    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    /// Visit live nodes in entity order
    ///
    /// With `since = Some(T)` only nodes touched by transactions after `T` are
    /// visited, read from the log rather than the whole node map.
    pub fn visit<F>(&self, since: Option<TxnId>, mut f: F)
    where
        F: FnMut(&Node),
    {
        let state = self.state.read();
        match since {
            None => state.nodes.values().for_each(f),
            Some(watermark) => {
                let touched: BTreeSet<&EntityRef> = state
                    .log
                    .range((Bound::Excluded(watermark), Bound::Unbounded))
                    .flat_map(|(_, entities)| entities.iter())
                    .collect();
                // Deleted entities are in the log but not in the map
                touched
                    .into_iter()
                    .filter_map(|entity| state.nodes.get(entity))
                    .for_each(&mut f);
            }
        }
    }

    /// Entities touched after `watermark`, each once with its latest txn id
    ///
    /// Deletions are included. Ordered by transaction, then entity.
    pub fn changes_since(&self, watermark: TxnId) -> Vec<ChangedEntity> {
        let state = self.state.read();
        let mut latest: BTreeMap<&EntityRef, TxnId> = BTreeMap::new();
        for (txn_id, entities) in state
            .log
            .range((Bound::Excluded(watermark), Bound::Unbounded))
        {
            for entity in entities {
                latest.insert(entity, *txn_id);
            }
        }

        let mut changes: Vec<ChangedEntity> = latest
            .into_iter()
            .map(|(entity, txn_id)| ChangedEntity::new(entity.clone(), txn_id))
            .collect();
        changes.sort_by(|a, b| a.txn_id.cmp(&b.txn_id).then_with(|| a.entity.cmp(&b.entity)));
        changes
    }
}
