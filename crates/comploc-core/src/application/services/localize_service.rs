//! Localize Service - main application orchestrator.
//!
//! This service coordinates a full localization run:
//! 1. Plan: resolve every root, discover and order its sub-containers
//! 2. Open one host transaction
//! 3. Per locale: replicate every root, verify relinking, substitute rows
//! 4. Commit, or roll back on any fatal error
//!
//! Planning is read-only, so manifest and graph faults never leave partial
//! duplicates behind.

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{AssetLocator, DocumentHost},
        services::{
            graph::{discover, order},
            replication::{ReplicationOptions, replicate, verify_relinked},
            substitution::{Replicas, apply},
        },
    },
    domain::{ContainerId, GraphError, Manifest, Report, ReportBuilder},
    error::CompLocResult,
};

/// Label of the undo group wrapping a run.
pub const TRANSACTION_LABEL: &str = "comploc: localize";

/// A root container and its sub-containers, children first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPlan {
    pub name: String,
    pub root: ContainerId,
    pub subtree: Vec<ContainerId>,
}

/// Everything a run will touch, computed without mutating the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub locales: Vec<String>,
    pub roots: Vec<RootPlan>,
}

impl RunPlan {
    /// Containers created per locale.
    pub fn duplicates_per_locale(&self) -> usize {
        self.roots.iter().map(|r| r.subtree.len() + 1).sum()
    }
}

/// Main localization service.
pub struct LocalizeService {
    host: Box<dyn DocumentHost>,
    assets: Box<dyn AssetLocator>,
    options: ReplicationOptions,
}

impl LocalizeService {
    /// Create a new localize service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use comploc_core::application::{LocalizeService, ReplicationOptions};
    ///
    /// let service = LocalizeService::new(
    ///     host,   // impl DocumentHost
    ///     assets, // impl AssetLocator
    ///     ReplicationOptions::default(),
    /// );
    /// ```
    pub fn new(
        host: Box<dyn DocumentHost>,
        assets: Box<dyn AssetLocator>,
        options: ReplicationOptions,
    ) -> Self {
        Self {
            host,
            assets,
            options,
        }
    }

    /// Resolve, discover and order every root named by the manifest.
    #[instrument(skip_all, fields(roots = manifest.root_names().len()))]
    pub fn plan(&self, manifest: &Manifest) -> CompLocResult<RunPlan> {
        let mut roots = Vec::new();

        for name in manifest.root_names() {
            let root = self
                .host
                .find_container(name)?
                .ok_or_else(|| GraphError::RootNotFound {
                    name: name.to_string(),
                })?;
            let discovered = discover(self.host.as_ref(), root)?;
            let subtree = order(self.host.as_ref(), &discovered)?;

            info!(root = %name, sub_containers = subtree.len(), "root planned");
            roots.push(RootPlan {
                name: name.to_string(),
                root,
                subtree,
            });
        }

        Ok(RunPlan {
            locales: manifest.locales().to_vec(),
            roots,
        })
    }

    /// Run the whole manifest as one undoable transaction.
    #[instrument(
        skip_all,
        fields(
            run_id = %uuid::Uuid::new_v4(),
            locales = manifest.locales().len(),
            rows = manifest.rows().len()
        )
    )]
    pub fn run(&self, manifest: &Manifest) -> CompLocResult<Report> {
        let plan = self.plan(manifest)?;

        self.host.begin_transaction(TRANSACTION_LABEL)?;
        match self.execute(&plan, manifest) {
            Ok(report) => {
                self.host.commit_transaction()?;
                info!(
                    applied = report.applied(),
                    skipped = report.skipped(),
                    failed = report.failed(),
                    "Localization completed"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Run failed, rolling back");
                self.rollback();
                Err(e)
            }
        }
    }

    pub fn options(&self) -> &ReplicationOptions {
        &self.options
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn execute(&self, plan: &RunPlan, manifest: &Manifest) -> CompLocResult<Report> {
        let mut total = ReportBuilder::new(plan.locales.len());

        for locale in &plan.locales {
            let mut replicas = Replicas::new();

            for root in &plan.roots {
                let map = replicate(
                    self.host.as_ref(),
                    root.root,
                    &root.subtree,
                    locale,
                    &self.options,
                )?;
                verify_relinked(self.host.as_ref(), &map, &root.subtree)?;
                replicas
                    .entry(root.name.clone())
                    .or_default()
                    .insert(locale.clone(), map);
            }

            let pass = apply(
                self.host.as_ref(),
                self.assets.as_ref(),
                &replicas,
                manifest.rows(),
                std::slice::from_ref(locale),
            );
            info!(
                locale = %locale,
                applied = pass.applied(),
                skipped = pass.skipped(),
                failed = pass.failed(),
                "Locale completed"
            );
            total.absorb(&pass);
        }

        Ok(total.build())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self) {
        if let Err(e) = self.host.rollback_transaction() {
            warn!(error = %e, "Rollback failed");
        } else {
            info!("Rollback successful");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::{MockAssetLocator, MockDocumentHost};
    use crate::domain::{DomainError, GraphError, LeafId, NodeRef, Reference};
    use crate::error::CompLocError;
    use mockall::Sequence;

    const MANIFEST: &str = "rootName,leafName,kind,en\nMain,Title,text,Hi\n";

    /// `Main` (1) holding one text leaf.
    fn single_root(mock: &mut MockDocumentHost) {
        mock.expect_find_container()
            .withf(|name| name == "Main")
            .returning(|_| Ok(Some(ContainerId(1))));
        mock.expect_references().returning(|_| {
            Ok(vec![Reference::new(0, "Title", NodeRef::TextLeaf(LeafId(5)))])
        });
    }

    #[test]
    fn missing_root_fails_before_any_mutation() {
        let mut host = MockDocumentHost::new();
        host.expect_find_container().returning(|_| Ok(None));
        host.expect_begin_transaction().never();

        let service = LocalizeService::new(
            Box::new(host),
            Box::new(MockAssetLocator::new()),
            ReplicationOptions::default(),
        );
        let manifest = Manifest::parse(MANIFEST).unwrap();

        let err = service.run(&manifest).unwrap_err();
        assert!(err.to_string().contains("Main"));
    }

    #[test]
    fn clone_failure_rolls_back_the_transaction() {
        let mut host = MockDocumentHost::new();
        single_root(&mut host);
        host.expect_container_name().returning(|_| Ok("Main".into()));

        let mut seq = Sequence::new();
        host.expect_begin_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        host.expect_clone_container()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(ApplicationError::HostError {
                    operation: "duplicate container",
                    reason: "out of memory".into(),
                }
                .into())
            });
        host.expect_rollback_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        host.expect_commit_transaction().never();

        let service = LocalizeService::new(
            Box::new(host),
            Box::new(MockAssetLocator::new()),
            ReplicationOptions::default(),
        );
        let manifest = Manifest::parse(MANIFEST).unwrap();

        let err = service.run(&manifest).unwrap_err();
        assert!(matches!(err, CompLocError::Application(ApplicationError::HostError { .. })));
    }

    #[test]
    fn topology_fault_after_cloning_rolls_back_the_transaction() {
        let mut host = MockDocumentHost::new();
        host.expect_find_container()
            .withf(|name| name == "Main")
            .returning(|_| Ok(Some(ContainerId(1))));
        host.expect_find_container()
            .withf(|name| name != "Main")
            .returning(|_| Ok(None));
        // The clone keeps pointing at the original's leaf.
        host.expect_references().returning(|_| {
            Ok(vec![Reference::new(0, "Title", NodeRef::TextLeaf(LeafId(5)))])
        });
        host.expect_container_name().returning(|_| Ok("Main".into()));
        host.expect_clone_container().returning(|_| Ok(ContainerId(10)));
        host.expect_set_container_name().returning(|_, _| Ok(()));
        host.expect_set_folder().returning(|_, _| Ok(()));

        let mut seq = Sequence::new();
        host.expect_begin_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        host.expect_rollback_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        host.expect_commit_transaction().never();

        let service = LocalizeService::new(
            Box::new(host),
            Box::new(MockAssetLocator::new()),
            ReplicationOptions::default(),
        );
        let manifest = Manifest::parse(MANIFEST).unwrap();

        let err = service.run(&manifest).unwrap_err();
        assert!(matches!(
            err,
            CompLocError::Domain(DomainError::Graph(GraphError::TopologyMismatch { .. }))
        ));
    }

    #[test]
    fn plan_lists_roots_in_manifest_order() {
        let mut host = MockDocumentHost::new();
        host.expect_find_container().returning(|name| {
            Ok(match name {
                "B" => Some(ContainerId(2)),
                "A" => Some(ContainerId(1)),
                _ => None,
            })
        });
        host.expect_references().returning(|_| Ok(vec![]));

        let service = LocalizeService::new(
            Box::new(host),
            Box::new(MockAssetLocator::new()),
            ReplicationOptions::default(),
        );
        let manifest = Manifest::parse("rootName,leafName,en,fr\nB,x,1,2\nA,y,3,4\n").unwrap();

        let plan = service.plan(&manifest).unwrap();
        let names: Vec<_> = plan.roots.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(plan.locales, vec!["en", "fr"]);
        assert_eq!(plan.duplicates_per_locale(), 2);
    }
}
