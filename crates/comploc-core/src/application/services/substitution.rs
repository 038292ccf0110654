//! Substitution of manifest values into duplicated trees.
//!
//! Every outcome is counted: an empty value is a skip, a missing root or
//! leaf and every [`SubstitutionError`] are failures. Nothing here aborts a
//! run; failures are listed (capped) in the returned [`Report`].

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    application::{
        ports::{AssetLocator, DocumentHost},
        services::resolution::{Lookup, Resolved, find_by_name},
    },
    domain::{DuplicateMap, LeafKind, ManifestRow, Report, ReportBuilder, SubstitutionError},
};

/// Root name → locale → duplicate map.
pub type Replicas = BTreeMap<String, BTreeMap<String, DuplicateMap>>;

/// Apply `rows` for each of `locales` to the duplicates in `replicas`.
pub fn apply(
    host: &dyn DocumentHost,
    assets: &dyn AssetLocator,
    replicas: &Replicas,
    rows: &[ManifestRow],
    locales: &[String],
) -> Report {
    let mut report = ReportBuilder::new(locales.len());

    for locale in locales {
        for row in rows {
            apply_row(host, assets, replicas, row, locale, &mut report);
        }
    }

    report.build()
}

fn apply_row(
    host: &dyn DocumentHost,
    assets: &dyn AssetLocator,
    replicas: &Replicas,
    row: &ManifestRow,
    locale: &str,
    report: &mut ReportBuilder,
) {
    let Some(value) = row.value(locale) else {
        report.skipped();
        return;
    };

    let failure = |reason: &dyn std::fmt::Display| {
        format!("{locale}: {} / {}: {reason}", row.root_name, row.leaf_name)
    };

    let Some(root) = replicas
        .get(&row.root_name)
        .and_then(|by_locale| by_locale.get(locale))
        .and_then(DuplicateMap::root_duplicate)
    else {
        warn!(locale, root = %row.root_name, "root was not replicated");
        report.failed(failure(&"root was not replicated"));
        return;
    };

    let resolved = match find_by_name(host, root, &row.leaf_name) {
        Ok(Lookup::Found(resolved)) => resolved,
        Ok(Lookup::Missing(_)) => {
            debug!(locale, root = %row.root_name, leaf = %row.leaf_name, "leaf not found");
            report.failed(failure(&"leaf not found"));
            return;
        }
        Err(e) => {
            report.failed(failure(&SubstitutionError::HostMutationFailed {
                reason: e.to_string(),
            }));
            return;
        }
    };

    match substitute(host, assets, &resolved, row, value) {
        Ok(()) => {
            debug!(locale, leaf = %row.leaf_name, kind = %row.kind, "substituted");
            report.applied();
        }
        Err(e) => {
            warn!(locale, leaf = %row.leaf_name, error = %e, "substitution failed");
            report.failed(failure(&e));
        }
    }
}

/// Write `value` into the resolved leaf. The leaf kind never changes.
fn substitute(
    host: &dyn DocumentHost,
    assets: &dyn AssetLocator,
    resolved: &Resolved,
    row: &ManifestRow,
    value: &str,
) -> Result<(), SubstitutionError> {
    let host_failed = |e: crate::error::CompLocError| SubstitutionError::HostMutationFailed {
        reason: e.to_string(),
    };

    match (row.kind, resolved.kind) {
        (LeafKind::Text, LeafKind::Text) => {
            host.set_text(resolved.leaf, value).map_err(host_failed)
        }
        (LeafKind::Asset, LeafKind::Asset) => {
            let path = assets.resolve(value);
            if !assets.exists(&path) {
                return Err(SubstitutionError::AssetNotFound { path });
            }
            host.set_asset_path(resolved.leaf, &path).map_err(host_failed)
        }
        (expected, found) => Err(SubstitutionError::WrongLeafKind {
            leaf: row.leaf_name.clone(),
            expected,
            found,
        }),
    }
}
