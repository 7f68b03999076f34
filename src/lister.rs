//! Aggregates every listable object in the cluster into one collection.

use std::time::Instant;

use kube::{
    api::{Api, DynamicObject, ListParams},
    core::TypeMeta,
    Client, ResourceExt,
};
use tracing::{debug, warn};

use crate::{
    discovery::{self, ResourceDescriptor},
    error::Error,
};

/// A resource kind whose list call failed during aggregation.
#[derive(Debug)]
pub struct SkippedResource {
    pub resource: ResourceDescriptor,
    pub error: kube::Error,
}

/// Result of one aggregation pass.
///
/// `skipped` records the kinds whose list calls failed; those failures never
/// abort the pass, but callers can tell a complete result from a degraded one
/// without grepping logs.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub objects: Vec<DynamicObject>,
    pub skipped: Vec<SkippedResource>,
}

/// Lists objects of arbitrary kinds via the dynamic API.
pub struct Lister {
    client: Client,
}

impl Lister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Enumerates every resource kind the server reports.
    pub async fn list_all_group_version_resources(&self) -> Result<Vec<ResourceDescriptor>, Error> {
        let start = Instant::now();
        let descriptors = discovery::enumerate(&self.client).await?;
        debug!(elapsed = ?start.elapsed(), kinds = descriptors.len(), "discovery complete");
        Ok(descriptors)
    }

    /// Lists all objects of every kind that supports the list verb.
    ///
    /// `opts` is forwarded verbatim to every list call. With
    /// `include_controlled == false`, objects carrying an owner reference are
    /// dropped from the result (relative order of the rest is preserved).
    ///
    /// Discovery failure fails the whole call; a list failure for one kind
    /// only lands that kind in [`Aggregation::skipped`].
    pub async fn list_all_resources(
        &self,
        opts: &ListParams,
        include_controlled: bool,
    ) -> Result<Aggregation, Error> {
        let descriptors = self.list_all_group_version_resources().await?;

        let mut agg = Aggregation::default();
        for descriptor in descriptors {
            if !descriptor.supports_list() {
                continue;
            }
            let ar = descriptor.api_resource();
            let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &ar);
            let start = Instant::now();
            match api.list(opts).await {
                Ok(list) => {
                    debug!(resource = %descriptor, elapsed = ?start.elapsed(),
                           count = list.items.len(), "listed");
                    // the server omits per-item TypeMeta in list responses;
                    // backfill it from the descriptor so every record keeps
                    // its kind (client-go does the same when decoding lists)
                    let types = TypeMeta {
                        api_version: ar.api_version.clone(),
                        kind: ar.kind.clone(),
                    };
                    agg.objects.extend(list.items.into_iter().map(|mut obj| {
                        if obj.types.is_none() {
                            obj.types = Some(types.clone());
                        }
                        obj
                    }));
                }
                Err(error) => {
                    warn!(resource = %descriptor, %error, "list failed, skipping kind");
                    agg.skipped.push(SkippedResource {
                        resource: descriptor,
                        error,
                    });
                }
            }
        }

        if !include_controlled {
            agg.objects.retain(|obj| obj.owner_references().is_empty());
        }
        Ok(agg)
    }
}
