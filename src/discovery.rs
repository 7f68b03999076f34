//! Enumerates every resource kind the apiserver serves.
//!
//! This walks the discovery endpoints directly (`/api`, `/apis` and their
//! per-groupVersion listings) instead of the cached `kube::Discovery` client,
//! so the descriptor order matches what the server reported.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::{
    core::{gvk::ParseGroupVersionError, GroupVersion, GroupVersionKind},
    discovery::{verbs, ApiResource},
    Client,
};

use crate::error::Error;

/// One resource kind reported by discovery: its GVR plus supported verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// API group, empty for the core group
    pub group: String,
    pub version: String,
    /// Plural name, used as the collection path segment
    pub plural: String,
    pub kind: String,
    pub verbs: Vec<String>,
}

impl ResourceDescriptor {
    /// Whether the server accepts collection list calls for this kind.
    pub fn supports_list(&self) -> bool {
        self.verbs.iter().any(|v| v == verbs::LIST)
    }

    /// Type information for constructing a dynamic `Api` against this kind.
    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(&self.group, &self.version, &self.kind);
        ApiResource::from_gvk_with_plural(&gvk, &self.plural)
    }
}

impl std::fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.plural)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.plural)
        }
    }
}

/// Fetches the full server catalog and returns one descriptor per reported
/// resource entry, in server order (core group first, like client-go).
///
/// Fails as a whole on any round-trip error or malformed groupVersion; no
/// partial catalog is ever returned.
pub async fn enumerate(client: &Client) -> Result<Vec<ResourceDescriptor>, Error> {
    let mut lists: Vec<APIResourceList> = Vec::new();

    let core = client.list_core_api_versions().await.map_err(Error::Discovery)?;
    for version in &core.versions {
        let rl = client
            .list_core_api_resources(version)
            .await
            .map_err(Error::Discovery)?;
        lists.push(rl);
    }

    let groups = client.list_api_groups().await.map_err(Error::Discovery)?;
    for group in groups.groups {
        for vers in &group.versions {
            let rl = client
                .list_api_group_resources(&vers.group_version)
                .await
                .map_err(Error::Discovery)?;
            lists.push(rl);
        }
    }

    descriptors_from(&lists)
}

/// Folds raw discovery listings into descriptors.
///
/// A resource entry may carry explicit `group`/`version` fields (aggregated
/// APIs do this); when present and non-empty they take precedence over the
/// values inherited from the listing's groupVersion.
pub fn descriptors_from(lists: &[APIResourceList]) -> Result<Vec<ResourceDescriptor>, Error> {
    let mut all = Vec::new();
    for list in lists {
        // GroupVersion::from_str splits on the first slash only, so
        // "a/b/c" would "parse" as group=a, version=b/c; reject it here
        if list.group_version.matches('/').count() > 1 {
            return Err(Error::InvalidGroupVersion(ParseGroupVersionError(
                list.group_version.clone(),
            )));
        }
        let gv: GroupVersion = list.group_version.parse()?;
        for res in &list.resources {
            let group = res
                .group
                .clone()
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| gv.group.clone());
            let version = res
                .version
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| gv.version.clone());
            all.push(ResourceDescriptor {
                group,
                version,
                plural: res.name.clone(),
                kind: res.kind.clone(),
                verbs: res.verbs.clone(),
            });
        }
    }
    Ok(all)
}
