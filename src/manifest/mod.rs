//! # Manifest Loading
//!
//! Reads VirtualService declarations out of Kubernetes manifests. Accepts
//! multi-document YAML (and therefore JSON), with each document being either
//! a `VirtualService` or a `List` of objects. Other kinds are skipped.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::VirtualService;
use crate::errors::{MeshCheckError, Result};

const VIRTUAL_SERVICE_KIND: &str = "VirtualService";
const LIST_KIND: &str = "List";

/// Minimal view of a Kubernetes object; unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KubeObject {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: Option<ObjectMeta>,
    // Decoded only once the kind is known.
    #[serde(default)]
    spec: Option<serde_yaml::Value>,
    #[serde(default)]
    items: Vec<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VirtualServiceSpec {
    #[serde(default)]
    hosts: Vec<String>,
}

/// Parse every VirtualService contained in `text`.
pub fn parse_virtual_services(text: &str) -> Result<Vec<VirtualService>> {
    let mut virtual_services = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)?;
        collect(value, &mut virtual_services)?;
    }

    Ok(virtual_services)
}

/// Read and parse a manifest file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<VirtualService>> {
    let path = path.as_ref();
    let context = format!("reading {}", path.display());

    let text = std::fs::read_to_string(path)
        .map_err(|e| MeshCheckError::from(e).with_context(context.clone()))?;

    let virtual_services =
        parse_virtual_services(&text).map_err(|e| e.with_context(context))?;

    debug!(
        path = %path.display(),
        virtual_services = virtual_services.len(),
        "Loaded manifest"
    );
    Ok(virtual_services)
}

/// Bucket VirtualServices by namespace, using `default_namespace` for
/// manifests that did not set one.
pub fn group_by_namespace(
    virtual_services: Vec<VirtualService>,
    default_namespace: &str,
) -> BTreeMap<String, Vec<VirtualService>> {
    let mut groups: BTreeMap<String, Vec<VirtualService>> = BTreeMap::new();

    for vs in virtual_services {
        let namespace = vs
            .namespace
            .clone()
            .unwrap_or_else(|| default_namespace.to_string());
        groups.entry(namespace).or_default().push(vs);
    }

    groups
}

fn collect(value: serde_yaml::Value, out: &mut Vec<VirtualService>) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    let object: KubeObject = serde_yaml::from_value(value)?;

    match object.kind.as_deref() {
        Some(VIRTUAL_SERVICE_KIND) => out.push(into_virtual_service(object)?),
        Some(LIST_KIND) => {
            for item in object.items {
                collect(item, out)?;
            }
        }
        other => {
            debug!(
                kind = other.unwrap_or("<none>"),
                api_version = object.api_version.as_deref().unwrap_or("<none>"),
                "Skipping non-VirtualService object"
            );
        }
    }

    Ok(())
}

fn into_virtual_service(object: KubeObject) -> Result<VirtualService> {
    let metadata = object.metadata.unwrap_or_default();
    let name = metadata
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            MeshCheckError::validation_field("VirtualService manifest has no name", "metadata.name")
        })?;

    let spec: VirtualServiceSpec = match object.spec {
        Some(spec) if !spec.is_null() => serde_yaml::from_value(spec)
            .map_err(|e| MeshCheckError::from(e).with_context(format!("VirtualService '{}'", name)))?,
        _ => VirtualServiceSpec::default(),
    };

    Ok(VirtualService {
        name,
        namespace: metadata.namespace,
        hosts: spec.hosts,
    })
}
