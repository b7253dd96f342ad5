//! Emission Shell
//!
//! Orchestrates one translation per input model and writes the rendered
//! protocol to `<output-root>/<namespace-segments>/<ProtocolName>.avpr`,
//! creating intermediate directories as needed. The output root doubles as
//! the generated-resource directory a surrounding build registers, which is
//! why the path derivation must follow the protocol's own namespace exactly.
//!
//! Translation is deterministic and pure, so the shell never retries a
//! failed translation - it surfaces the error and lets the build break.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::model::MetaModel;
use crate::protocol::Protocol;
use crate::translate::translate;

/// Writes translated protocols beneath a fixed output root
pub struct Generator {
    output_root: PathBuf,
}

/// A successfully written protocol file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// The `.avpr` file that was written
    pub path: PathBuf,
    /// The directory to register as a generated-resource root
    pub resource_root: PathBuf,
}

impl Generator {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Translate a meta-model and write the resulting protocol file
    pub fn generate(&self, model: &MetaModel) -> anyhow::Result<GeneratedFile> {
        let protocol = translate(model)?;
        self.check_avro_validity(&protocol)?;

        let path = self.protocol_path(&protocol);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, protocol.to_pretty_json())
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(
            protocol = %protocol.name,
            namespace = %protocol.namespace,
            types = protocol.types.len(),
            path = %path.display(),
            "wrote Avro protocol"
        );

        Ok(GeneratedFile {
            path,
            resource_root: self.output_root.clone(),
        })
    }

    /// Output path derived from the protocol's namespace and name
    pub fn protocol_path(&self, protocol: &Protocol) -> PathBuf {
        let mut path = self.output_root.clone();
        for segment in protocol.namespace.split('.') {
            path.push(segment);
        }
        path.join(format!("{}.avpr", protocol.name))
    }

    /// Parse the emitted type list back through the Avro library. The
    /// translator guarantees self-consistency, so a failure here means the
    /// document would be rejected by downstream Avro tooling.
    fn check_avro_validity(&self, protocol: &Protocol) -> anyhow::Result<()> {
        let types = protocol.types_as_json_strings();
        let inputs: Vec<&str> = types.iter().map(String::as_str).collect();
        apache_avro::Schema::parse_list(&inputs).with_context(|| {
            format!("generated protocol `{}` is not valid Avro", protocol.name)
        })?;
        Ok(())
    }
}
