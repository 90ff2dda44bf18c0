//! Batched address resolution across all retained frames.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crashsym_report::{Frame, ImageRecord};

use crate::tools::DebugTools;

/// A redundant `(in <artifact>)` annotation at the end of a resolver line.
static IN_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(in [^)]*\)\s*$").unwrap());

/// A frame whose address resolved to symbol text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFrame {
    /// The originating frame, replacement key intact.
    pub frame: Frame,
    /// The human-readable symbol description for the frame's address.
    pub symbol: String,
}

/// The distinct addresses of one resolution batch, with the frames sharing
/// each address.
///
/// The order of this list is the order addresses are sent to the resolver,
/// and result lines are paired back by position. Keeping the pairing in one
/// explicitly ordered structure is what guarantees alignment; mapping
/// iteration order is never relied upon.
struct AddressBatch {
    addresses: Vec<String>,
    frames_by_address: Vec<Vec<Frame>>,
}

impl AddressBatch {
    fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut batch = AddressBatch {
            addresses: Vec::new(),
            frames_by_address: Vec::new(),
        };
        let mut index: HashMap<String, usize> = HashMap::new();

        for frame in frames {
            let slot = *index.entry(frame.address.clone()).or_insert_with(|| {
                batch.addresses.push(frame.address.clone());
                batch.frames_by_address.push(Vec::new());
                batch.addresses.len() - 1
            });
            batch.frames_by_address[slot].push(frame);
        }

        batch
    }
}

/// Resolves all retained frames against their debug artifacts.
///
/// Frames are partitioned by owning bundle; each bundle's artifact receives
/// one batched request covering the distinct set of addresses its frames
/// reference. A resolver failure or an entirely unresolvable artifact is a
/// warning, not an error: the affected frames are dropped and resolution of
/// other artifacts continues. The result is a pure filter of the input, so
/// frames without an accepted symbol simply do not appear in it.
pub fn resolve_frames(
    tools: &dyn DebugTools,
    artifacts: &BTreeMap<String, PathBuf>,
    images: &BTreeMap<String, ImageRecord>,
    frames: BTreeMap<String, Frame>,
) -> Vec<ResolvedFrame> {
    let mut by_bundle: BTreeMap<String, Vec<Frame>> = BTreeMap::new();
    for (_, frame) in frames {
        by_bundle
            .entry(frame.bundle_id.clone())
            .or_default()
            .push(frame);
    }

    let mut resolved = Vec::new();

    for (bundle_id, bundle_frames) in by_bundle {
        let (Some(artifact), Some(image)) = (artifacts.get(&bundle_id), images.get(&bundle_id))
        else {
            tracing::debug!("no debug artifact for {}, dropping its frames", bundle_id);
            continue;
        };

        match resolve_batch(tools, artifact, image, bundle_frames) {
            Ok(mut frames) if !frames.is_empty() => resolved.append(&mut frames),
            Ok(_) => tracing::warn!(
                "unable to symbolicate from required binary {}",
                artifact.display()
            ),
            Err(error) => tracing::warn!(
                "resolver failed for {}: {}",
                artifact.display(),
                error
            ),
        }
    }

    resolved
}

/// Resolves one artifact's batch and pairs results positionally.
fn resolve_batch(
    tools: &dyn DebugTools,
    artifact: &Path,
    image: &ImageRecord,
    frames: Vec<Frame>,
) -> Result<Vec<ResolvedFrame>, crate::tools::ToolError> {
    let batch = AddressBatch::new(frames);
    let addresses: Vec<&str> = batch.addresses.iter().map(String::as_str).collect();

    let lines = tools.resolve_addresses(artifact, image.arch, &image.load_address, &addresses)?;
    if lines.len() != addresses.len() {
        return Err(crate::tools::ToolError::TruncatedOutput {
            expected: addresses.len(),
            actual: lines.len(),
        });
    }

    let mut resolved = Vec::new();
    for (frames, line) in batch.frames_by_address.into_iter().zip(lines) {
        let Some(symbol) = accept_symbol(&line) else {
            continue;
        };
        for frame in frames {
            resolved.push(ResolvedFrame {
                frame,
                symbol: symbol.clone(),
            });
        }
    }

    Ok(resolved)
}

/// Cleans up a resolver output line and decides whether it is a resolution.
///
/// Lines starting with a decimal digit are address-only echoes for addresses
/// the resolver could not map, and are rejected.
fn accept_symbol(line: &str) -> Option<String> {
    let line = IN_ARTIFACT.replace(line, "");
    let line = line.trim();

    if line.is_empty() || line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(line.to_string())
}
