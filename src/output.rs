//! Result types returned by the generator.

use crate::error::{DocumentError, Md2JsonError};
use crate::pipeline::frontmatter::FrontMatter;
use crate::pipeline::record::Post;
use serde::{Deserialize, Serialize};

/// Everything produced by one [`crate::generate::generate`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    /// Published posts, newest first.
    pub posts: Vec<Post>,
    /// Documents that could not be read. Empty on a clean run.
    pub failures: Vec<DocumentError>,
    pub stats: GenerateStats,
}

impl GenerateOutput {
    /// Turn any per-document failure into [`Md2JsonError::PartialFailure`].
    pub fn into_result(self) -> Result<Self, Md2JsonError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(Md2JsonError::PartialFailure {
                failed: self.failures.len(),
                total: self.stats.total_documents,
            })
        }
    }

    /// Serialise the post collection (not the stats) to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, Md2JsonError> {
        let json = if pretty {
            serde_json::to_string_pretty(&self.posts)?
        } else {
            serde_json::to_string(&self.posts)?
        };
        Ok(json)
    }
}

/// Counters for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStats {
    /// `*.md` entries found in the input directory.
    pub total_documents: usize,
    pub published: usize,
    pub drafts: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// A single document broken down by [`crate::generate::inspect`].
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub metadata: FrontMatter,
    pub draft: bool,
    /// The post record this document would produce, drafts included.
    pub post: Post,
}
