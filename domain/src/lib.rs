use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod palindrome;

/// A stored text item plus its derived palindrome classification and metadata.
///
/// Created once at insertion time and immutable thereafter. The `palindrome`
/// flag is the classifier's output on `text` at creation time, computed under
/// whichever mode the service was configured with; it is never recomputed, so
/// a later change of mode does not retroactively affect stored messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque unique identifier.
    pub id: String,
    /// The original input string, stored verbatim.
    pub text: String,
    /// Classification result at creation time.
    pub palindrome: bool,
    /// Creation timestamp, serialized as an RFC3339 string.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
