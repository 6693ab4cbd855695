//! Merge engine.
//!
//! Folds the per-channel replies of one turn into a [`CombinedResponse`].
//! Replies are visited in [`ChannelKind`] merge order (Understanding, then
//! Response) no matter which push arrived first, so the result never depends
//! on network timing.
//!
//! Field policy, later replies overwriting earlier ones:
//!
//! | Field | Rule |
//! |-------|------|
//! | `text` | overwrite when non-empty |
//! | `buttons` | overwrite when non-empty |
//! | `source_data` | accumulate; arrays are concatenated |
//! | `nlp` | overwrite when present |

use crate::orchestration::value_objects::{ChannelReply, CombinedResponse};
use serde_json::Value;

/// Merge replies into one combined response.
///
/// Pure: inputs are only read, and equal inputs give equal output.
pub fn merge(replies: &[ChannelReply]) -> CombinedResponse {
    let mut ordered: Vec<&ChannelReply> = replies.iter().collect();
    // Stable sort keeps arrival order among replies of the same channel.
    ordered.sort_by_key(|r| r.channel.merge_rank());

    let mut combined = CombinedResponse::default();

    for ChannelReply { reply, .. } in ordered {
        if let Some(text) = reply.non_empty_text() {
            combined.text = Some(text.to_string());
        }
        if !reply.buttons.is_empty() {
            combined.buttons = reply.buttons.clone();
        }
        match &reply.source_data {
            Some(Value::Array(items)) => combined.source_data.extend(items.iter().cloned()),
            Some(other) => combined.source_data.push(other.clone()),
            None => {}
        }
        if let Some(nlp) = &reply.nlp {
            combined.nlp = Some(nlp.clone());
        }
    }

    combined
}
