//! GitLab wire types.

use serde::{Deserialize, Serialize};

use crate::domain::merge_request::{MergeRequestEvent, MergeRequestId};

/// Payload of a GitLab "Merge Request Hook" webhook.
///
/// Only the fields the relay needs are decoded. See
/// <https://docs.gitlab.com/ee/user/project/integrations/webhook_events.html#merge-request-events>.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequestWebhook {
    #[serde(default)]
    pub object_kind: String,
    pub object_attributes: MergeRequestAttributes,
}

/// `object_attributes` of a merge request webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequestAttributes {
    #[serde(default)]
    pub id: i64,
    /// Project-scoped merge request number. Notes are addressed by this,
    /// not by `id`.
    pub iid: i64,
    #[serde(default)]
    pub source_branch: String,
    pub target_project_id: i64,
    #[serde(default)]
    pub action: String,
}

impl MergeRequestWebhook {
    /// Identity of the merge request the webhook was sent for.
    pub fn merge_request_id(&self) -> MergeRequestId {
        MergeRequestId::new(
            self.object_attributes.target_project_id,
            self.object_attributes.iid,
        )
    }

    /// Converts the payload into the event handed to the relay.
    pub fn into_event(self) -> MergeRequestEvent {
        let target = self.merge_request_id();
        let attributes = self.object_attributes;
        MergeRequestEvent::new(attributes.action, attributes.source_branch, target)
    }
}

/// A note (comment) on a merge request.
#[derive(Debug, Serialize)]
pub struct Note<'a> {
    /// Markdown body.
    pub body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::merge_request::MergeRequestAction;
    use serde_json::json;

    #[test]
    fn webhook_decodes_into_event() {
        let payload = json!({
            "object_kind": "merge_request",
            "user": {"name": "Administrator"},
            "object_attributes": {
                "id": 99,
                "iid": 1,
                "target_branch": "master",
                "source_branch": "feature/xyz982",
                "target_project_id": 14,
                "action": "open"
            }
        });

        let webhook: MergeRequestWebhook = serde_json::from_value(payload).unwrap();
        assert_eq!(webhook.merge_request_id(), MergeRequestId::new(14, 1));

        let event = webhook.into_event();
        assert_eq!(event.action(), &MergeRequestAction::Open);
        assert_eq!(event.source_branch(), "feature/xyz982");
        assert_eq!(event.target(), MergeRequestId::new(14, 1));
    }

    #[test]
    fn missing_target_is_rejected() {
        let payload = json!({"object_attributes": {"action": "open"}});
        assert!(serde_json::from_value::<MergeRequestWebhook>(payload).is_err());
    }

    #[test]
    fn note_serializes_body() {
        let note = Note { body: "hello\n" };
        assert_eq!(serde_json::to_value(&note).unwrap(), json!({"body": "hello\n"}));
    }
}
