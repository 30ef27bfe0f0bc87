//! Payload entities carried inside an event's `data` object.
//!
//! Every field is optional on the wire and decodes to its zero value when
//! absent. Key names follow upstream, including the few that are not
//! camelCase.

use serde::{Deserialize, Serialize};

use crate::change::FieldChange;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub tenant_id: String,
    pub business_unit_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub id_on_external_platform: String,
    pub is_deleted: bool,
    pub is_private: bool,
    pub real_external_platform_id: String,
    pub studio_script: String,
    pub integration_box_identifier: String,
    #[serde(rename = "_changes", skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AfterContactWork {
    pub is_enabled: bool,
    pub out_state_id: i32,
    pub timer_in_milliseconds: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingQueue {
    pub id: String,
    pub name: String,
    pub is_accept_reject_flow_enabled: bool,
    pub is_deleted: bool,
    #[serde(rename = "isSubqueue")]
    pub is_sub_queue: bool,
    pub skill_id: i32,
    pub after_contact_work: AfterContactWork,
    #[serde(rename = "_changes", skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubQueue {
    pub id: String,
    pub name: String,
    #[serde(rename = "isSubqueue")]
    pub is_sub_queue: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(rename = "incontactId")]
    pub incontact_id: String,
    pub is_bot_user: bool,
    pub email_address: String,
    pub login_username: String,
    pub first_name: String,
    pub surname: String,
    pub nickname: String,
    pub image_url: String,
    pub is_survey_user: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndUserIdentity {
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub nickname: String,
    pub id_on_external_platform: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipient {
    pub id_on_external_platform: String,
    pub name: String,
    pub is_primary: bool,
    pub is_private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipientCustomer {
    pub id: String,
    pub first_name: String,
    pub surname: String,
    pub full_name: String,
}

/// Abandonment details of a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Abandon {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandoned_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandoned_at_with_milliseconds: Option<Timestamp>,
}

/// A case, exposed upstream under both the `case` and `contact` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub thread_id: String,
    pub interaction_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_at_with_milliseconds: Option<Timestamp>,
    pub routing_queue_id: String,
    pub routing_queue_priority: i32,
    pub inbox_assignee: i64,
    pub owner_assignee: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub end_user_recipients: Vec<Recipient>,
    pub recipients_customers: Vec<RecipientCustomer>,
    pub direction: String,
    pub author_end_user_identity: EndUserIdentity,
    pub author_user: User,
    pub detail_url: String,
    pub contact_id: String,
    pub customer_contact_id: String,
    pub abandon: Abandon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_with_milliseconds: Option<Timestamp>,
}

impl Case {
    /// True when no field carries data, e.g. the key was sent as `{}`.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentContact {
    pub id: String,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_with_milliseconds: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at_with_milliseconds: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerContact {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub id_on_external_platform: String,
    pub thread_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentRemoved {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagePayload {
    pub text: String,
    pub postback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageContent {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: MessagePayload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReactionStatistics {
    pub is_liked_by_channel: bool,
    pub is_shared_by_channel: bool,
    pub likes: i64,
    pub shares: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplyToMessage {
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    pub id_on_external_platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: i64,
    pub color: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    pub thread_id: String,
    pub author_end_user_identity: EndUserIdentity,
    pub author_name_removed: ContentRemoved,
    pub author_user: User,
    pub content_removed: ContentRemoved,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contact_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    pub deleted_on_external_platform: bool,
    pub direction: String,
    pub id_on_external_platform: String,
    pub is_hidden_on_external_platform: bool,
    pub is_read: bool,
    pub message_content: MessageContent,
    pub reaction_statistics: ReactionStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<Timestamp>,
    pub reply_to_message: ReplyToMessage,
    pub sentiment: String,
    pub tags: Vec<Tag>,
}
