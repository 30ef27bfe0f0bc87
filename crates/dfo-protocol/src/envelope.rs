//! The decoded event envelope.
//!
//! Upstream exposes one case entity under two keys: older streams send
//! `case`, newer ones (e.g. `MessageReadChanged`) send `contact`, and some
//! send both. The model keeps a single canonical case. When both keys carry
//! data they must agree field for field; when only one does, the other key
//! is an exact copy. Encoding writes the canonical case under both keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classification::{EventObject, EventType};
use crate::entity::{
    AgentContact, Brand, Case, Channel, CustomerContact, Interaction, Message, RoutingQueue,
    SubQueue, Thread, User,
};
use crate::error::{DecodeError, DecodeResult};
use crate::ids::EventId;
use crate::timestamp::Timestamp;

/// One fully decoded stream event. Owns its whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireEnvelope")]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_object: EventObject,
    pub event_type: EventType,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_with_milliseconds: Option<Timestamp>,
    pub data: EventData,
}

impl EventEnvelope {
    /// Tenant the event belongs to, empty when upstream omitted the brand.
    pub fn tenant_id(&self) -> &str {
        &self.data.brand.tenant_id
    }

    /// Both classification axes resolved to a known name.
    pub fn is_classified(&self) -> bool {
        !self.event_object.is_undefined() && !self.event_type.is_undefined()
    }
}

/// Event payload grouped by sub-entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "WireData")]
pub struct EventData {
    pub brand: Brand,
    pub channel: Channel,
    pub customer_contact: CustomerContact,
    pub routing_queue: RoutingQueue,
    pub sub_queue: SubQueue,
    pub user: User,
    pub inbox_assignee: User,
    pub previous_inbox_assignee: User,
    pub interaction: Interaction,
    pub agent_contact: AgentContact,
    pub thread: Thread,
    pub message: Message,
    case: Option<Case>,
}

impl EventData {
    /// The canonical case, whichever key it arrived under.
    pub fn case(&self) -> Option<&Case> {
        self.case.as_ref()
    }

    /// Alias of [`EventData::case`]; always the identical entity.
    pub fn contact(&self) -> Option<&Case> {
        self.case.as_ref()
    }

    /// Replace the canonical case. An empty case clears it.
    pub fn set_case(&mut self, case: Case) {
        self.case = (!case.is_empty()).then_some(case);
    }
}

/// Reconcile the two case keys into one canonical entity.
pub fn reconcile_case(case: Option<Case>, contact: Option<Case>) -> DecodeResult<Option<Case>> {
    let case = case.filter(|c| !c.is_empty());
    let contact = contact.filter(|c| !c.is_empty());
    match (case, contact) {
        (Some(case), Some(contact)) if case != contact => Err(DecodeError::CaseContactMismatch(
            describe_divergence(&case, &contact),
        )),
        (Some(case), _) => Ok(Some(case)),
        (None, contact) => Ok(contact),
    }
}

fn describe_divergence(case: &Case, contact: &Case) -> String {
    let (Ok(Value::Object(left)), Ok(Value::Object(right))) =
        (serde_json::to_value(case), serde_json::to_value(contact))
    else {
        return "entities differ".to_owned();
    };
    let mut fields: Vec<&str> = left
        .iter()
        .filter(|(key, value)| right.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.as_str())
        .chain(
            right
                .keys()
                .filter(|key| !left.contains_key(key.as_str()))
                .map(String::as_str),
        )
        .collect();
    fields.sort_unstable();
    format!("differing fields [{}]", fields.join(", "))
}

// ─── Wire mirrors ──────────────────────────────────────────────────

/// Wire shape of the envelope: identical to `EventEnvelope` except that the
/// payload still carries both case keys.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireEnvelope {
    #[serde(default)]
    event_id: EventId,
    #[serde(default)]
    event_object: EventObject,
    #[serde(default)]
    event_type: EventType,
    created_at: Timestamp,
    #[serde(default)]
    created_at_with_milliseconds: Option<Timestamp>,
    #[serde(default)]
    data: WireData,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireData {
    brand: Brand,
    channel: Channel,
    customer_contact: CustomerContact,
    routing_queue: RoutingQueue,
    #[serde(rename = "subqueue")]
    sub_queue: SubQueue,
    user: User,
    inbox_assignee: User,
    previous_inbox_assignee: User,
    interaction: Interaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    case: Option<Case>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact: Option<Case>,
    agent_contact: AgentContact,
    thread: Thread,
    message: Message,
}

impl TryFrom<WireEnvelope> for EventEnvelope {
    type Error = DecodeError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: wire.event_id,
            event_object: wire.event_object,
            event_type: wire.event_type,
            created_at: wire.created_at,
            created_at_with_milliseconds: wire.created_at_with_milliseconds,
            data: EventData::try_from(wire.data)?,
        })
    }
}

impl TryFrom<WireData> for EventData {
    type Error = DecodeError;

    fn try_from(wire: WireData) -> Result<Self, Self::Error> {
        Ok(Self {
            case: reconcile_case(wire.case, wire.contact)?,
            brand: wire.brand,
            channel: wire.channel,
            customer_contact: wire.customer_contact,
            routing_queue: wire.routing_queue,
            sub_queue: wire.sub_queue,
            user: wire.user,
            inbox_assignee: wire.inbox_assignee,
            previous_inbox_assignee: wire.previous_inbox_assignee,
            interaction: wire.interaction,
            agent_contact: wire.agent_contact,
            thread: wire.thread,
            message: wire.message,
        })
    }
}

impl From<EventData> for WireData {
    fn from(data: EventData) -> Self {
        Self {
            contact: data.case.clone(),
            case: data.case,
            brand: data.brand,
            channel: data.channel,
            customer_contact: data.customer_contact,
            routing_queue: data.routing_queue,
            sub_queue: data.sub_queue,
            user: data.user,
            inbox_assignee: data.inbox_assignee,
            previous_inbox_assignee: data.previous_inbox_assignee,
            interaction: data.interaction,
            agent_contact: data.agent_contact,
            thread: data.thread,
            message: data.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(status: &str) -> Case {
        Case {
            id: "case-1".into(),
            status: status.into(),
            ..Case::default()
        }
    }

    #[test]
    fn single_key_is_canonical() {
        assert_eq!(reconcile_case(Some(case("open")), None).unwrap(), Some(case("open")));
        assert_eq!(reconcile_case(None, Some(case("open"))).unwrap(), Some(case("open")));
        assert_eq!(reconcile_case(None, None).unwrap(), None);
    }

    #[test]
    fn empty_key_does_not_count_as_present() {
        let reconciled = reconcile_case(Some(Case::default()), Some(case("pending"))).unwrap();
        assert_eq!(reconciled, Some(case("pending")));
    }

    #[test]
    fn identical_keys_agree() {
        assert_eq!(
            reconcile_case(Some(case("open")), Some(case("open"))).unwrap(),
            Some(case("open"))
        );
    }

    #[test]
    fn divergent_keys_name_the_fields() {
        let err = reconcile_case(Some(case("open")), Some(case("closed"))).unwrap_err();
        assert_eq!(
            err,
            DecodeError::CaseContactMismatch("differing fields [status]".into())
        );
    }

    #[test]
    fn set_case_clears_on_empty() {
        let mut data = EventData::default();
        data.set_case(case("open"));
        assert_eq!(data.contact(), Some(&case("open")));
        data.set_case(Case::default());
        assert!(data.case().is_none());
    }

    #[test]
    fn encoding_writes_both_keys() {
        let mut data = EventData::default();
        data.set_case(case("open"));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["case"], json["contact"]);
        assert_eq!(json["case"]["status"], "open");
        assert!(json.get("subqueue").is_some());
    }
}
