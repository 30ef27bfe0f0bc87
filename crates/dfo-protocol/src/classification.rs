//! Event classification axes: the object an event is about and the
//! business transition it reports.
//!
//! Both axes are closed name tables. Wire values are the canonical names,
//! never integers. Any name outside a table (or a non-string wire value)
//! resolves to `Undefined` instead of failing, so new upstream event kinds
//! flow through as unclassified events.
//!
//! The two axes are independent: nothing checks that an `EventType` is
//! plausible for its `EventObject`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! name_table {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            /// Sentinel for names outside the table.
            #[default]
            Undefined,
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value, sentinel first, in table order.
            pub const ALL: &'static [$name] = &[$name::Undefined, $($name::$variant,)+];

            /// Resolve a wire name. Never fails.
            pub fn from_name(name: &str) -> Self {
                match name {
                    $( $wire => Self::$variant, )+
                    _ => Self::Undefined,
                }
            }

            /// Canonical wire name.
            pub fn name(self) -> &'static str {
                match self {
                    Self::Undefined => "Undefined",
                    $( Self::$variant => $wire, )+
                }
            }

            pub fn is_undefined(self) -> bool {
                self == Self::Undefined
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from_name(s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = serde_json::Value::deserialize(deserializer)?;
                Ok(raw.as_str().map(Self::from_name).unwrap_or_default())
            }
        }
    };
}

name_table!(
    /// The entity an event is about.
    EventObject {
        Channel => "Channel",
        RoutingQueue => "RoutingQueue",
        Case => "Case",
        Message => "Message",
        Thread => "Thread",
        /// Customer-contact events are published with this object.
        Contact => "Contact",
    }
);

name_table!(
    /// The business transition an event reports.
    EventType {
        ChannelCreated => "ChannelCreated",
        ChannelDeleted => "ChannelDeleted",
        ChannelUpdated => "ChannelUpdated",
        RoutingQueueCreated => "RoutingQueueCreated",
        RoutingQueueDeleted => "RoutingQueueDeleted",
        RoutingQueueUpdated => "RoutingQueueUpdated",
        UserAssignedToRoutingQueue => "UserAssignedToRoutingQueue",
        UserUnassignedFromRoutingQueue => "UserUnassignedFromRoutingQueue",
        CaseCreated => "CaseCreated",
        CaseStatusChanged => "CaseStatusChanged",
        CaseToRoutingQueueAssignmentChanged => "CaseToRoutingQueueAssignmentChanged",
        CaseInboxAssigneeChanged => "CaseInboxAssigneeChanged",
        MessageAddedIntoCase => "MessageAddedIntoCase",
        AgentContactStarted => "AgentContactStarted",
        AgentContactEnded => "AgentContactEnded",
        MessageCreated => "MessageCreated",
        MessageUpdated => "MessageUpdated",
        MessageReadChanged => "MessageReadChanged",
        MessageSeenByUser => "MessageSeenByUser",
        MessageSeenByEndUser => "MessageSeenByEndUser",
        MessageDeliveredToEndUser => "MessageDeliveredToEndUser",
        MessageDeliveredToUser => "MessageDeliveredToUser",
        ThreadFocused => "ThreadFocused",
        ThreadUnfocused => "ThreadUnfocused",
        CustomerContactClosed => "CustomerContactClosed",
        CustomerContactCreated => "CustomerContactCreated",
        CaseCreatedEscalated => "CaseCreatedEscalated",
        CaseCreatedNew => "CaseCreatedNew",
        CaseCreatedOpen => "CaseCreatedOpen",
        CaseCreatedPending => "CaseCreatedPending",
        CaseCreatedResolved => "CaseCreatedResolved",
        ContactGetAbandoned => "ContactGetAbandoned",
        DigitalAcwStarted => "DigitalACWStarted",
    }
);
