// CRUD operation kinds and the concrete calls issued for them

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a resource created on a target
pub type ResourceId = u64;

/// The five CRUD kinds exercised against a target.
///
/// Declaration order is the batched benchmark's phase order, and `Ord`
/// follows it, so a `BTreeMap<Operation, _>` iterates phases in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Create,
    GetAll,
    GetOne,
    Update,
    Delete,
}

impl Operation {
    /// Fixed phase order of the batched benchmark
    pub const PHASES: [Operation; 5] = [
        Operation::Create,
        Operation::GetAll,
        Operation::GetOne,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::GetAll => "GET_ALL",
            Operation::GetOne => "GET_ONE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }

    /// Operations whose invocations are derived from successful creates
    pub fn is_dependent(&self) -> bool {
        matches!(
            self,
            Operation::GetOne | Operation::Update | Operation::Delete
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation to hand to a `LoadClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// Create a user; `seq` seeds the synthetic name and email
    Create { seq: u64 },
    GetAll,
    GetOne { id: ResourceId },
    Update { id: ResourceId },
    Delete { id: ResourceId },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::Create { .. } => Operation::Create,
            Call::GetAll => Operation::GetAll,
            Call::GetOne { .. } => Operation::GetOne,
            Call::Update { .. } => Operation::Update,
            Call::Delete { .. } => Operation::Delete,
        }
    }

    /// Build the call for a dependent operation on an existing resource.
    ///
    /// Returns `None` for CREATE and GET_ALL, which do not target a resource.
    pub fn on_resource(operation: Operation, id: ResourceId) -> Option<Call> {
        match operation {
            Operation::GetOne => Some(Call::GetOne { id }),
            Operation::Update => Some(Call::Update { id }),
            Operation::Delete => Some(Call::Delete { id }),
            Operation::Create | Operation::GetAll => None,
        }
    }
}
