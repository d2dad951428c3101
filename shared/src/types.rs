use std::fmt;

/// The discrete simulation time unit. All state transitions are indexed by
/// tick, and curves are sampled on tick boundaries.
pub type Tick = u64;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a connected player or AI.
    ClientId
);
string_id!(
    /// Opaque identifier of an entity. Unique among the direct children of
    /// any single composite.
    EntityId
);
string_id!(
    /// Identifier shared by every segment of the same logical curve, e.g. the
    /// position history of one entity.
    CurveId
);
string_id!(
    /// Identifier of an FSM instance. At most one instance per id lives in an
    /// instance list at any time.
    InstanceId
);
string_id!(
    /// Deterministic identifier of a conflict group, built from its sorted
    /// member FSM type names.
    GroupId
);

/// A category of behavior that can be scheduled and visited, e.g. Move or
/// Attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FsmType(&'static str);

impl FsmType {
    pub const MOVE: FsmType = FsmType("MOVE");
    pub const CHASE: FsmType = FsmType("CHASE");
    pub const ATTACK: FsmType = FsmType("ATTACK");
    pub const PRODUCE: FsmType = FsmType("PRODUCE");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Registered kind of an entity, used for export and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    EntityList,
    Tank,
    Projectile,
    Custom(&'static str),
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::EntityList => f.write_str("ENTITY_LIST"),
            EntityType::Tank => f.write_str("TANK"),
            EntityType::Projectile => f.write_str("PROJECTILE"),
            EntityType::Custom(name) => f.write_str(name),
        }
    }
}
