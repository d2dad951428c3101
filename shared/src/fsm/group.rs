use std::collections::{BTreeMap, BTreeSet};

use crate::{fsm::GroupError, FsmType, GroupId};

/// A set of FSM types that may be scheduled independently but can never be
/// simultaneously active for the same entity, e.g. Move, Chase and Attack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    fsm_types: BTreeSet<FsmType>,
}

impl Group {
    /// The id is derived from the sorted member names, so the same member
    /// set always yields the same id.
    pub fn new(fsm_types: impl IntoIterator<Item = FsmType>) -> Self {
        let fsm_types: BTreeSet<FsmType> = fsm_types.into_iter().collect();
        let id = fsm_types
            .iter()
            .map(|fsm_type| fsm_type.name())
            .collect::<Vec<_>>()
            .join("/");

        Self {
            id: GroupId::new(id),
            fsm_types,
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn fsm_types(&self) -> impl Iterator<Item = FsmType> + '_ {
        self.fsm_types.iter().copied()
    }

    pub fn contains(&self, fsm_type: FsmType) -> bool {
        self.fsm_types.contains(&fsm_type)
    }

    /// Whether the two groups share a member.
    pub fn collide(&self, other: &Group) -> bool {
        !self.fsm_types.is_disjoint(&other.fsm_types)
    }
}

/// Read-only registry of conflict groups, validated at construction.
#[derive(Clone, Debug, Default)]
pub struct GroupList {
    groups: BTreeMap<GroupId, Group>,
}

impl GroupList {
    /// Builds the registry. Any pair of colliding groups fails the whole
    /// construction; no partial list is returned.
    pub fn new(groups: impl IntoIterator<Item = Group>) -> Result<Self, GroupError> {
        let groups: Vec<Group> = groups.into_iter().collect();

        for (index, group) in groups.iter().enumerate() {
            if group.fsm_types.is_empty() {
                return Err(GroupError::EmptyGroup);
            }
            for other in &groups[index + 1..] {
                if group.collide(other) || other.collide(group) {
                    let (first, second) = if group.id() <= other.id() {
                        (group.id().clone(), other.id().clone())
                    } else {
                        (other.id().clone(), group.id().clone())
                    };
                    return Err(GroupError::Conflicting { first, second });
                }
            }
        }

        Ok(Self {
            groups: groups
                .into_iter()
                .map(|group| (group.id().clone(), group))
                .collect(),
        })
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Id of the group containing `fsm_type`. `None` means the type is
    /// ungrouped, which is a valid state.
    pub fn id(&self, fsm_type: FsmType) -> Option<&GroupId> {
        self.group_of(fsm_type).map(Group::id)
    }

    pub fn group_of(&self, fsm_type: FsmType) -> Option<&Group> {
        self.groups.values().find(|group| group.contains(fsm_type))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }
}
