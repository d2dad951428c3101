use std::any::Any;

use downflux_shared::{
    ClientId, EntityId, Fsm, FsmError, FsmState, FsmType, Instance, InstanceBase, InstanceId,
    Position, Tick,
};

/// One Move order for one entity.
///
/// The instance id is derived from the entity, so a newer order for the
/// same entity displaces the older one in an instance list.
#[derive(Debug)]
pub struct MoveInstance {
    id: InstanceId,
    client_id: ClientId,
    entity_id: EntityId,
    tick: Tick,
    destination: Position,
    base: InstanceBase,
}

impl MoveInstance {
    pub fn new(client_id: ClientId, entity_id: EntityId, tick: Tick, destination: Position) -> Self {
        Self {
            id: InstanceId::new(format!("{}/{}", entity_id, FsmType::MOVE)),
            client_id,
            entity_id,
            tick,
            destination,
            base: InstanceBase::new(Fsm::common(FsmType::MOVE), FsmState::Pending),
        }
    }

    pub fn destination(&self) -> Position {
        self.destination
    }
}

impl Instance for MoveInstance {
    fn id(&self) -> &InstanceId {
        &self.id
    }

    fn fsm_type(&self) -> FsmType {
        self.base.fsm_type()
    }

    fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    fn tick(&self) -> Tick {
        self.tick
    }

    fn state(&self) -> Result<FsmState, FsmError> {
        self.base.state()
    }

    fn transition(&self, to: FsmState, virtual_only: bool) -> Result<(), FsmError> {
        self.base.transition(to, virtual_only)
    }

    fn cancel(&self) -> Result<(), FsmError> {
        self.base.cancel()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
