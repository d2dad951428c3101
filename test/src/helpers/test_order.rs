use std::{any::Any, sync::Arc};

use downflux_shared::{
    ClientId, EntityId, Fsm, FsmError, FsmState, FsmType, Instance, InstanceBase, InstanceId,
    Tick,
};

/// Generic FSM instance of any type, for exercising schedules and groups.
#[derive(Debug)]
pub struct TestOrder {
    id: InstanceId,
    client_id: ClientId,
    entity_id: EntityId,
    tick: Tick,
    base: InstanceBase,
}

impl TestOrder {
    pub fn new(fsm_type: FsmType, client_id: &ClientId, entity_id: &str, tick: Tick) -> Arc<Self> {
        Self::with_id(
            fsm_type,
            &format!("{}/{}", entity_id, fsm_type),
            client_id,
            entity_id,
            tick,
        )
    }

    pub fn with_id(
        fsm_type: FsmType,
        id: &str,
        client_id: &ClientId,
        entity_id: &str,
        tick: Tick,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: InstanceId::from(id),
            client_id: client_id.clone(),
            entity_id: EntityId::from(entity_id),
            tick,
            base: InstanceBase::new(Fsm::common(fsm_type), FsmState::Pending),
        })
    }
}

impl Instance for TestOrder {
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
