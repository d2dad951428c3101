use std::{collections::BTreeSet, iter, sync::RwLock};

use log::info;

use downflux_shared::ClientId;

use crate::error::ExecutorError;

/// Random ids drawn per registration before giving up.
const MAX_ID_ATTEMPTS: usize = 64;

/// Registry of connected clients.
pub struct ClientList {
    id_length: usize,
    clients: RwLock<BTreeSet<ClientId>>,
}

impl ClientList {
    pub fn new(id_length: usize) -> Result<Self, ExecutorError> {
        if id_length == 0 {
            return Err(ExecutorError::InvalidClientIdLength);
        }
        Ok(Self {
            id_length,
            clients: RwLock::new(BTreeSet::new()),
        })
    }

    /// Registers a client under a fresh random alphanumeric id. Gives up
    /// with `ClientIdsExhausted` if every drawn id is already taken.
    pub fn add(&self) -> Result<ClientId, ExecutorError> {
        let mut clients = self.clients.write().map_err(|_| ExecutorError::LockPoisoned)?;
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ClientId::new(
                iter::repeat_with(fastrand::alphanumeric)
                    .take(self.id_length)
                    .collect::<String>(),
            );
            if clients.insert(id.clone()) {
                info!("client {} registered", id);
                return Ok(id);
            }
        }
        Err(ExecutorError::ClientIdsExhausted {
            id_length: self.id_length,
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    pub fn remove(&self, client_id: &ClientId) -> Result<bool, ExecutorError> {
        let mut clients = self.clients.write().map_err(|_| ExecutorError::LockPoisoned)?;
        Ok(clients.remove(client_id))
    }

    pub fn contains(&self, client_id: &ClientId) -> Result<bool, ExecutorError> {
        let clients = self.clients.read().map_err(|_| ExecutorError::LockPoisoned)?;
        Ok(clients.contains(client_id))
    }

    /// Fails with `UnknownClient` unless `client_id` is registered.
    pub fn check(&self, client_id: &ClientId) -> Result<(), ExecutorError> {
        if self.contains(client_id)? {
            Ok(())
        } else {
            Err(ExecutorError::UnknownClient {
                client_id: client_id.clone(),
            })
        }
    }

    pub fn len(&self) -> Result<usize, ExecutorError> {
        let clients = self.clients.read().map_err(|_| ExecutorError::LockPoisoned)?;
        Ok(clients.len())
    }

    pub fn is_empty(&self) -> Result<bool, ExecutorError> {
        Ok(self.len()? == 0)
    }
}
