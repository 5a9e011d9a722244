use std::sync::Arc;

use axum::extract::FromRef;
use watchparty_collab::Collab;

use crate::Gateway;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub collab: Arc<Collab>,
    pub gateway: Arc<Gateway>,
}

impl ServerContext {
    pub fn new(collab: Arc<Collab>) -> Self {
        Self {
            gateway: Gateway::new(collab.clone()).into(),
            collab,
        }
    }
}
