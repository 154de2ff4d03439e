//! RPC registration: maps RPC ids onto handler operations.
//!
//! A host process passes an RPC id and a JSON payload; the module routes it.
//! How the host receives calls is not this crate's concern.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use hashdata_store::{ContentResolver, Ledger};

use crate::error::{HandlerError, Result};
use crate::handler::Handler;

/// Id under which [`Handler::handle`] is exposed.
pub const RPC_READ_DATA: &str = "read_data";

/// Every RPC this module serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rpc {
    ReadData,
}

impl Rpc {
    pub const ALL: [Rpc; 1] = [Rpc::ReadData];

    pub fn id(self) -> &'static str {
        match self {
            Rpc::ReadData => RPC_READ_DATA,
        }
    }
}

impl fmt::Display for Rpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Rpc {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self> {
        Rpc::ALL
            .into_iter()
            .find(|rpc| rpc.id() == s)
            .ok_or_else(|| HandlerError::UnknownRpc(s.to_string()))
    }
}

/// A loaded module: a handler plus the RPCs bound to it.
pub struct Module<R, L> {
    handler: Handler<R, L>,
}

impl<R: ContentResolver, L: Ledger> Module<R, L> {
    /// Bind every RPC to `handler` and log how long loading took.
    pub fn init(handler: Handler<R, L>) -> Self {
        let start = Instant::now();
        let module = Self { handler };

        for rpc in Rpc::ALL {
            tracing::debug!(rpc = %rpc, "registered rpc");
        }
        tracing::info!(
            rpcs = Rpc::ALL.len(),
            "module loaded in {} msec",
            start.elapsed().as_millis()
        );

        module
    }

    pub fn handler(&self) -> &Handler<R, L> {
        &self.handler
    }

    /// Ids of every registered RPC.
    pub fn rpc_ids(&self) -> impl Iterator<Item = &'static str> {
        Rpc::ALL.into_iter().map(Rpc::id)
    }

    /// Route one call by id.
    pub async fn dispatch(&self, rpc_id: &str, payload: &str) -> Result<String> {
        match rpc_id.parse::<Rpc>()? {
            Rpc::ReadData => self.handler.handle(payload).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashdata_core::ObjectKey;
    use hashdata_store::{MemoryLedger, MemoryResolver};

    fn module() -> Module<MemoryResolver, MemoryLedger> {
        let resolver = MemoryResolver::new().with_object(ObjectKey::new("core", "1.0.0"), "{}");
        Module::init(Handler::new(resolver, MemoryLedger::new()))
    }

    #[test]
    fn test_rpc_ids() {
        assert_eq!("read_data".parse::<Rpc>().unwrap(), Rpc::ReadData);
        assert!(matches!("read".parse::<Rpc>(), Err(HandlerError::UnknownRpc(_))));
        assert_eq!(module().rpc_ids().collect::<Vec<_>>(), vec!["read_data"]);
    }

    #[tokio::test]
    async fn test_dispatch_read_data() {
        let module = module();
        let response = module.dispatch(RPC_READ_DATA, "{}").await.unwrap();
        assert!(response.contains("\"type\":\"core\""));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_rpc() {
        let module = module();
        let err = module.dispatch("write_data", "{}").await.unwrap_err();
        assert!(matches!(err, HandlerError::UnknownRpc(ref id) if id == "write_data"));
        assert_eq!(err.code(), crate::error::code::UNIMPLEMENTED);
        assert_eq!(module.handler().ledger().len().await.unwrap(), 0);
    }
}
