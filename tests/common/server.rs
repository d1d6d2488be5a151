use gambit::messages::WireConfig;
use gambit::session::{SessionHandler, SessionRegistry};
use gambit::storage::MemoryStore;
use gambit::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub task: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run a server over `store` on an ephemeral loopback port
pub async fn start_server(store: Arc<MemoryStore>) -> TestServer {
    let handler = Arc::new(SessionHandler::new(
        store.clone(),
        store.clone(),
        Arc::new(SessionRegistry::new()),
    ));
    let server = Server::bind("127.0.0.1:0", handler, WireConfig::default())
        .await
        .expect("bind test server");
    let addr = server.local_addr().expect("local addr");
    let task = tokio::spawn(async move {
        let _ = server.run().await;
    });

    TestServer { addr, store, task }
}
