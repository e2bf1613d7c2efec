use std::{
    net::{SocketAddr, TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

/// A one-connection server on the loopback interface.
pub struct Loopback<T> {
    pub addr: SocketAddr,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Loopback<T> {
    /// Listen on an ephemeral port and hand the first connection to `serve`.
    pub fn spawn<F>(serve: F) -> Self
    where
        F: FnOnce(TcpStream) -> T + Send + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");

        let handle = thread::spawn(move || {
            let (conn, _) = listener.accept().expect("accept connection");
            serve(conn)
        });

        Self { addr, handle }
    }

    /// Wait for the server to finish and return what it produced.
    pub fn join(self) -> T {
        self.handle.join().expect("server thread panicked")
    }
}
