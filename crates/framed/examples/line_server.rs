//! Line-protocol demo server: echoes newline-terminated messages, `quit`
//! closes the connection.
//!
//! ```sh
//! cargo run --example line_server
//! printf 'hello\nquit\n' | nc 127.0.0.1 9090
//! ```

use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use micro_framed::connection::LineConnection;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 9090, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:9090").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = LineConnection::new(reader, writer);
            match connection.run().await {
                Ok(_) => info!("finished echo session, connection shutdown"),
                Err(e) => error!("echo session has error, cause {}, connection shutdown", e),
            }
        });
    }
}
