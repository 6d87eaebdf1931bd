//! HTTP demo server: `/echo` streams the request body back, everything else
//! gets a fixed reply.
//!
//! ```sh
//! cargo run --example http_server
//! curl -d 'hello' http://127.0.0.1:8080/echo
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use micro_framed::connection::HttpConnection;
use micro_framed::handler::Handler;
use micro_framed::protocol::{BodyRead, HttpError, ParsedRequest, ResponseDescriptor};

/// Maps the request target to a body-producing strategy.
struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(
        &self,
        request: &ParsedRequest,
        _body: &mut (dyn BodyRead + Send),
    ) -> Result<ResponseDescriptor, HttpError> {
        info!(method = %request.method(), path = request.target(), "handling request");

        if request.target() == "/echo" {
            Ok(ResponseDescriptor::echo(StatusCode::OK))
        } else {
            Ok(ResponseDescriptor::full(StatusCode::OK, "Hello World!\r\n"))
        }
    }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    let handler = Arc::new(EchoHandler);

    loop {
        let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = handler.clone();

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(_) => info!("finished process, connection shutdown"),
                Err(e) => error!("service has error, cause {}, connection shutdown", e),
            }
        });
    }
}
