//! Connection handling and lifecycle
//!
//! One task per accepted connection; suspension points are exactly the read
//! and write operations on the stream halves. Connections share no mutable
//! state with each other.

mod http_connection;
mod line_connection;
mod stream;

pub use http_connection::HttpConnection;
pub use line_connection::LineConnection;
pub use stream::{BufferedRecv, RecvStream, SendStream};
