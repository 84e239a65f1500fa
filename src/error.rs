//! Crate-wide error type.

use thiserror::Error;

/// Result alias used by every fallible function in the crate.
pub type SC2Result<T> = Result<T, Error>;

/// Everything that can go wrong while talking to the game.
#[derive(Debug, Error)]
pub enum Error {
	/// Websocket transport failure.
	#[error("websocket error: {0}")]
	WebSocket(#[from] tungstenite::Error),
	/// Failed to encode or decode a protocol message.
	#[error("protobuf error: {0}")]
	Proto(#[from] protobuf::ProtobufError),
	/// Process launch or file IO failure.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	/// The connection was closed. `ended` is true when the game reported
	/// `Status::Ended` first, which makes the close expected.
	#[error("connection closed (game ended: {ended})")]
	ConnectionClosed {
		/// Whether the game finished before the close.
		ended: bool,
	},
	/// The response carried error strings from the game.
	#[error("game returned errors: {0:?}")]
	Protocol(Vec<String>),
	/// Could not locate the game installation.
	#[error("StarCraft II not found: {0}")]
	Sc2NotFound(String),
	/// Invalid setup or arguments.
	#[error("bad configuration: {0}")]
	Config(String),
	/// Port configuration exchange failure.
	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// True for the close that follows a finished game.
	pub fn is_graceful_close(&self) -> bool {
		matches!(self, Error::ConnectionClosed { ended: true })
	}
}
