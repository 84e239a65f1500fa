//! Thin request/response wrapper around the game websocket.
//!
//! The protocol is strictly one request in flight at a time, so the wrapper
//! owns the socket and serialises access through `&mut self`.

use crate::error::{Error, SC2Result};
use protobuf::Message;
use sc2_proto::sc2api::{Request, Response, Status};
use std::net::TcpStream;
use tungstenite::{stream::MaybeTlsStream, Message as WsMessage, WebSocket};

pub type WS = WebSocket<MaybeTlsStream<TcpStream>>;

pub struct API {
	ws: WS,
	status: Status,
}

impl API {
	pub fn new(ws: WS) -> Self {
		Self {
			ws,
			status: Status::unknown,
		}
	}

	/// Last status the game reported.
	pub fn status(&self) -> Status {
		self.status
	}
	pub fn is_ended(&self) -> bool {
		matches!(self.status, Status::ended | Status::quit)
	}

	/// Sends a request and waits for its response.
	pub fn send(&mut self, req: Request) -> SC2Result<Response> {
		self.send_only(req)?;
		self.wait_response()
	}

	/// Sends a request without reading the response.
	pub fn send_only(&mut self, req: Request) -> SC2Result<()> {
		trace!("Sending request: {:?}", req);
		self.ws
			.write_message(WsMessage::Binary(req.write_to_bytes()?))
			.map_err(|e| self.close_error(e))?;
		Ok(())
	}

	/// Reads the next response, skipping non-binary frames.
	pub fn wait_response(&mut self) -> SC2Result<Response> {
		loop {
			let msg = self.ws.read_message().map_err(|e| self.close_error(e))?;
			if let WsMessage::Binary(data) = msg {
				let mut res = Response::new();
				res.merge_from_bytes(&data)?;
				if res.has_status() {
					self.status = res.get_status();
				}
				let errors = res.get_error();
				if !errors.is_empty() {
					error!("Response errors: {:?}", errors);
					return Err(Error::Protocol(errors.to_vec()));
				}
				return Ok(res);
			}
		}
	}

	fn close_error(&self, e: tungstenite::Error) -> Error {
		match e {
			tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
				Error::ConnectionClosed {
					ended: self.is_ended(),
				}
			}
			other => other.into(),
		}
	}
}
