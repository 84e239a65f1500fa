//! Relay for externally-managed bots.
//!
//! A proxied bot speaks the full protocol itself; this side only forwards
//! frames between the bot's websocket and the game's, watching responses for
//! the player results. A connection closed after a result arrived is a
//! finished game, not a failure.

use crate::{
	api::WS,
	error::{Error, SC2Result},
	player::GameResult,
	IntoSC2,
};
use protobuf::Message;
use sc2_proto::sc2api::{Response, Status};
use std::net::TcpListener;
use tungstenite::{stream::MaybeTlsStream, Message as WsMessage};

/// Tracks what the relayed responses said about the game's outcome.
#[derive(Default)]
struct ResultWatcher {
	results: Vec<(u32, GameResult)>,
	ended: bool,
}

impl ResultWatcher {
	fn watch(&mut self, data: &[u8]) -> SC2Result<()> {
		let mut res = Response::new();
		res.merge_from_bytes(data)?;
		if res.has_status() && res.get_status() == Status::ended {
			self.ended = true;
		}
		for result in res.get_observation().get_player_result() {
			let player_id = result.get_player_id();
			if !self.results.iter().any(|(id, _)| *id == player_id) {
				self.results
					.push((player_id, result.get_result().into_sc2()));
			}
		}
		Ok(())
	}
	fn game_over(&self) -> bool {
		self.ended || !self.results.is_empty()
	}
}

pub struct Proxy {
	bot: WS,
	game: WS,
	watcher: ResultWatcher,
}

impl Proxy {
	/// Waits for the external bot to connect on `port`, then pairs it with an
	/// already connected game websocket.
	pub fn accept_bot(host: &str, port: i32, game: WS) -> SC2Result<Self> {
		let listener = TcpListener::bind(format!("{}:{}", host, port))?;
		info!("waiting for a proxied bot on {}:{}", host, port);
		let (stream, addr) = listener.accept()?;
		debug!("proxied bot connected from {}", addr);
		let bot = tungstenite::accept(MaybeTlsStream::Plain(stream))
			.map_err(|e| Error::Config(format!("proxy handshake failed: {}", e)))?;
		Ok(Self {
			bot,
			game,
			watcher: ResultWatcher::default(),
		})
	}

	/// Forwards requests and responses until the game ends or a side
	/// disconnects. Returns the player results seen on the wire.
	pub fn run(mut self) -> SC2Result<Vec<(u32, GameResult)>> {
		loop {
			// The protocol is one request in flight at a time, so the relay
			// is a lock-step loop.
			let request = match self.bot.read_message() {
				Ok(msg) => msg,
				Err(e) => return self.finish(e),
			};
			match request {
				WsMessage::Binary(data) => {
					if let Err(e) = self.game.write_message(WsMessage::Binary(data)) {
						return self.finish(e);
					}
					let response = match self.game.read_message() {
						Ok(msg) => msg,
						Err(e) => return self.finish(e),
					};
					if let WsMessage::Binary(data) = response {
						self.watcher.watch(&data)?;
						if let Err(e) = self.bot.write_message(WsMessage::Binary(data)) {
							return self.finish(e);
						}
					}
				}
				WsMessage::Close(_) => {
					return self.finish(tungstenite::Error::ConnectionClosed);
				}
				_ => {}
			}
		}
	}

	fn finish(mut self, e: tungstenite::Error) -> SC2Result<Vec<(u32, GameResult)>> {
		let closed = matches!(
			e,
			tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
		);
		if closed && self.watcher.game_over() {
			debug!("proxied game finished: {:?}", self.watcher.results);
			let _ = self.game.close(None);
			return Ok(std::mem::take(&mut self.watcher.results));
		}
		Err(if closed {
			Error::ConnectionClosed {
				ended: self.watcher.ended,
			}
		} else {
			e.into()
		})
	}
}

/// Accepts one external bot on `bot_host:bot_port` and relays it through an
/// already connected game websocket.
pub fn proxy_game(bot_host: &str, bot_port: i32, game: WS) -> SC2Result<Vec<(u32, GameResult)>> {
	Proxy::accept_bot(bot_host, bot_port, game)?.run()
}

#[cfg(test)]
mod tests {
	use super::*;
	use sc2_proto::sc2api::{PlayerResult, Result as ProtoResult};

	fn response_with_result(player_id: u32, result: ProtoResult, ended: bool) -> Vec<u8> {
		let mut res = Response::new();
		let mut player_result = PlayerResult::new();
		player_result.set_player_id(player_id);
		player_result.set_result(result);
		res.mut_observation().mut_player_result().push(player_result);
		if ended {
			res.set_status(Status::ended);
		}
		res.write_to_bytes().unwrap()
	}

	#[test]
	fn results_are_captured_from_the_wire() {
		let mut watcher = ResultWatcher::default();
		assert!(!watcher.game_over());

		let data = response_with_result(2, ProtoResult::Victory, true);
		watcher.watch(&data).unwrap();
		assert!(watcher.ended);
		assert_eq!(watcher.results, vec![(2, GameResult::Victory)]);
	}

	#[test]
	fn repeated_results_are_kept_once() {
		let mut watcher = ResultWatcher::default();
		let data = response_with_result(1, ProtoResult::Defeat, false);
		watcher.watch(&data).unwrap();
		watcher.watch(&data).unwrap();
		assert_eq!(watcher.results, vec![(1, GameResult::Defeat)]);
		assert!(watcher.game_over());
		assert!(!watcher.ended);
	}

	#[test]
	fn responses_without_results_leave_the_game_running() {
		let mut watcher = ResultWatcher::default();
		let mut res = Response::new();
		res.set_status(Status::in_game);
		watcher.watch(&res.write_to_bytes().unwrap()).unwrap();
		assert!(!watcher.game_over());
	}
}
