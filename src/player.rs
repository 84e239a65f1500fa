//! Player descriptions: races, computer opponents, game results.

use crate::{FromProto, IntoProto};
use sc2_proto::{
	common::Race as ProtoRace,
	sc2api::{
		AIBuild as ProtoAIBuild, Difficulty as ProtoDifficulty, PlayerType as ProtoPlayerType,
		Result as ProtoResult,
	},
};
use std::str::FromStr;

/// Playable race.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Race {
	Terran,
	Zerg,
	Protoss,
	Random,
}
impl Race {
	/// True once the race is an actual race and not `Random`.
	pub fn is_resolved(self) -> bool {
		!matches!(self, Race::Random)
	}
}
impl Default for Race {
	fn default() -> Self {
		Race::Random
	}
}
impl FromStr for Race {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"terran" => Ok(Race::Terran),
			"zerg" => Ok(Race::Zerg),
			"protoss" => Ok(Race::Protoss),
			"random" => Ok(Race::Random),
			other => Err(format!("unknown race: {:?}", other)),
		}
	}
}
impl FromProto<ProtoRace> for Race {
	fn from_proto(race: ProtoRace) -> Self {
		match race {
			ProtoRace::Terran => Race::Terran,
			ProtoRace::Zerg => Race::Zerg,
			ProtoRace::Protoss => Race::Protoss,
			ProtoRace::Random | ProtoRace::NoRace => Race::Random,
		}
	}
}
impl IntoProto<ProtoRace> for Race {
	fn into_proto(self) -> ProtoRace {
		match self {
			Race::Terran => ProtoRace::Terran,
			Race::Zerg => ProtoRace::Zerg,
			Race::Protoss => ProtoRace::Protoss,
			Race::Random => ProtoRace::Random,
		}
	}
}

/// Difficulty of the built-in AI.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Difficulty {
	VeryEasy,
	Easy,
	Medium,
	MediumHard,
	Hard,
	Harder,
	VeryHard,
	CheatVision,
	CheatMoney,
	CheatInsane,
}
impl FromProto<ProtoDifficulty> for Difficulty {
	fn from_proto(difficulty: ProtoDifficulty) -> Self {
		match difficulty {
			ProtoDifficulty::VeryEasy => Difficulty::VeryEasy,
			ProtoDifficulty::Easy => Difficulty::Easy,
			ProtoDifficulty::Medium => Difficulty::Medium,
			ProtoDifficulty::MediumHard => Difficulty::MediumHard,
			ProtoDifficulty::Hard => Difficulty::Hard,
			ProtoDifficulty::Harder => Difficulty::Harder,
			ProtoDifficulty::VeryHard => Difficulty::VeryHard,
			ProtoDifficulty::CheatVision => Difficulty::CheatVision,
			ProtoDifficulty::CheatMoney => Difficulty::CheatMoney,
			ProtoDifficulty::CheatInsane => Difficulty::CheatInsane,
		}
	}
}
impl IntoProto<ProtoDifficulty> for Difficulty {
	fn into_proto(self) -> ProtoDifficulty {
		match self {
			Difficulty::VeryEasy => ProtoDifficulty::VeryEasy,
			Difficulty::Easy => ProtoDifficulty::Easy,
			Difficulty::Medium => ProtoDifficulty::Medium,
			Difficulty::MediumHard => ProtoDifficulty::MediumHard,
			Difficulty::Hard => ProtoDifficulty::Hard,
			Difficulty::Harder => ProtoDifficulty::Harder,
			Difficulty::VeryHard => ProtoDifficulty::VeryHard,
			Difficulty::CheatVision => ProtoDifficulty::CheatVision,
			Difficulty::CheatMoney => ProtoDifficulty::CheatMoney,
			Difficulty::CheatInsane => ProtoDifficulty::CheatInsane,
		}
	}
}

/// Build style of the built-in AI.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AIBuild {
	RandomBuild,
	Rush,
	Timing,
	Power,
	Macro,
	Air,
}
impl FromProto<ProtoAIBuild> for AIBuild {
	fn from_proto(build: ProtoAIBuild) -> Self {
		match build {
			ProtoAIBuild::RandomBuild => AIBuild::RandomBuild,
			ProtoAIBuild::Rush => AIBuild::Rush,
			ProtoAIBuild::Timing => AIBuild::Timing,
			ProtoAIBuild::Power => AIBuild::Power,
			ProtoAIBuild::Macro => AIBuild::Macro,
			ProtoAIBuild::Air => AIBuild::Air,
		}
	}
}
impl IntoProto<ProtoAIBuild> for AIBuild {
	fn into_proto(self) -> ProtoAIBuild {
		match self {
			AIBuild::RandomBuild => ProtoAIBuild::RandomBuild,
			AIBuild::Rush => ProtoAIBuild::Rush,
			AIBuild::Timing => ProtoAIBuild::Timing,
			AIBuild::Power => ProtoAIBuild::Power,
			AIBuild::Macro => ProtoAIBuild::Macro,
			AIBuild::Air => ProtoAIBuild::Air,
		}
	}
}

/// How a slot in the game is filled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerType {
	Participant,
	Computer,
	Observer,
}
impl FromProto<ProtoPlayerType> for PlayerType {
	fn from_proto(player_type: ProtoPlayerType) -> Self {
		match player_type {
			ProtoPlayerType::Participant => PlayerType::Participant,
			ProtoPlayerType::Computer => PlayerType::Computer,
			ProtoPlayerType::Observer => PlayerType::Observer,
		}
	}
}

/// A built-in computer opponent.
#[derive(Debug, Clone)]
pub struct Computer {
	pub race: Race,
	pub difficulty: Difficulty,
	pub ai_build: Option<AIBuild>,
}
impl Computer {
	pub fn new(race: Race, difficulty: Difficulty, ai_build: Option<AIBuild>) -> Self {
		Self {
			race,
			difficulty,
			ai_build,
		}
	}
}

/// Outcome of a game from this player's perspective.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameResult {
	Victory,
	Defeat,
	Tie,
	Undecided,
}
impl FromProto<ProtoResult> for GameResult {
	fn from_proto(result: ProtoResult) -> Self {
		match result {
			ProtoResult::Victory => GameResult::Victory,
			ProtoResult::Defeat => GameResult::Defeat,
			ProtoResult::Tie => GameResult::Tie,
			ProtoResult::Undecided => GameResult::Undecided,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn race_parses_case_insensitive() {
		assert_eq!("Zerg".parse::<Race>(), Ok(Race::Zerg));
		assert_eq!("TERRAN".parse::<Race>(), Ok(Race::Terran));
		assert!("orc".parse::<Race>().is_err());
	}
}
