use sc2_kit::prelude::*;

#[derive(Default)]
struct WorkerRush {
	attacked: bool,
}

impl Bot for WorkerRush {
	fn settings(&self) -> PlayerSettings {
		PlayerSettings::new(Race::Protoss).with_name("WorkerRush")
	}
	fn on_start(&mut self, world: &mut World) -> SC2Result<()> {
		world.chat("glhf");
		Ok(())
	}
	fn on_step(&mut self, world: &mut World, _iteration: usize) -> SC2Result<()> {
		if !self.attacked {
			let target = world.game_info.map_center;
			for worker in &world.units.my.workers {
				worker.attack(Target::Pos(target), false);
			}
			self.attacked = true;
		}
		Ok(())
	}
	fn on_event(&mut self, _world: &mut World, event: Event) -> SC2Result<()> {
		if let Event::UnitDestroyed(tag) = event {
			println!("lost unit {}", tag);
		}
		Ok(())
	}
}

#[test]
fn bot_declares_its_settings() {
	let bot = WorkerRush::default();
	let settings = bot.settings();
	assert_eq!(settings.race, Race::Protoss);
	assert_eq!(settings.name.as_deref(), Some("WorkerRush"));
	assert!(!settings.raw_affects_selection);
}

#[test]
fn callbacks_run_against_an_empty_world() {
	let mut bot = WorkerRush::default();
	let mut world = World::default();
	bot.on_start(&mut world).unwrap();
	bot.on_step(&mut world, 0).unwrap();
	assert!(bot.attacked);
	bot.on_end(&world, GameResult::Victory).unwrap();
}
